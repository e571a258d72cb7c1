//! PCM test signal generators

/// Interleaved sine tone, same phase on every channel
pub fn sine_wave(frames: usize, channels: u16, sample_rate: u32, freq: f32) -> Vec<i16> {
    let mut out = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = ((t * freq * std::f32::consts::TAU).sin() * 12_000.0) as i16;
        for _ in 0..channels {
            out.push(value);
        }
    }
    out
}

/// Interleaved ramp where every sample is distinct modulo 2^16
pub fn ramp(frames: usize, channels: u16) -> Vec<i16> {
    (0..frames * channels as usize)
        .map(|i| (i as u16).wrapping_mul(7) as i16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_wave_len() {
        assert_eq!(sine_wave(100, 2, 44_100, 440.0).len(), 200);
    }

    #[test]
    fn test_ramp_len() {
        assert_eq!(ramp(3, 2), vec![0, 7, 14, 21, 28, 35]);
    }
}
