//! PCM audio data processing utilities
//!
//! Raw WAV payload bytes are always little-endian. Decoding goes through
//! [`i16::from_le_bytes`] so the result does not depend on host byte order.

use crate::config::{BYTES_PER_SAMPLE, SAMPLES_PER_CHUNK};

/// Byte length of one streaming chunk for `channels` interleaved channels
pub fn chunk_len_bytes(channels: u16) -> usize {
    channels as usize * BYTES_PER_SAMPLE * SAMPLES_PER_CHUNK
}

/// Decode little-endian byte pairs into `out`, replacing its contents
///
/// `[b0, b1, b2, b3]` becomes `[b0 | b1 << 8, b2 | b3 << 8]`. A trailing
/// odd byte is ignored.
pub fn decode_le_i16_into(bytes: &[u8], out: &mut Vec<i16>) {
    out.clear();
    out.reserve(bytes.len() / BYTES_PER_SAMPLE);
    out.extend(
        bytes
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]])),
    );
}

/// Decode little-endian byte pairs into a new sample vector
pub fn decode_le_i16(bytes: &[u8]) -> Vec<i16> {
    let mut out = Vec::with_capacity(bytes.len() / BYTES_PER_SAMPLE);
    decode_le_i16_into(bytes, &mut out);
    out
}
