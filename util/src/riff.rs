//! Hand-built RIFF/WAVE byte streams

/// Fields of a `fmt ` chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtSpec {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl FmtSpec {
    /// 16-bit linear PCM
    pub fn pcm16(channels: u16, sample_rate: u32) -> Self {
        Self {
            format_tag: 1,
            channels,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    pub fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// The 16-byte body shared by every `fmt ` variant
    fn base_body(&self, format_tag: u16) -> Vec<u8> {
        let mut body = Vec::with_capacity(16);
        body.extend_from_slice(&format_tag.to_le_bytes());
        body.extend_from_slice(&self.channels.to_le_bytes());
        body.extend_from_slice(&self.sample_rate.to_le_bytes());
        body.extend_from_slice(&self.byte_rate().to_le_bytes());
        body.extend_from_slice(&self.block_align().to_le_bytes());
        body.extend_from_slice(&self.bits_per_sample.to_le_bytes());
        body
    }
}

#[derive(Debug, Clone)]
struct Chunk {
    id: [u8; 4],
    body: Vec<u8>,
    declared_size: Option<u32>,
}

/// Builder for a RIFF/WAVE file, chunk by chunk in the order given
#[derive(Debug, Clone, Default)]
pub struct RiffBuilder {
    chunks: Vec<Chunk>,
    riff_size: Option<u32>,
}

impl RiffBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain 16-byte `fmt ` chunk
    pub fn fmt(self, spec: &FmtSpec) -> Self {
        let body = spec.base_body(spec.format_tag);
        self.chunk(b"fmt ", &body)
    }

    /// 40-byte WAVE_FORMAT_EXTENSIBLE `fmt ` chunk with the given sub-format tag
    pub fn fmt_extensible(self, spec: &FmtSpec, sub_format: u16) -> Self {
        let mut body = spec.base_body(0xFFFE);
        body.extend_from_slice(&22u16.to_le_bytes()); // cbSize
        body.extend_from_slice(&spec.bits_per_sample.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes()); // channel mask
        body.extend_from_slice(&(sub_format as u32).to_le_bytes());
        // Remainder of KSDATAFORMAT_SUBTYPE GUID
        body.extend_from_slice(&[
            0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71,
        ]);
        self.chunk(b"fmt ", &body)
    }

    /// Arbitrary chunk; odd-sized bodies get a pad byte
    pub fn chunk(mut self, id: &[u8; 4], body: &[u8]) -> Self {
        self.chunks.push(Chunk {
            id: *id,
            body: body.to_vec(),
            declared_size: None,
        });
        self
    }

    /// Chunk whose size field disagrees with its body
    pub fn chunk_with_declared_size(mut self, id: &[u8; 4], body: &[u8], declared: u32) -> Self {
        self.chunks.push(Chunk {
            id: *id,
            body: body.to_vec(),
            declared_size: Some(declared),
        });
        self
    }

    pub fn data(self, bytes: &[u8]) -> Self {
        self.chunk(b"data", bytes)
    }

    /// `data` chunk with a size of 0, as written by streaming recorders
    pub fn streamed_data(self, bytes: &[u8]) -> Self {
        self.chunk_with_declared_size(b"data", bytes, 0)
    }

    /// Override the RIFF length field
    pub fn riff_size(mut self, size: u32) -> Self {
        self.riff_size = Some(size);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(b"WAVE");
        for chunk in &self.chunks {
            payload.extend_from_slice(&chunk.id);
            let size = chunk.declared_size.unwrap_or(chunk.body.len() as u32);
            payload.extend_from_slice(&size.to_le_bytes());
            payload.extend_from_slice(&chunk.body);
            if chunk.declared_size.is_none() && chunk.body.len() % 2 == 1 {
                payload.push(0);
            }
        }

        let mut out = Vec::with_capacity(payload.len() + 8);
        out.extend_from_slice(b"RIFF");
        let riff_size = self.riff_size.unwrap_or(payload.len() as u32);
        out.extend_from_slice(&riff_size.to_le_bytes());
        out.extend_from_slice(&payload);
        out
    }
}

/// Little-endian bytes of interleaved samples
pub fn pcm16_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Minimal canonical 16-bit PCM WAV file
pub fn pcm16_wav(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    RiffBuilder::new()
        .fmt(&FmtSpec::pcm16(channels, sample_rate))
        .data(&pcm16_bytes(samples))
        .build()
}
