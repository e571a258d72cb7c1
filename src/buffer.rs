//! Fixed-capacity output buffer for one encoded frame
//!
//! The engine writes into [`FrameBuffer::writable`] and then reports how many
//! bytes it produced through [`FrameBuffer::commit`]. A report larger than the
//! capacity is an error; the buffer never grows.

use crate::config::MAX_OUTPUT_FRAME_BYTES;
use crate::error::{EncodeFailureError, EncodeResult};

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    data: Box<[u8]>,
    len: usize,
}

impl FrameBuffer {
    /// Allocate a zeroed buffer of `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forget the previous frame
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// The whole backing storage, for the engine to write into
    pub fn writable(&mut self) -> &mut [u8] {
        self.len = 0;
        &mut self.data
    }

    /// Record that the engine produced `len` bytes
    pub fn commit(&mut self, len: usize) -> EncodeResult<()> {
        if len > self.data.len() {
            self.len = 0;
            return Err(EncodeFailureError::OutputOverflow {
                required: len,
                capacity: self.data.len(),
            });
        }
        self.len = len;
        Ok(())
    }

    /// Copy an already encoded frame in
    pub fn fill_from(&mut self, bytes: &[u8]) -> EncodeResult<()> {
        self.commit(bytes.len())?;
        self.data[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// The committed frame bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_OUTPUT_FRAME_BYTES)
    }
}
