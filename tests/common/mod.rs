//! Shared helpers for integration tests
//!
//! `MockEngine` stands in for the AAC library so the driver can be tested
//! with exact frame counts and injected failures.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use aacenc_rs::{
    AudioEncoder, EncodeFailureError, EncoderConfigError, EncoderParams, FrameBuffer, OutputInfo,
};

/// Everything the driver did to a `MockEngine`
#[derive(Debug, Default)]
pub struct EngineLog {
    pub created: bool,
    pub params: Option<EncoderParams>,
    pub chunks: Vec<Vec<i16>>,
    pub teardowns: u32,
}

pub type SharedLog = Rc<RefCell<EngineLog>>;

/// Engine emitting `frame_size` bytes per chunk, each byte the chunk index
pub struct MockEngine {
    log: SharedLog,
    frame_size: usize,
    reject_config: bool,
    fail_on_chunk: Option<usize>,
    pending: Vec<i16>,
}

impl MockEngine {
    pub fn new(log: &SharedLog) -> Self {
        log.borrow_mut().created = true;
        Self {
            log: log.clone(),
            frame_size: 8,
            reject_config: false,
            fail_on_chunk: None,
            pending: Vec::new(),
        }
    }

    pub fn frame_size(mut self, size: usize) -> Self {
        self.frame_size = size;
        self
    }

    pub fn reject_config(mut self) -> Self {
        self.reject_config = true;
        self
    }

    /// Fail `retrieve` for the chunk with this 0-based index
    pub fn fail_on_chunk(mut self, index: usize) -> Self {
        self.fail_on_chunk = Some(index);
        self
    }
}

impl AudioEncoder for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn configure(&mut self, params: &EncoderParams) -> Result<(), EncoderConfigError> {
        if self.reject_config {
            return Err(EncoderConfigError::Rejected("mock refuses".into()));
        }
        self.log.borrow_mut().params = Some(*params);
        Ok(())
    }

    fn submit(&mut self, samples: &[i16]) -> Result<(), EncodeFailureError> {
        self.pending = samples.to_vec();
        Ok(())
    }

    fn retrieve(&mut self, output: &mut FrameBuffer) -> Result<OutputInfo, EncodeFailureError> {
        let mut log = self.log.borrow_mut();
        let index = log.chunks.len();
        if self.fail_on_chunk == Some(index) {
            return Err(EncodeFailureError::Engine(format!("mock failure at chunk {}", index)));
        }
        let consumed = self.pending.len();
        log.chunks.push(std::mem::take(&mut self.pending));

        let frame = vec![index as u8; self.frame_size];
        output.fill_from(&frame)?;
        Ok(OutputInfo {
            input_consumed: consumed,
            output_size: frame.len(),
        })
    }

    fn teardown(&mut self) {
        self.log.borrow_mut().teardowns += 1;
    }
}

pub fn new_log() -> SharedLog {
    Rc::new(RefCell::new(EngineLog::default()))
}

/// Write `bytes` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Split a stream of ADTS frames into their lengths
pub fn adts_frame_lengths(stream: &[u8]) -> Vec<usize> {
    let mut lengths = Vec::new();
    let mut pos = 0;
    while pos + 7 <= stream.len() {
        let h = &stream[pos..pos + 7];
        assert_eq!(h[0], 0xFF, "ADTS syncword at offset {}", pos);
        assert_eq!(h[1] & 0xF0, 0xF0, "ADTS syncword at offset {}", pos);
        let len = ((h[3] as usize & 0x03) << 11) | ((h[4] as usize) << 3) | (h[5] as usize >> 5);
        assert!(len >= 7, "ADTS frame length {} at offset {}", len, pos);
        lengths.push(len);
        pos += len;
    }
    assert_eq!(pos, stream.len(), "stream must end on a frame boundary");
    lengths
}
