//! Configuration management for the encoder front end
//!
//! This module provides the constants shared by the reader and the driver,
//! the parameter set handed to the encoder engine, and the options for a
//! single WAV to AAC run.

use std::path::{Path, PathBuf};

/// Default target bitrate in bits per second
pub const DEFAULT_BITRATE: u32 = 64_000;

/// Samples per channel submitted to the engine per call (one AAC-LC frame)
pub const SAMPLES_PER_CHUNK: usize = 1024;

/// Capacity of the output frame buffer in bytes
pub const MAX_OUTPUT_FRAME_BYTES: usize = 20_480;

/// Bytes per 16-bit PCM sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// `fmt ` format tag for linear PCM
pub const WAVE_FORMAT_PCM: u16 = 0x0001;

/// `fmt ` format tag for WAVE_FORMAT_EXTENSIBLE
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// The only sample depth accepted
pub const SUPPORTED_BITS_PER_SAMPLE: u16 = 16;

/// Path value meaning standard input or standard output
pub const STDIO_PATH: &str = "-";

/// Parameters applied to an encoder engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderParams {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Target bitrate in bits per second
    pub bit_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Wrap every access unit in an ADTS header
    pub adts: bool,
}

impl EncoderParams {
    pub fn new(sample_rate: u32, channels: u16, bit_rate: u32) -> Self {
        Self {
            sample_rate,
            bit_rate,
            channels,
            adts: true,
        }
    }
}

/// Verbosity of the command line tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Error,
            Verbosity::Normal => log::LevelFilter::Warn,
            Verbosity::Verbose => log::LevelFilter::Debug,
        }
    }
}

/// Options for one WAV to AAC run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Input WAV path, or `-` for standard input
    pub input: PathBuf,
    /// Output AAC path, or `-` for standard output
    pub output: PathBuf,
    /// Target bitrate in bits per second
    pub bitrate: u32,
    /// Keep a per-frame record in the summary
    pub record_frames: bool,
}

impl TranscodeOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            bitrate: DEFAULT_BITRATE,
            record_frames: false,
        }
    }

    /// Set the target bitrate
    pub fn bitrate(mut self, bitrate: u32) -> Self {
        self.bitrate = bitrate;
        self
    }

    /// Enable per-frame records
    pub fn record_frames(mut self, record: bool) -> Self {
        self.record_frames = record;
        self
    }
}

/// True when `path` names standard input/output rather than a file
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}
