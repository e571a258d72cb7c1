//! # Rust AAC Encoder Front End
//!
//! Reads 16-bit PCM WAV files and streams them, one 1024-sample frame at a
//! time, through an AAC encoder engine, writing the ADTS frames it emits.
//! The codec itself is external: [`fdk::FdkAacEncoder`] binds the FDK AAC
//! library, and any other engine can be plugged in through
//! [`engine::AudioEncoder`].
//!

pub mod buffer;
pub mod cli;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod fdk;
pub mod pcm_utils;
pub mod wav;

#[cfg(feature = "diagnostics")]
pub mod diagnostics;

// Re-export the commonly used interface
pub use buffer::FrameBuffer;
pub use config::{EncoderParams, TranscodeOptions, DEFAULT_BITRATE, SAMPLES_PER_CHUNK};
pub use driver::{stream_frames, transcode, EncodeSummary, StreamStats};
pub use engine::{AudioEncoder, EncodingSession, OutputInfo};
pub use error::{
    EncodeFailureError, EncoderConfigError, FormatError, TranscodeError, TranscodeResult,
    UnsupportedFormatError,
};
pub use fdk::FdkAacEncoder;
pub use wav::{WavHeader, WavReader};
