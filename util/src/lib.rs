//! Test fixtures for the AAC encoder
//!
//! This crate builds RIFF/WAVE byte streams by hand, including layouts that
//! regular WAV writers never produce (odd-sized chunks, streamed data sizes,
//! truncated headers), plus simple PCM signal generators.

pub mod riff;
pub mod signal;

// Re-export commonly used functions and types
pub use riff::*;
pub use signal::*;
