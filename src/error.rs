//! Error types for the AAC encoder front end
//!
//! This module defines all error types used throughout the crate, one
//! enum per failure family, collected under [`TranscodeError`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a WAV to AAC run
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// I/O failure on an already opened stream
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A file could not be opened or created
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input is not a usable RIFF/WAVE container
    #[error("Bad wav file: {0}")]
    Format(#[from] FormatError),

    /// Valid container carrying a PCM variant we do not encode
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    /// The encoder engine refused the parameters
    #[error("Unable to set encoding parameters: {0}")]
    EncoderConfig(#[from] EncoderConfigError),

    /// The encoder engine failed mid-stream
    #[error("Unable to encode frame: {0}")]
    EncodeFailure(#[from] EncodeFailureError),
}

impl TranscodeError {
    /// Wrap an I/O error with the path it happened on
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TranscodeError::File {
            path: path.into(),
            source,
        }
    }
}

/// Structural problems in the RIFF/WAVE container
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("missing RIFF header")]
    MissingRiff,

    #[error("missing WAVE form type")]
    MissingWave,

    #[error("no 'fmt ' chunk before end of file")]
    MissingFmtChunk,

    #[error("no 'data' chunk before end of file")]
    MissingDataChunk,

    #[error("'data' chunk precedes 'fmt ' chunk")]
    DataBeforeFmt,

    /// `fmt ` chunk too small for the fields its format tag requires
    #[error("'fmt ' chunk too short: {size} bytes, need {required}")]
    FmtChunkTooShort { size: u32, required: u32 },

    #[error("stream declares zero channels")]
    NoChannels,

    /// A sub-chunk claims more bytes than the RIFF payload has left
    #[error("chunk '{id}' of {size} bytes overruns the RIFF payload ({remaining} bytes left)")]
    ChunkOverrun {
        id: String,
        size: u32,
        remaining: u32,
    },

    #[error("unexpected end of file inside the header")]
    Truncated,

    #[error("I/O error while reading header: {0}")]
    Io(io::Error),
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            FormatError::Truncated
        } else {
            FormatError::Io(err)
        }
    }
}

/// Well-formed WAV files that are not 16-bit linear PCM
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnsupportedFormatError {
    #[error("Unsupported WAV format {0}")]
    FormatTag(u16),

    #[error("Unsupported WAV sample depth {0}")]
    BitsPerSample(u16),
}

/// Encoder parameter rejections
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncoderConfigError {
    #[error("{0} channels not supported by the encoder")]
    UnsupportedChannels(u16),

    #[error("invalid sample rate {0} Hz")]
    InvalidSampleRate(u32),

    #[error("invalid bitrate {0} bits/sec")]
    InvalidBitrate(u32),

    #[error("encoder already configured")]
    AlreadyConfigured,

    /// The engine itself rejected the parameter set
    #[error("rejected by engine: {0}")]
    Rejected(String),
}

/// Failures while feeding or draining the encoder
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeFailureError {
    #[error("encoder used before configuration")]
    NotConfigured,

    /// Engine reported more output than the frame buffer can hold
    #[error("encoded frame of {required} bytes exceeds output capacity of {capacity} bytes")]
    OutputOverflow { required: usize, capacity: usize },

    #[error("engine error: {0}")]
    Engine(String),
}

/// Result type used across the crate
pub type TranscodeResult<T> = std::result::Result<T, TranscodeError>;
pub type FormatResult<T> = std::result::Result<T, FormatError>;
pub type EncodeResult<T> = std::result::Result<T, EncodeFailureError>;
