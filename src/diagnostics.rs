//! JSON encode reports
//!
//! Collects the outcome of a run (input format, encoder parameters, per-frame
//! sizes and checksums) and saves it to JSON for later inspection.
//!
//! This module is only available when the "diagnostics" feature is enabled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::driver::{EncodeSummary, FrameRecord};
use crate::error::{TranscodeError, TranscodeResult};

/// Input stream description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    pub path: String,
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub data_size: Option<u32>,
}

/// Encoder settings used for the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderInfo {
    pub engine: String,
    pub bit_rate: u32,
    pub adts: bool,
}

/// Complete report of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeReport {
    pub created_at: DateTime<Utc>,
    pub input: InputInfo,
    pub output: String,
    pub encoder: EncoderInfo,
    pub frames: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub dropped_tail_bytes: usize,
    pub frame_records: Vec<FrameRecord>,
}

impl EncodeReport {
    pub fn new(summary: &EncodeSummary, input: &Path, output: &Path, engine: &str) -> Self {
        let header = &summary.header;
        Self {
            created_at: Utc::now(),
            input: InputInfo {
                path: input.display().to_string(),
                format_tag: header.format_tag,
                channels: header.channels,
                sample_rate: header.sample_rate,
                bits_per_sample: header.bits_per_sample,
                data_size: header.data_size,
            },
            output: output.display().to_string(),
            encoder: EncoderInfo {
                engine: engine.to_string(),
                bit_rate: summary.params.bit_rate,
                adts: summary.params.adts,
            },
            frames: summary.stats.frames,
            bytes_in: summary.stats.bytes_in,
            bytes_out: summary.stats.bytes_out,
            dropped_tail_bytes: summary.stats.dropped_tail_bytes,
            frame_records: summary.stats.records.clone(),
        }
    }

    /// Save the report as pretty-printed JSON
    pub fn save(&self, path: &Path) -> TranscodeResult<()> {
        let file = File::create(path).map_err(|e| TranscodeError::file(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| TranscodeError::file(path, e.into()))?;
        writer.flush()?;
        log::info!("Encode report saved to: {}", path.display());
        Ok(())
    }
}
