//! WAV to AAC encoding driver
//!
//! A run moves through `Validating → Configuring → Streaming → Finalizing`.
//! Any error ends the run in `Failed`; nothing is retried. The output file
//! is only created once the input is validated and the engine configured, so
//! a rejected run leaves no file behind. Bytes already written when a later
//! step fails stay on disk.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use crate::buffer::FrameBuffer;
use crate::config::{
    is_stdio, EncoderParams, TranscodeOptions, BYTES_PER_SAMPLE, SAMPLES_PER_CHUNK,
    SUPPORTED_BITS_PER_SAMPLE, WAVE_FORMAT_PCM,
};
use crate::engine::{AudioEncoder, EncodingSession};
use crate::error::{TranscodeError, TranscodeResult, UnsupportedFormatError};
use crate::pcm_utils::{chunk_len_bytes, decode_le_i16_into};
use crate::wav::{WavHeader, WavReader};

/// Driver state, for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Validating,
    Configuring,
    Streaming,
    Finalizing,
    Failed,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Validating => "validating",
            DriverState::Configuring => "configuring",
            DriverState::Streaming => "streaming",
            DriverState::Finalizing => "finalizing",
            DriverState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One encoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameRecord {
    /// 0-based frame index
    pub index: u64,
    /// PCM bytes read for this frame
    pub input_bytes: usize,
    /// Encoded bytes written
    pub output_bytes: usize,
    /// Offset of the frame in the output stream
    pub output_offset: u64,
    /// CRC32 of the encoded bytes
    pub crc32: u32,
}

/// Counters from the streaming loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Loop iterations that reached the engine
    pub frames: u64,
    /// PCM bytes handed to the engine
    pub bytes_in: u64,
    /// Encoded bytes written to the sink
    pub bytes_out: u64,
    /// Bytes of the trailing partial chunk that were not encoded
    pub dropped_tail_bytes: usize,
    /// Per-frame records, when requested
    pub records: Vec<FrameRecord>,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSummary {
    pub header: WavHeader,
    pub params: EncoderParams,
    pub stats: StreamStats,
}

/// Reject anything but 16-bit linear PCM
pub fn validate_header(header: &WavHeader) -> Result<(), UnsupportedFormatError> {
    if header.format_tag != WAVE_FORMAT_PCM {
        return Err(UnsupportedFormatError::FormatTag(header.format_tag));
    }
    if header.bits_per_sample != SUPPORTED_BITS_PER_SAMPLE {
        return Err(UnsupportedFormatError::BitsPerSample(header.bits_per_sample));
    }
    Ok(())
}

/// Stream fixed-size chunks from `reader` through `session` into `sink`
///
/// Each iteration reads `channels × 2 × 1024` bytes. A short read ends the
/// loop and the partial chunk is not encoded.
pub fn stream_frames<R, W, E>(
    reader: &mut WavReader<R>,
    session: &mut EncodingSession<E>,
    sink: &mut W,
    record_frames: bool,
) -> TranscodeResult<StreamStats>
where
    R: Read,
    W: Write,
    E: AudioEncoder,
{
    let chunk_len = chunk_len_bytes(reader.header().channels);
    let mut input = vec![0u8; chunk_len];
    let mut samples: Vec<i16> = Vec::with_capacity(chunk_len / BYTES_PER_SAMPLE);
    let mut output = FrameBuffer::default();
    let mut stats = StreamStats::default();

    loop {
        let read = reader.read_data(&mut input)?;
        if read < chunk_len {
            stats.dropped_tail_bytes = read;
            break;
        }

        decode_le_i16_into(&input, &mut samples);
        let info = session.encode(&samples, &mut output)?;
        sink.write_all(output.as_slice())?;

        if record_frames {
            stats.records.push(FrameRecord {
                index: stats.frames,
                input_bytes: read,
                output_bytes: output.len(),
                output_offset: stats.bytes_out,
                crc32: crc32fast::hash(output.as_slice()),
            });
        }
        log::debug!(
            "[Frame {}] PCM {} bytes, AAC {} bytes @ 0x{:04X}, consumed {} samples",
            stats.frames + 1,
            read,
            output.len(),
            stats.bytes_out,
            info.input_consumed
        );

        stats.frames += 1;
        stats.bytes_in += read as u64;
        stats.bytes_out += output.len() as u64;
    }

    if stats.dropped_tail_bytes > 0 {
        let channels = reader.header().channels.max(1) as usize;
        log::warn!(
            "dropped {} trailing bytes ({} samples per channel, less than one {}-sample frame)",
            stats.dropped_tail_bytes,
            stats.dropped_tail_bytes / (channels * BYTES_PER_SAMPLE),
            SAMPLES_PER_CHUNK
        );
    }

    Ok(stats)
}

/// Run one file-to-file encode with an engine built by `make_engine`
///
/// `make_engine` is only called after the input passes validation.
pub fn transcode<E, F>(options: &TranscodeOptions, make_engine: F) -> TranscodeResult<EncodeSummary>
where
    E: AudioEncoder,
    F: FnOnce() -> E,
{
    let result = run(options, make_engine);
    if let Err(err) = &result {
        log::debug!("state -> {}: {}", DriverState::Failed, err);
    }
    result
}

fn run<E, F>(options: &TranscodeOptions, make_engine: F) -> TranscodeResult<EncodeSummary>
where
    E: AudioEncoder,
    F: FnOnce() -> E,
{
    enter(DriverState::Validating);
    if is_stdio(&options.input) {
        let reader = WavReader::new(io::stdin().lock())?;
        log::debug!("input <stdin>: {:?}", reader.header());
        encode_from(reader, options, make_engine)
    } else {
        encode_from(WavReader::open(&options.input)?, options, make_engine)
    }
}

fn encode_from<R, E, F>(
    mut reader: WavReader<R>,
    options: &TranscodeOptions,
    make_engine: F,
) -> TranscodeResult<EncodeSummary>
where
    R: Read,
    E: AudioEncoder,
    F: FnOnce() -> E,
{
    let header = *reader.header();
    validate_header(&header)?;

    enter(DriverState::Configuring);
    let params = EncoderParams::new(header.sample_rate, header.channels, options.bitrate);
    let mut session = EncodingSession::configure(make_engine(), params)?;
    let mut sink = open_output(options)?;

    enter(DriverState::Streaming);
    let stats = stream_frames(&mut reader, &mut session, &mut sink, options.record_frames)?;

    enter(DriverState::Finalizing);
    sink.flush()?;
    drop(sink);
    drop(session);

    Ok(EncodeSummary {
        header,
        params,
        stats,
    })
}

fn enter(state: DriverState) {
    log::debug!("state -> {}", state);
}

fn open_output(options: &TranscodeOptions) -> TranscodeResult<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = if is_stdio(&options.output) {
        Box::new(io::stdout().lock())
    } else {
        let file =
            File::create(&options.output).map_err(|e| TranscodeError::file(&options.output, e))?;
        Box::new(file)
    };
    Ok(BufWriter::new(sink))
}
