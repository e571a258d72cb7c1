//! RIFF/WAVE container reader
//!
//! Parses the header up to the start of the `data` chunk and then hands out
//! the PCM payload in caller-sized pieces. [`WavReader::new`] only reads
//! forward, so any [`Read`] works, including standard input, but it needs
//! `fmt ` ahead of `data`. [`WavReader::new_seekable`] and
//! [`WavReader::open`] also accept `data` first and seek back to it.
//!
//! Sub-chunks other than `fmt ` and `data` are skipped by their declared
//! length plus the RIFF pad byte. A `data` chunk declaring size 0 or a size
//! at or above [`STREAMED_SIZE_THRESHOLD`] is treated as unknown length and
//! read until end of file.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

use crate::config::WAVE_FORMAT_EXTENSIBLE;
use crate::error::{FormatError, FormatResult, TranscodeError, TranscodeResult};

/// Chunk sizes at or above this mark an unknown-length stream
pub const STREAMED_SIZE_THRESHOLD: u32 = 0x7FFF_0000;

const FMT_BASE_LEN: u32 = 16;
const FMT_EXTENSIBLE_MIN_LEN: u32 = 28;

/// Stream format from the `fmt ` chunk plus the `data` chunk size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Format tag; for WAVE_FORMAT_EXTENSIBLE this is the sub-format
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Payload size in bytes, `None` for streamed files
    pub data_size: Option<u32>,
}

impl WavHeader {
    /// Playback length derived from the byte rate, when both are known
    pub fn duration(&self) -> Option<Duration> {
        let size = self.data_size?;
        if self.byte_rate == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(size as f64 / self.byte_rate as f64))
    }
}

/// Sequential reader over the PCM payload of a WAV stream
#[derive(Debug)]
pub struct WavReader<R> {
    inner: R,
    header: WavHeader,
    consumed: u64,
}

impl WavReader<BufReader<File>> {
    /// Open and parse a WAV file
    pub fn open<P: AsRef<Path>>(path: P) -> TranscodeResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TranscodeError::file(path, e))?;
        let reader = WavReader::new_seekable(BufReader::new(file))?;
        log::debug!("opened {}: {:?}", path.display(), reader.header());
        Ok(reader)
    }
}

impl<R: Read> WavReader<R> {
    /// Parse the header from `inner`, leaving it positioned at the payload
    pub fn new(mut inner: R) -> FormatResult<Self> {
        let header = parse_header(&mut inner)?;
        Ok(Self {
            inner,
            header,
            consumed: 0,
        })
    }

    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    /// Payload bytes handed out so far
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Payload bytes left, `None` for streamed files
    pub fn remaining(&self) -> Option<u64> {
        self.header
            .data_size
            .map(|size| size as u64 - self.consumed)
    }

    /// Copy up to `buf.len()` payload bytes into `buf`
    ///
    /// The buffer is filled completely unless the payload or the file ends
    /// first, so a short count means end of stream. Returns 0 once the
    /// payload is exhausted.
    pub fn read_data(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = match self.remaining() {
            Some(left) => buf.len().min(usize::try_from(left).unwrap_or(usize::MAX)),
            None => buf.len(),
        };

        let mut filled = 0;
        while filled < want {
            match self.inner.read(&mut buf[filled..want]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        self.consumed += filled as u64;
        Ok(filled)
    }
}

impl<R: Read + Seek> WavReader<R> {
    /// Like [`WavReader::new`], but a `data` chunk of known size may come
    /// before `fmt `
    pub fn new_seekable(mut inner: R) -> FormatResult<Self> {
        let header = parse_header_seekable(&mut inner)?;
        Ok(Self {
            inner,
            header,
            consumed: 0,
        })
    }
}

enum Chunk {
    Fmt(WavHeader),
    /// Declared `data` size; the reader is left at the payload
    Data(u32),
}

/// Check the RIFF/WAVE preamble, returning the payload length left unless
/// the file is streamed
fn read_riff<R: Read>(r: &mut R) -> FormatResult<Option<u32>> {
    match read_chunk_id(r)? {
        Some(id) if &id == b"RIFF" => {}
        _ => return Err(FormatError::MissingRiff),
    }
    let riff_size = read_u32(r)?;
    if &read_id(r)? != b"WAVE" {
        return Err(FormatError::MissingWave);
    }

    if riff_size == 0 || riff_size >= STREAMED_SIZE_THRESHOLD {
        Ok(None)
    } else {
        Ok(Some(riff_size.saturating_sub(4)))
    }
}

/// Advance to the next `fmt ` or `data` chunk, skipping anything else
fn next_chunk<R: Read>(r: &mut R, remaining: &mut Option<u32>) -> FormatResult<Option<Chunk>> {
    loop {
        let id = match read_chunk_id(r)? {
            Some(id) => id,
            None => return Ok(None),
        };
        let size = read_u32(r)?;
        consume(remaining, 8);

        if &id == b"data" {
            return Ok(Some(Chunk::Data(size)));
        }

        if let Some(left) = *remaining {
            if size > left {
                return Err(FormatError::ChunkOverrun {
                    id: String::from_utf8_lossy(&id).into_owned(),
                    size,
                    remaining: left,
                });
            }
        }

        let pad = size & 1;
        consume(remaining, size.saturating_add(pad));
        if &id == b"fmt " {
            let header = parse_fmt(r, size)?;
            skip(r, pad as u64)?;
            return Ok(Some(Chunk::Fmt(header)));
        }
        log::debug!(
            "skipping '{}' chunk of {} bytes",
            String::from_utf8_lossy(&id),
            size
        );
        skip(r, size as u64 + pad as u64)?;
    }
}

fn consume(remaining: &mut Option<u32>, len: u32) {
    if let Some(left) = remaining.as_mut() {
        *left = left.saturating_sub(len);
    }
}

fn is_streamed_size(size: u32) -> bool {
    size == 0 || size >= STREAMED_SIZE_THRESHOLD
}

fn with_data_size(mut header: WavHeader, size: u32) -> WavHeader {
    header.data_size = if is_streamed_size(size) { None } else { Some(size) };
    header
}

fn parse_header<R: Read>(r: &mut R) -> FormatResult<WavHeader> {
    let mut remaining = read_riff(r)?;
    let mut fmt: Option<WavHeader> = None;
    loop {
        match next_chunk(r, &mut remaining)? {
            Some(Chunk::Fmt(header)) => fmt = Some(header),
            Some(Chunk::Data(size)) => {
                let header = fmt.ok_or(FormatError::DataBeforeFmt)?;
                return Ok(with_data_size(header, size));
            }
            None if fmt.is_none() => return Err(FormatError::MissingFmtChunk),
            None => return Err(FormatError::MissingDataChunk),
        }
    }
}

/// As [`parse_header`], remembering an early `data` chunk and seeking back
/// to its payload once `fmt ` is found
fn parse_header_seekable<R: Read + Seek>(r: &mut R) -> FormatResult<WavHeader> {
    let mut remaining = read_riff(r)?;
    let mut fmt: Option<WavHeader> = None;
    let mut early_data: Option<(u64, u32)> = None;
    loop {
        match next_chunk(r, &mut remaining)? {
            Some(Chunk::Fmt(header)) => match early_data {
                Some((payload_start, size)) => {
                    r.seek(SeekFrom::Start(payload_start))?;
                    return Ok(with_data_size(header, size));
                }
                None => fmt = Some(header),
            },
            Some(Chunk::Data(size)) => {
                if let Some(header) = fmt {
                    return Ok(with_data_size(header, size));
                }
                // An unknown-length payload cannot be skipped over
                if is_streamed_size(size) {
                    return Err(FormatError::DataBeforeFmt);
                }
                let payload_start = r.stream_position()?;
                log::debug!("'data' chunk at offset {} precedes 'fmt '", payload_start);
                let pad = size & 1;
                skip(r, size as u64 + pad as u64)?;
                consume(&mut remaining, size.saturating_add(pad));
                early_data = Some((payload_start, size));
            }
            None if fmt.is_none() => return Err(FormatError::MissingFmtChunk),
            None => return Err(FormatError::MissingDataChunk),
        }
    }
}

/// Read a `fmt ` body of `size` bytes
fn parse_fmt<R: Read>(r: &mut R, size: u32) -> FormatResult<WavHeader> {
    if size < FMT_BASE_LEN {
        return Err(FormatError::FmtChunkTooShort {
            size,
            required: FMT_BASE_LEN,
        });
    }

    let mut base = [0u8; FMT_BASE_LEN as usize];
    r.read_exact(&mut base)?;
    let mut header = WavHeader {
        format_tag: u16::from_le_bytes([base[0], base[1]]),
        channels: u16::from_le_bytes([base[2], base[3]]),
        sample_rate: u32::from_le_bytes([base[4], base[5], base[6], base[7]]),
        byte_rate: u32::from_le_bytes([base[8], base[9], base[10], base[11]]),
        block_align: u16::from_le_bytes([base[12], base[13]]),
        bits_per_sample: u16::from_le_bytes([base[14], base[15]]),
        data_size: None,
    };
    let mut consumed = FMT_BASE_LEN;

    if header.format_tag == WAVE_FORMAT_EXTENSIBLE {
        if size < FMT_EXTENSIBLE_MIN_LEN {
            return Err(FormatError::FmtChunkTooShort {
                size,
                required: FMT_EXTENSIBLE_MIN_LEN,
            });
        }
        // cbSize, valid bits, channel mask, then the sub-format GUID
        let mut ext = [0u8; 12];
        r.read_exact(&mut ext)?;
        header.format_tag = u16::from_le_bytes([ext[8], ext[9]]);
        consumed = FMT_EXTENSIBLE_MIN_LEN;
    }

    if header.channels == 0 {
        return Err(FormatError::NoChannels);
    }

    skip(r, (size - consumed) as u64)?;
    Ok(header)
}

fn read_id<R: Read>(r: &mut R) -> FormatResult<[u8; 4]> {
    let mut id = [0u8; 4];
    r.read_exact(&mut id)?;
    Ok(id)
}

/// Next chunk id, or `None` on a clean end of file
fn read_chunk_id<R: Read>(r: &mut R) -> FormatResult<Option<[u8; 4]>> {
    let mut id = [0u8; 4];
    let mut filled = 0;
    while filled < id.len() {
        match r.read(&mut id[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(FormatError::Truncated),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Some(id))
}

fn read_u32<R: Read>(r: &mut R) -> FormatResult<u32> {
    let mut bytes = [0u8; 4];
    r.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

fn skip<R: Read>(r: &mut R, len: u64) -> FormatResult<()> {
    if len == 0 {
        return Ok(());
    }
    let skipped = io::copy(&mut r.by_ref().take(len), &mut io::sink())?;
    if skipped < len {
        return Err(FormatError::Truncated);
    }
    Ok(())
}
