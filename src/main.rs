//! WAV to AAC converter command line tool
//!
//! Reads a 16-bit PCM WAV file and writes an ADTS/AAC stream using the
//! FDK AAC encoder. Command line interface matches the classic `aac-enc`.

use aacenc_rs::cli::{usage, Args, ArgsError};
use aacenc_rs::driver::transcode;
use aacenc_rs::fdk::FdkAacEncoder;
use aacenc_rs::{EncodeSummary, TranscodeResult};
use std::env;
use std::process;
use std::time::Instant;

/// Convert WAV file to AAC
fn convert_wav_to_aac(args: &Args) -> TranscodeResult<()> {
    let options = args.transcode_options();
    let start_time = Instant::now();

    let summary = transcode(&options, FdkAacEncoder::new)?;

    let elapsed = start_time.elapsed();
    let stats = &summary.stats;
    log::info!(
        "Encoded {} frames: {} PCM bytes -> {} AAC bytes in {:.2}s",
        stats.frames,
        stats.bytes_in,
        stats.bytes_out,
        elapsed.as_secs_f64()
    );
    if let Some(duration) = summary.header.duration() {
        if elapsed.as_secs_f64() > 0.0 {
            log::info!(
                "Input duration {:.2}s ({:.1}x realtime)",
                duration.as_secs_f64(),
                duration.as_secs_f64() / elapsed.as_secs_f64()
            );
        }
    }
    if stats.bytes_out > 0 {
        log::info!(
            "Compression: {:.1}:1",
            stats.bytes_in as f64 / stats.bytes_out as f64
        );
    }

    save_report(args, &summary)
}

#[cfg(feature = "diagnostics")]
fn save_report(args: &Args, summary: &EncodeSummary) -> TranscodeResult<()> {
    use aacenc_rs::diagnostics::EncodeReport;

    match &args.report {
        Some(path) => EncodeReport::new(summary, &args.input, &args.output, "fdk-aac").save(path),
        None => Ok(()),
    }
}

#[cfg(not(feature = "diagnostics"))]
fn save_report(_args: &Args, _summary: &EncodeSummary) -> TranscodeResult<()> {
    Ok(())
}

fn main() {
    let program = env::args().next().unwrap_or_else(|| "aac-enc".to_string());

    // Parse command line arguments
    let args = match Args::parse() {
        Ok(args) => args,
        Err(ArgsError::Usage) => {
            eprintln!("{}", usage(&program));
            process::exit(1);
        }
        Err(ArgsError::Invalid(msg)) => {
            eprintln!("{}: {}", program, msg);
            eprintln!("{}", usage(&program));
            process::exit(1);
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(args.verbosity.level_filter())
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    if let Err(err) = convert_wav_to_aac(&args) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
