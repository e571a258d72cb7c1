//! Command line argument parsing for `aac-enc`
//!
//! Options follow GNU getopt conventions: flags may appear anywhere among
//! the positionals, `-r` takes its value either attached (`-r96000`) or as
//! the next word, and `--` ends option parsing.

use std::path::PathBuf;

use crate::config::{TranscodeOptions, Verbosity, DEFAULT_BITRATE};

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bitrate: u32,
    pub verbosity: Verbosity,
    /// Where to save the JSON encode report
    pub report: Option<PathBuf>,
}

/// Reasons to print usage and exit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// `-h`, or too few arguments; usage alone
    Usage,
    /// Bad option or value; message, then usage
    Invalid(String),
}

impl Args {
    /// Parse the process arguments
    pub fn parse() -> Result<Self, ArgsError> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse arguments, excluding the program name
    pub fn parse_from<I, S>(args: I) -> Result<Self, ArgsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        let mut bitrate = DEFAULT_BITRATE;
        let mut verbosity = Verbosity::Normal;
        let mut report = None;

        let mut positionals: Vec<&String> = Vec::new();
        let mut options_done = false;

        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if options_done || !arg.starts_with('-') || arg == "-" {
                positionals.push(arg);
                i += 1;
                continue;
            }
            if arg == "--" {
                options_done = true;
                i += 1;
                continue;
            }

            for (pos, flag) in arg[1..].char_indices() {
                match flag {
                    'r' => {
                        bitrate = parse_bitrate(&option_value(&args, &mut i, pos, flag)?)?;
                        break;
                    }
                    'j' if cfg!(feature = "diagnostics") => {
                        report = Some(PathBuf::from(option_value(&args, &mut i, pos, flag)?));
                        break;
                    }
                    'v' => verbosity = Verbosity::Verbose,
                    'q' => verbosity = Verbosity::Quiet,
                    'h' => return Err(ArgsError::Usage),
                    other => return Err(ArgsError::Invalid(format!("invalid option -- '{}'", other))),
                }
            }
            i += 1;
        }

        match positionals.as_slice() {
            [input, output] => Ok(Args {
                input: PathBuf::from(input),
                output: PathBuf::from(output),
                bitrate,
                verbosity,
                report,
            }),
            [_, _, extra, ..] => Err(ArgsError::Invalid(format!("unexpected argument '{}'", extra))),
            _ => Err(ArgsError::Usage),
        }
    }

    pub fn transcode_options(&self) -> TranscodeOptions {
        TranscodeOptions::new(&self.input, &self.output)
            .bitrate(self.bitrate)
            .record_frames(self.report.is_some())
    }
}

/// Value of the option `flag` found at byte `pos` of `args[*i]` (after the dash)
///
/// Uses the rest of the word when non-empty, otherwise consumes the next one.
fn option_value(args: &[String], i: &mut usize, pos: usize, flag: char) -> Result<String, ArgsError> {
    let attached = &args[*i][1 + pos + flag.len_utf8()..];
    if !attached.is_empty() {
        return Ok(attached.to_string());
    }
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| ArgsError::Invalid(format!("option requires an argument -- '{}'", flag)))
}

fn parse_bitrate(value: &str) -> Result<u32, ArgsError> {
    match value.parse::<u32>() {
        Ok(bitrate) if bitrate > 0 => Ok(bitrate),
        _ => Err(ArgsError::Invalid(format!("invalid bitrate: {}", value))),
    }
}

/// Usage text; `program` is argv[0]
pub fn usage(program: &str) -> String {
    let mut text = format!("{} [-r bitrate] [-v] [-q] in.wav out.aac\n", program);
    text.push_str("  -r <bitrate>  target bitrate in bits/sec, default 64000\n");
    text.push_str("  -v            verbose, log every frame\n");
    text.push_str("  -q            quiet, errors only\n");
    if cfg!(feature = "diagnostics") {
        text.push_str("  -j <file>     save a JSON encode report\n");
    }
    text.push_str("Use \"-\" for standard input or output.");
    text
}
