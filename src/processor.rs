//! Core processing engine
//!
//! Streams an input file line by line through a [`PasswordPolicy`] and writes
//! the accepted candidates to the output file in their original order.

use crate::cli::Args;
use crate::encoding::{DecodedLines, TextEncoding};
use crate::error::{Error, Result};
use crate::output::{ensure_parent_dir, OutputWriter, DEFAULT_BUFFER_SIZE};
use crate::policy::{trim_candidate, PasswordPolicy, Rejection, Verdict};

use indicatif::ProgressBar;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Default output location
pub const DEFAULT_OUTPUT: &str = "./output.txt";

/// Validated settings for one filtering run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub policy: PasswordPolicy,
    pub input: PathBuf,
    pub output: PathBuf,
    pub encoding: TextEncoding,
}

impl RunConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let input = args
            .input
            .clone()
            .ok_or_else(|| Error::config("input file is required (-i/--input)"))?;

        let encoding: TextEncoding = args.encoding.parse()?;
        let policy = PasswordPolicy::new(args.length, args.special, args.number, args.capslock)?;

        Ok(Self {
            policy,
            input,
            output: args.output.clone(),
            encoding,
        })
    }
}

/// Counters for one pass over an input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRun {
    /// Input lines processed, blank ones included
    pub total_seen: u64,
    /// Lines written to the output
    pub total_kept: u64,
    /// Raw input bytes consumed
    pub bytes_read: u64,
    rejected: [u64; 4],
}

impl FilterRun {
    fn record(&mut self, verdict: Verdict) {
        self.total_seen += 1;
        match verdict {
            Verdict::Accept => self.total_kept += 1,
            Verdict::Reject(reason) => self.rejected[reason.index()] += 1,
        }
    }

    /// Lines turned away for a given reason
    pub fn rejected_by(&self, reason: Rejection) -> u64 {
        self.rejected[reason.index()]
    }

    pub fn total_rejected(&self) -> u64 {
        self.total_seen - self.total_kept
    }
}

/// Filter every line of `input` into `output`.
///
/// Consumes the input exactly once. On a decode failure the lines accepted
/// before it have already been handed to `output`; nothing is rolled back.
pub fn filter_stream<R: Read, W: Write>(
    policy: &PasswordPolicy,
    input: R,
    encoding: TextEncoding,
    output: &mut OutputWriter<W>,
) -> Result<FilterRun> {
    let mut run = FilterRun::default();
    let mut lines = DecodedLines::new(input, encoding);

    for line in lines.by_ref() {
        let line = line?;
        let candidate = trim_candidate(&line);

        let verdict = policy.evaluate(candidate);
        if let Verdict::Reject(reason) = verdict {
            log::trace!("Rejected line {}: {}", run.total_seen + 1, reason);
        } else {
            output.write_line(candidate)?;
        }
        run.record(verdict);
    }

    output.flush()?;
    run.bytes_read = lines.bytes_read();
    log::debug!("Decoded {} lines from {} bytes", lines.lines_read(), run.bytes_read);
    Ok(run)
}

/// Runs the filter over files on disk
pub struct Processor {
    config: RunConfig,
    progress: Option<ProgressBar>,
}

impl Processor {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Report byte progress on `pb` while reading the input
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    /// Open the input, prepare the output, and filter.
    ///
    /// The input is opened before anything touches the output path, so a
    /// missing input leaves an existing output file as it was.
    pub fn run(&self) -> Result<FilterRun> {
        let config = &self.config;
        log::debug!(
            "Filtering {} -> {} ({}, {:?})",
            config.input.display(),
            config.output.display(),
            config.encoding,
            config.policy
        );

        let input = open_input(&config.input)?;
        let input_size = input.metadata().map(|m| m.len()).unwrap_or(0);

        if is_same_file(&config.input, &config.output) {
            return Err(Error::config(format!(
                "output file {} is the input file",
                config.output.display()
            )));
        }

        ensure_parent_dir(&config.output)?;
        let mut output = OutputWriter::create(&config.output, config.encoding, DEFAULT_BUFFER_SIZE)?;

        let run = match &self.progress {
            Some(pb) => {
                pb.set_length(input_size);
                let run = filter_stream(&config.policy, pb.wrap_read(input), config.encoding, &mut output);
                pb.finish_and_clear();
                run
            }
            None => filter_stream(&config.policy, input, config.encoding, &mut output),
        }?;

        log::debug!(
            "Finished: {} seen, {} kept, {} lines ({} bytes) written",
            run.total_seen,
            run.total_kept,
            output.lines_written(),
            output.bytes_written()
        );
        Ok(run)
    }
}

fn open_input(path: &Path) -> Result<File> {
    let context = "cannot open input file";

    let metadata = fs::metadata(path).map_err(|e| Error::resource(context, path, e))?;
    if metadata.is_dir() {
        let err = io::Error::new(io::ErrorKind::Other, "is a directory");
        return Err(Error::resource(context, path, err));
    }

    File::open(path).map_err(|e| Error::resource(context, path, e))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
