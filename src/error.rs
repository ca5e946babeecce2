//! Error types for the filtering core
//!
//! The core never prints; every failure is returned as an [`Error`] and the
//! binary decides how to present it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a failure, used by callers to pick an exit path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A setting was missing or failed validation; nothing was processed
    Configuration,
    /// A file or directory could not be opened or created
    Resource,
    /// Input bytes were not valid under the declared encoding
    Decode,
    /// Anything else that went wrong mid-run (e.g. a failed write)
    Unexpected,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{context}: {}", path.display())]
    Resource {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "could not decode line {line} with encoding '{encoding}'. {}",
        decode_hint(.encoding)
    )]
    Decode { encoding: &'static str, line: u64 },

    #[error("unexpected error: {0}")]
    Unexpected(#[from] io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Resource { .. } => ErrorKind::Resource,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn resource(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Resource {
            context,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn decode_hint(encoding: &str) -> &'static str {
    if encoding == "UTF-8" {
        "The file is not UTF-8; try ISO-8859-1, which reads any byte sequence"
    } else {
        "If you're unsure about the file encoding, try UTF-8 or consult the file's source"
    }
}
