//! # fipp
//!
//! Flexible Interactive Password Processor: reads a password list and keeps
//! the candidates that match a policy.
//!
//! ## Policy
//!
//! - **Exact length**: candidates must have exactly this many characters
//!   after leading/trailing whitespace is trimmed
//! - **Special characters**: anything outside `[A-Za-z0-9]`, interior spaces
//!   included, disqualifies unless allowed
//! - **Numbers**: any digit disqualifies unless allowed
//! - **Uppercase**: optional minimum count of `A-Z` letters
//!
//! ## Usage
//!
//! ```bash
//! # Exact length 8, letters only
//! fipp -i rockyou.txt
//!
//! # Length 10, specials and digits allowed, at least 2 uppercase
//! fipp -l 10 -s -n -c 2 -i input.txt -o results/output.txt -e UTF-8
//!
//! # Guided session
//! fipp -I
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use fipp::encoding::TextEncoding;
//! use fipp::policy::PasswordPolicy;
//! use fipp::processor::{Processor, RunConfig};
//! use std::path::PathBuf;
//!
//! let config = RunConfig {
//!     policy: PasswordPolicy::new(8, false, true, Some(2)).unwrap(),
//!     input: PathBuf::from("wordlist.txt"),
//!     output: PathBuf::from("./output.txt"),
//!     encoding: TextEncoding::Latin1,
//! };
//!
//! let run = Processor::new(config).run().unwrap();
//! println!("{} of {} kept", run.total_kept, run.total_seen);
//! ```

pub mod cli;
pub mod encoding;
pub mod error;
pub mod interactive;
pub mod output;
pub mod policy;
pub mod processor;
pub mod progress;

pub use cli::Args;
pub use error::{Error, ErrorKind, Result};
pub use policy::PasswordPolicy;
pub use processor::{FilterRun, Processor, RunConfig};
