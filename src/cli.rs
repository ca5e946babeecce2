//! Command-line interface definition for fipp
//!
//! Provides argument parsing for the password filtering tool.

use crate::processor::DEFAULT_OUTPUT;
use clap::Parser;
use std::path::PathBuf;

/// Flexible Interactive Password Processor
///
/// Filter password lists by exact length, allowed character classes and a
/// minimum number of uppercase letters.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fipp",
    author = "CloudyKhan",
    version,
    about = "Flexible Interactive Password Processor",
    arg_required_else_help = true,
    long_about = r#"
  ___  ___  ___  ___
 | __||_ _|| _ \| _ \
 | _|  | | |  _/|  _/
 |_|  |___||_|  |_|

Flexible Interactive Password Processor

Reads a password list, one candidate per line, and writes the candidates that
match the policy to the output file.

By default passwords with special characters, spaces or numbers are excluded.
Use -s and -n to allow them. Leading and trailing whitespace on each line is
ignored; whitespace inside a candidate counts as a special character.

EXAMPLES:
    # Exact length 8, letters only
    fipp -i rockyou.txt

    # Length 10, specials and digits allowed, at least 2 uppercase letters
    fipp -l 10 -s -n -c 2 -i /path/to/input.txt -o /path/to/output.txt -e UTF-8

    # Guided session
    fipp -I
"#,
    after_help = "If you're not sure about the encoding, proceed with the default (ISO-8859-1)."
)]
pub struct Args {
    /// Exact password length
    #[arg(short, long, value_name = "LENGTH", default_value_t = crate::policy::DEFAULT_LENGTH)]
    pub length: usize,

    /// Allow passwords with special characters (spaces count as special)
    #[arg(short, long, default_value_t = false)]
    pub special: bool,

    /// Allow passwords with numbers
    #[arg(short, long, default_value_t = false)]
    pub number: bool,

    /// Minimum number of uppercase letters (no uppercase check if omitted)
    #[arg(short, long, value_name = "CAPSLOCK")]
    pub capslock: Option<usize>,

    /// Input password file
    #[arg(short, long, value_name = "PATH", required_unless_present = "interactive")]
    pub input: Option<PathBuf>,

    /// Output file for filtered passwords (parent directories are created)
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// File encoding: ISO-8859-1, WINDOWS-1252, UTF-8 or UTF-16
    #[arg(short, long, value_name = "ENCODING", env = "FIPP_ENCODING", default_value = "ISO-8859-1")]
    pub encoding: String,

    /// Activate interactive mode
    #[arg(short = 'I', long, default_value_t = false)]
    pub interactive: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode - detailed logging and statistics
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Log level implied by the quiet/verbose flags
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}
