//! Guided interactive session
//!
//! Asks for each setting in turn, re-prompting until the answer is valid, and
//! produces a [`RunConfig`] ready for the processor. Works over any
//! `BufRead`/`Write` pair so it can be driven from tests.

use crate::encoding::{sniff_encoding, TextEncoding};
use crate::error::{Error, Result};
use crate::policy::{PasswordPolicy, DEFAULT_LENGTH};
use crate::processor::{RunConfig, DEFAULT_OUTPUT};
use colored::*;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

enum Stop {
    /// Input closed (Ctrl-D)
    Eof,
    Fail(Error),
}

impl From<std::io::Error> for Stop {
    fn from(e: std::io::Error) -> Self {
        Stop::Fail(Error::Unexpected(e))
    }
}

impl From<Error> for Stop {
    fn from(e: Error) -> Self {
        Stop::Fail(e)
    }
}

type Step<T> = std::result::Result<T, Stop>;

pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the prompts. `Ok(None)` means the user closed the input.
    pub fn run(&mut self) -> Result<Option<RunConfig>> {
        match self.collect() {
            Ok(config) => Ok(Some(config)),
            Err(Stop::Eof) => Ok(None),
            Err(Stop::Fail(e)) => Err(e),
        }
    }

    fn collect(&mut self) -> Step<RunConfig> {
        let length = self.ask_length()?;
        let allow_special =
            self.ask_yes_no("> Should the password allow special characters? (y/n, default: n): ")?;
        let allow_numeric = self.ask_yes_no("> Should the password allow numbers? (y/n, default: n): ")?;
        let min_uppercase = self.ask_uppercase()?;
        let input = self.ask_input_path()?;
        let encoding = self.ask_encoding()?;
        let output = self.ask_output_path()?;

        let policy = PasswordPolicy::new(length, allow_special, allow_numeric, min_uppercase)?;
        Ok(RunConfig {
            policy,
            input,
            output,
            encoding,
        })
    }

    fn ask(&mut self, prompt: &str) -> Step<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(Stop::Eof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn complain(&mut self, msg: &str) -> Step<()> {
        writeln!(self.output, "{}", msg.yellow())?;
        Ok(())
    }

    fn ask_positive(&mut self, prompt: &str, default: Option<usize>) -> Step<usize> {
        loop {
            let answer = self.ask(prompt)?;
            let answer = answer.trim();

            if answer.is_empty() {
                if let Some(default) = default {
                    return Ok(default);
                }
            } else if let Ok(n) = answer.parse::<usize>() {
                if n > 0 {
                    return Ok(n);
                }
            }
            self.complain("Please enter a valid number.")?;
        }
    }

    fn ask_length(&mut self) -> Step<usize> {
        self.ask_positive(
            &format!("> Enter the exact password length (default: {}): ", DEFAULT_LENGTH),
            Some(DEFAULT_LENGTH),
        )
    }

    fn ask_yes_no(&mut self, prompt: &str) -> Step<bool> {
        loop {
            match self.ask(prompt)?.trim().to_lowercase().as_str() {
                "" | "n" => return Ok(false),
                "y" => return Ok(true),
                _ => self.complain("Please enter 'y' or 'n'.")?,
            }
        }
    }

    fn ask_uppercase(&mut self) -> Step<Option<usize>> {
        let required =
            self.ask_yes_no("> Does the password policy require uppercase letters? (y/n, default: n): ")?;
        if !required {
            return Ok(None);
        }

        let count = self.ask_positive(
            "> How many uppercase letters should the password contain (at least)?: ",
            None,
        )?;
        Ok(Some(count))
    }

    fn ask_input_path(&mut self) -> Step<PathBuf> {
        loop {
            let answer = self.ask("> Enter the path to the input password file: ")?;
            let answer = answer.trim();

            if answer.is_empty() {
                self.complain("Error: You must provide an input password file.")?;
            } else if Path::new(answer).is_file() {
                let path = PathBuf::from(answer);
                self.hint_encoding(&path)?;
                return Ok(path);
            } else {
                self.complain("File not found. Please provide a valid file path.")?;
            }
        }
    }

    fn hint_encoding(&mut self, path: &Path) -> Step<()> {
        match sniff_encoding(path) {
            Ok(Some(guess)) => {
                writeln!(self.output, "{}", format!("Input looks like {}.", guess).cyan())?;
            }
            Ok(None) => {}
            Err(e) => log::debug!("Encoding sniff failed: {}", e),
        }
        Ok(())
    }

    fn ask_encoding(&mut self) -> Step<TextEncoding> {
        let names: Vec<String> = TextEncoding::ALL
            .iter()
            .map(|&e| {
                if e == TextEncoding::default() {
                    format!("{} (default)", e)
                } else {
                    e.to_string()
                }
            })
            .collect();
        writeln!(self.output, "\nAvailable encodings: {}", names.join(", "))?;
        let answer = self.ask("> Enter file encoding (press Enter for default ISO-8859-1): ")?;

        if answer.trim().is_empty() {
            return Ok(TextEncoding::default());
        }
        match answer.parse::<TextEncoding>() {
            Ok(encoding) => Ok(encoding),
            Err(_) => {
                self.complain("Unsupported encoding, defaulting to ISO-8859-1.")?;
                Ok(TextEncoding::default())
            }
        }
    }

    fn ask_output_path(&mut self) -> Step<PathBuf> {
        let answer = self.ask(&format!(
            "> Enter the path for the filtered output file (default: {}): ",
            DEFAULT_OUTPUT
        ))?;
        let answer = answer.trim();

        if answer.is_empty() {
            Ok(PathBuf::from(DEFAULT_OUTPUT))
        } else {
            Ok(PathBuf::from(answer))
        }
    }
}
