//! Password policy module
//!
//! Decides whether a single candidate satisfies a [`PasswordPolicy`]. Pure
//! functions only; no I/O happens here.

use crate::error::{Error, Result};
use std::fmt;

/// Default exact length when none is given
pub const DEFAULT_LENGTH: usize = 8;

/// Filtering rules applied to every candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    exact_length: usize,
    allow_special: bool,
    allow_numeric: bool,
    min_uppercase: Option<usize>,
}

/// Why a candidate was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Character count differs from the required length
    Length,
    /// Contains something outside `[A-Za-z0-9]` while specials are disallowed
    Special,
    /// Contains a digit while numbers are disallowed
    Numeric,
    /// Too few uppercase letters
    Uppercase,
}

impl Rejection {
    pub const ALL: [Rejection; 4] = [
        Rejection::Length,
        Rejection::Special,
        Rejection::Numeric,
        Rejection::Uppercase,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Length => 0,
            Self::Special => 1,
            Self::Numeric => 2,
            Self::Uppercase => 3,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Length => "wrong length",
            Self::Special => "special character",
            Self::Numeric => "contains digit",
            Self::Uppercase => "too few uppercase",
        };
        f.write_str(label)
    }
}

/// Outcome of evaluating one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl PasswordPolicy {
    /// Build a policy, validating the numeric settings.
    ///
    /// A `min_uppercase` of `Some(0)` is the same as no uppercase check and is
    /// stored as `None`.
    pub fn new(
        exact_length: usize,
        allow_special: bool,
        allow_numeric: bool,
        min_uppercase: Option<usize>,
    ) -> Result<Self> {
        if exact_length == 0 {
            return Err(Error::config("password length must be greater than 0"));
        }

        Ok(Self {
            exact_length,
            allow_special,
            allow_numeric,
            min_uppercase: min_uppercase.filter(|&n| n > 0),
        })
    }

    pub fn exact_length(&self) -> usize {
        self.exact_length
    }

    pub fn allow_special(&self) -> bool {
        self.allow_special
    }

    pub fn allow_numeric(&self) -> bool {
        self.allow_numeric
    }

    pub fn min_uppercase(&self) -> Option<usize> {
        self.min_uppercase
    }

    /// Check if a candidate passes every rule
    #[inline]
    pub fn accepts(&self, candidate: &str) -> bool {
        self.evaluate(candidate) == Verdict::Accept
    }

    /// Run the checks in order and report the first one that fails.
    ///
    /// Leading and trailing whitespace is trimmed before measuring, so only
    /// interior whitespace can trip the special-character rule.
    pub fn evaluate(&self, candidate: &str) -> Verdict {
        let candidate = trim_candidate(candidate);

        // Fast byte-length check for ASCII, char count otherwise
        let length = if candidate.is_ascii() {
            candidate.len()
        } else {
            candidate.chars().count()
        };
        if length != self.exact_length {
            return Verdict::Reject(Rejection::Length);
        }

        if !self.allow_special && has_specials(candidate) {
            return Verdict::Reject(Rejection::Special);
        }

        if !self.allow_numeric && has_numbers(candidate) {
            return Verdict::Reject(Rejection::Numeric);
        }

        if let Some(min) = self.min_uppercase {
            if count_uppercase(candidate) < min {
                return Verdict::Reject(Rejection::Uppercase);
            }
        }

        Verdict::Accept
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            exact_length: DEFAULT_LENGTH,
            allow_special: false,
            allow_numeric: false,
            min_uppercase: None,
        }
    }
}

/// Strip leading and trailing whitespace, counting the ASCII separators
/// `\x1c`..=`\x1f` as whitespace too
#[inline]
pub fn trim_candidate(candidate: &str) -> &str {
    candidate.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

/// Anything that is not an ASCII letter or digit, including spaces and non-ASCII
#[inline]
pub fn has_specials(candidate: &str) -> bool {
    candidate.chars().any(|c| !c.is_ascii_alphanumeric())
}

#[inline]
pub fn has_numbers(candidate: &str) -> bool {
    candidate.bytes().any(|b| b.is_ascii_digit())
}

/// Number of `A-Z` letters
#[inline]
pub fn count_uppercase(candidate: &str) -> usize {
    candidate.bytes().filter(u8::is_ascii_uppercase).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(len: usize, special: bool, numeric: bool, upper: Option<usize>) -> PasswordPolicy {
        PasswordPolicy::new(len, special, numeric, upper).unwrap()
    }

    #[test]
    fn test_length_must_match_exactly() {
        let p = policy(8, true, true, None);

        assert!(p.accepts("password"));
        assert!(!p.accepts("pass"));
        assert!(!p.accepts("password1"));
        assert_eq!(p.evaluate("short"), Verdict::Reject(Rejection::Length));
    }

    #[test]
    fn test_unicode_length_counts_chars() {
        let p = policy(5, true, true, None);

        assert!(p.accepts("hëllo"));
        assert!(p.accepts("hello"));
    }

    #[test]
    fn test_specials_rejected_by_default() {
        let p = policy(8, false, true, None);

        assert_eq!(p.evaluate("pass!ord"), Verdict::Reject(Rejection::Special));
        assert_eq!(p.evaluate("pass wrd"), Verdict::Reject(Rejection::Special));
        assert_eq!(p.evaluate("passwörd"), Verdict::Reject(Rejection::Special));
        assert!(p.accepts("passw0rd"));
    }

    #[test]
    fn test_specials_allowed() {
        let p = policy(8, true, false, None);

        assert!(p.accepts("pass!ord"));
        assert!(p.accepts("pass wrd"));
    }

    #[test]
    fn test_digits_rejected_when_numbers_disallowed() {
        let p = policy(8, false, false, None);

        assert_eq!(p.evaluate("Passw0rd"), Verdict::Reject(Rejection::Numeric));
        assert_eq!(p.evaluate("12345678"), Verdict::Reject(Rejection::Numeric));
    }

    #[test]
    fn test_uppercase_minimum() {
        let p = policy(8, false, true, Some(2));

        assert_eq!(p.evaluate("Passw0rd"), Verdict::Reject(Rejection::Uppercase));
        assert!(p.accepts("PAssw0rd"));
        assert!(p.accepts("PASSW0RD"));
    }

    #[test]
    fn test_zero_uppercase_means_no_check() {
        let p = policy(8, false, false, Some(0));

        assert_eq!(p.min_uppercase(), None);
        assert!(p.accepts("password"));
    }

    #[test]
    fn test_zero_length_is_configuration_error() {
        let err = PasswordPolicy::new(0, false, false, None).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_outer_whitespace_is_trimmed() {
        let p = policy(8, false, false, None);

        assert!(p.accepts("  Password\t"));
        assert!(p.accepts("Password\r\n"));
        assert!(!p.accepts("Pass word"));
    }

    #[test]
    fn test_separator_controls_are_trimmed() {
        let p = policy(8, false, false, None);

        assert!(p.accepts("Password\u{1f}"));
        assert!(p.accepts("\u{1c}Password"));
        assert!(p.accepts("\u{1d}\u{1e} Password\u{85}"));
        assert_eq!(trim_candidate("\u{1f}ab cd\u{1c}"), "ab cd");
        // Interior separators still count as special
        assert_eq!(p.evaluate("Pass\u{1f}ord"), Verdict::Reject(Rejection::Special));
    }

    #[test]
    fn test_check_order() {
        let p = policy(8, false, false, Some(3));

        // Length wins over everything else
        assert_eq!(p.evaluate("a1!"), Verdict::Reject(Rejection::Length));
        // Special before numeric
        assert_eq!(p.evaluate("pass!0rd"), Verdict::Reject(Rejection::Special));
        // Numeric before uppercase
        assert_eq!(p.evaluate("passw0rd"), Verdict::Reject(Rejection::Numeric));
    }

    #[test]
    fn test_default_policy() {
        let p = PasswordPolicy::default();

        assert_eq!(p.exact_length(), DEFAULT_LENGTH);
        assert!(!p.allow_special());
        assert!(!p.allow_numeric());
        assert_eq!(p.min_uppercase(), None);
    }

    #[test]
    fn test_helpers() {
        assert!(has_specials("abc-def"));
        assert!(!has_specials("abcDEF123"));
        assert!(has_numbers("abc1"));
        assert!(!has_numbers("abc"));
        assert_eq!(count_uppercase("AbCdÄ"), 2);
    }
}
