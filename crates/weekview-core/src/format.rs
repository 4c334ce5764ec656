//! Time-of-day formatting from user preference patterns.
//!
//! Mailbox settings store the preferred time format as a .NET style pattern
//! such as `HH:mm` or `h:mm tt`. [`TimeFormat`] converts it once into a
//! chrono format string.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Pattern used when the user has no preference.
pub const DEFAULT_TIME_FORMAT: &str = "HH:mm";

/// A time-of-day format derived from a user preference pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFormat {
    pattern: String,
    chrono_format: String,
}

impl TimeFormat {
    /// Parses a .NET style pattern.
    ///
    /// Unknown characters are copied literally, so a garbled preference
    /// still renders something readable instead of failing.
    pub fn from_pattern(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            chrono_format: to_chrono_format(pattern),
        }
    }

    /// The preference pattern as given.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The equivalent chrono format string.
    pub fn chrono_format(&self) -> &str {
        &self.chrono_format
    }

    /// Formats the time-of-day portion of `dt`.
    pub fn format(&self, dt: &NaiveDateTime) -> String {
        dt.format(&self.chrono_format).to_string()
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self::from_pattern(DEFAULT_TIME_FORMAT)
    }
}

fn to_chrono_format(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();

        let directive = match (c, run) {
            ('H', 1) => Some("%-H"),
            ('H', _) => Some("%H"),
            ('h', 1) => Some("%-I"),
            ('h', _) => Some("%I"),
            ('m', 1) => Some("%-M"),
            ('m', _) => Some("%M"),
            ('s', 1) => Some("%-S"),
            ('s', _) => Some("%S"),
            ('t', _) => Some("%p"),
            _ => None,
        };

        match directive {
            Some(directive) => out.push_str(directive),
            None if c == '%' => (0..run).for_each(|_| out.push_str("%%")),
            None => (0..run).for_each(|_| out.push(c)),
        }

        i += run;
    }

    out
}
