//! Status code patterns: exact codes (`"429"`) or classes (`"5XX"`)

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A status code pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPattern {
    /// Matches one code
    Exact(u16),
    /// Matches every code in `class * 100 ..= class * 100 + 99`
    Class(u16),
}

impl StatusPattern {
    /// Whether `status` is covered by this pattern
    pub fn matches(&self, status: u16) -> bool {
        match *self {
            StatusPattern::Exact(code) => status == code,
            StatusPattern::Class(class) => status / 100 == class,
        }
    }
}

impl FromStr for StatusPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let invalid = || Error::invalid_input(format!("invalid status code pattern: '{}'", s));

        if bytes.len() != 3 || !(b'1'..=b'5').contains(&bytes[0]) {
            return Err(invalid());
        }

        let lead = u16::from(bytes[0] - b'0');
        if bytes[1..].eq_ignore_ascii_case(b"xx") {
            return Ok(StatusPattern::Class(lead));
        }

        if bytes[1..].iter().all(u8::is_ascii_digit) {
            return s.parse::<u16>().map(StatusPattern::Exact).map_err(|_| invalid());
        }

        Err(invalid())
    }
}

impl fmt::Display for StatusPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusPattern::Exact(code) => write!(f, "{}", code),
            StatusPattern::Class(class) => write!(f, "{}XX", class),
        }
    }
}
