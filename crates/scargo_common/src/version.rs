//! Compiler version parsing and comparison.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A three-part version identifier with an optional modifier suffix.
///
/// Parsed from strings of the shape `major(.minor(.bugfix)?)?(modifier)?`,
/// e.g. `"2.13.5"`, `"2.8"`, `"2.10.0-RC1"`. Components absent from the
/// parsed string are *unset*: an unset component on the receiver acts as a
/// wildcard during comparison, so `compare` is reflexive but not symmetric
/// across an unset/set pair (`"2"` equals `"2.13.5"`, while `"2.13.5"` is
/// greater than `"2"`). The modifier does not participate in ordering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionNumber {
    /// Major version component.
    pub major: u32,
    /// Minor version component (0 when unset).
    pub minor: u32,
    /// Bugfix version component (0 when unset).
    pub bugfix: u32,
    /// Trailing modifier, e.g. `"-RC1"`.
    pub modifier: Option<String>,
    has_minor: bool,
    has_bugfix: bool,
}

/// Error returned when a version string cannot be parsed.
///
/// Call sites treat this as a fatal configuration error.
#[derive(Debug, thiserror::Error)]
#[error("unparseable version string '{input}'")]
pub struct VersionParseError {
    /// The offending input.
    pub input: String,
}

impl VersionNumber {
    /// Creates a fully-set version with no modifier.
    pub fn new(major: u32, minor: u32, bugfix: u32) -> Self {
        Self {
            major,
            minor,
            bugfix,
            modifier: None,
            has_minor: true,
            has_bugfix: true,
        }
    }

    /// The `0.0.0` sentinel meaning "version unknown or undetectable".
    ///
    /// Callers must special-case it rather than letting it compare as
    /// "older than everything".
    pub fn unknown() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns `true` for the `0.0.0` unknown-version sentinel.
    pub fn is_zero(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.bugfix == 0
    }

    /// Parses a version string of the shape `major(.minor(.bugfix)?)?(modifier)?`.
    pub fn parse(input: &str) -> Result<Self, VersionParseError> {
        let err = || VersionParseError {
            input: input.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(err());
        }

        // The numeric prefix ends at the first character that is neither a
        // digit nor a separating dot followed by a digit.
        let bytes = trimmed.as_bytes();
        let mut end = 0;
        while end < bytes.len() {
            let c = bytes[end];
            if c.is_ascii_digit() {
                end += 1;
            } else if c == b'.' && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
                end += 1;
            } else {
                break;
            }
        }
        if end == 0 {
            return Err(err());
        }

        let numeric = &trimmed[..end];
        let modifier = if end < trimmed.len() {
            Some(trimmed[end..].to_string())
        } else {
            None
        };

        let mut parts = numeric.split('.');
        let major = parts.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        let minor_part = parts.next();
        let bugfix_part = parts.next();
        if parts.next().is_some() {
            return Err(err());
        }

        let minor = match minor_part {
            Some(p) => p.parse().map_err(|_| err())?,
            None => 0,
        };
        let bugfix = match bugfix_part {
            Some(p) => p.parse().map_err(|_| err())?,
            None => 0,
        };

        Ok(Self {
            major,
            minor,
            bugfix,
            modifier,
            has_minor: minor_part.is_some(),
            has_bugfix: bugfix_part.is_some(),
        })
    }

    /// Compares against another version, treating unset components on the
    /// receiver as wildcards.
    pub fn compare(&self, other: &VersionNumber) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => {}
            ord => return ord,
        }
        if !self.has_minor {
            return Ordering::Equal;
        }
        match self.minor.cmp(&other.minor) {
            Ordering::Equal => {}
            ord => return ord,
        }
        if !self.has_bugfix {
            return Ordering::Equal;
        }
        self.bugfix.cmp(&other.bugfix)
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if self.has_minor {
            write!(f, ".{}", self.minor)?;
        }
        if self.has_bugfix {
            write!(f, ".{}", self.bugfix)?;
        }
        if let Some(ref m) = self.modifier {
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full() {
        let v = VersionNumber::parse("2.13.5").unwrap();
        assert_eq!((v.major, v.minor, v.bugfix), (2, 13, 5));
        assert!(v.modifier.is_none());
    }

    #[test]
    fn parse_two_part() {
        let v = VersionNumber::parse("2.8").unwrap();
        assert_eq!((v.major, v.minor), (2, 8));
        assert_eq!(v.bugfix, 0);
    }

    #[test]
    fn parse_major_only() {
        let v = VersionNumber::parse("2").unwrap();
        assert_eq!(v.major, 2);
    }

    #[test]
    fn parse_with_modifier() {
        let v = VersionNumber::parse("2.10.0-RC1").unwrap();
        assert_eq!((v.major, v.minor, v.bugfix), (2, 10, 0));
        assert_eq!(v.modifier.as_deref(), Some("-RC1"));
    }

    #[test]
    fn parse_garbage_fails() {
        assert!(VersionNumber::parse("").is_err());
        assert!(VersionNumber::parse("abc").is_err());
        assert!(VersionNumber::parse("-RC1").is_err());
    }

    #[test]
    fn compare_greater() {
        let a = VersionNumber::parse("2.10.0").unwrap();
        let b = VersionNumber::parse("2.9.3").unwrap();
        assert_eq!(a.compare(&b), Ordering::Greater);
    }

    #[test]
    fn compare_masked_bugfix_equal() {
        let a = VersionNumber::parse("2.8").unwrap();
        let b = VersionNumber::parse("2.8.0").unwrap();
        assert_eq!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn compare_masked_wildcard() {
        let masked = VersionNumber::parse("2").unwrap();
        let full = VersionNumber::parse("2.13.5").unwrap();
        assert_eq!(masked.compare(&full), Ordering::Equal);
    }

    #[test]
    fn compare_unmasked_not_wildcard() {
        let a = VersionNumber::parse("2.0.0").unwrap();
        let b = VersionNumber::parse("2.13.5").unwrap();
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn compare_not_symmetric_across_mask() {
        let masked = VersionNumber::parse("2").unwrap();
        let full = VersionNumber::parse("2.13.5").unwrap();
        assert_eq!(masked.compare(&full), Ordering::Equal);
        assert_eq!(full.compare(&masked), Ordering::Greater);
    }

    #[test]
    fn compare_reflexive() {
        let v = VersionNumber::parse("2.11.8").unwrap();
        assert_eq!(v.compare(&v), Ordering::Equal);
    }

    #[test]
    fn modifier_ignored_in_ordering() {
        let a = VersionNumber::parse("2.10.0-RC1").unwrap();
        let b = VersionNumber::parse("2.10.0").unwrap();
        assert_eq!(a.compare(&b), Ordering::Equal);
    }

    #[test]
    fn zero_sentinel() {
        assert!(VersionNumber::unknown().is_zero());
        assert!(VersionNumber::parse("0.0.0").unwrap().is_zero());
        assert!(!VersionNumber::parse("2.13.5").unwrap().is_zero());
    }

    #[test]
    fn display_roundtrip() {
        for s in ["2.13.5", "2.8", "2", "2.10.0-RC1"] {
            assert_eq!(VersionNumber::parse(s).unwrap().to_string(), s);
        }
    }
}
