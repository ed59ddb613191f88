//! Classification bitmask carried by every canonical error.
//!
//! Flags are cross-cutting labels: they describe *how* a failure should be
//! treated (retry it, report it as a timeout, treat it as foreign) without
//! changing *what* the failure is. Acting on them is the caller's job.
//!
//! # Bits
//!
//! | Bit | Name        | Meaning                                        |
//! |-----|-------------|------------------------------------------------|
//! | 0   | `UNKNOWN`   | Foreign error passed through without a kind    |
//! | 1   | `RETRYABLE` | The failed operation may be safely retried     |
//! | 2   | `TIMEOUT`   | The failure was caused by a deadline/timeout   |
//! | 3-7 | reserved    | Available for extension                        |
//!
//! # Example
//!
//! ```rust
//! use canonical_errors::Flags;
//!
//! let flags = Flags::empty().set(Flags::RETRYABLE | Flags::TIMEOUT);
//! assert!(flags.has(Flags::RETRYABLE));
//! assert!(!flags.clear(Flags::TIMEOUT).has(Flags::TIMEOUT));
//! assert_eq!(flags.to_string(), "110");
//! ```

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// An 8-bit mask of error classification bits.
///
/// Every operation returns a new value; a `Flags` is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Flags(u8);

impl Flags {
    /// Set on errors that were not produced by a known taxonomy.
    pub const UNKNOWN: Flags = Flags(1 << 0);
    /// Set on errors whose operation can be retried.
    pub const RETRYABLE: Flags = Flags(1 << 1);
    /// Set on errors indicating a timeout occurred.
    pub const TIMEOUT: Flags = Flags(1 << 2);

    /// No bits set.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a mask from raw bits, reserved bits included.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw mask value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if no bits are set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if any of `bits` overlap this mask.
    #[inline]
    pub const fn has(self, bits: Flags) -> bool {
        self.0 & bits.0 != 0
    }

    /// Set `bits` and return the new mask.
    #[inline]
    pub const fn set(self, bits: Flags) -> Self {
        Self(self.0 | bits.0)
    }

    /// Clear `bits` and return the new mask.
    #[inline]
    pub const fn clear(self, bits: Flags) -> Self {
        Self(self.0 & !bits.0)
    }

    /// Flip `bits` and return the new mask.
    #[inline]
    pub const fn toggle(self, bits: Flags) -> Self {
        Self(self.0 ^ bits.0)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    #[inline]
    fn bitor(self, rhs: Flags) -> Flags {
        self.set(rhs)
    }
}

impl fmt::Display for Flags {
    /// Base-2 rendering without padding or radix prefix, e.g. `101`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:b}", self.0)
    }
}

/// Error returned when parsing a base-2 flags string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagsParseError {
    /// Input was empty.
    Empty,
    /// Input contained something other than `0` or `1`.
    InvalidDigit {
        /// The offending character.
        found: char,
    },
    /// Input needs more than eight bits.
    Overflow {
        /// Number of significant bits in the input.
        len: usize,
    },
}

impl fmt::Display for FlagsParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "flags string is empty"),
            Self::InvalidDigit { found } => {
                write!(f, "invalid flags digit {:?} (expected 0 or 1)", found)
            }
            Self::Overflow { len } => {
                write!(f, "flags string has {} significant bits (max 8)", len)
            }
        }
    }
}

impl std::error::Error for FlagsParseError {}

impl FromStr for Flags {
    type Err = FlagsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FlagsParseError::Empty);
        }
        if let Some(found) = s.chars().find(|c| !matches!(c, '0' | '1')) {
            return Err(FlagsParseError::InvalidDigit { found });
        }

        let significant = s.trim_start_matches('0');
        if significant.len() > 8 {
            return Err(FlagsParseError::Overflow {
                len: significant.len(),
            });
        }

        let bits = significant
            .bytes()
            .fold(0u8, |acc, b| (acc << 1) | (b - b'0'));
        Ok(Self(bits))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Flags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Flags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
