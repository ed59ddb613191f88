//! Optional diagnostic payload attached to an error instance.
//!
//! `Extras` is a plain value bundle. Each `with_*` builder borrows the
//! receiver and returns a new bundle, so a sentinel error's extras can be
//! specialized per failure without touching the sentinel.
//!
//! ```rust
//! use canonical_errors::Extras;
//! use std::time::Duration;
//!
//! let base = Extras::new().with_tags(["db"]);
//! let specialized = base
//!     .with_delay(Duration::from_millis(250))
//!     .with_links(["https://docs.example.com/errors/db"]);
//!
//! assert!(base.links().is_empty());
//! assert_eq!(specialized.tags(), ["db"]);
//! ```

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Common additional info attached to errors.
///
/// Links and tags only ever grow; there is no removal operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extras {
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            skip_serializing_if = "Duration::is_zero",
            with = "delay_nanos"
        )
    )]
    delay: Duration,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    links: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    stack_trace: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    tags: Vec<String>,
}

impl Extras {
    /// Empty bundle; usable in `const` sentinels.
    #[inline]
    pub const fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            links: Vec::new(),
            stack_trace: String::new(),
            tags: Vec::new(),
        }
    }

    /// Duration to wait before retrying the failed operation.
    #[inline]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Links to documentation about the error.
    #[inline]
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Captured stack trace text.
    #[inline]
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }

    /// Labels used to categorize errors.
    #[inline]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// True when every field is at its zero value.
    pub fn is_empty(&self) -> bool {
        self.delay.is_zero()
            && self.links.is_empty()
            && self.stack_trace.is_empty()
            && self.tags.is_empty()
    }

    /// New bundle with the retry delay replaced.
    pub fn with_delay(&self, delay: Duration) -> Self {
        Self {
            delay,
            ..self.clone()
        }
    }

    /// New bundle with the stack trace replaced.
    pub fn with_stack_trace(&self, trace: impl Into<String>) -> Self {
        Self {
            stack_trace: trace.into(),
            ..self.clone()
        }
    }

    /// New bundle with `links` appended after the existing ones.
    pub fn with_links<I, S>(&self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.links.extend(links.into_iter().map(Into::into));
        next
    }

    /// New bundle with `tags` appended after the existing ones.
    pub fn with_tags<I, S>(&self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.tags.extend(tags.into_iter().map(Into::into));
        next
    }
}

/// Delay is encoded as integer nanoseconds on the wire.
#[cfg(feature = "serde")]
mod delay_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
