//! Structured log view of a canonical error.
//!
//! The crate ships no logging backend. Sinks receive a [`LogRecord`]: a
//! borrowed, field-by-field view of one error that can be written as a
//! single structured line or read field by field by a JSON/structured
//! logger.
//!
//! # Properties
//!
//! - Borrows from the error and cannot outlive it
//! - No allocation in accessors
//! - `write_to` bounds every free-text field, so one oversized message or
//!   stack trace cannot flood a sink
//! - Rendered fields (joined lists, the cause chain) stop rendering once
//!   the bound is reached
//!
//! ```rust
//! use canonical_errors::{Canonical, Flags};
//!
//! const STALE: Canonical = Canonical::new_flagged("cache", "stale", "entry expired", Flags::RETRYABLE);
//!
//! let err = STALE.wrap("ttl elapsed").with_tags(["hot-path"]);
//! let line = err.with_log_record(|record| {
//!     let mut line = String::new();
//!     record.write_to(&mut line).map(|_| line)
//! });
//!
//! assert_eq!(
//!     line.unwrap(),
//!     "[cache/stale] flags=10 message='entry expired' tags='hot-path' cause='ttl elapsed'"
//! );
//! ```

use std::fmt::{self, Write as _};

use crate::{Canonical, Cause, Extras, Flags};

/// Maximum length for any individual field in formatted output.
pub const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Appended to fields cut at [`MAX_FIELD_OUTPUT_LEN`].
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Borrowed structured view of a [`Canonical`] for log sinks.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    error: &'a Canonical,
}

impl<'a> LogRecord<'a> {
    #[inline]
    pub(crate) fn new(error: &'a Canonical) -> Self {
        Self { error }
    }

    /// `"<namespace>/<code>"`.
    #[inline]
    pub fn key(&self) -> String {
        self.error.key()
    }

    /// Namespace of the error.
    #[inline]
    pub fn namespace(&self) -> &'a str {
        self.error.namespace().as_str()
    }

    /// Code of the error.
    #[inline]
    pub fn code(&self) -> &'a str {
        self.error.code().as_str()
    }

    /// Message of the error.
    #[inline]
    pub fn message(&self) -> &'a str {
        self.error.message()
    }

    /// Classification bits.
    #[inline]
    pub fn flags(&self) -> Flags {
        self.error.flags()
    }

    /// Diagnostic payload.
    #[inline]
    pub fn extras(&self) -> &'a Extras {
        self.error.extras()
    }

    /// Wrapped cause, if any.
    #[inline]
    pub fn cause(&self) -> Option<&'a Cause> {
        self.error.cause()
    }

    /// Write one structured line.
    ///
    /// Format: `[<key>] flags=<bits> message='..'` followed, when present, by
    /// `delay_ms=`, `links=`, `tags=`, `stack_trace=` and `cause=`. The cause
    /// is rendered in its single-line form; multi-line causes keep their
    /// newlines.
    ///
    /// Borrowed fields are written in place. Links, tags and the cause are
    /// rendered into a buffer of at most [`MAX_FIELD_OUTPUT_LEN`] bytes, so a
    /// deep cause chain is never rendered past the bound.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_char('[')?;
        write_bounded(f, self.namespace(), false)?;
        f.write_char('/')?;
        write_bounded(f, self.code(), false)?;
        write!(f, "] flags={} message='", self.flags())?;
        write_bounded(f, self.message(), false)?;
        f.write_char('\'')?;

        let extras = self.extras();
        if !extras.delay().is_zero() {
            write!(f, " delay_ms={}", extras.delay().as_millis())?;
        }
        if !extras.links().is_empty() {
            write!(f, " links='{}'", BoundedField::joined(extras.links()))?;
        }
        if !extras.tags().is_empty() {
            write!(f, " tags='{}'", BoundedField::joined(extras.tags()))?;
        }
        if !extras.stack_trace().is_empty() {
            f.write_str(" stack_trace='")?;
            write_bounded(f, extras.stack_trace(), false)?;
            f.write_char('\'')?;
        }
        if let Some(cause) = self.cause() {
            write!(f, " cause='{}'", BoundedField::render(cause)?)?;
        }

        Ok(())
    }
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

// ============================================================================
// Field Bounds
// ============================================================================

/// Write `s`, cut on a char boundary and marked when it exceeds
/// [`MAX_FIELD_OUTPUT_LEN`] or is already known to be `partial`.
fn write_bounded(f: &mut impl fmt::Write, s: &str, partial: bool) -> fmt::Result {
    if !partial && s.len() <= MAX_FIELD_OUTPUT_LEN {
        return f.write_str(s);
    }
    let keep = char_floor(s, MAX_FIELD_OUTPUT_LEN - TRUNCATION_INDICATOR.len());
    f.write_str(&s[..keep])?;
    f.write_str(TRUNCATION_INDICATOR)
}

/// Largest char boundary in `s` not past `idx`.
fn char_floor(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    (0..=idx).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Rendered field text, capped at [`MAX_FIELD_OUTPUT_LEN`] bytes.
///
/// As a `fmt::Write` sink it refuses further writes once full, which stops
/// the `Display` impl feeding it.
#[derive(Debug, Default)]
struct BoundedField {
    text: String,
    partial: bool,
}

impl BoundedField {
    fn render(value: impl fmt::Display) -> Result<Self, fmt::Error> {
        let mut field = Self::default();
        match write!(field, "{}", value) {
            Err(err) if !field.partial => Err(err),
            _ => Ok(field),
        }
    }

    fn joined(items: &[String]) -> Self {
        let mut field = Self::default();
        for (i, item) in items.iter().enumerate() {
            if (i > 0 && field.write_char(',').is_err()) || field.write_str(item).is_err() {
                break;
            }
        }
        field
    }
}

impl fmt::Write for BoundedField {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.partial {
            return Err(fmt::Error);
        }
        let room = MAX_FIELD_OUTPUT_LEN - self.text.len();
        if s.len() <= room {
            self.text.push_str(s);
            return Ok(());
        }
        self.text.push_str(&s[..char_floor(s, room)]);
        self.partial = true;
        Err(fmt::Error)
    }
}

impl fmt::Display for BoundedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bounded(f, &self.text, self.partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SLOW: Canonical = Canonical::new_flagged("db", "slow", "query slow", Flags::TIMEOUT);

    fn line(err: &Canonical) -> String {
        let mut out = String::new();
        err.log_record().write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn minimal_record() {
        assert_eq!(line(&SLOW), "[db/slow] flags=100 message='query slow'");
    }

    #[test]
    fn record_includes_present_extras() {
        let err = SLOW.with_extras(
            Extras::new()
                .with_delay(Duration::from_millis(1500))
                .with_links(["https://a", "https://b"])
                .with_stack_trace("main:1"),
        );

        assert_eq!(
            line(&err),
            "[db/slow] flags=100 message='query slow' delay_ms=1500 \
             links='https://a,https://b' stack_trace='main:1'"
        );
    }

    #[test]
    fn accessors_borrow_fields() {
        let err = SLOW.wrap("lock wait");
        let record = err.log_record();

        assert_eq!(record.key(), "db/slow");
        assert_eq!(record.namespace(), "db");
        assert_eq!(record.code(), "slow");
        assert_eq!(record.message(), "query slow");
        assert!(record.flags().has(Flags::TIMEOUT));
        assert!(record.extras().is_empty());
        assert_eq!(record.cause().map(ToString::to_string).as_deref(), Some("lock wait"));
        assert_eq!(record.to_string(), line(&err));
    }

    fn bounded(s: &str) -> String {
        let mut out = String::new();
        write_bounded(&mut out, s, false).unwrap();
        out
    }

    #[test]
    fn truncate_ascii() {
        let truncated = bounded(&"a".repeat(MAX_FIELD_OUTPUT_LEN + 10));

        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn no_truncate_when_under_limit() {
        assert_eq!(bounded("short string"), "short string");

        let exact = "b".repeat(MAX_FIELD_OUTPUT_LEN);
        assert_eq!(bounded(&exact), exact);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let truncated = bounded(&"é".repeat(MAX_FIELD_OUTPUT_LEN));

        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
        assert!(truncated.trim_end_matches(TRUNCATION_INDICATOR).chars().all(|c| c == 'é'));
    }

    #[test]
    fn rendered_field_stops_at_the_bound() {
        let field = BoundedField::render("€".repeat(MAX_FIELD_OUTPUT_LEN)).unwrap();

        assert!(field.partial);
        assert!(field.text.len() <= MAX_FIELD_OUTPUT_LEN);
        assert_eq!(field.to_string(), bounded(&"€".repeat(MAX_FIELD_OUTPUT_LEN)));
    }

    #[test]
    fn deep_cause_is_bounded() {
        let deep = (0..5_000).fold(SLOW.wrap("root"), |inner, _| SLOW.wrap(inner));
        let out = line(&deep);
        let cause = out.split_once(" cause='").map(|(_, rest)| rest).unwrap();

        assert!(cause.len() <= MAX_FIELD_OUTPUT_LEN + 1);
        assert!(cause.ends_with("...[TRUNCATED]'"));
        assert!(cause.starts_with("[db:slow] query slow\n-> [db:slow]"));
    }

    #[test]
    fn long_tag_lists_are_bounded() {
        let tags: Vec<String> = (0..1_000).map(|i| format!("tag-{}", i)).collect();
        let out = line(&SLOW.with_tags(tags));
        let listed = out.split_once(" tags='").map(|(_, rest)| rest).unwrap();

        assert!(listed.starts_with("tag-0,tag-1,tag-2"));
        assert!(listed.ends_with("...[TRUNCATED]'"));
        assert!(listed.len() <= MAX_FIELD_OUTPUT_LEN + 1);
    }

    #[test]
    fn oversized_stack_trace_is_bounded() {
        let err = SLOW.with_extras(Extras::new().with_stack_trace("x".repeat(10_000)));
        assert!(line(&err).len() < 2 * MAX_FIELD_OUTPUT_LEN);
    }
}
