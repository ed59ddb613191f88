//! The canonical error value.
//!
//! A [`Canonical`] names an error *kind* (namespace + code), carries a
//! human message, classification [`Flags`], diagnostic [`Extras`], and an
//! optional wrapped [`Cause`].
//!
//! # Construction Discipline
//!
//! Kinds are declared once as `const` sentinels and specialized per failure
//! through `wrap`, `wrap_fmt`, `with_extras`, `with_flags` and `with_tags`.
//! Every one of those borrows the receiver and returns a new value, so a
//! sentinel can never be changed by a call site.
//!
//! ```rust
//! use canonical_errors::{Canonical, Flags};
//!
//! const NOT_FOUND: Canonical = Canonical::new("svc", "not-found", "missing");
//!
//! let err = NOT_FOUND
//!     .wrap("disk full")
//!     .with_flags(Flags::RETRYABLE);
//!
//! assert_eq!(err.to_string(), "[svc:not-found] missing\n-> disk full");
//! assert!(err.is_retryable());
//! assert!(!NOT_FOUND.is_retryable());
//! assert_eq!(err, NOT_FOUND.with_flags(Flags::RETRYABLE));
//! ```
//!
//! # Identity
//!
//! Two canonical errors are equal when their code, message, namespace,
//! flags and extras match. The wrapped cause is not part of identity: two
//! failures of the same kind compare equal whatever caused them.
//!
//! # Sharing
//!
//! The wrapped cause sits behind an `Arc`. Cloning an error, or deriving a
//! new one with a `with_*` builder, shares the chain instead of copying it,
//! so both stay O(1) however deep the chain is. [`Canonical::copy`] is the
//! explicit deep copy.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::codes::{error_key, Code, Namespace};
use crate::logging::LogRecord;
use crate::{inspect, Cause, Extras, Flags, Group};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A known/defined application error.
///
/// `Default` produces the zero value, which `wrap` treats as a placeholder:
/// wrapping a canonical error with it yields a copy of that error.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use = "errors should be handled or returned"]
pub struct Canonical {
    code: Code,
    namespace: Namespace,
    message: Cow<'static, str>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Flags::is_empty"))]
    flags: Flags,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Extras::is_empty"))]
    extras: Extras,
    #[cfg_attr(feature = "serde", serde(skip))]
    wrapped: Option<Arc<Cause>>,
}

impl Canonical {
    /// Declare an error kind from string literals.
    pub const fn new(namespace: &'static str, code: &'static str, message: &'static str) -> Self {
        Self::new_flagged(namespace, code, message, Flags::empty())
    }

    /// Declare an error kind with classification flags preset.
    pub const fn new_flagged(
        namespace: &'static str,
        code: &'static str,
        message: &'static str,
        flags: Flags,
    ) -> Self {
        Self {
            code: Code::from_static(code),
            namespace: Namespace::from_static(namespace),
            message: Cow::Borrowed(message),
            flags,
            extras: Extras::new(),
            wrapped: None,
        }
    }

    /// Build an error kind from runtime strings.
    pub fn from_parts(
        namespace: impl Into<Namespace>,
        code: impl Into<Code>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            code: code.into(),
            namespace: namespace.into(),
            message: message.into(),
            flags: Flags::empty(),
            extras: Extras::new(),
            wrapped: None,
        }
    }

    /// Code within the namespace.
    #[inline]
    pub fn code(&self) -> &Code {
        &self.code
    }

    /// Namespace (package/component) the kind belongs to.
    #[inline]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Classification bits.
    #[inline]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Diagnostic payload.
    #[inline]
    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    /// The wrapped cause, if any.
    #[inline]
    pub fn cause(&self) -> Option<&Cause> {
        self.wrapped.as_deref()
    }

    /// Value that uniquely identifies the kind: `"<namespace>/<code>"`.
    pub fn key(&self) -> String {
        error_key(&self.namespace, &self.code)
    }

    /// True if every field, the wrapped cause included, is at its zero value.
    pub fn is_zero(&self) -> bool {
        self.code.is_empty()
            && self.namespace.is_empty()
            && self.message.is_empty()
            && self.flags.is_empty()
            && self.extras.is_empty()
            && self.wrapped.is_none()
    }

    /// Compare identity with another canonical error (wrapped cause ignored).
    #[inline]
    pub fn equal(&self, other: &Canonical) -> bool {
        self == other
    }

    /// Identity hook for generic matching: true if the first canonical
    /// error found in `target` (see [`inspect::find`]) is equal to this one.
    ///
    /// A wrapper whose `source()` leads to a canonical error therefore
    /// matches its kind.
    pub fn is(&self, target: &(dyn Error + 'static)) -> bool {
        inspect::find::<Canonical>(target).is_some_and(|other| self.equal(other))
    }

    /// Independent copy of the error and its whole canonical cause chain.
    ///
    /// Every canonical link is rebuilt; the terminal foreign or aggregate
    /// cause is shared, not duplicated.
    pub fn copy(&self) -> Canonical {
        let mut outer = Vec::new();
        let mut last = self;
        while let Some(Cause::Classified(next)) = last.cause() {
            outer.push(last);
            last = &**next;
        }

        let mut copy = last.derive(last.wrapped.clone());
        for link in outer.into_iter().rev() {
            copy = link.derive(Some(Arc::new(Cause::from(copy))));
        }
        copy
    }

    /// Wrap `err` as the cause of a new error of this kind.
    ///
    /// When `self` is the zero value and `err` is already canonical, a copy
    /// of `err` is returned instead, so call sites can wrap uniformly without
    /// checking whether the error was classified upstream.
    pub fn wrap(&self, err: impl Into<Cause>) -> Canonical {
        let cause = err.into();
        if self.is_zero() {
            if let Cause::Classified(canonical) = cause {
                return *canonical;
            }
        }
        self.derive(Some(Arc::new(cause)))
    }

    /// Like [`wrap`](Self::wrap), returning an unchanged copy for `None`.
    pub fn wrap_opt<E: Into<Cause>>(&self, err: Option<E>) -> Canonical {
        match err {
            Some(err) => self.wrap(err),
            None => self.clone(),
        }
    }

    /// Wrap a foreign error built from format arguments.
    ///
    /// See also the [`wrapf!`](crate::wrapf) macro.
    pub fn wrap_fmt(&self, args: fmt::Arguments<'_>) -> Canonical {
        self.wrap(args)
    }

    /// New error with the extras replaced.
    pub fn with_extras(&self, extras: Extras) -> Canonical {
        let mut err = self.clone();
        err.extras = extras;
        err
    }

    /// New error with `flags` set in addition to the existing ones.
    pub fn with_flags(&self, flags: Flags) -> Canonical {
        let mut err = self.clone();
        err.flags = self.flags.set(flags);
        err
    }

    /// New error with `tags` appended to its extras.
    pub fn with_tags<I, S>(&self, tags: I) -> Canonical
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut err = self.clone();
        err.extras = self.extras.with_tags(tags);
        err
    }

    /// This error followed by every link of its cause chain.
    ///
    /// Traversal follows canonical causes; a foreign or aggregate cause is
    /// appended (foreign ones wrapped as unknown, aggregates flattened) and
    /// ends the walk.
    pub fn as_group(&self) -> Group {
        let mut group = Group::new();
        group.push(self.clone());

        let mut link = self;
        while let Some(cause) = link.cause() {
            group.push(cause.clone());
            match cause {
                Cause::Classified(next) => link = &**next,
                Cause::Foreign(_) | Cause::Aggregate(_) => break,
            }
        }
        group
    }

    /// The failed operation is safe to retry.
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        self.flags.has(Flags::RETRYABLE)
    }

    /// The failure was caused by a timeout.
    #[inline]
    pub const fn is_timeout(&self) -> bool {
        self.flags.has(Flags::TIMEOUT)
    }

    /// The failure may not recur if tried at another time.
    ///
    /// Tests the `UNKNOWN` bit; there is no dedicated transient bit.
    #[inline]
    pub const fn is_transient(&self) -> bool {
        self.flags.has(Flags::UNKNOWN)
    }

    /// Borrowed structured view for log sinks.
    #[inline]
    pub fn log_record(&self) -> LogRecord<'_> {
        LogRecord::new(self)
    }

    /// Callback form of [`log_record`](Self::log_record).
    #[inline]
    pub fn with_log_record<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&LogRecord<'_>) -> R,
    {
        f(&self.log_record())
    }

    /// Same kind, with `wrapped` as the cause.
    fn derive(&self, wrapped: Option<Arc<Cause>>) -> Canonical {
        Canonical {
            code: self.code.clone(),
            namespace: self.namespace.clone(),
            message: self.message.clone(),
            flags: self.flags,
            extras: self.extras.clone(),
            wrapped,
        }
    }
}

impl Drop for Canonical {
    // Unlinks uniquely owned links one at a time so dropping a deep chain
    // does not recurse.
    fn drop(&mut self) {
        let mut next = self.wrapped.take();
        while let Some(cause) = next {
            next = match Arc::try_unwrap(cause) {
                Ok(Cause::Classified(mut inner)) => inner.wrapped.take(),
                _ => None,
            };
        }
    }
}

impl PartialEq for Canonical {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.namespace == other.namespace
            && self.flags == other.flags
            && self.extras == other.extras
    }
}

impl Eq for Canonical {}

impl fmt::Display for Canonical {
    /// `[<namespace>:<code>] <message>`, followed by `\n-> <cause>` when
    /// wrapped. The alternate form (`{:#}`) renders the whole chain as a
    /// group bullet list.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f.write_str(&self.as_group().to_string());
        }
        let mut link = self;
        loop {
            write!(f, "[{}:{}] {}", link.namespace, link.code, link.message)?;
            match link.cause() {
                Some(Cause::Classified(next)) => {
                    f.write_str("\n-> ")?;
                    link = &**next;
                }
                Some(cause) => return write!(f, "\n-> {}", cause),
                None => return Ok(()),
            }
        }
    }
}

impl Error for Canonical {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause().map(Cause::as_error)
    }
}
