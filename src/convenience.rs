//! Declaration and wrapping macros.
//!
//! # Declaring a taxonomy
//!
//! Error kinds are plain `const` values. [`define_errors!`] declares a batch
//! of them in one namespace so a taxonomy reads as a table:
//!
//! ```rust
//! use canonical_errors::{define_errors, Flags};
//!
//! define_errors! {
//!     "storage" => {
//!         NOT_FOUND = ("not-found", "object does not exist"),
//!         BUSY      = ("busy", "backend is overloaded", Flags::RETRYABLE),
//!     }
//! }
//!
//! assert_eq!(NOT_FOUND.key(), "storage/not-found");
//! assert!(BUSY.is_retryable());
//! ```
//!
//! # Wrapping formatted causes
//!
//! [`wrapf!`] attaches a formatted message as the foreign cause of a kind:
//!
//! ```rust
//! use canonical_errors::{wrapf, Canonical};
//!
//! const TIMEOUT: Canonical = Canonical::new("svc", "timeout", "deadline exceeded");
//! let err = wrapf!(TIMEOUT, "after {}ms", 250);
//! assert_eq!(err.to_string(), "[svc:timeout] deadline exceeded\n-> after 250ms");
//! ```

// ============================================================================
// Declaration Macros
// ============================================================================

/// Define a single error kind as a `pub const`.
///
/// Leading attributes, doc comments included, are forwarded to the constant.
///
/// # Example
///
/// ```rust
/// # use canonical_errors::{define_error, Flags};
/// define_error!(RATE_LIMITED, "api", "rate-limited", "too many requests", Flags::RETRYABLE);
/// define_error!(FORBIDDEN, "api", "forbidden", "access denied");
///
/// assert!(RATE_LIMITED.is_retryable());
/// assert!(FORBIDDEN.flags().is_empty());
/// ```
#[macro_export]
macro_rules! define_error {
    ($(#[$meta:meta])* $name:ident, $namespace:expr, $code:expr, $message:expr) => {
        $crate::define_error!(
            $(#[$meta])* $name, $namespace, $code, $message, $crate::Flags::empty()
        );
    };
    ($(#[$meta:meta])* $name:ident, $namespace:expr, $code:expr, $message:expr, $flags:expr) => {
        $(#[$meta])*
        pub const $name: $crate::Canonical =
            $crate::Canonical::new_flagged($namespace, $code, $message, $flags);
    };
}

/// Define multiple error kinds within the same namespace.
///
/// Each entry is `NAME = (code, message)` or `NAME = (code, message, flags)`.
///
/// # Example
///
/// ```rust
/// # use canonical_errors::{define_errors, Flags};
/// define_errors! {
///     "queue" => {
///         FULL   = ("full", "queue at capacity", Flags::RETRYABLE),
///         CLOSED = ("closed", "queue was closed"),
///     }
/// }
/// # assert_eq!(CLOSED.namespace(), "queue");
/// ```
#[macro_export]
macro_rules! define_errors {
    ($namespace:expr => {
        $( $(#[$meta:meta])* $name:ident = ($code:expr, $message:expr $(, $flags:expr)?) ),+ $(,)?
    }) => {
        $(
            $crate::define_error!($(#[$meta])* $name, $namespace, $code, $message $(, $flags)?);
        )+
    };
}

// ============================================================================
// Wrapping Macros
// ============================================================================

/// Wrap a formatted foreign error with an error kind.
///
/// Expands to [`Canonical::wrap_fmt`](crate::Canonical::wrap_fmt).
#[macro_export]
macro_rules! wrapf {
    ($kind:expr, $($arg:tt)+) => {
        $kind.wrap_fmt(::std::format_args!($($arg)+))
    };
}

// ============================================================================
// Tests
// ============================================================================
