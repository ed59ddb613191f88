//! Error kinds owned by this crate.
//!
//! # Taxonomy
//!
//! Downstream taxonomies declare their own kinds with
//! [`define_errors!`](crate::define_errors), one namespace per component.
//! This crate owns a single namespace, [`DEFAULT_NAMESPACE`], holding the
//! kinds it needs itself:
//!
//! | Constant        | Code      | Flags     | Used for                                  |
//! |-----------------|-----------|-----------|-------------------------------------------|
//! | [`ERR_UNKNOWN`] | `unknown` | `UNKNOWN` | Foreign errors appended to a [`Group`]   |
//!
//! [`Group`]: crate::Group

use crate::{define_error, Flags};

/// Namespace of the kinds declared in this module.
pub const DEFAULT_NAMESPACE: &str = "canonical_errors";

// -----------------------------------------------------------------------------
// canonical_errors - Crate-internal kinds
// -----------------------------------------------------------------------------
define_error!(
    /// Kind given to foreign errors that enter a [`Group`](crate::Group).
    ERR_UNKNOWN,
    DEFAULT_NAMESPACE,
    "unknown",
    "wrapped error is unknown",
    Flags::UNKNOWN
);
