//! # Canonical Errors
//!
//! Structured error taxonomy: a small set of well-known error *kinds*,
//! wrapping of foreign causes, and aggregation of many errors into one.
//!
//! ## Design Philosophy
//!
//! 1. **Kinds are declared once** as `const` sentinels, grouped by namespace
//! 2. **Sentinels are never mutated**: every transformation returns a new value
//! 3. **Identity is the kind**, not the cause: two failures of the same kind
//!    compare equal whatever wrapped them
//! 4. **Classification is orthogonal**: retry/timeout/unknown bits travel with
//!    the error and callers act on them
//! 5. **Aggregation is flat**: a group never contains another group
//!
//! ## Quick Start
//!
//! ```rust
//! use canonical_errors::{define_errors, Canonical, Flags};
//! use std::io;
//!
//! define_errors! {
//!     "config" => {
//!         CFG_MISSING = ("missing", "configuration file not found"),
//!         CFG_LOCKED  = ("locked", "configuration is being written", Flags::RETRYABLE),
//!     }
//! }
//!
//! fn load(path: &str) -> Result<String, Canonical> {
//!     std::fs::read_to_string(path).map_err(|e| match e.kind() {
//!         io::ErrorKind::NotFound => CFG_MISSING.wrap(e),
//!         _ => CFG_LOCKED.wrap(e),
//!     })
//! }
//!
//! let err = load("/definitely/not/here.toml").unwrap_err();
//! assert_eq!(err, CFG_MISSING);
//! assert_eq!(err.key(), "config/missing");
//! ```
//!
//! ## Collecting Errors
//!
//! ```rust
//! use canonical_errors::{Canonical, Group};
//!
//! const BAD_ROW: Canonical = Canonical::new("import", "bad-row", "row rejected");
//!
//! let mut group = Group::new();
//! for row in ["1", "x", "3", "y"] {
//!     group.check(row.parse::<u32>().map_err(|e| BAD_ROW.wrap(e)));
//! }
//!
//! assert_eq!(group.len(), 2);
//! assert!(group.error_or_none().is_some());
//! ```
//!
//! ## Rendering
//!
//! - `{}` on a [`Canonical`]: `[namespace:code] message`, then `-> cause`
//! - `{:#}` on a [`Canonical`]: the cause chain as a bullet list
//! - `{}` on a [`Group`]: its formatter, [`format_default`] unless replaced
//! - [`LogRecord`]: one bounded structured line for log sinks
//!
//! ## Features
//!
//! - `serde` (default): `Serialize`/`Deserialize` for [`Canonical`], [`Group`],
//!   [`Flags`] and [`Extras`]. Causes and formatters are not serialized.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod cause;
pub mod codes;
pub mod convenience;
pub mod definitions;
pub mod extras;
pub mod flags;
pub mod group;
pub mod inspect;
pub mod logging;

pub use canonical::*;
pub use cause::*;
pub use codes::*;
pub use definitions::*;
pub use extras::*;
pub use flags::*;
pub use group::*;
pub use logging::*;

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::error::Error;
    use std::io;

    crate::define_errors! {
        "orders" => {
            NOT_FOUND = ("not-found", "order does not exist"),
            STALE     = ("stale", "order version is stale", Flags::RETRYABLE),
        }
    }

    const GATEWAY: Canonical =
        Canonical::new_flagged("payments", "gateway", "gateway unavailable", Flags::TIMEOUT);

    #[test]
    fn wrapped_kind_keeps_identity_and_cause() {
        let err = NOT_FOUND.wrap(io::Error::from(io::ErrorKind::NotFound));

        assert_eq!(err, NOT_FOUND);
        assert!(err.source().is_some_and(|s| s.is::<io::Error>()));
        assert!(inspect::find::<io::Error>(&err).is_some());
    }

    #[test]
    fn group_collects_and_flattens() {
        let inner = Group::from_errors([NOT_FOUND, STALE]);
        let outer = join(Some(GATEWAY.wrap("502")), [inner]);

        assert_eq!(outer.len(), 3);
        assert!(inspect::is(&outer, &STALE));
        assert!(outer.iter().all(|member| member.cause().is_none_or(|c| c.as_group().is_none())));
    }

    #[test]
    fn verbose_render_walks_the_chain() {
        let err = GATEWAY.wrap(STALE.wrap("conflict"));
        let verbose = format!("{:#}", err);

        assert!(verbose.starts_with("\n* [payments:gateway] gateway unavailable"));
        assert!(verbose.contains("* [orders:stale] order version is stale"));
        assert!(verbose.ends_with("\n\n"));
    }

    #[test]
    fn log_records_cover_each_member() {
        let group = Group::from_errors([NOT_FOUND, GATEWAY]);
        let keys: Vec<String> = group.log_records().map(|record| record.key()).collect();
        assert_eq!(keys, ["orders/not-found", "payments/gateway"]);
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Canonical>();
        assert_send_sync::<Group>();
        assert_send_sync::<Cause>();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn sentinel_serializes_without_cause() {
        let json = serde_json::to_string(&STALE.wrap("v3 != v4")).unwrap();
        let back: Canonical = serde_json::from_str(&json).unwrap();

        assert_eq!(back, STALE);
        assert!(back.cause().is_none());
    }
}
