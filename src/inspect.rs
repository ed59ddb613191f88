//! Generic cause inspection.
//!
//! These helpers walk any `dyn Error` and understand both kinds of nesting
//! this crate produces: a canonical error's wrapped cause (exposed through
//! `source()`), and the members of a [`Group`]. Walking is depth-first, so
//! each group member is visited together with its own causes before the
//! next member.
//!
//! ```rust
//! use canonical_errors::{inspect, Canonical, Group};
//! use std::io;
//!
//! const TIMEOUT: Canonical = Canonical::new("net", "timeout", "deadline exceeded");
//! const REFUSED: Canonical = Canonical::new("net", "refused", "connection refused");
//!
//! let group = Group::from_errors([REFUSED.wrap(io::Error::other("rst")), TIMEOUT]);
//!
//! assert!(inspect::is(&group, &TIMEOUT));
//! assert_eq!(inspect::find::<io::Error>(&group).map(ToString::to_string).as_deref(), Some("rst"));
//! assert_eq!(inspect::causes(&group).count(), 4);
//! ```

use std::error::Error;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::{Canonical, Group, Unwrapped};

/// Depth-first walk over an error and everything nested inside it.
///
/// Yields the error itself first. A group is followed by its members; any
/// other error is followed by its `source()` chain.
pub fn causes<'a>(err: &'a (dyn Error + 'static)) -> Causes<'a> {
    let mut pending = SmallVec::new();
    pending.push(err);
    Causes { pending }
}

/// Whether `target` appears anywhere in `err`.
///
/// A canonical `target` matches any canonical error equal to it (wrapped
/// causes are not compared). Any other `target` matches only itself.
pub fn is(err: &(dyn Error + 'static), target: &(dyn Error + 'static)) -> bool {
    let wanted = target.downcast_ref::<Canonical>();
    causes(err).any(|cause| match (wanted, cause.downcast_ref::<Canonical>()) {
        (Some(wanted), Some(found)) => wanted == found,
        _ => std::ptr::addr_eq(cause, target),
    })
}

/// First value of type `T` in `err`, in walk order.
pub fn find<'a, T: Error + 'static>(err: &'a (dyn Error + 'static)) -> Option<&'a T> {
    causes(err).find_map(|cause| cause.downcast_ref::<T>())
}

/// Iterator returned by [`causes`].
pub struct Causes<'a> {
    pending: SmallVec<[&'a (dyn Error + 'static); 8]>,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.pending.pop()?;

        if let Some(group) = current.downcast_ref::<Group>() {
            match group.unwrap_cause() {
                Some(Unwrapped::Member(member)) => self.pending.push(member),
                // Reversed so the first member is popped first.
                Some(Unwrapped::Chain(chain)) => self.pending.extend(chain.rev().map(as_error)),
                None => {}
            }
        } else if let Some(source) = current.source() {
            self.pending.push(source);
        }

        Some(current)
    }
}

impl FusedIterator for Causes<'_> {}

fn as_error(err: &Canonical) -> &(dyn Error + 'static) {
    err
}
