//! Aggregation of canonical errors into a single reportable failure.
//!
//! A [`Group`] collects the failures of batch or parallel work. It stays
//! flat: appending a group inlines its members, and foreign errors are
//! classified as [`ERR_UNKNOWN`] on the way in, so every member is a
//! [`Canonical`].
//!
//! ```rust
//! use canonical_errors::{Canonical, Group};
//!
//! const BAD_ROW: Canonical = Canonical::new("import", "bad-row", "row rejected");
//!
//! fn import(rows: &[&str]) -> Result<(), Group> {
//!     let mut failures = Group::new();
//!     for row in rows {
//!         if row.is_empty() {
//!             failures.push(BAD_ROW.wrap("empty row"));
//!         }
//!     }
//!     failures.into_result()
//! }
//!
//! assert!(import(&["a", "b"]).is_ok());
//! assert_eq!(import(&["a", "", ""]).unwrap_err().len(), 2);
//! ```
//!
//! # Traversal
//!
//! [`Group::unwrap_cause`] exposes the members to cause-walking code one at
//! a time. A singleton group yields its member directly; larger groups
//! yield a [`Chain`] cursor whose `unwrap_cause` steps through the
//! remaining members in insertion order.
//!
//! # Concurrency
//!
//! `push`/`append` take `&mut self`; a group has one accumulating owner.
//! Feed it from several tasks through a mutex or a channel.

use std::error::Error;
use std::fmt;
use std::iter::FusedIterator;

use crate::definitions::ERR_UNKNOWN;
use crate::inspect;
use crate::logging::LogRecord;
use crate::{Canonical, Cause};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Callback that renders a group's members as one string.
pub type GroupFormatter = fn(&[Canonical]) -> String;

/// Ordered, flat collection of canonical errors.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    errors: Vec<Canonical>,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_formatter"))]
    formatter: GroupFormatter,
}

#[cfg(feature = "serde")]
fn default_formatter() -> GroupFormatter {
    format_default
}

impl Group {
    /// Empty group using [`format_default`].
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            formatter: format_default,
        }
    }

    /// Group seeded with `errs`, flattened and classified like [`append`](Self::append).
    pub fn from_errors<I, E>(errs: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Cause>,
    {
        let mut group = Self::new();
        group.append(errs);
        group
    }

    /// Replace the formatter used by `Display`.
    pub fn with_formatter(mut self, formatter: GroupFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Add one error.
    ///
    /// - a group contributes its members, never itself
    /// - a canonical error is appended as is
    /// - a foreign error is wrapped by [`ERR_UNKNOWN`]
    pub fn push(&mut self, err: impl Into<Cause>) {
        match err.into() {
            Cause::Aggregate(group) => self.errors.extend(group.errors),
            Cause::Classified(canonical) => self.errors.push(*canonical),
            foreign @ Cause::Foreign(_) => self.errors.push(ERR_UNKNOWN.wrap(foreign)),
        }
    }

    /// Add every error of `errs`, in order.
    pub fn append<I, E>(&mut self, errs: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<Cause>,
    {
        for err in errs {
            self.push(err);
        }
    }

    /// Record the error arm of `result` and pass the ok value through.
    pub fn check<T, E: Into<Cause>>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(err);
                None
            }
        }
    }

    /// True if the group holds no errors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of collected errors.
    #[inline]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Members in insertion (or sorted) order.
    #[inline]
    pub fn errors(&self) -> &[Canonical] {
        &self.errors
    }

    /// Members as plain error objects.
    pub fn slice(&self) -> Vec<&(dyn Error + 'static)> {
        self.errors
            .iter()
            .map(|err| err as &(dyn Error + 'static))
            .collect()
    }

    /// Iterate members in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Canonical> {
        self.errors.iter()
    }

    /// `None` when empty, the group otherwise.
    pub fn error_or_none(self) -> Option<Group> {
        if self.is_empty() { None } else { Some(self) }
    }

    /// `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Group> {
        match self.error_or_none() {
            Some(group) => Err(group),
            None => Ok(()),
        }
    }

    /// Next traversal step: nothing, the single member, or a cursor.
    pub fn unwrap_cause(&self) -> Option<Unwrapped<'_>> {
        match self.errors.as_slice() {
            [] => None,
            [only] => Some(Unwrapped::Member(only)),
            members => Some(Unwrapped::Chain(Chain::new(members))),
        }
    }

    /// Order two members by their rendered text.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn less(&self, i: usize, j: usize) -> bool {
        self.errors[i].to_string() < self.errors[j].to_string()
    }

    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.errors.swap(i, j);
    }

    /// Sort members by rendered text. Stable.
    pub fn sort(&mut self) {
        self.errors.sort_by_cached_key(ToString::to_string);
    }

    /// One structured log record per member.
    pub fn log_records(&self) -> impl Iterator<Item = LogRecord<'_>> {
        self.errors.iter().map(Canonical::log_record)
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Into<Cause>> Extend<E> for Group {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.append(iter);
    }
}

impl<E: Into<Cause>> FromIterator<E> for Group {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_errors(iter)
    }
}

impl IntoIterator for Group {
    type Item = Canonical;
    type IntoIter = std::vec::IntoIter<Canonical>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a Canonical;
    type IntoIter = std::slice::Iter<'a, Canonical>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&(self.formatter)(&self.errors))
    }
}

impl Error for Group {
    /// The member of a singleton group; walk larger groups with
    /// [`unwrap_cause`](Group::unwrap_cause) or [`crate::inspect::causes`].
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.unwrap_cause() {
            Some(Unwrapped::Member(member)) => Some(member),
            _ => None,
        }
    }
}

/// Absence of a group behaves like an empty group.
pub trait GroupOption {
    /// True for `None` or an empty group.
    fn group_is_empty(&self) -> bool;

    /// `None` for `None` or an empty group.
    fn error_or_none(self) -> Option<Group>;
}

impl GroupOption for Option<Group> {
    fn group_is_empty(&self) -> bool {
        self.as_ref().is_none_or(Group::is_empty)
    }

    fn error_or_none(self) -> Option<Group> {
        self.and_then(Group::error_or_none)
    }
}

/// Result of one unwrap step over a group.
#[derive(Debug, Clone, Copy)]
pub enum Unwrapped<'a> {
    /// The group held exactly one member.
    Member(&'a Canonical),
    /// The group held several; the cursor starts at the first.
    Chain(Chain<'a>),
}

/// Cursor over the members of a group not yet visited.
///
/// Identity and downcast queries look only at the first remaining member;
/// [`unwrap_cause`](Chain::unwrap_cause) drops it. The cursor borrows the
/// group, so the members cannot change under it.
#[derive(Debug, Clone, Copy)]
pub struct Chain<'a> {
    rest: &'a [Canonical],
}

impl<'a> Chain<'a> {
    pub(crate) fn new(rest: &'a [Canonical]) -> Self {
        Self { rest }
    }

    /// The member under the cursor.
    #[inline]
    pub fn head(&self) -> Option<&'a Canonical> {
        self.rest.first()
    }

    /// Members not yet visited, head included.
    #[inline]
    pub fn remaining(&self) -> &'a [Canonical] {
        self.rest
    }

    /// Cursor advanced past the head; `None` once at most one member is left.
    pub fn unwrap_cause(self) -> Option<Chain<'a>> {
        match self.rest {
            [] | [_] => None,
            [_, tail @ ..] => Some(Chain::new(tail)),
        }
    }

    /// Whether `target` matches the head or anything in the head's causes.
    pub fn is(&self, target: &(dyn Error + 'static)) -> bool {
        self.head().is_some_and(|head| inspect::is(head, target))
    }

    /// First `T` found in the head or its causes.
    pub fn find<T: Error + 'static>(&self) -> Option<&'a T> {
        self.head().and_then(|head| inspect::find::<T>(head))
    }
}

impl fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.head() {
            Some(head) => fmt::Display::fmt(head, f),
            None => Ok(()),
        }
    }
}

impl Error for Chain<'_> {}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Canonical;

    fn next(&mut self) -> Option<Self::Item> {
        let (head, tail) = self.rest.split_first()?;
        self.rest = tail;
        Some(head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rest.len(), Some(self.rest.len()))
    }
}

impl DoubleEndedIterator for Chain<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (last, init) = self.rest.split_last()?;
        self.rest = init;
        Some(last)
    }
}

impl ExactSizeIterator for Chain<'_> {}

impl FusedIterator for Chain<'_> {}

/// Default formatter: nothing for no errors, the error itself for one, a
/// bullet list framed by blank lines for several.
pub fn format_default(errors: &[Canonical]) -> String {
    match errors {
        [] => String::new(),
        [only] => only.to_string(),
        _ => {
            let points: Vec<String> = errors.iter().map(|err| format!("* {}", err)).collect();
            format!("\n{}\n\n", points.join("\n"))
        }
    }
}

/// Merge errors into one group.
///
/// If `err` already is a group, `errs` are appended to it and its formatter
/// is kept; otherwise a new group is seeded with `err` (if any).
pub fn join<E, I, F>(err: Option<E>, errs: I) -> Group
where
    E: Into<Cause>,
    I: IntoIterator<Item = F>,
    F: Into<Cause>,
{
    let mut group = match err.map(Into::into) {
        Some(Cause::Aggregate(group)) => group,
        Some(other) => Group::from_errors([other]),
        None => Group::new(),
    };
    group.append(errs);
    group
}
