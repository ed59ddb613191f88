//! Wrapped causes, classified once at the construction boundary.
//!
//! Anything wrapped by a [`Canonical`] or appended to a [`Group`] falls
//! into exactly one of three shapes:
//!
//! - [`Cause::Foreign`]: an arbitrary error from outside the taxonomy. Only
//!   its `Display` text is ever consulted. Shared by reference on clone.
//! - [`Cause::Classified`]: another canonical error.
//! - [`Cause::Aggregate`]: a group of canonical errors.
//!
//! [`Cause::new`] performs the classification by downcasting, so the rest
//! of the crate pattern-matches instead of inspecting types at runtime.
//! A foreign wrapper is looked through: if its `source()` chain leads to a
//! canonical error or a group, the nearest one is taken.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::{io, num, string};

use crate::{inspect, Canonical, FlagsParseError, Group};

/// Thread-safe boxed error, the common currency for foreign errors.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error-shaped value, tagged by how the taxonomy treats it.
#[derive(Debug, Clone)]
pub enum Cause {
    /// Error from outside the taxonomy.
    Foreign(Arc<dyn Error + Send + Sync + 'static>),
    /// A canonical error.
    Classified(Box<Canonical>),
    /// A group of canonical errors.
    Aggregate(Group),
}

impl Cause {
    /// Classify any error value.
    ///
    /// Canonical errors and groups are recognized even when they arrive
    /// through a generic `E` or sit behind a wrapper's `source()`;
    /// everything else becomes `Foreign`.
    pub fn new<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(err))
    }

    /// Classify an already boxed error.
    pub fn from_boxed(err: BoxError) -> Self {
        let err = match err.downcast::<Canonical>() {
            Ok(canonical) => return Self::Classified(canonical),
            Err(other) => other,
        };
        let err = match err.downcast::<Group>() {
            Ok(group) => return Self::Aggregate(*group),
            Err(other) => other,
        };
        match Self::nearest_classified(&*err) {
            Some(classified) => classified,
            None => Self::Foreign(Arc::from(err)),
        }
    }

    /// First canonical error or group below `err` in walk order, cloned.
    fn nearest_classified(err: &(dyn Error + 'static)) -> Option<Self> {
        inspect::causes(err).skip(1).find_map(|cause| {
            if let Some(canonical) = cause.downcast_ref::<Canonical>() {
                Some(Self::from(canonical.clone()))
            } else {
                cause.downcast_ref::<Group>().cloned().map(Self::Aggregate)
            }
        })
    }

    /// Wrap a foreign error without attempting classification.
    pub fn foreign<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Foreign(Arc::new(err))
    }

    /// The canonical error, if this cause is classified.
    #[inline]
    pub fn as_canonical(&self) -> Option<&Canonical> {
        match self {
            Self::Classified(canonical) => Some(canonical),
            _ => None,
        }
    }

    /// The group, if this cause is an aggregate.
    #[inline]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Aggregate(group) => Some(group),
            _ => None,
        }
    }

    /// True for a non-canonical cause.
    #[inline]
    pub fn is_foreign(&self) -> bool {
        matches!(self, Self::Foreign(_))
    }

    /// View the cause as a plain error object.
    pub fn as_error(&self) -> &(dyn Error + 'static) {
        match self {
            Self::Foreign(err) => &**err,
            Self::Classified(canonical) => &**canonical,
            Self::Aggregate(group) => group,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foreign(err) => fmt::Display::fmt(err, f),
            Self::Classified(canonical) => fmt::Display::fmt(canonical, f),
            Self::Aggregate(group) => fmt::Display::fmt(group, f),
        }
    }
}

impl From<Canonical> for Cause {
    fn from(canonical: Canonical) -> Self {
        Self::Classified(Box::new(canonical))
    }
}

impl From<Box<Canonical>> for Cause {
    fn from(canonical: Box<Canonical>) -> Self {
        Self::Classified(canonical)
    }
}

impl From<Group> for Cause {
    fn from(group: Group) -> Self {
        Self::Aggregate(group)
    }
}

impl From<BoxError> for Cause {
    fn from(err: BoxError) -> Self {
        Self::from_boxed(err)
    }
}

impl From<Arc<dyn Error + Send + Sync + 'static>> for Cause {
    fn from(err: Arc<dyn Error + Send + Sync + 'static>) -> Self {
        Self::Foreign(err)
    }
}

/// Direct conversions for common standard library errors. Other foreign
/// types go through [`Cause::new`] or a [`BoxError`].
macro_rules! foreign_causes {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Cause {
                fn from(err: $ty) -> Self {
                    Self::foreign(err)
                }
            }
        )+
    };
}

foreign_causes! {
    io::Error,
    fmt::Error,
    num::ParseIntError,
    num::ParseFloatError,
    std::str::ParseBoolError,
    std::str::Utf8Error,
    string::FromUtf8Error,
    FlagsParseError,
    FormattedError,
}

impl From<String> for Cause {
    fn from(message: String) -> Self {
        Self::foreign(FormattedError::new(message))
    }
}

impl From<&str> for Cause {
    fn from(message: &str) -> Self {
        Self::foreign(FormattedError::new(message))
    }
}

impl From<fmt::Arguments<'_>> for Cause {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Self::foreign(FormattedError::from(args))
    }
}

/// Foreign error carrying only a message, produced by `wrap_fmt`/`wrapf!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormattedError {
    message: String,
}

impl FormattedError {
    /// Wrap a preformatted message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The formatted message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<fmt::Arguments<'_>> for FormattedError {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Self::new(fmt::format(args))
    }
}

impl fmt::Display for FormattedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for FormattedError {}
