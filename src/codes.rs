//! Identity types for error kinds.
//!
//! An error *kind* is named by two strings:
//!
//! - **Namespace**: the logical domain (service, library, subsystem) that
//!   produces the error, e.g. `"billing"`.
//! - **Code**: a machine-readable identifier, unique within its namespace,
//!   e.g. `"card-declined"`.
//!
//! Together they form the [`error_key`], `"<namespace>/<code>"`, which
//! identifies the kind (not an individual failure).
//!
//! Both types wrap `Cow<'static, str>` so sentinel errors can be declared
//! as `const` items from string literals while runtime-built kinds still
//! own their strings.

use std::borrow::Cow;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Machine-readable code identifying an error kind within a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Code(Cow<'static, str>);

/// Logical grouping (service/library) that error codes belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Namespace(Cow<'static, str>);

macro_rules! identity_impls {
    ($ty:ident) => {
        impl $ty {
            /// Borrow a string literal; usable in `const` items.
            #[inline]
            pub const fn from_static(value: &'static str) -> Self {
                Self(Cow::Borrowed(value))
            }

            /// Borrow the underlying string.
            #[inline]
            pub fn as_str(&self) -> &str {
                self.0.as_ref()
            }

            /// True for the zero value.
            #[inline]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&'static str> for $ty {
            fn from(value: &'static str) -> Self {
                Self(Cow::Borrowed(value))
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(Cow::Owned(value))
            }
        }

        impl From<Cow<'static, str>> for $ty {
            fn from(value: Cow<'static, str>) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl PartialEq<str> for $ty {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<&str> for $ty {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

identity_impls!(Code);
identity_impls!(Namespace);

/// Slug that uniquely identifies an error kind: `"<namespace>/<code>"`.
pub fn error_key(namespace: &Namespace, code: &Code) -> String {
    format!("{}/{}", namespace, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_joins_namespace_and_code() {
        let key = error_key(&Namespace::from("svc"), &Code::from("not-found"));
        assert_eq!(key, "svc/not-found");
    }

    #[test]
    fn key_of_empty_identity_is_a_bare_slash() {
        assert_eq!(error_key(&Namespace::default(), &Code::default()), "/");
    }

    #[test]
    fn borrowed_and_owned_compare_equal() {
        const STATIC: Code = Code::from_static("conflict");
        let owned = Code::from(String::from("conflict"));

        assert_eq!(STATIC, owned);
        assert_eq!(owned, "conflict");
        assert!(!owned.is_empty());
        assert!(Namespace::default().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_strings() {
        let json = serde_json::to_string(&Namespace::from("svc")).unwrap();
        assert_eq!(json, r#""svc""#);

        let code: Code = serde_json::from_str(r#""timeout""#).unwrap();
        assert_eq!(code, "timeout");
    }
}
