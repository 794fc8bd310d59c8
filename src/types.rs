//! NewType wrappers for strong typing throughout the service.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing a bearer token where a user id is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// Stable identifier for a user account.
    ///
    /// Generated at registration as a random opaque hex string rather than a
    /// sequential counter, so that account ids cannot be enumerated. It is
    /// the record key of the `user` table and the owner reference on every
    /// bookmark and tag row.
    UserId
);

newtype_string!(
    /// Stable identifier for a bookmark.
    ///
    /// Random opaque hex string, generated when the bookmark is created and
    /// immutable afterwards. This is the id clients address bookmarks by in
    /// the HTTP API.
    BookmarkId
);

newtype_string!(
    /// Bearer token presented per-request to prove identity.
    ///
    /// Exchanged for a `UserId` by exact lookup. A user holds exactly one
    /// current token; rotation replaces it and invalidates the previous
    /// value immediately.
    BearerToken
);
