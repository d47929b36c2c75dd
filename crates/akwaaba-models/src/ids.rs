//! Type-safe ID wrappers for Akwaaba Tickets.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID newtypes with common functionality.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random ID.
            pub fn new() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4().simple()))
            }

            /// Creates an ID from an existing string (for deserialization/testing).
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the ID carries this type's prefix and nothing
            /// that could escape a storage directory.
            pub fn is_well_formed(&self) -> bool {
                self.0
                    .strip_prefix(concat!($prefix, "-"))
                    .is_some_and(|rest| {
                        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                    })
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
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
    };
}

define_id!(UserId, "usr");
define_id!(EventId, "evt");
define_id!(TicketId, "tkt");
define_id!(TransactionId, "txn");
