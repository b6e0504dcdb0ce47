//! Type-safe ID newtypes
//!
//! IDs come from the auth backend, so they are opaque strings rather than
//! locally generated values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to define a type-safe ID newtype
macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from an existing string
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the inner string value
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string
            pub fn into_string(self) -> String {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
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

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_id!(UserId, "Unique identifier for a user, as issued by the auth backend");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_transparently() {
        let id = UserId::from("u-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-123\"");
        let back: UserId = serde_json::from_str("\"u-123\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_blank_is_empty() {
        assert!(UserId::from("  ").is_empty());
        assert!(!UserId::from("a").is_empty());
    }
}
