//! Strongly-typed identifiers for pipeline entities
//!
//! Claims, users and policies are keyed by opaque business references such as
//! `CLM-2024-001`, `USR-123` or `POL-001`. Newtype wrappers keep the three kinds
//! from being mixed up while still serializing as plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing reference without validation
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the reference as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the reference is empty or whitespace
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::InvalidIdentifier(format!(
                        "{} reference cannot be empty",
                        $prefix
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ClaimId, "CLM");
define_id!(UserId, "USR");
define_id!(PolicyId, "POL");
