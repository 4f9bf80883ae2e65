//! Identifier types
//!
//! Record identifiers issued by the host. The host owns id generation, so these
//! types wrap whatever string it hands over without imposing a format.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;

/// Identifier of a user record
///
/// Used both for the acting principal and for the owner (`userId`) of a
/// webhook definition. An empty identifier is treated as "not set" by the
/// rules in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID from the host's identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the identifier carries no value
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
