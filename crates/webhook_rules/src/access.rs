//! Capability interfaces supplied by the host.
//!
//! The webhook rules never reach into the host's ORM, ACL engine or session
//! store directly. Instead the host hands over three small capabilities:
//!
//! - [`Principal`] - the acting user
//! - [`AccessControl`] - read permissions per user and entity type
//! - [`EntityRegistry`] - which entity types and users exist
//!
//! Implementations may be backed by local data or by remote calls; the rules
//! call them synchronously and at most once per check.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identifiers::UserId;

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;

/// The acting user of a create or update request.
pub trait Principal: Send + Sync {
    /// Identifier of the user record
    fn id(&self) -> &UserId;

    /// Returns true for administrators
    fn is_admin(&self) -> bool;

    /// Returns true for API-class users (integration accounts)
    fn is_api(&self) -> bool;
}

/// Read permissions of the host's ACL.
///
/// Read access is decided per call for the given principal, so one
/// implementation can serve every request.
pub trait AccessControl: Send + Sync {
    /// Whether `principal` may read records of `entity_type`.
    fn can_read(&self, principal: &dyn Principal, entity_type: &str) -> bool;

    /// Fields of `entity_type` hidden by policy.
    ///
    /// Forbidden fields apply regardless of principal.
    fn forbidden_fields(&self, entity_type: &str) -> HashSet<String>;
}

/// Lookup of entity types and users known to the host.
pub trait EntityRegistry: Send + Sync {
    /// Whether `entity_type` is a known entity type.
    fn exists(&self, entity_type: &str) -> bool;

    /// Look up a user by id.
    ///
    /// Returns `None` when no such user exists, otherwise whether the user is
    /// API-class.
    fn lookup_user_is_api(&self, user_id: &UserId) -> Option<bool>;
}

/// Class of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    /// Interactive user without administrative rights
    Regular,

    /// Interactive administrator
    Admin,

    /// Machine or integration account
    Api,
}

impl PrincipalKind {
    /// Convert the kind to its configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Admin => "admin",
            Self::Api => "api",
        }
    }
}

/// A principal resolved from the host session.
///
/// # Examples
///
/// ```rust
/// use webhook_rules::{Principal, PrincipalKind, SessionPrincipal, UserId};
///
/// let principal = SessionPrincipal::new(UserId::new("api-1"), PrincipalKind::Api);
/// assert!(principal.is_api());
/// assert!(!principal.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPrincipal {
    id: UserId,
    kind: PrincipalKind,
}

impl SessionPrincipal {
    /// Create a principal for a user of the given kind.
    pub fn new(id: UserId, kind: PrincipalKind) -> Self {
        Self { id, kind }
    }

    /// Get the principal's account class
    pub fn kind(&self) -> PrincipalKind {
        self.kind
    }
}

impl Principal for SessionPrincipal {
    fn id(&self) -> &UserId {
        &self.id
    }

    fn is_admin(&self) -> bool {
        self.kind == PrincipalKind::Admin
    }

    fn is_api(&self) -> bool {
        self.kind == PrincipalKind::Api
    }
}
