//! Policy-backed capabilities.
//!
//! A [`PolicyConfig`] describes the host environment in TOML: which entity
//! types exist, who may read them, which of their fields are hidden, and
//! which users exist. It implements [`EntityRegistry`] directly, and
//! [`PolicyAccessControl`] answers [`AccessControl`] checks from it for any
//! principal.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! [entity_types.Contact]
//! read = "everyone"
//! forbidden_fields = ["ssn", "restrictedField"]
//!
//! [entity_types.Opportunity]
//! read = "admin"
//!
//! [[users]]
//! id = "5f1a9c0e2b7d4a3c1"
//! user_name = "crm-sync"
//! kind = "api"
//!
//! [[users]]
//! id = "admin"
//! kind = "admin"
//! ```

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    access::{AccessControl, EntityRegistry, Principal, PrincipalKind, SessionPrincipal},
    errors::{PolicyError, PolicyResult},
    identifiers::UserId,
};

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;

/// Who may read records of an entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadAccess {
    /// Every principal
    #[default]
    Everyone,

    /// Administrators only
    Admin,

    /// No principal
    Nobody,
}

impl ReadAccess {
    /// Check whether a principal with the given admin flag may read.
    pub fn allows(&self, is_admin: bool) -> bool {
        match self {
            Self::Everyone => true,
            Self::Admin => is_admin,
            Self::Nobody => false,
        }
    }
}

/// Policy for one entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypePolicy {
    /// Read scope
    #[serde(default)]
    pub read: ReadAccess,

    /// Fields hidden from every principal
    #[serde(default)]
    pub forbidden_fields: Vec<String>,
}

/// A user account known to the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User identifier
    pub id: UserId,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Account class
    pub kind: PrincipalKind,
}

/// Host environment description used to check webhook definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Known entity types keyed by name
    #[serde(default)]
    pub entity_types: BTreeMap<String, EntityTypePolicy>,

    /// Known users
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl PolicyConfig {
    /// Load a policy from a TOML file.
    ///
    /// # Errors
    ///
    /// - `PolicyError::FileNotFound` if the path does not exist
    /// - `PolicyError::FileAccess` if the file cannot be read
    /// - `PolicyError::Parse` if the TOML is invalid or does not match the schema
    /// - `PolicyError::InvalidPolicy` if the policy is inconsistent
    pub fn load(path: &Path) -> PolicyResult<Self> {
        debug!("Loading webhook policy from {:?}", path);

        if !path.exists() {
            return Err(PolicyError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| PolicyError::FileAccess {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let policy = Self::from_toml_str(&content)?;

        info!(
            entity_types = policy.entity_types.len(),
            users = policy.users.len(),
            "Loaded webhook policy"
        );
        Ok(policy)
    }

    /// Parse and check a policy from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Parse` or `PolicyError::InvalidPolicy`.
    pub fn from_toml_str(content: &str) -> PolicyResult<Self> {
        let policy: PolicyConfig = toml::from_str(content).map_err(|e| PolicyError::Parse {
            reason: e.to_string(),
        })?;

        policy.check()?;
        Ok(policy)
    }

    /// Look up a user by id.
    pub fn user(&self, id: &UserId) -> Option<&UserRecord> {
        self.users.iter().find(|u| &u.id == id)
    }

    /// Build the session principal for a known user.
    pub fn principal(&self, id: &UserId) -> Option<SessionPrincipal> {
        self.user(id)
            .map(|u| SessionPrincipal::new(u.id.clone(), u.kind))
    }

    fn check(&self) -> PolicyResult<()> {
        if self.entity_types.keys().any(|name| name.is_empty()) {
            return Err(PolicyError::InvalidPolicy {
                field: "entity_types".to_string(),
                reason: "entity type names must not be empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if user.id.is_empty() {
                return Err(PolicyError::InvalidPolicy {
                    field: "users".to_string(),
                    reason: "user ids must not be empty".to_string(),
                });
            }

            if !seen.insert(&user.id) {
                return Err(PolicyError::InvalidPolicy {
                    field: "users".to_string(),
                    reason: format!("duplicate user id '{}'", user.id),
                });
            }
        }

        Ok(())
    }
}

impl EntityRegistry for PolicyConfig {
    fn exists(&self, entity_type: &str) -> bool {
        self.entity_types.contains_key(entity_type)
    }

    fn lookup_user_is_api(&self, user_id: &UserId) -> Option<bool> {
        self.user(user_id).map(|u| u.kind == PrincipalKind::Api)
    }
}

/// Access control backed by a [`PolicyConfig`].
pub struct PolicyAccessControl {
    policy: Arc<PolicyConfig>,
}

impl PolicyAccessControl {
    /// Create access control over `policy`.
    pub fn new(policy: Arc<PolicyConfig>) -> Self {
        Self { policy }
    }
}

impl AccessControl for PolicyAccessControl {
    fn can_read(&self, principal: &dyn Principal, entity_type: &str) -> bool {
        self.policy
            .entity_types
            .get(entity_type)
            .is_some_and(|p| p.read.allows(principal.is_admin()))
    }

    fn forbidden_fields(&self, entity_type: &str) -> HashSet<String> {
        self.policy
            .entity_types
            .get(entity_type)
            .map(|p| p.forbidden_fields.iter().cloned().collect())
            .unwrap_or_default()
    }
}
