//! Webhook definition record and input payloads.
//!
//! [`WebhookDefinition`] is the record the host persists. [`WebhookInput`] is
//! what a client submits, either as the body of a create request or as a
//! patch for an update. Attribute names follow the host's camelCase record
//! attributes when serialized.

use serde::{Deserialize, Serialize};

use crate::identifiers::UserId;

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;

fn default_active() -> bool {
    true
}

/// A webhook definition in its post-merge, pre-save state.
///
/// # Example JSON
///
/// ```json
/// {
///   "event": "Record.fieldUpdate",
///   "entityType": "Contact",
///   "field": "emailAddress",
///   "url": "https://hooks.example.com/contact-email",
///   "isActive": true,
///   "userId": "5f1a9c0e2b7d4a3c1"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookDefinition {
    /// API user that owns the webhook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Display name of the owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Event spec, `"<EntityType>.<EventType>"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    /// Entity type used when the event targets `Record`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Watched field for `fieldUpdate` events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Delivery endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Whether the webhook is enabled
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl Default for WebhookDefinition {
    fn default() -> Self {
        Self {
            user_id: None,
            user_name: None,
            event: None,
            entity_type: None,
            field: None,
            url: None,
            is_active: default_active(),
        }
    }
}

impl WebhookDefinition {
    /// Build a new definition from create input.
    ///
    /// Attributes missing from the input take their defaults.
    pub fn from_input(input: WebhookInput) -> Self {
        let mut definition = Self::default();
        definition.merge(input);
        definition
    }

    /// Copy every attribute present in `input` onto this definition.
    ///
    /// Attributes absent from the input are left untouched.
    pub fn merge(&mut self, input: WebhookInput) {
        if let Some(user_id) = input.user_id {
            self.user_id = Some(user_id);
        }
        if let Some(user_name) = input.user_name {
            self.user_name = Some(user_name);
        }
        if let Some(event) = input.event {
            self.event = Some(event);
        }
        if let Some(entity_type) = input.entity_type {
            self.entity_type = Some(entity_type);
        }
        if let Some(field) = input.field {
            self.field = Some(field);
        }
        if let Some(url) = input.url {
            self.url = Some(url);
        }
        if let Some(is_active) = input.is_active {
            self.is_active = is_active;
        }
    }

    /// Owner id, treating an empty id as unset.
    pub fn owner(&self) -> Option<&UserId> {
        self.user_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Event spec, or an empty string when unset.
    pub fn event_str(&self) -> &str {
        self.event.as_deref().unwrap_or_default()
    }

    /// Watched field, or an empty string when unset.
    pub fn field_str(&self) -> &str {
        self.field.as_deref().unwrap_or_default()
    }
}

/// Client-submitted attributes for a create or an update.
///
/// Every attribute is optional. On update this is a patch: only attributes
/// present here change on the stored definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl WebhookInput {
    /// Drop the attributes that make up the trigger spec.
    ///
    /// Returns the names of the attributes that were present and removed.
    pub fn strip_trigger_spec(&mut self) -> Vec<&'static str> {
        let mut removed = Vec::new();
        if self.event.take().is_some() {
            removed.push("event");
        }
        if self.entity_type.take().is_some() {
            removed.push("entityType");
        }
        if self.field.take().is_some() {
            removed.push("field");
        }
        removed
    }

    /// Drop the attributes only administrators may set.
    ///
    /// Returns the names of the attributes that were present and removed.
    pub fn strip_admin_only(&mut self) -> Vec<&'static str> {
        let mut removed = Vec::new();
        if self.user_id.take().is_some() {
            removed.push("userId");
        }
        if self.user_name.take().is_some() {
            removed.push("userName");
        }
        removed
    }
}
