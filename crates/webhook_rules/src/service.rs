//! Webhook record lifecycle.
//!
//! [`WebhookRecordService`] runs the webhook rules at the points where the
//! host's record workflow creates or updates a webhook definition:
//!
//! **Create**: filter input → build definition → populate defaults → validate
//!
//! **Update**: filter update input → filter input → merge onto the stored
//! definition → validate
//!
//! The service never persists anything. It returns the definition the host
//! should store, or the [`ValidationError`] the host should report.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    access::{AccessControl, EntityRegistry, Principal},
    definition::{WebhookDefinition, WebhookInput},
    errors::ValidationError,
    validator::EventSpecValidator,
};

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

/// Applies the webhook rules to create and update requests.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use webhook_rules::{
///     PolicyAccessControl, PolicyConfig, UserId, WebhookInput, WebhookRecordService,
/// };
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = Arc::new(PolicyConfig::load(std::path::Path::new("policy.toml"))?);
/// let principal = policy.principal(&UserId::new("api-1")).ok_or("unknown user")?;
///
/// let access = Arc::new(PolicyAccessControl::new(policy.clone()));
/// let service = WebhookRecordService::new(access, policy);
///
/// let input = WebhookInput {
///     event: Some("Contact.update".to_string()),
///     ..Default::default()
/// };
/// let definition = service.create(input, &principal)?;
/// assert_eq!(definition.user_id, Some(UserId::new("api-1")));
/// # Ok(())
/// # }
/// ```
pub struct WebhookRecordService {
    validator: EventSpecValidator,
}

impl WebhookRecordService {
    /// Create a new record service.
    ///
    /// # Arguments
    ///
    /// * `access_control` - Read permissions and forbidden fields
    /// * `entity_registry` - Known entity types and users
    pub fn new(
        access_control: Arc<dyn AccessControl>,
        entity_registry: Arc<dyn EntityRegistry>,
    ) -> Self {
        Self {
            validator: EventSpecValidator::new(access_control, entity_registry),
        }
    }

    /// Get the validator used by this service.
    pub fn validator(&self) -> &EventSpecValidator {
        &self.validator
    }

    /// Check a new webhook definition and return it ready to persist.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] the resulting definition breaks.
    pub fn create(
        &self,
        mut input: WebhookInput,
        principal: &dyn Principal,
    ) -> Result<WebhookDefinition, ValidationError> {
        self.filter_input(&mut input, principal);

        let mut definition = WebhookDefinition::from_input(input);
        self.populate_defaults(&mut definition, principal);

        self.validator.validate(&definition, principal)?;

        info!(principal = %principal.id(), "Webhook definition ready to create");
        Ok(definition)
    }

    /// Apply an update patch to a stored definition and return the result.
    ///
    /// `existing` is not modified; on success the merged copy is returned.
    /// Every update revalidates the complete event spec, even when the patch
    /// does not touch it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] the merged definition breaks.
    pub fn update(
        &self,
        existing: &WebhookDefinition,
        mut patch: WebhookInput,
        principal: &dyn Principal,
    ) -> Result<WebhookDefinition, ValidationError> {
        self.filter_update_input(&mut patch, principal);
        self.filter_input(&mut patch, principal);

        let mut definition = existing.clone();
        definition.merge(patch);

        self.validator.validate(&definition, principal)?;

        info!(principal = %principal.id(), "Webhook definition ready to update");
        Ok(definition)
    }

    /// Default the owner of a new definition to the acting API user.
    ///
    /// Only applies to API principals, and only when the input did not
    /// already name an owner.
    pub fn populate_defaults(&self, definition: &mut WebhookDefinition, principal: &dyn Principal) {
        if principal.is_api() && definition.owner().is_none() {
            debug!(principal = %principal.id(), "Defaulting webhook owner to acting API user");
            definition.user_id = Some(principal.id().clone());
        }
    }

    /// Drop admin-only attributes from create and update input.
    ///
    /// Non-administrators may not choose the owner of a webhook, so `userId`
    /// and `userName` are dropped. On create, API principals get their own id
    /// back from [`populate_defaults`](Self::populate_defaults).
    pub fn filter_input(&self, input: &mut WebhookInput, principal: &dyn Principal) {
        if principal.is_admin() {
            return;
        }

        let removed = input.strip_admin_only();
        if !removed.is_empty() {
            debug!(
                principal = %principal.id(),
                attributes = ?removed,
                "Dropped admin-only webhook attributes from input"
            );
        }
    }

    /// Restrict update patches for non-administrators.
    ///
    /// Non-administrators may change the other attributes of an existing
    /// webhook but never its trigger spec (`event`, `entityType`, `field`).
    /// Dropped attributes are removed silently.
    pub fn filter_update_input(&self, patch: &mut WebhookInput, principal: &dyn Principal) {
        if principal.is_admin() {
            return;
        }

        let removed = patch.strip_trigger_spec();
        if !removed.is_empty() {
            debug!(
                principal = %principal.id(),
                attributes = ?removed,
                "Dropped trigger spec attributes from update"
            );
        }
    }
}
