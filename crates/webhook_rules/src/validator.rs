//! Event spec validation.
//!
//! Checks a webhook definition before it is persisted. The checks run in a
//! fixed order and the first failure wins:
//!
//! 1. Owner (`userId`) must be an existing API user, when set
//! 2. Event spec must be present
//! 3. Event spec must have exactly two `.`-separated segments
//! 4. Entity type is resolved (`Record` means "use `entityType`")
//! 5. Resolved entity type must be non-empty
//! 6. Entity type must exist
//! 7. Entity type must be readable by the principal
//! 8. Event type must be one of create, update, delete, fieldUpdate
//! 9. `fieldUpdate` needs a field that is not forbidden
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashSet;
//! use std::sync::Arc;
//! use webhook_rules::{
//!     AccessControl, EntityRegistry, EventSpecValidator, Principal, PrincipalKind,
//!     SessionPrincipal, UserId, WebhookDefinition,
//! };
//!
//! struct OpenAccess;
//!
//! impl AccessControl for OpenAccess {
//!     fn can_read(&self, _principal: &dyn Principal, _entity_type: &str) -> bool {
//!         true
//!     }
//!
//!     fn forbidden_fields(&self, _entity_type: &str) -> HashSet<String> {
//!         HashSet::new()
//!     }
//! }
//!
//! struct ContactsOnly;
//!
//! impl EntityRegistry for ContactsOnly {
//!     fn exists(&self, entity_type: &str) -> bool {
//!         entity_type == "Contact"
//!     }
//!
//!     fn lookup_user_is_api(&self, _user_id: &UserId) -> Option<bool> {
//!         None
//!     }
//! }
//!
//! let validator = EventSpecValidator::new(Arc::new(OpenAccess), Arc::new(ContactsOnly));
//! let principal = SessionPrincipal::new(UserId::new("admin"), PrincipalKind::Admin);
//!
//! let definition = WebhookDefinition {
//!     event: Some("Contact.update".to_string()),
//!     ..Default::default()
//! };
//! assert!(validator.validate(&definition, &principal).is_ok());
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    access::{AccessControl, EntityRegistry, Principal},
    definition::WebhookDefinition,
    errors::ValidationError,
    event::{EventSpec, EventType},
};

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Entity type and event type a valid definition listens for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvent {
    /// Entity type after resolving the `Record` sentinel
    pub entity_type: String,

    /// Checked event type
    pub event_type: EventType,
}

/// Validates the trigger spec and owner of webhook definitions.
///
/// Stateless apart from the injected capabilities, so one validator can be
/// shared between requests and principals. Read access is checked for the
/// principal passed to each call.
pub struct EventSpecValidator {
    access_control: Arc<dyn AccessControl>,
    entity_registry: Arc<dyn EntityRegistry>,
}

impl EventSpecValidator {
    /// Create a new validator.
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
            access_control,
            entity_registry,
        }
    }

    /// Validate a definition before it is persisted.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first rule the definition
    /// breaks. See the module documentation for the order.
    pub fn validate(
        &self,
        definition: &WebhookDefinition,
        principal: &dyn Principal,
    ) -> Result<(), ValidationError> {
        self.resolve(definition, principal).map(|_| ())
    }

    /// Validate a definition and return the event it listens for.
    ///
    /// Runs exactly the checks of [`validate`](Self::validate).
    pub fn resolve(
        &self,
        definition: &WebhookDefinition,
        principal: &dyn Principal,
    ) -> Result<ResolvedEvent, ValidationError> {
        let result = self.check(definition, principal);

        match &result {
            Ok(resolved) => debug!(
                principal = %principal.id(),
                entity_type = %resolved.entity_type,
                event_type = %resolved.event_type,
                "Webhook definition accepted"
            ),
            Err(e) => warn!(
                principal = %principal.id(),
                kind = %e.kind(),
                "Webhook definition rejected: {}",
                e
            ),
        }

        result
    }

    fn check(
        &self,
        definition: &WebhookDefinition,
        principal: &dyn Principal,
    ) -> Result<ResolvedEvent, ValidationError> {
        self.check_owner(definition)?;

        let event = definition.event_str();
        if event.is_empty() {
            return Err(ValidationError::MissingEvent);
        }

        let spec = EventSpec::parse(event).ok_or_else(|| ValidationError::MalformedEvent {
            event: event.to_string(),
        })?;

        let entity_type = spec
            .target
            .resolve(definition.entity_type.as_deref())
            .ok_or(ValidationError::MissingEntityType)?;

        if !self.entity_registry.exists(entity_type) {
            return Err(ValidationError::UnknownEntityType {
                entity_type: entity_type.to_string(),
            });
        }

        if !self.access_control.can_read(principal, entity_type) {
            return Err(ValidationError::ForbiddenEntityType {
                entity_type: entity_type.to_string(),
            });
        }

        let event_type = spec
            .event_type()
            .ok_or_else(|| ValidationError::UnsupportedEventType {
                event_type: spec.action.to_string(),
            })?;

        if event_type.requires_field() {
            self.check_field(entity_type, definition.field_str())?;
        }

        Ok(ResolvedEvent {
            entity_type: entity_type.to_string(),
            event_type,
        })
    }

    /// The owner, when set, must be an existing API user.
    fn check_owner(&self, definition: &WebhookDefinition) -> Result<(), ValidationError> {
        let Some(user_id) = definition.owner() else {
            return Ok(());
        };

        match self.entity_registry.lookup_user_is_api(user_id) {
            Some(true) => Ok(()),
            Some(false) | None => Err(ValidationError::InvalidOwner {
                user_id: user_id.clone(),
            }),
        }
    }

    fn check_field(&self, entity_type: &str, field: &str) -> Result<(), ValidationError> {
        if field.is_empty() {
            return Err(ValidationError::MissingField {
                entity_type: entity_type.to_string(),
            });
        }

        if self
            .access_control
            .forbidden_fields(entity_type)
            .contains(field)
        {
            return Err(ValidationError::ForbiddenField {
                entity_type: entity_type.to_string(),
                field: field.to_string(),
            });
        }

        Ok(())
    }
}
