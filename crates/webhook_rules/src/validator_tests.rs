//! Tests for event spec validation.

use super::*;
use crate::{
    access::{PrincipalKind, SessionPrincipal},
    errors::ValidationErrorKind,
    identifiers::UserId,
};
use std::collections::{HashMap, HashSet};
use tracing_test::traced_test;

/// Mock access control for testing.
struct MockAccessControl {
    readable: HashSet<String>,
    forbidden_fields: HashMap<String, HashSet<String>>,
}

impl MockAccessControl {
    fn reads(entity_types: &[&str]) -> Self {
        Self {
            readable: entity_types.iter().map(|t| t.to_string()).collect(),
            forbidden_fields: HashMap::new(),
        }
    }

    fn with_forbidden_field(mut self, entity_type: &str, field: &str) -> Self {
        self.forbidden_fields
            .entry(entity_type.to_string())
            .or_default()
            .insert(field.to_string());
        self
    }
}

impl AccessControl for MockAccessControl {
    fn can_read(&self, _principal: &dyn Principal, entity_type: &str) -> bool {
        self.readable.contains(entity_type)
    }

    fn forbidden_fields(&self, entity_type: &str) -> HashSet<String> {
        self.forbidden_fields
            .get(entity_type)
            .cloned()
            .unwrap_or_default()
    }
}

/// Mock entity registry for testing.
struct MockEntityRegistry {
    entity_types: HashSet<String>,
    users: HashMap<UserId, bool>,
}

impl MockEntityRegistry {
    fn knows(entity_types: &[&str]) -> Self {
        Self {
            entity_types: entity_types.iter().map(|t| t.to_string()).collect(),
            users: HashMap::new(),
        }
    }

    fn with_user(mut self, id: &str, is_api: bool) -> Self {
        self.users.insert(UserId::new(id), is_api);
        self
    }
}

impl EntityRegistry for MockEntityRegistry {
    fn exists(&self, entity_type: &str) -> bool {
        self.entity_types.contains(entity_type)
    }

    fn lookup_user_is_api(&self, user_id: &UserId) -> Option<bool> {
        self.users.get(user_id).copied()
    }
}

fn validator(access: MockAccessControl, registry: MockEntityRegistry) -> EventSpecValidator {
    EventSpecValidator::new(Arc::new(access), Arc::new(registry))
}

/// Validator where Contact and Account exist and are readable, and
/// Contact.restrictedField is forbidden.
fn crm_validator() -> EventSpecValidator {
    validator(
        MockAccessControl::reads(&["Contact", "Account"])
            .with_forbidden_field("Contact", "restrictedField"),
        MockEntityRegistry::knows(&["Contact", "Account", "Opportunity"])
            .with_user("api-1", true)
            .with_user("human-1", false),
    )
}

fn admin() -> SessionPrincipal {
    SessionPrincipal::new(UserId::new("admin-1"), PrincipalKind::Admin)
}

fn definition(event: &str) -> WebhookDefinition {
    WebhookDefinition {
        event: Some(event.to_string()),
        ..Default::default()
    }
}

fn rejection(validator: &EventSpecValidator, definition: &WebhookDefinition) -> ValidationErrorKind {
    validator
        .validate(definition, &admin())
        .expect_err("definition should be rejected")
        .kind()
}

// ============================================================================
// Accepted definitions
// ============================================================================

/// Test that every supported event type is accepted on a readable entity.
#[test]
fn test_accepts_supported_event_types() {
    let validator = crm_validator();

    for event in ["Contact.create", "Contact.update", "Contact.delete"] {
        assert!(
            validator.validate(&definition(event), &admin()).is_ok(),
            "{} should be accepted",
            event
        );
    }
}

/// Test that the Record sentinel resolves through entityType.
#[test]
fn test_record_sentinel_resolves_entity_type() {
    let validator = crm_validator();
    let mut definition = definition("Record.update");
    definition.entity_type = Some("Contact".to_string());

    let resolved = validator.resolve(&definition, &admin()).unwrap();

    assert_eq!(resolved.entity_type, "Contact");
    assert_eq!(resolved.event_type, EventType::Update);
}

/// Test that entityType is ignored when the event names an entity type.
#[test]
fn test_entity_type_override_ignored_for_named_event() {
    let validator = crm_validator();
    let mut definition = definition("Account.delete");
    definition.entity_type = Some("Widget".to_string());

    let resolved = validator.resolve(&definition, &admin()).unwrap();
    assert_eq!(resolved.entity_type, "Account");
}

/// Test that a permitted field update is accepted.
#[test]
fn test_accepts_permitted_field_update() {
    let validator = crm_validator();
    let mut definition = definition("Contact.fieldUpdate");
    definition.field = Some("emailAddress".to_string());

    let resolved = validator.resolve(&definition, &admin()).unwrap();
    assert_eq!(resolved.event_type, EventType::FieldUpdate);
}

/// Test that an API owner is accepted.
#[test]
fn test_accepts_api_owner() {
    let validator = crm_validator();
    let mut definition = definition("Contact.create");
    definition.user_id = Some(UserId::new("api-1"));

    assert!(validator.validate(&definition, &admin()).is_ok());
}

/// Test that an empty owner id is treated as unset.
#[test]
fn test_empty_owner_is_skipped() {
    let validator = crm_validator();
    let mut definition = definition("Contact.create");
    definition.user_id = Some(UserId::new(""));

    assert!(validator.validate(&definition, &admin()).is_ok());
}

/// Test that field is not required for other event types.
#[test]
fn test_field_ignored_for_non_field_events() {
    let validator = crm_validator();
    let mut definition = definition("Contact.update");
    definition.field = Some("restrictedField".to_string());

    assert!(validator.validate(&definition, &admin()).is_ok());
}

// ============================================================================
// Owner checks
// ============================================================================

/// Test that a non-API owner is rejected.
#[test]
fn test_rejects_non_api_owner() {
    let validator = crm_validator();
    let mut definition = definition("Contact.create");
    definition.user_id = Some(UserId::new("human-1"));

    let error = validator.validate(&definition, &admin()).unwrap_err();
    assert_eq!(
        error,
        ValidationError::InvalidOwner {
            user_id: UserId::new("human-1")
        }
    );
}

/// Test that a missing owner is rejected.
#[test]
fn test_rejects_unknown_owner() {
    let validator = crm_validator();
    let mut definition = definition("Contact.create");
    definition.user_id = Some(UserId::new("ghost"));

    assert_eq!(
        rejection(&validator, &definition),
        ValidationErrorKind::InvalidOwner
    );
}

/// Test that the owner is checked before the event.
#[test]
fn test_owner_checked_first() {
    let validator = crm_validator();
    let definition = WebhookDefinition {
        user_id: Some(UserId::new("human-1")),
        ..Default::default()
    };

    assert_eq!(
        rejection(&validator, &definition),
        ValidationErrorKind::InvalidOwner
    );
}

// ============================================================================
// Event shape
// ============================================================================

#[test]
fn test_rejects_missing_event() {
    let validator = crm_validator();

    assert_eq!(
        rejection(&validator, &WebhookDefinition::default()),
        ValidationErrorKind::MissingEvent
    );
    assert_eq!(
        rejection(&validator, &definition("")),
        ValidationErrorKind::MissingEvent
    );
}

/// Test that any event without exactly one separator is malformed.
#[test]
fn test_rejects_wrong_separator_count() {
    let validator = crm_validator();

    for event in [
        "Contact",
        "Contactupdate",
        "Contact.update.extra",
        "Contact..update",
        "..",
        "a.b.c.d",
    ] {
        let error = validator.validate(&definition(event), &admin()).unwrap_err();
        assert_eq!(
            error,
            ValidationError::MalformedEvent {
                event: event.to_string()
            },
            "event '{}'",
            event
        );
    }
}

// ============================================================================
// Entity type resolution
// ============================================================================

/// Test that Record without entityType is rejected as a missing entity type.
#[test]
fn test_record_without_entity_type() {
    let validator = crm_validator();

    assert_eq!(
        rejection(&validator, &definition("Record.update")),
        ValidationErrorKind::MissingEntityType
    );

    let mut empty_override = definition("Record.update");
    empty_override.entity_type = Some(String::new());
    assert_eq!(
        rejection(&validator, &empty_override),
        ValidationErrorKind::MissingEntityType
    );
}

#[test]
fn test_empty_entity_segment() {
    let validator = crm_validator();

    assert_eq!(
        rejection(&validator, &definition(".update")),
        ValidationErrorKind::MissingEntityType
    );
}

/// Test that an unknown entity type is rejected.
#[test]
fn test_rejects_unknown_entity_type() {
    let validator = validator(
        MockAccessControl::reads(&["Contact"]),
        MockEntityRegistry::knows(&[]),
    );

    let error = validator
        .validate(&definition("Contact.delete"), &admin())
        .unwrap_err();
    assert_eq!(
        error,
        ValidationError::UnknownEntityType {
            entity_type: "Contact".to_string()
        }
    );
}

/// Test that an unreadable entity type is rejected.
#[test]
fn test_rejects_unreadable_entity_type() {
    let validator = crm_validator();

    assert_eq!(
        rejection(&validator, &definition("Opportunity.create")),
        ValidationErrorKind::ForbiddenEntityType
    );
}

/// Test that Record.update succeeds only when Contact is known and readable.
#[test]
fn test_record_update_depends_on_resolved_entity() {
    let mut definition = definition("Record.update");
    definition.entity_type = Some("Contact".to_string());

    let known_readable = validator(
        MockAccessControl::reads(&["Contact"]),
        MockEntityRegistry::knows(&["Contact"]),
    );
    assert!(known_readable.validate(&definition, &admin()).is_ok());

    let unknown = validator(
        MockAccessControl::reads(&["Contact"]),
        MockEntityRegistry::knows(&["Account"]),
    );
    assert_eq!(
        rejection(&unknown, &definition),
        ValidationErrorKind::UnknownEntityType
    );

    let unreadable = validator(
        MockAccessControl::reads(&[]),
        MockEntityRegistry::knows(&["Contact"]),
    );
    assert_eq!(
        rejection(&unreadable, &definition),
        ValidationErrorKind::ForbiddenEntityType
    );
}

// ============================================================================
// Event type
// ============================================================================

#[test]
fn test_rejects_unsupported_event_type() {
    let validator = crm_validator();

    let error = validator
        .validate(&definition("Contact.archive"), &admin())
        .unwrap_err();
    assert_eq!(
        error,
        ValidationError::UnsupportedEventType {
            event_type: "archive".to_string()
        }
    );

    assert_eq!(
        rejection(&validator, &definition("Contact.Update")),
        ValidationErrorKind::UnsupportedEventType
    );
    assert_eq!(
        rejection(&validator, &definition("Contact.")),
        ValidationErrorKind::UnsupportedEventType
    );
}

/// Test that the entity type is checked before the event type.
#[test]
fn test_entity_checked_before_event_type() {
    let validator = crm_validator();

    assert_eq!(
        rejection(&validator, &definition("Widget.archive")),
        ValidationErrorKind::UnknownEntityType
    );
    assert_eq!(
        rejection(&validator, &definition("Opportunity.archive")),
        ValidationErrorKind::ForbiddenEntityType
    );
}

// ============================================================================
// Field updates
// ============================================================================

#[test]
fn test_field_update_requires_field() {
    let validator = crm_validator();

    assert_eq!(
        rejection(&validator, &definition("Contact.fieldUpdate")),
        ValidationErrorKind::MissingField
    );

    let mut empty_field = definition("Contact.fieldUpdate");
    empty_field.field = Some(String::new());
    assert_eq!(
        rejection(&validator, &empty_field),
        ValidationErrorKind::MissingField
    );
}

#[test]
fn test_field_update_rejects_forbidden_field() {
    let validator = crm_validator();
    let mut definition = definition("Contact.fieldUpdate");
    definition.field = Some("restrictedField".to_string());

    let error = validator.validate(&definition, &admin()).unwrap_err();
    assert_eq!(
        error,
        ValidationError::ForbiddenField {
            entity_type: "Contact".to_string(),
            field: "restrictedField".to_string(),
        }
    );
}

/// Test that forbidden fields are looked up on the resolved entity type.
#[test]
fn test_forbidden_field_uses_resolved_entity_type() {
    let validator = crm_validator();

    let mut on_contact = definition("Record.fieldUpdate");
    on_contact.entity_type = Some("Contact".to_string());
    on_contact.field = Some("restrictedField".to_string());
    assert_eq!(
        rejection(&validator, &on_contact),
        ValidationErrorKind::ForbiddenField
    );

    let mut on_account = on_contact.clone();
    on_account.entity_type = Some("Account".to_string());
    assert!(validator.validate(&on_account, &admin()).is_ok());
}

// ============================================================================
// Logging
// ============================================================================

#[traced_test]
#[test]
fn test_rejection_is_logged_with_kind() {
    let validator = crm_validator();

    let _ = validator.validate(&definition("Contact"), &admin());

    assert!(logs_contain("Webhook definition rejected"));
    assert!(logs_contain("MalformedEvent"));
}
