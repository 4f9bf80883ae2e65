//! Tests for webhook definition and input merging.

use super::*;

fn full_input() -> WebhookInput {
    WebhookInput {
        user_id: Some(UserId::new("api-1")),
        user_name: Some("integration".to_string()),
        event: Some("Contact.fieldUpdate".to_string()),
        entity_type: Some("Contact".to_string()),
        field: Some("emailAddress".to_string()),
        url: Some("https://hooks.example.com/a".to_string()),
        is_active: Some(false),
    }
}

#[test]
fn test_default_definition_is_active() {
    let definition = WebhookDefinition::default();
    assert!(definition.is_active);
    assert!(definition.event.is_none());
    assert!(definition.user_id.is_none());
}

#[test]
fn test_from_input_copies_every_attribute() {
    let definition = WebhookDefinition::from_input(full_input());

    assert_eq!(definition.user_id, Some(UserId::new("api-1")));
    assert_eq!(definition.user_name.as_deref(), Some("integration"));
    assert_eq!(definition.event.as_deref(), Some("Contact.fieldUpdate"));
    assert_eq!(definition.entity_type.as_deref(), Some("Contact"));
    assert_eq!(definition.field.as_deref(), Some("emailAddress"));
    assert_eq!(definition.url.as_deref(), Some("https://hooks.example.com/a"));
    assert!(!definition.is_active);
}

#[test]
fn test_merge_leaves_absent_attributes_untouched() {
    let mut definition = WebhookDefinition::from_input(full_input());

    definition.merge(WebhookInput {
        url: Some("https://hooks.example.com/b".to_string()),
        ..Default::default()
    });

    assert_eq!(definition.url.as_deref(), Some("https://hooks.example.com/b"));
    assert_eq!(definition.event.as_deref(), Some("Contact.fieldUpdate"));
    assert_eq!(definition.field.as_deref(), Some("emailAddress"));
    assert!(!definition.is_active);
}

#[test]
fn test_owner_treats_empty_id_as_unset() {
    let mut definition = WebhookDefinition::default();
    assert!(definition.owner().is_none());

    definition.user_id = Some(UserId::new(""));
    assert!(definition.owner().is_none());

    definition.user_id = Some(UserId::new("api-1"));
    assert_eq!(definition.owner().map(UserId::as_str), Some("api-1"));
}

#[test]
fn test_string_accessors_default_to_empty() {
    let definition = WebhookDefinition::default();
    assert_eq!(definition.event_str(), "");
    assert_eq!(definition.field_str(), "");
}

#[test]
fn test_strip_trigger_spec() {
    let mut input = full_input();

    let removed = input.strip_trigger_spec();

    assert_eq!(removed, vec!["event", "entityType", "field"]);
    assert!(input.event.is_none());
    assert!(input.entity_type.is_none());
    assert!(input.field.is_none());
    assert!(input.url.is_some());
    assert!(input.user_id.is_some());
}

#[test]
fn test_strip_admin_only() {
    let mut input = full_input();

    let removed = input.strip_admin_only();

    assert_eq!(removed, vec!["userId", "userName"]);
    assert!(input.user_id.is_none());
    assert!(input.user_name.is_none());
    assert!(input.event.is_some());
}

#[test]
fn test_strip_reports_only_present_attributes() {
    let mut input = WebhookInput {
        field: Some("name".to_string()),
        ..Default::default()
    };
    assert_eq!(input.strip_trigger_spec(), vec!["field"]);
    assert!(input.strip_admin_only().is_empty());
}

#[test]
fn test_definition_json_uses_camel_case() {
    let json = r#"{
        "event": "Record.update",
        "entityType": "Account",
        "userId": "api-1",
        "url": "https://hooks.example.com/acc"
    }"#;

    let definition: WebhookDefinition = serde_json::from_str(json).unwrap();

    assert_eq!(definition.event.as_deref(), Some("Record.update"));
    assert_eq!(definition.entity_type.as_deref(), Some("Account"));
    assert_eq!(definition.user_id, Some(UserId::new("api-1")));
    assert!(definition.is_active, "isActive defaults to true");

    let value = serde_json::to_value(&definition).unwrap();
    assert_eq!(value["entityType"], "Account");
    assert_eq!(value["isActive"], true);
    assert!(value.get("field").is_none());
}

#[test]
fn test_input_json_distinguishes_absent_attributes() {
    let input: WebhookInput = serde_json::from_str(r#"{"isActive": false}"#).unwrap();
    assert_eq!(input.is_active, Some(false));
    assert!(input.event.is_none());
}
