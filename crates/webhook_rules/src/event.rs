//! Webhook trigger events.
//!
//! A webhook declares the change it listens for with an event spec of the
//! form `"<EntityType>.<EventType>"`, for example `"Contact.update"` or
//! `"Account.fieldUpdate"`. The entity segment may be the sentinel
//! [`RECORD_SENTINEL`], in which case the entity type comes from the
//! definition's separate `entityType` attribute.
//!
//! Parsing is split in two so that the validator can report failures in a
//! fixed order: [`EventSpec::parse`] only checks the shape of the string,
//! while the action segment is checked against [`EventType`] later, after the
//! entity type has been resolved and authorized.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;

/// Entity segment meaning "the entity type named by `entityType`".
pub const RECORD_SENTINEL: &str = "Record";

/// Separator between the entity and action segments.
pub const EVENT_SEPARATOR: char = '.';

/// Record change that triggers a webhook.
///
/// Closed set. Matching is case sensitive: `"Update"` is not a supported
/// event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    /// A record was created
    Create,

    /// A record was updated
    Update,

    /// A record was deleted
    Delete,

    /// A specific field of a record changed. Requires a `field`.
    FieldUpdate,
}

impl EventType {
    /// Every supported event type, in declaration order.
    pub const ALL: [EventType; 4] = [
        EventType::Create,
        EventType::Update,
        EventType::Delete,
        EventType::FieldUpdate,
    ];

    /// Convert the event type to the action segment used in event specs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::FieldUpdate => "fieldUpdate",
        }
    }

    /// Look up an action segment.
    ///
    /// Returns `None` for anything outside the supported set.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == segment)
    }

    /// Returns true when the event watches a single field.
    pub fn requires_field(&self) -> bool {
        matches!(self, Self::FieldUpdate)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity segment of an event spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget<'a> {
    /// The `Record` sentinel, resolved through the definition's `entityType`.
    Record,

    /// A named entity type. May be empty when the spec starts with `.`.
    Named(&'a str),
}

impl<'a> EventTarget<'a> {
    /// Resolve the entity type this target refers to.
    ///
    /// `override_type` is the definition's `entityType` attribute; it is only
    /// consulted for the `Record` sentinel. Returns `None` when the resolved
    /// entity type is missing or empty.
    pub fn resolve(&self, override_type: Option<&'a str>) -> Option<&'a str> {
        let entity_type = match self {
            Self::Record => override_type?,
            Self::Named(name) => *name,
        };

        if entity_type.is_empty() {
            None
        } else {
            Some(entity_type)
        }
    }
}

/// Event spec split into its two segments.
///
/// The action segment is kept as raw text. Use [`EventSpec::event_type`] to
/// check it against the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpec<'a> {
    /// Entity segment
    pub target: EventTarget<'a>,

    /// Action segment, unchecked
    pub action: &'a str,
}

impl<'a> EventSpec<'a> {
    /// Split an event spec on its separator.
    ///
    /// Returns `None` unless the string contains exactly one `.`. Empty
    /// segments are accepted here and rejected by later checks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use webhook_rules::{EventSpec, EventTarget};
    ///
    /// let spec = EventSpec::parse("Contact.update").unwrap();
    /// assert_eq!(spec.target, EventTarget::Named("Contact"));
    /// assert_eq!(spec.action, "update");
    ///
    /// assert!(EventSpec::parse("Contact").is_none());
    /// assert!(EventSpec::parse("Contact.update.extra").is_none());
    /// ```
    pub fn parse(event: &'a str) -> Option<Self> {
        let mut segments = event.split(EVENT_SEPARATOR);
        let entity = segments.next()?;
        let action = segments.next()?;
        if segments.next().is_some() {
            return None;
        }

        let target = if entity == RECORD_SENTINEL {
            EventTarget::Record
        } else {
            EventTarget::Named(entity)
        };

        Some(Self { target, action })
    }

    /// Check the action segment against the supported event types.
    pub fn event_type(&self) -> Option<EventType> {
        EventType::from_segment(self.action)
    }
}
