//! # Webhook Rules
//!
//! Business rules for webhook definition records in a CRM record service.
//!
//! A webhook definition declares which change on which entity type should
//! notify an external endpoint, using an event spec such as `"Contact.update"`
//! or `"Record.fieldUpdate"`. Before the host persists a definition this
//! crate:
//!
//! 1. Drops attributes the acting user may not set
//! 2. Defaults the owner of new definitions created by API users
//! 3. Validates the event spec and owner, failing on the first broken rule
//!
//! Delivery of webhook notifications is not part of this crate.
//!
//! ## Main Types
//!
//! - [`WebhookRecordService`] - create/update lifecycle entry points
//! - [`EventSpecValidator`] - the ordered validation rules
//! - [`WebhookDefinition`] / [`WebhookInput`] - record and client input
//! - [`ValidationError`] - rejection taxonomy, reported as HTTP 403
//!
//! ## Architecture
//!
//! The host's ACL engine and entity manager are injected as capability
//! traits rather than reimplemented:
//! - [`Principal`] - the acting user
//! - [`AccessControl`] - the acting user's read scope and forbidden fields
//! - [`EntityRegistry`] - known entity types and users
//!
//! [`PolicyConfig`] implements these from a TOML policy file for tools and
//! tests that run without a host.

pub mod access;
pub mod definition;
pub mod errors;
pub mod event;
pub mod identifiers;
pub mod policy;
pub mod service;
pub mod validator;

pub use access::{AccessControl, EntityRegistry, Principal, PrincipalKind, SessionPrincipal};
pub use definition::{WebhookDefinition, WebhookInput};
pub use errors::{
    ErrorDetails, ErrorResponse, PolicyError, PolicyResult, ValidationError, ValidationErrorKind,
    FORBIDDEN_STATUS,
};
pub use event::{EventSpec, EventTarget, EventType, RECORD_SENTINEL};
pub use identifiers::UserId;
pub use policy::{EntityTypePolicy, PolicyAccessControl, PolicyConfig, ReadAccess, UserRecord};
pub use service::WebhookRecordService;
pub use validator::{EventSpecValidator, ResolvedEvent};
