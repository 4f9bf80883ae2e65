//! Webhook rule error types.
//!
//! Two families of errors live here:
//! - [`ValidationError`] - a submitted webhook definition was rejected
//! - [`PolicyError`] - a policy file could not be loaded
//!
//! Every `ValidationError` is caller-facing. The host aborts the create or
//! update transaction and reports the error as an authorization failure
//! (HTTP 403) with the reason string carried by the variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifiers::UserId;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Status code a web host should use when reporting a [`ValidationError`].
pub const FORBIDDEN_STATUS: u16 = 403;

/// Rejection of a webhook definition.
///
/// Validation is fail-fast, so a rejected definition produces exactly one
/// error: the first rule it broke. No variant is transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `userId` references a missing user or a user that is not API-class.
    #[error("User must be an API User.")]
    InvalidOwner { user_id: UserId },

    /// `event` is missing or empty.
    #[error("Event is empty.")]
    MissingEvent,

    /// `event` does not split into exactly two `.`-separated segments.
    #[error("Not supported event.")]
    MalformedEvent { event: String },

    /// The event targets `Record` but no `entityType` was given, or the
    /// entity segment itself is empty.
    #[error("Entity Type is empty.")]
    MissingEntityType,

    /// The resolved entity type is not known to the host.
    #[error("Not existing Entity Type.")]
    UnknownEntityType { entity_type: String },

    /// The acting principal may not read the resolved entity type.
    #[error("Entity Type is forbidden.")]
    ForbiddenEntityType { entity_type: String },

    /// The event segment is not create, update, delete or fieldUpdate.
    #[error("Not supported event.")]
    UnsupportedEventType { event_type: String },

    /// A `fieldUpdate` event without a `field`.
    #[error("Field is empty.")]
    MissingField { entity_type: String },

    /// The `field` of a `fieldUpdate` event is hidden by policy.
    #[error("Field is forbidden.")]
    ForbiddenField { entity_type: String, field: String },
}

impl ValidationError {
    /// Get the kind tag of this error.
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::InvalidOwner { .. } => ValidationErrorKind::InvalidOwner,
            Self::MissingEvent => ValidationErrorKind::MissingEvent,
            Self::MalformedEvent { .. } => ValidationErrorKind::MalformedEvent,
            Self::MissingEntityType => ValidationErrorKind::MissingEntityType,
            Self::UnknownEntityType { .. } => ValidationErrorKind::UnknownEntityType,
            Self::ForbiddenEntityType { .. } => ValidationErrorKind::ForbiddenEntityType,
            Self::UnsupportedEventType { .. } => ValidationErrorKind::UnsupportedEventType,
            Self::MissingField { .. } => ValidationErrorKind::MissingField,
            Self::ForbiddenField { .. } => ValidationErrorKind::ForbiddenField,
        }
    }

    /// HTTP status a web host should answer with.
    ///
    /// All rejections are reported as forbidden, matching how the record
    /// service treats invalid definitions and unauthorized principals alike.
    pub fn status_code(&self) -> u16 {
        FORBIDDEN_STATUS
    }

    /// Build the error body returned to the client.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetails {
                code: self.kind().as_str().to_string(),
                message: self.to_string(),
            },
        }
    }
}

/// Kind tag of a [`ValidationError`], without the offending values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    InvalidOwner,
    MissingEvent,
    MalformedEvent,
    MissingEntityType,
    UnknownEntityType,
    ForbiddenEntityType,
    UnsupportedEventType,
    MissingField,
    ForbiddenField,
}

impl ValidationErrorKind {
    /// Machine-readable code used in error responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidOwner => "InvalidOwner",
            Self::MissingEvent => "MissingEvent",
            Self::MalformedEvent => "MalformedEvent",
            Self::MissingEntityType => "MissingEntityType",
            Self::UnknownEntityType => "UnknownEntityType",
            Self::ForbiddenEntityType => "ForbiddenEntityType",
            Self::UnsupportedEventType => "UnsupportedEventType",
            Self::MissingField => "MissingField",
            Self::ForbiddenField => "ForbiddenField",
        }
    }
}

impl std::fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error body for a rejected definition.
///
/// Serializes as `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetails,
}

/// Error details structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable reason
    pub message: String,
}

/// Policy loading errors.
///
/// Returned when a policy file is missing, unreadable, malformed, or
/// internally inconsistent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("Policy file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to access policy file: {path} - {reason}")]
    FileAccess { path: String, reason: String },

    #[error("Failed to parse policy: {reason}")]
    Parse { reason: String },

    #[error("Invalid policy: {field} - {reason}")]
    InvalidPolicy { field: String, reason: String },
}

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;
