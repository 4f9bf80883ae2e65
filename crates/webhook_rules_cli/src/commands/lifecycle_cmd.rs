//! Create and update commands.
//!
//! Both commands load a policy file, resolve the acting principal from it,
//! and run the webhook record lifecycle on JSON input. The outcome is either
//! the definition the host would persist or the rejection it would report.

use std::{fs, path::Path, sync::Arc};

use clap::Args;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};
use webhook_rules::{
    PolicyAccessControl, PolicyConfig, SessionPrincipal, UserId, ValidationError,
    WebhookDefinition, WebhookInput, WebhookRecordService,
};

use crate::errors::Error;

#[cfg(test)]
#[path = "lifecycle_cmd_tests.rs"]
mod tests;

/// Exit code for an accepted definition
pub const EXIT_ACCEPTED: i32 = 0;

/// Exit code for a rejected definition
pub const EXIT_REJECTED: i32 = 1;

/// Exit code for configuration or I/O failures
pub const EXIT_ERROR: i32 = 2;

/// Arguments for the create command
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Path to the policy TOML file
    #[arg(long)]
    pub policy: String,

    /// Id of the acting user, as declared in the policy
    #[arg(long)]
    pub principal: String,

    /// Path to the create input JSON file
    #[arg(long)]
    pub input: String,
}

/// Arguments for the update command
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Path to the policy TOML file
    #[arg(long)]
    pub policy: String,

    /// Id of the acting user, as declared in the policy
    #[arg(long)]
    pub principal: String,

    /// Path to the stored webhook definition JSON file
    #[arg(long)]
    pub existing: String,

    /// Path to the update patch JSON file
    #[arg(long)]
    pub input: String,
}

/// Result of running the lifecycle on a definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The definition the host would persist
    Accepted(WebhookDefinition),

    /// The rejection the host would report
    Rejected(ValidationError),
}

impl Outcome {
    /// Render the outcome as pretty JSON.
    ///
    /// Accepted definitions render as the record; rejections render as the
    /// error response body.
    pub fn to_json(&self) -> Result<String, Error> {
        let rendered = match self {
            Self::Accepted(definition) => serde_json::to_string_pretty(definition),
            Self::Rejected(error) => serde_json::to_string_pretty(&error.to_response()),
        };
        rendered.map_err(|e| Error::Render(e.to_string()))
    }

    /// Returns true when the definition was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.is_accepted() {
            EXIT_ACCEPTED
        } else {
            EXIT_REJECTED
        }
    }
}

/// Map a command result to the process exit code.
pub fn exit_code(result: &Result<Outcome, Error>) -> i32 {
    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(_) => EXIT_ERROR,
    }
}

/// Print the outcome of a command and return the process exit code.
///
/// Accepted records and error responses go to stdout. Failures to run the
/// command are logged and exit with [`EXIT_ERROR`].
pub fn report(result: Result<Outcome, Error>) -> i32 {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Error: {e}");
            return EXIT_ERROR;
        }
    };

    match outcome.to_json() {
        Ok(json) => {
            println!("{json}");
            outcome.exit_code()
        }
        Err(e) => {
            error!("Error: {e}");
            EXIT_ERROR
        }
    }
}

impl From<Result<WebhookDefinition, ValidationError>> for Outcome {
    fn from(result: Result<WebhookDefinition, ValidationError>) -> Self {
        match result {
            Ok(definition) => Self::Accepted(definition),
            Err(error) => Self::Rejected(error),
        }
    }
}

/// Execute the create command
#[instrument(skip_all, fields(principal = %args.principal))]
pub fn execute_create(args: &CreateArgs) -> Result<Outcome, Error> {
    let (service, principal) = load_service(&args.policy, &args.principal)?;
    let input: WebhookInput = read_json(&args.input)?;

    let outcome: Outcome = service.create(input, &principal).into();
    info!(accepted = outcome.is_accepted(), "Create checked");
    Ok(outcome)
}

/// Execute the update command
#[instrument(skip_all, fields(principal = %args.principal))]
pub fn execute_update(args: &UpdateArgs) -> Result<Outcome, Error> {
    let (service, principal) = load_service(&args.policy, &args.principal)?;
    let existing: WebhookDefinition = read_json(&args.existing)?;
    let patch: WebhookInput = read_json(&args.input)?;

    let outcome: Outcome = service.update(&existing, patch, &principal).into();
    info!(accepted = outcome.is_accepted(), "Update checked");
    Ok(outcome)
}

/// Load the policy, build the service and resolve the acting principal.
fn load_service(
    policy_path: &str,
    principal_id: &str,
) -> Result<(WebhookRecordService, SessionPrincipal), Error> {
    let policy = Arc::new(PolicyConfig::load(Path::new(policy_path))?);

    let principal = policy
        .principal(&UserId::new(principal_id))
        .ok_or_else(|| Error::UnknownPrincipal(principal_id.to_string()))?;
    debug!(kind = principal.kind().as_str(), "Resolved acting principal");

    let access = Arc::new(PolicyAccessControl::new(policy.clone()));
    Ok((WebhookRecordService::new(access, policy), principal))
}

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Error> {
    debug!("Reading JSON input from {}", path);

    let content = fs::read_to_string(path).map_err(|e| Error::LoadFile {
        path: path.to_string(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| Error::ParseJson {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
