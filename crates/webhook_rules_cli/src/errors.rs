use std::io;

use thiserror::Error;
use webhook_rules::PolicyError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the webhook rules CLI application.
///
/// A rejected webhook definition is not an error at this level; it is a
/// normal outcome of a command. These variants cover problems that prevent
/// the rules from running at all.
#[derive(Error, Debug)]
pub enum Error {
    /// The policy file could not be loaded.
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// The `--principal` user is not declared in the policy.
    ///
    /// The acting user must be known so that its account class and read
    /// scope can be determined.
    #[error("Unknown principal: {0}")]
    UnknownPrincipal(String),

    /// Failed to load an input file from the filesystem.
    #[error("Failed to load file '{path}'.")]
    LoadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// An input file is not valid webhook JSON.
    #[error("Failed to parse JSON file '{path}': {reason}")]
    ParseJson { path: String, reason: String },

    /// Failed to render the command output.
    #[error("Failed to render output: {0}")]
    Render(String),
}
