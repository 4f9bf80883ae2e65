//! Command modules for the webhook rules CLI.
//!
//! - `lifecycle_cmd`: run the create/update rules against a policy file

pub mod lifecycle_cmd;
