//! Error types emitted by the EatSafe CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use eatsafe_core::{DatabaseUrlError, SearchTermError, StoreError};
use thiserror::Error;

/// Errors emitted by the EatSafe CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag or positional name.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The configured connection string could not be used.
    #[error("invalid database URL: {0}")]
    DatabaseUrl(#[from] DatabaseUrlError),
    /// The search term was blank.
    #[error(transparent)]
    SearchTerm(#[from] SearchTermError),
    /// The facility store failed.
    #[error(transparent)]
    Store(Box<StoreError>),
    /// Installing the log subscriber failed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[source] tracing_subscriber::util::TryInitError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<StoreError> for CliError {
    fn from(source: StoreError) -> Self {
        Self::Store(Box::new(source))
    }
}
