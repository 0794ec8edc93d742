//! Error types for the SLT CLI

use crate::config::ConfigError;
use crate::session::SessionError;
use color_eyre::eyre::Report;
use slt_sdk::ApiError;
use std::fmt;
use thiserror::Error;

/// What a failed query was trying to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Usage,
    Account,
    Bill,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Usage => "usage",
            Resource::Account => "account",
            Resource::Bill => "bill",
        };
        f.write_str(name)
    }
}

/// CLI error type, converted to a printed message at the command boundary
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file issues
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Login state and precondition failures
    #[error(transparent)]
    Session(SessionError),

    /// A usage, profile or bill request failed
    #[error("Error fetching {resource} information!")]
    Fetch {
        resource: Resource,
        #[source]
        source: ApiError,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client")]
    Client(#[source] ApiError),

    /// Result could not be rendered as JSON
    #[error("Failed to render output")]
    Output(#[from] serde_json::Error),

    /// Everything else (using color-eyre's Report for rich errors)
    #[error(transparent)]
    Internal(#[from] Report),
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Config(config) => CliError::Config(config),
            other => CliError::Session(other),
        }
    }
}

impl CliError {
    pub fn fetch(resource: Resource) -> impl FnOnce(ApiError) -> Self {
        move |source| match source {
            ApiError::MissingEndpoint(endpoint) => {
                CliError::Config(ConfigError::missing_endpoint(endpoint))
            }
            source => CliError::Fetch { resource, source },
        }
    }

    /// Process exit status for this error.
    ///
    /// Only configuration problems and a refused login fail the process;
    /// guidance and fetch errors are reported and exit 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Session(SessionError::AlreadyLoggedIn | SessionError::LoginFailed(_)) => 1,
            CliError::Session(_) | CliError::Fetch { .. } => 0,
            CliError::Config(_) | CliError::Client(_) | CliError::Output(_) | CliError::Internal(_) => 1,
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
