//! Error types for the portal client

use crate::types::Endpoint;
use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by [`crate::PortalClient`]
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, TLS, timeout)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The portal answered with anything other than 200 OK
    #[error("Request to {endpoint} failed with status {status}")]
    Remote {
        endpoint: Endpoint,
        status: StatusCode,
    },

    /// The body was not the JSON shape the endpoint is known to return
    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    /// A required field was absent, null or empty
    #[error("Missing field in {endpoint} response: {field}")]
    MissingField {
        endpoint: Endpoint,
        field: &'static str,
    },

    /// No URL is configured for the endpoint; nothing was sent
    #[error("No URL configured for {0}")]
    MissingEndpoint(Endpoint),

    /// A header value could not be encoded
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl ApiError {
    /// HTTP status carried by a remote failure, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::HttpClient(e) => e.status(),
            _ => None,
        }
    }
}
