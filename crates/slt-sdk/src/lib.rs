//! # SLT portal SDK
//!
//! Typed client for the SLT customer self-care portal: credential exchange,
//! account lookup, and usage, profile and billing queries. Each query can
//! return the decoded body untouched or a small projected summary.

pub mod client;
pub mod error;
pub mod headers;
pub mod types;

pub use client::{ClientBuilder, Endpoints, PortalApi, PortalClient};
pub use error::{ApiError, Result};
pub use reqwest::StatusCode;
pub use types::{
    AccessToken, AccountDetails, BillingSummary, Bundle, Endpoint, Payload, ProfileSummary,
    UsageSummary,
};
