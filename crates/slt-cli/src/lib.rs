//! # SLT CLI
//!
//! Command-line client for the SLT self-care portal.
//!
//! One positional action per invocation (`login`, `usage`, `account`,
//! `bill`, `logout`). Credentials, portal URLs and the cached session all
//! live in a single JSON config document behind [`config::ConfigStore`].
//!
//! ## Architecture
//!
//! - Clap-based argument parsing with derive macros
//! - Handler-based command processing
//! - [`session::SessionManager`] owns the login lifecycle and its guards
//! - HTTP access goes through the `slt-sdk` [`slt_sdk::PortalApi`] trait

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod session;

#[cfg(test)]
mod testing;

pub use cli::*;
pub use error::*;
