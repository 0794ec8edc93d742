//! Shared building blocks for the SLT portal client crates.

pub mod logging;

pub use logging::{init_cli_logging, init_logging};
