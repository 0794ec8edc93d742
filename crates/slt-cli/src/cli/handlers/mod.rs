//! Command handlers for the SLT CLI

pub mod auth;
pub mod queries;
