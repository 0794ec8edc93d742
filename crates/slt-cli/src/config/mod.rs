//! Persisted configuration document
//!
//! The document has three sections:
//!
//! ```json
//! {
//!     "server": { "loginUrl": "...", "AccountDetailsUrl": "...", ... },
//!     "authentication": { "username": "...", "password": "...", "authorization_header": "bearer ..." },
//!     "account": { "accountno": "...", "telephone": "...", "subscriberID": "..." }
//! }
//! ```
//!
//! `authorization_header` and the `account` keys are written by the session
//! layer; everything else is edited by the user. Unknown keys are kept.

mod store;

pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore, EXAMPLE_CONFIG};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use slt_sdk::{Endpoint, Endpoints};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const AUTHORIZATION_HEADER: &str = "authorization_header";
pub const ACCOUNT_NO: &str = "accountno";
pub const TELEPHONE: &str = "telephone";
pub const SUBSCRIBER_ID: &str = "subscriberID";

/// Error type for configuration file operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config existed; the template was copied into place
    #[error("{} not found! Copying the example config.\nConfig copied! Update the credentials before using.", .path.display())]
    Missing { path: PathBuf },

    /// The file exists but is not a well-formed document
    #[error("Config at {} is not valid: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required entry is absent or not a string
    #[error("Config is missing \"{section}.{key}\"")]
    MissingKey { section: Section, key: &'static str },

    /// The platform config directory could not be determined
    #[error("Could not determine the config directory: {0}")]
    NoConfigDir(String),

    /// A file system I/O error occurred
    #[error("I/O error accessing config at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialized
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConfigError {
    /// The `server` entry for `endpoint` is absent
    pub fn missing_endpoint(endpoint: Endpoint) -> Self {
        ConfigError::MissingKey {
            section: Section::Server,
            key: endpoint.config_key(),
        }
    }
}

/// Top-level sections of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Server,
    Authentication,
    Account,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Server => "server",
            Section::Authentication => "authentication",
            Section::Account => "account",
        };
        f.write_str(name)
    }
}

/// Username and password from the `authentication` section
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The whole configuration document, read and written as one unit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    server: Map<String, Value>,
    #[serde(default)]
    authentication: Map<String, Value>,
    #[serde(default)]
    account: Map<String, Value>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

impl Document {
    pub fn section(&self, section: Section) -> &Map<String, Value> {
        match section {
            Section::Server => &self.server,
            Section::Authentication => &self.authentication,
            Section::Account => &self.account,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Map<String, Value> {
        match section {
            Section::Server => &mut self.server,
            Section::Authentication => &mut self.authentication,
            Section::Account => &mut self.account,
        }
    }

    /// `document[section][key] = value`
    pub fn set(&mut self, section: Section, key: &str, value: impl Into<Value>) {
        self.section_mut(section).insert(key.to_string(), value.into());
    }

    /// Delete `document[section][key]`; absent keys are ignored
    pub fn remove(&mut self, section: Section, key: &str) -> Option<Value> {
        self.section_mut(section).shift_remove(key)
    }

    pub fn contains(&self, section: Section, key: &str) -> bool {
        self.section(section).contains_key(key)
    }

    /// String value of `document[section][key]`
    pub fn get_str(&self, section: Section, key: &str) -> Option<&str> {
        self.section(section).get(key).and_then(Value::as_str)
    }

    fn require_str(&self, section: Section, key: &'static str) -> Result<&str, ConfigError> {
        self.get_str(section, key)
            .ok_or(ConfigError::MissingKey { section, key })
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials {
            username: self.require_str(Section::Authentication, USERNAME)?.to_string(),
            password: self.require_str(Section::Authentication, PASSWORD)?.to_string(),
        })
    }

    /// Endpoint URLs from the `server` section.
    ///
    /// Absent URLs stay unset and only fail the call that needs them.
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::from_fn(|endpoint: Endpoint| {
            self.get_str(Section::Server, endpoint.config_key())
                .map(str::to_string)
        })
    }
}
