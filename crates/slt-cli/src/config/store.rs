//! Loading and saving the configuration document

use super::{ConfigError, Document, Section};
use async_trait::async_trait;
use etcetera::{choose_base_strategy, BaseStrategy};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Template written on first run; its credentials are placeholders
pub const EXAMPLE_CONFIG: &str = include_str!("../../config/example_config.json");

/// Backing storage for the configuration document.
///
/// Every mutation is a whole-document read-modify-write: load, change one
/// or more keys in memory, write everything back.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self) -> Result<Document, ConfigError>;

    /// Overwrite the stored document with `document`
    async fn save(&self, document: &Document) -> Result<(), ConfigError>;

    /// Load, apply `mutate`, save. Returns the document as written.
    async fn update<F>(&self, mutate: F) -> Result<Document, ConfigError>
    where
        F: FnOnce(&mut Document) + Send,
    {
        let mut document = self.load().await?;
        mutate(&mut document);
        self.save(&document).await?;
        Ok(document)
    }

    async fn set(&self, section: Section, key: &str, value: Value) -> Result<(), ConfigError> {
        self.update(|document| document.set(section, key, value))
            .await
            .map(|_| ())
    }

    /// Delete a key; a missing key is not an error
    async fn remove(&self, section: Section, key: &str) -> Result<(), ConfigError> {
        self.update(|document| {
            document.remove(section, key);
        })
        .await
        .map(|_| ())
    }
}

/// JSON file on disk, bootstrapped from [`EXAMPLE_CONFIG`]
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/sltcli/config.json` for the current user
    pub fn default_location() -> Result<Self, ConfigError> {
        let strategy =
            choose_base_strategy().map_err(|e| ConfigError::NoConfigDir(e.to_string()))?;
        Ok(Self::new(
            strategy.config_dir().join("sltcli").join("config.json"),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Copy the template into place, creating parent directories
    async fn bootstrap(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&self.path, EXAMPLE_CONFIG)
            .await
            .map_err(|e| self.io_error(e))?;
        info!("Copied example config to {}", self.path.display());
        Ok(())
    }
}

/// Pretty JSON with four-space indentation
fn render(document: &Document) -> Result<Vec<u8>, ConfigError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(ConfigError::Serialize)?;
    Ok(buf)
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> Result<Document, ConfigError> {
        debug!("Loading configuration from: {}", self.path.display());

        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        if !exists {
            self.bootstrap().await?;
            return Err(ConfigError::Missing {
                path: self.path.clone(),
            });
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, document: &Document) -> Result<(), ConfigError> {
        debug!("Saving configuration to: {}", self.path.display());
        let content = render(document)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| self.io_error(e))
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    document: Mutex<Document>,
    saves: AtomicUsize,
}

impl MemoryConfigStore {
    pub fn new(document: Document) -> Self {
        Self {
            document: Mutex::new(document),
            saves: AtomicUsize::new(0),
        }
    }

    pub async fn snapshot(&self) -> Document {
        self.document.lock().await.clone()
    }

    /// Number of completed `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self) -> Result<Document, ConfigError> {
        Ok(self.document.lock().await.clone())
    }

    async fn save(&self, document: &Document) -> Result<(), ConfigError> {
        *self.document.lock().await = document.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AUTHORIZATION_HEADER, PASSWORD, USERNAME};
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_bootstraps_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("sltcli").join("config.json");
        let store = FileConfigStore::new(&path);

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EXAMPLE_CONFIG);

        // Second run reads the copied template.
        let document = store.load().await.unwrap();
        assert!(document.get_str(Section::Authentication, USERNAME).is_some());
        assert!(document.get_str(Section::Authentication, PASSWORD).is_some());
        assert!(!document.contains(Section::Authentication, AUTHORIZATION_HEADER));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileConfigStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ConfigError::Corrupt { .. }));
        // No self-repair.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_set_rewrites_whole_document_with_four_space_indent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"server": {"loginUrl": "http://x"}, "authentication": {"username": "u", "password": "p"}, "account": {}}"#,
        )
        .unwrap();
        let store = FileConfigStore::new(&path);

        store
            .set(Section::Authentication, AUTHORIZATION_HEADER, json!("bearer T"))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n    \"server\": {\n        \"loginUrl\": \"http://x\""));

        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            value,
            json!({
                "server": {"loginUrl": "http://x"},
                "authentication": {"username": "u", "password": "p", "authorization_header": "bearer T"},
                "account": {}
            })
        );
    }

    #[tokio::test]
    async fn test_remove_absent_key_succeeds() {
        let store = MemoryConfigStore::default();
        store.remove(Section::Account, "subscriberID").await.unwrap();
        store.remove(Section::Account, "subscriberID").await.unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.snapshot().await, Document::default());
    }

    #[tokio::test]
    async fn test_update_applies_all_changes_in_one_write() {
        let store = MemoryConfigStore::default();
        store
            .update(|document| {
                document.set(Section::Account, "accountno", "0034");
                document.set(Section::Account, "telephone", "0711234567");
            })
            .await
            .unwrap();

        assert_eq!(store.save_count(), 1);
        let document = store.snapshot().await;
        assert_eq!(document.get_str(Section::Account, "accountno"), Some("0034"));
    }
}
