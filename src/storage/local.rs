//! Local filesystem ledger store.
//!
//! The ledger is a pretty-printed JSON array. Writes go to a sibling `.tmp`
//! file which is then renamed over the ledger, so a crash mid-write leaves the
//! previous snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{LedgerStore, decode_keys, encode_keys};

/// Ledger stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct LocalLedgerStore {
    path: PathBuf,
}

impl LocalLedgerStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for `file_name` inside `root_dir`.
    pub fn in_dir(root_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(root_dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl LedgerStore for LocalLedgerStore {
    async fn read_keys(&self) -> Result<Option<Vec<String>>> {
        match self.read_bytes().await? {
            Some(bytes) => decode_keys(&bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn write_keys(&self, keys: &[String]) -> Result<()> {
        let bytes = encode_keys(keys)?;
        self.write_bytes(&bytes).await?;
        log::debug!("Wrote {} keys to {}", keys.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::in_dir(tmp.path(), "ports.json");

        assert!(store.read_keys().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::in_dir(tmp.path().join("nested"), "ports.json");
        let keys = vec!["a.zip".to_string(), "b.zip".to_string()];

        store.write_keys(&keys).await.unwrap();

        assert_eq!(store.read_keys().await.unwrap(), Some(keys));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_file_is_plain_json_array() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::in_dir(tmp.path(), "ports.json");

        store.write_keys(&["2048.zip".to_string()]).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, serde_json::json!(["2048.zip"]));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::in_dir(tmp.path(), "ports.json");
        std::fs::write(store.path(), b"{ not json").unwrap();

        assert!(matches!(store.read_keys().await, Err(AppError::Json(_))));
    }

    #[tokio::test]
    async fn test_rewrite_replaces_previous_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = LocalLedgerStore::in_dir(tmp.path(), "ports.json");

        store.write_keys(&["a.zip".to_string()]).await.unwrap();
        store
            .write_keys(&["a.zip".to_string(), "b.zip".to_string()])
            .await
            .unwrap();

        assert_eq!(store.read_keys().await.unwrap().map(|k| k.len()), Some(2));
    }
}
