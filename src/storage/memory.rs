//! In-process ledger store.
//!
//! Useful for embedding and for exercising failure paths: reads can report
//! corrupt content or an unreachable backend, and writes can be told to fail.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::LedgerStore;

/// Ledger store that keeps the persisted keys in memory.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    keys: Mutex<Option<Vec<String>>>,
    read_failure: Option<ReadFailure>,
    fail_writes: bool,
}

#[derive(Debug, Clone, Copy)]
enum ReadFailure {
    Corrupt,
    Unavailable,
}

impl MemoryLedgerStore {
    /// Create an empty store with nothing persisted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `keys`.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Mutex::new(Some(keys.into_iter().map(Into::into).collect())),
            ..Self::default()
        }
    }

    /// Make every read report content that does not parse.
    pub fn corrupt(mut self) -> Self {
        self.read_failure = Some(ReadFailure::Corrupt);
        self
    }

    /// Make every read fail as if the backend were unreachable.
    pub fn unavailable(mut self) -> Self {
        self.read_failure = Some(ReadFailure::Unavailable);
        self
    }

    /// Make every write fail.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Currently persisted keys, if any.
    pub fn snapshot(&self) -> Option<Vec<String>> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<String>>> {
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn read_keys(&self) -> Result<Option<Vec<String>>> {
        match self.read_failure {
            Some(ReadFailure::Corrupt) => {
                let parsed: Vec<String> = serde_json::from_str("{ not a ledger")?;
                Ok(Some(parsed))
            }
            Some(ReadFailure::Unavailable) => {
                Err(AppError::S3("dispatch failure: timeout".to_string()))
            }
            None => Ok(self.lock().clone()),
        }
    }

    async fn write_keys(&self, keys: &[String]) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "storage is read-only",
            )));
        }
        *self.lock() = Some(keys.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
