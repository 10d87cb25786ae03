//! Storage abstractions for the announcement ledger.
//!
//! The ledger is a single JSON array of catalog keys, rewritten in full on
//! every commit:
//!
//! ```text
//! storage/
//! ├── config.toml     # Announcer configuration
//! └── ports.json      # Ledger: every key announced so far
//! ```
//!
//! Backends only move bytes; [`Ledger`] owns the set semantics.

pub mod ledger;
pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use ledger::{Ledger, LedgerOrigin};
pub use local::LocalLedgerStore;
pub use memory::MemoryLedgerStore;

/// Serialize keys to the on-disk ledger format (pretty JSON array).
pub(crate) fn encode_keys(keys: &[String]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(keys)?)
}

/// Parse the on-disk ledger format. Content that does not parse is an
/// [`AppError::Json`](crate::error::AppError::Json).
pub(crate) fn decode_keys(bytes: &[u8]) -> Result<Vec<String>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Trait for ledger storage backends.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Read the persisted keys.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet and an error when
    /// the artifact exists but cannot be read or parsed.
    async fn read_keys(&self) -> Result<Option<Vec<String>>>;

    /// Replace the persisted keys with `keys`.
    async fn write_keys(&self, keys: &[String]) -> Result<()>;

    /// Human-readable location used in logs and errors.
    fn location(&self) -> String;
}
