//! In-memory view of the announcement ledger.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::storage::LedgerStore;

/// Where the loaded ledger came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOrigin {
    /// Nothing was persisted yet
    Missing,
    /// An artifact exists but its content could not be parsed
    Unreadable,
    /// Loaded from a readable artifact
    Persisted,
}

/// Set of keys that have already been announced.
///
/// Keys are only ever added. Every change is persisted as the complete set,
/// so the stored artifact is always a self-contained snapshot.
#[derive(Debug, Clone)]
pub struct Ledger {
    keys: BTreeSet<String>,
    origin: LedgerOrigin,
}

impl Ledger {
    /// Load the ledger.
    ///
    /// A missing artifact, or one that exists but does not parse, yields an
    /// empty ledger. Any other read failure is returned: the stored history
    /// may be intact, so the caller must not act on an empty view of it.
    pub async fn load(store: &dyn LedgerStore) -> Result<Self> {
        match store.read_keys().await {
            Ok(Some(keys)) => Ok(Self {
                keys: keys.into_iter().collect(),
                origin: LedgerOrigin::Persisted,
            }),
            Ok(None) => {
                log::info!("No ledger found at {}", store.location());
                Ok(Self::empty(LedgerOrigin::Missing))
            }
            Err(AppError::Json(e)) => {
                log::warn!(
                    "Ledger at {} is unreadable, treating as empty: {}",
                    store.location(),
                    e
                );
                Ok(Self::empty(LedgerOrigin::Unreadable))
            }
            Err(e) => {
                log::error!("Ledger at {} could not be read: {}", store.location(), e);
                Err(e)
            }
        }
    }

    fn empty(origin: LedgerOrigin) -> Self {
        Self {
            keys: BTreeSet::new(),
            origin,
        }
    }

    pub fn origin(&self) -> LedgerOrigin {
        self.origin
    }

    /// True when no history exists at all: the bootstrap case.
    pub fn is_first_run(&self) -> bool {
        self.keys.is_empty() && self.origin != LedgerOrigin::Persisted
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Record `key` as announced and persist the full set.
    ///
    /// On failure the key stays in memory but is not durably recorded.
    pub async fn commit(&mut self, key: &str, store: &dyn LedgerStore) -> Result<()> {
        self.keys.insert(key.to_string());
        self.persist(store).await
    }

    /// Record many keys at once and persist the full set once.
    pub async fn seed<I>(&mut self, keys: I, store: &dyn LedgerStore) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        self.keys.extend(keys);
        self.persist(store).await
    }

    async fn persist(&mut self, store: &dyn LedgerStore) -> Result<()> {
        let snapshot: Vec<String> = self.keys.iter().cloned().collect();
        store
            .write_keys(&snapshot)
            .await
            .map_err(|e| AppError::persist(store.location(), e))?;

        self.origin = LedgerOrigin::Persisted;
        log::debug!("Ledger persisted: {} keys", snapshot.len());
        Ok(())
    }
}
