//! Run dispatcher.
//!
//! One invocation walks a small state machine:
//!
//! ```text
//! fetch ──failure──────────────────────────────▶ DONE (FetchFailure)
//!   │
//! load ledger ──read failure───────────────────▶ DONE (nothing written)
//!   │
//!   ├──first run + silent seed──▶ BOOTSTRAP ──▶ DONE
//!   │
//! diff ──empty──▶ IDLE ──▶ DONE
//!   │
//! ANNOUNCING: compose ─▶ send ─▶ commit ─▶ DONE
//!                          └─failure─▶ DONE (SendFailure, nothing committed)
//! ```
//!
//! The ledger only advances after a send succeeded, and it is persisted after
//! each commit, so an interrupted run never loses or invents history.

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{AnnounceConfig, BootstrapPolicy, Catalog, NotificationMessage, RunPolicy};
use crate::pipeline::diff::{DiffResult, calculate_diff};
use crate::services::{CatalogSource, Composer, Notifier};
use crate::storage::{Ledger, LedgerStore};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunOutcome {
    /// First run: the ledger was seeded with every current key, nothing sent.
    Bootstrapped { seeded: usize },
    /// Nothing new upstream.
    Idle { known: usize },
    /// These keys were announced and committed, in order.
    Announced { keys: Vec<String>, remaining: usize },
}

/// Everything a run looks at before it acts.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub catalog: Catalog,
    pub ledger: Ledger,
    pub diff: DiffResult,
    /// A run right now would seed the ledger instead of announcing
    pub bootstrap: bool,
}

/// Drives fetch, diff, compose, send and commit for one invocation.
pub struct Dispatcher<'a> {
    policy: AnnounceConfig,
    source: &'a dyn CatalogSource,
    notifier: &'a dyn Notifier,
    store: &'a dyn LedgerStore,
    composer: Composer,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        policy: AnnounceConfig,
        source: &'a dyn CatalogSource,
        notifier: &'a dyn Notifier,
        store: &'a dyn LedgerStore,
        composer: Composer,
    ) -> Self {
        Self {
            policy,
            source,
            notifier,
            store,
            composer,
        }
    }

    /// Fetch the catalog and load the ledger without changing anything.
    pub async fn inspect(&self) -> Result<Inspection> {
        let catalog = self.source.fetch().await?;
        if catalog.is_empty() {
            return Err(AppError::fetch(
                self.source.location(),
                "catalog contains no entries",
            ));
        }

        let ledger = Ledger::load(self.store).await?;
        let diff = calculate_diff(&catalog, ledger.keys());
        let bootstrap =
            ledger.is_first_run() && self.policy.bootstrap == BootstrapPolicy::SilentSeed;

        Ok(Inspection {
            catalog,
            ledger,
            diff,
            bootstrap,
        })
    }

    /// Compose the message the next run would send, without sending it.
    pub async fn preview(&mut self) -> Result<Option<NotificationMessage>> {
        let inspection = self.inspect().await?;
        if inspection.bootstrap {
            return Ok(None);
        }

        let message = inspection
            .diff
            .next()
            .and_then(|key| inspection.catalog.get(key))
            .map(|entry| self.composer.compose(entry));
        Ok(message)
    }

    /// Run one invocation according to the configured policies.
    pub async fn run(&mut self) -> Result<RunOutcome> {
        let Inspection {
            catalog,
            mut ledger,
            diff,
            bootstrap,
        } = self.inspect().await?;

        if bootstrap {
            log::info!(
                "No announcement history found. Seeding ledger with {} existing ports.",
                catalog.len()
            );
            ledger.seed(catalog.keys().cloned(), self.store).await?;
            return Ok(RunOutcome::Bootstrapped {
                seeded: ledger.len(),
            });
        }

        if !diff.has_changes() {
            log::info!("No new ports to announce ({} known).", diff.known);
            return Ok(RunOutcome::Idle { known: diff.known });
        }

        let budget = match self.policy.run_policy {
            RunPolicy::OnePerRun => 1,
            RunPolicy::DrainBacklog => diff.len(),
        };
        log::info!(
            "{} new ports pending, announcing up to {}",
            diff.len(),
            budget
        );

        let mut announced = Vec::new();
        for entry in diff
            .pending
            .iter()
            .take(budget)
            .filter_map(|key| catalog.get(key))
        {
            log::info!("New port found: {}", entry.key);
            let message = self.composer.compose(entry);

            if let Err(e) = self.notifier.send(&message).await {
                let e = match e {
                    AppError::Send { .. } => e,
                    other => AppError::send(&entry.key, other),
                };
                log::error!(
                    "Announcement failed after {} successful: {}",
                    announced.len(),
                    e
                );
                return Err(e);
            }

            ledger.commit(&entry.key, self.store).await.map_err(|e| {
                log::error!(
                    "{} was announced but not recorded; it may be announced again: {}",
                    entry.key,
                    e
                );
                e
            })?;
            announced.push(entry.key.clone());
        }

        let remaining = diff.len() - announced.len();
        log::info!(
            "Announced {} port(s), {} still pending.",
            announced.len(),
            remaining
        );

        Ok(RunOutcome::Announced {
            keys: announced,
            remaining,
        })
    }
}
