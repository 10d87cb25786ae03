// src/pipeline/announce.rs

//! Announcement pipeline wiring.
//!
//! Builds the HTTP collaborators from a [`Config`] and hands them to the
//! [`Dispatcher`]. The ledger store is supplied by the caller so the CLI can
//! use a local file and the Lambda an S3 object.

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::dispatch::{Dispatcher, Inspection, RunOutcome};
use crate::services::{Composer, HttpCatalogSource, WebhookNotifier, WebhookPayload};
use crate::storage::LedgerStore;
use crate::utils::http;

fn collaborators(config: &Config) -> Result<(HttpCatalogSource, WebhookNotifier)> {
    let client = http::create_client(&config.http)?;
    let source = HttpCatalogSource::new(client.clone(), &config.catalog.url);
    let notifier = WebhookNotifier::new(client, config.webhook.clone());
    Ok((source, notifier))
}

/// Run one announcer invocation.
pub async fn run_announcer(config: &Config, store: &dyn LedgerStore) -> Result<RunOutcome> {
    config.validate()?;
    log::info!(
        "Checking {} for new ports (ledger: {})",
        config.catalog.url,
        store.location()
    );

    let (source, notifier) = collaborators(config)?;
    let composer = Composer::random(config.links.clone());

    Dispatcher::new(config.announce.clone(), &source, &notifier, store, composer)
        .run()
        .await
}

/// Fetch and diff without sending or writing anything.
pub async fn inspect_backlog(config: &Config, store: &dyn LedgerStore) -> Result<Inspection> {
    let (source, notifier) = collaborators(config)?;
    let composer = Composer::random(config.links.clone());

    Dispatcher::new(config.announce.clone(), &source, &notifier, store, composer)
        .inspect()
        .await
}

/// Build the webhook payload the next run would post, without posting it.
pub async fn preview_announcement(
    config: &Config,
    store: &dyn LedgerStore,
) -> Result<Option<WebhookPayload>> {
    let (source, notifier) = collaborators(config)?;
    let composer = Composer::random(config.links.clone());

    let message = Dispatcher::new(config.announce.clone(), &source, &notifier, store, composer)
        .preview()
        .await?;

    Ok(message.map(|m| WebhookPayload::build(&m, &config.webhook, Utc::now())))
}
