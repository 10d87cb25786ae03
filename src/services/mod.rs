//! Service layer for the announcer.
//!
//! This module contains the collaborators the dispatcher drives:
//! - Catalog fetching (`HttpCatalogSource`)
//! - Message rendering (`Composer`)
//! - Webhook delivery (`WebhookNotifier`)

mod catalog;
mod composer;
mod webhook;

pub use catalog::{CatalogSource, HttpCatalogSource};
pub use composer::{
    ANNOUNCEMENT_TEMPLATES, Composer, EMOJIS, NO_GENRES, PhraseSource, RandomPhrases,
    ScriptedPhrases, THANKS_TEMPLATES,
};
pub use webhook::{EmbedPayload, ImagePayload, Notifier, WebhookNotifier, WebhookPayload};
