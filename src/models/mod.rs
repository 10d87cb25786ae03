// src/models/mod.rs

//! Domain models for the announcer.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod catalog;
mod config;
mod message;

// Re-export all public types
pub use catalog::{Catalog, CatalogEntry, MISSING_DESCRIPTION, Repository, UNKNOWN_PORTER};
pub use config::{
    AnnounceConfig, BootstrapPolicy, CATALOG_URL_ENV, CatalogConfig, Config, HttpConfig,
    LinkConfig, RunPolicy, StorageConfig, WEBHOOK_URL_ENV, WebhookConfig,
};
pub use message::{Embed, EmbedField, NotificationMessage};
