// src/services/catalog.rs

//! Catalog snapshot source.
//!
//! Fetches the published ports document and turns it into a [`Catalog`].

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::Catalog;

/// Anything that can produce the current catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Retrieve the full catalog. Any failure is an [`AppError::Fetch`].
    async fn fetch(&self) -> Result<Catalog>;

    /// Human-readable location used in logs and errors.
    fn location(&self) -> String;
}

/// Catalog published as a JSON document over HTTP.
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn fetch_bytes(&self) -> std::result::Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(&self.url).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Catalog> {
        log::debug!("Fetching catalog from {}", self.url);

        let bytes = self
            .fetch_bytes()
            .await
            .map_err(|e| AppError::fetch(&self.url, e))?;

        let catalog = Catalog::from_json(&bytes)
            .map_err(|e| AppError::fetch(&self.url, format!("malformed catalog: {e}")))?;

        log::info!("Fetched {} catalog entries", catalog.len());
        Ok(catalog)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}
