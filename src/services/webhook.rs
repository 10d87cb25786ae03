// src/services/webhook.rs

//! Chat webhook notifier.
//!
//! Posts announcements in the Discord webhook shape:
//! `{ username, content, embeds: [{ title, url, description, image, fields, color, timestamp }] }`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{EmbedField, NotificationMessage, WebhookConfig};

/// Anything that can deliver an announcement.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message. Any failure is an [`AppError::Send`].
    async fn send(&self, message: &NotificationMessage) -> Result<()>;
}

/// Request body accepted by the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub username: String,
    pub content: String,
    pub embeds: Vec<EmbedPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedPayload {
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
    pub fields: Vec<EmbedField>,
    pub color: u32,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImagePayload {
    pub url: String,
}

impl WebhookPayload {
    /// Wrap a message with the bot identity, color and timestamp.
    pub fn build(
        message: &NotificationMessage,
        config: &WebhookConfig,
        sent_at: DateTime<Utc>,
    ) -> Self {
        let embed = &message.embed;
        Self {
            username: config.username.clone(),
            content: message.content.clone(),
            embeds: vec![EmbedPayload {
                title: embed.title.clone(),
                url: embed.url.clone(),
                description: embed.description.clone(),
                image: embed
                    .image_url
                    .as_ref()
                    .map(|url| ImagePayload { url: url.clone() }),
                fields: embed.fields.clone(),
                color: config.color,
                timestamp: sent_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            }],
        }
    }
}

/// Notifier posting to a chat webhook over HTTP.
pub struct WebhookNotifier {
    client: Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(client: Client, config: WebhookConfig) -> Self {
        Self { client, config }
    }

    async fn post(&self, payload: &WebhookPayload) -> std::result::Result<(), reqwest::Error> {
        self.client
            .post(&self.config.url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<()> {
        let payload = WebhookPayload::build(message, &self.config, Utc::now());

        self.post(&payload)
            .await
            .map_err(|e| AppError::send(&message.key, e))?;

        log::info!("Posted announcement for {}", message.embed.title);
        Ok(())
    }
}
