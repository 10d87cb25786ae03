//! Rendered announcement data structures.

use serde::Serialize;

/// One announcement, ready to hand to a notifier. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    /// Catalog key this message announces
    #[serde(skip)]
    pub key: String,

    /// Headline line shown above the embed
    pub content: String,

    pub embed: Embed,
}

/// Rich card attached to the announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,

    /// Detail page link
    pub url: String,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub fields: Vec<EmbedField>,
}

/// Auxiliary name/value row inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}
