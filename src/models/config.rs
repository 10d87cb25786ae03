//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable that overrides `webhook.url`.
pub const WEBHOOK_URL_ENV: &str = "NEWS_WEBHOOK_URL";

/// Environment variable that overrides `catalog.url`.
pub const CATALOG_URL_ENV: &str = "PORTS_CATALOG_URL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings shared by the catalog fetch and the webhook
    #[serde(default)]
    pub http: HttpConfig,

    /// Where the catalog is published
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Chat webhook destination
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Base URLs used when rendering announcements
    #[serde(default)]
    pub links: LinkConfig,

    /// Run and bootstrap policies
    #[serde(default)]
    pub announce: AnnounceConfig,

    /// Ledger location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Serialize the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides using the given variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(WEBHOOK_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.webhook.url = url;
        }
        if let Some(url) = lookup(CATALOG_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.catalog.url = url;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.webhook.url.trim().is_empty() {
            return Err(AppError::validation(format!(
                "webhook.url is not set (set it in config.toml or {WEBHOOK_URL_ENV})"
            )));
        }
        Url::parse(&self.webhook.url)
            .map_err(|e| AppError::validation(format!("webhook.url is invalid: {e}")))?;
        Url::parse(&self.catalog.url)
            .map_err(|e| AppError::validation(format!("catalog.url is invalid: {e}")))?;
        if self.storage.ledger_file.trim().is_empty() {
            return Err(AppError::validation("storage.ledger_file is empty"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds, applied to each call
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Catalog source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL of the published ports document
    #[serde(default = "defaults::catalog_url")]
    pub url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: defaults::catalog_url(),
        }
    }
}

/// Webhook destination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint URL. Required before a run.
    #[serde(default)]
    pub url: String,

    /// Display name shown for the bot
    #[serde(default = "defaults::username")]
    pub username: String,

    /// Embed accent color
    #[serde(default = "defaults::color")]
    pub color: u32,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: defaults::username(),
            color: defaults::color(),
        }
    }
}

/// Base URLs for screenshots and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default = "defaults::screenshot_base_main")]
    pub screenshot_base_main: String,

    #[serde(default = "defaults::screenshot_base_multiverse")]
    pub screenshot_base_multiverse: String,

    /// Prefix the bare port name is appended to
    #[serde(default = "defaults::detail_base")]
    pub detail_base: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            screenshot_base_main: defaults::screenshot_base_main(),
            screenshot_base_multiverse: defaults::screenshot_base_multiverse(),
            detail_base: defaults::detail_base(),
        }
    }
}

/// How many announcements a single run may send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPolicy {
    /// Announce the first pending entry only; the backlog drains across runs.
    #[default]
    OnePerRun,
    /// Announce every pending entry in one run.
    DrainBacklog,
}

/// What the very first run does with an already populated catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapPolicy {
    /// Record every current entry as announced without sending anything.
    #[default]
    SilentSeed,
    /// Treat every current entry as new.
    AnnounceAll,
}

/// Dispatcher policies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnounceConfig {
    #[serde(default)]
    pub run_policy: RunPolicy,

    #[serde(default)]
    pub bootstrap: BootstrapPolicy,
}

/// Ledger storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File (or object) name of the announced-keys ledger
    #[serde(default = "defaults::ledger_file")]
    pub ledger_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            ledger_file: defaults::ledger_file(),
        }
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; port-announcer/1.0)".into()
    }
    pub fn timeout() -> u64 {
        10
    }

    pub fn catalog_url() -> String {
        "https://raw.githubusercontent.com/PortsMaster/PortMaster-Info/main/ports.json".into()
    }

    // Webhook defaults
    pub fn username() -> String {
        "Announcement Bot".into()
    }
    pub fn color() -> u32 {
        3447003
    }

    // Link defaults
    pub fn screenshot_base_main() -> String {
        "https://raw.githubusercontent.com/PortsMaster/PortMaster-New/main/ports/".into()
    }
    pub fn screenshot_base_multiverse() -> String {
        "https://raw.githubusercontent.com/PortsMaster-MV/PortMaster-MV-New/main/ports/".into()
    }
    pub fn detail_base() -> String {
        "https://portmaster.games/detail.html?name=".into()
    }

    pub fn ledger_file() -> String {
        "ports.json".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        let mut config = Config::default();
        config.webhook.url = "https://discord.com/api/webhooks/1/abc".to_string();
        config
    }

    #[test]
    fn validate_default_config_requires_webhook() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("webhook.url"));
    }

    #[test]
    fn validate_accepts_configured_webhook() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn validate_rejects_relative_webhook() {
        let mut config = configured();
        config.webhook.url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = configured();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [webhook]
            url = "https://example.com/hook"

            [announce]
            run_policy = "drain_backlog"
            "#,
        )
        .unwrap();

        assert_eq!(config.webhook.url, "https://example.com/hook");
        assert_eq!(config.webhook.username, "Announcement Bot");
        assert_eq!(config.webhook.color, 3447003);
        assert_eq!(config.announce.run_policy, RunPolicy::DrainBacklog);
        assert_eq!(config.announce.bootstrap, BootstrapPolicy::SilentSeed);
        assert_eq!(config.storage.ledger_file, "ports.json");
        assert_eq!(config.http.timeout_secs, 10);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = Config::from_toml("[announce]\nbootstrap = \"maybe\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn env_overrides_replace_urls() {
        let mut config = Config::default();
        config.apply_overrides_from(|name| match name {
            WEBHOOK_URL_ENV => Some("https://example.com/hook".to_string()),
            CATALOG_URL_ENV => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.webhook.url, "https://example.com/hook");
        assert_eq!(config.catalog.url, CatalogConfig::default().url);
    }

    #[test]
    fn toml_round_trip_preserves_policies() {
        let mut config = configured();
        config.announce.bootstrap = BootstrapPolicy::AnnounceAll;
        let text = config.to_toml().unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.announce.bootstrap, BootstrapPolicy::AnnounceAll);
        assert_eq!(parsed.webhook.url, config.webhook.url);
    }
}
