//! Catalog snapshot data structures.
//!
//! The published document looks like:
//!
//! ```text
//! { "ports": { "2048.zip": { "attr": { "title": ..., "porter": [...], ... },
//!                            "source": { "repo": "multiverse" } } } }
//! ```
//!
//! Only `ports` is required; every attribute has a display fallback. An
//! attribute of the wrong type is treated as absent so one malformed entry
//! cannot hide the rest of the catalog.

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::utils::strip_archive_extension;

/// Porter name used when an entry lists nobody.
pub const UNKNOWN_PORTER: &str = "N/A";

/// Description used when an entry has none.
pub const MISSING_DESCRIPTION: &str = "No description available.";

/// Upstream repository an entry was published from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repository {
    #[default]
    Main,
    Multiverse,
}

impl Repository {
    fn from_source(repo: Option<&str>) -> Self {
        match repo {
            Some("multiverse") => Repository::Multiverse,
            _ => Repository::Main,
        }
    }
}

/// One distributable port in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable unique identifier (archive file name)
    pub key: String,

    pub title: String,

    pub description: String,

    /// Contributors, never empty
    pub porters: Vec<String>,

    pub genres: Vec<String>,

    /// Runs without extra game files
    pub ready_to_run: bool,

    pub install_notes: Option<String>,

    /// Screenshot file name inside the port directory
    pub screenshot: Option<String>,

    pub repository: Repository,
}

impl CatalogEntry {
    /// Create an entry with placeholder attributes.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            description: MISSING_DESCRIPTION.to_string(),
            porters: vec![UNKNOWN_PORTER.to_string()],
            genres: Vec::new(),
            ready_to_run: false,
            install_notes: None,
            screenshot: None,
            repository: Repository::Main,
        }
    }

    /// Key without its archive extension, as used in URLs.
    pub fn slug(&self) -> &str {
        strip_archive_extension(&self.key)
    }

    fn from_raw(key: String, raw: RawPort) -> Self {
        let attr = raw.attr.unwrap_or_default();

        let title = attr
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| strip_archive_extension(&key).to_string());

        let porters = attr
            .porter
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| vec![UNKNOWN_PORTER.to_string()]);

        Self {
            title,
            description: attr
                .desc
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
            porters,
            genres: attr.genres.unwrap_or_default(),
            ready_to_run: attr.rtr.unwrap_or(false),
            install_notes: attr.inst.filter(|n| !n.trim().is_empty()),
            screenshot: attr
                .image
                .and_then(|i| i.screenshot)
                .filter(|s| !s.trim().is_empty()),
            repository: Repository::from_source(
                raw.source.and_then(|s| s.repo).as_deref(),
            ),
            key,
        }
    }
}

/// All catalog entries at one point in time, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Parse the published ports document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let document: PortsDocument = serde_json::from_slice(bytes)?;
        Ok(document.into())
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|e| (e.key.clone(), e)).collect(),
        }
    }
}

/// Top-level published document.
#[derive(Debug, Deserialize)]
struct PortsDocument {
    ports: HashMap<String, serde_json::Value>,
}

impl From<PortsDocument> for Catalog {
    fn from(document: PortsDocument) -> Self {
        document
            .ports
            .into_iter()
            .map(|(key, value)| {
                let raw = serde_json::from_value(value).unwrap_or_else(|e| {
                    log::warn!("Catalog entry {} is malformed, using fallbacks: {}", key, e);
                    RawPort::default()
                });
                CatalogEntry::from_raw(key, raw)
            })
            .collect()
    }
}

/// Deserialize a field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Default, Deserialize)]
struct RawPort {
    #[serde(default, deserialize_with = "lenient")]
    attr: Option<RawAttr>,
    #[serde(default, deserialize_with = "lenient")]
    source: Option<RawSource>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAttr {
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    desc: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    porter: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    image: Option<RawImage>,
    #[serde(default, deserialize_with = "lenient")]
    genres: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    rtr: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    inst: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawImage {
    #[serde(default, deserialize_with = "lenient")]
    screenshot: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSource {
    #[serde(default, deserialize_with = "lenient")]
    repo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "ports": {
            "zelda.zip": {
                "attr": {
                    "title": "Zelda Classic",
                    "desc": "A fan engine.",
                    "porter": ["alice", "bob"],
                    "image": { "screenshot": "screenshot.png" },
                    "genres": ["adventure", "rpg"],
                    "rtr": true,
                    "inst": "Copy your data files."
                },
                "source": { "repo": "multiverse" }
            },
            "2048.zip": {
                "attr": { "title": "2048", "porter": [] },
                "source": { "repo": "main" }
            },
            "bare.zip": {}
        }
    }"#;

    #[test]
    fn test_parse_full_entry() {
        let catalog = Catalog::from_json(DOCUMENT.as_bytes()).unwrap();
        let entry = catalog.get("zelda.zip").unwrap();

        assert_eq!(entry.title, "Zelda Classic");
        assert_eq!(entry.description, "A fan engine.");
        assert_eq!(entry.porters, vec!["alice", "bob"]);
        assert_eq!(entry.genres, vec!["adventure", "rpg"]);
        assert!(entry.ready_to_run);
        assert_eq!(entry.install_notes.as_deref(), Some("Copy your data files."));
        assert_eq!(entry.screenshot.as_deref(), Some("screenshot.png"));
        assert_eq!(entry.repository, Repository::Multiverse);
        assert_eq!(entry.slug(), "zelda");
    }

    #[test]
    fn test_parse_applies_fallbacks() {
        let catalog = Catalog::from_json(DOCUMENT.as_bytes()).unwrap();

        let entry = catalog.get("2048.zip").unwrap();
        assert_eq!(entry.porters, vec![UNKNOWN_PORTER]);
        assert_eq!(entry.description, MISSING_DESCRIPTION);
        assert_eq!(entry.repository, Repository::Main);

        let bare = catalog.get("bare.zip").unwrap();
        assert_eq!(bare.title, "bare");
        assert!(bare.genres.is_empty());
        assert!(!bare.ready_to_run);
        assert!(bare.install_notes.is_none());
        assert!(bare.screenshot.is_none());
    }

    #[test]
    fn test_keys_are_ascending() {
        let catalog = Catalog::from_json(DOCUMENT.as_bytes()).unwrap();
        let keys: Vec<&String> = catalog.keys().collect();
        assert_eq!(keys, vec!["2048.zip", "bare.zip", "zelda.zip"]);
    }

    #[test]
    fn test_wrongly_typed_attributes_fall_back() {
        let document = r#"{
            "ports": {
                "odd.zip": {
                    "attr": {
                        "title": "Odd",
                        "rtr": "yes",
                        "porter": ["alice", 7],
                        "genres": "puzzle",
                        "image": "screenshot.png"
                    },
                    "source": "multiverse"
                },
                "scalar.zip": 42,
                "fine.zip": { "attr": { "title": "Fine", "rtr": true } }
            }
        }"#;

        let catalog = Catalog::from_json(document.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);

        let odd = catalog.get("odd.zip").unwrap();
        assert_eq!(odd.title, "Odd");
        assert!(!odd.ready_to_run);
        assert_eq!(odd.porters, vec![UNKNOWN_PORTER]);
        assert!(odd.genres.is_empty());
        assert!(odd.screenshot.is_none());
        assert_eq!(odd.repository, Repository::Main);

        assert_eq!(catalog.get("scalar.zip").unwrap().title, "scalar");
        assert!(catalog.get("fine.zip").unwrap().ready_to_run);
    }

    #[test]
    fn test_missing_ports_member_is_an_error() {
        assert!(Catalog::from_json(br#"{"items": {}}"#).is_err());
        assert!(Catalog::from_json(b"<html>rate limited</html>").is_err());
    }
}
