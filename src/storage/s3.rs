//! AWS S3 storage implementation.
//!
//! Objects live under `{bucket}/{prefix}/`:
//! - `{prefix}/ports.json`: the announcement ledger
//! - `{prefix}/config/config.toml`: optional configuration (see `config.rs`)

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};
use crate::storage::{LedgerStore, decode_keys, encode_keys};

/// Join a key prefix and a relative name, ignoring stray slashes.
pub fn join_key(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let name = name.trim_start_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Thin wrapper around an S3 bucket and key prefix.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create S3 storage from environment configuration.
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let bucket =
            std::env::var("S3_BUCKET").unwrap_or_else(|_| "port-announcer".to_string());
        let prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "port-announcer".to_string());

        Ok(Self::new(client, bucket, prefix))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full object key for a name relative to the prefix.
    pub fn object_key(&self, name: &str) -> String {
        join_key(&self.prefix, name)
    }

    fn uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }

    /// Read an object, returning None if it doesn't exist.
    pub async fn read_bytes_optional(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::S3(e.to_string()))?;
                Ok(Some(bytes.into_bytes().to_vec()))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    log::info!("No existing object at {}", self.uri(key));
                    Ok(None)
                } else {
                    Err(AppError::S3(service_err.to_string()))
                }
            }
        }
    }

    /// Write an object, replacing any previous version.
    pub async fn write_bytes(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::S3(e.to_string()))?;

        log::info!("Wrote {}", self.uri(key));
        Ok(())
    }

    /// Ledger stored as `{prefix}/{file_name}`.
    pub fn ledger(&self, file_name: &str) -> S3LedgerStore {
        S3LedgerStore {
            key: self.object_key(file_name),
            storage: self.clone(),
        }
    }
}

/// Ledger stored as a single S3 object.
#[derive(Clone)]
pub struct S3LedgerStore {
    storage: S3Storage,
    key: String,
}

#[async_trait]
impl LedgerStore for S3LedgerStore {
    async fn read_keys(&self) -> Result<Option<Vec<String>>> {
        match self.storage.read_bytes_optional(&self.key).await? {
            Some(bytes) => decode_keys(&bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn write_keys(&self, keys: &[String]) -> Result<()> {
        let bytes = encode_keys(keys)?;
        self.storage
            .write_bytes(&self.key, bytes, "application/json")
            .await
    }

    fn location(&self) -> String {
        self.storage.uri(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Region};

    fn storage(prefix: &str) -> S3Storage {
        let conf = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        S3Storage::new(Client::from_conf(conf), "bucket", prefix)
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("port-announcer", "ports.json"), "port-announcer/ports.json");
        assert_eq!(join_key("/a/b/", "ports.json"), "a/b/ports.json");
        assert_eq!(join_key("", "ports.json"), "ports.json");
        assert_eq!(join_key("/", "/ports.json"), "ports.json");
    }

    #[test]
    fn test_ledger_location() {
        let ledger = storage("/announcer/").ledger("ports.json");
        assert_eq!(ledger.location(), "s3://bucket/announcer/ports.json");

        let ledger = storage("").ledger("ports.json");
        assert_eq!(ledger.location(), "s3://bucket/ports.json");
    }

    #[test]
    fn test_ledger_object_format_round_trips() {
        let keys = vec!["2048.zip".to_string(), "zelda.zip".to_string()];
        let bytes = encode_keys(&keys).unwrap();

        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with('['));
        assert_eq!(decode_keys(&bytes).unwrap(), keys);
    }

    #[test]
    fn test_corrupt_ledger_object_is_json_error() {
        let err = decode_keys(b"<Error>AccessDenied</Error>").unwrap_err();
        assert!(matches!(err, AppError::Json(_)));
    }
}
