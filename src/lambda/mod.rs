// src/lambda/mod.rs

//! AWS Lambda handler for the announcer.
//!
//! Intended for a scheduled (EventBridge cron) trigger. Each invocation:
//! 1. Loads `config.toml` from S3 (defaults when absent) plus env overrides
//! 2. Loads the ledger object from S3
//! 3. Runs one dispatcher invocation
//!
//! ## Environment Variables
//!
//! - `S3_BUCKET`: bucket holding config and ledger (default: `port-announcer`)
//! - `S3_PREFIX`: key prefix (default: `port-announcer`)
//! - `CONFIG_S3_PREFIX`: prefix of `config.toml` (default: `{S3_PREFIX}/config`)
//! - `NEWS_WEBHOOK_URL`: webhook endpoint
//! - `RUST_LOG`: log level (e.g., `info`, `debug`)

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::config::LambdaConfigLoader;
use crate::error::Result;
use crate::pipeline::{RunOutcome, run_announcer};
use crate::storage::s3::{S3Storage, join_key};

/// Lambda response payload.
#[derive(Debug, Serialize)]
pub struct AnnounceResponse {
    /// `"success"` or `"error"`
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RunOutcome>,

    /// Error message if the run failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

impl AnnounceResponse {
    fn from_result(result: Result<RunOutcome>, execution_time_ms: u64) -> Self {
        match result {
            Ok(outcome) => Self {
                status: "success",
                outcome: Some(outcome),
                message: None,
                execution_time_ms,
            },
            Err(e) => Self {
                status: "error",
                outcome: None,
                message: Some(e.to_string()),
                execution_time_ms,
            },
        }
    }
}

/// Main Lambda handler function.
///
/// Scheduled events carry nothing the run needs, so the payload is only
/// logged. Failures are reported in the response body rather than as
/// invocation errors so the scheduler does not retry a run that already sent
/// a message.
#[instrument(skip(event))]
pub async fn handler(
    event: LambdaEvent<Value>,
) -> std::result::Result<AnnounceResponse, LambdaError> {
    let start = std::time::Instant::now();
    info!("Handling event: {:?}", event.payload);

    let result = run_lambda_pipeline().await;
    match &result {
        Ok(outcome) => info!("Lambda execution successful: {:?}", outcome),
        Err(e) => error!("Lambda execution failed: {}", e),
    }

    Ok(AnnounceResponse::from_result(
        result,
        start.elapsed().as_millis() as u64,
    ))
}

/// Prefix holding `config.toml`: the explicit override, else `{S3_PREFIX}/config`.
fn config_prefix(explicit: Option<String>, storage_prefix: &str) -> String {
    explicit.unwrap_or_else(|| join_key(storage_prefix, "config"))
}

/// Internal pipeline logic for the Lambda environment.
async fn run_lambda_pipeline() -> Result<RunOutcome> {
    let storage = S3Storage::from_env().await?;

    let prefix = config_prefix(std::env::var("CONFIG_S3_PREFIX").ok(), storage.prefix());
    let loader = LambdaConfigLoader::new(storage.clone(), &prefix);
    let config = loader.load_config().await?;

    let ledger = storage.ledger(&config.storage.ledger_file);
    run_announcer(&config, &ledger).await
}
