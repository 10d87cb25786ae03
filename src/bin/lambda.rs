//! AWS Lambda entry point for the port announcer
//!
//! Deploy with `cargo lambda build --release --features lambda`
//! and attach a schedule rule; every invocation announces at most one port.

use lambda_runtime::{Error as LambdaError, service_fn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Port announcer Lambda starting...");
    lambda_runtime::run(service_fn(port_announcer::lambda::handler)).await
}
