//! IPGEO Service - HTTP microservice for IP geolocation queries.
//!
//! Resolves IP addresses to postal codes and coordinates from a local
//! MaxMind City database.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GEO_FILE` | Path to the MaxMind City `.mmdb` file | Required |
//! | `PORT` | HTTP server port | 3000 |
//! | `MODE` | Run mode: "release", "debug" or "test" | release |
//! | `RUST_LOG` | Log filter (e.g., "info", "debug") | depends on `MODE` |
//!
//! Every variable can also be given as a flag (`--geo-file`, `--port`, `--mode`).
//!
//! ## Endpoints
//!
//! - `GET /geo/zip?ip=X` - Postal code for an address
//! - `GET /geo/point?ip=X` - `[latitude, longitude]` for an address
//! - `GET /healthz` - Liveness check
//! - `GET /api-docs/openapi.json` - OpenAPI document

use std::process::ExitCode;

use clap::Parser;
use ipgeo_service::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.mode.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match ipgeo_service::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Fatal error");
            ExitCode::FAILURE
        }
    }
}
