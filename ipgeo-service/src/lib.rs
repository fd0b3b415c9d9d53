//! IPGEO Service Library
//!
//! HTTP handlers, routing, configuration and lifecycle for the IP
//! geolocation service. This library is used by both the ipgeo-service
//! binary and integration tests.

pub mod config;
pub mod handlers;
pub mod routes;
pub mod server;

use ipgeo::LookupService;

use crate::config::RunMode;

/// Application state shared across handlers.
#[derive(Debug)]
pub struct AppState {
    /// Lookup service owning the open geo database.
    pub lookup: LookupService,
    /// Mode the service was started in.
    pub mode: RunMode,
}

impl AppState {
    pub fn new(lookup: LookupService, mode: RunMode) -> Self {
        Self { lookup, mode }
    }
}

// Re-export commonly used types for convenience
pub use config::Config;
pub use handlers::{GeoQuery, PointResponse, ZipResponse};
pub use routes::{create_router, ApiDoc};
pub use server::{
    close_database, run, run_until, serve_with_grace, ServerError, SHUTDOWN_GRACE_PERIOD,
};
