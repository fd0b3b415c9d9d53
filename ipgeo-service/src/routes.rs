//! Route table and OpenAPI document.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::config::RunMode;
use crate::{handlers, AppState};

/// OpenAPI documentation for the IPGEO service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "IPGEO Service",
        version = "0.1.0",
        description = "Resolve IP addresses to postal codes and coordinates.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(handlers::get_zip, handlers::get_point, handlers::health_check),
    components(schemas(handlers::ZipResponse, handlers::PointResponse)),
    tags(
        (name = "geo", description = "IP geolocation endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Routes served by the service, as `(method, path)`.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/healthz"),
    ("GET", "/geo/point"),
    ("GET", "/geo/zip"),
    ("GET", "/api-docs/openapi.json"),
];

/// Create the main application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    if state.mode == RunMode::Debug {
        for (method, path) in ROUTES {
            tracing::debug!(method = *method, path = *path, "Route registered");
        }
    }

    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/geo/point", get(handlers::get_point))
        .route("/geo/zip", get(handlers::get_zip))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new()),
        )
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
