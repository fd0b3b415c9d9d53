//! HTTP request handlers for the geolocation service.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::{request::Parts, StatusCode},
    Json,
};
use ipgeo::{LocationRecord, LookupOutcome};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Query parameters for the geo endpoints.
///
/// Extracted by hand rather than through `Query<GeoQuery>`: a repeated `ip`
/// takes its first value, and an undecodable query string is a bare 400.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GeoQuery {
    /// IPv4 or IPv6 address to look up.
    pub ip: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for GeoQuery
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Undecodable query string");
                StatusCode::BAD_REQUEST
            })?;

        let ip = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "ip").then_some(value));

        Ok(Self { ip })
    }
}

/// Postal code response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ZipResponse {
    /// Postal code of the address; empty when the database has none.
    #[schema(example = "94043")]
    pub zip: String,
}

/// Location response.
#[derive(Debug, Serialize, ToSchema)]
pub struct PointResponse {
    /// `[latitude, longitude]` in decimal degrees.
    #[schema(value_type = Vec<f64>)]
    pub point: [f64; 2],
}

/// Get the postal code for an IP address.
///
/// # Query Parameters
///
/// - `ip`: IPv4 or IPv6 address
///
/// # Returns
///
/// - `200 OK` with the postal code
/// - `400 Bad Request` if `ip` is missing or not an address
/// - `500 Internal Server Error` if the address has no record or the lookup fails
#[utoipa::path(
    get,
    path = "/geo/zip",
    tag = "geo",
    params(GeoQuery),
    responses(
        (status = 200, description = "Postal code found", body = ZipResponse),
        (status = 400, description = "Missing or invalid IP address"),
        (status = 500, description = "No location data for the address")
    )
)]
#[axum::debug_handler]
pub async fn get_zip(
    State(state): State<Arc<AppState>>,
    query: GeoQuery,
) -> Result<Json<ZipResponse>, StatusCode> {
    let record = resolve(&state, &query, "zip")?;

    Ok(Json(ZipResponse {
        zip: record.zip().to_string(),
    }))
}

/// Get the latitude/longitude for an IP address.
///
/// # Query Parameters
///
/// - `ip`: IPv4 or IPv6 address
///
/// # Returns
///
/// - `200 OK` with `[latitude, longitude]`
/// - `400 Bad Request` if `ip` is missing or not an address
/// - `500 Internal Server Error` if the address has no record, the record has
///   no coordinates, or the lookup fails
#[utoipa::path(
    get,
    path = "/geo/point",
    tag = "geo",
    params(GeoQuery),
    responses(
        (status = 200, description = "Location found", body = PointResponse),
        (status = 400, description = "Missing or invalid IP address"),
        (status = 500, description = "No location data for the address")
    )
)]
#[axum::debug_handler]
pub async fn get_point(
    State(state): State<Arc<AppState>>,
    query: GeoQuery,
) -> Result<Json<PointResponse>, StatusCode> {
    let record = resolve(&state, &query, "point")?;

    match record.point {
        Some(point) => Ok(Json(PointResponse {
            point: point.to_lat_lon(),
        })),
        None => {
            tracing::warn!(ip = ?query.ip, "Record has no coordinates");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Resolve the `ip` parameter, mapping every non-found outcome to its status.
fn resolve(
    state: &AppState,
    query: &GeoQuery,
    endpoint: &'static str,
) -> Result<LocationRecord, StatusCode> {
    let raw = query.ip.as_deref().unwrap_or_default();
    let outcome = state.lookup.resolve(raw);

    tracing::debug!(ip = raw, endpoint, outcome = outcome.label(), "Geo query");

    match outcome {
        LookupOutcome::Found(record) => Ok(record),
        LookupOutcome::InvalidInput => Err(StatusCode::BAD_REQUEST),
        LookupOutcome::NotFound => {
            tracing::warn!(ip = raw, endpoint, "Address not in geo database");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        LookupOutcome::BackendError(detail) => {
            tracing::error!(ip = raw, endpoint, error = %detail, "Geo lookup failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Liveness check.
///
/// Always answers `OK` without touching the database.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "system",
    responses(
        (status = 200, description = "Service is alive", body = String, content_type = "text/plain")
    )
)]
pub async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::Request;

    async fn extract(uri: &str) -> Result<GeoQuery, StatusCode> {
        let (mut parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        GeoQuery::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_geo_query_extract() {
        let query = extract("/geo/zip?ip=8.8.8.8").await.unwrap();
        assert_eq!(query.ip.as_deref(), Some("8.8.8.8"));

        let query = extract("/geo/zip").await.unwrap();
        assert!(query.ip.is_none());

        let query = extract("/geo/zip?ip=").await.unwrap();
        assert_eq!(query.ip.as_deref(), Some(""));

        let query = extract("/geo/zip?lang=en&ip=2001%3Adb8%3A%3A1").await.unwrap();
        assert_eq!(query.ip.as_deref(), Some("2001:db8::1"));
    }

    #[tokio::test]
    async fn test_geo_query_repeated_ip_takes_first() {
        let query = extract("/geo/zip?ip=8.8.8.8&ip=1.1.1.1").await.unwrap();
        assert_eq!(query.ip.as_deref(), Some("8.8.8.8"));

        let query = extract("/geo/zip?ip=&ip=1.1.1.1").await.unwrap();
        assert_eq!(query.ip.as_deref(), Some(""));
    }

    #[test]
    fn test_zip_response_serialize() {
        let response = ZipResponse {
            zip: "94043".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"zip":"94043"}"#);
    }

    #[test]
    fn test_point_response_serialize() {
        let response = PointResponse {
            point: [37.4, -122.1],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"point":[37.4,-122.1]}"#);
    }
}
