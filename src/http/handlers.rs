//! Route handlers.
//!
//! Each API handler validates its inputs, builds one `UpstreamRequest`,
//! and wraps the result in an `Envelope`. Input problems short-circuit
//! before any upstream call.

use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    response::Html,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::request::InboundRequestId;
use crate::http::response::Envelope;
use crate::http::server::AppState;
use crate::upstream::{UpstreamError, UpstreamRequest, UpstreamResult};

/// Query string as ordered pairs; repeated keys are kept.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.landing.as_ref().clone())
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /api/properties` → `suburb/properties`, with catalog defaults.
pub async fn properties(
    State(state): State<AppState>,
    InboundRequestId(request_id): InboundRequestId,
    query: QueryPairs,
) -> Envelope {
    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => return Envelope::listing(Err(bad_query(e))),
    };

    let catalog = &state.config.catalog;
    let suburb =
        first_non_empty(&params, "suburb").unwrap_or_else(|| catalog.default_suburb.clone());
    let property_type = first_non_empty(&params, "property_type")
        .unwrap_or_else(|| catalog.default_property_type.clone());

    let request = UpstreamRequest::new("suburb/properties")
        .param("suburb", suburb)
        .param("property_type", property_type)
        .request_id(request_id);

    let result = state.upstream.fetch(&request).await;
    if let Ok(data) = &result {
        let count = data
            .get("results")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        tracing::info!(count, "Received properties");
    }
    Envelope::listing(result)
}

/// `GET /api/suburb/{endpoint}` → `suburb/{endpoint}`.
pub async fn suburb_data(
    State(state): State<AppState>,
    InboundRequestId(request_id): InboundRequestId,
    endpoint: Result<Path<String>, PathRejection>,
    query: QueryPairs,
) -> Envelope {
    Envelope::plain(forward_suburb(&state, request_id, endpoint, query).await)
}

async fn forward_suburb(
    state: &AppState,
    request_id: String,
    endpoint: Result<Path<String>, PathRejection>,
    query: QueryPairs,
) -> UpstreamResult<Value> {
    let endpoint = checked_endpoint(endpoint)?;
    let Query(params) = query.map_err(bad_query)?;
    let suburb = first_non_empty(&params, "suburb")
        .unwrap_or_else(|| state.config.catalog.default_suburb.clone());

    let request = UpstreamRequest::new(format!("suburb/{}", endpoint))
        .param("suburb", suburb)
        .request_id(request_id);
    state.upstream.fetch(&request).await
}

/// `GET /api/property/{endpoint}` → `property/{endpoint}`, query passed through.
pub async fn property_data(
    State(state): State<AppState>,
    InboundRequestId(request_id): InboundRequestId,
    endpoint: Result<Path<String>, PathRejection>,
    query: QueryPairs,
) -> Envelope {
    Envelope::plain(forward_property(&state, request_id, endpoint, query).await)
}

async fn forward_property(
    state: &AppState,
    request_id: String,
    endpoint: Result<Path<String>, PathRejection>,
    query: QueryPairs,
) -> UpstreamResult<Value> {
    let endpoint = checked_endpoint(endpoint)?;
    let Query(params) = query.map_err(bad_query)?;

    let request = UpstreamRequest::new(format!("property/{}", endpoint))
        .params(params)
        .request_id(request_id);
    state.upstream.fetch(&request).await
}

/// `GET /api/avm?address=`
pub async fn avm(
    State(state): State<AppState>,
    InboundRequestId(request_id): InboundRequestId,
    query: QueryPairs,
) -> Envelope {
    Envelope::plain(lookup(&state, "avm", request_id, query).await)
}

/// `GET /api/cma?address=`
pub async fn cma(
    State(state): State<AppState>,
    InboundRequestId(request_id): InboundRequestId,
    query: QueryPairs,
) -> Envelope {
    Envelope::plain(lookup(&state, "cma", request_id, query).await)
}

async fn lookup(
    state: &AppState,
    path: &'static str,
    request_id: String,
    query: QueryPairs,
) -> UpstreamResult<Value> {
    let Query(params) = query.map_err(bad_query)?;
    let address = first_non_empty(&params, "address")
        .ok_or(UpstreamError::MissingParameter { label: "Address" })?;

    let request = UpstreamRequest::new(path)
        .param("address", address)
        .request_id(request_id);
    state.upstream.fetch(&request).await
}

/// First value given for `key`. Absent, empty and whitespace-only values
/// are treated alike.
fn first_non_empty(params: &[(String, String)], key: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
        .filter(|v| !v.trim().is_empty())
        .cloned()
}

/// Endpoint names become a single upstream path segment.
fn checked_endpoint(endpoint: Result<Path<String>, PathRejection>) -> UpstreamResult<String> {
    let Path(endpoint) =
        endpoint.map_err(|e| UpstreamError::InvalidParameter(format!("Invalid endpoint: {}", e)))?;

    let valid = !endpoint.is_empty()
        && endpoint
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(endpoint)
    } else {
        Err(UpstreamError::InvalidParameter(format!(
            "Invalid endpoint: {}",
            endpoint
        )))
    }
}

fn bad_query(rejection: QueryRejection) -> UpstreamError {
    UpstreamError::InvalidParameter(format!("Invalid query: {}", rejection.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_non_empty_filters_blank() {
        let params = pairs(&[("suburb", ""), ("property_type", "  "), ("address", "1 Main St")]);
        assert_eq!(first_non_empty(&params, "missing"), None);
        assert_eq!(first_non_empty(&params, "suburb"), None);
        assert_eq!(first_non_empty(&params, "property_type"), None);
        assert_eq!(
            first_non_empty(&params, "address"),
            Some("1 Main St".to_string())
        );
    }

    #[test]
    fn test_first_non_empty_takes_first_repeat() {
        let params = pairs(&[("suburb", "Belmont North"), ("suburb", "Warners Bay")]);
        assert_eq!(
            first_non_empty(&params, "suburb"),
            Some("Belmont North".to_string())
        );

        // An empty first value is not replaced by a later one.
        let params = pairs(&[("property_type", ""), ("property_type", "house")]);
        assert_eq!(first_non_empty(&params, "property_type"), None);
    }

    #[test]
    fn test_checked_endpoint() {
        assert_eq!(
            checked_endpoint(Ok(Path("market-insights".to_string()))).unwrap(),
            "market-insights"
        );
        assert_eq!(
            checked_endpoint(Ok(Path("price_history2".to_string()))).unwrap(),
            "price_history2"
        );

        for bad in ["..", "a/b", "", "x y", "%2e%2e"] {
            let err = checked_endpoint(Ok(Path(bad.to_string()))).unwrap_err();
            assert_eq!(err.kind(), crate::upstream::FailureKind::InvalidParameter);
        }
    }
}
