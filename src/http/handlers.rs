//! HTTP handlers and wire types.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::rates::QueryError;
use crate::telemetry::counters;

use super::server::AppState;

/// Rate query request body.
///
/// Fields default rather than hard-fail deserialization so missing input is
/// reported as a 400 with a message, not a framework rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct RateRequest {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub weight: f64,
}

/// Error body for all failure responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub table_loaded: bool,
    pub carriers_count: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Carrier listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarriersResponse {
    pub carriers: Vec<String>,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// POST /rates
pub async fn rates_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RateRequest>,
) -> Response {
    counters::rate_query();

    let Some(engine) = state.engine() else {
        counters::rate_query_rejected("table_unavailable");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            QueryError::TableUnavailable.to_string(),
        );
    };

    match engine.get_rates(&request.country, request.weight) {
        Ok(quote) => {
            counters::rate_results(quote.total_found);
            (StatusCode::OK, Json(quote)).into_response()
        }
        Err(e) => {
            let (status, reason) = match &e {
                QueryError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                QueryError::NoDataFound(_) => (StatusCode::NOT_FOUND, "no_data"),
                QueryError::TableUnavailable => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "table_unavailable")
                }
            };
            counters::rate_query_rejected(reason);
            error_response(status, e.to_string())
        }
    }
}

/// GET /carriers
pub async fn carriers_handler(State(state): State<Arc<AppState>>) -> Response {
    let Some(engine) = state.engine() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            QueryError::TableUnavailable.to_string(),
        );
    };

    Json(CarriersResponse {
        carriers: engine.table().carrier_names(),
    })
    .into_response()
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let loaded = state.engine().is_some();
    let response = HealthResponse {
        status: if loaded { "healthy" } else { "unhealthy" }.to_string(),
        table_loaded: loaded,
        carriers_count: state
            .engine()
            .map(|e| e.table().carriers.len())
            .unwrap_or(0),
        uptime_seconds: state.uptime().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if loaded {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// GET /metrics (Prometheus text format)
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let output = String::from_utf8(buffer).unwrap_or_default();
            (
                StatusCode::OK,
                [("content-type", "text/plain; charset=utf-8")],
                output,
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Error encoding metrics: {}", e),
        ),
    }
}

/// GET / (embedded frontend)
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
