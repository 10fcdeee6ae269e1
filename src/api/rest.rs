// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// JSON endpoints live under `/api/v1/`; the dashboard page is served at `/`.
// `/api/v1/dashboard` always answers 200 and carries the unavailable outcome
// in its body so the page can render the error banner. The narrower history
// and company endpoints answer 404 with the same generic message instead.
//
// CORS is configured permissively; tighten `allow_origin` when the page is
// served from a known host.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::api::page;
use crate::app_state::AppState;
use crate::dashboard::{build_dashboard, unavailable_message, CompanyCard, DashboardQuery};
use crate::indicators::{calculate_indicators, SeriesRow};
use crate::market_data::CacheStats;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS and request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Page ────────────────────────────────────────────────────
        .route("/", get(page::index))
        // ── JSON ────────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/history", get(history))
        .route("/api/v1/company", get(company))
        // ── Middleware & State ───────────────────────────────────────
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

fn bad_query(rejection: QueryRejection) -> Response {
    warn!(error = %rejection, "rejected malformed query");
    error_response(StatusCode::BAD_REQUEST, rejection.body_text())
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    dashboards_served: u64,
    cache: CacheStats,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        dashboards_served: state.dashboards_served(),
        cache: state.market_data.cache_stats(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Dashboard
// =============================================================================

async fn dashboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return bad_query(rejection),
    };

    let resolved = query.resolve(&state.config, state.today());
    let response = build_dashboard(&state.market_data, &resolved, &state.config).await;
    let served = state.record_dashboard();
    debug!(symbol = %resolved.symbol, ok = response.is_ok(), served, "dashboard request");

    Json(response).into_response()
}

// =============================================================================
// History
// =============================================================================

#[derive(Serialize)]
struct HistoryResponse {
    symbol: String,
    columns: Vec<String>,
    rows: Vec<SeriesRow>,
}

async fn history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return bad_query(rejection),
    };

    let resolved = query.resolve(&state.config, state.today());
    let Some(bars) = state
        .market_data
        .fetch_history(&resolved.symbol, resolved.start, resolved.end)
        .await
    else {
        return error_response(StatusCode::NOT_FOUND, unavailable_message(&resolved.symbol));
    };

    let series = calculate_indicators(bars.to_vec());
    Json(HistoryResponse {
        symbol: resolved.symbol,
        columns: series.column_names(),
        rows: series.rows_from(0),
    })
    .into_response()
}

// =============================================================================
// Company
// =============================================================================

#[derive(Deserialize)]
struct CompanyQuery {
    symbol: Option<String>,
}

async fn company(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return bad_query(rejection),
    };

    let symbol = query
        .symbol
        .unwrap_or_else(|| state.config.default_symbol.clone())
        .trim()
        .to_uppercase();

    match state.market_data.fetch_metadata(&symbol).await {
        Some(info) => Json(CompanyCard::from(&info)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, unavailable_message(&symbol)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fake::FakeSource;
    use crate::runtime_config::DashboardConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(closes: &[f64]) -> (Router, Arc<AppState>) {
        let source = Arc::new(FakeSource::with_closes("MSFT", closes));
        let state = Arc::new(AppState::new(DashboardConfig::default(), source));
        (router(state.clone()), state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (app, _) = app(&[1.0]);
        let (status, body) = get_json(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cache"]["history_entries"], 0);
    }

    #[tokio::test]
    async fn dashboard_for_known_symbol() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let (app, state) = app(&closes);
        let (status, body) =
            get_json(app, "/api/v1/dashboard?symbol=msft&start=2024-01-01&end=2024-06-01").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["symbol"], "MSFT");
        assert_eq!(body["start"], "2024-01-01");
        assert_eq!(body["charts"]["price"]["data"][0]["type"], "candlestick");
        assert_eq!(body["charts"]["price"]["data"].as_array().unwrap().len(), 3);
        assert_eq!(body["recent_rows"].as_array().unwrap().len(), 5);
        assert_eq!(state.dashboards_served(), 1);
    }

    #[tokio::test]
    async fn dashboard_unknown_symbol_is_generic_banner() {
        let (app, _) = app(&[1.0, 2.0]);
        let (status, body) = get_json(app, "/api/v1/dashboard?symbol=NOPE").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unavailable");
        assert_eq!(body["message"], unavailable_message("NOPE"));
    }

    #[tokio::test]
    async fn malformed_date_is_bad_request() {
        let (app, _) = app(&[1.0]);
        let (status, body) = get_json(app, "/api/v1/dashboard?start=not-a-date").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn cleared_date_inputs_use_defaults() {
        let (app, _) = app(&[1.0, 2.0, 3.0]);
        let (status, body) = get_json(app.clone(), "/api/v1/dashboard?symbol=MSFT&start=&end=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        // Default start (a year back) is after this end: generic banner, not a 400.
        let (status, body) =
            get_json(app, "/api/v1/dashboard?symbol=MSFT&start=&end=2000-01-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "unavailable");
        assert_eq!(body["message"], unavailable_message("MSFT"));
    }

    #[tokio::test]
    async fn history_rows_carry_indicator_columns() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        let (app, _) = app(&closes);
        let (status, body) =
            get_json(app, "/api/v1/history?symbol=MSFT&start=2024-01-01&end=2024-03-01").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["columns"], serde_json::json!(["SMA_20", "RSI_14"]));
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 25);
        assert!(rows[0]["SMA_20"].is_null());
        assert_eq!(rows[24]["SMA_20"], 15.5);
    }

    #[tokio::test]
    async fn history_and_company_unavailable_are_not_found() {
        let (app, _) = app(&[1.0]);
        let (status, body) = get_json(app.clone(), "/api/v1/history?symbol=NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], unavailable_message("NOPE"));

        let (status, _) = get_json(app, "/api/v1/company?symbol=NOPE").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn company_defaults_to_configured_symbol() {
        let (app, _) = app(&[1.0]);
        let (status, body) = get_json(app, "/api/v1/company").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "MSFT Corp");
        assert_eq!(body["market_cap_display"], "2,500.00B $");
    }

    #[tokio::test]
    async fn index_serves_html() {
        let (app, _) = app(&[1.0]);
        let resp = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/v1/dashboard"));
    }
}
