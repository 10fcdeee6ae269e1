// =============================================================================
// Dashboard Page — the single HTML document served at `/`
// =============================================================================
//
// The page is static; it calls `/api/v1/dashboard` and hands each figure to
// plotly.js unchanged.

use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}
