use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/webhook/orders", post(ingest_orders))
}

/// Ingest a batch of raw rows into grouped draft orders. Partial success is
/// the normal outcome: row errors come back alongside the created orders.
pub async fn ingest_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<Vec<dto::WebhookRowRequest>>,
) -> axum::response::Response {
    let rows = body.into_iter().map(dto::WebhookRowRequest::into_row).collect();

    match services.webhook.ingest(rows, Utc::now()) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
