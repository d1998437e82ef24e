use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/operations", operations_router())
}

fn operations_router() -> Router {
    Router::new()
        .route("/day-close", post(day_close))
        .route("/documents", post(generate_documents))
}

/// Close the day: every confirmed order moves to closed and its inventory is
/// deducted, atomically.
pub async fn day_close(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.day_close.process_day(Utc::now()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Render the day's printable set through the document collaborator.
pub async fn generate_documents(
    Extension(services): Extension<Arc<AppServices>>,
    body: Option<Json<dto::GenerateDocumentsRequest>>,
) -> axum::response::Response {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let date = request
        .date
        .unwrap_or_else(|| services.calendar.local_date(Utc::now()));

    match services.documents.generate_for_day(date) {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
