use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use mayab_core::DomainError;
use mayab_orders::OrderStatus;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        DomainError::Validation { .. } => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        DomainError::StateConflict { .. } => {
            json_error(StatusCode::CONFLICT, "state_conflict", err.to_string())
        }
        DomainError::InsufficientStock { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_stock", err.to_string())
        }
        DomainError::UniqueViolation { .. } => {
            json_error(StatusCode::CONFLICT, "unique_violation", err.to_string())
        }
        DomainError::Internal(detail) => {
            // Detail goes to the logs only; callers get a generic failure.
            tracing::error!(%detail, "internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_order_status(s: &str) -> Result<OrderStatus, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "draft" => Ok(OrderStatus::Draft),
        "confirmed" => Ok(OrderStatus::Confirmed),
        "rescheduled" => Ok(OrderStatus::Rescheduled),
        "cancelled" => Ok(OrderStatus::Cancelled),
        "closed" => Ok(OrderStatus::Closed),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_status",
            "status must be one of: draft, confirmed, rescheduled, cancelled, closed",
        )),
    }
}
