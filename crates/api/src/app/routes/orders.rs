use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use mayab_core::EntityId;
use mayab_infra::services::{NewOrder, OrderFilter};
use mayab_orders::OrderId;
use mayab_parties::{BranchId, ClientId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/orders", orders_router())
}

fn orders_router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/items", put(replace_items))
        .route("/:id/confirm", post(confirm_order))
        .route("/:id/reschedule", post(reschedule_order))
        .route("/:id/status", post(set_order_status))
}

fn parse_order_id(id: &str) -> Result<OrderId, axum::response::Response> {
    id.parse::<EntityId>().map(OrderId::new).map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
    })
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    let client_id = match body.client_id.parse::<EntityId>() {
        Ok(v) => ClientId::new(v),
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid client id"),
    };
    let branch_id = match body.branch_id.parse::<EntityId>() {
        Ok(v) => BranchId::new(v),
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid branch id"),
    };

    let mut items = Vec::with_capacity(body.items.len());
    for line in body.items {
        match dto::order_line_to_new_line(line) {
            Ok(l) => items.push(l),
            Err(resp) => return resp,
        }
    }

    let request = NewOrder {
        client_id,
        branch_id,
        items,
        is_pickup: body.is_pickup,
        notes: body.notes,
    };

    match services.orders.create_draft(request, Utc::now()) {
        Ok(order) => (
            StatusCode::CREATED,
            Json(serde_json::json!({"order": dto::order_to_json(&order)})),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListOrdersQuery>,
) -> axum::response::Response {
    let status = match query.status.as_deref() {
        Some(raw) => match errors::parse_order_status(raw) {
            Ok(s) => Some(s),
            Err(resp) => return resp,
        },
        None => None,
    };

    let filter = OrderFilter {
        status,
        delivery_date: query.date,
        folio: query.folio,
    };

    match services.orders.list(&filter) {
        Ok(orders) => {
            let items = orders.iter().map(dto::order_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({"orders": items}))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.orders.get(order_id) {
        Ok(order) => (
            StatusCode::OK,
            Json(serde_json::json!({"order": dto::order_to_json(&order)})),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn replace_items(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ReplaceItemsRequest>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut items = Vec::with_capacity(body.items.len());
    for line in body.items {
        match dto::order_line_to_new_line(line) {
            Ok(l) => items.push(l),
            Err(resp) => return resp,
        }
    }

    match services.orders.replace_items(order_id, items) {
        Ok(order) => (
            StatusCode::OK,
            Json(serde_json::json!({"order": dto::order_to_json(&order)})),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn confirm_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.confirmation.confirm(order_id, Utc::now(), None) {
        Ok(order) => (
            StatusCode::OK,
            Json(serde_json::json!({"order": dto::order_to_json(&order)})),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn reschedule_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::RescheduleRequest>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.confirmation.reschedule(order_id, body.new_date) {
        Ok(order) => (
            StatusCode::OK,
            Json(serde_json::json!({"order": dto::order_to_json(&order)})),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn set_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetStatusRequest>,
) -> axum::response::Response {
    let order_id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let status = match errors::parse_order_status(&body.status) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match services
        .confirmation
        .set_status(order_id, status, body.reason, Utc::now())
    {
        Ok(order) => (
            StatusCode::OK,
            Json(serde_json::json!({"order": dto::order_to_json(&order)})),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
