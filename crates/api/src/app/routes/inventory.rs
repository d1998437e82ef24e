use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use mayab_core::EntityId;
use mayab_inventory::Warehouse;
use mayab_products::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/inventory", inventory_router())
}

fn inventory_router() -> Router {
    Router::new()
        .route("/hunucma", get(list_hunucma))
        .route("/zelma", get(list_zelma))
        .route("/hunucma/adjust", post(adjust_hunucma))
        .route("/zelma/adjust", post(adjust_zelma))
}

pub async fn list_hunucma(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    list_warehouse(&services, Warehouse::Hunucma)
}

pub async fn list_zelma(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    list_warehouse(&services, Warehouse::Zelma)
}

fn list_warehouse(services: &AppServices, warehouse: Warehouse) -> axum::response::Response {
    let rows = services.store.read(|state| {
        Ok(state
            .inventory_levels()
            .into_iter()
            .map(|(product, hunucma_units, zelma_boxes)| match warehouse {
                Warehouse::Hunucma => serde_json::json!({
                    "product_id": product.id().to_string(),
                    "name": product.name(),
                    "stock_units": hunucma_units,
                }),
                Warehouse::Zelma => serde_json::json!({
                    "product_id": product.id().to_string(),
                    "name": product.name(),
                    "stock_boxes": zelma_boxes,
                }),
            })
            .collect::<Vec<_>>())
    });

    match rows {
        Ok(rows) => (StatusCode::OK, Json(serde_json::json!({"inventory": rows}))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn adjust_hunucma(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    adjust(&services, Warehouse::Hunucma, body)
}

pub async fn adjust_zelma(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    adjust(&services, Warehouse::Zelma, body)
}

fn adjust(
    services: &AppServices,
    warehouse: Warehouse,
    body: dto::AdjustStockRequest,
) -> axum::response::Response {
    let product_id = match body.product_id.parse::<EntityId>() {
        Ok(v) => ProductId::new(v),
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
        }
    };

    match services.inventory.adjust(warehouse, product_id, body.delta) {
        Ok(level) => {
            (StatusCode::OK, Json(serde_json::json!({"success": true, "new_level": level})))
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
