use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;

use mayab_core::Money;
use mayab_infra::services::InboundRow;
use mayab_orders::{NewLine, Order};
use mayab_products::ProductId;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity_units: Option<i64>,
    pub quantity_boxes: Option<i64>,
    /// Price override in centavos.
    pub unit_price_cents: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub client_id: String,
    pub branch_id: String,
    pub items: Vec<OrderLineRequest>,
    #[serde(default)]
    pub is_pickup: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceItemsRequest {
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub new_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub product_id: String,
    pub delta: i64,
}

/// Raw webhook row. The upstream automation is loose about types, so the
/// quantity may arrive as a JSON number or a string.
#[derive(Debug, Deserialize)]
pub struct WebhookRowRequest {
    pub branch: String,
    pub product: String,
    pub quantity: serde_json::Value,
}

impl WebhookRowRequest {
    pub fn into_row(self) -> InboundRow {
        let quantity = match self.quantity {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        InboundRow {
            branch: self.branch,
            product: self.product,
            quantity,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateDocumentsRequest {
    /// Delivery date to render; defaults to today on the warehouse clock.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub date: Option<NaiveDate>,
    pub folio: Option<String>,
}

// -------------------------
// Mapping helpers
// -------------------------

pub fn order_line_to_new_line(line: OrderLineRequest) -> Result<NewLine, axum::response::Response> {
    let product_id = match line.product_id.parse::<mayab_core::EntityId>() {
        Ok(entity) => ProductId::new(entity),
        Err(_) => {
            return Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid product id",
            ))
        }
    };
    Ok(NewLine {
        product_id,
        quantity_units: line.quantity_units,
        quantity_boxes: line.quantity_boxes,
        unit_price: line.unit_price_cents.map(Money::from_cents),
        notes: line.notes,
    })
}

pub fn order_to_json(order: &Order) -> serde_json::Value {
    serde_json::json!({
        "id": order.id().to_string(),
        "folio": order.folio().map(|f| f.as_str()),
        "client_id": order.client_id().to_string(),
        "branch_id": order.branch_id().to_string(),
        "status": order.status().as_str(),
        "is_pickup": order.is_pickup(),
        "delivery_date": order.delivery_date(),
        "applied_exit": order.applied_exit().map(|e| e.as_str()),
        "rescheduled_from": order.rescheduled_from(),
        "subtotal_cents": order.subtotal().cents(),
        "discount_cents": order.discount().cents(),
        "total_cents": order.total().cents(),
        "notes": order.notes(),
        "created_at": order.created_at(),
        "confirmed_at": order.confirmed_at(),
        "cancelled_at": order.cancelled_at(),
        "cancel_reason": order.cancel_reason(),
        "closed_at": order.closed_at(),
        "items": order.items().iter().map(|item| serde_json::json!({
            "product_id": item.product_id.to_string(),
            "product_name": item.product_name,
            "quantity_units": item.quantity_units,
            "quantity_boxes": item.quantity_boxes,
            "unit_price_cents": item.unit_price.cents(),
            "subtotal_cents": item.subtotal.cents(),
            "units_per_box": item.units_per_box,
            "box_type": item.box_type,
            "notes": item.notes,
        })).collect::<Vec<_>>(),
    })
}
