//! Webhook ingestion: unstructured external rows into grouped draft orders.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mayab_core::{DomainError, DomainResult, Money};
use mayab_orders::{NewLine, OrderId};
use mayab_parties::{BranchId, ClientId};
use mayab_products::BoxType;

use crate::services::orders::{build_draft, NewOrder};
use crate::store::InMemoryStore;

const WEBHOOK_LINE_NOTE: &str = "automated webhook order";

/// One raw row as the upstream automation sends it: a branch display name,
/// a product display name and a quantity that may arrive as number or text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundRow {
    pub branch: String,
    pub product: String,
    pub quantity: String,
}

/// Brief of one draft order the ingestion created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedOrder {
    pub order_id: OrderId,
    pub branch: String,
    pub item_count: usize,
    pub total: Money,
}

/// Ingestion summary. Partial success is the normal outcome: row-level
/// errors ride alongside the orders that did materialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub orders_created: usize,
    pub orders: Vec<IngestedOrder>,
    pub errors: Vec<String>,
}

struct PendingGroup {
    client_id: ClientId,
    branch_id: BranchId,
    branch_name: String,
    lines: Vec<NewLine>,
}

/// Resolves raw rows into grouped draft orders through the regular
/// draft-creation path, collecting row-level errors instead of aborting.
#[derive(Debug, Clone)]
pub struct WebhookIngestor {
    store: Arc<InMemoryStore>,
}

impl WebhookIngestor {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    pub fn ingest(&self, rows: Vec<InboundRow>, now: DateTime<Utc>) -> DomainResult<IngestReport> {
        if rows.is_empty() {
            return Err(DomainError::validation("rows", "expected at least one row"));
        }

        let report = self.store.transaction(|state| {
            let mut errors: Vec<String> = Vec::new();
            let mut groups: Vec<PendingGroup> = Vec::new();

            for row in &rows {
                let branch_name = row.branch.trim();
                let product_name = row.product.trim();
                let quantity_raw = row.quantity.trim();

                if branch_name.is_empty() || product_name.is_empty() || quantity_raw.is_empty() {
                    errors.push(format!(
                        "incomplete row: branch=\"{}\" product=\"{}\" quantity=\"{}\"",
                        row.branch, row.product, row.quantity
                    ));
                    continue;
                }

                let Some(branch) = state.branch_by_name(branch_name) else {
                    errors.push(format!("branch not found: \"{branch_name}\""));
                    continue;
                };

                let Some(product) = state.active_product_by_name(product_name) else {
                    errors.push(format!(
                        "product not found: \"{product_name}\" for branch \"{branch_name}\""
                    ));
                    continue;
                };

                let quantity = match parse_quantity(quantity_raw) {
                    Some(q) => q,
                    None => {
                        errors.push(format!(
                            "invalid quantity \"{quantity_raw}\" for product \"{product_name}\""
                        ));
                        continue;
                    }
                };

                // Fixed-box products are ordered in boxes; everything else
                // in loose units. The draft path derives the complement.
                let line = if product.box_type() == BoxType::Fixed {
                    NewLine {
                        product_id: product.id(),
                        quantity_units: None,
                        quantity_boxes: Some(quantity),
                        unit_price: None,
                        notes: Some(WEBHOOK_LINE_NOTE.to_string()),
                    }
                } else {
                    NewLine {
                        product_id: product.id(),
                        quantity_units: Some(quantity),
                        quantity_boxes: None,
                        unit_price: None,
                        notes: Some(WEBHOOK_LINE_NOTE.to_string()),
                    }
                };

                let client_id = branch.client_id();
                let branch_id = branch.id();
                let branch_display = branch.name().to_string();

                match groups
                    .iter_mut()
                    .find(|g| g.client_id == client_id && g.branch_id == branch_id)
                {
                    Some(group) => group.lines.push(line),
                    None => groups.push(PendingGroup {
                        client_id,
                        branch_id,
                        branch_name: branch_display,
                        lines: vec![line],
                    }),
                }
            }

            let mut created = Vec::with_capacity(groups.len());
            for group in groups {
                let order = build_draft(
                    state,
                    &NewOrder {
                        client_id: group.client_id,
                        branch_id: group.branch_id,
                        items: group.lines,
                        is_pickup: false,
                        notes: Some("order created automatically via webhook".to_string()),
                    },
                    now,
                )?;
                created.push(IngestedOrder {
                    order_id: order.id(),
                    branch: group.branch_name,
                    item_count: order.items().len(),
                    total: order.total(),
                });
            }

            Ok(IngestReport {
                orders_created: created.len(),
                orders: created,
                errors,
            })
        })?;

        tracing::info!(
            orders = report.orders_created,
            rejected_rows = report.errors.len(),
            "webhook batch ingested"
        );
        for error in &report.errors {
            tracing::warn!(%error, "webhook row rejected");
        }
        Ok(report)
    }
}

/// Quantities must be positive whole numbers; the upstream sheet sometimes
/// sends them as text.
fn parse_quantity(raw: &str) -> Option<i64> {
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_parsing_accepts_positive_integers_only() {
        assert_eq!(parse_quantity("3"), Some(3));
        assert_eq!(parse_quantity("12.0"), Some(12));
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("-2"), None);
        assert_eq!(parse_quantity("2.5"), None);
        assert_eq!(parse_quantity("muchas"), None);
    }
}
