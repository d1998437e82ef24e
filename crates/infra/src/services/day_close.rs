//! End-of-day batch close.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use mayab_core::{DomainError, DomainResult};
use mayab_orders::OrderStatus;

use crate::services::inventory::apply_allocation;
use crate::store::InMemoryStore;

/// Outcome of one day-close run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCloseReport {
    pub orders_processed: usize,
    pub timestamp: DateTime<Utc>,
}

/// Closes every confirmed order and deducts its inventory, as one atomic
/// batch: a failure in any order rolls back the whole day.
///
/// Rescheduled orders survive the close; drafts are never auto-closed.
#[derive(Debug, Clone)]
pub struct DayCloseProcessor {
    store: Arc<InMemoryStore>,
}

impl DayCloseProcessor {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    pub fn process_day(&self, now: DateTime<Utc>) -> DomainResult<DayCloseReport> {
        let report = self.store.transaction(|state| {
            let ids = state.orders_with_status(OrderStatus::Confirmed);
            if ids.is_empty() {
                return Ok(DayCloseReport {
                    orders_processed: 0,
                    timestamp: now,
                });
            }

            for id in &ids {
                let (items, applied_exit) = {
                    let order = state.order(*id)?;
                    (order.items().to_vec(), order.applied_exit())
                };
                let exit = applied_exit.ok_or_else(|| {
                    DomainError::internal(format!("confirmed order {id} has no applied exit type"))
                })?;

                for item in &items {
                    // Snapshot units-per-box: product edits after
                    // confirmation must not change the deduction.
                    apply_allocation(
                        state,
                        item.product_id,
                        item.quantity_units,
                        item.units_per_box,
                        exit,
                    )?;
                }

                state.order_mut(*id)?.close(now)?;
            }

            Ok(DayCloseReport {
                orders_processed: ids.len(),
                timestamp: now,
            })
        })?;

        if report.orders_processed == 0 {
            tracing::info!("day close: nothing confirmed, no-op");
        } else {
            tracing::info!(orders = report.orders_processed, "day close committed");
        }
        Ok(report)
    }
}
