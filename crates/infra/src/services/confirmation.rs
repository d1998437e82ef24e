//! Order state machine orchestration.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use mayab_core::{DomainError, DomainResult, UserId};
use mayab_inventory::allocation;
use mayab_orders::{DeliveryCalendar, Order, OrderId, OrderStatus};
use mayab_parties::ExitType;

use crate::store::InMemoryStore;

/// Owns the draft→confirmed transition plus reschedule, cancel and the
/// generic status escape hatch.
///
/// Confirmation performs an availability *check*, not a reservation: stock
/// is deducted only at day-close.
#[derive(Debug, Clone)]
pub struct ConfirmationEngine {
    store: Arc<InMemoryStore>,
    calendar: DeliveryCalendar,
}

impl ConfirmationEngine {
    pub fn new(store: Arc<InMemoryStore>, calendar: DeliveryCalendar) -> Self {
        Self { store, calendar }
    }

    /// Confirm a draft: stock check, folio, delivery date and applied
    /// exit-type, all inside one transaction.
    pub fn confirm(
        &self,
        order_id: OrderId,
        now: DateTime<Utc>,
        confirmed_by: Option<UserId>,
    ) -> DomainResult<Order> {
        let order = self.store.transaction(|state| {
            let (status, items, is_pickup, client_id) = {
                let order = state.order(order_id)?;
                (
                    order.status(),
                    order.items().to_vec(),
                    order.is_pickup(),
                    order.client_id(),
                )
            };

            if status != OrderStatus::Draft {
                return Err(DomainError::state_conflict(status.as_str(), "confirm"));
            }

            // Availability check against both ledgers; missing rows read as
            // zero. Any short product fails the whole confirmation.
            for item in &items {
                let required = item.quantity_units;
                let hunucma = state.hunucma_units(item.product_id);
                let zelma = state.zelma_boxes(item.product_id);
                if !allocation::covers(required, hunucma, zelma, item.units_per_box) {
                    let available = hunucma + zelma.max(0) * item.units_per_box;
                    return Err(DomainError::insufficient_stock(item.product_id, required, available));
                }
            }

            let applied_exit = if is_pickup {
                ExitType::Pickup
            } else if state.client(client_id)?.exit_type() == ExitType::FirstExit {
                ExitType::FirstExit
            } else {
                ExitType::NormalExit
            };

            let folio = state.take_next_folio();
            let delivery_date = self.calendar.delivery_date_for(now);

            let order = state.order_mut(order_id)?;
            order.confirm(folio, delivery_date, applied_exit, now, confirmed_by)?;
            Ok(order.clone())
        })?;

        tracing::info!(
            order_id = %order_id,
            folio = order.folio().map(|f| f.as_str()).unwrap_or(""),
            delivery_date = %order.delivery_date().map(|d| d.to_string()).unwrap_or_default(),
            exit = %order.applied_exit().map(|e| e.as_str()).unwrap_or(""),
            "order confirmed"
        );
        Ok(order)
    }

    /// Move a confirmed order's delivery date, archiving the current one.
    pub fn reschedule(&self, order_id: OrderId, new_date: NaiveDate) -> DomainResult<Order> {
        let order = self.store.transaction(|state| {
            let order = state.order_mut(order_id)?;
            order.reschedule(new_date)?;
            Ok(order.clone())
        })?;
        tracing::info!(order_id = %order_id, new_date = %new_date, "order rescheduled");
        Ok(order)
    }

    /// Cancel a confirmed or rescheduled order. Inventory is untouched.
    pub fn cancel(
        &self,
        order_id: OrderId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Order> {
        let order = self.store.transaction(|state| {
            let order = state.order_mut(order_id)?;
            order.cancel(reason, now)?;
            Ok(order.clone())
        })?;
        tracing::info!(order_id = %order_id, "order cancelled");
        Ok(order)
    }

    /// Generic status change (the cancel path of the API). Honors the same
    /// legality table as the named transitions.
    pub fn set_status(
        &self,
        order_id: OrderId,
        next: OrderStatus,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Order> {
        let order = self.store.transaction(|state| {
            let order = state.order_mut(order_id)?;
            order.set_status(next, reason, now)?;
            Ok(order.clone())
        })?;
        tracing::info!(order_id = %order_id, status = %order.status(), "order status updated");
        Ok(order)
    }
}
