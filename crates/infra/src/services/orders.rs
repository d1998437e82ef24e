//! Draft order intake and editing.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use mayab_core::{DomainResult, EntityId};
use mayab_orders::{NewLine, Order, OrderId, OrderItem, OrderStatus};
use mayab_parties::{BranchId, ClientId};

use crate::store::{InMemoryStore, StoreState};

/// Request to create a draft order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: ClientId,
    pub branch_id: BranchId,
    pub items: Vec<NewLine>,
    pub is_pickup: bool,
    pub notes: Option<String>,
}

/// Listing filter (all conditions are conjunctive).
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub delivery_date: Option<NaiveDate>,
    /// Substring match against the assigned folio.
    pub folio: Option<String>,
}

impl OrderFilter {
    fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status {
            if order.status() != status {
                return false;
            }
        }
        if let Some(date) = self.delivery_date {
            if order.delivery_date() != Some(date) {
                return false;
            }
        }
        if let Some(ref needle) = self.folio {
            match order.folio() {
                Some(f) if f.as_str().contains(needle.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Creates and edits draft orders. Drafts carry no folio and no delivery
/// date; both arrive at confirmation.
#[derive(Debug, Clone)]
pub struct OrderService {
    store: Arc<InMemoryStore>,
}

impl OrderService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    /// Create a draft. All-or-nothing: an unknown client, branch or product
    /// aborts the whole creation.
    pub fn create_draft(&self, request: NewOrder, now: DateTime<Utc>) -> DomainResult<Order> {
        let order = self.store.transaction(|state| build_draft(state, &request, now))?;
        tracing::info!(
            order_id = %order.id(),
            items = order.items().len(),
            total = %order.total(),
            "draft order created"
        );
        Ok(order)
    }

    /// Replace a draft's items wholesale and recompute its totals.
    pub fn replace_items(&self, order_id: OrderId, lines: Vec<NewLine>) -> DomainResult<Order> {
        let order = self.store.transaction(|state| {
            let items = resolve_items(state, &lines)?;
            let order = state.order_mut(order_id)?;
            order.replace_items(items)?;
            Ok(order.clone())
        })?;
        tracing::info!(order_id = %order_id, items = order.items().len(), "order items replaced");
        Ok(order)
    }

    pub fn get(&self, order_id: OrderId) -> DomainResult<Order> {
        self.store.read(|state| state.order(order_id).cloned())
    }

    pub fn list(&self, filter: &OrderFilter) -> DomainResult<Vec<Order>> {
        self.store.read(|state| {
            Ok(state
                .orders_newest_first()
                .into_iter()
                .filter(|o| filter.matches(o))
                .cloned()
                .collect())
        })
    }
}

/// Shared draft-creation path, also used by webhook ingestion inside its
/// batch transaction.
pub(crate) fn build_draft(
    state: &mut StoreState,
    request: &NewOrder,
    now: DateTime<Utc>,
) -> DomainResult<Order> {
    state.client(request.client_id)?;
    state.branch(request.branch_id)?;

    let items = resolve_items(state, &request.items)?;
    let order = Order::draft(
        OrderId::new(EntityId::new()),
        request.client_id,
        request.branch_id,
        items,
        request.is_pickup,
        request.notes.clone(),
        now,
    )?;
    state.put_order(order.clone());
    Ok(order)
}

/// Resolve requested lines against the catalog, freezing snapshots.
pub(crate) fn resolve_items(state: &StoreState, lines: &[NewLine]) -> DomainResult<Vec<OrderItem>> {
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let product = state.product(line.product_id)?;
        items.push(OrderItem::build(product, line)?);
    }
    Ok(items)
}
