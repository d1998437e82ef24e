//! Warehouse ledger mutations: manual adjustments and fulfillment deduction.

use std::sync::Arc;

use mayab_core::{DomainError, DomainResult};
use mayab_inventory::{allocation, Warehouse};
use mayab_parties::ExitType;
use mayab_products::ProductId;

use crate::store::{InMemoryStore, StoreState};

/// Applies the two-tier deduction policy and manual corrections against the
/// ledgers. Hunucma is hard-floored at zero; Zelma absorbs overdraw.
#[derive(Debug, Clone)]
pub struct InventoryAllocator {
    store: Arc<InMemoryStore>,
}

impl InventoryAllocator {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    /// Manual stock correction outside order fulfillment.
    ///
    /// Hunucma rejects any delta that would drive the row negative; Zelma
    /// has no floor. Returns the new level.
    pub fn adjust(&self, warehouse: Warehouse, product_id: ProductId, delta: i64) -> DomainResult<i64> {
        let level = self.store.transaction(|state| match warehouse {
            Warehouse::Hunucma => state
                .hunucma_row_mut(product_id)
                .ok_or_else(|| DomainError::not_found("hunucma inventory", product_id))?
                .adjust(delta),
            Warehouse::Zelma => state
                .zelma_row_mut(product_id)
                .ok_or_else(|| DomainError::not_found("zelma inventory", product_id))?
                .adjust(delta),
        })?;
        tracing::info!(%warehouse, product_id = %product_id, delta, level, "stock adjusted");
        Ok(level)
    }

    /// Deduct a requirement according to the exit-type policy, in its own
    /// transaction. Uses the product's current units-per-box; day-close uses
    /// the order item's snapshot instead.
    pub fn allocate(&self, product_id: ProductId, required_units: i64, exit: ExitType) -> DomainResult<()> {
        self.store.transaction(|state| {
            let units_per_box = state.product(product_id)?.units_per_box();
            apply_allocation(state, product_id, required_units, units_per_box, exit)
        })
    }

    /// Current `(hunucma units, zelma boxes)` levels, missing rows as zero.
    pub fn levels(&self, product_id: ProductId) -> DomainResult<(i64, i64)> {
        self.store
            .read(|state| Ok((state.hunucma_units(product_id), state.zelma_boxes(product_id))))
    }
}

/// Apply one line's deduction inside an already-open transaction.
///
/// A ledger with no row for the product is zero stock: there is nothing to
/// mutate there, and the other ledger's share still applies.
pub(crate) fn apply_allocation(
    state: &mut StoreState,
    product_id: ProductId,
    required_units: i64,
    units_per_box: i64,
    exit: ExitType,
) -> DomainResult<()> {
    let hunucma_available = state.hunucma_units(product_id);
    let split = allocation::plan(exit, required_units, hunucma_available, units_per_box)?;

    if split.hunucma_units > 0 {
        if let Some(row) = state.hunucma_row_mut(product_id) {
            row.deduct(split.hunucma_units)?;
        }
    }
    if split.zelma_boxes > 0 {
        if let Some(row) = state.zelma_row_mut(product_id) {
            row.deduct_boxes(split.zelma_boxes)?;
        }
    }
    Ok(())
}
