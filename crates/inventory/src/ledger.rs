use serde::{Deserialize, Serialize};

use mayab_core::{DomainError, DomainResult};
use mayab_products::ProductId;

/// The two physical warehouses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Warehouse {
    Hunucma,
    Zelma,
}

impl core::fmt::Display for Warehouse {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Warehouse::Hunucma => "hunucma",
            Warehouse::Zelma => "zelma",
        })
    }
}

/// Hunucma ledger row: loose units, never negative after a committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitLedger {
    product_id: ProductId,
    stock_units: i64,
}

impl UnitLedger {
    pub fn new(product_id: ProductId, stock_units: i64) -> DomainResult<Self> {
        if stock_units < 0 {
            return Err(DomainError::validation("stock_units", "cannot start negative"));
        }
        Ok(Self {
            product_id,
            stock_units,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn stock_units(&self) -> i64 {
        self.stock_units
    }

    /// Manual correction. Rejected when it would drive the stock below zero.
    pub fn adjust(&mut self, delta: i64) -> DomainResult<i64> {
        let next = self
            .stock_units
            .checked_add(delta)
            .ok_or_else(|| DomainError::internal("hunucma stock adjustment overflow"))?;
        if next < 0 {
            return Err(DomainError::validation("delta", "stock cannot go negative"));
        }
        self.stock_units = next;
        Ok(next)
    }

    /// Fulfillment deduction of an amount this row fully covers.
    pub fn deduct(&mut self, units: i64) -> DomainResult<()> {
        if units < 0 {
            return Err(DomainError::validation("units", "cannot deduct a negative quantity"));
        }
        if units > self.stock_units {
            return Err(DomainError::insufficient_stock(
                self.product_id,
                units,
                self.stock_units,
            ));
        }
        self.stock_units -= units;
        Ok(())
    }

    /// Empty the row, returning what was taken. Used when first-exit
    /// fulfillment exhausts Hunucma and spills into Zelma.
    pub fn drain(&mut self) -> i64 {
        core::mem::take(&mut self.stock_units)
    }
}

/// Zelma ledger row: sealed boxes. Negative stock is a backorder signal,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxLedger {
    product_id: ProductId,
    stock_boxes: i64,
}

impl BoxLedger {
    pub fn new(product_id: ProductId, stock_boxes: i64) -> Self {
        Self {
            product_id,
            stock_boxes,
        }
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn stock_boxes(&self) -> i64 {
        self.stock_boxes
    }

    /// Manual correction. No floor: the result may be negative.
    pub fn adjust(&mut self, delta: i64) -> DomainResult<i64> {
        self.stock_boxes = self
            .stock_boxes
            .checked_add(delta)
            .ok_or_else(|| DomainError::internal("zelma stock adjustment overflow"))?;
        Ok(self.stock_boxes)
    }

    /// Fulfillment deduction. May push the row negative.
    pub fn deduct_boxes(&mut self, boxes: i64) -> DomainResult<()> {
        if boxes < 0 {
            return Err(DomainError::validation("boxes", "cannot deduct a negative quantity"));
        }
        self.stock_boxes = self
            .stock_boxes
            .checked_sub(boxes)
            .ok_or_else(|| DomainError::internal("zelma stock deduction overflow"))?;
        Ok(())
    }
}
