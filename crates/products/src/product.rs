use serde::{Deserialize, Serialize};

use mayab_core::{DomainError, DomainResult, EntityId, Money};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// How a product's box relates to its units.
///
/// `Fixed` boxes hold a known units-per-box count, so a quantity given in
/// boxes converts to units. `Variable` boxes exist but hold no fixed count;
/// `NotApplicable` products are never boxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxType {
    Fixed,
    Variable,
    NotApplicable,
}

/// Product reference data, as the order core reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    box_type: BoxType,
    units_per_box: i64,
    general_price: Money,
    active: bool,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        box_type: BoxType,
        units_per_box: i64,
        general_price: Money,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name", "cannot be empty"));
        }
        if units_per_box < 1 {
            return Err(DomainError::validation("units_per_box", "must be at least 1"));
        }
        if general_price.is_negative() {
            return Err(DomainError::validation("general_price", "cannot be negative"));
        }
        Ok(Self {
            id,
            name,
            box_type,
            units_per_box,
            general_price,
            active: true,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn box_type(&self) -> BoxType {
        self.box_type
    }

    pub fn units_per_box(&self) -> i64 {
        self.units_per_box
    }

    pub fn general_price(&self) -> Money {
        self.general_price
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Whole boxes needed to cover `units` (ceiling division).
    pub fn boxes_for_units(&self, units: i64) -> i64 {
        boxes_needed(units, self.units_per_box)
    }

    pub fn units_for_boxes(&self, boxes: i64) -> i64 {
        boxes * self.units_per_box
    }
}

/// Ceiling conversion from loose units to sealed boxes.
///
/// `units_per_box` below 1 is clamped to 1 so a malformed snapshot degrades
/// to unit-for-unit instead of dividing by zero.
pub fn boxes_needed(units: i64, units_per_box: i64) -> i64 {
    if units <= 0 {
        return 0;
    }
    let per_box = units_per_box.max(1);
    (units + per_box - 1) / per_box
}
