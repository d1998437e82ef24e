use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mayab_core::{DomainError, DomainResult, EntityId, Money, UserId};
use mayab_parties::{BranchId, ClientId, ExitType};
use mayab_products::{BoxType, Product, ProductId};

use crate::folio::Folio;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub EntityId);

impl OrderId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    Confirmed,
    Rescheduled,
    Cancelled,
    Closed,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Rescheduled => "rescheduled",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Closed => "closed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Closed)
    }

    /// Transition legality table.
    ///
    /// ```text
    /// Draft       -> Confirmed
    /// Confirmed   -> Rescheduled | Cancelled | Closed
    /// Rescheduled -> Cancelled
    /// ```
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Draft, Confirmed)
                | (Confirmed, Rescheduled)
                | (Confirmed, Cancelled)
                | (Confirmed, Closed)
                | (Rescheduled, Cancelled)
        )
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested order line, before product resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLine {
    pub product_id: ProductId,
    pub quantity_units: Option<i64>,
    pub quantity_boxes: Option<i64>,
    /// Price override; falls back to the product's general price.
    pub unit_price: Option<Money>,
    pub notes: Option<String>,
}

/// A committed order line.
///
/// Product name, units-per-box and box-type are frozen at creation time so
/// later product edits cannot retroactively alter the bill of materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity_units: i64,
    pub quantity_boxes: i64,
    pub unit_price: Money,
    pub subtotal: Money,
    pub units_per_box: i64,
    pub box_type: BoxType,
    pub notes: Option<String>,
}

impl OrderItem {
    /// Resolve a requested line against its product.
    ///
    /// For fixed-box products ordered by boxes alone, units derive from the
    /// box count; otherwise units are taken as given. A line must end up
    /// with at least one billed unit.
    pub fn build(product: &Product, line: &NewLine) -> DomainResult<OrderItem> {
        let mut units = line.quantity_units.unwrap_or(0);
        let boxes = line.quantity_boxes.unwrap_or(0);

        if units < 0 {
            return Err(DomainError::validation("quantity_units", "cannot be negative"));
        }
        if boxes < 0 {
            return Err(DomainError::validation("quantity_boxes", "cannot be negative"));
        }

        if product.box_type() == BoxType::Fixed && boxes > 0 && units == 0 {
            units = product.units_for_boxes(boxes);
        }

        if units == 0 {
            return Err(DomainError::validation(
                "quantity_units",
                "line resolves to zero billed units",
            ));
        }

        let unit_price = line.unit_price.unwrap_or_else(|| product.general_price());
        let subtotal = unit_price.checked_mul_units(units)?;

        Ok(OrderItem {
            product_id: product.id(),
            product_name: product.name().to_string(),
            quantity_units: units,
            quantity_boxes: boxes,
            unit_price,
            subtotal,
            units_per_box: product.units_per_box(),
            box_type: product.box_type(),
            notes: line.notes.clone(),
        })
    }
}

/// A distributor sales order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    folio: Option<Folio>,
    client_id: ClientId,
    branch_id: BranchId,
    status: OrderStatus,
    is_pickup: bool,
    delivery_date: Option<NaiveDate>,
    applied_exit: Option<ExitType>,
    items: Vec<OrderItem>,
    subtotal: Money,
    discount: Money,
    total: Money,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    confirmed_by: Option<UserId>,
    /// Original delivery date, archived when the order is rescheduled.
    rescheduled_from: Option<NaiveDate>,
    cancelled_at: Option<DateTime<Utc>>,
    cancel_reason: Option<String>,
    closed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create a draft order. Folio and delivery date stay unassigned until
    /// confirmation.
    pub fn draft(
        id: OrderId,
        client_id: ClientId,
        branch_id: BranchId,
        items: Vec<OrderItem>,
        is_pickup: bool,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let mut order = Self {
            id,
            folio: None,
            client_id,
            branch_id,
            status: OrderStatus::Draft,
            is_pickup,
            delivery_date: None,
            applied_exit: None,
            items,
            subtotal: Money::ZERO,
            discount: Money::ZERO,
            total: Money::ZERO,
            notes,
            created_at,
            confirmed_at: None,
            confirmed_by: None,
            rescheduled_from: None,
            cancelled_at: None,
            cancel_reason: None,
            closed_at: None,
        };
        order.recompute_totals()?;
        Ok(order)
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn folio(&self) -> Option<&Folio> {
        self.folio.as_ref()
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn branch_id(&self) -> BranchId {
        self.branch_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_pickup(&self) -> bool {
        self.is_pickup
    }

    pub fn delivery_date(&self) -> Option<NaiveDate> {
        self.delivery_date
    }

    pub fn applied_exit(&self) -> Option<ExitType> {
        self.applied_exit
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    pub fn confirmed_by(&self) -> Option<UserId> {
        self.confirmed_by
    }

    pub fn rescheduled_from(&self) -> Option<NaiveDate> {
        self.rescheduled_from
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, OrderStatus::Draft)
    }

    /// `subtotal == Σ item.subtotal` and `total == subtotal - discount`.
    fn recompute_totals(&mut self) -> DomainResult<()> {
        let mut subtotal = Money::ZERO;
        for item in &self.items {
            subtotal = subtotal.checked_add(item.subtotal)?;
        }
        self.subtotal = subtotal;
        self.total = subtotal.checked_sub(self.discount)?;
        Ok(())
    }

    fn ensure_transition(&self, next: OrderStatus, attempted: &'static str) -> DomainResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::state_conflict(self.status.as_str(), attempted))
        }
    }

    /// Replace all items wholesale. Only drafts are editable.
    pub fn replace_items(&mut self, items: Vec<OrderItem>) -> DomainResult<()> {
        if !self.is_modifiable() {
            return Err(DomainError::state_conflict(self.status.as_str(), "edit items of"));
        }
        self.items = items;
        self.recompute_totals()
    }

    /// Lock the order in: folio, delivery date and applied exit-type are
    /// assigned exactly once, here.
    pub fn confirm(
        &mut self,
        folio: Folio,
        delivery_date: NaiveDate,
        applied_exit: ExitType,
        at: DateTime<Utc>,
        by: Option<UserId>,
    ) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Confirmed, "confirm")?;
        if self.items.is_empty() {
            return Err(DomainError::validation("items", "cannot confirm an order without items"));
        }
        self.status = OrderStatus::Confirmed;
        self.folio = Some(folio);
        self.delivery_date = Some(delivery_date);
        self.applied_exit = Some(applied_exit);
        self.confirmed_at = Some(at);
        self.confirmed_by = by;
        Ok(())
    }

    /// Move the delivery date, archiving the current one.
    pub fn reschedule(&mut self, new_date: NaiveDate) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Rescheduled, "reschedule")?;
        self.rescheduled_from = self.delivery_date;
        self.delivery_date = Some(new_date);
        self.status = OrderStatus::Rescheduled;
        Ok(())
    }

    /// Cancel the order. Inventory is never touched here: deduction only
    /// happens at day-close, and cancelled orders never reach it.
    pub fn cancel(&mut self, reason: Option<String>, at: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Cancelled, "cancel")?;
        self.status = OrderStatus::Cancelled;
        self.cancelled_at = Some(at);
        self.cancel_reason = reason;
        Ok(())
    }

    /// Close the order at day-close.
    pub fn close(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_transition(OrderStatus::Closed, "close")?;
        self.status = OrderStatus::Closed;
        self.closed_at = Some(at);
        Ok(())
    }

    /// Generic status escape hatch (the cancel path of the API).
    ///
    /// Honors the same legality table as the named transitions. Transitions
    /// that need extra inputs (confirmation's folio/date assignment,
    /// rescheduling's new date) are rejected: use the dedicated operation.
    pub fn set_status(
        &mut self,
        next: OrderStatus,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> DomainResult<()> {
        match next {
            OrderStatus::Cancelled => self.cancel(reason, at),
            OrderStatus::Closed => self.close(at),
            OrderStatus::Confirmed => Err(DomainError::validation(
                "status",
                "confirmation assigns folio and delivery date; use the confirm operation",
            )),
            OrderStatus::Rescheduled => Err(DomainError::validation(
                "status",
                "rescheduling requires a new date; use the reschedule operation",
            )),
            OrderStatus::Draft => {
                Err(DomainError::state_conflict(self.status.as_str(), "revert to draft"))
            }
        }
    }
}
