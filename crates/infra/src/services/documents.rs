//! Printable-document boundary.
//!
//! The core hands finalized orders to a rendering collaborator and gets
//! opaque artifact references back; the artifact's internal format is the
//! renderer's business.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use mayab_core::DomainResult;
use mayab_orders::{Folio, Order, OrderStatus};

use crate::store::InMemoryStore;

/// Opaque reference to a rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtifactRef(pub String);

impl core::fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rendering collaborator seam.
pub trait OrderNoteRenderer: Send + Sync {
    /// Render the printable note for one confirmed order.
    fn render_order_note(&self, order: &Order) -> DomainResult<ArtifactRef>;

    /// Render the route summary covering the day's delivery (non-pickup)
    /// orders.
    fn render_delivery_summary(&self, orders: &[Order]) -> DomainResult<ArtifactRef>;
}

/// Default renderer: returns opaque URIs without materializing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueRenderer;

impl OrderNoteRenderer for OpaqueRenderer {
    fn render_order_note(&self, order: &Order) -> DomainResult<ArtifactRef> {
        let folio = order.folio().map(Folio::as_str).unwrap_or("unassigned");
        Ok(ArtifactRef(format!("artifact://order-note/{folio}")))
    }

    fn render_delivery_summary(&self, orders: &[Order]) -> DomainResult<ArtifactRef> {
        Ok(ArtifactRef(format!("artifact://delivery-summary/{}", orders.len())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    OrderNote,
    DeliverySummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFile {
    pub kind: DocumentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folio: Option<Folio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pickup: Option<bool>,
    pub artifact: ArtifactRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentBatch {
    pub orders_count: usize,
    pub pickup_count: usize,
    pub delivery_count: usize,
    pub files: Vec<DocumentFile>,
}

/// Generates the day's printable set: one note per confirmed order plus a
/// delivery summary when any order actually routes out.
pub struct DocumentService<R: OrderNoteRenderer> {
    store: Arc<InMemoryStore>,
    renderer: R,
}

impl<R: OrderNoteRenderer> DocumentService<R> {
    pub fn new(store: Arc<InMemoryStore>, renderer: R) -> Self {
        Self { store, renderer }
    }

    pub fn generate_for_day(&self, date: NaiveDate) -> DomainResult<DocumentBatch> {
        let orders: Vec<Order> = self.store.read(|state| {
            Ok(state
                .orders_with_status(OrderStatus::Confirmed)
                .into_iter()
                .filter_map(|id| state.order(id).ok().cloned())
                .filter(|o| o.delivery_date() == Some(date))
                .collect())
        })?;

        let pickup_count = orders.iter().filter(|o| o.is_pickup()).count();
        let delivery_orders: Vec<Order> = orders.iter().filter(|o| !o.is_pickup()).cloned().collect();

        let mut files = Vec::with_capacity(orders.len() + 1);
        for order in &orders {
            let artifact = self.renderer.render_order_note(order)?;
            files.push(DocumentFile {
                kind: DocumentKind::OrderNote,
                folio: order.folio().cloned(),
                is_pickup: Some(order.is_pickup()),
                artifact,
            });
        }

        if !delivery_orders.is_empty() {
            let artifact = self.renderer.render_delivery_summary(&delivery_orders)?;
            files.push(DocumentFile {
                kind: DocumentKind::DeliverySummary,
                folio: None,
                is_pickup: None,
                artifact,
            });
        }

        tracing::info!(
            date = %date,
            orders = orders.len(),
            pickup = pickup_count,
            delivery = delivery_orders.len(),
            "document batch generated"
        );

        Ok(DocumentBatch {
            orders_count: orders.len(),
            pickup_count,
            delivery_count: delivery_orders.len(),
            files,
        })
    }
}
