//! Application services orchestrating the domain over the store.

pub mod confirmation;
pub mod day_close;
pub mod documents;
pub mod inventory;
pub mod orders;
pub mod webhook;

pub use confirmation::ConfirmationEngine;
pub use day_close::{DayCloseProcessor, DayCloseReport};
pub use documents::{
    ArtifactRef, DocumentBatch, DocumentFile, DocumentKind, DocumentService, OpaqueRenderer,
    OrderNoteRenderer,
};
pub use inventory::InventoryAllocator;
pub use orders::{NewOrder, OrderFilter, OrderService};
pub use webhook::{InboundRow, IngestReport, IngestedOrder, WebhookIngestor};
