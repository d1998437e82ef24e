//! `mayab-orders` — the order aggregate and its state machine.
//!
//! Pure domain: decisions and guards only. Storage, folio sequencing and
//! stock checks are orchestrated by the infra services.

pub mod calendar;
pub mod folio;
pub mod order;

pub use calendar::DeliveryCalendar;
pub use folio::{Folio, FOLIO_BASE, FOLIO_PREFIX};
pub use order::{NewLine, Order, OrderId, OrderItem, OrderStatus};
