use std::sync::Arc;

use mayab_infra::services::{
    ConfirmationEngine, DayCloseProcessor, DocumentService, InventoryAllocator, OpaqueRenderer,
    OrderService, WebhookIngestor,
};
use mayab_infra::InMemoryStore;
use mayab_orders::DeliveryCalendar;

/// All application services, wired over one shared store.
pub struct AppServices {
    pub store: Arc<InMemoryStore>,
    pub calendar: DeliveryCalendar,
    pub orders: OrderService,
    pub confirmation: ConfirmationEngine,
    pub inventory: InventoryAllocator,
    pub webhook: WebhookIngestor,
    pub day_close: DayCloseProcessor,
    pub documents: DocumentService<OpaqueRenderer>,
}

pub fn build_services(store: Arc<InMemoryStore>) -> AppServices {
    let calendar = DeliveryCalendar::merida();
    AppServices {
        orders: OrderService::new(store.clone()),
        confirmation: ConfirmationEngine::new(store.clone(), calendar),
        inventory: InventoryAllocator::new(store.clone()),
        webhook: WebhookIngestor::new(store.clone()),
        day_close: DayCloseProcessor::new(store.clone()),
        documents: DocumentService::new(store.clone(), OpaqueRenderer),
        calendar,
        store,
    }
}
