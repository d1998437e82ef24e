//! Service-level tests exercising the full intake → confirm → day-close
//! flow against the transactional store.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use mayab_core::{DomainError, EntityId, Money};
use mayab_inventory::Warehouse;
use mayab_orders::{DeliveryCalendar, NewLine, Order, OrderId, OrderItem, OrderStatus};
use mayab_parties::{Branch, BranchId, Client, ClientId, ExitType};
use mayab_products::{BoxType, Product, ProductId};

use crate::services::{
    ConfirmationEngine, DayCloseProcessor, DocumentService, InboundRow, InventoryAllocator,
    NewOrder, OpaqueRenderer, OrderFilter, OrderService,
};
use crate::store::InMemoryStore;

struct Fixture {
    store: Arc<InMemoryStore>,
    orders: OrderService,
    confirmation: ConfirmationEngine,
    inventory: InventoryAllocator,
    day_close: DayCloseProcessor,
    client_id: ClientId,
    branch_id: BranchId,
}

impl Fixture {
    /// One client (normal-exit by default) with one branch.
    fn new(exit: ExitType) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let client_id = ClientId::new(EntityId::new());
        let branch_id = BranchId::new(EntityId::new());

        store
            .seed_client(Client::new(client_id, "Abarrotes Canul", exit).unwrap())
            .unwrap();
        store
            .seed_branch(Branch::new(branch_id, client_id, "Canul Centro", None).unwrap())
            .unwrap();

        Self {
            orders: OrderService::new(store.clone()),
            confirmation: ConfirmationEngine::new(store.clone(), DeliveryCalendar::merida()),
            inventory: InventoryAllocator::new(store.clone()),
            day_close: DayCloseProcessor::new(store.clone()),
            store,
            client_id,
            branch_id,
        }
    }

    fn seed_product(&self, name: &str, box_type: BoxType, units_per_box: i64, price_cents: i64) -> ProductId {
        let id = ProductId::new(EntityId::new());
        self.store
            .seed_product(Product::new(id, name, box_type, units_per_box, Money::from_cents(price_cents)).unwrap())
            .unwrap();
        id
    }

    fn seed_stock(&self, product_id: ProductId, hunucma_units: i64, zelma_boxes: i64) {
        self.store.seed_stock(Warehouse::Hunucma, product_id, hunucma_units).unwrap();
        self.store.seed_stock(Warehouse::Zelma, product_id, zelma_boxes).unwrap();
    }

    fn draft(&self, lines: Vec<NewLine>) -> Order {
        self.draft_with_pickup(lines, false)
    }

    fn draft_with_pickup(&self, lines: Vec<NewLine>, is_pickup: bool) -> Order {
        self.orders
            .create_draft(
                NewOrder {
                    client_id: self.client_id,
                    branch_id: self.branch_id,
                    items: lines,
                    is_pickup,
                    notes: None,
                },
                now(),
            )
            .unwrap()
    }

    fn levels(&self, product_id: ProductId) -> (i64, i64) {
        self.inventory.levels(product_id).unwrap()
    }
}

fn line(product_id: ProductId, units: i64) -> NewLine {
    NewLine {
        product_id,
        quantity_units: Some(units),
        quantity_boxes: None,
        unit_price: None,
        notes: None,
    }
}

/// A Tuesday morning, well before the cutoff in Mérida (15:00 UTC = 09:00 local).
fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 3, 15, 0, 0).unwrap()
}

#[test]
fn draft_totals_match_item_subtotals() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    let water = fx.seed_product("Agua 600ml", BoxType::Variable, 12, 800);

    let order = fx.draft(vec![line(soda, 6), line(water, 3)]);

    assert_eq!(order.status(), OrderStatus::Draft);
    assert!(order.folio().is_none());
    assert!(order.delivery_date().is_none());
    assert_eq!(order.subtotal(), Money::from_cents(6 * 1500 + 3 * 800));
    assert_eq!(order.total(), order.subtotal());
}

#[test]
fn unknown_product_aborts_the_whole_creation() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    let ghost = ProductId::new(EntityId::new());

    let err = fx
        .orders
        .create_draft(
            NewOrder {
                client_id: fx.client_id,
                branch_id: fx.branch_id,
                items: vec![line(soda, 2), line(ghost, 1)],
                is_pickup: false,
                notes: None,
            },
            now(),
        )
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity: "product", .. }));
    assert!(fx.orders.list(&OrderFilter::default()).unwrap().is_empty());
}

#[test]
fn sequential_confirmations_yield_strictly_increasing_folios() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 0, 1000);

    let mut numbers = Vec::new();
    for _ in 0..5 {
        let order = fx.draft(vec![line(soda, 6)]);
        let confirmed = fx.confirmation.confirm(order.id(), now(), None).unwrap();
        numbers.push(confirmed.folio().unwrap().number().unwrap());
    }

    assert_eq!(numbers[0], mayab_orders::FOLIO_BASE);
    assert!(numbers.windows(2).all(|w| w[1] == w[0] + 1));
}

#[test]
fn confirmation_assigns_delivery_date_and_exit_type() {
    let fx = Fixture::new(ExitType::FirstExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 100, 100);

    let order = fx.draft(vec![line(soda, 6)]);
    let confirmed = fx.confirmation.confirm(order.id(), now(), None).unwrap();

    // 09:00 local Tuesday: same-day delivery.
    assert_eq!(confirmed.delivery_date(), NaiveDate::from_ymd_opt(2025, 6, 3));
    assert_eq!(confirmed.applied_exit(), Some(ExitType::FirstExit));
    assert!(confirmed.confirmed_at().is_some());
}

#[test]
fn pickup_flag_overrides_the_client_policy() {
    let fx = Fixture::new(ExitType::FirstExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 100, 100);

    let order = fx.draft_with_pickup(vec![line(soda, 6)], true);
    let confirmed = fx.confirmation.confirm(order.id(), now(), None).unwrap();
    assert_eq!(confirmed.applied_exit(), Some(ExitType::Pickup));
}

#[test]
fn client_level_pickup_policy_confirms_as_normal_exit() {
    let fx = Fixture::new(ExitType::Pickup);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 100, 100);

    let order = fx.draft(vec![line(soda, 6)]);
    let confirmed = fx.confirmation.confirm(order.id(), now(), None).unwrap();
    assert_eq!(confirmed.applied_exit(), Some(ExitType::NormalExit));
}

#[test]
fn confirmation_fails_when_neither_warehouse_covers() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    let water = fx.seed_product("Agua 600ml", BoxType::Variable, 12, 800);
    fx.seed_stock(soda, 1000, 1000);
    fx.seed_stock(water, 10, 2); // 36 units need 3 zelma boxes, only 2 held

    let order = fx.draft(vec![line(soda, 6), line(water, 36)]);
    let err = fx.confirmation.confirm(order.id(), now(), None).unwrap_err();

    match err {
        DomainError::InsufficientStock { required, .. } => assert_eq!(required, 36),
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    // No partial confirmation: still a draft, no folio burned.
    let reloaded = fx.orders.get(order.id()).unwrap();
    assert_eq!(reloaded.status(), OrderStatus::Draft);
    let next = fx.store.read(|s| Ok(s.peek_next_folio())).unwrap();
    assert_eq!(next, mayab_orders::FOLIO_BASE);
}

#[test]
fn confirming_a_non_draft_is_a_state_conflict() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 0, 100);

    let order = fx.draft(vec![line(soda, 6)]);
    fx.confirmation.confirm(order.id(), now(), None).unwrap();
    let err = fx.confirmation.confirm(order.id(), now(), None).unwrap_err();
    assert_eq!(err, DomainError::state_conflict("confirmed", "confirm"));
}

#[test]
fn first_exit_day_close_drains_hunucma_then_spills_to_zelma() {
    let fx = Fixture::new(ExitType::FirstExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 10, 8);

    let order = fx.draft(vec![line(soda, 15)]);
    fx.confirmation.confirm(order.id(), now(), None).unwrap();
    let report = fx.day_close.process_day(now()).unwrap();

    assert_eq!(report.orders_processed, 1);
    // Hunucma 10 -> 0; remainder 5 units cost ceil(5/6) = 1 box.
    assert_eq!(fx.levels(soda), (0, 7));
    assert_eq!(fx.orders.get(order.id()).unwrap().status(), OrderStatus::Closed);
}

#[test]
fn normal_exit_day_close_may_drive_zelma_negative() {
    let fx = Fixture::new(ExitType::NormalExit);
    let candy = fx.seed_product("Paleta Mango", BoxType::Fixed, 4, 300);
    fx.seed_stock(candy, 50, 1);

    let order = fx.draft(vec![line(candy, 7)]);
    fx.confirmation.confirm(order.id(), now(), None).unwrap();
    fx.day_close.process_day(now()).unwrap();

    // ceil(7/4) = 2 boxes out of 1: backorder of one box, Hunucma untouched.
    assert_eq!(fx.levels(candy), (50, -1));
}

#[test]
fn day_close_uses_the_item_snapshot_units_per_box() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 0, 100);

    let order = fx.draft(vec![line(soda, 12)]);
    fx.confirmation.confirm(order.id(), now(), None).unwrap();

    // Repackage the product after confirmation: 3 units per box now.
    fx.store
        .seed_product(Product::new(soda, "Refresco Cola", BoxType::Fixed, 3, Money::from_cents(1500)).unwrap())
        .unwrap();

    fx.day_close.process_day(now()).unwrap();
    // Still ceil(12/6) = 2 boxes, per the snapshot taken at creation.
    assert_eq!(fx.levels(soda), (0, 98));
}

#[test]
fn day_close_with_nothing_confirmed_is_a_no_op() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 10, 5);

    // A draft must survive the close untouched.
    let draft = fx.draft(vec![line(soda, 6)]);
    let report = fx.day_close.process_day(now()).unwrap();

    assert_eq!(report.orders_processed, 0);
    assert_eq!(fx.levels(soda), (10, 5));
    assert_eq!(fx.orders.get(draft.id()).unwrap().status(), OrderStatus::Draft);
}

#[test]
fn day_close_batch_is_atomic() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 10, 50);

    let healthy = fx.draft(vec![line(soda, 6)]);
    fx.confirmation.confirm(healthy.id(), now(), None).unwrap();

    // Plant a confirmed order with a corrupt line (negative quantity) so its
    // deduction fails mid-batch.
    let corrupt_id = OrderId::new(EntityId::new());
    fx.store
        .transaction(|state| {
            let mut order = Order::draft(
                corrupt_id,
                fx.client_id,
                fx.branch_id,
                vec![OrderItem {
                    product_id: soda,
                    product_name: "Refresco Cola".to_string(),
                    quantity_units: -5,
                    quantity_boxes: 0,
                    unit_price: Money::from_cents(1500),
                    subtotal: Money::ZERO,
                    units_per_box: 6,
                    box_type: BoxType::Fixed,
                    notes: None,
                }],
                false,
                None,
                now(),
            )?;
            order.confirm(
                state.take_next_folio(),
                NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
                ExitType::NormalExit,
                now(),
                None,
            )?;
            state.put_order(order);
            Ok(())
        })
        .unwrap();

    let err = fx.day_close.process_day(now()).unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    // The whole day rolled back: the healthy order is still confirmed and
    // inventory is untouched.
    assert_eq!(fx.orders.get(healthy.id()).unwrap().status(), OrderStatus::Confirmed);
    assert_eq!(fx.levels(soda), (10, 50));
}

#[test]
fn reschedule_archives_and_cancel_skips_inventory() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 10, 5);

    let order = fx.draft(vec![line(soda, 6)]);
    let confirmed = fx.confirmation.confirm(order.id(), now(), None).unwrap();
    let original_date = confirmed.delivery_date().unwrap();

    let new_date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let rescheduled = fx.confirmation.reschedule(order.id(), new_date).unwrap();
    assert_eq!(rescheduled.status(), OrderStatus::Rescheduled);
    assert_eq!(rescheduled.rescheduled_from(), Some(original_date));
    assert_eq!(rescheduled.delivery_date(), Some(new_date));

    // Rescheduled orders neither close nor deduct at day-close.
    let report = fx.day_close.process_day(now()).unwrap();
    assert_eq!(report.orders_processed, 0);
    assert_eq!(fx.levels(soda), (10, 5));

    let cancelled = fx
        .confirmation
        .cancel(order.id(), Some("route dropped".to_string()), now())
        .unwrap();
    assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    assert_eq!(fx.levels(soda), (10, 5));
}

#[test]
fn reschedule_rejects_a_draft_with_state_conflict() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    let order = fx.draft(vec![line(soda, 6)]);

    let err = fx
        .confirmation
        .reschedule(order.id(), NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
        .unwrap_err();
    assert_eq!(err, DomainError::state_conflict("draft", "reschedule"));
}

#[test]
fn manual_adjustments_respect_the_ledger_asymmetry() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 5, 2);

    let err = fx.inventory.adjust(Warehouse::Hunucma, soda, -6).unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "delta", .. }));
    assert_eq!(fx.levels(soda).0, 5);

    let level = fx.inventory.adjust(Warehouse::Zelma, soda, -6).unwrap();
    assert_eq!(level, -4);
}

#[test]
fn replace_items_only_while_draft() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    let water = fx.seed_product("Agua 600ml", BoxType::Variable, 12, 800);
    fx.seed_stock(soda, 0, 100);

    let order = fx.draft(vec![line(soda, 6)]);
    let edited = fx.orders.replace_items(order.id(), vec![line(water, 2)]).unwrap();
    assert_eq!(edited.items().len(), 1);
    assert_eq!(edited.subtotal(), Money::from_cents(1600));

    fx.confirmation.confirm(order.id(), now(), None).unwrap();
    let err = fx.orders.replace_items(order.id(), vec![line(soda, 1)]).unwrap_err();
    assert!(matches!(err, DomainError::StateConflict { current: "confirmed", .. }));
}

#[test]
fn webhook_groups_rows_per_branch_and_reports_bad_rows() {
    let fx = Fixture::new(ExitType::NormalExit);
    let other_branch = BranchId::new(EntityId::new());
    fx.store
        .seed_branch(Branch::new(other_branch, fx.client_id, "Canul Norte", None).unwrap())
        .unwrap();

    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_product("Agua 600ml", BoxType::Variable, 12, 800);

    let ingestor = crate::services::WebhookIngestor::new(fx.store.clone());
    let report = ingestor
        .ingest(
            vec![
                InboundRow {
                    branch: "Canul Centro".to_string(),
                    product: "Refresco Cola".to_string(),
                    quantity: "2".to_string(),
                },
                InboundRow {
                    branch: "canul centro".to_string(),
                    product: "Agua 600ml".to_string(),
                    quantity: "10".to_string(),
                },
                InboundRow {
                    branch: "Canul Norte".to_string(),
                    product: "Refresco Cola".to_string(),
                    quantity: "1".to_string(),
                },
                InboundRow {
                    branch: "Sucursal Fantasma".to_string(),
                    product: "Refresco Cola".to_string(),
                    quantity: "3".to_string(),
                },
                InboundRow {
                    branch: "Canul Norte".to_string(),
                    product: "Refresco Cola".to_string(),
                    quantity: "cero".to_string(),
                },
            ],
            now(),
        )
        .unwrap();

    assert_eq!(report.orders_created, 2);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].contains("Sucursal Fantasma"));
    assert!(report.errors[1].contains("cero"));

    let centro = report.orders.iter().find(|o| o.branch == "Canul Centro").unwrap();
    // Fixed-box soda: 2 boxes -> 12 units at 15.00; water: 10 units at 8.00.
    assert_eq!(centro.item_count, 2);
    assert_eq!(centro.total, Money::from_cents(12 * 1500 + 10 * 800));

    let norte = report.orders.iter().find(|o| o.branch == "Canul Norte").unwrap();
    assert_eq!(norte.item_count, 1);
    assert_eq!(norte.total, Money::from_cents(6 * 1500));

    // Created drafts carry full snapshots via the regular creation path.
    let order = fx.orders.get(centro.order_id).unwrap();
    assert_eq!(order.status(), OrderStatus::Draft);
    let soda_item = order.items().iter().find(|i| i.product_id == soda).unwrap();
    assert_eq!(soda_item.units_per_box, 6);
    assert_eq!(soda_item.quantity_boxes, 2);
    assert_eq!(soda_item.quantity_units, 12);
}

#[test]
fn webhook_rejects_an_empty_batch() {
    let fx = Fixture::new(ExitType::NormalExit);
    let ingestor = crate::services::WebhookIngestor::new(fx.store.clone());
    let err = ingestor.ingest(vec![], now()).unwrap_err();
    assert!(matches!(err, DomainError::Validation { field: "rows", .. }));
}

#[test]
fn document_batch_splits_pickup_from_delivery() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 0, 100);

    let delivery = fx.draft(vec![line(soda, 6)]);
    let pickup = fx.draft_with_pickup(vec![line(soda, 6)], true);
    fx.confirmation.confirm(delivery.id(), now(), None).unwrap();
    fx.confirmation.confirm(pickup.id(), now(), None).unwrap();

    let date = fx.orders.get(delivery.id()).unwrap().delivery_date().unwrap();
    let docs = DocumentService::new(fx.store.clone(), OpaqueRenderer).generate_for_day(date).unwrap();

    assert_eq!(docs.orders_count, 2);
    assert_eq!(docs.pickup_count, 1);
    assert_eq!(docs.delivery_count, 1);
    // Two order notes plus one delivery summary.
    assert_eq!(docs.files.len(), 3);
    assert!(docs.files.iter().any(|f| f.artifact.0.starts_with("artifact://delivery-summary/")));
}

#[test]
fn order_listing_filters_by_status_and_folio() {
    let fx = Fixture::new(ExitType::NormalExit);
    let soda = fx.seed_product("Refresco Cola", BoxType::Fixed, 6, 1500);
    fx.seed_stock(soda, 0, 100);

    let a = fx.draft(vec![line(soda, 6)]);
    let b = fx.draft(vec![line(soda, 12)]);
    let confirmed = fx.confirmation.confirm(a.id(), now(), None).unwrap();

    let drafts = fx
        .orders
        .list(&OrderFilter {
            status: Some(OrderStatus::Draft),
            ..OrderFilter::default()
        })
        .unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].id(), b.id());

    let folio = confirmed.folio().unwrap().as_str().to_string();
    let by_folio = fx
        .orders
        .list(&OrderFilter {
            folio: Some(folio),
            ..OrderFilter::default()
        })
        .unwrap();
    assert_eq!(by_folio.len(), 1);
    assert_eq!(by_folio[0].id(), a.id());
}
