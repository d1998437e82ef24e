use std::collections::HashMap;

use mayab_core::{DomainError, DomainResult};
use mayab_inventory::{BoxLedger, UnitLedger};
use mayab_orders::{folio, Folio, Order, OrderId, OrderStatus, FOLIO_BASE};
use mayab_parties::{Branch, BranchId, Client, ClientId};
use mayab_products::{Product, ProductId};

/// Full persisted state of the system.
///
/// Cheap to clone at this system's scale; the store relies on that for its
/// snapshot transactions.
#[derive(Debug, Clone)]
pub struct StoreState {
    products: HashMap<ProductId, Product>,
    clients: HashMap<ClientId, Client>,
    branches: HashMap<BranchId, Branch>,
    orders: HashMap<OrderId, Order>,
    hunucma: HashMap<ProductId, UnitLedger>,
    zelma: HashMap<ProductId, BoxLedger>,
    /// Dedicated folio sequence: the number the next confirmation receives.
    next_folio: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            products: HashMap::new(),
            clients: HashMap::new(),
            branches: HashMap::new(),
            orders: HashMap::new(),
            hunucma: HashMap::new(),
            zelma: HashMap::new(),
            next_folio: FOLIO_BASE,
        }
    }
}

impl StoreState {
    // ---- reference data ----

    pub fn product(&self, id: ProductId) -> DomainResult<&Product> {
        self.products
            .get(&id)
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    pub fn client(&self, id: ClientId) -> DomainResult<&Client> {
        self.clients
            .get(&id)
            .ok_or_else(|| DomainError::not_found("client", id))
    }

    pub fn branch(&self, id: BranchId) -> DomainResult<&Branch> {
        self.branches
            .get(&id)
            .ok_or_else(|| DomainError::not_found("branch", id))
    }

    /// Branch lookup by unique display name (trimmed, case-insensitive).
    pub fn branch_by_name(&self, name: &str) -> Option<&Branch> {
        self.branches.values().find(|b| b.name_matches(name))
    }

    /// Active-product lookup by exact display name.
    pub fn active_product_by_name(&self, name: &str) -> Option<&Product> {
        self.products
            .values()
            .find(|p| p.is_active() && p.name().trim().eq_ignore_ascii_case(name.trim()))
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id(), product);
    }

    pub fn insert_client(&mut self, client: Client) {
        self.clients.insert(client.id(), client);
    }

    /// Branch names are unique: webhook rows resolve branches by name alone.
    pub fn insert_branch(&mut self, branch: Branch) -> DomainResult<()> {
        if self
            .branches
            .values()
            .any(|b| b.id() != branch.id() && b.name_matches(branch.name()))
        {
            return Err(DomainError::unique("branch.name"));
        }
        self.branches.insert(branch.id(), branch);
        Ok(())
    }

    // ---- orders ----

    pub fn order(&self, id: OrderId) -> DomainResult<&Order> {
        self.orders
            .get(&id)
            .ok_or_else(|| DomainError::not_found("order", id))
    }

    pub fn order_mut(&mut self, id: OrderId) -> DomainResult<&mut Order> {
        self.orders
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("order", id))
    }

    pub fn put_order(&mut self, order: Order) {
        self.orders.insert(order.id(), order);
    }

    /// Orders in a given state, oldest first (stable processing order for
    /// the day-close batch).
    pub fn orders_with_status(&self, status: OrderStatus) -> Vec<OrderId> {
        let mut matched: Vec<&Order> = self.orders.values().filter(|o| o.status() == status).collect();
        matched.sort_by_key(|o| (o.created_at(), *o.id().0.as_uuid()));
        matched.into_iter().map(|o| o.id()).collect()
    }

    /// All orders, newest first.
    pub fn orders_newest_first(&self) -> Vec<&Order> {
        let mut all: Vec<&Order> = self.orders.values().collect();
        all.sort_by_key(|o| std::cmp::Reverse((o.created_at(), *o.id().0.as_uuid())));
        all
    }

    // ---- folio sequence ----

    /// Hand out the next folio and advance the dedicated sequence. Runs
    /// inside the confirming transaction, so concurrent confirmations can
    /// never observe the same number.
    pub fn take_next_folio(&mut self) -> Folio {
        let folio = Folio::from_number(self.next_folio);
        self.next_folio += 1;
        folio
    }

    pub fn peek_next_folio(&self) -> u64 {
        self.next_folio
    }

    /// Seed the sequence from the highest folio already present, falling
    /// back to the base when none parses.
    pub fn reseed_folio_sequence(&mut self) {
        let latest = self
            .orders
            .values()
            .filter_map(|o| o.folio())
            .max_by_key(|f| f.number().unwrap_or(0));
        self.next_folio = folio::next_number_after(latest);
    }

    // ---- inventory ledgers ----

    pub fn hunucma_units(&self, product_id: ProductId) -> i64 {
        self.hunucma.get(&product_id).map(UnitLedger::stock_units).unwrap_or(0)
    }

    pub fn zelma_boxes(&self, product_id: ProductId) -> i64 {
        self.zelma.get(&product_id).map(BoxLedger::stock_boxes).unwrap_or(0)
    }

    pub fn hunucma_row_mut(&mut self, product_id: ProductId) -> Option<&mut UnitLedger> {
        self.hunucma.get_mut(&product_id)
    }

    pub fn zelma_row_mut(&mut self, product_id: ProductId) -> Option<&mut BoxLedger> {
        self.zelma.get_mut(&product_id)
    }

    pub fn set_hunucma_stock(&mut self, product_id: ProductId, units: i64) -> DomainResult<()> {
        self.hunucma.insert(product_id, UnitLedger::new(product_id, units)?);
        Ok(())
    }

    pub fn set_zelma_stock(&mut self, product_id: ProductId, boxes: i64) {
        self.zelma.insert(product_id, BoxLedger::new(product_id, boxes));
    }

    /// Ledger snapshot for inventory listings: `(product, hunucma units,
    /// zelma boxes)` sorted by product name.
    pub fn inventory_levels(&self) -> Vec<(&Product, i64, i64)> {
        let mut rows: Vec<(&Product, i64, i64)> = self
            .products
            .values()
            .map(|p| (p, self.hunucma_units(p.id()), self.zelma_boxes(p.id())))
            .collect();
        rows.sort_by(|a, b| a.0.name().cmp(b.0.name()));
        rows
    }
}
