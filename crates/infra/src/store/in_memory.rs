use std::sync::RwLock;

use mayab_core::{DomainError, DomainResult};
use mayab_inventory::Warehouse;
use mayab_parties::{Branch, Client};
use mayab_products::{Product, ProductId};

use super::state::StoreState;

/// In-memory transactional store.
///
/// Transactions take the write lock, run against a cloned working state and
/// swap it in only when the closure succeeds. Not optimized for performance;
/// correctness and rollback simplicity first.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a mutating operation atomically. On `Err` the working copy is
    /// discarded and the committed state is untouched.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| DomainError::internal("store lock poisoned"))?;

        let mut working = guard.clone();
        let out = f(&mut working)?;
        *guard = working;
        Ok(out)
    }

    /// Run a read-only operation against the committed state.
    pub fn read<T>(&self, f: impl FnOnce(&StoreState) -> DomainResult<T>) -> DomainResult<T> {
        let guard = self
            .state
            .read()
            .map_err(|_| DomainError::internal("store lock poisoned"))?;
        f(&guard)
    }

    // ---- seeding (fixtures and deployment scripts; reference-data CRUD is
    // out of scope for the HTTP surface) ----

    pub fn seed_product(&self, product: Product) -> DomainResult<()> {
        self.transaction(|state| {
            state.insert_product(product);
            Ok(())
        })
    }

    pub fn seed_client(&self, client: Client) -> DomainResult<()> {
        self.transaction(|state| {
            state.insert_client(client);
            Ok(())
        })
    }

    pub fn seed_branch(&self, branch: Branch) -> DomainResult<()> {
        self.transaction(|state| state.insert_branch(branch))
    }

    pub fn seed_stock(&self, warehouse: Warehouse, product_id: ProductId, qty: i64) -> DomainResult<()> {
        self.transaction(|state| match warehouse {
            Warehouse::Hunucma => state.set_hunucma_stock(product_id, qty),
            Warehouse::Zelma => {
                state.set_zelma_stock(product_id, qty);
                Ok(())
            }
        })
    }

    /// Re-derive the folio sequence from persisted orders (only useful when
    /// hydrating a store from existing data).
    pub fn reseed_folio_sequence(&self) -> DomainResult<()> {
        self.transaction(|state| {
            state.reseed_folio_sequence();
            Ok(())
        })
    }
}
