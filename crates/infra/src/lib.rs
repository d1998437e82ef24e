//! `mayab-infra` — storage and application services.
//!
//! The domain crates decide; this crate orchestrates. Every mutating
//! operation runs inside one store transaction with commit-on-success /
//! rollback-on-any-error discipline, so partial writes are never observable.

pub mod services;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use store::{InMemoryStore, StoreState};
