//! `mayab-inventory` — the two warehouse ledgers and the allocation policy.
//!
//! Hunucma tracks loose units and is hard-floored at zero; Zelma tracks
//! sealed boxes and may run negative (backorder signal). The allocation
//! policy here is pure planning math; applying plans against stored ledgers
//! is the infra layer's job.

pub mod allocation;
pub mod ledger;

pub use allocation::{covers, plan, Allocation};
pub use ledger::{BoxLedger, UnitLedger, Warehouse};
