//! `mayab-parties` — clients and their delivery branches.
//!
//! Clients carry the exit-type policy the confirmation engine applies;
//! branches are the deliverable addresses webhook rows name.

pub mod branch;
pub mod client;

pub use branch::{Branch, BranchId};
pub use client::{Client, ClientId, ExitType};
