//! Keyed query cache for remote list data.
//!
//! This module provides the request-cache collaborator every list view
//! shares:
//! - one cached result per `(family, params)` key
//! - de-duplication of identical in-flight fetches
//! - explicit invalidation by resource family (with declared dependents)
//! - stale-while-revalidate snapshots with last-write-wins race protection
//!
//! The cache is purely in-memory; it is rebuilt on every launch.

mod keys;
mod store;

pub use keys::{Family, ListParams, QueryKey};
pub use store::{QueryCache, Snapshot};
