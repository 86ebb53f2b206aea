//! Remote resource client: JSON envelope types and the HTTP client.

mod client;
mod types;

pub use client::ApiClient;
pub use types::{Envelope, ListData, Mutated};
