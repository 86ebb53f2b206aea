//! Wire types for the portfolio API.
//!
//! Every response is wrapped in the `{ data, message, status }` envelope.
//! List endpoints answer either a flat array or a paginated object; the
//! client accepts both shapes.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// The uniform response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
  pub data: T,
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub status: Option<Value>,
}

/// Pagination wrapper used by paginated families.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
  pub data: Vec<T>,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub page: u32,
  #[serde(default)]
  pub limit: u32,
  #[serde(default)]
  pub next: Option<u32>,
  #[serde(default)]
  pub prev: Option<u32>,
}

/// `data` field of a list response, flat or paginated.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListData<T> {
  Paged(Page<T>),
  Flat(Vec<T>),
}

impl<T: DeserializeOwned> ListData<T> {
  pub fn into_items(self) -> Vec<T> {
    match self {
      ListData::Paged(page) => page.data,
      ListData::Flat(items) => items,
    }
  }
}

/// Body of a failed response, parsed only for its message.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
  #[serde(default)]
  pub message: Option<String>,
}

/// Outcome of a successful create/update/delete, carrying the server's
/// notification message when it sent one.
#[derive(Debug, Clone)]
pub struct Mutated {
  pub message: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Deserialize, PartialEq)]
  struct Row {
    id: String,
    name: String,
  }

  #[test]
  fn test_flat_list_envelope() {
    let body = r#"{
      "data": [{"id": "1", "name": "Rust"}],
      "message": "ok",
      "status": 200
    }"#;
    let envelope: Envelope<ListData<Row>> = serde_json::from_str(body).unwrap();
    let items = envelope.data.into_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Rust");
  }

  #[test]
  fn test_paginated_list_envelope() {
    let body = r#"{
      "data": {"data": [{"id": "1", "name": "Rust"}], "total": 12, "page": 1, "limit": 10, "next": 2, "prev": null},
      "message": null,
      "status": "success"
    }"#;
    let envelope: Envelope<ListData<Row>> = serde_json::from_str(body).unwrap();
    match &envelope.data {
      ListData::Paged(page) => {
        assert_eq!(page.total, 12);
        assert_eq!(page.next, Some(2));
      }
      ListData::Flat(_) => panic!("expected paginated shape"),
    }
  }

  #[test]
  fn test_delete_envelope_with_null_data() {
    let body = r#"{"data": null, "message": "Skill deleted", "status": 200}"#;
    let envelope: Envelope<Value> = serde_json::from_str(body).unwrap();
    assert!(envelope.data.is_null());
    assert_eq!(envelope.message.as_deref(), Some("Skill deleted"));
  }

  #[test]
  fn test_error_body_message() {
    let body = r#"{"data": null, "message": "Name already taken", "status": 422}"#;
    let error: ErrorBody = serde_json::from_str(body).unwrap();
    assert_eq!(error.message.as_deref(), Some("Name already taken"));

    let error: ErrorBody = serde_json::from_str("{}").unwrap();
    assert!(error.message.is_none());
  }
}
