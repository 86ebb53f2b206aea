//! Form field schemas and client-side validation.
//!
//! Each resource family declares its create/edit form as a list of
//! [`FieldSpec`]s. Validation runs before submission so schema failures
//! never reach the network; it is advisory only, the server re-validates.

use chrono::NaiveDate;
use std::collections::HashMap;

/// A single per-field validation failure, rendered inline in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: &'static str,
  pub message: String,
}

impl FieldError {
  pub fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self {
      field,
      message: message.into(),
    }
  }
}

/// What a field accepts. Values travel as strings; kinds constrain them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  /// Integer within an inclusive range.
  Number { min: i64, max: i64 },
  /// ISO date, `YYYY-MM-DD`.
  Date,
  /// Lowercase letters, digits and hyphens only.
  Slug,
  /// Minimal shape check, not RFC 5322.
  Email,
  /// One of a fixed option set; cycled in the form with Space.
  Select(&'static [&'static str]),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
  pub name: &'static str,
  pub label: &'static str,
  pub kind: FieldKind,
  pub required: bool,
  pub max_len: usize,
}

impl FieldSpec {
  pub const fn text(name: &'static str, label: &'static str) -> Self {
    Self {
      name,
      label,
      kind: FieldKind::Text,
      required: false,
      max_len: 200,
    }
  }

  pub const fn kind(mut self, kind: FieldKind) -> Self {
    self.kind = kind;
    self
  }

  pub const fn required(mut self) -> Self {
    self.required = true;
    self
  }

  pub const fn max_len(mut self, max_len: usize) -> Self {
    self.max_len = max_len;
    self
  }

  /// Validate a raw value against this spec.
  pub fn validate(&self, raw: &str) -> Option<FieldError> {
    let value = raw.trim();

    if value.is_empty() {
      if self.required {
        return Some(FieldError::new(self.name, format!("{} is required", self.label)));
      }
      return None;
    }

    if value.chars().count() > self.max_len {
      return Some(FieldError::new(
        self.name,
        format!("{} must be at most {} characters", self.label, self.max_len),
      ));
    }

    match self.kind {
      FieldKind::Text => None,
      FieldKind::Number { min, max } => match value.parse::<i64>() {
        Ok(n) if (min..=max).contains(&n) => None,
        Ok(_) => Some(FieldError::new(
          self.name,
          format!("{} must be between {} and {}", self.label, min, max),
        )),
        Err(_) => Some(FieldError::new(
          self.name,
          format!("{} must be a whole number", self.label),
        )),
      },
      FieldKind::Date => {
        if parse_date(value).is_none() {
          Some(FieldError::new(
            self.name,
            format!("{} must be a date (YYYY-MM-DD)", self.label),
          ))
        } else {
          None
        }
      }
      FieldKind::Slug => {
        if slug_ok(value) {
          None
        } else {
          Some(FieldError::new(
            self.name,
            format!("{} may only contain lowercase letters, digits and hyphens", self.label),
          ))
        }
      }
      FieldKind::Email => {
        let well_formed = value.split_once('@').is_some_and(|(local, domain)| {
          !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        });
        if well_formed {
          None
        } else {
          Some(FieldError::new(
            self.name,
            format!("{} must be a valid email address", self.label),
          ))
        }
      }
      FieldKind::Select(options) => {
        if options.contains(&value) {
          None
        } else {
          Some(FieldError::new(
            self.name,
            format!("{} must be one of: {}", self.label, options.join(", ")),
          ))
        }
      }
    }
  }
}

/// A field spec paired with the value the form opens with.
#[derive(Debug, Clone)]
pub struct FormField {
  pub spec: FieldSpec,
  pub initial: String,
}

impl FormField {
  pub fn new(spec: FieldSpec, initial: impl Into<String>) -> Self {
    Self {
      spec,
      initial: initial.into(),
    }
  }

  pub fn empty(spec: FieldSpec) -> Self {
    Self {
      spec,
      initial: String::new(),
    }
  }
}

/// The declared shape of a create/edit form.
#[derive(Debug, Clone)]
pub struct FormSpec {
  pub fields: Vec<FormField>,
}

impl FormSpec {
  pub fn new(fields: Vec<FormField>) -> Self {
    Self { fields }
  }
}

/// Collected form values at submit time, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormValues(HashMap<&'static str, String>);

impl FormValues {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(mut self, name: &'static str, value: impl Into<String>) -> Self {
    self.0.insert(name, value.into());
    self
  }

  pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
    self.0.insert(name, value.into());
  }

  /// Trimmed value for `name`; empty string when absent.
  pub fn get(&self, name: &str) -> &str {
    self.0.get(name).map(|v| v.trim()).unwrap_or("")
  }

  /// Trimmed value, `None` when absent or empty.
  pub fn get_opt(&self, name: &str) -> Option<String> {
    let value = self.get(name);
    if value.is_empty() {
      None
    } else {
      Some(value.to_string())
    }
  }
}

/// Is `value` a well-formed slug (lowercase letters, digits, hyphens)?
pub fn slug_ok(value: &str) -> bool {
  !value.is_empty()
    && value
      .chars()
      .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_required_field_rejects_empty() {
    let spec = FieldSpec::text("name", "Name").required();
    assert!(spec.validate("").is_some());
    assert!(spec.validate("   ").is_some());
    assert!(spec.validate("Rust").is_none());
  }

  #[test]
  fn test_optional_field_accepts_empty() {
    let spec = FieldSpec::text("description", "Description");
    assert!(spec.validate("").is_none());
  }

  #[test]
  fn test_max_len_enforced() {
    let spec = FieldSpec::text("name", "Name").max_len(4);
    assert!(spec.validate("12345").is_some());
    assert!(spec.validate("1234").is_none());
  }

  #[test]
  fn test_max_len_counts_chars_not_bytes() {
    let spec = FieldSpec::text("name", "Name").max_len(4);
    assert!(spec.validate("héll").is_none());
    assert!(spec.validate("héllo").is_some());
  }

  #[test]
  fn test_number_range() {
    let spec = FieldSpec::text("level", "Level").kind(FieldKind::Number { min: 0, max: 100 });
    assert!(spec.validate("0").is_none());
    assert!(spec.validate("100").is_none());
    assert!(spec.validate("101").is_some());
    assert!(spec.validate("-1").is_some());
    assert!(spec.validate("abc").is_some());
  }

  #[test]
  fn test_date_format() {
    let spec = FieldSpec::text("start_date", "Start date").kind(FieldKind::Date);
    assert!(spec.validate("2024-02-29").is_none());
    assert!(spec.validate("2023-02-29").is_some());
    assert!(spec.validate("29/02/2024").is_some());
  }

  #[test]
  fn test_slug_constraint() {
    assert!(slug_ok("react-native"));
    assert!(slug_ok("vue3"));
    assert!(!slug_ok("React"));
    assert!(!slug_ok("c++"));
    assert!(!slug_ok("space bar"));
    assert!(!slug_ok(""));

    let spec = FieldSpec::text("value", "Value").kind(FieldKind::Slug);
    assert!(spec.validate("react-native").is_none());
    assert!(spec.validate("React").is_some());
  }

  #[test]
  fn test_email_shape() {
    let spec = FieldSpec::text("email", "Email").kind(FieldKind::Email);
    assert!(spec.validate("ada@example.com").is_none());
    assert!(spec.validate("ada").is_some());
    assert!(spec.validate("@example.com").is_some());
    assert!(spec.validate("ada@nodot").is_some());
  }

  #[test]
  fn test_select_options() {
    let spec = FieldSpec::text("current", "Current").kind(FieldKind::Select(&["no", "yes"]));
    assert!(spec.validate("yes").is_none());
    assert!(spec.validate("maybe").is_some());
  }
}
