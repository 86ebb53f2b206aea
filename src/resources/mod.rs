//! Resource family definitions for the CV builder and technology registry.
//!
//! Every family plugs into the same list engine through [`CvResource`]:
//! a serde row type, a form schema, and validated payload construction.
//! Adding a family is configuration, not another copy of the workflow.

mod cv;
mod form;
mod profile;
mod technology;

pub use cv::{Award, Certification, Education, Experience, Interest, Reference, Skill};
pub use form::{parse_date, FieldError, FieldKind, FieldSpec, FormField, FormSpec, FormValues};
pub use profile::PersonalInfo;
pub use technology::Technology;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Family;

/// A resource family managed by the list engine.
///
/// `id`, `created_at` and `updated_at` are server-assigned; the client never
/// writes them. The form schema and `payload` define the client-side
/// validation boundary: `payload` is only called with values that already
/// passed per-field validation, and adds cross-field rules.
pub trait CvResource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
  const FAMILY: Family;

  /// Ask before deleting (presentation-layer wrapper, used by the
  /// technology registry).
  const CONFIRM_DELETE: bool = false;

  /// Read-only aggregate family to fetch and display alongside the list.
  const AGGREGATE: Option<Family> = None;

  fn id(&self) -> &str;

  /// Primary list column.
  fn title(&self) -> &str;

  /// Secondary list column.
  fn subtitle(&self) -> String;

  /// Category value feeding the filter bar, if the family has one.
  fn category(&self) -> Option<&str> {
    None
  }

  /// Proficiency 0..=100 for families that carry one; drawn as a colored
  /// badge next to the subtitle.
  fn level(&self) -> Option<u8> {
    None
  }

  /// Form schema, pre-populated from `initial` in edit mode.
  ///
  /// Values are copied out of the row, so the draft never aliases the
  /// cached copy and cancelling an edit leaves the list untouched.
  fn form(initial: Option<&Self>) -> FormSpec;

  /// Cross-field validation and JSON body construction for create/update.
  fn payload(values: &FormValues) -> Result<serde_json::Value, Vec<FieldError>>;
}

/// Shared rule for families with a start/end date range: the end date is
/// required unless the entry is marked current, and must not precede the
/// start date.
pub(crate) fn validate_date_range(values: &FormValues) -> Vec<FieldError> {
  let mut errors = Vec::new();
  let current = values.get("current") == "yes";
  let start = parse_date(values.get("start_date"));
  let end_raw = values.get("end_date");

  if current {
    return errors;
  }

  if end_raw.is_empty() {
    errors.push(FieldError::new(
      "end_date",
      "End date is required unless the entry is marked current",
    ));
    return errors;
  }

  if let (Some(start), Some(end)) = (start, parse_date(end_raw)) {
    if end < start {
      errors.push(FieldError::new(
        "end_date",
        "End date must not be before the start date",
      ));
    }
  }

  errors
}
