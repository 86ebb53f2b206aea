//! Technology registry used to tag projects.
//!
//! Two refinements over the CV families: deletes go through a confirmation
//! prompt, and the read-only "technologies used by existing projects"
//! aggregate is displayed next to the registry and invalidated alongside it
//! on every mutation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cache::Family;

use super::form::{FieldError, FieldKind, FieldSpec, FormField, FormSpec, FormValues};
use super::CvResource;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technology {
  pub id: String,
  /// Display name ("React Native").
  pub name: String,
  /// Slug used when tagging projects ("react-native").
  pub value: String,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl CvResource for Technology {
  const FAMILY: Family = Family::Technologies;
  const CONFIRM_DELETE: bool = true;
  const AGGREGATE: Option<Family> = Some(Family::ProjectTechnologies);

  fn id(&self) -> &str {
    &self.id
  }

  fn title(&self) -> &str {
    &self.name
  }

  fn subtitle(&self) -> String {
    self.value.clone()
  }

  fn form(initial: Option<&Self>) -> FormSpec {
    FormSpec::new(vec![
      FormField::new(
        FieldSpec::text("name", "Name").required().max_len(50),
        initial.map(|t| t.name.clone()).unwrap_or_default(),
      ),
      FormField::new(
        FieldSpec::text("value", "Value")
          .required()
          .max_len(50)
          .kind(FieldKind::Slug),
        initial.map(|t| t.value.clone()).unwrap_or_default(),
      ),
    ])
  }

  fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    Ok(json!({
      "name": values.get("name"),
      "value": values.get("value"),
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_value_field_is_slug_constrained() {
    let form = Technology::form(None);
    let value_field = form
      .fields
      .iter()
      .find(|f| f.spec.name == "value")
      .expect("value field");
    assert_eq!(value_field.spec.kind, FieldKind::Slug);
    assert!(value_field.spec.validate("react-native").is_none());
    assert!(value_field.spec.validate("React Native").is_some());
  }

  #[test]
  fn test_registry_mutations_invalidate_project_aggregate() {
    assert_eq!(Technology::AGGREGATE, Some(Family::ProjectTechnologies));
    assert!(Family::Technologies
      .invalidation_set()
      .contains(&Family::ProjectTechnologies));
  }
}
