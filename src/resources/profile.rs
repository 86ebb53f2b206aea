//! Singleton personal-info profile.
//!
//! Not a list family: there is exactly one record, fetched with GET and
//! saved with PUT. It reuses the same form schema machinery as the list
//! families.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::form::{FieldError, FieldKind, FieldSpec, FormField, FormSpec, FormValues};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
  #[serde(default)]
  pub id: Option<String>,
  pub full_name: String,
  #[serde(default)]
  pub headline: Option<String>,
  pub email: String,
  #[serde(default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub location: Option<String>,
  #[serde(default)]
  pub summary: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl PersonalInfo {
  pub fn form(initial: Option<&Self>) -> FormSpec {
    let text = |value: Option<&str>| value.unwrap_or("").to_string();
    FormSpec::new(vec![
      FormField::new(
        FieldSpec::text("full_name", "Full name").required().max_len(100),
        text(initial.map(|p| p.full_name.as_str())),
      ),
      FormField::new(
        FieldSpec::text("headline", "Headline").max_len(150),
        text(initial.and_then(|p| p.headline.as_deref())),
      ),
      FormField::new(
        FieldSpec::text("email", "Email").required().kind(FieldKind::Email),
        text(initial.map(|p| p.email.as_str())),
      ),
      FormField::new(
        FieldSpec::text("phone", "Phone").max_len(30),
        text(initial.and_then(|p| p.phone.as_deref())),
      ),
      FormField::new(
        FieldSpec::text("location", "Location").max_len(100),
        text(initial.and_then(|p| p.location.as_deref())),
      ),
      FormField::new(
        FieldSpec::text("summary", "Summary").max_len(2000),
        text(initial.and_then(|p| p.summary.as_deref())),
      ),
    ])
  }

  pub fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    Ok(json!({
      "full_name": values.get("full_name"),
      "headline": values.get_opt("headline"),
      "email": values.get("email"),
      "phone": values.get_opt("phone"),
      "location": values.get_opt("location"),
      "summary": values.get_opt("summary"),
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_profile_form_prefills_from_record() {
    let profile = PersonalInfo {
      id: Some("p-1".to_string()),
      full_name: "Ada Lovelace".to_string(),
      headline: Some("Engineer".to_string()),
      email: "ada@example.com".to_string(),
      phone: None,
      location: None,
      summary: None,
      created_at: None,
      updated_at: None,
    };
    let form = PersonalInfo::form(Some(&profile));
    let name = form.fields.iter().find(|f| f.spec.name == "full_name").unwrap();
    assert_eq!(name.initial, "Ada Lovelace");
  }
}
