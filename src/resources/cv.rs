//! The seven CV-builder resource families.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::cache::Family;

use super::form::{FieldError, FieldKind, FieldSpec, FormField, FormSpec, FormValues};
use super::{validate_date_range, CvResource};

const CURRENT_OPTIONS: &[&str] = &["no", "yes"];

fn flag(value: bool) -> &'static str {
  if value {
    "yes"
  } else {
    "no"
  }
}

fn field(spec: FieldSpec, initial: Option<&str>) -> FormField {
  FormField::new(spec, initial.unwrap_or(""))
}

// ---------------------------------------------------------------------------
// Skill
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
  pub id: String,
  pub name: String,
  pub category: String,
  /// Self-assessed proficiency, 0..=100.
  pub level: u8,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl CvResource for Skill {
  const FAMILY: Family = Family::Skills;

  fn id(&self) -> &str {
    &self.id
  }

  fn title(&self) -> &str {
    &self.name
  }

  fn subtitle(&self) -> String {
    self.category.clone()
  }

  fn category(&self) -> Option<&str> {
    Some(&self.category)
  }

  fn level(&self) -> Option<u8> {
    Some(self.level)
  }

  fn form(initial: Option<&Self>) -> FormSpec {
    let level = initial.map(|s| s.level.to_string());
    FormSpec::new(vec![
      field(
        FieldSpec::text("name", "Name").required().max_len(100),
        initial.map(|s| s.name.as_str()),
      ),
      field(
        FieldSpec::text("category", "Category").required().max_len(50),
        initial.map(|s| s.category.as_str()),
      ),
      FormField::new(
        FieldSpec::text("level", "Level")
          .required()
          .kind(FieldKind::Number { min: 0, max: 100 }),
        level.unwrap_or_default(),
      ),
      field(
        FieldSpec::text("description", "Description").max_len(500),
        initial.and_then(|s| s.description.as_deref()),
      ),
    ])
  }

  fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    let level: i64 = values
      .get("level")
      .parse()
      .map_err(|_| vec![FieldError::new("level", "Level must be a whole number")])?;
    Ok(json!({
      "name": values.get("name"),
      "category": values.get("category"),
      "level": level,
      "description": values.get_opt("description"),
    }))
  }
}

// ---------------------------------------------------------------------------
// Experience
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
  pub id: String,
  pub role: String,
  pub company: String,
  #[serde(default)]
  pub location: Option<String>,
  pub start_date: String,
  #[serde(default)]
  pub end_date: Option<String>,
  #[serde(default)]
  pub current: bool,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl CvResource for Experience {
  const FAMILY: Family = Family::Experience;

  fn id(&self) -> &str {
    &self.id
  }

  fn title(&self) -> &str {
    &self.role
  }

  fn subtitle(&self) -> String {
    let until = if self.current {
      "present"
    } else {
      self.end_date.as_deref().unwrap_or("?")
    };
    format!("{} · {} → {}", self.company, self.start_date, until)
  }

  fn form(initial: Option<&Self>) -> FormSpec {
    FormSpec::new(vec![
      field(
        FieldSpec::text("role", "Role").required().max_len(100),
        initial.map(|e| e.role.as_str()),
      ),
      field(
        FieldSpec::text("company", "Company").required().max_len(100),
        initial.map(|e| e.company.as_str()),
      ),
      field(
        FieldSpec::text("location", "Location").max_len(100),
        initial.and_then(|e| e.location.as_deref()),
      ),
      field(
        FieldSpec::text("start_date", "Start date")
          .required()
          .kind(FieldKind::Date),
        initial.map(|e| e.start_date.as_str()),
      ),
      field(
        FieldSpec::text("end_date", "End date").kind(FieldKind::Date),
        initial.and_then(|e| e.end_date.as_deref()),
      ),
      FormField::new(
        FieldSpec::text("current", "Current role").kind(FieldKind::Select(CURRENT_OPTIONS)),
        flag(initial.is_some_and(|e| e.current)),
      ),
      field(
        FieldSpec::text("description", "Description").max_len(2000),
        initial.and_then(|e| e.description.as_deref()),
      ),
    ])
  }

  fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    let errors = validate_date_range(values);
    if !errors.is_empty() {
      return Err(errors);
    }
    let current = values.get("current") == "yes";
    Ok(json!({
      "role": values.get("role"),
      "company": values.get("company"),
      "location": values.get_opt("location"),
      "start_date": values.get("start_date"),
      "end_date": if current { None } else { values.get_opt("end_date") },
      "current": current,
      "description": values.get_opt("description"),
    }))
  }
}

// ---------------------------------------------------------------------------
// Education
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
  pub id: String,
  pub institution: String,
  pub degree: String,
  #[serde(default)]
  pub field_of_study: Option<String>,
  pub start_date: String,
  #[serde(default)]
  pub end_date: Option<String>,
  #[serde(default)]
  pub current: bool,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl CvResource for Education {
  const FAMILY: Family = Family::Education;

  fn id(&self) -> &str {
    &self.id
  }

  fn title(&self) -> &str {
    &self.degree
  }

  fn subtitle(&self) -> String {
    let until = if self.current {
      "present"
    } else {
      self.end_date.as_deref().unwrap_or("?")
    };
    format!("{} · {} → {}", self.institution, self.start_date, until)
  }

  fn form(initial: Option<&Self>) -> FormSpec {
    FormSpec::new(vec![
      field(
        FieldSpec::text("institution", "Institution")
          .required()
          .max_len(150),
        initial.map(|e| e.institution.as_str()),
      ),
      field(
        FieldSpec::text("degree", "Degree").required().max_len(100),
        initial.map(|e| e.degree.as_str()),
      ),
      field(
        FieldSpec::text("field_of_study", "Field of study").max_len(100),
        initial.and_then(|e| e.field_of_study.as_deref()),
      ),
      field(
        FieldSpec::text("start_date", "Start date")
          .required()
          .kind(FieldKind::Date),
        initial.map(|e| e.start_date.as_str()),
      ),
      field(
        FieldSpec::text("end_date", "End date").kind(FieldKind::Date),
        initial.and_then(|e| e.end_date.as_deref()),
      ),
      FormField::new(
        FieldSpec::text("current", "Currently enrolled").kind(FieldKind::Select(CURRENT_OPTIONS)),
        flag(initial.is_some_and(|e| e.current)),
      ),
      field(
        FieldSpec::text("description", "Description").max_len(1000),
        initial.and_then(|e| e.description.as_deref()),
      ),
    ])
  }

  fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    let errors = validate_date_range(values);
    if !errors.is_empty() {
      return Err(errors);
    }
    let current = values.get("current") == "yes";
    Ok(json!({
      "institution": values.get("institution"),
      "degree": values.get("degree"),
      "field_of_study": values.get_opt("field_of_study"),
      "start_date": values.get("start_date"),
      "end_date": if current { None } else { values.get_opt("end_date") },
      "current": current,
      "description": values.get_opt("description"),
    }))
  }
}

// ---------------------------------------------------------------------------
// Certification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
  pub id: String,
  pub name: String,
  pub issuer: String,
  pub issue_date: String,
  #[serde(default)]
  pub credential_id: Option<String>,
  #[serde(default)]
  pub credential_url: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl CvResource for Certification {
  const FAMILY: Family = Family::Certifications;

  fn id(&self) -> &str {
    &self.id
  }

  fn title(&self) -> &str {
    &self.name
  }

  fn subtitle(&self) -> String {
    format!("{} · {}", self.issuer, self.issue_date)
  }

  fn form(initial: Option<&Self>) -> FormSpec {
    FormSpec::new(vec![
      field(
        FieldSpec::text("name", "Name").required().max_len(150),
        initial.map(|c| c.name.as_str()),
      ),
      field(
        FieldSpec::text("issuer", "Issuer").required().max_len(100),
        initial.map(|c| c.issuer.as_str()),
      ),
      field(
        FieldSpec::text("issue_date", "Issue date")
          .required()
          .kind(FieldKind::Date),
        initial.map(|c| c.issue_date.as_str()),
      ),
      field(
        FieldSpec::text("credential_id", "Credential id").max_len(100),
        initial.and_then(|c| c.credential_id.as_deref()),
      ),
      field(
        FieldSpec::text("credential_url", "Credential URL").max_len(300),
        initial.and_then(|c| c.credential_url.as_deref()),
      ),
    ])
  }

  fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    Ok(json!({
      "name": values.get("name"),
      "issuer": values.get("issuer"),
      "issue_date": values.get("issue_date"),
      "credential_id": values.get_opt("credential_id"),
      "credential_url": values.get_opt("credential_url"),
    }))
  }
}

// ---------------------------------------------------------------------------
// Award
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Award {
  pub id: String,
  pub title: String,
  pub issuer: String,
  pub date: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl CvResource for Award {
  const FAMILY: Family = Family::Awards;

  fn id(&self) -> &str {
    &self.id
  }

  fn title(&self) -> &str {
    &self.title
  }

  fn subtitle(&self) -> String {
    format!("{} · {}", self.issuer, self.date)
  }

  fn form(initial: Option<&Self>) -> FormSpec {
    FormSpec::new(vec![
      field(
        FieldSpec::text("title", "Title").required().max_len(150),
        initial.map(|a| a.title.as_str()),
      ),
      field(
        FieldSpec::text("issuer", "Issuer").required().max_len(100),
        initial.map(|a| a.issuer.as_str()),
      ),
      field(
        FieldSpec::text("date", "Date").required().kind(FieldKind::Date),
        initial.map(|a| a.date.as_str()),
      ),
      field(
        FieldSpec::text("description", "Description").max_len(500),
        initial.and_then(|a| a.description.as_deref()),
      ),
    ])
  }

  fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    Ok(json!({
      "title": values.get("title"),
      "issuer": values.get("issuer"),
      "date": values.get("date"),
      "description": values.get_opt("description"),
    }))
  }
}

// ---------------------------------------------------------------------------
// Interest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl CvResource for Interest {
  const FAMILY: Family = Family::Interests;

  fn id(&self) -> &str {
    &self.id
  }

  fn title(&self) -> &str {
    &self.name
  }

  fn subtitle(&self) -> String {
    self.description.clone().unwrap_or_default()
  }

  fn form(initial: Option<&Self>) -> FormSpec {
    FormSpec::new(vec![
      field(
        FieldSpec::text("name", "Name").required().max_len(100),
        initial.map(|i| i.name.as_str()),
      ),
      field(
        FieldSpec::text("description", "Description").max_len(300),
        initial.and_then(|i| i.description.as_deref()),
      ),
    ])
  }

  fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    Ok(json!({
      "name": values.get("name"),
      "description": values.get_opt("description"),
    }))
  }
}

// ---------------------------------------------------------------------------
// Reference
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
  pub id: String,
  pub name: String,
  pub position: String,
  #[serde(default)]
  pub company: Option<String>,
  pub email: String,
  #[serde(default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub created_at: Option<String>,
  #[serde(default)]
  pub updated_at: Option<String>,
}

impl CvResource for Reference {
  const FAMILY: Family = Family::References;

  fn id(&self) -> &str {
    &self.id
  }

  fn title(&self) -> &str {
    &self.name
  }

  fn subtitle(&self) -> String {
    match &self.company {
      Some(company) => format!("{} · {}", self.position, company),
      None => self.position.clone(),
    }
  }

  fn form(initial: Option<&Self>) -> FormSpec {
    FormSpec::new(vec![
      field(
        FieldSpec::text("name", "Name").required().max_len(100),
        initial.map(|r| r.name.as_str()),
      ),
      field(
        FieldSpec::text("position", "Position").required().max_len(100),
        initial.map(|r| r.position.as_str()),
      ),
      field(
        FieldSpec::text("company", "Company").max_len(100),
        initial.and_then(|r| r.company.as_deref()),
      ),
      field(
        FieldSpec::text("email", "Email").required().kind(FieldKind::Email),
        initial.map(|r| r.email.as_str()),
      ),
      field(
        FieldSpec::text("phone", "Phone").max_len(30),
        initial.and_then(|r| r.phone.as_deref()),
      ),
    ])
  }

  fn payload(values: &FormValues) -> Result<Value, Vec<FieldError>> {
    Ok(json!({
      "name": values.get("name"),
      "position": values.get("position"),
      "company": values.get_opt("company"),
      "email": values.get("email"),
      "phone": values.get_opt("phone"),
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn skill() -> Skill {
    Skill {
      id: "sk-1".to_string(),
      name: "Rust".to_string(),
      category: "backend".to_string(),
      level: 80,
      description: Some("Systems work".to_string()),
      created_at: None,
      updated_at: None,
    }
  }

  #[test]
  fn test_skill_row_columns() {
    let row = skill();
    assert_eq!(row.subtitle(), "backend");
    assert_eq!(row.level(), Some(80));
  }

  #[test]
  fn test_edit_form_copies_row_values() {
    let row = skill();
    let form = Skill::form(Some(&row));
    let by_name: Vec<(&str, &str)> = form
      .fields
      .iter()
      .map(|f| (f.spec.name, f.initial.as_str()))
      .collect();
    assert!(by_name.contains(&("name", "Rust")));
    assert!(by_name.contains(&("level", "80")));
    assert!(by_name.contains(&("description", "Systems work")));
  }

  #[test]
  fn test_create_form_is_empty() {
    let form = Skill::form(None);
    assert!(form.fields.iter().all(|f| f.initial.is_empty() || f.spec.name == "current"));
  }

  #[test]
  fn test_skill_payload_excludes_server_fields() {
    let values = FormValues::new()
      .set("name", "Rust")
      .set("category", "backend")
      .set("level", "80");
    let body = Skill::payload(&values).unwrap();
    assert_eq!(body["level"], 80);
    assert!(body.get("id").is_none());
    assert!(body.get("created_at").is_none());
  }

  #[test]
  fn test_experience_payload_clears_end_date_when_current() {
    let values = FormValues::new()
      .set("role", "Engineer")
      .set("company", "Acme")
      .set("start_date", "2021-03-01")
      .set("end_date", "2022-01-01")
      .set("current", "yes");
    let body = Experience::payload(&values).unwrap();
    assert_eq!(body["current"], true);
    assert_eq!(body["end_date"], Value::Null);
  }

  #[test]
  fn test_experience_payload_rejects_missing_end_date() {
    let values = FormValues::new()
      .set("role", "Engineer")
      .set("company", "Acme")
      .set("start_date", "2021-03-01")
      .set("current", "no");
    let errors = Experience::payload(&values).unwrap_err();
    assert_eq!(errors[0].field, "end_date");
  }
}
