//! Query keys for list fetches.
//!
//! A key is a resource family plus the canonical filter parameters. The same
//! canonical pair list feeds both the cache hash and the HTTP request, so two
//! spellings of "no filter" (empty search box vs. never touched) resolve to
//! one key and share one cached result.

use sha2::{Digest, Sha256};

/// Resource families served by the portfolio API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
  Skills,
  Experience,
  Education,
  Certifications,
  Awards,
  Interests,
  References,
  Technologies,
  /// Distinct technologies referenced by existing projects (read-only).
  ProjectTechnologies,
  /// Singleton personal-info profile.
  Profile,
}

impl Family {
  /// URL path segment for this family's collection endpoint.
  pub fn path(&self) -> &'static str {
    match self {
      Family::Skills => "skills",
      Family::Experience => "experience",
      Family::Education => "education",
      Family::Certifications => "certifications",
      Family::Awards => "awards",
      Family::Interests => "interests",
      Family::References => "references",
      Family::Technologies => "technologies",
      Family::ProjectTechnologies => "projects/technologies",
      Family::Profile => "personal-info",
    }
  }

  /// Display label for headers and notifications.
  pub fn label(&self) -> &'static str {
    match self {
      Family::Skills => "Skills",
      Family::Experience => "Experience",
      Family::Education => "Education",
      Family::Certifications => "Certifications",
      Family::Awards => "Awards",
      Family::Interests => "Interests",
      Family::References => "References",
      Family::Technologies => "Technologies",
      Family::ProjectTechnologies => "Project technologies",
      Family::Profile => "Profile",
    }
  }

  /// Singular label for per-entry notifications ("Skill created").
  pub fn singular(&self) -> &'static str {
    match self {
      Family::Skills => "Skill",
      Family::Experience => "Experience entry",
      Family::Education => "Education entry",
      Family::Certifications => "Certification",
      Family::Awards => "Award",
      Family::Interests => "Interest",
      Family::References => "Reference",
      Family::Technologies => "Technology",
      Family::ProjectTechnologies => "Project technology",
      Family::Profile => "Profile",
    }
  }

  /// Families whose cached queries a mutation on `self` makes stale.
  ///
  /// Always includes `self`; the technology registry additionally feeds the
  /// read-only aggregate of technologies used by projects.
  pub fn invalidation_set(&self) -> Vec<Family> {
    match self {
      Family::Technologies => vec![Family::Technologies, Family::ProjectTechnologies],
      other => vec![*other],
    }
  }
}

/// Filter parameters for a list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
  /// Free-text search (debounced upstream).
  pub q: Option<String>,
  /// Category tab value; `"all"` means no filter.
  pub category: Option<String>,
  /// Technology slug filter; `"all"` means no filter.
  pub technology: Option<String>,
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

impl ListParams {
  pub fn with_q(mut self, q: impl Into<String>) -> Self {
    self.q = Some(q.into());
    self
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  /// Canonical (name, value) pairs with empty/falsy filters omitted.
  ///
  /// An empty or whitespace `q` is dropped entirely (never sent as `q=""`),
  /// `"all"` sentinel selections are dropped, and numeric parameters are
  /// sent only when strictly positive, so the server default applies instead
  /// of a falsy-but-meaningful value filtering out every row.
  pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();

    if let Some(q) = &self.q {
      let q = q.trim();
      if !q.is_empty() {
        pairs.push(("q", q.to_string()));
      }
    }
    for (name, value) in [("category", &self.category), ("technology", &self.technology)] {
      if let Some(value) = value {
        if !value.is_empty() && !value.eq_ignore_ascii_case("all") {
          pairs.push((name, value.clone()));
        }
      }
    }
    for (name, value) in [("page", self.page), ("limit", self.limit)] {
      if let Some(n) = value {
        if n > 0 {
          pairs.push((name, n.to_string()));
        }
      }
    }

    pairs
  }
}

/// Cache key for a list query: family + canonical filter params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
  pub family: Family,
  pub params: ListParams,
}

impl QueryKey {
  pub fn new(family: Family, params: ListParams) -> Self {
    Self { family, params }
  }

  /// Key for the family's unfiltered default query.
  pub fn unfiltered(family: Family) -> Self {
    Self {
      family,
      params: ListParams::default(),
    }
  }

  /// Stable, fixed-length map key.
  pub fn cache_hash(&self) -> String {
    let mut input = self.family.path().to_string();
    for (name, value) in self.params.query_pairs() {
      input.push_str(&format!("&{}={}", name, value));
    }

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
  }

  /// Human-readable form for logs.
  pub fn description(&self) -> String {
    let pairs = self.params.query_pairs();
    if pairs.is_empty() {
      self.family.path().to_string()
    } else {
      let qs: Vec<String> = pairs.iter().map(|(n, v)| format!("{}={}", n, v)).collect();
      format!("{}?{}", self.family.path(), qs.join("&"))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_and_sentinel_filters_omitted() {
    let params = ListParams {
      q: Some("".to_string()),
      category: Some("all".to_string()),
      technology: Some("All".to_string()),
      page: Some(0),
      limit: None,
    };
    assert!(params.query_pairs().is_empty());
  }

  #[test]
  fn test_whitespace_q_omitted() {
    let params = ListParams::default().with_q("   ");
    assert!(params.query_pairs().is_empty());
  }

  #[test]
  fn test_positive_filters_sent() {
    let params = ListParams {
      q: Some("react".to_string()),
      category: Some("frontend".to_string()),
      technology: None,
      page: Some(2),
      limit: Some(20),
    };
    assert_eq!(
      params.query_pairs(),
      vec![
        ("q", "react".to_string()),
        ("category", "frontend".to_string()),
        ("page", "2".to_string()),
        ("limit", "20".to_string()),
      ]
    );
  }

  #[test]
  fn test_equivalent_empty_filters_share_a_key() {
    let untouched = QueryKey::unfiltered(Family::Skills);
    let cleared = QueryKey::new(
      Family::Skills,
      ListParams::default().with_q("").with_category("all"),
    );
    assert_eq!(untouched.cache_hash(), cleared.cache_hash());
  }

  #[test]
  fn test_distinct_filters_distinct_keys() {
    let a = QueryKey::new(Family::Skills, ListParams::default().with_q("react"));
    let b = QueryKey::new(Family::Skills, ListParams::default().with_q("rust"));
    assert_ne!(a.cache_hash(), b.cache_hash());
  }

  #[test]
  fn test_technology_invalidation_reaches_aggregate() {
    let set = Family::Technologies.invalidation_set();
    assert!(set.contains(&Family::ProjectTechnologies));
    assert_eq!(Family::Skills.invalidation_set(), vec![Family::Skills]);
  }
}
