/// Available commands and autocomplete logic
use crate::cache::Family;

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  /// Resource family the command opens, if any.
  pub family: Option<Family>,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "skills",
    aliases: &["sk", "skill"],
    description: "Manage skills",
    family: Some(Family::Skills),
  },
  Command {
    name: "experience",
    aliases: &["exp", "work"],
    description: "Manage work experience",
    family: Some(Family::Experience),
  },
  Command {
    name: "education",
    aliases: &["edu"],
    description: "Manage education",
    family: Some(Family::Education),
  },
  Command {
    name: "certifications",
    aliases: &["cert", "certs"],
    description: "Manage certifications",
    family: Some(Family::Certifications),
  },
  Command {
    name: "awards",
    aliases: &["aw", "award"],
    description: "Manage awards",
    family: Some(Family::Awards),
  },
  Command {
    name: "interests",
    aliases: &["int", "interest"],
    description: "Manage interests",
    family: Some(Family::Interests),
  },
  Command {
    name: "references",
    aliases: &["ref", "refs"],
    description: "Manage references",
    family: Some(Family::References),
  },
  Command {
    name: "technologies",
    aliases: &["tech", "technology"],
    description: "Manage the technology registry",
    family: Some(Family::Technologies),
  },
  Command {
    name: "profile",
    aliases: &["me", "personal"],
    description: "Edit personal info",
    family: Some(Family::Profile),
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit folio",
    family: None,
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    // Fuzzy match on alias
    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Sort by priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("skills");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "skills");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("exp");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "experience");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("tech");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "technologies");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("ward");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "awards");
  }
}
