use ratatui::prelude::Color;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
  }
}

/// Display color for a skill proficiency level
pub fn level_color(level: u8) -> Color {
  match level {
    80..=100 => Color::Green,
    50..=79 => Color::Yellow,
    _ => Color::White,
  }
}
