use super::KeyResult;
use crate::ui::renderfns::truncate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by filter bar that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterBarEvent {
  /// User navigated to a different filter value
  SelectionChanged,
}

/// Category tab bar: "All" plus the distinct category values of the loaded
/// rows. Selection changes apply immediately (no debounce) and selecting
/// "All" means no category parameter at all.
#[derive(Debug, Clone, Default)]
pub struct FilterBar {
  values: Vec<String>,
  selected: usize, // 0 = All, 1+ = index into values
}

impl FilterBar {
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether there is anything to filter by
  pub fn is_active(&self) -> bool {
    !self.values.is_empty()
  }

  /// The currently selected category, None for "All"
  pub fn selected_value(&self) -> Option<&str> {
    if self.selected == 0 {
      None
    } else {
      self.values.get(self.selected - 1).map(String::as_str)
    }
  }

  /// Update values, preserving the selected category when it still exists
  pub fn update_values(&mut self, values: Vec<String>) {
    let kept = self.selected_value().map(String::from);
    self.values = values;
    self.selected = match kept {
      Some(value) => self
        .values
        .iter()
        .position(|v| *v == value)
        .map(|i| i + 1)
        .unwrap_or(0),
      None => 0,
    };
  }

  /// Handle a key event
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterBarEvent> {
    if self.values.is_empty() {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::PageUp => {
        self.navigate(-1);
        KeyResult::Event(FilterBarEvent::SelectionChanged)
      }
      KeyCode::PageDown | KeyCode::Tab => {
        self.navigate(1);
        KeyResult::Event(FilterBarEvent::SelectionChanged)
      }
      _ => KeyResult::NotHandled,
    }
  }

  /// Navigate filter tabs with wrapping
  fn navigate(&mut self, direction: i32) {
    // Total tabs = "All" + values
    let total_tabs = self.values.len() + 1;

    self.selected = if direction > 0 {
      (self.selected + 1) % total_tabs
    } else if self.selected == 0 {
      total_tabs - 1
    } else {
      self.selected - 1
    };
  }

  /// Render the filter bar
  pub fn render(&self, frame: &mut Frame, area: Rect) {
    if self.values.is_empty() {
      return;
    }

    let mut spans = vec![Span::styled(
      " Category: ",
      Style::default().fg(Color::DarkGray),
    )];

    let tab_style = |active: bool| {
      if active {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
      } else {
        Style::default().fg(Color::White)
      }
    };

    spans.push(Span::styled(" All ", tab_style(self.selected == 0)));
    for (i, value) in self.values.iter().enumerate() {
      spans.push(Span::raw(" "));
      spans.push(Span::styled(
        format!(" {} ", truncate(value, 16)),
        tab_style(self.selected == i + 1),
      ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_all_selected_by_default() {
    let mut bar = FilterBar::new();
    bar.update_values(vec!["backend".into(), "frontend".into()]);
    assert_eq!(bar.selected_value(), None);
  }

  #[test]
  fn test_navigation_wraps() {
    let mut bar = FilterBar::new();
    bar.update_values(vec!["backend".into(), "frontend".into()]);

    bar.handle_key(key(KeyCode::PageDown));
    assert_eq!(bar.selected_value(), Some("backend"));
    bar.handle_key(key(KeyCode::PageDown));
    assert_eq!(bar.selected_value(), Some("frontend"));
    bar.handle_key(key(KeyCode::PageDown));
    assert_eq!(bar.selected_value(), None);
  }

  #[test]
  fn test_selection_survives_value_refresh() {
    let mut bar = FilterBar::new();
    bar.update_values(vec!["backend".into(), "frontend".into()]);
    bar.handle_key(key(KeyCode::PageDown));
    bar.handle_key(key(KeyCode::PageDown));

    bar.update_values(vec!["devops".into(), "frontend".into()]);
    assert_eq!(bar.selected_value(), Some("frontend"));
  }

  #[test]
  fn test_removed_selection_falls_back_to_all() {
    let mut bar = FilterBar::new();
    bar.update_values(vec!["backend".into()]);
    bar.handle_key(key(KeyCode::PageDown));

    bar.update_values(vec!["frontend".into()]);
    assert_eq!(bar.selected_value(), None);
  }
}
