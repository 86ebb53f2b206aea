use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Search query changed (emitted on each keystroke, empty string on cancel).
  /// The parent feeds this into its debounced query key.
  Changed(String),
  /// Search submitted (overlay closed, filter persists)
  Submitted,
}

/// Search input component with activation/deactivation
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Check if search is currently active
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Get the current search query
  pub fn query(&self) -> &str {
    self.input.value()
  }

  /// Activate search mode, keeping any persisted query editable
  pub fn activate(&mut self) {
    self.active = true;
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    // If not active, check for activation key
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    // Active - delegate to TextInput
    match self.input.handle_key(key) {
      InputResult::Submitted(_) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Changed(String::new()))
      }
      InputResult::Consumed => {
        KeyResult::Event(SearchEvent::Changed(self.input.value().to_string()))
      }
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  /// Render the search overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60);
    let height = 3; // Just input line with borders

    // Position at top-left of content area with small margin
    let x = area.x + 1;
    let y = area.y + 1;

    let overlay_area = Rect::new(x, y, width, height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Search ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let input_line = Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(self.input.value()),
      Span::styled("_", Style::default().fg(Color::Yellow)), // Cursor
    ]);
    let input_para = Paragraph::new(input_line);
    frame.render_widget(input_para, inner);
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
  fn test_slash_activates() {
    let mut search = SearchInput::new();
    assert_eq!(search.handle_key(key(KeyCode::Char('/'))), KeyResult::Handled);
    assert!(search.is_active());
  }

  #[test]
  fn test_keystrokes_emit_changed() {
    let mut search = SearchInput::new();
    search.handle_key(key(KeyCode::Char('/')));

    let result = search.handle_key(key(KeyCode::Char('r')));
    assert_eq!(
      result,
      KeyResult::Event(SearchEvent::Changed("r".to_string()))
    );
  }

  #[test]
  fn test_escape_clears_query() {
    let mut search = SearchInput::new();
    search.handle_key(key(KeyCode::Char('/')));
    search.handle_key(key(KeyCode::Char('r')));

    let result = search.handle_key(key(KeyCode::Esc));
    assert_eq!(
      result,
      KeyResult::Event(SearchEvent::Changed(String::new()))
    );
    assert!(!search.is_active());
    assert_eq!(search.query(), "");
  }

  #[test]
  fn test_enter_keeps_filter() {
    let mut search = SearchInput::new();
    search.handle_key(key(KeyCode::Char('/')));
    search.handle_key(key(KeyCode::Char('r')));

    let result = search.handle_key(key(KeyCode::Enter));
    assert_eq!(result, KeyResult::Event(SearchEvent::Submitted));
    assert!(!search.is_active());
    assert_eq!(search.query(), "r");
  }
}
