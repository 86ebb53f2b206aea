use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Reusable text input component
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get the current input value
  pub fn value(&self) -> &str {
    &self.buffer
  }

  /// Check if the input is empty
  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  /// Clear the input
  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  /// Replace the whole value, cursor at the end
  pub fn set_value(&mut self, value: impl Into<String>) {
    self.buffer = value.into();
    self.cursor = self.buffer.len();
  }

  /// Handle a key event, returning the result
  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          self.buffer.remove(self.cursor);
        }
        InputResult::Consumed
      }
      KeyCode::Delete => {
        if self.cursor < self.buffer.len() {
          self.buffer.remove(self.cursor);
        }
        InputResult::Consumed
      }
      KeyCode::Left => {
        if self.cursor > 0 {
          self.cursor -= 1;
        }
        InputResult::Consumed
      }
      KeyCode::Right => {
        if self.cursor < self.buffer.len() {
          self.cursor += 1;
        }
        InputResult::Consumed
      }
      KeyCode::Home | KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::End | KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.cursor = self.buffer.len();
        InputResult::Consumed
      }
      KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        // Clear line before cursor
        self.buffer = self.buffer[self.cursor..].to_string();
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        // Delete word before cursor
        if self.cursor > 0 {
          let before = &self.buffer[..self.cursor];
          let new_cursor = before.trim_end().rfind(' ').map(|i| i + 1).unwrap_or(0);
          self.buffer = format!(
            "{}{}",
            &self.buffer[..new_cursor],
            &self.buffer[self.cursor..]
          );
          self.cursor = new_cursor;
        }
        InputResult::Consumed
      }
      KeyCode::Char(c) => {
        self.buffer.insert(self.cursor, c);
        self.cursor += 1;
        InputResult::Consumed
      }
      _ => InputResult::NotHandled,
    }
  }
}
