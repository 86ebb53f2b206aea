use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Pop current view from stack (go back / quit at root)
  Pop,
}

/// Trait for view behavior
///
/// Views handle their own input modes (search, modal form, etc.) and return
/// actions for the App to execute. This creates a clean delegation chain:
/// App → View → Components
///
/// Views that load data asynchronously go through the shared QueryCache and
/// fold completions in on tick().
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Whether the view has an overlay (search, modal) capturing all input.
  /// The App does not intercept global shortcuts while this is true.
  fn wants_input(&self) -> bool {
    false
  }

  /// Called on each tick to drive debounce, queries and mutations
  fn tick(&mut self) {}
}
