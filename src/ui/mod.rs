pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use ratatui::widgets::ListState;

/// Clamp the list selection into `0..len`, selecting the first row when
/// nothing is selected yet and rows exist.
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    None => state.select(Some(0)),
    Some(i) if i >= len => state.select(Some(len - 1)),
    Some(_) => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_selection_clamped_after_shrink() {
    let mut state = ListState::default();
    state.select(Some(9));
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(2));
  }

  #[test]
  fn test_selection_cleared_when_empty() {
    let mut state = ListState::default();
    state.select(Some(0));
    ensure_valid_selection(&mut state, 0);
    assert_eq!(state.selected(), None);
  }

  #[test]
  fn test_first_row_selected_by_default() {
    let mut state = ListState::default();
    ensure_valid_selection(&mut state, 5);
    assert_eq!(state.selected(), Some(0));
  }
}
