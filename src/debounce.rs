//! Debounced value controller for free-text search.
//!
//! Holds a live input value and a "settled" copy that is promoted only after
//! the live value has remained unchanged for the configured delay. Used so
//! that typing in the search overlay re-keys the list query once, after the
//! user pauses, instead of on every keystroke.

use std::time::{Duration, Instant};

/// Last-write-wins debounce over a string value.
///
/// Tick-driven: call [`Debounced::tick`] from the event loop. Each `set`
/// supersedes any pending promotion, so only the final value in a burst of
/// edits is ever promoted, exactly once, `delay` after the last edit.
#[derive(Debug, Clone)]
pub struct Debounced {
  settled: String,
  pending: Option<(String, Instant)>,
  delay: Duration,
}

impl Debounced {
  /// Create a controller whose settled value equals `initial` immediately.
  pub fn new(initial: impl Into<String>, delay: Duration) -> Self {
    Self {
      settled: initial.into(),
      pending: None,
      delay,
    }
  }

  /// The settled (debounced) value.
  pub fn value(&self) -> &str {
    &self.settled
  }

  /// Whether a promotion is still pending.
  pub fn is_settling(&self) -> bool {
    self.pending.is_some()
  }

  /// Update the live value, restarting the delay window.
  ///
  /// Setting the value the settled copy already holds cancels any pending
  /// promotion instead of scheduling a redundant one.
  pub fn set(&mut self, value: impl Into<String>) {
    let value = value.into();
    if value == self.settled {
      self.pending = None;
      return;
    }
    self.pending = Some((value, Instant::now() + self.delay));
  }

  /// Promote the pending value immediately (e.g. on explicit submit).
  pub fn flush(&mut self) -> bool {
    match self.pending.take() {
      Some((value, _)) => {
        self.settled = value;
        true
      }
      None => false,
    }
  }

  /// Advance the controller. Returns true if the settled value changed.
  pub fn tick(&mut self) -> bool {
    self.tick_at(Instant::now())
  }

  /// Advance with an explicit clock, for deterministic tests.
  pub fn tick_at(&mut self, now: Instant) -> bool {
    let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
    if !due {
      return false;
    }
    if let Some((value, _)) = self.pending.take() {
      self.settled = value;
    }
    true
  }
}
