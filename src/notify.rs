//! Transient notifications.
//!
//! Mutations report their outcome as a [`Notice`] through a cloneable
//! [`Notifier`]; the app drains them into [`Toasts`], which shows one at a
//! time in the footer until it expires. Every failure here is
//! user-recoverable; nothing is fatal.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub kind: NoticeKind,
  pub message: String,
}

impl Notice {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      kind: NoticeKind::Success,
      message: message.into(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      kind: NoticeKind::Error,
      message: message.into(),
    }
  }
}

/// Cloneable handle for emitting notices from controllers and tasks.
#[derive(Clone)]
pub struct Notifier {
  tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
  pub fn success(&self, message: impl Into<String>) {
    // Receiver gone means we're shutting down
    let _ = self.tx.send(Notice::success(message));
  }

  pub fn error(&self, message: impl Into<String>) {
    let _ = self.tx.send(Notice::error(message));
  }
}

/// Footer toast queue: one visible notice at a time, displayed for `ttl`.
pub struct Toasts {
  rx: mpsc::UnboundedReceiver<Notice>,
  queue: VecDeque<Notice>,
  current: Option<(Notice, Instant)>,
  ttl: Duration,
}

impl Toasts {
  pub fn new(ttl: Duration) -> (Notifier, Self) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
      Notifier { tx },
      Self {
        rx,
        queue: VecDeque::new(),
        current: None,
        ttl,
      },
    )
  }

  /// Drain pending notices and advance expiry. Returns true on change.
  pub fn tick(&mut self) -> bool {
    self.tick_at(Instant::now())
  }

  fn tick_at(&mut self, now: Instant) -> bool {
    let mut changed = false;

    while let Ok(notice) = self.rx.try_recv() {
      self.queue.push_back(notice);
      changed = true;
    }

    if let Some((_, shown_at)) = &self.current {
      if now.duration_since(*shown_at) >= self.ttl {
        self.current = None;
        changed = true;
      }
    }

    if self.current.is_none() {
      if let Some(next) = self.queue.pop_front() {
        self.current = Some((next, now));
        changed = true;
      }
    }

    changed
  }

  pub fn current(&self) -> Option<&Notice> {
    self.current.as_ref().map(|(notice, _)| notice)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_notices_are_shown_in_order() {
    let (notifier, mut toasts) = Toasts::new(Duration::from_secs(3));
    notifier.success("Skill created");
    notifier.error("Skill deletion failed");

    let start = Instant::now();
    assert!(toasts.tick_at(start));
    assert_eq!(toasts.current(), Some(&Notice::success("Skill created")));

    // Second notice waits for the first to expire
    toasts.tick_at(start + Duration::from_secs(1));
    assert_eq!(toasts.current(), Some(&Notice::success("Skill created")));

    toasts.tick_at(start + Duration::from_secs(3));
    assert_eq!(
      toasts.current(),
      Some(&Notice::error("Skill deletion failed"))
    );
  }

  #[tokio::test]
  async fn test_expiry_without_queue_clears_toast() {
    let (notifier, mut toasts) = Toasts::new(Duration::from_millis(100));
    notifier.success("done");

    let start = Instant::now();
    toasts.tick_at(start);
    assert!(toasts.current().is_some());

    toasts.tick_at(start + Duration::from_millis(150));
    assert!(toasts.current().is_none());
  }
}
