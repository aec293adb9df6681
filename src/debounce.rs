use std::time::{Duration, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Turns raw text input into committed values once the input has been quiet
/// for `delay`. The caller drives time, which keeps it usable from any event
/// loop and deterministic under test.
#[derive(Clone, Debug)]
pub struct Debouncer {
  delay: Duration,
  display_value: String,
  committed: String,
  commit_at: Option<Instant>,
}

impl Debouncer {
  pub fn new(delay: Duration) -> Self {
    Self::with_value(delay, String::new())
  }

  /// Starts with `value` already committed, e.g. a search restored from the
  /// URL.
  pub fn with_value(delay: Duration, value: impl Into<String>) -> Self {
    let value = value.into();
    Self {
      delay,
      display_value: value.clone(),
      committed: value,
      commit_at: None,
    }
  }

  /// Records a keystroke and pushes the commit deadline out.
  pub fn input(&mut self, value: impl Into<String>, now: Instant) {
    self.display_value = value.into();
    // A delay too large for the clock commits on the next poll.
    self.commit_at = Some(now.checked_add(self.delay).unwrap_or(now));
  }

  /// Commits the pending value if its deadline has passed. Returns it only
  /// when it differs from the last committed value.
  pub fn poll(&mut self, now: Instant) -> Option<String> {
    let deadline = self.commit_at?;
    if now < deadline {
      return None;
    }
    self.commit_at = None;
    if self.display_value == self.committed {
      return None;
    }
    self.committed = self.display_value.clone();
    Some(self.committed.clone())
  }

  /// Replaces both values without scheduling a commit, for external resets.
  pub fn reset(&mut self, value: impl Into<String>) {
    let value = value.into();
    self.display_value = value.clone();
    self.committed = value;
    self.commit_at = None;
  }

  pub fn display_value(&self) -> &str {
    &self.display_value
  }

  pub fn committed(&self) -> &str {
    &self.committed
  }

  pub fn is_pending(&self) -> bool {
    self.commit_at.is_some()
  }
}

impl Default for Debouncer {
  fn default() -> Self {
    Self::new(SEARCH_DEBOUNCE)
  }
}
