use std::time::{Duration, Instant};

pub const RECOMPUTE_QUIET: Duration = Duration::from_millis(80);
pub const PERSIST_QUIET: Duration = Duration::from_millis(500);

/// Coalesces bursts of work: each `schedule` pushes the deadline back, and
/// the work becomes due once `quiet` has elapsed since the last one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Returns true and disarms when the work is due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Disarms; returns whether work was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
