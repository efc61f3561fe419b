use std::time::Duration;

/// A single restartable timer owned by whoever debounces.
///
/// Each [`schedule`](Self::schedule) replaces the pending value and pushes the
/// deadline out by the quiet window; [`poll`](Self::poll) hands the value back
/// once the window has elapsed without new input. Time is passed in as seconds
/// so the owner decides which clock drives it.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: f64,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: f64,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.as_secs_f64(),
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs_f64(self.window)
    }

    pub fn set_window(&mut self, window: Duration) {
        self.window = window.as_secs_f64();
    }

    /// Replaces any pending value and restarts the quiet window. Returns true
    /// if a pending value was superseded.
    pub fn schedule(&mut self, value: T, now: f64) -> bool {
        let replaced = self.pending.is_some();
        self.pending = Some(Pending {
            value,
            deadline: now + self.window,
        });
        replaced
    }

    /// Takes the pending value if its quiet window has elapsed.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending value fires
    pub fn time_remaining(&self, now: f64) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| Duration::from_secs_f64((p.deadline - now).max(0.0)))
    }
}
