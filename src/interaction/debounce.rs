use serde::{Deserialize, Serialize};

/// Milliseconds on the host-driven chart clock.
pub type Millis = u64;

/// Trailing-edge debouncer over the chart clock.
///
/// Each `push` replaces the pending value and restarts the window, so a burst
/// yields exactly one value: the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debouncer<T> {
    delay_ms: Millis,
    pending: Option<(T, Millis)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay_ms: Millis) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    #[must_use]
    pub fn delay_ms(&self) -> Millis {
        self.delay_ms
    }

    pub fn push(&mut self, value: T, now: Millis) {
        self.pending = Some((value, now.saturating_add(self.delay_ms)));
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Millis> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Releases the pending value once its window has elapsed.
    pub fn poll(&mut self, now: Millis) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drops pending work. Returns `true` when something was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;

    #[test]
    fn burst_yields_last_value_once() {
        let mut debouncer = Debouncer::new(50);
        for t in 0..10 {
            debouncer.push(t, t);
            assert_eq!(debouncer.poll(t), None);
        }
        assert_eq!(debouncer.poll(58), None);
        assert_eq!(debouncer.poll(59), Some(9));
        assert_eq!(debouncer.poll(500), None);
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(10);
        debouncer.push("hover", 0);
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert_eq!(debouncer.poll(100), None);
    }
}
