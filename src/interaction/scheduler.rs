use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::debounce::Millis;

/// Handle of a scheduled task; orders by due time, then scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId {
    due: Millis,
    seq: u64,
}

impl TimerId {
    #[must_use]
    pub fn due(self) -> Millis {
        self.due
    }
}

/// Cooperative timer queue over the chart clock.
#[derive(Debug, Clone)]
pub struct TaskScheduler<T> {
    now: Millis,
    next_seq: u64,
    timers: BTreeMap<TimerId, T>,
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            timers: BTreeMap::new(),
        }
    }
}

impl<T> TaskScheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Moves the clock forward; the clock never runs backwards.
    pub fn set_now(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    pub fn schedule(&mut self, delay_ms: Millis, task: T) -> TimerId {
        let id = TimerId {
            due: self.now.saturating_add(delay_ms),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.timers.insert(id, task);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(&id)
    }

    /// Cancels every task matching `predicate`; returns how many were removed.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, task| !predicate(task));
        before - self.timers.len()
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.timers.keys().next().map(|id| id.due)
    }

    /// Removes and returns the earliest task due at or before `deadline`.
    pub fn pop_due(&mut self, deadline: Millis) -> Option<(TimerId, T)> {
        let id = *self.timers.keys().next()?;
        if id.due > deadline {
            return None;
        }
        self.timers.remove(&id).map(|task| (id, task))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
