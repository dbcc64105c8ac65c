//! Cancelable timers on a caller-supplied millisecond clock.
//!
//! Nothing runs on its own: the host calls [`Scheduler::pop_due`] with the
//! current time and acts on each fired task. Tasks fire one at a time in due
//! order, so a task that cancels another keeps it from firing.

use std::collections::BTreeMap;

use super::Direction;
use super::feedback::Widget;

/// Handle for a scheduled timer. Never reused within one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a session timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Arrow held past the hold threshold.
    KeyHold(Direction),
    /// Fast-flip tick while an arrow stays down.
    KeyRepeat(Direction),
    AutoPlay,
    Hide(Widget),
}

#[derive(Debug, Clone)]
struct Entry<T> {
    due_ms: u64,
    period_ms: Option<u64>,
    task: T,
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub due_ms: u64,
    pub task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    next_id: u64,
    entries: BTreeMap<TimerId, Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `task` once, `delay_ms` after `now_ms`.
    pub fn once(&mut self, now_ms: u64, delay_ms: u64, task: T) -> TimerId {
        self.insert(now_ms.saturating_add(delay_ms), None, task)
    }

    /// Fire `task` every `interval_ms`, first at `now_ms + interval_ms`.
    pub fn repeating(&mut self, now_ms: u64, interval_ms: u64, task: T) -> TimerId {
        let period = interval_ms.max(1);
        self.insert(now_ms.saturating_add(period), Some(period), task)
    }

    fn insert(&mut self, due_ms: u64, period_ms: Option<u64>, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                due_ms,
                period_ms,
                task,
            },
        );
        id
    }

    /// Returns whether the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id).is_some()
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest deadline, for the host's repaint request.
    pub fn next_due(&self) -> Option<u64> {
        self.entries.values().map(|e| e.due_ms).min()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Take the earliest timer due at `now_ms`. Ties go to the older timer.
    /// A repeating timer fires once per call even if several periods went by;
    /// it is rescheduled to the first period boundary after `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Fired<T>> {
        let (&id, _) = self
            .entries
            .iter()
            .filter(|(_, e)| e.due_ms <= now_ms)
            .min_by_key(|(id, e)| (e.due_ms, **id))?;

        let entry = self.entries.get_mut(&id)?;
        let fired = Fired {
            id,
            due_ms: entry.due_ms,
            task: entry.task.clone(),
        };
        match entry.period_ms {
            Some(period) => {
                let missed = now_ms.saturating_sub(entry.due_ms) / period;
                entry.due_ms = entry
                    .due_ms
                    .saturating_add(period.saturating_mul(missed.saturating_add(1)));
            }
            None => {
                self.entries.remove(&id);
            }
        }
        Some(fired)
    }
}
