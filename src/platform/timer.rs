//! Cancellable one-shot and repeating timers
//!
//! Timers are polled, never self-firing: the owner passes the current clock
//! reading to `TimerQueue::pop_due` until it returns `None`, getting the ids
//! that came due in deadline order. Ids are never reused, so a cancelled or stale id can not
//! match a newer timer.

use std::time::Duration;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    deadline: Duration,
    period: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }

    /// Fire once at `now + delay`
    pub fn schedule_once(&mut self, now: Duration, delay: Duration) -> TimerId {
        let id = self.allocate_id();
        self.entries.push(Entry {
            id,
            deadline: now + delay,
            period: None,
        });
        id
    }

    /// Fire every `period`, first at `now + period`
    ///
    /// A zero period is bumped to one millisecond so polling always terminates.
    pub fn schedule_repeating(&mut self, now: Duration, period: Duration) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        let id = self.allocate_id();
        self.entries.push(Entry {
            id,
            deadline: now + period,
            period: Some(period),
        });
        id
    }

    /// Remove a timer; returns false if it already fired (one-shot) or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Pop the earliest timer due at `now`
    ///
    /// Repeating timers are re-armed one period after their previous
    /// deadline, so a long gap between polls yields every missed firing.
    /// Ties break by id (scheduling order).
    pub fn pop_due(&mut self, now: Duration) -> Option<TimerId> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.deadline <= now)
            .min_by_key(|(_, e)| (e.deadline, e.id))
            .map(|(i, _)| i)?;

        let Entry { id, period, .. } = self.entries[index];
        match period {
            Some(period) => self.entries[index].deadline += period,
            None => {
                self.entries.swap_remove(index);
            }
        }
        Some(id)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    impl TimerQueue {
        fn poll(&mut self, now: Duration) -> Vec<TimerId> {
            std::iter::from_fn(|| self.pop_due(now)).collect()
        }

        fn is_scheduled(&self, id: TimerId) -> bool {
            self.entries.iter().any(|e| e.id == id)
        }
    }

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_once(Duration::ZERO, SECOND);
        assert!(timers.poll(Duration::from_millis(999)).is_empty());
        assert_eq!(timers.poll(SECOND), vec![id]);
        assert!(timers.poll(Duration::from_secs(5)).is_empty());
        assert!(!timers.is_scheduled(id));
    }

    #[test]
    fn test_repeating_catches_up() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_repeating(Duration::ZERO, SECOND);
        assert_eq!(timers.poll(Duration::from_millis(3500)), vec![id, id, id]);
        assert_eq!(timers.poll(Duration::from_secs(4)), vec![id]);
        assert!(timers.is_scheduled(id));
    }

    #[test]
    fn test_same_deadline_fires_in_schedule_order() {
        let mut timers = TimerQueue::new();
        let once = timers.schedule_once(Duration::ZERO, SECOND);
        let every = timers.schedule_repeating(Duration::ZERO, SECOND);
        assert_eq!(timers.poll(Duration::from_secs(2)), vec![once, every, every]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_repeating(Duration::ZERO, SECOND);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.poll(Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule_once(Duration::ZERO, SECOND);
        assert!(timers.cancel(a));
        let b = timers.schedule_once(Duration::ZERO, SECOND);
        assert_ne!(a, b);
        assert!(!timers.cancel(a));
        assert!(timers.is_scheduled(b));
    }
}
