//! Cancellable timer queue
//!
//! Stands in for `setTimeout`/`setInterval`: continuations are queued with a
//! due time and polled from the animation frame. Entries are ordered by due
//! time, ties broken by insertion order, so firing is reproducible.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Handle returned by `schedule`, used to cancel a single timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    due: f64,
    seq: u64,
    event: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-queue of pending timers
#[derive(Debug)]
pub struct TimerQueue<T> {
    queue: BinaryHeap<Reverse<Entry<T>>>,
    /// Monotonic counter; doubles as the handle id
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Queue `event` to fire once `now + delay_ms` has been reached
    pub fn schedule(&mut self, now: f64, delay_ms: f64, event: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            due: now + delay_ms.max(0.0),
            seq,
            event,
        }));
        TimerHandle(seq)
    }

    /// Cancel one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|Reverse(e)| e.seq != handle.0);
        self.queue.len() != before
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) {
        if !self.queue.is_empty() {
            log::debug!("Cancelling {} pending timer(s)", self.queue.len());
        }
        self.queue.clear();
    }

    /// Pop the earliest timer if it is due at `now`, with the time it was due
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, T)> {
        match self.queue.peek() {
            Some(Reverse(e)) if e.due <= now => {
                self.queue.pop().map(|Reverse(e)| (e.due, e.event))
            }
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.0, 300.0, "late");
        timers.schedule(0.0, 100.0, "early");

        assert_eq!(timers.pop_due(50.0), None);
        assert_eq!(timers.pop_due(100.0), Some((100.0, "early")));
        assert_eq!(timers.pop_due(200.0), None);
        assert_eq!(timers.pop_due(350.0), Some((300.0, "late")));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_ties_fire_in_insertion_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(10.0, 5.0, 1);
        timers.schedule(10.0, 5.0, 2);
        timers.schedule(10.0, 5.0, 3);

        let fired: Vec<_> = std::iter::from_fn(|| timers.pop_due(15.0).map(|(_, n)| n)).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel_single() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule(0.0, 10.0, 'a');
        timers.schedule(0.0, 20.0, 'b');

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(timers.pop_due(100.0), Some((20.0, 'b')));
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.0, 10.0, ());
        timers.schedule(0.0, 20.0, ());
        assert!(!timers.is_empty());

        timers.cancel_all();
        assert!(timers.is_empty());
        assert_eq!(timers.pop_due(f64::MAX), None);
    }

    #[test]
    fn test_negative_delay_fires_immediately() {
        let mut timers = TimerQueue::new();
        timers.schedule(5.0, -100.0, ());
        assert_eq!(timers.pop_due(5.0), Some((5.0, ())));
    }
}
