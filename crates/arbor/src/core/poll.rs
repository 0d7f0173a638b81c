//! A time-ordered queue of deferred work, drained by the engine each tick.

use std::{
    cmp::Ordering,
    collections::binary_heap::BinaryHeap,
    time::{Duration, Instant},
};

/// An item with a due time.
#[derive(Debug)]
struct Pending<T> {
    /// When the item becomes due.
    time: Instant,
    /// Insertion order, so items due at the same time come out first-in
    /// first-out.
    seq: u64,
    /// The payload.
    item: T,
}

impl<T> PartialEq for Pending<T> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<T> Eq for Pending<T> {}

impl<T> PartialOrd for Pending<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reverse order so the item due soonest is at the top.
impl<T> Ord for Pending<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A heap of items ordered by due time.
#[derive(Debug)]
pub struct Schedule<T> {
    /// Pending items.
    heap: BinaryHeap<Pending<T>>,
    /// Next insertion sequence number.
    seq: u64,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl<T> Schedule<T> {
    /// Add an item due `delay` after `now`.
    pub(crate) fn _add(&mut self, now: Instant, delay: Duration, item: T) {
        self.heap.push(Pending {
            time: now + delay,
            seq: self.seq,
            item,
        });
        self.seq += 1;
    }

    /// Add an item due `delay` from now.
    pub fn add(&mut self, delay: Duration, item: T) {
        self._add(Instant::now(), delay, item);
    }

    /// Time until the next item is due, relative to `now`.
    pub(crate) fn _current_wait(&self, now: Instant) -> Option<Duration> {
        self.heap.peek().map(|top| {
            top.time
                .checked_duration_since(now)
                .unwrap_or(Duration::ZERO)
        })
    }

    /// Time until the next item is due. `None` if nothing is pending, zero if
    /// the first item is already overdue.
    pub fn current_wait(&self) -> Option<Duration> {
        self._current_wait(Instant::now())
    }

    /// Remove every item due at or before `now`, soonest first.
    pub(crate) fn _collect(&mut self, now: Instant) -> Vec<T> {
        let mut v = vec![];
        while self.heap.peek().is_some_and(|top| top.time <= now) {
            if let Some(p) = self.heap.pop() {
                v.push(p.item);
            }
        }
        v
    }

    /// Remove every item that is due.
    pub fn collect(&mut self) -> Vec<T> {
        self._collect(Instant::now())
    }

    /// Number of pending items.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Is anything pending?
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn schedule() -> Result<()> {
        let now = Instant::now();
        let mut s = Schedule::default();

        assert_eq!(s._current_wait(now), None);
        s._add(now, Duration::from_secs(10), "a");
        assert_eq!(s._current_wait(now), Some(Duration::from_secs(10)));
        s._add(now, Duration::from_secs(100), "b");
        assert!(s._current_wait(now).is_some_and(|d| d <= Duration::from_secs(10)));
        assert_eq!(s._collect(now + Duration::from_secs(11)), vec!["a"]);
        assert_eq!(s.len(), 1);
        assert_eq!(
            s._current_wait(now + Duration::from_secs(200)),
            Some(Duration::ZERO)
        );
        Ok(())
    }

    #[test]
    fn ties_are_fifo() -> Result<()> {
        let now = Instant::now();
        let mut s = Schedule::default();
        for i in 0..5 {
            s._add(now, Duration::from_millis(5), i);
        }
        s._add(now, Duration::ZERO, 99);
        assert_eq!(s._collect(now + Duration::from_millis(5)), vec![99, 0, 1, 2, 3, 4]);
        assert!(s.is_empty());
        Ok(())
    }
}
