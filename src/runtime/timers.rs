//! Deadline-ordered queue of pending timers.

use crate::app::Timer;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

/// A timer waiting for its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scheduled {
    due: Instant,
    /// Insertion order, so timers with equal deadlines fire first-in first-out.
    seq: u64,
    timer: Timer,
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap and the earliest deadline must pop first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pending timers, earliest deadline first.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, timer: Timer) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { due, seq, timer });
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|s| s.due)
    }

    /// Pops the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, Timer)> {
        if self.next_deadline()? <= now {
            self.pop_next()
        } else {
            None
        }
    }

    /// Pops the earliest timer regardless of its deadline.
    pub fn pop_next(&mut self) -> Option<(Instant, Timer)> {
        self.heap.pop().map(|s| (s.due, s.timer))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Generation;
    use std::time::Duration;

    #[test]
    fn pops_in_deadline_then_insertion_order() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule(t0 + Duration::from_millis(50), Timer::HoverGrace(1));
        queue.schedule(t0 + Duration::from_millis(10), Timer::HoverGrace(2));
        queue.schedule(t0 + Duration::from_millis(10), Timer::Settle(Generation::default()));

        assert_eq!(queue.pop_due(t0), None);
        assert_eq!(queue.pop_due(t0 + Duration::from_millis(10)).map(|(_, t)| t), Some(Timer::HoverGrace(2)));
        assert_eq!(queue.pop_next().map(|(_, t)| t), Some(Timer::Settle(Generation::default())));
        assert_eq!(queue.len(), 1);
    }
}
