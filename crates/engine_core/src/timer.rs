//! One-shot delayed events driven by frame time.
//!
//! Timers never call back into their owner. Advancing the queue hands the
//! due payloads back to the caller, which decides whether they still apply.

use std::time::Duration;

/// Handle for a scheduled timer. Handles are never reused within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct PendingTimer<E> {
    id: TimerId,
    remaining: Duration,
    event: E,
}

/// A queue of one-shot timers carrying payloads of type `E`.
#[derive(Debug)]
pub struct TimerQueue<E> {
    timers: Vec<PendingTimer<E>>,
    next_id: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `event` to fire once `delay` has elapsed.
    pub fn schedule(&mut self, delay: Duration, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(PendingTimer {
            id,
            remaining: delay,
            event,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Drop every pending timer (owner teardown).
    pub fn cancel_all(&mut self) {
        if !self.timers.is_empty() {
            log::debug!("Cancelling {} pending timer(s)", self.timers.len());
        }
        self.timers.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance all timers by `delta` and return the payloads that came due,
    /// earliest first (ties fire in scheduling order).
    pub fn advance(&mut self, delta: Duration) -> Vec<E> {
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.timers.len() {
            let timer = &mut self.timers[index];
            if timer.remaining <= delta {
                let overshoot = delta - timer.remaining;
                due.push((overshoot, self.timers.remove(index)));
            } else {
                timer.remaining -= delta;
                index += 1;
            }
        }
        // Larger overshoot means the timer was due earlier in the frame.
        due.sort_by(|(a, ta), (b, tb)| b.cmp(a).then(ta.id.0.cmp(&tb.id.0)));
        due.into_iter().map(|(_, t)| t.event).collect()
    }
}
