// core/timers.rs
//
// Cancellable one-shot timers advanced by the fixed tick.
// Nothing here sleeps: a timer is a countdown that fires on the tick its
// remaining time reaches zero.
//
// Usage:
//   let mut timers = TimerQueue::new();
//   let id = timers.schedule(0.5, Action::OpponentMove);
//   for action in timers.tick(dt) { ... }
//   timers.cancel(id);

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    remaining: f32,
    payload: T,
}

/// One-shot timers carrying a payload that is handed back when they expire.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    timers: Vec<Timer<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule `payload` to fire after `delay` seconds. A non-positive delay
    /// fires on the next tick.
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            remaining: delay.max(0.0),
            payload,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Cancel all timers whose payload matches.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        self.timers.retain(|t| !pred(&t.payload));
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Whether any pending timer carries a matching payload.
    pub fn any(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.timers.iter().any(|t| pred(&t.payload))
    }

    /// Advance all timers by `dt` seconds and return the payloads that expired,
    /// in the order they were scheduled.
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        for timer in &mut self.timers {
            timer.remaining -= dt;
        }

        let mut fired = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].remaining <= 0.0 {
                fired.push(self.timers.remove(i).payload);
            } else {
                i += 1;
            }
        }
        fired
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
