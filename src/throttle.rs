//! Leading-and-trailing throttle driven by an injected clock.
//!
//! ```text
//! call ─┐   call  call      call
//!       ▼    │     │          │
//!     fire ──┴─────┴─► fire ──┴─► fire ──► (idle, disarm)
//!       |<- interval ->|<- interval ->|<- interval ->|
//! ```
//!
//! - The first call in an idle period fires immediately and arms a timer.
//! - Calls while the timer is armed are coalesced; only the latest arguments
//!   are kept.
//! - When the timer elapses with a call pending, it fires once with those
//!   arguments and re-arms. With nothing pending it disarms.
//!
//! There is no cancellation. Nothing here reads the system clock: callers pass
//! `now`, which keeps tests deterministic.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Throttle<A> {
    interval: Duration,
    deadline: Option<Instant>,
    pending: Option<A>,
}

impl<A> Throttle<A> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the armed timer elapses, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record an invocation. Returns the arguments to run now, if any.
    pub fn call(&mut self, now: Instant, args: A) -> Option<A> {
        self.pending = Some(args);
        if self.deadline.is_some() {
            return None;
        }
        self.fire(now)
    }

    /// Advance the timer. Returns the coalesced arguments when the trailing
    /// invocation is due.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.fire(now),
            _ => None,
        }
    }

    fn fire(&mut self, now: Instant) -> Option<A> {
        match self.pending.take() {
            Some(args) => {
                self.deadline = Some(now + self.interval);
                Some(args)
            }
            None => {
                self.deadline = None;
                None
            }
        }
    }
}
