#![forbid(unsafe_code)]

//! Host-driven deferred tasks with cancellation.
//!
//! Hosts schedule short delays (e.g. "swap pane visibility once the slide has
//! started") as fire-and-forget timers. [`Deferred`] models one such timer
//! slot as plain data: the owner schedules a payload, polls it with the
//! current time, and may cancel or flush it when newer work supersedes it.
//!
//! # Invariants
//!
//! 1. At most one payload is pending per slot; scheduling replaces (and
//!    returns) any pending payload.
//! 2. [`Deferred::poll`] yields a payload at most once, and only when
//!    `now >= due`.
//! 3. A [`TimerToken`] identifies exactly one scheduling; cancelling with a
//!    stale token is a no-op.
//!
//! # Failure Modes
//!
//! None: all operations are infallible. A host that never polls simply never
//! sees the payload.

use web_time::{Duration, Instant};

/// Identity of one scheduled payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    token: TimerToken,
    due: Instant,
    payload: T,
}

/// A single cancellable timer slot.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    slot: Option<Scheduled<T>>,
    next_token: u64,
}

impl<T> Deferred<T> {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: None,
            next_token: 1,
        }
    }

    /// Schedule `payload` to fire `delay` after `now`.
    ///
    /// Returns the new token and the payload it superseded, if any.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> (TimerToken, Option<T>) {
        let token = TimerToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        let previous = self.slot.replace(Scheduled {
            token,
            due: now + delay,
            payload,
        });
        (token, previous.map(|s| s.payload))
    }

    /// Cancel whatever is pending, returning its payload.
    pub fn cancel(&mut self) -> Option<T> {
        self.slot.take().map(|s| s.payload)
    }

    /// Cancel only if `token` still identifies the pending payload.
    pub fn cancel_token(&mut self, token: TimerToken) -> Option<T> {
        if self.slot.as_ref().is_some_and(|s| s.token == token) {
            return self.cancel();
        }
        None
    }

    /// Yield the payload if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.slot.as_ref().is_some_and(|s| now >= s.due) {
            return self.cancel();
        }
        None
    }

    /// Whether a payload is pending.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// When the pending payload fires.
    #[must_use]
    pub fn due_at(&self) -> Option<Instant> {
        self.slot.as_ref().map(|s| s.due)
    }

    /// Token of the pending payload.
    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        self.slot.as_ref().map(|s| s.token)
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}
