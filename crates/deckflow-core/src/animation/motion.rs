#![forbid(unsafe_code)]

//! A scalar in flight between two values.

use web_time::{Duration, Instant};

use super::Transition;

/// A scalar moving from one value to another under a [`Transition`].
///
/// `Motion` mirrors what a host does with a transform transition: the target
/// changes instantly, the rendered value follows along the easing curve.
/// [`sample`](Self::sample) answers where the rendered value is at `now`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    from: f64,
    to: f64,
    started: Option<Instant>,
    transition: Transition,
}

impl Motion {
    /// A motion already resting at `value`.
    #[must_use]
    pub const fn at_rest(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            started: None,
            transition: Transition::INSTANT,
        }
    }

    /// Resting value once the current leg completes.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Transition of the current leg.
    #[inline]
    #[must_use]
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// Rendered value at `now`.
    #[must_use]
    pub fn sample(&self, now: Instant) -> f64 {
        let Some(started) = self.started else {
            return self.to;
        };
        if self.transition.is_instant() {
            return self.to;
        }
        let elapsed = now
            .checked_duration_since(started)
            .unwrap_or(Duration::ZERO);
        let p = self.transition.progress(elapsed);
        self.from + (self.to - self.from) * p
    }

    /// Whether the rendered value has reached the target at `now`.
    #[must_use]
    pub fn is_settled(&self, now: Instant) -> bool {
        match self.started {
            None => true,
            Some(started) => {
                self.transition.is_instant()
                    || now
                        .checked_duration_since(started)
                        .is_some_and(|elapsed| elapsed >= self.transition.duration)
            }
        }
    }

    /// Move toward `to` under `transition`, starting from the value rendered
    /// at `now`.
    pub fn retarget(&mut self, to: f64, transition: Transition, now: Instant) {
        if transition.is_instant() {
            self.snap(to);
            return;
        }
        self.from = self.sample(now);
        self.to = to;
        self.started = Some(now);
        self.transition = transition;
    }

    /// Jump to `value` with no animation.
    pub fn snap(&mut self, value: f64) {
        *self = Self::at_rest(value);
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::at_rest(0.0)
    }
}
