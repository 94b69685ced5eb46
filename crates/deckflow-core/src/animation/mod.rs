#![forbid(unsafe_code)]

//! Transition specs and sampled motion.
//!
//! Hosts animate engine offsets with declarative transitions: the engine
//! decides *where* a layer should be and *how long* it takes to get there, the
//! host interpolates. This module models both halves so the engine can also
//! answer "where is the layer right now?", which matters when a new gesture
//! grabs content that is still settling from a fling.
//!
//! # Invariants
//!
//! 1. [`Easing::apply`] maps `0.0 → 0.0` and `1.0 → 1.0` for every curve and
//!    clamps its input to `[0.0, 1.0]`.
//! 2. A [`Transition`] with zero duration is instant: [`Motion`] reports the
//!    target at any sample time.
//! 3. [`Motion::retarget`] starts the new leg from the value sampled at the
//!    retarget instant, so interrupted animations never jump.
//!
//! # Failure Modes
//!
//! - Sampling before the motion started (clock skew) reports the start value.
//! - Degenerate cubic-bezier control points outside `[0, 1]` on the x axis
//!   are clamped, keeping the curve a function of time.

mod easing;
mod motion;

pub use easing::{CubicBezier, Easing};
pub use motion::Motion;

use web_time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Duration plus timing curve applied to a layer's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transition {
    /// How long the transition runs.
    pub duration: Duration,
    /// Timing curve.
    pub easing: Easing,
}

impl Transition {
    /// Zero-duration transition: changes apply immediately.
    pub const INSTANT: Self = Self {
        duration: Duration::ZERO,
        easing: Easing::Linear,
    };

    /// Create a transition.
    #[must_use]
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Transition of `ms` milliseconds.
    #[must_use]
    pub const fn millis(ms: u64, easing: Easing) -> Self {
        Self::new(Duration::from_millis(ms), easing)
    }

    /// Whether this transition applies immediately.
    #[inline]
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// Eased progress after `elapsed`, in `[0.0, 1.0]`.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.is_instant() || elapsed >= self.duration {
            return 1.0;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.easing.apply(t)
    }

    /// CSS transition shorthand for the transform property value, e.g.
    /// `250ms ease-out`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("{}ms {}", self.duration.as_millis(), self.easing.css())
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::INSTANT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_progress_is_complete() {
        assert_eq!(Transition::INSTANT.progress(Duration::ZERO), 1.0);
        assert!(Transition::INSTANT.is_instant());
    }

    #[test]
    fn progress_clamps_after_duration() {
        let t = Transition::millis(250, Easing::EaseOut);
        assert_eq!(t.progress(Duration::from_millis(250)), 1.0);
        assert_eq!(t.progress(Duration::from_secs(3)), 1.0);
        assert_eq!(t.progress(Duration::ZERO), 0.0);
    }

    #[test]
    fn linear_progress_is_proportional() {
        let t = Transition::millis(200, Easing::Linear);
        let p = t.progress(Duration::from_millis(50));
        assert!((p - 0.25).abs() < 1e-9);
    }

    #[test]
    fn css_shorthand() {
        assert_eq!(Transition::millis(250, Easing::EaseOut).css(), "250ms ease-out");
        assert_eq!(Transition::INSTANT.css(), "0ms linear");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn easing_serializes_snake_case() {
        let t = Transition::millis(750, Easing::EaseInOut);
        let json = serde_json::to_string(&t).expect("serialize");
        assert!(json.contains("\"ease_in_out\""));
        let back: Transition = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, t);
    }
}
