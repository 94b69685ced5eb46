#![forbid(unsafe_code)]

//! Timing curves.
//!
//! The named curves match the CSS keywords hosts understand; [`CubicBezier`]
//! covers arbitrary `cubic-bezier(x1, y1, x2, y2)` curves and is solved with a
//! few Newton iterations falling back to bisection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Newton iterations before falling back to bisection.
const NEWTON_ITERATIONS: usize = 8;

/// Solution tolerance on the x axis.
const EPSILON: f64 = 1e-7;

/// Bisection iteration cap.
const BISECTION_ITERATIONS: usize = 64;

/// A CSS-style cubic bezier timing curve anchored at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    /// CSS `ease`.
    pub const EASE: Self = Self {
        x1: 0.25,
        y1: 0.1,
        x2: 0.25,
        y2: 1.0,
    };

    /// CSS `ease-in`.
    pub const EASE_IN: Self = Self {
        x1: 0.42,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };

    /// CSS `ease-out`.
    pub const EASE_OUT: Self = Self {
        x1: 0.0,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };

    /// CSS `ease-in-out`.
    pub const EASE_IN_OUT: Self = Self {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };

    /// Quadratic ease-out used when a scroll box settles after a fling.
    pub const SETTLE: Self = Self {
        x1: 0.25,
        y1: 0.46,
        x2: 0.45,
        y2: 0.94,
    };

    /// Create a curve. `x1`/`x2` are clamped to `[0, 1]` so the curve stays a
    /// function of time.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    /// Control points as `(x1, y1, x2, y2)`.
    #[must_use]
    pub const fn control_points(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    // Polynomial coefficients for one axis: B(t) = ((a t + b) t + c) t.
    fn coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    }

    fn sample(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        (3.0 * a * t + 2.0 * b) * t + c
    }

    /// Parameter `t` whose x coordinate equals `x`.
    fn solve_t(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < EPSILON && (0.0..=1.0).contains(&t) {
                return t;
            }
            let d = Self::sample_derivative(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t -= err / d;
            if !(0.0..=1.0).contains(&t) {
                break;
            }
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = Self::sample(self.x1, self.x2, t);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
        t
    }

    /// Evaluate the curve at time fraction `x ∈ [0, 1]`.
    #[must_use]
    pub fn apply(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let t = self.solve_t(x);
        Self::sample(self.y1, self.y2, t)
    }
}

/// Timing curve of a [`Transition`](super::Transition).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// CSS `ease`.
    Ease,
    /// CSS `ease-in`.
    EaseIn,
    /// CSS `ease-out`.
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
    /// Arbitrary cubic bezier.
    Cubic(CubicBezier),
}

impl Easing {
    /// Scroll-box settle curve, `cubic-bezier(0.25, 0.46, 0.45, 0.94)`.
    pub const SETTLE: Self = Self::Cubic(CubicBezier::SETTLE);

    /// Map a linear time fraction to eased progress. Input is clamped.
    #[must_use]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => CubicBezier::EASE.apply(t),
            Self::EaseIn => CubicBezier::EASE_IN.apply(t),
            Self::EaseOut => CubicBezier::EASE_OUT.apply(t),
            Self::EaseInOut => CubicBezier::EASE_IN_OUT.apply(t),
            Self::Cubic(curve) => curve.apply(t),
        }
    }

    /// CSS timing-function keyword or `cubic-bezier(...)` expression.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            Self::Linear => "linear".to_string(),
            Self::Ease => "ease".to_string(),
            Self::EaseIn => "ease-in".to_string(),
            Self::EaseOut => "ease-out".to_string(),
            Self::EaseInOut => "ease-in-out".to_string(),
            Self::Cubic(c) => {
                let (x1, y1, x2, y2) = c.control_points();
                format!("cubic-bezier({x1:.3}, {y1:.3}, {x2:.3}, {y2:.3})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::SETTLE,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.0), 1.0);
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        for i in 1..10 {
            let t = f64::from(i) / 10.0;
            assert!(Easing::EaseOut.apply(t) > t, "ease-out should lead at t={t}");
            assert!(Easing::EaseIn.apply(t) < t, "ease-in should lag at t={t}");
        }
    }

    #[test]
    fn symmetric_ease_in_out_midpoint() {
        let mid = Easing::EaseInOut.apply(0.5);
        assert!((mid - 0.5).abs() < 1e-4, "mid={mid}");
    }

    #[test]
    fn linear_bezier_is_identity() {
        let curve = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for i in 0..=20 {
            let t = f64::from(i) / 20.0;
            assert!((curve.apply(t) - t).abs() < 1e-5);
        }
    }

    #[test]
    fn control_x_is_clamped() {
        let curve = CubicBezier::new(-1.0, 0.2, 4.0, 0.8);
        let (x1, _, x2, _) = curve.control_points();
        assert_eq!(x1, 0.0);
        assert_eq!(x2, 1.0);
    }

    #[test]
    fn css_rendering() {
        assert_eq!(Easing::EaseOut.css(), "ease-out");
        assert_eq!(
            Easing::SETTLE.css(),
            "cubic-bezier(0.250, 0.460, 0.450, 0.940)"
        );
    }
}
