#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are host pixels measured from the top-left of the page, as
//! reported by touch and mouse events. All values are `f64` because hosts
//! report fractional positions on high-density screens.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A pointer location measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Signed horizontal displacement from `origin` to `self`.
    ///
    /// Positive when `self` lies to the right of `origin`.
    #[inline]
    #[must_use]
    pub fn distance_x(&self, origin: Point) -> f64 {
        self.x - origin.x
    }

    /// Signed vertical displacement from `origin` to `self`.
    ///
    /// Positive when `self` lies below `origin`.
    #[inline]
    #[must_use]
    pub fn distance_y(&self, origin: Point) -> f64 {
        self.y - origin.y
    }
}

/// Width and height of a box or viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Coarse aspect classification of this size.
    #[inline]
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        Orientation::classify(*self)
    }
}

/// Coarse landscape/portrait classification.
///
/// Orientation changes are detected by comparing classes, never angles, so a
/// resize that keeps the aspect class does not trigger relayout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Wider than tall.
    Landscape,
    /// Taller than wide, or square.
    Portrait,
}

impl Orientation {
    /// Classify a viewport. Square viewports count as portrait.
    #[must_use]
    pub fn classify(viewport: Size) -> Self {
        if viewport.width > viewport.height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// Round half toward positive infinity.
///
/// Matches the rounding hosts apply to layout offsets (`-2.5` rounds to `-2`,
/// `2.5` rounds to `3`), unlike [`f64::round`] which rounds half away from
/// zero.
#[inline]
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
