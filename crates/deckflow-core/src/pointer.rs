#![forbid(unsafe_code)]

//! Pointer normalization: turns raw touch/mouse events into gesture steps.
//!
//! Hosts deliver either touch events (with the list of active touch points)
//! or mouse events. Each engine accepts exactly one of the two streams,
//! chosen once from the host's touch capability, and only ever follows a
//! single pointer. [`PointerTracker`] applies those rules and yields
//! [`GestureStep`]s.
//!
//! # State Machine
//!
//! ```text
//! touch:  Down(1 pt) -> Start, Move(1 pt) -> Move, Up(<=1 pt) -> End
//! mouse:  Idle --Down--> Pressed --Move--> Move ... --Up--> End, Idle
//! ```
//!
//! # Invariants
//!
//! 1. Events from the non-selected source are ignored.
//! 2. Touch events with more than one active point yield nothing
//!    (multi-touch aborts handling for that event).
//! 3. Touch down/move events without touch data yield nothing.
//! 4. Mouse moves and ups outside a press yield nothing.
//! 5. After [`reset`](PointerTracker::reset) the tracker is idle.

use web_time::Instant;

use crate::geometry::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Phase of a raw pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerPhase {
    /// `touchstart` / `mousedown`.
    Down,
    /// `touchmove` / `mousemove`.
    Move,
    /// `touchend` / `mouseup`.
    Up,
}

/// Which input stream produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InputMode {
    /// Touch screen.
    Touch,
    /// Mouse or trackpad.
    Mouse,
}

impl InputMode {
    /// Select the stream an engine listens to.
    #[must_use]
    pub const fn from_touch_support(has_touch: bool) -> Self {
        if has_touch { Self::Touch } else { Self::Mouse }
    }
}

/// A raw pointer event as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// Originating stream.
    pub source: InputMode,
    /// Lifecycle phase.
    pub phase: PointerPhase,
    /// Active points. For touch, the touches still on the surface; for mouse,
    /// the cursor position.
    pub points: Vec<Point>,
    /// Host timestamp.
    pub at: Instant,
}

impl PointerEvent {
    /// A touch event with the given active touch points.
    #[must_use]
    pub fn touch(phase: PointerPhase, points: Vec<Point>, at: Instant) -> Self {
        Self {
            source: InputMode::Touch,
            phase,
            points,
            at,
        }
    }

    /// A single-finger touch event.
    #[must_use]
    pub fn finger(phase: PointerPhase, x: f64, y: f64, at: Instant) -> Self {
        Self::touch(phase, vec![Point::new(x, y)], at)
    }

    /// A touch-end event with no touches left on the surface.
    #[must_use]
    pub fn lift(at: Instant) -> Self {
        Self::touch(PointerPhase::Up, Vec::new(), at)
    }

    /// A mouse event at `(x, y)`.
    #[must_use]
    pub fn mouse(phase: PointerPhase, x: f64, y: f64, at: Instant) -> Self {
        Self {
            source: InputMode::Mouse,
            phase,
            points: vec![Point::new(x, y)],
            at,
        }
    }
}

/// Normalized single-pointer gesture step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureStep {
    /// Pointer went down at the given point.
    Start(Point),
    /// Pointer moved to the given point.
    Move(Point),
    /// Pointer lifted.
    End,
}

/// Stateful filter from [`PointerEvent`]s to [`GestureStep`]s.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    mode: InputMode,
    // Mouse only: between a down and its up.
    pressed: bool,
    // Moves are dropped until the next down.
    muted: bool,
}

impl PointerTracker {
    /// Create a tracker listening to `mode`.
    #[must_use]
    pub const fn new(mode: InputMode) -> Self {
        Self {
            mode,
            pressed: false,
            muted: false,
        }
    }

    /// Stream this tracker listens to.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> InputMode {
        self.mode
    }

    /// Whether a mouse press is in progress.
    #[inline]
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Process one raw event.
    pub fn process(&mut self, event: &PointerEvent) -> Option<GestureStep> {
        if event.source != self.mode {
            return None;
        }
        match self.mode {
            InputMode::Touch => self.process_touch(event),
            InputMode::Mouse => self.process_mouse(event),
        }
    }

    /// Drop the gesture in progress: its moves are ignored until the next
    /// down. A touch lift still reports [`GestureStep::End`].
    pub fn reset(&mut self) {
        self.pressed = false;
        self.muted = true;
    }

    fn process_touch(&mut self, event: &PointerEvent) -> Option<GestureStep> {
        if event.points.len() > 1 {
            return None;
        }
        match event.phase {
            PointerPhase::Down => {
                self.muted = false;
                event.points.first().copied().map(GestureStep::Start)
            }
            PointerPhase::Move if self.muted => None,
            PointerPhase::Move => event.points.first().copied().map(GestureStep::Move),
            PointerPhase::Up => {
                self.muted = false;
                Some(GestureStep::End)
            }
        }
    }

    fn process_mouse(&mut self, event: &PointerEvent) -> Option<GestureStep> {
        let point = event.points.first().copied()?;
        match event.phase {
            PointerPhase::Down => {
                self.pressed = true;
                self.muted = false;
                Some(GestureStep::Start(point))
            }
            PointerPhase::Move if self.pressed => Some(GestureStep::Move(point)),
            PointerPhase::Up if self.pressed => {
                self.pressed = false;
                Some(GestureStep::End)
            }
            _ => None,
        }
    }
}
