#![forbid(unsafe_code)]

//! Core: geometry, pointer normalization, easing curves and deferred timers.
//!
//! # Role in deckflow
//! `deckflow-core` is the host-independent foundation of the paging engine.
//! It owns the value types every other crate speaks in (points, sizes,
//! transitions) and the small state machines that turn raw host input into
//! gesture steps.
//!
//! # Primary responsibilities
//! - **Geometry**: [`geometry::Point`] displacement helpers, [`geometry::Size`]
//!   and coarse [`geometry::Orientation`] classification.
//! - **Pointer input**: [`pointer::PointerTracker`] filters touch/mouse streams
//!   down to single-pointer `Start → Move* → End` gesture steps.
//! - **Animation**: [`animation::Easing`] curves, [`animation::Transition`]
//!   specs and [`animation::Motion`], a sampled value-in-flight.
//! - **Timers**: [`timer::Deferred`], a cancellable single-slot scheduled task
//!   driven by host timestamps.
//!
//! # How it fits in the system
//! `deckflow-layout` describes the host environment and layout tree,
//! `deckflow-widgets` builds paginators and scroll boxes on top of both.
//! Nothing in this crate reads a clock: every time-dependent call takes an
//! explicit `now`, which keeps the engine deterministic under test.

pub mod animation;
pub mod geometry;
pub mod logging;
pub mod pointer;
pub mod timer;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

pub use web_time::{Duration, Instant};
