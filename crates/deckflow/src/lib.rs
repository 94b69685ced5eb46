#![forbid(unsafe_code)]

//! deckflow public facade crate.
//!
//! Re-exports the types hosts use day to day and offers a prelude. The
//! typical host loop:
//!
//! ```ignore
//! use deckflow::prelude::*;
//!
//! let ctx = Context::with_defaults(Rc::new(StaticProbe::new(Size::new(320.0, 480.0))));
//! let engine = deckflow::build_from_json(&ctx, LAYOUT_JSON)?;
//! engine.dispatch(&PointerEvent::finger(PointerPhase::Down, 300.0, 200.0, Instant::now()));
//! engine.tick(Instant::now());
//! ctx.flush_events();
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use deckflow_core::animation::{CubicBezier, Easing, Motion, Transition};
pub use deckflow_core::geometry::{Orientation, Point, Size, round_half_up};
pub use deckflow_core::pointer::{GestureStep, InputMode, PointerEvent, PointerPhase, PointerTracker};
pub use deckflow_core::timer::{Deferred, TimerToken};
pub use deckflow_core::{Duration, Instant};

// --- Layout re-exports -----------------------------------------------------

pub use deckflow_layout::{
    ElementNode, FreeScrollNode, LayoutError, LayoutNode, LayoutProbe, NodeHandle, OffsetUnit,
    PaginatorNode, PaneNode, SiblingBox, StaticProbe, Stylesheet, TextNode, WritingDirection,
};

// --- Engine re-exports -----------------------------------------------------

pub use deckflow_widgets::{
    BuildError, ConfigError, Context, DeckConfig, DragMode, Engagement, Engine, EngineConfig,
    EngineEvent, FreeScroll, HostSetup, Layer, PageChange, Pane, Paginator, ResizeNotice,
    ScrollConfig, SharedFreeScroll, SharedPaginator, Subscription, Translate,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for deckflow hosts.
#[derive(Debug)]
pub enum Error {
    /// The layout description could not be parsed.
    Layout(LayoutError),
    /// Engines could not be built from the layout.
    Build(BuildError),
    /// The engine configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "{err}"),
            Self::Build(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Build(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Self {
        Self::Build(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for deckflow APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse a JSON layout tree and build its root engine.
pub fn build_from_json(ctx: &Context, json: &str) -> Result<Engine> {
    let tree = LayoutNode::from_json(json)?;
    Ok(deckflow_widgets::build(ctx, &tree)?)
}

/// Install JSON structured logging filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_logging() -> bool {
    deckflow_core::logging::init_json_logging()
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Context, Engine, EngineConfig, EngineEvent, Error, Instant, LayoutNode, PageChange,
        Paginator, PointerEvent, PointerPhase, Result, Size, StaticProbe, Translate,
    };

    pub use crate::{core, layout, widgets};

    pub use std::rc::Rc;
}

pub use deckflow_core as core;
pub use deckflow_layout as layout;
pub use deckflow_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    const MENU: &str = r#"{
        "kind": "paginator", "handle": 1, "id": "menu", "drag": "both",
        "children": [
            { "kind": "pane", "handle": 2, "id": "categories",
              "children": [ { "kind": "free_scroll", "handle": 3, "id": "menu-category-scrollbox" } ] },
            { "kind": "pane", "handle": 4, "id": "detail" }
        ]
    }"#;

    fn ctx() -> Context {
        Context::with_defaults(Rc::new(StaticProbe::new(Size::new(320.0, 480.0))))
    }

    #[test]
    fn builds_from_json() {
        let ctx = ctx();
        let engine = build_from_json(&ctx, MENU).expect("menu builds");
        let menu = engine.as_paginator().expect("paginator root");
        assert_eq!(menu.borrow().len(), 2);
        assert!(ctx.free_scroll("menu-category-scrollbox").is_some());
    }

    #[test]
    fn errors_are_wrapped() {
        let ctx = ctx();
        let err = build_from_json(&ctx, "{").unwrap_err();
        assert!(matches!(err, Error::Layout(_)));

        let err = build_from_json(&ctx, r#"{ "kind": "text", "text": "hi" }"#).unwrap_err();
        assert!(matches!(err, Error::Build(BuildError::NotAnEngine { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn config_errors_convert() {
        let probe = Rc::new(StaticProbe::new(Size::new(320.0, 480.0)));
        let err: Error = Context::new(probe, EngineConfig::default().with_tension(0.0))
            .map_err(Error::from)
            .unwrap_err();
        assert_eq!(err.to_string(), "scroll tension must be positive, got 0");
    }
}
