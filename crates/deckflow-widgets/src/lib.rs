#![forbid(unsafe_code)]

//! Paging and scrolling engines for deckflow.
//!
//! # Role in deckflow
//! This crate turns declared layout trees into live engines: [`Paginator`]s
//! that page horizontally between [`Pane`]s and [`FreeScroll`] boxes that
//! scroll vertically with elastic bounds. Engines are shared as
//! `Rc<RefCell<_>>` and coordinate through a [`Context`].
//!
//! # Driving the engines
//! The host owns the clock and the input. It forwards pointer events to the
//! root [`Engine`] with [`Engine::dispatch`], calls [`Engine::tick`] from its
//! frame or timer callback, reports window resizes through
//! [`Context::viewport_changed`], and drains notifications with
//! [`Context::flush_events`]. Rendered offsets are sampled with
//! [`Paginator::translate`] and [`FreeScroll::offset`].

pub mod builder;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod event;
pub mod free_scroll;
pub mod pane;
pub mod paginator;

pub use builder::{Engine, build};
pub use config::{DeckConfig, EngineConfig, ScrollConfig};
pub use content::{Released, release_images};
pub use context::{Context, Engagement, Subscription};
pub use error::{BuildError, ConfigError, EngineKind};
pub use event::{EngineEvent, HostSetup, PageChange, ResizeNotice, Translate};
pub use free_scroll::{FreeScroll, Layer, SharedFreeScroll};
pub use pane::{Pane, PaneChild};
pub use paginator::{DragMode, Paginator, SharedPaginator};
