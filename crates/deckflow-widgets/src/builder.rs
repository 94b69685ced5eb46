#![forbid(unsafe_code)]

//! Engine construction from a declared layout tree.
//!
//! The builder walks [`LayoutNode`]s depth first. Paginators take their
//! pane-like children as panes; each pane adopts the first paginator or
//! free scroll among its direct children as its nested engine.

use deckflow_core::pointer::PointerEvent;
use deckflow_layout::{LayoutNode, PaneNode};
use web_time::Instant;

use crate::context::Context;
use crate::error::BuildError;
use crate::event::{PageChange, ResizeNotice};
use crate::free_scroll::{FreeScroll, SharedFreeScroll};
use crate::pane::Pane;
use crate::paginator::{Paginator, SharedPaginator};

/// A built engine.
#[derive(Debug, Clone)]
pub enum Engine {
    /// Horizontally paged container.
    Paginator(SharedPaginator),
    /// Vertically scrolled box.
    FreeScroll(SharedFreeScroll),
}

impl Engine {
    /// Feed one pointer event; returns page changes, innermost first.
    pub fn dispatch(&self, event: &PointerEvent) -> Vec<PageChange> {
        match self {
            Self::Paginator(p) => p.borrow_mut().dispatch(event),
            Self::FreeScroll(s) => {
                s.borrow_mut().dispatch(event);
                Vec::new()
            }
        }
    }

    /// Run deferred work due at `now`.
    pub fn tick(&self, now: Instant) {
        if let Self::Paginator(p) = self {
            p.borrow_mut().tick(now);
        }
    }

    /// Refit to the host layout. Only paginators report a notice.
    pub fn resize(&self, now: Instant) -> Option<ResizeNotice> {
        match self {
            Self::Paginator(p) => Some(p.borrow_mut().resize(now)),
            Self::FreeScroll(s) => {
                s.borrow_mut().resize();
                None
            }
        }
    }

    #[must_use]
    pub fn as_paginator(&self) -> Option<&SharedPaginator> {
        match self {
            Self::Paginator(p) => Some(p),
            Self::FreeScroll(_) => None,
        }
    }

    #[must_use]
    pub fn as_free_scroll(&self) -> Option<&SharedFreeScroll> {
        match self {
            Self::FreeScroll(s) => Some(s),
            Self::Paginator(_) => None,
        }
    }
}

/// Build the engine rooted at `node`.
pub fn build(ctx: &Context, node: &LayoutNode) -> Result<Engine, BuildError> {
    match node {
        LayoutNode::Paginator(p) => Paginator::from_node(ctx, p).map(Engine::Paginator),
        LayoutNode::FreeScroll(s) => FreeScroll::from_node(ctx, s).map(Engine::FreeScroll),
        other => Err(BuildError::NotAnEngine {
            handle: other.handle(),
        }),
    }
}

/// Build one pane of a paginator whose height is `height`.
pub(crate) fn build_pane(ctx: &Context, node: &PaneNode, height: f64) -> Result<Pane, BuildError> {
    let mut engines = node.children.iter().filter(|c| c.is_engine());
    let child = engines.next().map(|c| build(ctx, c)).transpose()?;

    #[cfg(feature = "tracing")]
    for extra in engines {
        tracing::warn!(
            pane = %node.handle,
            ignored = ?extra.handle(),
            "pane already owns a nested engine"
        );
    }

    Ok(Pane::new(node.handle, node.height.unwrap_or(height), ctx.probe())
        .with_id(node.id.clone())
        .with_content(node.content.clone())
        .with_child(child))
}
