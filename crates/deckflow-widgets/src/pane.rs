#![forbid(unsafe_code)]

//! One page of a paginator.

use deckflow_layout::{LayoutProbe, NodeHandle};

use crate::builder::Engine;

/// Nested engine a pane may own.
pub type PaneChild = Engine;

/// A page inside a [`Paginator`](crate::Paginator).
///
/// Panes are clipped to a fixed height and hidden when they fall outside
/// the paginator's visible window so the host can skip compositing them.
#[derive(Debug)]
pub struct Pane {
    handle: NodeHandle,
    id: Option<String>,
    content: String,
    height: f64,
    visible: bool,
    child: Option<PaneChild>,
}

impl Pane {
    /// A visible pane of `height` pixels.
    ///
    /// A height of zero or less falls back to the available height the
    /// probe reports for the pane itself.
    #[must_use]
    pub fn new(handle: NodeHandle, height: f64, probe: &dyn LayoutProbe) -> Self {
        let mut pane = Self {
            handle,
            id: None,
            content: String::new(),
            height: 0.0,
            visible: true,
            child: None,
        };
        pane.set_height(height, probe);
        pane
    }

    #[must_use]
    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Option<PaneChild>) -> Self {
        self.child = child;
        self
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Apply a new height, falling back to the probe when `height <= 0`.
    pub fn set_height(&mut self, height: f64, probe: &dyn LayoutProbe) {
        let height = if height > 0.0 {
            height
        } else {
            probe.available_height(self.handle)
        };
        self.height = height.max(0.0);
    }

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Nested paginator or free scroll.
    #[must_use]
    pub fn child(&self) -> Option<&PaneChild> {
        self.child.as_ref()
    }
}
