#![forbid(unsafe_code)]

//! Declared layout tree.
//!
//! Hosts describe the containers the engine should manage as a tree of
//! tagged [`LayoutNode`] variants instead of letting the engine inspect
//! markup at runtime. The tree is plain data and round-trips through JSON
//! with an internally tagged `kind` field:
//!
//! ```json
//! { "kind": "paginator", "handle": 1, "id": "deck", "drag": "both",
//!   "children": [
//!     { "kind": "pane", "handle": 2, "id": "news" },
//!     { "kind": "pane", "handle": 3, "children": [
//!         { "kind": "free_scroll", "handle": 4, "id": "menu-list" } ] } ] }
//! ```
//!
//! # Invariants
//!
//! 1. Every element-like node carries a [`NodeHandle`] the host can resolve.
//! 2. Only panes and `div`/`section` elements qualify as paginator pages
//!    ([`LayoutNode::is_page_container`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque host handle for a container element.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeHandle(pub u64);

impl NodeHandle {
    /// First handle value reserved for containers the engine synthesises.
    pub const SYNTHETIC_BASE: u64 = 1 << 63;

    /// Raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether the engine created this handle rather than the host.
    #[must_use]
    pub const fn is_synthetic(self) -> bool {
        self.0 >= Self::SYNTHETIC_BASE
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the declared layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutNode {
    /// Horizontally paged container.
    Paginator(PaginatorNode),
    /// One page of a paginator.
    Pane(PaneNode),
    /// Vertically scrollable box ("scrollbox").
    FreeScroll(FreeScrollNode),
    /// Any other element.
    Element(ElementNode),
    /// Bare text between elements.
    Text(TextNode),
}

/// Paginator container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaginatorNode {
    pub handle: NodeHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Raw drag-mode attribute (`back`, `next`, `both`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag: Option<String>,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

/// Pane container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaneNode {
    pub handle: NodeHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Markup rendered inside the pane.
    #[serde(default)]
    pub content: String,
    /// Explicit height; when absent the pane takes its paginator's height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

/// Free-scroll container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FreeScrollNode {
    pub handle: NodeHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Generic element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementNode {
    pub handle: NodeHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Lower- or upper-case tag name.
    pub tag: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

/// Text run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

impl PaginatorNode {
    /// Paginator with no children.
    #[must_use]
    pub fn new(handle: NodeHandle) -> Self {
        Self {
            handle,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_drag(mut self, mode: impl Into<String>) -> Self {
        self.drag = Some(mode.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<LayoutNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl PaneNode {
    /// Empty pane.
    #[must_use]
    pub fn new(handle: NodeHandle) -> Self {
        Self {
            handle,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<LayoutNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl FreeScrollNode {
    /// Empty scroll box.
    #[must_use]
    pub fn new(handle: NodeHandle) -> Self {
        Self {
            handle,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

impl ElementNode {
    /// Element with the given tag.
    #[must_use]
    pub fn new(handle: NodeHandle, tag: impl Into<String>) -> Self {
        Self {
            handle,
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<LayoutNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl From<PaginatorNode> for LayoutNode {
    fn from(node: PaginatorNode) -> Self {
        Self::Paginator(node)
    }
}

impl From<PaneNode> for LayoutNode {
    fn from(node: PaneNode) -> Self {
        Self::Pane(node)
    }
}

impl From<FreeScrollNode> for LayoutNode {
    fn from(node: FreeScrollNode) -> Self {
        Self::FreeScroll(node)
    }
}

impl From<ElementNode> for LayoutNode {
    fn from(node: ElementNode) -> Self {
        Self::Element(node)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl LayoutNode {
    /// Text node helper.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextNode { text: text.into() })
    }

    /// Host handle, if this node is an element.
    #[must_use]
    pub fn handle(&self) -> Option<NodeHandle> {
        match self {
            Self::Paginator(n) => Some(n.handle),
            Self::Pane(n) => Some(n.handle),
            Self::FreeScroll(n) => Some(n.handle),
            Self::Element(n) => Some(n.handle),
            Self::Text(_) => None,
        }
    }

    /// Element id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Paginator(n) => n.id.as_deref(),
            Self::Pane(n) => n.id.as_deref(),
            Self::FreeScroll(n) => n.id.as_deref(),
            Self::Element(n) => n.id.as_deref(),
            Self::Text(_) => None,
        }
    }

    /// Whether a paginator accepts this node as a page.
    #[must_use]
    pub fn is_page_container(&self) -> bool {
        match self {
            Self::Pane(_) => true,
            Self::Element(e) => {
                e.tag.eq_ignore_ascii_case("div") || e.tag.eq_ignore_ascii_case("section")
            }
            _ => false,
        }
    }

    /// Whether this node is itself an engine (paginator or free scroll).
    #[must_use]
    pub fn is_engine(&self) -> bool {
        matches!(self, Self::Paginator(_) | Self::FreeScroll(_))
    }

    /// View a page container as a pane description.
    ///
    /// Plain `div`/`section` elements become panes that inherit the
    /// paginator's height.
    #[must_use]
    pub fn as_pane(&self) -> Option<PaneNode> {
        match self {
            Self::Pane(p) => Some(p.clone()),
            Self::Element(e) if self.is_page_container() => Some(PaneNode {
                handle: e.handle,
                id: e.id.clone(),
                content: e.content.clone(),
                height: None,
                children: e.children.clone(),
            }),
            _ => None,
        }
    }

    /// Parse a tree from JSON.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(json).map_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(line = err.line(), column = err.column(), "layout tree rejected");
            LayoutError::Json(err)
        })
    }

    /// Serialize the tree to JSON.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        serde_json::to_string(self).map_err(LayoutError::Json)
    }
}

/// Layout description errors.
#[derive(Debug)]
pub enum LayoutError {
    /// The JSON document did not describe a layout tree.
    Json(serde_json::Error),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid layout tree: {err}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}
