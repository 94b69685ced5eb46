#![forbid(unsafe_code)]

//! Host environment probe.
//!
//! [`LayoutProbe`] is the only way engines learn about the rendered page:
//! container sizes, the scroll layer's content height, input capabilities
//! and text direction. Real hosts implement it over their document; tests
//! and headless hosts use [`StaticProbe`].

use std::cell::{Cell, RefCell};

use deckflow_core::geometry::Size;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::available::{SiblingBox, available_height};
use crate::tree::NodeHandle;

/// Inline text direction of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingDirection {
    #[default]
    Ltr,
    Rtl,
}

impl WritingDirection {
    /// Sign applied to horizontal drag distances and page offsets.
    #[inline]
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Ltr => 1.0,
            Self::Rtl => -1.0,
        }
    }
}

/// Unit hosts use for horizontal page offsets.
///
/// Some webviews only composite percentage translations smoothly; others
/// need pixels, in which case the paginator must track its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetUnit {
    #[default]
    Percent,
    Pixels,
}

/// Read-only view of the host layout.
pub trait LayoutProbe {
    /// Height a container may fill: its parent's height minus in-flow
    /// siblings. See [`available_height`].
    fn available_height(&self, node: NodeHandle) -> f64;

    /// Rendered width of a container.
    fn width(&self, node: NodeHandle) -> f64;

    /// Rendered height of a scroll box's flow layer.
    fn content_height(&self, node: NodeHandle) -> f64;

    /// Whether the device reports touch input.
    fn has_touch_input(&self) -> bool;

    /// Device pixel ratio; engines only pass it through.
    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Text direction in effect for a container.
    fn writing_direction(&self, node: NodeHandle) -> WritingDirection {
        let _ = node;
        WritingDirection::Ltr
    }

    /// Unit for horizontal page offsets.
    fn offset_unit(&self) -> OffsetUnit {
        OffsetUnit::Percent
    }

    /// Current window size.
    fn viewport(&self) -> Size;
}

#[derive(Debug, Clone, Copy, Default)]
struct NodeMetrics {
    width: Option<f64>,
    available_height: Option<f64>,
    content_height: Option<f64>,
    direction: Option<WritingDirection>,
}

/// In-memory [`LayoutProbe`].
///
/// Nodes without recorded metrics fall back to the viewport size (width and
/// available height) and zero content height. Setters take `&self` so a
/// probe shared with a context can be updated between gestures.
#[derive(Debug)]
pub struct StaticProbe {
    nodes: RefCell<FxHashMap<NodeHandle, NodeMetrics>>,
    viewport: Cell<Size>,
    touch: Cell<bool>,
    dpr: Cell<f64>,
    unit: Cell<OffsetUnit>,
    direction: Cell<WritingDirection>,
}

impl StaticProbe {
    /// Probe for a window of `viewport`, touch input, LTR text and percent
    /// offsets.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: RefCell::new(FxHashMap::default()),
            viewport: Cell::new(viewport),
            touch: Cell::new(true),
            dpr: Cell::new(1.0),
            unit: Cell::new(OffsetUnit::Percent),
            direction: Cell::new(WritingDirection::Ltr),
        }
    }

    /// Builder: input capability.
    #[must_use]
    pub fn with_touch(self, touch: bool) -> Self {
        self.touch.set(touch);
        self
    }

    /// Builder: offset unit.
    #[must_use]
    pub fn with_offset_unit(self, unit: OffsetUnit) -> Self {
        self.unit.set(unit);
        self
    }

    /// Builder: document-wide text direction.
    #[must_use]
    pub fn with_direction(self, direction: WritingDirection) -> Self {
        self.direction.set(direction);
        self
    }

    /// Builder: device pixel ratio.
    #[must_use]
    pub fn with_device_pixel_ratio(self, ratio: f64) -> Self {
        self.dpr.set(ratio);
        self
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.viewport.set(viewport);
    }

    pub fn set_touch(&self, touch: bool) {
        self.touch.set(touch);
    }

    pub fn set_offset_unit(&self, unit: OffsetUnit) {
        self.unit.set(unit);
    }

    pub fn set_width(&self, node: NodeHandle, width: f64) {
        self.update(node, |m| m.width = Some(width));
    }

    /// Record the available height of `node` directly.
    pub fn set_available_height(&self, node: NodeHandle, height: f64) {
        self.update(node, |m| m.available_height = Some(height));
    }

    /// Record the available height of `node` from its parent and siblings.
    pub fn set_enclosure(&self, node: NodeHandle, parent_height: f64, siblings: &[SiblingBox]) {
        let height = available_height(parent_height, siblings);
        self.set_available_height(node, height);
    }

    pub fn set_content_height(&self, node: NodeHandle, height: f64) {
        self.update(node, |m| m.content_height = Some(height));
    }

    /// Override the text direction of one container.
    pub fn set_direction(&self, node: NodeHandle, direction: WritingDirection) {
        self.update(node, |m| m.direction = Some(direction));
    }

    fn update(&self, node: NodeHandle, f: impl FnOnce(&mut NodeMetrics)) {
        f(self.nodes.borrow_mut().entry(node).or_default());
    }

    fn metrics(&self, node: NodeHandle) -> NodeMetrics {
        self.nodes.borrow().get(&node).copied().unwrap_or_default()
    }
}

impl LayoutProbe for StaticProbe {
    fn available_height(&self, node: NodeHandle) -> f64 {
        self.metrics(node)
            .available_height
            .unwrap_or(self.viewport.get().height)
    }

    fn width(&self, node: NodeHandle) -> f64 {
        self.metrics(node).width.unwrap_or(self.viewport.get().width)
    }

    fn content_height(&self, node: NodeHandle) -> f64 {
        self.metrics(node).content_height.unwrap_or(0.0)
    }

    fn has_touch_input(&self) -> bool {
        self.touch.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr.get()
    }

    fn writing_direction(&self, node: NodeHandle) -> WritingDirection {
        self.metrics(node)
            .direction
            .unwrap_or(self.direction.get())
    }

    fn offset_unit(&self) -> OffsetUnit {
        self.unit.get()
    }

    fn viewport(&self) -> Size {
        self.viewport.get()
    }
}
