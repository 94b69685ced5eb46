#![forbid(unsafe_code)]

//! Vertically scrollable box with elastic bounds.
//!
//! The content sits in a flow layer translated vertically inside a clipped
//! viewport. Dragging moves the layer directly; past either bound the
//! overshoot is divided by the tension so the content resists. On release
//! the layer flings in proportion to the last move's squared speed and
//! settles inside the bounds.
//!
//! # Invariants
//!
//! 1. At rest the offset lies in `[viewport − content, 0]` when the content
//!    is taller than the viewport, otherwise it is exactly 0.
//! 2. While a page drag owns the gesture, start and move do nothing, and a
//!    start swallowed that way mutes the rest of its gesture. The release
//!    is always processed so the scroll flag never sticks.

use std::cell::RefCell;
use std::rc::Rc;

use deckflow_core::animation::{Motion, Transition};
use deckflow_core::geometry::{Point, round_half_up};
use deckflow_core::pointer::{GestureStep, InputMode, PointerEvent, PointerTracker};
use deckflow_layout::{FreeScrollNode, NodeHandle};
use web_time::Instant;

use crate::config::ScrollConfig;
use crate::content::release_images;
use crate::context::Context;
use crate::error::BuildError;

/// Free scroll shared between its owner and the context registry.
pub type SharedFreeScroll = Rc<RefCell<FreeScroll>>;

/// Layers a free scroll renders, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Shadow strip over the top edge.
    InnerShadow,
    /// Translated layer holding the content.
    Flow,
}

/// Vertically scrollable container.
#[derive(Debug)]
pub struct FreeScroll {
    ctx: Context,
    config: ScrollConfig,
    handle: NodeHandle,
    id: Option<String>,
    content: String,
    viewport_height: f64,
    content_height: f64,
    /// Rendered offset of the flow layer.
    offset: Motion,
    /// Offset the gesture builds on (and rests at).
    committed: f64,
    last: Point,
    dy: f64,
    tracker: PointerTracker,
}

impl FreeScroll {
    /// Empty scroll box.
    pub fn new(ctx: &Context, handle: NodeHandle) -> Result<SharedFreeScroll, BuildError> {
        Self::from_node(ctx, &FreeScrollNode::new(handle))
    }

    pub fn from_node(ctx: &Context, node: &FreeScrollNode) -> Result<SharedFreeScroll, BuildError> {
        ctx.ensure_host_setup();
        if let Some(id) = &node.id {
            ctx.check_free_scroll_id(id)?;
        }

        let probe = ctx.probe();
        let scroll = Self {
            ctx: ctx.clone(),
            config: ctx.config().scroll.clone(),
            handle: node.handle,
            id: node.id.clone(),
            content: node.content.clone(),
            viewport_height: probe.available_height(node.handle).max(0.0),
            content_height: probe.content_height(node.handle).max(0.0),
            offset: Motion::at_rest(0.0),
            committed: 0.0,
            last: Point::default(),
            dy: 0.0,
            tracker: PointerTracker::new(InputMode::from_touch_support(probe.has_touch_input())),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            id = ?scroll.id,
            viewport = scroll.viewport_height,
            content = scroll.content_height,
            "free scroll built"
        );

        let shared = Rc::new(RefCell::new(scroll));
        if let Some(id) = &node.id {
            ctx.register_free_scroll(id, &shared);
        }
        Ok(shared)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Rendered offset of the flow layer at `now`.
    #[must_use]
    pub fn offset(&self, now: Instant) -> f64 {
        self.offset.sample(now)
    }

    /// Offset the flow layer is heading to.
    #[must_use]
    pub fn target_offset(&self) -> f64 {
        self.offset.target()
    }

    /// Offset the current gesture builds on.
    #[must_use]
    pub fn committed_offset(&self) -> f64 {
        self.committed
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Markup inside the flow layer.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Transition of the current offset change.
    #[must_use]
    pub fn transition(&self) -> Transition {
        self.offset.transition()
    }

    #[must_use]
    pub fn layers(&self) -> [Layer; 2] {
        [Layer::InnerShadow, Layer::Flow]
    }

    /// Round `y` to whole pixels and clamp it into the scrollable range.
    ///
    /// A fractional floor is rounded up so the result never leaves the
    /// range.
    #[must_use]
    pub fn bound(&self, y: f64) -> f64 {
        let floor = (self.viewport_height - self.content_height).ceil();
        round_half_up(y).max(floor).min(0.0)
    }

    // -----------------------------------------------------------------------
    // Positioning
    // -----------------------------------------------------------------------

    /// Settle at `y` (bounded) with the settle animation.
    pub fn scroll_to(&mut self, y: f64, now: Instant) {
        self.committed = self.bound(y);
        self.offset.retarget(self.committed, self.config.settle, now);
    }

    /// Snap to the top.
    pub fn top(&mut self) {
        self.committed = 0.0;
        self.offset.snap(0.0);
    }

    /// Replace the content, releasing images in the outgoing markup.
    ///
    /// Returns the released image sources.
    pub fn set_content(&mut self, content: impl Into<String>) -> Vec<String> {
        let released = release_images(&self.content, &self.config.placeholder_image);

        #[cfg(feature = "tracing")]
        if !released.sources.is_empty() {
            tracing::trace!(id = ?self.id, images = released.sources.len(), "released images");
        }

        self.content = content.into();
        released.sources
    }

    /// Empty the box and return to the top.
    pub fn clear(&mut self) -> Vec<String> {
        let released = self.set_content(String::new());
        self.top();
        released
    }

    /// Refit the viewport and re-bound the offset, without animation.
    pub fn resize(&mut self) {
        self.refresh_metrics();
        self.committed = self.bound(self.committed);
        self.offset.snap(self.committed);
    }

    fn refresh_metrics(&mut self) {
        let probe = self.ctx.probe();
        self.viewport_height = probe.available_height(self.handle).max(0.0);
        self.content_height = probe.content_height(self.handle).max(0.0);
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Feed one pointer event.
    pub fn dispatch(&mut self, event: &PointerEvent) {
        let Some(step) = self.tracker.process(event) else {
            return;
        };
        let page_drag = self.ctx.engagement().paginator_engaged();
        match step {
            GestureStep::Start(_) | GestureStep::Move(_) if page_drag => {
                if matches!(step, GestureStep::Start(_)) {
                    self.tracker.reset();
                }
                #[cfg(feature = "tracing")]
                tracing::trace!(id = ?self.id, "scroll suppressed by page drag");
            }
            GestureStep::Start(p) => self.drag_start(p, event.at),
            GestureStep::Move(p) => self.drag_move(p),
            GestureStep::End => self.drag_end(event.at),
        }
    }

    fn drag_start(&mut self, p: Point, now: Instant) {
        self.refresh_metrics();
        self.last = p;
        self.committed = self.offset.sample(now);
        self.dy = 0.0;
        self.offset.snap(self.committed);
    }

    fn drag_move(&mut self, p: Point) {
        self.dy = p.distance_y(self.last);
        let mut ty = self.committed;

        if self.dy.abs() > self.config.drag_dead_zone {
            self.ctx.engagement().set_free_scroll(true);
            ty += self.dy;
        }

        let floor = self.viewport_height - self.content_height;
        if ty > 0.0 {
            ty /= self.config.tension;
        } else if ty < floor {
            ty += (self.viewport_height - (self.viewport_height.max(self.content_height) + ty))
                / self.config.tension;
        }

        self.offset.snap(ty);
        self.committed = round_half_up(self.committed + self.dy);
        self.last = p;
    }

    fn drag_end(&mut self, now: Instant) {
        let engagement = self.ctx.engagement();
        if engagement.free_scroll_engaged() {
            let target = self.committed + self.dy * self.dy.abs() * self.config.fling_factor;
            #[cfg(feature = "tracing")]
            tracing::debug!(id = ?self.id, from = self.committed, dy = self.dy, target, "fling");
            let bounded = self.bound(target);
            self.committed = bounded;
            self.offset.retarget(bounded, self.config.settle, now);
        }
        engagement.set_free_scroll(false);
    }
}
