#![forbid(unsafe_code)]

//! Horizontally paged container.
//!
//! A [`Paginator`] lays its panes out side by side and pans between them.
//! Navigation is programmatic ([`go_to`](Paginator::go_to),
//! [`back`](Paginator::back), [`next`](Paginator::next),
//! [`jump`](Paginator::jump)) or, when a drag mode is set, by dragging.
//!
//! # Drag model
//!
//! Once the finger passes the dead zone toward a pane that exists and the
//! drag mode allows, the strip follows the finger and the paginator claims
//! the page drag on the context. Events reach nested paginators first, so
//! an inner paginator that claims a swipe keeps its ancestors still. On release the dragged fraction of the width
//! is scaled (×3 by default) and clamped to `[-1, 1]`:
//!
//! - if the last movement points against the drag (`|v − pct| > 1`), the
//!   strip snaps back;
//! - otherwise the paginator commits to the rounded target page.
//!
//! # Invariants
//!
//! 1. Once a pane exists, `index < len`; an empty paginator has no index.
//! 2. At rest (no drag, no pending swap) exactly the panes within one of
//!    the index are visible.
//! 3. A navigation that supersedes a pending visibility swap applies that
//!    swap first, so no stale pane stays visible.
//!
//! # Failure Modes
//!
//! - Out-of-range targets clamp; navigation on an empty paginator is a
//!   no-op returning `None`.
//! - A zero width yields zero pixel offsets and a zero drag fraction.

use std::cell::RefCell;
use std::rc::Rc;

use deckflow_core::animation::{Motion, Transition};
use deckflow_core::geometry::{Point, round_half_up};
use deckflow_core::pointer::{GestureStep, InputMode, PointerEvent, PointerTracker};
use deckflow_core::timer::Deferred;
use deckflow_layout::{LayoutNode, NodeHandle, OffsetUnit, PaginatorNode, PaneNode, WritingDirection};
use web_time::Instant;

use crate::builder::{self, Engine};
use crate::config::DeckConfig;
use crate::context::Context;
use crate::error::BuildError;
use crate::event::{EngineEvent, PageChange, ResizeNotice, Translate};
use crate::pane::Pane;

/// Paginator shared between its owner and the context registry.
pub type SharedPaginator = Rc<RefCell<Paginator>>;

/// Which drag directions page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DragMode {
    /// Dragging disabled.
    #[default]
    None,
    /// Only dragging back toward the first pane.
    Back,
    /// Only dragging forward toward the last pane.
    Next,
    /// Dragging either way.
    Both,
}

impl DragMode {
    /// Parse a drag attribute. Unknown values disable dragging.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None => Self::None,
            Some("back" | "back-only") => Self::Back,
            Some("next" | "next-only") => Self::Next,
            Some("both") => Self::Both,
            Some(_other) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(mode = _other, "unknown drag mode, dragging disabled");
                Self::None
            }
        }
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        self != Self::None
    }

    fn allows_back(self) -> bool {
        matches!(self, Self::Back | Self::Both)
    }

    fn allows_next(self) -> bool {
        matches!(self, Self::Next | Self::Both)
    }
}

/// Neighbour visibility change applied after an adjacent move has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibilitySwap {
    show: isize,
    hide: isize,
}

#[derive(Debug, Clone, Copy, Default)]
struct DragState {
    start: Point,
    last: Point,
    dx: f64,
    /// Sign of the latest movement, in drag direction.
    v: f64,
    /// Dragged fraction of the width.
    pct: f64,
}

/// Horizontally paged container.
#[derive(Debug)]
pub struct Paginator {
    ctx: Context,
    config: DeckConfig,
    handle: NodeHandle,
    id: Option<String>,
    panes: Vec<Pane>,
    index: Option<usize>,
    width: f64,
    height: f64,
    drag_mode: DragMode,
    direction: WritingDirection,
    unit: OffsetUnit,
    /// Strip offset in pages (0 = first pane, −1 = second, …).
    pan: Motion,
    tracker: Option<PointerTracker>,
    drag: DragState,
    moving: bool,
    swap: Deferred<VisibilitySwap>,
}

impl Paginator {
    /// Empty paginator with dragging disabled.
    pub fn new(ctx: &Context, handle: NodeHandle) -> Result<SharedPaginator, BuildError> {
        Self::from_node(ctx, &PaginatorNode::new(handle))
    }

    /// Build a paginator and its panes (and their nested engines) from a
    /// declared node.
    pub fn from_node(ctx: &Context, node: &PaginatorNode) -> Result<SharedPaginator, BuildError> {
        ctx.ensure_host_setup();
        if let Some(id) = &node.id {
            ctx.check_paginator_id(id)?;
        }

        let probe = ctx.probe();
        let direction = probe.writing_direction(node.handle);
        let unit = probe.offset_unit();
        let width = probe.width(node.handle);
        let height = probe.available_height(node.handle).max(0.0);

        let mut panes = Vec::new();
        for child in &node.children {
            match child.as_pane() {
                Some(pane) => panes.push(builder::build_pane(ctx, &pane, height)?),
                None => Self::discard(node, child),
            }
        }

        let drag_mode = DragMode::parse(node.drag.as_deref());
        let tracker = drag_mode
            .is_enabled()
            .then(|| PointerTracker::new(InputMode::from_touch_support(probe.has_touch_input())));

        let mut paginator = Self {
            ctx: ctx.clone(),
            config: ctx.config().deck.clone(),
            handle: node.handle,
            id: node.id.clone(),
            index: (!panes.is_empty()).then_some(0),
            panes,
            width,
            height,
            drag_mode,
            direction,
            unit,
            pan: Motion::at_rest(0.0),
            tracker,
            drag: DragState::default(),
            moving: false,
            swap: Deferred::new(),
        };
        paginator.apply_window();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            id = ?paginator.id,
            panes = paginator.panes.len(),
            ?drag_mode,
            width,
            height,
            "paginator built"
        );

        let shared = Rc::new(RefCell::new(paginator));
        if let Some(id) = &node.id {
            ctx.register_paginator(id, &shared);
        }
        Ok(shared)
    }

    fn discard(_node: &PaginatorNode, _child: &LayoutNode) {
        #[cfg(feature = "tracing")]
        match _child {
            LayoutNode::Text(_) => {
                tracing::trace!(paginator = %_node.handle, "dropping text between panes");
            }
            other => tracing::warn!(
                paginator = %_node.handle,
                child = ?other.handle(),
                "child is not a pane container, discarded"
            ),
        }
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

    /// Current pane, `None` while empty.
    #[inline]
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn pane(&self, index: usize) -> Option<&Pane> {
        self.panes.get(index)
    }

    pub fn pane_mut(&mut self, index: usize) -> Option<&mut Pane> {
        self.panes.get_mut(index)
    }

    #[must_use]
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    #[must_use]
    pub fn drag_mode(&self) -> DragMode {
        self.drag_mode
    }

    #[must_use]
    pub fn direction(&self) -> WritingDirection {
        self.direction
    }

    #[must_use]
    pub fn offset_unit(&self) -> OffsetUnit {
        self.unit
    }

    /// Whether a drag is currently panning the strip.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Transition of the current pan.
    #[must_use]
    pub fn transition(&self) -> Transition {
        self.pan.transition()
    }

    /// Indices of visible panes, ascending.
    #[must_use]
    pub fn visible_indices(&self) -> Vec<usize> {
        self.panes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_visible())
            .map(|(i, _)| i)
            .collect()
    }

    #[must_use]
    pub fn has_pending_swap(&self) -> bool {
        self.swap.is_pending()
    }

    /// Strip translation rendered at `now`.
    #[must_use]
    pub fn translate(&self, now: Instant) -> Translate {
        self.to_translate(self.pan.sample(now))
    }

    /// Strip translation once the current pan settles.
    #[must_use]
    pub fn target_translate(&self) -> Translate {
        self.to_translate(self.pan.target())
    }

    fn to_translate(&self, pages: f64) -> Translate {
        let pages = pages * self.direction.multiplier();
        match self.unit {
            OffsetUnit::Percent => Translate::Percent(pages * 100.0),
            OffsetUnit::Pixels => Translate::Pixels(pages * self.width),
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Slide to `target` (clamped). Notifies only if the index changes.
    pub fn go_to(&mut self, target: usize, now: Instant) -> Option<PageChange> {
        self.go(target, false, false, now)
    }

    /// Move to `target` (clamped) without animating. Always notifies, even
    /// when `target` is the current pane.
    pub fn jump(&mut self, target: usize, now: Instant) -> Option<PageChange> {
        self.go(target, false, true, now)
    }

    /// Slide to the previous pane, if any.
    pub fn back(&mut self, now: Instant) -> Option<PageChange> {
        let target = self.index?.saturating_sub(1);
        self.go_to(target, now)
    }

    /// Slide to the next pane, if any.
    pub fn next(&mut self, now: Instant) -> Option<PageChange> {
        let target = (self.index? + 1).min(self.panes.len().saturating_sub(1));
        self.go_to(target, now)
    }

    fn go(&mut self, target: usize, manual: bool, jump: bool, now: Instant) -> Option<PageChange> {
        let index = self.index?;
        let target = target.min(self.panes.len().saturating_sub(1));

        if let Some(pending) = self.swap.cancel() {
            self.apply_swap(pending);
        }

        let mut change = None;
        if target != index || jump {
            let notice = PageChange {
                id: self.id.clone(),
                from_index: index,
                to_index: target,
                from_pane_id: self.panes[index].id().map(str::to_string),
                to_pane_id: self.panes[target].id().map(str::to_string),
                manual,
            };

            if index.abs_diff(target) > 1 {
                self.set_window(index, false);
                self.set_window(target, true);
            } else if index != target {
                let (t, i) = (target as isize, index as isize);
                self.swap.schedule(
                    now,
                    self.config.swap_delay,
                    VisibilitySwap {
                        show: 2 * t - i,
                        hide: 2 * i - t,
                    },
                );
            }

            self.index = Some(target);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                id = ?self.id,
                from = index,
                to = target,
                manual,
                jump,
                "page change"
            );

            self.ctx.queue(EngineEvent::PageChanged(notice.clone()));
            change = Some(notice);
        }

        let transition = if jump {
            Transition::INSTANT
        } else {
            self.config.page_transition
        };
        self.pan.retarget(-(target as f64), transition, now);
        change
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    /// Show or hide one pane. Out-of-range indices are ignored.
    pub fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(pane) = self.panes.get_mut(index) {
            pane.set_visible(visible);
        }
    }

    fn set_visible_signed(&mut self, index: isize, visible: bool) {
        if let Ok(index) = usize::try_from(index) {
            self.set_visible(index, visible);
        }
    }

    fn set_window(&mut self, center: usize, visible: bool) {
        let c = center as isize;
        for i in c - 1..=c + 1 {
            self.set_visible_signed(i, visible);
        }
    }

    fn apply_window(&mut self) {
        let index = self.index;
        for (i, pane) in self.panes.iter_mut().enumerate() {
            pane.set_visible(index.is_some_and(|c| i.abs_diff(c) <= 1));
        }
    }

    fn apply_swap(&mut self, swap: VisibilitySwap) {
        self.set_visible_signed(swap.show, true);
        self.set_visible_signed(swap.hide, false);
    }

    // -----------------------------------------------------------------------
    // Deferred work
    // -----------------------------------------------------------------------

    /// Apply a due visibility swap here and in nested engines.
    pub fn tick(&mut self, now: Instant) {
        if let Some(swap) = self.swap.poll(now) {
            self.apply_swap(swap);
        }
        for pane in &self.panes {
            if let Some(child) = pane.child() {
                child.tick(now);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Feed one pointer event through the current pane's nested engine,
    /// then this paginator. Returns page changes, innermost first.
    pub fn dispatch(&mut self, event: &PointerEvent) -> Vec<PageChange> {
        let mut changes = Vec::new();
        if let Some(child) = self.current_child() {
            changes.extend(child.dispatch(event));
        }

        let step = self.tracker.as_mut().and_then(|t| t.process(event));
        match step {
            Some(GestureStep::Start(p)) => self.drag_start(p),
            Some(GestureStep::Move(p)) => self.drag_move(p),
            Some(GestureStep::End) => changes.extend(self.drag_end(event.at)),
            None => {}
        }
        changes
    }

    fn drag_start(&mut self, p: Point) {
        self.width = self.ctx.probe().width(self.handle);
        let target = self.pan.target();
        self.pan.snap(target);
        self.drag = DragState {
            start: p,
            last: p,
            ..DragState::default()
        };
    }

    fn drag_move(&mut self, p: Point) {
        let dir = self.direction.multiplier();
        self.drag.v = if p.x > self.drag.last.x { dir } else { -dir };
        self.drag.last = p;
        self.drag.dx = p.distance_x(self.drag.start);

        let engagement = self.ctx.engagement();
        if engagement.free_scroll_engaged() {
            #[cfg(feature = "tracing")]
            tracing::trace!(id = ?self.id, "page drag suppressed by scroll");
            return;
        }
        if engagement.page_owner().is_some_and(|owner| owner != self.handle) {
            #[cfg(feature = "tracing")]
            tracing::trace!(id = ?self.id, "page drag held by another paginator");
            return;
        }
        if !self.movable() {
            return;
        }

        let Some(index) = self.index else {
            return;
        };
        self.moving = true;
        engagement.claim_pages(self.handle);
        self.drag.pct = if self.width > 0.0 {
            self.drag.dx * dir / self.width
        } else {
            0.0
        };
        self.pan.snap(self.drag.pct - index as f64);
    }

    fn movable(&self) -> bool {
        let Some(index) = self.index else {
            return false;
        };
        let past_dead_zone = self.ctx.engagement().page_owner() == Some(self.handle)
            || self.drag.dx.abs() > self.config.drag_dead_zone;
        let toward = self.drag.dx * self.direction.multiplier();
        past_dead_zone
            && ((toward > 0.0 && self.drag_mode.allows_back() && index > 0)
                || (toward < 0.0 && self.drag_mode.allows_next() && index + 1 < self.panes.len()))
    }

    fn drag_end(&mut self, now: Instant) -> Option<PageChange> {
        let was_moving = std::mem::replace(&mut self.moving, false);
        let engaged = self.ctx.engagement().page_owner() == Some(self.handle) || was_moving;
        let change = match self.index {
            Some(index) if engaged => {
                let pct = (self.drag.pct * self.config.commit_scale).clamp(-1.0, 1.0);
                self.drag.pct = pct;
                if (self.drag.v - pct).abs() > 1.0 {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(id = ?self.id, pct, v = self.drag.v, "drag snapped back");
                    self.go(index, false, false, now)
                } else {
                    let target = round_half_up(index as f64 - pct).max(0.0) as usize;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(id = ?self.id, pct, target, "drag committed");
                    self.go(target, true, false, now)
                }
            }
            _ => None,
        };
        self.ctx.engagement().release_pages(self.handle);
        change
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Refit to the available height and notify.
    ///
    /// Pixel-offset hosts also refresh the width and re-pan, since the
    /// page offset depends on it.
    pub fn resize(&mut self, now: Instant) -> ResizeNotice {
        let probe = self.ctx.probe();
        self.height = probe.available_height(self.handle).max(0.0);
        if self.unit == OffsetUnit::Pixels {
            self.width = probe.width(self.handle);
            let pages = -(self.index.unwrap_or(0) as f64);
            self.pan.retarget(pages, Transition::INSTANT, now);
        }
        for pane in &mut self.panes {
            pane.set_height(self.height, probe);
        }

        let notice = ResizeNotice {
            id: self.id.clone(),
            width: probe.width(self.handle),
            height: self.height,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(id = ?self.id, width = notice.width, height = notice.height, "paginator resized");

        self.ctx.queue(EngineEvent::Resized(notice.clone()));
        notice
    }

    // -----------------------------------------------------------------------
    // Pane management
    // -----------------------------------------------------------------------

    /// Append a pane, synthesising an empty one when `node` is `None`.
    ///
    /// The new pane is visible only if it lands within one of the current
    /// index; the first pane of an empty paginator becomes current.
    pub fn add_pane(&mut self, node: Option<PaneNode>, now: Instant) -> Result<&mut Pane, BuildError> {
        let node = node.unwrap_or_else(|| PaneNode::new(self.ctx.allocate_handle()));
        let mut pane = builder::build_pane(&self.ctx, &node, self.height)?;

        let new_index = self.panes.len();
        let current = match self.index {
            Some(i) => i,
            None => {
                self.index = Some(0);
                self.pan.retarget(0.0, Transition::INSTANT, now);
                0
            }
        };
        pane.set_visible(new_index.abs_diff(current) <= 1);
        self.panes.push(pane);
        Ok(&mut self.panes[new_index])
    }

    /// Drop every pane (and their nested engines) and return to page 0.
    pub fn clear(&mut self, now: Instant) {
        self.panes.clear();
        self.index = None;
        self.swap.cancel();
        self.moving = false;
        self.pan.retarget(0.0, Transition::INSTANT, now);
    }

    /// Nested engine of the current pane.
    #[must_use]
    pub fn current_child(&self) -> Option<Engine> {
        self.index
            .and_then(|i| self.panes.get(i))
            .and_then(Pane::child)
            .cloned()
    }
}
