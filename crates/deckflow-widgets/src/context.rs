#![forbid(unsafe_code)]

//! Shared engine context.
//!
//! Every engine built for one document shares a [`Context`]: the layout
//! probe, configuration, the engagement flags that keep page drags and
//! scroll drags from fighting, id registries, orientation tracking and the
//! notification queue.
//!
//! # Invariants
//!
//! 1. Host setup runs at most once per context.
//! 2. Registries hold weak references; a dropped engine is never resized
//!    or returned by lookup.
//! 3. Queued events are delivered in order, outside any engine borrow.
//!
//! # Failure Modes
//!
//! - Subscribers that call back into [`Context::flush_events`] see an empty
//!   queue for events already taken; new events they queue are delivered by
//!   the outer flush.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use deckflow_core::geometry::{Orientation, Size};
use deckflow_layout::{LayoutProbe, NodeHandle, Stylesheet};
use web_time::Instant;

use crate::config::{ConfigError, EngineConfig};
use crate::error::{BuildError, EngineKind};
use crate::event::{EngineEvent, HostSetup, ResizeNotice};
use crate::free_scroll::{FreeScroll, SharedFreeScroll};
use crate::paginator::{Paginator, SharedPaginator};

type Callback = Rc<dyn Fn(&EngineEvent)>;
type CallbackWeak = Weak<dyn Fn(&EngineEvent)>;

/// Which gesture system currently owns pointer movement.
///
/// The first paginator to start panning claims the page drag; every other
/// paginator, including its ancestors, leaves that gesture alone. Scroll
/// drags set the free-scroll flag once they pass their dead zone. Each
/// engine ignores movement while the other system holds the gesture.
#[derive(Debug, Default)]
pub struct Engagement {
    page_owner: Cell<Option<NodeHandle>>,
    free_scroll: Cell<bool>,
}

impl Engagement {
    #[must_use]
    pub fn paginator_engaged(&self) -> bool {
        self.page_owner.get().is_some()
    }

    /// Paginator holding the current page drag.
    #[must_use]
    pub fn page_owner(&self) -> Option<NodeHandle> {
        self.page_owner.get()
    }

    #[must_use]
    pub fn free_scroll_engaged(&self) -> bool {
        self.free_scroll.get()
    }

    /// Clear both flags, e.g. when the host cancels a touch sequence.
    pub fn release(&self) {
        self.page_owner.set(None);
        self.free_scroll.set(false);
    }

    pub(crate) fn claim_pages(&self, paginator: NodeHandle) {
        self.page_owner.set(Some(paginator));
    }

    /// Release the page drag if `paginator` holds it.
    pub(crate) fn release_pages(&self, paginator: NodeHandle) {
        if self.page_owner.get() == Some(paginator) {
            self.page_owner.set(None);
        }
    }

    pub(crate) fn set_free_scroll(&self, engaged: bool) {
        self.free_scroll.set(engaged);
    }
}

struct Inner {
    probe: Rc<dyn LayoutProbe>,
    config: EngineConfig,
    engagement: Engagement,
    paginators: RefCell<AHashMap<String, Weak<RefCell<Paginator>>>>,
    indexed: RefCell<Vec<Weak<RefCell<Paginator>>>>,
    free_scrolls: RefCell<AHashMap<String, Weak<RefCell<FreeScroll>>>>,
    orientation: Cell<Orientation>,
    host_setup: OnceCell<HostSetup>,
    next_handle: Cell<u64>,
    events: RefCell<VecDeque<EngineEvent>>,
    subscribers: RefCell<Vec<CallbackWeak>>,
}

/// Shared state for every engine of one document.
///
/// Cloning yields another handle to the same context.
#[derive(Clone)]
pub struct Context {
    inner: Rc<Inner>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("orientation", &self.inner.orientation.get())
            .field("engagement", &self.inner.engagement)
            .field("paginators", &self.inner.paginators.borrow().len())
            .field("free_scrolls", &self.inner.free_scrolls.borrow().len())
            .field("queued_events", &self.inner.events.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Context over `probe`, classifying the initial orientation from the
    /// probe's viewport.
    pub fn new<P: LayoutProbe + 'static>(
        probe: Rc<P>,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(probe, config))
    }

    /// Context with the default configuration.
    #[must_use]
    pub fn with_defaults<P: LayoutProbe + 'static>(probe: Rc<P>) -> Self {
        Self::build(probe, EngineConfig::default())
    }

    fn build(probe: Rc<dyn LayoutProbe>, config: EngineConfig) -> Self {
        let orientation = probe.viewport().orientation();
        Self {
            inner: Rc::new(Inner {
                probe,
                config,
                engagement: Engagement::default(),
                paginators: RefCell::new(AHashMap::new()),
                indexed: RefCell::new(Vec::new()),
                free_scrolls: RefCell::new(AHashMap::new()),
                orientation: Cell::new(orientation),
                host_setup: OnceCell::new(),
                next_handle: Cell::new(NodeHandle::SYNTHETIC_BASE),
                events: RefCell::new(VecDeque::new()),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn probe(&self) -> &dyn LayoutProbe {
        self.inner.probe.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn engagement(&self) -> &Engagement {
        &self.inner.engagement
    }

    /// Orientation class last seen.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.inner.orientation.get()
    }

    /// Fresh handle for a container the engine creates itself.
    pub fn allocate_handle(&self) -> NodeHandle {
        let raw = self.inner.next_handle.get();
        self.inner.next_handle.set(raw.wrapping_add(1));
        NodeHandle(raw)
    }

    // -----------------------------------------------------------------------
    // Host setup
    // -----------------------------------------------------------------------

    /// Run document-level setup if it has not run yet.
    ///
    /// Returns `true` only on the call that performed it.
    pub fn ensure_host_setup(&self) -> bool {
        if self.inner.host_setup.get().is_some() {
            return false;
        }
        let touch = self.inner.probe.has_touch_input();
        let setup = HostSetup {
            stylesheet: Stylesheet::baseline(touch, self.inner.config.deck.page_transition),
            block_document_touch_move: true,
            suppress_image_drag: !touch,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            touch,
            rules = setup.stylesheet.len(),
            "deckflow host setup"
        );
        self.queue(EngineEvent::HostSetup(setup.clone()));
        let _ = self.inner.host_setup.set(setup);
        true
    }

    /// Setup produced by [`ensure_host_setup`](Self::ensure_host_setup).
    #[must_use]
    pub fn host_setup(&self) -> Option<&HostSetup> {
        self.inner.host_setup.get()
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Live paginator registered under `id`.
    #[must_use]
    pub fn paginator(&self, id: &str) -> Option<SharedPaginator> {
        self.inner.paginators.borrow().get(id).and_then(Weak::upgrade)
    }

    /// Live free scroll registered under `id`.
    #[must_use]
    pub fn free_scroll(&self, id: &str) -> Option<SharedFreeScroll> {
        self.inner.free_scrolls.borrow().get(id).and_then(Weak::upgrade)
    }

    pub(crate) fn check_paginator_id(&self, id: &str) -> Result<(), BuildError> {
        if self.paginator(id).is_some() {
            return Err(BuildError::DuplicateId {
                kind: EngineKind::Paginator,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_free_scroll_id(&self, id: &str) -> Result<(), BuildError> {
        if self.free_scroll(id).is_some() {
            return Err(BuildError::DuplicateId {
                kind: EngineKind::FreeScroll,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn register_paginator(&self, id: &str, paginator: &SharedPaginator) {
        let weak = Rc::downgrade(paginator);
        self.inner
            .paginators
            .borrow_mut()
            .insert(id.to_string(), weak.clone());
        self.inner.indexed.borrow_mut().push(weak);
    }

    pub(crate) fn register_free_scroll(&self, id: &str, scroll: &SharedFreeScroll) {
        self.inner
            .free_scrolls
            .borrow_mut()
            .insert(id.to_string(), Rc::downgrade(scroll));
    }

    // -----------------------------------------------------------------------
    // Orientation
    // -----------------------------------------------------------------------

    /// React to a window resize.
    ///
    /// Only a change of orientation class relayouts: every live registered
    /// paginator is resized in registration order, then every live
    /// registered free scroll. Returns the paginators' notices.
    pub fn viewport_changed(&self, size: Size, now: Instant) -> Vec<ResizeNotice> {
        let orientation = size.orientation();
        if orientation == self.inner.orientation.get() {
            return Vec::new();
        }
        self.inner.orientation.set(orientation);

        #[cfg(feature = "tracing")]
        tracing::info!(
            ?orientation,
            width = size.width,
            height = size.height,
            "orientation changed"
        );

        let paginators: Vec<SharedPaginator> = self
            .inner
            .indexed
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        let notices = paginators
            .iter()
            .map(|p| p.borrow_mut().resize(now))
            .collect();

        let scrolls: Vec<SharedFreeScroll> = self
            .inner
            .free_scrolls
            .borrow()
            .values()
            .filter_map(Weak::upgrade)
            .collect();
        for scroll in &scrolls {
            scroll.borrow_mut().resize();
        }
        notices
    }

    /// [`viewport_changed`](Self::viewport_changed) with the probe's
    /// current viewport.
    pub fn sync_viewport(&self, now: Instant) -> Vec<ResizeNotice> {
        let size = self.inner.probe.viewport();
        self.viewport_changed(size, now)
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    pub(crate) fn queue(&self, event: EngineEvent) {
        self.inner.events.borrow_mut().push_back(event);
    }

    /// Register a callback for every delivered event.
    ///
    /// Dropping the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&EngineEvent) + 'static) -> Subscription {
        let strong: Callback = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Deliver queued events to live subscribers, oldest first.
    ///
    /// Events queued by subscribers during delivery are delivered too.
    /// Returns the number of events delivered.
    pub fn flush_events(&self) -> usize {
        let mut delivered = 0;
        loop {
            let Some(event) = self.inner.events.borrow_mut().pop_front() else {
                break;
            };
            let callbacks: Vec<Callback> = {
                let mut subs = self.inner.subscribers.borrow_mut();
                subs.retain(|w| w.strong_count() > 0);
                subs.iter().filter_map(Weak::upgrade).collect()
            };
            for callback in &callbacks {
                callback(&event);
            }
            delivered += 1;
        }
        delivered
    }

    /// Take queued events without delivering them.
    pub fn drain_events(&self) -> Vec<EngineEvent> {
        self.inner.events.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.inner.events.borrow().len()
    }

    /// Number of registered subscribers, including dropped ones not yet
    /// pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

/// Keeps a [`Context::subscribe`] callback alive.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckflow_layout::StaticProbe;

    fn ctx() -> Context {
        Context::with_defaults(Rc::new(StaticProbe::new(Size::new(320.0, 480.0))))
    }

    #[test]
    fn host_setup_runs_once() {
        let ctx = ctx();
        assert!(ctx.ensure_host_setup());
        assert!(!ctx.ensure_host_setup());
        let events = ctx.drain_events();
        assert_eq!(events.len(), 1);
        let setup = ctx.host_setup().expect("setup ran");
        assert!(setup.block_document_touch_move);
        assert!(!setup.suppress_image_drag);
        assert_eq!(setup.stylesheet.len(), 7);
    }

    #[test]
    fn mouse_host_suppresses_image_drag() {
        let probe = StaticProbe::new(Size::new(1024.0, 768.0)).with_touch(false);
        let ctx = Context::with_defaults(Rc::new(probe));
        ctx.ensure_host_setup();
        let setup = ctx.host_setup().expect("setup ran");
        assert!(setup.suppress_image_drag);
        assert_eq!(setup.stylesheet.len(), 8);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let probe = Rc::new(StaticProbe::new(Size::new(320.0, 480.0)));
        let err = Context::new(probe, EngineConfig::default().with_tension(-1.0)).unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveTension(-1.0));
    }

    #[test]
    fn only_the_owner_releases_pages() {
        let engagement = Engagement::default();
        engagement.claim_pages(NodeHandle(4));
        engagement.release_pages(NodeHandle(9));
        assert_eq!(engagement.page_owner(), Some(NodeHandle(4)));
        engagement.release_pages(NodeHandle(4));
        assert!(!engagement.paginator_engaged());

        engagement.claim_pages(NodeHandle(4));
        engagement.set_free_scroll(true);
        engagement.release();
        assert!(!engagement.paginator_engaged() && !engagement.free_scroll_engaged());
    }

    #[test]
    fn initial_orientation_from_probe() {
        assert_eq!(ctx().orientation(), Orientation::Portrait);
    }

    #[test]
    fn same_class_resize_is_ignored() {
        let ctx = ctx();
        let now = Instant::now();
        assert!(ctx.viewport_changed(Size::new(300.0, 500.0), now).is_empty());
        assert_eq!(ctx.orientation(), Orientation::Portrait);
        ctx.viewport_changed(Size::new(480.0, 320.0), now);
        assert_eq!(ctx.orientation(), Orientation::Landscape);
    }

    #[test]
    fn synthetic_handles_are_distinct() {
        let ctx = ctx();
        let a = ctx.allocate_handle();
        let b = ctx.allocate_handle();
        assert_ne!(a, b);
        assert!(a.is_synthetic() && b.is_synthetic());
    }

    #[test]
    fn subscription_drop_unsubscribes() {
        let ctx = ctx();
        let seen = Rc::new(Cell::new(0));
        let sub = {
            let seen = Rc::clone(&seen);
            ctx.subscribe(move |_| seen.set(seen.get() + 1))
        };
        ctx.ensure_host_setup();
        assert_eq!(ctx.flush_events(), 1);
        assert_eq!(seen.get(), 1);

        drop(sub);
        ctx.queue(EngineEvent::Resized(ResizeNotice {
            id: None,
            width: 1.0,
            height: 1.0,
        }));
        assert_eq!(ctx.flush_events(), 1);
        assert_eq!(seen.get(), 1);
        assert_eq!(ctx.subscriber_count(), 0);
    }

    #[test]
    fn events_queued_during_delivery_are_delivered() {
        let ctx = ctx();
        let seen = Rc::new(Cell::new(0));
        let _sub = {
            let seen = Rc::clone(&seen);
            let inner = ctx.clone();
            ctx.subscribe(move |event| {
                seen.set(seen.get() + 1);
                if matches!(event, EngineEvent::HostSetup(_)) {
                    inner.queue(EngineEvent::Resized(ResizeNotice {
                        id: None,
                        width: 0.0,
                        height: 0.0,
                    }));
                }
            })
        };
        ctx.ensure_host_setup();
        assert_eq!(ctx.flush_events(), 2);
        assert_eq!(seen.get(), 2);
    }
}
