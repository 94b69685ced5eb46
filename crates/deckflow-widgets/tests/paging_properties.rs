//! Paginator navigation: index bounds, visible window, notifications.

use std::cell::RefCell;
use std::rc::Rc;

use deckflow_core::geometry::Size;
use deckflow_core::pointer::{PointerEvent, PointerPhase};
use deckflow_core::{Duration, Instant};
use deckflow_layout::{NodeHandle, PaginatorNode, PaneNode, StaticProbe};
use deckflow_widgets::{Context, EngineEvent, PageChange, Paginator, SharedPaginator};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn deck(panes: usize, drag: Option<&str>) -> (Context, SharedPaginator) {
    let ctx = Context::with_defaults(Rc::new(StaticProbe::new(Size::new(320.0, 480.0))));
    let mut node = PaginatorNode::new(NodeHandle(1)).with_id("deck");
    if let Some(mode) = drag {
        node = node.with_drag(mode);
    }
    for i in 0..panes {
        node = node.with_child(PaneNode::new(NodeHandle(100 + i as u64)).with_id(format!("card-{i}")));
    }
    let deck = Paginator::from_node(&ctx, &node).expect("paginator builds");
    ctx.drain_events();
    (ctx, deck)
}

fn window(index: usize, len: usize) -> Vec<usize> {
    (index.saturating_sub(1)..=(index + 1).min(len - 1)).collect()
}

fn page_changes(ctx: &Context) -> Vec<PageChange> {
    ctx.drain_events()
        .into_iter()
        .filter_map(|e| match e {
            EngineEvent::PageChanged(change) => Some(change),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Nav {
    Back,
    Next,
    GoTo(usize),
    Jump(usize),
}

fn nav() -> impl Strategy<Value = Nav> {
    prop_oneof![
        Just(Nav::Back),
        Just(Nav::Next),
        (0usize..12).prop_map(Nav::GoTo),
        (0usize..12).prop_map(Nav::Jump),
    ]
}

proptest! {
    #[test]
    fn index_in_bounds_and_window_at_rest(
        len in 1usize..8,
        ops in proptest::collection::vec((nav(), 0u64..400), 0..40),
    ) {
        let (_, deck) = deck(len, None);
        let mut d = deck.borrow_mut();
        let mut now = Instant::now();
        for (op, gap) in ops {
            now += Duration::from_millis(gap);
            d.tick(now);
            match op {
                Nav::Back => { d.back(now); }
                Nav::Next => { d.next(now); }
                Nav::GoTo(i) => { d.go_to(i, now); }
                Nav::Jump(i) => { d.jump(i, now); }
            }
            let index = d.index().expect("non-empty");
            prop_assert!(index < len);
        }

        d.tick(now + Duration::from_secs(1));
        prop_assert!(!d.has_pending_swap());
        let index = d.index().expect("non-empty");
        prop_assert_eq!(d.visible_indices(), window(index, len));
    }
}

#[test]
fn far_move_resets_window_immediately() {
    let (ctx, deck) = deck(3, None);
    let now = Instant::now();
    let mut d = deck.borrow_mut();
    d.go_to(2, now);
    assert_eq!(
        page_changes(&ctx),
        vec![PageChange {
            id: Some("deck".into()),
            from_index: 0,
            to_index: 2,
            from_pane_id: Some("card-0".into()),
            to_pane_id: Some("card-2".into()),
            manual: false,
        }]
    );
    assert!(!d.has_pending_swap());
    assert_eq!(d.visible_indices(), vec![1, 2]);
}

#[test]
fn jump_twice_notifies_twice() {
    let (ctx, deck) = deck(4, None);
    let now = Instant::now();
    let mut d = deck.borrow_mut();
    d.jump(2, now);
    d.jump(2, now);
    let changes = page_changes(&ctx);
    assert_eq!(changes.len(), 2);
    assert_eq!((changes[0].from_index, changes[0].to_index), (0, 2));
    assert_eq!((changes[1].from_index, changes[1].to_index), (2, 2));
    assert!(d.transition().is_instant());
}

#[test]
fn rapid_double_next_leaves_final_window() {
    let (ctx, deck) = deck(5, None);
    let t0 = Instant::now();
    let mut d = deck.borrow_mut();
    d.next(t0);
    let t1 = t0 + Duration::from_millis(50);
    d.next(t1);
    // the first swap was applied when the second move superseded it
    assert_eq!(d.visible_indices(), vec![0, 1, 2]);
    assert!(d.has_pending_swap());

    d.tick(t1 + Duration::from_millis(150));
    assert!(!d.has_pending_swap());
    assert_eq!(d.index(), Some(2));
    assert_eq!(d.visible_indices(), vec![1, 2, 3]);
    assert_eq!(page_changes(&ctx).len(), 2);
}

#[test]
fn back_and_forth_within_delay() {
    let (_, deck) = deck(5, None);
    let t0 = Instant::now();
    let mut d = deck.borrow_mut();
    d.go_to(2, t0);
    d.tick(t0);
    d.next(t0 + Duration::from_millis(10));
    d.back(t0 + Duration::from_millis(20));
    d.tick(t0 + Duration::from_millis(500));
    assert_eq!(d.index(), Some(2));
    assert_eq!(d.visible_indices(), vec![1, 2, 3]);
}

#[test]
fn released_drag_is_reported_to_subscribers() {
    let (ctx, deck) = deck(3, Some("both"));
    let seen: Rc<RefCell<Vec<PageChange>>> = Rc::default();
    let _sub = {
        let seen = Rc::clone(&seen);
        ctx.subscribe(move |event| {
            if let Some(change) = event.as_page_change() {
                seen.borrow_mut().push(change.clone());
            }
        })
    };

    let t0 = Instant::now();
    {
        let mut d = deck.borrow_mut();
        d.dispatch(&PointerEvent::finger(PointerPhase::Down, 280.0, 100.0, t0));
        d.dispatch(&PointerEvent::finger(PointerPhase::Move, 200.0, 100.0, t0));
        d.dispatch(&PointerEvent::finger(PointerPhase::Move, 170.0, 100.0, t0));
        d.dispatch(&PointerEvent::lift(t0));
    }
    // subscribers may borrow the paginator
    assert_eq!(ctx.flush_events(), 1);
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].manual);
    assert_eq!(seen[0].to_index, 1);
    assert_eq!(deck.borrow().index(), Some(1));
}

#[test]
fn short_drag_below_commit_threshold_stays() {
    let (ctx, deck) = deck(3, Some("both"));
    let t0 = Instant::now();
    let mut d = deck.borrow_mut();
    d.dispatch(&PointerEvent::finger(PointerPhase::Down, 280.0, 100.0, t0));
    // 40px of 320: 0.125 * 3 = 0.375, rounds back to the current pane
    d.dispatch(&PointerEvent::finger(PointerPhase::Move, 240.0, 100.0, t0));
    assert!(d.dispatch(&PointerEvent::lift(t0)).is_empty());
    assert_eq!(d.index(), Some(0));
    assert!(page_changes(&ctx).is_empty());
}

#[test]
fn mouse_drag_needs_a_press() {
    let probe = Rc::new(StaticProbe::new(Size::new(1024.0, 768.0)).with_touch(false));
    let ctx = Context::with_defaults(probe);
    let node = PaginatorNode::new(NodeHandle(1))
        .with_drag("both")
        .with_child(PaneNode::new(NodeHandle(2)))
        .with_child(PaneNode::new(NodeHandle(3)));
    let deck = Paginator::from_node(&ctx, &node).expect("build");
    let t0 = Instant::now();
    let mut d = deck.borrow_mut();

    // hover without a press
    d.dispatch(&PointerEvent::mouse(PointerPhase::Move, 100.0, 10.0, t0));
    assert!(!d.is_moving());
    // touch events are not listened to on mouse hosts
    d.dispatch(&PointerEvent::finger(PointerPhase::Down, 900.0, 10.0, t0));
    d.dispatch(&PointerEvent::finger(PointerPhase::Move, 100.0, 10.0, t0));
    assert!(!d.is_moving());

    d.dispatch(&PointerEvent::mouse(PointerPhase::Down, 900.0, 10.0, t0));
    d.dispatch(&PointerEvent::mouse(PointerPhase::Move, 400.0, 10.0, t0));
    assert!(d.is_moving());
    let changes = d.dispatch(&PointerEvent::mouse(PointerPhase::Up, 400.0, 10.0, t0));
    assert_eq!(changes.len(), 1);
    assert_eq!(d.index(), Some(1));
}
