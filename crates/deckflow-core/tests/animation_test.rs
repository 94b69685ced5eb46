//! Integration tests for the animation module.

use deckflow_core::animation::*;
use proptest::prelude::*;
use web_time::{Duration, Instant};

const MS_250: Duration = Duration::from_millis(250);
const MS_750: Duration = Duration::from_millis(750);

#[test]
fn easing_functions_are_monotonic() {
    for easing in [
        Easing::Linear,
        Easing::Ease,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::SETTLE,
    ] {
        let mut prev = 0.0f64;
        for i in 0..=100 {
            let t = f64::from(i) / 100.0;
            let v = easing.apply(t);
            assert!(v >= prev - 0.001, "{easing:?} should be monotonic at t={t}");
            prev = v;
        }
    }
}

#[test]
fn settle_motion_reaches_target_after_750ms() {
    let t0 = Instant::now();
    let mut m = Motion::at_rest(0.0);
    m.retarget(-700.0, Transition::new(MS_750, Easing::SETTLE), t0);

    let quarter = m.sample(t0 + Duration::from_millis(187));
    assert!(quarter < 0.0 && quarter > -700.0, "quarter={quarter}");
    assert_eq!(m.sample(t0 + MS_750), -700.0);
}

#[test]
fn interrupted_page_slide_continues_smoothly() {
    let t0 = Instant::now();
    let mut pan = Motion::at_rest(0.0);
    pan.retarget(-1.0, Transition::new(MS_250, Easing::EaseOut), t0);

    let grab = t0 + Duration::from_millis(100);
    let rendered = pan.sample(grab);
    pan.retarget(-2.0, Transition::new(MS_250, Easing::EaseOut), grab);
    assert!((pan.sample(grab) - rendered).abs() < 1e-9);
    assert_eq!(pan.sample(grab + MS_250), -2.0);
}

proptest! {
    #[test]
    fn bezier_output_stays_near_unit_range(
        x1 in 0.0f64..=1.0,
        y1 in 0.0f64..=1.0,
        x2 in 0.0f64..=1.0,
        y2 in 0.0f64..=1.0,
        t in 0.0f64..=1.0,
    ) {
        let curve = CubicBezier::new(x1, y1, x2, y2);
        let v = curve.apply(t);
        prop_assert!((-1e-6..=1.0 + 1e-6).contains(&v), "v={}", v);
    }

    #[test]
    fn motion_sample_is_between_endpoints(
        from in -2000.0f64..2000.0,
        to in -2000.0f64..2000.0,
        elapsed_ms in 0u64..1000,
    ) {
        let t0 = Instant::now();
        let mut m = Motion::at_rest(from);
        m.retarget(to, Transition::new(MS_750, Easing::SETTLE), t0);
        let v = m.sample(t0 + Duration::from_millis(elapsed_ms));
        let (lo, hi) = if from < to { (from, to) } else { (to, from) };
        prop_assert!(v >= lo - 1e-6 && v <= hi + 1e-6);
    }
}
