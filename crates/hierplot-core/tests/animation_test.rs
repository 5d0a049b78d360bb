//! Integration tests for the animation module.

use hierplot_core::animation::*;
use proptest::prelude::*;
use std::time::Duration;

const MS_200: Duration = Duration::from_millis(200);
const MS_300: Duration = Duration::from_millis(300);

#[test]
fn tween_many_small_ticks_completes() {
    let mut tween = Tween::new(0.0, 1.0, MS_300);
    for _ in 0..300 {
        tween.tick(Duration::from_millis(1));
    }
    assert!(tween.is_complete(), "300x1ms should complete a 300ms tween");
    assert_eq!(tween.current(), 1.0);
}

#[test]
fn highlight_policy_finishes_before_structural_policy() {
    let mut structural = Tween::new(0.0, 10.0, MS_300);
    let mut highlight = Tween::new(0.0, 4.0, MS_200);
    structural.tick(MS_200);
    highlight.tick(MS_200);
    assert!(highlight.is_complete());
    assert!(!structural.is_complete());
}

proptest! {
    #[test]
    fn tween_stays_between_endpoints(
        from in -1000.0f64..1000.0,
        to in -1000.0f64..1000.0,
        steps in proptest::collection::vec(0u64..50, 0..40),
    ) {
        let mut tween = Tween::new(from, to, MS_300);
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        for ms in steps {
            tween.tick(Duration::from_millis(ms));
            let v = tween.current();
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9, "tween value {} escaped [{}, {}]", v, lo, hi);
        }
    }

    #[test]
    fn fade_value_bounded(ms in 0u64..10_000) {
        let mut fade = Fade::new(MS_300).easing(ease_in_out_cubic);
        fade.tick(Duration::from_millis(ms));
        let v = fade.value();
        prop_assert!((0.0..=1.0).contains(&v));
    }
}
