//! Property-based invariants of a hosted tour under arbitrary navigation.
//!
//! 1. At most one tip surface is attached, and it belongs to the visible step
//! 2. The backdrop is shown exactly while the tour is active
//! 3. The binding always agrees with the engine's current step once set
//! 4. Every finish or close runs the post-tour callback exactly once

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use tourguide::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Next,
    Previous,
    Set(i64),
    Open,
    Close,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Next),
        2 => Just(Op::Previous),
        2 => (-2i64..8).prop_map(Op::Set),
        2 => Just(Op::Open),
        1 => Just(Op::Close),
    ]
}

proptest! {
    #[test]
    fn navigation_keeps_host_consistent(
        tip_count in 1usize..6,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let binding = StepBinding::new(None);
        let scheduler = Rc::new(ManualScheduler::new());
        let tours = Rc::new(Cell::new(0u32));
        let t = Rc::clone(&tours);
        let host = TourHost::builder()
            .binding(binding.clone())
            .scheduler(scheduler.clone())
            .on_post_tour(move || t.set(t.get() + 1))
            .build()
            .unwrap();

        let tips: Vec<TipHost> = (0..tip_count)
            .map(|i| {
                let target: Rc<dyn TargetElement> = Rc::new(StaticTarget::new(Bounds::new(
                    10.0,
                    50.0 * i as f64,
                    40.0,
                    20.0,
                )));
                host.register_tip(
                    &TipAttributes::new(format!("tip {i}")),
                    target,
                    TipMetrics::new(Size::new(120.0, 40.0), 8.0),
                )
            })
            .collect();
        scheduler.advance(WATCH_DELAY);

        for op in ops {
            let phase_before = host.phase();
            let tours_before = tours.get();
            match op {
                Op::Next => host.next_step(),
                Op::Previous => host.previous_step(),
                Op::Set(v) => host.set_current_step(v),
                Op::Open => {
                    host.open_tour();
                }
                Op::Close => host.close_tour(),
            }

            let attached: Vec<i64> = tips
                .iter()
                .filter(|tip| tip.surface().is_attached())
                .map(TipHost::key)
                .collect();
            prop_assert!(attached.len() <= 1);
            let visible = host.with_engine(|e| e.visible_step().map(|(k, _)| k));
            prop_assert_eq!(attached.first().copied(), visible);

            prop_assert_eq!(host.overlay().is_shown(), host.phase().is_active());

            if let Some(bound) = binding.get() {
                prop_assert_eq!(bound, host.current_step());
            }

            let ended = match op {
                Op::Close => true,
                _ => host.phase() == TourPhase::Finished && phase_before != TourPhase::Finished,
            };
            if ended {
                prop_assert_eq!(tours.get(), tours_before + 1);
            }
        }
    }
}
