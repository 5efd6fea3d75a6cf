#![forbid(unsafe_code)]

//! Tour state engine.
//!
//! [`TourEngine`] owns the ordered steps, the current-step pointer, and the
//! first/last bounds, and drives the select / open / cancel protocol.
//!
//! # State machine
//!
//! ```text
//!            select(k), k registered
//!   Idle ─────────────────────────────▶ Active(k) ──┐ select(k')
//!    ▲                                   │   ▲      │ k' registered
//!    │ cancel_tour                       │   └──────┘
//!    └───────────────────────────────────┤
//!                                        │ select(k'), k' not registered
//!                                        ▼
//!                                     Finished ── open_tour ──▶ Active(first)
//! ```
//!
//! # Invariants
//!
//! 1. After any `select`, at most one step is visible, and it is the step at
//!    the selected key when one exists.
//! 2. Selecting a key with no step fires the post-tour callback exactly once
//!    for that call; the post-step callback fires after every `select`.
//! 3. `current_step` is only written when the new value differs, so
//!    re-selecting the current key emits no "step changed" notification.
//! 4. Registration never changes `current_step`.
//!
//! Callbacks run while the engine is mutably borrowed and must not call back
//! into it.

use std::fmt;

use tracing::{debug, info};

use crate::reactive::{Observable, Subscription};
use crate::step::Step;
use crate::steps::OrderedSteps;

type Callback = Box<dyn FnMut()>;

/// Where the tour is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourPhase {
    /// No step selected: the tour has not started or was cancelled.
    Idle,
    /// The step at this key is visible.
    Active(i64),
    /// A selection ran past the registered steps.
    Finished,
}

impl TourPhase {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Ordered steps plus the current-step pointer and transition protocol.
pub struct TourEngine {
    steps: OrderedSteps<Step>,
    current_step: Observable<i64>,
    first_step: i64,
    last_step: i64,
    phase: TourPhase,
    post_step: Callback,
    post_tour: Callback,
}

impl Default for TourEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TourEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourEngine")
            .field("steps", &self.steps.len())
            .field("current_step", &self.current_step.get())
            .field("first_step", &self.first_step)
            .field("last_step", &self.last_step)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl TourEngine {
    /// Empty engine: no steps, all bounds at `0`, phase [`TourPhase::Idle`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: OrderedSteps::new(),
            current_step: Observable::new(0),
            first_step: 0,
            last_step: 0,
            phase: TourPhase::Idle,
            post_step: Box::new(|| {}),
            post_tour: Box::new(|| {}),
        }
    }

    /// Called after every step resolution, including the end of the tour.
    pub fn set_post_step_callback(&mut self, callback: impl FnMut() + 'static) {
        self.post_step = Box::new(callback);
    }

    /// Called once per tour completion or cancellation.
    pub fn set_post_tour_callback(&mut self, callback: impl FnMut() + 'static) {
        self.post_tour = Box::new(callback);
    }

    /// Register a step and return the key it was stored under.
    ///
    /// An explicit index widens `[first_step, last_step]`. `first_step` is
    /// replaced while it is still `0` or when the index is smaller, so the
    /// first explicit registration wins over the initial zero. A step
    /// without an index sets `last_step` to the current count and is
    /// appended after the highest key.
    pub fn add_step(&mut self, step: Step) -> i64 {
        let key = match step.index() {
            Some(index) => {
                if index > self.last_step {
                    self.last_step = index;
                }
                if self.first_step == 0 || index < self.first_step {
                    self.first_step = index;
                }
                self.steps.set(index, step);
                index
            }
            None => {
                self.last_step = i64::try_from(self.steps.len()).unwrap_or(i64::MAX);
                self.steps.push(step)
            }
        };
        debug!(
            key,
            first_step = self.first_step,
            last_step = self.last_step,
            "step registered"
        );
        key
    }

    /// Make the step at `next` the only visible step.
    ///
    /// With no step at `next` every step is hidden, the phase becomes
    /// [`TourPhase::Finished`], and the post-tour callback fires. The
    /// post-step callback fires in both cases.
    pub fn select(&mut self, next: i64) {
        // Hide everything except the target so a re-selected step never
        // flickers through a hidden state.
        let target = self.steps.contains_key(next).then_some(next);
        self.hide_steps_except(target);

        if self.current_step.get() != next {
            self.current_step.set(next);
        }

        match self.steps.get(next) {
            Some(step) => {
                step.set_visible(true);
                self.phase = TourPhase::Active(next);
                debug!(key = next, "step selected");
            }
            None => {
                self.phase = TourPhase::Finished;
                info!(key = next, last_step = self.last_step, "tour finished");
                (self.post_tour)();
            }
        }
        (self.post_step)();
    }

    /// Host-binding variant of [`select`](Self::select); a value that is not
    /// a number (`None`) is ignored.
    pub fn select_value(&mut self, next: Option<i64>) {
        if let Some(next) = next {
            self.select(next);
        }
    }

    /// Hide every registered step.
    pub fn unselect_all_steps(&self) {
        self.hide_steps_except(None);
    }

    fn hide_steps_except(&self, keep: Option<i64>) {
        self.steps.for_each(|step, key| {
            if Some(key) != keep {
                step.set_visible(false);
            }
        });
    }

    /// Abort the tour: hide all steps and fire the post-tour callback.
    pub fn cancel_tour(&mut self) {
        self.unselect_all_steps();
        self.phase = TourPhase::Idle;
        info!(current_step = self.current_step.get(), "tour cancelled");
        (self.post_tour)();
    }

    /// Alias for [`cancel_tour`](Self::cancel_tour).
    pub fn close_tour(&mut self) {
        self.cancel_tour();
    }

    /// Key [`open_tour`](Self::open_tour) would start at: the current step
    /// when it lies in `[first_step, last_step]` and the tour has not
    /// finished, otherwise `first_step`.
    #[must_use]
    pub fn start_key(&self) -> i64 {
        let current = self.current_step.get();
        let out_of_bounds = current < self.first_step || current > self.last_step;
        if out_of_bounds || self.phase == TourPhase::Finished {
            self.first_step
        } else {
            current
        }
    }

    /// Resume the tour, or restart it from the first step when it already
    /// finished. Returns the selected key.
    pub fn open_tour(&mut self) -> i64 {
        let start = self.start_key();
        debug!(start, "tour opened");
        self.select(start);
        start
    }

    #[must_use]
    pub fn is_first_step(&self) -> bool {
        self.current_step.get() == self.first_step
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current_step.get() == self.last_step
    }

    /// Notify `callback` whenever `current_step` changes.
    pub fn subscribe_step_changed(&self, callback: impl Fn(i64) + 'static) -> Subscription {
        self.current_step.subscribe(move |key| callback(*key))
    }

    #[must_use]
    pub fn current_step(&self) -> i64 {
        self.current_step.get()
    }

    #[must_use]
    pub fn first_step(&self) -> i64 {
        self.first_step
    }

    #[must_use]
    pub fn last_step(&self) -> i64 {
        self.last_step
    }

    #[must_use]
    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn step(&self, key: i64) -> Option<&Step> {
        self.steps.get(key)
    }

    #[must_use]
    pub fn steps(&self) -> &OrderedSteps<Step> {
        &self.steps
    }

    /// The visible step and its key, if any.
    #[must_use]
    pub fn visible_step(&self) -> Option<(i64, &Step)> {
        self.steps.iter().find(|(_, step)| step.is_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counting(engine: &mut TourEngine) -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let steps = Rc::new(Cell::new(0));
        let tours = Rc::new(Cell::new(0));
        let s = Rc::clone(&steps);
        let t = Rc::clone(&tours);
        engine.set_post_step_callback(move || s.set(s.get() + 1));
        engine.set_post_tour_callback(move || t.set(t.get() + 1));
        (steps, tours)
    }

    fn visible_keys(engine: &TourEngine) -> Vec<i64> {
        engine
            .steps()
            .iter()
            .filter(|(_, step)| step.is_visible())
            .map(|(key, _)| key)
            .collect()
    }

    fn engine_with(indices: &[i64]) -> TourEngine {
        let mut engine = TourEngine::new();
        for &index in indices {
            engine.add_step(Step::with_index(index));
        }
        engine
    }

    #[test]
    fn initial_state_is_idle_at_zero() {
        let engine = TourEngine::new();
        assert_eq!(engine.phase(), TourPhase::Idle);
        assert_eq!(engine.current_step(), 0);
        assert_eq!(engine.first_step(), 0);
        assert_eq!(engine.last_step(), 0);
        assert!(engine.visible_step().is_none());
    }

    #[test]
    fn explicit_indices_set_bounds() {
        let engine = engine_with(&[5, 1, 3]);
        assert_eq!(engine.first_step(), 1);
        assert_eq!(engine.last_step(), 5);
        assert_eq!(engine.steps().keys().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn first_step_zero_boundary() {
        // While first_step is still 0 the next explicit index replaces it.
        let engine = engine_with(&[0, 2]);
        assert_eq!(engine.first_step(), 2);

        let engine = engine_with(&[3, 0]);
        assert_eq!(engine.first_step(), 0);
    }

    #[test]
    fn auto_indices_in_call_order() {
        let mut engine = TourEngine::new();
        let keys: Vec<i64> = (0..3).map(|_| engine.add_step(Step::default())).collect();
        assert_eq!(keys, vec![0, 1, 2]);
        assert_eq!(engine.last_step(), 2);
    }

    #[test]
    fn registration_does_not_move_current_step() {
        let mut engine = engine_with(&[1, 2]);
        engine.select(2);
        engine.add_step(Step::with_index(7));
        assert_eq!(engine.current_step(), 2);
        assert_eq!(engine.phase(), TourPhase::Active(2));
    }

    #[test]
    fn select_shows_exactly_one_step() {
        let mut engine = engine_with(&[0, 1, 2]);
        let (steps, tours) = counting(&mut engine);

        engine.select(1);
        assert_eq!(visible_keys(&engine), vec![1]);
        engine.select(2);
        assert_eq!(visible_keys(&engine), vec![2]);
        assert_eq!(engine.phase(), TourPhase::Active(2));
        assert_eq!(steps.get(), 2);
        assert_eq!(tours.get(), 0);
    }

    #[test]
    fn select_past_last_finishes_once() {
        let mut engine = engine_with(&[0, 1, 2]);
        let (steps, tours) = counting(&mut engine);
        engine.select(2);

        engine.select(3);
        assert!(visible_keys(&engine).is_empty());
        assert_eq!(engine.phase(), TourPhase::Finished);
        assert_eq!(engine.current_step(), 3);
        assert_eq!(tours.get(), 1);
        assert_eq!(steps.get(), 2);
    }

    #[test]
    fn gap_lookup_failure_also_finishes() {
        let mut engine = engine_with(&[1, 3]);
        let (_, tours) = counting(&mut engine);
        engine.select(2);
        assert_eq!(engine.phase(), TourPhase::Finished);
        assert_eq!(tours.get(), 1);
    }

    #[test]
    fn reselect_is_idempotent() {
        let mut engine = engine_with(&[0, 1, 2]);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let c = Rc::clone(&changes);
        let _sub = engine.subscribe_step_changed(move |k| c.borrow_mut().push(k));

        let flips = Rc::new(Cell::new(0));
        let f = Rc::clone(&flips);
        let step_two = engine.step(2).cloned().expect("step 2");
        let _watch = step_two.watch_visibility(move |_| f.set(f.get() + 1));

        engine.select(2);
        engine.select(2);
        assert!(step_two.is_visible());
        assert_eq!(*changes.borrow(), vec![2]);
        assert_eq!(flips.get(), 1);
    }

    #[test]
    fn cancel_hides_and_fires_post_tour() {
        let mut engine = engine_with(&[0, 1]);
        let (steps, tours) = counting(&mut engine);
        engine.select(1);

        engine.cancel_tour();
        assert!(visible_keys(&engine).is_empty());
        assert_eq!(engine.phase(), TourPhase::Idle);
        assert_eq!(tours.get(), 1);
        assert_eq!(steps.get(), 1);
        // The pointer is kept so the tour can resume.
        assert_eq!(engine.current_step(), 1);
    }

    #[test]
    fn close_delegates_to_cancel() {
        let mut engine = engine_with(&[0]);
        let (_, tours) = counting(&mut engine);
        engine.close_tour();
        assert_eq!(tours.get(), 1);
    }

    #[test]
    fn open_resumes_in_range() {
        let mut engine = engine_with(&[0, 1, 2]);
        engine.select(1);
        engine.cancel_tour();
        assert_eq!(engine.open_tour(), 1);
        assert_eq!(visible_keys(&engine), vec![1]);
    }

    #[test]
    fn open_after_finish_restarts_at_first() {
        let mut engine = engine_with(&[0, 1, 2]);
        engine.select(3);
        assert_eq!(engine.phase(), TourPhase::Finished);

        assert_eq!(engine.open_tour(), 0);
        assert_eq!(visible_keys(&engine), vec![0]);
        assert_eq!(engine.phase(), TourPhase::Active(0));
    }

    #[test]
    fn open_below_first_restarts_at_first() {
        let mut engine = engine_with(&[4, 6]);
        assert_eq!(engine.current_step(), 0);
        assert_eq!(engine.open_tour(), 4);
        assert_eq!(visible_keys(&engine), vec![4]);
    }

    #[test]
    fn open_with_no_steps_finishes() {
        let mut engine = TourEngine::new();
        let (_, tours) = counting(&mut engine);
        engine.open_tour();
        assert_eq!(engine.phase(), TourPhase::Finished);
        assert_eq!(tours.get(), 1);
    }

    #[test]
    fn first_and_last_predicates() {
        let mut engine = engine_with(&[0, 1, 2]);
        engine.select(0);
        assert!(engine.is_first_step());
        assert!(!engine.is_last_step());
        engine.select(2);
        assert!(engine.is_last_step());
    }

    #[test]
    fn select_value_ignores_non_numbers() {
        let mut engine = engine_with(&[0, 1]);
        let (steps, _) = counting(&mut engine);
        engine.select_value(None);
        assert_eq!(steps.get(), 0);
        engine.select_value(Some(1));
        assert_eq!(engine.current_step(), 1);
    }
}
