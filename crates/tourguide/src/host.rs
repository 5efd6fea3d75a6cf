#![forbid(unsafe_code)]

//! Tour host: wires a [`TourEngine`] to the page.
//!
//! The host owns the engine, the overlay controller, and the services tips
//! share (viewport, scroll, scheduler). The application's "current step"
//! variable is bound two ways:
//!
//! - writing the binding selects that step in the engine;
//! - engine step changes are written back into the binding.
//!
//! Equal writes are ignored by [`Observable`], so the round trip stops after
//! one hop. When the bound value enters `[first_step, last_step]` and the
//! config has `backdrop` on, the backdrop is shown; the post-tour callback
//! hides it.
//!
//! The engine queues post-step and post-tour notices while it is borrowed;
//! the host runs the user callbacks once the borrow is released, so they may
//! read host state or navigate the tour.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use tourguide_core::{
    Observable, Result, Step, Subscription, TourConfig, TourEngine, TourError, TourPhase,
};
use tourguide_overlay::{
    OverlayController, RealtimeScheduler, Scheduler, ScrollService, TargetElement, TipMetrics,
    Viewport, ViewportScroll,
};
use tracing::{debug, trace, warn};

use crate::tip::{TipAttributes, TipContext, TipHost};

type Callback = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    PostStep,
    PostTour,
}

/// Bound "current step" variable. `None` stands for a value that is not a
/// number, which the engine ignores.
pub type StepBinding = Observable<Option<i64>>;

struct HostShared {
    engine: RefCell<TourEngine>,
    overlay: Rc<RefCell<OverlayController>>,
    config: TourConfig,
    binding: StepBinding,
    viewport: Rc<Viewport>,
    scroll: Rc<dyn ScrollService>,
    scheduler: Rc<dyn Scheduler>,
    next_tip_id: Cell<u64>,
    notices: RefCell<VecDeque<Notice>>,
    flushing: Cell<bool>,
    on_post_step: RefCell<Callback>,
    on_post_tour: RefCell<Callback>,
}

impl HostShared {
    fn on_binding_changed(&self, value: Option<i64>) {
        {
            // A busy engine means the write came from the engine itself.
            let Ok(mut engine) = self.engine.try_borrow_mut() else {
                trace!(?value, "binding echo skipped");
                return;
            };
            self.show_backdrop_if_in_range(&engine, value);
            engine.select_value(value);
        }
        self.flush_notices();
    }

    fn close_tour(&self) {
        self.engine.borrow_mut().close_tour();
        self.flush_notices();
    }

    fn queue(&self, notice: Notice) {
        self.notices.borrow_mut().push_back(notice);
    }

    /// Run queued user callbacks in order. Notices queued by a callback are
    /// picked up by the outermost flush.
    fn flush_notices(&self) {
        if self.flushing.replace(true) {
            return;
        }
        loop {
            let next = self.notices.borrow_mut().pop_front();
            let Some(notice) = next else {
                break;
            };
            match notice {
                Notice::PostStep => (*self.on_post_step.borrow_mut())(),
                Notice::PostTour => (*self.on_post_tour.borrow_mut())(),
            }
        }
        self.flushing.set(false);
    }

    fn show_backdrop_if_in_range(&self, engine: &TourEngine, value: Option<i64>) {
        let Some(value) = value else {
            return;
        };
        let in_range = (engine.first_step()..=engine.last_step()).contains(&value);
        if in_range && self.config.backdrop {
            self.overlay.borrow_mut().show();
        }
    }

    fn hide_backdrop(&self) {
        if self.config.backdrop {
            self.overlay.borrow_mut().hide();
        }
    }
}

/// Builder for [`TourHost`].
///
/// Only the binding is required. The viewport defaults to an empty page,
/// scrolling moves that viewport, and deferred tasks run on a
/// [`RealtimeScheduler`] driven by [`TourHost::poll`].
pub struct TourHostBuilder {
    binding: Option<StepBinding>,
    config: TourConfig,
    viewport: Option<Rc<Viewport>>,
    scroll: Option<Rc<dyn ScrollService>>,
    scheduler: Option<Rc<dyn Scheduler>>,
    on_post_step: Callback,
    on_post_tour: Callback,
}

impl Default for TourHostBuilder {
    fn default() -> Self {
        Self {
            binding: None,
            config: TourConfig::default(),
            viewport: None,
            scroll: None,
            scheduler: None,
            on_post_step: Box::new(|| {}),
            on_post_tour: Box::new(|| {}),
        }
    }
}

impl fmt::Debug for TourHostBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourHostBuilder")
            .field("bound", &self.binding.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TourHostBuilder {
    /// Bind the application's "current step" variable.
    #[must_use]
    pub fn binding(mut self, binding: StepBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    #[must_use]
    pub fn config(mut self, config: TourConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn viewport(mut self, viewport: Rc<Viewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    #[must_use]
    pub fn scroll(mut self, scroll: Rc<dyn ScrollService>) -> Self {
        self.scroll = Some(scroll);
        self
    }

    #[must_use]
    pub fn scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Called after every step resolution.
    #[must_use]
    pub fn on_post_step(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_post_step = Box::new(callback);
        self
    }

    /// Called when the tour finishes or is closed, after the backdrop is
    /// hidden.
    #[must_use]
    pub fn on_post_tour(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_post_tour = Box::new(callback);
        self
    }

    /// Wire everything together.
    ///
    /// # Errors
    ///
    /// [`TourError::Configuration`] when no binding was given.
    pub fn build(self) -> Result<TourHost> {
        let Some(binding) = self.binding else {
            warn!("tour host built without a step binding");
            return Err(TourError::configuration(
                "tour requires a bound step variable",
            ));
        };
        let viewport = self.viewport.unwrap_or_default();
        let scroll = self
            .scroll
            .unwrap_or_else(|| Rc::new(ViewportScroll::new(Rc::clone(&viewport))));
        let (scheduler, realtime): (Rc<dyn Scheduler>, _) = match self.scheduler {
            Some(scheduler) => (scheduler, None),
            None => {
                let realtime = Rc::new(RealtimeScheduler::new());
                (Rc::clone(&realtime) as Rc<dyn Scheduler>, Some(realtime))
            }
        };

        let shared = Rc::new(HostShared {
            engine: RefCell::new(TourEngine::new()),
            overlay: Rc::new(RefCell::new(OverlayController::new())),
            config: self.config,
            binding: binding.clone(),
            viewport,
            scroll,
            scheduler,
            next_tip_id: Cell::new(0),
            notices: RefCell::new(VecDeque::new()),
            flushing: Cell::new(false),
            on_post_step: RefCell::new(self.on_post_step),
            on_post_tour: RefCell::new(self.on_post_tour),
        });

        let engine_subscription = {
            let mut engine = shared.engine.borrow_mut();
            let weak: Weak<HostShared> = Rc::downgrade(&shared);
            engine.set_post_step_callback(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.queue(Notice::PostStep);
                }
            });
            let weak: Weak<HostShared> = Rc::downgrade(&shared);
            engine.set_post_tour_callback(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.hide_backdrop();
                    shared.queue(Notice::PostTour);
                }
            });
            let echo = binding.clone();
            engine.subscribe_step_changed(move |key| {
                echo.set(Some(key));
            })
        };

        let weak = Rc::downgrade(&shared);
        let binding_subscription = binding.subscribe(move |value| {
            if let Some(shared) = weak.upgrade() {
                shared.on_binding_changed(*value);
            }
        });

        debug!(config = ?shared.config, "tour host ready");
        Ok(TourHost {
            shared,
            realtime,
            _engine_subscription: engine_subscription,
            _binding_subscription: binding_subscription,
        })
    }
}

/// The tour element: engine, overlay, and the two-way step binding.
pub struct TourHost {
    shared: Rc<HostShared>,
    realtime: Option<Rc<RealtimeScheduler>>,
    _engine_subscription: Subscription,
    _binding_subscription: Subscription,
}

impl fmt::Debug for TourHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourHost")
            .field("engine", &*self.shared.engine.borrow())
            .field("binding", &self.shared.binding.get())
            .field("backdrop", &self.shared.overlay.borrow().is_shown())
            .finish_non_exhaustive()
    }
}

impl TourHost {
    pub fn builder() -> TourHostBuilder {
        TourHostBuilder::default()
    }

    /// Host with default services and no-op callbacks.
    ///
    /// # Errors
    ///
    /// [`TourError::Configuration`] when `binding` is `None`.
    pub fn new(binding: Option<StepBinding>, config: TourConfig) -> Result<Self> {
        let builder = Self::builder().config(config);
        match binding {
            Some(binding) => builder.binding(binding).build(),
            None => builder.build(),
        }
    }

    /// Register a tip for `target` and return its host.
    ///
    /// The step is registered with the engine right away; the tip starts
    /// following the step's visibility once the watch delay elapses.
    pub fn register_tip(
        &self,
        attributes: &TipAttributes,
        target: Rc<dyn TargetElement>,
        metrics: TipMetrics,
    ) -> TipHost {
        let step = Step::new(attributes.step_index());
        let key = self.shared.engine.borrow_mut().add_step(step.clone());
        let id = self.shared.next_tip_id.get();
        self.shared.next_tip_id.set(id + 1);

        let settings = attributes.resolve(&self.shared.config);
        let context = TipContext {
            overlay: Rc::clone(&self.shared.overlay),
            viewport: Rc::clone(&self.shared.viewport),
            scroll: Rc::clone(&self.shared.scroll),
            scheduler: Rc::clone(&self.shared.scheduler),
        };
        debug!(tip = id, key, "tip registered");
        TipHost::new(id, key, step, settings, target, metrics, context)
    }

    /// Run due deferred tasks on the built-in scheduler. Returns the number
    /// of tasks run; always `0` when a custom scheduler was supplied.
    pub fn poll(&self) -> usize {
        self.realtime.as_ref().map_or(0, |realtime| realtime.poll())
    }

    /// Write the bound step variable, which selects that step.
    pub fn set_current_step(&self, value: i64) {
        self.shared.binding.set(Some(value));
    }

    pub fn current_step(&self) -> i64 {
        self.shared.engine.borrow().current_step()
    }

    /// Resume the tour, or restart it when it already finished. Returns the
    /// selected key.
    pub fn open_tour(&self) -> i64 {
        let start = self.shared.engine.borrow().start_key();
        // An unchanged binding does not notify, so select directly.
        if !self.shared.binding.set(Some(start)) {
            self.shared.on_binding_changed(Some(start));
        }
        start
    }

    /// Cancel the tour: hide every step and run the post-tour callbacks.
    pub fn close_tour(&self) {
        self.shared.close_tour();
    }

    /// Advance to the following key. Past the last step this finishes the
    /// tour.
    pub fn next_step(&self) {
        self.set_current_step(self.current_step().saturating_add(1));
    }

    pub fn previous_step(&self) {
        self.set_current_step(self.current_step().saturating_sub(1));
    }

    pub fn is_first_step(&self) -> bool {
        self.shared.engine.borrow().is_first_step()
    }

    pub fn is_last_step(&self) -> bool {
        self.shared.engine.borrow().is_last_step()
    }

    pub fn phase(&self) -> TourPhase {
        self.shared.engine.borrow().phase()
    }

    pub fn binding(&self) -> &StepBinding {
        &self.shared.binding
    }

    pub fn config(&self) -> &TourConfig {
        &self.shared.config
    }

    /// Run `f` with read access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&TourEngine) -> R) -> R {
        f(&self.shared.engine.borrow())
    }

    /// Snapshot of the backdrop and highlight state.
    pub fn overlay(&self) -> OverlayController {
        self.shared.overlay.borrow().clone()
    }

    pub fn viewport(&self) -> &Rc<Viewport> {
        &self.shared.viewport
    }
}
