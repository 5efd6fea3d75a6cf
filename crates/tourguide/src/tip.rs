#![forbid(unsafe_code)]

//! Per-tip host: one callout bound to a target element.
//!
//! A [`TipHost`] registers its [`Step`] with the tour engine on creation.
//! It does not react to the step right away: after [`WATCH_DELAY`] a
//! one-shot timer attaches a watch on the step's `visible` flag, so the
//! surface has time to mount. From then on `visible == true` shows and
//! positions the tip, and `visible == false` hides it.
//!
//! # Lifecycle
//!
//! ```text
//!   register ──▶ waiting ──(500 ms)──▶ watching ──▶ shown ⇄ hidden
//!                   │                     │
//!                   └────── drop ─────────┴──▶ removed
//! ```
//!
//! Dropping the host cancels a pending timer, releases the watch, unbinds
//! the resize listener, and removes the surface.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tourguide_core::{Placement, Step, Subscription, TourConfig, parse_step_index};
use tourguide_overlay::{
    HighlightFrame, OverlayController, ScrollRequest, ScrollService, Scheduler, TargetElement,
    TimerId, TipMetrics, TipSurface, Viewport, tip_position,
};
use tracing::{debug, trace};

/// Delay before a tip starts watching its step.
pub const WATCH_DELAY: Duration = Duration::from_millis(500);

/// Vertical scroll offset used when bringing a tip into view.
pub const SCROLL_OFFSET_Y: f64 = -200.0;
/// Horizontal scroll offset used when bringing a tip into view.
pub const SCROLL_OFFSET_X: f64 = -300.0;

/// Raw attributes of a tip as written by the page author.
///
/// Numeric attributes keep their source text; they are parsed leniently when
/// resolved against a [`TourConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TipAttributes {
    pub content: String,
    pub title: Option<String>,
    pub placement: Option<String>,
    pub next_label: Option<String>,
    pub previous_label: Option<String>,
    pub finish_label: Option<String>,
    pub offset: Option<String>,
    pub step: Option<String>,
}

impl TipAttributes {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn placement(mut self, placement: impl Into<String>) -> Self {
        self.placement = Some(placement.into());
        self
    }

    #[must_use]
    pub fn next_label(mut self, label: impl Into<String>) -> Self {
        self.next_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn previous_label(mut self, label: impl Into<String>) -> Self {
        self.previous_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn finish_label(mut self, label: impl Into<String>) -> Self {
        self.finish_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    #[must_use]
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Requested step key, if the step attribute starts with an integer.
    pub fn step_index(&self) -> Option<i64> {
        self.step.as_deref().and_then(parse_step_index)
    }

    /// Fill unset attributes from `config`.
    ///
    /// An unknown placement falls back to the configured one. An offset that
    /// does not parse, or parses to `0`, falls back to the configured offset.
    pub fn resolve(&self, config: &TourConfig) -> TipSettings {
        let placement = self
            .placement
            .as_deref()
            .map_or(config.placement, |p| Placement::parse_or(p, config.placement));
        let offset = self
            .offset
            .as_deref()
            .and_then(parse_step_index)
            .filter(|v| *v != 0)
            .map_or(config.offset, |v| v as f64);
        let label = |own: &Option<String>, fallback: &str| {
            own.clone().unwrap_or_else(|| fallback.to_owned())
        };
        TipSettings {
            content: self.content.clone(),
            title: self.title.clone(),
            placement,
            next_label: label(&self.next_label, &config.next_label),
            previous_label: label(&self.previous_label, &config.previous_label),
            finish_label: label(&self.finish_label, &config.finish_label),
            offset,
            animation: config.animation,
            scroll_speed: config.scroll_speed_duration(),
        }
    }
}

/// Tip attributes with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct TipSettings {
    pub content: String,
    pub title: Option<String>,
    pub placement: Placement,
    pub next_label: String,
    pub previous_label: String,
    pub finish_label: String,
    pub offset: f64,
    pub animation: bool,
    pub scroll_speed: Duration,
}

/// Services a tip borrows from its tour host.
pub(crate) struct TipContext {
    pub(crate) overlay: Rc<RefCell<OverlayController>>,
    pub(crate) viewport: Rc<Viewport>,
    pub(crate) scroll: Rc<dyn ScrollService>,
    pub(crate) scheduler: Rc<dyn Scheduler>,
}

struct TipShared {
    id: u64,
    settings: TipSettings,
    target: Rc<dyn TargetElement>,
    surface: RefCell<TipSurface>,
    overlay: Rc<RefCell<OverlayController>>,
    viewport: Rc<Viewport>,
    scroll: Rc<dyn ScrollService>,
    watch: RefCell<Option<Subscription>>,
}

impl TipShared {
    fn namespace(&self) -> String {
        Viewport::resize_namespace(self.id)
    }

    fn show(self: &Rc<Self>) {
        if self.settings.content.is_empty() {
            trace!(tip = self.id, "tip has no content, not shown");
            return;
        }
        self.surface.borrow_mut().show(self.settings.animation);

        let weak = Rc::downgrade(self);
        self.viewport.bind_resize(self.namespace(), move || {
            if let Some(tip) = weak.upgrade() {
                tip.update_position();
            }
        });
        self.update_position();
        debug!(tip = self.id, "tip shown");
    }

    fn update_position(&self) {
        let target = self.target.bounding_rect();
        let page_y = self.viewport.page_y_offset();
        self.target.set_raised(true);

        let frame = HighlightFrame::around(target, page_y);
        self.overlay.borrow_mut().set_highlight(frame);

        let position = {
            let mut surface = self.surface.borrow_mut();
            surface.set_blocker(frame);
            let position = tip_position(
                self.settings.placement,
                target,
                page_y,
                surface.metrics(),
                self.settings.offset,
            );
            surface.set_position(position);
            position
        };
        trace!(tip = self.id, top = position.top, left = position.left, "tip positioned");

        self.scroll.scroll_to(ScrollRequest::new(
            Some(position),
            SCROLL_OFFSET_Y,
            SCROLL_OFFSET_X,
            self.settings.scroll_speed,
        ));
    }

    fn hide(&self) {
        self.surface.borrow_mut().hide();
        self.target.set_raised(false);
        self.viewport.unbind_resize(&self.namespace());
        trace!(tip = self.id, "tip hidden");
    }

    fn attach_watch(self: &Rc<Self>, step: &Step) {
        let weak: Weak<Self> = Rc::downgrade(self);
        let subscription = step.watch_visibility(move |visible| {
            if let Some(tip) = weak.upgrade() {
                if visible {
                    tip.show();
                } else {
                    tip.hide();
                }
            }
        });
        *self.watch.borrow_mut() = Some(subscription);
        debug!(tip = self.id, visible = step.is_visible(), "tip watching step");

        if step.is_visible() {
            self.show();
        } else {
            self.hide();
        }
    }
}

/// One registered tip. Created by [`TourHost::register_tip`](crate::TourHost::register_tip).
pub struct TipHost {
    shared: Rc<TipShared>,
    step: Step,
    key: i64,
    scheduler: Rc<dyn Scheduler>,
    timer: Option<TimerId>,
}

impl std::fmt::Debug for TipHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TipHost")
            .field("id", &self.shared.id)
            .field("key", &self.key)
            .field("visible", &self.step.is_visible())
            .field("watching", &self.is_watching())
            .finish_non_exhaustive()
    }
}

impl TipHost {
    pub(crate) fn new(
        id: u64,
        key: i64,
        step: Step,
        settings: TipSettings,
        target: Rc<dyn TargetElement>,
        metrics: TipMetrics,
        context: TipContext,
    ) -> Self {
        let shared = Rc::new(TipShared {
            id,
            settings,
            target,
            surface: RefCell::new(TipSurface::new(metrics)),
            overlay: context.overlay,
            viewport: context.viewport,
            scroll: context.scroll,
            watch: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        let watched = step.clone();
        let timer = context.scheduler.schedule_once(
            WATCH_DELAY,
            Box::new(move || {
                if let Some(tip) = weak.upgrade() {
                    tip.attach_watch(&watched);
                }
            }),
        );

        Self {
            shared,
            step,
            key,
            scheduler: context.scheduler,
            timer: Some(timer),
        }
    }

    /// Key the step was registered under.
    pub fn key(&self) -> i64 {
        self.key
    }

    pub fn id(&self) -> u64 {
        self.shared.id
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn settings(&self) -> &TipSettings {
        &self.shared.settings
    }

    /// Whether the deferred visibility watch is attached.
    pub fn is_watching(&self) -> bool {
        self.shared.watch.borrow().is_some()
    }

    /// Snapshot of the tip surface for rendering.
    pub fn surface(&self) -> TipSurface {
        self.shared.surface.borrow().clone()
    }

    /// Update the measured tip size and re-place it if shown.
    pub fn set_metrics(&self, metrics: TipMetrics) {
        let attached = {
            let mut surface = self.shared.surface.borrow_mut();
            surface.set_metrics(metrics);
            surface.is_attached()
        };
        if attached {
            self.shared.update_position();
        }
    }

    /// Show the tip now, regardless of the step's visibility.
    pub fn show(&self) {
        self.shared.show();
    }

    pub fn hide(&self) {
        self.shared.hide();
    }
}

impl Drop for TipHost {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }
        self.shared.watch.borrow_mut().take();
        self.shared.viewport.unbind_resize(&self.shared.namespace());
        self.shared.target.set_raised(false);
        self.shared.surface.borrow_mut().remove();
        debug!(tip = self.shared.id, key = self.key, "tip removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_takes_config_defaults() {
        let config = TourConfig::default();
        let settings = TipAttributes::new("Hello").resolve(&config);
        assert_eq!(settings.placement, Placement::Top);
        assert_eq!(settings.next_label, "Next");
        assert_eq!(settings.previous_label, "Previous");
        assert_eq!(settings.finish_label, "Finish");
        assert_eq!(settings.offset, 28.0);
        assert!(settings.animation);
        assert_eq!(settings.scroll_speed, Duration::from_millis(500));
    }

    #[test]
    fn resolve_prefers_tip_attributes() {
        let config = TourConfig::default();
        let settings = TipAttributes::new("Hello")
            .title("Intro")
            .placement("left")
            .next_label("Go")
            .offset("12px")
            .resolve(&config);
        assert_eq!(settings.title.as_deref(), Some("Intro"));
        assert_eq!(settings.placement, Placement::Left);
        assert_eq!(settings.next_label, "Go");
        assert_eq!(settings.offset, 12.0);
    }

    #[test]
    fn zero_or_garbage_offset_falls_back() {
        let config = TourConfig::default().offset(40.0);
        for raw in ["0", "abc", ""] {
            let settings = TipAttributes::new("x").offset(raw).resolve(&config);
            assert_eq!(settings.offset, 40.0, "offset {raw:?}");
        }
    }

    #[test]
    fn unknown_placement_uses_config() {
        let config = TourConfig::default().placement(Placement::Bottom);
        let settings = TipAttributes::new("x").placement("diagonal").resolve(&config);
        assert_eq!(settings.placement, Placement::Bottom);
    }

    #[test]
    fn step_attribute_parses_leniently() {
        assert_eq!(TipAttributes::new("x").step("3").step_index(), Some(3));
        assert_eq!(TipAttributes::new("x").step(" 2nd").step_index(), Some(2));
        assert_eq!(TipAttributes::new("x").step("later").step_index(), None);
        assert_eq!(TipAttributes::new("x").step_index(), None);
    }
}
