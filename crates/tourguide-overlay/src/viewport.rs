#![forbid(unsafe_code)]

//! Page viewport: scroll offset, size, and namespaced resize listeners.
//!
//! Tips bind a listener under their own namespace (`resize.<tip id>`) while
//! shown and unbind it when hidden or dropped, so listeners never outlive
//! the tip that registered them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::geometry::{Position, Size};

type Listener = Rc<dyn Fn()>;

/// Shared page state.
#[derive(Default)]
pub struct Viewport {
    scroll: Cell<Position>,
    size: Cell<Size>,
    listeners: RefCell<Vec<(String, Listener)>>,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("scroll", &self.scroll.get())
            .field("size", &self.size.get())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            size: Cell::new(size),
            ..Self::default()
        }
    }

    /// Listener namespace for a tip.
    pub fn resize_namespace(tip_id: u64) -> String {
        format!("resize.{tip_id}")
    }

    /// Vertical scroll offset of the page.
    pub fn page_y_offset(&self) -> f64 {
        self.scroll.get().top
    }

    pub fn page_x_offset(&self) -> f64 {
        self.scroll.get().left
    }

    pub fn scroll_position(&self) -> Position {
        self.scroll.get()
    }

    /// Jump the page scroll offset, clamped at zero.
    pub fn set_scroll(&self, position: Position) {
        self.scroll
            .set(Position::new(position.top.max(0.0), position.left.max(0.0)));
    }

    pub fn size(&self) -> Size {
        self.size.get()
    }

    /// Register `listener` under `namespace`, replacing any listener already
    /// bound there.
    pub fn bind_resize(&self, namespace: impl Into<String>, listener: impl Fn() + 'static) {
        let namespace = namespace.into();
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|(ns, _)| *ns != namespace);
        listeners.push((namespace, Rc::new(listener)));
    }

    /// Remove the listener under `namespace`. Returns whether one was bound.
    pub fn unbind_resize(&self, namespace: &str) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(ns, _)| ns != namespace);
        listeners.len() != before
    }

    pub fn is_bound(&self, namespace: &str) -> bool {
        self.listeners.borrow().iter().any(|(ns, _)| ns == namespace)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Record a new size and run every resize listener.
    pub fn resize(&self, size: Size) {
        self.size.set(size);
        self.dispatch_resize();
    }

    /// Run every resize listener in registration order.
    pub fn dispatch_resize(&self) {
        // Snapshot first: listeners may bind or unbind while running.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        trace!(count = listeners.len(), "dispatching resize");
        for listener in listeners {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_dispatch_unbind() {
        let viewport = Viewport::new(Size::new(800.0, 600.0));
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        viewport.bind_resize(Viewport::resize_namespace(3), move || h.set(h.get() + 1));

        viewport.resize(Size::new(1024.0, 768.0));
        assert_eq!(hits.get(), 1);
        assert_eq!(viewport.size(), Size::new(1024.0, 768.0));

        assert!(viewport.unbind_resize("resize.3"));
        assert!(!viewport.unbind_resize("resize.3"));
        viewport.dispatch_resize();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn rebinding_namespace_replaces_listener() {
        let viewport = Viewport::default();
        let hits = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let h = Rc::clone(&hits);
            viewport.bind_resize("resize.1", move || h.set(h.get() + 1));
        }
        assert_eq!(viewport.listener_count(), 1);
        viewport.dispatch_resize();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listener_may_unbind_itself() {
        let viewport = Rc::new(Viewport::default());
        let v = Rc::clone(&viewport);
        viewport.bind_resize("resize.9", move || {
            v.unbind_resize("resize.9");
        });
        viewport.dispatch_resize();
        assert!(!viewport.is_bound("resize.9"));
    }

    #[test]
    fn scroll_clamps_at_zero() {
        let viewport = Viewport::default();
        viewport.set_scroll(Position::new(-50.0, 20.0));
        assert_eq!(viewport.page_y_offset(), 0.0);
        assert_eq!(viewport.page_x_offset(), 20.0);
    }
}
