//! Viewport width signal.
//!
//! The chart width depends on the width of its container, so the chart view
//! subscribes to width changes while it is mounted. A [`Subscription`] is a
//! guard: dropping it deregisters the listener, so a torn-down view never
//! leaves a handler behind.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::analysis::scale::DEFAULT_VIEWPORT_WIDTH;

type Listener = Box<dyn FnMut(u32)>;

struct Inner {
    width: u32,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    /// Ids dropped while their listener was being notified
    pending_removal: Vec<u64>,
}

/// Current viewport width plus the listeners interested in it
#[derive(Clone)]
pub struct ViewportSignal {
    inner: Rc<RefCell<Inner>>,
}

impl Default for ViewportSignal {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH)
    }
}

impl ViewportSignal {
    pub fn new(width: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                width,
                next_id: 0,
                listeners: Vec::new(),
                pending_removal: Vec::new(),
            })),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.borrow().width
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Register a listener; it stays registered until the returned guard drops
    #[must_use = "dropping the subscription deregisters the listener immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(u32) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));

        Subscription {
            id,
            signal: Rc::downgrade(&self.inner),
        }
    }

    /// Report a new width. Listeners only hear about actual changes.
    pub fn set_width(&self, width: u32) {
        let mut listeners = {
            let mut inner = self.inner.borrow_mut();
            if inner.width == width {
                return;
            }
            inner.width = width;
            std::mem::take(&mut inner.listeners)
        };

        tracing::debug!("Viewport width changed to {}px", width);
        for (_, listener) in listeners.iter_mut() {
            listener(width);
        }

        let mut inner = self.inner.borrow_mut();
        // Keep listeners subscribed during notification
        listeners.append(&mut inner.listeners);
        let removed = std::mem::take(&mut inner.pending_removal);
        listeners.retain(|(id, _)| !removed.contains(id));
        inner.listeners = listeners;
    }
}

/// Guard for a registered viewport listener
pub struct Subscription {
    id: u64,
    signal: Weak<RefCell<Inner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.signal.upgrade() else {
            return;
        };
        let Ok(mut inner) = inner.try_borrow_mut() else {
            return;
        };
        let before = inner.listeners.len();
        inner.listeners.retain(|(id, _)| *id != self.id);
        if inner.listeners.len() == before {
            inner.pending_removal.push(self.id);
        }
    }
}

/// Latest viewport width as seen by one mounted view
pub struct ViewportTracker {
    width: Rc<Cell<u32>>,
    _subscription: Subscription,
}

impl ViewportTracker {
    /// Start tracking; the current width is read immediately
    pub fn mount(signal: &ViewportSignal) -> Self {
        let width = Rc::new(Cell::new(signal.width()));
        let target = Rc::clone(&width);
        let subscription = signal.subscribe(move |w| target.set(w));

        Self {
            width,
            _subscription: subscription,
        }
    }

    pub fn width(&self) -> u32 {
        self.width.get()
    }
}
