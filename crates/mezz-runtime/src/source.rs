#![forbid(unsafe_code)]

//! The seam to whatever measures elements.
//!
//! A [`SizeSource`] watches a target and calls back with its size whenever it
//! changes. The tracker never measures anything itself.
//!
//! [`ManualSource`] is an in-process source for hosts that already know their
//! sizes (a terminal reporting resize events, a test) and push them in.
//!
//! # Failure Modes
//!
//! - **Re-entrant resize**: calling [`ManualSource::resize`] from inside one
//!   of its own callbacks panics (`RefCell` borrow rules).

use crate::geometry::{BoxSizing, Size};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked with each new size.
pub type ResizeCallback = Box<dyn FnMut(Size)>;

/// Something that can report size changes for a target.
pub trait SizeSource {
    /// What gets observed: an element id, a node handle, a window.
    type Target: Clone + PartialEq + fmt::Debug;

    /// Start observing `target`. Sizes are delivered to `on_resize` until the
    /// returned [`Observation`] is dropped.
    fn observe(
        &mut self,
        target: &Self::Target,
        sizing: BoxSizing,
        on_resize: ResizeCallback,
    ) -> Observation;
}

/// RAII guard for one observation. Dropping it detaches.
pub struct Observation {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Observation {
    /// Guard that runs `detach` when dropped.
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Guard with nothing to clean up.
    #[must_use]
    pub fn noop() -> Self {
        Self { detach: None }
    }
}

impl Drop for Observation {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observation")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

struct Watcher<T> {
    id: u64,
    target: T,
    sizing: BoxSizing,
    on_resize: ResizeCallback,
}

struct Registry<T> {
    next_id: u64,
    watchers: Vec<Watcher<T>>,
}

/// Size source driven by the host. Clones share the same watchers.
pub struct ManualSource<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for ManualSource<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T> Default for ManualSource<T> {
    fn default() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                watchers: Vec::new(),
            })),
        }
    }
}

impl<T> fmt::Debug for ManualSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualSource")
            .field("watchers", &self.registry.borrow().watchers.len())
            .finish()
    }
}

impl<T: PartialEq> ManualSource<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a new size for `target` to everyone observing it. Returns how
    /// many callbacks ran.
    pub fn resize(&self, target: &T, size: Size) -> usize {
        let mut registry = self.registry.borrow_mut();
        let mut delivered = 0;
        for watcher in registry.watchers.iter_mut().filter(|w| w.target == *target) {
            (watcher.on_resize)(size);
            delivered += 1;
        }
        delivered
    }

    /// Number of live observations.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.registry.borrow().watchers.len()
    }

    /// Whether `target` is observed with the given box model.
    #[must_use]
    pub fn is_observing(&self, target: &T, sizing: BoxSizing) -> bool {
        self.registry
            .borrow()
            .watchers
            .iter()
            .any(|w| w.target == *target && w.sizing == sizing)
    }
}

impl<T> SizeSource for ManualSource<T>
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    type Target = T;

    fn observe(&mut self, target: &T, sizing: BoxSizing, on_resize: ResizeCallback) -> Observation {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.watchers.push(Watcher {
                id,
                target: target.clone(),
                sizing,
                on_resize,
            });
            id
        };

        let registry: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Observation::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().watchers.retain(|w| w.id != id);
            }
        })
    }
}
