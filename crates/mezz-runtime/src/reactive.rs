#![forbid(unsafe_code)]

//! Reactive state: a shared value that tells its consumers when it changes.
//!
//! [`Observable<T>`] is what the tracker commits sizes into. Consumers either
//! read it on their own schedule ([`Observable::get`], [`Observable::version`]
//! for dirty checks) or [`subscribe`](Observable::subscribe) to re-evaluate
//! their breakpoints as soon as a new size lands.
//!
//! # Invariants
//!
//! 1. Setting a value equal to the current one does nothing: no version bump,
//!    no notification.
//! 2. Each change bumps the version by exactly one.
//! 3. Subscribers run in registration order, after the value is stored, with
//!    no borrow held. They may read the observable and may set it again; a
//!    nested change notifies every subscriber with the newer value before the
//!    outer notification continues with the value it started with.
//! 4. A dropped [`Subscription`] is never called again.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct State<T> {
    value: T,
    version: u64,
    listeners: Vec<Weak<dyn Fn(&T)>>,
}

/// Shared, version-tracked value with change notification.
///
/// Clones are handles to the same state.
pub struct Observable<T> {
    state: Rc<RefCell<State<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Observable")
            .field("value", &state.value)
            .field("version", &state.version)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.state.borrow().value.clone()
    }

    /// Store `value` and notify subscribers if it differs from the current
    /// one. Returns whether it changed. Safe to call from a subscriber.
    pub fn set(&self, value: T) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.value == value {
                return false;
            }
            state.value = value;
            state.version += 1;
        }
        self.notify();
        true
    }

    /// Register `callback` to run after every change.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let listener: Listener<T> = Rc::new(callback);
        self.state
            .borrow_mut()
            .listeners
            .push(Rc::downgrade(&listener));
        Subscription {
            _listener: Box::new(listener),
        }
    }

    /// Number of changes since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    /// Registered listeners, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn notify(&self) {
        let (listeners, value) = {
            let mut state = self.state.borrow_mut();
            state.listeners.retain(|weak| weak.strong_count() > 0);
            let live: Vec<Listener<T>> = state.listeners.iter().filter_map(Weak::upgrade).collect();
            (live, state.value.clone())
        };
        for listener in &listeners {
            listener(&value);
        }
    }
}

/// Keeps a subscriber alive. Dropping it unsubscribes.
pub struct Subscription {
    _listener: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
