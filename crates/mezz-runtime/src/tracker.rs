#![forbid(unsafe_code)]

//! Throttled size tracking for one observed element.
//!
//! A [`SizeTracker`] owns at most one observation at a time. Raw sizes from
//! the [`SizeSource`] go through a [`Throttle`]; the host loop commits the
//! survivors with [`SizeTracker::tick`], which stores them in an
//! [`Observable`] that consumers read or subscribe to.
//!
//! # Invariants
//!
//! 1. One subscription per attachment. Binding the same target again is a
//!    no-op; binding a different one replaces the subscription.
//! 2. Detaching cancels the pending size and clears the committed one.
//! 3. Callbacks from a previous attachment are ignored.
//! 4. A tracker created with a fixed target ignores its [`AttachHandle`].
//! 5. After the tracker is dropped no callback reaches any state.

use crate::geometry::{BoxSizing, Size};
use crate::reactive::{Observable, Subscription};
use crate::source::{Observation, ResizeCallback, SizeSource};
use crate::throttle::{Throttle, ThrottleAction};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default throttle interval.
pub const DEFAULT_THROTTLE_WAIT: Duration = Duration::from_millis(500);

/// Configuration for a [`SizeTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Minimum spacing between committed sizes.
    pub throttle_wait: Duration,
    /// Box model requested from the source.
    pub box_sizing: BoxSizing,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            throttle_wait: DEFAULT_THROTTLE_WAIT,
            box_sizing: BoxSizing::BorderBox,
        }
    }
}

impl TrackerConfig {
    /// Set the throttle interval.
    #[must_use]
    pub fn with_throttle_wait(mut self, wait: Duration) -> Self {
        self.throttle_wait = wait;
        self
    }

    /// Set the throttle interval in milliseconds.
    #[must_use]
    pub fn with_throttle_wait_ms(self, ms: u64) -> Self {
        self.with_throttle_wait(Duration::from_millis(ms))
    }

    /// Set the box model.
    #[must_use]
    pub fn with_box_sizing(mut self, box_sizing: BoxSizing) -> Self {
        self.box_sizing = box_sizing;
        self
    }
}

struct Gate {
    throttle: Throttle<Size>,
    /// Bumped on every attach/detach so stale callbacks can tell.
    epoch: u64,
}

impl Gate {
    fn reset(&mut self) -> u64 {
        self.epoch += 1;
        self.throttle.cancel();
        self.epoch
    }
}

struct Binding<T> {
    target: T,
    _observation: Observation,
}

struct Core<S: SizeSource> {
    source: S,
    box_sizing: BoxSizing,
    fixed_target: bool,
    binding: Option<Binding<S::Target>>,
}

struct Shared<S: SizeSource> {
    core: RefCell<Core<S>>,
    gate: Rc<RefCell<Gate>>,
    size: Observable<Option<Size>>,
}

impl<S: SizeSource> Shared<S> {
    fn attach(&self, target: S::Target) {
        let replaced = {
            let mut core = self.core.borrow_mut();
            if core.binding.as_ref().is_some_and(|b| b.target == target) {
                trace!(element = ?target, "Element already observed");
                return;
            }
            let replaced = core.binding.take().is_some();
            let epoch = self.gate.borrow_mut().reset();
            let callback = self.resize_callback(epoch);
            let box_sizing = core.box_sizing;
            let observation = core.source.observe(&target, box_sizing, callback);
            debug!(element = ?target, ?box_sizing, "Observing element");
            core.binding = Some(Binding {
                target,
                _observation: observation,
            });
            replaced
        };
        if replaced {
            self.size.set(None);
        }
    }

    fn detach(&self) -> bool {
        let Some(binding) = self.core.borrow_mut().binding.take() else {
            return false;
        };
        self.gate.borrow_mut().reset();
        debug!(element = ?binding.target, "Detached element");
        drop(binding);
        self.size.set(None);
        true
    }

    fn resize_callback(&self, epoch: u64) -> ResizeCallback {
        let weak_gate = Rc::downgrade(&self.gate);
        Box::new(move |size: Size| {
            let Some(gate) = weak_gate.upgrade() else {
                return;
            };
            let mut gate = gate.borrow_mut();
            if gate.epoch != epoch {
                trace!("Dropped resize from stale observation");
                return;
            }
            match gate.throttle.offer(size) {
                ThrottleAction::Scheduled { .. } => {
                    trace!(width = size.width, height = size.height, "Resize scheduled");
                }
                ThrottleAction::Coalesced => {
                    trace!(width = size.width, height = size.height, "Resize coalesced");
                }
                ThrottleAction::Held => {
                    trace!(width = size.width, height = size.height, "Resize held indefinitely");
                }
            }
        })
    }
}

/// Latest throttled `{width, height}` of one observed element.
pub struct SizeTracker<S: SizeSource> {
    shared: Rc<Shared<S>>,
}

impl<S: SizeSource> SizeTracker<S> {
    /// Tracker that observes whatever its [`AttachHandle`] is bound to.
    pub fn new(source: S, config: TrackerConfig) -> Self {
        Self::build(source, config, false)
    }

    /// Tracker observing `target` for its whole lifetime. Its handle is inert.
    pub fn with_target(source: S, target: S::Target, config: TrackerConfig) -> Self {
        let tracker = Self::build(source, config, true);
        tracker.shared.attach(target);
        tracker
    }

    fn build(source: S, config: TrackerConfig, fixed_target: bool) -> Self {
        Self {
            shared: Rc::new(Shared {
                core: RefCell::new(Core {
                    source,
                    box_sizing: config.box_sizing,
                    fixed_target,
                    binding: None,
                }),
                gate: Rc::new(RefCell::new(Gate {
                    throttle: Throttle::new(config.throttle_wait),
                    epoch: 0,
                })),
                size: Observable::new(None),
            }),
        }
    }

    /// Handle for binding the element to observe.
    #[must_use]
    pub fn handle(&self) -> AttachHandle<S> {
        AttachHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Stop observing, discard pending and committed sizes. Works for fixed
    /// targets too. Returns whether anything was attached.
    pub fn detach(&self) -> bool {
        self.shared.detach()
    }

    /// Whether an element is currently observed.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.shared.core.borrow().binding.is_some()
    }

    /// The currently observed element.
    #[must_use]
    pub fn target(&self) -> Option<S::Target> {
        self.shared
            .core
            .borrow()
            .binding
            .as_ref()
            .map(|b| b.target.clone())
    }

    /// Last committed size; `None` before the first commit or after detach.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.shared.size.get()
    }

    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.size().map(|s| s.width)
    }

    #[must_use]
    pub fn height(&self) -> Option<f64> {
        self.size().map(|s| s.height)
    }

    /// Number of committed size changes, for dirty checks.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.size.version()
    }

    /// Run `callback` after every committed size change.
    pub fn subscribe(&self, callback: impl Fn(&Option<Size>) + 'static) -> Subscription {
        self.shared.size.subscribe(callback)
    }

    pub fn tick(&self) -> Option<Size> {
        self.tick_at(Instant::now())
    }

    /// Commit the pending size if its window closed by `now` (for
    /// deterministic testing).
    pub fn tick_at(&self, now: Instant) -> Option<Size> {
        let size = self.shared.gate.borrow_mut().throttle.tick_at(now)?;
        debug!(width = size.width, height = size.height, "Size committed");
        self.shared.size.set(Some(size));
        Some(size)
    }

    /// When the pending size will be due, if one is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.shared.gate.borrow().throttle.deadline()
    }

    /// Time left until the pending size is due.
    #[must_use]
    pub fn time_until_commit(&self, now: Instant) -> Option<Duration> {
        self.shared.gate.borrow().throttle.time_until_fire(now)
    }

    #[must_use]
    pub fn throttle_wait(&self) -> Duration {
        self.shared.gate.borrow().throttle.interval()
    }

    /// Change the throttle interval. Takes effect immediately; a size pending
    /// under the old interval is dropped.
    pub fn set_throttle_wait(&self, wait: Duration) {
        let mut gate = self.shared.gate.borrow_mut();
        if gate.throttle.interval() == wait {
            return;
        }
        let dropped = gate.throttle.reconfigure(wait);
        debug!(
            throttle_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            dropped_pending = dropped.is_some(),
            "Throttle interval changed"
        );
    }

    #[must_use]
    pub fn box_sizing(&self) -> BoxSizing {
        self.shared.core.borrow().box_sizing
    }
}

impl<S: SizeSource> fmt::Debug for SizeTracker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.shared.core.borrow();
        f.debug_struct("SizeTracker")
            .field("target", &core.binding.as_ref().map(|b| &b.target))
            .field("fixed_target", &core.fixed_target)
            .field("size", &self.shared.size.get())
            .field("throttle", &self.shared.gate.borrow().throttle)
            .finish()
    }
}

/// Binds the element a [`SizeTracker`] observes.
///
/// Cheap to clone and safe to call on every render: binding the current
/// target again does nothing. Does not keep the tracker alive.
pub struct AttachHandle<S: SizeSource> {
    shared: Weak<Shared<S>>,
}

impl<S: SizeSource> Clone for AttachHandle<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S: SizeSource> AttachHandle<S> {
    /// Observe `Some(target)`, or detach on `None`. Ignored when the tracker
    /// has a fixed target or no longer exists.
    pub fn bind(&self, target: Option<S::Target>) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        if shared.core.borrow().fixed_target {
            trace!("Ignoring bind on tracker with a fixed target");
            return;
        }
        match target {
            Some(target) => shared.attach(target),
            None => {
                shared.detach();
            }
        }
    }

    /// Whether the tracker behind this handle still exists.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl<S: SizeSource> fmt::Debug for AttachHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachHandle")
            .field("live", &self.is_live())
            .finish()
    }
}
