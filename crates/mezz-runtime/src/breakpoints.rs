#![forbid(unsafe_code)]

//! Breakpoints for an observed element: a [`SizeTracker`] plus per-axis rule
//! sets, resolved on demand.
//!
//! Width and height are independent. Either rule set may be absent (its
//! resolution is then empty), but not both.
//!
//! ```
//! use mezz_layout::RuleSet;
//! use mezz_runtime::{BreakpointTracker, Error, ManualSource, TrackerConfig};
//!
//! let source = ManualSource::<u32>::new();
//! let err = BreakpointTracker::<_, &str, &str>::new(
//!     source,
//!     None,
//!     None,
//!     TrackerConfig::default().with_throttle_wait_ms(100),
//! )
//! .unwrap_err();
//! assert_eq!(err, Error::NoBreakpoints);
//! ```

use crate::error::Error;
use crate::geometry::Size;
use crate::reactive::Subscription;
use crate::source::SizeSource;
use crate::tracker::{AttachHandle, SizeTracker, TrackerConfig};
use mezz_layout::{Axis, Breakpoint, BreakpointError, Resolution, Resolver, RuleSet};
use std::fmt;
use std::time::{Duration, Instant};

/// Both axes resolved against the current size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<W, H> {
    pub width: Resolution<W>,
    pub height: Resolution<H>,
}

/// Throttled size tracking with width and/or height breakpoints.
pub struct BreakpointTracker<S: SizeSource, W = Breakpoint, H = Breakpoint> {
    tracker: SizeTracker<S>,
    width: Option<RuleSet<W>>,
    height: Option<RuleSet<H>>,
    resolver: Resolver,
}

impl<S: SizeSource, W, H> BreakpointTracker<S, W, H> {
    /// Tracker for an element bound later through [`handle`](Self::handle).
    ///
    /// # Errors
    ///
    /// [`Error::NoBreakpoints`] if both rule sets are `None`. Nothing is
    /// observed in that case.
    pub fn new(
        source: S,
        width: Option<RuleSet<W>>,
        height: Option<RuleSet<H>>,
        config: TrackerConfig,
    ) -> Result<Self, Error> {
        check_rules(width.as_ref(), height.as_ref())?;
        Ok(Self::assemble(SizeTracker::new(source, config), width, height))
    }

    /// Tracker observing `target` for its whole lifetime.
    ///
    /// # Errors
    ///
    /// [`Error::NoBreakpoints`] if both rule sets are `None`. `target` is not
    /// observed in that case.
    pub fn with_target(
        source: S,
        target: S::Target,
        width: Option<RuleSet<W>>,
        height: Option<RuleSet<H>>,
        config: TrackerConfig,
    ) -> Result<Self, Error> {
        check_rules(width.as_ref(), height.as_ref())?;
        let tracker = SizeTracker::with_target(source, target, config);
        Ok(Self::assemble(tracker, width, height))
    }

    fn assemble(
        tracker: SizeTracker<S>,
        width: Option<RuleSet<W>>,
        height: Option<RuleSet<H>>,
    ) -> Self {
        Self {
            tracker,
            width,
            height,
            resolver: Resolver::new(),
        }
    }

    /// Use a resolver with a different guard band.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace both rule sets.
    ///
    /// # Errors
    ///
    /// [`Error::NoBreakpoints`] if both are `None`; the current rules are kept.
    pub fn set_rules(
        &mut self,
        width: Option<RuleSet<W>>,
        height: Option<RuleSet<H>>,
    ) -> Result<(), Error> {
        check_rules(width.as_ref(), height.as_ref())?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    #[must_use]
    pub fn width_rules(&self) -> Option<&RuleSet<W>> {
        self.width.as_ref()
    }

    #[must_use]
    pub fn height_rules(&self) -> Option<&RuleSet<H>> {
        self.height.as_ref()
    }

    /// The underlying size tracker.
    #[must_use]
    pub fn tracker(&self) -> &SizeTracker<S> {
        &self.tracker
    }

    /// Handle for binding the element to observe.
    #[must_use]
    pub fn handle(&self) -> AttachHandle<S> {
        self.tracker.handle()
    }

    /// Last committed size.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.tracker.size()
    }

    pub fn tick(&self) -> Option<Size> {
        self.tracker.tick()
    }

    pub fn tick_at(&self, now: Instant) -> Option<Size> {
        self.tracker.tick_at(now)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tracker.next_deadline()
    }

    pub fn set_throttle_wait(&self, wait: Duration) {
        self.tracker.set_throttle_wait(wait);
    }

    /// Run `callback` whenever a new size is committed, so breakpoints can be
    /// re-resolved.
    pub fn subscribe(&self, callback: impl Fn(&Option<Size>) + 'static) -> Subscription {
        self.tracker.subscribe(callback)
    }

    fn resolve_axis<K>(
        &self,
        axis: Axis,
        rules: Option<&RuleSet<K>>,
    ) -> Result<Resolution<K>, BreakpointError>
    where
        K: Clone + fmt::Display,
    {
        let Some(rules) = rules else {
            return Ok(Resolution::empty());
        };
        let size = self.tracker.size().map(|s| s.along(axis));
        self.resolver.resolve(axis, size, rules)
    }
}

impl<S, W, H> BreakpointTracker<S, W, H>
where
    S: SizeSource,
    W: Clone + fmt::Display,
    H: Clone + fmt::Display,
{
    /// Resolve the width rules against the committed width (`0` before the
    /// first commit).
    ///
    /// # Errors
    ///
    /// The first [`BreakpointError`] in the width rules.
    pub fn width(&self) -> Result<Resolution<W>, BreakpointError> {
        self.resolve_axis(Axis::Width, self.width.as_ref())
    }

    /// Resolve the height rules against the committed height.
    ///
    /// # Errors
    ///
    /// The first [`BreakpointError`] in the height rules.
    pub fn height(&self) -> Result<Resolution<H>, BreakpointError> {
        self.resolve_axis(Axis::Height, self.height.as_ref())
    }

    /// Resolve both axes.
    ///
    /// # Errors
    ///
    /// [`Error::Breakpoint`] for the first invalid rule, width checked first.
    pub fn resolve(&self) -> Result<Resolved<W, H>, Error> {
        Ok(Resolved {
            width: self.width()?,
            height: self.height()?,
        })
    }
}

impl<S: SizeSource, W> BreakpointTracker<S, W, W> {
    /// Width-only breakpoints for an element bound through the handle.
    pub fn for_width(source: S, rules: RuleSet<W>, config: TrackerConfig) -> Self {
        Self::assemble(SizeTracker::new(source, config), Some(rules), None)
    }

    /// Width-only breakpoints for a fixed target such as the page body.
    pub fn for_body_width(
        source: S,
        body: S::Target,
        rules: RuleSet<W>,
        config: TrackerConfig,
    ) -> Self {
        let tracker = SizeTracker::with_target(source, body, config);
        Self::assemble(tracker, Some(rules), None)
    }
}

impl<S: SizeSource, W: fmt::Debug, H: fmt::Debug> fmt::Debug for BreakpointTracker<S, W, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakpointTracker")
            .field("tracker", &self.tracker)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("resolver", &self.resolver)
            .finish()
    }
}

fn check_rules<W, H>(width: Option<&RuleSet<W>>, height: Option<&RuleSet<H>>) -> Result<(), Error> {
    if width.is_none() && height.is_none() {
        return Err(Error::NoBreakpoints);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ManualSource;
    use mezz_layout::Threshold;

    fn later() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    type Source = ManualSource<&'static str>;

    #[test]
    fn no_rules_fails_before_observing() {
        let source: Source = ManualSource::new();
        let result = BreakpointTracker::<_, &str, &str>::with_target(
            source.clone(),
            "body",
            None,
            None,
            TrackerConfig::default().with_throttle_wait_ms(100),
        );
        assert!(matches!(result, Err(Error::NoBreakpoints)));
        assert_eq!(source.observer_count(), 0);
    }

    #[test]
    fn resolves_zero_before_first_commit() {
        let bp = BreakpointTracker::for_width(
            Source::new(),
            RuleSet::from([("md", 0), ("xl", 300)]),
            TrackerConfig::default(),
        );
        let width = bp.width().unwrap();
        assert_eq!(width.active(), Some(&"md"));
        assert!(width.is("md"));
        assert!(!width.is("xl"));
        assert!(bp.height().unwrap().is_empty());
    }

    #[test]
    fn rule_starting_above_zero_has_no_active_at_first() {
        let bp = BreakpointTracker::for_body_width(
            Source::new(),
            "body",
            RuleSet::from([("lg", 500)]),
            TrackerConfig::default().with_throttle_wait_ms(100),
        );
        let width = bp.width().unwrap();
        assert_eq!(width.active(), None);
        assert_eq!(width.get("lg"), Some(false));
    }

    #[test]
    fn width_and_height_resolve_independently() {
        let source = Source::new();
        let bp = BreakpointTracker::new(
            source.clone(),
            Some(RuleSet::from([("sm", 0), ("md", 1000), ("lg", 2000)])),
            Some(RuleSet::from([("short", 0), ("tall", 600)])),
            TrackerConfig::default(),
        )
        .unwrap();
        bp.handle().bind(Some("panel"));

        source.resize(&"panel", Size::new(2500.0, 500.0));
        bp.tick_at(later());

        let resolved = bp.resolve().unwrap();
        assert_eq!(resolved.width.active(), Some(&"lg"));
        assert_eq!(resolved.height.active(), Some(&"short"));
    }

    #[test]
    fn subscribers_can_re_resolve() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let source = Source::new();
        let bp = Rc::new(BreakpointTracker::for_width(
            source.clone(),
            RuleSet::standard(),
            TrackerConfig::default(),
        ));
        bp.handle().bind(Some("panel"));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        let weak = Rc::downgrade(&bp);
        let _sub = bp.subscribe(move |_| {
            if let Some(bp) = weak.upgrade() {
                seen_in.borrow_mut().push(bp.width().unwrap().into_active());
            }
        });

        source.resize(&"panel", Size::new(1300.0, 1.0));
        bp.tick_at(later());
        assert_eq!(*seen.borrow(), vec![Some(Breakpoint::Lg)]);
    }

    #[test]
    fn invalid_height_rules_surface_as_error() {
        let bp = BreakpointTracker::<_, &str, _>::new(
            Source::new(),
            None,
            Some(RuleSet::new().with("md", Threshold::raw("100px"))),
            TrackerConfig::default(),
        )
        .unwrap();
        let err = bp.resolve().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Breakpoint value must be a number, eg: `height: { md: 100 }`. \
             Found: `height: { md: \"100px\" }`"
        );
    }

    #[test]
    fn set_rules_rejects_empty_pair() {
        let mut bp = BreakpointTracker::for_width(
            Source::new(),
            RuleSet::from([("sm", 0)]),
            TrackerConfig::default(),
        );
        assert_eq!(bp.set_rules(None, None), Err(Error::NoBreakpoints));
        assert!(bp.width_rules().is_some());

        bp.set_rules(None, Some(RuleSet::from([("tall", 0)]))).unwrap();
        assert!(bp.width_rules().is_none());
        assert_eq!(bp.height().unwrap().active(), Some(&"tall"));
    }

    #[test]
    fn custom_resolver_epsilon() {
        let source = Source::new();
        let bp = BreakpointTracker::for_width(
            source.clone(),
            RuleSet::from([("sm", 0), ("md", 1000)]),
            TrackerConfig::default(),
        )
        .with_resolver(Resolver::with_epsilon(0.0));
        bp.handle().bind(Some("panel"));
        source.resize(&"panel", Size::new(999.995, 0.0));
        bp.tick_at(later());
        assert_eq!(bp.width().unwrap().active(), Some(&"sm"));
    }
}
