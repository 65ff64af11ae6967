#![forbid(unsafe_code)]

//! Runtime: throttled size observation feeding breakpoint resolution.
//!
//! # Role in mezz
//! `mezz-runtime` owns the stateful half of the workspace. A [`SizeTracker`]
//! subscribes to a [`SizeSource`], pushes every raw notification through a
//! trailing-edge [`Throttle`], and commits the surviving size into reactive
//! state. A [`BreakpointTracker`] layers per-axis rule sets on top and resolves
//! them with `mezz-layout` on demand.
//!
//! # Driving the throttle
//! Nothing here spawns threads or timers. The host loop calls
//! [`SizeTracker::tick`] and may sleep until [`SizeTracker::next_deadline`],
//! the same way a render loop polls input with a timeout.
//!
//! ```
//! use mezz_layout::{Breakpoint, RuleSet};
//! use mezz_runtime::{BreakpointTracker, ManualSource, Size, TrackerConfig};
//! use std::time::{Duration, Instant};
//!
//! let source = ManualSource::new();
//! let tracker = BreakpointTracker::for_width(
//!     source.clone(),
//!     RuleSet::standard(),
//!     TrackerConfig::default(),
//! );
//! tracker.handle().bind(Some("panel"));
//!
//! source.resize(&"panel", Size::new(900.0, 300.0));
//! tracker.tick_at(Instant::now() + Duration::from_secs(1));
//!
//! let width = tracker.width().unwrap();
//! assert_eq!(width.active(), Some(&Breakpoint::Md));
//! ```

pub mod breakpoints;
pub mod error;
pub mod geometry;
pub mod reactive;
pub mod source;
pub mod throttle;
pub mod tracker;

pub use breakpoints::{BreakpointTracker, Resolved};
pub use error::Error;
pub use geometry::{BoxSizing, Size};
pub use reactive::{Observable, Subscription};
pub use source::{ManualSource, Observation, ResizeCallback, SizeSource};
pub use throttle::{Throttle, ThrottleAction};
pub use tracker::{AttachHandle, DEFAULT_THROTTLE_WAIT, SizeTracker, TrackerConfig};
