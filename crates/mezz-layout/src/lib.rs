#![forbid(unsafe_code)]

//! Breakpoint rules and resolution for measured element sizes.
//!
//! # Role in mezz
//! `mezz-layout` is the pure half of the workspace. It owns the rule-set data
//! model, the resolver that classifies a size into exactly one named
//! breakpoint, and the conversion from design-token width scales. It performs
//! no I/O and keeps no state; `mezz-runtime` feeds it sizes.
//!
//! # Example
//!
//! ```
//! use mezz_layout::{Axis, RuleSet, resolve};
//!
//! let rules = RuleSet::from([("sm", 0), ("md", 1000), ("lg", 2000)]);
//! let result = resolve(Axis::Width, Some(500.0), &rules).unwrap();
//!
//! assert_eq!(result.active(), Some(&"sm"));
//! assert!(result.is("sm"));
//! assert!(!result.is("lg"));
//! ```
//!
//! # Invariants
//!
//! 1. Rule order is taken as given; the resolver never sorts.
//! 2. For strictly ascending rules starting at `0`, every integral size
//!    activates exactly one rule.
//! 3. Validation failure aborts the call; no partial result is returned.

pub mod breakpoint;
pub mod error;
pub mod resolve;
pub mod rules;
pub mod tokens;

pub use breakpoint::{Axis, Breakpoint};
pub use error::BreakpointError;
pub use resolve::{BREAKPOINT_FRACTION, Resolution, Resolver, resolve};
pub use rules::{RuleSet, Threshold};
pub use tokens::{TokenError, rules_from_screens, screens_from_json};
