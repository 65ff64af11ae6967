#![forbid(unsafe_code)]

//! Breakpoint resolution: classify one measured size against a rule set.
//!
//! # Ranges
//!
//! Each rule covers `[threshold, next - ε)` where `next` is the following
//! rule's threshold and `ε` is [`BREAKPOINT_FRACTION`] by default. The last
//! rule is open-ended and covers `[threshold, ∞)`.
//!
//! The guard band keeps adjacent integral thresholds from overlapping. A
//! fractional size falling inside `[next - ε, next)` matches no rule; use
//! [`Resolver::with_epsilon`] when the host reports finer sub-pixel sizes.
//!
//! # Failure Modes
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Non-numeric threshold | [`BreakpointError::NotANumber`] |
//! | Infinite or NaN threshold | [`BreakpointError::NotFinite`] |
//! | Threshold not below the next one | [`BreakpointError::NotAscending`] |
//! | Threshold below zero | [`BreakpointError::Negative`] |
//!
//! Checks run per entry, in that order, before the entry is matched.

use crate::breakpoint::Axis;
use crate::error::BreakpointError;
use crate::rules::{RuleSet, Threshold};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Default exclusive upper-bound guard, in pixels.
pub const BREAKPOINT_FRACTION: f64 = 0.01;

/// Result of resolving one axis: the active breakpoint and one flag per rule.
///
/// Flags keep rule order. At most one flag is `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<K> {
    active: Option<K>,
    flags: Vec<(K, bool)>,
}

impl<K> Default for Resolution<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K> Resolution<K> {
    /// Result for an empty or absent rule set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            active: None,
            flags: Vec::new(),
        }
    }

    /// Name of the active breakpoint, if any.
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<&K> {
        self.active.as_ref()
    }

    /// `(name, is_active)` pairs in rule order.
    pub fn flags(&self) -> impl Iterator<Item = (&K, bool)> {
        self.flags.iter().map(|(name, on)| (name, *on))
    }

    /// Number of flags (equals the number of rules).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Consume into the active name.
    #[must_use]
    pub fn into_active(self) -> Option<K> {
        self.active
    }

    /// The flag for `name`, or `None` if the rule set had no such rule.
    pub fn get<Q>(&self, name: &Q) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.flags
            .iter()
            .find(|(existing, _)| <K as Borrow<Q>>::borrow(existing) == name)
            .map(|(_, on)| *on)
    }

    /// Whether `name` is the active breakpoint. Unknown names are `false`.
    pub fn is<Q>(&self, name: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.get(name).unwrap_or(false)
    }
}

/// Serializes as `{ "active": name | null, "<name>": bool, ... }`.
impl<K: Serialize> Serialize for Resolution<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.flags.len() + 1))?;
        map.serialize_entry("active", &self.active)?;
        for (name, on) in &self.flags {
            map.serialize_entry(name, on)?;
        }
        map.end()
    }
}

/// Stateless resolver with a configurable guard band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    epsilon: f64,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Resolver using [`BREAKPOINT_FRACTION`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            epsilon: BREAKPOINT_FRACTION,
        }
    }

    /// Resolver with a custom guard band. Negative or non-finite values fall
    /// back to zero.
    #[must_use]
    pub fn with_epsilon(epsilon: f64) -> Self {
        let epsilon = if epsilon.is_finite() { epsilon.max(0.0) } else { 0.0 };
        Self { epsilon }
    }

    #[inline]
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Resolve `size` (absent means `0`) against `rules`.
    ///
    /// # Errors
    ///
    /// Returns the first [`BreakpointError`] found while walking the rules.
    pub fn resolve<K>(
        &self,
        axis: Axis,
        size: Option<f64>,
        rules: &RuleSet<K>,
    ) -> Result<Resolution<K>, BreakpointError>
    where
        K: Clone + fmt::Display,
    {
        let size = size.unwrap_or(0.0);
        let entries = rules.entries();
        let mut active = None;
        let mut flags = Vec::with_capacity(entries.len());

        for (index, (name, threshold)) in entries.iter().enumerate() {
            let next = entries.get(index + 1);
            let min = self.validate(axis, name, threshold, next)?;

            let max = next
                .and_then(|(_, next_threshold)| next_threshold.as_px())
                .map(|next_px| next_px - self.epsilon);
            let in_range = size == min || max.is_some_and(|max| size > min && size < max);
            let is_active = in_range || (next.is_none() && size >= min);

            if is_active {
                active = Some(name.clone());
            }
            flags.push((name.clone(), is_active));
        }

        Ok(Resolution { active, flags })
    }

    fn validate<K: fmt::Display>(
        &self,
        axis: Axis,
        name: &K,
        threshold: &Threshold,
        next: Option<&(K, Threshold)>,
    ) -> Result<f64, BreakpointError> {
        let value = match threshold {
            Threshold::Px(px) => *px,
            Threshold::Raw(raw) => {
                return Err(BreakpointError::NotANumber {
                    axis,
                    name: name.to_string(),
                    found: raw.to_string(),
                });
            }
        };

        if !value.is_finite() {
            return Err(BreakpointError::NotFinite {
                axis,
                name: name.to_string(),
                value,
            });
        }

        if let Some((next_name, next_threshold)) = next
            && let Some(next_value) = next_threshold.as_px()
            && next_value - self.epsilon < value
        {
            return Err(BreakpointError::NotAscending {
                axis,
                name: name.to_string(),
                value,
                next_name: next_name.to_string(),
                next_value,
            });
        }

        if value < 0.0 {
            return Err(BreakpointError::Negative {
                axis,
                name: name.to_string(),
                value,
            });
        }

        Ok(value)
    }
}

/// Resolve with the default [`Resolver`].
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve<K>(
    axis: Axis,
    size: Option<f64>,
    rules: &RuleSet<K>,
) -> Result<Resolution<K>, BreakpointError>
where
    K: Clone + fmt::Display,
{
    Resolver::new().resolve(axis, size, rules)
}
