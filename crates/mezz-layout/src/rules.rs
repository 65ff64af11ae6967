#![forbid(unsafe_code)]

//! Ordered rule sets mapping breakpoint names to minimum sizes.
//!
//! A [`RuleSet`] keeps its entries in insertion order. That order is the
//! contract: thresholds must ascend from first to last entry, and the resolver
//! reports a violation instead of sorting.
//!
//! Thresholds coming from untyped configuration may not be numbers at all.
//! Those are kept as [`Threshold::Raw`] so the resolver can report the exact
//! value it found.

use crate::breakpoint::Breakpoint;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

/// Minimum size, in pixels, at which a breakpoint becomes eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    /// A numeric pixel value. May still be non-finite or negative.
    Px(f64),
    /// Any other value, as read from configuration (e.g. `"100px"`).
    Raw(serde_json::Value),
}

impl Threshold {
    /// Wrap an arbitrary configuration value.
    pub fn raw(value: impl Into<serde_json::Value>) -> Self {
        Self::Raw(value.into())
    }

    /// The pixel value, if this threshold is numeric.
    #[must_use]
    pub fn as_px(&self) -> Option<f64> {
        match self {
            Self::Px(px) => Some(*px),
            Self::Raw(_) => None,
        }
    }
}

impl From<f64> for Threshold {
    fn from(px: f64) -> Self {
        Self::Px(px)
    }
}

impl From<f32> for Threshold {
    fn from(px: f32) -> Self {
        Self::Px(f64::from(px))
    }
}

impl From<i32> for Threshold {
    fn from(px: i32) -> Self {
        Self::Px(f64::from(px))
    }
}

impl From<u32> for Threshold {
    fn from(px: u32) -> Self {
        Self::Px(f64::from(px))
    }
}

impl From<u16> for Threshold {
    fn from(px: u16) -> Self {
        Self::Px(f64::from(px))
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => fmt_px(*px, f),
            Self::Raw(raw) => write!(f, "{raw}"),
        }
    }
}

/// Formats a pixel value the way configuration authors write it: `100`,
/// `12.5`, `Infinity`, `NaN`.
pub(crate) fn fmt_px(px: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if px.is_nan() {
        f.write_str("NaN")
    } else if px.is_infinite() {
        f.write_str(if px > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{px}")
    }
}

/// Display adapter around [`fmt_px`].
pub(crate) struct Px(pub f64);

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_px(self.0, f)
    }
}

/// An ordered mapping from breakpoint name to [`Threshold`].
///
/// Names are unique: inserting an existing name replaces its threshold and
/// keeps its original position.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet<K = String> {
    entries: Vec<(K, Threshold)>,
}

impl<K> Default for RuleSet<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K> RuleSet<K> {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rules.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no rules.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, threshold)` in rule order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Threshold)> {
        self.entries.iter().map(|(name, threshold)| (name, threshold))
    }

    /// Iterate over names in rule order.
    pub fn names(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(name, _)| name)
    }

    pub(crate) fn entries(&self) -> &[(K, Threshold)] {
        &self.entries
    }
}

impl<K: PartialEq> RuleSet<K> {
    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: K, threshold: impl Into<Threshold>) -> Self {
        self.insert(name, threshold);
        self
    }

    /// Insert or replace a rule. Returns the previous threshold for `name`.
    pub fn insert(&mut self, name: K, threshold: impl Into<Threshold>) -> Option<Threshold> {
        let threshold = threshold.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, threshold)),
            None => {
                self.entries.push((name, threshold));
                None
            }
        }
    }

    /// Look up the threshold for `name`.
    pub fn get<Q>(&self, name: &Q) -> Option<&Threshold>
    where
        K: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        self.entries
            .iter()
            .find(|(existing, _)| <K as Borrow<Q>>::borrow(existing) == name)
            .map(|(_, threshold)| threshold)
    }
}

impl RuleSet<Breakpoint> {
    /// Default body-width scale: `{ sm: 0, md: 768, lg: 1200 }`.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with(Breakpoint::Sm, 0)
            .with(Breakpoint::Md, 768)
            .with(Breakpoint::Lg, 1200)
    }
}

impl<K: PartialEq, T: Into<Threshold>> FromIterator<(K, T)> for RuleSet<K> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut rules = Self::new();
        for (name, threshold) in iter {
            rules.insert(name, threshold);
        }
        rules
    }
}

impl<K: PartialEq, T: Into<Threshold>, const N: usize> From<[(K, T); N]> for RuleSet<K> {
    fn from(entries: [(K, T); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Serialize> Serialize for RuleSet<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, threshold) in &self.entries {
            map.serialize_entry(name, threshold)?;
        }
        map.end()
    }
}

// Deserialized through `MapAccess` so document order is kept, whatever map
// type the format would otherwise build.
impl<'de, K> Deserialize<'de> for RuleSet<K>
where
    K: Deserialize<'de> + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleSetVisitor<K>(PhantomData<K>);

        impl<'de, K> Visitor<'de> for RuleSetVisitor<K>
        where
            K: Deserialize<'de> + PartialEq,
        {
            type Value = RuleSet<K>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of breakpoint names to pixel values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut rules = RuleSet::new();
                while let Some((name, threshold)) = access.next_entry::<K, Threshold>()? {
                    rules.insert(name, threshold);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RuleSetVisitor(PhantomData))
    }
}
