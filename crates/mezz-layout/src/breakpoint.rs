#![forbid(unsafe_code)]

//! Measurement axes and the blessed breakpoint names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dimension a rule set applies to.
///
/// Width and height are resolved independently; the axis only labels errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    /// Lowercase label used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blessed breakpoint keys, ordered from smallest to largest.
///
/// Callers may use any key type for a [`RuleSet`](crate::RuleSet); this enum
/// is the default vocabulary and sorts in size order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Xxs,
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Self; 7] = [
        Self::Xxs,
        Self::Xs,
        Self::Sm,
        Self::Md,
        Self::Lg,
        Self::Xl,
        Self::Xxl,
    ];

    /// Short lowercase label (`"xxs"` .. `"xxl"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xxs => "xxs",
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
            Self::Xxl => "xxl",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown breakpoint label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBreakpoint(pub String);

impl fmt::Display for UnknownBreakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown breakpoint: {}", self.0)
    }
}

impl std::error::Error for UnknownBreakpoint {}

impl FromStr for Breakpoint {
    type Err = UnknownBreakpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bp| bp.as_str() == s)
            .ok_or_else(|| UnknownBreakpoint(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_sorted() {
        let mut sorted = Breakpoint::ALL;
        sorted.sort();
        assert_eq!(sorted, Breakpoint::ALL);
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for bp in Breakpoint::ALL {
            assert_eq!(bp.as_str().parse::<Breakpoint>(), Ok(bp));
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "huge".parse::<Breakpoint>().unwrap_err();
        assert_eq!(err.to_string(), "unknown breakpoint: huge");
    }

    #[test]
    fn axis_display() {
        assert_eq!(Axis::Width.to_string(), "width");
        assert_eq!(Axis::Height.to_string(), "height");
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        assert_eq!(serde_json::to_string(&Breakpoint::Xxl).unwrap(), "\"xxl\"");
        let axis: Axis = serde_json::from_str("\"height\"").unwrap();
        assert_eq!(axis, Axis::Height);
    }
}
