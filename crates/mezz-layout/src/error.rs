#![forbid(unsafe_code)]

//! Rule validation errors.
//!
//! Every variant carries the axis, the offending breakpoint name and the value
//! that was found, so a bad configuration can be located from the message
//! alone.

use crate::breakpoint::Axis;
use crate::rules::Px;
use std::fmt;

/// A rule set failed validation during resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakpointError {
    /// The threshold is not a number at all. `found` is the JSON rendering of
    /// the value.
    NotANumber {
        axis: Axis,
        name: String,
        found: String,
    },
    /// The threshold is infinite or NaN.
    NotFinite { axis: Axis, name: String, value: f64 },
    /// The threshold is not lower than the following entry's.
    NotAscending {
        axis: Axis,
        name: String,
        value: f64,
        next_name: String,
        next_value: f64,
    },
    /// The threshold is below zero.
    Negative { axis: Axis, name: String, value: f64 },
}

impl BreakpointError {
    /// Axis of the rule set that failed.
    #[must_use]
    pub fn axis(&self) -> Axis {
        match self {
            Self::NotANumber { axis, .. }
            | Self::NotFinite { axis, .. }
            | Self::NotAscending { axis, .. }
            | Self::Negative { axis, .. } => *axis,
        }
    }

    /// Name of the offending breakpoint.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NotANumber { name, .. }
            | Self::NotFinite { name, .. }
            | Self::NotAscending { name, .. }
            | Self::Negative { name, .. } => name,
        }
    }
}

impl fmt::Display for BreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber { axis, name, found } => write!(
                f,
                "Breakpoint value must be a number, eg: `{axis}: {{ {name}: 100 }}`. \
                 Found: `{axis}: {{ {name}: {found} }}`"
            ),
            Self::NotFinite { axis, name, value } => write!(
                f,
                "The breakpoint `{axis}: {{ {name}: {} }}` must be finite",
                Px(*value)
            ),
            Self::NotAscending {
                axis,
                name,
                value,
                next_name,
                next_value,
            } => write!(
                f,
                "The breakpoint `{axis}: {{ {name}: {} }}` must be lower than the next \
                 breakpoint of `{{ {next_name}: {} }}`",
                Px(*value),
                Px(*next_value)
            ),
            Self::Negative { axis, name, value } => write!(
                f,
                "The breakpoint `{axis}: {{ {name}: {} }}` can't have a value lower than 0",
                Px(*value)
            ),
        }
    }
}

impl std::error::Error for BreakpointError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_number_echoes_found_value() {
        let err = BreakpointError::NotANumber {
            axis: Axis::Width,
            name: "md".into(),
            found: "\"100px\"".into(),
        };
        assert_eq!(
            err.to_string(),
            "Breakpoint value must be a number, eg: `width: { md: 100 }`. \
             Found: `width: { md: \"100px\" }`"
        );
    }

    #[test]
    fn not_finite_message() {
        let err = BreakpointError::NotFinite {
            axis: Axis::Height,
            name: "lg".into(),
            value: f64::INFINITY,
        };
        assert_eq!(
            err.to_string(),
            "The breakpoint `height: { lg: Infinity }` must be finite"
        );
    }

    #[test]
    fn not_ascending_names_both_entries() {
        let err = BreakpointError::NotAscending {
            axis: Axis::Width,
            name: "sm".into(),
            value: 1000.0,
            next_name: "md".into(),
            next_value: 500.0,
        };
        assert_eq!(
            err.to_string(),
            "The breakpoint `width: { sm: 1000 }` must be lower than the next \
             breakpoint of `{ md: 500 }`"
        );
    }

    #[test]
    fn negative_message() {
        let err = BreakpointError::Negative {
            axis: Axis::Width,
            name: "md".into(),
            value: -100.0,
        };
        assert_eq!(
            err.to_string(),
            "The breakpoint `width: { md: -100 }` can't have a value lower than 0"
        );
        assert_eq!(err.axis(), Axis::Width);
        assert_eq!(err.name(), "md");
    }
}
