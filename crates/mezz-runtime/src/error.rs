#![forbid(unsafe_code)]

//! Errors surfaced by the breakpoint tracker.

use mezz_layout::BreakpointError;
use std::fmt;

/// Errors from [`BreakpointTracker`](crate::BreakpointTracker).
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Neither a width nor a height rule set was supplied.
    NoBreakpoints,
    /// A rule set failed validation while resolving.
    Breakpoint(BreakpointError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBreakpoints => f.write_str("No breakpoints specified"),
            Self::Breakpoint(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NoBreakpoints => None,
            Self::Breakpoint(err) => Some(err),
        }
    }
}

impl From<BreakpointError> for Error {
    fn from(err: BreakpointError) -> Self {
        Self::Breakpoint(err)
    }
}
