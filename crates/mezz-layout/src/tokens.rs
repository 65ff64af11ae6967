#![forbid(unsafe_code)]

//! Conversion from design-token width scales to rule sets.
//!
//! Design systems usually publish screens as min-width strings, e.g.
//! `{ "sm": "375px", "md": "768px" }`. [`rules_from_screens`] turns such a
//! scale into a [`RuleSet`] sorted by width, with the smallest threshold
//! forced to `0` so the narrowest sizes still resolve to a breakpoint.
//!
//! Max-width screens (`{ "2xl": { "max": "1535px" } }`) are not supported.

use crate::rules::RuleSet;
use serde_json::Value;
use std::fmt;

/// Errors from design-token conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The input was not valid JSON or not an object.
    Parse(String),
    /// A screen value has no leading integer (e.g. `"wide"`).
    InvalidWidth { name: String, value: String },
    /// A screen uses an object form such as `{ "max": ".." }`.
    UnsupportedScreen { name: String },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid screens config: {msg}"),
            Self::InvalidWidth { name, value } => {
                write!(f, "screen '{name}' has no pixel width: {value}")
            }
            Self::UnsupportedScreen { name } => {
                write!(f, "screen '{name}' is not a min-width string and is not supported")
            }
        }
    }
}

impl std::error::Error for TokenError {}

/// Convert `(name, "375px")` pairs into an ascending rule set.
///
/// Widths are read like `parseInt`: leading whitespace, an optional sign and
/// the leading digits; anything after them (`px`, a fraction) is ignored.
/// Pairs with equal widths keep their input order.
///
/// # Errors
///
/// [`TokenError::InvalidWidth`] if a value has no leading integer.
pub fn rules_from_screens<K, S, I>(screens: I) -> Result<RuleSet<K>, TokenError>
where
    K: PartialEq + fmt::Display,
    S: AsRef<str>,
    I: IntoIterator<Item = (K, S)>,
{
    let mut pairs = Vec::new();
    for (name, value) in screens {
        let value = value.as_ref();
        let Some(px) = parse_leading_int(value) else {
            return Err(TokenError::InvalidWidth {
                name: name.to_string(),
                value: value.to_owned(),
            });
        };
        pairs.push((name, px));
    }

    pairs.sort_by(|a, b| a.1.total_cmp(&b.1));
    if let Some(first) = pairs.first_mut() {
        first.1 = 0.0;
    }

    Ok(pairs.into_iter().collect())
}

/// Parse a JSON screens object, either bare or wrapped as
/// `{ "screens": { .. } }`, into a rule set.
///
/// Screens are read in document order: the first offending entry is the one
/// reported, and equal widths keep the order they were written in.
///
/// # Errors
///
/// [`TokenError::Parse`] for malformed JSON, [`TokenError::UnsupportedScreen`]
/// for object-valued screens and [`TokenError::InvalidWidth`] for values
/// without a pixel width.
pub fn screens_from_json(json: &str) -> Result<RuleSet<String>, TokenError> {
    let root: Value = serde_json::from_str(json).map_err(|e| TokenError::Parse(e.to_string()))?;
    let mut object = match root {
        Value::Object(object) => object,
        other => return Err(TokenError::Parse(format!("expected an object, found {other}"))),
    };
    if object.len() == 1
        && let Some(Value::Object(inner)) = object.get_mut("screens")
    {
        object = std::mem::take(inner);
    }

    let mut screens = Vec::with_capacity(object.len());
    for (name, value) in object {
        match value {
            Value::String(width) => screens.push((name, width)),
            Value::Object(_) => return Err(TokenError::UnsupportedScreen { name }),
            other => {
                return Err(TokenError::InvalidWidth {
                    name,
                    value: other.to_string(),
                });
            }
        }
    }

    rules_from_screens(screens)
}

fn parse_leading_int(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    digits[..len].parse::<f64>().ok().map(|n| sign * n)
}
