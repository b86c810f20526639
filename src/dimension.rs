//! Outcome dimensions.
//!
//! A dimension is one named axis of the outcome profile (environmental,
//! economic, ...). The set of dimensions is scenario configuration: the engine
//! works with any non-empty set agreed between the scenario and the profile.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*$").unwrap_or_else(|e| unreachable!("static regex: {e}"))
    })
}

/// Validate that `value` is a usable identifier for `field`.
///
/// Identifiers start with an ASCII letter and continue with letters, digits,
/// `_`, `.` or `-`.
pub(crate) fn validate_identifier(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    if !identifier_pattern().is_match(value) {
        return Err(ValidationError::InvalidIdentifier {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Name of one outcome axis.
///
/// Ordering is lexical on the name so profiles and exports iterate
/// deterministically.
///
/// # Examples
///
/// ```
/// use tradeoff::Dimension;
///
/// let env = Dimension::new("environmental").unwrap();
/// assert_eq!(env.as_str(), "environmental");
/// assert!(Dimension::new("9lives").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimension(String);

impl Dimension {
    /// Creates a dimension, validating the name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidIdentifier` if the name is not a valid
    /// identifier, or `MissingField` if it is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_identifier("dimension", &name)?;
        Ok(Self(name))
    }

    /// Returns the dimension name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-facing form of the name: first letter upper-cased,
    /// underscores turned into spaces.
    #[must_use]
    pub fn display_name(&self) -> String {
        let spaced = self.0.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Dimension {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
