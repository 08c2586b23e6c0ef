//! Validation errors raised while constructing data model values.

use thiserror::Error;

/// A priority that is not a decimal number in the inclusive range `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid priority value: {value}. Priority must be a decimal between 0.0 and 1.0.")]
pub struct InvalidPriority {
    /// The rejected input, exactly as supplied.
    pub value: String,
}

impl InvalidPriority {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

/// A change frequency outside of the sitemaps.org vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown change frequency: '{0}'. Expected one of: always, hourly, daily, weekly, monthly, yearly, never.")]
pub struct UnknownChangeFreq(pub String);
