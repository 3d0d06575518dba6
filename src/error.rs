//! Configuration errors
//!
//! Gameplay itself never fails: outcomes are state transitions. The only
//! fallible step is building a machine from bad tuning.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has a value outside its allowed domain
    #[error("invalid value for '{field}': {value} ({reason})")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// The value provided
        value: f32,
        /// What was expected
        reason: &'static str,
    },

    /// A min/max pair is inverted
    #[error("invalid range: '{min_field}' ({min}) is greater than '{max_field}' ({max})")]
    InvertedRange {
        min_field: &'static str,
        min: f32,
        max_field: &'static str,
        max: f32,
    },

    /// Config file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config JSON was malformed
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Require a finite, non-negative value.
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be finite and non-negative",
        });
    }
    Ok(())
}

/// Require a finite, strictly positive value.
pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be finite and greater than zero",
        });
    }
    Ok(())
}

/// Require a well-formed `[min, max]` duration range.
pub(crate) fn duration_range(
    min_field: &'static str,
    min: f32,
    max_field: &'static str,
    max: f32,
) -> Result<(), ConfigError> {
    non_negative(min_field, min)?;
    non_negative(max_field, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange {
            min_field,
            min,
            max_field,
            max,
        });
    }
    Ok(())
}
