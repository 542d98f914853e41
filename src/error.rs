//! # Analyzer Error Handling
//!
//! This module defines the LinspectorError enum, which represents the hard
//! failure conditions of the crate. Per-frame problems are never errors;
//! they are recorded as findings in the report (see [`crate::report`]).

use thiserror::Error;

/// Represents the fatal error conditions of the analyzer.
#[derive(Debug, Error)]
pub enum LinspectorError {
    /// An LDF, DBC, or gateway description violates an invariant the
    /// analyzer relies on (overlapping signals, dangling references, ...).
    #[error("malformed description: {0}")]
    MalformedDescription(String),

    /// A configuration value is non-finite or out of its legal range.
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// The trace input could not be read or parsed.
    #[error("input error: {0}")]
    InputError(String),

    /// Indicates a bug in the analyzer itself.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolated(String),
}
