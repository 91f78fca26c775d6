//! Error types for warmup program generation.
//!
//! Each stage of the pipeline has its own error type:
//! - [`ConfigurationError`] for invalid input values
//! - [`PlanError`] for numeric faults while planning the ramp
//! - [`EmitError`] for program text emission
//!
//! None of these are retried internally. The pipeline is deterministic, so
//! the same input always reproduces the same error.

use thiserror::Error;

/// A configuration value violates its validity constraint.
///
/// Every variant names the offending field so the caller can point the user
/// at the value to correct. Values are never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The value is NaN or infinite.
    #[error("'{field}' must be a finite number, got {value}")]
    NotFinite {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The value is zero or negative.
    #[error("'{field}' must be greater than zero, got {value}")]
    NotPositive {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A finish value is below its start value.
    #[error("'{field}' ({finish}) must not be below '{start_field}' ({start})")]
    InvertedRange {
        /// The finish field that is too small.
        field: &'static str,
        /// The start field it is compared against.
        start_field: &'static str,
        /// The start value.
        start: f64,
        /// The rejected finish value.
        finish: f64,
    },

    /// A count exceeds its upper bound.
    #[error("'{field}' must be at most {max}, got {value}")]
    TooLarge {
        /// The offending field.
        field: &'static str,
        /// The rejected value.
        value: u32,
        /// The largest accepted value.
        max: u32,
    },

    /// The closing leg's steps are finer than its exit tolerance.
    #[error("'{field}' leaves {step} mm before the origin, below the closing tolerance of {tolerance} mm")]
    StepBelowTolerance {
        /// The offending field.
        field: &'static str,
        /// Distance from the origin one step before the end of the closing leg.
        step: f64,
        /// The closing tolerance.
        tolerance: f64,
    },

    /// A count that must be at least one is zero.
    #[error("'{field}' must be at least 1")]
    ZeroCount {
        /// The offending field.
        field: &'static str,
    },
}

impl ConfigurationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotFinite { field, .. }
            | Self::NotPositive { field, .. }
            | Self::InvertedRange { field, .. }
            | Self::TooLarge { field, .. }
            | Self::StepBelowTolerance { field, .. }
            | Self::ZeroCount { field } => field,
        }
    }
}

/// Errors raised while planning the ramp sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A leg did not meet its exit condition on its last step.
    #[error("Leg {leg} did not reach its corner within {iterations} iterations")]
    NonConvergent {
        /// Leg number, 1 to 4.
        leg: usize,
        /// Iterations executed before giving up.
        iterations: u32,
    },

    /// The configuration was not valid.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Errors raised while emitting program text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmitError {
    /// The dialect tag does not name a known dialect.
    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// Writing the program text failed.
    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type alias for configuration validation.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// Result type alias for ramp planning.
pub type PlanResult<T> = Result<T, PlanError>;

/// Result type alias for program emission.
pub type EmitResult<T> = Result<T, EmitError>;
