//! Error types for the CAM tools crate.
//!
//! Wraps the stage errors of the warmup pipeline so the generator facade can
//! report any of them through one type.

use cncwarmup_core::{ConfigurationError, EmitError, PlanError};
use thiserror::Error;

/// Errors that can occur while generating a warmup program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CamToolError {
    /// The configuration was rejected before planning.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The ramp could not be planned.
    #[error("Ramp planning failed: {0}")]
    Plan(#[from] PlanError),

    /// The program text could not be emitted.
    #[error("Program emission failed: {0}")]
    Emit(#[from] EmitError),
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;
