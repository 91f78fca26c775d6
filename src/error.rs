//! Error types for the top-level crate.
//!
//! Aggregates the errors of every stage so callers of the library facade
//! and the output writer deal with a single type.

use cncwarmup_camtools::CamToolError;
use cncwarmup_core::{ConfigurationError, EmitError, PlanError};
use cncwarmup_settings::SettingsError;
use std::io;
use thiserror::Error;

/// Errors that can occur while generating or writing a warmup program.
#[derive(Error, Debug)]
pub enum WarmupError {
    /// The configuration was rejected.
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The ramp could not be planned.
    #[error("Ramp planning failed: {0}")]
    Plan(#[from] PlanError),

    /// The program text could not be emitted.
    #[error("Program emission failed: {0}")]
    Emit(#[from] EmitError),

    /// Settings or machine lookup failed.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// The program could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A batch worker thread panicked.
    #[error("Generation of '{0}' panicked")]
    WorkerPanicked(String),
}

impl From<CamToolError> for WarmupError {
    fn from(err: CamToolError) -> Self {
        match err {
            CamToolError::Configuration(e) => Self::Configuration(e),
            CamToolError::Plan(e) => Self::Plan(e),
            CamToolError::Emit(e) => Self::Emit(e),
        }
    }
}

/// Result type alias for top-level operations.
pub type WarmupResult<T> = Result<T, WarmupError>;
