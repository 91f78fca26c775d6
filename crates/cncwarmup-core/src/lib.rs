//! # CNC Warmup Core
//!
//! Core types for warmup program generation.
//! Provides the configuration model that every generation request starts
//! from and the error types shared by the planning and emission stages.

pub mod config;
pub mod error;

pub use config::{
    step_position, Configuration, DerivedConstants, CLOSING_TOLERANCE, LEG_COUNT,
    MAX_STEP_DENSITY,
};
pub use error::{
    ConfigurationError, ConfigurationResult, EmitError, EmitResult, PlanError, PlanResult,
};
