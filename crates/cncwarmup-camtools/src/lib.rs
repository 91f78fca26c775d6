//! # CNC Warmup CAM Tools
//!
//! Generates spindle and axis warmup programs for CNC machining centres.
//!
//! ## Pipeline
//!
//! - **Ramp Planner**: walks the perimeter of the travel envelope and ramps
//!   spindle speed and feedrate across all four edges
//! - **Program Emitter**: writes the planned run as a Q-parameter program or
//!   as a flattened literal program
//! - **Warmup Generator**: validate, plan and emit in one call

pub mod emitter;
pub mod error;
pub mod program;
pub mod ramp_planner;
pub mod warmup_generator;

pub use emitter::{emit, emit_tagged, Dialect};
pub use error::{CamToolError, CamToolResult};
pub use program::{format_number, format_signed, ProgramLine, ProgramText};
pub use ramp_planner::{plan, Axis, Leg, RampPlanner, Run, Waypoint, DEFAULT_CLOSING_TOLERANCE};
pub use warmup_generator::WarmupProgramGenerator;
