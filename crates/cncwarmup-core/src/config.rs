//! Warmup configuration model
//!
//! A [`Configuration`] is the complete input of one generation request: the
//! machine travel envelope, the spindle and feed ramp bounds, coolant, step
//! density and tool number. It carries no behavior beyond validation and the
//! derivation of the per-step increments.

use crate::error::{ConfigurationError, ConfigurationResult};
use serde::{Deserialize, Serialize};

/// Number of envelope edges the spindle and feed ranges are spread across.
pub const LEG_COUNT: usize = 4;

/// Distance from the origin below which the closing leg ends (mm), the
/// controller's `LT 1` guard.
pub const CLOSING_TOLERANCE: f64 = 1.0;

/// Upper bound on `step_density`.
///
/// A 1 mm closing guard already limits a 10 m axis to 10000 steps per leg.
pub const MAX_STEP_DENSITY: u32 = 10_000;

fn default_coolant() -> bool {
    true
}

/// Input parameters of a warmup program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// X-axis travel limit (mm)
    pub travel_x: f64,
    /// Y-axis travel limit (mm)
    pub travel_y: f64,
    /// Spindle speed at the start of the ramp (RPM)
    pub spindle_start: f64,
    /// Spindle speed at the end of the ramp (RPM)
    pub spindle_finish: f64,
    /// Feedrate at the start of the ramp (mm/min)
    pub feed_start: f64,
    /// Feedrate at the end of the ramp (mm/min)
    pub feed_finish: f64,
    /// Flood coolant during the ramp
    #[serde(default = "default_coolant")]
    pub coolant_enabled: bool,
    /// Ramp increments per envelope edge
    pub step_density: u32,
    /// Tool to load before moving
    pub tool_number: u32,
}

/// Increments derived once from a [`Configuration`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedConstants {
    /// Spindle range apportioned to one leg
    pub spindle_per_leg: f64,
    /// Feed range apportioned to one leg
    pub feed_per_leg: f64,
    /// Spindle increment per step
    pub spindle_step_delta: f64,
    /// Feed increment per step
    pub feed_step_delta: f64,
    /// X increment per step on the X legs
    pub x_step_delta: f64,
    /// Y increment per step on the Y legs
    pub y_step_delta: f64,
}

impl Configuration {
    /// Check every field against its constraint, with the default closing
    /// tolerance.
    ///
    /// Fields are checked in declaration order and the first violation is
    /// returned.
    pub fn validate(&self) -> ConfigurationResult<()> {
        self.validate_for_tolerance(CLOSING_TOLERANCE)
    }

    /// Check every field, and check that no step of the closing leg before
    /// the last one lands below `closing_tolerance`. Otherwise the closing
    /// leg would end early with fewer than `step_density` steps.
    pub fn validate_for_tolerance(&self, closing_tolerance: f64) -> ConfigurationResult<()> {
        positive("travel_x", self.travel_x)?;
        positive("travel_y", self.travel_y)?;
        positive("spindle_start", self.spindle_start)?;
        positive("spindle_finish", self.spindle_finish)?;
        ordered(
            "spindle_start",
            self.spindle_start,
            "spindle_finish",
            self.spindle_finish,
        )?;
        positive("feed_start", self.feed_start)?;
        positive("feed_finish", self.feed_finish)?;
        ordered("feed_start", self.feed_start, "feed_finish", self.feed_finish)?;

        if self.step_density == 0 {
            return Err(ConfigurationError::ZeroCount {
                field: "step_density",
            });
        }
        if self.step_density > MAX_STEP_DENSITY {
            return Err(ConfigurationError::TooLarge {
                field: "step_density",
                value: self.step_density,
                max: MAX_STEP_DENSITY,
            });
        }
        if let Some(clearance) = self.closing_clearance() {
            if clearance < closing_tolerance {
                return Err(ConfigurationError::StepBelowTolerance {
                    field: "step_density",
                    step: clearance,
                    tolerance: closing_tolerance,
                });
            }
        }
        if self.tool_number == 0 {
            return Err(ConfigurationError::ZeroCount {
                field: "tool_number",
            });
        }

        Ok(())
    }

    /// Compute the per-leg and per-step increments.
    pub fn derived(&self) -> DerivedConstants {
        let steps = f64::from(self.step_density);
        let legs = LEG_COUNT as f64;
        let spindle_per_leg = (self.spindle_finish - self.spindle_start) / legs;
        let feed_per_leg = (self.feed_finish - self.feed_start) / legs;

        DerivedConstants {
            spindle_per_leg,
            feed_per_leg,
            spindle_step_delta: spindle_per_leg / steps,
            feed_step_delta: feed_per_leg / steps,
            x_step_delta: self.travel_x / steps,
            y_step_delta: self.travel_y / steps,
        }
    }

    /// Total number of ramp steps over the whole perimeter.
    pub fn total_steps(&self) -> u32 {
        self.step_density.saturating_mul(LEG_COUNT as u32)
    }

    /// Y position on the closing leg one step before the origin, `None`
    /// when the leg is a single step.
    ///
    /// Evaluated with [`step_position`] like the planner, so a configuration
    /// that passes validation never trips the closing guard early.
    pub fn closing_clearance(&self) -> Option<f64> {
        if self.step_density <= 1 {
            return None;
        }
        Some(step_position(
            self.travel_y,
            -self.travel_y,
            self.step_density - 1,
            self.step_density,
        ))
    }
}

/// Active axis position after `step` of `steps` along a leg from `from`.
///
/// At `step == steps` the ratio is exactly 1, so the leg ends on
/// `from + span` without accumulated drift.
pub fn step_position(from: f64, span: f64, step: u32, steps: u32) -> f64 {
    from + span * (f64::from(step) / f64::from(steps))
}

fn positive(field: &'static str, value: f64) -> ConfigurationResult<()> {
    if !value.is_finite() {
        return Err(ConfigurationError::NotFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ConfigurationError::NotPositive { field, value });
    }
    Ok(())
}

fn ordered(
    start_field: &'static str,
    start: f64,
    field: &'static str,
    finish: f64,
) -> ConfigurationResult<()> {
    if finish < start {
        return Err(ConfigurationError::InvertedRange {
            field,
            start_field,
            start,
            finish,
        });
    }
    Ok(())
}
