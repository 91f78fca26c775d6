//! Ramp planner
//!
//! Simulates the warmup traversal step by step. The tool starts at the
//! origin and runs the four edges of the travel envelope in a fixed order
//! while spindle speed and feedrate climb from their start to their finish
//! values over the whole perimeter.
//!
//! Each step advances the active axis by one axis increment and the ramp by
//! one spindle and one feed increment. The accumulator carries integer step
//! counts and evaluates positions as `start + span * (step / steps)`, so the
//! last step of a leg lands on the corner exactly instead of on an
//! accumulated approximation of it.
//!
//! Legs 1 to 3 end when the active coordinate equals the corner. Leg 4 ends
//! when the coordinate drops below the closing tolerance, matching the
//! controller program's `LT 1` guard on the return to the origin.

use cncwarmup_core::{
    step_position, Configuration, DerivedConstants, PlanError, PlanResult, CLOSING_TOLERANCE,
    LEG_COUNT,
};
use serde::Serialize;
use tracing::{debug, info, trace};

/// Leg 4 exit threshold (mm)
pub const DEFAULT_CLOSING_TOLERANCE: f64 = CLOSING_TOLERANCE;

/// Machine axis moved by a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
        }
    }
}

/// One edge of the travel envelope, in traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Leg {
    /// (0, 0) to (travel_x, 0)
    XOutbound,
    /// (travel_x, 0) to (travel_x, travel_y)
    YOutbound,
    /// (travel_x, travel_y) to (0, travel_y)
    XReturn,
    /// (0, travel_y) to (0, 0)
    YReturn,
}

impl Leg {
    /// All legs in traversal order
    pub const ALL: [Leg; LEG_COUNT] = [
        Leg::XOutbound,
        Leg::YOutbound,
        Leg::XReturn,
        Leg::YReturn,
    ];

    /// 1-based position in the traversal
    pub fn number(self) -> usize {
        match self {
            Self::XOutbound => 1,
            Self::YOutbound => 2,
            Self::XReturn => 3,
            Self::YReturn => 4,
        }
    }

    fn index(self) -> usize {
        self.number() - 1
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::XOutbound | Self::XReturn => Axis::X,
            Self::YOutbound | Self::YReturn => Axis::Y,
        }
    }

    /// The leg that returns to the origin
    pub fn is_closing(self) -> bool {
        self == Self::YReturn
    }

    /// Corner the leg starts from
    pub fn start_corner(self, config: &Configuration) -> (f64, f64) {
        match self {
            Self::XOutbound => (0.0, 0.0),
            Self::YOutbound => (config.travel_x, 0.0),
            Self::XReturn => (config.travel_x, config.travel_y),
            Self::YReturn => (0.0, config.travel_y),
        }
    }

    /// Corner the leg ends on
    pub fn end_corner(self, config: &Configuration) -> (f64, f64) {
        match self {
            Self::XOutbound => (config.travel_x, 0.0),
            Self::YOutbound => (config.travel_x, config.travel_y),
            Self::XReturn => (0.0, config.travel_y),
            Self::YReturn => (0.0, 0.0),
        }
    }

    fn active(self, (x, y): (f64, f64)) -> f64 {
        match self.axis() {
            Axis::X => x,
            Axis::Y => y,
        }
    }
}

impl std::fmt::Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "leg {} ({})", self.number(), self.axis())
    }
}

/// Machine state after one ramp step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    /// Spindle speed (RPM)
    pub spindle: f64,
    /// Feedrate (mm/min)
    pub feed: f64,
}

/// Complete waypoint sequence of a warmup, origin back to origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    waypoints: Vec<Waypoint>,
    step_density: u32,
    closing_tolerance: f64,
    derived: DerivedConstants,
}

impl Run {
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Waypoints of a single leg
    pub fn leg(&self, leg: Leg) -> &[Waypoint] {
        let steps = self.step_density as usize;
        let start = (leg.index() * steps).min(self.waypoints.len());
        let end = (start + steps).min(self.waypoints.len());
        &self.waypoints[start..end]
    }

    /// Legs with their waypoints, in traversal order
    pub fn legs(&self) -> impl Iterator<Item = (Leg, &[Waypoint])> + '_ {
        Leg::ALL.into_iter().map(move |leg| (leg, self.leg(leg)))
    }

    /// Position reached at the end of a leg
    pub fn corner(&self, leg: Leg) -> Option<(f64, f64)> {
        self.leg(leg).last().map(|w| (w.x, w.y))
    }

    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn step_density(&self) -> u32 {
        self.step_density
    }

    /// Leg 4 exit threshold the run was planned with
    pub fn closing_tolerance(&self) -> f64 {
        self.closing_tolerance
    }

    pub fn derived(&self) -> &DerivedConstants {
        &self.derived
    }
}

/// Running values threaded through the leg loop
#[derive(Debug, Clone, Copy)]
struct RampState {
    x: f64,
    y: f64,
    spindle: f64,
    feed: f64,
    completed: u32,
}

impl RampState {
    fn origin(config: &Configuration) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            spindle: config.spindle_start,
            feed: config.feed_start,
            completed: 0,
        }
    }

    fn step(self, axis: Axis, position: f64, config: &Configuration) -> Self {
        let completed = self.completed + 1;
        let ratio = f64::from(completed) / f64::from(config.total_steps());
        let spindle = config.spindle_start + (config.spindle_finish - config.spindle_start) * ratio;
        let feed = config.feed_start + (config.feed_finish - config.feed_start) * ratio;

        Self {
            spindle,
            feed,
            completed,
            ..self.with_axis(axis, position)
        }
    }

    fn with_axis(self, axis: Axis, position: f64) -> Self {
        match axis {
            Axis::X => Self { x: position, ..self },
            Axis::Y => Self { y: position, ..self },
        }
    }

    fn waypoint(&self) -> Waypoint {
        Waypoint {
            x: self.x,
            y: self.y,
            spindle: self.spindle,
            feed: self.feed,
        }
    }
}

/// Plans warmup runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampPlanner {
    closing_tolerance: f64,
}

impl Default for RampPlanner {
    fn default() -> Self {
        Self {
            closing_tolerance: DEFAULT_CLOSING_TOLERANCE,
        }
    }
}

impl RampPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the leg 4 exit threshold
    pub fn with_closing_tolerance(mut self, tolerance: f64) -> Self {
        self.closing_tolerance = tolerance;
        self
    }

    pub fn closing_tolerance(&self) -> f64 {
        self.closing_tolerance
    }

    /// Plan the full run for a configuration.
    ///
    /// Fails with [`PlanError::Configuration`] for invalid input, including
    /// a closing leg too fine for this planner's tolerance, and with
    /// [`PlanError::NonConvergent`] when a leg does not end exactly on its
    /// last step.
    pub fn plan(&self, config: &Configuration) -> PlanResult<Run> {
        config.validate_for_tolerance(self.closing_tolerance)?;
        let derived = config.derived();

        let mut waypoints = Vec::with_capacity(config.total_steps() as usize);
        let mut state = RampState::origin(config);
        for leg in Leg::ALL {
            state = self.plan_leg(config, leg, state, &mut waypoints)?;
        }

        // The ramp ends on the configured finish values, not on the sum of
        // the increments.
        if let Some(last) = waypoints.last_mut() {
            last.spindle = config.spindle_finish;
            last.feed = config.feed_finish;
        }

        info!(
            waypoints = waypoints.len(),
            step_density = config.step_density,
            "Planned warmup run"
        );

        Ok(Run {
            waypoints,
            step_density: config.step_density,
            closing_tolerance: self.closing_tolerance,
            derived,
        })
    }

    fn plan_leg(
        &self,
        config: &Configuration,
        leg: Leg,
        mut state: RampState,
        waypoints: &mut Vec<Waypoint>,
    ) -> PlanResult<RampState> {
        let steps = config.step_density;
        let from = leg.active(leg.start_corner(config));
        let target = leg.active(leg.end_corner(config));
        let span = target - from;
        let bound = steps.saturating_add(1);

        debug!(leg = leg.number(), axis = %leg.axis(), from, target, steps, "Planning leg");

        for step in 1..=bound {
            let position = step_position(from, span, step, steps);
            state = state.step(leg.axis(), position, config);
            trace!(
                leg = leg.number(),
                step,
                position,
                spindle = state.spindle,
                feed = state.feed,
                "Ramp step"
            );
            waypoints.push(state.waypoint());

            if !self.leg_finished(leg, position, target) {
                continue;
            }
            // Validation keeps the exit from firing before the last step.
            if step != steps {
                return Err(PlanError::NonConvergent {
                    leg: leg.number(),
                    iterations: step,
                });
            }

            state = state.with_axis(leg.axis(), target);
            if let Some(last) = waypoints.last_mut() {
                *last = state.waypoint();
            }
            return Ok(state);
        }

        Err(PlanError::NonConvergent {
            leg: leg.number(),
            iterations: bound,
        })
    }

    fn leg_finished(&self, leg: Leg, position: f64, target: f64) -> bool {
        if leg.is_closing() {
            position < self.closing_tolerance
        } else {
            position == target
        }
    }
}

/// Plan a run with the default closing tolerance.
pub fn plan(config: &Configuration) -> PlanResult<Run> {
    RampPlanner::default().plan(config)
}
