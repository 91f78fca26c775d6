use crate::emitter::{self, Dialect};
use crate::error::CamToolResult;
use crate::program::ProgramText;
use crate::ramp_planner::{RampPlanner, Run};
use cncwarmup_core::Configuration;
use tracing::info;

/// Generator for warmup programs
///
/// Validates the configuration, plans the ramp and emits the program in the
/// requested dialect.
#[derive(Debug, Clone)]
pub struct WarmupProgramGenerator {
    config: Configuration,
    dialect: Dialect,
    planner: RampPlanner,
}

impl WarmupProgramGenerator {
    /// Create a new generator with the default ramp planner
    pub fn new(config: Configuration, dialect: Dialect) -> Self {
        Self {
            config,
            dialect,
            planner: RampPlanner::default(),
        }
    }

    /// Use a specific planner, e.g. with a different closing tolerance
    pub fn with_planner(mut self, planner: RampPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Plan the run without emitting it
    pub fn plan(&self) -> CamToolResult<Run> {
        self.config
            .validate_for_tolerance(self.planner.closing_tolerance())?;
        Ok(self.planner.plan(&self.config)?)
    }

    /// Generate the program text
    pub fn generate(&self) -> CamToolResult<ProgramText> {
        let run = self.plan()?;
        let program = emitter::emit(&run, &self.config, self.dialect)?;
        info!(
            dialect = %self.dialect,
            travel_x = self.config.travel_x,
            travel_y = self.config.travel_y,
            lines = program.len(),
            "Generated warmup program"
        );
        Ok(program)
    }
}
