//! Program emission
//!
//! Turns a planned [`Run`] into controller program text in one of two
//! dialects:
//!
//! - **Parametrized**: Q-parameters, labels and `CALL LBL ... REP` loops. The
//!   ramp stays live on the controller, so the operator can edit the
//!   parameters at the top of the program and rerun it.
//! - **Flattened**: literal values only, for controllers without variables
//!   or loops. The perimeter is kept but the ramp collapses into a single
//!   start-to-finish transition.

mod flattened;
mod parametrized;

use crate::program::ProgramText;
use crate::ramp_planner::Run;
use cncwarmup_core::{Configuration, EmitError, EmitResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Program name written into `BEGIN PGM` / `END PGM`
pub const PROGRAM_NAME: &str = "WARMUP";

/// Target program syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Heidenhain conversational program driven by Q-parameters
    #[default]
    Parametrized,
    /// Literal moves without variables, labels or loops
    Flattened,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Parametrized, Dialect::Flattened];

    /// Canonical tag accepted by [`FromStr`]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Parametrized => "parametrized",
            Self::Flattened => "flattened",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Dialect {
    type Err = EmitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parametrized" | "heidenhain" => Ok(Self::Parametrized),
            "flattened" | "flat" => Ok(Self::Flattened),
            _ => Err(EmitError::UnsupportedDialect(s.to_string())),
        }
    }
}

/// Emit the program for a planned run.
pub fn emit(run: &Run, config: &Configuration, dialect: Dialect) -> EmitResult<ProgramText> {
    let program = match dialect {
        Dialect::Parametrized => parametrized::emit(run, config),
        Dialect::Flattened => flattened::emit(run, config),
    };
    debug!(%dialect, lines = program.len(), "Emitted warmup program");
    Ok(program)
}

/// Emit the program for a dialect given by its tag.
pub fn emit_tagged(run: &Run, config: &Configuration, tag: &str) -> EmitResult<ProgramText> {
    emit(run, config, tag.parse()?)
}
