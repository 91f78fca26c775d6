//! # CNC Warmup
//!
//! Generates spindle and axis warmup programs for CNC machining centres.
//! A warmup run traces the perimeter of the machine's X/Y travel while the
//! spindle speed and feedrate ramp from their start to their finish values.
//!
//! ## Architecture
//!
//! The workspace is organized into crates:
//!
//! 1. **cncwarmup-core** - Configuration model and error types
//! 2. **cncwarmup-camtools** - Ramp planner and program emitter
//! 3. **cncwarmup-settings** - Machine catalog and settings files
//! 4. **cncwarmup** - Library facade, output writer and the command line

pub mod error;
pub mod output;

use tracing::info;

pub use cncwarmup_camtools::{
    emit, plan, Dialect, Leg, ProgramText, RampPlanner, Run, Waypoint, WarmupProgramGenerator,
    DEFAULT_CLOSING_TOLERANCE,
};
pub use cncwarmup_core::{Configuration, ConfigurationError, EmitError, PlanError};
pub use cncwarmup_settings::{
    MachineCatalog, MachineProfile, RampSettings, SettingsError, WarmupSettings,
};
pub use error::{WarmupError, WarmupResult};
pub use output::write_program;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// One program to generate
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Label used in logs and errors, usually the machine id
    pub name: String,
    pub config: Configuration,
    pub dialect: Dialect,
}

impl GenerationRequest {
    pub fn new(name: impl Into<String>, config: Configuration, dialect: Dialect) -> Self {
        Self {
            name: name.into(),
            config,
            dialect,
        }
    }

    /// Request for a catalog machine using the settings' ramp
    pub fn for_machine(
        settings: &WarmupSettings,
        machine_id: &str,
        dialect: Dialect,
    ) -> WarmupResult<Self> {
        let config = settings.configuration_for(machine_id)?;
        Ok(Self::new(machine_id, config, dialect))
    }

    pub fn generate(&self) -> WarmupResult<ProgramText> {
        generate_program(&self.config, self.dialect)
    }
}

/// Validate, plan and emit one program.
pub fn generate_program(config: &Configuration, dialect: Dialect) -> WarmupResult<ProgramText> {
    Ok(WarmupProgramGenerator::new(config.clone(), dialect).generate()?)
}

/// Generate many programs concurrently, one scoped thread per request.
///
/// Results are returned in request order. A failing request does not affect
/// the others.
pub fn generate_batch(requests: &[GenerationRequest]) -> Vec<WarmupResult<ProgramText>> {
    info!(requests = requests.len(), "Generating warmup program batch");

    std::thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|request| {
                let handle = std::thread::Builder::new()
                    .name(format!("warmup-{}", request.name))
                    .spawn_scoped(scope, move || request.generate());
                (request, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(request, handle)| match handle {
                Ok(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(WarmupError::WorkerPanicked(request.name.clone()))),
                Err(e) => Err(WarmupError::Io(e)),
            })
            .collect()
    })
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so program text on stdout stays clean
/// - RUST_LOG environment variable support, `info` when unset
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::default())
}

/// Initialize logging in the given format
pub fn init_logging_with(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_names(true);
            registry.with(fmt_layer).try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_thread_names(true);
            registry.with(fmt_layer).try_init()?;
        }
    }

    Ok(())
}
