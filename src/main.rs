//! cncwarmup - CNC spindle and axis warmup program generator

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cncwarmup::{
    generate_batch, generate_program, init_logging_with, plan, write_program, Configuration,
    Dialect, GenerationRequest, LogFormat, MachineProfile, WarmupSettings, BUILD_DATE, VERSION,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Id given to envelopes passed with --travel-x/--travel-y
const CUSTOM_MACHINE_ID: &str = "custom";

#[derive(Parser)]
#[command(name = "cncwarmup")]
#[command(about = "Generate spindle and axis warmup programs for CNC machines", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Emit log events as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the warmup program for one machine
    Generate {
        #[command(flatten)]
        run: RunArgs,
        /// Program dialect (parametrized or flattened)
        #[arg(short, long, default_value_t = Dialect::Parametrized)]
        dialect: Dialect,
        /// Output file (default: warmup_machine_<id>.H)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print the program instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Print the planned waypoints as JSON
    Plan {
        #[command(flatten)]
        run: RunArgs,
    },
    /// List the machines in the catalog
    Machines {
        /// Settings file (.toml or .json)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Generate programs for every catalog machine
    All {
        /// Settings file (.toml or .json)
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Program dialect (parametrized or flattened)
        #[arg(short, long, default_value_t = Dialect::Parametrized)]
        dialect: Dialect,
        /// Directory the programs are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Machine and ramp selection shared by `generate` and `plan`
#[derive(Args)]
struct RunArgs {
    /// Machine id from the catalog (default: 1)
    #[arg(short, long, conflicts_with = "travel_x")]
    machine: Option<String>,
    /// X-axis travel in mm, instead of a catalog machine
    #[arg(long, requires = "travel_y")]
    travel_x: Option<f64>,
    /// Y-axis travel in mm, instead of a catalog machine
    #[arg(long, requires = "travel_x")]
    travel_y: Option<f64>,
    /// Spindle speed at the start of the run (RPM)
    #[arg(long)]
    start_rpm: Option<f64>,
    /// Spindle speed at the end of the run (RPM)
    #[arg(long)]
    finish_rpm: Option<f64>,
    /// Feed rate at the start of the run (mm/min)
    #[arg(long)]
    start_feed: Option<f64>,
    /// Feed rate at the end of the run (mm/min)
    #[arg(long)]
    finish_feed: Option<f64>,
    /// Leave coolant off
    #[arg(long)]
    no_coolant: bool,
    /// Ramp steps per edge
    #[arg(long)]
    steps: Option<u32>,
    /// Tool number to call
    #[arg(long)]
    tool: Option<u32>,
    /// Settings file (.toml or .json)
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

impl RunArgs {
    /// Resolve the machine and the effective configuration
    fn resolve(&self) -> Result<(MachineProfile, Configuration)> {
        let settings = WarmupSettings::load_or_default(self.settings.as_deref())?;
        self.resolve_with(settings)
    }

    /// Apply the machine selection and ramp overrides to loaded settings
    fn resolve_with(&self, settings: WarmupSettings) -> Result<(MachineProfile, Configuration)> {
        let machine = match (self.travel_x, self.travel_y) {
            (Some(x), Some(y)) => MachineProfile::new(CUSTOM_MACHINE_ID, x, y),
            _ => {
                let id = self.machine.as_deref().unwrap_or("1");
                settings.machines.get(id)?.clone()
            }
        };

        let mut ramp = settings.ramp;
        if let Some(rpm) = self.start_rpm {
            ramp.start_rpm = rpm;
        }
        if let Some(rpm) = self.finish_rpm {
            ramp.finish_rpm = rpm;
        }
        if let Some(feed) = self.start_feed {
            ramp.start_feedrate = feed;
        }
        if let Some(feed) = self.finish_feed {
            ramp.finish_feedrate = feed;
        }
        if self.no_coolant {
            ramp.coolant = false;
        }
        if let Some(steps) = self.steps {
            ramp.increment_steps = steps;
        }
        if let Some(tool) = self.tool {
            ramp.tool_call_num = tool;
        }

        let config = ramp
            .to_configuration(&machine)
            .with_context(|| format!("machine '{}'", machine.id))?;
        Ok((machine, config))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging_with(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    })?;
    info!(version = VERSION, build_date = BUILD_DATE, "cncwarmup starting");

    match cli.command {
        Commands::Generate {
            run,
            dialect,
            output,
            stdout,
        } => generate(&run, dialect, output, stdout)?,
        Commands::Plan { run } => print_plan(&run)?,
        Commands::Machines { settings } => list_machines(settings.as_deref())?,
        Commands::All {
            settings,
            dialect,
            output_dir,
        } => generate_all(settings.as_deref(), dialect, &output_dir)?,
    }

    Ok(())
}

fn generate(run: &RunArgs, dialect: Dialect, output: Option<PathBuf>, stdout: bool) -> Result<()> {
    let (machine, config) = run.resolve()?;
    let program = generate_program(&config, dialect)?;

    if stdout {
        println!("{}", program);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(machine.output_file_name()));
    write_program(&program, &path)?;
    println!("Wrote {} program to {}", dialect, path.display());
    Ok(())
}

fn print_plan(run: &RunArgs) -> Result<()> {
    let (_, config) = run.resolve()?;
    let run = plan(&config)?;
    println!("{}", serde_json::to_string_pretty(&run)?);
    Ok(())
}

fn list_machines(settings: Option<&Path>) -> Result<()> {
    let settings = WarmupSettings::load_or_default(settings)?;
    for machine in settings.machines.iter() {
        println!(
            "{:<8} X{:<8} Y{:<8} {}",
            machine.id, machine.travel_x, machine.travel_y, machine.name
        );
    }
    Ok(())
}

fn generate_all(settings: Option<&Path>, dialect: Dialect, output_dir: &Path) -> Result<()> {
    let settings = WarmupSettings::load_or_default(settings)?;
    let requests = settings
        .machines
        .ids()
        .map(|id| GenerationRequest::for_machine(&settings, id, dialect))
        .collect::<Result<Vec<_>, _>>()?;

    let mut failures = 0;
    for (machine, result) in settings.machines.iter().zip(generate_batch(&requests)) {
        let path = output_dir.join(machine.output_file_name());
        match result.and_then(|program| write_program(&program, &path)) {
            Ok(()) => println!("Wrote {} program to {}", dialect, path.display()),
            Err(e) => {
                error!(machine = %machine.id, "Failed to generate warmup program: {}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} programs failed", failures, requests.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(["cncwarmup", "plan"].iter().chain(args).copied())
            .unwrap();
        match cli.command {
            Commands::Plan { run } => run,
            _ => panic!("expected the plan command"),
        }
    }

    #[test]
    fn test_defaults_to_machine_one() {
        let (machine, config) = run_args(&[])
            .resolve_with(WarmupSettings::default())
            .unwrap();
        assert_eq!(machine.id, "1");
        assert_eq!((config.travel_x, config.travel_y), (762.0, 508.0));
        assert_eq!(config.step_density, 15);
        assert!(config.coolant_enabled);
    }

    #[test]
    fn test_ramp_overrides() {
        let args = run_args(&[
            "--machine",
            "2",
            "--start-rpm",
            "800",
            "--finish-rpm",
            "4000",
            "--start-feed",
            "250",
            "--finish-feed",
            "1200",
            "--no-coolant",
            "--steps",
            "10",
            "--tool",
            "3",
        ]);
        let (machine, config) = args.resolve_with(WarmupSettings::default()).unwrap();
        assert_eq!(machine.id, "2");
        assert_eq!(config.travel_x, 1016.0);
        assert_eq!(config.spindle_start, 800.0);
        assert_eq!(config.spindle_finish, 4000.0);
        assert_eq!(config.feed_start, 250.0);
        assert_eq!(config.feed_finish, 1200.0);
        assert!(!config.coolant_enabled);
        assert_eq!(config.step_density, 10);
        assert_eq!(config.tool_number, 3);
    }

    #[test]
    fn test_custom_travel() {
        let (machine, config) = run_args(&["--travel-x", "600", "--travel-y", "400"])
            .resolve_with(WarmupSettings::default())
            .unwrap();
        assert_eq!(machine.id, CUSTOM_MACHINE_ID);
        assert_eq!(machine.output_file_name(), "warmup_machine_custom.H");
        assert_eq!((config.travel_x, config.travel_y), (600.0, 400.0));
    }

    #[test]
    fn test_travel_flags_must_be_paired() {
        let result = Cli::try_parse_from(["cncwarmup", "plan", "--travel-x", "600"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_machine_conflicts_with_custom_travel() {
        let result = Cli::try_parse_from([
            "cncwarmup",
            "plan",
            "--machine",
            "2",
            "--travel-x",
            "600",
            "--travel-y",
            "400",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_machine() {
        let err = run_args(&["--machine", "9"])
            .resolve_with(WarmupSettings::default())
            .unwrap_err();
        assert!(err.to_string().contains("Unknown machine: 9"));
    }

    #[test]
    fn test_invalid_override_names_field() {
        let err = run_args(&["--steps", "600"])
            .resolve_with(WarmupSettings::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "machine '1'");
        assert!(format!("{:#}", err).contains("'step_density'"));
    }

    #[test]
    fn test_dialect_flag() {
        let cli = Cli::try_parse_from(["cncwarmup", "generate", "--dialect", "flat", "--stdout"])
            .unwrap();
        match cli.command {
            Commands::Generate {
                dialect, stdout, ..
            } => {
                assert_eq!(dialect, Dialect::Flattened);
                assert!(stdout);
            }
            _ => panic!("expected the generate command"),
        }
        assert!(Cli::try_parse_from(["cncwarmup", "generate", "--dialect", "iso"]).is_err());
    }
}
