//! Settings file
//!
//! Holds the ramp values shared by every machine and the machine catalog.
//! Files are read and written as TOML or JSON depending on the extension.
//! Missing sections fall back to the shop defaults, so a file that only
//! overrides `finish_rpm` is valid.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use crate::machines::{MachineCatalog, MachineProfile};
use cncwarmup_core::Configuration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "cncwarmup";

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Spindle and feed ramp shared by all machines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampSettings {
    /// Spindle speed at the start of the run (RPM)
    pub start_rpm: f64,
    /// Spindle speed at the end of the run (RPM)
    pub finish_rpm: f64,
    /// Feed rate at the start of the run (mm/min)
    pub start_feedrate: f64,
    /// Feed rate at the end of the run (mm/min)
    pub finish_feedrate: f64,
    /// Turn flood coolant on during the run
    pub coolant: bool,
    /// Tool called before the run
    pub tool_call_num: u32,
    /// Steps per leg
    pub increment_steps: u32,
}

impl Default for RampSettings {
    fn default() -> Self {
        Self {
            start_rpm: 500.0,
            finish_rpm: 3000.0,
            start_feedrate: 200.0,
            finish_feedrate: 800.0,
            coolant: true,
            tool_call_num: 1,
            increment_steps: 15,
        }
    }
}

impl RampSettings {
    /// Combine the ramp with a machine's travel into a validated configuration.
    pub fn to_configuration(&self, machine: &MachineProfile) -> SettingsResult<Configuration> {
        let config = Configuration {
            travel_x: machine.travel_x,
            travel_y: machine.travel_y,
            spindle_start: self.start_rpm,
            spindle_finish: self.finish_rpm,
            feed_start: self.start_feedrate,
            feed_finish: self.finish_feedrate,
            coolant_enabled: self.coolant,
            step_density: self.increment_steps,
            tool_number: self.tool_call_num,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Contents of a settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupSettings {
    #[serde(default)]
    pub ramp: RampSettings,
    #[serde(default = "MachineCatalog::builtin")]
    pub machines: MachineCatalog,
}

impl Default for WarmupSettings {
    fn default() -> Self {
        Self {
            ramp: RampSettings::default(),
            machines: MachineCatalog::builtin(),
        }
    }
}

impl WarmupSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform location of the settings file,
    /// e.g. `~/.config/cncwarmup/settings.toml` on Linux.
    pub fn default_path() -> SettingsResult<PathBuf> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config or home directory".to_string())
            })?;
        path.push(APP_DIR_NAME);
        path.push(SETTINGS_FILE_NAME);
        Ok(path)
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let settings: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        info!(
            path = %path.display(),
            machines = settings.machines.len(),
            "Loaded warmup settings"
        );
        Ok(settings)
    }

    /// Load from `path` if given, else from the default location if a file
    /// exists there, else fall back to the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.is_file() => Self::load_from_file(&default),
            _ => {
                debug!("No settings file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save settings to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match FileFormat::from_path(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), "Saved warmup settings");
        Ok(())
    }

    /// Validate the catalog and the ramp against every machine
    pub fn validate(&self) -> SettingsResult<()> {
        self.machines.validate()?;
        for machine in self.machines.iter() {
            self.ramp.to_configuration(machine)?;
        }
        Ok(())
    }

    /// Configuration for one machine of the catalog
    pub fn configuration_for(&self, machine_id: &str) -> SettingsResult<Configuration> {
        let machine = self.machines.get(machine_id)?;
        self.ramp.to_configuration(machine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}
