//! CNC Warmup Settings Crate
//!
//! Machine profiles, the shared ramp settings, and settings file persistence.

pub mod config;
pub mod error;
pub mod machines;

pub use config::{RampSettings, WarmupSettings, APP_DIR_NAME, SETTINGS_FILE_NAME};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use machines::{MachineCatalog, MachineProfile};
