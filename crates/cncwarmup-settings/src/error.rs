//! Error types for the settings crate.
//!
//! This module provides structured error types for machine profiles,
//! settings files, and validation.

use cncwarmup_core::ConfigurationError;
use std::io;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be loaded.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// The settings file could not be saved.
    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// No machine with this id exists in the catalog.
    #[error("Unknown machine: {0}")]
    UnknownMachine(String),

    /// The configuration directory could not be found.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// A settings validation error occurred.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The ramp settings produce an invalid warmup configuration.
    #[error("Invalid warmup configuration: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Errors related to settings validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A machine profile is invalid.
    #[error("Invalid machine '{id}': {reason}")]
    InvalidMachine { id: String, reason: String },

    /// Two machine profiles share an id.
    #[error("Duplicate machine id: {0}")]
    DuplicateMachine(String),

    /// Two machine ids map to the same output file.
    #[error("Machines '{first}' and '{second}' would both write {file_name}")]
    OutputNameCollision {
        first: String,
        second: String,
        file_name: String,
    },

    /// The machine catalog is empty.
    #[error("No machines configured")]
    NoMachines,
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for settings validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
