//! Machine profiles
//!
//! A machine is identified by a short id and described by its X and Y
//! travel. The built-in catalog holds the three shop machines the warmup
//! programs were first written for.

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};

/// Travel envelope of one machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineProfile {
    /// Catalog id, also used in output file names
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// X-axis travel (mm)
    pub travel_x: f64,
    /// Y-axis travel (mm)
    pub travel_y: f64,
}

impl MachineProfile {
    pub fn new(id: impl Into<String>, travel_x: f64, travel_y: f64) -> Self {
        let id = id.into();
        Self {
            name: format!("Machine {}", id),
            id,
            travel_x,
            travel_y,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Default file name of the program generated for this machine
    pub fn output_file_name(&self) -> String {
        let id: String = self
            .id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("warmup_machine_{}.H", id)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::InvalidMachine {
                id: self.id.clone(),
                reason: "id must not be empty".to_string(),
            });
        }
        for (axis, travel) in [("travel_x", self.travel_x), ("travel_y", self.travel_y)] {
            if !travel.is_finite() || travel <= 0.0 {
                return Err(ConfigError::InvalidMachine {
                    id: self.id.clone(),
                    reason: format!("{} must be > 0", axis),
                });
            }
        }
        Ok(())
    }
}

/// Ordered set of machine profiles with unique ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineCatalog {
    machines: Vec<MachineProfile>,
}

impl MachineCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shop machines shipped with the generator
    pub fn builtin() -> Self {
        Self {
            machines: vec![
                MachineProfile::new("1", 762.0, 508.0),
                MachineProfile::new("2", 1016.0, 660.0),
                MachineProfile::new("3", 1270.0, 508.0),
            ],
        }
    }

    /// Look up a machine by id
    pub fn get(&self, id: &str) -> SettingsResult<&MachineProfile> {
        self.machines
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| SettingsError::UnknownMachine(id.to_string()))
    }

    /// Add a machine, replacing and returning any profile with the same id
    pub fn insert(&mut self, profile: MachineProfile) -> Option<MachineProfile> {
        match self.machines.iter_mut().find(|m| m.id == profile.id) {
            Some(existing) => Some(std::mem::replace(existing, profile)),
            None => {
                self.machines.push(profile);
                None
            }
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.machines.iter().map(|m| m.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MachineProfile> {
        self.machines.iter()
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Validate every profile and check that ids and output file names
    /// are unique
    pub fn validate(&self) -> ConfigResult<()> {
        if self.machines.is_empty() {
            return Err(ConfigError::NoMachines);
        }
        for (index, machine) in self.machines.iter().enumerate() {
            machine.validate()?;
            let earlier = &self.machines[..index];
            if earlier.iter().any(|m| m.id == machine.id) {
                return Err(ConfigError::DuplicateMachine(machine.id.clone()));
            }
            let file_name = machine.output_file_name();
            if let Some(other) = earlier.iter().find(|m| m.output_file_name() == file_name) {
                return Err(ConfigError::OutputNameCollision {
                    first: other.id.clone(),
                    second: machine.id.clone(),
                    file_name,
                });
            }
        }
        Ok(())
    }
}
