//! Machine and machine type models.
//!
//! A machine type is a capability category. Jobs require one; machines
//! provide one. Machines are concrete instances with an operational status.

use serde::{Deserialize, Serialize};

/// A capability category a machine provides and a job requires.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MachineType {
    /// Server-assigned identifier; 0 means no type selected.
    #[serde(default)]
    pub id: i64,
    /// Display name, e.g. "Lathe".
    #[serde(default)]
    pub name: String,
    /// Free-text details.
    #[serde(default)]
    pub description: String,
}

impl MachineType {
    /// Creates a machine type.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Operational status of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    #[default]
    Available,
    Busy,
    Maintenance,
    OutOfService,
}

/// A concrete machine.
///
/// `id == 0` means "not yet persisted, server will assign".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    /// Server-assigned identifier (0 until persisted).
    #[serde(default)]
    pub id: i64,
    /// Display name. Required.
    #[serde(default)]
    pub name: String,
    /// Free-text details.
    #[serde(default)]
    pub description: String,
    /// Only `AVAILABLE` machines receive dispatched work.
    #[serde(default)]
    pub status: MachineStatus,
    /// Machine type this machine provides.
    #[serde(default)]
    pub type_id: i64,
}

impl Machine {
    /// Creates an unpersisted, available machine.
    pub fn new(name: impl Into<String>, type_id: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: String::new(),
            status: MachineStatus::Available,
            type_id,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: MachineStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the machine can take new work right now.
    pub fn is_available(&self) -> bool {
        self.status == MachineStatus::Available
    }

    /// Whether the machine provides the given machine type.
    pub fn provides(&self, machine_type_id: i64) -> bool {
        self.type_id != 0 && self.type_id == machine_type_id
    }
}
