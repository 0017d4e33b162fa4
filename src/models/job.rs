//! Job model.
//!
//! A job is a unit of work that requires one machine type for a fixed
//! duration. Jobs exist before any schedule references them; they are
//! created directly or through bulk import.

use serde::{Deserialize, Serialize};

use super::{DurationParts, MachineType};

/// Lifecycle status shared by jobs and schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[default]
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// Job priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Reference to the user a job is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User identifier as issued by the identity provider.
    pub id: String,
    /// Login email shown in the assignee column.
    pub email: String,
}

/// A job to be scheduled.
///
/// Field names follow the console's REST contract (`requiredMachineType`,
/// etc.). `id == 0` marks a job that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Server-assigned identifier (0 until persisted).
    #[serde(default)]
    pub id: i64,
    /// Title shown to operators. Required.
    #[serde(default)]
    pub title: String,
    /// Free-text details. Optional.
    #[serde(default)]
    pub description: String,
    /// Lifecycle status; the server treats absent as `PENDING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    /// Used by the priority dispatch criterion; absent sorts last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Total processing time in whole seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Machine type capable of processing this job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_machine_type: Option<MachineType>,
    /// Operator responsible for the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserRef>,
}

impl Job {
    /// Creates an unpersisted job with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the duration in seconds.
    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Sets the required machine type.
    pub fn with_machine_type(mut self, machine_type: MachineType) -> Self {
        self.required_machine_type = Some(machine_type);
        self
    }

    /// Sets the assignee.
    pub fn with_assignee(mut self, id: impl Into<String>, email: impl Into<String>) -> Self {
        self.assignee = Some(UserRef {
            id: id.into(),
            email: email.into(),
        });
        self
    }

    /// Writes a composed h/m/s duration back onto the job.
    pub fn apply_duration(&mut self, parts: DurationParts) {
        self.duration = Some(parts.total_seconds());
    }

    /// Identifier of the required machine type, if one is selected.
    ///
    /// A reference with `id == 0` counts as unselected.
    pub fn machine_type_id(&self) -> Option<i64> {
        self.required_machine_type
            .as_ref()
            .map(|t| t.id)
            .filter(|&id| id != 0)
    }

    /// Whether the job has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}
