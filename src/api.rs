//! Collaborator interfaces the scheduling workflow calls into.
//!
//! The console does not own persistence or transport. Jobs, machine types,
//! schedules and bulk imports live behind a REST API; these traits describe
//! the calls the workflow needs from it. Notifications go to whatever
//! surface the host application provides.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust.

use async_trait::async_trait;

use crate::error::RemoteResult;
use crate::ingest::ImportBatch;
use crate::models::{Job, MachineType, Schedule};

/// Job CRUD.
#[async_trait]
pub trait JobDirectory: Send + Sync {
    /// List all jobs.
    async fn list_jobs(&self) -> RemoteResult<Vec<Job>>;

    /// Fetch a single job.
    async fn get_job(&self, id: i64) -> RemoteResult<Job>;

    /// Replace a job, keyed by `job.id`.
    async fn update_job(&self, job: &Job) -> RemoteResult<()>;

    /// Delete a job.
    async fn delete_job(&self, id: i64) -> RemoteResult<()>;
}

/// Machine type CRUD.
#[async_trait]
pub trait MachineDirectory: Send + Sync {
    async fn list_machine_types(&self) -> RemoteResult<Vec<MachineType>>;

    /// Create a machine type; the returned value carries the assigned id.
    async fn create_machine_type(&self, machine_type: &MachineType) -> RemoteResult<MachineType>;

    async fn update_machine_type(&self, machine_type: &MachineType) -> RemoteResult<MachineType>;

    async fn delete_machine_type(&self, id: i64) -> RemoteResult<()>;
}

/// Schedule persistence.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list_schedules(&self) -> RemoteResult<Vec<Schedule>>;

    /// Create a schedule. The payload carries no `id`.
    async fn create_schedule(&self, schedule: &Schedule) -> RemoteResult<Schedule>;

    /// Update the schedule identified by `id`.
    async fn update_schedule(&self, schedule: &Schedule, id: i64) -> RemoteResult<Schedule>;

    async fn delete_schedule(&self, id: i64) -> RemoteResult<()>;
}

/// Bulk import endpoint.
///
/// Accepts or rejects a batch as a whole.
#[async_trait]
pub trait ImportEndpoint: Send + Sync {
    /// Submit a batch. `Ok(Some(msg))` carries the server's confirmation text.
    async fn import_batch(&self, batch: &ImportBatch) -> RemoteResult<Option<String>>;
}

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// A message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Operator notification surface (toast, modal, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Success => log::info!("{}", notice.message),
            Severity::Warning => log::warn!("{}", notice.message),
            Severity::Error => log::error!("{}", notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        assert_eq!(Notice::success("ok").severity, Severity::Success);
        assert_eq!(Notice::error("failed").severity, Severity::Error);
        let warning = Notice::warning("list not refreshed");
        assert_eq!(warning.severity, Severity::Warning);
        assert_eq!(warning.message, "list not refreshed");
        LogNotifier.notify(warning);
    }
}
