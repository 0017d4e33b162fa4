//! In-memory view of jobs, machine types and schedules.
//!
//! The board is refreshed wholesale after every mutating call rather than
//! patched incrementally, so the console never diverges from the server.
//! A failed reload leaves the previous collection in place.

use log::{debug, warn};

use crate::api::{JobDirectory, MachineDirectory, ScheduleStore};
use crate::error::RemoteResult;
use crate::models::{find_overlaps, BookingOverlap, Job, MachineType, Schedule};

/// Collections shown by the scheduling screen.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBoard {
    jobs: Vec<Job>,
    machine_types: Vec<MachineType>,
    schedules: Vec<Schedule>,
}

impl ScheduleBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn machine_types(&self) -> &[MachineType] {
        &self.machine_types
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    /// Looks up a job by id.
    pub fn job(&self, id: i64) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Resolves the job a schedule refers to.
    pub fn job_for(&self, schedule: &Schedule) -> Option<&Job> {
        schedule.job_id.and_then(|id| self.job(id))
    }

    /// Schedules whose job is not in the job collection.
    pub fn orphan_schedules(&self) -> Vec<&Schedule> {
        self.schedules
            .iter()
            .filter(|s| s.job_id.is_some() && self.job_for(s).is_none())
            .collect()
    }

    /// Double bookings among the loaded schedules.
    pub fn overlaps(&self) -> Vec<BookingOverlap> {
        find_overlaps(&self.schedules)
    }

    /// Reloads jobs, then schedules.
    pub async fn reload<S>(&mut self, source: &S) -> RemoteResult<()>
    where
        S: JobDirectory + ScheduleStore,
    {
        self.jobs = source.list_jobs().await?;
        debug!("Jobs retrieved: {}", self.jobs.len());
        self.reload_schedules(source).await
    }

    /// Reloads the schedule collection.
    pub async fn reload_schedules<S: ScheduleStore + ?Sized>(&mut self, store: &S) -> RemoteResult<()> {
        self.schedules = store.list_schedules().await?;
        debug!("Schedules retrieved: {}", self.schedules.len());
        for orphan in self.orphan_schedules() {
            warn!(
                "Schedule {:?} refers to job {:?}, which was not found",
                orphan.id, orphan.job_id
            );
        }
        Ok(())
    }

    /// Reloads the machine types offered for selection.
    pub async fn reload_machine_types<D: MachineDirectory + ?Sized>(
        &mut self,
        directory: &D,
    ) -> RemoteResult<()> {
        self.machine_types = directory.list_machine_types().await?;
        debug!("Machine types retrieved: {}", self.machine_types.len());
        Ok(())
    }

    /// Appends a schedule the server just confirmed.
    pub(crate) fn push_schedule(&mut self, schedule: Schedule) {
        self.schedules.push(schedule);
    }

    /// Drops a schedule the server just deleted.
    pub(crate) fn remove_schedule(&mut self, id: i64) {
        self.schedules.retain(|s| s.id != Some(id));
    }
}
