//! In-memory collaborators for development and testing.
//!
//! [`InMemoryConsole`] implements every collaborator trait against a
//! shared in-process state. It assigns ids on create, counts every call
//! and can be primed to fail the next one. Clones share state, so a test
//! can hand one clone to the workflow and inspect another.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::{ImportEndpoint, JobDirectory, MachineDirectory, Notice, Notifier, ScheduleStore};
use crate::error::{RemoteError, RemoteResult};
use crate::ingest::ImportBatch;
use crate::models::{Job, Machine, MachineType, Schedule};

/// Number of calls received per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_jobs: usize,
    pub get_job: usize,
    pub update_job: usize,
    pub delete_job: usize,
    pub list_machine_types: usize,
    pub create_machine_type: usize,
    pub update_machine_type: usize,
    pub delete_machine_type: usize,
    pub list_schedules: usize,
    pub create_schedule: usize,
    pub update_schedule: usize,
    pub delete_schedule: usize,
    pub import_batch: usize,
}

#[derive(Debug, Default)]
struct State {
    jobs: Vec<Job>,
    machine_types: Vec<MachineType>,
    machines: Vec<Machine>,
    schedules: Vec<Schedule>,
    next_id: i64,
    calls: CallCounts,
    fail_next: Option<RemoteError>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Pops the primed failure, if any.
    fn check(&mut self) -> RemoteResult<()> {
        match self.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn bump_ids_past(&mut self, id: i64) {
        self.next_id = self.next_id.max(id);
    }
}

fn not_found(what: &str, id: i64) -> RemoteError {
    RemoteError::with_message(404, format!("{what} {id} not found"))
}

/// Shared in-memory implementation of all collaborators.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConsole {
    state: Arc<Mutex<State>>,
}

impl InMemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds jobs. Jobs with `id == 0` get an id assigned.
    pub fn with_jobs(self, jobs: impl IntoIterator<Item = Job>) -> Self {
        {
            let mut state = self.state.lock();
            for mut job in jobs {
                if job.id == 0 {
                    job.id = state.next_id();
                }
                state.bump_ids_past(job.id);
                state.jobs.push(job);
            }
        }
        self
    }

    /// Seeds machine types. Types with `id == 0` get an id assigned.
    pub fn with_machine_types(self, types: impl IntoIterator<Item = MachineType>) -> Self {
        {
            let mut state = self.state.lock();
            for mut t in types {
                if t.id == 0 {
                    t.id = state.next_id();
                }
                state.bump_ids_past(t.id);
                state.machine_types.push(t);
            }
        }
        self
    }

    /// Seeds schedules. Schedules without an id get one assigned.
    pub fn with_schedules(self, schedules: impl IntoIterator<Item = Schedule>) -> Self {
        {
            let mut state = self.state.lock();
            for mut s in schedules {
                let id = match s.id {
                    Some(id) => id,
                    None => state.next_id(),
                };
                s.id = Some(id);
                state.bump_ids_past(id);
                state.schedules.push(s);
            }
        }
        self
    }

    /// Makes the next call, whatever it is, fail with `error`.
    pub fn fail_next(&self, error: RemoteError) {
        self.state.lock().fail_next = Some(error);
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.state.lock().jobs.clone()
    }

    pub fn machine_types(&self) -> Vec<MachineType> {
        self.state.lock().machine_types.clone()
    }

    pub fn machines(&self) -> Vec<Machine> {
        self.state.lock().machines.clone()
    }

    pub fn schedules(&self) -> Vec<Schedule> {
        self.state.lock().schedules.clone()
    }
}

#[async_trait]
impl JobDirectory for InMemoryConsole {
    async fn list_jobs(&self) -> RemoteResult<Vec<Job>> {
        let mut state = self.state.lock();
        state.calls.list_jobs += 1;
        state.check()?;
        Ok(state.jobs.clone())
    }

    async fn get_job(&self, id: i64) -> RemoteResult<Job> {
        let mut state = self.state.lock();
        state.calls.get_job += 1;
        state.check()?;
        state
            .jobs
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| not_found("Job", id))
    }

    async fn update_job(&self, job: &Job) -> RemoteResult<()> {
        let mut state = self.state.lock();
        state.calls.update_job += 1;
        state.check()?;
        let slot = state
            .jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| not_found("Job", job.id))?;
        *slot = job.clone();
        Ok(())
    }

    async fn delete_job(&self, id: i64) -> RemoteResult<()> {
        let mut state = self.state.lock();
        state.calls.delete_job += 1;
        state.check()?;
        let before = state.jobs.len();
        state.jobs.retain(|j| j.id != id);
        if state.jobs.len() == before {
            return Err(not_found("Job", id));
        }
        Ok(())
    }
}

#[async_trait]
impl MachineDirectory for InMemoryConsole {
    async fn list_machine_types(&self) -> RemoteResult<Vec<MachineType>> {
        let mut state = self.state.lock();
        state.calls.list_machine_types += 1;
        state.check()?;
        Ok(state.machine_types.clone())
    }

    async fn create_machine_type(&self, machine_type: &MachineType) -> RemoteResult<MachineType> {
        let mut state = self.state.lock();
        state.calls.create_machine_type += 1;
        state.check()?;
        let created = MachineType {
            id: state.next_id(),
            ..machine_type.clone()
        };
        state.machine_types.push(created.clone());
        Ok(created)
    }

    async fn update_machine_type(&self, machine_type: &MachineType) -> RemoteResult<MachineType> {
        let mut state = self.state.lock();
        state.calls.update_machine_type += 1;
        state.check()?;
        let slot = state
            .machine_types
            .iter_mut()
            .find(|t| t.id == machine_type.id)
            .ok_or_else(|| not_found("Machine type", machine_type.id))?;
        *slot = machine_type.clone();
        Ok(machine_type.clone())
    }

    async fn delete_machine_type(&self, id: i64) -> RemoteResult<()> {
        let mut state = self.state.lock();
        state.calls.delete_machine_type += 1;
        state.check()?;
        let before = state.machine_types.len();
        state.machine_types.retain(|t| t.id != id);
        if state.machine_types.len() == before {
            return Err(not_found("Machine type", id));
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for InMemoryConsole {
    async fn list_schedules(&self) -> RemoteResult<Vec<Schedule>> {
        let mut state = self.state.lock();
        state.calls.list_schedules += 1;
        state.check()?;
        Ok(state.schedules.clone())
    }

    async fn create_schedule(&self, schedule: &Schedule) -> RemoteResult<Schedule> {
        let mut state = self.state.lock();
        state.calls.create_schedule += 1;
        state.check()?;
        if schedule.id.is_some() {
            return Err(RemoteError::with_message(400, "New schedules must not carry an id"));
        }
        let created = Schedule {
            id: Some(state.next_id()),
            ..schedule.clone()
        };
        state.schedules.push(created.clone());
        Ok(created)
    }

    async fn update_schedule(&self, schedule: &Schedule, id: i64) -> RemoteResult<Schedule> {
        let mut state = self.state.lock();
        state.calls.update_schedule += 1;
        state.check()?;
        let slot = state
            .schedules
            .iter_mut()
            .find(|s| s.id == Some(id))
            .ok_or_else(|| not_found("Schedule", id))?;
        *slot = Schedule {
            id: Some(id),
            ..schedule.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_schedule(&self, id: i64) -> RemoteResult<()> {
        let mut state = self.state.lock();
        state.calls.delete_schedule += 1;
        state.check()?;
        let before = state.schedules.len();
        state.schedules.retain(|s| s.id != Some(id));
        if state.schedules.len() == before {
            return Err(not_found("Schedule", id));
        }
        Ok(())
    }
}

#[async_trait]
impl ImportEndpoint for InMemoryConsole {
    async fn import_batch(&self, batch: &ImportBatch) -> RemoteResult<Option<String>> {
        let mut state = self.state.lock();
        state.calls.import_batch += 1;
        state.check()?;
        match batch {
            ImportBatch::Jobs(jobs) => {
                for job in jobs {
                    let id = if job.id == 0 { state.next_id() } else { job.id };
                    state.bump_ids_past(id);
                    state.jobs.retain(|j| j.id != id);
                    state.jobs.push(Job { id, ..job.clone() });
                }
            }
            ImportBatch::Machines(machines) => {
                for machine in machines {
                    let id = state.next_id();
                    state.machines.push(Machine {
                        id,
                        ..machine.clone()
                    });
                }
            }
        }
        Ok(None)
    }
}

/// Notifier that keeps every notice for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}
