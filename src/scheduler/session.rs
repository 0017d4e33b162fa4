//! Scheduling dialog session.
//!
//! One session object holds the single in-flight scheduling dialog. Its
//! state is explicit: `Idle`, `Creating` a schedule for a job, or `Editing`
//! an existing schedule. Opening a dialog replaces whatever was open;
//! uncommitted edits are discarded.

use chrono::{DateTime, Utc};
use log::debug;

use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{end_time, Job, Schedule, ScheduleStatus, WorkingDay};
use crate::validation::{validate_job_for_scheduling, validate_schedule_times};

/// Operator-editable fields of the scheduling dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleForm {
    pub start_time: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}

/// State of the scheduling dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// No dialog open.
    #[default]
    Idle,
    /// Scheduling a job that has no schedule yet.
    Creating { job: Job, form: ScheduleForm },
    /// Changing an existing schedule. `job` is `None` when the schedule's
    /// job is not in the loaded collection.
    Editing {
        schedule: Schedule,
        job: Option<Job>,
        form: ScheduleForm,
    },
}

/// Request produced by a valid session.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleRequest {
    /// Payload carries no `id`.
    Create(Schedule),
    /// Update keyed by the pre-existing schedule id.
    Update { id: i64, schedule: Schedule },
}

/// The scheduling dialog context passed into the reconciler.
#[derive(Debug, Clone, Default)]
pub struct SchedulingSession {
    state: SessionState,
    slots: Vec<DateTime<Utc>>,
}

impl SchedulingSession {
    /// Creates an idle session offering the given start-time slots.
    pub fn new(slots: Vec<DateTime<Utc>>) -> Self {
        Self {
            state: SessionState::Idle,
            slots,
        }
    }

    /// Creates an idle session with today's slots for `day`.
    pub fn for_today(day: &WorkingDay) -> Self {
        Self::new(day.today_slots())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SessionState::Idle)
    }

    /// Selectable start times.
    pub fn slots(&self) -> &[DateTime<Utc>] {
        &self.slots
    }

    /// Opens the dialog to schedule `job`, with an empty form.
    pub fn open_for_job(&mut self, job: Job) {
        self.discard_open_dialog();
        debug!("Opening scheduling dialog for job {}", job.id);
        self.state = SessionState::Creating {
            job,
            form: ScheduleForm::default(),
        };
    }

    /// Opens the dialog to edit `schedule`, pre-filled from its stored times.
    pub fn open_for_schedule(&mut self, schedule: Schedule, job: Option<Job>) {
        self.discard_open_dialog();
        debug!("Opening edit dialog for schedule {:?}", schedule.id);
        let form = ScheduleForm {
            start_time: schedule.start_time,
            due_date: schedule.due_date,
        };
        self.state = SessionState::Editing {
            schedule,
            job,
            form,
        };
    }

    /// Closes the dialog without submitting.
    pub fn dismiss(&mut self) {
        if !self.is_idle() {
            debug!("Scheduling dialog closed");
        }
        self.state = SessionState::Idle;
    }

    pub fn form(&self) -> Option<&ScheduleForm> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Creating { form, .. } | SessionState::Editing { form, .. } => Some(form),
        }
    }

    /// Sets the start time. Fails when no dialog is open.
    pub fn set_start_time(&mut self, start_time: Option<DateTime<Utc>>) -> WorkflowResult<()> {
        self.form_mut()?.start_time = start_time;
        Ok(())
    }

    /// Sets the due date. Fails when no dialog is open.
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) -> WorkflowResult<()> {
        self.form_mut()?.due_date = due_date;
        Ok(())
    }

    /// Whether `time` is one of the offered slots.
    pub fn is_offered_slot(&self, time: DateTime<Utc>) -> bool {
        self.slots.contains(&time)
    }

    /// Duration that will go on the outgoing schedule.
    ///
    /// The job's when creating, the stored schedule's when editing.
    pub fn duration(&self) -> Option<i64> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Creating { job, .. } => job.duration,
            SessionState::Editing { schedule, .. } => schedule.duration,
        }
    }

    /// Projected end for the current form, recomputed on every call.
    ///
    /// `None` when no start time is chosen or the duration is unknown.
    pub fn projected_end(&self) -> Option<DateTime<Utc>> {
        end_time(self.form()?.start_time, self.duration())
    }

    /// Validates the dialog and builds the request to send.
    ///
    /// Validation failures are operator errors. Submitting with no dialog
    /// open, for an unpersisted job, or editing a schedule without an id is
    /// a [`WorkflowError::Invariant`].
    pub fn build_request(&self, enforce_deadline_order: bool) -> WorkflowResult<ScheduleRequest> {
        match &self.state {
            SessionState::Idle => Err(WorkflowError::Invariant(
                "submit called with no scheduling dialog open".to_string(),
            )),
            SessionState::Creating { job, form } => {
                validate_job_for_scheduling(job)?;
                let (start, due) =
                    validate_schedule_times(form.start_time, form.due_date, enforce_deadline_order)?;
                if !job.is_persisted() {
                    return Err(WorkflowError::Invariant(format!(
                        "job '{}' has no id and cannot be scheduled",
                        job.title
                    )));
                }
                let schedule = Schedule {
                    id: None,
                    job_id: Some(job.id),
                    machine_type_id: job.machine_type_id(),
                    start_time: Some(start),
                    due_date: Some(due),
                    duration: job.duration,
                    status: Some(ScheduleStatus::Scheduled),
                    assigned_machine_id: None,
                    assigned_machine_name: None,
                };
                Ok(ScheduleRequest::Create(schedule))
            }
            SessionState::Editing {
                schedule,
                job,
                form,
            } => {
                let Some(id) = schedule.id else {
                    return Err(WorkflowError::Invariant(
                        "schedule being edited has no id".to_string(),
                    ));
                };
                let (start, due) =
                    validate_schedule_times(form.start_time, form.due_date, enforce_deadline_order)?;
                let machine_type_id = schedule
                    .machine_type_id
                    .or_else(|| job.as_ref().and_then(Job::machine_type_id));
                let updated = Schedule {
                    id: Some(id),
                    machine_type_id,
                    start_time: Some(start),
                    due_date: Some(due),
                    status: Some(ScheduleStatus::Scheduled),
                    ..schedule.clone()
                };
                Ok(ScheduleRequest::Update {
                    id,
                    schedule: updated,
                })
            }
        }
    }

    fn form_mut(&mut self) -> WorkflowResult<&mut ScheduleForm> {
        match &mut self.state {
            SessionState::Idle => Err(WorkflowError::Invariant(
                "no scheduling dialog is open".to_string(),
            )),
            SessionState::Creating { form, .. } | SessionState::Editing { form, .. } => Ok(form),
        }
    }

    fn discard_open_dialog(&mut self) {
        if !self.is_idle() {
            debug!("Discarding uncommitted scheduling dialog");
        }
    }
}
