//! Schedule reconciler.
//!
//! Turns a scheduling session into exactly one create or update call,
//! and guards deletion. Nothing is sent unless the session validates; a
//! failed call leaves the session open so the operator can retry.

use log::{error, info, warn};

use super::session::{ScheduleRequest, SchedulingSession};
use crate::api::{Notice, Notifier, ScheduleStore};
use crate::board::ScheduleBoard;
use crate::config::ConsoleConfig;
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::Schedule;

/// Submits and deletes schedules against a [`ScheduleStore`].
pub struct ScheduleReconciler<S, N> {
    store: S,
    notifier: N,
    enforce_deadline_order: bool,
}

impl<S: ScheduleStore, N: Notifier> ScheduleReconciler<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            enforce_deadline_order: false,
        }
    }

    /// Creates a reconciler with the validation settings from `config`.
    pub fn from_config(store: S, notifier: N, config: &ConsoleConfig) -> Self {
        Self::new(store, notifier).with_deadline_order(config.validation.enforce_deadline_order)
    }

    /// Rejects schedules whose start time is not before their due date.
    pub fn with_deadline_order(mut self, enforce: bool) -> Self {
        self.enforce_deadline_order = enforce;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Submits the open dialog.
    ///
    /// Creating sends one create call; editing sends one update call keyed
    /// by the stored id. On success the session returns to idle and the
    /// board's schedules are reloaded.
    pub async fn submit(
        &self,
        session: &mut SchedulingSession,
        board: &mut ScheduleBoard,
    ) -> WorkflowResult<Schedule> {
        let request = session
            .build_request(self.enforce_deadline_order)
            .map_err(|e| self.reject(e))?;

        let (result, verb) = match &request {
            ScheduleRequest::Create(payload) => (self.store.create_schedule(payload).await, "created"),
            ScheduleRequest::Update { id, schedule } => {
                (self.store.update_schedule(schedule, *id).await, "updated")
            }
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                error!("Error while saving schedule: {e}");
                self.notifier.notify(Notice::error(format!(
                    "The scheduled job could not be {verb}: {}",
                    e.operator_message()
                )));
                return Err(WorkflowError::Remote(e));
            }
        };

        info!("Schedule {:?} {verb}", saved.id);
        session.dismiss();
        if let Err(e) = board.reload_schedules(&self.store).await {
            warn!("Schedule list refresh failed after save: {e}");
            if matches!(request, ScheduleRequest::Create(_)) {
                board.push_schedule(saved.clone());
            }
        }
        self.notifier.notify(Notice::success(format!(
            "The scheduled job for job {} was {verb}.",
            display_id(saved.job_id)
        )));
        Ok(saved)
    }

    /// Deletes a schedule.
    ///
    /// A schedule without an id is never sent; that is logged as a local
    /// error and not reported to the operator.
    pub async fn delete(&self, schedule: &Schedule, board: &mut ScheduleBoard) -> WorkflowResult<()> {
        let Some(id) = schedule.id else {
            return Err(self.reject(WorkflowError::Invariant(
                "Schedule ID is undefined".to_string(),
            )));
        };

        if let Err(e) = self.store.delete_schedule(id).await {
            error!("Error deleting schedule {id}: {e}");
            self.notifier.notify(Notice::error(format!(
                "The scheduled job could not be deleted: {}",
                e.operator_message()
            )));
            return Err(WorkflowError::Remote(e));
        }

        info!("Schedule {id} deleted");
        if let Err(e) = board.reload_schedules(&self.store).await {
            warn!("Schedule list refresh failed after delete: {e}");
            board.remove_schedule(id);
        }
        self.notifier.notify(Notice::success(format!(
            "The scheduled job for job {} was deleted.",
            display_id(schedule.job_id)
        )));
        Ok(())
    }

    /// Reports a failure that happened before any request was sent.
    fn reject(&self, e: WorkflowError) -> WorkflowError {
        match e.operator_message() {
            Some(message) => self.notifier.notify(Notice::error(message)),
            None => error!("{e}"),
        }
        e
    }
}

fn display_id(id: Option<i64>) -> String {
    id.map_or_else(|| "?".to_string(), |id| id.to_string())
}
