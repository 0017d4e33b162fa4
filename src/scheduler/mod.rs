//! Scheduling workflow.
//!
//! A [`SchedulingSession`] tracks the one open scheduling dialog as an
//! explicit state (`Idle`, `Creating`, `Editing`). The
//! [`ScheduleReconciler`] validates that session and turns it into a
//! single create or update request, and guards deletes. The
//! [`Dispatcher`] binds already-timed schedules to concrete machines by
//! priority, due date or duration.
//!
//! ```text
//! Idle --open_for_job--> Creating --submit ok--> Idle
//! Idle --open_for_schedule--> Editing --submit ok--> Idle
//! Creating/Editing --submit failed--> (unchanged)
//! Creating/Editing --dismiss--> Idle
//! ```

mod dispatch;
mod reconciler;
mod session;

pub use dispatch::{dispatch_all, DispatchCriterion, DispatchPlan, Dispatcher, SkipReason, Skipped};
pub use reconciler::ScheduleReconciler;
pub use session::{ScheduleForm, ScheduleRequest, SchedulingSession, SessionState};
