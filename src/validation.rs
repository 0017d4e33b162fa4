//! Input validation for the scheduling workflow.
//!
//! Checks run before any request leaves the console:
//! - Manual job and machine entries (title/name, duration, machine type)
//! - Scheduling preconditions on a job (machine type, duration)
//! - Schedule form fields (start time, due date, optional ordering)
//! - Working-day configuration
//!
//! Each check returns the first failure, matching the order in which the
//! operator would see the fields.

use chrono::{DateTime, Utc};

use crate::models::{Job, Machine, WorkingDay};

/// Validation result.
pub type ValidationResult<T = ()> = Result<T, ValidationError>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is empty or unset.
    MissingField,
    /// Duration is absent or negative.
    InvalidDuration,
    /// No machine type selected, or selected with id 0.
    MissingMachineType,
    /// Import text is not valid JSON.
    MalformedJson,
    /// Import JSON parsed but is not an array.
    NotAnArray,
    /// An array element does not match the entity shape.
    InvalidEntity,
    /// Start time is not before the due date.
    DeadlineBeforeStart,
    /// Configuration values are inconsistent.
    InvalidConfig,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::new(
            ValidationErrorKind::MissingField,
            format!("The {field} field is required."),
        )
    }
}

/// Validates a job entered through the manual form.
///
/// The composed duration must already be written onto the job.
pub fn validate_job_entry(job: &Job) -> ValidationResult {
    if job.title.is_empty() {
        return Err(ValidationError::missing("title"));
    }
    check_duration(job.duration)?;
    check_machine_type(job)?;
    Ok(())
}

/// Validates that a job can be scheduled.
///
/// Requires a selected machine type with non-zero id and a non-negative
/// duration.
pub fn validate_job_for_scheduling(job: &Job) -> ValidationResult {
    check_machine_type(job)?;
    check_duration(job.duration)?;
    Ok(())
}

/// Validates a machine entered through the manual form.
pub fn validate_machine_entry(machine: &Machine) -> ValidationResult {
    if machine.name.is_empty() {
        return Err(ValidationError::missing("name"));
    }
    if machine.type_id == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::MissingMachineType,
            "Select a machine type.",
        ));
    }
    Ok(())
}

/// Validates the schedule form and returns `(start_time, due_date)`.
///
/// With `enforce_deadline_order`, a start time at or after the due date is
/// rejected.
pub fn validate_schedule_times(
    start_time: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    enforce_deadline_order: bool,
) -> ValidationResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = start_time.ok_or_else(|| ValidationError::missing("start time"))?;
    let due = due_date.ok_or_else(|| ValidationError::missing("due date"))?;
    if enforce_deadline_order && start >= due {
        return Err(ValidationError::new(
            ValidationErrorKind::DeadlineBeforeStart,
            format!("Start time {start} must be before due date {due}."),
        ));
    }
    Ok((start, due))
}

/// Validates a working-day window.
pub fn validate_working_day(day: &WorkingDay) -> ValidationResult {
    if day.start_hour >= day.end_hour {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            format!(
                "Working day start hour {} must be before end hour {}.",
                day.start_hour, day.end_hour
            ),
        ));
    }
    if day.end_hour > 24 {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            format!("Working day end hour {} is past midnight.", day.end_hour),
        ));
    }
    if day.interval_minutes == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidConfig,
            "Slot interval must be at least one minute.",
        ));
    }
    Ok(())
}

fn check_duration(duration: Option<i64>) -> ValidationResult {
    match duration {
        Some(d) if d >= 0 => Ok(()),
        _ => Err(ValidationError::new(
            ValidationErrorKind::InvalidDuration,
            "Duration must be a non-negative number of seconds.",
        )),
    }
}

fn check_machine_type(job: &Job) -> ValidationResult {
    match job.machine_type_id() {
        Some(_) => Ok(()),
        None => Err(ValidationError::new(
            ValidationErrorKind::MissingMachineType,
            "Select a required machine type.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MachineType;
    use chrono::TimeZone;

    fn valid_job() -> Job {
        Job::new("Cut panels")
            .with_duration(1800)
            .with_machine_type(MachineType::new(1, "Saw"))
    }

    #[test]
    fn test_valid_job_entry() {
        assert!(validate_job_entry(&valid_job()).is_ok());
        assert!(validate_job_for_scheduling(&valid_job()).is_ok());
    }

    #[test]
    fn test_job_entry_missing_title() {
        let mut job = valid_job();
        job.title.clear();
        let err = validate_job_entry(&job).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingField);
        assert!(err.message.contains("title"));
    }

    #[test]
    fn test_job_entry_negative_duration() {
        let job = valid_job().with_duration(-1);
        let err = validate_job_entry(&job).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidDuration);
    }

    #[test]
    fn test_zero_duration_is_accepted() {
        assert!(validate_job_for_scheduling(&valid_job().with_duration(0)).is_ok());
    }

    #[test]
    fn test_scheduling_requires_machine_type() {
        let job = valid_job().with_machine_type(MachineType::new(0, "unset"));
        let err = validate_job_for_scheduling(&job).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingMachineType);

        let mut no_type = valid_job();
        no_type.required_machine_type = None;
        assert_eq!(
            validate_job_for_scheduling(&no_type).unwrap_err().kind,
            ValidationErrorKind::MissingMachineType
        );
    }

    #[test]
    fn test_scheduling_requires_duration() {
        let mut job = valid_job();
        job.duration = None;
        assert_eq!(
            validate_job_for_scheduling(&job).unwrap_err().kind,
            ValidationErrorKind::InvalidDuration
        );
    }

    #[test]
    fn test_machine_entry() {
        assert!(validate_machine_entry(&Machine::new("Lathe", 2)).is_ok());
        assert_eq!(
            validate_machine_entry(&Machine::new("", 2)).unwrap_err().kind,
            ValidationErrorKind::MissingField
        );
        assert_eq!(
            validate_machine_entry(&Machine::new("Lathe", 0)).unwrap_err().kind,
            ValidationErrorKind::MissingMachineType
        );
    }

    #[test]
    fn test_schedule_times_required() {
        let t = Utc.with_ymd_and_hms(2024, 5, 14, 8, 0, 0).unwrap();
        assert_eq!(
            validate_schedule_times(None, Some(t), false).unwrap_err().kind,
            ValidationErrorKind::MissingField
        );
        assert_eq!(
            validate_schedule_times(Some(t), None, false).unwrap_err().kind,
            ValidationErrorKind::MissingField
        );
    }

    #[test]
    fn test_deadline_order_is_opt_in() {
        let start = Utc.with_ymd_and_hms(2024, 5, 14, 10, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 5, 14, 9, 0, 0).unwrap();
        assert_eq!(
            validate_schedule_times(Some(start), Some(due), false),
            Ok((start, due))
        );
        let err = validate_schedule_times(Some(start), Some(due), true).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::DeadlineBeforeStart);
    }

    #[test]
    fn test_working_day() {
        assert!(validate_working_day(&WorkingDay::default()).is_ok());
        for bad in [
            WorkingDay::new(18, 8, 30),
            WorkingDay::new(8, 8, 30),
            WorkingDay::new(8, 25, 30),
            WorkingDay::new(8, 18, 0),
        ] {
            assert_eq!(
                validate_working_day(&bad).unwrap_err().kind,
                ValidationErrorKind::InvalidConfig
            );
        }
    }
}
