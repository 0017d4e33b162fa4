//! Schedule model.
//!
//! A schedule binds a job to a start time and a due date, and optionally
//! to a concrete machine. Its duration is copied from the job when the
//! schedule is created and is not updated if the job changes later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{end_time, JobStatus, TimeWindow};

/// Schedule status mirrors the job lifecycle.
pub type ScheduleStatus = JobStatus;

/// A job bound to a start time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Absent until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Job being scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i64>,
    /// Copied from the job's required machine type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_type_id: Option<i64>,
    /// Chosen from the offered slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Deadline by which the job must complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Seconds, copied from the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Set to `SCHEDULED` on every submit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScheduleStatus>,
    /// Concrete machine, once dispatched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_machine_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_machine_name: Option<String>,
}

impl Schedule {
    /// Creates an unpersisted schedule for a job.
    pub fn for_job(job_id: i64) -> Self {
        Self {
            job_id: Some(job_id),
            status: Some(ScheduleStatus::Scheduled),
            ..Self::default()
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the machine type.
    pub fn with_machine_type(mut self, machine_type_id: i64) -> Self {
        self.machine_type_id = Some(machine_type_id);
        self
    }

    /// Sets start time and due date.
    pub fn with_times(mut self, start: DateTime<Utc>, due: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.due_date = Some(due);
        self
    }

    /// Sets the duration in seconds.
    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Binds the schedule to a concrete machine.
    pub fn with_machine(mut self, machine_id: i64, machine_name: impl Into<String>) -> Self {
        self.assigned_machine_id = Some(machine_id);
        self.assigned_machine_name = Some(machine_name.into());
        self
    }

    /// Projected completion instant from the schedule's own duration.
    pub fn projected_end(&self) -> Option<DateTime<Utc>> {
        end_time(self.start_time, self.duration)
    }

    /// Occupied interval `[start, start + duration)`.
    pub fn window(&self) -> Option<TimeWindow> {
        Some(TimeWindow::new(self.start_time?, self.projected_end()?))
    }

    /// Whether the projected end falls after the due date.
    ///
    /// `None` when any of start, duration or due date is missing.
    pub fn is_late(&self) -> Option<bool> {
        Some(self.projected_end()? > self.due_date?)
    }
}

/// Two schedules on the same machine whose windows intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOverlap {
    pub machine_id: i64,
    /// Indices into the inspected slice, `first < second`.
    pub first: usize,
    pub second: usize,
}

/// Reports double bookings among schedules bound to a machine.
///
/// Read-only: nothing in the scheduling workflow blocks on this. Schedules
/// without an assigned machine or without a complete window are ignored.
pub fn find_overlaps(schedules: &[Schedule]) -> Vec<BookingOverlap> {
    let booked: Vec<(usize, i64, TimeWindow)> = schedules
        .iter()
        .enumerate()
        .filter_map(|(i, s)| Some((i, s.assigned_machine_id?, s.window()?)))
        .collect();

    let mut overlaps = Vec::new();
    for (n, (i, machine, window)) in booked.iter().enumerate() {
        for (j, other_machine, other_window) in &booked[n + 1..] {
            if machine == other_machine && window.overlaps(other_window) {
                overlaps.push(BookingOverlap {
                    machine_id: *machine,
                    first: *i,
                    second: *j,
                });
            }
        }
    }
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 14, h, m, 0).unwrap()
    }

    #[test]
    fn test_for_job_defaults_to_scheduled() {
        let s = Schedule::for_job(4);
        assert_eq!(s.id, None);
        assert_eq!(s.job_id, Some(4));
        assert_eq!(s.status, Some(ScheduleStatus::Scheduled));
    }

    #[test]
    fn test_projected_end_and_lateness() {
        let s = Schedule::for_job(1)
            .with_times(at(8, 0), at(9, 0))
            .with_duration(5400);
        assert_eq!(s.projected_end(), Some(at(9, 30)));
        assert_eq!(s.is_late(), Some(true));

        let no_duration = Schedule::for_job(1).with_times(at(8, 0), at(9, 0));
        assert_eq!(no_duration.projected_end(), None);
        assert_eq!(no_duration.window(), None);
        assert_eq!(no_duration.is_late(), None);
    }

    #[test]
    fn test_find_overlaps() {
        let schedules = vec![
            Schedule::for_job(1)
                .with_times(at(8, 0), at(12, 0))
                .with_duration(3600)
                .with_machine(5, "Press"),
            Schedule::for_job(2)
                .with_times(at(8, 30), at(12, 0))
                .with_duration(3600)
                .with_machine(5, "Press"),
            // same window, different machine
            Schedule::for_job(3)
                .with_times(at(9, 0), at(12, 0))
                .with_duration(600)
                .with_machine(6, "Lathe"),
            Schedule::for_job(4)
                .with_times(at(8, 0), at(12, 0))
                .with_duration(3600),
        ];
        let overlaps = find_overlaps(&schedules);
        assert_eq!(
            overlaps,
            vec![BookingOverlap {
                machine_id: 5,
                first: 0,
                second: 1
            }]
        );
    }

    #[test]
    fn test_schedule_json_shape() {
        let s = Schedule::for_job(3)
            .with_machine_type(2)
            .with_times(at(8, 0), at(17, 0))
            .with_duration(60);
        let value = serde_json::to_value(&s).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["jobId"], 3);
        assert_eq!(value["machineTypeId"], 2);
        assert_eq!(value["status"], "SCHEDULED");
        assert_eq!(value["startTime"], "2024-05-14T08:00:00Z");

        let back: Schedule = serde_json::from_value(value).unwrap();
        assert_eq!(back, s);
    }
}
