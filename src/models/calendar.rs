//! Working-day calendar and start-time slots.
//!
//! The operator picks a schedule start time from a fixed set of slots:
//! every `interval` minutes from `start_hour:00` up to (excluding)
//! `end_hour:00` on a given day. Slots are not checked against existing
//! machine bookings.
//!
//! # Time Model
//! Slots are laid out in the wall-clock time of a caller-chosen zone
//! (`Local` for the operator's "today") and returned as UTC instants.
//! Wall-clock times skipped by a DST transition produce no slot.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Length of this window.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether an instant falls within this window.
    #[inline]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Working-day window and slot interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDay {
    /// First slot hour (inclusive).
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// Closing hour (exclusive).
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    /// Spacing between slots.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
}

fn default_start_hour() -> u32 {
    8
}

fn default_end_hour() -> u32 {
    18
}

fn default_interval_minutes() -> u32 {
    30
}

impl Default for WorkingDay {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            interval_minutes: default_interval_minutes(),
        }
    }
}

impl WorkingDay {
    pub fn new(start_hour: u32, end_hour: u32, interval_minutes: u32) -> Self {
        Self {
            start_hour,
            end_hour,
            interval_minutes,
        }
    }

    /// Whether the window is non-empty, ends by midnight and has a
    /// positive interval.
    pub fn is_well_formed(&self) -> bool {
        self.start_hour < self.end_hour && self.end_hour <= 24 && self.interval_minutes > 0
    }

    /// Wall-clock window of the working day on `day` in zone `tz`.
    ///
    /// Returns `None` for a malformed window or when a boundary does not
    /// exist on that day in `tz`.
    pub fn window_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> Option<TimeWindow> {
        if !self.is_well_formed() {
            return None;
        }
        let start = to_utc(tz, day, self.start_hour * 60)?;
        let end = to_utc(tz, day, self.end_hour * 60)?;
        Some(TimeWindow::new(start, end))
    }

    /// All slots on `day` in zone `tz`, strictly increasing.
    ///
    /// Slot `k` is `start_hour:00 + k*interval`; generation stops at the
    /// first wall-clock time `>= end_hour:00`. A malformed window yields
    /// no slots.
    pub fn slots_on<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> Vec<DateTime<Utc>> {
        if !self.is_well_formed() {
            return Vec::new();
        }
        let close = self.end_hour * 60;
        (self.start_hour * 60..close)
            .step_by(self.interval_minutes as usize)
            .filter_map(|minute_of_day| to_utc(tz, day, minute_of_day))
            .collect()
    }

    /// Slots for the current local calendar day.
    pub fn today_slots(&self) -> Vec<DateTime<Utc>> {
        self.slots_on(Local::now().date_naive(), &Local)
    }

    /// Number of slots per day.
    pub fn slot_count(&self) -> usize {
        if !self.is_well_formed() {
            return 0;
        }
        let span = (self.end_hour - self.start_hour) * 60;
        span.div_ceil(self.interval_minutes) as usize
    }
}

/// Converts a wall-clock minute of `day` in `tz` to UTC.
///
/// Minute 1440 (24:00) maps to midnight of the following day.
fn to_utc<Tz: TimeZone>(tz: &Tz, day: NaiveDate, minute_of_day: u32) -> Option<DateTime<Utc>> {
    let (day, minute_of_day) = if minute_of_day >= 24 * 60 {
        (day.succ_opt()?, minute_of_day - 24 * 60)
    } else {
        (day, minute_of_day)
    };
    let time = NaiveTime::from_hms_opt(minute_of_day / 60, minute_of_day % 60, 0)?;
    tz.from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}
