//! Job durations and projected end times.
//!
//! Durations are whole seconds. Operators enter them as independent
//! hour/minute/second fields; imported jobs carry the total directly.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Hours, minutes and seconds as entered on the job form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DurationParts {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl DurationParts {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// `hours*3600 + minutes*60 + seconds`.
    #[inline]
    pub fn total_seconds(&self) -> i64 {
        i64::from(self.hours) * 3600 + i64::from(self.minutes) * 60 + i64::from(self.seconds)
    }
}

/// Formats a duration as `"{h}h {m}m"`.
///
/// The hour part is dropped when zero, the minute part when zero, and
/// leftover seconds are truncated. Zero, negative and absent durations
/// all format as `"0m"`.
pub fn format_duration(seconds: impl Into<Option<i64>>) -> String {
    let seconds = match seconds.into() {
        Some(s) if s > 0 => s,
        _ => return "0m".to_string(),
    };
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours == 0 {
        format!("{minutes}m")
    } else if minutes == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {minutes}m")
    }
}

/// Projected completion instant: `start + duration_seconds`.
///
/// Returns `None` when either input is absent (the read-out is withheld
/// rather than showing a stale value), when the duration is negative, or
/// on overflow.
pub fn end_time(start: Option<DateTime<Utc>>, duration_seconds: Option<i64>) -> Option<DateTime<Utc>> {
    let start = start?;
    let secs = duration_seconds.filter(|&d| d >= 0)?;
    start.checked_add_signed(Duration::try_seconds(secs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(None), "0m");
        assert_eq!(format_duration(59), "0m");
        assert_eq!(format_duration(90), "1m");
        assert_eq!(format_duration(3600), "1h");
        assert_eq!(format_duration(5400), "1h 30m");
        assert_eq!(format_duration(90_000), "25h");
        assert_eq!(format_duration(-30), "0m");
    }

    #[test]
    fn test_end_time() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(
            end_time(Some(start), Some(5400)),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(end_time(Some(start), Some(0)), Some(start));
    }

    #[test]
    fn test_end_time_absent_inputs() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(end_time(None, Some(60)), None);
        assert_eq!(end_time(Some(start), None), None);
        assert_eq!(end_time(None, None), None);
        assert_eq!(end_time(Some(start), Some(-1)), None);
    }

    proptest! {
        #[test]
        fn prop_compose_duration(h in 0u32..10_000, m in 0u32..10_000, s in 0u32..10_000) {
            let parts = DurationParts::new(h, m, s);
            prop_assert_eq!(
                parts.total_seconds(),
                i64::from(h) * 3600 + i64::from(m) * 60 + i64::from(s)
            );
        }

        #[test]
        fn prop_end_time_adds_duration(offset in 0i64..4_000_000_000, d in 0i64..10_000_000) {
            let start = Utc.timestamp_opt(offset, 0).unwrap();
            let end = end_time(Some(start), Some(d)).unwrap();
            prop_assert_eq!((end - start).num_seconds(), d);
        }
    }
}
