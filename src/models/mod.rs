//! Scheduling domain models.
//!
//! Jobs, machine types, machines and schedules as exchanged with the
//! console's REST API, plus the time helpers the scheduling workflow
//! needs: start-time slots, duration composition and end-time projection.
//!
//! # Domain Mappings
//!
//! | u-shopfloor | Meaning |
//! |-------------|---------|
//! | Job | Unit of work needing a machine type for a duration |
//! | MachineType | Capability a machine provides and a job requires |
//! | Machine | Concrete resource with an operational status |
//! | Schedule | Job bound to a start time and due date |
//! | WorkingDay | Window the start-time slots are drawn from |

mod calendar;
mod duration;
mod job;
mod machine;
mod schedule;

pub use calendar::{TimeWindow, WorkingDay};
pub use duration::{end_time, format_duration, DurationParts};
pub use job::{Job, JobStatus, Priority, UserRef};
pub use machine::{Machine, MachineStatus, MachineType};
pub use schedule::{find_overlaps, BookingOverlap, Schedule, ScheduleStatus};
