//! Automatic dispatch of schedules onto machines.
//!
//! # Algorithm
//!
//! 1. Keep schedules that have a start time, a duration and are not
//!    `COMPLETED`; keep machines that are `AVAILABLE`.
//! 2. Order the schedules by the criterion's rule chain. The primary rule
//!    decides; the remaining rules only break ties, and input order breaks
//!    whatever is left.
//! 3. For each schedule, pick the machine of the required type that can
//!    start it earliest, never before the requested start time.
//! 4. Bind the schedule to that machine and advance the machine's
//!    availability to the schedule's end.
//!
//! A machine is only handed work after its previous booking ends, so the
//! dispatched schedules never overlap on a machine.
//!
//! # Complexity
//! O(n log n + n * m) where n=schedules, m=machines.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::models::{end_time, Job, Machine, Priority, Schedule, ScheduleStatus};

/// Ordering criterion for a dispatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchCriterion {
    /// Highest job priority first.
    Priority,
    /// Earliest due date first.
    DueDate,
    /// Shortest duration first.
    Duration,
}

impl DispatchCriterion {
    /// Every criterion, in the order a full run evaluates them.
    pub const ALL: [DispatchCriterion; 3] = [
        DispatchCriterion::Priority,
        DispatchCriterion::DueDate,
        DispatchCriterion::Duration,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DispatchCriterion::Priority => "priority",
            DispatchCriterion::DueDate => "due-date",
            DispatchCriterion::Duration => "duration",
        }
    }

    /// Suggested file name for the plan, e.g. `job-scheduled-by-due-date.json`.
    pub fn file_name(&self) -> String {
        format!("job-scheduled-by-{}.json", self.label())
    }

    fn rules(&self) -> [Rule; 3] {
        match self {
            DispatchCriterion::Priority => [Rule::HighestPriority, Rule::EarliestDue, Rule::Shortest],
            DispatchCriterion::DueDate => [Rule::EarliestDue, Rule::HighestPriority, Rule::Shortest],
            DispatchCriterion::Duration => [Rule::Shortest, Rule::HighestPriority, Rule::EarliestDue],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    HighestPriority,
    EarliestDue,
    Shortest,
}

impl Rule {
    // Less means dispatched first. Missing values sort last.
    fn compare(&self, a: &Candidate, b: &Candidate) -> Ordering {
        match self {
            Rule::HighestPriority => b.priority.cmp(&a.priority),
            Rule::EarliestDue => last_if_none(a.due, b.due),
            Rule::Shortest => a.duration.cmp(&b.duration),
        }
    }
}

fn last_if_none<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A dispatchable schedule with the facts the rules look at.
#[derive(Debug)]
struct Candidate {
    index: usize,
    start: DateTime<Utc>,
    duration: i64,
    machine_type_id: i64,
    priority: Option<Priority>,
    due: Option<DateTime<Utc>>,
}

/// Why a schedule was left out of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Status is `COMPLETED`.
    Completed,
    /// No start time to dispatch from.
    MissingStart,
    /// Neither the schedule nor its job carries a duration.
    MissingDuration,
    /// Neither the schedule nor its job names a machine type.
    MissingMachineType,
    /// No available machine provides the required type.
    NoMachine,
}

/// A schedule the dispatcher did not bind.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub schedule: Schedule,
    pub reason: SkipReason,
}

/// Result of one dispatch run.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    pub criterion: DispatchCriterion,
    /// Bound schedules in dispatch order.
    pub assigned: Vec<Schedule>,
    pub skipped: Vec<Skipped>,
}

impl DispatchPlan {
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }
}

/// Greedy machine dispatcher.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use u_shopfloor::models::{Job, Machine, MachineType, Schedule};
/// use u_shopfloor::scheduler::{DispatchCriterion, Dispatcher};
///
/// let at = |h| Utc.with_ymd_and_hms(2024, 5, 14, h, 0, 0).unwrap();
/// let jobs = vec![Job::new("Cut").with_id(1).with_machine_type(MachineType::new(2, "Saw"))];
/// let schedules = vec![Schedule::for_job(1).with_id(10).with_times(at(8), at(12)).with_duration(3600)];
/// let machines = vec![Machine::new("Saw 1", 2)];
///
/// let plan = Dispatcher::new(DispatchCriterion::DueDate).dispatch(&schedules, &jobs, &machines);
/// assert_eq!(plan.assigned[0].assigned_machine_name.as_deref(), Some("Saw 1"));
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    criterion: DispatchCriterion,
}

impl Dispatcher {
    pub fn new(criterion: DispatchCriterion) -> Self {
        Self { criterion }
    }

    pub fn criterion(&self) -> DispatchCriterion {
        self.criterion
    }

    /// Binds schedules to machines.
    ///
    /// Inputs are not modified; bound copies carry the chosen machine, its
    /// type, the (possibly delayed) start time and status `SCHEDULED`.
    pub fn dispatch(&self, schedules: &[Schedule], jobs: &[Job], machines: &[Machine]) -> DispatchPlan {
        info!(
            "Dispatching {} schedules on {} machines by {}",
            schedules.len(),
            machines.len(),
            self.criterion.label()
        );
        let jobs_by_id: HashMap<i64, &Job> = jobs.iter().map(|j| (j.id, j)).collect();
        let available: Vec<&Machine> = machines.iter().filter(|m| m.is_available()).collect();

        let mut skipped = Vec::new();
        let mut candidates = Vec::new();
        for (index, schedule) in schedules.iter().enumerate() {
            match candidate(index, schedule, schedule.job_id.and_then(|id| jobs_by_id.get(&id).copied())) {
                Ok(c) => candidates.push(c),
                Err(reason) => skipped.push(Skipped {
                    schedule: schedule.clone(),
                    reason,
                }),
            }
        }

        let rules = self.criterion.rules();
        // Stable sort keeps input order on full ties.
        candidates.sort_by(|a, b| {
            rules
                .iter()
                .fold(Ordering::Equal, |acc, rule| acc.then_with(|| rule.compare(a, b)))
        });

        // Keyed by position in `available`.
        let mut free_at: HashMap<usize, DateTime<Utc>> = HashMap::new();
        let mut assigned = Vec::with_capacity(candidates.len());
        for c in &candidates {
            let schedule = &schedules[c.index];

            // Earliest-available machine of the required type; first listed wins ties.
            let mut best: Option<(usize, DateTime<Utc>)> = None;
            for (slot, machine) in available.iter().enumerate() {
                if !machine.provides(c.machine_type_id) {
                    continue;
                }
                let start = free_at.get(&slot).map_or(c.start, |&t| t.max(c.start));
                if best.map_or(true, |(_, best_start)| start < best_start) {
                    best = Some((slot, start));
                }
            }

            let Some((slot, start)) = best else {
                warn!(
                    "No available machine of type {} for schedule {:?}",
                    c.machine_type_id, schedule.id
                );
                skipped.push(Skipped {
                    schedule: schedule.clone(),
                    reason: SkipReason::NoMachine,
                });
                continue;
            };
            let Some(end) = end_time(Some(start), Some(c.duration)) else {
                skipped.push(Skipped {
                    schedule: schedule.clone(),
                    reason: SkipReason::MissingDuration,
                });
                continue;
            };

            let machine = available[slot];
            free_at.insert(slot, end);
            debug!(
                "Schedule {:?} on machine {} at {start}",
                schedule.id, machine.id
            );
            assigned.push(Schedule {
                machine_type_id: Some(c.machine_type_id),
                start_time: Some(start),
                duration: Some(c.duration),
                status: Some(ScheduleStatus::Scheduled),
                ..schedule.clone()
            }
            .with_machine(machine.id, machine.name.clone()));
        }

        if !skipped.is_empty() {
            warn!(
                "{} schedules left unassigned by {}",
                skipped.len(),
                self.criterion.label()
            );
        }
        DispatchPlan {
            criterion: self.criterion,
            assigned,
            skipped,
        }
    }
}

/// Runs every criterion over the same inputs.
pub fn dispatch_all(schedules: &[Schedule], jobs: &[Job], machines: &[Machine]) -> Vec<DispatchPlan> {
    DispatchCriterion::ALL
        .iter()
        .map(|&criterion| Dispatcher::new(criterion).dispatch(schedules, jobs, machines))
        .collect()
}

fn candidate(index: usize, schedule: &Schedule, job: Option<&Job>) -> Result<Candidate, SkipReason> {
    if schedule.status == Some(ScheduleStatus::Completed) {
        return Err(SkipReason::Completed);
    }
    let start = schedule.start_time.ok_or(SkipReason::MissingStart)?;
    let duration = schedule
        .duration
        .or_else(|| job.and_then(|j| j.duration))
        .filter(|&d| d >= 0)
        .ok_or(SkipReason::MissingDuration)?;
    let machine_type_id = schedule
        .machine_type_id
        .filter(|&id| id != 0)
        .or_else(|| job.and_then(Job::machine_type_id))
        .ok_or(SkipReason::MissingMachineType)?;
    Ok(Candidate {
        index,
        start,
        duration,
        machine_type_id,
        priority: job.and_then(|j| j.priority),
        due: schedule.due_date,
    })
}
