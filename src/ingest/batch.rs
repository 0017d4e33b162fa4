//! Batch parsing and manual-entry normalization.
//!
//! Two ways into a batch:
//! - JSON text that must parse as an array of entities. Parsing is strict:
//!   the text is parsed to a JSON value first, the value must be an array,
//!   and every element must match the entity shape and carry the fields an
//!   import requires. Any failure rejects the whole batch.
//! - A single entity built from form fields, validated field by field and
//!   wrapped into a one-element batch.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::{DurationParts, Job, Machine};
use crate::validation::{
    validate_job_entry, validate_machine_entry, ValidationError, ValidationErrorKind,
    ValidationResult,
};

/// Entity kind carried by a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Jobs,
    Machines,
}

impl ImportKind {
    /// Plural label used in operator messages.
    pub fn label(&self) -> &'static str {
        match self {
            ImportKind::Jobs => "Jobs",
            ImportKind::Machines => "Machines",
        }
    }
}

/// An ordered group of entities submitted together.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportBatch {
    Jobs(Vec<Job>),
    Machines(Vec<Machine>),
}

impl ImportBatch {
    pub fn kind(&self) -> ImportKind {
        match self {
            ImportBatch::Jobs(_) => ImportKind::Jobs,
            ImportBatch::Machines(_) => ImportKind::Machines,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ImportBatch::Jobs(items) => items.len(),
            ImportBatch::Machines(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Request body: the entities as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            ImportBatch::Jobs(items) => serde_json::to_string(items),
            ImportBatch::Machines(items) => serde_json::to_string(items),
        }
    }
}

/// An entity that can be bulk imported.
pub trait BatchEntity: DeserializeOwned + Serialize + Sized {
    const KIND: ImportKind;

    /// Gives the entity its provisional identity before submission.
    fn provisional(self) -> Self;

    /// Fields an imported entity must carry. Returns what is missing.
    fn check_shape(&self) -> Result<(), &'static str>;

    fn into_batch(items: Vec<Self>) -> ImportBatch;
}

impl BatchEntity for Job {
    const KIND: ImportKind = ImportKind::Jobs;

    // Imported jobs keep the id they carry; missing ids default to 0.
    fn provisional(self) -> Self {
        self
    }

    fn check_shape(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        match self.duration {
            None => Err("duration is required"),
            Some(d) if d < 0 => Err("duration must not be negative"),
            Some(_) => Ok(()),
        }
    }

    fn into_batch(items: Vec<Self>) -> ImportBatch {
        ImportBatch::Jobs(items)
    }
}

impl BatchEntity for Machine {
    const KIND: ImportKind = ImportKind::Machines;

    fn provisional(self) -> Self {
        Machine { id: 0, ..self }
    }

    fn check_shape(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.type_id == 0 {
            return Err("typeId is required");
        }
        Ok(())
    }

    fn into_batch(items: Vec<Self>) -> ImportBatch {
        ImportBatch::Machines(items)
    }
}

/// Parses JSON text into a batch of `T`.
///
/// Malformed JSON yields [`ValidationErrorKind::MalformedJson`]; any
/// non-array value yields [`ValidationErrorKind::NotAnArray`] and is never
/// coerced; an element that does not fit `T`, or lacks the fields an
/// import requires, yields [`ValidationErrorKind::InvalidEntity`] naming
/// its index.
pub fn parse_batch<T: BatchEntity>(text: &str) -> ValidationResult<ImportBatch> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        ValidationError::new(
            ValidationErrorKind::MalformedJson,
            format!("The JSON entered is not valid: {e}"),
        )
    })?;

    let Value::Array(elements) = value else {
        return Err(ValidationError::new(
            ValidationErrorKind::NotAnArray,
            format!("The JSON entered must be an array of {}.", T::KIND.label()),
        ));
    };

    let items = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| -> ValidationResult<T> {
            let invalid = |reason: String| {
                ValidationError::new(
                    ValidationErrorKind::InvalidEntity,
                    format!("Element {index} is not a valid {} entry: {reason}", T::KIND.label()),
                )
            };
            let item = serde_json::from_value::<T>(element).map_err(|e| invalid(e.to_string()))?;
            item.check_shape().map_err(|reason| invalid(reason.to_string()))?;
            Ok(item.provisional())
        })
        .collect::<ValidationResult<Vec<T>>>()?;

    Ok(T::into_batch(items))
}

/// Reports malformed JSON while the operator is still typing.
///
/// Only syntax is checked; shape is checked on submit.
pub fn check_json(text: &str) -> Option<ValidationError> {
    serde_json::from_str::<Value>(text).err().map(|e| {
        ValidationError::new(
            ValidationErrorKind::MalformedJson,
            format!("The JSON entered is not valid: {e}"),
        )
    })
}

/// A job being entered through the manual form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobEntry {
    pub job: Job,
    /// Duration fields; composed onto `job.duration` on submit.
    pub duration: DurationParts,
}

impl JobEntry {
    pub fn new(job: Job, duration: DurationParts) -> Self {
        Self { job, duration }
    }

    /// Composes the duration, validates, and wraps into a one-job batch.
    pub fn into_batch(self) -> ValidationResult<ImportBatch> {
        let mut job = self.job;
        job.apply_duration(self.duration);
        validate_job_entry(&job)?;
        Ok(ImportBatch::Jobs(vec![job]))
    }
}

/// A machine being entered through the manual form.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineEntry {
    pub machine: Machine,
}

impl Default for MachineEntry {
    /// Empty name, `AVAILABLE`, no type selected.
    fn default() -> Self {
        Self {
            machine: Machine::new("", 0),
        }
    }
}

impl MachineEntry {
    pub fn new(machine: Machine) -> Self {
        Self { machine }
    }

    /// Validates and wraps into a one-machine batch with provisional id 0.
    pub fn into_batch(self) -> ValidationResult<ImportBatch> {
        validate_machine_entry(&self.machine)?;
        Ok(ImportBatch::Machines(vec![self.machine.provisional()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MachineStatus, MachineType};

    const JOBS: &str = r#"[
        {
            "id": 1,
            "title": "Job 1",
            "description": "First job",
            "status": "PENDING",
            "assignee": { "id": "1", "email": "prova@gmail.com" },
            "priority": "LOW",
            "duration": 3600,
            "requiredMachineType": { "id": 1, "name": "Type 1", "description": "Description of Type 1" }
        },
        { "title": "Job 2", "duration": 60 }
    ]"#;

    #[test]
    fn test_parse_job_array_preserves_order() {
        let batch = parse_batch::<Job>(JOBS).unwrap();
        assert_eq!(batch.kind(), ImportKind::Jobs);
        let ImportBatch::Jobs(jobs) = batch else {
            panic!("expected jobs");
        };
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Job 1");
        assert_eq!(jobs[0].id, 1);
        assert_eq!(jobs[1].title, "Job 2");
        assert_eq!(jobs[1].id, 0);
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_batch::<Job>("{not valid json").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MalformedJson);
    }

    #[test]
    fn test_object_is_not_coerced() {
        let err = parse_batch::<Machine>(r#"{"name":"x"}"#).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NotAnArray);
        assert!(err.message.contains("must be an array"));

        let err = parse_batch::<Job>("42").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NotAnArray);
    }

    #[test]
    fn test_bad_element_rejects_whole_batch() {
        let text = r#"[{"name":"ok","typeId":1},{"name":"bad","status":"EXPLODED"}]"#;
        let err = parse_batch::<Machine>(text).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidEntity);
        assert!(err.message.starts_with("Element 1"));
    }

    #[test]
    fn test_empty_objects_are_rejected() {
        let err = parse_batch::<Job>("[{}]").unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidEntity);
        assert!(err.message.starts_with("Element 0"));
        assert!(err.message.contains("title is required"));

        let err = parse_batch::<Job>(r#"[{"title":"Cut","duration":60},{"unrelated":true}]"#).unwrap_err();
        assert!(err.message.starts_with("Element 1"));

        let err = parse_batch::<Machine>(r#"[{"foo":1}]"#).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidEntity);
        assert!(err.message.contains("name is required"));

        let err = parse_batch::<Machine>(r#"[{"name":"Mill"}]"#).unwrap_err();
        assert!(err.message.contains("typeId is required"));
    }

    #[test]
    fn test_imported_job_needs_non_negative_duration() {
        let err = parse_batch::<Job>(r#"[{"title":"Cut","duration":-50}]"#).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidEntity);
        assert!(err.message.contains("must not be negative"));

        let err = parse_batch::<Job>(r#"[{"title":"Cut"}]"#).unwrap_err();
        assert!(err.message.contains("duration is required"));

        assert!(parse_batch::<Job>(r#"[{"title":"Cut","duration":0}]"#).is_ok());
    }

    #[test]
    fn test_imported_machines_get_provisional_id() {
        let text = r#"[{"id":17,"name":"Machine 1","typeId":1},{"name":"Machine 2","typeId":2}]"#;
        let ImportBatch::Machines(machines) = parse_batch::<Machine>(text).unwrap() else {
            panic!("expected machines");
        };
        assert!(machines.iter().all(|m| m.id == 0));
        assert_eq!(machines[0].status, MachineStatus::Available);
        assert_eq!(machines[1].type_id, 2);
    }

    #[test]
    fn test_check_json() {
        assert!(check_json("[]").is_none());
        assert!(check_json(r#"{"name":"x"}"#).is_none());
        assert_eq!(
            check_json("[{").map(|e| e.kind),
            Some(ValidationErrorKind::MalformedJson)
        );
    }

    #[test]
    fn test_job_entry_composes_duration() {
        let entry = JobEntry::new(
            Job::new("Drill").with_machine_type(MachineType::new(3, "Drill press")),
            DurationParts::new(1, 30, 0),
        );
        let ImportBatch::Jobs(jobs) = entry.into_batch().unwrap() else {
            panic!("expected jobs");
        };
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].duration, Some(5400));
        assert_eq!(jobs[0].id, 0);
    }

    #[test]
    fn test_job_entry_validation() {
        let no_type = JobEntry::new(Job::new("Drill"), DurationParts::default());
        assert_eq!(
            no_type.into_batch().unwrap_err().kind,
            ValidationErrorKind::MissingMachineType
        );

        let no_title = JobEntry::new(
            Job::new("").with_machine_type(MachineType::new(3, "Drill press")),
            DurationParts::default(),
        );
        assert_eq!(
            no_title.into_batch().unwrap_err().kind,
            ValidationErrorKind::MissingField
        );
    }

    #[test]
    fn test_machine_entry() {
        let default = MachineEntry::default();
        assert_eq!(default.machine.status, MachineStatus::Available);
        assert_eq!(default.machine.type_id, 0);
        assert!(default.into_batch().is_err());

        let batch = MachineEntry::new(Machine::new("Mill", 4)).into_batch().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.to_json().unwrap(), r#"[{"id":0,"name":"Mill","description":"","status":"AVAILABLE","typeId":4}]"#);
    }
}
