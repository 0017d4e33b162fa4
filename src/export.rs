//! Entity export to JSON documents.
//!
//! Produces the pretty-printed document and the suggested file name;
//! saving or downloading the file is up to the host.

use serde::Serialize;

/// Kind of exported entity, used as the file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Job,
    Machine,
    MachineType,
    Schedule,
}

impl ExportKind {
    fn prefix(&self) -> &'static str {
        match self {
            ExportKind::Job => "job",
            ExportKind::Machine => "machine",
            ExportKind::MachineType => "machine_type",
            ExportKind::Schedule => "schedule",
        }
    }
}

/// Pretty-printed JSON for `entity`, two-space indented.
pub fn document<T: Serialize + ?Sized>(entity: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entity)
}

/// Suggested file name, e.g. `machine_type_3_export.json`.
pub fn file_name(kind: ExportKind, id: i64) -> String {
    format!("{}_{id}_export.json", kind.prefix())
}
