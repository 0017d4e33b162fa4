//! Bulk ingestion of jobs and machines.
//!
//! Operator-supplied JSON (or a single form entry) is turned into an
//! [`ImportBatch`] before anything is sent. Malformed input is rejected
//! whole; nothing is ever partially imported.

mod batch;
mod importer;

pub use batch::{check_json, parse_batch, BatchEntity, ImportBatch, ImportKind, JobEntry, MachineEntry};
pub use importer::Importer;
