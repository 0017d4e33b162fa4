//! Shop-floor scheduling workflow.
//!
//! Operators create jobs, define machine types and machines, and bind jobs
//! to start times through a scheduling dialog. This crate holds the rules
//! behind that workflow; persistence, transport and presentation sit
//! behind the traits in [`api`].
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `MachineType`, `Machine`,
//!   `Schedule`, plus slot generation and duration/end-time helpers
//! - **`validation`**: Field-level checks run before any request
//! - **`scheduler`**: Scheduling session state machine, the
//!   create-vs-update reconciler and automatic machine dispatch
//! - **`ingest`**: Bulk JSON / manual-entry normalization into import batches
//! - **`board`**: In-memory job and schedule collections, reloaded wholesale
//! - **`api`**: Collaborator traits (directories, schedule store, import, notices)
//! - **`memory`**: In-memory collaborators for development and tests
//! - **`export`**: JSON export documents
//! - **`config`**: TOML configuration
//!
//! # Concurrency
//!
//! All work is driven by operator actions and awaited responses; there is
//! one scheduling session at a time and no background tasks. Requests are
//! not de-duplicated.

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod memory;
pub mod models;
pub mod scheduler;
pub mod validation;
