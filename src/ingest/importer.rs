//! Submits normalized batches to the import endpoint.

use log::{error, info};

use super::{parse_batch, ImportBatch, ImportKind, JobEntry, MachineEntry};
use crate::api::{ImportEndpoint, Notice, Notifier};
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{Job, Machine};
use crate::validation::ValidationResult;

/// Drives bulk and manual imports.
///
/// Every path builds a complete batch first; a validation failure is
/// reported to the operator and no request is sent. The endpoint accepts
/// or rejects the batch as a unit.
pub struct Importer<E, N> {
    endpoint: E,
    notifier: N,
}

impl<E: ImportEndpoint, N: Notifier> Importer<E, N> {
    pub fn new(endpoint: E, notifier: N) -> Self {
        Self { endpoint, notifier }
    }

    /// Imports jobs from JSON array text.
    pub async fn import_jobs_json(&self, text: &str) -> WorkflowResult<String> {
        self.submit(ImportKind::Jobs, parse_batch::<Job>(text)).await
    }

    /// Imports machines from JSON array text.
    pub async fn import_machines_json(&self, text: &str) -> WorkflowResult<String> {
        self.submit(ImportKind::Machines, parse_batch::<Machine>(text))
            .await
    }

    /// Imports one job from the manual form.
    pub async fn import_job_entry(&self, entry: JobEntry) -> WorkflowResult<String> {
        self.submit(ImportKind::Jobs, entry.into_batch()).await
    }

    /// Imports one machine from the manual form.
    pub async fn import_machine_entry(&self, entry: MachineEntry) -> WorkflowResult<String> {
        self.submit(ImportKind::Machines, entry.into_batch()).await
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    async fn submit(
        &self,
        kind: ImportKind,
        batch: ValidationResult<ImportBatch>,
    ) -> WorkflowResult<String> {
        let batch = match batch {
            Ok(batch) => batch,
            Err(e) => {
                self.notifier.notify(Notice::error(e.message.clone()));
                return Err(e.into());
            }
        };

        match self.endpoint.import_batch(&batch).await {
            Ok(confirmation) => {
                let message = confirmation
                    .unwrap_or_else(|| format!("{} imported successfully.", kind.label()));
                info!("Imported {} {}", batch.len(), kind.label());
                self.notifier.notify(Notice::success(message.clone()));
                Ok(message)
            }
            Err(e) => {
                error!("Error while importing {}: {}", kind.label(), e);
                self.notifier.notify(Notice::error(format!(
                    "Error while importing {}: {}",
                    kind.label(),
                    e.operator_message()
                )));
                Err(WorkflowError::Remote(e))
            }
        }
    }
}
