use std::sync::Arc;

use serde_json::json;

use attest_core::{AuditRecorder, AuditSubject, EvidenceId, EvidenceStatus};

use crate::error::EvidenceError;
use crate::pinner::Pinner;
use crate::store::EvidenceStore;

/// Drives an evidence record through its pin lifecycle.
///
/// The pipeline does not retry: a failed pin is a terminal, inspectable
/// state, and retry policy belongs to the invoking scheduler. Errors are
/// propagated to the caller for its dead-letter handling.
pub struct PinPipeline {
    store: Arc<dyn EvidenceStore>,
    pinner: Arc<dyn Pinner>,
    audit: Arc<dyn AuditRecorder>,
}

impl PinPipeline {
    /// Assemble a pipeline over a store, a pinning client, and an audit sink.
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        pinner: Arc<dyn Pinner>,
        audit: Arc<dyn AuditRecorder>,
    ) -> Self {
        Self {
            store,
            pinner,
            audit,
        }
    }

    /// Execute the pin job for one evidence record.
    ///
    /// Idempotent under at-least-once delivery: a record already in a
    /// terminal state is a no-op success. Never touches the stored bytes or
    /// the recorded sha256.
    pub async fn run(&self, id: EvidenceId) -> Result<(), EvidenceError> {
        let evidence = self
            .store
            .get(id)
            .await
            .ok_or(EvidenceError::NotFound(id))?;

        if evidence.status.is_final() {
            tracing::debug!(
                evidence_id = %id,
                status = %evidence.status,
                "pin already resolved, skipping redelivered job"
            );
            return Ok(());
        }

        self.store
            .set_status(id, EvidenceStatus::Pinning, None)
            .await?;

        let path = evidence.local_path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                let err = EvidenceError::StorageRead {
                    path: path.to_string_lossy().into_owned(),
                    source,
                };
                self.mark_failed(id, &err.to_string()).await?;
                return Err(err);
            }
        };

        match self.pinner.pin(&bytes, &evidence.filename).await {
            Ok(cid) => {
                self.store
                    .set_status(id, EvidenceStatus::Pinned, Some(cid.clone()))
                    .await?;
                self.audit.record(
                    None,
                    "evidence_pinned",
                    AuditSubject::Evidence(id),
                    json!({ "cid": cid, "provider": self.pinner.provider_id() }),
                );
                tracing::info!(evidence_id = %id, cid = %cid, "evidence pinned");
                Ok(())
            }
            Err(err) => {
                self.mark_failed(id, &err.to_string()).await?;
                Err(err.into())
            }
        }
    }

    async fn mark_failed(&self, id: EvidenceId, reason: &str) -> Result<(), EvidenceError> {
        self.store
            .set_status(id, EvidenceStatus::Failed, None)
            .await?;
        self.audit.record(
            None,
            "evidence_pin_failed",
            AuditSubject::Evidence(id),
            json!({ "error": reason }),
        );
        tracing::warn!(evidence_id = %id, error = reason, "evidence pin failed");
        Ok(())
    }
}
