//! Evidence intake: turn an already-stored local file into a record.
//!
//! Upload handling (HTTP, validation, writing the file to disk) is a
//! collaborator concern; intake starts where a local file and its path exist.

use serde_json::json;

use attest_core::{AuditRecorder, AuditSubject, ContentHash, UserId, Visibility};

use crate::error::EvidenceError;
use crate::record::{Evidence, EvidenceMetadata, NewEvidence};
use crate::store::EvidenceStore;

/// Descriptor of a file that has landed on local storage.
#[derive(Debug, Clone)]
pub struct EvidenceUpload {
    pub owner_id: UserId,
    pub filename: String,
    pub disk: String,
    pub path: String,
    pub mime: Option<String>,
    pub metadata: EvidenceMetadata,
    pub visibility: Visibility,
}

/// Create an evidence record for a stored file.
///
/// Reads the file once to compute its sha256 synchronously with record
/// creation — the record is never visible without its fingerprint. Emits an
/// `evidence_uploaded` audit event.
pub async fn ingest(
    store: &dyn EvidenceStore,
    audit: &dyn AuditRecorder,
    upload: EvidenceUpload,
) -> Result<Evidence, EvidenceError> {
    let bytes =
        tokio::fs::read(&upload.path)
            .await
            .map_err(|source| EvidenceError::StorageRead {
                path: upload.path.clone(),
                source,
            })?;
    let sha256 = ContentHash::from_bytes(&bytes);

    let evidence = store
        .create(NewEvidence {
            owner_id: upload.owner_id,
            filename: upload.filename,
            disk: upload.disk,
            path: upload.path,
            mime: upload.mime,
            size: bytes.len() as u64,
            sha256,
            metadata: upload.metadata,
            visibility: upload.visibility,
        })
        .await;

    audit.record(
        Some(evidence.owner_id),
        "evidence_uploaded",
        AuditSubject::Evidence(evidence.id),
        json!({ "sha256": evidence.sha256.to_hex(), "size": evidence.size }),
    );
    tracing::info!(
        evidence_id = %evidence.id,
        owner_id = %evidence.owner_id,
        sha256 = %evidence.sha256,
        "evidence ingested"
    );

    Ok(evidence)
}
