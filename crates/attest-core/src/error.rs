use crate::credential_status::CredentialStatus;
use crate::evidence_status::EvidenceStatus;

/// Core errors shared across the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid credential transition from {from} to {to}")]
    InvalidCredentialTransition {
        from: CredentialStatus,
        to: CredentialStatus,
    },

    #[error("invalid evidence transition from {from} to {to}")]
    InvalidEvidenceTransition {
        from: EvidenceStatus,
        to: EvidenceStatus,
    },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("invalid content hash: {0}")]
    InvalidContentHash(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}
