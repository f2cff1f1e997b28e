use attest_core::{CoreError, CredentialId, EvidenceId};

/// Credential-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential not found: {0}")]
    NotFound(CredentialId),

    #[error("evidence not found: {0}")]
    EvidenceNotFound(EvidenceId),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
