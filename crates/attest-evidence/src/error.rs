use attest_core::{CoreError, EvidenceId};

/// Pinning provider errors, classified by failure mode.
///
/// The pipeline treats all three identically (mark the record failed); the
/// verification path treats fetch failures as "integrity unknown".
#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("pinning provider unreachable: {0}")]
    Unreachable(String),

    #[error("rejected by provider: {0}")]
    RejectedByProvider(String),

    #[error("provider timed out: {0}")]
    Timeout(String),
}

impl PinError {
    /// Classify a reqwest transport error.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

/// Evidence-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum EvidenceError {
    #[error("evidence not found: {0}")]
    NotFound(EvidenceId),

    #[error("pin failed: {0}")]
    Pin(#[from] PinError),

    #[error("failed to read local bytes at {path}: {source}")]
    StorageRead {
        path: String,
        source: std::io::Error,
    },

    #[error("pin queue is closed")]
    QueueClosed,

    #[error(transparent)]
    Core(#[from] CoreError),
}
