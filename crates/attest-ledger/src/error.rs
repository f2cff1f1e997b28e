/// Ledger-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger node unreachable: {0}")]
    Unreachable(String),

    #[error("ledger call timed out: {0}")]
    Timeout(String),

    #[error("rejected by registry: {0}")]
    Rejected(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed registry response: {0}")]
    MalformedResponse(String),

    #[error("anchor not found: {0}")]
    NotFound(String),

    #[error("ledger integration disabled")]
    Disabled,
}

impl LedgerError {
    /// Classify a reqwest transport error.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}
