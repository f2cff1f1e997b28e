use async_trait::async_trait;

use attest_core::ContentHash;

use crate::error::LedgerError;
use crate::types::{AnchorReceipt, AnchorVerification};

/// Credential anchor registry interface.
///
/// Each implementation bridges the engine to a concrete registry backend
/// (a chain contract via JSON-RPC, an in-memory registry for tests).
#[async_trait]
pub trait AnchorClient: Send + Sync {
    /// Anchor a credential's content hash. Returns the transaction receipt.
    async fn issue(
        &self,
        student_address: &str,
        content_hash: &ContentHash,
        cid: Option<&str>,
        credential_type: &str,
        expires_at: i64,
    ) -> Result<AnchorReceipt, LedgerError>;

    /// Revoke a previously issued anchor.
    async fn revoke(&self, anchor_ref: &str, reason: &str) -> Result<AnchorReceipt, LedgerError>;

    /// Query an anchor's status. Pure read — safe to call repeatedly and
    /// concurrently.
    async fn verify(&self, anchor_ref: &str) -> Result<AnchorVerification, LedgerError>;

    /// Query an anchor by its content hash. Pure read.
    async fn verify_content_hash(
        &self,
        content_hash: &ContentHash,
    ) -> Result<AnchorVerification, LedgerError>;

    /// Return the unique identifier of this backend (e.g. "ledger-jsonrpc").
    fn backend_id(&self) -> &str;
}
