use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;

use attest_core::ContentHash;

use crate::client::AnchorClient;
use crate::error::LedgerError;
use crate::types::{AnchorReceipt, AnchorStatus, AnchorVerification};

#[derive(Debug, Clone)]
struct MemoryAnchor {
    student_address: String,
    content_hash: ContentHash,
    cid: Option<String>,
    credential_type: String,
    expires_at: i64,
    status: AnchorStatus,
    revocation_reason: Option<String>,
}

/// In-memory anchor registry for tests and local development.
///
/// Transaction hashes are deterministic, derived from a monotonic counter,
/// so tests can assert on ordering. Failure injection flags let callers
/// exercise the best-effort anchoring paths.
#[derive(Debug, Default)]
pub struct MemoryAnchorClient {
    anchors: DashMap<String, MemoryAnchor>,
    seq: AtomicU64,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryAnchorClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make all subsequent writes fail with `Unreachable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make all subsequent reads fail with `Unreachable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of anchors currently held.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    fn next_tx_hash(&self) -> String {
        let n = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        format!("0x{:064x}", n)
    }

    fn verification_of(anchor: &MemoryAnchor) -> AnchorVerification {
        let expired = anchor.expires_at != 0 && anchor.expires_at <= Utc::now().timestamp();
        let is_valid = anchor.status == AnchorStatus::Active && !expired;
        AnchorVerification {
            is_valid,
            status: anchor.status,
            raw: json!({
                "isValid": is_valid,
                "status": anchor.status.to_string(),
                "studentAddress": anchor.student_address,
                "contentHash": anchor.content_hash.prefixed_hex(),
                "ipfsCid": anchor.cid,
                "credentialType": anchor.credential_type,
                "expiresAt": anchor.expires_at,
                "revocationReason": anchor.revocation_reason,
            }),
        }
    }
}

#[async_trait]
impl AnchorClient for MemoryAnchorClient {
    async fn issue(
        &self,
        student_address: &str,
        content_hash: &ContentHash,
        cid: Option<&str>,
        credential_type: &str,
        expires_at: i64,
    ) -> Result<AnchorReceipt, LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Unreachable("write failure injected".into()));
        }

        let tx_hash = self.next_tx_hash();
        self.anchors.insert(
            tx_hash.clone(),
            MemoryAnchor {
                student_address: student_address.to_owned(),
                content_hash: *content_hash,
                cid: cid.map(str::to_owned),
                credential_type: credential_type.to_owned(),
                expires_at,
                status: AnchorStatus::Active,
                revocation_reason: None,
            },
        );

        tracing::debug!(tx_hash = %tx_hash, content_hash = %content_hash, "anchor recorded");
        Ok(AnchorReceipt {
            tx_hash,
            submitted_at: Utc::now(),
        })
    }

    async fn revoke(&self, anchor_ref: &str, reason: &str) -> Result<AnchorReceipt, LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Unreachable("write failure injected".into()));
        }

        let mut anchor = self
            .anchors
            .get_mut(anchor_ref)
            .ok_or_else(|| LedgerError::NotFound(anchor_ref.to_owned()))?;
        anchor.status = AnchorStatus::Revoked;
        anchor.revocation_reason = Some(reason.to_owned());
        drop(anchor);

        Ok(AnchorReceipt {
            tx_hash: self.next_tx_hash(),
            submitted_at: Utc::now(),
        })
    }

    async fn verify(&self, anchor_ref: &str) -> Result<AnchorVerification, LedgerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Unreachable("read failure injected".into()));
        }

        let anchor = self
            .anchors
            .get(anchor_ref)
            .ok_or_else(|| LedgerError::NotFound(anchor_ref.to_owned()))?;
        Ok(Self::verification_of(&anchor))
    }

    async fn verify_content_hash(
        &self,
        content_hash: &ContentHash,
    ) -> Result<AnchorVerification, LedgerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LedgerError::Unreachable("read failure injected".into()));
        }

        self.anchors
            .iter()
            .find(|entry| entry.content_hash == *content_hash)
            .map(|entry| Self::verification_of(&entry))
            .ok_or_else(|| LedgerError::NotFound(content_hash.prefixed_hex()))
    }

    fn backend_id(&self) -> &str {
        "ledger-memory"
    }
}
