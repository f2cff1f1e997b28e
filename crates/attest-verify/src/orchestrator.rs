use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use attest_core::{
    Actor, AuditRecorder, AuditSubject, ContentHash, CredentialId, CredentialStatus, LedgerConfig,
    PinningConfig, Visibility,
};
use attest_credentials::{Credential, CredentialManager};
use attest_evidence::{Evidence, EvidenceStore, Pinner};
use attest_ledger::AnchorClient;

use crate::error::VerifyError;
use crate::verdict::{
    drift, CredentialSummary, FullVerdict, IntegrityCheck, LedgerCheck, RevocationDetails, Verdict,
};

/// Caller metadata recorded in the audit trail for every verification.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Composes a trust verdict from local state, content integrity, and the
/// ledger anchor.
///
/// Every verification attempt is audited, including restricted and degraded
/// ones. The integrity and ledger checks run concurrently, each under its
/// own timeout, and a failure on one axis never blanks out the other.
pub struct VerificationOrchestrator {
    credentials: Arc<CredentialManager>,
    evidence: Arc<dyn EvidenceStore>,
    pinner: Option<Arc<dyn Pinner>>,
    anchor: Option<Arc<dyn AnchorClient>>,
    audit: Arc<dyn AuditRecorder>,
    fetch_timeout: Duration,
    read_timeout: Duration,
}

impl VerificationOrchestrator {
    pub fn new(
        credentials: Arc<CredentialManager>,
        evidence: Arc<dyn EvidenceStore>,
        pinner: Option<Arc<dyn Pinner>>,
        anchor: Option<Arc<dyn AnchorClient>>,
        audit: Arc<dyn AuditRecorder>,
        pinning: &PinningConfig,
        ledger: &LedgerConfig,
    ) -> Self {
        Self {
            credentials,
            evidence,
            pinner,
            anchor,
            audit,
            fetch_timeout: Duration::from_secs(pinning.fetch_timeout_secs),
            read_timeout: Duration::from_secs(ledger.read_timeout_secs),
        }
    }

    /// Verify a credential on behalf of an optional requester.
    ///
    /// Anonymous requesters get a [`Verdict::Restricted`] when the backing
    /// evidence is private; the student, the issuer of record, and admins
    /// always get the full verdict.
    pub async fn verify(
        &self,
        id: CredentialId,
        requester: Option<&Actor>,
        ctx: &RequestContext,
    ) -> Result<Verdict, VerifyError> {
        let credential = self
            .credentials
            .get(id)
            .await
            .ok_or(VerifyError::NotFound(id))?;

        // Audited before any gating so restricted and degraded lookups
        // leave a trace too.
        self.audit.record(
            requester.map(|a| a.id),
            "credential_verified",
            AuditSubject::Credential(id),
            json!({
                "ip": ctx.ip,
                "user_agent": ctx.user_agent,
            }),
        );

        let evidence = match credential.evidence_id {
            Some(evidence_id) => self.evidence.get(evidence_id).await,
            None => None,
        };

        if !self.may_view(&credential, &evidence, requester) {
            tracing::debug!(credential_id = %id, "restricted verdict for private evidence");
            return Ok(Verdict::Restricted {
                status: credential.status,
            });
        }

        let (integrity, ledger) = tokio::join!(
            self.check_integrity(&evidence),
            self.check_ledger(&credential),
        );

        let ledger_drift = drift(credential.status, &ledger);
        if ledger_drift {
            tracing::warn!(
                credential_id = %id,
                local_status = %credential.status,
                "local and ledger state disagree on revocation"
            );
        }

        let revocation = if credential.status == CredentialStatus::Revoked {
            Some(RevocationDetails {
                reason: credential.revocation_reason.clone(),
                revoked_at: credential.revoked_at,
            })
        } else {
            None
        };

        let pinned = evidence.as_ref().map(Evidence::is_pinned).unwrap_or(false);
        let cid = evidence.and_then(|e| e.cid);

        Ok(Verdict::Full(FullVerdict {
            credential: summarize(&credential),
            pinned,
            cid,
            integrity,
            ledger,
            ledger_drift,
            revocation,
        }))
    }

    /// Private evidence is visible to the student it belongs to, the issuer
    /// of record, and admins. Missing evidence restricts nothing.
    fn may_view(
        &self,
        credential: &Credential,
        evidence: &Option<Evidence>,
        requester: Option<&Actor>,
    ) -> bool {
        let Some(evidence) = evidence else {
            return true;
        };
        if evidence.visibility == Visibility::Public {
            return true;
        }
        match requester {
            Some(actor) => {
                actor.id == credential.student_id
                    || actor.id == credential.issuer_id
                    || actor.is_admin()
            }
            None => false,
        }
    }

    /// Fetch the pinned content and compare its sha256 against the recorded
    /// one. A failed fetch is `Unknown`, never `Mismatch`.
    async fn check_integrity(&self, evidence: &Option<Evidence>) -> IntegrityCheck {
        let Some(evidence) = evidence else {
            return IntegrityCheck::Skipped;
        };
        let Some(cid) = evidence.cid.as_deref() else {
            return IntegrityCheck::Skipped;
        };
        let Some(pinner) = self.pinner.as_ref() else {
            return IntegrityCheck::Skipped;
        };

        let bytes = match tokio::time::timeout(self.fetch_timeout, pinner.fetch(cid)).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                tracing::warn!(cid, error = %e, "content fetch failed");
                return IntegrityCheck::Unknown {
                    reason: e.to_string(),
                };
            }
            Err(_) => {
                tracing::warn!(cid, "content fetch timed out");
                return IntegrityCheck::Unknown {
                    reason: "content fetch timed out".into(),
                };
            }
        };

        if ContentHash::from_bytes(&bytes) == evidence.sha256 {
            IntegrityCheck::Match
        } else {
            tracing::warn!(cid, expected = %evidence.sha256, "content hash mismatch");
            IntegrityCheck::Mismatch
        }
    }

    /// Ask the registry for its view of the anchor.
    async fn check_ledger(&self, credential: &Credential) -> LedgerCheck {
        let Some(anchor) = self.anchor.as_ref() else {
            return LedgerCheck::Skipped;
        };
        let Some(anchor_ref) = credential.anchor_hash.as_deref() else {
            return LedgerCheck::Skipped;
        };

        match tokio::time::timeout(self.read_timeout, anchor.verify(anchor_ref)).await {
            Ok(Ok(verification)) => LedgerCheck::Verified {
                status: verification.status,
            },
            Ok(Err(e)) => {
                tracing::warn!(anchor_ref, error = %e, "ledger verification failed");
                LedgerCheck::Unavailable {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                tracing::warn!(anchor_ref, "ledger verification timed out");
                LedgerCheck::Unavailable {
                    reason: "ledger read timed out".into(),
                }
            }
        }
    }
}

fn summarize(credential: &Credential) -> CredentialSummary {
    CredentialSummary {
        id: credential.id,
        student_id: credential.student_id,
        issuer_id: credential.issuer_id,
        evidence_id: credential.evidence_id,
        title: credential.title.clone(),
        credential_type: credential.credential_type.clone(),
        status: credential.status,
        content_hash: credential.content_hash,
        anchor_hash: credential.anchor_hash.clone(),
        issued_at: credential.issued_at,
        expires_at: credential.expires_at,
    }
}
