use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use serde_json::json;
use uuid::Uuid;

use attest_core::{
    Actor, AuditRecorder, AuditSubject, CredentialEvent, CredentialId, CredentialStateMachine,
    CredentialStatus, EvidenceStatus, LedgerConfig, Role, UserId,
};
use attest_evidence::EvidenceStore;
use attest_ledger::AnchorClient;

use crate::error::CredentialError;
use crate::record::{AnchorPayload, Credential, NewCredential};

/// Ledger address used for students until a wallet mapping exists.
const UNMAPPED_STUDENT_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Owns credential records and drives their lifecycle.
///
/// Local state is the source of truth: every mutation commits to the store
/// first, then anchoring runs best-effort. A ledger outage never blocks or
/// rolls back issuance or revocation.
pub struct CredentialManager {
    credentials: DashMap<Uuid, Credential>,
    evidence: Arc<dyn EvidenceStore>,
    anchor: Option<Arc<dyn AnchorClient>>,
    audit: Arc<dyn AuditRecorder>,
    ledger: LedgerConfig,
}

impl CredentialManager {
    pub fn new(
        evidence: Arc<dyn EvidenceStore>,
        anchor: Option<Arc<dyn AnchorClient>>,
        audit: Arc<dyn AuditRecorder>,
        ledger: LedgerConfig,
    ) -> Self {
        Self {
            credentials: DashMap::new(),
            evidence,
            anchor,
            audit,
            ledger,
        }
    }

    /// Create a credential in `Pending` status, bound to an evidence record.
    ///
    /// The actor must hold the issuer or admin role and becomes the issuer
    /// of record. The evidence must exist, belong to the named student, and
    /// must not have failed pinning.
    pub async fn create(
        &self,
        actor: &Actor,
        new: NewCredential,
    ) -> Result<Credential, CredentialError> {
        if !actor.has_role(Role::Issuer) && !actor.is_admin() {
            return Err(CredentialError::Forbidden(
                "only issuers may create credentials".into(),
            ));
        }
        if new.title.trim().is_empty() {
            return Err(CredentialError::Validation("title must not be empty".into()));
        }

        if let Some(evidence_id) = new.evidence_id {
            let evidence = self
                .evidence
                .get(evidence_id)
                .await
                .ok_or(CredentialError::EvidenceNotFound(evidence_id))?;
            if evidence.owner_id != new.student_id {
                return Err(CredentialError::Validation(
                    "evidence does not belong to the named student".into(),
                ));
            }
            if evidence.status == EvidenceStatus::Failed {
                return Err(CredentialError::Validation(
                    "evidence failed pinning and cannot back a credential".into(),
                ));
            }
        }

        let now = Utc::now();
        let credential = Credential {
            id: CredentialId::new(),
            student_id: new.student_id,
            issuer_id: actor.id,
            evidence_id: new.evidence_id,
            title: new.title,
            description: new.description,
            credential_type: new.credential_type,
            cid: None,
            content_hash: None,
            anchor_hash: None,
            anchored_at: None,
            status: CredentialStatus::Pending,
            issued_at: None,
            expires_at: new.expires_at,
            revocation_reason: None,
            revoked_at: None,
            created_at: now,
            updated_at: now,
        };
        self.credentials.insert(credential.id.0, credential.clone());

        self.audit.record(
            Some(actor.id),
            "credential_created",
            AuditSubject::Credential(credential.id),
            json!({
                "title": credential.title,
                "evidence_id": credential.evidence_id.map(|id| id.to_string()),
            }),
        );
        tracing::info!(
            credential_id = %credential.id,
            student_id = %credential.student_id,
            "credential created"
        );
        Ok(credential)
    }

    /// Issue a pending credential.
    ///
    /// Commits the issued state locally, then anchors the content hash on
    /// the ledger best-effort. Anchoring failure leaves `anchor_hash` unset
    /// and logs a warning; the credential is issued regardless.
    pub async fn issue(
        &self,
        actor: &Actor,
        id: CredentialId,
    ) -> Result<Credential, CredentialError> {
        let snapshot = self.get(id).await.ok_or(CredentialError::NotFound(id))?;
        self.authorize(actor, &snapshot)?;

        // Snapshot the evidence cid before taking the entry lock; the store
        // read awaits and the lock must never be held across an await.
        let evidence_cid = match snapshot.evidence_id {
            Some(evidence_id) => self.evidence.get(evidence_id).await.and_then(|e| e.cid),
            None => None,
        };

        let issued = {
            let mut entry = self
                .credentials
                .get_mut(&id.0)
                .ok_or(CredentialError::NotFound(id))?;
            let record = entry.value_mut();

            record.status =
                CredentialStateMachine::transition(record.status, CredentialEvent::Issue)?;
            let issued_at = Utc::now();
            let payload = AnchorPayload {
                id: record.id,
                student_id: record.student_id,
                title: record.title.clone(),
                description: record.description.clone(),
                issued_at,
            };
            record.content_hash = Some(
                payload
                    .content_hash()
                    .map_err(|e| CredentialError::Validation(e.to_string()))?,
            );
            record.issued_at = Some(issued_at);
            record.cid = evidence_cid;
            record.updated_at = issued_at;
            record.clone()
        };

        self.audit.record(
            Some(actor.id),
            "credential_issued",
            AuditSubject::Credential(id),
            json!({ "title": issued.title }),
        );
        tracing::info!(credential_id = %id, "credential issued");

        Ok(self.anchor_issue(actor, issued).await)
    }

    /// Revoke a pending or issued credential. The reason is mandatory and
    /// permanent.
    pub async fn revoke(
        &self,
        actor: &Actor,
        id: CredentialId,
        reason: &str,
    ) -> Result<Credential, CredentialError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CredentialError::Validation(
                "revocation reason must not be empty".into(),
            ));
        }

        let snapshot = self.get(id).await.ok_or(CredentialError::NotFound(id))?;
        self.authorize(actor, &snapshot)?;

        let revoked = {
            let mut entry = self
                .credentials
                .get_mut(&id.0)
                .ok_or(CredentialError::NotFound(id))?;
            let record = entry.value_mut();

            record.status =
                CredentialStateMachine::transition(record.status, CredentialEvent::Revoke)?;
            let now = Utc::now();
            record.revocation_reason = Some(reason.to_owned());
            record.revoked_at = Some(now);
            record.updated_at = now;
            record.clone()
        };

        self.audit.record(
            Some(actor.id),
            "credential_revoked",
            AuditSubject::Credential(id),
            json!({ "reason": reason }),
        );
        tracing::info!(credential_id = %id, reason, "credential revoked");

        self.anchor_revoke(&revoked, reason).await;
        Ok(revoked)
    }

    /// Fetch a credential by id.
    pub async fn get(&self, id: CredentialId) -> Option<Credential> {
        self.credentials.get(&id.0).map(|r| r.clone())
    }

    /// All credentials about a student.
    pub async fn list_for_student(&self, student_id: UserId) -> Vec<Credential> {
        self.credentials
            .iter()
            .filter(|r| r.student_id == student_id)
            .map(|r| r.clone())
            .collect()
    }

    /// Issuer-of-record or admin.
    fn authorize(&self, actor: &Actor, credential: &Credential) -> Result<(), CredentialError> {
        if actor.id == credential.issuer_id || actor.is_admin() {
            Ok(())
        } else {
            Err(CredentialError::Forbidden(
                "only the issuer of record or an admin may act on this credential".into(),
            ))
        }
    }

    fn anchor_client(&self) -> Option<&Arc<dyn AnchorClient>> {
        if self.ledger.is_configured() {
            self.anchor.as_ref()
        } else {
            None
        }
    }

    /// Best-effort anchoring of a freshly issued credential. Returns the
    /// latest snapshot, with `anchor_hash` set only on success.
    async fn anchor_issue(&self, actor: &Actor, issued: Credential) -> Credential {
        let Some(anchor) = self.anchor_client() else {
            return issued;
        };
        let Some(content_hash) = issued.content_hash else {
            return issued;
        };

        let expires_at = issued.expires_at.map(|t| t.timestamp()).unwrap_or(0);
        let call = anchor.issue(
            UNMAPPED_STUDENT_ADDRESS,
            &content_hash,
            issued.cid.as_deref(),
            &issued.credential_type,
            expires_at,
        );
        let timeout = Duration::from_secs(self.ledger.write_timeout_secs);

        let receipt = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => {
                tracing::warn!(credential_id = %issued.id, error = %e, "ledger anchoring failed");
                return issued;
            }
            Err(_) => {
                tracing::warn!(credential_id = %issued.id, "ledger anchoring timed out");
                return issued;
            }
        };

        let updated = self.credentials.get_mut(&issued.id.0).map(|mut entry| {
            let record = entry.value_mut();
            record.anchor_hash = Some(receipt.tx_hash.clone());
            record.anchored_at = Some(receipt.submitted_at);
            record.updated_at = Utc::now();
            record.clone()
        });

        self.audit.record(
            Some(actor.id),
            "credential_anchored",
            AuditSubject::Credential(issued.id),
            json!({ "tx_hash": receipt.tx_hash, "backend": anchor.backend_id() }),
        );
        updated.unwrap_or(issued)
    }

    /// Best-effort ledger revocation. Local state already committed.
    async fn anchor_revoke(&self, revoked: &Credential, reason: &str) {
        let Some(anchor) = self.anchor_client() else {
            return;
        };
        let Some(anchor_ref) = revoked.anchor_hash.as_deref() else {
            return;
        };

        let timeout = Duration::from_secs(self.ledger.write_timeout_secs);
        match tokio::time::timeout(timeout, anchor.revoke(anchor_ref, reason)).await {
            Ok(Ok(_)) => {
                tracing::info!(credential_id = %revoked.id, "ledger revocation recorded");
            }
            Ok(Err(e)) => {
                tracing::warn!(credential_id = %revoked.id, error = %e, "ledger revocation failed");
            }
            Err(_) => {
                tracing::warn!(credential_id = %revoked.id, "ledger revocation timed out");
            }
        }
    }
}
