use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use attest_core::{ContentHash, CredentialId, CredentialStatus, EvidenceId, UserId};

/// A credential record.
///
/// `cid` and `content_hash` are snapshots taken at issuance. They stay
/// frozen afterwards even if the underlying evidence record changes, so a
/// verifier always checks against what was actually anchored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: CredentialId,
    /// The student the credential is about.
    pub student_id: UserId,
    /// The issuer of record. Only this user (or an admin) may issue or
    /// revoke the credential.
    pub issuer_id: UserId,
    /// The evidence record the credential is bound to, when any. Immutable
    /// after creation.
    pub evidence_id: Option<EvidenceId>,
    pub title: String,
    pub description: Option<String>,
    /// Free-form type label, e.g. "degree" or "certificate".
    pub credential_type: String,
    /// Content address snapshot taken from the evidence at issuance.
    pub cid: Option<String>,
    /// Hash of the canonical anchor payload, computed at issuance.
    pub content_hash: Option<ContentHash>,
    /// Ledger transaction hash; `None` when anchoring failed or is disabled.
    pub anchor_hash: Option<String>,
    /// When the anchor transaction was accepted.
    pub anchored_at: Option<DateTime<Utc>>,
    pub status: CredentialStatus,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revocation_reason: Option<String>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Whether the credential has been anchored on the ledger.
    pub fn is_anchored(&self) -> bool {
        self.anchor_hash.is_some()
    }
}

/// Input for creating a credential in `Pending` status.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub student_id: UserId,
    pub evidence_id: Option<EvidenceId>,
    pub title: String,
    pub description: Option<String>,
    pub credential_type: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Canonical payload whose sha256 digest is anchored on the ledger.
///
/// Field order matters: the digest is over the serialized JSON, so this
/// struct must stay stable once credentials exist in the wild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorPayload {
    pub id: CredentialId,
    pub student_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub issued_at: DateTime<Utc>,
}

impl AnchorPayload {
    /// Compute the content hash of the payload.
    pub fn content_hash(&self) -> Result<ContentHash, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        Ok(ContentHash::from_bytes(&bytes))
    }
}
