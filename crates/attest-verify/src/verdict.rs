use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use attest_core::{ContentHash, CredentialId, CredentialStatus, EvidenceId, UserId};
use attest_ledger::AnchorStatus;

/// Outcome of the content-integrity axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "result", content = "detail")]
pub enum IntegrityCheck {
    /// Fetched bytes hash to the recorded sha256.
    Match,
    /// Fetched bytes hash to something else. Only ever reported when the
    /// fetch itself succeeded.
    Mismatch,
    /// The content could not be fetched; its integrity is undetermined.
    Unknown { reason: String },
    /// No pinned content to check against.
    Skipped,
}

/// Outcome of the ledger axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "result", content = "detail")]
pub enum LedgerCheck {
    /// The registry answered; this is its view of the anchor.
    Verified { status: AnchorStatus },
    /// The registry could not be reached or answered malformed.
    Unavailable { reason: String },
    /// The credential was never anchored, or anchoring is disabled.
    Skipped,
}

/// Why and when the credential was revoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationDetails {
    pub reason: Option<String>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// The credential fields exposed to verifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSummary {
    pub id: CredentialId,
    pub student_id: UserId,
    pub issuer_id: UserId,
    pub evidence_id: Option<EvidenceId>,
    pub title: String,
    pub credential_type: String,
    pub status: CredentialStatus,
    pub content_hash: Option<ContentHash>,
    pub anchor_hash: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// The composed verification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "access")]
pub enum Verdict {
    /// Backing evidence is private and the requester holds no right to it.
    /// Only existence and lifecycle state are disclosed.
    Restricted { status: CredentialStatus },
    /// Full verdict with all three axes.
    Full(FullVerdict),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullVerdict {
    pub credential: CredentialSummary,
    /// Whether the backing evidence is pinned.
    pub pinned: bool,
    /// Content address of the backing evidence, when pinned.
    pub cid: Option<String>,
    pub integrity: IntegrityCheck,
    pub ledger: LedgerCheck,
    /// Local state and ledger state disagree on revocation.
    pub ledger_drift: bool,
    /// Present exactly when the credential is revoked.
    pub revocation: Option<RevocationDetails>,
}

impl Verdict {
    /// Lifecycle status regardless of access level.
    pub fn status(&self) -> CredentialStatus {
        match self {
            Self::Restricted { status } => *status,
            Self::Full(full) => full.credential.status,
        }
    }
}

/// Drift exists when local and ledger state disagree on revocation.
pub(crate) fn drift(local: CredentialStatus, ledger: &LedgerCheck) -> bool {
    match (local, ledger) {
        (
            CredentialStatus::Issued,
            LedgerCheck::Verified {
                status: AnchorStatus::Revoked,
            },
        ) => true,
        (
            CredentialStatus::Revoked,
            LedgerCheck::Verified {
                status: AnchorStatus::Active,
            },
        ) => true,
        _ => false,
    }
}
