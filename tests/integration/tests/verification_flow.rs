//! Integration test: public verification across all three trust axes.

use attest_core::{Actor, CredentialStatus, Role, UserId, Visibility};
use attest_integration_tests::{public_ctx, Harness};
use attest_ledger::{AnchorClient, AnchorStatus};
use attest_verify::{FullVerdict, IntegrityCheck, LedgerCheck, Verdict};

fn full(verdict: Verdict) -> FullVerdict {
    match verdict {
        Verdict::Full(full) => full,
        Verdict::Restricted { .. } => panic!("expected full verdict"),
    }
}

// =========================================================================
// Happy path
// =========================================================================

#[tokio::test]
async fn test_anonymous_verification_of_public_credential() {
    let h = Harness::new();
    let id = h.issued_credential(b"official transcript", Visibility::Public).await;

    let verdict = h.orchestrator.verify(id, None, &public_ctx()).await.unwrap();
    let full = full(verdict);

    assert_eq!(full.credential.status, CredentialStatus::Issued);
    assert!(full.pinned);
    assert_eq!(full.integrity, IntegrityCheck::Match);
    assert_eq!(
        full.ledger,
        LedgerCheck::Verified {
            status: AnchorStatus::Active
        }
    );
    assert!(!full.ledger_drift);

    // The lookup itself was audited with the caller's context.
    let entries = h.audit.entries_for_action("credential_verified");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].meta["ip"], "198.51.100.7");
}

// =========================================================================
// Degraded axes
// =========================================================================

#[tokio::test]
async fn test_tampered_content_detected() {
    let h = Harness::new();
    let id = h.issued_credential(b"genuine marks", Visibility::Public).await;
    h.pinner.set_corrupt_fetch(true);

    let verdict = full(h.orchestrator.verify(id, None, &public_ctx()).await.unwrap());
    assert_eq!(verdict.integrity, IntegrityCheck::Mismatch);
    // The ledger axis is unaffected by a bad gateway.
    assert_eq!(
        verdict.ledger,
        LedgerCheck::Verified {
            status: AnchorStatus::Active
        }
    );
}

#[tokio::test]
async fn test_gateway_outage_never_reports_mismatch() {
    let h = Harness::new();
    let id = h.issued_credential(b"genuine marks", Visibility::Public).await;
    h.pinner.set_fail_fetch(true);

    let verdict = full(h.orchestrator.verify(id, None, &public_ctx()).await.unwrap());
    assert!(matches!(verdict.integrity, IntegrityCheck::Unknown { .. }));
}

#[tokio::test]
async fn test_ledger_outage_degrades_one_axis() {
    let h = Harness::new();
    let id = h.issued_credential(b"genuine marks", Visibility::Public).await;
    h.anchor.set_fail_reads(true);

    let verdict = full(h.orchestrator.verify(id, None, &public_ctx()).await.unwrap());
    assert!(matches!(verdict.ledger, LedgerCheck::Unavailable { .. }));
    assert_eq!(verdict.integrity, IntegrityCheck::Match);
    assert_eq!(verdict.credential.status, CredentialStatus::Issued);
}

// =========================================================================
// Access gating and drift
// =========================================================================

#[tokio::test]
async fn test_private_evidence_restricts_anonymous_callers() {
    let h = Harness::new();
    let id = h.issued_credential(b"sealed record", Visibility::Private).await;

    let verdict = h.orchestrator.verify(id, None, &public_ctx()).await.unwrap();
    assert!(matches!(
        verdict,
        Verdict::Restricted {
            status: CredentialStatus::Issued
        }
    ));

    // The student still gets everything.
    let student = Actor::new(h.student, vec![Role::Student]);
    let verdict = h
        .orchestrator
        .verify(id, Some(&student), &public_ctx())
        .await
        .unwrap();
    assert!(matches!(verdict, Verdict::Full(_)));

    // Restricted lookups are audited too.
    assert_eq!(h.audit.entries_for_action("credential_verified").len(), 2);
}

#[tokio::test]
async fn test_out_of_band_ledger_revocation_surfaces_as_drift() {
    let h = Harness::new();
    let id = h.issued_credential(b"record", Visibility::Public).await;

    let anchor_ref = h.manager.get(id).await.unwrap().anchor_hash.unwrap();
    h.anchor.revoke(&anchor_ref, "registry admin action").await.unwrap();

    let verdict = full(h.orchestrator.verify(id, None, &public_ctx()).await.unwrap());
    assert_eq!(verdict.credential.status, CredentialStatus::Issued);
    assert!(verdict.ledger_drift);
}

#[tokio::test]
async fn test_revoked_credential_discloses_reason() {
    let h = Harness::new();
    let id = h.issued_credential(b"record", Visibility::Public).await;
    h.manager.revoke(&h.issuer, id, "plagiarism").await.unwrap();

    let verdict = full(h.orchestrator.verify(id, None, &public_ctx()).await.unwrap());
    assert_eq!(verdict.credential.status, CredentialStatus::Revoked);
    let revocation = verdict.revocation.unwrap();
    assert_eq!(revocation.reason.as_deref(), Some("plagiarism"));
    assert!(!verdict.ledger_drift);
}

#[tokio::test]
async fn test_unrelated_issuer_cannot_widen_access() {
    let h = Harness::new();
    let id = h.issued_credential(b"sealed record", Visibility::Private).await;

    let other = Actor::new(UserId::new(), vec![Role::Issuer]);
    let verdict = h
        .orchestrator
        .verify(id, Some(&other), &public_ctx())
        .await
        .unwrap();
    assert!(matches!(verdict, Verdict::Restricted { .. }));
}
