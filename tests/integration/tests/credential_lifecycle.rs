//! Integration test: full credential lifecycle against pinned evidence
//! and the in-memory anchor registry.

use attest_core::{CoreError, CredentialStatus, Visibility};
use attest_credentials::CredentialError;
use attest_integration_tests::Harness;
use attest_ledger::{AnchorClient, AnchorStatus};

// =========================================================================
// Create → issue → anchor
// =========================================================================

#[tokio::test]
async fn test_issue_anchors_content_hash() {
    let h = Harness::new();
    let evidence = h.upload_pinned(b"degree certificate", Visibility::Public).await;
    let credential = h.create_credential(&evidence).await;
    assert_eq!(credential.status, CredentialStatus::Pending);

    let issued = h.manager.issue(&h.issuer, credential.id).await.unwrap();
    assert_eq!(issued.status, CredentialStatus::Issued);
    assert_eq!(issued.cid, evidence.cid);

    // The anchor on the registry carries the payload hash, not the file hash.
    let content_hash = issued.content_hash.unwrap();
    let verification = h.anchor.verify_content_hash(&content_hash).await.unwrap();
    assert!(verification.is_valid);
    assert_eq!(verification.status, AnchorStatus::Active);

    assert_eq!(h.audit.entries_for_action("credential_created").len(), 1);
    assert_eq!(h.audit.entries_for_action("credential_issued").len(), 1);
    assert_eq!(h.audit.entries_for_action("credential_anchored").len(), 1);
}

#[tokio::test]
async fn test_ledger_outage_does_not_block_issuance() {
    let h = Harness::new();
    let evidence = h.upload_pinned(b"certificate", Visibility::Public).await;
    let credential = h.create_credential(&evidence).await;
    h.anchor.set_fail_writes(true);

    let issued = h.manager.issue(&h.issuer, credential.id).await.unwrap();
    assert_eq!(issued.status, CredentialStatus::Issued);
    assert!(issued.anchor_hash.is_none());
    assert!(h.anchor.is_empty());
    assert!(h.audit.entries_for_action("credential_anchored").is_empty());
}

#[tokio::test]
async fn test_unpinned_evidence_still_issuable() {
    // Pinning pending is not a blocker for issuance; the credential simply
    // carries no cid snapshot.
    let h = Harness::new();
    let evidence = h.upload(b"still uploading", Visibility::Public).await;
    let credential = h.create_credential(&evidence).await;

    let issued = h.manager.issue(&h.issuer, credential.id).await.unwrap();
    assert_eq!(issued.status, CredentialStatus::Issued);
    assert!(issued.cid.is_none());
    assert!(issued.is_anchored());
}

// =========================================================================
// Revocation
// =========================================================================

#[tokio::test]
async fn test_revocation_is_terminal_and_propagated() {
    let h = Harness::new();
    let id = h.issued_credential(b"thesis", Visibility::Public).await;

    let revoked = h.manager.revoke(&h.issuer, id, "plagiarism").await.unwrap();
    assert_eq!(revoked.status, CredentialStatus::Revoked);
    assert_eq!(revoked.revocation_reason.as_deref(), Some("plagiarism"));

    // The registry followed.
    let anchor_ref = revoked.anchor_hash.unwrap();
    let verification = h.anchor.verify(&anchor_ref).await.unwrap();
    assert_eq!(verification.status, AnchorStatus::Revoked);

    // No way back.
    let result = h.manager.issue(&h.issuer, id).await;
    assert!(matches!(
        result,
        Err(CredentialError::Core(
            CoreError::InvalidCredentialTransition { .. }
        ))
    ));
}

#[tokio::test]
async fn test_revocation_survives_ledger_outage() {
    let h = Harness::new();
    let id = h.issued_credential(b"thesis", Visibility::Public).await;
    h.anchor.set_fail_writes(true);

    let revoked = h.manager.revoke(&h.issuer, id, "issued in error").await.unwrap();
    assert_eq!(revoked.status, CredentialStatus::Revoked);

    // Ledger still says active: local state wins as source of truth.
    h.anchor.set_fail_writes(false);
    let anchor_ref = revoked.anchor_hash.unwrap();
    let verification = h.anchor.verify(&anchor_ref).await.unwrap();
    assert_eq!(verification.status, AnchorStatus::Active);
}
