//! Integration test: evidence intake through the async pin queue.
//!
//! Exercises attest-evidence end to end with real temp files, the worker
//! queue, and the in-memory pinning backend.

use std::sync::Arc;
use std::time::Duration;

use attest_core::{EvidenceStatus, Visibility};
use attest_evidence::{EvidenceStore, PinQueue, Pinner};
use attest_integration_tests::Harness;

async fn wait_for_final(h: &Harness, id: attest_core::EvidenceId) -> EvidenceStatus {
    for _ in 0..200 {
        if let Some(ev) = h.evidence.get(id).await {
            if ev.status.is_final() {
                return ev.status;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("evidence never reached a final status");
}

// =========================================================================
// Upload → queue → pinned
// =========================================================================

#[tokio::test]
async fn test_upload_and_pin_through_queue() {
    let h = Harness::new();
    let queue = PinQueue::start(Arc::clone(&h.pipeline), 2, 16);

    let ev = h.upload(b"diploma scan", Visibility::Public).await;
    assert_eq!(ev.status, EvidenceStatus::Uploaded);

    assert!(queue.submit(ev.id).await.unwrap());
    assert_eq!(wait_for_final(&h, ev.id).await, EvidenceStatus::Pinned);

    // The pinned bytes round-trip through the content address.
    let pinned = h.evidence.get(ev.id).await.unwrap();
    let cid = pinned.cid.unwrap();
    assert_eq!(h.pinner.fetch(&cid).await.unwrap(), b"diploma scan");

    // Both lifecycle events were audited.
    assert_eq!(h.audit.entries_for_action("evidence_uploaded").len(), 1);
    assert_eq!(h.audit.entries_for_action("evidence_pinned").len(), 1);
}

#[tokio::test]
async fn test_provider_outage_marks_failed_keeps_hash() {
    let h = Harness::new();
    let queue = PinQueue::start(Arc::clone(&h.pipeline), 1, 16);
    h.pinner.set_fail_pin(true);

    let ev = h.upload(b"transcript", Visibility::Private).await;
    queue.submit(ev.id).await.unwrap();
    assert_eq!(wait_for_final(&h, ev.id).await, EvidenceStatus::Failed);

    let failed = h.evidence.get(ev.id).await.unwrap();
    assert!(failed.cid.is_none());
    // The fingerprint recorded at upload survives the failure.
    assert_eq!(failed.sha256, ev.sha256);
    assert_eq!(h.audit.entries_for_action("evidence_pin_failed").len(), 1);
}

#[tokio::test]
async fn test_many_uploads_across_workers() {
    let h = Harness::new();
    let queue = PinQueue::start(Arc::clone(&h.pipeline), 4, 32);

    let mut ids = Vec::new();
    for i in 0..8u8 {
        let ev = h.upload(&[i; 16], Visibility::Public).await;
        queue.submit(ev.id).await.unwrap();
        ids.push(ev.id);
    }

    for id in ids {
        assert_eq!(wait_for_final(&h, id).await, EvidenceStatus::Pinned);
    }
    assert_eq!(h.audit.entries_for_action("evidence_pinned").len(), 8);
}
