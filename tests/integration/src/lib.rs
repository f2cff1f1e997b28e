//! Shared harness for the cross-crate integration scenarios.
//!
//! Wires every engine component against the in-memory backends, the same
//! way an application would wire the real ones.

use std::sync::Arc;

use attest_core::{
    Actor, CredentialId, EvidenceStatus, LedgerConfig, MemoryAuditLog, PinningConfig, Role, UserId,
    Visibility,
};
use attest_credentials::{Credential, CredentialManager, NewCredential};
use attest_evidence::{
    ingest, Evidence, EvidenceStore, EvidenceUpload, MemoryEvidenceStore, MemoryPinner,
    PinPipeline, Pinner,
};
use attest_ledger::{AnchorClient, MemoryAnchorClient};
use attest_verify::{RequestContext, VerificationOrchestrator};

pub struct Harness {
    pub evidence: Arc<MemoryEvidenceStore>,
    pub pinner: Arc<MemoryPinner>,
    pub anchor: Arc<MemoryAnchorClient>,
    pub audit: Arc<MemoryAuditLog>,
    pub pipeline: Arc<PinPipeline>,
    pub manager: Arc<CredentialManager>,
    pub orchestrator: VerificationOrchestrator,
    pub issuer: Actor,
    pub student: UserId,
}

impl Harness {
    pub fn new() -> Self {
        let evidence = Arc::new(MemoryEvidenceStore::new());
        let pinner = Arc::new(MemoryPinner::new());
        let anchor = Arc::new(MemoryAnchorClient::new());
        let audit = Arc::new(MemoryAuditLog::new());
        let ledger = LedgerConfig {
            enabled: true,
            registry_address: "0xregistry".into(),
            admin_address: "0xadmin".into(),
            ..Default::default()
        };

        let pipeline = Arc::new(PinPipeline::new(
            evidence.clone(),
            pinner.clone() as Arc<dyn Pinner>,
            audit.clone(),
        ));
        let manager = Arc::new(CredentialManager::new(
            evidence.clone(),
            Some(anchor.clone() as Arc<dyn AnchorClient>),
            audit.clone(),
            ledger.clone(),
        ));
        let orchestrator = VerificationOrchestrator::new(
            manager.clone(),
            evidence.clone(),
            Some(pinner.clone() as Arc<dyn Pinner>),
            Some(anchor.clone() as Arc<dyn AnchorClient>),
            audit.clone(),
            &PinningConfig::default(),
            &ledger,
        );

        Self {
            evidence,
            pinner,
            anchor,
            audit,
            pipeline,
            manager,
            orchestrator,
            issuer: Actor::new(UserId::new(), vec![Role::Issuer]),
            student: UserId::new(),
        }
    }

    /// Write real bytes to a temp file and ingest them as the student's
    /// evidence.
    pub async fn upload(&self, contents: &[u8], visibility: Visibility) -> Evidence {
        let path = std::env::temp_dir().join(format!("attest-e2e-{}", uuid::Uuid::now_v7()));
        std::fs::write(&path, contents).expect("temp file write");
        ingest(
            self.evidence.as_ref(),
            self.audit.as_ref(),
            EvidenceUpload {
                owner_id: self.student,
                filename: "evidence.pdf".into(),
                disk: "local".into(),
                path: path.to_string_lossy().into_owned(),
                mime: Some("application/pdf".into()),
                metadata: Default::default(),
                visibility,
            },
        )
        .await
        .expect("ingest")
    }

    /// Upload and pin in one step; panics if the pin did not land.
    pub async fn upload_pinned(&self, contents: &[u8], visibility: Visibility) -> Evidence {
        let ev = self.upload(contents, visibility).await;
        self.pipeline.run(ev.id).await.expect("pin pipeline");
        let pinned = self.evidence.get(ev.id).await.expect("evidence exists");
        assert_eq!(pinned.status, EvidenceStatus::Pinned);
        pinned
    }

    /// Create a pending credential over the given evidence.
    pub async fn create_credential(&self, evidence: &Evidence) -> Credential {
        self.manager
            .create(
                &self.issuer,
                NewCredential {
                    student_id: self.student,
                    evidence_id: Some(evidence.id),
                    title: "BSc Computer Science".into(),
                    description: Some("First class honours".into()),
                    credential_type: "degree".into(),
                    expires_at: None,
                },
            )
            .await
            .expect("credential create")
    }

    /// Upload, pin, create, and issue in one step.
    pub async fn issued_credential(&self, contents: &[u8], visibility: Visibility) -> CredentialId {
        let evidence = self.upload_pinned(contents, visibility).await;
        let credential = self.create_credential(&evidence).await;
        self.manager
            .issue(&self.issuer, credential.id)
            .await
            .expect("credential issue");
        credential.id
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Anonymous public-page request context.
pub fn public_ctx() -> RequestContext {
    RequestContext {
        ip: Some("198.51.100.7".into()),
        user_agent: Some("integration-suite/1.0".into()),
    }
}
