use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use attest_core::{
    CoreError, EvidenceEvent, EvidenceId, EvidenceStateMachine, EvidenceStatus, UserId,
};

use crate::error::EvidenceError;
use crate::record::{Evidence, NewEvidence};

/// Owns evidence records and their pin-status transitions.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Create a new record in `Uploaded` status.
    async fn create(&self, new: NewEvidence) -> Evidence;

    /// Fetch a record by id.
    async fn get(&self, id: EvidenceId) -> Option<Evidence>;

    /// Transition a record's status, enforcing the state machine and the
    /// `cid` invariant (`Some` iff the new status is `Pinned`).
    async fn set_status(
        &self,
        id: EvidenceId,
        status: EvidenceStatus,
        cid: Option<String>,
    ) -> Result<Evidence, EvidenceError>;

    /// All records owned by a user.
    async fn list_for_owner(&self, owner_id: UserId) -> Vec<Evidence>;
}

/// In-memory evidence store.
#[derive(Debug, Default)]
pub struct MemoryEvidenceStore {
    records: DashMap<Uuid, Evidence>,
}

impl MemoryEvidenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Map a target status to the event that reaches it.
fn event_for(status: EvidenceStatus) -> Option<EvidenceEvent> {
    match status {
        EvidenceStatus::Uploaded => None,
        EvidenceStatus::Pinning => Some(EvidenceEvent::PinStarted),
        EvidenceStatus::Pinned => Some(EvidenceEvent::PinSucceeded),
        EvidenceStatus::Failed => Some(EvidenceEvent::PinFailed),
    }
}

#[async_trait]
impl EvidenceStore for MemoryEvidenceStore {
    async fn create(&self, new: NewEvidence) -> Evidence {
        let now = Utc::now();
        let evidence = Evidence {
            id: EvidenceId::new(),
            owner_id: new.owner_id,
            filename: new.filename,
            disk: new.disk,
            path: new.path,
            mime: new.mime,
            size: new.size,
            sha256: new.sha256,
            cid: None,
            metadata: new.metadata,
            visibility: new.visibility,
            status: EvidenceStatus::Uploaded,
            created_at: now,
            updated_at: now,
        };
        self.records.insert(evidence.id.0, evidence.clone());
        tracing::debug!(evidence_id = %evidence.id, sha256 = %evidence.sha256, "evidence record created");
        evidence
    }

    async fn get(&self, id: EvidenceId) -> Option<Evidence> {
        self.records.get(&id.0).map(|r| r.clone())
    }

    async fn set_status(
        &self,
        id: EvidenceId,
        status: EvidenceStatus,
        cid: Option<String>,
    ) -> Result<Evidence, EvidenceError> {
        if (status == EvidenceStatus::Pinned) != cid.is_some() {
            return Err(EvidenceError::Core(CoreError::ValidationError(
                "cid must be set exactly when status is pinned".into(),
            )));
        }

        let mut entry = self
            .records
            .get_mut(&id.0)
            .ok_or(EvidenceError::NotFound(id))?;
        let record = entry.value_mut();

        let event = event_for(status).ok_or_else(|| {
            EvidenceError::Core(CoreError::ValidationError(format!(
                "cannot transition back to {}",
                status
            )))
        })?;
        record.status = EvidenceStateMachine::transition(record.status, event)?;
        if let Some(cid) = cid {
            record.cid = Some(cid);
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn list_for_owner(&self, owner_id: UserId) -> Vec<Evidence> {
        self.records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .map(|r| r.clone())
            .collect()
    }
}
