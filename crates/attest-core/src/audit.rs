//! Append-only audit trail interface.
//!
//! The engine only emits entries; durable storage is a collaborator concern.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CredentialId, EvidenceId, UserId};

/// The record an audit entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "id")]
pub enum AuditSubject {
    Evidence(EvidenceId),
    Credential(CredentialId),
}

impl AuditSubject {
    /// Stable subject type label.
    pub fn subject_type(&self) -> &'static str {
        match self {
            Self::Evidence(_) => "evidence",
            Self::Credential(_) => "credential",
        }
    }

    /// The subject's id.
    pub fn subject_id(&self) -> Uuid {
        match self {
            Self::Evidence(id) => id.0,
            Self::Credential(id) => id.0,
        }
    }
}

/// A single recorded action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Acting principal; None for anonymous/public callers.
    pub actor_id: Option<UserId>,
    /// Action name, e.g. `credential_issued`.
    pub action: String,
    /// The record acted upon.
    pub subject: AuditSubject,
    /// Free-form metadata.
    pub meta: serde_json::Value,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Append-only recorder of actions.
pub trait AuditRecorder: Send + Sync {
    /// Record an action against a subject.
    fn record(
        &self,
        actor_id: Option<UserId>,
        action: &str,
        subject: AuditSubject,
        meta: serde_json::Value,
    );
}

/// In-memory append-only audit log.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Entries matching an action name.
    pub fn entries_for_action(&self, action: &str) -> Vec<AuditEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.action == action)
            .collect()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditRecorder for MemoryAuditLog {
    fn record(
        &self,
        actor_id: Option<UserId>,
        action: &str,
        subject: AuditSubject,
        meta: serde_json::Value,
    ) {
        let entry = AuditEntry {
            actor_id,
            action: action.to_string(),
            subject,
            meta,
            recorded_at: Utc::now(),
        };
        tracing::debug!(
            action = %entry.action,
            subject_type = entry.subject.subject_type(),
            subject_id = %entry.subject.subject_id(),
            "audit entry recorded"
        );
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}
