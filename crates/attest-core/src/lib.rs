//! Attest Core — shared types, credential/evidence status machines,
//! configuration, and the audit recorder interface.

pub mod audit;
pub mod config;
pub mod credential_status;
pub mod error;
pub mod evidence_status;
pub mod types;

pub use audit::{AuditEntry, AuditRecorder, AuditSubject, MemoryAuditLog};
pub use config::{LedgerConfig, PinProvider, PinningConfig};
pub use credential_status::{CredentialEvent, CredentialStateMachine, CredentialStatus};
pub use error::CoreError;
pub use evidence_status::{EvidenceEvent, EvidenceStateMachine, EvidenceStatus};
pub use types::{Actor, ContentHash, CredentialId, EvidenceId, Role, UserId, Visibility};
