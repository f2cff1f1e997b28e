use std::fmt;

use crate::error::CoreError;

/// The states of an evidence record's pin lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStatus {
    /// Bytes stored locally, sha256 recorded, not yet pinned.
    Uploaded,
    /// A pin job is in flight.
    Pinning,
    /// Pinned to the content-addressable store. Final state.
    Pinned,
    /// The pin attempt failed. Final state — the local bytes and the
    /// recorded sha256 are untouched.
    Failed,
}

impl EvidenceStatus {
    /// Whether this is a final (terminal) state. Pin is one-shot.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Pinned | Self::Failed)
    }
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded => write!(f, "uploaded"),
            Self::Pinning => write!(f, "pinning"),
            Self::Pinned => write!(f, "pinned"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Events that trigger evidence status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceEvent {
    /// A pin worker picked up the record.
    PinStarted,
    /// The provider returned a CID.
    PinSucceeded,
    /// The provider call failed.
    PinFailed,
}

/// Manages evidence status transitions.
///
/// Valid transitions:
/// - Uploaded → Pinning (PinStarted)
/// - Pinning → Pinning (PinStarted) — redelivered job, idempotent
/// - Pinning → Pinned (PinSucceeded)
/// - Pinning → Failed (PinFailed)
pub struct EvidenceStateMachine;

impl EvidenceStateMachine {
    /// Attempt a status transition based on an event.
    /// Returns the new status on success, or an error for invalid transitions.
    pub fn transition(
        current: EvidenceStatus,
        event: EvidenceEvent,
    ) -> Result<EvidenceStatus, CoreError> {
        let new_status = match (current, event) {
            (EvidenceStatus::Uploaded, EvidenceEvent::PinStarted) => EvidenceStatus::Pinning,
            // At-least-once delivery: a second PinStarted is a no-op.
            (EvidenceStatus::Pinning, EvidenceEvent::PinStarted) => EvidenceStatus::Pinning,
            (EvidenceStatus::Pinning, EvidenceEvent::PinSucceeded) => EvidenceStatus::Pinned,
            (EvidenceStatus::Pinning, EvidenceEvent::PinFailed) => EvidenceStatus::Failed,

            // All other transitions are invalid
            _ => {
                let target = match event {
                    EvidenceEvent::PinStarted => EvidenceStatus::Pinning,
                    EvidenceEvent::PinSucceeded => EvidenceStatus::Pinned,
                    EvidenceEvent::PinFailed => EvidenceStatus::Failed,
                };
                return Err(CoreError::InvalidEvidenceTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_status,
            event = ?event,
            "evidence status transition"
        );

        Ok(new_status)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: EvidenceStatus, event: EvidenceEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
