use std::fmt;

use crate::error::CoreError;

/// The states of a credential lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    /// Created by an issuer but not yet approved.
    Pending,
    /// Approved and in force.
    Issued,
    /// Invalidated. Final state.
    Revoked,
}

impl CredentialStatus {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Issued => write!(f, "issued"),
            Self::Revoked => write!(f, "revoked"),
        }
    }
}

/// Events that trigger credential status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialEvent {
    /// Issuer approves the credential.
    Issue,
    /// Issuer invalidates the credential.
    Revoke,
}

/// Manages credential status transitions.
///
/// Valid transitions:
/// - Pending → Issued (Issue)
/// - Pending → Revoked (Revoke) — reject without issuing
/// - Issued → Revoked (Revoke)
pub struct CredentialStateMachine;

impl CredentialStateMachine {
    /// Attempt a status transition based on an event.
    /// Returns the new status on success, or an error for invalid transitions.
    pub fn transition(
        current: CredentialStatus,
        event: CredentialEvent,
    ) -> Result<CredentialStatus, CoreError> {
        let new_status = match (current, event) {
            (CredentialStatus::Pending, CredentialEvent::Issue) => CredentialStatus::Issued,
            (CredentialStatus::Pending, CredentialEvent::Revoke) => CredentialStatus::Revoked,
            (CredentialStatus::Issued, CredentialEvent::Revoke) => CredentialStatus::Revoked,

            // All other transitions are invalid
            _ => {
                let target = match event {
                    CredentialEvent::Issue => CredentialStatus::Issued,
                    CredentialEvent::Revoke => CredentialStatus::Revoked,
                };
                return Err(CoreError::InvalidCredentialTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_status,
            event = ?event,
            "credential status transition"
        );

        Ok(new_status)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: CredentialStatus, event: CredentialEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
