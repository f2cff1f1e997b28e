use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Proof that a write transaction was accepted by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorReceipt {
    /// Transaction hash on the underlying ledger.
    pub tx_hash: String,
    /// When the transaction was submitted.
    pub submitted_at: DateTime<Utc>,
}

/// Status of an anchor as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorStatus {
    /// Anchor exists and has not been revoked.
    Active,
    /// Anchor has been revoked on-chain.
    Revoked,
    /// The registry reported something the client does not recognise.
    Unknown,
}

impl AnchorStatus {
    /// Lenient parse of provider status strings.
    pub fn from_provider(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "active" | "valid" | "issued" => Self::Active,
            "revoked" => Self::Revoked,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for AnchorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Revoked => write!(f, "revoked"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of a registry read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorVerification {
    /// Whether the registry considers the anchor valid.
    pub is_valid: bool,
    /// Anchor status as reported.
    pub status: AnchorStatus,
    /// The raw registry response, kept for transparency.
    pub raw: serde_json::Value,
}
