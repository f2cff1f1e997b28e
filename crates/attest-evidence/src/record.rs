use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use attest_core::{ContentHash, EvidenceId, EvidenceStatus, UserId, Visibility};

/// Free-form evidence metadata supplied by the uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// An uploaded evidence file and its content identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    /// Record id.
    pub id: EvidenceId,
    /// The uploading user.
    pub owner_id: UserId,
    /// Original filename as uploaded.
    pub filename: String,
    /// Storage disk label.
    pub disk: String,
    /// Path on the storage disk.
    pub path: String,
    /// MIME type, when known.
    pub mime: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// sha256 of the bytes, computed once at upload time. Immutable.
    pub sha256: ContentHash,
    /// Content identifier; `Some` iff `status == Pinned`.
    pub cid: Option<String>,
    /// Uploader-supplied metadata.
    pub metadata: EvidenceMetadata,
    /// Read-access level.
    pub visibility: Visibility,
    /// Pin lifecycle status.
    pub status: EvidenceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evidence {
    /// Whether the record has been pinned successfully.
    pub fn is_pinned(&self) -> bool {
        self.status == EvidenceStatus::Pinned
    }

    /// Absolute-ish local path of the stored bytes.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

/// Fields required to create an evidence record.
///
/// The sha256 must already be computed — a record is never visible to any
/// other component without it.
#[derive(Debug, Clone)]
pub struct NewEvidence {
    pub owner_id: UserId,
    pub filename: String,
    pub disk: String,
    pub path: String,
    pub mime: Option<String>,
    pub size: u64,
    pub sha256: ContentHash,
    pub metadata: EvidenceMetadata,
    pub visibility: Visibility,
}
