//! Attest Credentials — the credential lifecycle manager.
//!
//! A credential binds an issuer's claim about a student to a pinned evidence
//! record. Lifecycle is pending → issued → revoked, enforced by the state
//! machine in `attest-core`. Issuance anchors a content hash on the ledger
//! best-effort: local state commits first, anchoring failures degrade to a
//! warning and a missing `anchor_hash`.

pub mod error;
pub mod manager;
pub mod record;

pub use error::CredentialError;
pub use manager::CredentialManager;
pub use record::{AnchorPayload, Credential, NewCredential};
