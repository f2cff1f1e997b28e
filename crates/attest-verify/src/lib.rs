//! Attest Verify — the public verification orchestrator.
//!
//! Composes three independent signals into a verdict: the credential's
//! local lifecycle state, content integrity of the pinned evidence, and
//! the ledger anchor. The checks are independent by design: a dead
//! gateway or an unreachable ledger node degrades the verdict to
//! "unknown" on that axis, never to a false negative.

pub mod error;
pub mod orchestrator;
pub mod verdict;

pub use error::VerifyError;
pub use orchestrator::{RequestContext, VerificationOrchestrator};
pub use verdict::{
    CredentialSummary, FullVerdict, IntegrityCheck, LedgerCheck, RevocationDetails, Verdict,
};
