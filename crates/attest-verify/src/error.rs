use attest_core::CredentialId;

/// Verification-layer errors.
///
/// Degraded collaborators are not errors here; they surface inside the
/// verdict as `Unknown` or `Unavailable` axes instead.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("credential not found: {0}")]
    NotFound(CredentialId),
}
