use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use attest_core::{PinProvider, PinningConfig};

use crate::error::PinError;
use crate::providers::{IpfsNodePinner, PinataPinner};

/// Content-addressable pinning client.
///
/// One implementing variant per provider backend; selection happens once at
/// construction via [`pinner_from_config`].
#[async_trait]
pub trait Pinner: Send + Sync {
    /// Pin the given bytes; returns the content identifier.
    async fn pin(&self, bytes: &[u8], filename: &str) -> Result<String, PinError>;

    /// Retrieve pinned bytes by content identifier.
    async fn fetch(&self, cid: &str) -> Result<Vec<u8>, PinError>;

    /// Return the unique identifier of this provider (e.g. "pin-pinata").
    fn provider_id(&self) -> &str;
}

/// Construct the configured provider backend.
pub fn pinner_from_config(config: &PinningConfig) -> Arc<dyn Pinner> {
    match config.provider {
        PinProvider::Pinata => Arc::new(PinataPinner::new(config)),
        PinProvider::IpfsNode => Arc::new(IpfsNodePinner::new(config)),
    }
}

/// GET `<gateway>/<cid>` with a bounded timeout. Shared by the HTTP-backed
/// providers.
pub(crate) async fn gateway_fetch(
    http: &reqwest::Client,
    gateway_url: &str,
    cid: &str,
    timeout: Duration,
) -> Result<Vec<u8>, PinError> {
    let url = format!("{}/{}", gateway_url.trim_end_matches('/'), cid);
    let response = http
        .get(&url)
        .timeout(timeout)
        .send()
        .await
        .map_err(PinError::from_transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(PinError::RejectedByProvider(format!(
            "gateway returned {} for {}",
            status, cid
        )));
    }

    let bytes = response.bytes().await.map_err(PinError::from_transport)?;
    Ok(bytes.to_vec())
}
