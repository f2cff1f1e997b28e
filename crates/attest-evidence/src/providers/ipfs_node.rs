use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use attest_core::PinningConfig;

use crate::error::PinError;
use crate::pinner::{gateway_fetch, Pinner};

/// Self-hosted IPFS node backend, talking to the node's HTTP API.
pub struct IpfsNodePinner {
    http: reqwest::Client,
    api_url: String,
    gateway_url: String,
    pin_timeout: Duration,
    fetch_timeout: Duration,
}

#[derive(Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: Option<String>,
}

impl IpfsNodePinner {
    /// Build a client from the pinning configuration.
    pub fn new(config: &PinningConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.ipfs_api_url.trim_end_matches('/').to_string(),
            gateway_url: config.gateway_url.clone(),
            pin_timeout: Duration::from_secs(config.pin_timeout_secs),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        }
    }
}

#[async_trait]
impl Pinner for IpfsNodePinner {
    async fn pin(&self, bytes: &[u8], filename: &str) -> Result<String, PinError> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = format!("{}/api/v0/add", self.api_url);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .timeout(self.pin_timeout)
            .send()
            .await
            .map_err(PinError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PinError::RejectedByProvider(format!(
                "ipfs node returned {}: {}",
                status, body
            )));
        }

        let body: AddResponse = response.json().await.map_err(PinError::from_transport)?;
        let cid = body
            .hash
            .ok_or_else(|| PinError::RejectedByProvider("ipfs node: missing Hash".into()))?;

        tracing::info!(cid = %cid, "pinned file via ipfs node");
        Ok(cid)
    }

    async fn fetch(&self, cid: &str) -> Result<Vec<u8>, PinError> {
        gateway_fetch(&self.http, &self.gateway_url, cid, self.fetch_timeout).await
    }

    fn provider_id(&self) -> &str {
        "pin-ipfs-node"
    }
}
