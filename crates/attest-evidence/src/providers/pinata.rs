use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use attest_core::PinningConfig;

use crate::error::PinError;
use crate::pinner::{gateway_fetch, Pinner};

/// Pinata pinning service backend.
///
/// Authenticates with a JWT bearer token when configured, otherwise falls
/// back to the legacy api-key/secret multipart fields.
pub struct PinataPinner {
    http: reqwest::Client,
    api_url: String,
    gateway_url: String,
    jwt: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    pin_timeout: Duration,
    fetch_timeout: Duration,
}

#[derive(Deserialize)]
struct PinataResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: Option<String>,
}

impl PinataPinner {
    /// Build a client from the pinning configuration.
    pub fn new(config: &PinningConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.pinata_api_url.trim_end_matches('/').to_string(),
            gateway_url: config.gateway_url.clone(),
            jwt: config.pinata_jwt.clone(),
            api_key: config.pinata_api_key.clone(),
            api_secret: config.pinata_api_secret.clone(),
            pin_timeout: Duration::from_secs(config.pin_timeout_secs),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        }
    }
}

#[async_trait]
impl Pinner for PinataPinner {
    async fn pin(&self, bytes: &[u8], filename: &str) -> Result<String, PinError> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(filename.to_string());
        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("pinataOptions", r#"{"cidVersion":1}"#);

        // Legacy auth rides in the multipart body.
        if self.jwt.is_none() {
            if let Some(key) = &self.api_key {
                form = form.text("pinata_api_key", key.clone());
            }
            if let Some(secret) = &self.api_secret {
                form = form.text("pinata_secret_api_key", secret.clone());
            }
        }

        let url = format!("{}/pinning/pinFileToIPFS", self.api_url);
        let mut request = self.http.post(&url).multipart(form).timeout(self.pin_timeout);
        if let Some(jwt) = &self.jwt {
            request = request.bearer_auth(jwt);
        }

        let response = request.send().await.map_err(PinError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PinError::RejectedByProvider(format!(
                "pinata returned {}: {}",
                status, body
            )));
        }

        let body: PinataResponse = response.json().await.map_err(PinError::from_transport)?;
        let cid = body
            .ipfs_hash
            .ok_or_else(|| PinError::RejectedByProvider("pinata: missing IpfsHash".into()))?;

        tracing::info!(cid = %cid, "pinned file via pinata");
        Ok(cid)
    }

    async fn fetch(&self, cid: &str) -> Result<Vec<u8>, PinError> {
        gateway_fetch(&self.http, &self.gateway_url, cid, self.fetch_timeout).await
    }

    fn provider_id(&self) -> &str {
        "pin-pinata"
    }
}
