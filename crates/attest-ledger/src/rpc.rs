use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use attest_core::{ContentHash, LedgerConfig};

use crate::client::AnchorClient;
use crate::error::LedgerError;
use crate::types::{AnchorReceipt, AnchorStatus, AnchorVerification};

/// JSON-RPC backend for the credential registry contract.
///
/// Writes (`issueCredential`, `revokeCredential`) are sent from the
/// admin-controlled address with the configured gas limit; reads
/// (`verifyCredential`, `verifyContentHash`) carry no write options.
pub struct JsonRpcAnchorClient {
    http: reqwest::Client,
    rpc_url: String,
    registry_address: String,
    admin_address: String,
    gas_limit: u64,
    write_timeout: Duration,
    read_timeout: Duration,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl JsonRpcAnchorClient {
    /// Build a client from the ledger configuration.
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url: config.rpc_url.clone(),
            registry_address: config.registry_address.clone(),
            admin_address: config.admin_address.clone(),
            gas_limit: config.gas_limit,
            write_timeout: Duration::from_secs(config.write_timeout_secs),
            read_timeout: Duration::from_secs(config.read_timeout_secs),
        }
    }

    /// Transaction options attached to every write call.
    fn write_options(&self) -> Value {
        json!({
            "from": self.admin_address,
            "to": self.registry_address,
            "gas": self.gas_limit,
        })
    }

    async fn call(
        &self,
        method: &str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value, LedgerError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .timeout(timeout)
            .send()
            .await
            .map_err(LedgerError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::Rejected(format!(
                "registry endpoint returned {}",
                status
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::MalformedResponse(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(LedgerError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        body.result
            .ok_or_else(|| LedgerError::MalformedResponse("missing result".into()))
    }

    fn parse_verification(result: Value) -> AnchorVerification {
        let is_valid = result
            .get("isValid")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let status = result
            .get("status")
            .and_then(Value::as_str)
            .map(AnchorStatus::from_provider)
            .unwrap_or(AnchorStatus::Unknown);
        AnchorVerification {
            is_valid,
            status,
            raw: result,
        }
    }

    fn parse_tx_hash(result: &Value) -> Result<String, LedgerError> {
        result
            .as_str()
            .map(str::to_owned)
            .or_else(|| {
                result
                    .get("transactionHash")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .ok_or_else(|| LedgerError::MalformedResponse("missing transaction hash".into()))
    }
}

#[async_trait]
impl AnchorClient for JsonRpcAnchorClient {
    async fn issue(
        &self,
        student_address: &str,
        content_hash: &ContentHash,
        cid: Option<&str>,
        credential_type: &str,
        expires_at: i64,
    ) -> Result<AnchorReceipt, LedgerError> {
        let params = json!([
            student_address,
            content_hash.prefixed_hex(),
            cid.unwrap_or(""),
            credential_type,
            expires_at,
            self.write_options(),
        ]);
        let result = self
            .call("issueCredential", params, self.write_timeout)
            .await?;
        let tx_hash = Self::parse_tx_hash(&result)?;

        tracing::info!(
            student_address,
            content_hash = %content_hash,
            tx_hash = %tx_hash,
            "credential anchored on ledger"
        );
        Ok(AnchorReceipt {
            tx_hash,
            submitted_at: Utc::now(),
        })
    }

    async fn revoke(&self, anchor_ref: &str, reason: &str) -> Result<AnchorReceipt, LedgerError> {
        let params = json!([anchor_ref, reason, self.write_options()]);
        let result = self
            .call("revokeCredential", params, self.write_timeout)
            .await?;
        let tx_hash = Self::parse_tx_hash(&result)?;

        tracing::info!(anchor_ref, tx_hash = %tx_hash, "credential revoked on ledger");
        Ok(AnchorReceipt {
            tx_hash,
            submitted_at: Utc::now(),
        })
    }

    async fn verify(&self, anchor_ref: &str) -> Result<AnchorVerification, LedgerError> {
        let result = self
            .call("verifyCredential", json!([anchor_ref]), self.read_timeout)
            .await?;
        Ok(Self::parse_verification(result))
    }

    async fn verify_content_hash(
        &self,
        content_hash: &ContentHash,
    ) -> Result<AnchorVerification, LedgerError> {
        let result = self
            .call(
                "verifyContentHash",
                json!([content_hash.prefixed_hex()]),
                self.read_timeout,
            )
            .await?;
        Ok(Self::parse_verification(result))
    }

    fn backend_id(&self) -> &str {
        "ledger-jsonrpc"
    }
}
