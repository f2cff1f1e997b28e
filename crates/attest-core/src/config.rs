use serde::{Deserialize, Serialize};

/// Which pinning provider backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinProvider {
    /// Pinata pinning service.
    Pinata,
    /// A self-hosted IPFS node's HTTP API.
    IpfsNode,
}

/// Configuration for the content-addressable pinning layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinningConfig {
    /// Whether pinning is enabled at all.
    pub enabled: bool,
    /// Provider backend, selected once at construction.
    pub provider: PinProvider,
    /// Base URL of the Pinata API.
    pub pinata_api_url: String,
    /// Pinata JWT; preferred over the key/secret pair when set.
    pub pinata_jwt: Option<String>,
    /// Pinata API key (legacy auth).
    pub pinata_api_key: Option<String>,
    /// Pinata API secret (legacy auth).
    pub pinata_api_secret: Option<String>,
    /// Base URL of the self-hosted IPFS node API.
    pub ipfs_api_url: String,
    /// Gateway base URL used for content retrieval (`<gateway>/<cid>`).
    pub gateway_url: String,
    /// Timeout for pin requests, in seconds.
    pub pin_timeout_secs: u64,
    /// Timeout for gateway fetches, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: PinProvider::IpfsNode,
            pinata_api_url: "https://api.pinata.cloud".into(),
            pinata_jwt: None,
            pinata_api_key: None,
            pinata_api_secret: None,
            ipfs_api_url: "http://127.0.0.1:5001".into(),
            gateway_url: "http://127.0.0.1:8080/ipfs".into(),
            pin_timeout_secs: 30,
            fetch_timeout_secs: 10,
        }
    }
}

/// Configuration for the ledger anchor registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Whether anchoring is enabled at all.
    pub enabled: bool,
    /// JSON-RPC endpoint of the ledger node.
    pub rpc_url: String,
    /// Address of the deployed credential registry contract.
    pub registry_address: String,
    /// Admin-controlled sending address for write transactions.
    pub admin_address: String,
    /// Gas limit for write transactions.
    pub gas_limit: u64,
    /// Timeout for write calls (issue/revoke), in seconds.
    pub write_timeout_secs: u64,
    /// Timeout for read calls (verify), in seconds.
    pub read_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rpc_url: "http://127.0.0.1:8545".into(),
            registry_address: String::new(),
            admin_address: String::new(),
            gas_limit: 3_000_000,
            write_timeout_secs: 30,
            read_timeout_secs: 10,
        }
    }
}

impl LedgerConfig {
    /// Whether the registry is usable: enabled with an address configured.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.registry_address.is_empty() && !self.admin_address.is_empty()
    }
}
