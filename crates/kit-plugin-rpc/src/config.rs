use crate::{RpcTransportError, RpcTransportResult};
use backoff::ExponentialBackoff;
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use std::time::Duration;
use url::Url;

/// Default JSON-RPC endpoint of a local test validator
pub const LOCALHOST_RPC_URL: &str = "http://127.0.0.1:8899";

/// Commitment level requested from the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl From<Commitment> for CommitmentConfig {
    fn from(commitment: Commitment) -> Self {
        match commitment {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

/// Configuration for the JSON-RPC + subscriptions transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// HTTP(S) JSON-RPC endpoint
    pub url: String,

    /// Websocket endpoint used for signature subscriptions.
    /// When absent, confirmations fall back to status polling.
    pub websocket_url: Option<String>,

    /// Commitment used for reads, preflight and confirmations
    pub commitment: Commitment,

    /// Upper bound on waiting for a signature to reach the requested commitment
    pub confirmation_timeout_ms: u64,

    /// First delay between signature status polls
    pub poll_initial_interval_ms: u64,

    /// Largest delay between signature status polls
    pub poll_max_interval_ms: u64,

    /// Whether to skip preflight simulation when sending
    pub skip_preflight: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: LOCALHOST_RPC_URL.to_string(),
            websocket_url: Some("ws://127.0.0.1:8900/".to_string()),
            commitment: Commitment::Confirmed,
            confirmation_timeout_ms: 60_000,
            poll_initial_interval_ms: 250,
            poll_max_interval_ms: 2_000,
            skip_preflight: false,
        }
    }
}

impl RpcConfig {
    /// Configuration for `url`, with the websocket endpoint derived from it
    pub fn new(url: impl Into<String>) -> RpcTransportResult<Self> {
        let url = url.into();
        let websocket_url = Some(websocket_url_for(&url)?);
        Ok(Self {
            url,
            websocket_url,
            ..Default::default()
        })
    }

    pub fn commitment_config(&self) -> CommitmentConfig {
        self.commitment.into()
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    /// Backoff policy for signature status polling, bounded by the confirmation timeout
    pub fn poll_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: Duration::from_millis(self.poll_initial_interval_ms),
            max_interval: Duration::from_millis(self.poll_max_interval_ms),
            max_elapsed_time: Some(self.confirmation_timeout()),
            multiplier: 1.5,
            ..Default::default()
        }
    }
}

/// Derive the websocket endpoint that pairs with a JSON-RPC endpoint:
/// `http` becomes `ws`, `https` becomes `wss`, and an explicit port is bumped by one.
pub fn websocket_url_for(rpc_url: &str) -> RpcTransportResult<String> {
    let rpc_url: Url = rpc_url.parse()?;
    let is_secure = rpc_url.scheme().eq_ignore_ascii_case("https");

    let mut ws_url = rpc_url.clone();
    ws_url
        .set_scheme(if is_secure { "wss" } else { "ws" })
        .map_err(|_| {
            RpcTransportError::Backend(format!("cannot derive ws scheme for {rpc_url}"))
        })?;

    if let Some(port) = rpc_url.port() {
        let port = port.checked_add(1).ok_or_else(|| {
            RpcTransportError::Backend(format!("port out of range in {rpc_url}"))
        })?;
        ws_url
            .set_port(Some(port))
            .map_err(|_| RpcTransportError::Backend(format!("cannot set port on {rpc_url}")))?;
    }

    Ok(ws_url.to_string())
}
