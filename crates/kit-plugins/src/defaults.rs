//! Preset clients, each a fixed sequence of builder steps:
//! transport, then airdrop, then payer, then planner/executor.

use crate::{
    payer_from_file, Client, ClientBuilder, ClientError, ClientResult, KitPluginsConfig,
    Transport, TransportConfig, DEFAULT_PAYER_LAMPORTS,
};
use kit_plugin_rpc::RpcConfig;
use solana_sdk::signature::Keypair;

/// Settings of [`create_default_rpc_client`]
#[derive(Debug)]
pub struct DefaultRpcClientConfig {
    pub url: String,
    /// Derived from `url` when absent
    pub websocket_url: Option<String>,
    pub payer: Keypair,
}

/// Client for an arbitrary cluster paying with an explicit payer. No airdrop is installed.
pub fn create_default_rpc_client(config: DefaultRpcClientConfig) -> ClientResult<Client> {
    let mut rpc_config = RpcConfig::new(config.url)?;
    if config.websocket_url.is_some() {
        rpc_config.websocket_url = config.websocket_url;
    }

    Ok(ClientBuilder::new(Transport::from_rpc_config(rpc_config))
        .with_payer(config.payer)
        .with_default_transaction_planner_and_executor()?
        .build())
}

/// Client for a local test validator.
///
/// Without an explicit payer, one is generated and airdropped
/// [`DEFAULT_PAYER_LAMPORTS`], so the validator must be running.
pub async fn create_default_localhost_rpc_client(payer: Option<Keypair>) -> ClientResult<Client> {
    Ok(ClientBuilder::new(Transport::localhost_rpc())
        .with_airdrop()
        .with_payer_or_generated_payer(payer, DEFAULT_PAYER_LAMPORTS)
        .await?
        .with_default_transaction_planner_and_executor()?
        .build())
}

/// Client backed by a fresh in-process LiteSVM.
///
/// Without an explicit payer, one is generated and airdropped [`DEFAULT_PAYER_LAMPORTS`].
pub async fn create_default_litesvm_client(payer: Option<Keypair>) -> ClientResult<Client> {
    Ok(ClientBuilder::new(Transport::litesvm())
        .with_airdrop()
        .with_payer_or_generated_payer(payer, DEFAULT_PAYER_LAMPORTS)
        .await?
        .with_default_transaction_planner_and_executor()?
        .build())
}

/// Client composed from configuration, in the same step order as the presets
pub async fn create_client_from_config(config: &KitPluginsConfig) -> ClientResult<Client> {
    let transport = match &config.transport {
        TransportConfig::Rpc(rpc_config) => Transport::from_rpc_config(rpc_config.clone()),
        TransportConfig::Litesvm(litesvm_config) => Transport::from_litesvm_config(litesvm_config),
    };

    let mut builder = ClientBuilder::new(transport)
        .with_instruction_plan_config(config.instruction_plan.clone());
    if config.airdrop {
        builder = builder.with_airdrop();
    }

    let payer = config
        .payer_keypair_path
        .as_ref()
        .map(payer_from_file)
        .transpose()?;
    if payer.is_none() && !config.airdrop {
        return Err(ClientError::Config(
            "a payer keypair is required when airdrop is disabled".to_string(),
        ));
    }

    Ok(builder
        .with_payer_or_generated_payer(payer, config.payer_lamports)
        .await?
        .with_default_transaction_planner_and_executor()?
        .build())
}
