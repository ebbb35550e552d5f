use crate::{ClientResult, DEFAULT_PAYER_LAMPORTS};
use kit_plugin_instruction_plan::InstructionPlanConfig;
use kit_plugin_litesvm::LitesvmConfig;
use kit_plugin_rpc::RpcConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Which backend a configured client talks to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransportConfig {
    Rpc(RpcConfig),
    Litesvm(LitesvmConfig),
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::Litesvm(LitesvmConfig::default())
    }
}

/// Configuration for a client composed from YAML.
///
/// ```yaml
/// transport:
///   kind: rpc
///   url: https://api.devnet.solana.com
///   commitment: confirmed
/// airdrop: false
/// payer_keypair_path: /home/deployer/.config/solana/id.json
/// instruction_plan:
///   compute_unit_price: 1000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitPluginsConfig {
    pub transport: TransportConfig,

    /// Whether to install the airdrop capability
    pub airdrop: bool,

    /// Keypair file of the payer. A payer is generated and funded when absent.
    pub payer_keypair_path: Option<PathBuf>,

    /// Lamports airdropped to a generated payer
    pub payer_lamports: u64,

    pub instruction_plan: InstructionPlanConfig,
}

impl Default for KitPluginsConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            airdrop: true,
            payer_keypair_path: None,
            payer_lamports: DEFAULT_PAYER_LAMPORTS,
            instruction_plan: InstructionPlanConfig::default(),
        }
    }
}

impl KitPluginsConfig {
    pub fn from_yaml_str(yaml: &str) -> ClientResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn to_yaml_string(&self) -> ClientResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
