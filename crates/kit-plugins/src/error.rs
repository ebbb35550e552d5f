use kit_plugin_airdrop::FundingError;
use kit_plugin_instruction_plan::InstructionPlanError;
use kit_plugin_rpc::RpcTransportError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Missing {capability} capability, required by {required_by}")]
    MissingCapability {
        capability: &'static str,
        required_by: &'static str,
    },

    #[error("Funding failed: {0}")]
    Funding(#[from] FundingError),

    #[error("Transaction planning failed: {0}")]
    Plan(#[from] InstructionPlanError),

    #[error("RPC transport error: {0}")]
    Rpc(#[from] RpcTransportError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
