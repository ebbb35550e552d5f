use kit_plugin_rpc::RpcTransportError;
use solana_sdk::signer::SignerError;
use thiserror::Error;

pub type InstructionPlanResult<T> = Result<T, InstructionPlanError>;

/// Errors that can occur while planning transactions
#[derive(Error, Debug)]
pub enum InstructionPlanError {
    #[error("No instructions provided")]
    NoInstructions,

    #[error("Transaction too large: {size} bytes / {instructions} instructions (max: {max_size} bytes / {max_instructions} instructions)")]
    TransactionTooLarge {
        size: usize,
        instructions: usize,
        max_size: usize,
        max_instructions: usize,
    },

    #[error("Failed to fetch a recent blockhash: {0}")]
    Blockhash(#[from] RpcTransportError),

    #[error("Failed to sign transaction: {0}")]
    Signing(#[from] SignerError),

    #[error("Configuration error: {0}")]
    Config(String),
}
