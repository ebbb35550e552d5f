use crate::{InstructionPlanError, InstructionPlanResult};
use kit_plugin_rpc::Commitment;
use serde::{Deserialize, Serialize};

/// Size limit of a serialized transaction on the wire
pub const MAX_TRANSACTION_SIZE_BYTES: usize = 1232;

/// Configuration for planning and executing transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionPlanConfig {
    /// Maximum number of plan instructions to pack into a single transaction.
    /// Compute budget instructions added by the planner do not count.
    pub max_instructions_per_tx: usize,

    /// Maximum serialized transaction size in bytes, signatures included
    pub max_transaction_size_bytes: usize,

    /// Commitment level for transaction confirmation
    pub confirmation_commitment: Commitment,

    /// Priority fee in micro-lamports per compute unit, if any
    pub compute_unit_price: Option<u64>,

    /// Maximum number of transactions to send in parallel
    pub max_parallel_sends: usize,
}

impl Default for InstructionPlanConfig {
    fn default() -> Self {
        Self {
            max_instructions_per_tx: 10,
            max_transaction_size_bytes: MAX_TRANSACTION_SIZE_BYTES,
            confirmation_commitment: Commitment::Confirmed,
            compute_unit_price: None,
            max_parallel_sends: 4,
        }
    }
}

impl InstructionPlanConfig {
    pub fn validate(&self) -> InstructionPlanResult<()> {
        if self.max_instructions_per_tx == 0 {
            return Err(InstructionPlanError::Config(
                "max_instructions_per_tx must be at least 1".to_string(),
            ));
        }
        if self.max_parallel_sends == 0 {
            return Err(InstructionPlanError::Config(
                "max_parallel_sends must be at least 1".to_string(),
            ));
        }
        if self.max_transaction_size_bytes > MAX_TRANSACTION_SIZE_BYTES {
            return Err(InstructionPlanError::Config(format!(
                "max_transaction_size_bytes cannot exceed {MAX_TRANSACTION_SIZE_BYTES}"
            )));
        }
        Ok(())
    }
}
