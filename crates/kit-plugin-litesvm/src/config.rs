use serde::{Deserialize, Serialize};
use solana_compute_budget::compute_budget_limits::MAX_COMPUTE_UNIT_LIMIT;

/// Configuration for the in-process LiteSVM instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LitesvmConfig {
    /// Fixed compute budget every transaction is metered against.
    ///
    /// When set, the SVM ignores the transaction's own `SetComputeUnitLimit`
    /// for metering; the instruction is still part of the executed message.
    pub compute_unit_limit: Option<u64>,

    /// Whether transaction signatures are verified
    pub sigverify: bool,

    /// Whether recent blockhashes are checked
    pub blockhash_check: bool,
}

impl Default for LitesvmConfig {
    fn default() -> Self {
        Self {
            compute_unit_limit: Some(u64::from(MAX_COMPUTE_UNIT_LIMIT)),
            sigverify: true,
            blockhash_check: true,
        }
    }
}
