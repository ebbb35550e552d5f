/*!
# Kit Plugin: Instruction Plan

Packs instruction plans into transactions and sends them through one of two
backend strategies.

## Planning

[`TransactionPlanner`] turns an [`InstructionPlan`] into a [`TransactionPlan`]
of the same shape. Every planned message starts with a provisory
`SetComputeUnitLimit(0)` instruction.

## Execution

- [`RpcTransactionExecutor`] simulates each message, rewrites the provisory
  limit with the consumed units, then sends and confirms it.
- [`LitesvmTransactionExecutor`] sends each message to LiteSVM as planned. The
  provisory limit is never replaced; LiteSVM meters against its configured
  compute budget instead.

Submission failures come back as `Failure` results inside a
[`TransactionPlanResult`]; nothing is retried.

```rust
use kit_plugin_instruction_plan::{
    default_transaction_planner_and_executor_from_litesvm, InstructionPlan, InstructionPlanConfig,
};
use kit_plugin_litesvm::{assert_is_successful_transaction, LitesvmTransport};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction};
use std::sync::Arc;

# async fn example() -> Result<(), Box<dyn std::error::Error>> {
let svm = LitesvmTransport::new();
let payer = Arc::new(Keypair::new());
svm.airdrop(&payer.pubkey(), 1_000_000_000);

let client = default_transaction_planner_and_executor_from_litesvm(
    svm.clone(),
    payer.clone(),
    InstructionPlanConfig::default(),
)?;

let transfer = system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1_000_000);
let result = client.send_transactions(&InstructionPlan::single(transfer)).await?;
for single in result.results() {
    assert_is_successful_transaction(&single.result)?;
}
# Ok(())
# }
```
*/

mod client;
pub mod compute_budget;
mod config;
mod error;
mod executor;
mod plan;
mod result;

pub use client::{
    default_transaction_planner_and_executor_from_litesvm,
    default_transaction_planner_and_executor_from_rpc, TransactionPlannerAndExecutor,
};
pub use compute_budget::{MAX_COMPUTE_UNIT_LIMIT, PROVISORY_COMPUTE_UNIT_LIMIT};
pub use config::{InstructionPlanConfig, MAX_TRANSACTION_SIZE_BYTES};
pub use error::{InstructionPlanError, InstructionPlanResult};
pub use executor::{
    LitesvmTransactionExecutor, RpcTransactionExecutor, SharedSigner, TransactionExecutor,
};
pub use plan::{
    transaction_size, InstructionPlan, PlannedTransaction, TransactionPlan, TransactionPlanner,
};
pub use result::{
    ExecutedTransaction, FailedTransaction, PlanTransactionResult, SingleTransactionPlanResult,
    SubmissionError, TransactionPlanResult,
};
