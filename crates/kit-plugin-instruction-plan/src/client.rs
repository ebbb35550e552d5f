use crate::{
    InstructionPlan, InstructionPlanConfig, InstructionPlanError, InstructionPlanResult,
    LitesvmTransactionExecutor, RpcTransactionExecutor, SharedSigner, SingleTransactionPlanResult,
    TransactionExecutor, TransactionPlan, TransactionPlanResult, TransactionPlanner,
};
use futures::future::{join_all, BoxFuture, FutureExt};
use kit_plugin_litesvm::LitesvmTransport;
use kit_plugin_rpc::SharedRpcTransport;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer};
use std::{fmt, sync::Arc};
use tracing::{info, warn};

/// Plans instruction plans into transactions and runs them on one backend
pub struct TransactionPlannerAndExecutor {
    planner: TransactionPlanner,
    executor: Arc<dyn TransactionExecutor>,
}

impl TransactionPlannerAndExecutor {
    pub fn new(planner: TransactionPlanner, executor: Arc<dyn TransactionExecutor>) -> Self {
        Self { planner, executor }
    }

    pub fn payer(&self) -> Pubkey {
        self.planner.payer()
    }

    pub fn config(&self) -> &InstructionPlanConfig {
        self.planner.config()
    }

    /// Pack `plan` into transactions against the backend's latest blockhash
    pub async fn plan_transactions(
        &self,
        plan: &InstructionPlan,
    ) -> InstructionPlanResult<TransactionPlan> {
        let recent_blockhash = self.executor.latest_blockhash().await?;
        self.planner.plan(plan, recent_blockhash)
    }

    /// Run every transaction of `plan`, signed by the fee payer alone
    pub async fn execute_transaction_plan(&self, plan: &TransactionPlan) -> TransactionPlanResult {
        self.execute_transaction_plan_with_signers(plan, &[]).await
    }

    /// Run every transaction of `plan`.
    ///
    /// Each transaction is signed by the fee payer plus whichever of `signers`
    /// it requires. Sequential steps stop at the first step that does not fully
    /// succeed; the remaining steps are reported as `Absent`. Parallel children
    /// are sent concurrently, at most `max_parallel_sends` at a time.
    pub async fn execute_transaction_plan_with_signers(
        &self,
        plan: &TransactionPlan,
        signers: &[SharedSigner],
    ) -> TransactionPlanResult {
        let result = self.execute_node(plan, signers).await;

        let results = result.results();
        let succeeded = results
            .iter()
            .filter(|single| single.result.success().is_some())
            .count();
        if succeeded == results.len() {
            info!("Successfully sent all {} transactions", succeeded);
        } else {
            warn!("{} of {} transactions succeeded", succeeded, results.len());
        }
        result
    }

    fn execute_node<'a>(
        &'a self,
        plan: &'a TransactionPlan,
        signers: &'a [SharedSigner],
    ) -> BoxFuture<'a, TransactionPlanResult> {
        async move {
            match plan {
                TransactionPlan::Single(transaction) => TransactionPlanResult::Single(
                    self.executor
                        .execute(transaction.message.clone(), signers)
                        .await,
                ),
                TransactionPlan::Sequential(steps) => {
                    let mut results = Vec::with_capacity(steps.len());
                    let mut canceled = false;
                    for step in steps {
                        if canceled {
                            results.push(TransactionPlanResult::canceled(step));
                            continue;
                        }
                        let result = self.execute_node(step, signers).await;
                        canceled = !result.is_successful();
                        results.push(result);
                    }
                    TransactionPlanResult::Sequential(results)
                }
                TransactionPlan::Parallel(children) => {
                    let max_parallel_sends = self.config().max_parallel_sends.max(1);
                    let mut results = Vec::with_capacity(children.len());
                    for batch in children.chunks(max_parallel_sends) {
                        let batch_results =
                            join_all(batch.iter().map(|child| self.execute_node(child, signers)))
                                .await;
                        results.extend(batch_results);
                    }
                    TransactionPlanResult::Parallel(results)
                }
            }
        }
        .boxed()
    }

    /// Plan and execute `plan`
    pub async fn send_transactions(
        &self,
        plan: &InstructionPlan,
    ) -> InstructionPlanResult<TransactionPlanResult> {
        self.send_transactions_with_signers(plan, &[]).await
    }

    /// Plan and execute `plan`, adding `signers` where a transaction requires them
    pub async fn send_transactions_with_signers(
        &self,
        plan: &InstructionPlan,
        signers: &[SharedSigner],
    ) -> InstructionPlanResult<TransactionPlanResult> {
        let transaction_plan = self.plan_transactions(plan).await?;
        Ok(self
            .execute_transaction_plan_with_signers(&transaction_plan, signers)
            .await)
    }

    /// Send `instructions` together in a single transaction
    pub async fn send_instructions(
        &self,
        instructions: Vec<Instruction>,
    ) -> InstructionPlanResult<SingleTransactionPlanResult> {
        self.send_instructions_with_signers(instructions, &[]).await
    }

    /// Send `instructions` together in a single transaction, co-signed by `signers`
    pub async fn send_instructions_with_signers(
        &self,
        instructions: Vec<Instruction>,
        signers: &[SharedSigner],
    ) -> InstructionPlanResult<SingleTransactionPlanResult> {
        let plan = InstructionPlan::from_instructions(instructions);
        match self.plan_transactions(&plan).await? {
            TransactionPlan::Single(transaction) => {
                Ok(self.executor.execute(transaction.message, signers).await)
            }
            other => Err(InstructionPlanError::Config(format!(
                "expected a single transaction, planned {}",
                other.transaction_count()
            ))),
        }
    }
}

impl fmt::Debug for TransactionPlannerAndExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionPlannerAndExecutor")
            .field("planner", &self.planner)
            .finish_non_exhaustive()
    }
}

/// Planner and executor sending through a cluster RPC transport
pub fn default_transaction_planner_and_executor_from_rpc(
    rpc: SharedRpcTransport,
    payer: Arc<Keypair>,
    config: InstructionPlanConfig,
) -> InstructionPlanResult<TransactionPlannerAndExecutor> {
    config.validate()?;
    let commitment = config.confirmation_commitment.into();
    let executor = RpcTransactionExecutor::new(rpc, payer.clone(), commitment);
    Ok(TransactionPlannerAndExecutor::new(
        TransactionPlanner::with_config(payer.pubkey(), config),
        Arc::new(executor),
    ))
}

/// Planner and executor sending straight to LiteSVM
pub fn default_transaction_planner_and_executor_from_litesvm(
    svm: LitesvmTransport,
    payer: Arc<Keypair>,
    config: InstructionPlanConfig,
) -> InstructionPlanResult<TransactionPlannerAndExecutor> {
    config.validate()?;
    let executor = LitesvmTransactionExecutor::new(svm, payer.clone());
    Ok(TransactionPlannerAndExecutor::new(
        TransactionPlanner::with_config(payer.pubkey(), config),
        Arc::new(executor),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_budget::compute_unit_limit;
    use kit_plugin_litesvm::{assert_is_successful_transaction, TransactionResult};
    use solana_sdk::system_instruction;
    use std::str::FromStr;

    fn memo(text: &str) -> Instruction {
        let program_id = Pubkey::from_str("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr").unwrap();
        Instruction::new_with_bytes(program_id, text.as_bytes(), vec![])
    }

    fn litesvm_client(
        config: InstructionPlanConfig,
    ) -> (LitesvmTransport, TransactionPlannerAndExecutor) {
        let svm = LitesvmTransport::new();
        let payer = Arc::new(Keypair::new());
        svm.airdrop(&payer.pubkey(), 10_000_000_000);
        let client =
            default_transaction_planner_and_executor_from_litesvm(svm.clone(), payer, config)
                .unwrap();
        (svm, client)
    }

    #[tokio::test]
    async fn test_send_instructions_returns_single_result() {
        let (_svm, client) = litesvm_client(InstructionPlanConfig::default());

        let result = client
            .send_instructions(vec![memo("one"), memo("two")])
            .await
            .unwrap();

        assert!(assert_is_successful_transaction(&result.result).is_ok());
        assert_eq!(result.message.instructions.len(), 3);
        assert_eq!(compute_unit_limit(&result.message), Some(0));
    }

    #[tokio::test]
    async fn test_empty_instructions() {
        let (_svm, client) = litesvm_client(InstructionPlanConfig::default());

        let result = client.send_instructions(vec![]).await;
        assert!(matches!(result, Err(InstructionPlanError::NoInstructions)));
    }

    #[tokio::test]
    async fn test_sequential_failure_cancels_remaining_steps() {
        let (svm, client) = litesvm_client(InstructionPlanConfig {
            max_instructions_per_tx: 1,
            ..Default::default()
        });
        let payer = client.payer();
        let recipient = Pubkey::new_unique();

        let plan = InstructionPlan::sequential(vec![
            InstructionPlan::single(memo("first")),
            InstructionPlan::single(system_instruction::transfer(&payer, &recipient, u64::MAX)),
            InstructionPlan::single(system_instruction::transfer(&payer, &recipient, 2_000_000)),
        ]);

        let result = client.send_transactions(&plan).await.unwrap();

        let results = result.results();
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0].result, TransactionResult::Success(_)));
        assert!(matches!(results[1].result, TransactionResult::Failure(_)));
        assert!(results[2].result.is_absent());
        assert_eq!(svm.get_balance(&recipient), None);
        assert!(!result.is_successful());
    }

    #[tokio::test]
    async fn test_parallel_plan_runs_every_child() {
        let (_svm, client) = litesvm_client(InstructionPlanConfig {
            max_parallel_sends: 2,
            ..Default::default()
        });
        let plan = InstructionPlan::parallel(
            (0..5)
                .map(|i| InstructionPlan::single(memo(&format!("parallel {i}"))))
                .collect(),
        );

        let result = client.send_transactions(&plan).await.unwrap();

        let TransactionPlanResult::Parallel(children) = &result else {
            panic!("expected a parallel result, got {result:?}");
        };
        assert_eq!(children.len(), 5);
        assert!(result.is_successful());
    }

    #[tokio::test]
    async fn test_parallel_children_use_their_own_signers() {
        let (svm, client) = litesvm_client(InstructionPlanConfig::default());
        let payer = client.payer();
        let owner = Pubkey::new_unique();
        let lamports = svm.with_svm(|svm| svm.minimum_balance_for_rent_exemption(0));
        let accounts: Vec<Arc<Keypair>> = (0..3).map(|_| Arc::new(Keypair::new())).collect();

        let plan = InstructionPlan::parallel(
            accounts
                .iter()
                .map(|account| {
                    InstructionPlan::single(system_instruction::create_account(
                        &payer,
                        &account.pubkey(),
                        lamports,
                        0,
                        &owner,
                    ))
                })
                .collect(),
        );
        let signers: Vec<SharedSigner> = accounts
            .iter()
            .map(|account| account.clone() as SharedSigner)
            .collect();

        let result = client
            .send_transactions_with_signers(&plan, &signers)
            .await
            .unwrap();

        assert!(result.is_successful());
        for account in &accounts {
            assert_eq!(svm.get_balance(&account.pubkey()), Some(lamports));
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = default_transaction_planner_and_executor_from_litesvm(
            LitesvmTransport::new(),
            Arc::new(Keypair::new()),
            InstructionPlanConfig {
                max_parallel_sends: 0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(InstructionPlanError::Config(_))));
    }
}
