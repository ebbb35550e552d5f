use crate::{ClientError, ClientResult, Transport};
use kit_plugin_airdrop::Airdrop;
use kit_plugin_instruction_plan::{
    InstructionPlan, SharedSigner, SingleTransactionPlanResult, TransactionPlan,
    TransactionPlanResult, TransactionPlannerAndExecutor,
};
use kit_plugin_litesvm::LitesvmTransport;
use kit_plugin_rpc::SharedRpcTransport;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair};
use std::{fmt, sync::Arc};

/// A composed client: one transport plus whichever capabilities were installed
pub struct Client {
    transport: Transport,
    airdrop: Option<Airdrop>,
    payer: Option<Arc<Keypair>>,
    planner_and_executor: Option<TransactionPlannerAndExecutor>,
}

impl Client {
    pub(crate) fn new(
        transport: Transport,
        airdrop: Option<Airdrop>,
        payer: Option<Arc<Keypair>>,
        planner_and_executor: Option<TransactionPlannerAndExecutor>,
    ) -> Self {
        Self {
            transport,
            airdrop,
            payer,
            planner_and_executor,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// RPC transport of the client. LiteSVM clients get the RPC subset LiteSVM answers.
    pub fn rpc(&self) -> SharedRpcTransport {
        self.transport.as_rpc()
    }

    /// The LiteSVM instance, when the client was composed with one
    pub fn svm(&self) -> Option<&LitesvmTransport> {
        match &self.transport {
            Transport::Litesvm(svm) => Some(svm),
            Transport::Rpc(_) => None,
        }
    }

    pub fn airdrop_capability(&self) -> Option<&Airdrop> {
        self.airdrop.as_ref()
    }

    pub fn payer(&self) -> ClientResult<&Keypair> {
        self.payer
            .as_deref()
            .ok_or(ClientError::MissingCapability {
                capability: "payer",
                required_by: "payer()",
            })
    }

    pub fn planner_and_executor(&self) -> ClientResult<&TransactionPlannerAndExecutor> {
        self.planner_and_executor
            .as_ref()
            .ok_or(ClientError::MissingCapability {
                capability: "transaction planner and executor",
                required_by: "transaction sending",
            })
    }

    /// Fund `address` with `lamports` through the installed airdrop capability
    pub async fn airdrop(&self, address: &Pubkey, lamports: u64) -> ClientResult<()> {
        let airdrop = self.airdrop.as_ref().ok_or(ClientError::MissingCapability {
            capability: "airdrop",
            required_by: "airdrop()",
        })?;
        Ok(airdrop.airdrop(address, lamports).await?)
    }

    pub async fn get_balance(&self, address: &Pubkey) -> ClientResult<u64> {
        Ok(self.rpc().get_balance(address).await?)
    }

    pub async fn plan_transactions(&self, plan: &InstructionPlan) -> ClientResult<TransactionPlan> {
        Ok(self.planner_and_executor()?.plan_transactions(plan).await?)
    }

    pub async fn execute_transaction_plan(
        &self,
        plan: &TransactionPlan,
    ) -> ClientResult<TransactionPlanResult> {
        Ok(self
            .planner_and_executor()?
            .execute_transaction_plan(plan)
            .await)
    }

    pub async fn execute_transaction_plan_with_signers(
        &self,
        plan: &TransactionPlan,
        signers: &[SharedSigner],
    ) -> ClientResult<TransactionPlanResult> {
        Ok(self
            .planner_and_executor()?
            .execute_transaction_plan_with_signers(plan, signers)
            .await)
    }

    pub async fn send_transactions(
        &self,
        plan: &InstructionPlan,
    ) -> ClientResult<TransactionPlanResult> {
        Ok(self.planner_and_executor()?.send_transactions(plan).await?)
    }

    /// Plan and send `plan`, co-signing each transaction with the `signers` it requires
    pub async fn send_transactions_with_signers(
        &self,
        plan: &InstructionPlan,
        signers: &[SharedSigner],
    ) -> ClientResult<TransactionPlanResult> {
        Ok(self
            .planner_and_executor()?
            .send_transactions_with_signers(plan, signers)
            .await?)
    }

    /// Send `instructions` together in a single transaction
    pub async fn send_instructions(
        &self,
        instructions: Vec<Instruction>,
    ) -> ClientResult<SingleTransactionPlanResult> {
        Ok(self
            .planner_and_executor()?
            .send_instructions(instructions)
            .await?)
    }

    /// Send `instructions` together in a single transaction, co-signed by `signers`
    pub async fn send_instructions_with_signers(
        &self,
        instructions: Vec<Instruction>,
        signers: &[SharedSigner],
    ) -> ClientResult<SingleTransactionPlanResult> {
        Ok(self
            .planner_and_executor()?
            .send_instructions_with_signers(instructions, signers)
            .await?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport)
            .field("airdrop", &self.airdrop)
            .field("has_payer", &self.payer.is_some())
            .field("planner_and_executor", &self.planner_and_executor)
            .finish()
    }
}
