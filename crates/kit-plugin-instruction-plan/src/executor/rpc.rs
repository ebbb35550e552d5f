use super::{sign_message, SharedSigner, TransactionExecutor};
use crate::{
    compute_budget::{set_compute_unit_limit, MAX_COMPUTE_UNIT_LIMIT},
    ExecutedTransaction, FailedTransaction, InstructionPlanResult, SingleTransactionPlanResult,
    SubmissionError,
};
use async_trait::async_trait;
use kit_plugin_rpc::SharedRpcTransport;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    message::Message,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sends through a cluster RPC transport.
///
/// Each message is simulated with the maximum compute unit limit first; the
/// consumed units then replace the planner's placeholder before the message is
/// signed against a fresh blockhash, sent and confirmed.
pub struct RpcTransactionExecutor {
    rpc: SharedRpcTransport,
    payer: Arc<Keypair>,
    commitment: CommitmentConfig,
}

impl RpcTransactionExecutor {
    pub fn new(rpc: SharedRpcTransport, payer: Arc<Keypair>, commitment: CommitmentConfig) -> Self {
        Self {
            rpc,
            payer,
            commitment,
        }
    }

    async fn sign(
        &self,
        message: &mut Message,
        signers: &[SharedSigner],
    ) -> Result<Transaction, FailedTransaction> {
        let recent_blockhash = self.rpc.get_latest_blockhash().await?;
        message.recent_blockhash = recent_blockhash;
        Ok(sign_message(
            message.clone(),
            &self.payer,
            signers,
            recent_blockhash,
        )?)
    }

    async fn estimate_compute_units(
        &self,
        message: &Message,
        signers: &[SharedSigner],
    ) -> Result<u32, FailedTransaction> {
        let mut estimation_message = message.clone();
        set_compute_unit_limit(&mut estimation_message, MAX_COMPUTE_UNIT_LIMIT);
        let transaction = self.sign(&mut estimation_message, signers).await?;

        let simulation = self.rpc.simulate_transaction(&transaction).await?;
        if let Some(err) = simulation.err {
            return Err(FailedTransaction {
                signature: None,
                error: SubmissionError::Simulation(err),
                logs: simulation.logs,
            });
        }

        let units = simulation
            .units_consumed
            .ok_or(SubmissionError::EstimationUnavailable)?;
        Ok(units.min(u64::from(MAX_COMPUTE_UNIT_LIMIT)) as u32)
    }

    async fn try_execute(
        &self,
        message: &mut Message,
        signers: &[SharedSigner],
    ) -> Result<ExecutedTransaction, FailedTransaction> {
        let units = self.estimate_compute_units(message, signers).await?;
        if set_compute_unit_limit(message, units) {
            debug!("Estimated {} compute units", units);
        }

        let transaction = self.sign(message, signers).await?;
        let signature = transaction.signatures[0];
        let with_signature = |error: SubmissionError| FailedTransaction {
            signature: Some(signature),
            error,
            logs: Vec::new(),
        };

        let sent: Signature = self
            .rpc
            .send_transaction(&transaction)
            .await
            .map_err(|e| with_signature(e.into()))?;
        self.rpc
            .confirm_signature(&sent, self.commitment)
            .await
            .map_err(|e| with_signature(e.into()))?;

        Ok(ExecutedTransaction {
            signature: sent,
            compute_units_consumed: Some(u64::from(units)),
            logs: Vec::new(),
        })
    }
}

#[async_trait]
impl TransactionExecutor for RpcTransactionExecutor {
    async fn latest_blockhash(&self) -> InstructionPlanResult<Hash> {
        Ok(self.rpc.get_latest_blockhash().await?)
    }

    async fn execute(
        &self,
        mut message: Message,
        signers: &[SharedSigner],
    ) -> SingleTransactionPlanResult {
        let result = self.try_execute(&mut message, signers).await;
        match &result {
            Ok(executed) => info!("Transaction {} confirmed", executed.signature),
            Err(failed) => warn!("Transaction failed: {}", failed.error),
        }
        SingleTransactionPlanResult {
            message,
            result: result.into(),
        }
    }
}
