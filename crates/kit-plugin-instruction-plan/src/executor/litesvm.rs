use super::{sign_message, SharedSigner, TransactionExecutor};
use crate::{
    ExecutedTransaction, FailedTransaction, InstructionPlanResult, SingleTransactionPlanResult,
    SubmissionError,
};
use async_trait::async_trait;
use kit_plugin_litesvm::{LitesvmTransport, TransactionResult};
use solana_sdk::{hash::Hash, message::Message, signature::Keypair};
use std::sync::Arc;
use tracing::{debug, warn};

/// Sends straight to an in-process LiteSVM.
///
/// Messages are signed and sent exactly as planned. The compute unit limit is
/// never estimated, so the executed message keeps the planner's placeholder;
/// the SVM meters against its own configured budget instead.
pub struct LitesvmTransactionExecutor {
    svm: LitesvmTransport,
    payer: Arc<Keypair>,
}

impl LitesvmTransactionExecutor {
    pub fn new(svm: LitesvmTransport, payer: Arc<Keypair>) -> Self {
        Self { svm, payer }
    }
}

#[async_trait]
impl TransactionExecutor for LitesvmTransactionExecutor {
    async fn latest_blockhash(&self) -> InstructionPlanResult<Hash> {
        Ok(self.svm.latest_blockhash())
    }

    async fn execute(
        &self,
        mut message: Message,
        signers: &[SharedSigner],
    ) -> SingleTransactionPlanResult {
        let recent_blockhash = self.svm.latest_blockhash();
        message.recent_blockhash = recent_blockhash;

        let transaction =
            match sign_message(message.clone(), &self.payer, signers, recent_blockhash) {
                Ok(transaction) => transaction,
                Err(e) => {
                    warn!("Failed to sign transaction: {}", e);
                    return SingleTransactionPlanResult {
                        message,
                        result: TransactionResult::Failure(FailedTransaction::from(e)),
                    };
                }
            };

        let result = self.svm.send_transaction(transaction).map(
            |meta| ExecutedTransaction {
                signature: meta.signature,
                compute_units_consumed: Some(meta.compute_units_consumed),
                logs: meta.logs,
            },
            |failed| FailedTransaction {
                signature: Some(failed.meta.signature),
                error: SubmissionError::Transaction(failed.err),
                logs: failed.meta.logs,
            },
        );

        match &result {
            TransactionResult::Success(executed) => {
                debug!("LiteSVM executed transaction {}", executed.signature)
            }
            TransactionResult::Failure(failed) => {
                warn!("LiteSVM transaction failed: {}", failed.error)
            }
            TransactionResult::Absent => {}
        }

        SingleTransactionPlanResult { message, result }
    }
}
