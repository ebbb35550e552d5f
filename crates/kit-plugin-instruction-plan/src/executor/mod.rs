//! Backend-specific strategies for sending planned messages.

mod litesvm;
mod rpc;

pub use litesvm::LitesvmTransactionExecutor;
pub use rpc::RpcTransactionExecutor;

use crate::{InstructionPlanResult, SingleTransactionPlanResult, SubmissionError};
use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, message::Message, signature::Keypair, signer::Signer, transaction::Transaction,
};
use std::sync::Arc;

/// A signer that can be shared across concurrent sends
pub type SharedSigner = Arc<dyn Signer + Send + Sync>;

/// Sends one planned message to a backend.
///
/// Submission failures are reported in the returned result, never as `Err`,
/// and are not retried.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Blockhash the planner should compile messages against
    async fn latest_blockhash(&self) -> InstructionPlanResult<Hash>;

    /// Sign `message` with the fee payer and whichever of `signers` it requires, then send it
    async fn execute(&self, message: Message, signers: &[SharedSigner]) -> SingleTransactionPlanResult;
}

/// Sign `message` with `payer` plus the `signers` whose keys the message marks as signers.
///
/// Signers the message does not need are skipped, so one signer set can serve
/// every transaction of a plan.
pub(crate) fn sign_message(
    message: Message,
    payer: &Keypair,
    signers: &[SharedSigner],
    recent_blockhash: Hash,
) -> Result<Transaction, SubmissionError> {
    let payer_pubkey = payer.pubkey();
    let mut keypairs: Vec<&dyn Signer> = vec![payer as &dyn Signer];
    keypairs.extend(
        signers
            .iter()
            .filter(|signer| {
                let pubkey = signer.pubkey();
                pubkey != payer_pubkey
                    && message
                        .account_keys
                        .iter()
                        .position(|key| *key == pubkey)
                        .is_some_and(|index| message.is_signer(index))
            })
            .map(|signer| signer.as_ref() as &dyn Signer),
    );

    let mut transaction = Transaction::new_unsigned(message);
    transaction
        .try_sign(&keypairs, recent_blockhash)
        .map_err(|e| SubmissionError::Signing(e.to_string()))?;
    Ok(transaction)
}
