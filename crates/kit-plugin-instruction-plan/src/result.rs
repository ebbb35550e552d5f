use crate::TransactionPlan;
use kit_plugin_litesvm::{ExecutionFailure, TransactionResult};
use kit_plugin_rpc::RpcTransportError;
use solana_sdk::{message::Message, signature::Signature, transaction::TransactionError};
use thiserror::Error;

/// Why a planned transaction did not land successfully
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("{0}")]
    Transaction(TransactionError),

    #[error("Simulation failed: {0}")]
    Simulation(TransactionError),

    #[error("Simulation did not report consumed compute units")]
    EstimationUnavailable,

    #[error("Failed to sign transaction: {0}")]
    Signing(String),

    #[error("RPC error: {0}")]
    Rpc(String),
}

impl From<RpcTransportError> for SubmissionError {
    fn from(err: RpcTransportError) -> Self {
        match err.transaction_error() {
            Some(transaction_error) => SubmissionError::Transaction(transaction_error),
            None => SubmissionError::Rpc(err.to_string()),
        }
    }
}

/// A transaction that landed successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedTransaction {
    pub signature: Signature,
    pub compute_units_consumed: Option<u64>,
    pub logs: Vec<String>,
}

/// A transaction that was rejected, failed on chain, or could not be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTransaction {
    /// Known once the transaction was signed
    pub signature: Option<Signature>,
    pub error: SubmissionError,
    pub logs: Vec<String>,
}

impl From<SubmissionError> for FailedTransaction {
    fn from(error: SubmissionError) -> Self {
        Self {
            signature: None,
            error,
            logs: Vec::new(),
        }
    }
}

impl From<RpcTransportError> for FailedTransaction {
    fn from(err: RpcTransportError) -> Self {
        SubmissionError::from(err).into()
    }
}

impl ExecutionFailure for FailedTransaction {
    fn error_message(&self) -> String {
        self.error.to_string()
    }
}

/// Result of executing one planned transaction
pub type PlanTransactionResult = TransactionResult<ExecutedTransaction, FailedTransaction>;

/// One executed (or canceled) transaction of a plan
#[derive(Debug, Clone, PartialEq)]
pub struct SingleTransactionPlanResult {
    /// The message as it was last sent, after any compute budget rewrite
    pub message: Message,
    /// `Absent` when the transaction was never sent
    pub result: PlanTransactionResult,
}

impl SingleTransactionPlanResult {
    pub fn canceled(message: Message) -> Self {
        Self {
            message,
            result: TransactionResult::Absent,
        }
    }
}

/// Results of executing a [`TransactionPlan`], in the same shape
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionPlanResult {
    Single(SingleTransactionPlanResult),
    Sequential(Vec<TransactionPlanResult>),
    Parallel(Vec<TransactionPlanResult>),
}

impl TransactionPlanResult {
    /// Every transaction of `plan` marked as never sent
    pub fn canceled(plan: &TransactionPlan) -> Self {
        match plan {
            TransactionPlan::Single(transaction) => TransactionPlanResult::Single(
                SingleTransactionPlanResult::canceled(transaction.message.clone()),
            ),
            TransactionPlan::Sequential(plans) => {
                TransactionPlanResult::Sequential(plans.iter().map(Self::canceled).collect())
            }
            TransactionPlan::Parallel(plans) => {
                TransactionPlanResult::Parallel(plans.iter().map(Self::canceled).collect())
            }
        }
    }

    pub fn as_single(&self) -> Option<&SingleTransactionPlanResult> {
        match self {
            TransactionPlanResult::Single(result) => Some(result),
            _ => None,
        }
    }

    /// Every transaction result, depth first
    pub fn results(&self) -> Vec<&SingleTransactionPlanResult> {
        match self {
            TransactionPlanResult::Single(result) => vec![result],
            TransactionPlanResult::Sequential(results)
            | TransactionPlanResult::Parallel(results) => {
                results.iter().flat_map(TransactionPlanResult::results).collect()
            }
        }
    }

    /// Whether every transaction of the plan landed successfully
    pub fn is_successful(&self) -> bool {
        self.results()
            .iter()
            .all(|single| single.result.success().is_some())
    }

    pub fn first_failure(&self) -> Option<&FailedTransaction> {
        self.results()
            .into_iter()
            .find_map(|single| single.result.failure())
    }
}
