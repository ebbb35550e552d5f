use solana_sdk::{signature::Signature, transaction::TransactionError};
use thiserror::Error;

pub type RpcTransportResult<T> = Result<T, RpcTransportError>;

/// Errors raised by an [`crate::RpcTransport`]
#[derive(Error, Debug)]
pub enum RpcTransportError {
    #[error("RPC client error: {0}")]
    Client(#[from] solana_client::client_error::ClientError),

    #[error("RPC subscription error: {0}")]
    Pubsub(#[from] solana_client::nonblocking::pubsub_client::PubsubClientError),

    #[error("Invalid RPC url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Transaction failed: {0}")]
    TransactionFailed(TransactionError),

    #[error("Signature {signature} not confirmed within {timeout_ms}ms")]
    ConfirmationTimeout {
        signature: Signature,
        timeout_ms: u64,
    },

    #[error("Signature subscription for {0} closed before a notification arrived")]
    SubscriptionClosed(Signature),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl RpcTransportError {
    /// The on-chain transaction error carried by this error, if any
    pub fn transaction_error(&self) -> Option<TransactionError> {
        match self {
            RpcTransportError::TransactionFailed(err) => Some(err.clone()),
            RpcTransportError::Client(err) => err.get_transaction_error(),
            _ => None,
        }
    }
}
