use crate::RpcTransportResult;
use async_trait::async_trait;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::{Transaction, TransactionError},
};

/// Outcome of a transaction simulation, reduced to what callers of this layer consume
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RpcSimulation {
    /// Execution error reported by the simulation, if any
    pub err: Option<TransactionError>,
    /// Compute units consumed by the simulated transaction
    pub units_consumed: Option<u64>,
    pub logs: Vec<String>,
}

/// The subset of cluster RPC and subscription calls the plugins rely on.
///
/// Implemented by [`crate::SolanaRpc`] for real clusters; any other backend able to
/// answer these calls (an in-process SVM for example) can stand in for a cluster.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn get_latest_blockhash(&self) -> RpcTransportResult<Hash>;

    async fn get_balance(&self, address: &Pubkey) -> RpcTransportResult<u64>;

    /// Ask the cluster faucet for lamports. Returns once the request is accepted,
    /// not once it is confirmed.
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64)
        -> RpcTransportResult<Signature>;

    async fn simulate_transaction(&self, transaction: &Transaction)
        -> RpcTransportResult<RpcSimulation>;

    async fn send_transaction(&self, transaction: &Transaction) -> RpcTransportResult<Signature>;

    /// Wait until `signature` reaches `commitment`.
    ///
    /// Fails with [`crate::RpcTransportError::TransactionFailed`] when the transaction
    /// landed with an error.
    async fn confirm_signature(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> RpcTransportResult<()>;
}
