//! The RPC subset answered by an in-process SVM.
//!
//! Lets a client composed for a cluster run against LiteSVM instead: requests are
//! served synchronously and confirmations resolve from the SVM's transaction history.

use crate::{LitesvmTransport, SimulationResult, TransactionResult};
use async_trait::async_trait;
use kit_plugin_rpc::{RpcSimulation, RpcTransport, RpcTransportError, RpcTransportResult};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};

#[async_trait]
impl RpcTransport for LitesvmTransport {
    async fn get_latest_blockhash(&self) -> RpcTransportResult<Hash> {
        Ok(self.latest_blockhash())
    }

    async fn get_balance(&self, address: &Pubkey) -> RpcTransportResult<u64> {
        Ok(LitesvmTransport::get_balance(self, address).unwrap_or(0))
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> RpcTransportResult<Signature> {
        match self.airdrop(address, lamports) {
            TransactionResult::Success(meta) => Ok(meta.signature),
            TransactionResult::Failure(failed) => {
                Err(RpcTransportError::TransactionFailed(failed.err))
            }
            TransactionResult::Absent => Err(RpcTransportError::Backend(
                "LiteSVM returned no airdrop result".to_string(),
            )),
        }
    }

    async fn simulate_transaction(
        &self,
        transaction: &Transaction,
    ) -> RpcTransportResult<RpcSimulation> {
        let simulation = match LitesvmTransport::simulate_transaction(self, transaction.clone()) {
            SimulationResult::Success(info) => RpcSimulation {
                err: None,
                units_consumed: Some(info.meta.compute_units_consumed),
                logs: info.meta.logs,
            },
            SimulationResult::Failure(failed) => RpcSimulation {
                err: Some(failed.err),
                units_consumed: Some(failed.meta.compute_units_consumed),
                logs: failed.meta.logs,
            },
        };
        Ok(simulation)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> RpcTransportResult<Signature> {
        // Execution is immediate, so a failing transaction surfaces like a preflight failure
        match LitesvmTransport::send_transaction(self, transaction.clone()) {
            TransactionResult::Success(meta) => Ok(meta.signature),
            TransactionResult::Failure(failed) => {
                Err(RpcTransportError::TransactionFailed(failed.err))
            }
            TransactionResult::Absent => Err(RpcTransportError::Backend(
                "LiteSVM returned no send result".to_string(),
            )),
        }
    }

    async fn confirm_signature(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
    ) -> RpcTransportResult<()> {
        match self.get_transaction(signature) {
            TransactionResult::Success(_) => Ok(()),
            TransactionResult::Failure(failed) => {
                Err(RpcTransportError::TransactionFailed(failed.err))
            }
            TransactionResult::Absent => Err(RpcTransportError::Backend(format!(
                "Signature {signature} is unknown to LiteSVM"
            ))),
        }
    }
}
