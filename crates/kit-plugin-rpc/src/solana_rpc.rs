use crate::{RpcConfig, RpcSimulation, RpcTransport, RpcTransportError, RpcTransportResult};
use async_trait::async_trait;
use backoff::future::retry;
use futures::StreamExt as _;
use solana_client::{
    nonblocking::{pubsub_client::PubsubClient, rpc_client::RpcClient},
    rpc_config::{RpcSendTransactionConfig, RpcSignatureSubscribeConfig, RpcSimulateTransactionConfig},
    rpc_response::{ProcessedSignatureResult, RpcSignatureResult},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use tracing::{debug, warn};

/// Cluster transport backed by the nonblocking `RpcClient` and a `PubsubClient`
pub struct SolanaRpc {
    rpc_client: RpcClient,
    config: RpcConfig,
}

impl SolanaRpc {
    pub fn new(config: RpcConfig) -> Self {
        let rpc_client = RpcClient::new_with_commitment(config.url.clone(), config.commitment_config());
        Self { rpc_client, config }
    }

    /// Transport for `url`, with the subscriptions endpoint derived from it
    pub fn with_url(url: impl Into<String>) -> RpcTransportResult<Self> {
        Ok(Self::new(RpcConfig::new(url)?))
    }

    /// Transport for a local test validator
    pub fn localhost() -> Self {
        Self::new(RpcConfig::default())
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Get the RPC client (for advanced operations)
    pub fn rpc_client(&self) -> &RpcClient {
        &self.rpc_client
    }

    /// Commitment used for reads and preflight checks
    pub fn commitment(&self) -> CommitmentConfig {
        self.rpc_client.commitment()
    }

    /// `None` while the signature has not reached `commitment`, otherwise its execution outcome
    async fn signature_status(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> RpcTransportResult<Option<Result<(), TransactionError>>> {
        let statuses = self
            .rpc_client
            .get_signature_statuses(&[*signature])
            .await?
            .value;

        Ok(statuses
            .into_iter()
            .next()
            .flatten()
            .filter(|status| status.satisfies_commitment(commitment))
            .map(|status| match status.err {
                Some(err) => Err(err),
                None => Ok(()),
            }))
    }

    async fn confirm_with_subscription(
        &self,
        websocket_url: &str,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> RpcTransportResult<()> {
        let pubsub = PubsubClient::new(websocket_url).await?;
        let (mut notifications, unsubscribe) = pubsub
            .signature_subscribe(
                signature,
                Some(RpcSignatureSubscribeConfig {
                    commitment: Some(commitment),
                    enable_received_notification: Some(false),
                }),
            )
            .await?;

        // The signature may have landed before the subscription was registered
        let outcome = match self.signature_status(signature, commitment).await? {
            Some(status) => Ok(status.map_err(RpcTransportError::TransactionFailed)),
            None => {
                tokio::time::timeout(self.config.confirmation_timeout(), notifications.next())
                    .await
                    .map_err(|_| RpcTransportError::ConfirmationTimeout {
                        signature: *signature,
                        timeout_ms: self.config.confirmation_timeout_ms,
                    })
                    .map(|notification| match notification.map(|response| response.value) {
                        Some(RpcSignatureResult::ProcessedSignature(ProcessedSignatureResult {
                            err: Some(err),
                        })) => Err(RpcTransportError::TransactionFailed(err)),
                        Some(RpcSignatureResult::ProcessedSignature(_)) => Ok(()),
                        Some(RpcSignatureResult::ReceivedSignature(_)) | None => {
                            Err(RpcTransportError::SubscriptionClosed(*signature))
                        }
                    })
            }
        };

        unsubscribe().await;
        drop(notifications);
        if let Err(e) = pubsub.shutdown().await {
            warn!("Failed to shut down signature subscription client: {}", e);
        }

        outcome?
    }

    async fn confirm_with_polling(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> RpcTransportResult<()> {
        let timeout_ms = self.config.confirmation_timeout_ms;

        retry(self.config.poll_backoff(), move || async move {
            match self.signature_status(signature, commitment).await {
                Ok(Some(status)) => status
                    .map_err(|err| backoff::Error::Permanent(RpcTransportError::TransactionFailed(err))),
                Ok(None) => Err(backoff::Error::Transient {
                    err: RpcTransportError::ConfirmationTimeout {
                        signature: *signature,
                        timeout_ms,
                    },
                    retry_after: None,
                }),
                Err(e) => Err(backoff::Error::Permanent(e)),
            }
        })
        .await
    }
}

#[async_trait]
impl RpcTransport for SolanaRpc {
    async fn get_latest_blockhash(&self) -> RpcTransportResult<Hash> {
        Ok(self.rpc_client.get_latest_blockhash().await?)
    }

    async fn get_balance(&self, address: &Pubkey) -> RpcTransportResult<u64> {
        Ok(self.rpc_client.get_balance(address).await?)
    }

    async fn request_airdrop(
        &self,
        address: &Pubkey,
        lamports: u64,
    ) -> RpcTransportResult<Signature> {
        let signature = self.rpc_client.request_airdrop(address, lamports).await?;
        debug!("Requested airdrop of {} lamports to {}: {}", lamports, address, signature);
        Ok(signature)
    }

    async fn simulate_transaction(
        &self,
        transaction: &Transaction,
    ) -> RpcTransportResult<RpcSimulation> {
        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: true,
            commitment: Some(self.rpc_client.commitment()),
            ..Default::default()
        };

        let result = self
            .rpc_client
            .simulate_transaction_with_config(transaction, config)
            .await?
            .value;

        Ok(RpcSimulation {
            err: result.err,
            units_consumed: result.units_consumed,
            logs: result.logs.unwrap_or_default(),
        })
    }

    async fn send_transaction(&self, transaction: &Transaction) -> RpcTransportResult<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: self.config.skip_preflight,
            preflight_commitment: Some(self.rpc_client.commitment().commitment),
            ..Default::default()
        };

        match self
            .rpc_client
            .send_transaction_with_config(transaction, config)
            .await
        {
            Ok(signature) => Ok(signature),
            Err(e) => match e.get_transaction_error() {
                Some(err) => Err(RpcTransportError::TransactionFailed(err)),
                None => Err(RpcTransportError::Client(e)),
            },
        }
    }

    async fn confirm_signature(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> RpcTransportResult<()> {
        match self.config.websocket_url.as_deref() {
            Some(websocket_url) => {
                self.confirm_with_subscription(websocket_url, signature, commitment)
                    .await
            }
            None => self.confirm_with_polling(signature, commitment).await,
        }
    }
}
