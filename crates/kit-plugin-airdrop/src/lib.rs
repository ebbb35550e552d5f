/*!
# Kit Plugin: Airdrop

One `airdrop(address, lamports)` operation, whichever transport a client was
composed with.

- With LiteSVM installed, the SVM's internal faucet credits the account directly;
  the balance is observable as soon as the call returns.
- Otherwise the cluster faucet is asked through the RPC transport and the call
  waits for the airdrop to reach `confirmed` commitment.

The backend is picked once, when the plugin is constructed.

```rust
use kit_plugin_airdrop::Airdrop;
use kit_plugin_litesvm::LitesvmTransport;
use solana_sdk::pubkey::Pubkey;

# async fn example() -> Result<(), kit_plugin_airdrop::FundingError> {
let svm = LitesvmTransport::new();
let airdrop = Airdrop::from_litesvm(svm.clone());

let recipient = Pubkey::new_unique();
airdrop.airdrop(&recipient, 1_000_000_000).await?;
assert_eq!(svm.get_balance(&recipient), Some(1_000_000_000));
# Ok(())
# }
```
*/

use kit_plugin_litesvm::{ExecutionFailure as _, LitesvmTransport, TransactionResult};
use kit_plugin_rpc::{RpcTransportError, SharedRpcTransport};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

pub type FundingResult<T> = Result<T, FundingError>;

/// Errors reported by the funding backend
#[derive(Error, Debug)]
pub enum FundingError {
    #[error("LiteSVM airdrop failed: {0}")]
    Litesvm(String),

    #[error("RPC airdrop failed: {0}")]
    Rpc(#[from] RpcTransportError),
}

/// The funding capability of a client
#[derive(Clone)]
pub enum Airdrop {
    /// The SVM's internal faucet; authoritative and immediate
    Litesvm(LitesvmTransport),
    /// The cluster faucet, confirmed at `confirmed` commitment
    Rpc(SharedRpcTransport),
}

impl Airdrop {
    pub fn from_litesvm(svm: LitesvmTransport) -> Self {
        Airdrop::Litesvm(svm)
    }

    pub fn from_rpc(rpc: SharedRpcTransport) -> Self {
        Airdrop::Rpc(rpc)
    }

    /// Fund `address` with `lamports`
    pub async fn airdrop(&self, address: &Pubkey, lamports: u64) -> FundingResult<()> {
        match self {
            Airdrop::Litesvm(svm) => match svm.airdrop(address, lamports) {
                TransactionResult::Success(_) => {
                    debug!("Airdropped {} lamports to {} (LiteSVM)", lamports, address);
                    Ok(())
                }
                TransactionResult::Failure(failed) => {
                    Err(FundingError::Litesvm(failed.error_message()))
                }
                TransactionResult::Absent => Err(FundingError::Litesvm(
                    "no airdrop result was returned".to_string(),
                )),
            },
            Airdrop::Rpc(rpc) => {
                let signature = rpc.request_airdrop(address, lamports).await?;
                rpc.confirm_signature(&signature, CommitmentConfig::confirmed())
                    .await?;
                info!(
                    "Airdropped {} lamports to {} ({})",
                    lamports, address, signature
                );
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Airdrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Airdrop::Litesvm(_) => f.write_str("Airdrop::Litesvm"),
            Airdrop::Rpc(_) => f.write_str("Airdrop::Rpc"),
        }
    }
}
