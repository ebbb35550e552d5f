/*!
# Kit Plugin: RPC

Cluster transport for kit plugin clients: JSON-RPC requests plus websocket
signature subscriptions for confirmations.

Everything above this crate talks to a cluster through the narrow
[`RpcTransport`] trait, so a client composed against a real cluster and one
composed against an in-process SVM share the same code paths.

## Quick Start

```rust,no_run
use kit_plugin_rpc::{RpcTransport, SolanaRpc};
use solana_sdk::pubkey::Pubkey;

# async fn example() -> Result<(), kit_plugin_rpc::RpcTransportError> {
let rpc = SolanaRpc::with_url("https://api.devnet.solana.com")?;
let balance = rpc.get_balance(&Pubkey::new_unique()).await?;
println!("balance: {balance}");
# Ok(())
# }
```
*/

mod config;
mod error;
mod solana_rpc;
mod transport;

pub use config::{websocket_url_for, Commitment, RpcConfig, LOCALHOST_RPC_URL};
pub use error::{RpcTransportError, RpcTransportResult};
pub use solana_rpc::SolanaRpc;
pub use transport::{RpcSimulation, RpcTransport};

use std::sync::Arc;

/// Shared transport handle, as installed on a client
pub type SharedRpcTransport = Arc<dyn RpcTransport>;

/// Transport for `url`, with the subscriptions endpoint derived from it
pub fn rpc(url: impl Into<String>) -> RpcTransportResult<SharedRpcTransport> {
    Ok(Arc::new(SolanaRpc::with_url(url)?))
}

/// Transport for a local test validator
pub fn localhost_rpc() -> SharedRpcTransport {
    Arc::new(SolanaRpc::localhost())
}
