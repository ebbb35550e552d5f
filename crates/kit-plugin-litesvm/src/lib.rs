/*!
# Kit Plugin: LiteSVM

In-process simulated validator transport for kit plugin clients, plus the
transaction result classifiers and assertions shared by every backend.

## Quick Start

```rust
use kit_plugin_litesvm::{assert_is_successful_transaction, LitesvmTransport};
use solana_sdk::pubkey::Pubkey;

let svm = LitesvmTransport::new();
let recipient = Pubkey::new_unique();

let result = svm.airdrop(&recipient, 1_000_000_000);
assert_is_successful_transaction(&result).expect("airdrop should succeed");
assert_eq!(svm.get_balance(&recipient), Some(1_000_000_000));
```

`LitesvmTransport` also implements [`kit_plugin_rpc::RpcTransport`], so the
same SVM can back a client that was composed for a cluster.
*/

mod assertions;
mod config;
mod rpc;
mod svm;

pub use assertions::*;
pub use config::LitesvmConfig;
pub use svm::LitesvmTransport;

// Re-export the backend-native result types for convenience
pub use litesvm::{
    types::{FailedTransactionMetadata, SimulatedTransactionInfo, TransactionMetadata},
    LiteSVM,
};
