/*!
# Kit Plugins

Ready-to-use Solana clients composed from the kit plugins: one transport (a
cluster over RPC, or an in-process LiteSVM), an airdrop capability, a payer,
and a transaction planner/executor.

## Quick Start

```rust
use kit_plugins::create_default_litesvm_client;
use kit_plugin_litesvm::assert_is_successful_transaction;
use solana_sdk::{pubkey::Pubkey, signer::Signer, system_instruction};

# async fn example() -> Result<(), Box<dyn std::error::Error>> {
// Generates a payer and funds it with 100 SOL
let client = create_default_litesvm_client(None).await?;

let payer = client.payer()?.pubkey();
let transfer = system_instruction::transfer(&payer, &Pubkey::new_unique(), 1_000_000);
let result = client.send_instructions(vec![transfer]).await?;
assert_is_successful_transaction(&result.result)?;
# Ok(())
# }
```

## Custom Composition

[`ClientBuilder`] exposes the individual steps the presets are made of;
[`KitPluginsConfig`] composes a client from YAML.
*/

mod builder;
mod client;
mod config;
mod defaults;
mod error;
mod payer;

pub use builder::{ClientBuilder, Transport};
pub use client::Client;
pub use config::{KitPluginsConfig, TransportConfig};
pub use defaults::{
    create_client_from_config, create_default_litesvm_client, create_default_localhost_rpc_client,
    create_default_rpc_client, DefaultRpcClientConfig,
};
pub use error::{ClientError, ClientResult};
pub use payer::{generated_payer_with_sol, payer_from_file, DEFAULT_PAYER_LAMPORTS};

// Re-export the plugin crates for convenience
pub use kit_plugin_airdrop as airdrop;
pub use kit_plugin_instruction_plan as instruction_plan;
pub use kit_plugin_litesvm as litesvm;
pub use kit_plugin_rpc as rpc;
