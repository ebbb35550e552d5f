use crate::{ClientError, ClientResult};
use kit_plugin_airdrop::{Airdrop, FundingResult};
use solana_sdk::{
    signature::{read_keypair_file, Keypair},
    signer::Signer,
};
use std::path::Path;
use tracing::info;

/// Lamports airdropped to a generated payer by the default clients (100 SOL)
pub const DEFAULT_PAYER_LAMPORTS: u64 = 100_000_000_000;

/// Generate a fresh keypair and fund it with `lamports`
pub async fn generated_payer_with_sol(airdrop: &Airdrop, lamports: u64) -> FundingResult<Keypair> {
    let payer = Keypair::new();
    airdrop.airdrop(&payer.pubkey(), lamports).await?;
    info!("Generated payer {} with {} lamports", payer.pubkey(), lamports);
    Ok(payer)
}

/// Load a payer from a keypair file in the Solana CLI format
pub fn payer_from_file(path: impl AsRef<Path>) -> ClientResult<Keypair> {
    let path = path.as_ref();
    read_keypair_file(path).map_err(|e| {
        ClientError::Config(format!(
            "Failed to read keypair {}: {}",
            path.display(),
            e
        ))
    })
}
