use crate::{LitesvmConfig, SimulationResult, TransactionResult};
use litesvm::LiteSVM;
use solana_compute_budget::compute_budget::ComputeBudget;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::VersionedTransaction,
};
use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::debug;

/// Shared handle on an in-process LiteSVM instance.
///
/// Cloning the handle shares the same SVM; every call takes the lock for the
/// duration of one SVM operation only.
#[derive(Clone)]
pub struct LitesvmTransport {
    svm: Arc<Mutex<LiteSVM>>,
}

impl LitesvmTransport {
    /// Create a new SVM with default configuration
    pub fn new() -> Self {
        Self::with_config(&LitesvmConfig::default())
    }

    /// Create a new SVM with custom configuration
    pub fn with_config(config: &LitesvmConfig) -> Self {
        let mut svm = LiteSVM::new()
            .with_sigverify(config.sigverify)
            .with_blockhash_check(config.blockhash_check);

        if let Some(compute_unit_limit) = config.compute_unit_limit {
            svm = svm.with_compute_budget(ComputeBudget {
                compute_unit_limit,
                ..ComputeBudget::default()
            });
        }

        Self::from_svm(svm)
    }

    /// Wrap an SVM that was set up by the caller (programs loaded, accounts seeded, ...)
    pub fn from_svm(svm: LiteSVM) -> Self {
        Self {
            svm: Arc::new(Mutex::new(svm)),
        }
    }

    /// Run `f` with exclusive access to the underlying SVM
    pub fn with_svm<R>(&self, f: impl FnOnce(&mut LiteSVM) -> R) -> R {
        let mut svm = self.svm.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut svm)
    }

    /// Credit `lamports` to `address` from the SVM's internal faucet.
    ///
    /// The blockhash is expired after every faucet transfer, so repeating the
    /// same airdrop yields a new faucet transaction instead of a duplicate.
    pub fn airdrop(&self, address: &Pubkey, lamports: u64) -> TransactionResult {
        debug!("LiteSVM airdrop of {} lamports to {}", lamports, address);
        self.with_svm(|svm| {
            let result = svm.airdrop(address, lamports);
            svm.expire_blockhash();
            result
        })
        .into()
    }

    pub fn send_transaction(&self, transaction: impl Into<VersionedTransaction>) -> TransactionResult {
        let transaction = transaction.into();
        self.with_svm(|svm| svm.send_transaction(transaction)).into()
    }

    pub fn simulate_transaction(
        &self,
        transaction: impl Into<VersionedTransaction>,
    ) -> SimulationResult {
        let transaction = transaction.into();
        self.with_svm(|svm| svm.simulate_transaction(transaction)).into()
    }

    /// Look up an executed transaction; `Absent` when the signature is unknown
    pub fn get_transaction(&self, signature: &Signature) -> TransactionResult {
        self.with_svm(|svm| svm.get_transaction(signature).cloned())
            .into()
    }

    pub fn get_balance(&self, address: &Pubkey) -> Option<u64> {
        self.with_svm(|svm| svm.get_balance(address))
    }

    pub fn latest_blockhash(&self) -> Hash {
        self.with_svm(|svm| svm.latest_blockhash())
    }

    /// Move to a new blockhash so that otherwise identical transactions get new signatures
    pub fn expire_blockhash(&self) {
        self.with_svm(|svm| svm.expire_blockhash())
    }
}

impl Default for LitesvmTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LitesvmTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LitesvmTransport").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_is_failed_transaction, assert_is_successful_transaction};
    use solana_sdk::{
        message::Message,
        signature::{Keypair, Signer},
        system_instruction,
        transaction::Transaction,
    };

    #[test]
    fn test_airdrop_credits_exact_amount() {
        let svm = LitesvmTransport::new();
        let recipient = Pubkey::new_unique();

        assert_eq!(svm.get_balance(&recipient), None);
        assert!(assert_is_successful_transaction(&svm.airdrop(&recipient, 42_000_000)).is_ok());
        assert_eq!(svm.get_balance(&recipient), Some(42_000_000));
    }

    #[test]
    fn test_repeated_airdrop_accumulates() {
        let svm = LitesvmTransport::new();
        let recipient = Pubkey::new_unique();

        assert!(assert_is_successful_transaction(&svm.airdrop(&recipient, 1_000_000)).is_ok());
        assert!(assert_is_successful_transaction(&svm.airdrop(&recipient, 1_000_000)).is_ok());

        assert_eq!(svm.get_balance(&recipient), Some(2_000_000));
    }

    #[test]
    fn test_clones_share_state() {
        let svm = LitesvmTransport::new();
        let other = svm.clone();
        let recipient = Pubkey::new_unique();

        svm.airdrop(&recipient, 10_000_000);

        assert_eq!(other.get_balance(&recipient), Some(10_000_000));
    }

    #[test]
    fn test_send_transfer_and_look_it_up() {
        let svm = LitesvmTransport::new();
        let payer = Keypair::new();
        let recipient = Pubkey::new_unique();
        svm.airdrop(&payer.pubkey(), 1_000_000_000);

        let tx = Transaction::new(
            &[&payer],
            Message::new(
                &[system_instruction::transfer(&payer.pubkey(), &recipient, 5_000_000)],
                Some(&payer.pubkey()),
            ),
            svm.latest_blockhash(),
        );
        let signature = tx.signatures[0];

        let result = svm.send_transaction(tx);
        let meta = assert_is_successful_transaction(&result).unwrap();
        assert_eq!(meta.signature, signature);
        assert_eq!(svm.get_balance(&recipient), Some(5_000_000));

        assert!(assert_is_successful_transaction(&svm.get_transaction(&signature)).is_ok());
    }

    #[test]
    fn test_unfunded_payer_fails() {
        let svm = LitesvmTransport::new();
        let payer = Keypair::new();

        let tx = Transaction::new(
            &[&payer],
            Message::new(
                &[system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1)],
                Some(&payer.pubkey()),
            ),
            svm.latest_blockhash(),
        );

        let result = svm.send_transaction(tx);
        assert!(assert_is_failed_transaction(&result).is_ok());
    }

    #[test]
    fn test_expire_blockhash_changes_blockhash() {
        let svm = LitesvmTransport::new();
        let before = svm.latest_blockhash();

        svm.expire_blockhash();

        assert_ne!(svm.latest_blockhash(), before);
    }
}
