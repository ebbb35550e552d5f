/*!
# Transaction Result Assertions

Backend-agnostic classification of execution results.

Backends hand back differently shaped success and failure values; they are
converted into [`TransactionResult`] / [`SimulationResult`] at the point where
the backend returns them, and everything downstream branches on the tag:

- `is_*` functions classify and never fail
- `assert_is_*` functions narrow to the expected variant or return an [`AssertionError`]

```rust
use kit_plugin_litesvm::{assert_is_successful_transaction, LitesvmTransport};
use solana_sdk::pubkey::Pubkey;

let svm = LitesvmTransport::new();
let result = svm.airdrop(&Pubkey::new_unique(), 1_000_000_000);
let meta = assert_is_successful_transaction(&result).expect("airdrop should succeed");
println!("consumed {} CUs", meta.compute_units_consumed);
```
*/

use litesvm::types::{FailedTransactionMetadata, SimulatedTransactionInfo, TransactionMetadata};
use thiserror::Error;

/// A backend failure value that can describe its error for users
pub trait ExecutionFailure {
    fn error_message(&self) -> String;
}

impl ExecutionFailure for FailedTransactionMetadata {
    fn error_message(&self) -> String {
        self.err.to_string()
    }
}

/// Result of sending or looking up a transaction.
///
/// `Absent` stands for "no result at all", e.g. a lookup of an unknown signature.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionResult<S = TransactionMetadata, F = FailedTransactionMetadata> {
    Absent,
    Success(S),
    Failure(F),
}

impl<S, F> TransactionResult<S, F> {
    pub fn is_absent(&self) -> bool {
        matches!(self, TransactionResult::Absent)
    }

    pub fn success(&self) -> Option<&S> {
        match self {
            TransactionResult::Success(success) => Some(success),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&F> {
        match self {
            TransactionResult::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn map<S2, F2>(
        self,
        on_success: impl FnOnce(S) -> S2,
        on_failure: impl FnOnce(F) -> F2,
    ) -> TransactionResult<S2, F2> {
        match self {
            TransactionResult::Absent => TransactionResult::Absent,
            TransactionResult::Success(success) => TransactionResult::Success(on_success(success)),
            TransactionResult::Failure(failure) => TransactionResult::Failure(on_failure(failure)),
        }
    }
}

impl<S, F> From<Result<S, F>> for TransactionResult<S, F> {
    fn from(result: Result<S, F>) -> Self {
        match result {
            Ok(success) => TransactionResult::Success(success),
            Err(failure) => TransactionResult::Failure(failure),
        }
    }
}

impl<S, F> From<Option<Result<S, F>>> for TransactionResult<S, F> {
    fn from(result: Option<Result<S, F>>) -> Self {
        result.map_or(TransactionResult::Absent, TransactionResult::from)
    }
}

/// Result of simulating a transaction. A simulation always produces an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationResult<S = SimulatedTransactionInfo, F = FailedTransactionMetadata> {
    Success(S),
    Failure(F),
}

impl<S, F> From<Result<S, F>> for SimulationResult<S, F> {
    fn from(result: Result<S, F>) -> Self {
        match result {
            Ok(success) => SimulationResult::Success(success),
            Err(failure) => SimulationResult::Failure(failure),
        }
    }
}

/// Errors returned by the `assert_is_*` functions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertionError {
    #[error("Expected {expected} transaction but got no result")]
    AbsentResult { expected: &'static str },

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Expected failed transaction but got successful result")]
    UnexpectedSuccess,

    #[error("Simulation failed: {0}")]
    SimulationFailed(String),
}

/// Checks if a transaction result is successful.
///
/// ```rust
/// # use kit_plugin_litesvm::{is_successful_transaction, LitesvmTransport};
/// # use solana_sdk::pubkey::Pubkey;
/// let svm = LitesvmTransport::new();
/// let result = svm.airdrop(&Pubkey::new_unique(), 1_000_000);
/// if let Some(meta) = result.success() {
///     assert!(is_successful_transaction(&result));
///     println!("{}", meta.compute_units_consumed);
/// }
/// ```
pub fn is_successful_transaction<S, F>(result: &TransactionResult<S, F>) -> bool {
    matches!(result, TransactionResult::Success(_))
}

/// Checks if a transaction result is a failure.
pub fn is_failed_transaction<S, F>(result: &TransactionResult<S, F>) -> bool {
    matches!(result, TransactionResult::Failure(_))
}

/// Asserts that a transaction result is successful and returns the success value.
pub fn assert_is_successful_transaction<S, F: ExecutionFailure>(
    result: &TransactionResult<S, F>,
) -> Result<&S, AssertionError> {
    match result {
        TransactionResult::Absent => Err(AssertionError::AbsentResult {
            expected: "successful",
        }),
        TransactionResult::Failure(failure) => {
            Err(AssertionError::TransactionFailed(failure.error_message()))
        }
        TransactionResult::Success(success) => Ok(success),
    }
}

/// Asserts that a transaction result is a failure and returns the failure value.
/// Useful for testing expected failures.
pub fn assert_is_failed_transaction<S, F>(
    result: &TransactionResult<S, F>,
) -> Result<&F, AssertionError> {
    match result {
        TransactionResult::Absent => Err(AssertionError::AbsentResult { expected: "failed" }),
        TransactionResult::Success(_) => Err(AssertionError::UnexpectedSuccess),
        TransactionResult::Failure(failure) => Ok(failure),
    }
}

pub fn is_successful_simulation<S, F>(result: &SimulationResult<S, F>) -> bool {
    matches!(result, SimulationResult::Success(_))
}

pub fn is_failed_simulation<S, F>(result: &SimulationResult<S, F>) -> bool {
    matches!(result, SimulationResult::Failure(_))
}

/// Asserts that a simulation succeeded and returns the simulated info.
pub fn assert_is_successful_simulation<S, F: ExecutionFailure>(
    result: &SimulationResult<S, F>,
) -> Result<&S, AssertionError> {
    match result {
        SimulationResult::Success(success) => Ok(success),
        SimulationResult::Failure(failure) => {
            Err(AssertionError::SimulationFailed(failure.error_message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LitesvmTransport;
    use solana_sdk::pubkey::Pubkey;

    #[derive(Debug, Clone, PartialEq)]
    struct StubFailure(&'static str);

    impl ExecutionFailure for StubFailure {
        fn error_message(&self) -> String {
            self.0.to_string()
        }
    }

    type StubResult = TransactionResult<u64, StubFailure>;

    fn all_results() -> Vec<StubResult> {
        vec![
            TransactionResult::Absent,
            TransactionResult::Success(1_000),
            TransactionResult::Failure(StubFailure("InsufficientFunds")),
        ]
    }

    #[test]
    fn test_type_guards_identify_transaction_results() {
        let success: StubResult = TransactionResult::Success(1_000);
        let failure: StubResult = TransactionResult::Failure(StubFailure("InsufficientFunds"));
        let absent: StubResult = TransactionResult::Absent;

        assert!(is_successful_transaction(&success));
        assert!(!is_successful_transaction(&failure));
        assert!(!is_successful_transaction(&absent));

        assert!(is_failed_transaction(&failure));
        assert!(!is_failed_transaction(&success));
        assert!(!is_failed_transaction(&absent));
    }

    #[test]
    fn test_classification_is_exclusive_for_present_results() {
        for result in all_results() {
            if result.is_absent() {
                assert!(!is_successful_transaction(&result));
                assert!(!is_failed_transaction(&result));
            } else {
                assert_ne!(is_successful_transaction(&result), is_failed_transaction(&result));
            }
        }
    }

    #[test]
    fn test_assertions_agree_with_classifiers() {
        for result in all_results() {
            assert_eq!(
                assert_is_successful_transaction(&result).is_ok(),
                is_successful_transaction(&result)
            );
            assert_eq!(
                assert_is_failed_transaction(&result).is_ok(),
                is_failed_transaction(&result)
            );
        }
    }

    #[test]
    fn test_assert_successful_reports_absent_and_failure() {
        let absent: StubResult = TransactionResult::Absent;
        let failure: StubResult = TransactionResult::Failure(StubFailure("InsufficientFunds"));

        let err = assert_is_successful_transaction(&absent).unwrap_err();
        assert_eq!(err, AssertionError::AbsentResult { expected: "successful" });
        assert_eq!(
            err.to_string(),
            "Expected successful transaction but got no result"
        );

        let err = assert_is_successful_transaction(&failure).unwrap_err();
        assert_eq!(err.to_string(), "Transaction failed: InsufficientFunds");
    }

    #[test]
    fn test_assert_failed_reports_absent_and_success() {
        let absent: StubResult = TransactionResult::Absent;
        let success: StubResult = TransactionResult::Success(1_000);

        assert_eq!(
            assert_is_failed_transaction(&absent).unwrap_err().to_string(),
            "Expected failed transaction but got no result"
        );
        assert_eq!(
            assert_is_failed_transaction(&success).unwrap_err(),
            AssertionError::UnexpectedSuccess
        );
    }

    #[test]
    fn test_assertions_return_narrowed_values() {
        let success: StubResult = TransactionResult::Success(1_000);
        let failure: StubResult = TransactionResult::Failure(StubFailure("AccountNotFound"));

        assert_eq!(assert_is_successful_transaction(&success), Ok(&1_000));
        assert_eq!(
            assert_is_failed_transaction(&failure),
            Ok(&StubFailure("AccountNotFound"))
        );
    }

    #[test]
    fn test_simulation_guards_and_assertion() {
        let success: SimulationResult<(), StubFailure> = SimulationResult::Success(());
        let failure: SimulationResult<(), StubFailure> =
            SimulationResult::Failure(StubFailure("SimulationError"));

        assert!(is_successful_simulation(&success));
        assert!(!is_successful_simulation(&failure));
        assert!(is_failed_simulation(&failure));
        assert!(!is_failed_simulation(&success));

        assert!(assert_is_successful_simulation(&success).is_ok());
        assert_eq!(
            assert_is_successful_simulation(&failure).unwrap_err().to_string(),
            "Simulation failed: SimulationError"
        );
    }

    #[test]
    fn test_conversions_from_backend_shapes() {
        let lookup: Option<Result<u64, StubFailure>> = None;
        assert!(TransactionResult::from(lookup).is_absent());

        let sent: Result<u64, StubFailure> = Ok(7);
        assert_eq!(TransactionResult::from(sent).success(), Some(&7));

        let sent: Result<u64, StubFailure> = Err(StubFailure("BlockhashNotFound"));
        assert!(is_failed_transaction(&TransactionResult::from(sent)));
    }

    #[test]
    fn test_real_airdrop_result_is_successful() {
        let svm = LitesvmTransport::new();
        let recipient = Pubkey::new_unique();

        let result = svm.airdrop(&recipient, 1_000_000_000);

        assert!(is_successful_transaction(&result));
        assert!(assert_is_successful_transaction(&result).is_ok());
    }

    #[test]
    fn test_real_unknown_signature_lookup_is_absent() {
        let svm = LitesvmTransport::new();

        let result = svm.get_transaction(&solana_sdk::signature::Signature::default());

        assert!(!is_successful_transaction(&result));
        assert!(!is_failed_transaction(&result));
        assert!(matches!(
            assert_is_successful_transaction(&result),
            Err(AssertionError::AbsentResult { .. })
        ));
    }
}
