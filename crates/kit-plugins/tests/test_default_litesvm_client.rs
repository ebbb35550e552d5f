use kit_plugin_litesvm::{
    assert_is_successful_transaction, is_failed_transaction, is_successful_transaction,
    AssertionError, TransactionResult,
};
use kit_plugins::{create_default_litesvm_client, DEFAULT_PAYER_LAMPORTS};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signer::Signer};
use std::str::FromStr;

fn memo(text: &str) -> Instruction {
    let program_id = Pubkey::from_str("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr").unwrap();
    Instruction::new_with_bytes(program_id, text.as_bytes(), vec![])
}

/// Default LiteSVM client without an explicit payer
///
/// **Test flow:**
/// 1. Compose the default LiteSVM client, letting it generate a payer
/// 2. Verify the payer holds exactly the default airdrop
/// 3. Send a single memo instruction
/// 4. Verify the result classifies as a success
#[tokio::test]
async fn test_default_litesvm_client_sends_memo_with_generated_payer() {
    let client = create_default_litesvm_client(None).await.unwrap();

    let payer = client.payer().unwrap().pubkey();
    let balance = client.get_balance(&payer).await.unwrap();
    println!("💰 Generated payer {} holds {} lamports", payer, balance);
    assert_eq!(balance, DEFAULT_PAYER_LAMPORTS);
    assert_eq!(balance, 100_000_000_000);

    let result = client.send_instructions(vec![memo("hello")]).await.unwrap();

    assert!(is_successful_transaction(&result.result));
    assert!(!is_failed_transaction(&result.result));
    let executed = assert_is_successful_transaction(&result.result).unwrap();
    println!(
        "✅ Memo landed: {} ({:?} CUs)",
        executed.signature, executed.compute_units_consumed
    );

    // Fees were paid by the generated payer
    assert!(client.get_balance(&payer).await.unwrap() < DEFAULT_PAYER_LAMPORTS);
}

/// Airdrops through a composed client are observable right after the call returns
#[tokio::test]
async fn test_default_litesvm_client_airdrop_is_exact() {
    let client = create_default_litesvm_client(None).await.unwrap();
    let recipient = Pubkey::new_unique();

    client.airdrop(&recipient, 3_000_000_000).await.unwrap();

    assert_eq!(client.get_balance(&recipient).await.unwrap(), 3_000_000_000);
    assert_eq!(
        client.svm().unwrap().get_balance(&recipient),
        Some(3_000_000_000)
    );
}

/// Asserting success on an absent result reports the absence, not a failure
#[tokio::test]
async fn test_assert_success_on_absent_result() {
    let client = create_default_litesvm_client(None).await.unwrap();

    let lookup = client
        .svm()
        .unwrap()
        .get_transaction(&solana_sdk::signature::Signature::default());
    assert!(lookup.is_absent());

    let err = assert_is_successful_transaction(&lookup).unwrap_err();
    assert!(matches!(err, AssertionError::AbsentResult { .. }));
    assert!(err.to_string().contains("no result"));
    assert!(!err.to_string().contains("Transaction failed"));

    let absent: TransactionResult = TransactionResult::Absent;
    assert_eq!(
        assert_is_successful_transaction(&absent).unwrap_err(),
        AssertionError::AbsentResult {
            expected: "successful"
        }
    );
}

/// Topping up the generated payer with the default amount again credits it a second time
#[tokio::test]
async fn test_default_litesvm_client_tops_up_its_payer() {
    let client = create_default_litesvm_client(None).await.unwrap();
    let payer = client.payer().unwrap().pubkey();

    client.airdrop(&payer, DEFAULT_PAYER_LAMPORTS).await.unwrap();

    assert_eq!(
        client.get_balance(&payer).await.unwrap(),
        2 * DEFAULT_PAYER_LAMPORTS
    );
}
