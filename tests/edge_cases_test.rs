//! Edge case tests for wallet updates driven through the batch engine.

use std::io::Cursor;
use wallet_ledger::{LedgerEngine, MemoryLedger, StateStore, WalletError};

fn run_csv(csv: &str) -> (LedgerEngine, String) {
    let mut engine = LedgerEngine::new();
    engine.process_csv(Cursor::new(csv)).unwrap();

    let mut output = Vec::new();
    engine.write_output(&mut output).unwrap();
    (engine, String::from_utf8(output).unwrap())
}

fn get_balance(output: &str, user: &str, currency: &str) -> Option<String> {
    let prefix = format!("{},{},", user, currency);
    output
        .lines()
        .skip(1) // Skip header
        .find(|line| line.starts_with(&prefix))
        .map(|line| line[prefix.len()..].to_string())
}

fn seeded(user: &str, state: &str) -> LedgerEngine {
    let mut ledger = MemoryLedger::new();
    ledger.write_state(user, state.as_bytes().to_vec()).unwrap();
    LedgerEngine::with_ledger(ledger)
}

// ==================== DEPOSIT EDGE CASES ====================

#[test]
fn test_new_user_deposit() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,100"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "100.0000");
}

#[test]
fn test_deposit_very_small_amount() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,0.0001
deposit,alice,USD,0.0001"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "0.0002");
}

#[test]
fn test_deposit_large_amount() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,999999999999.9999"#,
    );

    assert_eq!(
        get_balance(&output, "alice", "USD").unwrap(),
        "999999999999.9999"
    );
}

#[test]
fn test_deposit_zero_on_new_user_creates_entry() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,0"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "0.0000");
}

#[test]
fn test_negative_deposit_rejected() {
    let mut engine = seeded("alice", r#"{"USD":"20"}"#);
    let err = engine.apply(&["deposit", "alice", "USD", "-5"]).unwrap_err();

    assert!(matches!(err, WalletError::NegativeAmount(_)));
    assert_eq!(engine.wallet("alice").unwrap().get("USD").to_string(), "20.0000");
    assert!(engine.ledger().transactions().is_empty());
}

#[test]
fn test_tiny_negative_amount_rejected() {
    let mut engine = seeded("alice", r#"{"USD":"20"}"#);
    let err = engine
        .apply(&["withdrawal", "alice", "USD", "-0.00001"])
        .unwrap_err();

    assert!(matches!(err, WalletError::NegativeAmount(_)));
    assert_eq!(engine.wallet("alice").unwrap().get("USD").to_string(), "20.0000");
    assert!(engine.ledger().transactions().is_empty());
}

#[test]
fn test_extra_decimal_places_rejected_without_record() {
    let mut engine = seeded("alice", r#"{"USD":"1"}"#);
    let err = engine
        .apply(&["deposit", "alice", "USD", "0.00004"])
        .unwrap_err();

    assert!(matches!(err, WalletError::InvalidAmount { .. }));
    assert_eq!(engine.wallet("alice").unwrap().get("USD").to_string(), "1.0000");
    assert!(engine.ledger().transactions().is_empty());
}

#[test]
fn test_amount_beyond_maximum_rejected_on_new_user() {
    let mut engine = LedgerEngine::new();
    let err = engine
        .apply(&["deposit", "alice", "USD", "79228162514264337593543950335"])
        .unwrap_err();

    assert!(matches!(err, WalletError::InvalidAmount { .. }));
    assert_eq!(engine.ledger().states().count(), 0);
}

#[test]
fn test_maximum_amount_is_stored_and_printed() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,7922816251426433759354395.0335
deposit,alice,USD,0.0001"#,
    );

    assert_eq!(
        get_balance(&output, "alice", "USD").unwrap(),
        "7922816251426433759354395.0335"
    );
}

// ==================== WITHDRAWAL EDGE CASES ====================

#[test]
fn test_withdrawal_exact_balance() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,100
withdrawal,alice,USD,100"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "0.0000");
}

#[test]
fn test_withdrawal_exceeds_balance_by_tiny_amount() {
    let (engine, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,100
withdrawal,alice,USD,100.0001"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "100.0000");
    assert_eq!(engine.rejected(), 1);
}

#[test]
fn test_insufficient_funds_keeps_balance() {
    let mut engine = seeded("alice", r#"{"USD":"60"}"#);
    let err = engine
        .apply(&["withdrawal", "alice", "USD", "100"])
        .unwrap_err();

    assert!(matches!(err, WalletError::InsufficientFunds { .. }));
    assert_eq!(engine.wallet("alice").unwrap().get("USD").to_string(), "60.0000");
}

#[test]
fn test_negative_withdrawal_is_not_a_deposit() {
    let mut engine = seeded("alice", r#"{"USD":"20"}"#);
    let err = engine
        .apply(&["withdrawal", "alice", "USD", "-10"])
        .unwrap_err();

    assert!(matches!(err, WalletError::NegativeAmount(_)));
    assert_eq!(engine.wallet("alice").unwrap().get("USD").to_string(), "20.0000");
}

// ==================== BOOTSTRAP RULE ====================

#[test]
fn test_withdrawal_on_new_user_sets_balance() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
withdrawal,alice,USD,30"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "30.0000");
}

#[test]
fn test_withdrawal_after_draining_sets_balance() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,10
withdrawal,alice,USD,10
withdrawal,alice,USD,4"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "4.0000");
}

#[test]
fn test_bootstrap_is_per_currency() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,50
withdrawal,alice,EUR,5"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "50.0000");
    assert_eq!(get_balance(&output, "alice", "EUR").unwrap(), "5.0000");
}

// ==================== REQUEST EDGE CASES ====================

#[test]
fn test_unknown_operation_rejected() {
    let (engine, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,10
chargeback,alice,USD,3"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "10.0000");
    assert_eq!(engine.rejected(), 1);
}

#[test]
fn test_missing_amount_column() {
    let (engine, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD"#,
    );

    assert_eq!(output.lines().count(), 1);
    assert_eq!(engine.rejected(), 1);
}

#[test]
fn test_empty_amount_is_invalid() {
    let mut engine = LedgerEngine::new();
    let err = engine.apply(&["deposit", "alice", "USD", ""]).unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount { .. }));
}

#[test]
fn test_currency_codes_are_case_sensitive() {
    let (_, output) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,1
deposit,alice,usd,2"#,
    );

    assert_eq!(get_balance(&output, "alice", "USD").unwrap(), "1.0000");
    assert_eq!(get_balance(&output, "alice", "usd").unwrap(), "2.0000");
}

// ==================== STORED STATE EDGE CASES ====================

#[test]
fn test_corrupt_stored_state_blocks_updates() {
    let mut engine = seeded("alice", "not json");
    let err = engine.apply(&["deposit", "alice", "USD", "1"]).unwrap_err();

    assert!(matches!(err, WalletError::Decode { .. }));
    assert_eq!(engine.ledger().read_state("alice").unwrap(), b"not json");
}

#[test]
fn test_negative_stored_balance_is_decode_error() {
    let mut engine = seeded("alice", r#"{"USD":"-3"}"#);
    let err = engine.apply(&["deposit", "alice", "USD", "1"]).unwrap_err();
    assert!(matches!(err, WalletError::Decode { .. }));
}

#[test]
fn test_legacy_numeric_state_is_rewritten_as_strings() {
    let mut engine = seeded("alice", r#"{"USD":100,"EUR":2.5}"#);
    engine.apply(&["withdrawal", "alice", "USD", "40"]).unwrap();

    assert_eq!(
        engine.ledger().read_state("alice").unwrap(),
        br#"{"EUR":"2.5000","USD":"60.0000"}"#.to_vec()
    );
}

#[test]
fn test_transaction_ids_skip_rejected_rows() {
    let (engine, _) = run_csv(
        r#"operation,user,currency,amount
deposit,alice,USD,10
withdrawal,alice,USD,50
deposit,alice,USD,5"#,
    );

    let ids: Vec<u64> = engine
        .ledger()
        .transactions()
        .iter()
        .map(|t| t.tx_id)
        .collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(engine.ledger().transactions()[1].record.amount, "5");
}
