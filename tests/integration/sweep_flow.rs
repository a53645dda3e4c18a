//! End-to-end sweep pass tests against the in-memory mock ledger.
//!
//! Each test wires a real `Sweeper` to a `MockLedger`, runs passes, and
//! asserts on both the pass reports and the resulting ledger state.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use std::sync::Arc;

use solsweep::config::Config;
use solsweep::engine::sweeper::Sweeper;

use crate::mock_ledger::MockLedger;

const FEE_RESERVE: u64 = 5_000;

struct Harness {
    ledger: Arc<MockLedger>,
    sweeper: Sweeper,
    owner: Pubkey,
    destination: Pubkey,
    mint: Pubkey,
}

fn harness(initial_sol: u64, dry_run: bool) -> Harness {
    let keypair = Arc::new(Keypair::new());
    let owner = keypair.pubkey();
    let destination = Pubkey::new_unique();
    let mint = Pubkey::new_unique();

    let cfg = Config {
        secret_key: secrecy::SecretString::new("unused".to_string()),
        rpc_url: "http://localhost:8899".to_string(),
        destination,
        token_mint: mint,
        token_decimals: 9,
        fee_reserve_lamports: FEE_RESERVE,
        scan_interval_secs: 5,
        dry_run,
    };

    let ledger = Arc::new(MockLedger::new(initial_sol));
    let sweeper = Sweeper::new(ledger.clone(), keypair, &cfg);

    Harness {
        ledger,
        sweeper,
        owner,
        destination,
        mint,
    }
}

#[tokio::test]
async fn test_sol_sweep_leaves_exactly_the_reserve() {
    let mut h = harness(1_000_000_000, false);

    let report = h.sweeper.run_pass().await.unwrap();

    assert_eq!(report.sol_balance, 1_000_000_000);
    assert_eq!(report.sol_swept, Some(999_995_000));
    assert_eq!(h.ledger.sol_balance_now(), FEE_RESERVE);

    let submissions = h.ledger.submissions();
    assert_eq!(submissions.len(), 1);
    assert!(submissions[0].wait_for_confirmation);
    assert_eq!(
        submissions[0].program_id(),
        solana_sdk::system_program::id()
    );
}

#[tokio::test]
async fn test_no_sol_sweep_at_or_below_reserve() {
    let mut h = harness(FEE_RESERVE, false);

    let report = h.sweeper.run_pass().await.unwrap();

    assert_eq!(report.sol_swept, None);
    assert!(h.ledger.submissions().is_empty());
    assert_eq!(h.ledger.sol_balance_now(), FEE_RESERVE);
}

#[tokio::test]
async fn test_token_sweep_to_existing_destination_moves_full_balance() {
    let mut h = harness(0, false);
    let source_ata = Pubkey::new_unique();
    let dest_ata = Pubkey::new_unique();
    h.ledger.add_token_account(h.owner, h.mint, source_ata, 42);
    h.ledger
        .add_token_account(h.destination, h.mint, dest_ata, 0);

    let report = h.sweeper.run_pass().await.unwrap();

    assert_eq!(report.token_balance, 42);
    assert_eq!(report.tokens_swept, Some(42));
    assert_eq!(h.ledger.token_balance_of(&source_ata), 0);
    assert_eq!(h.ledger.token_balance_of(&dest_ata), 42);

    let submissions = h.ledger.submissions();
    assert_eq!(submissions.len(), 1);
    assert!(submissions[0].wait_for_confirmation);
    assert_eq!(submissions[0].program_id(), spl_token::id());
}

#[tokio::test]
async fn test_token_sweep_creates_missing_destination_account_first() {
    let mut h = harness(0, false);
    let source_ata = Pubkey::new_unique();
    h.ledger.add_token_account(h.owner, h.mint, source_ata, 42);
    // The destination has no token account for the mint.

    let report = h.sweeper.run_pass().await.unwrap();

    assert_eq!(report.tokens_swept, Some(42));

    // Creation precedes the transfer; only the transfer waits.
    let submissions = h.ledger.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(
        submissions[0].program_id(),
        spl_associated_token_account::id()
    );
    assert!(!submissions[0].wait_for_confirmation);
    assert_eq!(submissions[1].program_id(), spl_token::id());
    assert!(submissions[1].wait_for_confirmation);

    // The created account now custodies the full swept balance.
    let dest_accounts = h.ledger.token_accounts_of(&h.destination, &h.mint);
    assert_eq!(dest_accounts.len(), 1);
    assert_eq!(h.ledger.token_balance_of(&dest_accounts[0]), 42);
    assert_eq!(h.ledger.token_balance_of(&source_ata), 0);
}

#[tokio::test]
async fn test_second_pass_is_idempotent() {
    let mut h = harness(1_000_000_000, false);
    let source_ata = Pubkey::new_unique();
    let dest_ata = Pubkey::new_unique();
    h.ledger.add_token_account(h.owner, h.mint, source_ata, 42);
    h.ledger
        .add_token_account(h.destination, h.mint, dest_ata, 0);

    let first = h.sweeper.run_pass().await.unwrap();
    assert_eq!(first.sol_swept, Some(999_995_000));
    assert_eq!(first.tokens_swept, Some(42));
    assert_eq!(h.ledger.submissions().len(), 2);

    // No deposits in between: the second pass finds nothing to do.
    let second = h.sweeper.run_pass().await.unwrap();
    assert_eq!(second.pass_number, 2);
    assert_eq!(second.sol_balance, FEE_RESERVE);
    assert_eq!(second.token_balance, 0);
    assert_eq!(second.sol_swept, None);
    assert_eq!(second.tokens_swept, None);
    assert_eq!(h.ledger.submissions().len(), 2);
}

#[tokio::test]
async fn test_zero_balances_pass_does_nothing() {
    let mut h = harness(0, false);

    let report = h.sweeper.run_pass().await.unwrap();

    assert_eq!(report.sol_balance, 0);
    assert_eq!(report.token_balance, 0);
    assert_eq!(report.sol_swept, None);
    assert_eq!(report.tokens_swept, None);
    assert!(h.ledger.submissions().is_empty());
}

#[tokio::test]
async fn test_read_failures_are_recovered_as_empty_pass() {
    let mut h = harness(1_000_000_000, false);
    h.ledger.set_error("simulated RPC outage");

    // Balance reads fail → the oracle reports zeros → nothing is planned,
    // and the pass still completes.
    let report = h.sweeper.run_pass().await.unwrap();

    assert_eq!(report.sol_balance, 0);
    assert_eq!(report.token_balance, 0);
    assert!(h.ledger.submissions().is_empty());

    // Once the ledger recovers, the next pass sweeps what the failed pass
    // skipped.
    h.ledger.clear_error();
    let report = h.sweeper.run_pass().await.unwrap();
    assert_eq!(report.sol_swept, Some(999_995_000));
}

#[tokio::test]
async fn test_submission_failure_fails_the_pass_but_not_the_next() {
    let mut h = harness(1_000_000_000, false);
    h.ledger.fail_submissions("node rejected transaction");

    // The failure propagates past the sweeper — the loop's pass boundary
    // is what logs and continues.
    assert!(h.sweeper.run_pass().await.is_err());
    assert!(h.ledger.submissions().is_empty());

    h.ledger.clear_submission_failure();
    let report = h.sweeper.run_pass().await.unwrap();
    assert_eq!(report.pass_number, 2);
    assert_eq!(report.sol_swept, Some(999_995_000));
    assert_eq!(h.ledger.sol_balance_now(), FEE_RESERVE);
}

#[tokio::test]
async fn test_dry_run_plans_but_never_submits() {
    let mut h = harness(1_000_000_000, true);
    let source_ata = Pubkey::new_unique();
    h.ledger.add_token_account(h.owner, h.mint, source_ata, 42);

    let report = h.sweeper.run_pass().await.unwrap();

    assert_eq!(report.sol_swept, Some(999_995_000));
    assert_eq!(report.tokens_swept, Some(42));
    assert!(report.signatures.is_empty());
    assert!(h.ledger.submissions().is_empty());

    // Nothing moved.
    assert_eq!(h.ledger.sol_balance_now(), 1_000_000_000);
    assert_eq!(h.ledger.token_balance_of(&source_ata), 42);
}
