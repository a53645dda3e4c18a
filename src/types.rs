//! Core domain types shared across the sweep engine.
//!
//! Plans are decision records: produced fresh by the planner from balances
//! observed this pass, consumed by the sweeper, and discarded. Nothing in
//! this module survives across passes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use std::fmt;

// ---------------------------------------------------------------------------
// Sweep plans
// ---------------------------------------------------------------------------

/// Planned SOL transfer: everything above the fee reserve goes to the
/// destination wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolSweepPlan {
    pub destination: Pubkey,
    /// Amount in lamports — the observed balance minus the fee reserve.
    pub amount: u64,
}

/// Where a token sweep lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenDestination {
    /// The destination wallet already holds a token account for the mint.
    Existing(Pubkey),
    /// No token account exists yet: the associated token account for
    /// `owner` must be created (payer = sweeping account) before the
    /// transfer can run.
    CreateFor { owner: Pubkey },
}

/// Planned SPL token transfer of the full observed balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSweepPlan {
    pub mint: Pubkey,
    /// Source token account owned by the sweeping wallet.
    pub source: Pubkey,
    pub destination: TokenDestination,
    /// Amount in token base units — the full balance at plan time.
    pub amount: u64,
}

impl TokenSweepPlan {
    /// Whether executing this plan requires creating the destination token
    /// account first.
    pub fn needs_setup(&self) -> bool {
        matches!(self.destination, TokenDestination::CreateFor { .. })
    }
}

// ---------------------------------------------------------------------------
// Pass report
// ---------------------------------------------------------------------------

/// Summary of a single sweep pass, logged by the main loop.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub pass_number: u64,
    /// SOL balance observed at the start of the pass, in lamports.
    pub sol_balance: u64,
    /// Token balance observed during the pass, in base units.
    pub token_balance: u64,
    /// Lamports swept, if a SOL transfer was submitted.
    pub sol_swept: Option<u64>,
    /// Token base units swept, if a token transfer was submitted.
    pub tokens_swept: Option<u64>,
    /// Signatures of every transaction submitted this pass, in order.
    pub signatures: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl PassReport {
    pub fn new(pass_number: u64) -> Self {
        Self {
            pass_number,
            sol_balance: 0,
            token_balance: 0,
            sol_swept: None,
            tokens_swept: None,
            signatures: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pass #{}: sol_balance={} token_balance={} sol_swept={} tokens_swept={} txs={}",
            self.pass_number,
            self.sol_balance,
            self.token_balance,
            self.sol_swept.unwrap_or(0),
            self.tokens_swept.unwrap_or(0),
            self.signatures.len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the sweep agent.
///
/// Recovery policy lives in two places only: the balance oracle turns
/// `LedgerRead` failures from balance queries into zero balances, and the
/// main loop logs whatever reaches the pass boundary and moves on. Nothing
/// in between suppresses errors.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// A balance, token-account, or blockhash read failed at the RPC layer.
    #[error("Ledger read failed ({what}): {message}")]
    LedgerRead { what: String, message: String },

    /// A transaction was rejected, its blockhash expired, or its effect
    /// never became visible (e.g. a created token account that never
    /// appeared in the lookup).
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Missing or malformed configuration. Fatal, raised once at startup.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SweepError {
    /// A `LedgerRead` naming the RPC operation that failed.
    pub fn read(what: impl Into<String>, err: impl fmt::Display) -> Self {
        Self::LedgerRead {
            what: what.into(),
            message: err.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
