//! Ledger access.
//!
//! Defines the `LedgerClient` seam the engine talks to and provides the
//! JSON-RPC implementation used in production. Everything the agent knows
//! about the chain flows through this trait, which keeps the engine
//! testable against in-memory fakes.

pub mod rpc;

use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::types::SweepError;

/// Abstraction over the slice of the Solana RPC surface the sweeper needs.
///
/// Balance reads return raw on-chain amounts; recovery policy (such as the
/// oracle's zero-fallback) belongs to callers, not implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Current SOL balance of `account`, in lamports.
    async fn sol_balance(&self, account: &Pubkey) -> Result<u64, SweepError>;

    /// Addresses of all token accounts holding `mint` for `owner`.
    /// An empty list means the owner has no token account for the mint.
    async fn token_accounts(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<Pubkey>, SweepError>;

    /// Balance of a specific token account, in base units.
    async fn token_account_balance(&self, account: &Pubkey) -> Result<u64, SweepError>;

    /// A fresh recent blockhash to bind a transaction to.
    async fn latest_blockhash(&self) -> Result<Hash, SweepError>;

    /// Submit a signed transaction. With `wait_for_confirmation` the call
    /// returns only once the cluster confirms inclusion; without it the
    /// transaction is fired and trusted to land.
    async fn submit(
        &self,
        tx: &Transaction,
        wait_for_confirmation: bool,
    ) -> Result<Signature, SweepError>;
}
