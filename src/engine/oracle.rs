//! Balance oracle — the read side of a sweep pass.
//!
//! Every query goes straight to the ledger; nothing is cached across
//! passes, since external deposits and our own transfers move the balances
//! between reads.
//!
//! Read failures are logged and surfaced as a zero balance so a flaky RPC
//! node cannot kill a pass. The trade-off, preserved deliberately: a
//! transient failure is indistinguishable from an empty account, so that
//! asset is simply skipped until the next tick re-reads it.

use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ledger::LedgerClient;

pub struct BalanceOracle {
    ledger: Arc<dyn LedgerClient>,
}

impl BalanceOracle {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// SOL balance of `account` in lamports; 0 on read failure.
    pub async fn sol_balance(&self, account: &Pubkey) -> u64 {
        match self.ledger.sol_balance(account).await {
            Ok(lamports) => lamports,
            Err(e) => {
                warn!(error = %e, %account, "SOL balance read failed, treating as zero");
                0
            }
        }
    }

    /// Balance of `owner`'s first token account for `mint`, in base units.
    ///
    /// No token account means a zero balance, not an error; so does any
    /// read failure along the way.
    pub async fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> u64 {
        let accounts = match self.ledger.token_accounts(owner, mint).await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(error = %e, %owner, %mint, "Token account lookup failed, treating as zero");
                return 0;
            }
        };

        let Some(account) = accounts.first() else {
            debug!(%owner, %mint, "No token account for mint");
            return 0;
        };

        match self.ledger.token_account_balance(account).await {
            Ok(amount) => amount,
            Err(e) => {
                warn!(error = %e, %account, "Token balance read failed, treating as zero");
                0
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
