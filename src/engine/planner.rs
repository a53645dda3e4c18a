//! Transfer planner — decides what, if anything, moves this pass.
//!
//! Pure decision logic over freshly observed balances: at most one SOL plan
//! and one token plan per pass. Unlike the oracle, the planner never
//! recovers errors — a failed token-account lookup here propagates straight
//! to the pass boundary.

use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::debug;

use crate::ledger::LedgerClient;
use crate::types::{SolSweepPlan, SweepError, TokenDestination, TokenSweepPlan};

pub struct TransferPlanner {
    ledger: Arc<dyn LedgerClient>,
}

impl TransferPlanner {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Plan a SOL sweep.
    ///
    /// Emits a plan only when the balance strictly exceeds the fee reserve;
    /// the amount leaves exactly the reserve behind, never the full balance.
    pub fn plan_sol(destination: Pubkey, balance: u64, fee_reserve: u64) -> Option<SolSweepPlan> {
        if balance <= fee_reserve {
            return None;
        }
        Some(SolSweepPlan {
            destination,
            amount: balance - fee_reserve,
        })
    }

    /// Plan a token sweep of the full observed balance.
    ///
    /// Resolves the source token account — which must exist when the balance
    /// is nonzero, so a missing one is an error, not a no-op — and the
    /// destination's token account for the mint. When the destination has
    /// none, the plan carries the create-account prerequisite (payer = the
    /// sweeping account).
    pub async fn plan_token(
        &self,
        owner: &Pubkey,
        destination: &Pubkey,
        mint: &Pubkey,
        balance: u64,
    ) -> Result<Option<TokenSweepPlan>, SweepError> {
        if balance == 0 {
            return Ok(None);
        }

        let source = self
            .ledger
            .token_accounts(owner, mint)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                SweepError::read(
                    "get_token_accounts_by_owner",
                    format!("no source token account for mint {mint} despite balance {balance}"),
                )
            })?;

        let destination = match self
            .ledger
            .token_accounts(destination, mint)
            .await?
            .into_iter()
            .next()
        {
            Some(account) => TokenDestination::Existing(account),
            None => {
                debug!(%destination, %mint, "Destination has no token account for mint yet");
                TokenDestination::CreateFor {
                    owner: *destination,
                }
            }
        };

        Ok(Some(TokenSweepPlan {
            mint: *mint,
            source,
            destination,
            amount: balance,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
