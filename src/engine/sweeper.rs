//! Sweep pass orchestration.
//!
//! One pass = read SOL balance → plan → execute, then read token balance →
//! plan → execute, creating the destination token account on demand. The
//! main loop owns the schedule and the per-pass error boundary; everything
//! in here propagates.

use anyhow::Result;
use chrono::Utc;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::system_instruction;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::engine::assembler::TxAssembler;
use crate::engine::oracle::BalanceOracle;
use crate::engine::planner::TransferPlanner;
use crate::ledger::LedgerClient;
use crate::types::{PassReport, SolSweepPlan, SweepError, TokenDestination, TokenSweepPlan};

/// Attempts when polling for a freshly created destination token account.
const SETUP_POLL_ATTEMPTS: u32 = 10;
/// Delay between poll attempts.
const SETUP_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct Sweeper {
    ledger: Arc<dyn LedgerClient>,
    oracle: BalanceOracle,
    planner: TransferPlanner,
    assembler: TxAssembler,
    owner: Pubkey,
    destination: Pubkey,
    token_mint: Pubkey,
    token_decimals: u8,
    fee_reserve: u64,
    dry_run: bool,
    pass_count: u64,
}

impl Sweeper {
    pub fn new(ledger: Arc<dyn LedgerClient>, keypair: Arc<Keypair>, cfg: &Config) -> Self {
        Self {
            oracle: BalanceOracle::new(ledger.clone()),
            planner: TransferPlanner::new(ledger.clone()),
            assembler: TxAssembler::new(ledger.clone(), keypair.clone()),
            owner: keypair.pubkey(),
            destination: cfg.destination,
            token_mint: cfg.token_mint,
            token_decimals: cfg.token_decimals,
            fee_reserve: cfg.fee_reserve_lamports,
            dry_run: cfg.dry_run,
            ledger,
            pass_count: 0,
        }
    }

    /// Execute one full sweep pass: SOL first, then the token. Errors
    /// propagate to the caller, which logs them and waits for the next tick.
    pub async fn run_pass(&mut self) -> Result<PassReport> {
        self.pass_count += 1;
        let mut report = PassReport::new(self.pass_count);

        info!(pass = self.pass_count, "Starting sweep pass");

        // 1. SOL: sweep everything above the fee reserve.
        report.sol_balance = self.oracle.sol_balance(&self.owner).await;
        info!(lamports = report.sol_balance, "SOL balance");

        if let Some(plan) =
            TransferPlanner::plan_sol(self.destination, report.sol_balance, self.fee_reserve)
        {
            self.execute_sol(&plan, &mut report).await?;
        }

        // 2. Token: sweep the full balance, bootstrapping the destination
        //    token account when it doesn't exist yet.
        report.token_balance = self
            .oracle
            .token_balance(&self.owner, &self.token_mint)
            .await;
        info!(amount = report.token_balance, mint = %self.token_mint, "Token balance");

        if let Some(plan) = self
            .planner
            .plan_token(
                &self.owner,
                &self.destination,
                &self.token_mint,
                report.token_balance,
            )
            .await?
        {
            self.execute_token(plan, &mut report).await?;
        }

        report.timestamp = Utc::now();
        info!(pass = self.pass_count, "Sweep pass complete");
        Ok(report)
    }

    async fn execute_sol(
        &self,
        plan: &SolSweepPlan,
        report: &mut PassReport,
    ) -> Result<(), SweepError> {
        if self.dry_run {
            info!(
                lamports = plan.amount,
                destination = %plan.destination,
                "[DRY RUN] Would sweep SOL"
            );
            report.sol_swept = Some(plan.amount);
            return Ok(());
        }

        let ix = system_instruction::transfer(&self.owner, &plan.destination, plan.amount);
        let signature = self.assembler.submit(&[ix], true).await?;

        info!(lamports = plan.amount, %signature, "SOL sweep confirmed");
        report.sol_swept = Some(plan.amount);
        report.signatures.push(signature.to_string());
        Ok(())
    }

    async fn execute_token(
        &self,
        plan: TokenSweepPlan,
        report: &mut PassReport,
    ) -> Result<(), SweepError> {
        if self.dry_run {
            info!(
                amount = plan.amount,
                mint = %plan.mint,
                needs_setup = plan.needs_setup(),
                "[DRY RUN] Would sweep tokens"
            );
            report.tokens_swept = Some(plan.amount);
            return Ok(());
        }

        let destination_account = match plan.destination {
            TokenDestination::Existing(account) => account,
            TokenDestination::CreateFor { owner } => {
                self.create_destination_account(&owner, &plan.mint, report)
                    .await?
            }
        };

        let ix = spl_token::instruction::transfer_checked(
            &spl_token::id(),
            &plan.source,
            &plan.mint,
            &destination_account,
            &self.owner,
            &[],
            plan.amount,
            self.token_decimals,
        )
        .map_err(|e| SweepError::Submission(format!("transfer_checked encoding failed: {e}")))?;

        let signature = self.assembler.submit(&[ix], true).await?;

        info!(amount = plan.amount, %signature, "Token sweep confirmed");
        report.tokens_swept = Some(plan.amount);
        report.signatures.push(signature.to_string());
        Ok(())
    }

    /// Create the destination's associated token account, then poll the
    /// lookup until the new account is visible.
    ///
    /// The creation is submitted without waiting for confirmation, but the
    /// dependent transfer must not run until the account actually exists —
    /// hence the bounded poll before returning its address.
    async fn create_destination_account(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
        report: &mut PassReport,
    ) -> Result<Pubkey, SweepError> {
        let ix = spl_associated_token_account::instruction::create_associated_token_account(
            &self.owner,
            owner,
            mint,
            &spl_token::id(),
        );
        let signature = self.assembler.submit(&[ix], false).await?;

        info!(%owner, %mint, %signature, "Creating destination token account");
        report.signatures.push(signature.to_string());

        for attempt in 1..=SETUP_POLL_ATTEMPTS {
            if let Some(account) = self
                .ledger
                .token_accounts(owner, mint)
                .await?
                .into_iter()
                .next()
            {
                info!(%account, attempt, "Destination token account visible");
                return Ok(account);
            }
            tokio::time::sleep(SETUP_POLL_INTERVAL).await;
        }

        Err(SweepError::Submission(format!(
            "created token account for {owner} never appeared after {SETUP_POLL_ATTEMPTS} lookups"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
