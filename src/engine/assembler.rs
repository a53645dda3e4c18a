//! Transaction assembler — binds instructions to a fresh recent blockhash,
//! signs with the sweeping keypair, and submits through the ledger seam.

use solana_sdk::instruction::Instruction;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use std::sync::Arc;
use tracing::debug;

use crate::ledger::LedgerClient;
use crate::types::SweepError;

pub struct TxAssembler {
    ledger: Arc<dyn LedgerClient>,
    keypair: Arc<Keypair>,
}

impl TxAssembler {
    pub fn new(ledger: Arc<dyn LedgerClient>, keypair: Arc<Keypair>) -> Self {
        Self { ledger, keypair }
    }

    /// Build and sign a transaction around `instructions`, fee payer = the
    /// sweeping account.
    ///
    /// Fetches a fresh blockhash on every call: blockhashes expire, so one
    /// must never be reused across steps separated by network round-trips.
    pub async fn build(&self, instructions: &[Instruction]) -> Result<Transaction, SweepError> {
        let blockhash = self.ledger.latest_blockhash().await?;
        debug!(%blockhash, instructions = instructions.len(), "Building transaction");

        Ok(Transaction::new_signed_with_payer(
            instructions,
            Some(&self.keypair.pubkey()),
            &[self.keypair.as_ref()],
            blockhash,
        ))
    }

    /// Build, sign, and submit in one step.
    pub async fn submit(
        &self,
        instructions: &[Instruction],
        wait_for_confirmation: bool,
    ) -> Result<Signature, SweepError> {
        let tx = self.build(instructions).await?;
        self.ledger.submit(&tx, wait_for_confirmation).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
