//! Solana JSON-RPC implementation of [`LedgerClient`].
//!
//! A thin mapping onto `solana_client`'s nonblocking `RpcClient` at
//! confirmed commitment. Errors are wrapped into `SweepError` with the
//! failing RPC operation named, so the log stream shows what was being
//! read when a node misbehaves.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::str::FromStr;

use super::LedgerClient;
use crate::types::SweepError;

/// JSON-RPC ledger client at confirmed commitment.
pub struct RpcLedger {
    client: RpcClient,
}

impl RpcLedger {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            client: RpcClient::new_with_commitment(
                rpc_url.into(),
                CommitmentConfig::confirmed(),
            ),
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn sol_balance(&self, account: &Pubkey) -> Result<u64, SweepError> {
        self.client
            .get_balance(account)
            .await
            .map_err(|e| SweepError::read("get_balance", e))
    }

    async fn token_accounts(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<Pubkey>, SweepError> {
        let accounts = self
            .client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*mint))
            .await
            .map_err(|e| SweepError::read("get_token_accounts_by_owner", e))?;

        accounts
            .into_iter()
            .map(|keyed| {
                Pubkey::from_str(&keyed.pubkey)
                    .map_err(|e| SweepError::read("get_token_accounts_by_owner", e))
            })
            .collect()
    }

    async fn token_account_balance(&self, account: &Pubkey) -> Result<u64, SweepError> {
        let balance = self
            .client
            .get_token_account_balance(account)
            .await
            .map_err(|e| SweepError::read("get_token_account_balance", e))?;

        // The RPC reports base units as a decimal string.
        balance
            .amount
            .parse::<u64>()
            .map_err(|e| SweepError::read("get_token_account_balance", e))
    }

    async fn latest_blockhash(&self) -> Result<Hash, SweepError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| SweepError::read("get_latest_blockhash", e))
    }

    async fn submit(
        &self,
        tx: &Transaction,
        wait_for_confirmation: bool,
    ) -> Result<Signature, SweepError> {
        let result = if wait_for_confirmation {
            self.client.send_and_confirm_transaction(tx).await
        } else {
            self.client.send_transaction(tx).await
        };

        result.map_err(|e| SweepError::Submission(e.to_string()))
    }
}
