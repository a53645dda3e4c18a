//! Configuration loading from environment variables.
//!
//! All settings come from the process environment (the binary loads a `.env`
//! file first if one is present). The secret key is required and the process
//! fails fast without it; everything else has a compiled-in default. The
//! resulting `Config` is immutable and shared by reference for the process
//! lifetime — there is no mutable global state.

use secrecy::{ExposeSecret, SecretString};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::types::SweepError;

/// Public RPC endpoint used when `RPC_URL` is not set.
const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Default destination wallet for swept funds.
const DEFAULT_DESTINATION: &str = "7R28vXEVvp3qrKV5Ba7Ba9UbKsjBkrxNc5qDz33E8b51";

/// Default SPL token mint watched by the sweeper.
const DEFAULT_TOKEN_MINT: &str = "CwbpyHPZJ133hgWQvd1hZA4ZxjQu3mL7WRxEhmqQYkCB";

/// Lamports withheld from every SOL sweep so the account can keep paying
/// its own transaction fees (0.000005 SOL).
const DEFAULT_FEE_RESERVE_LAMPORTS: u64 = 5_000;

/// Seconds between balance scans.
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 5;

/// Decimals passed to `transfer_checked` for the watched mint.
const DEFAULT_TOKEN_DECIMALS: u8 = 9;

/// Immutable process-wide configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base58-encoded secret key of the sweeping account. Never logged;
    /// exposed only inside [`Config::keypair`].
    pub secret_key: SecretString,
    pub rpc_url: String,
    pub destination: Pubkey,
    pub token_mint: Pubkey,
    pub token_decimals: u8,
    pub fee_reserve_lamports: u64,
    pub scan_interval_secs: u64,
    /// When set, plans are logged but nothing is submitted.
    pub dry_run: bool,
}

impl Config {
    /// Read configuration from the environment. Fails fast when the secret
    /// key is absent or any override is malformed.
    pub fn from_env() -> Result<Self, SweepError> {
        let secret_key: SecretString = SecretString::new(
            env::var("SOLANA_PRIVATE_KEY").map_err(|_| {
                SweepError::Config(
                    "SOLANA_PRIVATE_KEY must be set (base58 secret key of the sweeping account)"
                        .to_string(),
                )
            })?,
        );

        Ok(Self {
            secret_key,
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            destination: pubkey_var("DESTINATION_ADDRESS", DEFAULT_DESTINATION)?,
            token_mint: pubkey_var("TOKEN_MINT", DEFAULT_TOKEN_MINT)?,
            token_decimals: parsed_var("TOKEN_DECIMALS", DEFAULT_TOKEN_DECIMALS)?,
            fee_reserve_lamports: parsed_var("FEE_RESERVE_LAMPORTS", DEFAULT_FEE_RESERVE_LAMPORTS)?,
            scan_interval_secs: parsed_var("SCAN_INTERVAL", DEFAULT_SCAN_INTERVAL_SECS)?,
            dry_run: env::var("DRY_RUN").is_ok(),
        })
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Construct the sweeping keypair from the configured secret key.
    /// The only place the secret material leaves its wrapper.
    pub fn keypair(&self) -> Result<Keypair, SweepError> {
        let bytes = bs58::decode(self.secret_key.expose_secret())
            .into_vec()
            .map_err(|_| {
                SweepError::Config("SOLANA_PRIVATE_KEY is not valid base58".to_string())
            })?;
        Keypair::from_bytes(&bytes).map_err(|_| {
            SweepError::Config("SOLANA_PRIVATE_KEY does not decode to a valid keypair".to_string())
        })
    }
}

/// Read an env var holding a Solana address, falling back to `default`.
fn pubkey_var(name: &str, default: &str) -> Result<Pubkey, SweepError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    Pubkey::from_str(&raw)
        .map_err(|e| SweepError::Config(format!("{name} is not a valid address ({raw}): {e}")))
}

/// Read and parse an env var, falling back to `default` when unset.
fn parsed_var<T: FromStr>(name: &str, default: T) -> Result<T, SweepError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| SweepError::Config(format!("{name} is invalid ({raw}): {e}"))),
        Err(_) => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
