//! SOLSWEEP — Unattended Solana Account Sweep Agent
//!
//! Entry point. Loads configuration from the environment, initialises
//! structured logging, wires the ledger client and engine together, and
//! drives the sweep loop: one pass per tick, every failure contained to
//! its own pass.

use anyhow::Result;
use solana_sdk::signature::Signer;
use std::sync::Arc;
use tracing::{error, info};

use solsweep::config::Config;
use solsweep::engine::sweeper::Sweeper;
use solsweep::ledger::rpc::RpcLedger;
use solsweep::types::PassReport;

const BANNER: &str = r#"
 ____   ___  _     ______        _______ _____ ____
/ ___| / _ \| |   / ___\ \      / / ____| ____|  _ \
\___ \| | | | |   \___ \\ \ /\ / /|  _| |  _| | |_) |
 ___) | |_| | |___ ___) |\ V  V / | |___| |___|  __/
|____/ \___/|_____|____/  \_/\_/  |_____|_____|_|

  Unattended Account Sweep Agent
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Fail fast: nothing runs without a usable key.
    let cfg = Config::from_env()?;
    let keypair = Arc::new(cfg.keypair()?);

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        account = %keypair.pubkey(),
        destination = %cfg.destination,
        mint = %cfg.token_mint,
        scan_interval_secs = cfg.scan_interval_secs,
        fee_reserve_lamports = cfg.fee_reserve_lamports,
        dry_run = cfg.dry_run,
        "SOLSWEEP starting up"
    );

    // -- Initialise components -------------------------------------------

    let ledger = Arc::new(RpcLedger::new(cfg.rpc_url.clone()));
    let mut sweeper = Sweeper::new(ledger, keypair, &cfg);

    // -- Main loop -------------------------------------------------------

    let mut interval = tokio::time::interval(cfg.scan_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.scan_interval_secs,
        "Entering sweep loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // The pass boundary: whatever goes wrong in a pass is
                // logged here and the loop waits for the next tick.
                match sweeper.run_pass().await {
                    Ok(report) => log_pass_report(&report),
                    Err(e) => {
                        error!(error = %e, "Sweep pass failed — continuing to next tick");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!("SOLSWEEP shut down cleanly.");
    Ok(())
}

/// Log a one-line pass summary.
fn log_pass_report(report: &PassReport) {
    info!(
        pass = report.pass_number,
        sol_balance = report.sol_balance,
        token_balance = report.token_balance,
        sol_swept = ?report.sol_swept,
        tokens_swept = ?report.tokens_swept,
        submissions = report.signatures.len(),
        "Pass complete"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("solsweep=info"));

    if std::env::var("SOLSWEEP_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
