// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Transaction Tool
//!
//! Entry point for the `nova-txtool` binary. Parses CLI arguments,
//! initializes logging, decodes the given transaction and prints what was
//! asked for on stdout.
//!
//! - `decode`: JSON summary of the transaction
//! - `hashes`: identity, witness and common-witness hashes
//! - `sighash`: signature hash of one input
//! - `issuance-hash`: issuance hash of one issuance input
//! - `version`: print build version information

mod cli;
mod logging;
mod summary;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use nova_bc::transaction::Transaction;

use cli::{Commands, TxArgs, TxToolCli};
use logging::LogFormat;
use summary::TxSummary;

fn main() -> Result<()> {
    let cli = TxToolCli::parse();
    logging::init_logging(&cli.log, LogFormat::from_str_lossy(&cli.log_format));

    match cli.command {
        Commands::Decode(args) => {
            let tx = load(&args)?;
            let json = serde_json::to_string_pretty(&TxSummary::new(&tx))?;
            println!("{json}");
        }
        Commands::Hashes(args) => {
            let tx = load(&args)?;
            println!("hash                 {}", tx.hash());
            println!("witness_hash         {}", tx.witness_hash());
            println!("common_witness_hash  {}", tx.common_witness_hash());
        }
        Commands::Sighash(args) => {
            let tx = load(&args.tx)?;
            let hash = tx
                .signature_hash(args.input)
                .with_context(|| format!("computing signature hash of input {}", args.input))?;
            println!("{hash}");
        }
        Commands::IssuanceHash(args) => {
            let tx = load(&args.tx)?;
            let hash = tx
                .issuance_hash(args.input)
                .with_context(|| format!("computing issuance hash of input {}", args.input))?;
            println!("{hash}");
        }
        Commands::Version => print_version(),
    }
    Ok(())
}

/// Reads the transaction text from the argument or stdin and decodes it.
fn load(args: &TxArgs) -> Result<Transaction> {
    let text = if args.tx == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read transaction from stdin")?;
        buf
    } else {
        args.tx.clone()
    };

    let tx = Transaction::from_hex(text.trim()).context("failed to decode transaction")?;
    tracing::info!(hash = %tx.hash(), inputs = tx.inputs.len(), outputs = tx.outputs.len(), "transaction loaded");
    Ok(tx)
}

fn print_version() {
    println!(
        "nova-txtool {} (transaction version {})",
        env!("CARGO_PKG_VERSION"),
        nova_bc::config::CURRENT_TRANSACTION_VERSION,
    );
}
