//! # CLI Interface
//!
//! Defines the command-line argument structure for `nova-txtool` using
//! `clap` derive. Every subcommand takes a hex-encoded transaction, or `-`
//! to read it from stdin.

use clap::{Args, Parser, Subcommand};

/// Decode NOVA transactions and print their hashes.
#[derive(Parser, Debug)]
#[command(
    name = "nova-txtool",
    about = "Decode NOVA transactions and print their hashes",
    version,
    propagate_version = true
)]
pub struct TxToolCli {
    /// Default log filter. `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, env = "NOVA_LOG", default_value = "warn")]
    pub log: String,

    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "NOVA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a transaction and print a JSON summary.
    Decode(TxArgs),
    /// Print the identity, witness and common-witness hashes.
    Hashes(TxArgs),
    /// Print the signature hash of one input.
    Sighash(InputArgs),
    /// Print the issuance hash of one issuance input.
    IssuanceHash(InputArgs),
    /// Print version information and exit.
    Version,
}

/// A transaction to operate on.
#[derive(Args, Debug)]
pub struct TxArgs {
    /// Hex-encoded transaction, or `-` for stdin.
    pub tx: String,
}

/// A transaction and one of its inputs.
#[derive(Args, Debug)]
pub struct InputArgs {
    #[command(flatten)]
    pub tx: TxArgs,

    /// Zero-based input index.
    #[arg(long, short = 'i')]
    pub input: usize,
}
