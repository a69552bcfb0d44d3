// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Blockchain Core: Transaction Wire Format
//!
//! Everything a node needs to move transactions between memory, the wire
//! and storage, and to name them by hash.
//!
//! ## Architecture
//!
//! - **encoding**: Varints, varstrs and extensible blocks. Every other
//!   encoder is built from these.
//! - **crypto**: Pooled SHA3-256 hashing, Merkle roots, and the opaque
//!   excess commitments of confidential transactions.
//! - **transaction**: The data model, the flag-gated codec, identity,
//!   witness, issuance and signature hashes, plus hex and serde adapters.
//! - **error**: One error type for all of the above, with positional
//!   context ("reading input 3: reading arguments: truncated input").
//! - **config**: Wire constants: flag bits, version numbers, limits.
//!
//! ## Design Philosophy
//!
//! 1. Decoding is strict. Lengths are bounded by the input, varints must be
//!    minimal, and extensible blocks may only grow where the format says so.
//! 2. Encoding a decoded transaction gives back the same bytes.
//! 3. Hashing never allocates a fresh hash state when a pooled one is free.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nova_bc::transaction::Transaction;
//!
//! let tx: Transaction = "07...".parse()?;
//! println!("{} {}", tx.hash(), tx.witness_hash());
//! # Ok::<(), nova_bc::Error>(())
//! ```

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod transaction;

pub use error::{Error, ErrorKind, Result};
