//! # Transaction Module
//!
//! The transaction data model, its wire codec, and every hash derived from
//! it.
//!
//! ## Architecture
//!
//! ```text
//! types.rs     AssetId, AssetAmount, descriptors, AssetValue, Outpoint
//! output.rs    OutputCommitment and TxOutput
//! input.rs     Issuance, Spend and TxInput
//! data.rs      SerFlags, TxVersion, TransactionData, Transaction; codec
//! hashing.rs   identity, witness, common witness and issuance hashes; tx_root
//! sighash.rs   SigHasher and per-input signature hashes
//! builder.rs   TransactionBuilder
//! text.rs      hex, storage and serde adapters
//! ```
//!
//! ## Versions
//!
//! | Version | Adds |
//! |---------|------|
//! | 1 | explicit assets, min/max time |
//! | 2 | confidential asset values, range proofs, excess commitments |
//!
//! Unknown versions decode as [`TxVersion::Future`]: common fields are read
//! permissively and the common witness is ignored, so a node can relay
//! transactions it cannot fully interpret.
//!
//! ## Hashes
//!
//! The identity hash ([`TransactionData::hash`]) leaves out input and
//! output witnesses. The witness hash ([`TransactionData::witness_hash`]) commits to
//! everything. Blocks commit to transactions by witness hash through
//! [`tx_root`].

pub mod builder;
pub mod data;
pub mod hashing;
pub mod input;
pub mod output;
pub mod sighash;
pub mod text;
pub mod types;

pub use builder::TransactionBuilder;
pub use data::{FutureVersion, SerFlags, Transaction, TransactionData, TxVersion};
pub use hashing::tx_root;
pub use input::{InputBody, Issuance, Spend, TxInput};
pub use output::{OutputCommitment, OutputKind, TxOutput};
pub use sighash::SigHasher;
pub use types::{AssetAmount, AssetDescriptor, AssetId, AssetValue, Outpoint, ValueDescriptor};
