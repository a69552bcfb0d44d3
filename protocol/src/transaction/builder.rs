//! Transaction construction via the builder pattern.
//!
//! [`TransactionBuilder`] collects inputs, outputs and the common fields,
//! then checks the version rules once in `.build()`. The result is plain
//! [`TransactionData`], or a [`Transaction`] with its identity hash
//! already computed.
//!
//! The builder does not sign. Signature hashes come from
//! [`super::sighash::SigHasher`] once the transaction is built.

use super::data::{Transaction, TransactionData, TxVersion};
use super::input::{Issuance, TxInput};
use super::output::{OutputCommitment, TxOutput};
use super::types::Outpoint;
use crate::config::CURRENT_TRANSACTION_VERSION;
use crate::crypto::commitment::ExcessCommitment;
use crate::error::{Error, Result};

/// Fluent builder for [`TransactionData`].
///
/// # Usage
///
/// ```rust,no_run
/// use nova_bc::crypto::Hash;
/// use nova_bc::transaction::{AssetAmount, AssetValue, Issuance, TransactionBuilder, TxOutput};
///
/// let issuance = Issuance::new(
///     vec![1, 2, 3, 4, 5, 6, 7, 8],
///     AssetValue::Explicit(AssetAmount::new(Default::default(), 100)),
///     Hash::ZERO,
///     vec![0x51],
/// );
/// let asset = issuance.computed_asset_id();
///
/// let tx = TransactionBuilder::new()
///     .issue(issuance, vec![])
///     .output(TxOutput::explicit(asset, 100, vec![0x51]))
///     .time_range(1_700_000_000_000, 1_700_000_600_000)
///     .build()
///     .unwrap();
/// ```
///
/// The version defaults to [`CURRENT_TRANSACTION_VERSION`].
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    version: u64,
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
    excess_commitments: Vec<ExcessCommitment>,
    min_time: u64,
    max_time: u64,
    reference_data: Vec<u8>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    /// A builder for an empty transaction of the current version.
    pub fn new() -> Self {
        Self {
            version: CURRENT_TRANSACTION_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            excess_commitments: Vec::new(),
            min_time: 0,
            max_time: 0,
            reference_data: Vec::new(),
        }
    }

    /// Sets the transaction version number.
    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Appends an input.
    pub fn input(mut self, input: TxInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Appends an issuance input.
    pub fn issue(self, issuance: Issuance, arguments: Vec<Vec<u8>>) -> Self {
        self.input(TxInput::issuance(issuance, arguments))
    }

    /// Appends a spend of `outpoint`, whose output committed to `spent`.
    pub fn spend(self, outpoint: Outpoint, spent: OutputCommitment, arguments: Vec<Vec<u8>>) -> Self {
        self.input(TxInput::spend(outpoint, spent, arguments))
    }

    /// Appends an output.
    pub fn output(mut self, output: TxOutput) -> Self {
        self.outputs.push(output);
        self
    }

    /// Appends an excess commitment. Only version 2 carries them.
    pub fn excess_commitment(mut self, commitment: ExcessCommitment) -> Self {
        self.excess_commitments.push(commitment);
        self
    }

    /// Sets the validity window in milliseconds. 0 means unbounded.
    pub fn time_range(mut self, min_time: u64, max_time: u64) -> Self {
        self.min_time = min_time;
        self.max_time = max_time;
        self
    }

    /// Attaches transaction-level reference data.
    pub fn reference_data(mut self, data: Vec<u8>) -> Self {
        self.reference_data = data;
        self
    }

    /// Consumes the builder and produces validated [`TransactionData`].
    ///
    /// Fails with [`Error::UnsupportedVersionFeature`] when the parts do
    /// not fit the version: excess commitments outside version 2, or
    /// confidential values in version 1.
    pub fn build(self) -> Result<TransactionData> {
        let version = match TxVersion::from_number(self.version) {
            TxVersion::V2 { .. } => TxVersion::V2 {
                excess_commitments: self.excess_commitments,
            },
            _ if !self.excess_commitments.is_empty() => {
                return Err(Error::UnsupportedVersionFeature {
                    version: self.version,
                    feature: "excess commitments",
                });
            }
            other => other,
        };

        let tx = TransactionData {
            version,
            inputs: self.inputs,
            outputs: self.outputs,
            min_time: self.min_time,
            max_time: self.max_time,
            reference_data: self.reference_data,
        };
        tx.validate()?;
        Ok(tx)
    }

    /// Like [`build`](Self::build), then computes the identity hash.
    pub fn build_tx(self) -> Result<Transaction> {
        self.build().map(Transaction::new)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
