//! Signature hashes.
//!
//! A signature on input `i` covers:
//!
//! ```text
//! SHA3-256(identity hash ‖ varint(i) ‖ input-specific hash)
//! ```
//!
//! The input-specific hash is [`OutputCommitment::hash`] of the spent
//! output for spends and the issuance hash for issuances. The identity
//! hash already commits to every input and output, so a signature cannot
//! be moved to another transaction or another input.
//!
//! [`OutputCommitment::hash`]: super::output::OutputCommitment::hash

use super::data::{Transaction, TransactionData};
use super::input::InputBody;
use crate::crypto::hash::{Hash, Hasher};
use crate::encoding::write_varint;
use crate::error::{Error, Result};

/// Computes signature hashes for the inputs of one transaction, hashing
/// the transaction itself only once.
#[derive(Debug, Clone)]
pub struct SigHasher<'a> {
    tx: &'a TransactionData,
    identity: Hash,
}

impl<'a> SigHasher<'a> {
    /// Computes the identity hash of `tx` once, up front.
    pub fn new(tx: &'a TransactionData) -> Self {
        Self {
            identity: tx.hash(),
            tx,
        }
    }

    /// Reuses an already-known identity hash.
    pub(crate) fn with_identity(tx: &'a TransactionData, identity: Hash) -> Self {
        Self { tx, identity }
    }

    /// The signature hash of input `index`.
    pub fn hash(&self, index: usize) -> Result<Hash> {
        let input = self.tx.inputs.get(index).ok_or(Error::InputIndexOutOfRange {
            index,
            count: self.tx.inputs.len(),
        })?;
        let specific = match &input.body {
            InputBody::Spend(sp) => sp.spent_output.hash(),
            InputBody::Issuance(_) => self.tx.issuance_hash(index)?,
        };

        let mut h = Hasher::new();
        h.update(self.identity.as_bytes());
        write_varint(&mut h, index as u64).expect("hasher writes are infallible");
        h.update(specific.as_bytes());
        Ok(h.finish())
    }
}

impl TransactionData {
    /// The signature hash of input `index`. Use a [`SigHasher`] when
    /// hashing several inputs.
    pub fn signature_hash(&self, index: usize) -> Result<Hash> {
        SigHasher::new(self).hash(index)
    }
}

impl Transaction {
    /// A signature hasher reusing the cached identity hash.
    pub fn sig_hasher(&self) -> SigHasher<'_> {
        SigHasher::with_identity(self.data(), self.hash())
    }

    /// The signature hash of input `index`, reusing the cached identity
    /// hash.
    pub fn signature_hash(&self, index: usize) -> Result<Hash> {
        self.sig_hasher().hash(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transaction::data::TxVersion;
    use crate::transaction::input::{Issuance, TxInput};
    use crate::transaction::output::{OutputCommitment, TxOutput};
    use crate::transaction::types::{AssetAmount, AssetId, AssetValue, Outpoint};

    fn sample() -> TransactionData {
        let spent = OutputCommitment::new(
            AssetValue::Explicit(AssetAmount::new(AssetId([2; 32]), 40)),
            vec![0x51],
        );
        let value = AssetValue::Explicit(AssetAmount::new(AssetId([1; 32]), 10));
        TransactionData {
            version: TxVersion::V1,
            inputs: vec![
                TxInput::spend(Outpoint::new(Hash([3; 32]), 0), spent, vec![]),
                TxInput::issuance(Issuance::new(vec![1], value, Hash([9; 32]), vec![0x51]), vec![]),
            ],
            outputs: vec![TxOutput::explicit(AssetId([2; 32]), 50, vec![0x52])],
            ..TransactionData::default()
        }
    }

    #[test]
    fn spend_layout() {
        let tx = sample();
        let mut h = Hasher::new();
        h.update(tx.hash().as_bytes());
        h.update(&[0]);
        h.update(tx.inputs[0].as_spend().unwrap().spent_output.hash().as_bytes());
        assert_eq!(tx.signature_hash(0).unwrap(), h.finish());
    }

    #[test]
    fn issuance_layout() {
        let tx = sample();
        let mut h = Hasher::new();
        h.update(tx.hash().as_bytes());
        h.update(&[1]);
        h.update(tx.issuance_hash(1).unwrap().as_bytes());
        assert_eq!(tx.signature_hash(1).unwrap(), h.finish());
    }

    #[test]
    fn distinct_per_input_and_stable() {
        let tx = sample();
        let hasher = SigHasher::new(&tx);
        assert_ne!(hasher.hash(0).unwrap(), hasher.hash(1).unwrap());
        assert_eq!(hasher.hash(0).unwrap(), tx.signature_hash(0).unwrap());

        let cached = Transaction::new(tx.clone());
        assert_eq!(cached.signature_hash(1).unwrap(), tx.signature_hash(1).unwrap());
    }

    #[test]
    fn arguments_do_not_change_signature_hash() {
        let a = sample();
        let mut b = sample();
        b.inputs[0].arguments = vec![vec![0xcc; 64]];
        assert_eq!(a.signature_hash(0).unwrap(), b.signature_hash(0).unwrap());
    }

    #[test]
    fn out_of_range() {
        let err = sample().signature_hash(5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputIndexOutOfRange);
    }
}
