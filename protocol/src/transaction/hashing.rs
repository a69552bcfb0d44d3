//! Transaction hashes.
//!
//! - **identity hash**: SHA3-256 of the encoding with no flags set. Input
//!   and output witnesses are left out and prevouts and reference data are
//!   replaced by their hashes, so the identity survives signature
//!   malleation. The common witness is always encoded, so excess
//!   commitments are part of the identity.
//! - **witness hash**: commits to the identity hash and to every witness.
//!   Blocks commit to transactions by it.
//! - **issuance hash**: what an issuance input's signatures cover.
//!
//! Every hash runs through the shared [`Hasher`] pool.

use super::data::{SerFlags, Transaction, TransactionData};
use super::input::InputBody;
use super::types::AssetValue;
use crate::crypto::hash::{merkle_root, Hash, Hasher};
use crate::encoding::{write_varint, write_varstr};
use crate::error::{Error, Result};

const INFALLIBLE: &str = "hasher writes are infallible";

impl TransactionData {
    /// The identity hash.
    pub fn hash(&self) -> Hash {
        let mut h = Hasher::new();
        self.write_with_flags(&mut h, SerFlags::NONE).expect(INFALLIBLE);
        h.finish()
    }

    /// SHA3-256 of the common witness body.
    pub fn common_witness_hash(&self) -> Hash {
        let mut h = Hasher::new();
        self.write_common_witness(&mut h).expect(INFALLIBLE);
        h.finish()
    }

    /// The witness hash:
    ///
    /// ```text
    /// SHA3-256(identity hash ‖ common witness hash ‖
    ///          varint(#inputs) ‖ input witness hashes ‖
    ///          varint(#outputs) ‖ output witness hashes)
    /// ```
    pub fn witness_hash(&self) -> Hash {
        self.witness_hash_with(&self.hash())
    }

    pub(crate) fn witness_hash_with(&self, identity: &Hash) -> Hash {
        let mut h = Hasher::new();
        h.update(identity.as_bytes());
        h.update(self.common_witness_hash().as_bytes());

        write_varint(&mut h, self.inputs.len() as u64).expect(INFALLIBLE);
        for input in &self.inputs {
            h.update(input.witness_hash().as_bytes());
        }
        write_varint(&mut h, self.outputs.len() as u64).expect(INFALLIBLE);
        for output in &self.outputs {
            h.update(output.witness_hash().as_bytes());
        }
        h.finish()
    }

    /// The issuance hash of input `index`:
    ///
    /// ```text
    /// SHA3-256(varstr(nonce) ‖ asset ‖ varint(min time) ‖ varint(max time))
    /// ```
    ///
    /// where `asset` is the 32-byte asset ID for explicit values and the
    /// 33-byte asset descriptor for confidential ones.
    pub fn issuance_hash(&self, index: usize) -> Result<Hash> {
        let input = self.inputs.get(index).ok_or(Error::InputIndexOutOfRange {
            index,
            count: self.inputs.len(),
        })?;
        let InputBody::Issuance(iss) = &input.body else {
            return Err(Error::NotAnIssuanceInput { index });
        };

        let mut h = Hasher::new();
        write_varstr(&mut h, &iss.nonce).expect(INFALLIBLE);
        match &iss.value {
            AssetValue::Explicit(aa) => h.update(aa.asset_id.as_bytes()),
            AssetValue::Confidential { asset, .. } => {
                asset.write_to(&mut h).expect(INFALLIBLE);
            }
        }
        write_varint(&mut h, self.min_time).expect(INFALLIBLE);
        write_varint(&mut h, self.max_time).expect(INFALLIBLE);
        Ok(h.finish())
    }
}

impl Transaction {
    /// The witness hash, reusing the cached identity hash.
    pub fn witness_hash(&self) -> Hash {
        self.data().witness_hash_with(&self.hash())
    }
}

/// The transaction root of a block: the Merkle root over the witness
/// hashes of its transactions, in order.
pub fn tx_root(txs: &[Transaction]) -> Hash {
    let leaves: Vec<Hash> = txs.iter().map(Transaction::witness_hash).collect();
    merkle_root(&leaves)
}
