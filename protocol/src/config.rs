//! # Wire Protocol Constants
//!
//! Every magic number of the transaction wire format lives here. These
//! values are consensus: two nodes that disagree on any of them will
//! disagree on transaction IDs, and from there on everything else.
//!
//! Changing one of these after launch is a hard fork. Adding a new one is
//! usually fine, provided older readers can skip it (see
//! [`crate::encoding::Reader::read_extensible`]).

// ---------------------------------------------------------------------------
// Transaction Versions
// ---------------------------------------------------------------------------

/// The latest transaction version this library knows how to build.
pub const CURRENT_TRANSACTION_VERSION: u64 = 2;

/// Plain transactions: explicit asset IDs and amounts, no common witness.
pub const TRANSACTION_VERSION_1: u64 = 1;

/// Confidential-asset transactions. The common witness carries the excess
/// commitments that balance the blinding factors of the whole transaction.
pub const TRANSACTION_VERSION_2: u64 = 2;

// ---------------------------------------------------------------------------
// Serialization Flags
// ---------------------------------------------------------------------------

/// Include input and output witness blocks.
pub const SER_WITNESS: u8 = 1 << 0;

/// Include the full commitment of each spent output (otherwise its hash).
pub const SER_PREVOUT: u8 = 1 << 1;

/// Include reference data verbatim (otherwise a hash of it).
pub const SER_METADATA: u8 = 1 << 2;

/// Bit mask of every flag the format defines.
pub const SER_VALID: u8 = SER_WITNESS | SER_PREVOUT | SER_METADATA;

/// The only flag byte accepted on the wire. The byte exists so the format
/// can evolve; today every stored or transferred transaction is full.
pub const SER_REQUIRED: u8 = 0x7;

// ---------------------------------------------------------------------------
// Asset Versions
// ---------------------------------------------------------------------------

/// Asset ID and amount in the clear.
pub const ASSET_VERSION_EXPLICIT: u64 = 1;

/// Asset and value descriptors, possibly blinded. Requires transaction
/// version 2 or later.
pub const ASSET_VERSION_CONFIDENTIAL: u64 = 2;

/// VM version used for control and issuance programs unless told otherwise.
pub const DEFAULT_VM_VERSION: u64 = 1;

/// First byte of a provably unspendable control program. Outputs locked by
/// such a program retire (burn) their value.
pub const OP_FAIL: u8 = 0x6a;

// ---------------------------------------------------------------------------
// Encoding Limits
// ---------------------------------------------------------------------------

/// Hash output length in bytes. SHA3-256, always 32.
pub const HASH_LENGTH: usize = 32;

/// Upper bound for any count or length prefix. Larger values are rejected
/// before a single byte is allocated.
pub const MAX_VARSTR31_LENGTH: u64 = i32::MAX as u64;

/// Longest legal varint encoding of a `u64` (ceil(64 / 7)).
pub const MAX_VARINT_LENGTH: usize = 10;

/// Wire size of an excess commitment: a 32-byte compressed point followed
/// by a 64-byte signature.
pub const EXCESS_COMMITMENT_LENGTH: usize = 96;

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Idle hasher states kept around for reuse. Beyond this, returned states
/// are simply dropped. 64 comfortably covers one hasher per core on the
/// machines we validate on, with headroom for nested computations.
pub const MAX_POOLED_HASHERS: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_flags_are_all_valid_flags() {
        assert_eq!(SER_REQUIRED, SER_VALID);
        assert_eq!(SER_VALID & !0x7, 0);
    }

    #[test]
    fn current_version_is_known() {
        assert!(
            CURRENT_TRANSACTION_VERSION == TRANSACTION_VERSION_1
                || CURRENT_TRANSACTION_VERSION == TRANSACTION_VERSION_2
        );
    }
}
