//! Value types shared by inputs and outputs.
//!
//! An amount of an asset appears on the wire in one of two shapes, keyed
//! by the *asset version* written in front of every input and output:
//!
//! | Asset version | Shape | Wire body |
//! |---------------|-------|-----------|
//! | 1 | [`AssetValue::Explicit`] | asset ID (32) ‖ amount varint |
//! | 2 | [`AssetValue::Confidential`] | [`AssetDescriptor`] ‖ [`ValueDescriptor`] |
//!
//! Descriptors are self-describing: a tag byte says whether the payload is
//! in the clear or a blinded commitment. Blinded commitments are carried
//! as compressed points and never decompressed here.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use curve25519_dalek::edwards::CompressedEdwardsY;
use hex::FromHex;

use crate::config::{ASSET_VERSION_CONFIDENTIAL, ASSET_VERSION_EXPLICIT, HASH_LENGTH};
use crate::crypto::hash::{hash_bytes, Hash, Hasher};
use crate::encoding::{write_varint, write_varstr, Reader};
use crate::error::{Context, Error, Result};

const DESCRIPTOR_EXPLICIT: u8 = 0x00;
const DESCRIPTOR_BLINDED: u8 = 0x01;

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Identifies an asset. Derived from the asset's issuance parameters, see
/// [`AssetId::compute`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub [u8; HASH_LENGTH]);

impl AssetId {
    /// Derives the ID of the asset issued by `issuance_program` under the
    /// blockchain whose first block is `initial_block`:
    ///
    /// `SHA3-256(initial_block ‖ varint(vm_version) ‖ varstr(program) ‖ SHA3-256(definition))`
    pub fn compute(
        initial_block: &Hash,
        vm_version: u64,
        issuance_program: &[u8],
        asset_definition: &[u8],
    ) -> Self {
        let mut h = Hasher::new();
        h.update(initial_block.as_bytes());
        write_varint(&mut h, vm_version).expect("hasher writes are infallible");
        write_varstr(&mut h, issuance_program).expect("hasher writes are infallible");
        h.update(hash_bytes(asset_definition).as_bytes());
        AssetId(h.finish().0)
    }

    /// Raw ID bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", hex::encode(self.0))
    }
}

impl FromStr for AssetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(AssetId(<[u8; HASH_LENGTH]>::from_hex(s)?))
    }
}

// ---------------------------------------------------------------------------
// AssetAmount
// ---------------------------------------------------------------------------

/// An amount of a specific asset, both in the clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetAmount {
    pub asset_id: AssetId,
    pub amount: u64,
}

impl AssetAmount {
    /// Pairs an amount with its asset.
    pub fn new(asset_id: AssetId, amount: u64) -> Self {
        Self { asset_id, amount }
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Which asset a confidential value is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetDescriptor {
    /// The asset ID in the clear. 33 bytes on the wire.
    Explicit(AssetId),
    /// A blinded asset commitment.
    Blinded(CompressedEdwardsY),
}

impl AssetDescriptor {
    /// Writes the tag byte and the 32-byte asset ID or point.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        match self {
            Self::Explicit(id) => {
                w.write_all(&[DESCRIPTOR_EXPLICIT])?;
                w.write_all(id.as_bytes())?;
            }
            Self::Blinded(point) => {
                w.write_all(&[DESCRIPTOR_BLINDED])?;
                w.write_all(point.as_bytes())?;
            }
        }
        Ok(1 + HASH_LENGTH)
    }

    /// Reads a tagged descriptor; unknown tags are malformed.
    pub fn read_from(r: &mut Reader<'_>) -> Result<Self> {
        match r.read_byte()? {
            DESCRIPTOR_EXPLICIT => Ok(Self::Explicit(AssetId(r.read_array()?))),
            DESCRIPTOR_BLINDED => Ok(Self::Blinded(CompressedEdwardsY(r.read_array()?))),
            tag => Err(Error::malformed(format!(
                "unknown asset descriptor type {tag:#04x}"
            ))),
        }
    }

    /// The asset ID, when it is not blinded.
    pub fn asset_id(&self) -> Option<AssetId> {
        match self {
            Self::Explicit(id) => Some(*id),
            Self::Blinded(_) => None,
        }
    }
}

/// How much of the asset a confidential value holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDescriptor {
    /// The amount in the clear.
    Explicit(u64),
    /// A blinded value commitment.
    Blinded(CompressedEdwardsY),
}

impl ValueDescriptor {
    /// Writes the tag byte and the varint amount or 32-byte point.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        match self {
            Self::Explicit(amount) => {
                w.write_all(&[DESCRIPTOR_EXPLICIT])?;
                Ok(1 + write_varint(w, *amount)?)
            }
            Self::Blinded(point) => {
                w.write_all(&[DESCRIPTOR_BLINDED])?;
                w.write_all(point.as_bytes())?;
                Ok(1 + HASH_LENGTH)
            }
        }
    }

    /// Reads a tagged descriptor; unknown tags are malformed.
    pub fn read_from(r: &mut Reader<'_>) -> Result<Self> {
        match r.read_byte()? {
            DESCRIPTOR_EXPLICIT => Ok(Self::Explicit(r.read_varint()?)),
            DESCRIPTOR_BLINDED => Ok(Self::Blinded(CompressedEdwardsY(r.read_array()?))),
            tag => Err(Error::malformed(format!(
                "unknown value descriptor type {tag:#04x}"
            ))),
        }
    }

    /// The amount, when it is not blinded.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Self::Explicit(amount) => Some(*amount),
            Self::Blinded(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AssetValue
// ---------------------------------------------------------------------------

/// An amount of some asset, in whichever shape its asset version dictates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetValue {
    /// Asset version 1.
    Explicit(AssetAmount),
    /// Asset version 2.
    Confidential {
        asset: AssetDescriptor,
        value: ValueDescriptor,
    },
}

impl AssetValue {
    /// The asset version this shape is written under.
    pub fn asset_version(&self) -> u64 {
        match self {
            Self::Explicit(_) => ASSET_VERSION_EXPLICIT,
            Self::Confidential { .. } => ASSET_VERSION_CONFIDENTIAL,
        }
    }

    /// Returns `true` for asset-version-2 values.
    pub fn is_confidential(&self) -> bool {
        matches!(self, Self::Confidential { .. })
    }

    /// Asset and amount, if neither is blinded.
    pub fn asset_amount(&self) -> Option<AssetAmount> {
        match self {
            Self::Explicit(aa) => Some(*aa),
            Self::Confidential { asset, value } => Some(AssetAmount::new(
                asset.asset_id()?,
                value.amount()?,
            )),
        }
    }

    /// The asset ID, if it is not blinded.
    pub fn asset_id(&self) -> Option<AssetId> {
        match self {
            Self::Explicit(aa) => Some(aa.asset_id),
            Self::Confidential { asset, .. } => asset.asset_id(),
        }
    }

    /// Writes the body for this value's asset version (the version number
    /// itself is written by the caller).
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        match self {
            Self::Explicit(aa) => {
                w.write_all(aa.asset_id.as_bytes())?;
                Ok(HASH_LENGTH + write_varint(w, aa.amount)?)
            }
            Self::Confidential { asset, value } => {
                Ok(asset.write_to(w)? + value.write_to(w)?)
            }
        }
    }

    /// Reads the body written under `asset_version`.
    pub fn read_from(r: &mut Reader<'_>, asset_version: u64) -> Result<Self> {
        match asset_version {
            ASSET_VERSION_EXPLICIT => {
                let asset_id = AssetId(r.read_array().context("reading asset id")?);
                let amount = r.read_varint().context("reading amount")?;
                Ok(Self::Explicit(AssetAmount::new(asset_id, amount)))
            }
            ASSET_VERSION_CONFIDENTIAL => {
                let asset = AssetDescriptor::read_from(r).context("reading asset descriptor")?;
                let value = ValueDescriptor::read_from(r).context("reading value descriptor")?;
                Ok(Self::Confidential { asset, value })
            }
            v => Err(Error::malformed(format!("unknown asset version {v}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Outpoint
// ---------------------------------------------------------------------------

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outpoint {
    /// Identity hash of the transaction holding the output.
    pub tx_hash: Hash,
    /// Position of the output in that transaction.
    pub index: u32,
}

impl Outpoint {
    /// Names output `index` of transaction `tx_hash`.
    pub fn new(tx_hash: Hash, index: u32) -> Self {
        Self { tx_hash, index }
    }

    /// Writes the transaction hash followed by the varint index.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        Ok(self.tx_hash.write_to(w)? + write_varint(w, u64::from(self.index))?)
    }

    /// Reads an outpoint; the index must fit in 31 bits.
    pub fn read_from(r: &mut Reader<'_>) -> Result<Self> {
        let tx_hash = Hash::read_from(r).context("reading outpoint hash")?;
        let index = r.read_varint31().context("reading outpoint index")?;
        Ok(Self { tx_hash, index })
    }
}
