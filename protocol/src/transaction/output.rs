//! Transaction outputs.
//!
//! Wire layout of one output:
//!
//! ```text
//! asset version        varint
//! output commitment    extensible block (strict)
//!     value            asset-version-dependent, see AssetValue
//!     vm version       varint
//!     control program  varstr
//! reference data       varstr, or its fast hash without SER_METADATA
//! output witness       extensible block (permissive), only with SER_WITNESS
//!     range proof      varstr, asset version 2 only
//! ```

use std::io::{self, Write};

use super::data::{check_asset_version, write_ref_data, SerFlags};
use super::types::{AssetAmount, AssetId, AssetValue};
use crate::config::{ASSET_VERSION_CONFIDENTIAL, DEFAULT_VM_VERSION, OP_FAIL};
use crate::crypto::hash::{Hash, Hasher};
use crate::encoding::{write_extensible, write_varint, write_varstr, Reader};
use crate::error::{Context, Error, Result};

// ---------------------------------------------------------------------------
// OutputCommitment
// ---------------------------------------------------------------------------

/// The part of an output that a later spend commits to: what it holds and
/// the program that guards it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCommitment {
    pub value: AssetValue,
    pub vm_version: u64,
    pub control_program: Vec<u8>,
}

impl OutputCommitment {
    /// A commitment under the default VM version.
    pub fn new(value: AssetValue, control_program: Vec<u8>) -> Self {
        Self {
            value,
            vm_version: DEFAULT_VM_VERSION,
            control_program,
        }
    }

    /// 1 for explicit values, 2 for confidential ones.
    pub fn asset_version(&self) -> u64 {
        self.value.asset_version()
    }

    /// Writes the commitment body (without the asset version).
    pub fn write_body<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        let mut n = self.value.write_to(w)?;
        n += write_varint(w, self.vm_version)?;
        n += write_varstr(w, &self.control_program)?;
        Ok(n)
    }

    /// Reads a commitment body written under `asset_version`.
    pub fn read_body(r: &mut Reader<'_>, asset_version: u64) -> Result<Self> {
        let value = AssetValue::read_from(r, asset_version)?;
        let vm_version = r.read_varint().context("reading vm version")?;
        let control_program = r.read_varstr().context("reading control program")?;
        Ok(Self {
            value,
            vm_version,
            control_program,
        })
    }

    /// `SHA3-256(varint(asset_version) ‖ body)`.
    ///
    /// Stands in for the full commitment of a spent output when a spend is
    /// serialized without [`SerFlags::PREVOUT`], and is what a spend's
    /// signature hash commits to.
    pub fn hash(&self) -> Hash {
        let mut h = Hasher::new();
        write_varint(&mut h, self.asset_version()).expect("hasher writes are infallible");
        self.write_body(&mut h).expect("hasher writes are infallible");
        h.finish()
    }
}

// ---------------------------------------------------------------------------
// TxOutput
// ---------------------------------------------------------------------------

/// Whether an output can ever be spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Locked by a control program; spendable by whoever satisfies it.
    Control,
    /// Locked by a program that always fails. The value is retired.
    Retire,
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub commitment: OutputCommitment,
    pub reference_data: Vec<u8>,
    /// Proof that a blinded value is in range. Opaque here, and only
    /// carried by asset-version-2 outputs.
    pub range_proof: Vec<u8>,
}

impl TxOutput {
    /// An output paying `value` to `control_program`, without a range proof.
    pub fn new(value: AssetValue, control_program: Vec<u8>, reference_data: Vec<u8>) -> Self {
        Self {
            commitment: OutputCommitment::new(value, control_program),
            reference_data,
            range_proof: Vec::new(),
        }
    }

    /// An asset-version-1 output paying `amount` of `asset_id`.
    pub fn explicit(asset_id: AssetId, amount: u64, control_program: Vec<u8>) -> Self {
        Self::new(
            AssetValue::Explicit(AssetAmount::new(asset_id, amount)),
            control_program,
            Vec::new(),
        )
    }

    /// Attaches a range proof.
    pub fn with_range_proof(mut self, proof: Vec<u8>) -> Self {
        self.range_proof = proof;
        self
    }

    /// 1 for explicit values, 2 for confidential ones.
    pub fn asset_version(&self) -> u64 {
        self.commitment.asset_version()
    }

    /// Asset and amount, unless blinded.
    pub fn asset_amount(&self) -> Option<AssetAmount> {
        self.commitment.value.asset_amount()
    }

    /// Asset ID, unless blinded.
    pub fn asset_id(&self) -> Option<AssetId> {
        self.commitment.value.asset_id()
    }

    /// Program locking the output.
    pub fn control_program(&self) -> &[u8] {
        &self.commitment.control_program
    }

    /// VM version the control program runs under.
    pub fn vm_version(&self) -> u64 {
        self.commitment.vm_version
    }

    /// Output reference data.
    pub fn reference_data(&self) -> &[u8] {
        &self.reference_data
    }

    /// Classifies the output by its control program.
    pub fn kind(&self) -> OutputKind {
        match self.commitment.control_program.first() {
            Some(&OP_FAIL) => OutputKind::Retire,
            _ => OutputKind::Control,
        }
    }

    /// Checks the output against the transaction version it appears in.
    pub(crate) fn validate(&self, tx_version: u64) -> Result<()> {
        check_asset_version(tx_version, self.asset_version())?;
        if !self.range_proof.is_empty() && self.asset_version() != ASSET_VERSION_CONFIDENTIAL {
            return Err(Error::malformed("range proof on an explicit output"));
        }
        Ok(())
    }

    /// SHA3-256 of the output witness body.
    pub fn witness_hash(&self) -> Hash {
        let mut h = Hasher::new();
        self.write_witness(&mut h).expect("hasher writes are infallible");
        h.finish()
    }

    fn write_witness<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        if self.asset_version() == ASSET_VERSION_CONFIDENTIAL {
            write_varstr(w, &self.range_proof)
        } else {
            Ok(0)
        }
    }

    pub(crate) fn write_to<W: Write + ?Sized>(&self, w: &mut W, flags: SerFlags) -> io::Result<usize> {
        let mut n = write_varint(w, self.asset_version())?;
        n += write_extensible(w, |buf| self.commitment.write_body(buf).map(drop))?;
        n += write_ref_data(w, &self.reference_data, flags)?;
        if flags.contains(SerFlags::WITNESS) {
            n += write_extensible(w, |buf| self.write_witness(buf).map(drop))?;
        }
        Ok(n)
    }

    pub(crate) fn read_from(r: &mut Reader<'_>, tx_version: u64) -> Result<Self> {
        let asset_version = r.read_varint().context("reading asset version")?;
        check_asset_version(tx_version, asset_version)?;

        let commitment = r
            .read_extensible(true, |c| OutputCommitment::read_body(c, asset_version))
            .context("reading output commitment")?;
        let reference_data = r.read_varstr().context("reading reference data")?;
        let range_proof = r
            .read_extensible(false, |w| {
                if asset_version == ASSET_VERSION_CONFIDENTIAL {
                    w.read_varstr().context("reading range proof")
                } else {
                    Ok(Vec::new())
                }
            })
            .context("reading output witness")?;

        Ok(Self {
            commitment,
            reference_data,
            range_proof,
        })
    }
}
