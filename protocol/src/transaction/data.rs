//! Transaction data and its wire codec.
//!
//! ```text
//! serialization flags  1 byte
//! version              varint
//! common fields        extensible block, strict for versions 1 and 2
//!     min time         varint
//!     max time         varint
//! common witness       extensible block (permissive)
//!     version 2:       varint count ‖ excess commitments (96 bytes each)
//! inputs               varint count ‖ inputs
//! outputs              varint count ‖ outputs
//! reference data       varstr, or its fast hash without SER_METADATA
//! ```
//!
//! Decoding only accepts the full serialization (flags `0x07`). The other
//! flag combinations exist so the hashing code can render pruned forms.

use std::fmt;
use std::io::{self, Write};
use std::ops::{BitOr, Deref};

use tracing::trace;

use super::input::TxInput;
use super::output::TxOutput;
use crate::config::{
    ASSET_VERSION_CONFIDENTIAL, CURRENT_TRANSACTION_VERSION, EXCESS_COMMITMENT_LENGTH, SER_METADATA,
    SER_PREVOUT, SER_REQUIRED, SER_VALID, SER_WITNESS, TRANSACTION_VERSION_1, TRANSACTION_VERSION_2,
};
use crate::crypto::commitment::ExcessCommitment;
use crate::crypto::hash::{write_fast_hash, Hash};
use crate::encoding::{write_extensible, write_varint, write_varstr, Reader};
use crate::error::{Context, Error, Result};

// ---------------------------------------------------------------------------
// Serialization flags
// ---------------------------------------------------------------------------

/// Which optional parts of a transaction an encoding carries.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct SerFlags(u8);

impl SerFlags {
    /// Identity encoding: no witnesses, prevouts by hash, metadata by hash.
    pub const NONE: SerFlags = SerFlags(0);
    /// Carry input and output witnesses.
    pub const WITNESS: SerFlags = SerFlags(SER_WITNESS);
    /// Carry spent outputs in full rather than by hash.
    pub const PREVOUT: SerFlags = SerFlags(SER_PREVOUT);
    /// Carry reference data in full rather than by hash.
    pub const METADATA: SerFlags = SerFlags(SER_METADATA);
    /// Everything. The only combination a decoder accepts.
    pub const REQUIRED: SerFlags = SerFlags(SER_REQUIRED);

    /// Parses a flags byte, rejecting undefined bits.
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits & !SER_VALID == 0).then_some(SerFlags(bits))
    }

    /// The raw flags byte.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `other` is set.
    pub fn contains(self, other: SerFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SerFlags {
    type Output = SerFlags;

    fn bitor(self, rhs: SerFlags) -> SerFlags {
        SerFlags(self.0 | rhs.0)
    }
}

impl fmt::Debug for SerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerFlags({:#04x})", self.0)
    }
}

/// Writes reference data in full under [`SerFlags::METADATA`], and as its
/// fast-hash placeholder otherwise.
pub(crate) fn write_ref_data<W: Write + ?Sized>(w: &mut W, data: &[u8], flags: SerFlags) -> io::Result<usize> {
    if flags.contains(SerFlags::METADATA) {
        write_varstr(w, data)
    } else {
        write_fast_hash(w, data)
    }
}

/// Confidential asset values need transaction version 2 or later.
pub(crate) fn check_asset_version(tx_version: u64, asset_version: u64) -> Result<()> {
    if tx_version == TRANSACTION_VERSION_1 && asset_version == ASSET_VERSION_CONFIDENTIAL {
        return Err(Error::UnsupportedVersionFeature {
            version: tx_version,
            feature: "confidential asset values",
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

/// A transaction version number this crate has no rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FutureVersion(u64);

impl FutureVersion {
    /// Returns `None` for the known versions 1 and 2.
    pub fn new(version: u64) -> Option<Self> {
        match version {
            TRANSACTION_VERSION_1 | TRANSACTION_VERSION_2 => None,
            v => Some(Self(v)),
        }
    }

    /// The version number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// The transaction version, together with the fields only some versions
/// carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxVersion {
    /// Explicit assets only, no common witness.
    V1,
    /// Adds confidential asset values and excess commitments.
    V2 { excess_commitments: Vec<ExcessCommitment> },
    /// Unknown version. Fields after the time bounds and the whole common
    /// witness are skipped on read.
    Future(FutureVersion),
}

impl Default for TxVersion {
    fn default() -> Self {
        TxVersion::from_number(CURRENT_TRANSACTION_VERSION)
    }
}

impl TxVersion {
    /// Maps 1 and 2 to their variants and anything else to `Future`.
    pub fn from_number(version: u64) -> Self {
        match FutureVersion::new(version) {
            Some(future) => TxVersion::Future(future),
            None if version == TRANSACTION_VERSION_1 => TxVersion::V1,
            None => TxVersion::V2 {
                excess_commitments: Vec::new(),
            },
        }
    }

    /// The version number as written on the wire.
    pub fn number(&self) -> u64 {
        match self {
            TxVersion::V1 => TRANSACTION_VERSION_1,
            TxVersion::V2 { .. } => TRANSACTION_VERSION_2,
            TxVersion::Future(v) => v.get(),
        }
    }

    /// Whether this crate knows the version's rules.
    pub fn is_known(&self) -> bool {
        !matches!(self, TxVersion::Future(_))
    }

    /// Excess commitments; empty outside version 2.
    pub fn excess_commitments(&self) -> &[ExcessCommitment] {
        match self {
            TxVersion::V2 { excess_commitments } => excess_commitments,
            _ => &[],
        }
    }

    fn write_common_witness<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        match self {
            TxVersion::V2 { excess_commitments } => {
                let mut n = write_varint(w, excess_commitments.len() as u64)?;
                for c in excess_commitments {
                    n += c.write_to(w)?;
                }
                Ok(n)
            }
            _ => Ok(0),
        }
    }

    fn read_common_witness(version: u64, r: &mut Reader<'_>) -> Result<Self> {
        match TxVersion::from_number(version) {
            TxVersion::V1 if !r.is_empty() => Err(Error::UnsupportedVersionFeature {
                version,
                feature: "common witness data",
            }),
            TxVersion::V2 { .. } => {
                let count = r.read_count().context("reading excess commitment count")?;
                let mut excess_commitments =
                    Vec::with_capacity(count.min(r.remaining() / EXCESS_COMMITMENT_LENGTH));
                for i in 0..count {
                    excess_commitments.push(
                        ExcessCommitment::read_from(r)
                            .with_context(|| format!("reading excess commitment {i}"))?,
                    );
                }
                Ok(TxVersion::V2 { excess_commitments })
            }
            other => Ok(other),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionData
// ---------------------------------------------------------------------------

/// The content of a transaction.
///
/// Fields are public and freely mutable. [`TransactionData::validate`]
/// checks the cross-field rules that the type system does not; the codec
/// enforces the same rules on decode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionData {
    pub version: TxVersion,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// Earliest time (ms) at which the transaction may be included; 0 for
    /// no bound.
    pub min_time: u64,
    /// Latest time (ms) at which the transaction may be included; 0 for no
    /// bound.
    pub max_time: u64,
    pub reference_data: Vec<u8>,
}

impl TransactionData {
    /// An empty transaction of the given version.
    pub fn new(version: TxVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// The version number as written on the wire.
    pub fn version_number(&self) -> u64 {
        self.version.number()
    }

    /// Excess commitments; empty outside version 2.
    pub fn excess_commitments(&self) -> &[ExcessCommitment] {
        self.version.excess_commitments()
    }

    /// Whether any input issues new units.
    pub fn has_issuance(&self) -> bool {
        self.inputs.iter().any(TxInput::is_issuance)
    }

    /// Checks every input and output against the transaction version.
    pub fn validate(&self) -> Result<()> {
        let version = self.version.number();
        for (i, input) in self.inputs.iter().enumerate() {
            input.validate(version).with_context(|| format!("input {i}"))?;
        }
        for (i, output) in self.outputs.iter().enumerate() {
            output.validate(version).with_context(|| format!("output {i}"))?;
        }
        Ok(())
    }

    /// Writes the full serialization.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        self.write_with_flags(w, SerFlags::REQUIRED)
    }

    /// Writes the serialization selected by `flags`.
    pub fn write_with_flags<W: Write + ?Sized>(&self, w: &mut W, flags: SerFlags) -> io::Result<usize> {
        w.write_all(&[flags.bits()])?;
        let mut n = 1;
        n += write_varint(w, self.version.number())?;
        n += write_extensible(w, |buf| {
            write_varint(buf, self.min_time)?;
            write_varint(buf, self.max_time)?;
            Ok(())
        })?;
        n += write_extensible(w, |buf| self.write_common_witness(buf).map(drop))?;

        n += write_varint(w, self.inputs.len() as u64)?;
        for input in &self.inputs {
            n += input.write_to(w, flags)?;
        }
        n += write_varint(w, self.outputs.len() as u64)?;
        for output in &self.outputs {
            n += output.write_to(w, flags)?;
        }
        n += write_ref_data(w, &self.reference_data, flags)?;
        Ok(n)
    }

    /// Writes the common witness body.
    pub(crate) fn write_common_witness<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        self.version.write_common_witness(w)
    }

    /// Reads one transaction from `r`, leaving anything after it unread.
    pub fn read_from(r: &mut Reader<'_>) -> Result<Self> {
        let flags = r.read_byte().context("reading serialization flags")?;
        if flags != SER_REQUIRED {
            return Err(Error::malformed(format!(
                "unsupported serialization flags {flags:#04x}"
            )));
        }

        let version = r.read_varint().context("reading transaction version")?;
        let known = FutureVersion::new(version).is_none();

        let (min_time, max_time) = r
            .read_extensible(known, |c| {
                let min_time = c.read_varint().context("reading min time")?;
                let max_time = c.read_varint().context("reading max time")?;
                Ok((min_time, max_time))
            })
            .context("reading transaction common fields")?;

        let version = r
            .read_extensible(false, |c| TxVersion::read_common_witness(version, c))
            .context("reading transaction common witness")?;
        let tx_version = version.number();

        let count = r.read_count().context("reading input count")?;
        let mut inputs = Vec::new();
        for i in 0..count {
            inputs.push(TxInput::read_from(r, tx_version).with_context(|| format!("reading input {i}"))?);
        }

        let count = r.read_count().context("reading output count")?;
        let mut outputs = Vec::new();
        for i in 0..count {
            outputs.push(TxOutput::read_from(r, tx_version).with_context(|| format!("reading output {i}"))?);
        }

        let reference_data = r.read_varstr().context("reading transaction reference data")?;

        Ok(Self {
            version,
            inputs,
            outputs,
            min_time,
            max_time,
            reference_data,
        })
    }

    /// Decodes a complete transaction. Bytes after it are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        let tx = Self::read_from(&mut r)?;
        r.finish()?;
        trace!(
            version = tx.version.number(),
            inputs = tx.inputs.len(),
            outputs = tx.outputs.len(),
            len = bytes.len(),
            "decoded transaction"
        );
        Ok(tx)
    }

    /// The full serialization.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf).expect("writing to a Vec cannot fail");
        buf
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Transaction data paired with its identity hash.
///
/// The hash is computed once, on construction. Changing the data means
/// taking it out with [`Transaction::into_data`] and building a new
/// `Transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    data: TransactionData,
    hash: Hash,
}

impl Transaction {
    /// Hashes `data` and keeps the result.
    pub fn new(data: TransactionData) -> Self {
        let hash = data.hash();
        Self { data, hash }
    }

    /// Decodes and hashes a complete transaction.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        TransactionData::from_bytes(bytes).map(Self::new)
    }

    /// The identity hash.
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// The transaction content.
    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    /// Gives up the cached hash and returns the content.
    pub fn into_data(self) -> TransactionData {
        self.data
    }
}

impl From<TransactionData> for Transaction {
    fn from(data: TransactionData) -> Self {
        Self::new(data)
    }
}

impl Deref for Transaction {
    type Target = TransactionData;

    fn deref(&self) -> &TransactionData {
        &self.data
    }
}
