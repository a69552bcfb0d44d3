//! Transaction inputs: issuances and spends.
//!
//! Wire layout of one input:
//!
//! ```text
//! asset version        varint
//! input commitment     extensible block (strict)
//!     type             0x00 issuance | 0x01 spend
//!     issuance:        nonce varstr ‖ asset value body
//!     spend:           outpoint ‖ spent output commitment
//! reference data       varstr, or its fast hash without SER_METADATA
//! input witness        extensible block (permissive), only with SER_WITNESS
//!     issuance:        initial block (32) ‖ asset definition varstr ‖
//!                      vm version varint ‖ issuance program varstr ‖
//!                      arguments
//!     spend:           arguments
//! ```
//!
//! The spent output commitment is an extensible block holding the
//! commitment body when [`SerFlags::PREVOUT`] is set, and otherwise the
//! 32-byte [`OutputCommitment::hash`] of it.

use std::io::{self, Write};

use super::data::{check_asset_version, write_ref_data, SerFlags};
use super::output::OutputCommitment;
use super::types::{AssetAmount, AssetId, AssetValue, Outpoint};
use crate::config::DEFAULT_VM_VERSION;
use crate::crypto::hash::{Hash, Hasher};
use crate::encoding::{write_extensible, write_varint, write_varstr, write_varstr_list, Reader};
use crate::error::{Context, Error, Result};

const INPUT_TYPE_ISSUANCE: u8 = 0x00;
const INPUT_TYPE_SPEND: u8 = 0x01;

// ---------------------------------------------------------------------------
// Issuance / Spend
// ---------------------------------------------------------------------------

/// Creation of new units of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuance {
    /// Makes otherwise-identical issuances distinct.
    pub nonce: Vec<u8>,
    pub value: AssetValue,
    /// Hash of the first block of the issuing chain.
    pub initial_block: Hash,
    pub asset_definition: Vec<u8>,
    pub vm_version: u64,
    pub issuance_program: Vec<u8>,
}

impl Issuance {
    /// An issuance under the default VM version with an empty definition.
    pub fn new(nonce: Vec<u8>, value: AssetValue, initial_block: Hash, issuance_program: Vec<u8>) -> Self {
        Self {
            nonce,
            value,
            initial_block,
            asset_definition: Vec::new(),
            vm_version: DEFAULT_VM_VERSION,
            issuance_program,
        }
    }

    /// The asset ID these issuance parameters define. An explicit value
    /// should name this same ID.
    pub fn computed_asset_id(&self) -> AssetId {
        AssetId::compute(
            &self.initial_block,
            self.vm_version,
            &self.issuance_program,
            &self.asset_definition,
        )
    }

    fn write_witness<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        let mut n = self.initial_block.write_to(w)?;
        n += write_varstr(w, &self.asset_definition)?;
        n += write_varint(w, self.vm_version)?;
        n += write_varstr(w, &self.issuance_program)?;
        Ok(n)
    }
}

/// Consumption of an earlier output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spend {
    pub outpoint: Outpoint,
    /// Commitment of the output being spent, carried along so the input
    /// can be checked without looking the output up.
    pub spent_output: OutputCommitment,
}

impl Spend {
    /// Spends `outpoint`, whose commitment is `spent_output`.
    pub fn new(outpoint: Outpoint, spent_output: OutputCommitment) -> Self {
        Self {
            outpoint,
            spent_output,
        }
    }
}

/// What an input does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputBody {
    /// Creates new units of an asset.
    Issuance(Issuance),
    /// Consumes an existing output.
    Spend(Spend),
}

// ---------------------------------------------------------------------------
// TxInput
// ---------------------------------------------------------------------------

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    pub body: InputBody,
    /// Arbitrary data, committed to by hash in the identity encoding.
    pub reference_data: Vec<u8>,
    /// Witness arguments for the issuance or control program.
    pub arguments: Vec<Vec<u8>>,
}

impl TxInput {
    /// An issuance input with the given witness arguments.
    pub fn issuance(issuance: Issuance, arguments: Vec<Vec<u8>>) -> Self {
        Self {
            body: InputBody::Issuance(issuance),
            reference_data: Vec::new(),
            arguments,
        }
    }

    /// A spend of `outpoint` with the given witness arguments.
    pub fn spend(outpoint: Outpoint, spent_output: OutputCommitment, arguments: Vec<Vec<u8>>) -> Self {
        Self {
            body: InputBody::Spend(Spend::new(outpoint, spent_output)),
            reference_data: Vec::new(),
            arguments,
        }
    }

    /// Replaces the reference data.
    pub fn with_reference_data(mut self, data: Vec<u8>) -> Self {
        self.reference_data = data;
        self
    }

    /// Whether this input issues new units.
    pub fn is_issuance(&self) -> bool {
        matches!(self.body, InputBody::Issuance(_))
    }

    /// The issuance body, if this is an issuance.
    pub fn as_issuance(&self) -> Option<&Issuance> {
        match &self.body {
            InputBody::Issuance(iss) => Some(iss),
            InputBody::Spend(_) => None,
        }
    }

    /// The spend body, if this is a spend.
    pub fn as_spend(&self) -> Option<&Spend> {
        match &self.body {
            InputBody::Spend(sp) => Some(sp),
            InputBody::Issuance(_) => None,
        }
    }

    fn value(&self) -> &AssetValue {
        match &self.body {
            InputBody::Issuance(iss) => &iss.value,
            InputBody::Spend(sp) => &sp.spent_output.value,
        }
    }

    /// 1 for explicit values, 2 for confidential ones.
    pub fn asset_version(&self) -> u64 {
        self.value().asset_version()
    }

    /// Asset and amount, unless blinded.
    pub fn asset_amount(&self) -> Option<AssetAmount> {
        self.value().asset_amount()
    }

    /// Asset ID, unless blinded.
    pub fn asset_id(&self) -> Option<AssetId> {
        self.value().asset_id()
    }

    /// Amount, unless blinded.
    pub fn amount(&self) -> Option<u64> {
        self.asset_amount().map(|aa| aa.amount)
    }

    /// Issuance nonce.
    pub fn nonce(&self) -> Option<&[u8]> {
        self.as_issuance().map(|iss| iss.nonce.as_slice())
    }

    /// Program authorizing the issuance.
    pub fn issuance_program(&self) -> Option<&[u8]> {
        self.as_issuance().map(|iss| iss.issuance_program.as_slice())
    }

    /// Control program of the output being spent.
    pub fn control_program(&self) -> Option<&[u8]> {
        self.as_spend().map(|sp| sp.spent_output.control_program.as_slice())
    }

    /// Output being spent.
    pub fn outpoint(&self) -> Option<&Outpoint> {
        self.as_spend().map(|sp| &sp.outpoint)
    }

    /// Witness arguments.
    pub fn arguments(&self) -> &[Vec<u8>] {
        &self.arguments
    }

    /// Input reference data.
    pub fn reference_data(&self) -> &[u8] {
        &self.reference_data
    }

    pub(crate) fn validate(&self, tx_version: u64) -> Result<()> {
        check_asset_version(tx_version, self.asset_version())
    }

    /// SHA3-256 of the input witness body.
    pub fn witness_hash(&self) -> Hash {
        let mut h = Hasher::new();
        self.write_witness(&mut h).expect("hasher writes are infallible");
        h.finish()
    }

    fn write_commitment<W: Write + ?Sized>(&self, w: &mut W, flags: SerFlags) -> io::Result<usize> {
        match &self.body {
            InputBody::Issuance(iss) => {
                w.write_all(&[INPUT_TYPE_ISSUANCE])?;
                let n = write_varstr(w, &iss.nonce)?;
                Ok(1 + n + iss.value.write_to(w)?)
            }
            InputBody::Spend(sp) => {
                w.write_all(&[INPUT_TYPE_SPEND])?;
                let mut n = 1 + sp.outpoint.write_to(w)?;
                if flags.contains(SerFlags::PREVOUT) {
                    n += write_extensible(w, |buf| sp.spent_output.write_body(buf).map(drop))?;
                } else {
                    n += sp.spent_output.hash().write_to(w)?;
                }
                Ok(n)
            }
        }
    }

    fn write_witness<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        let n = match &self.body {
            InputBody::Issuance(iss) => iss.write_witness(w)?,
            InputBody::Spend(_) => 0,
        };
        Ok(n + write_varstr_list(w, &self.arguments)?)
    }

    pub(crate) fn write_to<W: Write + ?Sized>(&self, w: &mut W, flags: SerFlags) -> io::Result<usize> {
        let mut n = write_varint(w, self.asset_version())?;
        n += write_extensible(w, |buf| self.write_commitment(buf, flags).map(drop))?;
        n += write_ref_data(w, &self.reference_data, flags)?;
        if flags.contains(SerFlags::WITNESS) {
            n += write_extensible(w, |buf| self.write_witness(buf).map(drop))?;
        }
        Ok(n)
    }

    pub(crate) fn read_from(r: &mut Reader<'_>, tx_version: u64) -> Result<Self> {
        let asset_version = r.read_varint().context("reading asset version")?;
        check_asset_version(tx_version, asset_version)?;

        let committed = r
            .read_extensible(true, |c| read_commitment(c, asset_version))
            .context("reading input commitment")?;
        let reference_data = r.read_varstr().context("reading reference data")?;

        let (body, arguments) = r
            .read_extensible(false, |w| match committed {
                Committed::Issuance { nonce, value } => {
                    let initial_block = Hash::read_from(w).context("reading initial block")?;
                    let asset_definition = w.read_varstr().context("reading asset definition")?;
                    let vm_version = w.read_varint().context("reading vm version")?;
                    let issuance_program = w.read_varstr().context("reading issuance program")?;
                    let arguments = w.read_varstr_list().context("reading arguments")?;
                    let issuance = Issuance {
                        nonce,
                        value,
                        initial_block,
                        asset_definition,
                        vm_version,
                        issuance_program,
                    };
                    Ok((InputBody::Issuance(issuance), arguments))
                }
                Committed::Spend(spend) => {
                    let arguments = w.read_varstr_list().context("reading arguments")?;
                    Ok((InputBody::Spend(spend), arguments))
                }
            })
            .context("reading input witness")?;

        Ok(Self {
            body,
            reference_data,
            arguments,
        })
    }
}

/// The input commitment, before the witness completes it.
enum Committed {
    Issuance { nonce: Vec<u8>, value: AssetValue },
    Spend(Spend),
}

fn read_commitment(r: &mut Reader<'_>, asset_version: u64) -> Result<Committed> {
    match r.read_byte().context("reading input type")? {
        INPUT_TYPE_ISSUANCE => {
            let nonce = r.read_varstr().context("reading nonce")?;
            let value = AssetValue::read_from(r, asset_version)?;
            Ok(Committed::Issuance { nonce, value })
        }
        INPUT_TYPE_SPEND => {
            let outpoint = Outpoint::read_from(r)?;
            let spent_output = r
                .read_extensible(true, |s| OutputCommitment::read_body(s, asset_version))
                .context("reading spent output")?;
            Ok(Committed::Spend(Spend::new(outpoint, spent_output)))
        }
        t => Err(Error::malformed(format!("unknown input type {t:#04x}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transaction::types::{AssetDescriptor, ValueDescriptor};

    fn issuance_input() -> TxInput {
        let value = AssetValue::Confidential {
            asset: AssetDescriptor::Explicit(AssetId([1; 32])),
            value: ValueDescriptor::Explicit(100),
        };
        TxInput::issuance(Issuance::new(vec![0; 8], value, Hash([9; 32]), vec![0x51]), vec![])
    }

    fn spend_input() -> TxInput {
        let spent = OutputCommitment::new(
            AssetValue::Explicit(AssetAmount::new(AssetId([2; 32]), 40)),
            vec![0x51, 0x52],
        );
        TxInput::spend(Outpoint::new(Hash([3; 32]), 1), spent, vec![vec![0xaa; 64], vec![]])
            .with_reference_data(b"memo".to_vec())
    }

    fn encode(input: &TxInput, flags: SerFlags) -> Vec<u8> {
        let mut buf = Vec::new();
        let n = input.write_to(&mut buf, flags).unwrap();
        assert_eq!(n, buf.len());
        buf
    }

    #[test]
    fn issuance_input_is_86_bytes() {
        let buf = encode(&issuance_input(), SerFlags::REQUIRED);
        assert_eq!(buf.len(), 86);
        // asset version, then commitment block length, then the type byte
        assert_eq!(&buf[..3], &[0x02, 45, INPUT_TYPE_ISSUANCE]);
    }

    #[test]
    fn full_encoding_reads_back() {
        for input in [issuance_input(), spend_input()] {
            let buf = encode(&input, SerFlags::REQUIRED);
            let mut r = Reader::new(&buf);
            assert_eq!(TxInput::read_from(&mut r, 2).unwrap(), input);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn spend_without_prevout_commits_to_output_hash() {
        let input = spend_input();
        let with = encode(&input, SerFlags::REQUIRED);
        let without = encode(&input, SerFlags::WITNESS | SerFlags::METADATA);

        let spent = &input.as_spend().unwrap().spent_output;
        let hash = spent.hash();
        assert!(without.windows(32).any(|w| w == hash.as_bytes()));
        assert!(!with.windows(32).any(|w| w == hash.as_bytes()));
    }

    #[test]
    fn unknown_input_type_is_malformed() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 1).unwrap();
        write_varstr(&mut buf, &[0x07]).unwrap();
        let err = TxInput::read_from(&mut Reader::new(&buf), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeMalformed);
    }

    #[test]
    fn witness_may_carry_unknown_trailing_fields() {
        let input = spend_input();
        let mut buf = encode(&input, SerFlags::WITNESS | SerFlags::PREVOUT | SerFlags::METADATA);

        // rewrite the witness block with two extra bytes
        let mut witness = Vec::new();
        input.write_witness(&mut witness).unwrap();
        let old_block_len = 1 + witness.len();
        buf.truncate(buf.len() - old_block_len);
        witness.extend_from_slice(&[0xde, 0xad]);
        write_varstr(&mut buf, &witness).unwrap();

        let mut r = Reader::new(&buf);
        assert_eq!(TxInput::read_from(&mut r, 1).unwrap(), input);
        assert!(r.is_empty());
    }

    #[test]
    fn truncated_arguments_name_their_location() {
        let buf = encode(&spend_input(), SerFlags::REQUIRED);
        // cut inside the witness block, then fix up its length prefix so the
        // block itself is well-formed but the arguments are not
        let witness_start = buf.len() - 1 - (1 + 1 + 64 + 1);
        let mut cut = buf[..witness_start].to_vec();
        write_varstr(&mut cut, &[0x02, 0x40, 0xaa]).unwrap();

        let err = TxInput::read_from(&mut Reader::new(&cut), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeTruncated);
        let msg = err.to_string();
        assert!(msg.starts_with("reading input witness: reading arguments"), "{msg}");
    }

    #[test]
    fn accessors_follow_the_input_type() {
        let iss = issuance_input();
        assert!(iss.is_issuance());
        assert_eq!(iss.nonce(), Some(&[0u8; 8][..]));
        assert_eq!(iss.issuance_program(), Some(&[0x51u8][..]));
        assert_eq!(iss.outpoint(), None);
        assert_eq!(iss.amount(), Some(100));

        let sp = spend_input();
        assert!(!sp.is_issuance());
        assert_eq!(sp.nonce(), None);
        assert_eq!(sp.control_program(), Some(&[0x51u8, 0x52][..]));
        assert_eq!(sp.outpoint().map(|op| op.index), Some(1));
        assert_eq!(sp.asset_id(), Some(AssetId([2; 32])));
        assert_eq!(sp.reference_data(), b"memo");
    }

    #[test]
    fn confidential_issuance_rejected_in_v1() {
        let buf = encode(&issuance_input(), SerFlags::REQUIRED);
        let err = TxInput::read_from(&mut Reader::new(&buf), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedVersionFeature);
    }
}
