//! Wire-format integration tests.
//!
//! These tests go through the public API only: build a transaction, encode
//! it, decode it, hash it. They pin the exact byte layout of a reference
//! transaction and check the properties every encoding must have, whatever
//! its shape.

use curve25519_dalek::edwards::CompressedEdwardsY;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use nova_bc::crypto::{hash_bytes, ExcessCommitment, Hash};
use nova_bc::transaction::{
    tx_root, AssetAmount, AssetDescriptor, AssetId, AssetValue, InputBody, Issuance, Outpoint, OutputCommitment,
    SerFlags, Transaction, TransactionBuilder, TransactionData, TxOutput, TxVersion, ValueDescriptor,
};
use nova_bc::ErrorKind;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const INITIAL_BLOCK: Hash = Hash([0x11; 32]);

/// Version 2 transaction with one explicit-valued confidential issuance of
/// 100 units and one output paying them to a 21-byte program.
fn reference_issuance() -> TransactionData {
    let asset_id = AssetId::compute(&INITIAL_BLOCK, 1, &[0x51], b"");
    let value = AssetValue::Confidential {
        asset: AssetDescriptor::Explicit(asset_id),
        value: ValueDescriptor::Explicit(100),
    };
    let issuance = Issuance::new(vec![0; 8], value, INITIAL_BLOCK, vec![0x51]);
    assert_eq!(issuance.computed_asset_id(), asset_id);

    let mut program = vec![0x00, 0x14];
    program.extend_from_slice(&[0x42; 19]);

    TransactionBuilder::new()
        .version(2)
        .issue(issuance, vec![])
        .output(TxOutput::new(value, program, vec![]))
        .build()
        .unwrap()
}

/// Version 2 transaction exercising every optional part.
fn kitchen_sink() -> TransactionData {
    let explicit = AssetValue::Explicit(AssetAmount::new(AssetId([3; 32]), 1_000));
    let blinded = AssetValue::Confidential {
        asset: AssetDescriptor::Blinded(CompressedEdwardsY([4; 32])),
        value: ValueDescriptor::Blinded(CompressedEdwardsY([5; 32])),
    };
    let mut issuance = Issuance::new(b"nonce".to_vec(), blinded, INITIAL_BLOCK, vec![0x51, 0x52]);
    issuance.asset_definition = br#"{"name":"gold"}"#.to_vec();

    TransactionBuilder::new()
        .issue(issuance, vec![vec![0xaa; 72]])
        .spend(
            Outpoint::new(Hash([6; 32]), 3),
            OutputCommitment::new(explicit, vec![0x51]),
            vec![vec![0xbb; 64], vec![]],
        )
        .output(TxOutput::new(blinded, vec![0x51], b"out-ref".to_vec()).with_range_proof(vec![0xcc; 300]))
        .output(TxOutput::explicit(AssetId([3; 32]), 1_000, vec![0x6a]))
        .excess_commitment(ExcessCommitment::new([7; 32], [8; 64]))
        .excess_commitment(ExcessCommitment::new([9; 32], [10; 64]))
        .time_range(1_700_000_000_000, 1_700_000_600_000)
        .reference_data(vec![0xdd; 200])
        .build()
        .unwrap()
}

fn v1_transfer() -> TransactionData {
    let explicit = AssetValue::Explicit(AssetAmount::new(AssetId([3; 32]), 50));
    TransactionBuilder::new()
        .version(1)
        .spend(Outpoint::new(Hash([6; 32]), 0), OutputCommitment::new(explicit, vec![0x51]), vec![vec![1]])
        .output(TxOutput::explicit(AssetId([3; 32]), 50, vec![0x52]))
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Reference transaction
// ---------------------------------------------------------------------------

#[test]
fn reference_issuance_has_exact_layout() {
    let bytes = reference_issuance().to_bytes();
    // flags 1, version 1, time block 3, common witness 2, input count 1,
    // input 86, output count 1, output 63, reference data 1
    assert_eq!(bytes.len(), 159);
    assert_eq!(&bytes[..8], &[0x07, 0x02, 0x02, 0x00, 0x00, 0x01, 0x00, 0x01]);
    assert_eq!(bytes[8], 0x02, "input asset version");
    assert_eq!(bytes[bytes.len() - 1], 0x00, "empty reference data");
}

#[test]
fn reference_issuance_identity_encoding() {
    let tx = reference_issuance();
    let mut pruned = Vec::new();
    tx.write_with_flags(&mut pruned, SerFlags::NONE).unwrap();
    // no input witness (38) and no output witness (2)
    assert_eq!(pruned.len(), 159 - 40);
    assert_eq!(pruned[0], 0x00);
    assert_eq!(tx.hash(), hash_bytes(&pruned));
}

#[test]
fn reference_issuance_hashes_are_reproducible() {
    let tx = reference_issuance();
    let decoded = TransactionData::from_bytes(&tx.to_bytes()).unwrap();
    assert_eq!(decoded, tx);
    assert_eq!(decoded.hash(), tx.hash());
    assert_eq!(decoded.witness_hash(), tx.witness_hash());
    assert_eq!(decoded.issuance_hash(0).unwrap(), tx.issuance_hash(0).unwrap());
    assert_eq!(decoded.signature_hash(0).unwrap(), tx.signature_hash(0).unwrap());
    assert_ne!(tx.hash(), tx.witness_hash());
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn every_shape_reads_back_byte_for_byte() {
    for tx in [reference_issuance(), kitchen_sink(), v1_transfer(), TransactionData::default()] {
        let bytes = tx.to_bytes();
        let decoded = TransactionData::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.to_bytes(), bytes);

        let text = tx.to_hex();
        assert_eq!(TransactionData::from_hex(&text).unwrap(), tx);
    }
}

#[test]
fn kitchen_sink_keeps_every_part() {
    let tx = TransactionData::from_bytes(&kitchen_sink().to_bytes()).unwrap();
    assert_eq!(tx.excess_commitments().len(), 2);
    assert_eq!(tx.outputs[0].range_proof.len(), 300);
    assert_eq!(tx.inputs[1].outpoint().map(|op| op.index), Some(3));
    assert_eq!(tx.inputs[0].as_issuance().unwrap().asset_definition, br#"{"name":"gold"}"#);
    assert_eq!(tx.reference_data, vec![0xdd; 200]);
    assert!(tx.has_issuance());
}

// ---------------------------------------------------------------------------
// Hash properties
// ---------------------------------------------------------------------------

#[test]
fn witness_mutation_keeps_identity() {
    let base = kitchen_sink();

    let mut args = base.clone();
    args.inputs[1].arguments[0][0] ^= 1;
    let mut proof = base.clone();
    proof.outputs[0].range_proof.push(0);

    for mutated in [args, proof] {
        assert_eq!(mutated.hash(), base.hash());
        assert_ne!(mutated.witness_hash(), base.witness_hash());
    }
}

#[test]
fn commitment_mutation_changes_identity() {
    let base = kitchen_sink();

    let mut time = base.clone();
    time.max_time += 1;
    let mut refdata = base.clone();
    refdata.outputs[0].reference_data.clear();
    let mut prevout = base.clone();
    let mut spend = prevout.inputs[1].as_spend().unwrap().clone();
    spend.spent_output.control_program.push(0x00);
    prevout.inputs[1].body = InputBody::Spend(spend);
    let mut commitments = base.clone();
    commitments.version = TxVersion::V2 {
        excess_commitments: vec![],
    };

    for mutated in [time, refdata, prevout, commitments] {
        assert_ne!(mutated.hash(), base.hash());
    }
}

#[test]
fn tx_root_commits_to_witnesses() {
    let a = Transaction::new(kitchen_sink());
    let mut data = kitchen_sink();
    data.inputs[0].arguments.clear();
    let b = Transaction::new(data);

    assert_eq!(a.hash(), b.hash());
    assert_ne!(tx_root(&[a.clone()]), tx_root(&[b.clone()]));
    assert_eq!(tx_root(&[a.clone(), b.clone()]), tx_root(&[a, b]));
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[test]
fn only_full_serialization_flags_decode() {
    let mut bytes = reference_issuance().to_bytes();
    for flags in 0..=u8::MAX {
        bytes[0] = flags;
        let result = TransactionData::from_bytes(&bytes);
        if flags == 0x07 {
            assert!(result.is_ok());
        } else {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::DecodeMalformed, "flags {flags:#04x}");
        }
    }
}

#[test]
fn v1_common_witness_must_be_empty() {
    // Even a zero commitment count is rejected: version 1 has no common
    // witness fields, so the only valid block is the empty one.
    let bytes = v1_transfer().to_bytes();
    // flags, version, time block [0x02, 0x00, 0x00], then the common witness
    assert_eq!(&bytes[..6], &[0x07, 0x01, 0x02, 0x00, 0x00, 0x00]);

    let mut forged = bytes[..5].to_vec();
    forged.extend_from_slice(&[0x01, 0x00]);
    forged.extend_from_slice(&bytes[6..]);

    let err = TransactionData::from_bytes(&forged).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedVersionFeature);
}

#[test]
fn v1_time_block_is_strict() {
    let bytes = v1_transfer().to_bytes();
    let mut forged = bytes[..2].to_vec();
    forged.extend_from_slice(&[0x03, 0x00, 0x00, 0xff]);
    forged.extend_from_slice(&bytes[5..]);

    let err = TransactionData::from_bytes(&forged).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeTrailingData);
}

#[test]
fn future_version_time_block_is_permissive() {
    let mut tx = v1_transfer();
    tx.version = TxVersion::from_number(3);
    let bytes = tx.to_bytes();
    let mut forged = bytes[..2].to_vec();
    forged.extend_from_slice(&[0x03, 0x00, 0x00, 0xff]);
    forged.extend_from_slice(&bytes[5..]);

    assert_eq!(TransactionData::from_bytes(&forged).unwrap(), tx);
}

#[test]
fn future_version_time_block_still_needs_both_bounds() {
    let mut tx = v1_transfer();
    tx.version = TxVersion::from_number(3);
    let bytes = tx.to_bytes();
    let mut forged = bytes[..2].to_vec();
    forged.push(0x00);
    forged.extend_from_slice(&bytes[5..]);

    let err = TransactionData::from_bytes(&forged).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeTruncated);
    assert_eq!(
        err.to_string(),
        "reading transaction common fields: reading min time: truncated input"
    );
}

#[test]
fn common_witness_skips_appended_fields() {
    let mut tx = reference_issuance();
    tx.version = TxVersion::V2 {
        excess_commitments: vec![ExcessCommitment::new([7; 32], [8; 64])],
    };
    let bytes = tx.to_bytes();
    // flags, version, time block, then the common witness: 97 bytes holding
    // the count and one 96-byte commitment.
    assert_eq!(&bytes[5..7], &[0x61, 0x01]);

    let mut forged = bytes[..5].to_vec();
    forged.push(0x63);
    forged.extend_from_slice(&bytes[6..103]);
    forged.extend_from_slice(&[0xee, 0xff]);
    forged.extend_from_slice(&bytes[103..]);

    let decoded = TransactionData::from_bytes(&forged).unwrap();
    assert_eq!(decoded.excess_commitments(), tx.excess_commitments());
    assert_eq!(decoded.inputs, tx.inputs);
    assert_eq!(decoded.outputs, tx.outputs);
    assert_eq!(decoded.to_bytes(), bytes);
}

#[test]
fn every_truncation_fails() {
    let bytes = kitchen_sink().to_bytes();
    for len in 0..bytes.len() {
        assert!(TransactionData::from_bytes(&bytes[..len]).is_err(), "prefix of {len} bytes");
    }
}

#[test]
fn trailing_byte_fails() {
    let mut bytes = v1_transfer().to_bytes();
    bytes.push(0x00);
    let err = TransactionData::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeTrailingData);
}

#[test]
fn issuance_hash_preconditions() {
    let tx = kitchen_sink();
    assert!(tx.issuance_hash(0).is_ok());
    assert_eq!(tx.issuance_hash(1).unwrap_err().kind(), ErrorKind::NotAnIssuanceInput);
    assert_eq!(tx.issuance_hash(2).unwrap_err().kind(), ErrorKind::InputIndexOutOfRange);
    assert_eq!(tx.signature_hash(2).unwrap_err().kind(), ErrorKind::InputIndexOutOfRange);
}

#[test]
fn errors_say_where() {
    let bytes = kitchen_sink().to_bytes();
    // The encoding ends with the second output (asset version 1, a 38-byte
    // commitment block, empty reference data, empty witness block: 41
    // bytes) and the transaction reference data (2 + 200 bytes). Cut ten
    // bytes into that output.
    let cut = &bytes[..bytes.len() - 41 - 202 + 10];
    let err = TransactionData::from_bytes(cut).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeTruncated);
    assert_eq!(err.to_string(), "reading output 1: reading output commitment: truncated input");
}

#[test]
fn random_bytes_never_panic() {
    let mut rng = StdRng::seed_from_u64(0x6e6f7661);
    let valid = kitchen_sink().to_bytes();
    for _ in 0..2_000 {
        let len = rng.gen_range(0..400);
        let mut bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        if let Some(first) = bytes.first_mut() {
            *first = 0x07;
        }
        let _ = TransactionData::from_bytes(&bytes);

        let mut mutated = valid.clone();
        let at = rng.gen_range(0..mutated.len());
        mutated[at] = rng.gen();
        let _ = TransactionData::from_bytes(&mutated);
    }
}
