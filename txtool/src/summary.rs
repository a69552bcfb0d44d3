//! JSON summaries of decoded transactions.

use serde::Serialize;

use nova_bc::crypto::Hash;
use nova_bc::transaction::{InputBody, OutputKind, Transaction, TxInput, TxOutput};

#[derive(Debug, Serialize)]
pub struct TxSummary {
    pub version: u64,
    pub known_version: bool,
    pub min_time: u64,
    pub max_time: u64,
    pub hash: Hash,
    pub witness_hash: Hash,
    pub excess_commitments: usize,
    pub reference_data: String,
    pub inputs: Vec<InputSummary>,
    pub outputs: Vec<OutputSummary>,
}

#[derive(Debug, Serialize)]
pub struct InputSummary {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub asset_version: u64,
    pub asset_id: Option<String>,
    pub amount: Option<u64>,
    /// `<tx hash>:<index>` for spends.
    pub spent_output: Option<String>,
    pub arguments: usize,
}

#[derive(Debug, Serialize)]
pub struct OutputSummary {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub asset_version: u64,
    pub asset_id: Option<String>,
    pub amount: Option<u64>,
    pub control_program: String,
}

impl TxSummary {
    pub fn new(tx: &Transaction) -> Self {
        Self {
            version: tx.version_number(),
            known_version: tx.version.is_known(),
            min_time: tx.min_time,
            max_time: tx.max_time,
            hash: tx.hash(),
            witness_hash: tx.witness_hash(),
            excess_commitments: tx.excess_commitments().len(),
            reference_data: hex::encode(&tx.reference_data),
            inputs: tx.inputs.iter().map(InputSummary::new).collect(),
            outputs: tx.outputs.iter().map(OutputSummary::new).collect(),
        }
    }
}

impl InputSummary {
    fn new(input: &TxInput) -> Self {
        let (kind, spent_output) = match &input.body {
            InputBody::Issuance(_) => ("issuance", None),
            InputBody::Spend(sp) => ("spend", Some(format!("{}:{}", sp.outpoint.tx_hash, sp.outpoint.index))),
        };
        Self {
            kind,
            asset_version: input.asset_version(),
            asset_id: input.asset_id().map(|id| id.to_string()),
            amount: input.amount(),
            spent_output,
            arguments: input.arguments().len(),
        }
    }
}

impl OutputSummary {
    fn new(output: &TxOutput) -> Self {
        let kind = match output.kind() {
            OutputKind::Control => "control",
            OutputKind::Retire => "retire",
        };
        Self {
            kind,
            asset_version: output.asset_version(),
            asset_id: output.asset_id().map(|id| id.to_string()),
            amount: output.asset_amount().map(|aa| aa.amount),
            control_program: hex::encode(output.control_program()),
        }
    }
}
