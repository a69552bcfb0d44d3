//! Excess commitments for confidential-asset transactions.
//!
//! When amounts are blinded, inputs and outputs only balance up to the
//! sum of their blinding factors. An *excess commitment* commits to that
//! leftover and carries a signature proving nobody snuck value in through
//! it. The algebra belongs to the confidential-assets layer; this crate
//! only moves the bytes around.
//!
//! Nothing here decompresses the point or checks the signature. A
//! commitment is a fixed 96-byte value that reads back exactly as written.

use std::io;

use curve25519_dalek::edwards::CompressedEdwardsY;
use serde::{Deserialize, Serialize};

use crate::config::EXCESS_COMMITMENT_LENGTH;
use crate::encoding::Reader;
use crate::error::Result;

/// Length of the signature part (`e || s`, two 32-byte scalars).
const SIGNATURE_LENGTH: usize = 64;

/// An opaque excess commitment: a compressed Edwards point and a Schnorr
/// signature over it.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcessCommitment {
    /// Commitment to the excess blinding factor.
    pub point: CompressedEdwardsY,
    /// Signature by the excess, in wire order.
    #[serde(with = "signature_hex")]
    pub signature: [u8; SIGNATURE_LENGTH],
}

impl ExcessCommitment {
    /// Builds a commitment from its wire parts.
    pub fn new(point: [u8; 32], signature: [u8; SIGNATURE_LENGTH]) -> Self {
        Self {
            point: CompressedEdwardsY(point),
            signature,
        }
    }

    /// Writes the fixed 96-byte encoding.
    pub fn write_to<W: io::Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        w.write_all(self.point.as_bytes())?;
        w.write_all(&self.signature)?;
        Ok(EXCESS_COMMITMENT_LENGTH)
    }

    /// Reads the fixed 96-byte encoding.
    pub fn read_from(r: &mut Reader<'_>) -> Result<Self> {
        let point = r.read_array::<32>()?;
        let signature = r.read_array::<SIGNATURE_LENGTH>()?;
        Ok(Self::new(point, signature))
    }
}

impl std::fmt::Debug for ExcessCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExcessCommitment")
            .field("point", &hex::encode(self.point.as_bytes()))
            .field("signature", &hex::encode(self.signature))
            .finish()
    }
}

// serde only derives array impls up to 32 elements.
mod signature_hex {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::SIGNATURE_LENGTH;

    pub fn serialize<S: Serializer>(sig: &[u8; SIGNATURE_LENGTH], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(sig))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; SIGNATURE_LENGTH], D::Error> {
        let text = String::deserialize(d)?;
        let mut out = [0u8; SIGNATURE_LENGTH];
        hex::decode_to_slice(&text, &mut out).map_err(de::Error::custom)?;
        Ok(out)
    }
}
