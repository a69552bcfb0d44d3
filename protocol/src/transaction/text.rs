//! Text and storage adapters.
//!
//! A transaction's text form is the lowercase hex of its full
//! serialization; its storage form is the serialization itself. Both
//! directions go through the same codec, so the adapters add no rules of
//! their own. The serde impls use the hex form.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::data::{Transaction, TransactionData};
use crate::error::{Error, Result};

impl TransactionData {
    /// Lowercase hex of the full serialization.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decodes hex text. Either letter case is accepted.
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text)?;
        Self::from_bytes(&bytes)
    }
}

impl Transaction {
    /// Decodes and hashes a transaction from hex text.
    pub fn from_hex(text: &str) -> Result<Self> {
        TransactionData::from_hex(text).map(Self::new)
    }
}

impl fmt::Display for TransactionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.data(), f)
    }
}

impl FromStr for TransactionData {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl FromStr for Transaction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for TransactionData {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TransactionData {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(d)?;
        Self::from_hex(&text).map_err(de::Error::custom)
    }
}

impl Serialize for Transaction {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.data().serialize(s)
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        TransactionData::deserialize(d).map(Self::new)
    }
}
