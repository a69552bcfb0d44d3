//! # Hashing
//!
//! Everything in the transaction layer hashes with SHA3-256. Transaction
//! IDs, witness hashes, signature hashes, reference-data placeholders and
//! block transaction roots all come out of the same [`Hasher`].
//!
//! ## Pooling
//!
//! A SHA3 state is 200 bytes of sponge plus buffers; resetting one is
//! cheaper than building one, and hash-heavy paths (validating a block's
//! worth of transactions) create thousands of them. [`Hasher::new`] checks
//! a state out of a small process-wide pool and the guard puts it back,
//! reset, when dropped. The pool is invisible to callers:
//!
//! - a checked-out state is always fresh;
//! - the state goes back on *every* exit path, including `?` early returns
//!   and panics unwinding through the computation;
//! - a half-finished computation can never leak into the next one, because
//!   the state is reset before it re-enters the pool.

use std::fmt;
use std::io;
use std::mem;
use std::str::FromStr;

use hex::FromHex;
use parking_lot::Mutex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::config::{HASH_LENGTH, MAX_POOLED_HASHERS};
use crate::encoding::{write_varstr, Reader};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Hash
// ---------------------------------------------------------------------------

/// A 32-byte SHA3-256 digest.
///
/// Equality is byte-wise. The textual form is lowercase hex; parsing
/// accepts either case.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(pub [u8; HASH_LENGTH]);

impl Hash {
    /// The all-zero hash. Not the hash of anything; useful as a sentinel.
    pub const ZERO: Hash = Hash([0u8; HASH_LENGTH]);

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Writes the 32 raw bytes (no length prefix).
    pub fn write_to<W: io::Write + ?Sized>(&self, w: &mut W) -> io::Result<usize> {
        w.write_all(&self.0)?;
        Ok(HASH_LENGTH)
    }

    /// Reads 32 raw bytes.
    pub fn read_from(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Hash(r.read_array()?))
    }
}

impl From<[u8; HASH_LENGTH]> for Hash {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Hash(bytes)
    }
}

impl From<Hash> for [u8; HASH_LENGTH] {
    fn from(hash: Hash) -> Self {
        hash.0
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(self.0))
    }
}

impl FromStr for Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Hash(<[u8; HASH_LENGTH]>::from_hex(s)?))
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Hasher
// ---------------------------------------------------------------------------

static POOL: Mutex<Vec<Sha3_256>> = parking_lot::const_mutex(Vec::new());

/// An exclusively owned SHA3-256 state, checked out of the shared pool.
///
/// Feed it with [`Hasher::update`] or through `io::Write` (which lets any
/// encoder stream straight into the hash), then call [`Hasher::finish`].
pub struct Hasher {
    state: Sha3_256,
}

impl Hasher {
    /// Checks out a fresh state.
    pub fn new() -> Self {
        let state = POOL.lock().pop().unwrap_or_default();
        Self { state }
    }

    /// Appends bytes to the hash input.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Produces the digest and returns the state to the pool.
    pub fn finish(mut self) -> Hash {
        let mut out = [0u8; HASH_LENGTH];
        out.copy_from_slice(&self.state.finalize_reset());
        Hash(out)
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Hasher {
    fn drop(&mut self) {
        let mut state = mem::take(&mut self.state);
        Digest::reset(&mut state);
        let mut pool = POOL.lock();
        if pool.len() < MAX_POOLED_HASHERS {
            pool.push(state);
        }
    }
}

impl io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// SHA3-256 of a single byte slice.
pub fn hash_bytes(data: &[u8]) -> Hash {
    let mut h = Hasher::new();
    h.update(data);
    h.finish()
}

/// Writes the placeholder that stands in for `data` when reference data is
/// serialized without the metadata flag: an empty varstr for empty data,
/// otherwise a varstr holding `SHA3-256(data)`.
///
/// Empty data thus encodes identically with or without the flag.
pub fn write_fast_hash<W: io::Write + ?Sized>(w: &mut W, data: &[u8]) -> io::Result<usize> {
    if data.is_empty() {
        return write_varstr(w, &[]);
    }
    write_varstr(w, hash_bytes(data).as_bytes())
}

// ---------------------------------------------------------------------------
// Merkle root
// ---------------------------------------------------------------------------

const LEAF_PREFIX: u8 = 0x00;
const INTERIOR_PREFIX: u8 = 0x01;

/// Computes the root of a binary Merkle tree over `leaves`.
///
/// Leaves and interior nodes are hashed under distinct one-byte prefixes,
/// so a leaf can never be passed off as an interior node. A list of `n > 1`
/// leaves splits at the largest power of two strictly below `n`; nothing
/// is ever duplicated, which rules out the odd-leaf mutation trick that
/// duplicate-last trees suffer from.
///
/// The empty list hashes to `SHA3-256("")`.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    match leaves {
        [] => hash_bytes(&[]),
        [leaf] => {
            let mut h = Hasher::new();
            h.update(&[LEAF_PREFIX]);
            h.update(leaf.as_bytes());
            h.finish()
        }
        _ => {
            let split = largest_power_of_two_below(leaves.len());
            let left = merkle_root(&leaves[..split]);
            let right = merkle_root(&leaves[split..]);
            let mut h = Hasher::new();
            h.update(&[INTERIOR_PREFIX]);
            h.update(left.as_bytes());
            h.update(right.as_bytes());
            h.finish()
        }
    }
}

/// For `n >= 2`, the largest power of two `k` with `k < n`.
fn largest_power_of_two_below(n: usize) -> usize {
    1 << (usize::BITS - 1 - (n - 1).leading_zeros())
}
