//! Bounded reader over an in-memory byte slice.
//!
//! A [`Reader`] never reads past the slice it was given. Extensible blocks
//! hand their body parser a *sub-reader* bounded to the declared length,
//! so a buggy or hostile body can neither overrun into the next field nor
//! be silently misaligned: whatever it leaves behind is either an error
//! (strict) or skipped (permissive), decided in exactly one place.
//!
//! Every length and count is checked against the bytes actually remaining
//! before anything is allocated. Attacker-controlled prefixes cannot make
//! us reserve more memory than the input itself occupies.

use tracing::debug;

use crate::config::{MAX_VARINT_LENGTH, MAX_VARSTR31_LENGTH};
use crate::error::{Context, Error, Result};

/// Cursor over a byte slice with wire-format primitives.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    /// Creates a reader over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Fails with [`Error::TrailingData`] unless the reader is exhausted.
    pub fn finish(&self) -> Result<()> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(Error::TrailingData {
                remaining: self.buf.len(),
            })
        }
    }

    /// Consumes exactly `n` bytes.
    pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.buf.len() {
            return Err(Error::Truncated);
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    /// Consumes a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_slice(1)?[0])
    }

    /// Consumes a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    /// Reads an unsigned LEB128 varint.
    ///
    /// Rejects encodings longer than necessary (a final `0x00` group after
    /// a continuation byte) and values that do not fit in 64 bits, so each
    /// value has exactly one accepted encoding.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT_LENGTH {
            let byte = self.read_byte()?;
            let group = u64::from(byte & 0x7f);
            if i == MAX_VARINT_LENGTH - 1 && group > 1 {
                return Err(Error::malformed("varint overflows 64 bits"));
            }
            value |= group << (7 * i);
            if byte & 0x80 == 0 {
                if byte == 0 && i > 0 {
                    return Err(Error::malformed("non-minimal varint encoding"));
                }
                return Ok(value);
            }
        }
        Err(Error::malformed("varint overflows 64 bits"))
    }

    /// Reads a varint that must fit in 31 bits. Used for every count and
    /// length prefix.
    pub fn read_varint31(&mut self) -> Result<u32> {
        let value = self.read_varint()?;
        if value > MAX_VARSTR31_LENGTH {
            return Err(Error::malformed(format!(
                "value {value} exceeds 31-bit limit"
            )));
        }
        Ok(value as u32)
    }

    /// Reads a count prefix for a list whose elements take at least one
    /// byte each. A count the remaining input cannot possibly satisfy is
    /// reported as truncation up front.
    pub fn read_count(&mut self) -> Result<usize> {
        let count = self.read_varint31()? as usize;
        if count > self.buf.len() {
            return Err(Error::Truncated);
        }
        Ok(count)
    }

    /// Reads a varint length followed by that many raw bytes.
    pub fn read_varstr(&mut self) -> Result<Vec<u8>> {
        let len = self.read_varint31()? as usize;
        Ok(self.read_slice(len)?.to_vec())
    }

    /// Reads a varint count followed by that many varstrs.
    pub fn read_varstr_list(&mut self) -> Result<Vec<Vec<u8>>> {
        let count = self.read_count()?;
        let mut items = Vec::with_capacity(count);
        for i in 0..count {
            items.push(self.read_varstr().with_context(|| format!("reading item {i}"))?);
        }
        Ok(items)
    }

    /// Reads an extensible block.
    ///
    /// `body` gets a reader bounded to the block. When it returns, leftover
    /// bytes are an error if `strict` is set and skipped otherwise; either
    /// way `self` ends up positioned just past the block.
    pub fn read_extensible<T, F>(&mut self, strict: bool, body: F) -> Result<T>
    where
        F: FnOnce(&mut Reader<'a>) -> Result<T>,
    {
        let len = self.read_varint31()? as usize;
        let mut region = Reader::new(self.read_slice(len)?);
        let value = body(&mut region)?;
        if strict {
            region.finish()?;
        } else if !region.is_empty() {
            debug!(
                skipped = region.remaining(),
                "skipping unknown fields in extensible block"
            );
        }
        Ok(value)
    }
}
