//! Primitive writers for the wire format.
//!
//! All writers take any `io::Write` sink and return the number of bytes
//! written. Sink failures are returned as-is; a well-formed value written
//! to a `Vec<u8>` or a [`crate::crypto::Hasher`] never fails.

use std::io::{self, Write};

/// Writes `value` as an unsigned LEB128 varint (7 bits per byte, low
/// groups first, high bit set on every byte but the last).
pub fn write_varint<W: Write + ?Sized>(w: &mut W, mut value: u64) -> io::Result<usize> {
    let mut buf = [0u8; crate::config::MAX_VARINT_LENGTH];
    let mut n = 0;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf[n] = byte;
            n += 1;
            break;
        }
        buf[n] = byte | 0x80;
        n += 1;
    }
    w.write_all(&buf[..n])?;
    Ok(n)
}

/// Writes a varint length prefix followed by the raw bytes.
pub fn write_varstr<W: Write + ?Sized>(w: &mut W, data: &[u8]) -> io::Result<usize> {
    let n = write_varint(w, data.len() as u64)?;
    w.write_all(data)?;
    Ok(n + data.len())
}

/// Writes a varint count followed by each item as a varstr.
pub fn write_varstr_list<W, T>(w: &mut W, items: &[T]) -> io::Result<usize>
where
    W: Write + ?Sized,
    T: AsRef<[u8]>,
{
    let mut n = write_varint(w, items.len() as u64)?;
    for item in items {
        n += write_varstr(w, item.as_ref())?;
    }
    Ok(n)
}

/// Writes an extensible block: the body is rendered into a scratch buffer
/// so its length can be written first.
///
/// Readers that do not understand fields appended to the end of `body` can
/// skip them using the length prefix.
pub fn write_extensible<W, F>(w: &mut W, body: F) -> io::Result<usize>
where
    W: Write + ?Sized,
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut buf = Vec::new();
    body(&mut buf)?;
    write_varstr(w, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint(v: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        let n = write_varint(&mut buf, v).unwrap();
        assert_eq!(n, buf.len());
        buf
    }

    #[test]
    fn varint_known_vectors() {
        assert_eq!(varint(0), vec![0x00]);
        assert_eq!(varint(1), vec![0x01]);
        assert_eq!(varint(127), vec![0x7f]);
        assert_eq!(varint(128), vec![0x80, 0x01]);
        assert_eq!(varint(300), vec![0xac, 0x02]);
        assert_eq!(varint(16_384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn varint_max_is_ten_bytes() {
        let buf = varint(u64::MAX);
        assert_eq!(buf.len(), 10);
        assert_eq!(buf[9], 0x01);
    }

    #[test]
    fn varstr_prefixes_length() {
        let mut buf = Vec::new();
        let n = write_varstr(&mut buf, b"nova").unwrap();
        assert_eq!(n, 5);
        assert_eq!(buf, b"\x04nova");
    }

    #[test]
    fn varstr_list_prefixes_count() {
        let mut buf = Vec::new();
        write_varstr_list(&mut buf, &[vec![0xaa], vec![]]).unwrap();
        assert_eq!(buf, vec![0x02, 0x01, 0xaa, 0x00]);
    }

    #[test]
    fn extensible_block_frames_body() {
        let mut buf = Vec::new();
        let n = write_extensible(&mut buf, |w| {
            write_varint(w, 1)?;
            write_varint(w, 300)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(buf, vec![0x03, 0x01, 0xac, 0x02]);
        assert_eq!(n, 4);
    }

    #[test]
    fn empty_extensible_block_is_one_byte() {
        let mut buf = Vec::new();
        write_extensible(&mut buf, |_| Ok(())).unwrap();
        assert_eq!(buf, vec![0x00]);
    }
}
