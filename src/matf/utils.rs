//! Low-level byte reading utilities

use std::io::{ErrorKind, Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::matf::types::error::{MatError, Result};
use crate::matf::types::models::Endianness;

/// Every payload is padded to a multiple of this many bytes.
pub const ALIGNMENT: u64 = 8;

/// Rounds a consumed byte count up to the next 8-byte boundary.
pub fn align8(consumed: u64) -> u64 {
    consumed.next_multiple_of(ALIGNMENT)
}

/// Number of padding bytes that follow a payload of `length` bytes.
pub fn padding_after(length: u64) -> u64 {
    align8(length) - length
}

/// Byte-order-aware sequential reader.
///
/// The byte order is fixed at construction. Every read advances
/// [`position`](ByteCursor::position) by the bytes it consumed, and a read
/// that runs past the end of the stream fails with
/// [`MatError::InsufficientData`] naming requested versus available bytes.
#[derive(Debug)]
pub struct ByteCursor<R> {
    inner: R,
    endianness: Endianness,
    position: u64,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R, endianness: Endianness) -> Self {
        Self::with_position(inner, endianness, 0)
    }

    /// Creates a cursor over a stream that has already been read up to `position`.
    pub fn with_position(inner: R, endianness: Endianness, position: u64) -> Self {
        Self {
            inner,
            endianness,
            position,
        }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Total bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let buf = self.read_array::<2>()?;
        Ok(match self.endianness {
            Endianness::Little => LittleEndian::read_u16(&buf),
            Endianness::Big => BigEndian::read_u16(&buf),
        })
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let buf = self.read_array::<4>()?;
        Ok(self.u32_from(&buf))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let buf = self.read_array::<4>()?;
        Ok(match self.endianness {
            Endianness::Little => LittleEndian::read_i32(&buf),
            Endianness::Big => BigEndian::read_i32(&buf),
        })
    }

    /// Decodes a `u32` from bytes already in hand, using this cursor's byte order.
    pub fn u32_from(&self, bytes: &[u8; 4]) -> u32 {
        match self.endianness {
            Endianness::Little => LittleEndian::read_u32(bytes),
            Endianness::Big => BigEndian::read_u32(bytes),
        }
    }

    /// Reads exactly `n` bytes. `n == 0` returns an empty buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        // Grow with the data actually present rather than trusting `n`.
        let mut buf = Vec::with_capacity(n.min(64 * 1024));
        let read = self.inner.by_ref().take(n as u64).read_to_end(&mut buf)?;
        self.position += read as u64;
        if read < n {
            return Err(MatError::InsufficientData {
                requested: n,
                available: read,
            });
        }
        Ok(buf)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        let read = self.fill(&mut buf)?;
        if read < N {
            return Err(MatError::InsufficientData {
                requested: N,
                available: read,
            });
        }
        Ok(buf)
    }

    /// Reads as many bytes as are available, up to `buf.len()`.
    ///
    /// Returns the number of bytes read; fewer than requested means the
    /// stream ended.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Discards `n` bytes without inspecting them.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        if n == 0 {
            return Ok(());
        }
        let skipped = std::io::copy(&mut self.inner.by_ref().take(n), &mut std::io::sink())?;
        self.position += skipped;
        if skipped < n {
            return Err(MatError::InsufficientData {
                requested: n as usize,
                available: skipped as usize,
            });
        }
        Ok(())
    }

    /// Reads everything left in the stream.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let read = self.inner.read_to_end(&mut buf)?;
        self.position += read as u64;
        Ok(buf)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align8_rounds_up_to_boundary() {
        for (input, expected) in [(0, 0), (1, 8), (7, 8), (8, 8), (9, 16), (15, 16), (16, 16)] {
            assert_eq!(align8(input), expected, "align8({})", input);
        }
        assert_eq!(padding_after(9), 7);
        assert_eq!(padding_after(24), 0);
    }

    #[test]
    fn reads_honor_byte_order() {
        let bytes = [0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut little = ByteCursor::new(&bytes[..], Endianness::Little);
        assert_eq!(little.read_u32().unwrap(), 1);
        assert_eq!(little.read_i32().unwrap(), -1);
        assert_eq!(little.position(), 8);

        let mut big = ByteCursor::new(&bytes[..], Endianness::Big);
        assert_eq!(big.read_u32().unwrap(), 0x0100_0000);
    }

    #[test]
    fn zero_length_read_is_a_no_op() {
        let mut cursor = ByteCursor::new(&[][..], Endianness::Little);
        assert!(cursor.read_bytes(0).unwrap().is_empty());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn short_read_names_requested_and_available() {
        let mut cursor = ByteCursor::new(&[1u8, 2, 3][..], Endianness::Little);
        match cursor.read_bytes(5) {
            Err(MatError::InsufficientData {
                requested,
                available,
            }) => {
                assert_eq!((requested, available), (5, 3));
            }
            other => panic!("expected InsufficientData, got {:?}", other),
        }

        let mut cursor = ByteCursor::new(&[1u8, 2][..], Endianness::Big);
        assert!(matches!(
            cursor.read_u32(),
            Err(MatError::InsufficientData {
                requested: 4,
                available: 2
            })
        ));
    }

    #[test]
    fn skip_past_end_is_truncation() {
        let mut cursor = ByteCursor::new(&[0u8; 4][..], Endianness::Little);
        cursor.skip(3).unwrap();
        assert!(matches!(cursor.skip(2), Err(MatError::InsufficientData { .. })));
    }
}
