//! Primitive encoding/decoding for the binary record format.
//!
//! Implements zigzag varints (32- and 64-bit), length-prefixed byte strings
//! and fixed-width big-endian integers.

use std::borrow::Cow;

use crate::error::{DecodeError, EncodeError};
use crate::limits::{MAX_LENGTH_PREFIX, MAX_VARINT32_BYTES, MAX_VARINT64_BYTES};

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding binary data.
///
/// Wraps a fully-buffered record body and provides sequential reads of
/// primitives with bounds checking. Positions are relative to the start of
/// the wrapped slice.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        if self.pos >= self.data.len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(DecodeError::UnexpectedEof { context });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads an unsigned base-128 varint of at most `bits` bits.
    fn read_raw_varint(&mut self, bits: u32, context: &'static str) -> Result<u64, DecodeError> {
        let max_groups = if bits == 32 {
            MAX_VARINT32_BYTES
        } else {
            MAX_VARINT64_BYTES
        };
        let mut result: u64 = 0;
        let mut shift: u32 = 0;

        for _ in 0..max_groups {
            let byte = self.read_byte(context)?;
            let value = (byte & 0x7F) as u64;

            // The last group may only carry the bits left over
            if shift + 7 > bits && value >> (bits - shift) != 0 {
                return Err(DecodeError::VarintOverflow {
                    context,
                    bits: bits as u8,
                });
            }

            result |= value << shift;

            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }

        Err(DecodeError::VarintTooLong {
            context,
            bits: bits as u8,
            max_groups,
        })
    }

    /// Reads a zigzag-encoded 32-bit varint.
    #[inline]
    pub fn read_varint32(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        let unsigned = self.read_raw_varint(32, context)? as u32;
        Ok(zigzag_decode32(unsigned))
    }

    /// Reads a zigzag-encoded 64-bit varint.
    #[inline]
    pub fn read_varint64(&mut self, context: &'static str) -> Result<i64, DecodeError> {
        let unsigned = self.read_raw_varint(64, context)?;
        Ok(zigzag_decode(unsigned))
    }

    /// Reads a varint32 length, rejecting negative values.
    pub fn read_length(&mut self, context: &'static str) -> Result<usize, DecodeError> {
        let len = self.read_varint32(context)?;
        if len < 0 {
            return Err(DecodeError::NegativeLength {
                context,
                len: len as i64,
            });
        }
        Ok(len as usize)
    }

    /// Reads a length-prefixed byte array without copying.
    pub fn read_bytes_prefixed(&mut self, context: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self.read_length(context)?;
        self.read_bytes(len, context)
    }

    /// Reads a length-prefixed string, replacing malformed UTF-8.
    ///
    /// Borrows from the input when the bytes are valid UTF-8.
    pub fn read_str_lossy(&mut self, context: &'static str) -> Result<Cow<'a, str>, DecodeError> {
        let bytes = self.read_bytes_prefixed(context)?;
        Ok(String::from_utf8_lossy(bytes))
    }

    /// Reads a big-endian i32.
    #[inline]
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        let b = self.read_bytes(4, context)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a big-endian i16.
    #[inline]
    pub fn read_i16(&mut self, context: &'static str) -> Result<i16, DecodeError> {
        let b = self.read_bytes(2, context)?;
        Ok(i16::from_be_bytes([b[0], b[1]]))
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writer for encoding binary data.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates a new writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a new writer with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Returns the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Returns a reference to the written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes an unsigned base-128 varint.
    #[inline]
    pub fn write_raw_varint(&mut self, mut value: u64) {
        let mut buf = [0u8; MAX_VARINT64_BYTES];
        let mut len = 0;
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf[len] = byte;
            len += 1;
            if value == 0 {
                break;
            }
        }
        self.buf.extend_from_slice(&buf[..len]);
    }

    /// Writes a zigzag-encoded 32-bit varint.
    pub fn write_varint32(&mut self, value: i32) {
        self.write_raw_varint(zigzag_encode32(value) as u64);
    }

    /// Writes a zigzag-encoded 64-bit varint.
    pub fn write_varint64(&mut self, value: i64) {
        self.write_raw_varint(zigzag_encode(value));
    }

    /// Writes a varint32 length prefix.
    pub fn write_length(&mut self, len: usize, field: &'static str) -> Result<(), EncodeError> {
        if len > MAX_LENGTH_PREFIX {
            return Err(EncodeError::LengthExceedsLimit {
                field,
                len,
                max: MAX_LENGTH_PREFIX,
            });
        }
        self.write_varint32(len as i32);
        Ok(())
    }

    /// Writes a length-prefixed byte array.
    pub fn write_bytes_prefixed(&mut self, bytes: &[u8], field: &'static str) -> Result<(), EncodeError> {
        self.write_length(bytes.len(), field)?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, s: &str, field: &'static str) -> Result<(), EncodeError> {
        self.write_bytes_prefixed(s.as_bytes(), field)
    }

    /// Writes a big-endian i32.
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a big-endian i16.
    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Overwrites four already-written bytes at `pos` with a big-endian i32.
    ///
    /// # Panics
    ///
    /// Panics if `pos + 4` exceeds the bytes written so far.
    pub fn patch_i32(&mut self, pos: usize, value: i32) {
        self.buf[pos..pos + 4].copy_from_slice(&value.to_be_bytes());
    }
}

// =============================================================================
// ZIGZAG ENCODING
// =============================================================================

/// Encodes a signed integer using zigzag encoding.
///
/// Maps negative numbers to odd positive numbers:
/// 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, 2 -> 4, ...
#[inline]
pub fn zigzag_encode(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Decodes a zigzag-encoded unsigned integer back to signed.
#[inline]
pub fn zigzag_decode(n: u64) -> i64 {
    ((n >> 1) as i64) ^ (-((n & 1) as i64))
}

/// 32-bit variant of [`zigzag_encode`].
#[inline]
pub fn zigzag_encode32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// 32-bit variant of [`zigzag_decode`].
#[inline]
pub fn zigzag_decode32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ (-((n & 1) as i32))
}
