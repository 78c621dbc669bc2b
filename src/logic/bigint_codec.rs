//! Length-prefixed little-endian big integer codec
//!
//! One integer on the wire is `LEN32 || magnitude`: a 4-byte little-endian
//! byte count followed by the magnitude, least significant byte first.
//! Zero has an empty magnitude. This is the only place where integers
//! change byte order; everywhere else they stay in the provider's
//! native representation.

use rsa::BigUint;
use tracing::warn;
use zeroize::Zeroizing;

use crate::error::{FormatError, KeysError, KeysResult};

/// Size of the length prefix in bytes
pub const LEN_FIELD: usize = 4;

/// Largest total a length accumulation may reach; `u32::MAX` is reserved
/// for the export failure sentinel.
pub const MAX_ENCODED_LEN: u32 = u32::MAX - 1;

/// Magnitude of `value` in little-endian order.
pub(crate) fn magnitude_le(value: &BigUint) -> Zeroizing<Vec<u8>> {
    if value.bits() == 0 {
        return Zeroizing::new(Vec::new());
    }
    Zeroizing::new(value.to_bytes_le())
}

pub(crate) fn from_magnitude_le(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_le(bytes)
}

/// Add `add` bytes to a running length, refusing to wrap or to reach the
/// sentinel value.
pub fn accumulate(total: u32, add: usize) -> KeysResult<u32> {
    u32::try_from(add)
        .ok()
        .and_then(|add| total.checked_add(add))
        .filter(|sum| *sum <= MAX_ENCODED_LEN)
        .ok_or(KeysError::Range)
}

/// Decode one integer from the front of `buf`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_uint(buf: &[u8]) -> KeysResult<(BigUint, usize)> {
    if buf.len() < LEN_FIELD {
        warn!("Unexpected EOF of key data");
        return Err(FormatError::UnexpectedEof {
            needed: LEN_FIELD,
            remaining: buf.len(),
        }
        .into());
    }
    let mut len_bytes = [0u8; LEN_FIELD];
    len_bytes.copy_from_slice(&buf[..LEN_FIELD]);
    let len = u32::from_le_bytes(len_bytes);

    let payload_len = usize::try_from(len)
        .ok()
        .filter(|n| *n <= isize::MAX as usize)
        .ok_or(FormatError::LengthTooLarge { len })?;

    let payload = &buf[LEN_FIELD..];
    if payload.len() < payload_len {
        warn!("Unexpected EOF of key data");
        return Err(FormatError::UnexpectedEof {
            needed: payload_len,
            remaining: payload.len(),
        }
        .into());
    }

    let value = from_magnitude_le(&payload[..payload_len]);
    Ok((value, LEN_FIELD + payload_len))
}

/// Encode one integer.
///
/// With `out == None` only the encoded length (prefix plus magnitude) is
/// computed. With a buffer, the integer is written to its front and the same
/// length is returned.
pub fn encode_uint(value: &BigUint, out: Option<&mut [u8]>) -> KeysResult<u32> {
    let magnitude = magnitude_le(value);
    let total = accumulate(accumulate(0, LEN_FIELD)?, magnitude.len())?;

    if let Some(out) = out {
        if out.len() < LEN_FIELD {
            warn!("Unexpected end of key buffer");
            return Err(FormatError::BufferTooShort {
                needed: LEN_FIELD,
                available: out.len(),
            }
            .into());
        }
        let (len_field, rest) = out.split_at_mut(LEN_FIELD);
        // fits: accumulate() bounded the magnitude length to u32
        len_field.copy_from_slice(&(magnitude.len() as u32).to_le_bytes());

        if rest.len() < magnitude.len() {
            warn!("Unexpected end of key buffer");
            return Err(FormatError::BufferTooShort {
                needed: magnitude.len(),
                available: rest.len(),
            }
            .into());
        }
        rest[..magnitude.len()].copy_from_slice(&magnitude);
    }

    Ok(total)
}

/// Sequential reader over a buffer of encoded integers.
pub struct UintReader<'a> {
    buf: &'a [u8],
}

impl<'a> UintReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn read(&mut self) -> KeysResult<BigUint> {
        let (value, used) = decode_uint(self.buf)?;
        self.buf = &self.buf[used..];
        Ok(value)
    }

    /// Read an integer that must be wiped if the caller bails out.
    pub fn read_secret(&mut self) -> KeysResult<Zeroizing<BigUint>> {
        self.read().map(Zeroizing::new)
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Fail if any bytes are left unconsumed.
    pub fn finish(self) -> KeysResult<()> {
        if !self.buf.is_empty() {
            warn!("Unexpected trailing key data: {} bytes", self.buf.len());
            return Err(FormatError::TrailingData {
                remaining: self.buf.len(),
            }
            .into());
        }
        Ok(())
    }
}

/// Two-pass writer: sizes a sequence of integers when constructed without a
/// buffer, and fills the buffer otherwise.
pub struct UintWriter<'a> {
    out: Option<&'a mut [u8]>,
    total: u32,
}

impl<'a> UintWriter<'a> {
    pub fn new(out: Option<&'a mut [u8]>) -> Self {
        Self { out, total: 0 }
    }

    pub fn write(&mut self, value: &BigUint) -> KeysResult<()> {
        let written = match self.out.take() {
            Some(buf) => {
                let written = encode_uint(value, Some(&mut *buf))?;
                self.out = Some(&mut buf[written as usize..]);
                written
            }
            None => encode_uint(value, None)?,
        };
        self.total = accumulate(self.total, written as usize)?;
        Ok(())
    }

    /// Total encoded length so far.
    pub fn finish(self) -> u32 {
        self.total
    }
}
