use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::FormatError;

/// HMAC secret length in bytes
pub const HMAC_KEY_LEN: usize = 32;

/// A 32-byte HMAC secret, wiped when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HmacKey([u8; HMAC_KEY_LEN]);

impl HmacKey {
    pub const fn new(bytes: [u8; HMAC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(key: &[u8]) -> Result<Self, FormatError> {
        if key.len() != HMAC_KEY_LEN {
            return Err(FormatError::InvalidHmacLength {
                expected: HMAC_KEY_LEN,
                actual: key.len(),
            });
        }
        let mut bytes = [0u8; HMAC_KEY_LEN];
        bytes.copy_from_slice(key);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn as_mut_array(&mut self) -> &mut [u8; HMAC_KEY_LEN] {
        &mut self.0
    }
}

impl fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HmacKey([REDACTED])")
    }
}
