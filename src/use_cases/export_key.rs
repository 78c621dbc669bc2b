use rsa::BigUint;
use tracing::{debug, warn};

use crate::error::{FormatError, KeysError, KeysResult};
use crate::logic::bigint_codec::UintWriter;
use crate::logic::key_compat::export_fields;
use crate::model::{HmacKey, RsaKey, HMAC_KEY_LEN};

/// Length reported by an export that failed
pub const EXPORT_ERROR: u32 = u32::MAX;

/// Collapse an export result into a plain length, using [`EXPORT_ERROR`]
/// for any failure.
pub trait ExportLength {
    fn or_sentinel(self) -> u32;
}

impl ExportLength for KeysResult<u32> {
    fn or_sentinel(self) -> u32 {
        self.unwrap_or(EXPORT_ERROR)
    }
}

fn write_uints(fields: &[&BigUint], out: Option<&mut [u8]>) -> KeysResult<u32> {
    let mut writer = UintWriter::new(out);
    for field in fields {
        writer.write(field)?;
    }
    Ok(writer.finish())
}

fn require<K>(key: Option<&K>) -> KeysResult<&K> {
    key.ok_or_else(|| {
        warn!("Cannot export a key which we don't have");
        KeysError::MissingKey
    })
}

/// Serialize an RSA private key.
///
/// Call once with `out == None` to learn the length, then again with a
/// buffer of at least that size; both calls return the same length.
pub fn export_rsa_priv(key: Option<&RsaKey>, out: Option<&mut [u8]>) -> KeysResult<u32> {
    let fields = export_fields(Some(require(key)?), true)?;
    let len = write_uints(&fields, out)?;

    debug!("Exported RSA private key: {} bytes", len);
    Ok(len)
}

/// Serialize the public half (`n, e`) of an RSA key.
pub fn export_rsa_pub(key: Option<&RsaKey>, out: Option<&mut [u8]>) -> KeysResult<u32> {
    let fields = export_fields(Some(require(key)?), false)?;
    let len = write_uints(&fields, out)?;

    debug!("Exported RSA public key: {} bytes", len);
    Ok(len)
}

/// Copy the raw HMAC secret out. Always 32 bytes.
pub fn export_hmac(key: Option<&HmacKey>, out: Option<&mut [u8]>) -> KeysResult<u32> {
    let key = require(key)?;

    if let Some(out) = out {
        if out.len() < HMAC_KEY_LEN {
            warn!("Unexpected end of key buffer");
            return Err(FormatError::BufferTooShort {
                needed: HMAC_KEY_LEN,
                available: out.len(),
            }
            .into());
        }
        out[..HMAC_KEY_LEN].copy_from_slice(key.as_bytes());
    }

    Ok(HMAC_KEY_LEN as u32)
}
