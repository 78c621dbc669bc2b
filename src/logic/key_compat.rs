//! Glue between wire-level integers and RSA key objects
//!
//! Size validation, assembling a key from its named integers, zero-copy
//! access to those integers in wire order, and key generation through the
//! injected [`RsaBackend`].

use rsa::BigUint;
use tracing::{debug, warn};

use crate::error::{KeysError, KeysResult};
use crate::model::{RsaKey, RsaPrivateParts};
use crate::ports::{RsaBackend, RsaParams};

/// Modulus length in bytes accepted by the key format
pub const RSA_MODULUS_BYTES: usize = 256;

/// Modulus length in bits accepted by the key format
pub const RSA_MODULUS_BITS: usize = 2048;

pub const RSA_PUBLIC_EXPONENT: u32 = 65537;

/// Whether the key's modulus is exactly 256 bytes and exactly 2048 bits.
///
/// Both checks are required: a 256-byte modulus with a short top byte has
/// fewer than 2048 bits and is rejected.
pub fn valid_size(key: &RsaKey) -> bool {
    key.modulus_bytes() == RSA_MODULUS_BYTES && key.modulus_bits() == RSA_MODULUS_BITS
}

/// Assemble a fresh key object from its integers.
///
/// `private` carries all six CRT fields or none, so a key is always either
/// fully private or public-only.
pub fn install(n: BigUint, e: BigUint, private: Option<RsaPrivateParts>) -> RsaKey {
    RsaKey::from_parts(n, e, private)
}

/// Borrow the key's integers in wire order: `n, e` and, when
/// `want_private` is set, `d, p, q, dmp1, dmq1, iqmp`.
pub fn export_fields(key: Option<&RsaKey>, want_private: bool) -> KeysResult<Vec<&BigUint>> {
    let key = key.ok_or(KeysError::MissingKey)?;

    let mut fields = vec![key.n(), key.e()];
    if want_private {
        let private = key.private().ok_or(KeysError::NotPrivate)?;
        fields.extend([
            &private.d,
            &private.p,
            &private.q,
            &private.dmp1,
            &private.dmq1,
            &private.iqmp,
        ]);
    }
    Ok(fields)
}

/// Generate a 2048-bit key pair with public exponent 65537.
pub fn generate<B>(backend: &B) -> KeysResult<RsaKey>
where
    B: RsaBackend + ?Sized,
{
    let params = RsaParams::default();
    let key = backend.generate(&params)?;

    if !key.is_private() {
        return Err(KeysError::Library(
            "key generation returned a public key".to_string(),
        ));
    }
    if !valid_size(&key) {
        warn!(
            "Generated key has invalid size: {} bytes, {} bits",
            key.modulus_bytes(),
            key.modulus_bits()
        );
        return Err(KeysError::Size {
            bytes: key.modulus_bytes(),
            bits: key.modulus_bits(),
        });
    }

    debug!("Generated {}-bit RSA key", key.modulus_bits());
    Ok(key)
}
