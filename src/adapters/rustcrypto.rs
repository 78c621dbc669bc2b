//! RustCrypto implementation of the RSA backend
//!
//! Key generation is delegated to the `rsa` crate; the resulting key is
//! converted into our [`RsaKey`] with all CRT fields populated.

use rand::rngs::OsRng;
use rsa::{BigUint, RsaPrivateKey};
use tracing::debug;

use crate::error::{KeysError, KeysResult};
use crate::model::RsaKey;
use crate::ports::{RsaBackend, RsaParams};

/// RSA backend backed by the `rsa` crate and the operating system RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoBackend;

impl RsaBackend for RustCryptoBackend {
    fn generate(&self, params: &RsaParams) -> KeysResult<RsaKey> {
        let exponent = BigUint::from(params.exponent);

        debug!(
            "Generating {}-bit RSA key, e = {}",
            params.bits, params.exponent
        );
        let key = RsaPrivateKey::new_with_exp(&mut OsRng, params.bits, &exponent)
            .map_err(|e| KeysError::Library(format!("RSA key generation failed: {}", e)))?;

        RsaKey::try_from(&key)
    }
}
