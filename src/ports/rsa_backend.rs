//! RsaBackend trait - capability to create RSA key pairs

use crate::error::KeysResult;
use crate::logic::key_compat::{RSA_MODULUS_BITS, RSA_PUBLIC_EXPONENT};
use crate::model::RsaKey;

/// Parameters for RSA key generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaParams {
    /// Modulus size in bits
    pub bits: usize,
    /// Public exponent
    pub exponent: u32,
}

impl Default for RsaParams {
    fn default() -> Self {
        Self {
            bits: RSA_MODULUS_BITS,
            exponent: RSA_PUBLIC_EXPONENT,
        }
    }
}

/// Capability to generate RSA keys
///
/// This trait abstracts the arbitrary-precision arithmetic / RSA primitive
/// provider, so key handling can be exercised against a deterministic fake.
pub trait RsaBackend {
    /// Generate a new private key
    ///
    /// # Arguments
    ///
    /// * `params` - Modulus size and public exponent
    ///
    /// # Errors
    ///
    /// Returns `KeysError::Library` carrying the provider's own diagnostic
    /// text if generation fails
    fn generate(&self, params: &RsaParams) -> KeysResult<RsaKey>;

    /// Derive the public key matching `key`
    fn derive_public(&self, key: &RsaKey) -> KeysResult<RsaKey> {
        Ok(key.to_public())
    }
}
