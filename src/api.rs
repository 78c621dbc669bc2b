//! Default-wired entry points
//!
//! Thin wrappers over [`crate::use_cases`] that plug in the RustCrypto RSA
//! backend and the operating system entropy source.

use crate::adapters::{OsEntropy, RustCryptoBackend};
use crate::error::KeysResult;
use crate::key_cache::KeyCache;
use crate::use_cases::{
    generate_hmac as generate_hmac_use_case, generate_rsa as generate_rsa_use_case,
};

pub use crate::model::*;
pub use crate::use_cases::{
    export_hmac, export_rsa_priv, export_rsa_pub, free_hmac, free_rsa, import_hmac,
    import_rsa_priv, import_rsa_pub, ExportLength, EXPORT_ERROR,
};

/// Generate a 2048-bit RSA key pair.
pub fn generate_rsa(
    priv_slot: &mut KeySlot<RsaKey>,
    pub_slot: &mut KeySlot<RsaKey>,
) -> KeysResult<()> {
    generate_rsa_use_case(&RustCryptoBackend, priv_slot, pub_slot)
}

/// Generate a 32-byte HMAC key from the OS random source.
pub fn generate_hmac(slot: &mut KeySlot<HmacKey>) -> KeysResult<()> {
    generate_hmac_use_case(&mut OsEntropy, slot)
}

/// Generate the keys in `mask` into `cache`.
pub fn generate_keys(cache: &mut KeyCache, mask: KeyMask) -> KeysResult<()> {
    cache.generate(mask, &RustCryptoBackend, &mut OsEntropy)
}
