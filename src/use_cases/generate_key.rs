use tracing::debug;

use crate::error::KeysResult;
use crate::logic::key_compat;
use crate::logic::key_compat::valid_size;
use crate::model::{HmacKey, KeySlot, RsaKey, HMAC_KEY_LEN};
use crate::ports::{EntropySource, RsaBackend};

/// Generate a fresh RSA key pair into `priv_slot` and `pub_slot`.
///
/// Both keys are built before either slot is written, so a failure leaves
/// both slots untouched.
pub fn generate_rsa<B>(
    backend: &B,
    priv_slot: &mut KeySlot<RsaKey>,
    pub_slot: &mut KeySlot<RsaKey>,
) -> KeysResult<()>
where
    B: RsaBackend + ?Sized,
{
    let private = key_compat::generate(backend)?;
    let public = backend.derive_public(&private)?;
    debug_assert!(valid_size(&public));

    debug!("Generated RSA key pair: {:?}", public);
    priv_slot.replace(private);
    pub_slot.replace(public);
    Ok(())
}

/// Fill `slot` with a fresh 32-byte secret from `entropy`.
///
/// Blocks for as long as the entropy source does.
pub fn generate_hmac<E>(entropy: &mut E, slot: &mut KeySlot<HmacKey>) -> KeysResult<()>
where
    E: EntropySource + ?Sized,
{
    let mut key = HmacKey::new([0u8; HMAC_KEY_LEN]);
    entropy.fill(key.as_mut_array())?;

    debug!("Generated HMAC key");
    slot.replace(key);
    Ok(())
}

/// Drop the RSA key in `slot`, if any.
pub fn free_rsa(slot: &mut KeySlot<RsaKey>) {
    slot.free();
}

/// Drop and wipe the HMAC key in `slot`, if any.
pub fn free_hmac(slot: &mut KeySlot<HmacKey>) {
    slot.free();
}
