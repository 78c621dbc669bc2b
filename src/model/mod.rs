mod hmac_key;
mod key_id;
mod key_slot;
mod rsa_key;

pub use hmac_key::{HmacKey, HMAC_KEY_LEN};
pub use key_id::{KeyId, KeyKind, KeyMask};
pub use key_slot::KeySlot;
pub use rsa_key::{RsaKey, RsaPrivateParts};
