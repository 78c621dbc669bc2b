//! Use cases (orchestration)
//!
//! Whole-key import, export and generation for RSA private keys, RSA public
//! keys and HMAC keys. These coordinate the integer codec, the RSA glue and
//! the injected ports, and are the only code that writes to a [`KeySlot`].
//!
//! [`KeySlot`]: crate::model::KeySlot

mod export_key;
mod generate_key;
mod import_key;

pub use export_key::{export_hmac, export_rsa_priv, export_rsa_pub, ExportLength, EXPORT_ERROR};
pub use generate_key::{free_hmac, free_rsa, generate_hmac, generate_rsa};
pub use import_key::{import_hmac, import_rsa_priv, import_rsa_pub};
