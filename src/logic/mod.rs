//! Pure logic: the integer wire codec and RSA key glue
//!
//! Nothing here touches a random source or a concrete RSA provider; key
//! generation goes through [`crate::ports::RsaBackend`].

pub mod bigint_codec;
pub mod key_compat;
