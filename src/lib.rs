//! Serialization and lifecycle of RSA and HMAC keys
//!
//! Keys travel as compact little-endian blobs: RSA keys as a fixed-order
//! sequence of length-prefixed integers, HMAC keys as 32 raw bytes. Several
//! keys can be bundled into a container through [`KeyCache`].
//!
//! The RSA arithmetic provider and the random source are injected through
//! [`ports::RsaBackend`] and [`ports::EntropySource`]; [`api`] wires in the
//! default implementations.

pub mod adapters;
pub mod api;
pub mod error;
pub mod key_cache;
pub mod logic;
pub mod model;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use error::{FormatError, KeyCacheError, KeysError, KeysResult};
pub use key_cache::KeyCache;
pub use model::{HmacKey, KeyId, KeyMask, KeySlot, RsaKey};

// Re-export public API
pub use api::{generate_hmac, generate_keys, generate_rsa};
