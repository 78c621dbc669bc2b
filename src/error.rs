//! Error types for keyblob
//!
//! This module defines the error hierarchy for all key import, export and
//! generation operations. Every variant is recoverable: malformed external
//! input is reported to the caller, never turned into a panic.

use thiserror::Error;

/// Result type alias for keyblob operations
///
/// This is a convenience alias for `Result<T, KeysError>`.
pub type KeysResult<T> = Result<T, KeysError>;

/// Top-level error type for all keyblob operations
#[derive(Error, Debug)]
pub enum KeysError {
    /// Truncated buffer, bad length field or trailing data
    #[error("Key data format error: {0}")]
    Format(#[from] FormatError),

    /// RSA modulus is not exactly 2048 bits / 256 bytes
    #[error("RSA key has invalid size: {bytes} bytes, {bits} bits")]
    Size { bytes: usize, bits: usize },

    /// A length accumulation would overflow the 32-bit length space
    #[error("Key length overflow")]
    Range,

    /// Scratch storage could not be obtained
    #[error("Could not allocate key storage")]
    Allocation,

    /// The entropy source failed to produce bytes
    #[error("Could not obtain sufficient entropy: {reason}")]
    Entropy { reason: String },

    /// The RSA primitive provider reported a failure
    #[error("RSA library error: {0}")]
    Library(String),

    /// Export was requested from an empty key slot
    #[error("Cannot export a key which we don't have")]
    MissingKey,

    /// Private fields were requested from a public-only key
    #[error("RSA key has no private components")]
    NotPrivate,

    /// Key cache errors
    #[error("Key cache error: {0}")]
    Cache(#[from] KeyCacheError),
}

/// Wire format errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes remain than a field needs
    #[error("Unexpected EOF of key data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A length field exceeds the largest representable buffer
    #[error("Length field too large: {len}")]
    LengthTooLarge { len: u32 },

    /// Bytes were left over after the last field
    #[error("Unexpected trailing key data: {remaining} bytes")]
    TrailingData { remaining: usize },

    /// The output buffer cannot hold the serialized key
    #[error("Unexpected end of key buffer: needed {needed} bytes, {available} available")]
    BufferTooShort { needed: usize, available: usize },

    /// An HMAC key blob is not exactly the secret length
    #[error("Incorrect HMAC key size: expected {expected}, got {actual}")]
    InvalidHmacLength { expected: usize, actual: usize },

    /// A key container record is shorter than its 5-byte header
    #[error("Key container record header truncated: {remaining} bytes")]
    HeaderTruncated { remaining: usize },

    /// A key container record names an unknown key type
    #[error("Unrecognized key type: {0}")]
    UnrecognizedKeyType(u8),
}

/// Key cache errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyCacheError {
    /// The requested key is not held by the cache
    #[error("The {name} key is not available")]
    KeyNotFound { name: &'static str },

    /// The requested key exists but is of a different kind
    #[error("Key {id} is not a {expected} key")]
    WrongKind { id: u8, expected: &'static str },

    /// A key pair half was requested without its partner
    #[error("Cannot generate {requested} without {partner}")]
    UnpairedKey {
        requested: &'static str,
        partner: &'static str,
    },

    /// The key can be imported but never exported or generated
    #[error("Key {id} cannot be exported or generated")]
    NotExportable { id: u8 },

    /// The mask names bits that are not known keys
    #[error("Unrecognized key types: {mask:08x}")]
    UnknownKeys { mask: u32 },

    /// An exported key did not have the expected length
    #[error("Incorrect key size: expected {expected}, got {actual}")]
    UnexpectedLength { expected: u32, actual: u32 },
}

/// Convert RSA provider errors to our error type
impl From<rsa::Error> for KeysError {
    fn from(err: rsa::Error) -> Self {
        KeysError::Library(err.to_string())
    }
}

/// Convert entropy source errors
impl From<rand::Error> for KeysError {
    fn from(err: rand::Error) -> Self {
        KeysError::Entropy {
            reason: err.to_string(),
        }
    }
}
