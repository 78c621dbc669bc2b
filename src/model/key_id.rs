//! Well-known key identities and bitmasks over them
//!
//! The numeric value of a [`KeyId`] is its type byte in a key container
//! and its bit position in a [`KeyMask`].

use std::fmt;

use crate::error::FormatError;

/// What kind of material a key id holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    RsaPrivate,
    RsaPublic,
    Hmac,
}

impl KeyKind {
    pub fn describe(self) -> &'static str {
        match self {
            KeyKind::RsaPrivate => "RSA private",
            KeyKind::RsaPublic => "RSA public",
            KeyKind::Hmac => "HMAC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum KeyId {
    SignPriv = 0,
    SignPub = 1,
    EncrPriv = 2,
    EncrPub = 3,
    HmacFile = 4,
    HmacChunk = 5,
    HmacName = 6,
    HmacCparams = 7,
    RootPub = 9,
    AuthPut = 10,
    AuthGet = 11,
    AuthDelete = 12,
    /// Normally a copy of `HmacFile`; may differ when reading one archive
    /// set and writing another. Import only.
    HmacFileWrite = 19,
}

impl KeyId {
    pub const ALL: [KeyId; 13] = [
        KeyId::SignPriv,
        KeyId::SignPub,
        KeyId::EncrPriv,
        KeyId::EncrPub,
        KeyId::HmacFile,
        KeyId::HmacChunk,
        KeyId::HmacName,
        KeyId::HmacCparams,
        KeyId::RootPub,
        KeyId::AuthPut,
        KeyId::AuthGet,
        KeyId::AuthDelete,
        KeyId::HmacFileWrite,
    ];

    pub fn kind(self) -> KeyKind {
        match self {
            KeyId::SignPriv | KeyId::EncrPriv => KeyKind::RsaPrivate,
            KeyId::SignPub | KeyId::EncrPub | KeyId::RootPub => KeyKind::RsaPublic,
            _ => KeyKind::Hmac,
        }
    }

    /// Human-readable name, as reported for missing keys.
    pub fn name(self) -> &'static str {
        match self {
            KeyId::SignPriv => "archive signing",
            KeyId::SignPub => "archive signature verification",
            KeyId::EncrPriv => "archive decryption",
            KeyId::EncrPub => "archive encryption",
            KeyId::HmacFile => "file HMAC",
            KeyId::HmacFileWrite => "file write HMAC",
            KeyId::HmacChunk => "chunk HMAC",
            KeyId::HmacName => "archive name HMAC",
            KeyId::HmacCparams => "chunk randomization",
            KeyId::RootPub => "server root",
            KeyId::AuthPut => "write authorization",
            KeyId::AuthGet => "read authorization",
            KeyId::AuthDelete => "delete authorization",
        }
    }

    pub fn mask(self) -> KeyMask {
        KeyMask::from_bits_retain(1 << self as u8)
    }

    /// Key id for the type byte of a container record.
    ///
    /// The file write HMAC never has a record of its own; it is only
    /// filled in from a file HMAC record.
    pub fn from_record_type(type_byte: u8) -> Result<KeyId, FormatError> {
        match KeyId::try_from(type_byte)? {
            KeyId::HmacFileWrite => Err(FormatError::UnrecognizedKeyType(type_byte)),
            id => Ok(id),
        }
    }
}

impl TryFrom<u8> for KeyId {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        KeyId::ALL
            .into_iter()
            .find(|id| *id as u8 == value)
            .ok_or(FormatError::UnrecognizedKeyType(value))
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), *self as u8)
    }
}

bitflags::bitflags! {
    /// A set of keys, one bit per [`KeyId`]
    ///
    /// Bits with no matching key id are kept, so callers can report them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyMask: u32 {
        const SIGN_PRIV = 1 << KeyId::SignPriv as u8;
        const SIGN_PUB = 1 << KeyId::SignPub as u8;
        const ENCR_PRIV = 1 << KeyId::EncrPriv as u8;
        const ENCR_PUB = 1 << KeyId::EncrPub as u8;
        const HMAC_FILE = 1 << KeyId::HmacFile as u8;
        const HMAC_CHUNK = 1 << KeyId::HmacChunk as u8;
        const HMAC_NAME = 1 << KeyId::HmacName as u8;
        const HMAC_CPARAMS = 1 << KeyId::HmacCparams as u8;
        const ROOT_PUB = 1 << KeyId::RootPub as u8;
        const AUTH_PUT = 1 << KeyId::AuthPut as u8;
        const AUTH_GET = 1 << KeyId::AuthGet as u8;
        const AUTH_DELETE = 1 << KeyId::AuthDelete as u8;
        const HMAC_FILE_WRITE = 1 << KeyId::HmacFileWrite as u8;

        const SIGN = Self::SIGN_PRIV.bits() | Self::SIGN_PUB.bits();
        const ENCR = Self::ENCR_PRIV.bits() | Self::ENCR_PUB.bits();

        /// Keys needed to read archives
        const READ = Self::ENCR_PRIV.bits()
            | Self::SIGN_PUB.bits()
            | Self::HMAC_FILE.bits()
            | Self::HMAC_CHUNK.bits()
            | Self::HMAC_NAME.bits()
            | Self::AUTH_GET.bits();

        /// Keys needed to write archives
        const WRITE = Self::SIGN_PRIV.bits()
            | Self::ENCR_PUB.bits()
            | Self::HMAC_FILE.bits()
            | Self::HMAC_CHUNK.bits()
            | Self::HMAC_NAME.bits()
            | Self::HMAC_CPARAMS.bits()
            | Self::AUTH_PUT.bits();

        /// Every key held by users
        const USER = Self::SIGN.bits()
            | Self::ENCR.bits()
            | Self::HMAC_FILE.bits()
            | Self::HMAC_CHUNK.bits()
            | Self::HMAC_NAME.bits()
            | Self::HMAC_CPARAMS.bits()
            | Self::AUTH_PUT.bits()
            | Self::AUTH_GET.bits()
            | Self::AUTH_DELETE.bits();
    }
}

impl KeyMask {
    pub fn includes(self, id: KeyId) -> bool {
        self.contains(id.mask())
    }

    /// Known key ids in this mask, in ascending order.
    pub fn ids(self) -> impl Iterator<Item = KeyId> {
        KeyId::ALL.into_iter().filter(move |id| self.includes(*id))
    }
}

impl From<KeyId> for KeyMask {
    fn from(id: KeyId) -> Self {
        id.mask()
    }
}
