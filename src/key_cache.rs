//! Multi-key store
//!
//! A [`KeyCache`] holds one slot per well-known [`KeyId`] and reads and
//! writes key containers: a sequence of records, each
//! `LEN32(data) || type || data`, where `type` is the key id byte and
//! `data` is that key's own blob.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::{FormatError, KeyCacheError, KeysError, KeysResult};
use crate::logic::bigint_codec::{accumulate, LEN_FIELD};
use crate::model::{HmacKey, KeyId, KeyKind, KeyMask, KeySlot, RsaKey, HMAC_KEY_LEN};
use crate::ports::{EntropySource, RsaBackend};
use crate::use_cases::{
    export_hmac, export_rsa_priv, export_rsa_pub, generate_hmac, generate_rsa, import_hmac,
    import_rsa_priv, import_rsa_pub,
};

/// Length of a container record header: LEN32 plus the type byte
pub const RECORD_HEADER_LEN: usize = LEN_FIELD + 1;

/// Length of the concatenated authorization keys
pub const AUTH_KEYS_LEN: usize = 3 * HMAC_KEY_LEN;

const RSA_PAIRS: [(KeyId, KeyId); 2] = [
    (KeyId::SignPriv, KeyId::SignPub),
    (KeyId::EncrPriv, KeyId::EncrPub),
];

const HMAC_KEYS: [KeyId; 7] = [
    KeyId::HmacFile,
    KeyId::HmacChunk,
    KeyId::HmacName,
    KeyId::HmacCparams,
    KeyId::AuthPut,
    KeyId::AuthGet,
    KeyId::AuthDelete,
];

/// One slot for every key the system knows about.
///
/// Not internally synchronized; share it behind a lock if needed.
#[derive(Debug, Clone, Default)]
pub struct KeyCache {
    sign_priv: KeySlot<RsaKey>,
    sign_pub: KeySlot<RsaKey>,
    encr_priv: KeySlot<RsaKey>,
    encr_pub: KeySlot<RsaKey>,
    root_pub: KeySlot<RsaKey>,
    hmac_file: KeySlot<HmacKey>,
    hmac_file_write: KeySlot<HmacKey>,
    hmac_chunk: KeySlot<HmacKey>,
    hmac_name: KeySlot<HmacKey>,
    hmac_cparams: KeySlot<HmacKey>,
    auth_put: KeySlot<HmacKey>,
    auth_get: KeySlot<HmacKey>,
    auth_delete: KeySlot<HmacKey>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn rsa_slot(&self, id: KeyId) -> Result<&KeySlot<RsaKey>, KeyCacheError> {
        match id {
            KeyId::SignPriv => Ok(&self.sign_priv),
            KeyId::SignPub => Ok(&self.sign_pub),
            KeyId::EncrPriv => Ok(&self.encr_priv),
            KeyId::EncrPub => Ok(&self.encr_pub),
            KeyId::RootPub => Ok(&self.root_pub),
            _ => Err(KeyCacheError::WrongKind {
                id: id as u8,
                expected: "RSA",
            }),
        }
    }

    fn rsa_slot_mut(&mut self, id: KeyId) -> Result<&mut KeySlot<RsaKey>, KeyCacheError> {
        match id {
            KeyId::SignPriv => Ok(&mut self.sign_priv),
            KeyId::SignPub => Ok(&mut self.sign_pub),
            KeyId::EncrPriv => Ok(&mut self.encr_priv),
            KeyId::EncrPub => Ok(&mut self.encr_pub),
            KeyId::RootPub => Ok(&mut self.root_pub),
            _ => Err(KeyCacheError::WrongKind {
                id: id as u8,
                expected: "RSA",
            }),
        }
    }

    fn hmac_slot(&self, id: KeyId) -> Result<&KeySlot<HmacKey>, KeyCacheError> {
        match id {
            KeyId::HmacFile => Ok(&self.hmac_file),
            KeyId::HmacFileWrite => Ok(&self.hmac_file_write),
            KeyId::HmacChunk => Ok(&self.hmac_chunk),
            KeyId::HmacName => Ok(&self.hmac_name),
            KeyId::HmacCparams => Ok(&self.hmac_cparams),
            KeyId::AuthPut => Ok(&self.auth_put),
            KeyId::AuthGet => Ok(&self.auth_get),
            KeyId::AuthDelete => Ok(&self.auth_delete),
            _ => Err(KeyCacheError::WrongKind {
                id: id as u8,
                expected: "HMAC",
            }),
        }
    }

    fn hmac_slot_mut(&mut self, id: KeyId) -> Result<&mut KeySlot<HmacKey>, KeyCacheError> {
        match id {
            KeyId::HmacFile => Ok(&mut self.hmac_file),
            KeyId::HmacFileWrite => Ok(&mut self.hmac_file_write),
            KeyId::HmacChunk => Ok(&mut self.hmac_chunk),
            KeyId::HmacName => Ok(&mut self.hmac_name),
            KeyId::HmacCparams => Ok(&mut self.hmac_cparams),
            KeyId::AuthPut => Ok(&mut self.auth_put),
            KeyId::AuthGet => Ok(&mut self.auth_get),
            KeyId::AuthDelete => Ok(&mut self.auth_delete),
            _ => Err(KeyCacheError::WrongKind {
                id: id as u8,
                expected: "HMAC",
            }),
        }
    }

    fn rsa_pair_mut(&mut self, priv_id: KeyId) -> (&mut KeySlot<RsaKey>, &mut KeySlot<RsaKey>) {
        if priv_id == KeyId::SignPriv {
            (&mut self.sign_priv, &mut self.sign_pub)
        } else {
            (&mut self.encr_priv, &mut self.encr_pub)
        }
    }

    /// Whether the cache holds key `id`.
    pub fn has(&self, id: KeyId) -> bool {
        match id.kind() {
            KeyKind::RsaPrivate | KeyKind::RsaPublic => {
                self.rsa_slot(id).is_ok_and(|slot| slot.is_present())
            }
            KeyKind::Hmac => self.hmac_slot(id).is_ok_and(|slot| slot.is_present()),
        }
    }

    fn import_one(&mut self, id: KeyId, data: &[u8]) -> KeysResult<()> {
        match id.kind() {
            KeyKind::RsaPrivate => import_rsa_priv(self.rsa_slot_mut(id)?, data),
            KeyKind::RsaPublic => import_rsa_pub(self.rsa_slot_mut(id)?, data),
            KeyKind::Hmac => import_hmac(self.hmac_slot_mut(id)?, data),
        }
    }

    /// Import every record in `buf` whose key is in `mask`.
    ///
    /// Records for other keys are skipped, but the container as a whole
    /// must still be well formed. A file HMAC record is also installed as
    /// the file write HMAC when `mask` includes it; a record typed as the
    /// file write HMAC is rejected. Nothing is changed
    /// unless every record imports successfully.
    pub fn import(&mut self, buf: &[u8], mask: KeyMask) -> KeysResult<()> {
        let mut staged = self.clone();
        let mut rest = buf;

        while !rest.is_empty() {
            if rest.len() < RECORD_HEADER_LEN {
                warn!("Unexpected EOF of key data");
                return Err(FormatError::HeaderTruncated {
                    remaining: rest.len(),
                }
                .into());
            }
            let mut len_bytes = [0u8; LEN_FIELD];
            len_bytes.copy_from_slice(&rest[..LEN_FIELD]);
            let len = u32::from_le_bytes(len_bytes);
            let type_byte = rest[LEN_FIELD];
            rest = &rest[RECORD_HEADER_LEN..];

            let len = usize::try_from(len)
                .ok()
                .filter(|len| *len <= rest.len())
                .ok_or_else(|| {
                    warn!("Unexpected EOF of key data");
                    FormatError::UnexpectedEof {
                        needed: len as usize,
                        remaining: rest.len(),
                    }
                })?;
            let (data, tail) = rest.split_at(len);
            rest = tail;

            let id = KeyId::from_record_type(type_byte).inspect_err(|_| {
                warn!("Unrecognized key type: {}", type_byte);
            })?;

            if mask.includes(id) {
                staged.import_one(id, data)?;
                debug!("Imported {} key", id);
            }
            if id == KeyId::HmacFile && mask.includes(KeyId::HmacFileWrite) {
                import_hmac(&mut staged.hmac_file_write, data)?;
                debug!("Imported {} key", KeyId::HmacFileWrite);
            }
        }

        *self = staged;
        Ok(())
    }

    fn export_one(&self, id: KeyId, out: Option<&mut [u8]>) -> KeysResult<u32> {
        match id.kind() {
            KeyKind::RsaPrivate => export_rsa_priv(self.rsa_slot(id)?.get(), out),
            KeyKind::RsaPublic => export_rsa_pub(self.rsa_slot(id)?.get(), out),
            KeyKind::Hmac => export_hmac(self.hmac_slot(id)?.get(), out),
        }
    }

    /// Serialize the keys in `mask` into a container, in ascending id
    /// order.
    pub fn export(&self, mask: KeyMask) -> KeysResult<Zeroizing<Vec<u8>>> {
        let ids = exportable_ids(mask)?;

        let mut total = 0u32;
        for id in &ids {
            let len = self.export_one(*id, None)?;
            total = accumulate(total, RECORD_HEADER_LEN)?;
            total = accumulate(total, len as usize)?;
        }

        let mut out = Zeroizing::new(vec![0u8; total as usize]);
        let mut pos = 0usize;
        for id in &ids {
            let record = &mut out[pos..];
            if record.len() < RECORD_HEADER_LEN {
                return Err(FormatError::BufferTooShort {
                    needed: RECORD_HEADER_LEN,
                    available: record.len(),
                }
                .into());
            }
            let (header, body) = record.split_at_mut(RECORD_HEADER_LEN);
            let len = self.export_one(*id, Some(body))?;
            header[..LEN_FIELD].copy_from_slice(&len.to_le_bytes());
            header[LEN_FIELD] = *id as u8;
            pos += RECORD_HEADER_LEN + len as usize;
        }

        if pos != out.len() {
            return Err(KeyCacheError::UnexpectedLength {
                expected: total,
                actual: pos as u32,
            }
            .into());
        }

        debug!("Exported {} keys: {} bytes", ids.len(), total);
        Ok(out)
    }

    /// Create the keys in `mask`.
    ///
    /// RSA keys come in pairs: asking for one half without the other is an
    /// error. Nothing is changed unless every key is generated.
    pub fn generate<B, E>(
        &mut self,
        mask: KeyMask,
        backend: &B,
        entropy: &mut E,
    ) -> KeysResult<()>
    where
        B: RsaBackend + ?Sized,
        E: EntropySource + ?Sized,
    {
        for id in [KeyId::RootPub, KeyId::HmacFileWrite] {
            if mask.includes(id) {
                return Err(KeyCacheError::NotExportable { id: id as u8 }.into());
            }
        }

        let mut staged = self.clone();
        let mut keys = mask;

        for (priv_id, pub_id) in RSA_PAIRS {
            match (keys.includes(priv_id), keys.includes(pub_id)) {
                (true, true) => {
                    let (priv_slot, pub_slot) = staged.rsa_pair_mut(priv_id);
                    generate_rsa(backend, priv_slot, pub_slot)?;
                }
                (true, false) => {
                    warn!("Cannot generate private key without public key");
                    return Err(KeyCacheError::UnpairedKey {
                        requested: "private key",
                        partner: "public key",
                    }
                    .into());
                }
                (false, true) => {
                    warn!("Cannot generate public key without private key");
                    return Err(KeyCacheError::UnpairedKey {
                        requested: "public key",
                        partner: "private key",
                    }
                    .into());
                }
                (false, false) => {}
            }
            keys.remove(priv_id.mask() | pub_id.mask());
        }

        for id in HMAC_KEYS {
            if keys.includes(id) {
                generate_hmac(entropy, staged.hmac_slot_mut(id)?)?;
                keys.remove(id.mask());
            }
        }

        if !keys.is_empty() {
            warn!("Unrecognized key types: {:08x}", keys.bits());
            return Err(KeyCacheError::UnknownKeys { mask: keys.bits() }.into());
        }

        debug!("Generated keys {:?}", mask);
        *self = staged;
        Ok(())
    }

    /// Name of a key in `mask` that the cache does not hold, if any.
    ///
    /// Keys are checked in ascending id order and the first absent one is
    /// reported.
    pub fn missing(&self, mask: KeyMask) -> Option<&'static str> {
        mask.ids().find(|id| !self.has(*id)).map(KeyId::name)
    }

    pub fn lookup_rsa(&self, id: KeyId) -> KeysResult<&RsaKey> {
        let slot = self.rsa_slot(id).inspect_err(|_| {
            warn!("Programmer error: invalid key ({}) in lookup_rsa", id as u8);
        })?;
        slot.get()
            .ok_or(KeyCacheError::KeyNotFound { name: id.name() }.into())
    }

    pub fn lookup_hmac(&self, id: KeyId) -> KeysResult<&HmacKey> {
        let slot = self.hmac_slot(id).inspect_err(|_| {
            warn!("Programmer error: invalid key ({}) in lookup_hmac", id as u8);
        })?;
        slot.get()
            .ok_or(KeyCacheError::KeyNotFound { name: id.name() }.into())
    }

    /// The write, read and delete authorization keys, concatenated in that
    /// order.
    pub fn raw_export_auth(&self) -> KeysResult<Zeroizing<[u8; AUTH_KEYS_LEN]>> {
        let mut out = Zeroizing::new([0u8; AUTH_KEYS_LEN]);

        let ids = [KeyId::AuthPut, KeyId::AuthGet, KeyId::AuthDelete];
        for (chunk, id) in out.chunks_exact_mut(HMAC_KEY_LEN).zip(ids) {
            let len = export_hmac(self.hmac_slot(id)?.get(), Some(chunk))?;
            if len as usize != HMAC_KEY_LEN {
                warn!("Programmer error: Incorrect HMAC key size: {}", len);
                return Err(KeyCacheError::UnexpectedLength {
                    expected: HMAC_KEY_LEN as u32,
                    actual: len,
                }
                .into());
            }
        }
        Ok(out)
    }
}

/// Ids to write for `mask`, rejecting unknown bits and import-only keys.
fn exportable_ids(mask: KeyMask) -> KeysResult<Vec<KeyId>> {
    let mut leftover = mask;
    let mut ids = Vec::new();
    for id in mask.ids() {
        if matches!(id, KeyId::RootPub | KeyId::HmacFileWrite) {
            warn!("Unrecognized key type: {}", id as u8);
            return Err(KeyCacheError::NotExportable { id: id as u8 }.into());
        }
        leftover.remove(id.mask());
        ids.push(id);
    }
    if !leftover.is_empty() {
        warn!("Unrecognized key types: {:08x}", leftover.bits());
        return Err(KeysError::Cache(KeyCacheError::UnknownKeys {
            mask: leftover.bits(),
        }));
    }
    Ok(ids)
}
