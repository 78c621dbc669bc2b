use std::mem;

use tracing::{debug, warn};

use crate::error::KeysResult;
use crate::logic::bigint_codec::UintReader;
use crate::logic::key_compat::install;
use crate::model::{HmacKey, KeySlot, RsaKey, RsaPrivateParts};

/// Parse an RSA private key blob into `slot`.
///
/// Fields are read in the fixed order `n, e, d, p, q, dmp1, dmq1, iqmp`
/// and the buffer must be consumed exactly. The slot is only touched once
/// the whole blob has parsed; on failure it keeps its previous contents and
/// any secret integers decoded so far are wiped.
pub fn import_rsa_priv(slot: &mut KeySlot<RsaKey>, buf: &[u8]) -> KeysResult<()> {
    let mut reader = UintReader::new(buf);

    let n = reader.read()?;
    let e = reader.read()?;
    let mut d = reader.read_secret()?;
    let mut p = reader.read_secret()?;
    let mut q = reader.read_secret()?;
    let mut dmp1 = reader.read_secret()?;
    let mut dmq1 = reader.read_secret()?;
    let mut iqmp = reader.read_secret()?;
    reader.finish()?;

    let private = RsaPrivateParts {
        d: mem::take(&mut *d),
        p: mem::take(&mut *p),
        q: mem::take(&mut *q),
        dmp1: mem::take(&mut *dmp1),
        dmq1: mem::take(&mut *dmq1),
        iqmp: mem::take(&mut *iqmp),
    };
    let key = install(n, e, Some(private));

    debug!("Imported RSA private key: {:?}", key);
    slot.replace(key);
    Ok(())
}

/// Parse an RSA public key blob (`n, e`) into `slot`.
pub fn import_rsa_pub(slot: &mut KeySlot<RsaKey>, buf: &[u8]) -> KeysResult<()> {
    let mut reader = UintReader::new(buf);

    let n = reader.read()?;
    let e = reader.read()?;
    reader.finish()?;

    let key = install(n, e, None);

    debug!("Imported RSA public key: {:?}", key);
    slot.replace(key);
    Ok(())
}

/// Copy a raw 32-byte HMAC secret into `slot`.
pub fn import_hmac(slot: &mut KeySlot<HmacKey>, buf: &[u8]) -> KeysResult<()> {
    let key = HmacKey::from_slice(buf).inspect_err(|_| {
        warn!("Incorrect HMAC key size: {}", buf.len());
    })?;

    debug!("Imported HMAC key");
    slot.replace(key);
    Ok(())
}
