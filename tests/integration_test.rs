use keyblob::api::{
    export_hmac, export_rsa_priv, export_rsa_pub, free_hmac, free_rsa, import_hmac,
    import_rsa_priv, import_rsa_pub, ExportLength, EXPORT_ERROR,
};
use keyblob::logic::key_compat::valid_size;
use keyblob::{FormatError, HmacKey, KeyCache, KeyId, KeyMask, KeySlot, KeysError, RsaKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

const PRIV_HEX: &str = include_str!("fixtures/rsa2048_priv.hex");
const PUB_HEX: &str = include_str!("fixtures/rsa2048_pub.hex");

fn priv_blob() -> Vec<u8> {
    hex::decode(PRIV_HEX.trim()).unwrap()
}

fn pub_blob() -> Vec<u8> {
    hex::decode(PUB_HEX.trim()).unwrap()
}

fn export_all(key: &RsaKey) -> Vec<u8> {
    let len = export_rsa_priv(Some(key), None).unwrap();
    let mut out = vec![0u8; len as usize];
    assert_eq!(export_rsa_priv(Some(key), Some(out.as_mut_slice())).unwrap(), len);
    out
}

#[test]
fn test_private_key_round_trip_is_bit_exact() {
    let blob = priv_blob();

    let mut slot = KeySlot::empty();
    import_rsa_priv(&mut slot, &blob).unwrap();
    let key = slot.get().unwrap();

    assert!(key.is_private());
    assert!(valid_size(key));
    assert_eq!(export_all(key), blob);
}

#[test]
fn test_public_blob_is_prefix_of_private_blob() {
    let mut slot = KeySlot::empty();
    import_rsa_priv(&mut slot, &priv_blob()).unwrap();

    let len = export_rsa_pub(slot.get(), None).unwrap();
    let mut out = vec![0u8; len as usize];
    export_rsa_pub(slot.get(), Some(out.as_mut_slice())).unwrap();
    assert_eq!(out, pub_blob());
}

#[test]
fn test_imported_key_works_with_rsa_crate() {
    let mut priv_slot = KeySlot::empty();
    let mut pub_slot = KeySlot::empty();
    import_rsa_priv(&mut priv_slot, &priv_blob()).unwrap();
    import_rsa_pub(&mut pub_slot, &pub_blob()).unwrap();

    let private = RsaPrivateKey::try_from(priv_slot.get().unwrap()).unwrap();
    let public = RsaPublicKey::try_from(pub_slot.get().unwrap()).unwrap();
    assert_eq!(private.to_public_key(), public);
    assert_eq!(public.size(), 256);

    let back = RsaKey::try_from(&private).unwrap();
    assert_eq!(export_all(&back), priv_blob());
}

#[test]
fn test_trailing_byte_rejected() {
    let mut blob = priv_blob();
    blob.push(0x00);

    let mut slot = KeySlot::empty();
    let err = import_rsa_priv(&mut slot, &blob).unwrap_err();
    assert!(matches!(
        err,
        KeysError::Format(FormatError::TrailingData { remaining: 1 })
    ));
}

#[test]
fn test_every_truncation_rejected_without_touching_slot() {
    let blob = priv_blob();
    let mut slot = KeySlot::empty();
    import_rsa_pub(&mut slot, &pub_blob()).unwrap();

    for cut in [0, 3, 4, 200, 267, 600, 700, blob.len() - 1] {
        assert!(import_rsa_priv(&mut slot, &blob[..cut]).is_err(), "cut at {cut}");
        assert!(!slot.get().unwrap().is_private());
    }
}

#[test]
fn test_hmac_lengths() {
    let mut slot = KeySlot::empty();
    assert!(import_hmac(&mut slot, &[0u8; 31]).is_err());
    assert!(import_hmac(&mut slot, &[0u8; 33]).is_err());
    assert!(!slot.is_present());

    import_hmac(&mut slot, &[0xc3; 32]).unwrap();
    let mut out = [0u8; 32];
    assert_eq!(export_hmac(slot.get(), Some(&mut out[..])).unwrap(), 32);
    assert_eq!(out, [0xc3; 32]);
}

#[test]
fn test_sentinel_for_absent_keys() {
    let rsa_slot: KeySlot<RsaKey> = KeySlot::empty();
    let hmac_slot: KeySlot<HmacKey> = KeySlot::empty();

    assert_eq!(export_rsa_priv(rsa_slot.get(), None).or_sentinel(), EXPORT_ERROR);
    assert_eq!(export_rsa_pub(rsa_slot.get(), None).or_sentinel(), EXPORT_ERROR);
    assert_eq!(export_hmac(hmac_slot.get(), None).or_sentinel(), EXPORT_ERROR);
}

#[test]
fn test_free_empties_slots() {
    let mut rsa_slot = KeySlot::empty();
    import_rsa_pub(&mut rsa_slot, &pub_blob()).unwrap();
    free_rsa(&mut rsa_slot);
    assert!(!rsa_slot.is_present());

    let mut hmac_slot = KeySlot::with_key(HmacKey::new([1; 32]));
    free_hmac(&mut hmac_slot);
    assert!(!hmac_slot.is_present());
    assert_eq!(export_hmac(hmac_slot.get(), None).or_sentinel(), EXPORT_ERROR);
}

#[test]
fn test_key_cache_container_round_trip() {
    let mut container = Vec::new();
    for (id, data) in [
        (KeyId::SignPub, pub_blob()),
        (KeyId::EncrPriv, priv_blob()),
        (KeyId::AuthGet, vec![0x42; 32]),
    ] {
        container.extend_from_slice(&(data.len() as u32).to_le_bytes());
        container.push(id as u8);
        container.extend_from_slice(&data);
    }

    let mask = KeyMask::SIGN_PUB | KeyMask::ENCR_PRIV | KeyMask::AUTH_GET;
    let mut cache = KeyCache::new();
    cache.import(&container, mask).unwrap();

    assert_eq!(cache.missing(mask), None);
    assert_eq!(cache.missing(KeyMask::READ), Some("file HMAC"));
    assert_eq!(cache.export(mask).unwrap().as_slice(), container.as_slice());
}

#[test]
fn test_key_cache_generates_hmac_keys() {
    let mask = KeyMask::HMAC_FILE | KeyMask::HMAC_CHUNK | KeyMask::AUTH_DELETE;
    let mut cache = KeyCache::new();
    keyblob::generate_keys(&mut cache, mask).unwrap();

    assert_eq!(cache.missing(mask), None);
    let container = cache.export(mask).unwrap();
    assert_eq!(container.len(), 3 * (5 + 32));
}
