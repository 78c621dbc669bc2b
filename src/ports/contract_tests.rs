#[macro_export]
macro_rules! contract_tests_for {
      (
          $mod_name:ident,
          make = $make:expr,
          tests = {
            $( $(#[$attr:meta])* $test_name:ident => $tmpl:path ),+ $(,)?
        }
      ) => {
          mod $mod_name {
              use super::*;

              $(
                  #[test]
                  $(#[$attr])*
                  fn $test_name() {
                      let op = ($make)();
                      $tmpl(op);
                  }
              )+
          }
      };
  }

#[cfg(test)]
pub mod backend_contract {
    use rsa::traits::PublicKeyParts;
    use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

    use crate::{
        logic::key_compat::valid_size,
        model::KeySlot,
        ports::{RsaBackend, RsaParams},
        use_cases::{export_rsa_priv, import_rsa_priv},
    };

    pub(crate) fn test_generate_valid_size(backend: impl RsaBackend) {
        let key = backend
            .generate(&RsaParams::default())
            .expect("generation failed");

        assert!(key.is_private());
        assert_eq!(key.modulus_bytes(), 256);
        assert_eq!(key.modulus_bits(), 2048);
        assert!(valid_size(&key));
        assert_eq!(key.e(), &BigUint::from(65537u32));
    }

    pub(crate) fn test_generated_key_is_consistent(backend: impl RsaBackend) {
        let key = backend
            .generate(&RsaParams::default())
            .expect("generation failed");

        let rsa_key = RsaPrivateKey::try_from(&key).expect("key does not validate");
        assert_eq!(rsa_key.n(), key.n());

        let private = key.private().expect("missing private parts");
        assert_eq!(&private.p * &private.q, *key.n());
    }

    pub(crate) fn test_derive_public_matches(backend: impl RsaBackend) {
        let key = backend
            .generate(&RsaParams::default())
            .expect("generation failed");
        let public = backend.derive_public(&key).expect("derive failed");

        assert!(!public.is_private());
        assert_eq!(public.n(), key.n());
        assert_eq!(public.e(), key.e());
        assert!(valid_size(&public));
        RsaPublicKey::try_from(&public).expect("public key does not validate");
    }

    pub(crate) fn test_generated_key_survives_export(backend: impl RsaBackend) {
        let key = backend
            .generate(&RsaParams::default())
            .expect("generation failed");

        let len = export_rsa_priv(Some(&key), None).expect("sizing failed");
        let mut blob = vec![0u8; len as usize];
        assert_eq!(export_rsa_priv(Some(&key), Some(blob.as_mut_slice())).unwrap(), len);

        let mut slot = KeySlot::empty();
        import_rsa_priv(&mut slot, &blob).expect("import failed");
        let imported = slot.get().expect("slot empty after import");

        let (a, b) = (imported.private().unwrap(), key.private().unwrap());
        assert_eq!(imported.n(), key.n());
        assert_eq!(imported.e(), key.e());
        assert_eq!(a.d, b.d);
        assert_eq!(a.p, b.p);
        assert_eq!(a.q, b.q);
        assert_eq!(a.dmp1, b.dmp1);
        assert_eq!(a.dmq1, b.dmq1);
        assert_eq!(a.iqmp, b.iqmp);
    }
}

#[cfg(test)]
pub mod entropy_contract {
    use crate::ports::EntropySource;

    pub(crate) fn test_fill_produces_bytes(mut source: impl EntropySource) {
        let mut buf = [0u8; 32];
        source.fill(&mut buf).expect("entropy read failed");
        assert_ne!(buf, [0u8; 32]);
    }

    pub(crate) fn test_fill_empty_buffer(mut source: impl EntropySource) {
        let mut buf = [0u8; 0];
        assert!(source.fill(&mut buf).is_ok());
    }

    pub(crate) fn test_consecutive_fills_differ(mut source: impl EntropySource) {
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        source.fill(&mut first).expect("entropy read failed");
        source.fill(&mut second).expect("entropy read failed");
        assert_ne!(first, second);
    }
}
