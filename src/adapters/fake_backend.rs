//! Deterministic fakes for the RSA backend and entropy ports
//!
//! `FakeRsaBackend` hands out a fixed 2048-bit key loaded from
//! `tests/fixtures`, so tests never wait on a prime search.

use crate::error::{KeysError, KeysResult};
use crate::logic::bigint_codec::UintReader;
use crate::model::{RsaKey, RsaPrivateParts};
use crate::ports::{EntropySource, RsaBackend, RsaParams};

const FIXTURE_PRIV_HEX: &str = include_str!("../../tests/fixtures/rsa2048_priv.hex");
const FIXTURE_PUB_HEX: &str = include_str!("../../tests/fixtures/rsa2048_pub.hex");

/// Serialized fixture private key
pub fn fixture_priv_blob() -> Vec<u8> {
    hex::decode(FIXTURE_PRIV_HEX.trim()).expect("fixture is not valid hex")
}

/// Serialized public half of the fixture key
pub fn fixture_pub_blob() -> Vec<u8> {
    hex::decode(FIXTURE_PUB_HEX.trim()).expect("fixture is not valid hex")
}

/// The fixture key, decoded field by field without going through import
pub fn fixture_key() -> RsaKey {
    let blob = fixture_priv_blob();
    let mut reader = UintReader::new(&blob);
    let mut next = || reader.read().expect("fixture is truncated");

    let n = next();
    let e = next();
    let private = RsaPrivateParts {
        d: next(),
        p: next(),
        q: next(),
        dmp1: next(),
        dmq1: next(),
        iqmp: next(),
    };
    let key = RsaKey::from_parts(n, e, Some(private));
    reader.finish().expect("fixture has trailing data");
    key
}

#[derive(Debug, Clone)]
enum Outcome {
    Key(RsaKey),
    Fail(String),
}

/// RSA backend that returns a preset key or a preset failure
#[derive(Debug, Clone)]
pub struct FakeRsaBackend {
    outcome: Outcome,
}

impl FakeRsaBackend {
    /// Always returns the fixture key
    pub fn fixture() -> Self {
        Self::returning(fixture_key())
    }

    /// Always returns `key`, whatever the requested parameters
    pub fn returning(key: RsaKey) -> Self {
        Self {
            outcome: Outcome::Key(key),
        }
    }

    /// Always fails with a library error carrying `reason`
    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Outcome::Fail(reason.to_string()),
        }
    }
}

impl RsaBackend for FakeRsaBackend {
    fn generate(&self, _params: &RsaParams) -> KeysResult<RsaKey> {
        match &self.outcome {
            Outcome::Key(key) => Ok(key.clone()),
            Outcome::Fail(reason) => Err(KeysError::Library(reason.clone())),
        }
    }
}

/// Entropy source producing a running byte counter
#[derive(Debug, Clone, Default)]
pub struct FakeEntropy {
    counter: u8,
    fail: bool,
}

impl FakeEntropy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            counter: 0,
            fail: true,
        }
    }
}

impl EntropySource for FakeEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> KeysResult<()> {
        if self.fail {
            return Err(KeysError::Entropy {
                reason: "entropy source not seeded".to_string(),
            });
        }
        for byte in buf.iter_mut() {
            self.counter = self.counter.wrapping_add(1);
            *byte = self.counter;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;
    use crate::ports::contract_tests::{backend_contract, entropy_contract};

    contract_tests_for!(
        fake_backend_contract,
        make = FakeRsaBackend::fixture,
        tests = {
            test_generate_valid_size => backend_contract::test_generate_valid_size,
            test_generated_key_is_consistent => backend_contract::test_generated_key_is_consistent,
            test_derive_public_matches => backend_contract::test_derive_public_matches,
            test_generated_key_survives_export => backend_contract::test_generated_key_survives_export,
        }
    );

    contract_tests_for!(
        fake_entropy_contract,
        make = FakeEntropy::new,
        tests = {
            test_fill_produces_bytes => entropy_contract::test_fill_produces_bytes,
            test_fill_empty_buffer => entropy_contract::test_fill_empty_buffer,
            test_consecutive_fills_differ => entropy_contract::test_consecutive_fills_differ,
        }
    );

    #[test]
    fn test_fixture_blobs_agree() {
        let private = fixture_priv_blob();
        let public = fixture_pub_blob();
        assert_eq!(private.len(), 1187);
        assert_eq!(public.len(), 267);
        assert_eq!(&private[..public.len()], public.as_slice());
    }

    #[test]
    fn test_failing_entropy() {
        let mut buf = [0u8; 4];
        assert!(matches!(
            FakeEntropy::failing().fill(&mut buf),
            Err(KeysError::Entropy { .. })
        ));
    }
}
