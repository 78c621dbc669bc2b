use std::fmt;

use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{KeysError, KeysResult};

/// The six private RSA components, wiped when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivateParts {
    pub d: BigUint,
    pub p: BigUint,
    pub q: BigUint,
    pub dmp1: BigUint,
    pub dmq1: BigUint,
    pub iqmp: BigUint,
}

impl fmt::Debug for RsaPrivateParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaPrivateParts([REDACTED])")
    }
}

/// An RSA key: modulus and public exponent, plus the CRT private
/// components when this is a private key.
#[derive(Clone)]
pub struct RsaKey {
    n: BigUint,
    e: BigUint,
    private: Option<RsaPrivateParts>,
}

impl RsaKey {
    pub(crate) fn from_parts(n: BigUint, e: BigUint, private: Option<RsaPrivateParts>) -> Self {
        Self { n, e, private }
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    pub fn private(&self) -> Option<&RsaPrivateParts> {
        self.private.as_ref()
    }

    pub fn is_private(&self) -> bool {
        self.private.is_some()
    }

    /// Number of bytes needed to hold the modulus.
    pub fn modulus_bytes(&self) -> usize {
        self.n.bits().div_ceil(8)
    }

    pub fn modulus_bits(&self) -> usize {
        self.n.bits()
    }

    /// Public half of this key.
    pub fn to_public(&self) -> RsaKey {
        Self {
            n: self.n.clone(),
            e: self.e.clone(),
            private: None,
        }
    }
}

impl fmt::Debug for RsaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_private() { "private" } else { "public" };
        write!(
            f,
            "RsaKey {{ {}, {} bits, private: [REDACTED] }}",
            kind,
            self.modulus_bits()
        )
    }
}

impl TryFrom<&RsaKey> for RsaPublicKey {
    type Error = KeysError;

    fn try_from(key: &RsaKey) -> KeysResult<Self> {
        Ok(RsaPublicKey::new(key.n.clone(), key.e.clone())?)
    }
}

impl TryFrom<&RsaKey> for RsaPrivateKey {
    type Error = KeysError;

    fn try_from(key: &RsaKey) -> KeysResult<Self> {
        let private = key.private.as_ref().ok_or(KeysError::NotPrivate)?;
        Ok(RsaPrivateKey::from_components(
            key.n.clone(),
            key.e.clone(),
            private.d.clone(),
            vec![private.p.clone(), private.q.clone()],
        )?)
    }
}

impl TryFrom<&RsaPrivateKey> for RsaKey {
    type Error = KeysError;

    fn try_from(key: &RsaPrivateKey) -> KeysResult<Self> {
        let (p, q) = match key.primes() {
            [p, q] => (p, q),
            primes => {
                return Err(KeysError::Library(format!(
                    "expected 2 prime factors, got {}",
                    primes.len()
                )))
            }
        };
        let iqmp = key
            .crt_coefficient()
            .ok_or_else(|| KeysError::Library("missing CRT coefficient".to_string()))?;

        let one = BigUint::from(1u8);
        let p1 = Zeroizing::new(p - &one);
        let q1 = Zeroizing::new(q - &one);
        let private = RsaPrivateParts {
            d: key.d().clone(),
            p: p.clone(),
            q: q.clone(),
            dmp1: key.d() % &*p1,
            dmq1: key.d() % &*q1,
            iqmp,
        };
        Ok(Self::from_parts(key.n().clone(), key.e().clone(), Some(private)))
    }
}
