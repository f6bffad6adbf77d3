//! DSA/SHA-1 (RFC 2536) key and signature encodings.

use dsa::signature::DigestVerifier;
use dsa::{BigUint, Components, Signature, VerifyingKey};
use sha1::{Digest, Sha1};
use tracing::trace;

use crate::dnssec::errors::{DnssecError, Result};

const Q_LEN: usize = 20;
const MAX_T: u8 = 8;

/// T | R | S
pub const DSA_SIGNATURE_LEN: usize = 1 + 2 * Q_LEN;

/// Parsed RFC 2536 public key. P, G and Y are each 64 + 8T octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsaKeyParts<'a> {
    pub t: u8,
    pub q: &'a [u8],
    pub p: &'a [u8],
    pub g: &'a [u8],
    pub y: &'a [u8],
}

impl<'a> DsaKeyParts<'a> {
    pub fn parse(public_key: &'a [u8]) -> Result<Self> {
        let (&t, rest) = public_key
            .split_first()
            .ok_or(DnssecError::InvalidPublicKey("empty DSA key"))?;
        if t > MAX_T {
            return Err(DnssecError::InvalidPublicKey("DSA T parameter above 8"));
        }

        let width = 64 + 8 * usize::from(t);
        if rest.len() != Q_LEN + 3 * width {
            return Err(DnssecError::InvalidPublicKey("DSA key length does not match T"));
        }

        let (q, rest) = rest.split_at(Q_LEN);
        let (p, rest) = rest.split_at(width);
        let (g, y) = rest.split_at(width);
        Ok(Self { t, q, p, g, y })
    }

    fn verifying_key(&self) -> Result<VerifyingKey> {
        let components = Components::from_components(
            BigUint::from_bytes_be(self.p),
            BigUint::from_bytes_be(self.q),
            BigUint::from_bytes_be(self.g),
        )
        .map_err(|_| DnssecError::InvalidPublicKey("inconsistent DSA domain parameters"))?;

        VerifyingKey::from_components(components, BigUint::from_bytes_be(self.y))
            .map_err(|_| DnssecError::InvalidPublicKey("DSA public value outside the group"))
    }
}

/// Decode T | R | S. T is not cross-checked against the key's T, as
/// RFC 2536 gives it no meaning for verification.
pub fn parse_signature(sig: &[u8]) -> Result<Signature> {
    if sig.len() != DSA_SIGNATURE_LEN {
        return Err(DnssecError::InvalidSignature("DSA signature is not 41 octets"));
    }
    if sig[0] > MAX_T {
        return Err(DnssecError::InvalidSignature("DSA T parameter above 8"));
    }

    let r = BigUint::from_bytes_be(&sig[1..1 + Q_LEN]);
    let s = BigUint::from_bytes_be(&sig[1 + Q_LEN..]);
    Signature::from_components(r, s)
        .map_err(|_| DnssecError::InvalidSignature("DSA signature with a zero component"))
}

/// Algorithm 3.
pub fn verify_dsa_sha1(message: &[u8], public_key: &[u8], sig: &[u8]) -> Result<bool> {
    let parts = DsaKeyParts::parse(public_key)?;
    let signature = parse_signature(sig)?;
    let key = parts.verifying_key()?;

    match key.verify_digest(Sha1::new_with_prefix(message), &signature) {
        Ok(()) => Ok(true),
        Err(_) => {
            trace!(t = parts.t, "DSA/SHA-1 signature rejected");
            Ok(false)
        }
    }
}
