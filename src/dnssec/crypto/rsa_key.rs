//! RSA/SHA-1 and RSA/MD5 signature checks over RFC 3110 encoded keys.

use md5::{Digest, Md5};
use ring::signature::{self, RsaPublicKeyComponents};
use rsa::pkcs8::AssociatedOid;
use rsa::{BigUint, Pkcs1v15Sign, RsaPublicKey};
use sha1::Sha1;
use tracing::trace;

use crate::dnssec::errors::{DnssecError, Result};

/// Public exponent and modulus borrowed from a DNSKEY public key field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaKeyParts<'a> {
    pub exponent: &'a [u8],
    pub modulus: &'a [u8],
}

impl<'a> RsaKeyParts<'a> {
    /// Split an RFC 3110 key: a one octet exponent length, or a zero octet
    /// followed by a two octet length, then the exponent, then the modulus.
    pub fn parse(public_key: &'a [u8]) -> Result<Self> {
        let (&first, rest) = public_key
            .split_first()
            .ok_or(DnssecError::InvalidPublicKey("empty RSA key"))?;

        let (exp_len, rest) = match first {
            0 => {
                if rest.len() < 2 {
                    return Err(DnssecError::InvalidPublicKey("truncated RSA exponent length"));
                }
                let len = usize::from(u16::from_be_bytes([rest[0], rest[1]]));
                (len, &rest[2..])
            }
            len => (usize::from(len), rest),
        };

        if exp_len == 0 {
            return Err(DnssecError::InvalidPublicKey("zero length RSA exponent"));
        }
        if rest.len() <= exp_len {
            return Err(DnssecError::InvalidPublicKey("RSA key shorter than its exponent"));
        }

        let (exponent, modulus) = rest.split_at(exp_len);
        Ok(Self {
            exponent: strip_leading_zeros(exponent),
            modulus: strip_leading_zeros(modulus),
        })
    }

    pub fn modulus_bits(&self) -> usize {
        match self.modulus.first() {
            Some(&top) => self.modulus.len() * 8 - top.leading_zeros() as usize,
            None => 0,
        }
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// ring refuses RSA moduli below this size; RFC 3110 allows 512 bits.
const RING_MIN_MODULUS_BITS: usize = 1024;

/// Algorithm 5. ring checks keys of 1024 bits and up; shorter keys go
/// through the `rsa` crate.
pub fn verify_rsa_sha1(message: &[u8], public_key: &[u8], sig: &[u8]) -> Result<bool> {
    let parts = RsaKeyParts::parse(public_key)?;
    if parts.modulus_bits() < RING_MIN_MODULUS_BITS {
        return verify_pkcs1::<Sha1>(&parts, message, sig, "RSA/SHA-1");
    }

    let key = RsaPublicKeyComponents {
        n: parts.modulus,
        e: parts.exponent,
    };
    match key.verify(
        &signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY,
        message,
        sig,
    ) {
        Ok(()) => Ok(true),
        Err(_) => {
            trace!(
                modulus_bits = parts.modulus_bits(),
                signature_len = sig.len(),
                "RSA/SHA-1 signature rejected"
            );
            Ok(false)
        }
    }
}

/// Algorithm 1. ring has no MD5, so the `rsa` crate checks the padding
/// over an MD5 digest.
pub fn verify_rsa_md5(message: &[u8], public_key: &[u8], sig: &[u8]) -> Result<bool> {
    let parts = RsaKeyParts::parse(public_key)?;
    verify_pkcs1::<Md5>(&parts, message, sig, "RSA/MD5")
}

fn verify_pkcs1<D>(
    parts: &RsaKeyParts<'_>,
    message: &[u8],
    sig: &[u8],
    label: &str,
) -> Result<bool>
where
    D: Digest + AssociatedOid,
{
    let key = RsaPublicKey::new(
        BigUint::from_bytes_be(parts.modulus),
        BigUint::from_bytes_be(parts.exponent),
    )
    .map_err(|_| DnssecError::InvalidPublicKey("RSA key rejected by the rsa crate"))?;

    let hashed = D::digest(message);
    match key.verify(Pkcs1v15Sign::new::<D>(), &hashed, sig) {
        Ok(()) => Ok(true),
        Err(e) => {
            trace!(
                modulus_bits = parts.modulus_bits(),
                signature_len = sig.len(),
                error = %e,
                "{label} signature rejected"
            );
            Ok(false)
        }
    }
}
