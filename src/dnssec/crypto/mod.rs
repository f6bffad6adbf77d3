//! Per-algorithm signature verification.

pub mod dsa_key;
pub mod rsa_key;

use tracing::trace;

use super::algorithm::Algorithm;
use super::errors::{DnssecError, Result};
use super::rdata::{DnskeyRecord, RrsigRecord};

/// Raw signature check for one (DNSKEY, RRSIG) pair over an already
/// assembled signed message.
///
/// `Ok(false)` means the signature does not verify. Errors are reserved for
/// input that cannot be checked at all: an unsupported algorithm, or a key
/// or signature field that does not follow its algorithm's encoding.
pub trait AlgorithmVerifier {
    fn verify(&self, message: &[u8], dnskey: &DnskeyRecord, rrsig: &RrsigRecord)
    -> Result<bool>;
}

/// Production verifier dispatching on the RRSIG algorithm number.
#[derive(Debug, Clone, Default)]
pub struct CryptoVerifier {
    disabled: Vec<Algorithm>,
}

impl CryptoVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `disabled` algorithms as unsupported.
    pub fn with_disabled(disabled: impl IntoIterator<Item = Algorithm>) -> Self {
        let mut disabled: Vec<Algorithm> = disabled.into_iter().collect();
        disabled.sort_by_key(|a| a.to_u8());
        disabled.dedup();
        Self { disabled }
    }

    pub fn is_enabled(&self, algorithm: Algorithm) -> bool {
        !self.disabled.contains(&algorithm)
    }

    pub fn disabled(&self) -> &[Algorithm] {
        &self.disabled
    }

    fn algorithm_for(&self, number: u8) -> Result<Algorithm> {
        let algorithm = Algorithm::try_from(number)?;
        if !self.is_enabled(algorithm) {
            trace!(%algorithm, "algorithm disabled by policy");
            return Err(DnssecError::UnsupportedAlgorithm(number));
        }
        Ok(algorithm)
    }
}

impl AlgorithmVerifier for CryptoVerifier {
    fn verify(
        &self,
        message: &[u8],
        dnskey: &DnskeyRecord,
        rrsig: &RrsigRecord,
    ) -> Result<bool> {
        let key = dnskey.public_key.as_ref();
        let sig = rrsig.signature.as_ref();

        match self.algorithm_for(rrsig.algorithm)? {
            Algorithm::RsaMd5 => rsa_key::verify_rsa_md5(message, key, sig),
            Algorithm::DsaSha1 => dsa_key::verify_dsa_sha1(message, key, sig),
            Algorithm::RsaSha1 => rsa_key::verify_rsa_sha1(message, key, sig),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn rrsig_with_algorithm(algorithm: u8) -> RrsigRecord {
        let mut rdata = vec![0x00, 0x01, algorithm, 0x01];
        rdata.extend_from_slice(&[0; 14]);
        rdata.extend_from_slice(b"\x07example\x00");
        rdata.extend_from_slice(&[0x55; 41]);
        RrsigRecord::decode(Bytes::from(rdata)).unwrap()
    }

    #[test]
    fn test_unknown_algorithms_are_unsupported() {
        let verifier = CryptoVerifier::new();
        for number in [2, 8, 13, 15] {
            let dnskey = DnskeyRecord::new(256, 3, number, vec![1, 2, 3, 4]);
            assert_eq!(
                verifier.verify(b"msg", &dnskey, &rrsig_with_algorithm(number)),
                Err(DnssecError::UnsupportedAlgorithm(number))
            );
        }
    }

    #[test]
    fn test_disabled_algorithm_is_unsupported() {
        let verifier = CryptoVerifier::with_disabled([Algorithm::RsaMd5, Algorithm::RsaMd5]);
        assert_eq!(verifier.disabled(), &[Algorithm::RsaMd5]);
        assert!(!verifier.is_enabled(Algorithm::RsaMd5));
        assert!(verifier.is_enabled(Algorithm::RsaSha1));

        let dnskey = DnskeyRecord::new(256, 3, 1, vec![3, 1, 0, 1, 0xAB]);
        assert_eq!(
            verifier.verify(b"msg", &dnskey, &rrsig_with_algorithm(1)),
            Err(DnssecError::UnsupportedAlgorithm(1))
        );
    }

    #[test]
    fn test_malformed_key_surfaces_as_error() {
        let verifier = CryptoVerifier::new();
        let dnskey = DnskeyRecord::new(256, 3, 3, vec![0, 1, 2]);
        assert!(matches!(
            verifier.verify(b"msg", &dnskey, &rrsig_with_algorithm(3)),
            Err(DnssecError::InvalidPublicKey(_))
        ));
    }
}
