use std::time::{SystemTime, UNIX_EPOCH};

use chrono::DateTime;
use tracing::{debug, trace};

use super::crypto::{AlgorithmVerifier, CryptoVerifier};
use super::errors::DnssecError;
use super::rdata::{DNSSEC_PROTOCOL, DnskeyRecord, RrsigRecord};
use super::{IndeterminateReason, VerificationResult};

/// Source of "now" for signature validity windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    /// Fixed epoch seconds, for offline or reproducible verification
    Fixed(u64),
}

impl Clock {
    pub fn now(&self) -> u64 {
        match self {
            Self::System => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            Self::Fixed(secs) => *secs,
        }
    }
}

fn format_epoch(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Checks one (DNSKEY, RRSIG) pairing against an assembled signed message.
#[derive(Debug, Clone, Default)]
pub struct SignatureEvaluator<V = CryptoVerifier> {
    verifier: V,
    clock: Clock,
}

impl SignatureEvaluator<CryptoVerifier> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: AlgorithmVerifier> SignatureEvaluator<V> {
    pub fn with_verifier(verifier: V) -> Self {
        Self {
            verifier,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Key flags, protocol, algorithm agreement and the validity window are
    /// checked in that order; the signature itself is only checked when all
    /// of them pass.
    pub fn evaluate_signature(
        &self,
        message: &[u8],
        dnskey: &DnskeyRecord,
        rrsig: &RrsigRecord,
    ) -> VerificationResult {
        if !dnskey.is_zone_key() {
            return self.reject(dnskey, rrsig, IndeterminateReason::NotAZoneKey);
        }
        if dnskey.protocol != DNSSEC_PROTOCOL {
            return self.reject(dnskey, rrsig, IndeterminateReason::ProtocolMismatch);
        }
        if dnskey.algorithm != rrsig.algorithm {
            return self.reject(dnskey, rrsig, IndeterminateReason::AlgorithmMismatch);
        }

        // Plain integer comparison, no RFC 1982 serial arithmetic
        let now = self.clock.now();
        let inception = u64::from(rrsig.signature_inception);
        let expiration = u64::from(rrsig.signature_expiration);
        if now < inception {
            debug!(
                key_tag = rrsig.key_tag,
                inception = %format_epoch(inception),
                now = %format_epoch(now),
                "signature not yet valid"
            );
            return IndeterminateReason::NotYetValid.into();
        }
        if now > expiration {
            debug!(
                key_tag = rrsig.key_tag,
                expiration = %format_epoch(expiration),
                now = %format_epoch(now),
                "signature expired"
            );
            return IndeterminateReason::Expired.into();
        }

        match self.verifier.verify(message, dnskey, rrsig) {
            Ok(true) => {
                debug!(
                    key_tag = dnskey.key_tag,
                    algorithm = rrsig.algorithm,
                    type_covered = rrsig.type_covered,
                    "signature verified"
                );
                VerificationResult::ValidateSuccess
            }
            Ok(false) => {
                self.reject(dnskey, rrsig, IndeterminateReason::CryptoVerificationFailed)
            }
            Err(DnssecError::UnsupportedAlgorithm(algorithm)) => {
                debug!(algorithm, "unsupported signature algorithm");
                IndeterminateReason::UnsupportedAlgorithm.into()
            }
            Err(e) => {
                debug!(
                    key_tag = dnskey.key_tag,
                    key = %dnskey.fingerprint(),
                    error = %e,
                    "signature could not be checked"
                );
                IndeterminateReason::CryptoVerificationFailed.into()
            }
        }
    }

    fn reject(
        &self,
        dnskey: &DnskeyRecord,
        rrsig: &RrsigRecord,
        reason: IndeterminateReason,
    ) -> VerificationResult {
        trace!(
            key_tag = dnskey.key_tag,
            flags = dnskey.flags,
            protocol = dnskey.protocol,
            key_algorithm = dnskey.algorithm,
            algorithm = rrsig.algorithm,
            type_covered = rrsig.type_covered,
            %reason,
            "signature rejected"
        );
        reason.into()
    }
}
