use bytes::Bytes;
use tracing::{debug, trace, warn};

use super::canonical::signed_message;
use super::crypto::{AlgorithmVerifier, CryptoVerifier};
use super::errors;
use super::evaluator::SignatureEvaluator;
use super::rdata::{DnskeyRecord, RrsigRecord};
use super::trust_anchor::TrustContext;
use super::{IndeterminateReason, VerificationResult};
use crate::config::VerifierConfig;
use crate::dns::{Response, Rrset};
use crate::error::ConfigError;

/// Verifies the signed RRsets of a response against learned DNSKEYs.
///
/// One valid signature on any RRset authenticates the response. When none
/// validates, the outcome of the last (signature, key) evaluation is
/// reported.
#[derive(Debug, Clone, Default)]
pub struct ChainVerifier<V = CryptoVerifier> {
    evaluator: SignatureEvaluator<V>,
    max_validation_attempts: Option<usize>,
}

impl ChainVerifier<CryptoVerifier> {
    /// Create a verifier using the system clock and every supported algorithm
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &VerifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let verifier = CryptoVerifier::with_disabled(config.disabled()?);
        let evaluator = SignatureEvaluator::with_verifier(verifier).with_clock(config.clock());
        Ok(Self::with_evaluator(evaluator)
            .with_max_validation_attempts(config.max_validation_attempts))
    }
}

impl<V: AlgorithmVerifier> ChainVerifier<V> {
    pub fn with_evaluator(evaluator: SignatureEvaluator<V>) -> Self {
        Self {
            evaluator,
            max_validation_attempts: None,
        }
    }

    pub fn with_max_validation_attempts(mut self, limit: Option<usize>) -> Self {
        self.max_validation_attempts = limit;
        self
    }

    pub fn evaluator(&self) -> &SignatureEvaluator<V> {
        &self.evaluator
    }

    /// Like `verify`, with absent trust material or response reported as
    /// `DnskeyMissing`.
    pub fn verify_optional(
        &self,
        context: Option<&TrustContext>,
        response: Option<&Response>,
    ) -> VerificationResult {
        match (context, response) {
            (Some(context), Some(response)) => self.verify(context, response),
            _ => {
                debug!(
                    has_context = context.is_some(),
                    has_response = response.is_some(),
                    "nothing to verify"
                );
                VerificationResult::DnskeyMissing
            }
        }
    }

    pub fn verify(&self, context: &TrustContext, response: &Response) -> VerificationResult {
        let keys = context.decode_keys();
        if keys.is_empty() {
            debug!("no DNSKEY in trust context");
            return VerificationResult::DnskeyMissing;
        }

        let mut attempts = 0usize;
        let mut result =
            VerificationResult::Indeterminate(IndeterminateReason::NoApplicableSignature);

        for rrset in response.rrsets().iter().filter(|r| r.is_signed()) {
            match self.verify_rrset(rrset, &keys, &mut attempts, &mut result) {
                Walk::Continue => {}
                Walk::Done => return result,
            }
        }

        debug!(%result, attempts, keys = keys.len(), "no signature validated");
        result
    }

    fn verify_rrset(
        &self,
        rrset: &Rrset,
        keys: &[DnskeyRecord],
        attempts: &mut usize,
        result: &mut VerificationResult,
    ) -> Walk {
        trace!(
            owner = %rrset.name,
            rtype = %rrset.rtype,
            signatures = rrset.signatures.len(),
            "checking RRset"
        );

        for rdata in &rrset.signatures {
            let rrsig = match decode_rrsig(rdata) {
                Ok(rrsig) => rrsig,
                Err(e) => {
                    debug!(owner = %rrset.name, error = %e, "skipping undecodable RRSIG");
                    continue;
                }
            };

            if rrsig.covered_type() != rrset.rtype {
                trace!(
                    owner = %rrset.name,
                    type_covered = %rrsig.covered_type(),
                    "RRSIG covers a different type"
                );
                continue;
            }

            let message = match signed_message(&rrsig, rrset) {
                Ok(message) => message,
                Err(e) => {
                    debug!(
                        owner = %rrset.name,
                        key_tag = rrsig.key_tag,
                        error = %e,
                        "cannot rebuild signed data"
                    );
                    continue;
                }
            };

            for dnskey in keys.iter().filter(|k| k.key_tag == rrsig.key_tag) {
                if let Some(limit) = self.max_validation_attempts {
                    if *attempts >= limit {
                        warn!(limit, owner = %rrset.name, "validation attempt limit reached");
                        return Walk::Done;
                    }
                }
                *attempts += 1;

                *result = self.evaluator.evaluate_signature(&message, dnskey, &rrsig);
                if result.is_success() {
                    debug!(
                        owner = %rrset.name,
                        rtype = %rrset.rtype,
                        key_tag = dnskey.key_tag,
                        attempts = *attempts,
                        "response authenticated"
                    );
                    return Walk::Done;
                }
            }
        }

        Walk::Continue
    }
}

enum Walk {
    Continue,
    Done,
}

fn decode_rrsig(rdata: &Bytes) -> errors::Result<RrsigRecord> {
    Ok(RrsigRecord::decode(rdata.clone())?)
}
