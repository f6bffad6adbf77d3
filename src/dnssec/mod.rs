pub mod algorithm;
pub mod canonical;
pub mod crypto;
pub mod errors;
pub mod evaluator;
pub mod key_tag;
pub mod rdata;
pub mod trust_anchor;
pub mod validator;

use std::fmt;

use serde::Serialize;

pub use algorithm::Algorithm;
pub use canonical::{canonical_rrset, signed_message};
pub use crypto::{AlgorithmVerifier, CryptoVerifier};
pub use errors::DnssecError;
pub use evaluator::{Clock, SignatureEvaluator};
pub use key_tag::calculate_key_tag;
pub use rdata::{DnskeyRecord, RrsigRecord};
pub use trust_anchor::{TrustAnchor, TrustAnchorStore, TrustContext};
pub use validator::ChainVerifier;

/// Outcome of verifying one response, or one (DNSKEY, RRSIG) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum VerificationResult {
    /// A signature verified under a trusted key
    ValidateSuccess,
    /// No signature could be authenticated
    Indeterminate(IndeterminateReason),
    /// No trust material was available to verify with
    DnskeyMissing,
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::ValidateSuccess)
    }

    pub fn reason(&self) -> Option<IndeterminateReason> {
        match self {
            Self::Indeterminate(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<IndeterminateReason> for VerificationResult {
    fn from(reason: IndeterminateReason) -> Self {
        Self::Indeterminate(reason)
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidateSuccess => f.write_str("validated"),
            Self::Indeterminate(reason) => write!(f, "indeterminate ({reason})"),
            Self::DnskeyMissing => f.write_str("no DNSKEY available"),
        }
    }
}

/// Why a signature could not be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndeterminateReason {
    UnsupportedAlgorithm,
    ProtocolMismatch,
    NotAZoneKey,
    AlgorithmMismatch,
    NotYetValid,
    Expired,
    CryptoVerificationFailed,
    /// No (signature, key) pair was ever evaluated
    NoApplicableSignature,
}

impl IndeterminateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedAlgorithm => "unsupported algorithm",
            Self::ProtocolMismatch => "protocol mismatch",
            Self::NotAZoneKey => "not a zone key",
            Self::AlgorithmMismatch => "algorithm mismatch",
            Self::NotYetValid => "signature not yet valid",
            Self::Expired => "signature expired",
            Self::CryptoVerificationFailed => "cryptographic verification failed",
            Self::NoApplicableSignature => "no applicable signature",
        }
    }
}

impl fmt::Display for IndeterminateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
