use thiserror::Error;

use crate::error::DecodeError;

/// DNSSEC processing errors.
///
/// None of these escape `ChainVerifier::verify`; they are folded into a
/// `VerificationResult` and reported through tracing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnssecError {
    /// Algorithm number outside the supported set, or disabled by policy
    #[error("Unsupported DNSSEC algorithm: {0}")]
    UnsupportedAlgorithm(u8),

    /// The DNSKEY public key field does not follow its algorithm's encoding
    #[error("Invalid DNSKEY public key: {0}")]
    InvalidPublicKey(&'static str),

    /// The RRSIG signature field does not follow its algorithm's encoding
    #[error("Invalid RRSIG signature: {0}")]
    InvalidSignature(&'static str),

    /// RRSIG labels field claims more labels than the owner name has
    #[error("RRSIG labels field {labels} exceeds owner label count {owner}")]
    LabelCountExceedsOwner { labels: u8, owner: u8 },

    /// An RR whose RDATA cannot be described by a 16-bit RDLENGTH
    #[error("RDATA of {0} bytes exceeds the RDLENGTH range")]
    RdataTooLong(usize),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, DnssecError>;
