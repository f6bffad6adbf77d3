pub mod config;
pub mod dns;
pub mod dnssec;
pub mod error;

pub use config::VerifierConfig;
pub use dns::{Name, Record, RecordClass, RecordType, Response, Rrset};
pub use dnssec::{ChainVerifier, IndeterminateReason, TrustContext, VerificationResult};
