use thiserror::Error;

/// Structural problems found while reading untrusted wire data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated input: need {need} bytes, have {have} bytes")]
    Truncated { need: usize, have: usize },

    #[error("Invalid label length: {0}")]
    LabelTooLong(u8),

    #[error("DNS name too long")]
    NameTooLong,

    #[error("Compressed name where an uncompressed name is required")]
    CompressedName,

    #[error("Empty label inside a DNS name")]
    InvalidLabel,

    #[error("RRSIG carries no signature bytes")]
    EmptySignature,

    #[error("Invalid base64 data: {0}")]
    InvalidBase64(String),

    #[error("Invalid DNS name: {0}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors raised while loading or validating a `VerifierConfig`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid fixed time: {0}")]
    InvalidFixedTime(String),

    #[error("Invalid algorithm: {0}")]
    InvalidAlgorithm(String),

    #[error("Invalid validation attempt limit: {0}")]
    InvalidAttemptLimit(String),

    #[error("Invalid trust anchor: {0}")]
    InvalidTrustAnchor(String),

    #[error("Configuration parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
