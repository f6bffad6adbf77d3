use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::dnssec::rdata::DNSSEC_PROTOCOL;
use crate::dnssec::{Algorithm, Clock, TrustAnchor, TrustContext};
use crate::error::ConfigError;

/// A DNSKEY in zone-file form, e.g. `example. 257 3 5 AwEAAa...`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrustAnchorConfig {
    pub owner: String,
    pub flags: u16,
    #[serde(default = "default_protocol")]
    pub protocol: u8,
    pub algorithm: u8,
    /// Base64, whitespace allowed
    pub public_key: String,
}

fn default_protocol() -> u8 {
    DNSSEC_PROTOCOL
}

impl TrustAnchorConfig {
    pub fn to_anchor(&self) -> Result<TrustAnchor, ConfigError> {
        TrustAnchor::from_presentation(
            &self.owner,
            self.flags,
            self.protocol,
            self.algorithm,
            &self.public_key,
        )
        .map_err(|e| ConfigError::InvalidTrustAnchor(format!("{}: {}", self.owner, e)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Evaluate validity windows at this epoch second instead of the wall clock
    pub fixed_time: Option<u64>,

    /// Algorithm numbers reported as unsupported even though they could be checked
    pub disabled_algorithms: Vec<u8>,

    /// Upper bound on (signature, key) evaluations per response (None = unbounded)
    pub max_validation_attempts: Option<usize>,

    /// Keys used to seed the trust context
    pub trust_anchors: Vec<TrustAnchorConfig>,
}

impl VerifierConfig {
    /// Load configuration from `SIGCHAIN_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(fixed_time) = lookup("SIGCHAIN_FIXED_TIME") {
            if !fixed_time.is_empty() && fixed_time.to_lowercase() != "system" {
                config.fixed_time = Some(
                    fixed_time
                        .trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidFixedTime(fixed_time.clone()))?,
                );
            }
        }

        if let Some(disabled) = lookup("SIGCHAIN_DISABLED_ALGORITHMS") {
            config.disabled_algorithms = disabled
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u8>()
                        .map_err(|_| ConfigError::InvalidAlgorithm(s.to_string()))
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(max_attempts) = lookup("SIGCHAIN_MAX_VALIDATION_ATTEMPTS") {
            if !max_attempts.is_empty() && max_attempts.to_lowercase() != "unlimited" {
                config.max_validation_attempts = Some(
                    max_attempts
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| ConfigError::InvalidAttemptLimit(max_attempts.clone()))?,
                );
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading verifier configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(fixed_time) = self.fixed_time {
            if fixed_time > u64::from(u32::MAX) {
                return Err(ConfigError::InvalidFixedTime(format!(
                    "{} is beyond the 32-bit signature timestamp range",
                    fixed_time
                )));
            }
        }

        self.disabled()?;

        if self.max_validation_attempts == Some(0) {
            return Err(ConfigError::InvalidAttemptLimit(
                "Attempt limit must be greater than 0".to_string(),
            ));
        }

        for anchor in &self.trust_anchors {
            anchor.to_anchor()?;
        }

        Ok(())
    }

    pub fn clock(&self) -> Clock {
        self.fixed_time.map_or(Clock::System, Clock::Fixed)
    }

    /// Disabled algorithms, rejecting numbers this engine does not implement
    pub fn disabled(&self) -> Result<Vec<Algorithm>, ConfigError> {
        self.disabled_algorithms
            .iter()
            .map(|&n| {
                Algorithm::from_u8(n).ok_or_else(|| {
                    ConfigError::InvalidAlgorithm(format!("{} is not a supported algorithm", n))
                })
            })
            .collect()
    }

    /// Trust context seeded with the configured anchors
    pub fn trust_context(&self) -> Result<TrustContext, ConfigError> {
        let anchors = self
            .trust_anchors
            .iter()
            .map(TrustAnchorConfig::to_anchor)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TrustContext::from_anchors(anchors))
    }
}
