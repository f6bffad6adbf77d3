use std::fmt;

use super::errors::DnssecError;

/// DNSSEC algorithm numbers this engine can verify (RFC 4034 Appendix A.1).
///
/// Every other assigned number is rejected with
/// `DnssecError::UnsupportedAlgorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Algorithm {
    /// RSA/MD5 (RFC 2537, deprecated by RFC 6944)
    RsaMd5 = 1,
    /// DSA/SHA-1 (RFC 2536)
    DsaSha1 = 3,
    /// RSA/SHA-1 (RFC 3110)
    RsaSha1 = 5,
}

impl Algorithm {
    /// Create from algorithm number
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::RsaMd5),
            3 => Some(Self::DsaSha1),
            5 => Some(Self::RsaSha1),
            _ => None,
        }
    }

    /// Convert to algorithm number
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Mnemonic used in zone files
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::RsaMd5 => "RSAMD5",
            Self::DsaSha1 => "DSA",
            Self::RsaSha1 => "RSASHA1",
        }
    }
}

impl TryFrom<u8> for Algorithm {
    type Error = DnssecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(DnssecError::UnsupportedAlgorithm(value))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_conversion() {
        assert_eq!(Algorithm::from_u8(1), Some(Algorithm::RsaMd5));
        assert_eq!(Algorithm::from_u8(3), Some(Algorithm::DsaSha1));
        assert_eq!(Algorithm::from_u8(5), Some(Algorithm::RsaSha1));
        assert_eq!(Algorithm::RsaSha1.to_u8(), 5);

        for unsupported in [0, 2, 4, 6, 7, 8, 13, 15, 253, 255] {
            assert_eq!(
                Algorithm::try_from(unsupported),
                Err(DnssecError::UnsupportedAlgorithm(unsupported))
            );
        }
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(Algorithm::RsaMd5.to_string(), "RSAMD5");
        assert_eq!(Algorithm::DsaSha1.to_string(), "DSA");
        assert_eq!(Algorithm::RsaSha1.to_string(), "RSASHA1");
    }
}
