//! DNSKEY and RRSIG RDATA decoding (RFC 4034 §2.1 and §3.1).
//!
//! Both decoders treat the RDATA length as a hard upper bound: truncated
//! input is a `DecodeError`, never a read past the buffer.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

use super::key_tag::calculate_key_tag;
use crate::dns::{Name, RecordType};
use crate::error::{DecodeError, Result};

/// Zone Key flag (RFC 4034 §2.1.1)
pub const ZONE_KEY_FLAG: u16 = 0x0100;

/// Secure Entry Point flag (RFC 4034 §2.1.1)
pub const SEP_FLAG: u16 = 0x0001;

/// The only protocol value defined for DNSKEY
pub const DNSSEC_PROTOCOL: u8 = 3;

const DNSKEY_FIXED_LEN: usize = 4;
const RRSIG_FIXED_LEN: usize = 18;

/// Decoded DNSKEY RDATA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnskeyRecord {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Bytes,
    /// Derived from the fields above, used to pre-filter candidate keys
    pub key_tag: u16,
}

impl DnskeyRecord {
    pub fn new(flags: u16, protocol: u8, algorithm: u8, public_key: impl Into<Bytes>) -> Self {
        let public_key = public_key.into();
        let key_tag = calculate_key_tag(flags, protocol, algorithm, &public_key);
        Self {
            flags,
            protocol,
            algorithm,
            public_key,
            key_tag,
        }
    }

    pub fn decode(rdata: &[u8]) -> Result<Self> {
        if rdata.len() < DNSKEY_FIXED_LEN {
            return Err(DecodeError::Truncated {
                need: DNSKEY_FIXED_LEN,
                have: rdata.len(),
            });
        }

        Ok(Self::new(
            u16::from_be_bytes([rdata[0], rdata[1]]),
            rdata[2],
            rdata[3],
            Bytes::copy_from_slice(&rdata[DNSKEY_FIXED_LEN..]),
        ))
    }

    /// Build from zone-file fields; whitespace inside the base64 key is ignored.
    pub fn from_presentation(
        flags: u16,
        protocol: u8,
        algorithm: u8,
        public_key: &str,
    ) -> Result<Self> {
        let compact: String = public_key.split_whitespace().collect();
        let key = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
        Ok(Self::new(flags, protocol, algorithm, key))
    }

    pub fn is_zone_key(&self) -> bool {
        self.flags & ZONE_KEY_FLAG != 0
    }

    pub fn is_secure_entry_point(&self) -> bool {
        self.flags & SEP_FLAG != 0
    }

    pub fn to_rdata(&self) -> Vec<u8> {
        let mut rdata = Vec::with_capacity(DNSKEY_FIXED_LEN + self.public_key.len());
        rdata.extend_from_slice(&self.flags.to_be_bytes());
        rdata.push(self.protocol);
        rdata.push(self.algorithm);
        rdata.extend_from_slice(&self.public_key);
        rdata
    }

    /// Short hex rendering of the key for log lines.
    pub fn fingerprint(&self) -> String {
        let head = &self.public_key[..self.public_key.len().min(8)];
        format!("{}..({} bytes)", hex::encode(head), self.public_key.len())
    }
}

/// Decoded RRSIG RDATA.
///
/// The raw RDATA is kept because the signed message starts with the RDATA
/// prefix exactly as received, not with a re-encoding of the fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrsigRecord {
    pub type_covered: u16,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub signature_expiration: u32,
    pub signature_inception: u32,
    pub key_tag: u16,
    pub signer_name: Name,
    pub signature: Bytes,
    /// Length of the RDATA up to, not including, the signature field
    pub prefix_len: usize,
    raw: Bytes,
}

impl RrsigRecord {
    pub fn decode(rdata: Bytes) -> Result<Self> {
        if rdata.len() < RRSIG_FIXED_LEN {
            return Err(DecodeError::Truncated {
                need: RRSIG_FIXED_LEN,
                have: rdata.len(),
            });
        }

        let u32_at = |i: usize| u32::from_be_bytes([rdata[i], rdata[i + 1], rdata[i + 2], rdata[i + 3]]);

        let (signer_name, name_len) = Name::from_wire(&rdata[RRSIG_FIXED_LEN..])?;
        let prefix_len = RRSIG_FIXED_LEN + name_len;
        if prefix_len == rdata.len() {
            return Err(DecodeError::EmptySignature);
        }

        Ok(Self {
            type_covered: u16::from_be_bytes([rdata[0], rdata[1]]),
            algorithm: rdata[2],
            labels: rdata[3],
            original_ttl: u32_at(4),
            signature_expiration: u32_at(8),
            signature_inception: u32_at(12),
            key_tag: u16::from_be_bytes([rdata[16], rdata[17]]),
            signer_name,
            signature: rdata.slice(prefix_len..),
            prefix_len,
            raw: rdata,
        })
    }

    /// RDATA bytes preceding the signature, as they appear in the signed message.
    pub fn signed_prefix(&self) -> &[u8] {
        &self.raw[..self.prefix_len]
    }

    pub fn covered_type(&self) -> RecordType {
        RecordType::from(self.type_covered)
    }

    pub fn signature_len(&self) -> usize {
        self.signature.len()
    }
}
