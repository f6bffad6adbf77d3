use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{DecodeError, Result};

/// Longest label permitted on the wire (RFC 1035 §2.3.4)
pub const MAX_LABEL_LEN: usize = 63;

/// Longest name permitted on the wire, length octets included
pub const MAX_NAME_LEN: usize = 255;

/// An absolute domain name held as a sequence of labels, root excluded.
///
/// Comparison and hashing are ASCII case-insensitive. The original case is
/// kept so a name can be written back exactly as received.
#[derive(Clone, Debug, Default)]
pub struct Name {
    labels: Vec<Vec<u8>>,
}

impl Name {
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    /// Build a name from raw labels, enforcing the wire limits.
    pub fn from_labels<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut out = Vec::new();
        let mut wire_len = 1;
        for label in labels {
            let label = label.as_ref();
            if label.is_empty() {
                return Err(DecodeError::InvalidLabel);
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DecodeError::LabelTooLong(
                    u8::try_from(label.len()).unwrap_or(u8::MAX),
                ));
            }
            wire_len += label.len() + 1;
            if wire_len > MAX_NAME_LEN {
                return Err(DecodeError::NameTooLong);
            }
            out.push(label.to_vec());
        }
        Ok(Self { labels: out })
    }

    /// Read an uncompressed name from the start of `buf`.
    ///
    /// Returns the name and the number of octets consumed. Reads never go
    /// past the end of `buf`.
    pub fn from_wire(buf: &[u8]) -> Result<(Self, usize)> {
        let mut labels = Vec::new();
        let mut pos = 0;

        loop {
            let Some(&len) = buf.get(pos) else {
                return Err(DecodeError::Truncated {
                    need: pos + 1,
                    have: buf.len(),
                });
            };
            pos += 1;

            if len == 0 {
                break;
            }
            if len & 0xC0 == 0xC0 {
                return Err(DecodeError::CompressedName);
            }
            let len = usize::from(len);
            if len > MAX_LABEL_LEN {
                return Err(DecodeError::LabelTooLong(len as u8));
            }
            let end = pos + len;
            if end > buf.len() {
                return Err(DecodeError::Truncated {
                    need: end,
                    have: buf.len(),
                });
            }
            if end + 1 > MAX_NAME_LEN {
                return Err(DecodeError::NameTooLong);
            }
            labels.push(buf[pos..end].to_vec());
            pos = end;
        }

        Ok((Self { labels }, pos))
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_wildcard(&self) -> bool {
        self.labels.first().is_some_and(|l| l.as_slice() == b"*")
    }

    /// Label count as carried in the RRSIG labels field (RFC 4034 §3.1.3):
    /// the root label and a leading wildcard label are not counted.
    pub fn label_count(&self) -> u8 {
        let count = self.labels.len() - usize::from(self.is_wildcard());
        // at most 127 labels fit in 255 octets
        count as u8
    }

    /// Length of the uncompressed wire encoding.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// The wildcard name `*.<rightmost labels>` that an RRSIG with the
    /// given labels field was generated for (RFC 4035 §5.3.2).
    pub fn wildcard_source(&self, labels: u8) -> Self {
        let keep = usize::from(labels).min(self.labels.len());
        let mut out = Vec::with_capacity(keep + 1);
        out.push(b"*".to_vec());
        out.extend(self.labels[self.labels.len() - keep..].iter().cloned());
        Self { labels: out }
    }

    /// Append the wire form, case preserved.
    pub fn write_wire(&self, out: &mut Vec<u8>) {
        for label in &self.labels {
            out.push(label.len() as u8);
            out.extend_from_slice(label);
        }
        out.push(0);
    }

    /// Append the canonical wire form: uncompressed, ASCII lowercased
    /// (RFC 4034 §6.2).
    pub fn write_canonical(&self, out: &mut Vec<u8>) {
        for label in &self.labels {
            out.push(label.len() as u8);
            out.extend(label.iter().map(u8::to_ascii_lowercase));
        }
        out.push(0);
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(&other.labels)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in &self.labels {
            state.write_usize(label.len());
            for b in label {
                state.write_u8(b.to_ascii_lowercase());
            }
        }
    }
}

impl FromStr for Name {
    type Err = DecodeError;

    /// Parse presentation text such as `www.example.com.`; the trailing dot
    /// is optional and `.` is the root. Escapes are not interpreted.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.strip_suffix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return if s.is_empty() {
                Err(DecodeError::InvalidName(s.to_string()))
            } else {
                Ok(Self::root())
            };
        }
        Self::from_labels(trimmed.split('.').map(str::as_bytes))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return f.write_str(".");
        }
        for label in &self.labels {
            for &b in label {
                match b {
                    b'.' | b'\\' => write!(f, "\\{}", b as char)?,
                    0x21..=0x7E => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{:03}", b)?,
                }
            }
            f.write_str(".")?;
        }
        Ok(())
    }
}
