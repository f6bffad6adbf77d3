//! Canonical RRset form (RFC 4034 §6) and the message an RRSIG signs
//! (RFC 4034 §3.1.8.1).

use std::cmp::Ordering;

use tracing::trace;

use super::errors::{DnssecError, Result};
use super::rdata::RrsigRecord;
use crate::dns::{Name, RecordType, Rrset};

/// A piece of RDATA layout, for the types whose embedded names are
/// lowercased in canonical form.
#[derive(Clone, Copy)]
enum Field {
    Fixed(usize),
    Name,
    CharString,
    /// A6 prefix length, address suffix and the prefix name when present
    A6,
}

/// Types listed in RFC 4034 §6.2 item 3, without NSEC (RFC 6840 §5.1).
/// Octets after the last field are copied unchanged.
fn name_layout(rtype: RecordType) -> Option<&'static [Field]> {
    let layout: &'static [Field] = match rtype {
        RecordType::NS
        | RecordType::MD
        | RecordType::MF
        | RecordType::CNAME
        | RecordType::MB
        | RecordType::MG
        | RecordType::MR
        | RecordType::PTR
        | RecordType::DNAME
        | RecordType::NXT => &[Field::Name],
        RecordType::SOA | RecordType::MINFO | RecordType::RP => &[Field::Name, Field::Name],
        RecordType::MX | RecordType::AFSDB | RecordType::RT | RecordType::KX => {
            &[Field::Fixed(2), Field::Name]
        }
        RecordType::PX => &[Field::Fixed(2), Field::Name, Field::Name],
        RecordType::SRV => &[Field::Fixed(6), Field::Name],
        RecordType::NAPTR => &[
            Field::Fixed(4),
            Field::CharString,
            Field::CharString,
            Field::CharString,
            Field::Name,
        ],
        RecordType::SIG | RecordType::RRSIG => &[Field::Fixed(18), Field::Name],
        RecordType::A6 => &[Field::A6],
        _ => return None,
    };
    Some(layout)
}

fn lowercase_embedded_names(layout: &[Field], rdata: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(rdata.len());
    let mut pos = 0;

    for field in layout {
        match *field {
            Field::Fixed(n) => {
                out.extend_from_slice(rdata.get(pos..pos + n)?);
                pos += n;
            }
            Field::Name => {
                let (name, used) = Name::from_wire(rdata.get(pos..)?).ok()?;
                name.write_canonical(&mut out);
                pos += used;
            }
            Field::CharString => {
                let len = usize::from(*rdata.get(pos)?);
                out.extend_from_slice(rdata.get(pos..pos + 1 + len)?);
                pos += 1 + len;
            }
            Field::A6 => {
                let prefix_len = *rdata.get(pos)?;
                if prefix_len > 128 {
                    return None;
                }
                let suffix_len = (128 - usize::from(prefix_len)).div_ceil(8);
                out.extend_from_slice(rdata.get(pos..pos + 1 + suffix_len)?);
                pos += 1 + suffix_len;
                if prefix_len > 0 {
                    let (name, used) = Name::from_wire(rdata.get(pos..)?).ok()?;
                    name.write_canonical(&mut out);
                    pos += used;
                }
            }
        }
    }

    out.extend_from_slice(rdata.get(pos..)?);
    Some(out)
}

/// Canonical form of one RR's RDATA: embedded names lowercased for the
/// types that require it. RDATA that does not parse for its type is
/// returned unchanged.
pub fn canonical_rdata(rtype: RecordType, rdata: &[u8]) -> Vec<u8> {
    name_layout(rtype)
        .and_then(|layout| lowercase_embedded_names(layout, rdata))
        .unwrap_or_else(|| rdata.to_vec())
}

/// Canonical RDATA ordering (RFC 4034 §6.3): left-justified unsigned
/// octet sequences, a missing octet sorting before a zero octet.
pub fn canonical_order(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Serialize an RRset in canonical form for signature verification.
///
/// Every RR carries `original_ttl` in place of its live TTL. When
/// `rrsig_labels` is smaller than the owner's label count the owner is
/// the wildcard the answer was synthesized from.
pub fn canonical_rrset(rrset: &Rrset, original_ttl: u32, rrsig_labels: u8) -> Result<Vec<u8>> {
    let owner_labels = rrset.name.label_count();
    let owner = match rrsig_labels.cmp(&owner_labels) {
        Ordering::Equal => rrset.name.clone(),
        Ordering::Less => {
            let source = rrset.name.wildcard_source(rrsig_labels);
            trace!(owner = %rrset.name, wildcard = %source, "reconstructing wildcard owner");
            source
        }
        Ordering::Greater => {
            return Err(DnssecError::LabelCountExceedsOwner {
                labels: rrsig_labels,
                owner: owner_labels,
            });
        }
    };

    let mut owner_wire = Vec::with_capacity(owner.wire_len());
    owner.write_canonical(&mut owner_wire);

    let mut rdatas: Vec<Vec<u8>> = rrset
        .rdatas
        .iter()
        .map(|rdata| canonical_rdata(rrset.rtype, rdata))
        .collect();
    rdatas.sort_by(|a, b| canonical_order(a, b));
    rdatas.dedup();

    let rtype = u16::from(rrset.rtype).to_be_bytes();
    let class = u16::from(rrset.class).to_be_bytes();
    let ttl = original_ttl.to_be_bytes();

    let mut out = Vec::with_capacity(
        rdatas
            .iter()
            .map(|r| owner_wire.len() + 10 + r.len())
            .sum(),
    );
    for rdata in &rdatas {
        let rdlength =
            u16::try_from(rdata.len()).map_err(|_| DnssecError::RdataTooLong(rdata.len()))?;
        out.extend_from_slice(&owner_wire);
        out.extend_from_slice(&rtype);
        out.extend_from_slice(&class);
        out.extend_from_slice(&ttl);
        out.extend_from_slice(&rdlength.to_be_bytes());
        out.extend_from_slice(rdata);
    }

    Ok(out)
}

/// The exact octets covered by `rrsig`: its RDATA prefix followed by the
/// canonical form of `rrset` under the RRSIG's original TTL.
pub fn signed_message(rrsig: &RrsigRecord, rrset: &Rrset) -> Result<Vec<u8>> {
    let canonical = canonical_rrset(rrset, rrsig.original_ttl, rrsig.labels)?;
    let mut message = Vec::with_capacity(rrsig.prefix_len + canonical.len());
    message.extend_from_slice(rrsig.signed_prefix());
    message.extend_from_slice(&canonical);
    Ok(message)
}
