use std::collections::HashMap;

use bytes::Bytes;
use tracing::trace;

use super::enums::{RecordClass, RecordType};
use super::name::Name;

/// A single resource record with uncompressed RDATA.
#[derive(Debug, Clone)]
pub struct Record {
    pub name: Name,
    pub rtype: RecordType,
    pub class: RecordClass,
    pub ttl: u32,
    pub rdata: Bytes,
}

/// Records sharing owner, class and type, plus the RRSIG RDATA covering them.
///
/// RDATA blobs are untrusted and must not contain compressed names.
#[derive(Debug, Clone)]
pub struct Rrset {
    pub name: Name,
    pub rtype: RecordType,
    pub class: RecordClass,
    /// TTL as received; the canonical form replaces it with the RRSIG original TTL
    pub ttl: u32,
    pub rdatas: Vec<Bytes>,
    pub signatures: Vec<Bytes>,
}

impl Rrset {
    pub fn new(name: Name, rtype: RecordType) -> Self {
        Self {
            name,
            rtype,
            class: RecordClass::IN,
            ttl: 0,
            rdatas: Vec::new(),
            signatures: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: RecordClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_rdata(mut self, rdata: impl Into<Bytes>) -> Self {
        self.rdatas.push(rdata.into());
        self
    }

    pub fn with_signature(mut self, rrsig_rdata: impl Into<Bytes>) -> Self {
        self.signatures.push(rrsig_rdata.into());
        self
    }

    pub fn push_rdata(&mut self, rdata: impl Into<Bytes>) {
        self.rdatas.push(rdata.into());
    }

    pub fn push_signature(&mut self, rrsig_rdata: impl Into<Bytes>) {
        self.signatures.push(rrsig_rdata.into());
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }
}

/// The RRsets of one DNS response, in the order they were received.
#[derive(Debug, Clone, Default)]
pub struct Response {
    rrsets: Vec<Rrset>,
}

impl Response {
    pub fn new(rrsets: Vec<Rrset>) -> Self {
        Self { rrsets }
    }

    /// Group loose records into RRsets and attach each RRSIG to the RRset
    /// named by its owner and type-covered field.
    ///
    /// RRsets keep first-seen order. An RRset's TTL is the smallest TTL
    /// among its members. RRSIGs covering nothing in the response are dropped.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut rrsets: Vec<Rrset> = Vec::new();
        let mut index: HashMap<(Name, RecordType, RecordClass), usize> = HashMap::new();
        let mut rrsigs = Vec::new();

        for record in records {
            if record.rtype == RecordType::RRSIG {
                rrsigs.push(record);
                continue;
            }

            let key = (record.name.clone(), record.rtype, record.class);
            match index.get(&key) {
                Some(&i) => {
                    let rrset = &mut rrsets[i];
                    rrset.ttl = rrset.ttl.min(record.ttl);
                    rrset.rdatas.push(record.rdata);
                }
                None => {
                    index.insert(key, rrsets.len());
                    rrsets.push(
                        Rrset::new(record.name, record.rtype)
                            .with_class(record.class)
                            .with_ttl(record.ttl)
                            .with_rdata(record.rdata),
                    );
                }
            }
        }

        for rrsig in rrsigs {
            if rrsig.rdata.len() < 2 {
                trace!(owner = %rrsig.name, "dropping RRSIG too short to carry a covered type");
                continue;
            }
            let covered = RecordType::from(u16::from_be_bytes([rrsig.rdata[0], rrsig.rdata[1]]));
            let key = (rrsig.name.clone(), covered, rrsig.class);
            match index.get(&key) {
                Some(&i) => rrsets[i].signatures.push(rrsig.rdata),
                None => {
                    trace!(owner = %rrsig.name, %covered, "dropping RRSIG with no matching RRset");
                }
            }
        }

        Self { rrsets }
    }

    pub fn rrsets(&self) -> &[Rrset] {
        &self.rrsets
    }

    pub fn push(&mut self, rrset: Rrset) {
        self.rrsets.push(rrset);
    }

    pub fn is_empty(&self) -> bool {
        self.rrsets.is_empty()
    }
}
