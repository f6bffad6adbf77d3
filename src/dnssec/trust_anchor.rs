use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::rdata::{DnskeyRecord, SEP_FLAG, ZONE_KEY_FLAG};
use crate::dns::{Name, RecordType, Rrset};
use crate::error::Result;

/// A DNSKEY accepted as authoritative without further chain validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    /// Zone the key belongs to
    pub owner: Name,
    pub dnskey: DnskeyRecord,
}

impl TrustAnchor {
    pub fn new(owner: Name, dnskey: DnskeyRecord) -> Self {
        Self { owner, dnskey }
    }

    /// Build from zone-file style fields, e.g. `example. 257 3 5 AwEAAa...`
    pub fn from_presentation(
        owner: &str,
        flags: u16,
        protocol: u8,
        algorithm: u8,
        public_key: &str,
    ) -> Result<Self> {
        let owner = owner.parse::<Name>()?;
        let dnskey = DnskeyRecord::from_presentation(flags, protocol, algorithm, public_key)?;
        Ok(Self::new(owner, dnskey))
    }

    pub fn key_tag(&self) -> u16 {
        self.dnskey.key_tag
    }

    /// Check if this is a Key Signing Key (KSK)
    pub fn is_ksk(&self) -> bool {
        self.dnskey.flags & SEP_FLAG != 0
    }

    /// Check if this is a Zone Signing Key (ZSK)
    pub fn is_zsk(&self) -> bool {
        self.dnskey.flags & ZONE_KEY_FLAG != 0 && !self.is_ksk()
    }
}

/// Learned DNSKEY RRsets, read as an immutable snapshot by each verification.
#[derive(Debug, Clone, Default)]
pub struct TrustContext {
    rrsets: Vec<Rrset>,
}

impl TrustContext {
    pub fn new(rrsets: Vec<Rrset>) -> Self {
        Self { rrsets }
    }

    pub fn from_anchors(anchors: impl IntoIterator<Item = TrustAnchor>) -> Self {
        let mut context = Self::default();
        for anchor in anchors {
            context.add_anchor(anchor);
        }
        context
    }

    /// Append the anchor's key to the DNSKEY RRset at its owner, creating
    /// the RRset if needed.
    pub fn add_anchor(&mut self, anchor: TrustAnchor) {
        let rdata = anchor.dnskey.to_rdata();
        match self
            .rrsets
            .iter_mut()
            .find(|rrset| rrset.rtype == RecordType::DNSKEY && rrset.name == anchor.owner)
        {
            Some(rrset) => rrset.push_rdata(rdata),
            None => self
                .rrsets
                .push(Rrset::new(anchor.owner, RecordType::DNSKEY).with_rdata(rdata)),
        }
    }

    pub fn push(&mut self, rrset: Rrset) {
        self.rrsets.push(rrset);
    }

    pub fn learned_keys(&self) -> &[Rrset] {
        &self.rrsets
    }

    pub fn is_empty(&self) -> bool {
        self.rrsets.is_empty()
    }

    /// Flatten every DNSKEY RDATA into decoded keys. Other RRset types are
    /// ignored and RDATA that fails to decode is skipped.
    pub fn decode_keys(&self) -> Vec<DnskeyRecord> {
        let mut keys = Vec::new();
        for rrset in self.rrsets.iter().filter(|r| r.rtype == RecordType::DNSKEY) {
            for rdata in &rrset.rdatas {
                match DnskeyRecord::decode(rdata) {
                    Ok(key) => keys.push(key),
                    Err(e) => {
                        debug!(owner = %rrset.name, error = %e, "skipping undecodable DNSKEY");
                    }
                }
            }
        }
        keys
    }
}

/// Holder for the current trust context.
///
/// Updates publish a new snapshot; snapshots already handed to running
/// verifications are never modified.
#[derive(Debug, Default)]
pub struct TrustAnchorStore {
    current: RwLock<Arc<TrustContext>>,
}

impl TrustAnchorStore {
    pub fn new(context: TrustContext) -> Self {
        Self {
            current: RwLock::new(Arc::new(context)),
        }
    }

    pub fn snapshot(&self) -> Arc<TrustContext> {
        Arc::clone(&self.current.read())
    }

    /// Add a learned DNSKEY RRset
    pub fn learn(&self, rrset: Rrset) {
        let mut current = self.current.write();
        let mut next = TrustContext::clone(&current);
        info!(owner = %rrset.name, keys = rrset.rdatas.len(), "learned DNSKEY RRset");
        next.push(rrset);
        *current = Arc::new(next);
    }

    /// Add a trust anchor
    pub fn add_anchor(&self, anchor: TrustAnchor) {
        let mut current = self.current.write();
        let mut next = TrustContext::clone(&current);
        info!(owner = %anchor.owner, key_tag = anchor.key_tag(), "added trust anchor");
        next.add_anchor(anchor);
        *current = Arc::new(next);
    }

    pub fn replace(&self, context: TrustContext) {
        *self.current.write() = Arc::new(context);
    }
}
