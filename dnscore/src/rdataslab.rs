//! Canonically-ordered, deduplicated rdata storage: the immutable payload a
//! rdataset header (see `crate::zonedb`) points at.
//!
//! BIND9 packs this as a single byte blob (`lib/dns/rdataslab.c`, not present
//! in the retrieved original source for this task). Per spec.md §9's
//! owned-container redesign note, and because there is no byte-packing
//! scheme to ground against here, this crate keeps a `Vec<Vec<u8>>` of
//! canonical-form wire octets instead — each entry is one rdata's `digest()`,
//! sorted and deduplicated the same way the byte-slab format orders them.

use crate::error::SlabError;
use crate::rdata::{RData, RecordType};

/// An immutable, canonically-sorted, deduplicated rdataset payload.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RdataSlab {
    rtype: RecordType,
    entries: Vec<Vec<u8>>,
}

impl RdataSlab {
    /// Build a fresh slab from an arbitrary-order iterator of same-type
    /// rdata, sorting into canonical order and removing exact duplicates.
    pub fn from_rdataset(items: impl Iterator<Item = RData>, rtype: RecordType) -> RdataSlab {
        let mut entries: Vec<Vec<u8>> = items
            .map(|r| {
                debug_assert_eq!(r.rtype(), rtype, "rdataset must be homogeneous in type");
                r.digest()
            })
            .collect();
        entries.sort();
        entries.dedup();
        RdataSlab { rtype, entries }
    }

    pub fn rtype(&self) -> RecordType {
        self.rtype
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total encoded size, the count octets BIND9's packed format would
    /// spend plus each entry's length-prefixed payload.
    pub fn size(&self) -> usize {
        2 + self.entries.iter().map(|e| 2 + e.len()).sum::<usize>()
    }

    pub fn entries(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(|v| v.as_slice())
    }

    fn merged(&self, other: &RdataSlab) -> Vec<Vec<u8>> {
        let mut out = self.entries.clone();
        out.extend(other.entries.iter().cloned());
        out.sort();
        out.dedup();
        out
    }

    /// Union of `self` and `other`. Returns `SlabError::Unchanged` when
    /// `other` contributes nothing new and `force` is not set — BIND9's
    /// `dns_rdataslab_merge` takes the analogous `DNS_RDATASLAB_FORCE` flag
    /// for the case of CNAME-exclusivity overrides.
    pub fn merge(&self, other: &RdataSlab, force: bool) -> Result<RdataSlab, SlabError> {
        if self.rtype != other.rtype {
            return Err(SlabError::TypeMismatch);
        }
        let merged = self.merged(other);
        if !force && merged.len() == self.entries.len() {
            return Err(SlabError::Unchanged);
        }
        Ok(RdataSlab { rtype: self.rtype, entries: merged })
    }

    /// `self` minus any entry also present in `other`.
    pub fn subtract(&self, other: &RdataSlab) -> Result<RdataSlab, SlabError> {
        if self.rtype != other.rtype {
            return Err(SlabError::TypeMismatch);
        }
        let remaining: Vec<Vec<u8>> = self
            .entries
            .iter()
            .filter(|e| !other.entries.contains(e))
            .cloned()
            .collect();
        if remaining.len() == self.entries.len() {
            return Err(SlabError::Unchanged);
        }
        Ok(RdataSlab { rtype: self.rtype, entries: remaining })
    }

    /// Does this slab contain every entry of `other`?
    pub fn is_superset_of(&self, other: &RdataSlab) -> bool {
        other.entries.iter().all(|e| self.entries.contains(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;
    use crate::rdata::records::A;
    use std::net::Ipv4Addr;

    fn a(last: u8) -> RData {
        RData::A(A { address: Ipv4Addr::new(192, 0, 2, last) })
    }

    #[test]
    fn builds_sorted_and_deduplicated() {
        let slab = RdataSlab::from_rdataset(vec![a(3), a(1), a(1), a(2)].into_iter(), RecordType::A);
        assert_eq!(slab.len(), 3);
        let entries: Vec<&[u8]> = slab.entries().collect();
        assert!(entries.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn merge_returns_unchanged_when_subset() {
        let big = RdataSlab::from_rdataset(vec![a(1), a(2)].into_iter(), RecordType::A);
        let small = RdataSlab::from_rdataset(vec![a(1)].into_iter(), RecordType::A);
        assert_eq!(big.merge(&small, false), Err(SlabError::Unchanged));
    }

    #[test]
    fn merge_adds_new_entries() {
        let a_slab = RdataSlab::from_rdataset(vec![a(1)].into_iter(), RecordType::A);
        let b_slab = RdataSlab::from_rdataset(vec![a(2)].into_iter(), RecordType::A);
        let merged = a_slab.merge(&b_slab, false).unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn subtract_removes_common_entries() {
        let full = RdataSlab::from_rdataset(vec![a(1), a(2), a(3)].into_iter(), RecordType::A);
        let minus = RdataSlab::from_rdataset(vec![a(2)].into_iter(), RecordType::A);
        let result = full.subtract(&minus).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn subtract_disjoint_is_unchanged() {
        let full = RdataSlab::from_rdataset(vec![a(1)].into_iter(), RecordType::A);
        let other = RdataSlab::from_rdataset(vec![a(9)].into_iter(), RecordType::A);
        assert_eq!(full.subtract(&other), Err(SlabError::Unchanged));
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let a_slab = RdataSlab::from_rdataset(vec![a(1)].into_iter(), RecordType::A);
        let ns_slab = RdataSlab::from_rdataset(
            vec![RData::Ns(crate::rdata::records::Ns { nsdname: Name::root() })].into_iter(),
            RecordType::Ns,
        );
        assert_eq!(a_slab.merge(&ns_slab, false), Err(SlabError::TypeMismatch));
    }

    #[test]
    fn is_superset_of() {
        let full = RdataSlab::from_rdataset(vec![a(1), a(2)].into_iter(), RecordType::A);
        let part = RdataSlab::from_rdataset(vec![a(1)].into_iter(), RecordType::A);
        assert!(full.is_superset_of(&part));
        assert!(!part.is_superset_of(&full));
    }
}
