//! Domain names: the label-sequence type shared by every other module.
//!
//! A [`Name`] owns its labels and keeps an `offsets` table alongside them (one
//! entry per label, pointing at that label's length octet within `wire`-style
//! packed form) so that suffix/prefix operations used by the RBT and the zone
//! database don't have to rescan the label sequence from the start each time.

use crate::buffer::{Buffer, NameCompressor, WriteBuffer};
use crate::error::NameError;
use std::cmp::Ordering;
use std::fmt;

/// Maximum encoded length of a name, including length octets, per RFC 1035 §3.1.
pub const MAX_NAME_OCTETS: usize = 255;
/// Maximum length of a single label.
pub const MAX_LABEL_OCTETS: usize = 63;
/// A 14-bit compression pointer can only reference the first 16384 octets of a message.
pub const MAX_COMPRESSION_OFFSET: usize = 0x3FFF;

/// An owned, absolute or relative domain name.
///
/// Labels are stored lower-cased: this crate downcases on every parse path
/// (wire and text) and never round-trips original case, matching the
/// behaviour `barrucadu-resolved`'s `DomainName::deserialise` already
/// implements. Values flowing in from a master file or a query retain the
/// octets they were built from only to the extent recorded by their caller;
/// `Name` itself is always canonical-case.
#[derive(Clone, Eq)]
pub struct Name {
    /// Labels in on-the-wire order (first label closest to the root is last).
    labels: Vec<Vec<u8>>,
    /// Byte offset of each label's start within the label sequence as it
    /// would appear packed (length octet included), root-relative.
    offsets: Vec<u16>,
}

/// The result of comparing two names' label sequences from the root down,
/// mirroring BIND9's `dns_name_fullcompare`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NameRelation {
    /// The names are identical.
    Equal,
    /// `self` is a strict subdomain of the other name.
    Subdomain,
    /// `self` is a strict superdomain of the other name.
    SuperDomain,
    /// Neither is a subdomain of the other, but they share a common suffix.
    CommonAncestor { common_labels: usize },
    /// No labels in common (not even the root).
    None,
}

impl Name {
    /// The DNS root, the zero-label name.
    pub fn root() -> Name {
        Name {
            labels: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Build directly from already-lower-cased labels, computing offsets.
    pub fn from_labels(labels: Vec<Vec<u8>>) -> Result<Name, NameError> {
        let mut total = 1usize; // root octet
        let mut offsets = Vec::with_capacity(labels.len());
        let mut offset = 0u16;
        for label in &labels {
            if label.len() > MAX_LABEL_OCTETS {
                return Err(NameError::LabelTooLong(label.len()));
            }
            offsets.push(offset);
            let step = label.len() + 1;
            total += step;
            offset = offset.saturating_add(step as u16);
        }
        if total > MAX_NAME_OCTETS {
            return Err(NameError::NameTooLong(total));
        }
        Ok(Name { labels, offsets })
    }

    /// Parse a name from presentation (text) format, resolving a trailing
    /// relative name against `origin` the way a master-file parser does.
    pub fn from_text(text: &str, origin: Option<&Name>) -> Result<Name, NameError> {
        if !text.is_ascii() {
            return Err(NameError::NonAscii);
        }
        if text == "." {
            return Ok(Name::root());
        }
        let bytes = text.as_bytes();
        let absolute = bytes.last() == Some(&b'.');
        let mut labels = Vec::new();
        let mut current = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    i += 1;
                    if i >= bytes.len() {
                        return Err(NameError::Truncated);
                    }
                    if bytes[i].is_ascii_digit() {
                        if i + 2 >= bytes.len() {
                            return Err(NameError::Truncated);
                        }
                        let digits = std::str::from_utf8(&bytes[i..i + 3]).map_err(|_| NameError::NonAscii)?;
                        let value: u16 = digits.parse().map_err(|_| NameError::NonAscii)?;
                        if value > 255 {
                            return Err(NameError::NonAscii);
                        }
                        current.push(value as u8);
                        i += 3;
                    } else {
                        current.push(bytes[i].to_ascii_lowercase());
                        i += 1;
                    }
                }
                b'.' => {
                    labels.push(std::mem::take(&mut current));
                    i += 1;
                }
                c => {
                    current.push(c.to_ascii_lowercase());
                    i += 1;
                }
            }
        }
        if !absolute {
            labels.push(current);
        }
        // filter a single trailing empty label produced by an absolute name
        if absolute {
            // current was flushed into `labels` already by the final '.'; nothing left to push
        }
        for label in &labels {
            if label.len() > MAX_LABEL_OCTETS {
                return Err(NameError::LabelTooLong(label.len()));
            }
        }
        let relative_name = Name::from_labels(labels)?;
        if absolute {
            Ok(relative_name)
        } else {
            match origin {
                Some(origin) => relative_name.concat(origin),
                None => Ok(relative_name),
            }
        }
    }

    /// Parse a name in wire form, following compression pointers when
    /// `allow_compression` is set (queries and answers allow it; some
    /// contexts such as zone-file text never see compression at all).
    pub fn from_wire(buf: &mut Buffer, allow_compression: bool) -> Result<Name, NameError> {
        let mut labels = Vec::new();
        let mut total = 1usize;
        let start = buf.current();
        let mut reading_at = start;
        let mut jumped = false;
        let mut furthest_seen = start;
        let mut saved_position: Option<usize> = None;
        loop {
            let len_octet = buf.peek_u8_at(reading_at).ok_or(NameError::Truncated)?;
            if len_octet == 0 {
                reading_at += 1;
                if !jumped {
                    saved_position = Some(reading_at);
                }
                break;
            } else if len_octet & 0xC0 == 0xC0 {
                if !allow_compression {
                    return Err(NameError::BadPointer(reading_at));
                }
                let hi = (len_octet & 0x3F) as usize;
                let lo = buf.peek_u8_at(reading_at + 1).ok_or(NameError::Truncated)? as usize;
                let pointer = (hi << 8) | lo;
                if !jumped {
                    saved_position = Some(reading_at + 2);
                }
                if pointer >= furthest_seen {
                    return Err(NameError::BadPointer(pointer));
                }
                furthest_seen = pointer;
                reading_at = pointer;
                jumped = true;
            } else if len_octet & 0xC0 != 0 {
                return Err(NameError::BadLabelLength(len_octet));
            } else {
                let len = len_octet as usize;
                let label_start = reading_at + 1;
                let label = buf
                    .peek_slice_at(label_start, len)
                    .ok_or(NameError::Truncated)?
                    .to_vec();
                if label.is_empty() {
                    return Err(NameError::EmptyMidLabel);
                }
                let mut lowered = label;
                lowered.make_ascii_lowercase();
                total += lowered.len() + 1;
                if total > MAX_NAME_OCTETS {
                    return Err(NameError::NameTooLong(total));
                }
                labels.push(lowered);
                reading_at = label_start + len;
                furthest_seen = furthest_seen.min(reading_at);
            }
        }
        let end = saved_position.unwrap_or(reading_at);
        buf.set_current(end)?;
        Name::from_labels(labels)
    }

    /// Serialise in wire form, consulting (and updating) `compressor` for a
    /// backward pointer to an already-emitted suffix when present.
    pub fn to_wire(&self, out: &mut WriteBuffer, mut compressor: Option<&mut NameCompressor>) {
        let mut remaining: &[Vec<u8>] = &self.labels;
        loop {
            if let Some(ref mut comp) = compressor {
                if let Some(pointer) = comp.lookup(remaining) {
                    out.write_u16(0xC000 | pointer as u16);
                    return;
                }
            }
            match remaining.split_first() {
                None => break,
                Some((label, rest)) => {
                    if let Some(ref mut comp) = compressor {
                        comp.record(remaining, out.len());
                    }
                    out.write_u8(label.len() as u8);
                    out.write_octets(label);
                    remaining = rest;
                }
            }
        }
        out.write_u8(0);
    }

    /// Render in presentation (text) form, relative to `origin` when the name
    /// is a strict subdomain of it (stripping the shared suffix), matching
    /// what a zone-file printer emits for records inside the zone's apex.
    pub fn to_text(&self, origin: Option<&Name>) -> String {
        let labels: &[Vec<u8>] = match origin {
            Some(origin) if self.is_subdomain_of(origin) && self != origin => {
                &self.labels[..self.labels.len() - origin.labels.len()]
            }
            _ => &self.labels,
        };
        if labels.is_empty() && origin.is_none() {
            return ".".to_string();
        }
        let mut out = String::new();
        for label in labels {
            for &b in label {
                match b {
                    b'.' | b'\\' | b';' | b'"' => {
                        out.push('\\');
                        out.push(b as char);
                    }
                    0x21..=0x7E => out.push(b as char),
                    _ => out.push_str(&format!("\\{:03}", b)),
                }
            }
            out.push('.');
        }
        if origin.is_some() && !out.is_empty() {
            out.pop();
        }
        if out.is_empty() {
            out.push('.');
        }
        out
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_wildcard(&self) -> bool {
        self.labels.first().map(|l| l.as_slice() == b"*").unwrap_or(false)
    }

    /// `self` with its leftmost label removed (the parent domain).
    pub fn parent(&self) -> Name {
        if self.labels.is_empty() {
            return Name::root();
        }
        Name::from_labels(self.labels[1..].to_vec()).expect("suffix of a valid name is valid")
    }

    /// Is `self` equal to or a subdomain of `other`?
    pub fn is_subdomain_of(&self, other: &Name) -> bool {
        if other.labels.len() > self.labels.len() {
            return false;
        }
        let offset = self.labels.len() - other.labels.len();
        self.labels[offset..] == other.labels[..]
    }

    /// Append `suffix` after `self`'s labels (`self` must be relative, i.e.
    /// not already absolute, though this crate doesn't track that bit
    /// separately — callers are expected to only concat a name built as
    /// relative text against its zone origin).
    pub fn concat(&self, suffix: &Name) -> Result<Name, NameError> {
        let mut labels = self.labels.clone();
        labels.extend(suffix.labels.iter().cloned());
        Name::from_labels(labels)
    }

    /// Split into `(prefix, suffix)` where `suffix` has `label_index` labels
    /// remaining from the root, i.e. `suffix` is the name's bottom
    /// `label_index`-label suffix.
    pub fn split_at(&self, label_index: usize) -> (Name, Name) {
        let at = self.labels.len().saturating_sub(label_index);
        let prefix = Name::from_labels(self.labels[..at].to_vec()).expect("prefix of a valid name is valid");
        let suffix = Name::from_labels(self.labels[at..].to_vec()).expect("suffix of a valid name is valid");
        (prefix, suffix)
    }

    /// Canonical (RFC 4034 §6.1) ordering: compare from the least significant
    /// (rightmost/root-closest) label down, each label byte-compared
    /// case-insensitively (names are already stored lower-cased so this is a
    /// plain byte compare).
    pub fn cmp_canonical(&self, other: &Name) -> Ordering {
        let a = &self.labels;
        let b = &other.labels;
        let mut ia = a.len();
        let mut ib = b.len();
        loop {
            match (ia, ib) {
                (0, 0) => return Ordering::Equal,
                (0, _) => return Ordering::Less,
                (_, 0) => return Ordering::Greater,
                _ => {
                    ia -= 1;
                    ib -= 1;
                    match a[ia].len().cmp(&b[ib].len()).then_with(|| a[ia].cmp(&b[ib])) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
            }
        }
    }

    /// BIND9-style full comparison, also reporting the depth of agreement;
    /// used by the RBT to decide whether to descend, ascend, or branch.
    pub fn relation(&self, other: &Name) -> NameRelation {
        if self == other {
            return NameRelation::Equal;
        }
        let mut common = 0usize;
        let mut ia = self.labels.len();
        let mut ib = other.labels.len();
        while ia > 0 && ib > 0 {
            ia -= 1;
            ib -= 1;
            if self.labels[ia] == other.labels[ib] {
                common += 1;
            } else {
                break;
            }
        }
        if common == 0 {
            return NameRelation::None;
        }
        if common == other.labels.len() && self.labels.len() > other.labels.len() {
            return NameRelation::Subdomain;
        }
        if common == self.labels.len() && other.labels.len() > self.labels.len() {
            return NameRelation::SuperDomain;
        }
        NameRelation::CommonAncestor { common_labels: common }
    }

    /// Offsets table, one entry per label (for callers walking the name
    /// piecewise, e.g. the RBT chain reconstruction).
    pub fn offsets(&self) -> &[u16] {
        &self.offsets
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.labels == other.labels
    }
}

impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Names are already lower-cased, so this is also the canonical hash.
        self.labels.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.to_text(None))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text(None))
    }
}

#[cfg(feature = "test-util")]
impl<'a> arbitrary::Arbitrary<'a> for Name {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let count: u8 = u.int_in_range(0..=8)?;
        let mut labels = Vec::new();
        for _ in 0..count {
            let len: u8 = u.int_in_range(1..=10)?;
            let mut label = Vec::with_capacity(len as usize);
            for _ in 0..len {
                let c: u8 = u.int_in_range(b'a'..=b'z')?;
                label.push(c);
            }
            labels.push(label);
        }
        Name::from_labels(labels).map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_text_roundtrip() {
        let root = Name::root();
        assert_eq!(root.to_text(None), ".");
        assert_eq!(Name::from_text(".", None).unwrap(), root);
    }

    #[test]
    fn absolute_text_roundtrip() {
        let n = Name::from_text("www.example.com.", None).unwrap();
        assert_eq!(n.label_count(), 3);
        assert_eq!(n.to_text(None), "www.example.com.");
    }

    #[test]
    fn relative_against_origin() {
        let origin = Name::from_text("example.com.", None).unwrap();
        let n = Name::from_text("www", Some(&origin)).unwrap();
        assert_eq!(n.to_text(None), "www.example.com.");
    }

    #[test]
    fn case_is_folded() {
        let a = Name::from_text("WWW.Example.COM.", None).unwrap();
        let b = Name::from_text("www.example.com.", None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn escaped_dot_label() {
        let n = Name::from_text("a\\.b.example.com.", None).unwrap();
        assert_eq!(n.label_count(), 3);
        assert_eq!(n.labels()[0], b"a.b");
    }

    #[test]
    fn subdomain_check() {
        let parent = Name::from_text("example.com.", None).unwrap();
        let child = Name::from_text("www.example.com.", None).unwrap();
        assert!(child.is_subdomain_of(&parent));
        assert!(!parent.is_subdomain_of(&child));
        assert!(parent.is_subdomain_of(&parent));
    }

    #[test]
    fn canonical_ordering() {
        let a = Name::from_text("a.example.com.", None).unwrap();
        let b = Name::from_text("z.example.com.", None).unwrap();
        assert_eq!(a.cmp_canonical(&b), Ordering::Less);
        let short = Name::from_text("example.com.", None).unwrap();
        assert_eq!(short.cmp_canonical(&a), Ordering::Less);
    }

    #[test]
    fn relation_common_ancestor() {
        let a = Name::from_text("foo.example.com.", None).unwrap();
        let b = Name::from_text("bar.example.com.", None).unwrap();
        match a.relation(&b) {
            NameRelation::CommonAncestor { common_labels } => assert_eq!(common_labels, 2),
            other => panic!("expected CommonAncestor, got {other:?}"),
        }
    }

    #[test]
    fn wire_roundtrip_no_compression() {
        let n = Name::from_text("www.example.com.", None).unwrap();
        let mut out = WriteBuffer::new();
        n.to_wire(&mut out, None);
        let octets = out.into_octets();
        let mut buf = Buffer::new(&octets);
        let back = Name::from_wire(&mut buf, false).unwrap();
        assert_eq!(n, back);
    }

    #[test]
    fn wire_pointer_must_be_backward() {
        // A pointer at offset 0 pointing at offset 0 (or later) must be rejected.
        let octets = [0xC0u8, 0x00];
        let mut buf = Buffer::new(&octets);
        assert!(Name::from_wire(&mut buf, true).is_err());
    }

    #[test]
    fn compression_pointer_reused() {
        let mut out = WriteBuffer::new();
        let mut comp = NameCompressor::new();
        let example = Name::from_text("example.com.", None).unwrap();
        let www = Name::from_text("www.example.com.", None).unwrap();
        example.to_wire(&mut out, Some(&mut comp));
        let before = out.len();
        www.to_wire(&mut out, Some(&mut comp));
        // www.example.com should reuse the suffix, so it costs far less than
        // a fresh uncompressed encoding of all three labels.
        assert!(out.len() - before < www.label_count() * 2 + 10);
    }
}
