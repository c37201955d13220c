//! The rdata codec: one `RData` variant per implemented `(class, type)` pair,
//! each able to parse/print/encode/decode/compare/digest itself.
//!
//! BIND9 (`examples/original_source/lib/dns/rdata.c` and
//! `lib/dns/rdata/generic/*`) dispatches these six operations through a
//! per-type function-pointer table (`fromtext_ns`, `totext_ns`, ...). Per
//! spec.md §9's redesign note, this crate replaces that table with a single
//! sum type and a `match` — `RData::from_wire` below *is* the dispatch table.

pub mod records;
pub mod types;

use crate::buffer::{Buffer, NameCompressor, WriteBuffer};
use crate::error::RdataError;
use crate::name::Name;
use std::cmp::Ordering;

pub use records::*;
pub use types::{RecordClass, RecordType, Trust};

/// Operations every typed rdata payload implements. `RData`'s own
/// `from_wire`/`to_wire`/... methods are thin dispatchers over this trait,
/// giving each record type its own file without repeating the `match`.
pub trait RdataOps: Sized {
    fn rtype(&self) -> RecordType;
    fn to_wire(&self, out: &mut WriteBuffer, compressor: Option<&mut NameCompressor>);
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError>;
    fn to_text(&self, origin: Option<&Name>) -> String;
    fn from_text(rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError>;
    /// RFC 4034 §6.2 canonical-form comparison, used to sort an rdataset
    /// before it is packed into a [`crate::rdataslab::RdataSlab`]. The
    /// default compares canonical wire octets, which is correct for every
    /// type since `digest()` never compresses embedded names.
    fn compare_canonical(&self, other: &Self) -> Ordering {
        self.digest().cmp(&other.digest())
    }
    /// Wire-form octets in canonical form, used for DNSSEC digest
    /// computation and for slab deduplication; defaults to re-encoding
    /// without a compressor, which is already canonical.
    fn digest(&self) -> Vec<u8> {
        let mut out = WriteBuffer::new();
        self.to_wire(&mut out, None);
        out.into_octets()
    }
    /// Names worth pre-resolving into the additional section (spec.md's
    /// `additional_data`), e.g. an NS record's nameserver name.
    fn additional_data(&self) -> Vec<(Name, RecordType)> {
        Vec::new()
    }
}

/// The rdata sum type. One implemented variant per type spec.md §4.3 lists,
/// plus `Unknown` for everything else (RFC 3597 opaque round-trip).
#[derive(Debug, Clone, PartialEq)]
pub enum RData {
    A(A),
    Ns(Ns),
    Md(Md),
    Mf(Mf),
    Cname(Cname),
    Soa(Soa),
    Mb(Mb),
    Mg(Mg),
    Mr(Mr),
    Null(Null),
    Wks(Wks),
    Ptr(Ptr),
    Hinfo(Hinfo),
    Minfo(Minfo),
    Mx(Mx),
    Txt(Txt),
    Rp(Rp),
    Afsdb(Afsdb),
    X25(X25),
    Isdn(Isdn),
    Rt(Rt),
    Nsap(Nsap),
    NsapPtr(NsapPtr),
    Sig(Sig),
    Key(Key),
    Px(Px),
    Gpos(Gpos),
    Aaaa(Aaaa),
    Loc(Loc),
    Nxt(Nxt),
    Srv(Srv),
    Naptr(Naptr),
    Kx(Kx),
    Cert(Cert),
    A6(A6),
    Dname(Dname),
    Opt(Opt),
    Tkey(Tkey),
    Tsig(Tsig),
    Unknown {
        rtype: RecordType,
        octets: Vec<u8>,
    },
}

macro_rules! dispatch {
    ($self:expr, $pat:ident => $body:expr) => {
        match $self {
            RData::A($pat) => $body,
            RData::Ns($pat) => $body,
            RData::Md($pat) => $body,
            RData::Mf($pat) => $body,
            RData::Cname($pat) => $body,
            RData::Soa($pat) => $body,
            RData::Mb($pat) => $body,
            RData::Mg($pat) => $body,
            RData::Mr($pat) => $body,
            RData::Null($pat) => $body,
            RData::Wks($pat) => $body,
            RData::Ptr($pat) => $body,
            RData::Hinfo($pat) => $body,
            RData::Minfo($pat) => $body,
            RData::Mx($pat) => $body,
            RData::Txt($pat) => $body,
            RData::Rp($pat) => $body,
            RData::Afsdb($pat) => $body,
            RData::X25($pat) => $body,
            RData::Isdn($pat) => $body,
            RData::Rt($pat) => $body,
            RData::Nsap($pat) => $body,
            RData::NsapPtr($pat) => $body,
            RData::Sig($pat) => $body,
            RData::Key($pat) => $body,
            RData::Px($pat) => $body,
            RData::Gpos($pat) => $body,
            RData::Aaaa($pat) => $body,
            RData::Loc($pat) => $body,
            RData::Nxt($pat) => $body,
            RData::Srv($pat) => $body,
            RData::Naptr($pat) => $body,
            RData::Kx($pat) => $body,
            RData::Cert($pat) => $body,
            RData::A6($pat) => $body,
            RData::Dname($pat) => $body,
            RData::Opt($pat) => $body,
            RData::Tkey($pat) => $body,
            RData::Tsig($pat) => $body,
            RData::Unknown { .. } => unreachable!("Unknown is handled separately by each caller"),
        }
    };
}

impl RData {
    pub fn rtype(&self) -> RecordType {
        match self {
            RData::Unknown { rtype, .. } => *rtype,
            other => dispatch!(other, v => v.rtype()),
        }
    }

    pub fn to_wire(&self, out: &mut WriteBuffer, compressor: Option<&mut NameCompressor>) {
        match self {
            RData::Unknown { octets, .. } => out.write_octets(octets),
            other => dispatch!(other, v => v.to_wire(out, compressor)),
        }
    }

    pub fn from_wire(rtype: RecordType, buf: &mut Buffer, rdlength: usize) -> Result<RData, RdataError> {
        macro_rules! try_variant {
            ($variant:ident) => {
                Ok(RData::$variant(records::$variant::from_wire(buf, rdlength)?))
            };
        }
        match rtype {
            RecordType::A => try_variant!(A),
            RecordType::Ns => try_variant!(Ns),
            RecordType::Md => try_variant!(Md),
            RecordType::Mf => try_variant!(Mf),
            RecordType::Cname => try_variant!(Cname),
            RecordType::Soa => try_variant!(Soa),
            RecordType::Mb => try_variant!(Mb),
            RecordType::Mg => try_variant!(Mg),
            RecordType::Mr => try_variant!(Mr),
            RecordType::Null => try_variant!(Null),
            RecordType::Wks => try_variant!(Wks),
            RecordType::Ptr => try_variant!(Ptr),
            RecordType::Hinfo => try_variant!(Hinfo),
            RecordType::Minfo => try_variant!(Minfo),
            RecordType::Mx => try_variant!(Mx),
            RecordType::Txt => try_variant!(Txt),
            RecordType::Rp => try_variant!(Rp),
            RecordType::Afsdb => try_variant!(Afsdb),
            RecordType::X25 => try_variant!(X25),
            RecordType::Isdn => try_variant!(Isdn),
            RecordType::Rt => try_variant!(Rt),
            RecordType::Nsap => try_variant!(Nsap),
            RecordType::NsapPtr => try_variant!(NsapPtr),
            RecordType::Sig => try_variant!(Sig),
            RecordType::Key => try_variant!(Key),
            RecordType::Px => try_variant!(Px),
            RecordType::Gpos => try_variant!(Gpos),
            RecordType::Aaaa => try_variant!(Aaaa),
            RecordType::Loc => try_variant!(Loc),
            RecordType::Nxt => try_variant!(Nxt),
            RecordType::Srv => try_variant!(Srv),
            RecordType::Naptr => try_variant!(Naptr),
            RecordType::Kx => try_variant!(Kx),
            RecordType::Cert => try_variant!(Cert),
            RecordType::A6 => try_variant!(A6),
            RecordType::Dname => try_variant!(Dname),
            RecordType::Opt => try_variant!(Opt),
            RecordType::Tkey => try_variant!(Tkey),
            RecordType::Tsig => try_variant!(Tsig),
            rtype => {
                let octets = buf.take(rdlength)?.to_vec();
                Ok(RData::Unknown { rtype, octets })
            }
        }
    }

    pub fn to_text(&self, origin: Option<&Name>) -> String {
        match self {
            RData::Unknown { octets, .. } => format!("\\# {} {}", octets.len(), hex::encode(octets)),
            other => dispatch!(other, v => v.to_text(origin)),
        }
    }

    /// Parse a zone-file rdata field list (already split into whitespace-
    /// separated tokens by [`crate::lexer::Lexer`]) for `rtype`. The RFC 3597
    /// generic syntax `\# <len> <hex>` is accepted for every type, not only
    /// ones without a typed variant, matching `dns_rdata_fromtext`'s handling
    /// of the unknown-type escape hatch.
    pub fn from_text(rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<RData, RdataError> {
        if tokens.first() == Some(&"\\#") {
            return Self::from_generic_text(rtype, tokens);
        }
        macro_rules! try_variant {
            ($variant:ident) => {
                Ok(RData::$variant(records::$variant::from_text(rtype, tokens, origin)?))
            };
        }
        match rtype {
            RecordType::A => try_variant!(A),
            RecordType::Ns => try_variant!(Ns),
            RecordType::Md => try_variant!(Md),
            RecordType::Mf => try_variant!(Mf),
            RecordType::Cname => try_variant!(Cname),
            RecordType::Soa => try_variant!(Soa),
            RecordType::Mb => try_variant!(Mb),
            RecordType::Mg => try_variant!(Mg),
            RecordType::Mr => try_variant!(Mr),
            RecordType::Null => try_variant!(Null),
            RecordType::Wks => try_variant!(Wks),
            RecordType::Ptr => try_variant!(Ptr),
            RecordType::Hinfo => try_variant!(Hinfo),
            RecordType::Minfo => try_variant!(Minfo),
            RecordType::Mx => try_variant!(Mx),
            RecordType::Txt => try_variant!(Txt),
            RecordType::Rp => try_variant!(Rp),
            RecordType::Afsdb => try_variant!(Afsdb),
            RecordType::X25 => try_variant!(X25),
            RecordType::Isdn => try_variant!(Isdn),
            RecordType::Rt => try_variant!(Rt),
            RecordType::Nsap => try_variant!(Nsap),
            RecordType::NsapPtr => try_variant!(NsapPtr),
            RecordType::Sig => try_variant!(Sig),
            RecordType::Key => try_variant!(Key),
            RecordType::Px => try_variant!(Px),
            RecordType::Gpos => try_variant!(Gpos),
            RecordType::Aaaa => try_variant!(Aaaa),
            RecordType::Loc => try_variant!(Loc),
            RecordType::Nxt => try_variant!(Nxt),
            RecordType::Srv => try_variant!(Srv),
            RecordType::Naptr => try_variant!(Naptr),
            RecordType::Kx => try_variant!(Kx),
            RecordType::Cert => try_variant!(Cert),
            RecordType::A6 => try_variant!(A6),
            RecordType::Dname => try_variant!(Dname),
            RecordType::Opt => try_variant!(Opt),
            RecordType::Tkey => try_variant!(Tkey),
            RecordType::Tsig => try_variant!(Tsig),
            rtype => Self::from_generic_text(rtype, tokens),
        }
    }

    /// `\# <len> <hex>`: the RFC 3597 "unknown RR" presentation format,
    /// also accepted as an escape hatch for any type when the zone file
    /// spells it out byte-for-byte.
    fn from_generic_text(rtype: RecordType, tokens: &[&str]) -> Result<RData, RdataError> {
        let len_tok = tokens
            .get(1)
            .ok_or_else(|| RdataError::Syntax("\\# generic rdata needs a length field".into()))?;
        let len: usize = len_tok.parse().map_err(|_| RdataError::NumberOutOfRange((*len_tok).to_string()))?;
        let hex_digits: String = tokens[2..].concat();
        let octets = hex::decode(&hex_digits).map_err(|_| RdataError::BadHex(hex_digits))?;
        if octets.len() != len {
            return Err(RdataError::Syntax(format!(
                "\\# generic rdata declared length {len} but {} octets of hex were given",
                octets.len()
            )));
        }
        Ok(RData::Unknown { rtype, octets })
    }

    pub fn compare_canonical(&self, other: &RData) -> Ordering {
        match (self, other) {
            (RData::Unknown { octets: a, .. }, RData::Unknown { octets: b, .. }) => a.cmp(b),
            (RData::A(a), RData::A(b)) => a.compare_canonical(b),
            (RData::Ns(a), RData::Ns(b)) => a.compare_canonical(b),
            (RData::Md(a), RData::Md(b)) => a.compare_canonical(b),
            (RData::Mf(a), RData::Mf(b)) => a.compare_canonical(b),
            (RData::Cname(a), RData::Cname(b)) => a.compare_canonical(b),
            (RData::Soa(a), RData::Soa(b)) => a.compare_canonical(b),
            (RData::Mb(a), RData::Mb(b)) => a.compare_canonical(b),
            (RData::Mg(a), RData::Mg(b)) => a.compare_canonical(b),
            (RData::Mr(a), RData::Mr(b)) => a.compare_canonical(b),
            (RData::Null(a), RData::Null(b)) => a.compare_canonical(b),
            (RData::Wks(a), RData::Wks(b)) => a.compare_canonical(b),
            (RData::Ptr(a), RData::Ptr(b)) => a.compare_canonical(b),
            (RData::Hinfo(a), RData::Hinfo(b)) => a.compare_canonical(b),
            (RData::Minfo(a), RData::Minfo(b)) => a.compare_canonical(b),
            (RData::Mx(a), RData::Mx(b)) => a.compare_canonical(b),
            (RData::Txt(a), RData::Txt(b)) => a.compare_canonical(b),
            (RData::Rp(a), RData::Rp(b)) => a.compare_canonical(b),
            (RData::Afsdb(a), RData::Afsdb(b)) => a.compare_canonical(b),
            (RData::X25(a), RData::X25(b)) => a.compare_canonical(b),
            (RData::Isdn(a), RData::Isdn(b)) => a.compare_canonical(b),
            (RData::Rt(a), RData::Rt(b)) => a.compare_canonical(b),
            (RData::Nsap(a), RData::Nsap(b)) => a.compare_canonical(b),
            (RData::NsapPtr(a), RData::NsapPtr(b)) => a.compare_canonical(b),
            (RData::Sig(a), RData::Sig(b)) => a.compare_canonical(b),
            (RData::Key(a), RData::Key(b)) => a.compare_canonical(b),
            (RData::Px(a), RData::Px(b)) => a.compare_canonical(b),
            (RData::Gpos(a), RData::Gpos(b)) => a.compare_canonical(b),
            (RData::Aaaa(a), RData::Aaaa(b)) => a.compare_canonical(b),
            (RData::Loc(a), RData::Loc(b)) => a.compare_canonical(b),
            (RData::Nxt(a), RData::Nxt(b)) => a.compare_canonical(b),
            (RData::Srv(a), RData::Srv(b)) => a.compare_canonical(b),
            (RData::Naptr(a), RData::Naptr(b)) => a.compare_canonical(b),
            (RData::Kx(a), RData::Kx(b)) => a.compare_canonical(b),
            (RData::Cert(a), RData::Cert(b)) => a.compare_canonical(b),
            (RData::A6(a), RData::A6(b)) => a.compare_canonical(b),
            (RData::Dname(a), RData::Dname(b)) => a.compare_canonical(b),
            (RData::Opt(a), RData::Opt(b)) => a.compare_canonical(b),
            (RData::Tkey(a), RData::Tkey(b)) => a.compare_canonical(b),
            (RData::Tsig(a), RData::Tsig(b)) => a.compare_canonical(b),
            _ => self.digest().cmp(&other.digest()),
        }
    }

    pub fn digest(&self) -> Vec<u8> {
        match self {
            RData::Unknown { octets, .. } => octets.clone(),
            other => dispatch!(other, v => v.digest()),
        }
    }

    pub fn additional_data(&self) -> Vec<(Name, RecordType)> {
        match self {
            RData::Unknown { .. } => Vec::new(),
            // NS's hint (the nameserver name itself) isn't a trait default,
            // since most single-name types (CNAME, PTR, ...) have none.
            RData::Ns(ns) => ns.additional(),
            other => dispatch!(other, v => v.additional_data()),
        }
    }
}

/// `base64` 0.21 dropped the old top-level `encode`/`decode` free functions
/// in favour of an explicit `Engine`; these two wrappers keep call sites
/// (KEY/SIG/CERT key material) reading the way they did against the old API.
pub fn base64_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(data)
}

pub fn base64_decode(text: &str) -> Result<Vec<u8>, RdataError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .map_err(|_| RdataError::BadBase64(text.to_string()))
}

/// Read a length-prefixed `<character-string>` (RFC 1035 §3.3), used by
/// TXT/HINFO/X25/ISDN/NAPTR's flags-and-services fields.
pub fn read_character_string(buf: &mut Buffer) -> Result<Vec<u8>, RdataError> {
    let len = buf.next_u8()? as usize;
    Ok(buf.take(len)?.to_vec())
}

pub fn write_character_string(out: &mut WriteBuffer, s: &[u8]) {
    out.write_u8(s.len() as u8);
    out.write_octets(s);
}

/// Presentation-form escaping for a character-string: non-printable octets
/// as `\DDD`, and `"`/`\` backslash-escaped, the whole thing quoted.
pub fn escape_character_string(s: &[u8]) -> String {
    let mut out = String::from("\"");
    for &b in s {
        match b {
            b'"' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\{:03}", b)),
        }
    }
    out.push('"');
    out
}

/// Inverse of [`escape_character_string`]; accepts the token with or without
/// surrounding quotes.
pub fn unescape_character_string(token: &str) -> Result<Vec<u8>, RdataError> {
    let inner = token.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(token);
    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 1;
            if i >= bytes.len() {
                return Err(RdataError::Syntax("trailing backslash in character-string".into()));
            }
            if bytes[i].is_ascii_digit() && i + 2 < bytes.len() {
                let digits = std::str::from_utf8(&bytes[i..i + 3])
                    .map_err(|_| RdataError::Syntax("bad \\DDD escape".into()))?;
                let value: u16 = digits
                    .parse()
                    .map_err(|_| RdataError::Syntax("bad \\DDD escape".into()))?;
                out.push(value as u8);
                i += 3;
            } else {
                out.push(bytes[i]);
                i += 1;
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    if out.len() > 255 {
        return Err(RdataError::CharacterStringTooLong);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_string_roundtrip() {
        let mut out = WriteBuffer::new();
        write_character_string(&mut out, b"hello world");
        let octets = out.into_octets();
        let mut buf = Buffer::new(&octets);
        assert_eq!(read_character_string(&mut buf).unwrap(), b"hello world");
    }

    #[test]
    fn escape_roundtrip() {
        let s = b"has \"quotes\" and \\backslash";
        let escaped = escape_character_string(s);
        let back = unescape_character_string(&escaped).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn unknown_type_roundtrips_as_opaque() {
        let octets = vec![1, 2, 3, 4];
        let mut buf = Buffer::new(&octets);
        let rdata = RData::from_wire(RecordType::Unknown(65432), &mut buf, 4).unwrap();
        assert_eq!(rdata.digest(), octets);
    }
}
