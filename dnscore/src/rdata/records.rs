//! Typed rdata payloads, one struct per implemented record type.
//!
//! Each struct is a direct, owned rendering of the fields BIND9's
//! `lib/dns/rdata/generic/*` structs carry (e.g. `dns_rdata_soa_t`), minus the
//! manual `fromstruct`/`tostruct`/`freestruct` triplet — ownership already
//! gives us that for free, per spec.md §9's redesign note.

use super::{
    escape_character_string, read_character_string, unescape_character_string, write_character_string, RdataOps,
    RecordType,
};
use crate::buffer::{Buffer, NameCompressor, WriteBuffer};
use crate::error::RdataError;
use crate::name::Name;
use std::cmp::Ordering;
use std::net::{Ipv4Addr, Ipv6Addr};

fn require_exact(buf: &Buffer, start: usize, rdlength: usize, rtype: RecordType) -> Result<(), RdataError> {
    let consumed = buf.current() - start;
    if consumed < rdlength {
        Err(RdataError::Truncated(rtype))
    } else if consumed > rdlength {
        Err(RdataError::TrailingData(rtype, consumed - rdlength))
    } else {
        Ok(())
    }
}

fn parse_u16(tok: &str) -> Result<u16, RdataError> {
    tok.parse().map_err(|_| RdataError::NumberOutOfRange(tok.to_string()))
}

fn parse_u32(tok: &str) -> Result<u32, RdataError> {
    tok.parse().map_err(|_| RdataError::NumberOutOfRange(tok.to_string()))
}

fn parse_u8(tok: &str) -> Result<u8, RdataError> {
    tok.parse().map_err(|_| RdataError::NumberOutOfRange(tok.to_string()))
}

fn need<'a>(tokens: &'a [&'a str], i: usize) -> Result<&'a str, RdataError> {
    tokens
        .get(i)
        .copied()
        .ok_or_else(|| RdataError::Syntax(format!("expected field at position {i}")))
}

/// Declares a struct with a single embedded `Name` field (NS, MD, MF, CNAME,
/// MB, MG, MR, PTR, NSAP-PTR, DNAME all share this shape) and its `RdataOps`
/// impl. `$compressed` controls whether the embedded name uses the global
/// compression table on emission, per spec.md §4.3's per-type contract.
macro_rules! single_name_rdata {
    ($name:ident, $field:ident, $rtype:expr, $compressed:expr) => {
        #[derive(Debug, Clone, Eq, PartialEq)]
        pub struct $name {
            pub $field: Name,
        }

        impl RdataOps for $name {
            fn rtype(&self) -> RecordType {
                $rtype
            }

            fn to_wire(&self, out: &mut WriteBuffer, compressor: Option<&mut NameCompressor>) {
                self.$field.to_wire(out, if $compressed { compressor } else { None });
            }

            fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
                let start = buf.current();
                let $field = Name::from_wire(buf, true)?;
                require_exact(buf, start, rdlength, $rtype)?;
                Ok($name { $field })
            }

            fn to_text(&self, origin: Option<&Name>) -> String {
                self.$field.to_text(origin)
            }

            fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
                let $field = Name::from_text(need(tokens, 0)?, origin)?;
                Ok($name { $field })
            }

            fn compare_canonical(&self, other: &Self) -> Ordering {
                self.$field.cmp_canonical(&other.$field)
            }
        }
    };
}

single_name_rdata!(Ns, nsdname, RecordType::Ns, true);
single_name_rdata!(Md, madname, RecordType::Md, true);
single_name_rdata!(Mf, madname, RecordType::Mf, true);
single_name_rdata!(Cname, cname, RecordType::Cname, true);
single_name_rdata!(Mb, madname, RecordType::Mb, true);
single_name_rdata!(Mg, mgmname, RecordType::Mg, true);
single_name_rdata!(Mr, newname, RecordType::Mr, true);
single_name_rdata!(Ptr, ptrdname, RecordType::Ptr, true);
single_name_rdata!(NsapPtr, owner, RecordType::NsapPtr, false);
single_name_rdata!(Dname, target, RecordType::Dname, false);

impl Ns {
    /// Nameserver names are worth pre-resolving into the additional section
    /// (BIND9's `rdata.c: dns_rdata_additionaldata` switches on NS the same way).
    pub fn additional(&self) -> Vec<(Name, RecordType)> {
        vec![(self.nsdname.clone(), RecordType::A), (self.nsdname.clone(), RecordType::Aaaa)]
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct A {
    pub address: Ipv4Addr,
}

impl RdataOps for A {
    fn rtype(&self) -> RecordType {
        RecordType::A
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_octets(&self.address.octets());
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        if rdlength != 4 {
            return Err(RdataError::Truncated(RecordType::A));
        }
        let octets = buf.take(4)?;
        Ok(A {
            address: Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]),
        })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        self.address.to_string()
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        let address: Ipv4Addr = need(tokens, 0)?
            .parse()
            .map_err(|_| RdataError::Syntax("invalid IPv4 address".into()))?;
        Ok(A { address })
    }
    fn compare_canonical(&self, other: &Self) -> Ordering {
        self.address.octets().cmp(&other.address.octets())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Aaaa {
    pub address: Ipv6Addr,
}

impl RdataOps for Aaaa {
    fn rtype(&self) -> RecordType {
        RecordType::Aaaa
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_octets(&self.address.octets());
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        if rdlength != 16 {
            return Err(RdataError::Truncated(RecordType::Aaaa));
        }
        let octets = buf.take(16)?;
        let mut a = [0u8; 16];
        a.copy_from_slice(octets);
        Ok(Aaaa { address: Ipv6Addr::from(a) })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        self.address.to_string()
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        let address: Ipv6Addr = need(tokens, 0)?
            .parse()
            .map_err(|_| RdataError::Syntax("invalid IPv6 address".into()))?;
        Ok(Aaaa { address })
    }
    fn compare_canonical(&self, other: &Self) -> Ordering {
        self.address.octets().cmp(&other.address.octets())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Soa {
    pub mname: Name,
    pub rname: Name,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

impl RdataOps for Soa {
    fn rtype(&self) -> RecordType {
        RecordType::Soa
    }
    fn to_wire(&self, out: &mut WriteBuffer, mut compressor: Option<&mut NameCompressor>) {
        self.mname.to_wire(out, compressor.as_mut().map(|c| &mut **c));
        self.rname.to_wire(out, compressor);
        out.write_u32(self.serial);
        out.write_u32(self.refresh);
        out.write_u32(self.retry);
        out.write_u32(self.expire);
        out.write_u32(self.minimum);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let mname = Name::from_wire(buf, true)?;
        let rname = Name::from_wire(buf, true)?;
        let serial = buf.next_u32()?;
        let refresh = buf.next_u32()?;
        let retry = buf.next_u32()?;
        let expire = buf.next_u32()?;
        let minimum = buf.next_u32()?;
        require_exact(buf, start, rdlength, RecordType::Soa)?;
        Ok(Soa { mname, rname, serial, refresh, retry, expire, minimum })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.mname.to_text(origin),
            self.rname.to_text(origin),
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum
        )
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Soa {
            mname: Name::from_text(need(tokens, 0)?, origin)?,
            rname: Name::from_text(need(tokens, 1)?, origin)?,
            serial: parse_u32(need(tokens, 2)?)?,
            refresh: parse_u32(need(tokens, 3)?)?,
            retry: parse_u32(need(tokens, 4)?)?,
            expire: parse_u32(need(tokens, 5)?)?,
            minimum: parse_u32(need(tokens, 6)?)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Null {
    pub octets: Vec<u8>,
}

impl RdataOps for Null {
    fn rtype(&self) -> RecordType {
        RecordType::Null
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_octets(&self.octets);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        Ok(Null { octets: buf.take(rdlength)?.to_vec() })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        format!("\\# {} {}", self.octets.len(), hex::encode(&self.octets))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        let joined = tokens.join("");
        Ok(Null {
            octets: hex::decode(joined).map_err(|_| RdataError::BadHex("NULL rdata".into()))?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Wks {
    pub address: Ipv4Addr,
    pub protocol: u8,
    pub bitmap: Vec<u8>,
}

impl RdataOps for Wks {
    fn rtype(&self) -> RecordType {
        RecordType::Wks
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_octets(&self.address.octets());
        out.write_u8(self.protocol);
        out.write_octets(&self.bitmap);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        if rdlength < 5 {
            return Err(RdataError::Truncated(RecordType::Wks));
        }
        let octets = buf.take(4)?;
        let address = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
        let protocol = buf.next_u8()?;
        let bitmap = buf.take(rdlength - 5)?.to_vec();
        Ok(Wks { address, protocol, bitmap })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        format!("{} {} {}", self.address, self.protocol, hex::encode(&self.bitmap))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Wks {
            address: need(tokens, 0)?
                .parse()
                .map_err(|_| RdataError::Syntax("invalid IPv4 address".into()))?,
            protocol: parse_u8(need(tokens, 1)?)?,
            bitmap: hex::decode(need(tokens, 2)?).map_err(|_| RdataError::BadHex("WKS bitmap".into()))?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Hinfo {
    pub cpu: Vec<u8>,
    pub os: Vec<u8>,
}

impl RdataOps for Hinfo {
    fn rtype(&self) -> RecordType {
        RecordType::Hinfo
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        write_character_string(out, &self.cpu);
        write_character_string(out, &self.os);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let cpu = read_character_string(buf)?;
        let os = read_character_string(buf)?;
        require_exact(buf, start, rdlength, RecordType::Hinfo)?;
        Ok(Hinfo { cpu, os })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        format!("{} {}", escape_character_string(&self.cpu), escape_character_string(&self.os))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Hinfo {
            cpu: unescape_character_string(need(tokens, 0)?)?,
            os: unescape_character_string(need(tokens, 1)?)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Minfo {
    pub rmailbx: Name,
    pub emailbx: Name,
}

impl RdataOps for Minfo {
    fn rtype(&self) -> RecordType {
        RecordType::Minfo
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        // Embedded names here are not compression-eligible per spec.md §4.3.
        self.rmailbx.to_wire(out, None);
        self.emailbx.to_wire(out, None);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let rmailbx = Name::from_wire(buf, true)?;
        let emailbx = Name::from_wire(buf, true)?;
        require_exact(buf, start, rdlength, RecordType::Minfo)?;
        Ok(Minfo { rmailbx, emailbx })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {}", self.rmailbx.to_text(origin), self.emailbx.to_text(origin))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Minfo {
            rmailbx: Name::from_text(need(tokens, 0)?, origin)?,
            emailbx: Name::from_text(need(tokens, 1)?, origin)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Mx {
    pub preference: u16,
    pub exchange: Name,
}

impl RdataOps for Mx {
    fn rtype(&self) -> RecordType {
        RecordType::Mx
    }
    fn to_wire(&self, out: &mut WriteBuffer, compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.preference);
        self.exchange.to_wire(out, compressor);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let preference = buf.next_u16()?;
        let exchange = Name::from_wire(buf, true)?;
        require_exact(buf, start, rdlength, RecordType::Mx)?;
        Ok(Mx { preference, exchange })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {}", self.preference, self.exchange.to_text(origin))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Mx {
            preference: parse_u16(need(tokens, 0)?)?,
            exchange: Name::from_text(need(tokens, 1)?, origin)?,
        })
    }
    fn additional_data(&self) -> Vec<(Name, RecordType)> {
        vec![(self.exchange.clone(), RecordType::A), (self.exchange.clone(), RecordType::Aaaa)]
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Txt {
    pub strings: Vec<Vec<u8>>,
}

impl RdataOps for Txt {
    fn rtype(&self) -> RecordType {
        RecordType::Txt
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        for s in &self.strings {
            write_character_string(out, s);
        }
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let mut strings = Vec::new();
        while buf.current() - start < rdlength {
            strings.push(read_character_string(buf)?);
        }
        require_exact(buf, start, rdlength, RecordType::Txt)?;
        Ok(Txt { strings })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        self.strings
            .iter()
            .map(|s| escape_character_string(s))
            .collect::<Vec<_>>()
            .join(" ")
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        let strings = tokens
            .iter()
            .map(|t| unescape_character_string(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Txt { strings })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Rp {
    pub mbox: Name,
    pub txt: Name,
}

impl RdataOps for Rp {
    fn rtype(&self) -> RecordType {
        RecordType::Rp
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        self.mbox.to_wire(out, None);
        self.txt.to_wire(out, None);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let mbox = Name::from_wire(buf, true)?;
        let txt = Name::from_wire(buf, true)?;
        require_exact(buf, start, rdlength, RecordType::Rp)?;
        Ok(Rp { mbox, txt })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {}", self.mbox.to_text(origin), self.txt.to_text(origin))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Rp {
            mbox: Name::from_text(need(tokens, 0)?, origin)?,
            txt: Name::from_text(need(tokens, 1)?, origin)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Afsdb {
    pub subtype: u16,
    pub hostname: Name,
}

impl RdataOps for Afsdb {
    fn rtype(&self) -> RecordType {
        RecordType::Afsdb
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.subtype);
        self.hostname.to_wire(out, None);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let subtype = buf.next_u16()?;
        let hostname = Name::from_wire(buf, true)?;
        require_exact(buf, start, rdlength, RecordType::Afsdb)?;
        Ok(Afsdb { subtype, hostname })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {}", self.subtype, self.hostname.to_text(origin))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Afsdb {
            subtype: parse_u16(need(tokens, 0)?)?,
            hostname: Name::from_text(need(tokens, 1)?, origin)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct X25 {
    pub psdn_address: Vec<u8>,
}

impl RdataOps for X25 {
    fn rtype(&self) -> RecordType {
        RecordType::X25
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        write_character_string(out, &self.psdn_address);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let psdn_address = read_character_string(buf)?;
        require_exact(buf, start, rdlength, RecordType::X25)?;
        Ok(X25 { psdn_address })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        escape_character_string(&self.psdn_address)
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(X25 { psdn_address: unescape_character_string(need(tokens, 0)?)? })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Isdn {
    pub address: Vec<u8>,
    pub sa: Option<Vec<u8>>,
}

impl RdataOps for Isdn {
    fn rtype(&self) -> RecordType {
        RecordType::Isdn
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        write_character_string(out, &self.address);
        if let Some(sa) = &self.sa {
            write_character_string(out, sa);
        }
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let address = read_character_string(buf)?;
        let sa = if buf.current() - start < rdlength {
            Some(read_character_string(buf)?)
        } else {
            None
        };
        require_exact(buf, start, rdlength, RecordType::Isdn)?;
        Ok(Isdn { address, sa })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        match &self.sa {
            Some(sa) => format!("{} {}", escape_character_string(&self.address), escape_character_string(sa)),
            None => escape_character_string(&self.address),
        }
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        let address = unescape_character_string(need(tokens, 0)?)?;
        let sa = match tokens.get(1) {
            Some(t) => Some(unescape_character_string(t)?),
            None => None,
        };
        Ok(Isdn { address, sa })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Rt {
    pub preference: u16,
    pub intermediate_host: Name,
}

impl RdataOps for Rt {
    fn rtype(&self) -> RecordType {
        RecordType::Rt
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.preference);
        self.intermediate_host.to_wire(out, None);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let preference = buf.next_u16()?;
        let intermediate_host = Name::from_wire(buf, true)?;
        require_exact(buf, start, rdlength, RecordType::Rt)?;
        Ok(Rt { preference, intermediate_host })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {}", self.preference, self.intermediate_host.to_text(origin))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Rt {
            preference: parse_u16(need(tokens, 0)?)?,
            intermediate_host: Name::from_text(need(tokens, 1)?, origin)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Nsap {
    pub address: Vec<u8>,
}

impl RdataOps for Nsap {
    fn rtype(&self) -> RecordType {
        RecordType::Nsap
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_octets(&self.address);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        Ok(Nsap { address: buf.take(rdlength)?.to_vec() })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        format!("0x{}", hex::encode(&self.address))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        let tok = need(tokens, 0)?.trim_start_matches("0x");
        Ok(Nsap {
            address: hex::decode(tok).map_err(|_| RdataError::BadHex("NSAP address".into()))?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Sig {
    pub type_covered: u16,
    pub algorithm: u8,
    pub labels: u8,
    pub original_ttl: u32,
    pub expiration: u32,
    pub inception: u32,
    pub key_tag: u16,
    pub signer: Name,
    pub signature: Vec<u8>,
}

impl RdataOps for Sig {
    fn rtype(&self) -> RecordType {
        RecordType::Sig
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.type_covered);
        out.write_u8(self.algorithm);
        out.write_u8(self.labels);
        out.write_u32(self.original_ttl);
        out.write_u32(self.expiration);
        out.write_u32(self.inception);
        out.write_u16(self.key_tag);
        self.signer.to_wire(out, None);
        out.write_octets(&self.signature);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let type_covered = buf.next_u16()?;
        let algorithm = buf.next_u8()?;
        let labels = buf.next_u8()?;
        let original_ttl = buf.next_u32()?;
        let expiration = buf.next_u32()?;
        let inception = buf.next_u32()?;
        let key_tag = buf.next_u16()?;
        let signer = Name::from_wire(buf, false)?;
        let consumed = buf.current() - start;
        let signature = buf.take(rdlength.saturating_sub(consumed))?.to_vec();
        Ok(Sig {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer,
            signature,
        })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!(
            "{} {} {} {} {} {} {} {} {}",
            RecordType::from_code(self.type_covered),
            self.algorithm,
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer.to_text(origin),
            super::base64_encode(&self.signature)
        )
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Sig {
            type_covered: RecordType::from_mnemonic(need(tokens, 0)?)
                .ok_or_else(|| RdataError::UnknownMnemonic(tokens[0].to_string()))?
                .code(),
            algorithm: parse_u8(need(tokens, 1)?)?,
            labels: parse_u8(need(tokens, 2)?)?,
            original_ttl: parse_u32(need(tokens, 3)?)?,
            expiration: parse_u32(need(tokens, 4)?)?,
            inception: parse_u32(need(tokens, 5)?)?,
            key_tag: parse_u16(need(tokens, 6)?)?,
            signer: Name::from_text(need(tokens, 7)?, origin)?,
            signature: super::base64_decode(need(tokens, 8)?)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Key {
    pub flags: u16,
    pub protocol: u8,
    pub algorithm: u8,
    pub public_key: Vec<u8>,
}

impl RdataOps for Key {
    fn rtype(&self) -> RecordType {
        RecordType::Key
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.flags);
        out.write_u8(self.protocol);
        out.write_u8(self.algorithm);
        out.write_octets(&self.public_key);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        if rdlength < 4 {
            return Err(RdataError::Truncated(RecordType::Key));
        }
        let flags = buf.next_u16()?;
        let protocol = buf.next_u8()?;
        let algorithm = buf.next_u8()?;
        let public_key = buf.take(rdlength - 4)?.to_vec();
        Ok(Key { flags, protocol, algorithm, public_key })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        format!("{} {} {} {}", self.flags, self.protocol, self.algorithm, super::base64_encode(&self.public_key))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Key {
            flags: parse_u16(need(tokens, 0)?)?,
            protocol: parse_u8(need(tokens, 1)?)?,
            algorithm: parse_u8(need(tokens, 2)?)?,
            public_key: super::base64_decode(need(tokens, 3)?)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Px {
    pub preference: u16,
    pub map822: Name,
    pub mapx400: Name,
}

impl RdataOps for Px {
    fn rtype(&self) -> RecordType {
        RecordType::Px
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.preference);
        self.map822.to_wire(out, None);
        self.mapx400.to_wire(out, None);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let preference = buf.next_u16()?;
        let map822 = Name::from_wire(buf, true)?;
        let mapx400 = Name::from_wire(buf, true)?;
        require_exact(buf, start, rdlength, RecordType::Px)?;
        Ok(Px { preference, map822, mapx400 })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {} {}", self.preference, self.map822.to_text(origin), self.mapx400.to_text(origin))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Px {
            preference: parse_u16(need(tokens, 0)?)?,
            map822: Name::from_text(need(tokens, 1)?, origin)?,
            mapx400: Name::from_text(need(tokens, 2)?, origin)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Gpos {
    pub longitude: Vec<u8>,
    pub latitude: Vec<u8>,
    pub altitude: Vec<u8>,
}

impl RdataOps for Gpos {
    fn rtype(&self) -> RecordType {
        RecordType::Gpos
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        write_character_string(out, &self.longitude);
        write_character_string(out, &self.latitude);
        write_character_string(out, &self.altitude);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let longitude = read_character_string(buf)?;
        let latitude = read_character_string(buf)?;
        let altitude = read_character_string(buf)?;
        require_exact(buf, start, rdlength, RecordType::Gpos)?;
        Ok(Gpos { longitude, latitude, altitude })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        format!(
            "{} {} {}",
            escape_character_string(&self.longitude),
            escape_character_string(&self.latitude),
            escape_character_string(&self.altitude)
        )
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Gpos {
            longitude: unescape_character_string(need(tokens, 0)?)?,
            latitude: unescape_character_string(need(tokens, 1)?)?,
            altitude: unescape_character_string(need(tokens, 2)?)?,
        })
    }
}

/// LOC (RFC 1876). Latitude/longitude/altitude are kept as their raw
/// wire-encoded 32-bit values rather than decoded into degrees/minutes —
/// callers that need human units convert at the presentation boundary.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Loc {
    pub version: u8,
    pub size: u8,
    pub horiz_pre: u8,
    pub vert_pre: u8,
    pub latitude: u32,
    pub longitude: u32,
    pub altitude: u32,
}

impl RdataOps for Loc {
    fn rtype(&self) -> RecordType {
        RecordType::Loc
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u8(self.version);
        out.write_u8(self.size);
        out.write_u8(self.horiz_pre);
        out.write_u8(self.vert_pre);
        out.write_u32(self.latitude);
        out.write_u32(self.longitude);
        out.write_u32(self.altitude);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        if rdlength != 16 {
            return Err(RdataError::Truncated(RecordType::Loc));
        }
        Ok(Loc {
            version: buf.next_u8()?,
            size: buf.next_u8()?,
            horiz_pre: buf.next_u8()?,
            vert_pre: buf.next_u8()?,
            latitude: buf.next_u32()?,
            longitude: buf.next_u32()?,
            altitude: buf.next_u32()?,
        })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.version, self.size, self.horiz_pre, self.vert_pre, self.latitude, self.longitude, self.altitude
        )
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Loc {
            version: parse_u8(need(tokens, 0)?)?,
            size: parse_u8(need(tokens, 1)?)?,
            horiz_pre: parse_u8(need(tokens, 2)?)?,
            vert_pre: parse_u8(need(tokens, 3)?)?,
            latitude: parse_u32(need(tokens, 4)?)?,
            longitude: parse_u32(need(tokens, 5)?)?,
            altitude: parse_u32(need(tokens, 6)?)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Nxt {
    pub next_domain: Name,
    pub type_bitmap: Vec<u8>,
}

impl RdataOps for Nxt {
    fn rtype(&self) -> RecordType {
        RecordType::Nxt
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        self.next_domain.to_wire(out, None);
        out.write_octets(&self.type_bitmap);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let next_domain = Name::from_wire(buf, false)?;
        let consumed = buf.current() - start;
        let type_bitmap = buf.take(rdlength.saturating_sub(consumed))?.to_vec();
        Ok(Nxt { next_domain, type_bitmap })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {}", self.next_domain.to_text(origin), hex::encode(&self.type_bitmap))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Nxt {
            next_domain: Name::from_text(need(tokens, 0)?, origin)?,
            type_bitmap: hex::decode(need(tokens, 1)?).map_err(|_| RdataError::BadHex("NXT type bitmap".into()))?,
        })
    }
}

impl Nxt {
    /// Does this NXT's type bitmap assert the existence of `rtype` at its
    /// owner? Used by the zone DB's closest-NXT denial-of-existence search.
    pub fn covers(&self, rtype: RecordType) -> bool {
        let code = rtype.code() as usize;
        let byte = code / 8;
        let bit = 7 - (code % 8);
        self.type_bitmap.get(byte).map(|b| b & (1 << bit) != 0).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Srv {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: Name,
}

impl RdataOps for Srv {
    fn rtype(&self) -> RecordType {
        RecordType::Srv
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.priority);
        out.write_u16(self.weight);
        out.write_u16(self.port);
        self.target.to_wire(out, None);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let priority = buf.next_u16()?;
        let weight = buf.next_u16()?;
        let port = buf.next_u16()?;
        let target = Name::from_wire(buf, true)?;
        require_exact(buf, start, rdlength, RecordType::Srv)?;
        Ok(Srv { priority, weight, port, target })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {} {} {}", self.priority, self.weight, self.port, self.target.to_text(origin))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Srv {
            priority: parse_u16(need(tokens, 0)?)?,
            weight: parse_u16(need(tokens, 1)?)?,
            port: parse_u16(need(tokens, 2)?)?,
            target: Name::from_text(need(tokens, 3)?, origin)?,
        })
    }
    fn additional_data(&self) -> Vec<(Name, RecordType)> {
        vec![(self.target.clone(), RecordType::A), (self.target.clone(), RecordType::Aaaa)]
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Naptr {
    pub order: u16,
    pub preference: u16,
    pub flags: Vec<u8>,
    pub services: Vec<u8>,
    pub regexp: Vec<u8>,
    pub replacement: Name,
}

impl RdataOps for Naptr {
    fn rtype(&self) -> RecordType {
        RecordType::Naptr
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.order);
        out.write_u16(self.preference);
        write_character_string(out, &self.flags);
        write_character_string(out, &self.services);
        write_character_string(out, &self.regexp);
        self.replacement.to_wire(out, None);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let order = buf.next_u16()?;
        let preference = buf.next_u16()?;
        let flags = read_character_string(buf)?;
        let services = read_character_string(buf)?;
        let regexp = read_character_string(buf)?;
        let replacement = Name::from_wire(buf, false)?;
        require_exact(buf, start, rdlength, RecordType::Naptr)?;
        Ok(Naptr { order, preference, flags, services, regexp, replacement })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.order,
            self.preference,
            escape_character_string(&self.flags),
            escape_character_string(&self.services),
            escape_character_string(&self.regexp),
            self.replacement.to_text(origin)
        )
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Naptr {
            order: parse_u16(need(tokens, 0)?)?,
            preference: parse_u16(need(tokens, 1)?)?,
            flags: unescape_character_string(need(tokens, 2)?)?,
            services: unescape_character_string(need(tokens, 3)?)?,
            regexp: unescape_character_string(need(tokens, 4)?)?,
            replacement: Name::from_text(need(tokens, 5)?, origin)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Kx {
    pub preference: u16,
    pub exchanger: Name,
}

impl RdataOps for Kx {
    fn rtype(&self) -> RecordType {
        RecordType::Kx
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.preference);
        self.exchanger.to_wire(out, None);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let preference = buf.next_u16()?;
        let exchanger = Name::from_wire(buf, true)?;
        require_exact(buf, start, rdlength, RecordType::Kx)?;
        Ok(Kx { preference, exchanger })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!("{} {}", self.preference, self.exchanger.to_text(origin))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Kx {
            preference: parse_u16(need(tokens, 0)?)?,
            exchanger: Name::from_text(need(tokens, 1)?, origin)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Cert {
    pub cert_type: u16,
    pub key_tag: u16,
    pub algorithm: u8,
    pub certificate: Vec<u8>,
}

impl RdataOps for Cert {
    fn rtype(&self) -> RecordType {
        RecordType::Cert
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u16(self.cert_type);
        out.write_u16(self.key_tag);
        out.write_u8(self.algorithm);
        out.write_octets(&self.certificate);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        if rdlength < 5 {
            return Err(RdataError::Truncated(RecordType::Cert));
        }
        let cert_type = buf.next_u16()?;
        let key_tag = buf.next_u16()?;
        let algorithm = buf.next_u8()?;
        let certificate = buf.take(rdlength - 5)?.to_vec();
        Ok(Cert { cert_type, key_tag, algorithm, certificate })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        format!("{} {} {} {}", self.cert_type, self.key_tag, self.algorithm, super::base64_encode(&self.certificate))
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Ok(Cert {
            cert_type: parse_u16(need(tokens, 0)?)?,
            key_tag: parse_u16(need(tokens, 1)?)?,
            algorithm: parse_u8(need(tokens, 2)?)?,
            certificate: super::base64_decode(need(tokens, 3)?)?,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct A6 {
    pub prefix_len: u8,
    pub address_suffix: Vec<u8>,
    pub prefix_name: Name,
}

impl RdataOps for A6 {
    fn rtype(&self) -> RecordType {
        RecordType::A6
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        out.write_u8(self.prefix_len);
        out.write_octets(&self.address_suffix);
        if self.prefix_len > 0 {
            self.prefix_name.to_wire(out, None);
        }
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let prefix_len = buf.next_u8()?;
        let suffix_octets = (128 - prefix_len as usize + 7) / 8;
        let address_suffix = buf.take(suffix_octets)?.to_vec();
        let prefix_name = if prefix_len > 0 {
            Name::from_wire(buf, false)?
        } else {
            Name::root()
        };
        require_exact(buf, start, rdlength, RecordType::A6)?;
        Ok(A6 { prefix_len, address_suffix, prefix_name })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        if self.prefix_len > 0 {
            format!("{} {} {}", self.prefix_len, hex::encode(&self.address_suffix), self.prefix_name.to_text(origin))
        } else {
            format!("{} {}", self.prefix_len, hex::encode(&self.address_suffix))
        }
    }
    fn from_text(_rtype: RecordType, tokens: &[&str], origin: Option<&Name>) -> Result<Self, RdataError> {
        let prefix_len = parse_u8(need(tokens, 0)?)?;
        let address_suffix = hex::decode(need(tokens, 1)?).map_err(|_| RdataError::BadHex("A6 suffix".into()))?;
        let prefix_name = if prefix_len > 0 {
            Name::from_text(need(tokens, 2)?, origin)?
        } else {
            Name::root()
        };
        Ok(A6 { prefix_len, address_suffix, prefix_name })
    }
}

/// EDNS0 OPT pseudo-RR rdata: a sequence of `(option-code, option-data)`
/// pairs. The extended RCODE/version/flags and requestor payload size live
/// in the owning `ResourceRecord`'s class/TTL fields, per spec.md §6 — see
/// `crate::wire::OptRecord`.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Opt {
    pub options: Vec<(u16, Vec<u8>)>,
}

impl RdataOps for Opt {
    fn rtype(&self) -> RecordType {
        RecordType::Opt
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        for (code, data) in &self.options {
            out.write_u16(*code);
            out.write_u16(data.len() as u16);
            out.write_octets(data);
        }
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let mut options = Vec::new();
        while buf.current() - start < rdlength {
            let code = buf.next_u16()?;
            let len = buf.next_u16()? as usize;
            let data = buf.take(len)?.to_vec();
            options.push((code, data));
        }
        require_exact(buf, start, rdlength, RecordType::Opt)?;
        Ok(Opt { options })
    }
    fn to_text(&self, _origin: Option<&Name>) -> String {
        self.options
            .iter()
            .map(|(code, data)| format!("{}:{}", code, hex::encode(data)))
            .collect::<Vec<_>>()
            .join(" ")
    }
    fn from_text(_rtype: RecordType, _tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        // OPT never appears in master-file text; it is synthesized by the
        // server from the EDNS configuration, not parsed from a zone file.
        Ok(Opt::default())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Tkey {
    pub algorithm: Name,
    pub inception: u32,
    pub expiration: u32,
    pub mode: u16,
    pub error: u16,
    pub key_data: Vec<u8>,
    pub other_data: Vec<u8>,
}

impl RdataOps for Tkey {
    fn rtype(&self) -> RecordType {
        RecordType::Tkey
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        self.algorithm.to_wire(out, None);
        out.write_u32(self.inception);
        out.write_u32(self.expiration);
        out.write_u16(self.mode);
        out.write_u16(self.error);
        out.write_u16(self.key_data.len() as u16);
        out.write_octets(&self.key_data);
        out.write_u16(self.other_data.len() as u16);
        out.write_octets(&self.other_data);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let algorithm = Name::from_wire(buf, false)?;
        let inception = buf.next_u32()?;
        let expiration = buf.next_u32()?;
        let mode = buf.next_u16()?;
        let error = buf.next_u16()?;
        let key_len = buf.next_u16()? as usize;
        let key_data = buf.take(key_len)?.to_vec();
        let other_len = buf.next_u16()? as usize;
        let other_data = buf.take(other_len)?.to_vec();
        require_exact(buf, start, rdlength, RecordType::Tkey)?;
        Ok(Tkey { algorithm, inception, expiration, mode, error, key_data, other_data })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!(
            "{} {} {} {} {} {} {}",
            self.algorithm.to_text(origin),
            self.inception,
            self.expiration,
            self.mode,
            self.error,
            hex::encode(&self.key_data),
            hex::encode(&self.other_data)
        )
    }
    fn from_text(_rtype: RecordType, _tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Err(RdataError::Syntax("TKEY is a transaction artefact, not zone-file content".into()))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Tsig {
    pub algorithm: Name,
    pub time_signed: u64,
    pub fudge: u16,
    pub mac: Vec<u8>,
    pub original_id: u16,
    pub error: u16,
    pub other_data: Vec<u8>,
}

impl RdataOps for Tsig {
    fn rtype(&self) -> RecordType {
        RecordType::Tsig
    }
    fn to_wire(&self, out: &mut WriteBuffer, _compressor: Option<&mut NameCompressor>) {
        self.algorithm.to_wire(out, None);
        out.write_u16((self.time_signed >> 32) as u16);
        out.write_u32(self.time_signed as u32);
        out.write_u16(self.fudge);
        out.write_u16(self.mac.len() as u16);
        out.write_octets(&self.mac);
        out.write_u16(self.original_id);
        out.write_u16(self.error);
        out.write_u16(self.other_data.len() as u16);
        out.write_octets(&self.other_data);
    }
    fn from_wire(buf: &mut Buffer, rdlength: usize) -> Result<Self, RdataError> {
        let start = buf.current();
        let algorithm = Name::from_wire(buf, false)?;
        let time_hi = buf.next_u16()? as u64;
        let time_lo = buf.next_u32()? as u64;
        let time_signed = (time_hi << 32) | time_lo;
        let fudge = buf.next_u16()?;
        let mac_len = buf.next_u16()? as usize;
        let mac = buf.take(mac_len)?.to_vec();
        let original_id = buf.next_u16()?;
        let error = buf.next_u16()?;
        let other_len = buf.next_u16()? as usize;
        let other_data = buf.take(other_len)?.to_vec();
        require_exact(buf, start, rdlength, RecordType::Tsig)?;
        Ok(Tsig { algorithm, time_signed, fudge, mac, original_id, error, other_data })
    }
    fn to_text(&self, origin: Option<&Name>) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.algorithm.to_text(origin),
            self.time_signed,
            self.fudge,
            hex::encode(&self.mac),
            self.original_id,
            self.error
        )
    }
    fn from_text(_rtype: RecordType, _tokens: &[&str], _origin: Option<&Name>) -> Result<Self, RdataError> {
        Err(RdataError::Syntax("TSIG is a transaction artefact, not zone-file content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: RdataOps + PartialEq + std::fmt::Debug>(value: T) {
        let mut out = WriteBuffer::new();
        value.to_wire(&mut out, None);
        let octets = out.into_octets();
        let mut buf = Buffer::new(&octets);
        let back = T::from_wire(&mut buf, octets.len()).unwrap();
        assert_eq!(value, back);
    }

    #[test]
    fn a_record_roundtrip_and_text() {
        let a = A { address: Ipv4Addr::new(192, 0, 2, 1) };
        assert_eq!(a.to_text(None), "192.0.2.1");
        roundtrip(a);
    }

    #[test]
    fn aaaa_record_roundtrip() {
        roundtrip(Aaaa { address: "2001:db8::1".parse().unwrap() });
    }

    #[test]
    fn ns_record_additional_data() {
        let ns = Ns { nsdname: Name::from_text("ns1.example.com.", None).unwrap() };
        let additional = ns.additional();
        assert_eq!(additional.len(), 2);
        assert_eq!(additional[0].1, RecordType::A);
    }

    #[test]
    fn soa_roundtrip_and_text() {
        let soa = Soa {
            mname: Name::from_text("ns1.example.com.", None).unwrap(),
            rname: Name::from_text("hostmaster.example.com.", None).unwrap(),
            serial: 2024010100,
            refresh: 3600,
            retry: 900,
            expire: 1209600,
            minimum: 300,
        };
        roundtrip(soa.clone());
        assert!(soa.to_text(None).contains("2024010100"));
    }

    #[test]
    fn txt_multi_string_roundtrip() {
        let txt = Txt { strings: vec![b"hello".to_vec(), b"world".to_vec()] };
        roundtrip(txt);
    }

    #[test]
    fn mx_additional_data() {
        let mx = Mx { preference: 10, exchange: Name::from_text("mail.example.com.", None).unwrap() };
        assert_eq!(mx.additional_data().len(), 2);
    }

    #[test]
    fn srv_text_form() {
        let srv = Srv {
            priority: 0,
            weight: 5,
            port: 5222,
            target: Name::from_text("jabber.example.com.", None).unwrap(),
        };
        assert_eq!(srv.to_text(None), "0 5 5222 jabber.example.com.");
    }

    #[test]
    fn unknown_rdata_comparison_is_lexicographic() {
        let a = Null { octets: vec![1, 2] };
        let b = Null { octets: vec![1, 3] };
        assert_eq!(a.compare_canonical(&b), Ordering::Less);
    }

    #[test]
    fn nxt_covers_bit() {
        // bit for type 1 (A) is the high bit of the first byte.
        let nxt = Nxt { next_domain: Name::root(), type_bitmap: vec![0b1000_0000] };
        assert!(nxt.covers(RecordType::A));
        assert!(!nxt.covers(RecordType::Ns));
    }
}
