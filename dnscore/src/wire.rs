//! The wire message envelope: `Header`, `Question`, `ResourceRecord`, and
//! the `Message` that ties them together, plus EDNS0 OPT pseudo-RR handling.
//!
//! Generalizes the teacher's `src/protocol/wire_types.rs` (a fixed, pre-DNSSEC
//! `RecordTypeWithData` enum over a dozen types) to this crate's full
//! `RecordType`/`RData` sum type, and adds the EDNS0 extended-RCODE/payload-size
//! handling spec.md §6 calls for, which the teacher's message format predates.

use crate::buffer::{Buffer, NameCompressor, WriteBuffer};
use crate::error::{BufferError, NameError, RdataError};
use crate::name::Name;
use crate::rdata::{RData, RecordClass, RecordType};

/// What sort of query/update this message carries. Mirrors the teacher's
/// `Opcode` enum, extended with `Notify`/`Update` (RFC 1996/2136), which the
/// teacher's resolver-only `wire_types.rs` didn't need.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Opcode {
    Query,
    Iquery,
    Status,
    Notify,
    Update,
    Reserved(u8),
}

impl Opcode {
    pub fn from_bits(bits: u8) -> Opcode {
        match bits {
            0 => Opcode::Query,
            1 => Opcode::Iquery,
            2 => Opcode::Status,
            4 => Opcode::Notify,
            5 => Opcode::Update,
            other => Opcode::Reserved(other),
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            Opcode::Query => 0,
            Opcode::Iquery => 1,
            Opcode::Status => 2,
            Opcode::Notify => 4,
            Opcode::Update => 5,
            Opcode::Reserved(bits) => bits,
        }
    }
}

/// A response code. The base header field is only 4 bits (RFC 1035); EDNS0
/// (RFC 6891 §6.1.3) extends it with 8 more bits carried in the OPT RR's TTL
/// field, giving a 12-bit value. `Rcode` always carries the full combined
/// value — [`Header::rcode_low`]/[`OptRecord::rcode_high`] are only the wire
/// split, reassembled by [`Message::rcode`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Rcode {
    NoError,
    FormatError,
    ServerFailure,
    NxDomain,
    NotImplemented,
    Refused,
    YxDomain,
    YxRrset,
    NxRrset,
    NotAuth,
    NotZone,
    BadVers,
    Unknown(u16),
}

impl Rcode {
    pub fn from_code(code: u16) -> Rcode {
        match code {
            0 => Rcode::NoError,
            1 => Rcode::FormatError,
            2 => Rcode::ServerFailure,
            3 => Rcode::NxDomain,
            4 => Rcode::NotImplemented,
            5 => Rcode::Refused,
            6 => Rcode::YxDomain,
            7 => Rcode::YxRrset,
            8 => Rcode::NxRrset,
            9 => Rcode::NotAuth,
            10 => Rcode::NotZone,
            16 => Rcode::BadVers,
            other => Rcode::Unknown(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Rcode::NoError => 0,
            Rcode::FormatError => 1,
            Rcode::ServerFailure => 2,
            Rcode::NxDomain => 3,
            Rcode::NotImplemented => 4,
            Rcode::Refused => 5,
            Rcode::YxDomain => 6,
            Rcode::YxRrset => 7,
            Rcode::NxRrset => 8,
            Rcode::NotAuth => 9,
            Rcode::NotZone => 10,
            Rcode::BadVers => 16,
            Rcode::Unknown(code) => code,
        }
    }

    /// Split into the header's 4 low bits and the OPT TTL's 8 high bits.
    fn split(self) -> (u8, u8) {
        let code = self.code();
        ((code & 0x0F) as u8, (code >> 4) as u8)
    }

    /// Reassemble from the header's low nibble and (if an OPT RR is
    /// present) the extended high byte.
    fn combine(low: u8, high: u8) -> Rcode {
        Rcode::from_code(((high as u16) << 4) | (low as u16))
    }
}

/// The fixed 12-octet message header (RFC 1035 §4.1.1).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Header {
    pub id: u16,
    pub is_response: bool,
    pub opcode: Opcode,
    pub is_authoritative: bool,
    pub is_truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    /// RFC 4035 AD bit: all data in the response was DNSSEC-validated.
    pub authentic_data: bool,
    /// RFC 4035 CD bit: the requestor asked validation to be skipped.
    pub checking_disabled: bool,
    /// The low 4 bits of the (possibly EDNS0-extended) response code.
    pub rcode_low: u8,
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

impl Header {
    pub fn to_wire(&self, out: &mut WriteBuffer) {
        out.write_u16(self.id);
        let mut flags: u16 = 0;
        if self.is_response {
            flags |= 1 << 15;
        }
        flags |= (self.opcode.to_bits() as u16 & 0x0F) << 11;
        if self.is_authoritative {
            flags |= 1 << 10;
        }
        if self.is_truncated {
            flags |= 1 << 9;
        }
        if self.recursion_desired {
            flags |= 1 << 8;
        }
        if self.recursion_available {
            flags |= 1 << 7;
        }
        if self.authentic_data {
            flags |= 1 << 5;
        }
        if self.checking_disabled {
            flags |= 1 << 4;
        }
        flags |= self.rcode_low as u16 & 0x0F;
        out.write_u16(flags);
        out.write_u16(self.qdcount);
        out.write_u16(self.ancount);
        out.write_u16(self.nscount);
        out.write_u16(self.arcount);
    }

    pub fn from_wire(buf: &mut Buffer) -> Result<Header, BufferError> {
        let id = buf.next_u16()?;
        let flags = buf.next_u16()?;
        Ok(Header {
            id,
            is_response: flags & (1 << 15) != 0,
            opcode: Opcode::from_bits(((flags >> 11) & 0x0F) as u8),
            is_authoritative: flags & (1 << 10) != 0,
            is_truncated: flags & (1 << 9) != 0,
            recursion_desired: flags & (1 << 8) != 0,
            recursion_available: flags & (1 << 7) != 0,
            authentic_data: flags & (1 << 5) != 0,
            checking_disabled: flags & (1 << 4) != 0,
            rcode_low: (flags & 0x0F) as u8,
            qdcount: buf.next_u16()?,
            ancount: buf.next_u16()?,
            nscount: buf.next_u16()?,
            arcount: buf.next_u16()?,
        })
    }
}

/// A single question-section entry.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Question {
    pub name: Name,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl Question {
    pub fn to_wire(&self, out: &mut WriteBuffer, compressor: Option<&mut NameCompressor>) {
        self.name.to_wire(out, compressor);
        out.write_u16(self.qtype.code());
        out.write_u16(self.qclass.code());
    }

    pub fn from_wire(buf: &mut Buffer) -> Result<Question, NameError> {
        let name = Name::from_wire(buf, true)?;
        let qtype = RecordType::from_code(buf.next_u16().map_err(|_| NameError::Truncated)?);
        let qclass = RecordClass::from_code(buf.next_u16().map_err(|_| NameError::Truncated)?);
        Ok(Question { name, qtype, qclass })
    }
}

/// One answer/authority/additional-section resource record.
///
/// EDNS0 OPT pseudo-RRs (`rtype == RecordType::Opt`) reuse this same shape
/// but mean something different in every field besides `name`/`rdata`: see
/// [`OptRecord`] for the accessor that interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    pub name: Name,
    pub rtype: RecordType,
    pub rclass: RecordClass,
    pub ttl: u32,
    pub rdata: RData,
}

impl ResourceRecord {
    pub fn to_wire(&self, out: &mut WriteBuffer, mut compressor: Option<&mut NameCompressor>) {
        self.name.to_wire(out, compressor.as_deref_mut());
        out.write_u16(self.rtype.code());
        out.write_u16(self.rclass.code());
        out.write_u32(self.ttl);
        let rdlength_at = out.reserve_u16();
        let before = out.len();
        self.rdata.to_wire(out, compressor);
        let written = out.len() - before;
        out.patch_u16_at(rdlength_at, written as u16);
    }

    pub fn from_wire(buf: &mut Buffer) -> Result<ResourceRecord, RdataError> {
        let name = Name::from_wire(buf, true)?;
        let rtype = RecordType::from_code(buf.next_u16()?);
        let rclass = RecordClass::from_code(buf.next_u16()?);
        let ttl = buf.next_u32()?;
        let rdlength = buf.next_u16()? as usize;
        let rdata = RData::from_wire(rtype, buf, rdlength)?;
        Ok(ResourceRecord { name, rtype, rclass, ttl, rdata })
    }
}

/// Read-side view of an EDNS0 OPT pseudo-RR (RFC 6891 §6.1.2-3): the
/// requestor's UDP payload size and the extended RCODE/version/flags live in
/// the owning `ResourceRecord`'s `rclass`/`ttl` fields rather than in the
/// `Opt` rdata itself, which only carries the option list.
#[derive(Debug, Clone, Copy)]
pub struct OptRecordView {
    pub udp_payload_size: u16,
    pub rcode_high: u8,
    pub version: u8,
    pub dnssec_ok: bool,
}

impl OptRecordView {
    pub fn from_resource_record(rr: &ResourceRecord) -> Option<OptRecordView> {
        if rr.rtype != RecordType::Opt {
            return None;
        }
        Some(OptRecordView {
            udp_payload_size: rr.rclass.code(),
            rcode_high: ((rr.ttl >> 24) & 0xFF) as u8,
            version: ((rr.ttl >> 16) & 0xFF) as u8,
            dnssec_ok: rr.ttl & (1 << 15) != 0,
        })
    }
}

/// Build the `ResourceRecord` that carries an OPT pseudo-RR, from the
/// fields `OptRecordView` exposes on read. The owner name is always root.
pub fn build_opt_record(udp_payload_size: u16, rcode_high: u8, version: u8, dnssec_ok: bool, options: Vec<(u16, Vec<u8>)>) -> ResourceRecord {
    let mut ttl = (rcode_high as u32) << 24 | (version as u32) << 16;
    if dnssec_ok {
        ttl |= 1 << 15;
    }
    ResourceRecord {
        name: Name::root(),
        rtype: RecordType::Opt,
        rclass: RecordClass::Unknown(udp_payload_size),
        ttl,
        rdata: RData::Opt(crate::rdata::records::Opt { options }),
    }
}

/// A complete DNS message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl Message {
    /// The OPT pseudo-RR in the additional section, if one was sent.
    pub fn opt(&self) -> Option<OptRecordView> {
        self.additional.iter().find_map(OptRecordView::from_resource_record)
    }

    /// The full, possibly EDNS0-extended response code.
    pub fn rcode(&self) -> Rcode {
        let high = self.opt().map_or(0, |opt| opt.rcode_high);
        Rcode::combine(self.header.rcode_low, high)
    }

    /// Set `self.header.rcode_low` and, if an OPT RR is present, its
    /// extended high byte, to represent `rcode` as a combined value.
    pub fn set_rcode(&mut self, rcode: Rcode) {
        let (low, high) = rcode.split();
        self.header.rcode_low = low;
        if let Some(opt_rr) = self.additional.iter_mut().find(|rr| rr.rtype == RecordType::Opt) {
            let version = ((opt_rr.ttl >> 16) & 0xFF) as u32;
            let dnssec_ok = opt_rr.ttl & (1 << 15);
            opt_rr.ttl = (high as u32) << 24 | version << 16 | dnssec_ok;
        }
    }

    pub fn to_wire(&self, out: &mut WriteBuffer) {
        self.header.to_wire(out);
        let mut compressor = NameCompressor::new();
        for q in &self.questions {
            q.to_wire(out, Some(&mut compressor));
        }
        for rr in self.answers.iter().chain(&self.authority).chain(&self.additional) {
            rr.to_wire(out, Some(&mut compressor));
        }
    }

    pub fn from_wire(buf: &mut Buffer) -> Result<Message, RdataError> {
        let header = Header::from_wire(buf)?;
        let questions = (0..header.qdcount).map(|_| Question::from_wire(buf)).collect::<Result<Vec<_>, NameError>>()?;
        let answers = (0..header.ancount).map(|_| ResourceRecord::from_wire(buf)).collect::<Result<Vec<_>, RdataError>>()?;
        let authority = (0..header.nscount).map(|_| ResourceRecord::from_wire(buf)).collect::<Result<Vec<_>, RdataError>>()?;
        let additional = (0..header.arcount).map(|_| ResourceRecord::from_wire(buf)).collect::<Result<Vec<_>, RdataError>>()?;
        Ok(Message { header, questions, answers, authority, additional })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::records::A;
    use std::net::Ipv4Addr;

    fn base_header() -> Header {
        Header {
            id: 0x1234,
            is_response: true,
            opcode: Opcode::Query,
            is_authoritative: true,
            is_truncated: false,
            recursion_desired: true,
            recursion_available: true,
            authentic_data: false,
            checking_disabled: false,
            rcode_low: 0,
            qdcount: 1,
            ancount: 1,
            nscount: 0,
            arcount: 0,
        }
    }

    #[test]
    fn header_round_trips_through_wire() {
        let header = base_header();
        let mut out = WriteBuffer::new();
        header.to_wire(&mut out);
        let octets = out.into_octets();
        let mut buf = Buffer::new(&octets);
        let parsed = Header::from_wire(&mut buf).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn message_round_trips_through_wire() {
        let message = Message {
            header: base_header(),
            questions: vec![Question {
                name: Name::from_text("example.com.", None).unwrap(),
                qtype: RecordType::A,
                qclass: RecordClass::In,
            }],
            answers: vec![ResourceRecord {
                name: Name::from_text("example.com.", None).unwrap(),
                rtype: RecordType::A,
                rclass: RecordClass::In,
                ttl: 300,
                rdata: RData::A(A { address: Ipv4Addr::new(192, 0, 2, 1) }),
            }],
            authority: Vec::new(),
            additional: Vec::new(),
        };
        let mut out = WriteBuffer::new();
        message.to_wire(&mut out);
        let octets = out.into_octets();
        let mut buf = Buffer::new(&octets);
        let parsed = Message::from_wire(&mut buf).unwrap();
        assert_eq!(parsed, message);
    }

    #[test]
    fn opt_record_carries_extended_rcode_and_payload_size() {
        let mut message = Message {
            header: base_header(),
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: vec![build_opt_record(4096, 0, 0, true, Vec::new())],
        };
        message.header.arcount = 1;
        message.set_rcode(Rcode::BadVers);
        assert_eq!(message.rcode(), Rcode::BadVers);
        let opt = message.opt().unwrap();
        assert_eq!(opt.udp_payload_size, 4096);
        assert!(opt.dnssec_ok);
    }

    #[test]
    fn rcode_without_opt_stays_in_the_base_four_bits() {
        let mut message = Message {
            header: base_header(),
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        };
        message.set_rcode(Rcode::Refused);
        assert_eq!(message.rcode(), Rcode::Refused);
    }
}
