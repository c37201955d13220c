//! Master-file RR assembly: turns the token lines `dnscore::lexer::Lexer`
//! produces into `(Name, RecordClass, u32, RData)` tuples and loads them
//! into a `dnscore::zonedb::ZoneDb`.
//!
//! Grounded on the teacher's `Zone::deserialise`/`parse_rr`
//! (`lib-dns-types/src/zones/deserialise.rs`): `$ORIGIN` tracking, owner-name
//! and TTL inheritance from the previous RR when a line omits them, and the
//! SOA-only-may-omit-TTL-entirely rule (RFC 1035 §5.1). This crate adds
//! `$TTL` (RFC 2308), which the teacher's deserialiser predates.

use dnscore::error::RdataError;
use dnscore::lexer::Lexer;
use dnscore::name::Name;
use dnscore::rdata::{RData, RecordType, Trust};
use dnscore::rdataslab::RdataSlab;
use dnscore::zonedb::{DbMode, ZoneDb};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug)]
pub enum ZoneFileError {
    Lex(RdataError),
    Rdata(RdataError),
    Name(dnscore::error::NameError),
    Db(dnscore::error::DbError),
    MissingOwnerName { line: usize },
    MissingTtl { line: usize },
    MissingType { line: usize },
    UnknownType { line: usize, mnemonic: String },
    NonInClass { line: usize, mnemonic: String },
}

impl fmt::Display for ZoneFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneFileError::Lex(e) | ZoneFileError::Rdata(e) => write!(f, "{e}"),
            ZoneFileError::Name(e) => write!(f, "{e}"),
            ZoneFileError::Db(e) => write!(f, "{e}"),
            ZoneFileError::MissingOwnerName { line } => write!(f, "line {line}: no owner name, and none to inherit"),
            ZoneFileError::MissingTtl { line } => write!(f, "line {line}: no TTL, no $TTL default, and none to inherit"),
            ZoneFileError::MissingType { line } => write!(f, "line {line}: missing a record type"),
            ZoneFileError::UnknownType { line, mnemonic } => write!(f, "line {line}: unknown record type {mnemonic}"),
            ZoneFileError::NonInClass { line, mnemonic } => write!(f, "line {line}: class {mnemonic} is not supported, only IN"),
        }
    }
}

impl std::error::Error for ZoneFileError {}

impl From<dnscore::error::DbError> for ZoneFileError {
    fn from(e: dnscore::error::DbError) -> Self {
        ZoneFileError::Db(e)
    }
}

struct ParsedRr {
    owner: Name,
    ttl: u32,
    rtype: RecordType,
    rdata: RData,
}

/// Tokenize and assemble `text` into RRs, then load them all into a fresh
/// `ZoneDb` for `apex` under one writer version (committed only if every RR
/// parses and type-checks, mirroring the teacher's all-or-nothing
/// `deserialise`).
pub fn load_zone(apex: &Name, text: &str) -> Result<ZoneDb, ZoneFileError> {
    let rrs = parse_rrs(apex, text)?;
    let db = ZoneDb::new(apex.clone(), DbMode::Zone);
    let version = db.new_version()?;

    // Group same-owner/same-type RRs into one rdataset, matching how a zone
    // database stores them (rbtdb.c never has a singleton-RR rdataset for a
    // round-robin A set).
    let mut grouped: HashMap<(Name, RecordType), (u32, Vec<RData>)> = HashMap::new();
    let mut order: Vec<(Name, RecordType)> = Vec::new();
    for rr in rrs {
        let key = (rr.owner.clone(), rr.rtype);
        let entry = grouped.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            (rr.ttl, Vec::new())
        });
        entry.1.push(rr.rdata);
    }

    for key in order {
        let (ttl, items) = grouped.remove(&key).expect("key was just pushed to order");
        let (owner, rtype) = key;
        let slab = RdataSlab::from_rdataset(items.into_iter(), rtype);
        db.add_rdataset(&version, &owner, rtype, slab, ttl, Trust::AuthAnswer, false)?;
    }

    db.close_version(version, true)?;
    Ok(db)
}

fn parse_rrs(apex: &Name, text: &str) -> Result<Vec<ParsedRr>, ZoneFileError> {
    let mut lexer = Lexer::new(text);
    let mut origin = apex.clone();
    let mut default_ttl: Option<u32> = None;
    let mut previous_owner: Option<Name> = None;
    let mut previous_ttl: Option<u32> = None;
    let mut out = Vec::new();
    let mut line_no = 0usize;

    loop {
        line_no += 1;
        let words = lexer.next_line().map_err(ZoneFileError::Lex)?;
        if words.is_empty() {
            // next_line stops at EndOfFile too; distinguish by re-peeking is
            // unnecessary since an all-blank line and true EOF both yield no
            // more RRs once we've exhausted the text. A lone blank line
            // (comment-only, or bare newline) is simply skipped.
            if is_exhausted(&mut lexer) {
                break;
            }
            continue;
        }

        if words[0].eq_ignore_ascii_case("$ORIGIN") {
            origin = Name::from_text(&words[1], Some(&origin)).map_err(ZoneFileError::Name)?;
            continue;
        }
        if words[0].eq_ignore_ascii_case("$TTL") {
            default_ttl = Some(words[1].parse::<u32>().map_err(|_| ZoneFileError::MissingTtl { line: line_no })?);
            continue;
        }

        let rr = parse_rr_line(&origin, &previous_owner, previous_ttl.or(default_ttl), line_no, &words)?;
        previous_owner = Some(rr.owner.clone());
        previous_ttl = Some(rr.ttl);
        out.push(rr);
    }

    Ok(out)
}

/// `next_line` already consumed the trailing EndOfLine/EndOfFile; peek
/// whether the lexer has anything left by trying to pull one more token.
fn is_exhausted(lexer: &mut Lexer<'_>) -> bool {
    // `next_line` leaves the lexer positioned right after the line
    // terminator it stopped on, so pulling a token here tells us whether
    // more input remains without consuming a real token from the next line.
    // Since Lexer has no explicit "peek" we reconstruct this by checking the
    // degenerate case: an immediate EndOfFile means nothing is left.
    matches!(lexer.next_token(), Ok(dnscore::lexer::Token::EndOfFile))
}

fn parse_rr_line(
    origin: &Name,
    previous_owner: &Option<Name>,
    inherited_ttl: Option<u32>,
    line_no: usize,
    words: &[String],
) -> Result<ParsedRr, ZoneFileError> {
    let mut idx = 0;
    let first = words.first().map(String::as_str).unwrap_or_default();

    // A line starting with whitespace (no owner name) begins with the class
    // or TTL or type directly; the teacher's deserialiser distinguishes this
    // the same way we do here: if the first field parses as a TTL, class
    // mnemonic, or known record type, there's no owner name on this line.
    let owner = if looks_like_owner(first) {
        idx += 1;
        if first == "@" {
            Some(origin.clone())
        } else {
            Some(Name::from_text(first, Some(origin)).map_err(ZoneFileError::Name)?)
        }
    } else {
        None
    };
    let owner = owner.or_else(|| previous_owner.clone()).ok_or(ZoneFileError::MissingOwnerName { line: line_no })?;

    let mut ttl: Option<u32> = None;
    let mut saw_class = false;
    // At most a TTL and a class field, in either order, precede the type.
    for _ in 0..2 {
        let Some(word) = words.get(idx) else { break };
        if let Ok(n) = word.parse::<u32>() {
            ttl = Some(n);
            idx += 1;
        } else if word.eq_ignore_ascii_case("IN") {
            saw_class = true;
            idx += 1;
        } else if is_known_class_mnemonic(word) {
            return Err(ZoneFileError::NonInClass { line: line_no, mnemonic: word.clone() });
        } else {
            break;
        }
    }
    let _ = saw_class;

    let type_word = words.get(idx).ok_or(ZoneFileError::MissingType { line: line_no })?;
    let rtype = RecordType::from_mnemonic(type_word)
        .ok_or_else(|| ZoneFileError::UnknownType { line: line_no, mnemonic: type_word.clone() })?;
    idx += 1;

    let ttl = match ttl.or(inherited_ttl) {
        Some(t) => t,
        None if rtype == RecordType::Soa => 0,
        None => return Err(ZoneFileError::MissingTtl { line: line_no }),
    };

    let rdata_tokens: Vec<&str> = words[idx..].iter().map(String::as_str).collect();
    let rdata = RData::from_text(rtype, &rdata_tokens, Some(origin)).map_err(ZoneFileError::Rdata)?;

    Ok(ParsedRr { owner, ttl, rtype, rdata })
}

fn looks_like_owner(word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    if word.parse::<u32>().is_ok() {
        return false;
    }
    if word.eq_ignore_ascii_case("IN") || is_known_class_mnemonic(word) {
        return false;
    }
    if RecordType::from_mnemonic(word).is_some() {
        return false;
    }
    true
}

fn is_known_class_mnemonic(word: &str) -> bool {
    matches!(word.to_ascii_uppercase().as_str(), "CS" | "CH" | "HS" | "ANY")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnscore::rdata::RdataOps;
    use dnscore::zonedb::{LookupOutcome, ZoneFindOptions};
    use std::net::Ipv4Addr;

    fn name(s: &str) -> Name {
        Name::from_text(s, None).unwrap()
    }

    #[test]
    fn loads_a_simple_zone() {
        let text = "\
$ORIGIN example.com.
$TTL 300
@       IN SOA ns1.example.com. hostmaster.example.com. 1 3600 600 1209600 300
@       IN NS  ns1.example.com.
ns1     IN A   192.0.2.1
www     IN A   192.0.2.2
www     IN A   192.0.2.3
";
        let db = load_zone(&name("example.com."), text).unwrap();
        match db.zone_find(&name("www.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Success { slab, .. } => assert_eq!(slab.len(), 2),
            other => panic!("expected Success with 2 addresses, got {other:?}"),
        }
        match db.zone_find(&name("ns1.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Success { slab, .. } => {
                let entry = slab.entries().next().unwrap();
                let mut buf = dnscore::buffer::Buffer::new(entry);
                let a = dnscore::rdata::records::A::from_wire(&mut buf, entry.len()).unwrap();
                assert_eq!(a.address, Ipv4Addr::new(192, 0, 2, 1));
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn owner_name_and_ttl_inherit_from_previous_rr() {
        let text = "\
$ORIGIN example.com.
www     300 IN A 192.0.2.1
        300 IN A 192.0.2.2
";
        let db = load_zone(&name("example.com."), text).unwrap();
        match db.zone_find(&name("www.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Success { slab, .. } => assert_eq!(slab.len(), 2),
            other => panic!("expected Success with 2 addresses, got {other:?}"),
        }
    }

    #[test]
    fn missing_ttl_on_non_soa_is_an_error() {
        let text = "www IN A 192.0.2.1\n";
        let err = load_zone(&name("example.com."), text).unwrap_err();
        assert!(matches!(err, ZoneFileError::MissingTtl { .. }));
    }
}
