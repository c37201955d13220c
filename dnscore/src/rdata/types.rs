//! Record type and class codes, and the trust ordering used by the zone
//! database when deciding whether a new rdataset may supersede an existing
//! one (see `examples/original_source/lib/dns/rbtdb.c`'s `dns_trust_t` use).

use std::fmt;

macro_rules! record_type {
    ($($variant:ident = $value:expr => $mnemonic:expr),+ $(,)?) => {
        /// A DNS RR type, covering every type spec.md's rdata codec names
        /// plus the query-only meta-types `ANY`/`AXFR` (which can only ever
        /// appear in the question section, never carry an `RData`).
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub enum RecordType {
            $($variant,)+
            Unknown(u16),
        }

        impl RecordType {
            pub fn from_code(code: u16) -> RecordType {
                match code {
                    $($value => RecordType::$variant,)+
                    other => RecordType::Unknown(other),
                }
            }

            pub fn code(self) -> u16 {
                match self {
                    $(RecordType::$variant => $value,)+
                    RecordType::Unknown(code) => code,
                }
            }

            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(RecordType::$variant => $mnemonic,)+
                    RecordType::Unknown(_) => "UNKNOWN",
                }
            }

            pub fn from_mnemonic(text: &str) -> Option<RecordType> {
                let upper = text.to_ascii_uppercase();
                match upper.as_str() {
                    $($mnemonic => Some(RecordType::$variant),)+
                    _ => {
                        if let Some(rest) = upper.strip_prefix("TYPE") {
                            rest.parse::<u16>().ok().map(RecordType::Unknown)
                        } else {
                            None
                        }
                    }
                }
            }
        }
    };
}

record_type! {
    A = 1 => "A",
    Ns = 2 => "NS",
    Md = 3 => "MD",
    Mf = 4 => "MF",
    Cname = 5 => "CNAME",
    Soa = 6 => "SOA",
    Mb = 7 => "MB",
    Mg = 8 => "MG",
    Mr = 9 => "MR",
    Null = 10 => "NULL",
    Wks = 11 => "WKS",
    Ptr = 12 => "PTR",
    Hinfo = 13 => "HINFO",
    Minfo = 14 => "MINFO",
    Mx = 15 => "MX",
    Txt = 16 => "TXT",
    Rp = 17 => "RP",
    Afsdb = 18 => "AFSDB",
    X25 = 19 => "X25",
    Isdn = 20 => "ISDN",
    Rt = 21 => "RT",
    Nsap = 22 => "NSAP",
    NsapPtr = 23 => "NSAP-PTR",
    Sig = 24 => "SIG",
    Key = 25 => "KEY",
    Px = 26 => "PX",
    Gpos = 27 => "GPOS",
    Aaaa = 28 => "AAAA",
    Loc = 29 => "LOC",
    Nxt = 30 => "NXT",
    Srv = 33 => "SRV",
    Naptr = 35 => "NAPTR",
    Kx = 36 => "KX",
    Cert = 37 => "CERT",
    A6 = 38 => "A6",
    Dname = 39 => "DNAME",
    Opt = 41 => "OPT",
    Tkey = 249 => "TKEY",
    Tsig = 250 => "TSIG",
    Axfr = 252 => "AXFR",
    Any = 255 => "ANY",
}

impl RecordType {
    /// Types whose records are DNSSEC signing artefacts, per spec.md's
    /// tagging of SIG/NXT/KEY.
    pub fn is_dnssec(self) -> bool {
        matches!(self, RecordType::Sig | RecordType::Key | RecordType::Nxt)
    }

    /// Meta-types that never live in a zone's stored rdataset (OPT is a
    /// pseudo-RR, TKEY/TSIG are transaction artefacts, ANY/AXFR are
    /// query-only qtypes).
    pub fn is_meta(self) -> bool {
        matches!(
            self,
            RecordType::Opt | RecordType::Tkey | RecordType::Tsig | RecordType::Any | RecordType::Axfr
        )
    }

    /// Can this type be queried for (i.e. is it legal in the question
    /// section)? Everything except the handful of signing-transaction-only
    /// pseudo types.
    pub fn is_valid_qtype(self) -> bool {
        !matches!(self, RecordType::Opt | RecordType::Tkey | RecordType::Tsig)
    }

    /// Names embedded in this type's rdata that are compression-eligible on
    /// emission (spec.md §4.3's list: NS, CNAME, SOA, MB, MG, MR, PTR, NXT).
    pub fn compresses_embedded_names(self) -> bool {
        matches!(
            self,
            RecordType::Ns
                | RecordType::Cname
                | RecordType::Soa
                | RecordType::Mb
                | RecordType::Mg
                | RecordType::Mr
                | RecordType::Ptr
                | RecordType::Nxt
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Unknown(code) => write!(f, "TYPE{code}"),
            other => write!(f, "{}", other.mnemonic()),
        }
    }
}

/// A DNS RR class. Only `IN` carries typed rdata in this crate; other
/// classes round-trip as opaque octets via `RData::Unknown`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RecordClass {
    In,
    Cs,
    Ch,
    Hs,
    Any,
    Unknown(u16),
}

impl RecordClass {
    pub fn from_code(code: u16) -> RecordClass {
        match code {
            1 => RecordClass::In,
            2 => RecordClass::Cs,
            3 => RecordClass::Ch,
            4 => RecordClass::Hs,
            255 => RecordClass::Any,
            other => RecordClass::Unknown(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            RecordClass::In => 1,
            RecordClass::Cs => 2,
            RecordClass::Ch => 3,
            RecordClass::Hs => 4,
            RecordClass::Any => 255,
            RecordClass::Unknown(code) => code,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            RecordClass::In => "IN",
            RecordClass::Cs => "CS",
            RecordClass::Ch => "CH",
            RecordClass::Hs => "HS",
            RecordClass::Any => "ANY",
            RecordClass::Unknown(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordClass::Unknown(code) => write!(f, "CLASS{code}"),
            other => write!(f, "{}", other.mnemonic()),
        }
    }
}

/// How much a rdataset is to be trusted relative to another candidate for
/// the same owner/type, used by `add_rdataset`'s NXDOMAIN-monopoly and
/// supersession rules. Ordered least to most trusted, matching BIND9's
/// `dns_trust_t`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Trust {
    Glue,
    PendingAdditional,
    PendingAnswer,
    Additional,
    Answer,
    AuthAnswer,
    Secure,
    Ultimate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_codes() {
        for rt in [
            RecordType::A,
            RecordType::Ns,
            RecordType::Soa,
            RecordType::Txt,
            RecordType::Aaaa,
            RecordType::Srv,
            RecordType::Dname,
        ] {
            assert_eq!(RecordType::from_code(rt.code()), rt);
        }
    }

    #[test]
    fn unknown_type_round_trips() {
        let rt = RecordType::from_code(999);
        assert_eq!(rt, RecordType::Unknown(999));
        assert_eq!(rt.code(), 999);
    }

    #[test]
    fn mnemonic_parses_back() {
        assert_eq!(RecordType::from_mnemonic("aaaa"), Some(RecordType::Aaaa));
        assert_eq!(RecordType::from_mnemonic("TYPE999"), Some(RecordType::Unknown(999)));
        assert_eq!(RecordType::from_mnemonic("NOTATYPE"), None);
    }

    #[test]
    fn trust_orders_glue_below_secure() {
        assert!(Trust::Glue < Trust::Secure);
        assert!(Trust::AuthAnswer < Trust::Ultimate);
    }
}
