//! Access-control lists: ordered match lists over requestor address and TSIG
//! signer name.
//!
//! Grounded on `examples/original_source/lib/dns/acl.c`'s `dns_acl_match`:
//! elements are tried in order, the first matching element wins, and its
//! 1-based position is returned signed by that element's `negative` flag (a
//! negative return means "explicitly denied by this ACL", not "no match" —
//! callers distinguish the two).

use crate::name::Name;
use std::net::IpAddr;
use std::sync::Arc;

/// One entry in an [`Acl`]'s ordered match list.
#[derive(Debug, Clone)]
pub struct AclElement {
    pub negative: bool,
    pub kind: AclElementKind,
}

#[derive(Debug, Clone)]
pub enum AclElementKind {
    IpPrefix { address: IpAddr, prefix_len: u8 },
    KeyName(Name),
    Nested(Arc<Acl>),
    LocalHost,
    LocalNets,
    Any,
}

/// An ordered, signed match list, e.g. `{ 192.0.2.0/24; !10.0.0.0/8; any; }`.
#[derive(Debug, Clone, Default)]
pub struct Acl {
    pub elements: Vec<AclElement>,
}

impl Acl {
    pub fn new(elements: Vec<AclElement>) -> Acl {
        Acl { elements }
    }

    /// `any;` — matches every requestor.
    pub fn any() -> Acl {
        Acl { elements: vec![AclElement { negative: false, kind: AclElementKind::Any }] }
    }

    /// `none;` — matches nothing (an `any` element negated).
    pub fn none() -> Acl {
        Acl { elements: vec![AclElement { negative: true, kind: AclElementKind::Any }] }
    }
}

/// The environment `localhost`/`localnets` ACL elements resolve against.
#[derive(Debug, Clone, Default)]
pub struct AclEnv {
    pub localhost: Acl,
    pub localnets: Acl,
}

fn address_matches(addr: &IpAddr, prefix_addr: &IpAddr, prefix_len: u8) -> bool {
    match (addr, prefix_addr) {
        (IpAddr::V4(a), IpAddr::V4(p)) => {
            let mask = if prefix_len == 0 { 0 } else { u32::MAX << (32 - prefix_len.min(32)) };
            (u32::from_be_bytes(a.octets()) & mask) == (u32::from_be_bytes(p.octets()) & mask)
        }
        (IpAddr::V6(a), IpAddr::V6(p)) => {
            let mask = if prefix_len == 0 { 0u128 } else { u128::MAX << (128 - prefix_len.min(128)) };
            (u128::from_be_bytes(a.octets()) & mask) == (u128::from_be_bytes(p.octets()) & mask)
        }
        _ => false,
    }
}

/// Try to match `addr`/`signer` against `acl`. Returns the signed 1-based
/// index of the first matching element (negative if that element is a
/// `!`-negated one), or `0` if nothing in the list matches.
///
/// A nested ACL (explicit `Nested`, or `localhost`/`localnets` resolved
/// through `env`) that itself produces a *negative* indirect match is
/// treated as "no match" at this level — this is `acl.c`'s double-negation
/// guard, so a negated indirect ACL can never surface as a surprise
/// positive match one level up.
pub fn match_acl(addr: IpAddr, signer: Option<&Name>, acl: &Acl, env: &AclEnv) -> i32 {
    for (i, element) in acl.elements.iter().enumerate() {
        let position = (i + 1) as i32;
        let matched = match &element.kind {
            AclElementKind::IpPrefix { address, prefix_len } => address_matches(&addr, address, *prefix_len),
            AclElementKind::KeyName(name) => signer.map_or(false, |s| s == name),
            AclElementKind::Any => true,
            AclElementKind::Nested(inner) => {
                let indirect = match_acl(addr, signer, inner, env);
                indirect > 0
            }
            AclElementKind::LocalHost => {
                let indirect = match_acl(addr, signer, &env.localhost, env);
                indirect > 0
            }
            AclElementKind::LocalNets => {
                let indirect = match_acl(addr, signer, &env.localnets, env);
                indirect > 0
            }
        };
        if matched {
            return if element.negative { -position } else { position };
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn first_matching_element_wins() {
        let acl = Acl::new(vec![
            AclElement { negative: true, kind: AclElementKind::IpPrefix { address: v4("10.0.0.0"), prefix_len: 8 } },
            AclElement { negative: false, kind: AclElementKind::Any },
        ]);
        let env = AclEnv::default();
        assert_eq!(match_acl(v4("10.1.2.3"), None, &acl, &env), -1);
        assert_eq!(match_acl(v4("192.0.2.1"), None, &acl, &env), 2);
    }

    #[test]
    fn no_match_returns_zero() {
        let acl = Acl::new(vec![AclElement {
            negative: false,
            kind: AclElementKind::IpPrefix { address: v4("192.0.2.0"), prefix_len: 24 },
        }]);
        assert_eq!(match_acl(v4("203.0.113.1"), None, &acl, &AclEnv::default()), 0);
    }

    #[test]
    fn key_name_match() {
        let key = Name::from_text("key.example.", None).unwrap();
        let acl = Acl::new(vec![AclElement { negative: false, kind: AclElementKind::KeyName(key.clone()) }]);
        assert_eq!(match_acl(v4("0.0.0.0"), Some(&key), &acl, &AclEnv::default()), 1);
        assert_eq!(match_acl(v4("0.0.0.0"), None, &acl, &AclEnv::default()), 0);
    }

    #[test]
    fn negative_indirect_match_is_not_a_match() {
        // A nested ACL that only contains a `!any` rule always resolves
        // negative internally; from the outer list's point of view that is
        // "no match", not a surprise positive.
        let inner = Arc::new(Acl::none());
        let outer = Acl::new(vec![
            AclElement { negative: false, kind: AclElementKind::Nested(inner) },
            AclElement { negative: false, kind: AclElementKind::Any },
        ]);
        assert_eq!(match_acl(v4("192.0.2.1"), None, &outer, &AclEnv::default()), 2);
    }

    #[test]
    fn localhost_resolves_through_env() {
        let env = AclEnv {
            localhost: Acl::new(vec![AclElement {
                negative: false,
                kind: AclElementKind::IpPrefix { address: v4("127.0.0.1"), prefix_len: 32 },
            }]),
            localnets: Acl::default(),
        };
        let acl = Acl::new(vec![AclElement { negative: false, kind: AclElementKind::LocalHost }]);
        assert_eq!(match_acl(v4("127.0.0.1"), None, &acl, &env), 1);
        assert_eq!(match_acl(v4("8.8.8.8"), None, &acl, &env), 0);
    }
}
