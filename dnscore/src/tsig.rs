//! TSIG transaction signatures and the keyring they're looked up in.
//!
//! Interface only: `sign`/`verify` are trait methods an outer crypto
//! provider implements (this core never touches a MAC algorithm directly).
//! Grounded on `examples/original_source/lib/dns/include/dns/tsig.h`'s
//! `dns_tsigkey_t`/`dns_tsig_keyring_t` — `generated`/`creator` track
//! TKEY-negotiated keys whose identity for ACL purposes is the creator, not
//! the (often random) key name itself.

use crate::error::TsigError;
use crate::name::Name;
use std::collections::HashMap;
use std::sync::RwLock;

/// A TSIG signing algorithm, named the way the wire form and zone files
/// spell it (a domain name under `SIG-ALG.REG.INT.`).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum TsigAlgorithm {
    HmacMd5,
    HmacSha1,
    HmacSha256,
    Other(Name),
}

/// One TSIG key. Matches `dns_tsigkey_t` field-for-field, including the
/// reference count and `deleted` flag the keyring's removal protocol needs
/// (a key in active use by an in-flight transaction can't be freed out from
/// under it, so `deleted` marks intent and `references` gates the actual
/// drop).
#[derive(Debug, Clone)]
pub struct TsigKey {
    pub name: Name,
    pub algorithm: TsigAlgorithm,
    pub secret: Vec<u8>,
    pub inception: u32,
    pub expire: u32,
    pub generated: bool,
    pub creator: Option<Name>,
    pub references: u32,
    pub deleted: bool,
}

impl TsigKey {
    /// `dns_tsigkey_identity`: the name ACL checks should match against —
    /// the creator for a TKEY-negotiated key, the key's own name otherwise.
    pub fn identity(&self) -> &Name {
        if self.generated {
            self.creator.as_ref().unwrap_or(&self.name)
        } else {
            &self.name
        }
    }

    /// Whether `when` (seconds since the epoch) falls in this key's
    /// validity window. `inception == expire` means "never expires",
    /// matching the header comment on `dns_tsigkey_create`.
    pub fn is_valid_at(&self, when: u32) -> bool {
        if self.inception == self.expire {
            return true;
        }
        when >= self.inception && when < self.expire
    }
}

/// A name-indexed, reference-counted set of keys, matching
/// `dns_tsig_keyring_t`'s shared/exclusive-locked list.
#[derive(Default)]
pub struct Keyring {
    keys: RwLock<HashMap<Name, TsigKey>>,
}

impl Keyring {
    pub fn new() -> Keyring {
        Keyring { keys: RwLock::new(HashMap::new()) }
    }

    pub fn insert(&self, key: TsigKey) {
        self.keys.write().expect("keyring lock poisoned").insert(key.name.clone(), key);
    }

    pub fn find(&self, name: &Name) -> Option<TsigKey> {
        self.keys.read().expect("keyring lock poisoned").get(name).cloned()
    }

    /// Mark a key deleted; it remains findable by in-flight transactions
    /// that already hold a reference, matching `dns_tsigkey_setdeleted`.
    pub fn mark_deleted(&self, name: &Name) {
        if let Some(key) = self.keys.write().expect("keyring lock poisoned").get_mut(name) {
            key.deleted = true;
        }
    }
}

/// The raw bytes a TSIG MAC is computed over: everything that gets signed
/// except the TSIG RR itself, plus whatever the caller's wire envelope
/// already rendered.
pub struct TsigContext<'a> {
    pub message: &'a [u8],
    pub key: &'a TsigKey,
    /// The prior request's TSIG MAC, required when signing/verifying a
    /// response ("querytsig" in spec.md's wording).
    pub request_mac: Option<&'a [u8]>,
}

/// What actually computes and checks MACs. Implemented by an outer crypto
/// provider; this core only calls into it at the sign/verify seams.
pub trait TsigSigner {
    fn sign(&self, ctx: &TsigContext<'_>) -> Result<Vec<u8>, TsigError>;
    fn verify(&self, ctx: &TsigContext<'_>, mac: &[u8]) -> Result<(), TsigError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(generated: bool, creator: Option<Name>) -> TsigKey {
        TsigKey {
            name: Name::from_text("key.example.", None).unwrap(),
            algorithm: TsigAlgorithm::HmacSha256,
            secret: vec![1, 2, 3],
            inception: 0,
            expire: 0,
            generated,
            creator,
            references: 1,
            deleted: false,
        }
    }

    #[test]
    fn identity_uses_creator_when_generated() {
        let creator = Name::from_text("client.example.", None).unwrap();
        let k = key(true, Some(creator.clone()));
        assert_eq!(k.identity(), &creator);
    }

    #[test]
    fn identity_uses_own_name_when_not_generated() {
        let k = key(false, None);
        assert_eq!(k.identity(), &k.name);
    }

    #[test]
    fn inception_equal_expire_never_expires() {
        let k = key(false, None);
        assert!(k.is_valid_at(0));
        assert!(k.is_valid_at(u32::MAX));
    }

    #[test]
    fn keyring_round_trip_and_delete() {
        let ring = Keyring::new();
        let k = key(false, None);
        let name = k.name.clone();
        ring.insert(k);
        assert!(ring.find(&name).is_some());
        ring.mark_deleted(&name);
        assert!(ring.find(&name).unwrap().deleted);
    }
}
