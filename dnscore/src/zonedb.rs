//! The zone/cache database core: MVCC-versioned rdataset storage over the
//! name tree, plus the `zone_find`/`cache_find` lookup algorithms.
//!
//! Grounded throughout on `examples/original_source/lib/dns/rbtdb.c`: lock
//! order (tree lock, then a node lock, then the version-list mutex), the
//! `IGNORE`-bit rollback scheme in `closeversion`/`rollback_node`, the
//! NXDOMAIN-monopoly and trust-ordering rules in `add()`, and the
//! delegation/wildcard/CNAME walk in `zone_find`. Locking uses
//! `std::sync::{RwLock,Mutex}` rather than the teacher's `tokio::sync`
//! primitives: this core has no I/O of its own and must be callable from
//! arbitrary synchronous threads, per spec.md §5's "parallel threads with
//! explicit shared-memory synchronization" concurrency model.

use crate::error::DbError;
use crate::name::Name;
use crate::rbt::{Chain, FindCallbackResult, FindOptions, FindResult, NodeId, Rbt};
use crate::rdata::records::{Cname, Dname, Ns, Nxt, Sig};
use crate::rdata::{RData, RecordType, Trust};
use crate::rdataslab::RdataSlab;
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use tracing::{debug, instrument, trace};

/// Matches BIND9's `DEFAULT_NODE_LOCK_COUNT`: the number of disjoint buckets
/// node data is striped across, each guarded by its own mutex.
pub const DEFAULT_NODE_LOCK_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DbMode {
    Zone,
    Cache,
}

/// A minimal `bitflags!`-alike, written out by hand since this crate doesn't
/// otherwise depend on the `bitflags` crate for a single four-bit set.
macro_rules! bitflags_like {
    (struct $name:ident: $repr:ty { $(const $variant:ident = $value:expr;)+ }) => {
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
        struct $name($repr);
        impl $name {
            $(const $variant: $name = $name($value);)+
            fn empty() -> Self { $name(0) }
            fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }
            fn insert(&mut self, other: Self) { self.0 |= other.0; }
        }
        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self { $name(self.0 | rhs.0) }
        }
    };
}

bitflags_like! {
    /// `rdatasetheader_t.attributes` in rbtdb.c, restated as a small bitset.
    struct HeaderAttrs: u8 {
        const NONEXISTENT = 0b0001;
        const STALE       = 0b0010;
        const IGNORE      = 0b0100;
        const RETAIN      = 0b1000;
    }
}

/// One serial-stamped version of a single type's rdataset at a node. Forms a
/// `down` chain of prior versions, exactly mirroring `rdatasetheader_t`.
#[derive(Debug, Clone)]
struct Header {
    rtype: RecordType,
    serial: u32,
    ttl: u32,
    trust: Trust,
    attrs: HeaderAttrs,
    /// `None` when this header is a `NONEXISTENT` tombstone (a deletion
    /// recorded so older readers still see the prior value via `down`).
    slab: Option<RdataSlab>,
    down: Option<Box<Header>>,
}

impl Header {
    fn exists(&self) -> bool {
        !self.attrs.contains(HeaderAttrs::NONEXISTENT) && !self.attrs.contains(HeaderAttrs::IGNORE)
    }
}

/// Everything attached to one name: its per-type header chains, plus the
/// cache-mode negative-answer marker.
#[derive(Debug, Clone, Default)]
struct NodeData {
    /// One chain head per `RecordType` ever stored here.
    headers: HashMap<RecordType, Header>,
    /// Cache-mode NXDOMAIN marker: `(serial, ttl, trust)`.
    negative: Option<(u32, u32, Trust)>,
}

impl NodeData {
    /// The header a reader pinned at `serial` should see for `rtype`: the
    /// newest entry in the chain (head, then `down`) with `serial <= serial`
    /// that isn't `IGNORE`d, matching rbtdb.c's `SERIAL (header) <=
    /// serial` walk in the per-type find loop. `serial = None` means "no
    /// version filtering" — used for cache-mode lookups, which have no
    /// reader snapshots, and for the writer's own view of its not-yet-
    /// committed change while building it.
    fn visible_header(&self, rtype: RecordType, serial: Option<u32>) -> Option<&Header> {
        let mut cur = self.headers.get(&rtype);
        while let Some(h) = cur {
            let in_snapshot = serial.map_or(true, |s| h.serial <= s);
            if in_snapshot && !h.attrs.contains(HeaderAttrs::IGNORE) {
                return Some(h);
            }
            cur = h.down.as_deref();
        }
        None
    }
}

/// A single open MVCC version, matching `rbtdb_version_t`.
#[derive(Debug)]
struct Version {
    serial: u32,
    writer: bool,
    references: u32,
    changed_list: Vec<NodeId>,
}

#[derive(Debug)]
struct VersionList {
    current_serial: u32,
    least_serial: u32,
    next_serial: u32,
    open: Vec<Version>,
    writer_open: bool,
}

impl VersionList {
    fn new() -> VersionList {
        VersionList {
            current_serial: 1,
            least_serial: 1,
            next_serial: 2,
            open: vec![Version { serial: 1, writer: false, references: 1, changed_list: Vec::new() }],
            writer_open: false,
        }
    }
}

/// A handle to an open writer version, returned by [`ZoneDb::new_version`].
/// Must be passed to [`ZoneDb::close_version`] exactly once.
#[derive(Debug)]
pub struct WriteVersion {
    serial: u32,
}

/// A read snapshot: queries made with this handle see exactly the data
/// committed as of its serial, regardless of what writers do afterward.
#[derive(Debug, Clone, Copy)]
pub struct ReadVersion {
    serial: u32,
}

impl ReadVersion {
    pub fn serial(&self) -> u32 {
        self.serial
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AddOutcome {
    Added,
    Replaced,
    Unchanged,
}

/// `zone_find`'s input options (§4.6.5): `GLUEOK` permits a find to succeed
/// underneath a zone cut instead of being short-circuited to `Delegation`;
/// `VALIDATEGLUE` additionally requires the found name to actually be one of
/// the zonecut's own NS targets; `NOWILD` disables wildcard synthesis;
/// `NOEXACT` asks for the deepest proper ancestor even when `qname` itself
/// has an exact match, mirroring `crate::rbt::FindOptions`'s same-named idea
/// one level up.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ZoneFindOptions {
    pub glueok: bool,
    pub validateglue: bool,
    pub nowild: bool,
    pub noexact: bool,
}

/// An NXT + (optional) covering SIG bound into a secure zone's negative
/// answer, per §4.6.5 steps 3c/4 and §4.6.7.
#[derive(Debug, Clone)]
pub struct NxtDenial {
    pub owner: Name,
    pub rdataset: RdataSlab,
    pub sigrdataset: Option<RdataSlab>,
}

/// The answer to a `zone_find`/`cache_find` lookup. Not an error: a negative
/// result like `Nxdomain` is a meaningful DNS answer, per spec.md §7's
/// errors-vs-outcomes distinction (see `crate::error`'s module doc comment).
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Success { rtype: RecordType, slab: RdataSlab, ttl: u32 },
    WildcardSuccess { synthesized_owner: Name, rtype: RecordType, slab: RdataSlab, ttl: u32 },
    Cname { target: Name, ttl: u32 },
    Dname { target: Name, ttl: u32 },
    Delegation { zonecut: Name, ns: RdataSlab, ttl: u32 },
    /// An answer found underneath a zone cut, returned instead of
    /// `Delegation` because the caller passed `GLUEOK` (§4.6.5 step 5).
    Glue { zonecut: Name, rtype: RecordType, slab: RdataSlab, ttl: u32 },
    Nxdomain { denial: Option<NxtDenial> },
    Nxrrset { denial: Option<NxtDenial> },
    /// A cache-mode negative-answer marker recovered with its remaining TTL
    /// (rbtdb.c's `NXDOMAIN`-with-`rdataset.ttl` case in `cache_find`):
    /// distinct from plain [`LookupOutcome::Nxdomain`] so a resolver can
    /// honor the cached TTL instead of re-querying immediately.
    NegativeCache { ttl: u32 },
}

/// What kind of cut a delegation node is: a live DNAME dominates a live NS
/// at the same owner, so `cut_at` only ever returns one of the two.
#[derive(Debug, Clone)]
enum CutKind {
    Ns(RdataSlab, u32),
    Dname(Dname, u32),
}

/// Is `name` one of `ns_slab`'s NS targets? Used by `VALIDATEGLUE` (§4.6.5
/// step 5) to reject glue for a name the zonecut's own NS rrset doesn't
/// actually delegate to.
fn ns_slab_references(ns_slab: &RdataSlab, name: &Name) -> bool {
    ns_slab.entries().any(|entry| {
        let mut buf = crate::buffer::Buffer::new(entry);
        match Ns::from_wire(&mut buf, entry.len()) {
            Ok(ns) => &ns.nsdname == name,
            Err(_) => false,
        }
    })
}

pub struct ZoneDb {
    origin: Name,
    mode: DbMode,
    tree: RwLock<Rbt>,
    node_locks: Vec<Mutex<HashMap<NodeId, NodeData>>>,
    versions: Mutex<VersionList>,
    /// Set once an NXT rdataset is ever stored at the zone apex (§3's Zone
    /// DB `secure` flag). Gates the NXT-denial path in `zone_find`: only a
    /// signed zone has the NXT chain needed to prove nonexistence.
    secure: std::sync::atomic::AtomicBool,
}

fn node_lock_index(id: NodeId) -> usize {
    (id.0 as usize) % DEFAULT_NODE_LOCK_COUNT
}

impl ZoneDb {
    pub fn new(origin: Name, mode: DbMode) -> ZoneDb {
        let mut tree = Rbt::new();
        tree.add_node(&origin);
        ZoneDb {
            origin,
            mode,
            tree: RwLock::new(tree),
            node_locks: (0..DEFAULT_NODE_LOCK_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
            versions: Mutex::new(VersionList::new()),
            secure: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn origin(&self) -> &Name {
        &self.origin
    }

    pub fn mode(&self) -> DbMode {
        self.mode
    }

    /// Does the zone apex carry an NXT rdataset? Once true for a database's
    /// lifetime it stays true: nothing in this core ever un-signs a zone.
    pub fn is_secure(&self) -> bool {
        self.secure.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Open a snapshot of the current committed state for reading.
    pub fn current_version(&self) -> ReadVersion {
        let versions = self.versions.lock().expect("version list mutex poisoned");
        ReadVersion { serial: versions.current_serial }
    }

    /// Open a new writer version. Only one writer may be open at a time,
    /// matching rbtdb.c's single-writer-per-db invariant.
    #[instrument(skip(self))]
    pub fn new_version(&self) -> Result<WriteVersion, DbError> {
        let mut versions = self.versions.lock().expect("version list mutex poisoned");
        if versions.writer_open {
            return Err(DbError::WriterAlreadyOpen);
        }
        let serial = versions.next_serial;
        versions.next_serial += 1;
        versions.writer_open = true;
        versions.open.push(Version { serial, writer: true, references: 1, changed_list: Vec::new() });
        debug!(serial, "opened writer version");
        Ok(WriteVersion { serial })
    }

    /// Commit or abort a writer version. On abort, every header this writer
    /// touched is marked `IGNORE` rather than physically removed — the
    /// `rollback_node` scheme rbtdb.c uses for O(1) rollback regardless of
    /// how many other readers still reference the node.
    #[instrument(skip(self, version))]
    pub fn close_version(&self, version: WriteVersion, commit: bool) -> Result<(), DbError> {
        let mut versions = self.versions.lock().expect("version list mutex poisoned");
        let pos = versions
            .open
            .iter()
            .position(|v| v.serial == version.serial && v.writer)
            .ok_or(DbError::BadDb("close_version called with an unknown writer serial"))?;
        let closed = versions.open.remove(pos);
        versions.writer_open = false;

        if commit {
            versions.current_serial = closed.serial;
            debug!(serial = closed.serial, "committed writer version");
        } else {
            debug!(serial = closed.serial, changed = closed.changed_list.len(), "aborting writer version, rolling back");
            for node_id in &closed.changed_list {
                self.rollback_node(*node_id, closed.serial);
            }
        }

        versions.least_serial = versions.open.iter().map(|v| v.serial).min().unwrap_or(versions.current_serial);
        Ok(())
    }

    /// Set `IGNORE` on any header at `node_id` — at the top of its type's
    /// chain or anywhere in its `down` chain — whose `serial` matches the
    /// aborting writer. Grounded on rbtdb.c's `rollback_node`, which walks
    /// both, not just the chain head.
    fn rollback_node(&self, node_id: NodeId, serial: u32) {
        let bucket = &self.node_locks[node_lock_index(node_id)];
        let mut data = bucket.lock().expect("node lock poisoned");
        if let Some(node_data) = data.get_mut(&node_id) {
            for header in node_data.headers.values_mut() {
                mark_ignore_at_serial(header, serial);
            }
        }
    }

    /// Record that `version` touched `node_id`, for rollback bookkeeping.
    fn mark_dirty(&self, versions: &mut VersionList, serial: u32, node_id: NodeId) {
        if let Some(v) = versions.open.iter_mut().find(|v| v.serial == serial) {
            if !v.changed_list.contains(&node_id) {
                v.changed_list.push(node_id);
            }
        }
    }

    /// Add (or merge/replace) a typed rdataset at `name`. Implements
    /// rbtdb.c `add()`'s header-find-skip-IGNORE loop and supersession via a
    /// fresh head-of-chain header pointing `down` at the old one.
    #[instrument(skip(self, version, slab))]
    pub fn add_rdataset(
        &self,
        version: &WriteVersion,
        name: &Name,
        rtype: RecordType,
        slab: RdataSlab,
        ttl: u32,
        trust: Trust,
        merge: bool,
    ) -> Result<AddOutcome, DbError> {
        let node_id = {
            let mut tree = self.tree.write().expect("tree lock poisoned");
            tree.add_node(name)
        };
        let bucket = &self.node_locks[node_lock_index(node_id)];
        let mut data = bucket.lock().expect("node lock poisoned");
        let node_data = data.entry(node_id).or_default();

        let existing = node_data.headers.get(&rtype).filter(|h| !h.attrs.contains(HeaderAttrs::IGNORE));
        let outcome = match existing {
            Some(old) if old.exists() => {
                let old_slab = old.slab.clone();
                let new_slab = if merge {
                    match (&old_slab, ) {
                        (Some(old_slab),) => match old_slab.merge(&slab, false) {
                            Ok(merged) => merged,
                            Err(crate::error::SlabError::Unchanged) => return Ok(AddOutcome::Unchanged),
                            Err(e) => return Err(DbError::BadDb(slab_error_message(e))),
                        },
                        (None,) => slab,
                    }
                } else {
                    slab
                };
                let down = Box::new(node_data.headers.remove(&rtype).unwrap());
                node_data.headers.insert(
                    rtype,
                    Header { rtype, serial: version.serial, ttl, trust, attrs: HeaderAttrs::empty(), slab: Some(new_slab), down: Some(down) },
                );
                AddOutcome::Replaced
            }
            _ => {
                node_data.headers.insert(
                    rtype,
                    Header { rtype, serial: version.serial, ttl, trust, attrs: HeaderAttrs::empty(), slab: Some(slab), down: None },
                );
                AddOutcome::Added
            }
        };
        drop(data);
        let mut versions = self.versions.lock().expect("version list mutex poisoned");
        self.mark_dirty(&mut versions, version.serial, node_id);
        trace!(?rtype, ?outcome, "add_rdataset");

        // An NXT at the apex is what makes a zone "secure" (§3's Zone DB
        // data model). Checked after the add succeeds so an Unchanged merge
        // doesn't spuriously flip this — though once true it never needs to
        // go back to false.
        if rtype == RecordType::Nxt && name == &self.origin {
            self.secure.store(true, std::sync::atomic::Ordering::Relaxed);
        }
        Ok(outcome)
    }

    /// Cache-mode negative caching: remember that `name` doesn't exist.
    /// Grounded on rbtdb.c `add()`'s NXDOMAIN-monopoly block (~3088-3148):
    /// marks every other header at the node `STALE` with `ttl = 0`, and
    /// refuses to downgrade an existing non-stale entry of equal-or-higher
    /// trust.
    #[instrument(skip(self, version))]
    pub fn add_nxdomain(&self, version: &WriteVersion, name: &Name, ttl: u32, trust: Trust) -> Result<AddOutcome, DbError> {
        debug_assert_eq!(self.mode, DbMode::Cache, "NXDOMAIN caching only applies to cache-mode databases");
        let node_id = {
            let mut tree = self.tree.write().expect("tree lock poisoned");
            tree.add_node(name)
        };
        let bucket = &self.node_locks[node_lock_index(node_id)];
        let mut data = bucket.lock().expect("node lock poisoned");
        let node_data = data.entry(node_id).or_default();

        if let Some((_, existing_ttl, existing_trust)) = node_data.negative {
            if existing_ttl > 0 && existing_trust >= trust {
                return Ok(AddOutcome::Unchanged);
            }
        }
        for header in node_data.headers.values_mut() {
            header.attrs.insert(HeaderAttrs::STALE);
            header.ttl = 0;
        }
        node_data.negative = Some((version.serial, ttl, trust));
        drop(data);
        let mut versions = self.versions.lock().expect("version list mutex poisoned");
        self.mark_dirty(&mut versions, version.serial, node_id);
        Ok(AddOutcome::Added)
    }

    /// The authoritative zone lookup algorithm: exact match, CNAME
    /// indirection, wildcard synthesis, and delegation detection, per
    /// rbtdb.c `zone_find` (~1586-1826).
    ///
    /// `version` pins the reader to a snapshot: only headers with
    /// `serial <= version.serial` are visible, so a reader opened before a
    /// writer commits never observes that writer's changes even if the
    /// commit happens while the reader is still querying (spec.md's MVCC
    /// isolation property). `None` takes the current committed snapshot.
    ///
    /// `options` carries §4.6.5's `GLUEOK`/`VALIDATEGLUE`/`NOWILD`/`NOEXACT`
    /// find inputs.
    #[instrument(skip(self, version))]
    pub fn zone_find(&self, qname: &Name, qtype: RecordType, version: Option<ReadVersion>, options: ZoneFindOptions) -> LookupOutcome {
        let serial = version.unwrap_or_else(|| self.current_version()).serial;
        let tree = self.tree.read().expect("tree lock poisoned");
        let origin = self.origin.clone();

        // Record the topmost (shallowest) NS-or-DNAME cut seen on the way
        // down; §4.6.5's tie-break says the topmost cut wins, and since the
        // callback fires root-first, the first hit recorded here already is
        // the topmost one — later, deeper cuts on the same path must not
        // override it.
        let mut zonecut: Option<(NodeId, CutKind)> = None;
        let mut result = tree.find_node(qname, FindOptions { follow_wildcard: false }, |id, _node| {
            if zonecut.is_none() {
                if let Some(kind) = self.cut_at(id, &origin, &tree, serial) {
                    zonecut = Some((id, kind));
                }
            }
            FindCallbackResult::Continue
        });

        // NOEXACT: answer as if the deepest proper ancestor, not `qname`
        // itself, were what matched (crate::rbt::FindOptions's same option,
        // one level up).
        if options.noexact {
            if let FindResult::Exact(id) = result {
                result = match tree.parent_of(id) {
                    Some(parent) => FindResult::Partial { closest: parent, labels_matched: 0 },
                    None => FindResult::Partial { closest: id, labels_matched: 0 },
                };
            }
        }

        match result {
            FindResult::Exact(node_id) => self.zone_find_exact(&tree, node_id, qname, qtype, serial, &zonecut, &options),
            FindResult::Partial { closest, labels_matched: _ } => {
                if let Some((cut_id, cut_kind)) = &zonecut {
                    return self.zonecut_outcome(&tree, *cut_id, cut_kind);
                }
                if !options.nowild {
                    // Try wildcard synthesis at the closest encloser's level.
                    let wildcard_name = {
                        let parent = tree.name_of(closest);
                        Name::from_labels({
                            let mut labels = vec![b"*".to_vec()];
                            labels.extend(parent.labels().iter().cloned());
                            labels
                        })
                    };
                    if let Ok(wildcard_name) = wildcard_name {
                        if let FindResult::Exact(wild_id) = tree.find_node(&wildcard_name, FindOptions::default(), |_, _| FindCallbackResult::Continue) {
                            match self.lookup_at_node(wild_id, qtype, serial) {
                                LookupOutcome::Success { rtype, slab, ttl } => {
                                    return LookupOutcome::WildcardSuccess { synthesized_owner: qname.clone(), rtype, slab, ttl };
                                }
                                LookupOutcome::Cname { target, ttl } => return LookupOutcome::Cname { target, ttl },
                                _ => {}
                            }
                        }
                    }
                }
                self.nxdomain_outcome(&tree, qname, serial)
            }
            FindResult::NotFound => self.nxdomain_outcome(&tree, qname, serial),
            FindResult::Error(_) => LookupOutcome::Nxdomain { denial: None },
        }
    }

    /// The exact-match branch of `zone_find`: gates delegation-vs-answer on
    /// `qtype` when `qname` itself is the zonecut (§4.6.5 step 2), resolves
    /// glue beneath a cut (step 5), and otherwise does a normal lookup with
    /// NXT-denial binding on `NXRRSET` (step 4).
    fn zone_find_exact(
        &self,
        tree: &Rbt,
        node_id: NodeId,
        qname: &Name,
        qtype: RecordType,
        serial: u32,
        zonecut: &Option<(NodeId, CutKind)>,
        options: &ZoneFindOptions,
    ) -> LookupOutcome {
        if let Some((cut_id, cut_kind)) = zonecut {
            if *cut_id == node_id {
                // qname itself is the cut.
                match cut_kind {
                    CutKind::Dname(dname, ttl) => return LookupOutcome::Dname { target: dname.target.clone(), ttl: *ttl },
                    CutKind::Ns(ns_slab, ttl) => {
                        let answerable_here = matches!(qtype, RecordType::Ns | RecordType::Key | RecordType::Nxt | RecordType::Any);
                        if !answerable_here && !options.glueok {
                            return LookupOutcome::Delegation { zonecut: tree.name_of(*cut_id), ns: ns_slab.clone(), ttl: *ttl };
                        }
                        // Otherwise fall through to a normal lookup at this
                        // node: either it's an answerable qtype, or GLUEOK
                        // allows seeing through the cut.
                    }
                }
            } else {
                // qname is strictly beneath a recorded cut: GLUE or DELEGATION.
                return match cut_kind {
                    CutKind::Dname(dname, ttl) => LookupOutcome::Dname { target: dname.target.clone(), ttl: *ttl },
                    CutKind::Ns(ns_slab, ns_ttl) => {
                        let cut_name = tree.name_of(*cut_id);
                        if !options.glueok {
                            return LookupOutcome::Delegation { zonecut: cut_name, ns: ns_slab.clone(), ttl: *ns_ttl };
                        }
                        match self.lookup_at_node(node_id, qtype, serial) {
                            LookupOutcome::Success { rtype, slab, ttl } => {
                                if options.validateglue && !ns_slab_references(ns_slab, qname) {
                                    LookupOutcome::Delegation { zonecut: cut_name, ns: ns_slab.clone(), ttl: *ns_ttl }
                                } else {
                                    LookupOutcome::Glue { zonecut: cut_name, rtype, slab, ttl }
                                }
                            }
                            other => other,
                        }
                    }
                };
            }
        }
        match self.lookup_at_node(node_id, qtype, serial) {
            LookupOutcome::Nxrrset { .. } => self.nxrrset_outcome(tree, node_id, qname, serial),
            other => other,
        }
    }

    /// The outcome for a zonecut recorded while descending toward a name
    /// that, in the end, doesn't exist below it: always `Delegation`/`Dname`
    /// regardless of `GLUEOK` (§4.6.5 step 3 — glue only applies to an
    /// exact match beneath the cut, not to a further nonexistent name).
    fn zonecut_outcome(&self, tree: &Rbt, cut_id: NodeId, cut_kind: &CutKind) -> LookupOutcome {
        match cut_kind {
            CutKind::Dname(dname, ttl) => LookupOutcome::Dname { target: dname.target.clone(), ttl: *ttl },
            CutKind::Ns(ns_slab, ttl) => LookupOutcome::Delegation { zonecut: tree.name_of(cut_id), ns: ns_slab.clone(), ttl: *ttl },
        }
    }

    /// `Nxdomain`, binding an NXT + covering SIG denial when the zone is
    /// secure (§4.6.5 step 3c, §4.6.7).
    fn nxdomain_outcome(&self, tree: &Rbt, qname: &Name, serial: u32) -> LookupOutcome {
        if self.is_secure() {
            if let Some(denial) = self.nxt_denial_before(tree, qname, serial) {
                return LookupOutcome::Nxdomain { denial: Some(denial) };
            }
        }
        LookupOutcome::Nxdomain { denial: None }
    }

    /// `Nxrrset` at `node_id`, binding that same node's NXT + covering SIG
    /// when the zone is secure (§4.6.5 step 4).
    fn nxrrset_outcome(&self, tree: &Rbt, node_id: NodeId, owner: &Name, serial: u32) -> LookupOutcome {
        if self.is_secure() {
            if let Some(denial) = self.nxt_denial_at(node_id, owner.clone(), serial) {
                return LookupOutcome::Nxrrset { denial: Some(denial) };
            }
        }
        let _ = tree;
        LookupOutcome::Nxrrset { denial: None }
    }

    /// What kind of delegation (if any) `node_id` itself is: a live DNAME
    /// strictly dominates a live NS at the same node for zonecut selection
    /// (§4.6.5's tie-break), and the zone apex is never a cut.
    fn cut_at(&self, node_id: NodeId, origin: &Name, tree: &Rbt, serial: u32) -> Option<CutKind> {
        let node_name = tree.name_of(node_id);
        if &node_name == origin {
            return None;
        }
        let bucket = &self.node_locks[node_lock_index(node_id)];
        let data = bucket.lock().expect("node lock poisoned");
        let node_data = data.get(&node_id)?;
        if let Some(dname_header) = node_data.visible_header(RecordType::Dname, Some(serial)) {
            if dname_header.exists() {
                if let Some(slab) = &dname_header.slab {
                    if let Some(entry) = slab.entries().next() {
                        let mut buf = crate::buffer::Buffer::new(entry);
                        if let Ok(dname) = Dname::from_wire(&mut buf, entry.len()) {
                            return Some(CutKind::Dname(dname, dname_header.ttl));
                        }
                    }
                }
            }
        }
        if let Some(ns_header) = node_data.visible_header(RecordType::Ns, Some(serial)) {
            if ns_header.exists() {
                return Some(CutKind::Ns(ns_header.slab.clone().expect("existing NS header always carries a slab"), ns_header.ttl));
            }
        }
        None
    }

    fn lookup_at_node(&self, node_id: NodeId, qtype: RecordType, serial: u32) -> LookupOutcome {
        let bucket = &self.node_locks[node_lock_index(node_id)];
        let data = bucket.lock().expect("node lock poisoned");
        let node_data = match data.get(&node_id) {
            Some(d) => d,
            None => return LookupOutcome::Nxrrset { denial: None },
        };
        if let Some(header) = node_data.visible_header(qtype, Some(serial)) {
            if header.exists() {
                return LookupOutcome::Success { rtype: qtype, slab: header.slab.clone().unwrap(), ttl: header.ttl };
            }
        }
        if qtype != RecordType::Cname {
            if let Some(cname_header) = node_data.visible_header(RecordType::Cname, Some(serial)) {
                if cname_header.exists() {
                    if let Some(entry) = cname_header.slab.as_ref().and_then(|s| s.entries().next()) {
                        let mut buf = crate::buffer::Buffer::new(entry);
                        if let Ok(cname) = Cname::from_wire(&mut buf, entry.len()) {
                            return LookupOutcome::Cname { target: cname.cname, ttl: cname_header.ttl };
                        }
                    }
                }
            }
        }
        LookupOutcome::Nxrrset { denial: None }
    }

    /// Resolver-cache lookup: exact rtype match, or the cached negative
    /// marker, or `Nxrrset` (name known to exist, but not with this type,
    /// which for a cache means "ask upstream", distinct from `Nxdomain`).
    #[instrument(skip(self))]
    pub fn cache_find(&self, qname: &Name, qtype: RecordType) -> LookupOutcome {
        debug_assert_eq!(self.mode, DbMode::Cache);
        let tree = self.tree.read().expect("tree lock poisoned");
        match tree.find_node(qname, FindOptions::default(), |_, _| FindCallbackResult::Continue) {
            FindResult::Exact(node_id) => {
                let bucket = &self.node_locks[node_lock_index(node_id)];
                let data = bucket.lock().expect("node lock poisoned");
                if let Some(node_data) = data.get(&node_id) {
                    // A type-specific header, even one flattened to ttl 0 by
                    // the NXDOMAIN monopoly below, answers the query if it's
                    // still present; only fall back to the negative marker
                    // once there's no header at all for this type.
                    if let Some(header) = node_data.visible_header(qtype, None) {
                        if header.exists() {
                            return LookupOutcome::Success { rtype: qtype, slab: header.slab.clone().unwrap(), ttl: header.ttl };
                        }
                    }
                    if let Some((_, ttl, _)) = node_data.negative {
                        return LookupOutcome::NegativeCache { ttl };
                    }
                }
                LookupOutcome::Nxrrset { denial: None }
            }
            _ => LookupOutcome::Nxrrset { denial: None },
        }
    }

    /// Closest-encloser NXT-based denial of existence: find the greatest
    /// name in canonical order that is less than `qname`, and return its
    /// NXT record if it has one, for the caller to confirm the gap covers
    /// `qname` (spec.md §4.6.7).
    pub fn closest_nxt(&self, qname: &Name) -> Option<(Name, Nxt)> {
        let tree = self.tree.read().expect("tree lock poisoned");
        let mut chain: Chain = tree.chain();
        let mut candidate = chain.first()?;
        let mut best: Option<NodeId> = None;
        loop {
            let candidate_name = tree.name_of(candidate);
            if candidate_name.cmp_canonical(qname) == std::cmp::Ordering::Less {
                best = Some(candidate);
            } else {
                break;
            }
            match chain.next() {
                Some(next) => candidate = next,
                None => break,
            }
        }
        let best = best?;
        let name = tree.name_of(best);
        let bucket = &self.node_locks[node_lock_index(best)];
        let data = bucket.lock().expect("node lock poisoned");
        let node_data = data.get(&best)?;
        let header = node_data.headers.get(&RecordType::Nxt)?;
        let entry = header.slab.as_ref()?.entries().next()?;
        let mut buf = crate::buffer::Buffer::new(entry);
        let nxt = Nxt::from_wire(&mut buf, entry.len()).ok()?;
        Some((name, nxt))
    }

    /// Like [`Self::closest_nxt`], but bound for `zone_find`'s secure-zone
    /// `NXDOMAIN` path: returns the predecessor's NXT together with its
    /// covering SIG(NXT), filtered to `serial`'s MVCC snapshot.
    fn nxt_denial_before(&self, tree: &Rbt, qname: &Name, serial: u32) -> Option<NxtDenial> {
        let mut chain: Chain = tree.chain();
        let mut candidate = chain.first()?;
        let mut best: Option<NodeId> = None;
        loop {
            let candidate_name = tree.name_of(candidate);
            if candidate_name.cmp_canonical(qname) == std::cmp::Ordering::Less {
                best = Some(candidate);
            } else {
                break;
            }
            match chain.next() {
                Some(next) => candidate = next,
                None => break,
            }
        }
        let best = best?;
        let owner = tree.name_of(best);
        self.nxt_denial_at(best, owner, serial)
    }

    /// The NXT rdataset at `node_id`, plus its covering SIG(NXT) subset (if
    /// any), both filtered to `serial`'s MVCC snapshot. `None` if the node
    /// has no live NXT — callers treat that as "can't prove this denial",
    /// not as a hard `BADDB` failure (spec.md §4.6.7 leaves that call to the
    /// implementer; this core degrades to an unsigned-style answer instead
    /// of erroring a query for a different name's data).
    fn nxt_denial_at(&self, node_id: NodeId, owner: Name, serial: u32) -> Option<NxtDenial> {
        let bucket = &self.node_locks[node_lock_index(node_id)];
        let data = bucket.lock().expect("node lock poisoned");
        let node_data = data.get(&node_id)?;
        let nxt_header = node_data.visible_header(RecordType::Nxt, Some(serial))?;
        if !nxt_header.exists() {
            return None;
        }
        let nxt_slab = nxt_header.slab.clone()?;
        let sigrdataset = node_data.visible_header(RecordType::Sig, Some(serial)).and_then(|sig_header| {
            if !sig_header.exists() {
                return None;
            }
            let covering: Vec<RData> = sig_header
                .slab
                .as_ref()?
                .entries()
                .filter_map(|entry| {
                    let mut buf = crate::buffer::Buffer::new(entry);
                    Sig::from_wire(&mut buf, entry.len()).ok()
                })
                .filter(|sig| sig.type_covered == RecordType::Nxt.code())
                .map(RData::Sig)
                .collect();
            if covering.is_empty() {
                None
            } else {
                Some(RdataSlab::from_rdataset(covering.into_iter(), RecordType::Sig))
            }
        });
        Some(NxtDenial { owner, rdataset: nxt_slab, sigrdataset })
    }

    /// Iterate every stored `(RecordType, RdataSlab, ttl)` at `name`, for
    /// AXFR-style dumping or debugging (spec.md §4.6.8's rdataset cursor).
    pub fn rdatasets_at(&self, name: &Name) -> Vec<(RecordType, RdataSlab, u32)> {
        let tree = self.tree.read().expect("tree lock poisoned");
        let node_id = match tree.find_node(name, FindOptions::default(), |_, _| FindCallbackResult::Continue) {
            FindResult::Exact(id) => id,
            _ => return Vec::new(),
        };
        let bucket = &self.node_locks[node_lock_index(node_id)];
        let data = bucket.lock().expect("node lock poisoned");
        match data.get(&node_id) {
            Some(node_data) => node_data
                .headers
                .values()
                .filter(|h| h.exists())
                .map(|h| (h.rtype, h.slab.clone().unwrap(), h.ttl))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Full-database iterator: every live name and its rdatasets, in
    /// canonical order (spec.md §4.6.8's DB iterator).
    pub fn iter_names(&self) -> Vec<Name> {
        let tree = self.tree.read().expect("tree lock poisoned");
        let mut chain = tree.chain();
        let mut out = Vec::new();
        if let Some(mut id) = chain.first() {
            loop {
                out.push(tree.name_of(id));
                match chain.next() {
                    Some(next) => id = next,
                    None => break,
                }
            }
        }
        out
    }
}

fn mark_ignore_at_serial(header: &mut Header, serial: u32) {
    if header.serial == serial {
        header.attrs.insert(HeaderAttrs::IGNORE);
    }
    let mut down = header.down.as_deref_mut();
    while let Some(h) = down {
        if h.serial == serial {
            h.attrs.insert(HeaderAttrs::IGNORE);
        }
        down = h.down.as_deref_mut();
    }
}

fn slab_error_message(e: crate::error::SlabError) -> &'static str {
    match e {
        crate::error::SlabError::Unchanged => "slab merge was unchanged",
        crate::error::SlabError::TypeMismatch => "slab merge type mismatch",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdata::records::{A, Ns};
    use std::net::Ipv4Addr;

    fn name(s: &str) -> Name {
        Name::from_text(s, None).unwrap()
    }

    fn a_slab(last: u8) -> RdataSlab {
        RdataSlab::from_rdataset(vec![RData::A(A { address: Ipv4Addr::new(192, 0, 2, last) })].into_iter(), RecordType::A)
    }

    #[test]
    fn add_and_find_exact() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        db.add_rdataset(&v, &name("www.example.com."), RecordType::A, a_slab(1), 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        match db.zone_find(&name("www.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Success { slab, .. } => assert_eq!(slab.len(), 1),
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[test]
    fn abort_rolls_back_via_ignore() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        db.add_rdataset(&v, &name("www.example.com."), RecordType::A, a_slab(1), 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, false).unwrap();

        match db.zone_find(&name("www.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Nxrrset { .. } | LookupOutcome::Nxdomain { .. } => {}
            other => panic!("expected the aborted add to be invisible, got {other:?}"),
        }
    }

    #[test]
    fn second_writer_is_rejected_while_one_is_open() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let _v1 = db.new_version().unwrap();
        assert_eq!(db.new_version().unwrap_err(), DbError::WriterAlreadyOpen);
    }

    #[test]
    fn delegation_is_reported_below_a_zone_cut() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        let ns_slab = RdataSlab::from_rdataset(
            vec![RData::Ns(Ns { nsdname: name("ns1.sub.example.com.") })].into_iter(),
            RecordType::Ns,
        );
        db.add_rdataset(&v, &name("sub.example.com."), RecordType::Ns, ns_slab, 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        match db.zone_find(&name("host.sub.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Delegation { zonecut, .. } => assert_eq!(zonecut, name("sub.example.com.")),
            other => panic!("expected Delegation, got {other:?}"),
        }
    }

    #[test]
    fn ns_qtype_at_delegation_node_answers_instead_of_delegating() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        let ns_slab = RdataSlab::from_rdataset(
            vec![RData::Ns(Ns { nsdname: name("ns1.sub.example.com.") })].into_iter(),
            RecordType::Ns,
        );
        db.add_rdataset(&v, &name("sub.example.com."), RecordType::Ns, ns_slab, 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        match db.zone_find(&name("sub.example.com."), RecordType::Ns, None, ZoneFindOptions::default()) {
            LookupOutcome::Success { rtype, .. } => assert_eq!(rtype, RecordType::Ns),
            other => panic!("expected the NS rrset itself as an answer, got {other:?}"),
        }
    }

    #[test]
    fn nested_delegation_reports_topmost_cut() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        let outer_ns = RdataSlab::from_rdataset(
            vec![RData::Ns(Ns { nsdname: name("ns1.sub.example.com.") })].into_iter(),
            RecordType::Ns,
        );
        let inner_ns = RdataSlab::from_rdataset(
            vec![RData::Ns(Ns { nsdname: name("ns1.deep.sub.example.com.") })].into_iter(),
            RecordType::Ns,
        );
        db.add_rdataset(&v, &name("sub.example.com."), RecordType::Ns, outer_ns, 300, Trust::AuthAnswer, false).unwrap();
        db.add_rdataset(&v, &name("deep.sub.example.com."), RecordType::Ns, inner_ns, 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        match db.zone_find(&name("host.deep.sub.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Delegation { zonecut, .. } => assert_eq!(zonecut, name("sub.example.com.")),
            other => panic!("expected the topmost cut sub.example.com., got {other:?}"),
        }
    }

    #[test]
    fn glueok_resolves_an_address_beneath_a_cut() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        let ns_slab = RdataSlab::from_rdataset(
            vec![RData::Ns(Ns { nsdname: name("ns.sub.example.com.") })].into_iter(),
            RecordType::Ns,
        );
        db.add_rdataset(&v, &name("sub.example.com."), RecordType::Ns, ns_slab, 300, Trust::AuthAnswer, false).unwrap();
        db.add_rdataset(&v, &name("ns.sub.example.com."), RecordType::A, a_slab(53), 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        let options = ZoneFindOptions { glueok: true, ..ZoneFindOptions::default() };
        match db.zone_find(&name("ns.sub.example.com."), RecordType::A, None, options) {
            LookupOutcome::Glue { zonecut, rtype, .. } => {
                assert_eq!(zonecut, name("sub.example.com."));
                assert_eq!(rtype, RecordType::A);
            }
            other => panic!("expected Glue, got {other:?}"),
        }

        match db.zone_find(&name("ns.sub.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Delegation { .. } => {}
            other => panic!("without GLUEOK this should stay a delegation, got {other:?}"),
        }
    }

    #[test]
    fn validateglue_rejects_a_name_the_ns_set_does_not_reference() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        let ns_slab = RdataSlab::from_rdataset(
            vec![RData::Ns(Ns { nsdname: name("ns.sub.example.com.") })].into_iter(),
            RecordType::Ns,
        );
        db.add_rdataset(&v, &name("sub.example.com."), RecordType::Ns, ns_slab, 300, Trust::AuthAnswer, false).unwrap();
        db.add_rdataset(&v, &name("other.sub.example.com."), RecordType::A, a_slab(54), 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        let options = ZoneFindOptions { glueok: true, validateglue: true, ..ZoneFindOptions::default() };
        match db.zone_find(&name("other.sub.example.com."), RecordType::A, None, options) {
            LookupOutcome::Delegation { .. } => {}
            other => panic!("VALIDATEGLUE should downgrade an unreferenced name to Delegation, got {other:?}"),
        }
    }

    #[test]
    fn cname_indirection_reported_for_other_qtypes() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        let cname_slab = RdataSlab::from_rdataset(
            vec![RData::Cname(Cname { cname: name("target.example.com.") })].into_iter(),
            RecordType::Cname,
        );
        db.add_rdataset(&v, &name("alias.example.com."), RecordType::Cname, cname_slab, 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        match db.zone_find(&name("alias.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Cname { target, .. } => assert_eq!(target, name("target.example.com.")),
            other => panic!("expected Cname, got {other:?}"),
        }
    }

    #[test]
    fn wildcard_synthesis() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        db.add_rdataset(&v, &name("*.example.com."), RecordType::A, a_slab(5), 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        match db.zone_find(&name("anything.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::WildcardSuccess { synthesized_owner, .. } => {
                assert_eq!(synthesized_owner, name("anything.example.com."))
            }
            other => panic!("expected WildcardSuccess, got {other:?}"),
        }
    }

    #[test]
    fn nowild_disables_wildcard_synthesis() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        db.add_rdataset(&v, &name("*.example.com."), RecordType::A, a_slab(5), 300, Trust::AuthAnswer, false).unwrap();
        db.close_version(v, true).unwrap();

        let options = ZoneFindOptions { nowild: true, ..ZoneFindOptions::default() };
        match db.zone_find(&name("anything.example.com."), RecordType::A, None, options) {
            LookupOutcome::Nxdomain { .. } => {}
            other => panic!("expected NOWILD to suppress synthesis, got {other:?}"),
        }
    }

    #[test]
    fn merge_adds_new_addresses() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        db.add_rdataset(&v, &name("www.example.com."), RecordType::A, a_slab(1), 300, Trust::AuthAnswer, true).unwrap();
        db.add_rdataset(&v, &name("www.example.com."), RecordType::A, a_slab(2), 300, Trust::AuthAnswer, true).unwrap();
        db.close_version(v, true).unwrap();

        match db.zone_find(&name("www.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Success { slab, .. } => assert_eq!(slab.len(), 2),
            other => panic!("expected Success with 2 entries, got {other:?}"),
        }
    }

    #[test]
    fn cache_nxdomain_monopoly_marks_others_stale() {
        let db = ZoneDb::new(Name::root(), DbMode::Cache);
        let v = db.new_version().unwrap();
        db.add_rdataset(&v, &name("ghost.example.com."), RecordType::A, a_slab(1), 300, Trust::Answer, false).unwrap();
        db.add_nxdomain(&v, &name("ghost.example.com."), 60, Trust::Answer).unwrap();
        db.close_version(v, true).unwrap();

        match db.cache_find(&name("ghost.example.com."), RecordType::A) {
            LookupOutcome::Success { ttl, .. } => assert_eq!(ttl, 0, "superseded entry should be flattened to ttl 0"),
            other => panic!("expected a stale Success with ttl 0, got {other:?}"),
        }
    }

    #[test]
    fn reader_pinned_before_commit_never_sees_it() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);

        // R1 pins a snapshot before the writer that adds new.example.com opens.
        let r1 = db.current_version();

        let v = db.new_version().unwrap();
        db.add_rdataset(&v, &name("new.example.com."), RecordType::A, a_slab(42), 300, Trust::AuthAnswer, false).unwrap();

        // Even though the writer hasn't committed, a snapshot opened *after*
        // add_rdataset but pinned to the pre-write serial must not see it.
        match db.zone_find(&name("new.example.com."), RecordType::A, Some(r1), ZoneFindOptions::default()) {
            LookupOutcome::Nxdomain { .. } | LookupOutcome::Nxrrset { .. } => {}
            other => panic!("r1's pre-commit snapshot should not see the uncommitted add, got {other:?}"),
        }

        db.close_version(v, true).unwrap();

        let r2 = db.current_version();
        match db.zone_find(&name("new.example.com."), RecordType::A, Some(r2), ZoneFindOptions::default()) {
            LookupOutcome::Success { .. } => {}
            other => panic!("r2, opened after commit, should see the new record, got {other:?}"),
        }

        // r1 remains pinned to its original snapshot even after the commit.
        match db.zone_find(&name("new.example.com."), RecordType::A, Some(r1), ZoneFindOptions::default()) {
            LookupOutcome::Nxdomain { .. } | LookupOutcome::Nxrrset { .. } => {}
            other => panic!("r1 must remain isolated from the commit that happened after it opened, got {other:?}"),
        }
    }

    #[test]
    fn closest_nxt_finds_predecessor() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        let nxt_slab = RdataSlab::from_rdataset(
            vec![RData::Nxt(Nxt { next_domain: name("z.example.com."), type_bitmap: vec![0b0100_0000] })].into_iter(),
            RecordType::Nxt,
        );
        db.add_rdataset(&v, &name("a.example.com."), RecordType::Nxt, nxt_slab, 300, Trust::Secure, false).unwrap();
        db.close_version(v, true).unwrap();

        let (predecessor, nxt) = db.closest_nxt(&name("m.example.com.")).expect("should find a.example.com as predecessor");
        assert_eq!(predecessor, name("a.example.com."));
        assert_eq!(nxt.next_domain, name("z.example.com."));
    }

    #[test]
    fn secure_zone_binds_nxt_denial_into_nxdomain() {
        let db = ZoneDb::new(name("example.com."), DbMode::Zone);
        let v = db.new_version().unwrap();
        let apex_nxt = RdataSlab::from_rdataset(
            vec![RData::Nxt(Nxt { next_domain: name("a.example.com."), type_bitmap: vec![0b0100_0000] })].into_iter(),
            RecordType::Nxt,
        );
        db.add_rdataset(&v, &name("example.com."), RecordType::Nxt, apex_nxt, 300, Trust::Secure, false).unwrap();
        let nxt_slab = RdataSlab::from_rdataset(
            vec![RData::Nxt(Nxt { next_domain: name("z.example.com."), type_bitmap: vec![0b0100_0000] })].into_iter(),
            RecordType::Nxt,
        );
        db.add_rdataset(&v, &name("a.example.com."), RecordType::Nxt, nxt_slab, 300, Trust::Secure, false).unwrap();
        let sig_slab = RdataSlab::from_rdataset(
            vec![RData::Sig(Sig {
                type_covered: RecordType::Nxt.code(),
                algorithm: 5,
                labels: 3,
                original_ttl: 300,
                expiration: 2_000_000_000,
                inception: 1_000_000_000,
                key_tag: 1,
                signer: name("example.com."),
                signature: vec![1, 2, 3, 4],
            })]
            .into_iter(),
            RecordType::Sig,
        );
        db.add_rdataset(&v, &name("a.example.com."), RecordType::Sig, sig_slab, 300, Trust::Secure, false).unwrap();
        db.close_version(v, true).unwrap();

        assert!(db.is_secure());

        match db.zone_find(&name("m.example.com."), RecordType::A, None, ZoneFindOptions::default()) {
            LookupOutcome::Nxdomain { denial: Some(denial) } => {
                assert_eq!(denial.owner, name("a.example.com."));
                assert!(denial.sigrdataset.is_some());
            }
            other => panic!("expected Nxdomain with a bound NXT denial, got {other:?}"),
        }
    }
}
