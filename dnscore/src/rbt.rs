//! The name tree: a hybrid radix/ordered-sibling structure storing one node
//! per distinct name level, exactly as BIND9's `dns_rbt_t` does
//! (`examples/original_source/lib/dns/rbtdb.c` operates on `dns_rbtnode_t *`
//! throughout). Per spec.md §9's explicit redesign note on intrusive
//! pointers, this is built over an arena (`Vec<RbtNode>` indexed by
//! [`NodeId`]) instead of raw/`Rc` pointers, and each level's siblings are
//! kept in a `BTreeMap` ordered by [`crate::name::Name::cmp_canonical`]'s
//! per-label rule rather than BIND9's manually-rotated red-black tree — an
//! idiomatic simplification that keeps O(log n) sibling lookup without
//! hand-rolled rotations.

use crate::error::RbtError;
use crate::name::Name;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// An index into the tree's node arena. Stable for the life of the tree
/// (nodes are tombstoned, not compacted, by [`Rbt::delete_name`]).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Eq, PartialEq, PartialOrd)]
struct LabelKey(Vec<u8>);

impl Ord for LabelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0))
    }
}

/// One level of the name tree: the label unique to this node plus its
/// children (the `down` subtree, one level per label closer to a leaf).
#[derive(Debug, Clone)]
pub struct RbtNode {
    label: Vec<u8>,
    parent: Option<NodeId>,
    children: BTreeMap<LabelKey, NodeId>,
    /// Is this node's label literally `*`?
    pub is_wildcard: bool,
    /// Does some descendant of this node carry a wildcard label? Set on
    /// every ancestor when a wildcard is added, mirroring BIND9's
    /// `find_wildcard`'s reliance on `DNS_NSEC3FLAG_*`-adjacent wildcard
    /// marks recorded up the tree at insertion time.
    pub has_wildcard_descendant: bool,
    /// Has any data (rdataset, zone-cut marker, ...) ever been attached to
    /// this exact name? A node can exist purely as a branch point (e.g. the
    /// implicit `example.com` node under `www.example.com`) without this
    /// being set.
    pub exists: bool,
    tombstoned: bool,
}

impl RbtNode {
    pub fn label(&self) -> &[u8] {
        &self.label
    }
}

/// What a `find_node` callback decided after inspecting a node on the walk
/// down from the root, e.g. "this is a zone cut, stop descending" — the enum
/// form of spec.md §9's redesign note replacing BIND9's function-pointer
/// callback with a plain return value.
#[derive(Debug, Clone)]
pub enum FindCallbackResult {
    Continue,
    StopPartial,
    Error(RbtError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FindOptions {
    /// Fall back to a sibling `*` label when an exact label match fails.
    pub follow_wildcard: bool,
}

#[derive(Debug, Clone)]
pub enum FindResult {
    Exact(NodeId),
    /// The walk matched `labels_matched` labels (root-down) before running
    /// out of tree; `closest` is the node at that depth.
    Partial { closest: NodeId, labels_matched: usize },
    NotFound,
    Error(RbtError),
}

/// The name tree itself. Node `0` is always the root (the name `.`).
#[derive(Debug, Clone)]
pub struct Rbt {
    nodes: Vec<RbtNode>,
}

const ROOT: NodeId = NodeId(0);

impl Default for Rbt {
    fn default() -> Self {
        Self::new()
    }
}

impl Rbt {
    pub fn new() -> Rbt {
        Rbt {
            nodes: vec![RbtNode {
                label: Vec::new(),
                parent: None,
                children: BTreeMap::new(),
                is_wildcard: false,
                has_wildcard_descendant: false,
                exists: false,
                tombstoned: false,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node(&self, id: NodeId) -> &RbtNode {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut RbtNode {
        &mut self.nodes[id.0 as usize]
    }

    /// The node one level closer to the root, or `None` for the root itself.
    /// Used by `zonedb`'s `NOEXACT` find option (§4.5) to fall back from an
    /// exact hit to its deepest proper ancestor.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0 as usize].parent
    }

    /// Insert (or find) the node for `name`, creating every intermediate
    /// level that doesn't already exist. Labels are walked root-down, i.e.
    /// the reverse of `Name::labels()`'s leaf-first order.
    pub fn add_node(&mut self, name: &Name) -> NodeId {
        let mut current = ROOT;
        for label in name.labels().iter().rev() {
            let key = LabelKey(label.clone());
            current = match self.nodes[current.0 as usize].children.get(&key) {
                Some(&id) => id,
                None => {
                    let new_id = NodeId(self.nodes.len() as u32);
                    let is_wildcard = label.as_slice() == b"*";
                    self.nodes.push(RbtNode {
                        label: label.clone(),
                        parent: Some(current),
                        children: BTreeMap::new(),
                        is_wildcard,
                        has_wildcard_descendant: false,
                        exists: false,
                        tombstoned: false,
                    });
                    self.nodes[current.0 as usize].children.insert(key, new_id);
                    if is_wildcard {
                        self.mark_wildcard_ancestors(current);
                    }
                    new_id
                }
            };
        }
        self.nodes[current.0 as usize].exists = true;
        current
    }

    fn mark_wildcard_ancestors(&mut self, mut id: NodeId) {
        loop {
            let node = &mut self.nodes[id.0 as usize];
            if node.has_wildcard_descendant {
                break;
            }
            node.has_wildcard_descendant = true;
            match node.parent {
                Some(p) => id = p,
                None => break,
            }
        }
    }

    /// Walk the tree from the root toward `name`, invoking `callback` at
    /// each matched node (e.g. for zone-cut/DNAME detection during zone
    /// lookups). `callback` receives the node's own id alongside its data so
    /// callers can look up out-of-tree per-node state (e.g. `zonedb`'s
    /// node-locked rdataset chains) keyed on it. Stops early on
    /// `FindCallbackResult::StopPartial` or `::Error`.
    pub fn find_node<F: FnMut(NodeId, &RbtNode) -> FindCallbackResult>(
        &self,
        name: &Name,
        options: FindOptions,
        mut callback: F,
    ) -> FindResult {
        let labels: Vec<&Vec<u8>> = name.labels().iter().rev().collect();
        let mut current = ROOT;
        for (i, label) in labels.iter().enumerate() {
            let key = LabelKey((*label).clone());
            let next = self.nodes[current.0 as usize].children.get(&key).copied();
            match next {
                Some(id) if !self.nodes[id.0 as usize].tombstoned => {
                    match callback(id, &self.nodes[id.0 as usize]) {
                        FindCallbackResult::Continue => {}
                        FindCallbackResult::StopPartial => {
                            return FindResult::Partial { closest: id, labels_matched: i + 1 };
                        }
                        FindCallbackResult::Error(e) => return FindResult::Error(e),
                    }
                    current = id;
                }
                _ => {
                    if options.follow_wildcard {
                        let wildcard_key = LabelKey(b"*".to_vec());
                        if let Some(&wild) = self.nodes[current.0 as usize].children.get(&wildcard_key) {
                            if !self.nodes[wild.0 as usize].tombstoned {
                                return FindResult::Exact(wild);
                            }
                        }
                    }
                    return if i == 0 && current == ROOT {
                        FindResult::NotFound
                    } else {
                        FindResult::Partial { closest: current, labels_matched: i }
                    };
                }
            }
        }
        if self.nodes[current.0 as usize].exists {
            FindResult::Exact(current)
        } else {
            FindResult::Partial { closest: current, labels_matched: labels.len() }
        }
    }

    /// Reconstruct the absolute name of `id` by walking parent links back to
    /// the root.
    pub fn name_of(&self, mut id: NodeId) -> Name {
        let mut labels = Vec::new();
        loop {
            let node = &self.nodes[id.0 as usize];
            if node.parent.is_none() {
                break;
            }
            labels.push(node.label.clone());
            id = node.parent.unwrap();
        }
        Name::from_labels(labels).expect("names reconstructed from the tree are always valid")
    }

    /// Drop `name` and everything below it from the tree. Present for
    /// completeness (spec.md notes real deployments only ever do this on DB
    /// teardown); detaches the subtree from its parent and tombstones nodes
    /// rather than compacting the arena, so existing `NodeId`s elsewhere
    /// never dangle into a reused slot.
    pub fn delete_name(&mut self, name: &Name) -> Result<(), RbtError> {
        let labels: Vec<&Vec<u8>> = name.labels().iter().rev().collect();
        let mut current = ROOT;
        for label in &labels {
            let key = LabelKey((*label).clone());
            match self.nodes[current.0 as usize].children.get(&key).copied() {
                Some(id) => current = id,
                None => return Err(RbtError::NotFound(name.clone())),
            }
        }
        if let Some(parent) = self.nodes[current.0 as usize].parent {
            let key = LabelKey(self.nodes[current.0 as usize].label.clone());
            self.nodes[parent.0 as usize].children.remove(&key);
        }
        self.tombstone_subtree(current);
        Ok(())
    }

    fn tombstone_subtree(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.nodes[id.0 as usize].children.values().copied().collect();
        for child in children {
            self.tombstone_subtree(child);
        }
        let node = &mut self.nodes[id.0 as usize];
        node.tombstoned = true;
        node.exists = false;
        node.children.clear();
    }

    /// Full in-order (canonical-order) listing of every live name in the
    /// tree, the basis of [`Chain`]'s `first`/`last`/`next`/`prev`.
    fn ordered_names(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_inorder(ROOT, &mut out);
        out
    }

    fn collect_inorder(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let node = &self.nodes[id.0 as usize];
        if node.exists && !node.tombstoned {
            out.push(id);
        }
        for &child in node.children.values() {
            self.collect_inorder(child, out);
        }
    }

    /// Begin a [`Chain`] walk over every live name, in canonical order.
    pub fn chain(&self) -> Chain {
        Chain { order: self.ordered_names(), position: 0 }
    }
}

/// An ordered walk over the tree's live names, used by AXFR-style iteration
/// and by closest-encloser/NSEC-predecessor search.
#[derive(Debug, Clone)]
pub struct Chain {
    order: Vec<NodeId>,
    position: usize,
}

impl Chain {
    pub fn first(&mut self) -> Option<NodeId> {
        self.position = 0;
        self.order.first().copied()
    }

    pub fn last(&mut self) -> Option<NodeId> {
        if self.order.is_empty() {
            return None;
        }
        self.position = self.order.len() - 1;
        self.order.last().copied()
    }

    pub fn current(&self) -> Option<NodeId> {
        self.order.get(self.position).copied()
    }

    pub fn next(&mut self) -> Option<NodeId> {
        if self.position + 1 >= self.order.len() {
            return None;
        }
        self.position += 1;
        self.order.get(self.position).copied()
    }

    pub fn prev(&mut self) -> Option<NodeId> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        self.order.get(self.position).copied()
    }

    /// Position the chain at (or immediately before, in canonical order) the
    /// given node, for closest-encloser/NSEC predecessor search.
    pub fn seek(&mut self, id: NodeId) {
        if let Some(pos) = self.order.iter().position(|&n| n == id) {
            self.position = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        Name::from_text(s, None).unwrap()
    }

    #[test]
    fn add_and_find_exact() {
        let mut rbt = Rbt::new();
        let id = rbt.add_node(&name("www.example.com."));
        let result = rbt.find_node(&name("www.example.com."), FindOptions::default(), |_, _| FindCallbackResult::Continue);
        match result {
            FindResult::Exact(found) => assert_eq!(found, id),
            other => panic!("expected Exact, got {other:?}"),
        }
    }

    #[test]
    fn intermediate_nodes_are_branch_points_not_matches() {
        let mut rbt = Rbt::new();
        rbt.add_node(&name("www.example.com."));
        // example.com was created as an intermediate node but never had
        // add_node called on it directly, so it doesn't "exist" as data.
        let result = rbt.find_node(&name("example.com."), FindOptions::default(), |_, _| FindCallbackResult::Continue);
        assert!(matches!(result, FindResult::Partial { .. }));
    }

    #[test]
    fn wildcard_fallback() {
        let mut rbt = Rbt::new();
        rbt.add_node(&name("*.example.com."));
        let result = rbt.find_node(
            &name("anything.example.com."),
            FindOptions { follow_wildcard: true },
            |_, _| FindCallbackResult::Continue,
        );
        assert!(matches!(result, FindResult::Exact(_)));
    }

    #[test]
    fn wildcard_mark_propagates_to_ancestors() {
        let mut rbt = Rbt::new();
        let apex = rbt.add_node(&name("example.com."));
        rbt.add_node(&name("*.example.com."));
        assert!(rbt.node(apex).has_wildcard_descendant);
    }

    #[test]
    fn name_of_reconstructs_absolute_name() {
        let mut rbt = Rbt::new();
        let id = rbt.add_node(&name("www.example.com."));
        assert_eq!(rbt.name_of(id), name("www.example.com."));
    }

    #[test]
    fn chain_walks_in_canonical_order() {
        let mut rbt = Rbt::new();
        rbt.add_node(&name("b.example.com."));
        rbt.add_node(&name("a.example.com."));
        rbt.add_node(&name("example.com."));
        let mut chain = rbt.chain();
        let first = chain.first().unwrap();
        assert_eq!(rbt.name_of(first), name("example.com."));
        let second = chain.next().unwrap();
        assert_eq!(rbt.name_of(second), name("a.example.com."));
        let third = chain.next().unwrap();
        assert_eq!(rbt.name_of(third), name("b.example.com."));
        assert!(chain.next().is_none());
        assert_eq!(rbt.name_of(chain.prev().unwrap()), name("a.example.com."));
    }

    #[test]
    fn delete_name_removes_subtree() {
        let mut rbt = Rbt::new();
        rbt.add_node(&name("www.example.com."));
        rbt.add_node(&name("example.com."));
        rbt.delete_name(&name("www.example.com.")).unwrap();
        let result = rbt.find_node(&name("www.example.com."), FindOptions::default(), |_, _| FindCallbackResult::Continue);
        assert!(matches!(result, FindResult::Partial { .. } | FindResult::NotFound));
        // The sibling survives.
        let result = rbt.find_node(&name("example.com."), FindOptions::default(), |_, _| FindCallbackResult::Continue);
        assert!(matches!(result, FindResult::Exact(_)));
    }

    #[test]
    fn find_callback_can_stop_partial() {
        let mut rbt = Rbt::new();
        rbt.add_node(&name("example.com."));
        rbt.add_node(&name("sub.example.com."));
        let result = rbt.find_node(&name("www.sub.example.com."), FindOptions::default(), |_, node| {
            if node.label() == b"sub" {
                FindCallbackResult::StopPartial
            } else {
                FindCallbackResult::Continue
            }
        });
        match result {
            FindResult::Partial { labels_matched, .. } => assert_eq!(labels_matched, 2),
            other => panic!("expected Partial, got {other:?}"),
        }
    }
}
