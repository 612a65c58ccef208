// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_node_cache --heading-base-level=0

//! Understory Node Cache: positional node ids for tree controls.
//!
//! A tree control addresses its nodes by integer **node id**: the node's position in a
//! depth-first pre-order walk of all live nodes. The native widget that stores the nodes
//! only knows its own opaque handles, and is free to reorganize itself at any time.
//! This crate keeps the mapping between the two.
//!
//! - [`NodeCache`]: a dense array of `{handle, user_data}` indexed by node id, with
//!   insert, remove and subtree relocate (move/copy) splices.
//! - [`resolve`]: the rules that turn "add next to node `r`" or "drop onto node `r`"
//!   into the id range the cache must splice.
//!
//! The cache never looks inside a handle. Drivers perform the native mutation first,
//! read whatever they need from the native widget (node kind, expand state, descendant
//! count), resolve the id, and then apply the same mutation to the cache.
//!
//! ## Invariants
//!
//! - Order: cache order is always the pre-order of the native tree.
//! - Density: ids `0..len` are populated; spare slots beyond `len` are cleared.
//! - One entry per live node, one live node per entry.
//!
//! ## Cost model
//!
//! Splices and lookups are linear. Trees in UI controls hold hundreds to low
//! thousands of nodes, where a flat array beats any indexed structure that would
//! have to be patched on every splice.
//!
//! # Example
//!
//! ```rust
//! use understory_node_cache::{NodeCache, NodeKind, Placement, RefNode, RelocateMode, resolve};
//!
//! // Handles are whatever the native widget hands out; plain integers here.
//! let mut cache: NodeCache<u32, &str> = NodeCache::new();
//!
//! // root, with two leaves added under it.
//! cache.insert(resolve::add_position(None, Placement::Add), 100);
//! let root = RefNode::branch(0, true, 0);
//! cache.insert(resolve::add_position(Some(&root), Placement::Add), 101);
//! let leaf = RefNode::leaf(1);
//! cache.insert(resolve::add_position(Some(&leaf), Placement::Add), 102);
//! assert_eq!(cache.handles(), [100, 101, 102]);
//!
//! // Attach data and look it up again.
//! cache.set_user_data(2, Some("second"));
//! assert_eq!(cache.find_by_user_data(&"second"), Some(2));
//!
//! // Copy leaf 1 after leaf 2: the copy gets a fresh handle and no data.
//! let dst = resolve::relocation_position(&RefNode::leaf(2));
//! let at = cache.relocate(1, dst, 1, RelocateMode::Copy);
//! cache.set_handle(at, 103);
//! assert_eq!(cache.handles(), [100, 101, 102, 103]);
//! assert_eq!(cache.user_data(at), None);
//! # let _ = NodeKind::Leaf;
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod cache;
pub mod resolve;
pub mod types;

pub use cache::{CacheConfig, DEFAULT_GROWTH_STEP, NodeCache};
pub use resolve::RefNode;
pub use types::{CacheEntry, NodeKind, Placement, RelocateMode};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    /// Independent pointer-based tree the cache is checked against.
    #[derive(Default)]
    struct Model {
        nodes: Vec<ModelNode>,
        roots: Vec<u32>,
    }

    struct ModelNode {
        kind: NodeKind,
        expanded: bool,
        parent: Option<u32>,
        children: Vec<u32>,
    }

    impl Model {
        fn node(&self, h: u32) -> &ModelNode {
            &self.nodes[h as usize]
        }

        fn siblings_mut(&mut self, parent: Option<u32>) -> &mut Vec<u32> {
            match parent {
                Some(p) => &mut self.nodes[p as usize].children,
                None => &mut self.roots,
            }
        }

        fn preorder(&self) -> Vec<u32> {
            fn walk(model: &Model, h: u32, out: &mut Vec<u32>) {
                out.push(h);
                for &c in &model.node(h).children {
                    walk(model, c, out);
                }
            }
            let mut out = Vec::new();
            for &r in &self.roots {
                walk(self, r, &mut out);
            }
            out
        }

        fn subtree(&self, h: u32) -> Vec<u32> {
            let mut out = vec![h];
            for &c in &self.node(h).children {
                out.extend(self.subtree(c));
            }
            out
        }

        fn ref_node(&self, id: usize, h: u32) -> RefNode {
            let node = self.node(h);
            RefNode {
                id,
                kind: node.kind,
                expanded: node.expanded,
                descendants: self.subtree(h).len() - 1,
            }
        }

        fn alloc(&mut self, kind: NodeKind) -> u32 {
            self.nodes.push(ModelNode {
                kind,
                expanded: true,
                parent: None,
                children: Vec::new(),
            });
            (self.nodes.len() - 1) as u32
        }

        /// Link `h` as first child of `anchor`, after `anchor`, or first root.
        fn link(&mut self, h: u32, anchor: Option<(u32, bool)>) {
            let (parent, index) = match anchor {
                None => (None, 0),
                Some((a, true)) => (Some(a), 0),
                Some((a, false)) => {
                    let parent = self.node(a).parent;
                    let index = self
                        .siblings_mut(parent)
                        .iter()
                        .position(|&s| s == a)
                        .unwrap();
                    (parent, index + 1)
                }
            };
            self.nodes[h as usize].parent = parent;
            self.siblings_mut(parent).insert(index, h);
        }

        fn unlink(&mut self, h: u32) {
            let parent = self.node(h).parent;
            self.siblings_mut(parent).retain(|&s| s != h);
            self.nodes[h as usize].parent = None;
        }

        fn deep_clone(&mut self, h: u32) -> u32 {
            let kind = self.node(h).kind;
            let expanded = self.node(h).expanded;
            let children = self.node(h).children.clone();
            let copy = self.alloc(kind);
            self.nodes[copy as usize].expanded = expanded;
            for c in children {
                let cc = self.deep_clone(c);
                self.nodes[cc as usize].parent = Some(copy);
                self.nodes[copy as usize].children.push(cc);
            }
            copy
        }
    }

    struct Rng(u64);

    impl Rng {
        fn next_u64(&mut self) -> u64 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            self.0 = x;
            x
        }

        fn below(&mut self, n: usize) -> usize {
            (self.next_u64() % n as u64) as usize
        }
    }

    fn assert_in_sync(cache: &NodeCache<u32, u32>, model: &Model) {
        assert_eq!(cache.handles(), model.preorder(), "cache order must be pre-order");
        assert!(cache.is_dense());
        for entry in cache.iter() {
            assert_eq!(entry.user_data, Some(entry.handle), "user data follows its node");
        }
    }

    /// Builds `[root, leaf1, leaf2, branch, grandleaf]` the way a driver would.
    fn scenario_tree() -> (NodeCache<u32, u32>, Model) {
        let mut cache = NodeCache::new();
        let mut model = Model::default();
        let steps = [
            (None, NodeKind::Branch),
            (Some(0), NodeKind::Leaf),
            (Some(1), NodeKind::Leaf),
            (Some(2), NodeKind::Branch),
            (Some(3), NodeKind::Leaf),
        ];
        for (reference, kind) in steps {
            let reference =
                reference.map(|id| model.ref_node(id, cache.handle(id).unwrap()));
            let id = resolve::add_position(reference.as_ref(), Placement::Add);
            let h = model.alloc(kind);
            let anchor = reference.map(|r| {
                let rh = cache.handle(r.id).unwrap();
                (rh, resolve::adds_as_child(&r, Placement::Add))
            });
            model.link(h, anchor);
            cache.insert(id, h);
            cache.set_user_data(id, Some(h));
            assert_eq!(id, h as usize);
        }
        (cache, model)
    }

    fn move_leaf1_onto_branch(expanded: bool) -> Vec<u32> {
        let (mut cache, mut model) = scenario_tree();
        model.nodes[3].expanded = expanded;
        let dst = model.ref_node(3, 3);
        let pos = resolve::relocation_position(&dst);
        model.unlink(1);
        model.link(1, Some((3, resolve::relocates_as_child(&dst))));
        let first = cache.relocate(1, pos, 1, RelocateMode::Move);
        assert_eq!(first, resolve::final_position(1, 1, pos, RelocateMode::Move));
        assert_in_sync(&cache, &model);
        cache.handles()
    }

    #[test]
    fn scenario_build_then_move_into_expanded_branch() {
        let (cache, model) = scenario_tree();
        assert_eq!(cache.handles(), vec![0, 1, 2, 3, 4]);
        assert_in_sync(&cache, &model);
        // leaf1 becomes the branch's first child, ahead of grandleaf.
        assert_eq!(move_leaf1_onto_branch(true), vec![0, 2, 3, 1, 4]);
    }

    #[test]
    fn move_onto_collapsed_branch_lands_after_its_subtree() {
        assert_eq!(move_leaf1_onto_branch(false), vec![0, 2, 3, 4, 1]);
    }

    #[test]
    fn delete_children_closes_range() {
        // root, a(branch), b(branch under a), c, d (under b), e (after a)
        let mut cache: NodeCache<u32, u32> = NodeCache::new();
        for (id, h) in [0, 1, 2, 3, 4, 5].into_iter().enumerate() {
            cache.insert(id, h);
        }
        // a has three descendants: b and two grandchildren.
        let a = RefNode::branch(1, true, 3);
        cache.remove(a.id + 1, a.descendants);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.handles(), vec![0, 1, 5]);
        assert_eq!(cache.find_by_handle(5), Some(2));
        assert!(cache.is_dense());
    }

    #[test]
    fn add_then_delete_round_trips() {
        let (mut cache, _model) = scenario_tree();
        let before = cache.clone();
        // Add a three node subtree after leaf2.
        cache.insert(3, 10);
        cache.insert(4, 11);
        cache.insert(5, 12);
        cache.remove(3, 3);
        assert_eq!(cache.handles(), before.handles());
        for id in 0..cache.len() {
            assert_eq!(cache.user_data(id), before.user_data(id));
        }
    }

    #[test]
    fn random_operations_match_reference_tree() {
        let mut rng = Rng(0x5EED_CAFE_F00D_BEEF);
        let mut cache: NodeCache<u32, u32> = NodeCache::new();
        let mut model = Model::default();

        for _ in 0..2000 {
            let len = cache.len();
            match rng.below(8) {
                0..=3 => {
                    let kind = if rng.below(3) == 0 {
                        NodeKind::Leaf
                    } else {
                        NodeKind::Branch
                    };
                    let placement = if rng.below(2) == 0 {
                        Placement::Add
                    } else {
                        Placement::Insert
                    };
                    let reference = if len == 0 || rng.below(10) == 0 {
                        None
                    } else {
                        let id = rng.below(len);
                        Some(model.ref_node(id, cache.handle(id).unwrap()))
                    };
                    let id = resolve::add_position(reference.as_ref(), placement);
                    let h = model.alloc(kind);
                    let anchor = reference.map(|r| {
                        (
                            cache.handle(r.id).unwrap(),
                            resolve::adds_as_child(&r, placement),
                        )
                    });
                    model.link(h, anchor);
                    cache.insert(id, h);
                    cache.set_user_data(id, Some(h));
                }
                4 if len > 8 => {
                    let id = rng.below(len);
                    let h = cache.handle(id).unwrap();
                    let count = model.subtree(h).len();
                    model.unlink(h);
                    cache.remove(id, count);
                }
                5 | 6 if len > 1 => {
                    let src = rng.below(len);
                    let dst = rng.below(len);
                    let src_h = cache.handle(src).unwrap();
                    let dst_h = cache.handle(dst).unwrap();
                    let count = model.subtree(src_h).len();
                    if dst == src || resolve::overlaps(src, count, dst) {
                        continue;
                    }
                    let dst_ref = model.ref_node(dst, dst_h);
                    let pos = resolve::relocation_position(&dst_ref);
                    if resolve::overlaps(src, count, pos) {
                        continue;
                    }
                    let as_child = resolve::relocates_as_child(&dst_ref);
                    let mode = if rng.below(2) == 0 {
                        RelocateMode::Move
                    } else {
                        RelocateMode::Copy
                    };
                    match mode {
                        RelocateMode::Move => {
                            let before = cache.clone();
                            model.unlink(src_h);
                            model.link(src_h, Some((dst_h, as_child)));
                            let first = cache.relocate(src, pos, count, mode);
                            assert_eq!(first, resolve::final_position(src, count, pos, mode));
                            if resolve::is_noop_move(src, count, pos) {
                                assert_eq!(cache, before);
                            }
                        }
                        RelocateMode::Copy => {
                            let copy = model.deep_clone(src_h);
                            model.link(copy, Some((dst_h, as_child)));
                            let first = cache.relocate(src, pos, count, mode);
                            assert_eq!(first, pos);
                            for (offset, h) in model.subtree(copy).into_iter().enumerate() {
                                assert_eq!(cache.user_data(first + offset), None);
                                cache.set_handle(first + offset, h);
                                cache.set_user_data(first + offset, Some(h));
                            }
                        }
                    }
                }
                7 if len > 0 => {
                    let h = cache.handle(rng.below(len)).unwrap();
                    let node = &mut model.nodes[h as usize];
                    node.expanded = !node.expanded;
                }
                _ => {}
            }
            assert_in_sync(&cache, &model);
        }
    }
}
