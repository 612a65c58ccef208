// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Id resolution: where a structural mutation lands in the cache.
//!
//! A driver describes the reference node with a [`RefNode`], read from the
//! native widget, and gets back the id to hand to the [`NodeCache`](crate::NodeCache).
//!
//! | Operation | Reference | New id |
//! |---|---|---|
//! | add or insert with no reference | none | `0` |
//! | [`Placement::Add`] | branch | `r + 1` (first child) |
//! | [`Placement::Add`] | leaf | `r + 1` (next sibling) |
//! | [`Placement::Insert`] | any | `r + 1 + descendants` (next sibling) |
//! | move/copy | expanded branch | `r + 1` (first child) |
//! | move/copy | collapsed branch | `r + 1 + descendants` (next sibling) |
//! | move/copy | leaf | `r + 1` (next sibling) |
//!
//! A leaf has no descendants, so for leaves every rule reduces to `r + 1`.

use crate::types::{NodeKind, Placement, RelocateMode};

/// What a driver knows about a reference node at the time of a mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RefNode {
    /// Node id of the reference.
    pub id: usize,
    /// Kind of the reference node.
    pub kind: NodeKind,
    /// Whether the reference branch is expanded. Ignored for leaves.
    pub expanded: bool,
    /// Total number of descendants under the reference (not just direct children).
    pub descendants: usize,
}

impl RefNode {
    /// A leaf reference.
    pub const fn leaf(id: usize) -> Self {
        Self {
            id,
            kind: NodeKind::Leaf,
            expanded: false,
            descendants: 0,
        }
    }

    /// A branch reference.
    pub const fn branch(id: usize, expanded: bool, descendants: usize) -> Self {
        Self {
            id,
            kind: NodeKind::Branch,
            expanded,
            descendants,
        }
    }

    /// Id just past the reference's subtree.
    pub const fn subtree_end(&self) -> usize {
        self.id + 1 + self.descendants
    }
}

/// True when adding with `placement` makes the new node the first child of `reference`.
///
/// Otherwise the new node becomes the next sibling of `reference`.
pub fn adds_as_child(reference: &RefNode, placement: Placement) -> bool {
    placement == Placement::Add && reference.kind.is_branch()
}

/// Id of a node added next to `reference`.
///
/// `None` means the tree is empty or the node goes in front of the very first node.
pub fn add_position(reference: Option<&RefNode>, placement: Placement) -> usize {
    let Some(reference) = reference else {
        return 0;
    };
    if adds_as_child(reference, placement) {
        reference.id + 1
    } else {
        reference.subtree_end()
    }
}

/// True when a subtree dropped on `dst` becomes its first child.
///
/// Only expanded branches accept dropped nodes as children; anything else
/// gets them as its next sibling.
pub fn relocates_as_child(dst: &RefNode) -> bool {
    dst.kind.is_branch() && dst.expanded
}

/// Insertion point for a subtree moved or copied onto `dst`.
///
/// The result is expressed in the numbering before the operation, as
/// [`NodeCache::relocate`](crate::NodeCache::relocate) expects.
pub fn relocation_position(dst: &RefNode) -> usize {
    if relocates_as_child(dst) {
        dst.id + 1
    } else {
        dst.subtree_end()
    }
}

/// True if `dst` lies strictly inside the subtree `src..src + count`.
pub fn overlaps(src: usize, count: usize, dst: usize) -> bool {
    dst > src && dst < src + count
}

/// True if moving `src..src + count` before `dst` would leave the tree unchanged.
pub fn is_noop_move(src: usize, count: usize, dst: usize) -> bool {
    dst == src || dst == src + count
}

/// Id of the relocated subtree's first node once the operation is done.
pub fn final_position(src: usize, count: usize, dst: usize, mode: RelocateMode) -> usize {
    match mode {
        RelocateMode::Move if is_noop_move(src, count, dst) => src,
        RelocateMode::Move if src < dst => dst - count,
        RelocateMode::Move | RelocateMode::Copy => dst,
    }
}
