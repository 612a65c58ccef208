// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared by the cache and the id resolution rules.

/// Kind of a tree node.
///
/// The kind lives in the native widget's own node representation; the cache
/// never stores it. It only matters to [id resolution](crate::resolve), since
/// only branches can absorb new nodes as children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A node that may have zero or more children.
    Branch,
    /// A node that never has children.
    #[default]
    Leaf,
}

impl NodeKind {
    /// Returns true for [`NodeKind::Branch`].
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Branch)
    }
}

/// Policy used when adding a node next to a reference node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// A branch reference absorbs the new node as its first child.
    /// A leaf reference gets the new node as its next sibling.
    Add,
    /// The new node always becomes the next sibling of the reference,
    /// regardless of the reference's kind.
    Insert,
}

/// Whether a relocation keeps the source subtree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RelocateMode {
    /// The subtree leaves its old position.
    Move,
    /// The subtree is duplicated; copies start with empty user data.
    Copy,
}

/// One cache slot: the node's native handle plus application data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<H, U> {
    /// Opaque native handle. Compared and stored, never dereferenced.
    pub handle: H,
    /// Application data attached to the node, if any.
    pub user_data: Option<U>,
}

impl<H, U> CacheEntry<H, U> {
    /// An entry for a freshly added node: no user data.
    pub const fn new(handle: H) -> Self {
        Self {
            handle,
            user_data: None,
        }
    }
}
