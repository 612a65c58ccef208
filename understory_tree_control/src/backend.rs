// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The contract between [`TreeControl`](crate::TreeControl) and a native tree widget.
//!
//! One implementation exists per native toolkit. The control never sees the
//! toolkit; it only asks the backend to perform structural mutations and to
//! report the current shape of the tree, which is the source of truth for
//! every id computation.
//!
//! Handles are opaque. A backend may hand out new handles for nodes it
//! recreates (for example when a toolkit implements move as copy + delete);
//! the control refreshes its cache after every relocation.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use understory_node_cache::{NodeKind, RelocateMode};

/// Where a new or relocated node is linked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Anchor<H> {
    /// In front of the very first top-level node.
    First,
    /// As the first child of the given branch.
    FirstChildOf(H),
    /// As the next sibling of the given node, after its whole subtree.
    After(H),
}

/// Which image a node shows, depending on its kind and expand state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    /// Leaves and collapsed branches.
    Normal,
    /// Expanded branches.
    Expanded,
}

/// A callback the native widget raised synchronously.
///
/// Backends queue these as they happen; the control drains them with
/// [`NativeTreeBackend::take_events`] and either dispatches or suppresses them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NativeEvent<H> {
    /// A node's selection state changed.
    SelectionChanged {
        /// Affected node.
        node: H,
        /// New selection state.
        selected: bool,
    },
    /// A branch was expanded.
    BranchOpened(H),
    /// A branch was collapsed.
    BranchClosed(H),
}

/// Operations a native tree widget provides to the control.
///
/// Methods taking a handle assume it is live. Queries on a stale handle
/// return neutral values (an empty leaf with no children); mutations on a
/// stale handle do nothing.
pub trait NativeTreeBackend {
    /// Opaque node reference.
    type Handle: Copy + Eq + Debug;

    /// Create a node at `anchor` and return its handle.
    fn insert(&mut self, anchor: Anchor<Self::Handle>, kind: NodeKind, title: &str)
    -> Self::Handle;

    /// Remove `node` together with its whole subtree.
    fn remove(&mut self, node: Self::Handle);

    /// Move or copy the subtree rooted at `node` to `anchor`.
    ///
    /// Returns the handle of the relocated (or newly created) subtree root.
    /// The anchor is never inside the subtree.
    fn relocate(
        &mut self,
        node: Self::Handle,
        anchor: Anchor<Self::Handle>,
        mode: RelocateMode,
    ) -> Self::Handle;

    /// True if `node` refers to a live node.
    fn contains(&self, node: Self::Handle) -> bool;

    /// Parent of `node`, `None` for top-level nodes.
    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Direct children of `node` in order, or the top-level nodes for `None`.
    fn children(&self, node: Option<Self::Handle>) -> Vec<Self::Handle>;

    /// Number of direct children of `node`.
    fn child_count(&self, node: Self::Handle) -> usize {
        self.children(Some(node)).len()
    }

    /// Number of descendants of `node` at any depth.
    fn total_child_count(&self, node: Self::Handle) -> usize {
        self.children(Some(node))
            .into_iter()
            .map(|child| 1 + self.total_child_count(child))
            .sum()
    }

    /// Kind of `node`.
    fn kind(&self, node: Self::Handle) -> NodeKind;

    /// Whether the branch `node` is expanded.
    fn is_expanded(&self, node: Self::Handle) -> bool;

    /// Expand or collapse the branch `node`.
    fn set_expanded(&mut self, node: Self::Handle, expanded: bool);

    /// Whether `node` is selected.
    fn is_selected(&self, node: Self::Handle) -> bool;

    /// Select or deselect `node`.
    fn set_selected(&mut self, node: Self::Handle, selected: bool);

    /// Whether the toggle (check box) of `node` is on.
    fn is_toggled(&self, node: Self::Handle) -> bool;

    /// Switch the toggle of `node`.
    fn set_toggled(&mut self, node: Self::Handle, on: bool);

    /// Text shown for `node`.
    fn title(&self, node: Self::Handle) -> &str;

    /// Replace the text shown for `node`.
    fn set_title(&mut self, node: Self::Handle, title: &str);

    /// Image name set on `node` for `slot`, if it overrides the default.
    fn image(&self, node: Self::Handle, slot: ImageSlot) -> Option<&str>;

    /// Override (or with `None`, reset) the image of `node` for `slot`.
    fn set_image(&mut self, node: Self::Handle, slot: ImageSlot, image: Option<String>);

    /// Drain the callbacks raised since the last call.
    fn take_events(&mut self) -> Vec<NativeEvent<Self::Handle>>;
}
