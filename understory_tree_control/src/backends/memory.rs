// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory tree widget: a generational slot arena with ordered child links.
//!
//! Behaves like a native widget as far as the control can tell: handles are
//! opaque, a removed node's handle goes stale and never aliases a later node,
//! and state changes raise [`NativeEvent`]s synchronously.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec::Vec;

use understory_node_cache::{NodeKind, RelocateMode};

use crate::backend::{Anchor, ImageSlot, NativeEvent, NativeTreeBackend};

/// Handle of a node in a [`MemoryBackend`] (slot index and generation).
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; handles that pointed to it are now stale.
/// - On reuse of a freed slot, its generation is incremented.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MemoryHandle(u32, u32);

impl MemoryHandle {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node widget state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeState: u8 {
        /// Branch is expanded.
        const EXPANDED = 0b0000_0001;
        /// Node is selected.
        const SELECTED = 0b0000_0010;
        /// Node's toggle is on.
        const TOGGLED  = 0b0000_0100;
    }
}

impl Default for NodeState {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<MemoryHandle>,
    children: Vec<MemoryHandle>,
    kind: NodeKind,
    title: String,
    state: NodeState,
    image: Option<String>,
    image_expanded: Option<String>,
}

impl Node {
    fn new(kind: NodeKind, title: &str) -> Self {
        Self {
            generation: 0,
            parent: None,
            children: Vec::new(),
            kind,
            title: title.to_owned(),
            state: NodeState::empty(),
            image: None,
            image_expanded: None,
        }
    }
}

/// A tree widget that lives entirely in memory.
#[derive(Default)]
pub struct MemoryBackend {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Vec<MemoryHandle>,
    events: Vec<NativeEvent<MemoryHandle>>,
}

impl core::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("roots", &self.roots.len())
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl MemoryBackend {
    /// Create an empty widget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True when the widget holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns true if `node` refers to a live node.
    pub fn is_alive(&self, node: MemoryHandle) -> bool {
        self.node(node).is_some()
    }

    /// State flags of `node`; empty for stale handles.
    pub fn state(&self, node: MemoryHandle) -> NodeState {
        self.node(node).map(|n| n.state).unwrap_or_default()
    }

    fn node(&self, id: MemoryHandle) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_mut(&mut self, id: MemoryHandle) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn alloc(&mut self, mut node: Node) -> MemoryHandle {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            (idx, generation)
        } else {
            let generation = 1_u32;
            node.generation = generation;
            self.nodes.push(Some(node));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "MemoryHandle uses 32-bit indices by design."
        )]
        let idx = idx as u32;
        MemoryHandle::new(idx, generation)
    }

    fn siblings_mut(&mut self, parent: Option<MemoryHandle>) -> Option<&mut Vec<MemoryHandle>> {
        match parent {
            Some(p) => self.node_mut(p).map(|n| &mut n.children),
            None => Some(&mut self.roots),
        }
    }

    fn link(&mut self, id: MemoryHandle, anchor: Anchor<MemoryHandle>) {
        let (parent, index) = match anchor {
            Anchor::First => (None, Some(0)),
            Anchor::FirstChildOf(p) if self.is_alive(p) => (Some(p), Some(0)),
            Anchor::After(s) if self.is_alive(s) => {
                let parent = self.node(s).and_then(|n| n.parent);
                let index = self
                    .siblings_mut(parent)
                    .and_then(|siblings| siblings.iter().position(|c| *c == s));
                (parent, index.map(|i| i + 1))
            }
            Anchor::FirstChildOf(_) | Anchor::After(_) => {
                log::warn!("stale anchor {anchor:?}; linking {id:?} at the top level");
                (None, None)
            }
        };
        if let Some(node) = self.node_mut(id) {
            node.parent = parent;
        }
        if let Some(siblings) = self.siblings_mut(parent) {
            let index = index.unwrap_or(siblings.len()).min(siblings.len());
            siblings.insert(index, id);
        }
    }

    fn unlink(&mut self, id: MemoryHandle) {
        let parent = self.node(id).and_then(|n| n.parent);
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    fn free_subtree(&mut self, id: MemoryHandle) {
        let Some(node) = self.node(id) else {
            return;
        };
        let children = node.children.clone();
        let selected = node.state.contains(NodeState::SELECTED);
        for child in children {
            self.free_subtree(child);
        }
        if selected {
            self.events.push(NativeEvent::SelectionChanged {
                node: id,
                selected: false,
            });
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Duplicate the subtree under `id`, unlinked. Copies are never selected.
    fn clone_subtree(&mut self, id: MemoryHandle) -> Option<MemoryHandle> {
        let source = self.node(id)?;
        let mut copy = Node::new(source.kind, &source.title);
        copy.state = source.state - NodeState::SELECTED;
        copy.image.clone_from(&source.image);
        copy.image_expanded.clone_from(&source.image_expanded);
        let children = source.children.clone();
        let root = self.alloc(copy);
        for child in children {
            if let Some(child_copy) = self.clone_subtree(child) {
                if let Some(node) = self.node_mut(child_copy) {
                    node.parent = Some(root);
                }
                if let Some(node) = self.node_mut(root) {
                    node.children.push(child_copy);
                }
            }
        }
        Some(root)
    }

    fn set_flag(&mut self, id: MemoryHandle, flag: NodeState, on: bool) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.state.contains(flag) == on {
            return false;
        }
        node.state.set(flag, on);
        true
    }
}

impl NativeTreeBackend for MemoryBackend {
    type Handle = MemoryHandle;

    fn insert(
        &mut self,
        anchor: Anchor<MemoryHandle>,
        kind: NodeKind,
        title: &str,
    ) -> MemoryHandle {
        let id = self.alloc(Node::new(kind, title));
        self.link(id, anchor);
        id
    }

    fn remove(&mut self, node: MemoryHandle) {
        if !self.is_alive(node) {
            return;
        }
        self.unlink(node);
        self.free_subtree(node);
    }

    fn relocate(
        &mut self,
        node: MemoryHandle,
        anchor: Anchor<MemoryHandle>,
        mode: RelocateMode,
    ) -> MemoryHandle {
        match mode {
            RelocateMode::Move => {
                if self.is_alive(node) {
                    self.unlink(node);
                    self.link(node, anchor);
                }
                node
            }
            RelocateMode::Copy => match self.clone_subtree(node) {
                Some(copy) => {
                    self.link(copy, anchor);
                    copy
                }
                None => node,
            },
        }
    }

    fn contains(&self, node: MemoryHandle) -> bool {
        self.is_alive(node)
    }

    fn parent(&self, node: MemoryHandle) -> Option<MemoryHandle> {
        self.node(node)?.parent
    }

    fn children(&self, node: Option<MemoryHandle>) -> Vec<MemoryHandle> {
        match node {
            Some(id) => self.node(id).map(|n| n.children.clone()).unwrap_or_default(),
            None => self.roots.clone(),
        }
    }

    fn child_count(&self, node: MemoryHandle) -> usize {
        self.node(node).map_or(0, |n| n.children.len())
    }

    fn kind(&self, node: MemoryHandle) -> NodeKind {
        self.node(node).map(|n| n.kind).unwrap_or_default()
    }

    fn is_expanded(&self, node: MemoryHandle) -> bool {
        self.state(node).contains(NodeState::EXPANDED)
    }

    fn set_expanded(&mut self, node: MemoryHandle, expanded: bool) {
        if !self.kind(node).is_branch() {
            return;
        }
        if self.set_flag(node, NodeState::EXPANDED, expanded) {
            self.events.push(if expanded {
                NativeEvent::BranchOpened(node)
            } else {
                NativeEvent::BranchClosed(node)
            });
        }
    }

    fn is_selected(&self, node: MemoryHandle) -> bool {
        self.state(node).contains(NodeState::SELECTED)
    }

    fn set_selected(&mut self, node: MemoryHandle, selected: bool) {
        if self.set_flag(node, NodeState::SELECTED, selected) {
            self.events
                .push(NativeEvent::SelectionChanged { node, selected });
        }
    }

    fn is_toggled(&self, node: MemoryHandle) -> bool {
        self.state(node).contains(NodeState::TOGGLED)
    }

    fn set_toggled(&mut self, node: MemoryHandle, on: bool) {
        self.set_flag(node, NodeState::TOGGLED, on);
    }

    fn title(&self, node: MemoryHandle) -> &str {
        self.node(node).map_or("", |n| n.title.as_str())
    }

    fn set_title(&mut self, node: MemoryHandle, title: &str) {
        if let Some(n) = self.node_mut(node) {
            title.clone_into(&mut n.title);
        }
    }

    fn image(&self, node: MemoryHandle, slot: ImageSlot) -> Option<&str> {
        let n = self.node(node)?;
        match slot {
            ImageSlot::Normal => n.image.as_deref(),
            ImageSlot::Expanded => n.image_expanded.as_deref(),
        }
    }

    fn set_image(&mut self, node: MemoryHandle, slot: ImageSlot, image: Option<String>) {
        if let Some(n) = self.node_mut(node) {
            match slot {
                ImageSlot::Normal => n.image = image,
                ImageSlot::Expanded => n.image_expanded = image,
            }
        }
    }

    fn take_events(&mut self) -> Vec<NativeEvent<MemoryHandle>> {
        core::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn titles(backend: &MemoryBackend, parent: Option<MemoryHandle>) -> Vec<&str> {
        backend
            .children(parent)
            .into_iter()
            .map(|h| backend.title(h))
            .collect()
    }

    #[test]
    fn anchors_place_nodes() {
        let mut b = MemoryBackend::new();
        let root = b.insert(Anchor::First, NodeKind::Branch, "root");
        let x = b.insert(Anchor::FirstChildOf(root), NodeKind::Leaf, "x");
        let _z = b.insert(Anchor::After(x), NodeKind::Leaf, "z");
        let _y = b.insert(Anchor::After(x), NodeKind::Leaf, "y");
        let _w = b.insert(Anchor::FirstChildOf(root), NodeKind::Leaf, "w");
        let _top = b.insert(Anchor::First, NodeKind::Leaf, "top");
        assert_eq!(titles(&b, Some(root)), vec!["w", "x", "y", "z"]);
        assert_eq!(titles(&b, None), vec!["top", "root"]);
        assert_eq!(b.parent(x), Some(root));
        assert_eq!(b.total_child_count(root), 4);
        assert_eq!(b.child_count(root), 4);
    }

    #[test]
    fn remove_frees_subtree_and_stales_handles() {
        let mut b = MemoryBackend::new();
        let root = b.insert(Anchor::First, NodeKind::Branch, "root");
        let a = b.insert(Anchor::FirstChildOf(root), NodeKind::Branch, "a");
        let a1 = b.insert(Anchor::FirstChildOf(a), NodeKind::Leaf, "a1");
        b.remove(a);
        assert!(!b.contains(a));
        assert!(!b.contains(a1));
        assert_eq!(b.len(), 1);

        // Slot reuse bumps the generation; old handles stay stale.
        let c = b.insert(Anchor::FirstChildOf(root), NodeKind::Leaf, "c");
        assert!(b.contains(c));
        assert!(!b.contains(a) && !b.contains(a1));
        if a1.0 == c.0 {
            assert!(c.1 > a1.1, "generation must increase on reuse");
        }
        assert_eq!(b.title(a), "");
        assert_eq!(b.kind(a), NodeKind::Leaf);
    }

    #[test]
    fn move_keeps_handles_copy_duplicates() {
        let mut b = MemoryBackend::new();
        let root = b.insert(Anchor::First, NodeKind::Branch, "root");
        let a = b.insert(Anchor::FirstChildOf(root), NodeKind::Branch, "a");
        let _a1 = b.insert(Anchor::FirstChildOf(a), NodeKind::Leaf, "a1");
        let c = b.insert(Anchor::After(a), NodeKind::Leaf, "c");
        b.set_selected(a, true);

        let moved = b.relocate(a, Anchor::After(c), RelocateMode::Move);
        assert_eq!(moved, a);
        assert_eq!(titles(&b, Some(root)), vec!["c", "a"]);

        let copy = b.relocate(a, Anchor::First, RelocateMode::Copy);
        assert_ne!(copy, a);
        assert_eq!(titles(&b, None), vec!["a", "root"]);
        assert_eq!(titles(&b, Some(copy)), vec!["a1"]);
        assert!(b.is_selected(a));
        assert!(!b.is_selected(copy), "copies are never selected");
    }

    #[test]
    fn copy_into_own_empty_branch() {
        let mut b = MemoryBackend::new();
        let a = b.insert(Anchor::First, NodeKind::Branch, "a");
        let copy = b.relocate(a, Anchor::FirstChildOf(a), RelocateMode::Copy);
        assert_eq!(b.children(Some(a)), vec![copy]);
        assert_eq!(b.child_count(copy), 0);
    }

    #[test]
    fn state_changes_raise_events() {
        let mut b = MemoryBackend::new();
        let root = b.insert(Anchor::First, NodeKind::Branch, "root");
        let leaf = b.insert(Anchor::FirstChildOf(root), NodeKind::Leaf, "leaf");
        b.set_expanded(root, true);
        b.set_expanded(root, true);
        b.set_expanded(leaf, true);
        b.set_selected(leaf, true);
        assert_eq!(
            b.take_events(),
            vec![
                NativeEvent::BranchOpened(root),
                NativeEvent::SelectionChanged {
                    node: leaf,
                    selected: true
                },
            ]
        );
        assert!(!b.is_expanded(leaf), "leaves never expand");

        b.remove(root);
        assert_eq!(
            b.take_events(),
            vec![NativeEvent::SelectionChanged {
                node: leaf,
                selected: false
            }]
        );
        assert!(b.take_events().is_empty());
        assert!(b.is_empty());
    }

    #[test]
    fn titles_images_and_toggles() {
        let mut b = MemoryBackend::new();
        let n = b.insert(Anchor::First, NodeKind::Leaf, "old");
        b.set_title(n, "new");
        assert_eq!(b.title(n), "new");
        b.set_image(n, ImageSlot::Normal, Some("IMGFILE".into()));
        assert_eq!(b.image(n, ImageSlot::Normal), Some("IMGFILE"));
        assert_eq!(b.image(n, ImageSlot::Expanded), None);
        b.set_toggled(n, true);
        assert!(b.is_toggled(n));
        assert_eq!(b.state(n), NodeState::TOGGLED);
    }
}
