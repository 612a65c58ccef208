// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree control: native mutations and cache splices in lockstep.
//!
//! Every structural operation follows the same three steps:
//!
//! 1. Read the reference node's shape from the backend and resolve the id range.
//! 2. Perform the native mutation.
//! 3. Apply the matching [`NodeCache`] splice.
//!
//! Events the widget queued before step 2 are dispatched first. Native callbacks
//! raised during steps 2 and 3 are suppressed, since ids are transiently
//! inconsistent there. Programmatic state changes (selection,
//! expansion) are suppressed too; only changes that originate in the widget
//! itself reach the application, through [`TreeControl::pump_events`].

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::ControlFlow;

use understory_node_cache::{
    CacheConfig, NodeCache, NodeKind, Placement, RefNode, RelocateMode, resolve,
};

use crate::attributes::{AttributeKey, AttributeRegistry};
use crate::backend::{Anchor, ImageSlot, NativeEvent, NativeTreeBackend};
use crate::error::TreeError;
use crate::guard::{Reentrancy, Suppress};
use crate::images::DefaultImages;

/// How many nodes can be selected at once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MarkMode {
    /// Selecting a node deselects every other node.
    #[default]
    Single,
    /// Any number of nodes can be selected.
    Multiple,
}

/// Construction-time settings of a [`TreeControl`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Growth policy of the node cache.
    pub cache: CacheConfig,
    /// New branches start expanded.
    pub add_expanded: bool,
    /// Create an empty root branch if the widget starts out empty.
    pub add_root: bool,
    /// Selection policy.
    pub mark_mode: MarkMode,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            add_expanded: true,
            add_root: false,
            mark_mode: MarkMode::Single,
        }
    }
}

/// What [`TreeControl::delete`] removes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    /// The node and its whole subtree.
    Node(usize),
    /// Every descendant of the node; the node itself stays.
    Children(usize),
    /// Every selected node, with its subtree.
    Selected,
    /// The whole tree.
    All,
}

type RemovedCallback<U> = Box<dyn FnMut(usize, Option<&U>)>;
type StateCallback = Box<dyn FnMut(usize, bool)>;

struct Callbacks<U> {
    node_removed: Option<RemovedCallback<U>>,
    selection: Option<StateCallback>,
    branch: Option<StateCallback>,
}

impl<U> Default for Callbacks<U> {
    fn default() -> Self {
        Self {
            node_removed: None,
            selection: None,
            branch: None,
        }
    }
}

/// A tree control over a native backend `B`, with application data `U` per node.
pub struct TreeControl<B: NativeTreeBackend, U = ()> {
    backend: B,
    cache: NodeCache<B::Handle, U>,
    config: TreeConfig,
    callbacks: Callbacks<U>,
    suppress: Reentrancy,
    images: Rc<DefaultImages>,
    attributes: Rc<AttributeRegistry<B, U>>,
}

impl<B: NativeTreeBackend + core::fmt::Debug, U> core::fmt::Debug for TreeControl<B, U> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeControl")
            .field("backend", &self.backend)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .field("suppressing", &self.suppress.is_active())
            .field("has_removed_callback", &self.callbacks.node_removed.is_some())
            .finish_non_exhaustive()
    }
}

impl<B: NativeTreeBackend, U> TreeControl<B, U> {
    /// Map a control onto `backend` with its own default image registry.
    pub fn new(backend: B, config: TreeConfig) -> Self {
        Self::with_images(backend, config, Rc::new(DefaultImages::default()))
    }

    /// Map a control onto `backend`, sharing an existing image registry.
    ///
    /// Nodes already present in the backend are picked up in pre-order.
    pub fn with_images(backend: B, config: TreeConfig, images: Rc<DefaultImages>) -> Self {
        let mut control = Self {
            backend,
            cache: NodeCache::with_config(config.cache),
            config,
            callbacks: Callbacks::default(),
            suppress: Reentrancy::new(),
            images,
            attributes: Rc::new(AttributeRegistry::standard()),
        };
        let existing = preorder(&control.backend);
        control.cache.capacity_ensure(existing.len());
        for (id, handle) in existing.into_iter().enumerate() {
            control.cache.insert(id, handle);
        }
        if control.cache.is_empty() && config.add_root {
            // No reference id to validate, so adding in front of the first node cannot fail.
            match control.add_node(None, NodeKind::Branch, "") {
                Ok(root) => log::debug!("created implicit root node {root}"),
                Err(err) => log::warn!("could not create implicit root: {err}"),
            }
        }
        control
    }

    /// The native backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the native backend.
    ///
    /// Meant for feeding user interaction (clicks, key presses) into the widget.
    /// Structural changes made here bypass the cache and break node ids.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The node cache.
    pub fn cache(&self) -> &NodeCache<B::Handle, U> {
        &self.cache
    }

    /// Settings the control was created with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The shared default image registry.
    pub fn images(&self) -> &Rc<DefaultImages> {
        &self.images
    }

    /// Number of nodes.
    pub fn count(&self) -> usize {
        self.cache.len()
    }

    /// Native handle of node `id`.
    pub fn handle(&self, id: usize) -> Option<B::Handle> {
        self.cache.handle(id)
    }

    /// Node id of a native handle.
    pub fn id_of(&self, handle: B::Handle) -> Option<usize> {
        self.cache.find_by_handle(handle)
    }

    /// Id of the first node carrying `data`.
    pub fn find_user_data(&self, data: &U) -> Option<usize>
    where
        U: PartialEq,
    {
        self.cache.find_by_user_data(data)
    }

    fn live(&self, id: usize) -> Result<B::Handle, TreeError> {
        self.cache.handle(id).ok_or(TreeError::InvalidId(id))
    }

    fn ref_node(&self, id: usize, handle: B::Handle) -> RefNode {
        RefNode {
            id,
            kind: self.backend.kind(handle),
            expanded: self.backend.is_expanded(handle),
            descendants: self.backend.total_child_count(handle),
        }
    }

    // --- structure ---

    /// Add a node next to `reference`; a branch reference takes it as first child.
    ///
    /// With `None` the node goes in front of the very first node. Returns the new id.
    pub fn add_node(
        &mut self,
        reference: Option<usize>,
        kind: NodeKind,
        title: &str,
    ) -> Result<usize, TreeError> {
        self.add_with(reference, Placement::Add, kind, title)
    }

    /// Insert a node as the next sibling of `reference`, whatever its kind.
    ///
    /// With `None` the node goes in front of the very first node. Returns the new id.
    pub fn insert_node(
        &mut self,
        reference: Option<usize>,
        kind: NodeKind,
        title: &str,
    ) -> Result<usize, TreeError> {
        self.add_with(reference, Placement::Insert, kind, title)
    }

    fn add_with(
        &mut self,
        reference: Option<usize>,
        placement: Placement,
        kind: NodeKind,
        title: &str,
    ) -> Result<usize, TreeError> {
        let (anchor, reference) = match reference {
            None => (Anchor::First, None),
            Some(id) => {
                let handle = self.live(id)?;
                let reference = self.ref_node(id, handle);
                let anchor = if resolve::adds_as_child(&reference, placement) {
                    Anchor::FirstChildOf(handle)
                } else {
                    Anchor::After(handle)
                };
                (anchor, Some(reference))
            }
        };
        let id = resolve::add_position(reference.as_ref(), placement);

        let _suppress = self.begin_mutation();
        let handle = self.backend.insert(anchor, kind, title);
        if kind.is_branch() && self.config.add_expanded {
            self.backend.set_expanded(handle, true);
        }
        self.cache.insert(id, handle);
        self.flush_suppressed();
        log::debug!("added {kind:?} node {id} ({placement:?})");
        Ok(id)
    }

    /// Remove nodes. Returns how many nodes were removed.
    ///
    /// If a node-removed callback is registered, it runs for every removed node
    /// before its entry is erased, children before their parent.
    pub fn delete(&mut self, target: DeleteTarget) -> Result<usize, TreeError> {
        let mut removed = 0;
        match target {
            DeleteTarget::Node(id) => {
                let handle = self.live(id)?;
                removed = self.remove_subtree(id, handle);
            }
            DeleteTarget::Children(id) => {
                let handle = self.live(id)?;
                // The first child of `id` is always node `id + 1`.
                while let Some(&child) = self.backend.children(Some(handle)).first() {
                    removed += self.remove_subtree(id + 1, child);
                }
            }
            DeleteTarget::Selected => {
                while let Some(id) = self.first_selected() {
                    let handle = self.live(id)?;
                    removed += self.remove_subtree(id, handle);
                }
            }
            DeleteTarget::All => {
                while let Some(handle) = self.cache.handle(0) {
                    removed += self.remove_subtree(0, handle);
                }
            }
        }
        Ok(removed)
    }

    fn remove_subtree(&mut self, id: usize, handle: B::Handle) -> usize {
        let count = self.backend.total_child_count(handle) + 1;
        if self.callbacks.node_removed.is_some() {
            self.notify_removed(id, handle);
        }
        let _suppress = self.begin_mutation();
        self.backend.remove(handle);
        self.cache.remove(id, count);
        self.flush_suppressed();
        log::debug!("removed node {id} with {} descendants", count - 1);
        count
    }

    fn notify_removed(&mut self, id: usize, handle: B::Handle) {
        let mut order = Vec::new();
        let mut next = id;
        post_order(&self.backend, handle, &mut next, &mut order);
        if let Some(callback) = self.callbacks.node_removed.as_mut() {
            for removed in order {
                callback(removed, self.cache.user_data(removed));
            }
        }
    }

    fn first_selected(&self) -> Option<usize> {
        self.cache
            .iter()
            .position(|entry| self.backend.is_selected(entry.handle))
    }

    /// Move the subtree at `src` onto `dst`. Returns the subtree's new id.
    ///
    /// An expanded branch takes it as first child; anything else gets it as
    /// next sibling (after its whole subtree).
    pub fn move_node(&mut self, src: usize, dst: usize) -> Result<usize, TreeError> {
        self.relocate(src, dst, RelocateMode::Move)
    }

    /// Copy the subtree at `src` onto `dst`. Returns the copy's id.
    ///
    /// Copies start without user data.
    pub fn copy_node(&mut self, src: usize, dst: usize) -> Result<usize, TreeError> {
        self.relocate(src, dst, RelocateMode::Copy)
    }

    fn relocate(&mut self, src: usize, dst: usize, mode: RelocateMode) -> Result<usize, TreeError> {
        let src_handle = self.live(src)?;
        let dst_handle = self.live(dst)?;
        if mode == RelocateMode::Move && src == dst {
            return Ok(src);
        }
        let count = self.backend.total_child_count(src_handle) + 1;
        let target = self.ref_node(dst, dst_handle);
        let position = resolve::relocation_position(&target);
        if resolve::overlaps(src, count, dst) || resolve::overlaps(src, count, position) {
            return Err(TreeError::MoveIntoDescendant { src, dst });
        }
        let anchor = if resolve::relocates_as_child(&target) {
            Anchor::FirstChildOf(dst_handle)
        } else {
            Anchor::After(dst_handle)
        };

        let _suppress = self.begin_mutation();
        let root = self.backend.relocate(src_handle, anchor, mode);
        let first = self.cache.relocate(src, position, count, mode);
        // The backend may have created new native nodes; point the entries at them.
        let mut next = first;
        refresh_handles(&self.backend, &mut self.cache, root, &mut next);
        self.flush_suppressed();
        log::debug!("{mode:?} node {src} ({count} nodes) onto {dst}, now at {first}");
        Ok(first)
    }

    // --- queries ---

    /// Kind of node `id`.
    pub fn kind(&self, id: usize) -> Result<NodeKind, TreeError> {
        Ok(self.backend.kind(self.live(id)?))
    }

    /// Parent id of `id`, `None` for top-level nodes.
    pub fn parent(&self, id: usize) -> Result<Option<usize>, TreeError> {
        let handle = self.live(id)?;
        Ok(self
            .backend
            .parent(handle)
            .and_then(|parent| self.cache.find_by_handle(parent)))
    }

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: usize) -> Result<usize, TreeError> {
        let mut handle = self.live(id)?;
        let mut depth = 0;
        while let Some(parent) = self.backend.parent(handle) {
            depth += 1;
            handle = parent;
        }
        Ok(depth)
    }

    /// Number of direct children of `id`.
    pub fn child_count(&self, id: usize) -> Result<usize, TreeError> {
        Ok(self.backend.child_count(self.live(id)?))
    }

    /// Number of descendants of `id` at any depth.
    pub fn total_child_count(&self, id: usize) -> Result<usize, TreeError> {
        Ok(self.backend.total_child_count(self.live(id)?))
    }

    /// Number of top-level nodes.
    pub fn root_count(&self) -> usize {
        self.backend.children(None).len()
    }

    fn siblings(&self, id: usize) -> Result<(Vec<B::Handle>, usize), TreeError> {
        let handle = self.live(id)?;
        let siblings = self.backend.children(self.backend.parent(handle));
        let index = siblings
            .iter()
            .position(|s| *s == handle)
            .ok_or(TreeError::InvalidId(id))?;
        Ok((siblings, index))
    }

    /// Next sibling of `id`.
    pub fn next(&self, id: usize) -> Result<Option<usize>, TreeError> {
        let (siblings, index) = self.siblings(id)?;
        Ok(siblings.get(index + 1).and_then(|h| self.id_of(*h)))
    }

    /// Previous sibling of `id`.
    pub fn previous(&self, id: usize) -> Result<Option<usize>, TreeError> {
        let (siblings, index) = self.siblings(id)?;
        Ok(index
            .checked_sub(1)
            .and_then(|i| siblings.get(i))
            .and_then(|h| self.id_of(*h)))
    }

    /// First sibling of `id` (possibly `id` itself).
    pub fn first(&self, id: usize) -> Result<Option<usize>, TreeError> {
        let (siblings, _) = self.siblings(id)?;
        Ok(siblings.first().and_then(|h| self.id_of(*h)))
    }

    /// Last sibling of `id` (possibly `id` itself).
    pub fn last(&self, id: usize) -> Result<Option<usize>, TreeError> {
        let (siblings, _) = self.siblings(id)?;
        Ok(siblings.last().and_then(|h| self.id_of(*h)))
    }

    /// Visit `(handle, id)` for every node in id order until `visitor` breaks.
    pub fn for_each<F>(&self, visitor: F) -> ControlFlow<()>
    where
        F: FnMut(B::Handle, usize) -> ControlFlow<()>,
    {
        self.cache.for_each(visitor)
    }

    /// True if the cache matches a fresh pre-order walk of the backend.
    pub fn check_consistency(&self) -> bool {
        self.cache.is_dense() && self.cache.handles() == preorder(&self.backend)
    }

    // --- node state ---

    /// Title of `id`.
    pub fn title(&self, id: usize) -> Result<&str, TreeError> {
        Ok(self.backend.title(self.live(id)?))
    }

    /// Replace the title of `id`.
    pub fn set_title(&mut self, id: usize, title: &str) -> Result<(), TreeError> {
        let handle = self.live(id)?;
        self.backend.set_title(handle, title);
        Ok(())
    }

    /// Whether the branch `id` is expanded; always false for leaves.
    pub fn is_expanded(&self, id: usize) -> Result<bool, TreeError> {
        Ok(self.backend.is_expanded(self.live(id)?))
    }

    /// Expand or collapse the branch `id`. Does not raise the branch callback.
    pub fn set_expanded(&mut self, id: usize, expanded: bool) -> Result<(), TreeError> {
        let handle = self.live(id)?;
        if !self.backend.kind(handle).is_branch() {
            return Err(TreeError::NotABranch(id));
        }
        let _suppress = self.begin_mutation();
        self.backend.set_expanded(handle, expanded);
        self.flush_suppressed();
        Ok(())
    }

    /// Whether `id` is selected.
    pub fn is_selected(&self, id: usize) -> Result<bool, TreeError> {
        Ok(self.backend.is_selected(self.live(id)?))
    }

    /// Select or deselect `id`. Does not raise the selection callback.
    ///
    /// In [`MarkMode::Single`], selecting a node deselects all others.
    pub fn set_selected(&mut self, id: usize, selected: bool) -> Result<(), TreeError> {
        let handle = self.live(id)?;
        let _suppress = self.begin_mutation();
        if selected && self.config.mark_mode == MarkMode::Single {
            for other in self.cache.handles() {
                if other != handle {
                    self.backend.set_selected(other, false);
                }
            }
        }
        self.backend.set_selected(handle, selected);
        self.flush_suppressed();
        Ok(())
    }

    /// Ids of all selected nodes, in id order.
    pub fn selected(&self) -> Vec<usize> {
        self.cache
            .iter()
            .enumerate()
            .filter(|(_, entry)| self.backend.is_selected(entry.handle))
            .map(|(id, _)| id)
            .collect()
    }

    /// Whether the toggle of `id` is on.
    pub fn is_toggled(&self, id: usize) -> Result<bool, TreeError> {
        Ok(self.backend.is_toggled(self.live(id)?))
    }

    /// Switch the toggle of `id`.
    pub fn set_toggled(&mut self, id: usize, on: bool) -> Result<(), TreeError> {
        let handle = self.live(id)?;
        self.backend.set_toggled(handle, on);
        Ok(())
    }

    /// Application data of `id`.
    pub fn user_data(&self, id: usize) -> Option<&U> {
        self.cache.user_data(id)
    }

    /// Mutable application data of `id`.
    pub fn user_data_mut(&mut self, id: usize) -> Option<&mut U> {
        self.cache.user_data_mut(id)
    }

    /// Attach (or detach) application data, returning the previous value.
    pub fn set_user_data(&mut self, id: usize, data: Option<U>) -> Result<Option<U>, TreeError> {
        self.live(id)?;
        Ok(self.cache.set_user_data(id, data))
    }

    /// Image name `id` shows for `slot`: its own, or the registry default.
    pub fn image(&self, id: usize, slot: ImageSlot) -> Result<&str, TreeError> {
        let handle = self.live(id)?;
        let kind = self.backend.kind(handle);
        Ok(self
            .backend
            .image(handle, slot)
            .unwrap_or_else(|| self.images.resolve(kind, slot == ImageSlot::Expanded)))
    }

    /// Image name `id` currently shows, given its kind and expand state.
    pub fn node_image(&self, id: usize) -> Result<&str, TreeError> {
        let handle = self.live(id)?;
        let slot =
            DefaultImages::slot_for(self.backend.kind(handle), self.backend.is_expanded(handle));
        self.image(id, slot)
    }

    /// Override the image of `id` for `slot`; `None` restores the default.
    pub fn set_node_image(
        &mut self,
        id: usize,
        slot: ImageSlot,
        image: Option<String>,
    ) -> Result<(), TreeError> {
        let handle = self.live(id)?;
        self.backend.set_image(handle, slot, image);
        Ok(())
    }

    // --- attributes ---

    /// Resolve an attribute name once, for repeated access by key.
    pub fn attribute_key(&self, name: &str) -> Option<AttributeKey> {
        self.attributes.resolve(name)
    }

    /// Read a node attribute by name. `Ok(None)` if it has no value for `id`.
    pub fn attribute(&self, name: &str, id: usize) -> Result<Option<String>, TreeError> {
        let key = self
            .attribute_key(name)
            .ok_or_else(|| TreeError::UnknownAttribute(name.into()))?;
        self.attribute_by_key(key, id)
    }

    /// Read a node attribute through a resolved key.
    ///
    /// Fails if `key` does not belong to this control's registry.
    pub fn attribute_by_key(
        &self,
        key: AttributeKey,
        id: usize,
    ) -> Result<Option<String>, TreeError> {
        let accessor = self
            .attributes
            .accessor(key)
            .ok_or(TreeError::UnknownAttributeKey(key.index()))?;
        Ok((accessor.get)(self, id))
    }

    /// Write a node attribute by name.
    pub fn set_attribute(&mut self, name: &str, id: usize, value: &str) -> Result<(), TreeError> {
        let key = self
            .attribute_key(name)
            .ok_or_else(|| TreeError::UnknownAttribute(name.into()))?;
        self.set_attribute_by_key(key, id, value)
    }

    /// Write a node attribute through a resolved key.
    pub fn set_attribute_by_key(
        &mut self,
        key: AttributeKey,
        id: usize,
        value: &str,
    ) -> Result<(), TreeError> {
        let accessor = *self
            .attributes
            .accessor(key)
            .ok_or(TreeError::UnknownAttributeKey(key.index()))?;
        let set = accessor
            .set
            .ok_or(TreeError::ReadOnlyAttribute(accessor.name))?;
        set(self, id, value)
    }

    /// Replace the attribute registry, for example to add toolkit-specific attributes.
    pub fn set_attribute_registry(&mut self, registry: Rc<AttributeRegistry<B, U>>) {
        self.attributes = registry;
    }

    // --- callbacks ---

    /// Called for each removed node, children before parent, while its user data is still attached.
    pub fn on_node_removed<F>(&mut self, callback: F)
    where
        F: FnMut(usize, Option<&U>) + 'static,
    {
        self.callbacks.node_removed = Some(Box::new(callback));
    }

    /// Called with `(id, selected)` when the user changes a node's selection.
    pub fn on_selection<F>(&mut self, callback: F)
    where
        F: FnMut(usize, bool) + 'static,
    {
        self.callbacks.selection = Some(Box::new(callback));
    }

    /// Called with `(id, opened)` when the user expands or collapses a branch.
    pub fn on_branch<F>(&mut self, callback: F)
    where
        F: FnMut(usize, bool) + 'static,
    {
        self.callbacks.branch = Some(Box::new(callback));
    }

    /// Dispatch pending native events to the registered callbacks.
    ///
    /// Returns the number of callbacks invoked. Events raised while a mutation
    /// is in progress are dropped.
    pub fn pump_events(&mut self) -> usize {
        let events = self.backend.take_events();
        if self.suppress.is_active() {
            if !events.is_empty() {
                log::debug!("suppressed {} native events during a mutation", events.len());
            }
            return 0;
        }
        let mut dispatched = 0;
        for event in events {
            let (handle, state, callback) = match event {
                NativeEvent::SelectionChanged { node, selected } => {
                    (node, selected, &mut self.callbacks.selection)
                }
                NativeEvent::BranchOpened(node) => (node, true, &mut self.callbacks.branch),
                NativeEvent::BranchClosed(node) => (node, false, &mut self.callbacks.branch),
            };
            let Some(id) = self.cache.find_by_handle(handle) else {
                continue;
            };
            if let Some(callback) = callback.as_mut() {
                callback(id, state);
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Deliver what the user did before this mutation, then start suppressing.
    fn begin_mutation(&mut self) -> Suppress {
        let pending = self.pump_events();
        if pending > 0 {
            log::debug!("dispatched {pending} pending events before a mutation");
        }
        self.suppress.enter()
    }

    fn flush_suppressed(&mut self) {
        debug_assert!(self.suppress.is_active(), "flush outside a mutation");
        let _ = self.pump_events();
    }
}

/// Handles of all nodes in `backend`, in pre-order.
fn preorder<B: NativeTreeBackend>(backend: &B) -> Vec<B::Handle> {
    fn walk<B: NativeTreeBackend>(backend: &B, handle: B::Handle, out: &mut Vec<B::Handle>) {
        out.push(handle);
        for child in backend.children(Some(handle)) {
            walk(backend, child, out);
        }
    }
    let mut out = Vec::new();
    for root in backend.children(None) {
        walk(backend, root, &mut out);
    }
    out
}

/// Ids of the subtree at `handle` in post-order; `next` is the subtree root's id.
fn post_order<B: NativeTreeBackend>(
    backend: &B,
    handle: B::Handle,
    next: &mut usize,
    out: &mut Vec<usize>,
) {
    let id = *next;
    *next += 1;
    for child in backend.children(Some(handle)) {
        post_order(backend, child, next, out);
    }
    out.push(id);
}

fn refresh_handles<B: NativeTreeBackend, U>(
    backend: &B,
    cache: &mut NodeCache<B::Handle, U>,
    handle: B::Handle,
    next: &mut usize,
) {
    cache.set_handle(*next, handle);
    *next += 1;
    for child in backend.children(Some(handle)) {
        refresh_handles(backend, cache, child, next);
    }
}
