// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node cache: a dense array mapping node ids to native handles.
//!
//! ## Layout
//!
//! The backing storage holds `capacity` slots. Slots `0..len` are live and
//! appear in depth-first pre-order, so a node's id is its slot index. Slots
//! `len..capacity` are always cleared (`None`) and are never read as entries.
//!
//! ## Contract violations
//!
//! Ids and ranges come from drivers that derive them from the native widget, so
//! an out-of-range id is a bug in the caller, not a recoverable condition.
//! Debug builds assert. Release builds log a warning and leave the cache as is.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;

use crate::types::{CacheEntry, RelocateMode};

/// Number of slots added each time the cache grows, unless configured otherwise.
pub const DEFAULT_GROWTH_STEP: usize = 20;

/// Tuning knobs for a [`NodeCache`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Storage grows in multiples of this many slots. Zero is treated as one.
    pub growth_step: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            growth_step: DEFAULT_GROWTH_STEP,
        }
    }
}

/// Dense, order-preserving map from node id to `{handle, user_data}`.
///
/// `H` is the backend's opaque handle; it is only ever copied and compared.
/// `U` is the application data type.
#[derive(Clone, PartialEq)]
pub struct NodeCache<H, U> {
    slots: Vec<Option<CacheEntry<H, U>>>,
    len: usize,
    last_added: Option<usize>,
    config: CacheConfig,
}

impl<H, U> Debug for NodeCache<H, U> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeCache")
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("last_added", &self.last_added)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<H: Copy + Eq, U> Default for NodeCache<H, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + Eq, U> NodeCache<H, U> {
    /// Create an empty cache with the default growth step.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create an empty cache with explicit configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
            last_added: None,
            config,
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots, live and spare.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Id of the most recently added node, if it is still meaningful.
    ///
    /// Shifted by removals in front of it, cleared when it is removed or
    /// when a relocation reorders the tree.
    pub fn last_added(&self) -> Option<usize> {
        self.last_added
    }

    /// Make sure `additional` more entries fit without reallocating.
    ///
    /// Storage grows in whole multiples of [`CacheConfig::growth_step`];
    /// newly exposed slots are cleared.
    pub fn capacity_ensure(&mut self, additional: usize) {
        let needed = self.len + additional;
        let capacity = self.slots.len();
        if needed <= capacity {
            return;
        }
        let step = self.config.growth_step.max(1);
        let grown = capacity + (needed - capacity).div_ceil(step) * step;
        self.slots.resize_with(grown, || None);
        log::trace!("node cache grown from {capacity} to {grown} slots");
    }

    /// Insert a new node with `handle` at `id`, shifting `id..` right by one.
    ///
    /// `id` may equal [`len`](Self::len) to append. The new entry has no user
    /// data and becomes the [last added](Self::last_added) node.
    pub fn insert(&mut self, id: usize, handle: H) {
        debug_assert!(
            id <= self.len,
            "insert id {id} out of range (node count {})",
            self.len
        );
        if id > self.len {
            log::warn!("ignoring insert at id {id}: node count is {}", self.len);
            return;
        }
        self.capacity_ensure(1);
        // Slot `len` is spare, so rotating it to the front opens a cleared slot at `id`.
        self.slots[id..=self.len].rotate_right(1);
        self.slots[id] = Some(CacheEntry::new(handle));
        self.len += 1;
        self.last_added = Some(id);
        log::trace!("node cache insert at {id}, {} nodes", self.len);
    }

    /// Remove `count` consecutive entries starting at `id` and close the gap.
    ///
    /// Vacated tail slots are cleared (dropping their user data).
    pub fn remove(&mut self, id: usize, count: usize) {
        let end = id.saturating_add(count);
        debug_assert!(
            end <= self.len,
            "remove range {id}..{end} out of range (node count {})",
            self.len
        );
        if end > self.len {
            log::warn!(
                "ignoring removal of {id}..{end}: node count is {}",
                self.len
            );
            return;
        }
        if count == 0 {
            return;
        }
        self.slots[id..self.len].rotate_left(count);
        for slot in &mut self.slots[self.len - count..self.len] {
            *slot = None;
        }
        self.len -= count;
        self.last_added = match self.last_added {
            Some(last) if last >= end => Some(last - count),
            Some(last) if last >= id => None,
            other => other,
        };
        log::trace!("node cache removed {id}..{end}, {} nodes", self.len);
    }

    /// Move or copy the subtree range `src..src + count` so it lands before `dst`.
    ///
    /// `dst` is the insertion point in the numbering *before* the operation:
    /// the id of the node the subtree is placed in front of, or
    /// [`len`](Self::len) to append. It must not fall strictly inside the
    /// source range (a subtree cannot be placed inside itself).
    ///
    /// - [`RelocateMode::Copy`] leaves the source untouched. The new entries
    ///   carry the source handles until the driver refreshes them with
    ///   [`set_handle`](Self::set_handle), and never inherit user data.
    /// - [`RelocateMode::Move`] carries handles and user data along and closes
    ///   the old range. Moving onto its own position (`dst == src` or
    ///   `dst == src + count`) changes nothing.
    ///
    /// Returns the id of the relocated subtree's first node after the operation.
    /// Clears the [last added](Self::last_added) marker unless nothing changed.
    pub fn relocate(&mut self, src: usize, dst: usize, count: usize, mode: RelocateMode) -> usize {
        let src_end = src.saturating_add(count);
        let valid = count > 0 && src_end <= self.len && dst <= self.len;
        debug_assert!(
            valid,
            "relocate {src}..{src_end} to {dst} out of range (node count {})",
            self.len
        );
        let overlaps = dst > src && dst < src_end;
        debug_assert!(
            !overlaps,
            "relocate destination {dst} inside source range {src}..{src_end}"
        );
        if !valid || overlaps {
            log::warn!(
                "ignoring relocation of {src}..{src_end} to {dst}: node count is {}",
                self.len
            );
            return src;
        }

        let first = match mode {
            RelocateMode::Move => {
                if dst == src || dst == src_end {
                    return src;
                }
                if src < dst {
                    self.slots[src..dst].rotate_left(count);
                    dst - count
                } else {
                    self.slots[dst..src_end].rotate_right(count);
                    dst
                }
            }
            RelocateMode::Copy => {
                let copies: Vec<CacheEntry<H, U>> = self.slots[src..src_end]
                    .iter()
                    .flatten()
                    .map(|entry| CacheEntry::new(entry.handle))
                    .collect();
                self.capacity_ensure(count);
                // The `count` spare slots after `len` rotate into the gap at `dst`.
                self.slots[dst..self.len + count].rotate_right(count);
                for (slot, entry) in self.slots[dst..dst + count].iter_mut().zip(copies) {
                    *slot = Some(entry);
                }
                self.len += count;
                dst
            }
        };
        self.last_added = None;
        log::trace!(
            "node cache {mode:?} {src}..{src_end} before {dst}, now at {first}, {} nodes",
            self.len
        );
        first
    }

    /// Returns the entry for `id`, if live.
    pub fn get(&self, id: usize) -> Option<&CacheEntry<H, U>> {
        self.slots[..self.len].get(id)?.as_ref()
    }

    fn get_mut(&mut self, id: usize) -> Option<&mut CacheEntry<H, U>> {
        self.slots[..self.len].get_mut(id)?.as_mut()
    }

    /// Returns the native handle of `id` (bounds-checked).
    pub fn handle(&self, id: usize) -> Option<H> {
        self.get(id).map(|entry| entry.handle)
    }

    /// Overwrite the native handle of `id`.
    ///
    /// Drivers use this after a copy to point the new entries at the freshly
    /// created native nodes.
    pub fn set_handle(&mut self, id: usize, handle: H) {
        debug_assert!(
            id < self.len,
            "set_handle id {id} out of range (node count {})",
            self.len
        );
        match self.get_mut(id) {
            Some(entry) => entry.handle = handle,
            None => log::warn!("ignoring set_handle on id {id}: node count is {}", self.len),
        }
    }

    /// Returns the user data attached to `id`.
    pub fn user_data(&self, id: usize) -> Option<&U> {
        self.get(id)?.user_data.as_ref()
    }

    /// Mutable access to the user data attached to `id`.
    pub fn user_data_mut(&mut self, id: usize) -> Option<&mut U> {
        self.get_mut(id)?.user_data.as_mut()
    }

    /// Attach `data` to `id` (or detach with `None`), returning the previous value.
    ///
    /// Returns `None` without storing anything if `id` is not live.
    pub fn set_user_data(&mut self, id: usize, data: Option<U>) -> Option<U> {
        let entry = self.get_mut(id)?;
        core::mem::replace(&mut entry.user_data, data)
    }

    /// Id of the node whose handle equals `handle`.
    pub fn find_by_handle(&self, handle: H) -> Option<usize> {
        self.iter().position(|entry| entry.handle == handle)
    }

    /// Id of the first node whose user data equals `data`.
    pub fn find_by_user_data(&self, data: &U) -> Option<usize>
    where
        U: PartialEq,
    {
        self.iter()
            .position(|entry| entry.user_data.as_ref() == Some(data))
    }

    /// Visit `(handle, id)` for every node in id order until `visitor` breaks.
    pub fn for_each<F>(&self, mut visitor: F) -> ControlFlow<()>
    where
        F: FnMut(H, usize) -> ControlFlow<()>,
    {
        for (id, entry) in self.iter().enumerate() {
            visitor(entry.handle, id)?;
        }
        ControlFlow::Continue(())
    }

    /// Iterate live entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry<H, U>> + '_ {
        self.slots[..self.len].iter().flatten()
    }

    /// Handles of all live nodes in id order.
    pub fn handles(&self) -> Vec<H> {
        self.iter().map(|entry| entry.handle).collect()
    }

    /// Drop every entry. Capacity is kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.len = 0;
        self.last_added = None;
    }

    /// True when every live slot is populated and every spare slot is cleared.
    pub fn is_dense(&self) -> bool {
        self.slots[..self.len].iter().all(Option::is_some)
            && self.slots[self.len..].iter().all(Option::is_none)
    }
}
