// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node attributes addressed by name.
//!
//! Toolkit bindings and scripting layers talk to the tree through string
//! attributes (`"TITLE"`, `"STATE"`, `"PARENT"`, ...). Names are resolved once
//! to an [`AttributeKey`]; the key then indexes a table of typed accessors, so
//! repeated access never compares strings. Name lookup ignores ASCII case.
//!
//! | Name              | Read                          | Write                   |
//! |-------------------|-------------------------------|-------------------------|
//! | `TITLE`           | node text                     | yes                     |
//! | `KIND`            | `BRANCH` or `LEAF`            | no                      |
//! | `STATE`           | `EXPANDED` or `COLLAPSED`     | branches only           |
//! | `PARENT`          | parent id                     | no                      |
//! | `DEPTH`           | number of ancestors           | no                      |
//! | `CHILDCOUNT`      | direct children               | no                      |
//! | `TOTALCHILDCOUNT` | all descendants               | no                      |
//! | `COUNT`           | nodes in the tree             | no                      |
//! | `ROOTCOUNT`       | top-level nodes               | no                      |
//! | `NEXT` `PREVIOUS` | sibling ids                   | no                      |
//! | `FIRST` `LAST`    | first and last sibling ids    | no                      |
//! | `MARKED`          | `YES` or `NO`                 | yes                     |
//! | `TOGGLEVALUE`     | `ON` or `OFF`                 | yes                     |
//! | `IMAGE`           | image name                    | yes, empty resets       |
//! | `IMAGEEXPANDED`   | image name (branches)         | yes, empty resets       |

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use understory_node_cache::NodeKind;

use crate::backend::{ImageSlot, NativeTreeBackend};
use crate::control::TreeControl;
use crate::error::TreeError;

/// Reads an attribute of node `id`; `None` if it has no value there.
pub type Getter<B, U> = fn(&TreeControl<B, U>, usize) -> Option<String>;

/// Writes an attribute of node `id`.
pub type Setter<B, U> = fn(&mut TreeControl<B, U>, usize, &str) -> Result<(), TreeError>;

/// Resolved attribute name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeKey(usize);

impl AttributeKey {
    /// Position of the attribute in its registry.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Typed accessors of one attribute.
pub struct Accessor<B: NativeTreeBackend, U> {
    /// Canonical (upper case) name.
    pub name: &'static str,
    /// Reader.
    pub get: Getter<B, U>,
    /// Writer, `None` for read-only attributes.
    pub set: Option<Setter<B, U>>,
}

impl<B: NativeTreeBackend, U> Clone for Accessor<B, U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: NativeTreeBackend, U> Copy for Accessor<B, U> {}

impl<B: NativeTreeBackend, U> core::fmt::Debug for Accessor<B, U> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("writable", &self.set.is_some())
            .finish_non_exhaustive()
    }
}

/// Table of attributes a [`TreeControl`] understands.
pub struct AttributeRegistry<B: NativeTreeBackend, U> {
    accessors: Vec<Accessor<B, U>>,
    names: BTreeMap<&'static str, AttributeKey>,
}

impl<B: NativeTreeBackend, U> core::fmt::Debug for AttributeRegistry<B, U> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.accessors.iter()).finish()
    }
}

impl<B: NativeTreeBackend, U> Default for AttributeRegistry<B, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: NativeTreeBackend, U> AttributeRegistry<B, U> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            accessors: Vec::new(),
            names: BTreeMap::new(),
        }
    }

    /// A registry with every built-in node attribute.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("TITLE", get_title, Some(set_title));
        registry.register("KIND", get_kind, None);
        registry.register("STATE", get_state, Some(set_state));
        registry.register("PARENT", get_parent, None);
        registry.register("DEPTH", get_depth, None);
        registry.register("CHILDCOUNT", get_child_count, None);
        registry.register("TOTALCHILDCOUNT", get_total_child_count, None);
        registry.register("COUNT", get_count, None);
        registry.register("ROOTCOUNT", get_root_count, None);
        registry.register("NEXT", get_next, None);
        registry.register("PREVIOUS", get_previous, None);
        registry.register("FIRST", get_first, None);
        registry.register("LAST", get_last, None);
        registry.register("MARKED", get_marked, Some(set_marked));
        registry.register("TOGGLEVALUE", get_toggle, Some(set_toggle));
        registry.register("IMAGE", get_image, Some(set_image));
        registry.register("IMAGEEXPANDED", get_image_expanded, Some(set_image_expanded));
        registry
    }

    /// Add an attribute, or replace the accessors of an existing name.
    pub fn register(
        &mut self,
        name: &'static str,
        get: Getter<B, U>,
        set: Option<Setter<B, U>>,
    ) -> AttributeKey {
        let accessor = Accessor { name, get, set };
        if let Some(&key) = self.names.get(name) {
            self.accessors[key.0] = accessor;
            return key;
        }
        let key = AttributeKey(self.accessors.len());
        self.accessors.push(accessor);
        self.names.insert(name, key);
        key
    }

    /// Key for `name`, ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Option<AttributeKey> {
        self.names.get(name).copied().or_else(|| {
            self.names
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(name))
                .map(|(_, key)| *key)
        })
    }

    /// Accessors behind `key`.
    pub fn accessor(&self, key: AttributeKey) -> Option<&Accessor<B, U>> {
        self.accessors.get(key.0)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.accessors.iter().map(|a| a.name)
    }

    /// Number of registered attributes.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

fn parse_flag(
    name: &'static str,
    value: &str,
    on: &'static str,
    off: &'static str,
) -> Result<bool, TreeError> {
    if value.eq_ignore_ascii_case(on) {
        Ok(true)
    } else if value.eq_ignore_ascii_case(off) {
        Ok(false)
    } else {
        Err(TreeError::InvalidValue {
            name,
            value: value.into(),
        })
    }
}

fn flag(on: bool, yes: &str, no: &str) -> String {
    String::from(if on { yes } else { no })
}

fn id_string(id: Option<usize>) -> Option<String> {
    id.map(|id| id.to_string())
}

fn get_title<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    tree.title(id).ok().map(String::from)
}

fn set_title<B: NativeTreeBackend, U>(
    tree: &mut TreeControl<B, U>,
    id: usize,
    value: &str,
) -> Result<(), TreeError> {
    tree.set_title(id, value)
}

fn get_kind<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    tree.kind(id).ok().map(|kind| match kind {
        NodeKind::Branch => String::from("BRANCH"),
        NodeKind::Leaf => String::from("LEAF"),
    })
}

fn get_state<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    if !tree.kind(id).ok()?.is_branch() {
        return None;
    }
    let expanded = tree.is_expanded(id).ok()?;
    Some(flag(expanded, "EXPANDED", "COLLAPSED"))
}

fn set_state<B: NativeTreeBackend, U>(
    tree: &mut TreeControl<B, U>,
    id: usize,
    value: &str,
) -> Result<(), TreeError> {
    let expanded = parse_flag("STATE", value, "EXPANDED", "COLLAPSED")?;
    tree.set_expanded(id, expanded)
}

fn get_parent<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    id_string(tree.parent(id).ok()?)
}

fn get_depth<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    tree.depth(id).ok().map(|d| d.to_string())
}

fn get_child_count<B: NativeTreeBackend, U>(
    tree: &TreeControl<B, U>,
    id: usize,
) -> Option<String> {
    tree.child_count(id).ok().map(|n| n.to_string())
}

fn get_total_child_count<B: NativeTreeBackend, U>(
    tree: &TreeControl<B, U>,
    id: usize,
) -> Option<String> {
    tree.total_child_count(id).ok().map(|n| n.to_string())
}

fn get_count<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, _id: usize) -> Option<String> {
    Some(tree.count().to_string())
}

fn get_root_count<B: NativeTreeBackend, U>(
    tree: &TreeControl<B, U>,
    _id: usize,
) -> Option<String> {
    Some(tree.root_count().to_string())
}

fn get_next<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    id_string(tree.next(id).ok()?)
}

fn get_previous<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    id_string(tree.previous(id).ok()?)
}

fn get_first<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    id_string(tree.first(id).ok()?)
}

fn get_last<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    id_string(tree.last(id).ok()?)
}

fn get_marked<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    tree.is_selected(id).ok().map(|on| flag(on, "YES", "NO"))
}

fn set_marked<B: NativeTreeBackend, U>(
    tree: &mut TreeControl<B, U>,
    id: usize,
    value: &str,
) -> Result<(), TreeError> {
    let selected = parse_flag("MARKED", value, "YES", "NO")?;
    tree.set_selected(id, selected)
}

fn get_toggle<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    tree.is_toggled(id).ok().map(|on| flag(on, "ON", "OFF"))
}

fn set_toggle<B: NativeTreeBackend, U>(
    tree: &mut TreeControl<B, U>,
    id: usize,
    value: &str,
) -> Result<(), TreeError> {
    let on = parse_flag("TOGGLEVALUE", value, "ON", "OFF")?;
    tree.set_toggled(id, on)
}

fn get_image<B: NativeTreeBackend, U>(tree: &TreeControl<B, U>, id: usize) -> Option<String> {
    tree.image(id, ImageSlot::Normal).ok().map(String::from)
}

fn set_image<B: NativeTreeBackend, U>(
    tree: &mut TreeControl<B, U>,
    id: usize,
    value: &str,
) -> Result<(), TreeError> {
    let image = (!value.is_empty()).then(|| String::from(value));
    tree.set_node_image(id, ImageSlot::Normal, image)
}

fn get_image_expanded<B: NativeTreeBackend, U>(
    tree: &TreeControl<B, U>,
    id: usize,
) -> Option<String> {
    if !tree.kind(id).ok()?.is_branch() {
        return None;
    }
    tree.image(id, ImageSlot::Expanded).ok().map(String::from)
}

fn set_image_expanded<B: NativeTreeBackend, U>(
    tree: &mut TreeControl<B, U>,
    id: usize,
    value: &str,
) -> Result<(), TreeError> {
    if !tree.kind(id)?.is_branch() {
        return Err(TreeError::NotABranch(id));
    }
    let image = (!value.is_empty()).then(|| String::from(value));
    tree.set_node_image(id, ImageSlot::Expanded, image)
}
