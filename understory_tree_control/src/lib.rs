// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tree_control --heading-base-level=0

//! Understory Tree Control: a tree widget addressed by integer node ids.
//!
//! [`TreeControl`] drives a native tree widget through the [`NativeTreeBackend`]
//! trait and keeps an [`understory_node_cache::NodeCache`] in step with it, so
//! applications can say "node 4" instead of juggling toolkit handles. Node ids are
//! positions in a depth-first pre-order walk and shift as the tree changes.
//!
//! - Structure: add and insert nodes, delete a node, its children, the selection
//!   or everything, and move or copy subtrees.
//! - State: titles, expand state, selection (single or multiple), toggles and images.
//! - Attributes: the same operations addressed by name, see [`attributes`].
//! - Callbacks: node removal (post-order, with user data), selection and branch
//!   changes made by the user. Callbacks the widget raises while the control is
//!   mutating it are suppressed.
//!
//! [`backends::MemoryBackend`] is a headless widget for tests and off-screen trees.
//!
//! # Example
//!
//! ```rust
//! use understory_node_cache::NodeKind;
//! use understory_tree_control::{DeleteTarget, MemoryBackend, TreeConfig, TreeControl};
//!
//! let mut tree: TreeControl<MemoryBackend, &str> =
//!     TreeControl::new(MemoryBackend::new(), TreeConfig::default());
//!
//! let root = tree.add_node(None, NodeKind::Branch, "root").unwrap();
//! let docs = tree.add_node(Some(root), NodeKind::Branch, "docs").unwrap();
//! let readme = tree.add_node(Some(docs), NodeKind::Leaf, "README").unwrap();
//! let license = tree.insert_node(Some(docs), NodeKind::Leaf, "LICENSE").unwrap();
//! assert_eq!((root, docs, readme, license), (0, 1, 2, 3));
//!
//! tree.set_user_data(readme, Some("readme")).unwrap();
//!
//! // LICENSE dropped onto the expanded "docs" branch becomes its first child.
//! assert_eq!(tree.move_node(license, docs), Ok(2));
//! assert_eq!(tree.find_user_data(&"readme"), Some(3));
//!
//! assert_eq!(tree.delete(DeleteTarget::Children(docs)), Ok(2));
//! assert_eq!(tree.count(), 2);
//! assert_eq!(tree.attribute("CHILDCOUNT", docs).unwrap().as_deref(), Some("0"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod attributes;
pub mod backend;
pub mod backends;
pub mod control;
pub mod error;
pub mod guard;
pub mod images;

pub use attributes::{AttributeKey, AttributeRegistry};
pub use backend::{Anchor, ImageSlot, NativeEvent, NativeTreeBackend};
pub use backends::{MemoryBackend, MemoryHandle};
pub use control::{DeleteTarget, MarkMode, TreeConfig, TreeControl};
pub use error::TreeError;
pub use images::DefaultImages;
