// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default node images.
//!
//! Nodes show an image chosen by kind and expand state unless a node overrides
//! it. The defaults are shared by every control that was handed the same
//! registry (`Rc<DefaultImages>`): create it once at application start and pass
//! it to [`TreeControl::with_images`](crate::TreeControl::with_images). It goes
//! away with the last control holding it. Only names are stored; loading and
//! drawing bitmaps is the toolkit's business.

use alloc::string::String;

use understory_node_cache::NodeKind;

use crate::backend::ImageSlot;

/// Default image name for leaves.
pub const IMG_LEAF: &str = "IMGLEAF";
/// Default image name for collapsed branches.
pub const IMG_COLLAPSED: &str = "IMGCOLLAPSED";
/// Default image name for expanded branches.
pub const IMG_EXPANDED: &str = "IMGEXPANDED";

/// Image names used for nodes that do not set their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultImages {
    leaf: String,
    collapsed: String,
    expanded: String,
}

impl Default for DefaultImages {
    fn default() -> Self {
        Self::new(IMG_LEAF, IMG_COLLAPSED, IMG_EXPANDED)
    }
}

impl DefaultImages {
    /// A registry with custom names.
    pub fn new(
        leaf: impl Into<String>,
        collapsed: impl Into<String>,
        expanded: impl Into<String>,
    ) -> Self {
        Self {
            leaf: leaf.into(),
            collapsed: collapsed.into(),
            expanded: expanded.into(),
        }
    }

    /// Image for leaves.
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// Image for collapsed branches.
    pub fn collapsed(&self) -> &str {
        &self.collapsed
    }

    /// Image for expanded branches.
    pub fn expanded(&self) -> &str {
        &self.expanded
    }

    /// The default for a node of `kind` in the given expand state.
    pub fn resolve(&self, kind: NodeKind, expanded: bool) -> &str {
        match (kind, expanded) {
            (NodeKind::Leaf, _) => &self.leaf,
            (NodeKind::Branch, false) => &self.collapsed,
            (NodeKind::Branch, true) => &self.expanded,
        }
    }

    /// Which per-node override applies to a node of `kind` in the given expand state.
    pub fn slot_for(kind: NodeKind, expanded: bool) -> ImageSlot {
        if kind.is_branch() && expanded {
            ImageSlot::Expanded
        } else {
            ImageSlot::Normal
        }
    }
}
