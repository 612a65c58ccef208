// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`TreeControl`](crate::TreeControl) for rejected requests.

use alloc::string::String;

/// A request the control refused. Neither the backend nor the cache was touched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id does not name a live node.
    #[error("node id {0} does not exist")]
    InvalidId(usize),
    /// The operation only applies to branches.
    #[error("node {0} is not a branch")]
    NotABranch(usize),
    /// The destination lies inside the subtree being moved or copied.
    #[error("cannot relocate node {src} into its own subtree at node {dst}")]
    MoveIntoDescendant {
        /// Root of the subtree being relocated.
        src: usize,
        /// Requested destination.
        dst: usize,
    },
    /// No attribute with this name is registered.
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),
    /// The key was resolved by a different attribute registry.
    #[error("attribute key {0} is not registered")]
    UnknownAttributeKey(usize),
    /// The attribute can be read but not written.
    #[error("attribute `{0}` is read-only")]
    ReadOnlyAttribute(&'static str),
    /// The value cannot be parsed for this attribute.
    #[error("invalid value `{value}` for attribute `{name}`")]
    InvalidValue {
        /// Attribute name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}
