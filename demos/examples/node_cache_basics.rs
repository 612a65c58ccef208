// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node cache basics.
//!
//! Drive a cache by hand: resolve ids for adds, inserts and moves, and watch
//! user data follow its node.
//!
//! Run:
//! - `cargo run -p understory_demos --example node_cache_basics`

use understory_node_cache::{NodeCache, Placement, RefNode, RelocateMode, resolve};

fn main() {
    // Handles would come from a native widget; strings keep the output readable.
    let mut cache: NodeCache<&str, u32> = NodeCache::new();

    // root (expanded branch)
    cache.insert(resolve::add_position(None, Placement::Add), "root");
    // Add on a branch: first child.
    let root = RefNode::branch(0, true, 0);
    cache.insert(resolve::add_position(Some(&root), Placement::Add), "docs");
    // Insert on a branch: next sibling, after its (empty) subtree.
    let docs = RefNode::branch(1, true, 0);
    cache.insert(resolve::add_position(Some(&docs), Placement::Insert), "src");
    // Add on the docs branch again.
    cache.insert(resolve::add_position(Some(&docs), Placement::Add), "README");
    println!("after adds:  {:?}", cache.handles());

    cache.set_user_data(3, Some(42));

    // Drop "src" (id 3) onto the expanded root: it becomes the first child.
    let root = RefNode::branch(0, true, 3);
    let dst = resolve::relocation_position(&root);
    let at = cache.relocate(3, dst, 1, RelocateMode::Move);
    println!("after move:  {:?} (src now at {at})", cache.handles());

    // Copy README (id 3) after the src leaf; the copy needs its new native handle.
    let dst = resolve::relocation_position(&RefNode::leaf(1));
    let at = cache.relocate(3, dst, 1, RelocateMode::Copy);
    cache.set_handle(at, "README (copy)");
    println!("after copy:  {:?}", cache.handles());
    println!("data 42 at:  {:?}", cache.find_by_user_data(&42));

    // Remove src and the copy.
    cache.remove(1, 2);
    println!("after remove: {:?}", cache.handles());
}
