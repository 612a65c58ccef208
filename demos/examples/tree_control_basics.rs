// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree control basics.
//!
//! Build a tree on the headless backend, move and copy subtrees, react to user
//! selection, and delete with a removal callback. Debug logging shows each
//! splice the control performs.
//!
//! Run:
//! - `cargo run -p understory_demos --example tree_control_basics`

use simplelog::{Config, LevelFilter, SimpleLogger};
use understory_node_cache::NodeKind;
use understory_tree_control::{
    DeleteTarget, MemoryBackend, NativeTreeBackend, TreeConfig, TreeControl, TreeError,
};

fn dump(tree: &TreeControl<MemoryBackend, &'static str>) {
    for id in 0..tree.count() {
        let depth = tree.depth(id).unwrap_or_default();
        let title = tree.title(id).unwrap_or_default();
        let data = tree.user_data(id).copied().unwrap_or("-");
        println!("  {id:>2} {:indent$}{title} [{data}]", "", indent = depth * 2);
    }
}

fn main() -> Result<(), TreeError> {
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());

    let mut tree: TreeControl<MemoryBackend, &'static str> =
        TreeControl::new(MemoryBackend::new(), TreeConfig::default());

    let root = tree.add_node(None, NodeKind::Branch, "project")?;
    let src = tree.add_node(Some(root), NodeKind::Branch, "src")?;
    let main_rs = tree.add_node(Some(src), NodeKind::Leaf, "main.rs")?;
    let docs = tree.insert_node(Some(src), NodeKind::Branch, "docs")?;
    tree.add_node(Some(docs), NodeKind::Leaf, "guide.md")?;
    tree.set_user_data(main_rs, Some("entry point"))?;
    println!("built:");
    dump(&tree);

    tree.on_selection(|id, selected| {
        let verb = if selected { "selected" } else { "cleared" };
        println!("user {verb} node {id}");
    });
    tree.on_node_removed(|id, data| println!("removing node {id} ({data:?})"));

    // Drop docs onto the expanded src branch: first child.
    let docs = tree.move_node(docs, src)?;
    println!("docs moved into src, now {docs}:");
    dump(&tree);

    // Copies carry no user data.
    let copy = tree.copy_node(tree.find_user_data(&"entry point").unwrap_or(root), root)?;
    println!("copied main.rs to {copy}:");
    dump(&tree);

    // A click in the widget reaches the application; programmatic changes do not.
    if let Some(handle) = tree.handle(copy) {
        tree.backend_mut().set_selected(handle, true);
    }
    let dispatched = tree.pump_events();
    println!("{dispatched} callback(s) dispatched");

    let removed = tree.delete(DeleteTarget::Selected)?;
    println!("deleted {removed} selected node(s):");
    dump(&tree);

    match tree.move_node(root, docs) {
        Err(err) => println!("rejected: {err}"),
        Ok(id) => println!("unexpectedly moved to {id}"),
    }
    println!("consistent: {}", tree.check_consistency());
    Ok(())
}
