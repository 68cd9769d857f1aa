// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checkbox tree walkthrough: load a tree from JSON, then check, expand, and search.
//!
//! Run:
//! - `cargo run -p understory_tree_select_demos --example walkthrough`

use simplelog::LevelFilter;
use understory_tree_select::{Change, SelectionState, TreeSelect};
use understory_tree_select_demos::{SAMPLE_TREE, init_logging, load_tree, render};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LevelFilter::Debug);

    let model = load_tree(SAMPLE_TREE)?;
    // Start with one leaf checked, as a form would when editing saved settings.
    let selection = SelectionState::from_keys(&model, ["1-1"])?;
    let mut store = TreeSelect::new(model).with_selection(selection);

    store.subscribe(|store, change| {
        if change.contains(Change::SELECTION) {
            let mut keys: Vec<_> = store.selected_leaf_keys().into_iter().collect();
            keys.sort_unstable();
            log::info!("selection now: {keys:?}");
        }
    });

    println!("initial:\n{}", render(&store));

    // Checking a branch cascades to its leaves.
    store.set_expanded("1-2", true)?;
    store.toggle_check("1-2", true)?;
    println!("after checking Node 1-2:\n{}", render(&store));

    // Unchecking the root clears everything under it.
    store.toggle_check("1", false)?;
    println!("after unchecking Node 1:\n{}", render(&store));

    // Searching prunes the view but keeps check and expansion state.
    store.toggle_check("1-2-2", true)?;
    store.set_search_text("2-2");
    println!("search {:?}:\n{}", store.search_text(), render(&store));

    store.set_search_text("");
    println!("search cleared:\n{}", render(&store));

    if let Err(err) = store.toggle_check("3", true) {
        log::warn!("rejected: {err}");
    }
    Ok(())
}
