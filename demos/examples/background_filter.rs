// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Off-thread filtering with stale results dropped.
//!
//! Simulates a user typing `"N"`, `"No"`, `"Node 1-2"` faster than a slow
//! filter can keep up. Each keystroke issues a request that runs on a worker
//! thread; results arrive out of order and only the newest one is applied.
//!
//! Run:
//! - `cargo run -p understory_tree_select_demos --example background_filter`

use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use simplelog::LevelFilter;
use understory_tree_select::{SearchOutcome, TreeSelect};
use understory_tree_select_demos::{SAMPLE_TREE, init_logging, load_tree, render};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LevelFilter::Debug);

    let mut store = TreeSelect::new(load_tree(SAMPLE_TREE)?);
    store.set_expanded("1-2", true)?;
    let shared = store.model_handle();

    let (tx, rx) = mpsc::channel();
    let typed = ["N", "No", "Node 1-2"];
    let mut workers = Vec::new();
    for (i, text) in typed.into_iter().enumerate() {
        let request = store.begin_search(text);
        let model = Arc::clone(&shared);
        let tx = tx.clone();
        // Earlier keystrokes take longer, so they finish last.
        let delay = Duration::from_millis(30 * (typed.len() - i) as u64);
        workers.push(thread::spawn(move || {
            thread::sleep(delay);
            let _ = tx.send(request.run(&model));
        }));
    }
    drop(tx);

    for result in rx {
        let generation = result.generation();
        let query = result.view().query().to_owned();
        match store.apply_search(result) {
            SearchOutcome::Applied => log::info!("applied #{generation} {query:?}"),
            SearchOutcome::Stale => log::info!("dropped #{generation} {query:?}"),
        }
    }
    for worker in workers {
        let _ = worker.join();
    }

    println!("\nfinal view for {:?}:\n{}", store.search_text(), render(&store));
    Ok(())
}
