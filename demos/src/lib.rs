// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the tree-select demos.
//!
//! Run:
//! - `cargo run -p understory_tree_select_demos --example walkthrough`
//! - `cargo run -p understory_tree_select_demos --example background_filter`

use std::fmt::Write as _;

use simplelog::{Config, LevelFilter, SimpleLogger};
use understory_tree_model::{Node, TreeModel};
use understory_tree_select::{CheckState, TreeSelect};

/// The demo tree, as it would appear in a static configuration file.
pub const SAMPLE_TREE: &str = r#"[
  {
    "key": "1",
    "label": "Node 1",
    "default_expanded": true,
    "children": [
      { "key": "1-1", "label": "Node 1-1" },
      {
        "key": "1-2",
        "label": "Node 1-2",
        "children": [
          { "key": "1-2-1", "label": "Node 1-2-1" },
          { "key": "1-2-2", "label": "Node 1-2-2" }
        ]
      }
    ]
  },
  { "key": "2", "label": "Node 2" }
]"#;

/// Parse node declarations from JSON and validate them into a model.
pub fn load_tree(json: &str) -> Result<TreeModel, Box<dyn std::error::Error>> {
    let nodes: Vec<Node> = serde_json::from_str(json)?;
    Ok(TreeModel::new(nodes)?)
}

/// Send `log` output at `level` and above to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    let _ = SimpleLogger::init(level, Config::default());
}

/// Draw the store's visible rows as indented text, one node per line.
///
/// ```text
/// [-] v Node 1
///     [ ]   Node 1-1
/// ```
pub fn render(store: &TreeSelect) -> String {
    let model = store.model();
    let mut out = String::new();
    for row in store.visible_rows() {
        let check = match row.check {
            CheckState::Checked => "[x]",
            CheckState::Unchecked => "[ ]",
            CheckState::Indeterminate => "[-]",
        };
        let arrow = match (row.is_leaf, row.expanded) {
            (true, _) => ' ',
            (false, true) => 'v',
            (false, false) => '>',
        };
        let marker = if row.is_match && !store.search_text().is_empty() {
            " *"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:indent$}{check} {arrow} {}{marker}",
            "",
            model.label(row.id).unwrap_or_default(),
            indent = row.depth * 4,
        );
    }
    out
}
