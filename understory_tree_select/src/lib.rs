// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tree_select --heading-base-level=0

//! Understory Tree Select: headless tri-state multi-select over a tree.
//!
//! Understory Tree Select is the behavior layer of a checkbox tree widget.
//! It owns no rendering; a UI reads rows from it and sends it intents.
//!
//! - [`SelectionState`]: the set of checked leaves. Checking or unchecking a
//!   node cascades to every leaf under it, and every node reports a derived
//!   [`CheckState`] (checked, unchecked, or indeterminate).
//! - [`ExpansionState`]: which branches are open, as an overlay over the
//!   per-node defaults declared in the model.
//! - [`filter`] / [`filter_with`]: a pruned [`FilterView`] that keeps matching
//!   nodes and the ancestors needed to reach them.
//! - [`visible_rows`]: flattens a view into the rows to draw.
//! - [`TreeSelect`]: a store tying the above together with intents and
//!   change subscribers.
//!
//! ## Where this fits
//!
//! The tree shape lives in [`understory_tree_model::TreeModel`]. All state in
//! this crate is keyed by [`NodeId`](understory_tree_model::NodeId) and never
//! copied into the nodes, so a filtered view shows exactly the same check and
//! expansion status as the full tree.
//!
//! Only leaves are ever stored as selected. A branch is checked iff all of
//! its leaves are, so there is no way for a parent's checkbox to disagree
//! with its children.
//!
//! ## Example
//!
//! ```rust
//! use understory_tree_model::{Node, TreeModel};
//! use understory_tree_select::{CheckState, TreeSelect};
//!
//! let model = TreeModel::new([
//!     Node::branch("1", "Node 1", [
//!         Node::leaf("1-1", "Node 1-1"),
//!         Node::branch("1-2", "Node 1-2", [
//!             Node::leaf("1-2-1", "Node 1-2-1"),
//!             Node::leaf("1-2-2", "Node 1-2-2"),
//!         ]),
//!     ]),
//!     Node::leaf("2", "Node 2"),
//! ])?;
//! let mut store = TreeSelect::new(model);
//!
//! store.toggle_check("1-2", true)?;
//! assert_eq!(store.status_of("1-2")?, CheckState::Checked);
//! assert_eq!(store.status_of("1")?, CheckState::Indeterminate);
//!
//! store.toggle_check("1-1", true)?;
//! assert_eq!(store.status_of("1")?, CheckState::Checked);
//!
//! store.set_search_text("1-2-1");
//! let model = store.model();
//! let kept: Vec<_> = store
//!     .visible_tree()
//!     .iter(model)
//!     .filter_map(|id| model.key(id))
//!     .collect();
//! assert_eq!(kept, ["1", "1-2", "1-2-1"]);
//! # Ok::<(), understory_tree_model::TreeError>(())
//! ```
//!
//! ## Features
//!
//! - `serde`: forwards to `understory_tree_model/serde`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod expansion;
mod filter;
mod rows;
mod selection;
mod store;

pub use expansion::ExpansionState;
pub use filter::{CaseSensitivity, FilterOptions, FilterView, MatchPolicy, filter, filter_with};
pub use rows::{VisibleRow, visible_rows};
pub use selection::{CheckState, SelectionState};
pub use store::{Change, FilterRequest, FilterResult, SearchOutcome, SubscriptionId, TreeSelect};
