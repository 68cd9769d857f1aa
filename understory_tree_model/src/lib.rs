// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tree_model --heading-base-level=0

//! Understory Tree Model: an immutable, validated tree arena for hierarchical selection.
//!
//! Understory Tree Model is the shape layer of a tree-select widget.
//!
//! - Builds a tree once from plain [`Node`] declarations and validates it eagerly.
//! - Answers structural queries by key or by [`NodeId`]: children, parent, ancestors, depth.
//! - Resolves the set of leaves under any node in constant time ([`TreeModel::leaves_of`]).
//!
//! ## Where this fits
//!
//! The model holds shape only. Which leaves are checked, which branches are
//! expanded, and which nodes survive a search are overlays keyed by
//! [`NodeId`], kept in `understory_tree_select`. Nodes never carry
//! checked or expanded state themselves, so there is exactly one source of
//! truth for each.
//!
//! ## Validation
//!
//! [`TreeModel::new`] rejects:
//! - a key declared twice anywhere in the tree ([`InvalidModel::DuplicateKey`]),
//! - a branch declared with an explicit empty children list ([`InvalidModel::EmptyBranch`]).
//!
//! Key lookups on a valid model fail with [`TreeError::NotFound`] when the key is absent.
//!
//! ## Example
//!
//! ```rust
//! use understory_tree_model::{Node, TreeModel};
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
//!
//! let leaves = model.leaves("1")?;
//! assert_eq!(leaves.len(), 3);
//! assert!(leaves.contains(model.id_of("1-2-2")?));
//!
//! let chain: Vec<_> = model
//!     .ancestors("1-2-1")?
//!     .into_iter()
//!     .filter_map(|id| model.key(id))
//!     .collect();
//! assert_eq!(chain, ["1", "1-2"]);
//! # Ok::<(), understory_tree_model::TreeError>(())
//! ```
//!
//! ## Features
//!
//! - `serde`: derives `Serialize`/`Deserialize` for [`Node`], so an initial tree can be
//!   loaded from static configuration.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod leaves;
mod model;
mod types;

pub use error::{InvalidModel, TreeError};
pub use leaves::Leaves;
pub use model::{Ancestors, NodeRef, TreeModel};
pub use types::{Node, NodeFlags, NodeId};
