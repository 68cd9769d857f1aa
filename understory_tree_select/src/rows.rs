// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening a pruned view into renderable rows.

use alloc::vec::Vec;

use understory_tree_model::{NodeId, TreeModel};

use crate::expansion::ExpansionState;
use crate::filter::FilterView;
use crate::selection::{CheckState, SelectionState};

/// One line of a rendered tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisibleRow {
    /// The node shown on this row.
    pub id: NodeId,
    /// Depth in the full tree; roots are at depth 0.
    pub depth: usize,
    /// Whether the node is a leaf (no expand affordance).
    pub is_leaf: bool,
    /// Whether the node is an expanded branch.
    pub expanded: bool,
    /// Checkbox status, derived from the full set of leaves under the node.
    pub check: CheckState,
    /// Whether the node's own label matches the current query.
    pub is_match: bool,
}

/// Flatten `view` in display order, descending only into expanded branches.
///
/// Children of a collapsed branch are skipped even when they survive the
/// filter. Status and expansion are looked up by id, so they read the same
/// with or without a filter.
pub fn visible_rows(
    model: &TreeModel,
    view: &FilterView,
    selection: &SelectionState,
    expansion: &ExpansionState,
) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    for root in view.roots(model) {
        push_rows(model, view, selection, expansion, root, &mut rows);
    }
    rows
}

fn push_rows(
    model: &TreeModel,
    view: &FilterView,
    selection: &SelectionState,
    expansion: &ExpansionState,
    id: NodeId,
    rows: &mut Vec<VisibleRow>,
) {
    let expanded = expansion.is_expanded(model, id);
    rows.push(VisibleRow {
        id,
        depth: model.depth(id).unwrap_or_default(),
        is_leaf: model.is_leaf_node(id),
        expanded,
        check: selection.status_of(model, id),
        is_match: view.is_match(id),
    });
    if expanded {
        for child in view.children(model, id) {
            push_rows(model, view, selection, expansion, child, rows);
        }
    }
}
