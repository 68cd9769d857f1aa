// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf selection with cascading toggles and derived tri-state status.

use alloc::vec::Vec;

use hashbrown::HashSet;
use understory_tree_model::{NodeId, TreeError, TreeModel};

/// Checkbox status of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CheckState {
    /// No leaf under the node is selected.
    Unchecked,
    /// Every leaf under the node is selected.
    Checked,
    /// Some, but not all, leaves under the node are selected. Never reported for leaves.
    Indeterminate,
}

impl CheckState {
    /// Returns `true` for [`CheckState::Checked`].
    pub const fn is_checked(self) -> bool {
        matches!(self, Self::Checked)
    }

    fn from_counts(selected: usize, total: usize) -> Self {
        if selected == 0 {
            Self::Unchecked
        } else if selected == total {
            Self::Checked
        } else {
            Self::Indeterminate
        }
    }
}

/// The set of selected leaves.
///
/// Only leaf ids are ever stored. A branch's status is derived from its leaves
/// on every query with [`SelectionState::status_of`], so it can never drift
/// out of sync with them.
///
/// Values are immutable: [`SelectionState::toggle`] returns a new state and
/// leaves the receiver untouched, so earlier states stay valid for undo or
/// concurrent readers.
///
/// ## Example
///
/// ```rust
/// use understory_tree_model::{Node, TreeModel};
/// use understory_tree_select::{CheckState, SelectionState};
///
/// let model = TreeModel::new([Node::branch("1", "Node 1", [
///     Node::leaf("1-1", "Node 1-1"),
///     Node::leaf("1-2", "Node 1-2"),
/// ])])
/// .unwrap();
/// let branch = model.id_of("1").unwrap();
/// let leaf = model.id_of("1-1").unwrap();
///
/// let empty = SelectionState::new();
/// let partial = empty.toggle(&model, leaf, true);
/// assert_eq!(partial.status_of(&model, branch), CheckState::Indeterminate);
///
/// // Clicking an indeterminate branch applies the target value to the whole subtree.
/// let full = partial.toggle(&model, branch, true);
/// assert_eq!(full.status_of(&model, branch), CheckState::Checked);
/// assert_eq!(empty.status_of(&model, branch), CheckState::Unchecked);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: HashSet<NodeId>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection from keys.
    ///
    /// A branch key selects every leaf under it. Unknown keys fail with
    /// [`TreeError::NotFound`].
    pub fn from_keys<'k>(
        model: &TreeModel,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<Self, TreeError> {
        let mut state = Self::new();
        for key in keys {
            let id = model.id_of(key)?;
            state.apply(model, id, true);
        }
        Ok(state)
    }

    /// Number of selected leaves.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns `true` if `leaf` is selected. Always `false` for branches.
    pub fn is_selected(&self, leaf: NodeId) -> bool {
        self.selected.contains(&leaf)
    }

    /// Derive the checkbox status of any node.
    ///
    /// A leaf is [`CheckState::Checked`] iff it is selected. A branch is
    /// `Checked` iff all of its leaves are selected, `Unchecked` iff none are,
    /// and [`CheckState::Indeterminate`] otherwise.
    pub fn status_of(&self, model: &TreeModel, id: NodeId) -> CheckState {
        let leaves = model.leaves_of(id);
        let selected = leaves.iter().filter(|l| self.selected.contains(l)).count();
        CheckState::from_counts(selected, leaves.len())
    }

    /// Set every leaf under `id` to `checked`, returning the new selection.
    ///
    /// For a leaf this sets or clears that single leaf. For a branch the value
    /// cascades to all of its leaves regardless of their prior state, which is
    /// how a tri-state checkbox resolves a click.
    #[must_use]
    pub fn toggle(&self, model: &TreeModel, id: NodeId, checked: bool) -> Self {
        let mut next = self.clone();
        next.apply(model, id, checked);
        next
    }

    /// Return an empty selection.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::new()
    }

    fn apply(&mut self, model: &TreeModel, id: NodeId, checked: bool) {
        let leaves = model.leaves_of(id);
        if checked {
            self.selected.extend(leaves);
        } else {
            for leaf in leaves {
                self.selected.remove(&leaf);
            }
        }
    }

    /// Iterate the selected leaves, in no particular order.
    pub fn selected_leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selected.iter().copied()
    }

    /// Keys of the selected leaves.
    pub fn selected_keys<'m>(&self, model: &'m TreeModel) -> HashSet<&'m str> {
        self.selected.iter().filter_map(|&id| model.key(id)).collect()
    }

    /// Selected leaves in display order.
    pub fn selected_in_order(&self, model: &TreeModel) -> Vec<NodeId> {
        model
            .all_leaves()
            .iter()
            .filter(|id| self.selected.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_tree_model::Node;

    fn model() -> TreeModel {
        TreeModel::new(vec![
            Node::branch(
                "1",
                "Node 1",
                vec![
                    Node::leaf("1-1", "Node 1-1"),
                    Node::branch(
                        "1-2",
                        "Node 1-2",
                        vec![
                            Node::leaf("1-2-1", "Node 1-2-1"),
                            Node::leaf("1-2-2", "Node 1-2-2"),
                        ],
                    ),
                ],
            ),
            Node::leaf("2", "Node 2"),
        ])
        .unwrap()
    }

    fn id(model: &TreeModel, key: &str) -> NodeId {
        model.id_of(key).unwrap()
    }

    #[test]
    fn cascading_walkthrough() {
        let model = model();
        let s0 = SelectionState::new();

        let s1 = s0.toggle(&model, id(&model, "1-2"), true);
        assert_eq!(s1.selected_keys(&model), HashSet::from(["1-2-1", "1-2-2"]));
        assert_eq!(s1.status_of(&model, id(&model, "1-2")), CheckState::Checked);
        assert_eq!(
            s1.status_of(&model, id(&model, "1")),
            CheckState::Indeterminate
        );

        let s2 = s1.toggle(&model, id(&model, "1-1"), true);
        assert_eq!(s2.status_of(&model, id(&model, "1")), CheckState::Checked);
        assert_eq!(s2.status_of(&model, id(&model, "2")), CheckState::Unchecked);

        let s3 = s2.toggle(&model, id(&model, "1"), false);
        assert!(s3.selected_keys(&model).is_empty(), "unchecking the root clears its leaves");
        assert_eq!(s3.status_of(&model, id(&model, "1")), CheckState::Unchecked);
    }

    #[test]
    fn toggle_never_mutates_the_receiver() {
        let model = model();
        let before = SelectionState::new().toggle(&model, id(&model, "2"), true);
        let snapshot = before.clone();
        let _after = before.toggle(&model, id(&model, "1"), true);
        assert_eq!(before, snapshot);
    }

    #[test]
    fn indeterminate_branch_resolves_to_target() {
        let model = model();
        let branch = id(&model, "1");
        let partial = SelectionState::new().toggle(&model, id(&model, "1-2-1"), true);
        assert_eq!(partial.status_of(&model, branch), CheckState::Indeterminate);

        let on = partial.toggle(&model, branch, true);
        assert_eq!(on.status_of(&model, branch), CheckState::Checked);
        let off = partial.toggle(&model, branch, false);
        assert_eq!(off.status_of(&model, branch), CheckState::Unchecked);
    }

    #[test]
    fn only_leaves_are_stored() {
        let model = model();
        let s = SelectionState::new().toggle(&model, id(&model, "1"), true);
        assert_eq!(s.len(), 3);
        assert!(!s.is_selected(id(&model, "1")), "branch ids are never stored");
        assert!(!s.is_selected(id(&model, "1-2")), "branch ids are never stored");
        assert!(s.is_selected(id(&model, "1-2-2")), "leaf is stored");
    }

    #[test]
    fn leaf_status_is_never_indeterminate() {
        let model = model();
        let s = SelectionState::new().toggle(&model, id(&model, "1-1"), true);
        for leaf in model.all_leaves() {
            let status = s.status_of(&model, leaf);
            assert_ne!(status, CheckState::Indeterminate);
            assert_eq!(status.is_checked(), s.is_selected(leaf));
        }
    }

    #[test]
    fn seeding_from_keys() {
        let model = model();
        let s = SelectionState::from_keys(&model, ["1-1", "1-2"]).unwrap();
        assert_eq!(
            s.selected_keys(&model),
            HashSet::from(["1-1", "1-2-1", "1-2-2"])
        );
        assert_eq!(
            SelectionState::from_keys(&model, ["1-1", "nope"]),
            Err(TreeError::NotFound {
                key: "nope".into()
            })
        );
    }

    #[test]
    fn selected_in_display_order() {
        let model = model();
        let s = SelectionState::from_keys(&model, ["2", "1-2-2", "1-1"]).unwrap();
        let keys: Vec<_> = s
            .selected_in_order(&model)
            .into_iter()
            .map(|id| model.key(id).unwrap())
            .collect();
        assert_eq!(keys, ["1-1", "1-2-2", "2"]);
        assert!(s.clear().is_empty(), "clear drops everything");
    }
}
