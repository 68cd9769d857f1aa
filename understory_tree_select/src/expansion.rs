// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expansion overlay.

use hashbrown::HashMap;
use understory_tree_model::{NodeFlags, NodeId, TreeError, TreeModel};

/// Which branches are expanded.
///
/// Explicit decisions are kept per node. A branch with no explicit decision
/// falls back to [`NodeFlags::DEFAULT_EXPANDED`], and otherwise is collapsed.
/// Leaves are never expanded.
///
/// Expansion does not cascade: collapsing a parent leaves its children's
/// entries alone, so expanding the parent again restores them exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionState {
    explicit: HashMap<NodeId, bool>,
}

impl ExpansionState {
    /// Create an overlay with no explicit decisions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an overlay with the given branches expanded. Leaf keys are ignored.
    pub fn from_keys<'k>(
        model: &TreeModel,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<Self, TreeError> {
        let mut state = Self::new();
        for key in keys {
            let id = model.id_of(key)?;
            if model.is_branch(id) {
                state.explicit.insert(id, true);
            }
        }
        Ok(state)
    }

    /// Returns `true` if `id` is an expanded branch.
    pub fn is_expanded(&self, model: &TreeModel, id: NodeId) -> bool {
        if !model.is_branch(id) {
            return false;
        }
        self.explicit.get(&id).copied().unwrap_or_else(|| {
            model
                .flags(id)
                .is_some_and(|f| f.contains(NodeFlags::DEFAULT_EXPANDED))
        })
    }

    /// Record an explicit decision for `id`. Leaves are left as they are.
    #[must_use]
    pub fn set_expanded(&self, model: &TreeModel, id: NodeId, expanded: bool) -> Self {
        let mut next = self.clone();
        if model.is_branch(id) {
            next.explicit.insert(id, expanded);
        }
        next
    }

    /// Flip the expansion of `id`.
    #[must_use]
    pub fn toggle(&self, model: &TreeModel, id: NodeId) -> Self {
        self.set_expanded(model, id, !self.is_expanded(model, id))
    }

    /// Expand every ancestor of `id` so that it is reachable in a rendered tree.
    #[must_use]
    pub fn expand_to(&self, model: &TreeModel, id: NodeId) -> Self {
        let mut next = self.clone();
        next.explicit
            .extend(model.ancestors_of(id).into_iter().map(|a| (a, true)));
        next
    }

    /// Expand every branch.
    #[must_use]
    pub fn expand_all(&self, model: &TreeModel) -> Self {
        self.set_all(model, true)
    }

    /// Collapse every branch, overriding default-expanded nodes too.
    #[must_use]
    pub fn collapse_all(&self, model: &TreeModel) -> Self {
        self.set_all(model, false)
    }

    fn set_all(&self, model: &TreeModel, expanded: bool) -> Self {
        let mut next = self.clone();
        next.explicit.extend(
            model
                .iter()
                .filter(|&id| model.is_branch(id))
                .map(|id| (id, expanded)),
        );
        next
    }
}
