// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf sets of subtrees.

use hashbrown::HashSet;

use crate::model::TreeModel;
use crate::types::NodeId;

/// The set of leaves under a node, as returned by [`TreeModel::leaves_of`].
///
/// Treat this as a set: it never holds duplicates, and callers should not
/// depend on iteration order (it currently follows display order).
#[derive(Clone, Copy)]
pub struct Leaves<'a> {
    model: &'a TreeModel,
    /// sorted, since ids are pre-order positions
    ids: &'a [NodeId],
}

impl core::fmt::Debug for Leaves<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

impl<'a> Leaves<'a> {
    pub(crate) fn new(model: &'a TreeModel, ids: &'a [NodeId]) -> Self {
        Self { model, ids }
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if there are no leaves (only for ids from another model).
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns `true` if `id` is one of these leaves.
    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Iterate the leaf ids.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = NodeId> + use<'a> {
        let ids = self.ids;
        ids.iter().copied()
    }

    /// Iterate the leaf keys.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        let (model, ids) = (self.model, self.ids);
        ids.iter().filter_map(move |&id| model.key(id))
    }

    /// Collect the leaf keys into a set.
    pub fn to_key_set(&self) -> HashSet<&'a str> {
        self.keys().collect()
    }
}

impl<'a> IntoIterator for Leaves<'a> {
    type Item = NodeId;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}
