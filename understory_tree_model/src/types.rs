// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the tree model: node identifiers, flags, and plain node data.

use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for a node in a [`TreeModel`](crate::TreeModel).
///
/// Ids are pre-order positions in the model's arena: a parent always has a
/// smaller id than its descendants, and the leaves of any subtree are
/// contiguous. An id is only meaningful for the model that issued it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Dense index of this node, suitable for indexing side tables of
    /// length [`TreeModel::len`](crate::TreeModel::len).
    pub const fn index(self) -> usize {
        self.idx()
    }
}

bitflags::bitflags! {
    /// Per-node flags derived from the node declaration.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Branch is shown expanded until an expansion overlay says otherwise.
        const DEFAULT_EXPANDED = 0b0000_0001;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Plain description of a node, used to build a [`TreeModel`](crate::TreeModel)
/// and returned by pruned views.
///
/// `children == None` declares a leaf. `Some` must hold at least one child;
/// an explicit empty list is rejected by [`TreeModel::new`](crate::TreeModel::new).
/// Depth is not part of the declaration; it follows from tree position.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Key, unique across the whole tree.
    pub key: String,
    /// Display label; the text searched by filters.
    pub label: String,
    /// Ordered children, or `None` for a leaf.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub children: Option<Vec<Node>>,
    /// Whether a branch starts out expanded. Ignored for leaves.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_false"))]
    pub default_expanded: bool,
}

#[cfg(feature = "serde")]
fn is_false(b: &bool) -> bool {
    !*b
}

impl Node {
    /// Declare a leaf.
    pub fn leaf(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            children: None,
            default_expanded: false,
        }
    }

    /// Declare a branch with the given children, in display order.
    pub fn branch(
        key: impl Into<String>,
        label: impl Into<String>,
        children: impl IntoIterator<Item = Self>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            children: Some(children.into_iter().collect()),
            default_expanded: false,
        }
    }

    /// Mark this node as expanded by default.
    #[must_use]
    pub fn expanded(mut self) -> Self {
        self.default_expanded = true;
        self
    }

    /// Returns `true` if this declaration has no children list.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn constructors_distinguish_leaf_and_branch() {
        let leaf = Node::leaf("a", "A");
        assert!(leaf.is_leaf(), "leaf() has no children list");

        let branch = Node::branch("b", "B", vec![leaf.clone()]).expanded();
        assert!(!branch.is_leaf(), "branch() carries a children list");
        assert!(branch.default_expanded, "expanded() sets the flag");
        assert_eq!(branch.children.as_deref(), Some(&[leaf][..]));

        // An empty list is still a branch declaration; the model rejects it later.
        assert!(!Node::branch("c", "C", vec![]).is_leaf(), "empty list is not a leaf");
    }

    #[test]
    fn node_id_index_is_dense() {
        assert_eq!(NodeId::new(7).index(), 7);
        assert!(NodeId::new(1) < NodeId::new(2), "ids order by pre-order position");
    }
}
