// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree model: construction, validation, structural queries.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::{InvalidModel, TreeError};
use crate::leaves::Leaves;
use crate::types::{Node, NodeFlags, NodeId};

/// Root-to-parent chain of a node, as returned by [`TreeModel::ancestors_of`].
pub type Ancestors = SmallVec<[NodeId; 8]>;

/// Immutable tree of labeled nodes.
///
/// The model is built once from plain [`Node`] declarations and never mutated
/// afterwards; selection, expansion, and filtering are overlays keyed by
/// [`NodeId`]. Nodes are stored in pre-order, so a node's subtree (and the
/// leaves under it) occupy contiguous ranges. Depth is computed from tree
/// position during construction.
///
/// ## Example
///
/// ```rust
/// use understory_tree_model::{Node, TreeModel};
///
/// let model = TreeModel::new([
///     Node::branch("1", "Node 1", [
///         Node::leaf("1-1", "Node 1-1"),
///         Node::leaf("1-2", "Node 1-2"),
///     ]),
///     Node::leaf("2", "Node 2"),
/// ])
/// .unwrap();
///
/// let node = model.node("1-2").unwrap();
/// assert_eq!(node.label(), "Node 1-2");
/// assert_eq!(node.depth(), 1);
/// assert!(model.is_leaf("1-2").unwrap());
/// assert!(model.node("3").is_err());
/// ```
pub struct TreeModel {
    /// slots, in pre-order
    slots: Vec<Slot>,
    roots: Vec<NodeId>,
    /// every leaf, in pre-order
    leaves: Vec<NodeId>,
    by_key: HashMap<String, NodeId>,
}

impl core::fmt::Debug for TreeModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeModel")
            .field("nodes", &self.slots.len())
            .field("roots", &self.roots.len())
            .field("leaves", &self.leaves.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Slot {
    key: String,
    label: String,
    /// lowercased label for case-insensitive matching
    folded_label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
    flags: NodeFlags,
    /// `leaves[leaf_start..leaf_end]` are the leaves of this subtree.
    leaf_start: usize,
    leaf_end: usize,
}

impl TreeModel {
    /// Build a model from root declarations, in display order.
    ///
    /// Validation is eager: a duplicate key or a branch with an explicit empty
    /// children list fails with [`TreeError::InvalidModel`]. An empty sequence
    /// of roots is a valid, empty tree.
    pub fn new(roots: impl IntoIterator<Item = Node>) -> Result<Self, TreeError> {
        let mut model = Self {
            slots: Vec::new(),
            roots: Vec::new(),
            leaves: Vec::new(),
            by_key: HashMap::new(),
        };
        for root in roots {
            let id = model.push(root, None, 0)?;
            model.roots.push(id);
        }
        Ok(model)
    }

    fn push(
        &mut self,
        node: Node,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<NodeId, InvalidModel> {
        let Node {
            key,
            label,
            children,
            default_expanded,
        } = node;
        if children.as_ref().is_some_and(Vec::is_empty) {
            return Err(InvalidModel::EmptyBranch { key });
        }
        if self.by_key.contains_key(key.as_str()) {
            return Err(InvalidModel::DuplicateKey { key });
        }

        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId::new(self.slots.len() as u32);
        let flags = if default_expanded && children.is_some() {
            NodeFlags::DEFAULT_EXPANDED
        } else {
            NodeFlags::empty()
        };
        let leaf_start = self.leaves.len();
        self.by_key.insert(key.clone(), id);
        self.slots.push(Slot {
            key,
            folded_label: label.to_lowercase(),
            label,
            parent,
            children: Vec::new(),
            depth,
            flags,
            leaf_start,
            leaf_end: leaf_start,
        });

        match children {
            None => self.leaves.push(id),
            Some(children) => {
                let mut ids = Vec::with_capacity(children.len());
                for child in children {
                    ids.push(self.push(child, Some(id), depth + 1)?);
                }
                self.slots[id.idx()].children = ids;
            }
        }
        self.slots[id.idx()].leaf_end = self.leaves.len();
        Ok(id)
    }

    /// Number of nodes in the model.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the model has no nodes.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Root nodes, in display order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Returns `true` if `id` is in range for this model.
    pub fn contains(&self, id: NodeId) -> bool {
        id.idx() < self.slots.len()
    }

    /// Iterate every node in pre-order (parents before children, siblings in order).
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        (0..self.slots.len()).map(|i| NodeId::new(i as u32))
    }

    // --- key-based queries ---

    /// Look up the id of `key`, if present.
    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.by_key.get(key).copied()
    }

    /// Look up the id of `key`, failing with [`TreeError::NotFound`].
    pub fn id_of(&self, key: &str) -> Result<NodeId, TreeError> {
        self.get(key).ok_or_else(|| TreeError::not_found(key))
    }

    /// Borrow the node with the given key.
    pub fn node(&self, key: &str) -> Result<NodeRef<'_>, TreeError> {
        let id = self.id_of(key)?;
        Ok(NodeRef {
            model: self,
            id,
            slot: &self.slots[id.idx()],
        })
    }

    /// Children of the node with the given key, in display order. Empty for leaves.
    pub fn children(&self, key: &str) -> Result<impl Iterator<Item = NodeRef<'_>>, TreeError> {
        Ok(self.node(key)?.children())
    }

    /// Whether the node with the given key is a leaf.
    pub fn is_leaf(&self, key: &str) -> Result<bool, TreeError> {
        Ok(self.node(key)?.is_leaf())
    }

    /// Ancestors of the node with the given key, ordered root to parent.
    pub fn ancestors(&self, key: &str) -> Result<Ancestors, TreeError> {
        let id = self.id_of(key)?;
        Ok(self.ancestors_of(id))
    }

    // --- id-based queries ---
    //
    // These do not fail: an id from another model yields `None`, an empty
    // slice, or `false`.

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.idx())
    }

    /// Borrow a node by id.
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.slot(id).map(|slot| NodeRef {
            model: self,
            id,
            slot,
        })
    }

    /// Key of a node.
    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.slot(id).map(|s| s.key.as_str())
    }

    /// Label of a node.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.slot(id).map(|s| s.label.as_str())
    }

    /// Lowercased label of a node, as used for case-insensitive matching.
    pub fn folded_label(&self, id: NodeId) -> Option<&str> {
        self.slot(id).map(|s| s.folded_label.as_str())
    }

    /// Depth of a node; roots are at depth 0.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.slot(id).map(|s| s.depth)
    }

    /// Flags of a node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.slot(id).map(|s| s.flags)
    }

    /// Parent of a node, or `None` for roots.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|s| s.parent)
    }

    /// Children of a node, in display order.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map_or(&[][..], |s| s.children.as_slice())
    }

    /// Returns `true` if `id` is a leaf of this model.
    pub fn is_leaf_node(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|s| s.children.is_empty())
    }

    /// Returns `true` if `id` is a branch of this model.
    pub fn is_branch(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|s| !s.children.is_empty())
    }

    /// Ancestors of a node, ordered root to parent. Empty for roots.
    pub fn ancestors_of(&self, id: NodeId) -> Ancestors {
        let mut out = Ancestors::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent_of(parent);
        }
        out.reverse();
        out
    }

    /// Leaves under a node (the node itself for a leaf).
    ///
    /// The result is precomputed at construction and costs nothing to produce.
    pub fn leaves_of(&self, id: NodeId) -> Leaves<'_> {
        let ids = self
            .slot(id)
            .map_or(&[][..], |s| &self.leaves[s.leaf_start..s.leaf_end]);
        Leaves::new(self, ids)
    }

    /// Leaves under the node with the given key.
    pub fn leaves(&self, key: &str) -> Result<Leaves<'_>, TreeError> {
        Ok(self.leaves_of(self.id_of(key)?))
    }

    /// Every leaf of the tree.
    pub fn all_leaves(&self) -> Leaves<'_> {
        Leaves::new(self, &self.leaves)
    }

    /// Rebuild plain [`Node`] declarations for the whole tree.
    ///
    /// `TreeModel::new(model.to_nodes())` produces an equivalent model.
    pub fn to_nodes(&self) -> Vec<Node> {
        self.roots.iter().map(|&root| self.to_node(root)).collect()
    }

    fn to_node(&self, id: NodeId) -> Node {
        let slot = &self.slots[id.idx()];
        Node {
            key: slot.key.clone(),
            label: slot.label.clone(),
            children: (!slot.children.is_empty())
                .then(|| slot.children.iter().map(|&c| self.to_node(c)).collect()),
            default_expanded: slot.flags.contains(NodeFlags::DEFAULT_EXPANDED),
        }
    }
}

/// Borrowed view of a single node in a [`TreeModel`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    model: &'a TreeModel,
    id: NodeId,
    slot: &'a Slot,
}

impl core::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", &self.slot.key)
            .field("depth", &self.slot.depth)
            .finish_non_exhaustive()
    }
}

impl<'a> NodeRef<'a> {
    /// Id of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Key of this node.
    pub fn key(&self) -> &'a str {
        &self.slot.key
    }

    /// Label of this node.
    pub fn label(&self) -> &'a str {
        &self.slot.label
    }

    /// Depth of this node; roots are at depth 0.
    pub fn depth(&self) -> usize {
        self.slot.depth
    }

    /// Flags of this node.
    pub fn flags(&self) -> NodeFlags {
        self.slot.flags
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.slot.children.is_empty()
    }

    /// Parent of this node, or `None` for roots.
    pub fn parent(&self) -> Option<Self> {
        self.slot.parent.and_then(|p| self.model.node_ref(p))
    }

    /// Children of this node, in display order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        let (model, slot) = (self.model, self.slot);
        slot.children.iter().filter_map(move |&c| model.node_ref(c))
    }

    /// Leaves under this node.
    pub fn leaves(&self) -> Leaves<'a> {
        self.model.leaves_of(self.id)
    }
}
