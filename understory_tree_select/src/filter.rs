// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label filtering: derive a pruned view of a tree from a search query.
//!
//! A node survives iff its own label contains the query, or at least one of
//! its children survives. Surviving branches keep exactly their surviving
//! children, in the original order. The empty query matches every node, so
//! `filter(model, "")` is the identity view.
//!
//! The view is a pure function of the model, the query, and [`FilterOptions`].
//! It is independent of selection and expansion, which apply to it unchanged
//! by [`NodeId`].

use alloc::string::String;
use alloc::vec::Vec;

use understory_tree_model::{Node, NodeFlags, NodeId, TreeModel};

/// How labels are compared with the query.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaseSensitivity {
    /// Compare lowercased label and query.
    #[default]
    Insensitive,
    /// Compare label and query as given.
    Sensitive,
}

/// Which descendants of a matching node survive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchPolicy {
    /// Only nodes that match, plus the ancestors needed to reach them.
    ///
    /// Non-matching descendants of a matching branch are dropped.
    #[default]
    MatchingOnly,
    /// Like [`MatchPolicy::MatchingOnly`], but every descendant of a matching
    /// node survives as well.
    KeepDescendants,
}

/// Options controlling [`filter_with`].
///
/// ```rust
/// use understory_tree_select::{CaseSensitivity, FilterOptions, MatchPolicy};
///
/// let options = FilterOptions::new().case_sensitive().keep_descendants();
/// assert_eq!(options.case, CaseSensitivity::Sensitive);
/// assert_eq!(options.policy, MatchPolicy::KeepDescendants);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterOptions {
    /// Label comparison.
    pub case: CaseSensitivity,
    /// Descendant retention.
    pub policy: MatchPolicy,
}

impl FilterOptions {
    /// Default options: case-insensitive, matching nodes only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare labels case-sensitively.
    #[must_use]
    pub fn case_sensitive(mut self) -> Self {
        self.case = CaseSensitivity::Sensitive;
        self
    }

    /// Keep every descendant of a matching node.
    #[must_use]
    pub fn keep_descendants(mut self) -> Self {
        self.policy = MatchPolicy::KeepDescendants;
        self
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Mark: u8 {
        /// Node is part of the view.
        const RETAINED  = 0b0000_0001;
        /// Node's own label matches.
        const MATCHED   = 0b0000_0010;
        /// Node or one of its ancestors matches.
        const INHERITED = 0b0000_0100;
    }
}

/// A pruned view of a [`TreeModel`], as produced by [`filter`].
///
/// The view stores one mark per node and refers to the model by [`NodeId`];
/// pass the same model that produced it to the traversal methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterView {
    query: String,
    options: FilterOptions,
    marks: Vec<Mark>,
    retained: usize,
}

/// Filter `model` by `query` with default [`FilterOptions`].
///
/// ```rust
/// use understory_tree_model::{Node, TreeModel};
/// use understory_tree_select::filter;
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
/// let view = filter(&model, "1-2");
/// let roots: Vec<_> = view.roots(&model).filter_map(|id| model.key(id)).collect();
/// assert_eq!(roots, ["1"]);
/// assert!(view.contains(model.id_of("1-2").unwrap()));
/// assert!(!view.contains(model.id_of("1-1").unwrap()));
/// ```
pub fn filter(model: &TreeModel, query: &str) -> FilterView {
    filter_with(model, query, FilterOptions::default())
}

/// Filter `model` by `query` with explicit options.
///
/// Runs in time linear in the number of nodes.
pub fn filter_with(model: &TreeModel, query: &str, options: FilterOptions) -> FilterView {
    let mut marks = alloc::vec![Mark::empty(); model.len()];
    let folded;
    let needle = match options.case {
        CaseSensitivity::Insensitive => {
            folded = query.to_lowercase();
            folded.as_str()
        }
        CaseSensitivity::Sensitive => query,
    };
    let matches = |id: NodeId| {
        needle.is_empty()
            || match options.case {
                CaseSensitivity::Insensitive => model.folded_label(id),
                CaseSensitivity::Sensitive => model.label(id),
            }
            .is_some_and(|label| label.contains(needle))
    };

    // Children follow their parent in pre-order, so a reverse sweep visits
    // every child before its parent.
    for id in model.iter().rev() {
        let mut mark = Mark::empty();
        if matches(id) {
            mark |= Mark::MATCHED | Mark::RETAINED;
        }
        if model
            .children_of(id)
            .iter()
            .any(|c| marks[c.index()].contains(Mark::RETAINED))
        {
            mark |= Mark::RETAINED;
        }
        marks[id.index()] = mark;
    }

    if options.policy == MatchPolicy::KeepDescendants {
        // Forward sweep: parents before children.
        for id in model.iter() {
            let own = marks[id.index()].contains(Mark::MATCHED);
            let parent = model
                .parent_of(id)
                .is_some_and(|p| marks[p.index()].contains(Mark::INHERITED));
            if own || parent {
                marks[id.index()] |= Mark::INHERITED | Mark::RETAINED;
            }
        }
    }

    let retained = marks.iter().filter(|m| m.contains(Mark::RETAINED)).count();
    log::trace!(
        "filter {query:?}: {retained} of {} nodes retained",
        model.len()
    );
    FilterView {
        query: query.into(),
        options,
        marks,
        retained,
    }
}

impl FilterView {
    /// The query this view was built from.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The options this view was built with.
    pub fn options(&self) -> FilterOptions {
        self.options
    }

    /// Returns `true` if the query is empty, so the view equals the full tree.
    pub fn is_identity(&self) -> bool {
        self.query.is_empty()
    }

    /// Number of retained nodes.
    pub fn len(&self) -> usize {
        self.retained
    }

    /// Returns `true` if no node survived.
    pub fn is_empty(&self) -> bool {
        self.retained == 0
    }

    fn mark(&self, id: NodeId) -> Mark {
        self.marks.get(id.index()).copied().unwrap_or(Mark::empty())
    }

    /// Returns `true` if `id` is part of the view.
    pub fn contains(&self, id: NodeId) -> bool {
        self.mark(id).contains(Mark::RETAINED)
    }

    /// Returns `true` if the label of `id` itself matches the query.
    ///
    /// Retained ancestors that are only present to reach a match return `false`.
    pub fn is_match(&self, id: NodeId) -> bool {
        self.mark(id).contains(Mark::MATCHED)
    }

    /// Retained roots, in display order.
    pub fn roots<'a>(&'a self, model: &'a TreeModel) -> impl Iterator<Item = NodeId> + 'a {
        model.roots().iter().copied().filter(|&id| self.contains(id))
    }

    /// Retained children of `id`, in display order.
    pub fn children<'a>(
        &'a self,
        model: &'a TreeModel,
        id: NodeId,
    ) -> impl Iterator<Item = NodeId> + 'a {
        model
            .children_of(id)
            .iter()
            .copied()
            .filter(|&c| self.contains(c))
    }

    /// Retained nodes in pre-order.
    pub fn iter<'a>(&'a self, model: &'a TreeModel) -> impl Iterator<Item = NodeId> + 'a {
        model.iter().filter(|&id| self.contains(id))
    }

    /// Rebuild the pruned tree as plain [`Node`] data.
    ///
    /// Leaves keep `children: None`. A surviving branch keeps exactly its
    /// surviving children, which may be an empty list when only the branch's
    /// own label matched.
    pub fn to_nodes(&self, model: &TreeModel) -> Vec<Node> {
        self.roots(model).map(|id| self.to_node(model, id)).collect()
    }

    fn to_node(&self, model: &TreeModel, id: NodeId) -> Node {
        Node {
            key: model.key(id).unwrap_or_default().into(),
            label: model.label(id).unwrap_or_default().into(),
            children: model
                .is_branch(id)
                .then(|| self.children(model, id).map(|c| self.to_node(model, c)).collect()),
            default_expanded: model
                .flags(id)
                .is_some_and(|f| f.contains(NodeFlags::DEFAULT_EXPANDED)),
        }
    }
}
