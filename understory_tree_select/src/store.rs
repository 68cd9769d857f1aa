// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store: current state, intents, and change notification.
//!
//! ## Overview
//!
//! [`TreeSelect`] owns a [`TreeModel`] together with the current
//! [`SelectionState`], [`ExpansionState`], search text, and [`FilterView`].
//! A presentation layer reads from it and sends it intents:
//!
//! - [`TreeSelect::toggle_check`] applies a cascading check or uncheck.
//! - [`TreeSelect::toggle_expand`] / [`TreeSelect::set_expanded`] change one branch.
//! - [`TreeSelect::set_search_text`] recomputes the pruned view.
//!
//! Each intent runs to completion before returning. If it changed anything,
//! every subscriber is called once with the store and a [`Change`] set.
//!
//! ## Off-thread filtering
//!
//! For large trees the filter can run elsewhere. [`TreeSelect::begin_search`]
//! hands out a [`FilterRequest`] tagged with a generation; run it against the
//! model wherever convenient and pass the [`FilterResult`] back to
//! [`TreeSelect::apply_search`]. Results from a superseded request are
//! dropped and reported as [`SearchOutcome::Stale`].
//!
//! The store keeps its model behind an [`Arc`]; [`TreeSelect::model_handle`]
//! gives a worker its own handle while the store keeps taking intents.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashSet;
use understory_tree_model::{TreeError, TreeModel};

use crate::expansion::ExpansionState;
use crate::filter::{FilterOptions, FilterView, filter_with};
use crate::rows::{VisibleRow, visible_rows};
use crate::selection::{CheckState, SelectionState};

bitflags::bitflags! {
    /// Parts of the store touched by an intent.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Change: u8 {
        /// The selected leaves changed.
        const SELECTION = 0b0000_0001;
        /// A branch was expanded or collapsed.
        const EXPANSION = 0b0000_0010;
        /// The search text, options, or pruned view changed.
        const FILTER    = 0b0000_0100;
    }
}

/// Handle returned by [`TreeSelect::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&TreeSelect, Change)>;

/// A filter computation handed out by [`TreeSelect::begin_search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterRequest {
    generation: u64,
    query: String,
    options: FilterOptions,
}

impl FilterRequest {
    /// The query to filter by.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Generation of this request; later requests have larger generations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Compute the pruned view. Pure, so it may run on any thread.
    pub fn run(self, model: &TreeModel) -> FilterResult {
        FilterResult {
            generation: self.generation,
            view: filter_with(model, &self.query, self.options),
        }
    }
}

/// The output of [`FilterRequest::run`], to be passed to [`TreeSelect::apply_search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterResult {
    generation: u64,
    view: FilterView,
}

impl FilterResult {
    /// Generation of the request that produced this result.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The computed view.
    pub fn view(&self) -> &FilterView {
        &self.view
    }
}

/// What [`TreeSelect::apply_search`] did with a result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    /// The result was for the latest request and is now the visible view.
    Applied,
    /// A newer request was issued since; the result was dropped.
    Stale,
}

/// Tree-select state container.
///
/// ## Example
///
/// ```rust
/// use std::{cell::Cell, rc::Rc};
///
/// use understory_tree_model::{Node, TreeModel};
/// use understory_tree_select::{Change, CheckState, TreeSelect};
///
/// let model = TreeModel::new([
///     Node::branch("1", "Node 1", [
///         Node::leaf("1-1", "Node 1-1"),
///         Node::leaf("1-2", "Node 1-2"),
///     ]),
///     Node::leaf("2", "Node 2"),
/// ])?;
/// let mut store = TreeSelect::new(model);
///
/// let seen = Rc::new(Cell::new(Change::empty()));
/// let sink = seen.clone();
/// store.subscribe(move |_, change| sink.set(sink.get() | change));
///
/// store.toggle_check("1-1", true)?;
/// assert_eq!(store.status_of("1")?, CheckState::Indeterminate);
///
/// store.set_search_text("node 2");
/// assert_eq!(store.visible_tree().len(), 1);
///
/// assert_eq!(seen.get(), Change::SELECTION | Change::FILTER);
/// assert!(store.toggle_check("missing", true).is_err());
/// # Ok::<(), understory_tree_model::TreeError>(())
/// ```
pub struct TreeSelect {
    model: Arc<TreeModel>,
    selection: SelectionState,
    expansion: ExpansionState,
    options: FilterOptions,
    search_text: String,
    view: FilterView,
    /// generation of the latest filter request
    requested: u64,
    /// query of the latest filter request, applied or not
    requested_query: String,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl core::fmt::Debug for TreeSelect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeSelect")
            .field("model", &self.model)
            .field("selected", &self.selection.len())
            .field("search_text", &self.search_text)
            .field("options", &self.options)
            .field("visible", &self.view.len())
            .field("requested", &self.requested)
            .field("requested_query", &self.requested_query)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl TreeSelect {
    /// Create a store with nothing selected, default expansion, and no filter.
    ///
    /// Accepts an owned [`TreeModel`] or an `Arc` already shared elsewhere.
    pub fn new(model: impl Into<Arc<TreeModel>>) -> Self {
        let model = model.into();
        let options = FilterOptions::default();
        let view = filter_with(&model, "", options);
        Self {
            model,
            selection: SelectionState::new(),
            expansion: ExpansionState::new(),
            options,
            search_text: String::new(),
            view,
            requested: 0,
            requested_query: String::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Start from the given selection.
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionState) -> Self {
        self.selection = selection;
        self
    }

    /// Start from the given expansion overlay.
    #[must_use]
    pub fn with_expansion(mut self, expansion: ExpansionState) -> Self {
        self.expansion = expansion;
        self
    }

    /// Use the given filter options.
    #[must_use]
    pub fn with_filter_options(mut self, options: FilterOptions) -> Self {
        self.options = options;
        self.view = filter_with(&self.model, &self.search_text, options);
        self
    }

    // --- read side ---

    /// The tree shape.
    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    /// A shared handle to the model, for running a [`FilterRequest`] on another thread.
    pub fn model_handle(&self) -> Arc<TreeModel> {
        Arc::clone(&self.model)
    }

    /// The current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The current expansion overlay.
    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// The current search text.
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// The current filter options.
    pub fn filter_options(&self) -> FilterOptions {
        self.options
    }

    /// Keys of the selected leaves.
    pub fn selected_leaf_keys(&self) -> HashSet<&str> {
        self.selection.selected_keys(&self.model)
    }

    /// Checkbox status of the node with the given key.
    pub fn status_of(&self, key: &str) -> Result<CheckState, TreeError> {
        let id = self.model.id_of(key)?;
        Ok(self.selection.status_of(&self.model, id))
    }

    /// Whether the node with the given key is an expanded branch.
    pub fn is_expanded(&self, key: &str) -> Result<bool, TreeError> {
        let id = self.model.id_of(key)?;
        Ok(self.expansion.is_expanded(&self.model, id))
    }

    /// The pruned view for the current search text.
    pub fn visible_tree(&self) -> &FilterView {
        &self.view
    }

    /// The pruned view for arbitrary text, without changing the store.
    pub fn visible_tree_for(&self, text: &str) -> FilterView {
        filter_with(&self.model, text, self.options)
    }

    /// Rows to render for the current view, selection, and expansion.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        visible_rows(&self.model, &self.view, &self.selection, &self.expansion)
    }

    // --- intents ---

    /// Check or uncheck a node, cascading to every leaf under it.
    ///
    /// Unknown keys fail with [`TreeError::NotFound`] and leave the store unchanged.
    pub fn toggle_check(&mut self, key: &str, checked: bool) -> Result<(), TreeError> {
        let id = self.model.id_of(key)?;
        let next = self.selection.toggle(&self.model, id, checked);
        log::debug!("toggle_check {key:?} -> {checked}");
        if next != self.selection {
            self.selection = next;
            self.notify(Change::SELECTION);
        }
        Ok(())
    }

    /// Flip the expansion of a node and return its new value.
    ///
    /// Toggling a leaf is accepted and leaves it collapsed.
    pub fn toggle_expand(&mut self, key: &str) -> Result<bool, TreeError> {
        let id = self.model.id_of(key)?;
        let next = self.expansion.toggle(&self.model, id);
        let expanded = next.is_expanded(&self.model, id);
        log::debug!("toggle_expand {key:?} -> {expanded}");
        self.replace_expansion(next);
        Ok(expanded)
    }

    /// Expand or collapse a node.
    pub fn set_expanded(&mut self, key: &str, expanded: bool) -> Result<(), TreeError> {
        let id = self.model.id_of(key)?;
        let next = self.expansion.set_expanded(&self.model, id, expanded);
        log::debug!("set_expanded {key:?} -> {expanded}");
        self.replace_expansion(next);
        Ok(())
    }

    fn replace_expansion(&mut self, next: ExpansionState) {
        if next != self.expansion {
            self.expansion = next;
            self.notify(Change::EXPANSION);
        }
    }

    /// Replace the search text and recompute the pruned view synchronously.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let request = self.begin_search(text);
        let result = request.run(&self.model);
        self.apply_search(result);
    }

    /// Change filter options and recompute the pruned view synchronously.
    ///
    /// The most recently requested query is filtered again, so a search still
    /// in flight is carried over under the new options rather than lost.
    /// Unchanged options are a no-op.
    pub fn set_filter_options(&mut self, options: FilterOptions) {
        if options == self.options {
            return;
        }
        self.options = options;
        let text = self.requested_query.clone();
        self.set_search_text(text);
    }

    /// Issue a filter request for `text`, superseding any earlier request.
    pub fn begin_search(&mut self, text: impl Into<String>) -> FilterRequest {
        self.requested += 1;
        let query = text.into();
        self.requested_query.clone_from(&query);
        FilterRequest {
            generation: self.requested,
            query,
            options: self.options,
        }
    }

    /// Install a filter result if it answers the latest request.
    pub fn apply_search(&mut self, result: FilterResult) -> SearchOutcome {
        if result.generation != self.requested {
            log::debug!(
                "dropping stale filter result {} (latest {})",
                result.generation,
                self.requested
            );
            return SearchOutcome::Stale;
        }
        let changed = result.view != self.view;
        self.search_text = result.view.query().into();
        self.view = result.view;
        log::debug!(
            "search {:?}: {} nodes visible",
            self.search_text,
            self.view.len()
        );
        if changed {
            self.notify(Change::FILTER);
        }
        SearchOutcome::Applied
    }

    // --- subscribers ---

    /// Register a callback run after every intent that changes the store.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Self, Change) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, change: Change) {
        // Subscribers only get `&Self`, so none can be added while we iterate.
        let mut subscribers = core::mem::take(&mut self.subscribers);
        for (_, subscriber) in &mut subscribers {
            subscriber(&*self, change);
        }
        self.subscribers = subscribers;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use understory_tree_model::Node;

    fn store() -> TreeSelect {
        TreeSelect::new(
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
            .unwrap(),
        )
    }

    fn record(store: &mut TreeSelect) -> Rc<RefCell<Vec<Change>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        store.subscribe(move |_, change| sink.borrow_mut().push(change));
        log
    }

    #[test]
    fn check_walkthrough() {
        let mut store = store();
        store.toggle_check("1-2", true).unwrap();
        assert_eq!(
            store.selected_leaf_keys(),
            HashSet::from(["1-2-1", "1-2-2"])
        );
        assert_eq!(store.status_of("1-2"), Ok(CheckState::Checked));
        assert_eq!(store.status_of("1"), Ok(CheckState::Indeterminate));

        store.toggle_check("1-1", true).unwrap();
        assert_eq!(store.status_of("1"), Ok(CheckState::Checked));

        store.toggle_check("1", false).unwrap();
        assert!(store.selected_leaf_keys().is_empty(), "root uncheck clears");
    }

    #[test]
    fn unknown_keys_surface_and_leave_state_alone() {
        let mut store = store();
        let changes = record(&mut store);
        let err = TreeError::NotFound { key: "x".into() };
        assert_eq!(store.toggle_check("x", true), Err(err.clone()));
        assert_eq!(store.toggle_expand("x"), Err(err.clone()));
        assert_eq!(store.set_expanded("x", true), Err(err.clone()));
        assert_eq!(store.status_of("x"), Err(err.clone()));
        assert_eq!(store.is_expanded("x"), Err(err));
        assert!(changes.borrow().is_empty(), "no notifications for failed intents");
    }

    #[test]
    fn subscribers_see_each_effective_change() {
        let mut store = store();
        let changes = record(&mut store);

        store.toggle_check("2", true).unwrap();
        // Re-checking an already selected leaf is a no-op.
        store.toggle_check("2", true).unwrap();
        assert!(store.toggle_expand("1").unwrap(), "now expanded");
        store.set_search_text("1-2");
        store.set_search_text("1-2");

        assert_eq!(
            *changes.borrow(),
            [Change::SELECTION, Change::EXPANSION, Change::FILTER]
        );
    }

    #[test]
    fn subscribers_read_the_new_state() {
        let mut store = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |s, _| sink.borrow_mut().push(s.selection().len()));
        store.toggle_check("1", true).unwrap();
        assert_eq!(*seen.borrow(), [3]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = store();
        let changes = Rc::new(RefCell::new(0_u32));
        let sink = changes.clone();
        let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);
        store.toggle_check("2", true).unwrap();
        assert!(store.unsubscribe(id), "was registered");
        assert!(!store.unsubscribe(id), "already removed");
        store.toggle_check("2", false).unwrap();
        assert_eq!(*changes.borrow(), 1);
    }

    #[test]
    fn stale_filter_results_are_dropped() {
        let mut store = store();
        let first = store.begin_search("1-1");
        let second = store.begin_search("2");
        assert!(second.generation() > first.generation(), "monotonic");

        let late = first.run(store.model());
        let fresh = second.run(store.model());
        assert_eq!(store.apply_search(fresh), SearchOutcome::Applied);
        assert_eq!(store.apply_search(late), SearchOutcome::Stale);
        assert_eq!(store.search_text(), "2");
        assert_eq!(store.visible_tree().query(), "2");
    }

    #[test]
    fn result_is_stale_once_superseded_even_before_newer_arrives() {
        let mut store = store();
        let first = store.begin_search("1-1");
        let _pending = store.begin_search("2");
        assert_eq!(
            store.apply_search(first.run(store.model())),
            SearchOutcome::Stale
        );
        assert_eq!(store.search_text(), "");
    }

    #[test]
    fn filter_scenario_and_rows() {
        let mut store = store();
        store.set_search_text("1-2-1");
        let view = store.visible_tree();
        let model = store.model();
        let kept: Vec<_> = view.iter(model).map(|id| model.key(id).unwrap()).collect();
        assert_eq!(kept, ["1", "1-2", "1-2-1"]);

        // "1" is collapsed, so only the root row shows.
        assert_eq!(store.visible_rows().len(), 1);
        store.set_expanded("1", true).unwrap();
        store.set_expanded("1-2", true).unwrap();
        assert_eq!(store.visible_rows().len(), 3);

        store.set_search_text("");
        assert!(store.visible_tree().is_identity(), "cleared filter");
        assert_eq!(store.visible_rows().len(), 6);
    }

    #[test]
    fn selection_is_shared_between_views() {
        let mut store = store();
        store.set_search_text("1-2-1");
        // Checking a branch through a filtered view still covers all of its leaves.
        store.toggle_check("1-2", true).unwrap();
        store.set_search_text("");
        assert_eq!(
            store.selected_leaf_keys(),
            HashSet::from(["1-2-1", "1-2-2"])
        );
    }

    #[test]
    fn options_apply_to_later_searches() {
        let mut store = store();
        store.set_search_text("NODE 2");
        assert_eq!(store.visible_tree().len(), 1);
        store.set_filter_options(FilterOptions::new().case_sensitive());
        assert!(store.visible_tree().is_empty(), "case now matters");
        assert_eq!(store.visible_tree_for("Node 2").len(), 1);
        assert_eq!(store.search_text(), "NODE 2");
    }

    #[test]
    fn option_change_keeps_the_query_in_flight() {
        let mut store = store();
        store.set_search_text("1");
        let pending = store.begin_search("2");
        store.set_filter_options(FilterOptions::new().case_sensitive());
        assert_eq!(store.search_text(), "2", "latest query refiltered");
        assert_eq!(store.filter_options(), FilterOptions::new().case_sensitive());

        // The result for the old options was superseded by the refilter.
        assert_eq!(
            store.apply_search(pending.run(store.model())),
            SearchOutcome::Stale
        );
        assert_eq!(store.search_text(), "2");
        // "1" plus every node whose label contains "2".
        assert_eq!(store.visible_tree().len(), 5);
    }

    #[test]
    fn unchanged_options_leave_pending_search_alone() {
        let mut store = store();
        let changes = record(&mut store);
        let pending = store.begin_search("2");
        store.set_filter_options(FilterOptions::new());
        assert_eq!(
            store.apply_search(pending.run(store.model())),
            SearchOutcome::Applied
        );
        assert_eq!(store.search_text(), "2");
        assert_eq!(*changes.borrow(), [Change::FILTER]);
    }

    #[test]
    fn filter_request_runs_on_another_thread() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TreeModel>();
        assert_send_sync::<FilterRequest>();
        assert_send_sync::<FilterResult>();

        let mut store = store();
        let model = store.model_handle();
        let request = store.begin_search("1-2");
        let worker = std::thread::spawn(move || request.run(&model));

        // The store keeps taking intents while the filter runs.
        store.toggle_check("2", true).unwrap();
        store.set_expanded("1", true).unwrap();

        let result = worker.join().unwrap();
        assert_eq!(store.apply_search(result), SearchOutcome::Applied);
        assert_eq!(store.search_text(), "1-2");
        assert_eq!(store.visible_tree().len(), 4);
        assert_eq!(store.status_of("2"), Ok(CheckState::Checked));
    }

    #[test]
    fn shared_model_is_accepted() {
        let shared = store().model_handle();
        let store = TreeSelect::new(Arc::clone(&shared));
        assert!(Arc::ptr_eq(&shared, &store.model_handle()), "same allocation");
    }

    #[test]
    fn builder_seeds_state() {
        let model = TreeModel::new(vec![Node::branch(
            "1",
            "Node 1",
            vec![Node::leaf("1-1", "Node 1-1"), Node::leaf("1-2", "Node 1-2")],
        )])
        .unwrap();
        let selection = SelectionState::from_keys(&model, ["1-1"]).unwrap();
        let expansion = ExpansionState::from_keys(&model, ["1"]).unwrap();
        let store = TreeSelect::new(model)
            .with_selection(selection)
            .with_expansion(expansion)
            .with_filter_options(FilterOptions::new().keep_descendants());
        assert_eq!(store.status_of("1"), Ok(CheckState::Indeterminate));
        assert_eq!(store.is_expanded("1"), Ok(true));
        assert_eq!(store.visible_rows().len(), 3);
    }
}
