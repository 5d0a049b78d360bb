#![forbid(unsafe_code)]

//! Selection state.
//!
//! The store owns the selection; the plot keeps an optimistic local copy so
//! a click is reflected before the store round-trips. On refresh the store's
//! answer wins.

use hierplot_core::{NodeRef, NodeStore};

/// Outbound callback invoked after a node is clicked.
pub type DataPointCallback = Box<dyn FnMut(&NodeRef)>;

/// The plot's local view of the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub current: Option<NodeRef>,
}

impl SelectionState {
    #[inline]
    pub fn is_selected(&self, key: &NodeRef) -> bool {
        self.current.as_ref() == Some(key)
    }
}

/// Applies clicks and store synchronisation to a [`SelectionState`].
#[derive(Default)]
pub struct SelectionManager {
    state: SelectionState,
    on_data_point_click: Option<DataPointCallback>,
}

impl std::fmt::Debug for SelectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionManager")
            .field("state", &self.state)
            .field("on_data_point_click", &self.on_data_point_click.is_some())
            .finish()
    }
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager that reports clicks to `callback`.
    pub fn with_callback(callback: DataPointCallback) -> Self {
        Self {
            state: SelectionState::default(),
            on_data_point_click: Some(callback),
        }
    }

    /// Replace the click callback.
    pub fn set_callback(&mut self, callback: Option<DataPointCallback>) {
        self.on_data_point_click = callback;
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn current(&self) -> Option<&NodeRef> {
        self.state.current.as_ref()
    }

    /// Select `id` locally, forward it to the store, then notify the host.
    ///
    /// Returns the previously selected node.
    pub fn click<S>(&mut self, id: &NodeRef, store: &mut S) -> Option<NodeRef>
    where
        S: NodeStore + ?Sized,
    {
        let previous = self.state.current.replace(id.clone());
        store.select(id);
        if let Some(cb) = self.on_data_point_click.as_mut() {
            cb(id);
        }
        tracing::debug!(node = %id, "node selected");
        previous
    }

    /// Adopt the store's selection. Returns true when the local state changed.
    ///
    /// Never calls [`NodeStore::select`].
    pub fn sync<S>(&mut self, store: &S) -> bool
    where
        S: NodeStore + ?Sized,
    {
        let reported = store.selected();
        if reported == self.state.current {
            return false;
        }
        tracing::debug!(
            from = ?self.state.current.as_ref().map(NodeRef::as_str),
            to = ?reported.as_ref().map(NodeRef::as_str),
            "selection synced from store"
        );
        self.state.current = reported;
        true
    }
}
