#![forbid(unsafe_code)]

//! Hover capability.
//!
//! Hover is purely transient visual state: it is never persisted and never
//! reported to the node store. Hosts that want to observe it pass callbacks
//! in when constructing the tracker.

use crate::node::NodeRef;

/// Callback invoked with the node a pointer entered or left.
pub type HoverCallback = Box<dyn FnMut(&NodeRef)>;

/// Something that can track which node the pointer is over.
pub trait Hoverable {
    /// The node currently under the pointer, if any.
    fn hovered(&self) -> Option<&NodeRef>;

    /// Whether `key` is the hovered node.
    fn is_hovered(&self, key: &NodeRef) -> bool {
        self.hovered() == Some(key)
    }

    /// The pointer entered `key`.
    fn on_pointer_enter(&mut self, key: &NodeRef);

    /// The pointer left `key`.
    fn on_pointer_leave(&mut self, key: &NodeRef);
}

/// Single-target hover tracker with optional observer callbacks.
#[derive(Default)]
pub struct HoverTracker {
    hovered: Option<NodeRef>,
    on_enter: Option<HoverCallback>,
    on_leave: Option<HoverCallback>,
}

impl HoverTracker {
    /// Create a tracker without callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker that reports enter/leave to the given callbacks.
    #[must_use]
    pub fn with_callbacks(on_enter: HoverCallback, on_leave: HoverCallback) -> Self {
        Self {
            hovered: None,
            on_enter: Some(on_enter),
            on_leave: Some(on_leave),
        }
    }

    /// Drop hover state for a node that no longer exists, without notifying.
    pub fn forget(&mut self, key: &NodeRef) {
        if self.hovered.as_ref() == Some(key) {
            self.hovered = None;
        }
    }
}

impl std::fmt::Debug for HoverTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverTracker")
            .field("hovered", &self.hovered)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .finish()
    }
}

impl Hoverable for HoverTracker {
    fn hovered(&self) -> Option<&NodeRef> {
        self.hovered.as_ref()
    }

    fn on_pointer_enter(&mut self, key: &NodeRef) {
        if self.hovered.as_ref() == Some(key) {
            return;
        }
        if let Some(previous) = self.hovered.take()
            && let Some(cb) = self.on_leave.as_mut()
        {
            cb(&previous);
        }
        self.hovered = Some(key.clone());
        if let Some(cb) = self.on_enter.as_mut() {
            cb(key);
        }
    }

    fn on_pointer_leave(&mut self, key: &NodeRef) {
        if self.hovered.as_ref() != Some(key) {
            return;
        }
        self.hovered = None;
        if let Some(cb) = self.on_leave.as_mut() {
            cb(key);
        }
    }
}
