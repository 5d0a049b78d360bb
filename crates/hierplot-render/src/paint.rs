#![forbid(unsafe_code)]

//! Paint order and hit testing.
//!
//! Nodes paint above links; within each layer the last entry is topmost.
//! New keys enter on top. Hit testing walks nodes from the top down, so
//! overlapping circles resolve to whichever is painted last.

use std::collections::HashSet;

use hierplot_core::NodeRef;
use hierplot_core::geometry::Point;

use crate::element::{LinkKey, NodeVisual};
use crate::reconcile::{ChangeKind, Reconciliation};

/// Bottom-to-top drawing order of nodes and links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaintOrder {
    nodes: Vec<NodeRef>,
    links: Vec<LinkKey>,
}

impl PaintOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entering keys on top and drop exiting ones.
    pub fn apply(&mut self, rec: &Reconciliation) {
        let exited: HashSet<&NodeRef> = rec.nodes_of(ChangeKind::Exit).collect();
        if !exited.is_empty() {
            self.nodes.retain(|k| !exited.contains(k));
        }
        self.nodes.extend(rec.nodes_of(ChangeKind::Enter).cloned());

        let exited: HashSet<&LinkKey> = rec.links_of(ChangeKind::Exit).collect();
        if !exited.is_empty() {
            self.links.retain(|k| !exited.contains(k));
        }
        self.links.extend(rec.links_of(ChangeKind::Enter).cloned());
    }

    /// Add a node on top unless already present.
    pub fn push_node(&mut self, key: NodeRef) {
        if !self.nodes.contains(&key) {
            self.nodes.push(key);
        }
    }

    pub fn remove_node(&mut self, key: &NodeRef) {
        self.nodes.retain(|k| k != key);
    }

    /// Add a link on top unless already present.
    pub fn push_link(&mut self, key: LinkKey) {
        if !self.links.contains(&key) {
            self.links.push(key);
        }
    }

    pub fn remove_link(&mut self, key: &LinkKey) {
        self.links.retain(|k| k != key);
    }

    /// Move `key` to the top of the node layer.
    pub fn raise_node(&mut self, key: &NodeRef) -> bool {
        move_to(&mut self.nodes, key)
    }

    /// Rebuild the node layer in one pass: `preorder` reversed at the
    /// bottom, then any keys it does not name, then `top`.
    ///
    /// Keys not already in the layer are ignored.
    pub fn restack<'a, I>(&mut self, preorder: I, top: Option<&NodeRef>)
    where
        I: IntoIterator<Item = &'a NodeRef>,
        I::IntoIter: DoubleEndedIterator,
    {
        let current = std::mem::take(&mut self.nodes);
        let present: HashSet<&NodeRef> = current.iter().collect();
        let mut placed: HashSet<&NodeRef> = HashSet::with_capacity(current.len());
        for key in preorder.into_iter().rev() {
            if Some(key) != top && present.contains(key) && placed.insert(key) {
                self.nodes.push(key.clone());
            }
        }
        let mut raised = None;
        for key in &current {
            if placed.contains(key) {
                continue;
            }
            if Some(key) == top {
                raised = Some(key.clone());
            } else {
                self.nodes.push(key.clone());
            }
        }
        self.nodes.extend(raised);
    }

    /// Replace the node layer with `bottom_to_top`.
    pub fn set_nodes(&mut self, bottom_to_top: Vec<NodeRef>) {
        self.nodes = bottom_to_top;
    }

    /// Move `key` to the top of the link layer.
    pub fn raise_link(&mut self, key: &LinkKey) -> bool {
        move_to(&mut self.links, key)
    }

    /// Nodes, bottom to top.
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    /// Links, bottom to top.
    pub fn links(&self) -> &[LinkKey] {
        &self.links
    }

    /// The topmost node whose circle contains `p`.
    pub fn hit_test<F>(&self, p: Point, visual: F) -> Option<&NodeRef>
    where
        F: Fn(&NodeRef) -> Option<NodeVisual>,
    {
        self.nodes
            .iter()
            .rev()
            .find(|key| visual(key).is_some_and(|v| v.contains(p)))
    }
}

fn move_to<T: PartialEq>(items: &mut Vec<T>, key: &T) -> bool {
    let Some(idx) = items.iter().position(|k| k == key) else {
        return false;
    };
    let item = items.remove(idx);
    items.push(item);
    true
}
