#![forbid(unsafe_code)]

//! Render surfaces.
//!
//! A [`RenderSurface`] is the host-side retained drawing (an SVG document, a
//! canvas scene graph, a terminal buffer). The engine only ever issues keyed
//! commands; surfaces that can interpolate on their own use the supplied
//! [`Transition`], the rest sample the transition controller every frame.

use std::collections::HashMap;

use hierplot_core::NodeRef;

use crate::element::{LinkKey, LinkVisual, NodeVisual, Transition};
use crate::paint::PaintOrder;

/// Keyed drawing commands issued by the engine.
pub trait RenderSurface {
    /// Create or move a node towards `visual`.
    fn upsert_node(&mut self, visual: &NodeVisual, transition: Transition);

    /// Remove a node immediately.
    fn remove_node(&mut self, key: &NodeRef);

    /// Create or move a link towards `visual`.
    fn upsert_link(&mut self, visual: &LinkVisual, transition: Transition);

    /// Remove a link immediately.
    fn remove_link(&mut self, key: &LinkKey);

    /// Set a node's stroke width immediately.
    fn set_stroke(&mut self, key: &NodeRef, width: f64);

    /// Animate a node's displayed radius.
    fn set_radius(&mut self, key: &NodeRef, radius: f64, transition: Transition);

    /// Paint `key` above every other node.
    fn raise_node(&mut self, key: &NodeRef);

    /// Replace the node paint order, listed bottom to top.
    fn restack_nodes(&mut self, bottom_to_top: &[NodeRef]);

    /// Paint link `key` above every other link.
    fn raise_link(&mut self, key: &LinkKey);
}

/// One command received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    UpsertNode(NodeVisual, Transition),
    RemoveNode(NodeRef),
    UpsertLink(LinkVisual, Transition),
    RemoveLink(LinkKey),
    SetStroke(NodeRef, f64),
    SetRadius(NodeRef, f64, Transition),
    RaiseNode(NodeRef),
    RestackNodes(Vec<NodeRef>),
    RaiseLink(LinkKey),
}

/// A surface that keeps the final drawn state plus a log of every command.
///
/// Transitions are recorded but applied instantly.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    nodes: HashMap<NodeRef, NodeVisual>,
    links: HashMap<LinkKey, LinkVisual>,
    order: PaintOrder,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, key: &NodeRef) -> Option<&NodeVisual> {
        self.nodes.get(key)
    }

    pub fn link(&self, key: &LinkKey) -> Option<&LinkVisual> {
        self.links.get(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Node keys bottom to top.
    pub fn paint_order(&self) -> &[NodeRef] {
        self.order.nodes()
    }

    /// Link keys bottom to top.
    pub fn link_order(&self) -> &[LinkKey] {
        self.order.links()
    }

    /// Every command received so far.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drain the command log, keeping drawn state.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }
}

impl RenderSurface for RecordingSurface {
    fn upsert_node(&mut self, visual: &NodeVisual, transition: Transition) {
        if self.nodes.insert(visual.key.clone(), visual.clone()).is_none() {
            self.order.push_node(visual.key.clone());
        }
        self.ops.push(SurfaceOp::UpsertNode(visual.clone(), transition));
    }

    fn remove_node(&mut self, key: &NodeRef) {
        self.nodes.remove(key);
        self.order.remove_node(key);
        self.ops.push(SurfaceOp::RemoveNode(key.clone()));
    }

    fn upsert_link(&mut self, visual: &LinkVisual, transition: Transition) {
        if self.links.insert(visual.key.clone(), visual.clone()).is_none() {
            self.order.push_link(visual.key.clone());
        }
        self.ops.push(SurfaceOp::UpsertLink(visual.clone(), transition));
    }

    fn remove_link(&mut self, key: &LinkKey) {
        self.links.remove(key);
        self.order.remove_link(key);
        self.ops.push(SurfaceOp::RemoveLink(key.clone()));
    }

    fn set_stroke(&mut self, key: &NodeRef, width: f64) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.stroke_width = width;
        }
        self.ops.push(SurfaceOp::SetStroke(key.clone(), width));
    }

    fn set_radius(&mut self, key: &NodeRef, radius: f64, transition: Transition) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.radius = radius;
        }
        self.ops.push(SurfaceOp::SetRadius(key.clone(), radius, transition));
    }

    fn raise_node(&mut self, key: &NodeRef) {
        self.order.raise_node(key);
        self.ops.push(SurfaceOp::RaiseNode(key.clone()));
    }

    fn restack_nodes(&mut self, bottom_to_top: &[NodeRef]) {
        let drawn: Vec<NodeRef> = bottom_to_top
            .iter()
            .filter(|k| self.nodes.contains_key(*k))
            .cloned()
            .collect();
        self.order.set_nodes(drawn);
        self.ops.push(SurfaceOp::RestackNodes(bottom_to_top.to_vec()));
    }

    fn raise_link(&mut self, key: &LinkKey) {
        self.order.raise_link(key);
        self.ops.push(SurfaceOp::RaiseLink(key.clone()));
    }
}
