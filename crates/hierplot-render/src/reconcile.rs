#![forbid(unsafe_code)]

//! Identity-keyed reconciliation of render state.
//!
//! Nodes are matched by [`NodeRef`]; links by their `(parent, child)`
//! [`LinkKey`]. Only one previous generation is retained.
//!
//! # Invariants
//!
//! 1. Every key of the current frame is either `Enter` or `Update`; every key
//!    of the previous frame that is gone is `Exit`. No key appears twice.
//! 2. Changes are ordered by current preorder, then exits in previous order.
//! 3. Reordering siblings never produces an enter or an exit.
//! 4. A node's fill is decided when it enters and carried forward after.

use std::collections::HashMap;

use hierplot_core::NodeRef;
use hierplot_core::geometry::Point;
use hierplot_layout::{Hierarchy, LinkPath, TreeLayout};
use hierplot_style::{Palette, Theme, TypeColors};

use crate::element::{LinkKey, LinkRecord, RenderElement};

/// Default radius of a non-root node.
pub const DEFAULT_NODE_RADIUS: f64 = 4.0;
/// Default radius of the root node.
pub const DEFAULT_ROOT_RADIUS: f64 = 10.0;

/// How a key changed between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present only in the current frame.
    Enter,
    /// Present in both frames.
    Update,
    /// Present only in the previous frame.
    Exit,
}

/// One reconciled key with its state on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct Change<K, T> {
    pub key: K,
    pub kind: ChangeKind,
    /// Previous-frame state (`Update`, `Exit`).
    pub before: Option<T>,
    /// Current-frame state (`Enter`, `Update`).
    pub after: Option<T>,
}

impl<K, T: PartialEq> Change<K, T> {
    /// True for an update whose state differs between frames.
    pub fn moved(&self) -> bool {
        self.kind == ChangeKind::Update && self.before != self.after
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub nodes: Vec<Change<NodeRef, RenderElement>>,
    pub links: Vec<Change<LinkKey, LinkRecord>>,
    pub entered_nodes: usize,
    pub updated_nodes: usize,
    pub moved_nodes: usize,
    pub exited_nodes: usize,
    pub entered_links: usize,
    pub updated_links: usize,
    pub moved_links: usize,
    pub exited_links: usize,
}

impl Reconciliation {
    /// True when nothing entered, exited, or moved.
    #[must_use]
    pub fn is_steady(&self) -> bool {
        self.entered_nodes == 0
            && self.exited_nodes == 0
            && self.moved_nodes == 0
            && self.entered_links == 0
            && self.exited_links == 0
            && self.moved_links == 0
    }

    /// Node changes of one kind.
    pub fn nodes_of(&self, kind: ChangeKind) -> impl Iterator<Item = &NodeRef> {
        self.nodes
            .iter()
            .filter(move |c| c.kind == kind)
            .map(|c| &c.key)
    }

    /// Link changes of one kind.
    pub fn links_of(&self, kind: ChangeKind) -> impl Iterator<Item = &LinkKey> {
        self.links
            .iter()
            .filter(move |c| c.kind == kind)
            .map(|c| &c.key)
    }
}

/// Style inputs that decide how entering nodes look.
#[derive(Debug, Clone, Copy)]
pub struct FrameStyle<'a> {
    pub type_colors: &'a TypeColors,
    pub palette: &'a Palette,
    pub theme: &'a Theme,
    pub node_radius: f64,
    pub root_radius: f64,
}

impl<'a> FrameStyle<'a> {
    pub fn new(type_colors: &'a TypeColors, palette: &'a Palette, theme: &'a Theme) -> Self {
        Self {
            type_colors,
            palette,
            theme,
            node_radius: DEFAULT_NODE_RADIUS,
            root_radius: DEFAULT_ROOT_RADIUS,
        }
    }

    #[must_use]
    pub fn radii(mut self, node_radius: f64, root_radius: f64) -> Self {
        self.node_radius = node_radius;
        self.root_radius = root_radius;
        self
    }
}

/// Holds the previous render generation and diffs new frames against it.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    elements: HashMap<NodeRef, RenderElement>,
    order: Vec<NodeRef>,
    links: HashMap<LinkKey, LinkRecord>,
    link_order: Vec<LinkKey>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff the frame described by `hierarchy` and `layout` against the
    /// retained generation, then retain the new frame.
    pub fn reconcile(
        &mut self,
        hierarchy: &Hierarchy,
        layout: &TreeLayout,
        style: &FrameStyle<'_>,
    ) -> Reconciliation {
        let mut out = Reconciliation::default();
        let mut next_elements = HashMap::with_capacity(hierarchy.len());
        let mut next_order = Vec::with_capacity(hierarchy.len());

        for (idx, node) in hierarchy.nodes().iter().enumerate() {
            let position = layout
                .get(&node.id)
                .map_or_else(Point::default, |p| p.point());
            let radius = if idx == 0 {
                style.root_radius
            } else {
                style.node_radius
            };

            let change = match self.elements.remove(&node.id) {
                Some(before) => {
                    let after = RenderElement {
                        position,
                        radius,
                        ..before.clone()
                    };
                    out.updated_nodes += 1;
                    Change {
                        key: node.id.clone(),
                        kind: ChangeKind::Update,
                        before: Some(before),
                        after: Some(after),
                    }
                }
                None => {
                    let after = RenderElement {
                        key: node.id.clone(),
                        position,
                        radius,
                        fill: style
                            .type_colors
                            .fill(&node.type_name, style.palette, style.theme),
                        stroke_width: 0.0,
                    };
                    out.entered_nodes += 1;
                    Change {
                        key: node.id.clone(),
                        kind: ChangeKind::Enter,
                        before: None,
                        after: Some(after),
                    }
                }
            };
            if change.moved() {
                out.moved_nodes += 1;
            }
            if let Some(after) = &change.after {
                next_elements.insert(node.id.clone(), after.clone());
            }
            next_order.push(node.id.clone());
            out.nodes.push(change);
        }

        // Whatever is left in the old generation has exited.
        for key in std::mem::take(&mut self.order) {
            if let Some(before) = self.elements.remove(&key) {
                out.exited_nodes += 1;
                out.nodes.push(Change {
                    key,
                    kind: ChangeKind::Exit,
                    before: Some(before),
                    after: None,
                });
            }
        }

        let mut next_links = HashMap::with_capacity(hierarchy.len());
        let mut next_link_order = Vec::with_capacity(hierarchy.len());
        for (parent, child) in hierarchy.links() {
            let key = LinkKey::new(parent.clone(), child.clone());
            let source = next_elements
                .get(parent)
                .map_or_else(Point::default, |e: &RenderElement| e.position);
            let target = next_elements
                .get(child)
                .map_or_else(Point::default, |e: &RenderElement| e.position);
            let after = LinkRecord {
                key: key.clone(),
                path: LinkPath::horizontal(source, target),
            };
            let change = match self.links.remove(&key) {
                Some(before) => {
                    out.updated_links += 1;
                    Change {
                        key: key.clone(),
                        kind: ChangeKind::Update,
                        before: Some(before),
                        after: Some(after.clone()),
                    }
                }
                None => {
                    out.entered_links += 1;
                    Change {
                        key: key.clone(),
                        kind: ChangeKind::Enter,
                        before: None,
                        after: Some(after.clone()),
                    }
                }
            };
            if change.moved() {
                out.moved_links += 1;
            }
            next_links.insert(key.clone(), after);
            next_link_order.push(key);
            out.links.push(change);
        }

        for key in std::mem::take(&mut self.link_order) {
            if let Some(before) = self.links.remove(&key) {
                out.exited_links += 1;
                out.links.push(Change {
                    key,
                    kind: ChangeKind::Exit,
                    before: Some(before),
                    after: None,
                });
            }
        }

        self.elements = next_elements;
        self.order = next_order;
        self.links = next_links;
        self.link_order = next_link_order;

        tracing::debug!(
            entered = out.entered_nodes,
            updated = out.updated_nodes,
            moved = out.moved_nodes,
            exited = out.exited_nodes,
            links_entered = out.entered_links,
            links_exited = out.exited_links,
            "frame reconciled"
        );
        out
    }

    /// Retained element for `key`.
    pub fn element(&self, key: &NodeRef) -> Option<&RenderElement> {
        self.elements.get(key)
    }

    /// Retained elements in current preorder.
    pub fn elements(&self) -> impl Iterator<Item = &RenderElement> {
        self.order.iter().filter_map(|k| self.elements.get(k))
    }

    /// Retained link for `key`.
    pub fn link(&self, key: &LinkKey) -> Option<&LinkRecord> {
        self.links.get(key)
    }

    /// Retained links in current preorder of the child.
    pub fn links(&self) -> impl Iterator<Item = &LinkRecord> {
        self.link_order.iter().filter_map(|k| self.links.get(k))
    }

    /// Keys of the current frame's incoming link for `child`.
    pub fn incoming_link(&self, child: &NodeRef) -> Option<&LinkKey> {
        self.link_order.iter().find(|k| &k.child == child)
    }

    /// Record a new stroke width. Returns false for unknown keys.
    pub fn set_stroke(&mut self, key: &NodeRef, width: f64) -> bool {
        match self.elements.get_mut(key) {
            Some(element) => {
                element.stroke_width = width;
                true
            }
            None => false,
        }
    }

    /// Number of retained elements.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hierplot_core::NodeRecord;
    use hierplot_layout::{LayoutParams, layout};
    use hierplot_style::themes;

    struct Fixture {
        store: HashMap<NodeRef, NodeRecord>,
        colors: TypeColors,
        palette: Palette,
        theme: Theme,
    }

    impl Fixture {
        fn example() -> Self {
            let mut store = HashMap::new();
            store.insert(NodeRef::from("root"), NodeRecord::new("View", ["c1", "c2"]));
            store.insert(NodeRef::from("c1"), NodeRecord::leaf("Text"));
            store.insert(NodeRef::from("c2"), NodeRecord::leaf("Button"));
            Self {
                store,
                colors: TypeColors::default(),
                palette: Palette::category10(),
                theme: themes::dark(),
            }
        }

        fn frame(&self, reconciler: &mut Reconciler) -> Reconciliation {
            let accessor = |id: &NodeRef| self.store.get(id).cloned();
            let h = Hierarchy::build(&NodeRef::from("root"), &accessor);
            let l = layout(&h, &LayoutParams::new(50.0, 50.0, 4.0));
            let style = FrameStyle::new(&self.colors, &self.palette, &self.theme);
            reconciler.reconcile(&h, &l, &style)
        }
    }

    fn keys(iter: impl Iterator<Item = impl ToString>) -> Vec<String> {
        iter.map(|k| k.to_string()).collect()
    }

    #[test]
    fn first_frame_is_all_enter() {
        let fx = Fixture::example();
        let mut r = Reconciler::new();
        let rec = fx.frame(&mut r);
        assert_eq!(rec.entered_nodes, 3);
        assert_eq!(rec.entered_links, 2);
        assert_eq!(keys(rec.nodes_of(ChangeKind::Enter)), ["root", "c1", "c2"]);

        let root = r.element(&NodeRef::from("root")).unwrap();
        assert_eq!(root.radius, DEFAULT_ROOT_RADIUS);
        assert_eq!(root.stroke_width, 0.0);
        assert_eq!(root.fill, fx.palette.get(0).unwrap());
        assert_eq!(r.element(&NodeRef::from("c2")).unwrap().fill, fx.palette.get(3).unwrap());
    }

    #[test]
    fn unchanged_store_is_steady() {
        let fx = Fixture::example();
        let mut r = Reconciler::new();
        fx.frame(&mut r);
        let rec = fx.frame(&mut r);
        assert!(rec.is_steady());
        assert_eq!(rec.updated_nodes, 3);
        assert_eq!(rec.updated_links, 2);
    }

    #[test]
    fn removed_child_exits_with_its_link() {
        let mut fx = Fixture::example();
        let mut r = Reconciler::new();
        fx.frame(&mut r);
        fx.store.insert(NodeRef::from("root"), NodeRecord::new("View", ["c1"]));
        let rec = fx.frame(&mut r);
        assert_eq!(keys(rec.nodes_of(ChangeKind::Exit)), ["c2"]);
        assert_eq!(keys(rec.nodes_of(ChangeKind::Update)), ["root", "c1"]);
        assert_eq!(keys(rec.links_of(ChangeKind::Exit)), ["root/c2"]);
        assert!(r.element(&NodeRef::from("c2")).is_none());
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn fill_is_carried_forward_when_type_changes() {
        let mut fx = Fixture::example();
        let mut r = Reconciler::new();
        fx.frame(&mut r);
        fx.store.insert(NodeRef::from("c1"), NodeRecord::leaf("Image"));
        fx.frame(&mut r);
        assert_eq!(r.element(&NodeRef::from("c1")).unwrap().fill, fx.palette.get(2).unwrap());
    }

    #[test]
    fn stroke_survives_updates() {
        let fx = Fixture::example();
        let mut r = Reconciler::new();
        fx.frame(&mut r);
        assert!(r.set_stroke(&NodeRef::from("c1"), 3.0));
        assert!(!r.set_stroke(&NodeRef::from("nope"), 3.0));
        fx.frame(&mut r);
        assert_eq!(r.element(&NodeRef::from("c1")).unwrap().stroke_width, 3.0);
    }

    #[test]
    fn sibling_swap_moves_without_churn() {
        let mut fx = Fixture::example();
        let mut r = Reconciler::new();
        fx.frame(&mut r);
        fx.store.insert(NodeRef::from("root"), NodeRecord::new("View", ["c2", "c1"]));
        let rec = fx.frame(&mut r);
        assert_eq!(rec.entered_nodes + rec.exited_nodes, 0);
        assert_eq!(rec.entered_links + rec.exited_links, 0);
        assert_eq!(rec.moved_nodes, 2);
        assert_eq!(keys(rec.nodes_of(ChangeKind::Update)), ["root", "c2", "c1"]);
    }

    #[test]
    fn incoming_link_lookup() {
        let fx = Fixture::example();
        let mut r = Reconciler::new();
        fx.frame(&mut r);
        assert_eq!(r.incoming_link(&NodeRef::from("c2")), Some(&LinkKey::new("root", "c2")));
        assert_eq!(r.incoming_link(&NodeRef::from("root")), None);
    }
}
