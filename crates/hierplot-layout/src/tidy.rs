#![forbid(unsafe_code)]

//! Tidy-tree layout (Reingold-Tilford, with the Buchheim/Jünger/Leipert
//! linear-time refinement).
//!
//! Produces one position per hierarchy node. The depth axis runs along `x`
//! (left to right) and siblings are separated along `y`. The engine is fully
//! deterministic: no hashing order, randomness, or clocks affect the output.
//!
//! # Pipeline
//! 1. First walk (post-order): preliminary sibling-axis coordinates, merging
//!    subtree contours with threads.
//! 2. Second walk (pre-order): accumulate modifiers into final coordinates.
//! 3. Fit: rescale the raw extent to exactly fill the area inside the margins.
//!
//! # Degenerate input
//! Zero or negative area collapses every coordinate onto the margin origin;
//! a lone node or a single chain is centred on the sibling axis. No division
//! by zero is possible.

use std::collections::HashMap;

use hierplot_core::NodeRef;
use hierplot_core::geometry::{Point, Sides, Size};

use crate::hierarchy::Hierarchy;

/// Margins kept free around the plotted tree.
pub const DEFAULT_MARGIN: Sides = Sides::new(15.0, 10.0, 15.0, 10.0);

/// Default sibling spacing in raw layout units.
pub const DEFAULT_NODE_SPACING: f64 = 4.0;

/// Inputs to [`layout`] besides the hierarchy itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Host drawing area.
    pub size: Size,
    /// Raw distance between adjacent siblings; cousins get twice this.
    pub node_spacing: f64,
    pub margin: Sides,
}

impl LayoutParams {
    /// Parameters for a `width` x `height` area with the default margin.
    pub fn new(width: f64, height: f64, node_spacing: f64) -> Self {
        Self {
            size: Size::new(width, height),
            node_spacing,
            margin: DEFAULT_MARGIN,
        }
    }

    /// Override the margin (builder).
    #[must_use]
    pub fn margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_NODE_SPACING)
    }
}

/// Final position of one node, in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPosition {
    pub id: NodeRef,
    /// Depth axis.
    pub x: f64,
    /// Sibling axis.
    pub y: f64,
}

impl LayoutPosition {
    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Positions for every node of a hierarchy, in hierarchy preorder.
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    positions: Vec<LayoutPosition>,
    index: HashMap<NodeRef, usize>,
}

impl TreeLayout {
    /// Position of `id`.
    pub fn get(&self, id: &NodeRef) -> Option<&LayoutPosition> {
        self.index.get(id).map(|&i| &self.positions[i])
    }

    /// Position at hierarchy index `idx`.
    #[inline]
    pub fn at(&self, idx: usize) -> Option<&LayoutPosition> {
        self.positions.get(idx)
    }

    /// All positions in hierarchy preorder.
    #[inline]
    pub fn positions(&self) -> &[LayoutPosition] {
        &self.positions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lay out `hierarchy` inside `params.size` minus `params.margin`.
#[must_use]
pub fn layout(hierarchy: &Hierarchy, params: &LayoutParams) -> TreeLayout {
    let n = hierarchy.len();
    if n == 0 {
        return TreeLayout::default();
    }

    let spacing = if params.node_spacing.is_finite() && params.node_spacing > 0.0 {
        params.node_spacing
    } else {
        1.0
    };

    let mut walker = Walker::new(hierarchy, spacing);
    walker.run();

    // Fit the raw extent to the inner area.
    let inner = params.size.inner(params.margin);
    let raw = &walker.x;
    let mut left = 0usize;
    let mut right = 0usize;
    let mut bottom = 0u32;
    for v in 0..n {
        if raw[v] < raw[left] {
            left = v;
        }
        if raw[v] > raw[right] {
            right = v;
        }
        bottom = bottom.max(hierarchy.nodes()[v].depth);
    }
    let s = if left == right {
        spacing
    } else {
        walker.separation(left, right) / 2.0
    };
    let tx = s - raw[left];
    let kx = inner.height / (raw[right] + s + tx);
    let ky = inner.width / f64::from(bottom.max(1));

    let mut positions = Vec::with_capacity(n);
    let mut index = HashMap::with_capacity(n);
    for (v, node) in hierarchy.nodes().iter().enumerate() {
        let y = params.margin.top + (raw[v] + tx) * kx;
        let x = params.margin.left + f64::from(node.depth) * ky;
        index.insert(node.id.clone(), v);
        positions.push(LayoutPosition {
            id: node.id.clone(),
            x: finite_or(x, params.margin.left),
            y: finite_or(y, params.margin.top),
        });
    }

    hierplot_core::trace!(
        nodes = n,
        depth = bottom,
        width = inner.width,
        height = inner.height,
        "tidy layout computed"
    );

    TreeLayout { positions, index }
}

#[inline]
fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

// ---------------------------------------------------------------------------
// Walker state
// ---------------------------------------------------------------------------

/// Per-node scratch state. Index `n` is a virtual parent above the root.
struct Walker<'a> {
    hierarchy: &'a Hierarchy,
    virtual_root: usize,
    spacing: f64,
    /// Preliminary coordinate.
    prelim: Vec<f64>,
    /// Modifier applied to the whole subtree.
    modifier: Vec<f64>,
    change: Vec<f64>,
    shift: Vec<f64>,
    thread: Vec<Option<usize>>,
    ancestor: Vec<usize>,
    default_ancestor: Vec<Option<usize>>,
    /// Index among siblings.
    number: Vec<usize>,
    parent: Vec<usize>,
    /// Final raw sibling-axis coordinate.
    x: Vec<f64>,
}

static ROOT_ONLY: [usize; 1] = [0];

impl<'a> Walker<'a> {
    fn new(hierarchy: &'a Hierarchy, spacing: f64) -> Self {
        let n = hierarchy.len();
        let mut number = vec![0; n + 1];
        let mut parent = vec![n; n + 1];
        for (v, node) in hierarchy.nodes().iter().enumerate() {
            for (i, &c) in node.children().iter().enumerate() {
                number[c] = i;
                parent[c] = v;
            }
        }
        Self {
            hierarchy,
            virtual_root: n,
            spacing,
            prelim: vec![0.0; n + 1],
            modifier: vec![0.0; n + 1],
            change: vec![0.0; n + 1],
            shift: vec![0.0; n + 1],
            thread: vec![None; n + 1],
            ancestor: (0..=n).collect(),
            default_ancestor: vec![None; n + 1],
            number,
            parent,
            x: vec![0.0; n],
        }
    }

    fn children(&self, v: usize) -> &'a [usize] {
        if v == self.virtual_root {
            &ROOT_ONLY
        } else {
            self.hierarchy.nodes()[v].children()
        }
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.parent[a] == self.parent[b] {
            self.spacing
        } else {
            2.0 * self.spacing
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.children(v).first().copied().or(self.thread[v])
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.children(v).last().copied().or(self.thread[v])
    }

    fn run(&mut self) {
        // Left-to-right post-order: reverse of a right-first pre-order.
        let mut order = Vec::with_capacity(self.virtual_root);
        let mut stack = vec![0usize];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend_from_slice(self.children(v));
        }
        for &v in order.iter().rev() {
            self.first_walk(v);
        }

        self.modifier[self.virtual_root] = -self.prelim[0];
        // Arena order is pre-order, so parents are finished before children.
        for v in 0..self.virtual_root {
            let p = self.parent[v];
            self.x[v] = self.prelim[v] + self.modifier[p];
            self.modifier[v] += self.modifier[p];
        }
    }

    fn first_walk(&mut self, v: usize) {
        let kids = self.children(v);
        let p = self.parent[v];
        let siblings = self.children(p);
        let left_sibling = (self.number[v] > 0).then(|| siblings[self.number[v] - 1]);

        if let (Some(&first), Some(&last)) = (kids.first(), kids.last()) {
            self.execute_shifts(v);
            let midpoint = (self.prelim[first] + self.prelim[last]) / 2.0;
            if let Some(w) = left_sibling {
                self.prelim[v] = self.prelim[w] + self.separation(v, w);
                self.modifier[v] = self.prelim[v] - midpoint;
            } else {
                self.prelim[v] = midpoint;
            }
        } else if let Some(w) = left_sibling {
            self.prelim[v] = self.prelim[w] + self.separation(v, w);
        }

        let fallback = self.default_ancestor[p].unwrap_or(siblings[0]);
        self.default_ancestor[p] = Some(self.apportion(v, left_sibling, fallback));
    }

    fn apportion(&mut self, v: usize, left_sibling: Option<usize>, mut default_ancestor: usize) -> usize {
        let Some(w) = left_sibling else {
            return default_ancestor;
        };

        // i = inner, o = outer, p = right subtree (v), m = left forest.
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.children(self.parent[v])[0];
        let mut sip = self.modifier[vip];
        let mut sop = self.modifier[vop];
        let mut sim = self.modifier[vim];
        let mut som = self.modifier[vom];

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            vim = im;
            vip = ip;
            if let Some(om) = self.next_left(vom) {
                vom = om;
            }
            if let Some(op) = self.next_right(vop) {
                vop = op;
            }
            self.ancestor[vop] = v;

            let shift = self.prelim[vim] + sim - self.prelim[vip] - sip + self.separation(vim, vip);
            if shift > 0.0 {
                let wm = self.next_ancestor(vim, v, default_ancestor);
                self.move_subtree(wm, v, shift);
                sip += shift;
                sop += shift;
            }

            sim += self.modifier[vim];
            sip += self.modifier[vip];
            som += self.modifier[vom];
            sop += self.modifier[vop];

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if let Some(im) = next_im
            && self.next_right(vop).is_none()
        {
            self.thread[vop] = Some(im);
            self.modifier[vop] += sim - sop;
        }
        if let Some(ip) = next_ip
            && self.next_left(vom).is_none()
        {
            self.thread[vom] = Some(ip);
            self.modifier[vom] += sip - som;
            default_ancestor = v;
        }

        default_ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, default_ancestor: usize) -> usize {
        let a = self.ancestor[vim];
        if self.parent[a] == self.parent[v] {
            a
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.number[wp].saturating_sub(self.number[wm]).max(1) as f64;
        let change = shift / subtrees;
        self.change[wp] -= change;
        self.shift[wp] += shift;
        self.change[wm] += change;
        self.prelim[wp] += shift;
        self.modifier[wp] += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for &w in self.children(v).iter().rev() {
            self.prelim[w] += shift;
            self.modifier[w] += shift;
            change += self.change[w];
            shift += self.shift[w] + change;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
