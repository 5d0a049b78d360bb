#![forbid(unsafe_code)]

//! Hierarchy builder.
//!
//! Turns a root id plus a [`NodeAccessor`] into a rooted tree stored as a
//! preorder arena. The store may change between any two accessor calls; a
//! record that disappears or loses its children simply yields a leaf.
//!
//! # Invariants
//!
//! 1. Each [`NodeRef`] appears at most once. A repeated id (a cycle or a
//!    duplicate introduced mid-build) is skipped, never followed.
//! 2. Children keep their declared order.
//! 3. Index 0 is the root whenever the hierarchy is non-empty.

use std::collections::HashMap;

use hierplot_core::{Children, NodeAccessor, NodeRef};

/// One node of a built hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub id: NodeRef,
    /// Type name from the record; empty when the record was absent.
    pub type_name: String,
    pub parent: Option<NodeRef>,
    pub depth: u32,
    parent_index: Option<usize>,
    children: Vec<usize>,
}

impl HierarchyNode {
    /// Arena indices of the children, in declared order.
    #[inline]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Arena index of the parent.
    #[inline]
    pub fn parent_index(&self) -> Option<usize> {
        self.parent_index
    }

    /// True for nodes without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A rooted tree rebuilt from the store on every refresh.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    index: HashMap<NodeRef, usize>,
    skipped: usize,
}

impl Hierarchy {
    /// Walk the store from `root`.
    ///
    /// Never fails: an unknown root produces a single unexpanded node.
    pub fn build<A>(root: &NodeRef, accessor: &A) -> Self
    where
        A: NodeAccessor + ?Sized,
    {
        let mut nodes: Vec<HierarchyNode> = Vec::new();
        let mut index: HashMap<NodeRef, usize> = HashMap::new();
        let mut stack: Vec<(NodeRef, Option<usize>, u32)> = vec![(root.clone(), None, 0)];
        let mut skipped = 0usize;

        while let Some((id, parent_index, depth)) = stack.pop() {
            if index.contains_key(&id) {
                skipped += 1;
                hierplot_core::debug!(id = %id, "skipping repeated node id during build");
                continue;
            }

            let (type_name, child_ids) = match accessor.get(&id) {
                Some(record) => {
                    let child_ids = match record.children {
                        Children::Ids(ids) => ids,
                        Children::Unknown | Children::Empty => Vec::new(),
                    };
                    (record.name, child_ids)
                }
                None => (String::new(), Vec::new()),
            };

            let idx = nodes.len();
            let parent = parent_index.map(|p| {
                nodes[p].children.push(idx);
                nodes[p].id.clone()
            });

            // Reverse so the first declared child is popped (and placed) first.
            for child in child_ids.into_iter().rev() {
                stack.push((child, Some(idx), depth + 1));
            }

            index.insert(id.clone(), idx);
            nodes.push(HierarchyNode {
                id,
                type_name,
                parent,
                depth,
                parent_index,
                children: Vec::new(),
            });
        }

        hierplot_core::trace!(
            root = %root,
            nodes = nodes.len(),
            skipped,
            "hierarchy built"
        );

        Self {
            nodes,
            index,
            skipped,
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no root was built.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> Option<&HierarchyNode> {
        self.nodes.first()
    }

    /// All nodes in preorder.
    #[inline]
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    /// Node at arena index `idx`.
    #[inline]
    pub fn node(&self, idx: usize) -> Option<&HierarchyNode> {
        self.nodes.get(idx)
    }

    /// Arena index of `id`.
    #[inline]
    pub fn index_of(&self, id: &NodeRef) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Node for `id`.
    pub fn get(&self, id: &NodeRef) -> Option<&HierarchyNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    /// Children of the node at `idx`, in declared order.
    pub fn children(&self, idx: usize) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes
            .get(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&c| &self.nodes[c])
    }

    /// Parent/child id pairs in preorder of the child.
    pub fn links(&self) -> impl Iterator<Item = (&NodeRef, &NodeRef)> {
        self.nodes.iter().filter_map(|node| {
            node.parent_index
                .map(|p| (&self.nodes[p].id, &node.id))
        })
    }

    /// How many repeated ids were dropped while building.
    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Greatest depth present (0 for a lone root or an empty hierarchy).
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}
