#![forbid(unsafe_code)]

//! Node identity and the external store contract.
//!
//! The store is owned by the host. The engine only ever borrows it for the
//! duration of one call and never keeps a [`NodeRecord`] past the build pass
//! that fetched it.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque, cheaply clonable node identifier.
///
/// Identity is the only key used for diffing between frames; positional
/// indices are never compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(Arc<str>);

impl NodeRef {
    /// Create a node reference from any string-like id.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeRef {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl Borrow<str> for NodeRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Declared children of a node record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Children {
    /// Ordered child ids.
    Ids(Vec<NodeRef>),
    /// The store has not loaded this subtree yet.
    Unknown,
    /// No children.
    #[default]
    Empty,
}

impl Children {
    /// Child ids to descend into. `Unknown` and `Empty` both yield none.
    #[must_use]
    pub fn ids(&self) -> &[NodeRef] {
        match self {
            Self::Ids(ids) => ids,
            Self::Unknown | Self::Empty => &[],
        }
    }

    /// Whether this record expands into at least one child.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.ids().is_empty()
    }
}

impl From<Vec<NodeRef>> for Children {
    fn from(ids: Vec<NodeRef>) -> Self {
        if ids.is_empty() {
            Self::Empty
        } else {
            Self::Ids(ids)
        }
    }
}

/// A record as returned by the store. Read-only from the engine's side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeRecord {
    /// Declared type name, used for color lookup.
    pub name: String,
    pub children: Children,
}

impl NodeRecord {
    /// Create a record with the given type name and child ids.
    pub fn new<I, R>(name: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<NodeRef>,
    {
        Self {
            name: name.into(),
            children: children.into_iter().map(Into::into).collect::<Vec<_>>().into(),
        }
    }

    /// Create a childless record.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Children::Empty,
        }
    }

    /// Create a record whose subtree is not loaded yet.
    pub fn unloaded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Children::Unknown,
        }
    }
}

/// Read access to node records.
///
/// Implementations may be re-entered any number of times during a single
/// build pass, and may change between two calls.
pub trait NodeAccessor {
    /// Fetch the record for `id`, or `None` if the store has no such node.
    fn get(&self, id: &NodeRef) -> Option<NodeRecord>;
}

impl<F> NodeAccessor for F
where
    F: Fn(&NodeRef) -> Option<NodeRecord>,
{
    fn get(&self, id: &NodeRef) -> Option<NodeRecord> {
        self(id)
    }
}

/// Full store contract: reads plus the selection call-through.
pub trait NodeStore: NodeAccessor {
    /// Ask the store to select `id`.
    fn select(&mut self, id: &NodeRef);

    /// The selection as currently reported by the store.
    fn selected(&self) -> Option<NodeRef>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ref_equality_is_by_value() {
        let a = NodeRef::new("c1");
        let b = NodeRef::from(String::from("c1"));
        assert_eq!(a, b);
        assert_ne!(a, NodeRef::from("c2"));
        assert_eq!(a.to_string(), "c1");
    }

    #[test]
    fn empty_id_list_collapses_to_empty() {
        let record = NodeRecord::new("View", Vec::<NodeRef>::new());
        assert_eq!(record.children, Children::Empty);
        assert!(record.children.is_leaf());
    }

    #[test]
    fn unknown_children_expand_to_nothing() {
        let record = NodeRecord::unloaded("View");
        assert!(record.children.ids().is_empty());
        assert!(record.children.is_leaf());
    }

    #[test]
    fn ids_preserve_declared_order() {
        let record = NodeRecord::new("View", ["b", "a", "c"]);
        let ids: Vec<&str> = record.children.ids().iter().map(NodeRef::as_str).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn closures_are_accessors() {
        let accessor = |id: &NodeRef| (id.as_str() == "root").then(|| NodeRecord::leaf("View"));
        assert!(accessor.get(&NodeRef::from("root")).is_some());
        assert!(accessor.get(&NodeRef::from("missing")).is_none());
    }
}
