#![forbid(unsafe_code)]

//! Hierarchy building and tree layout.
//!
//! [`Hierarchy::build`] walks the node store from a root id into a transient
//! preorder arena; [`layout`] assigns every node a deterministic position
//! inside the host area; [`LinkPath`] describes the parent-to-child curve.

pub mod hierarchy;
pub mod link;
pub mod tidy;

pub use hierarchy::{Hierarchy, HierarchyNode};
pub use link::LinkPath;
pub use tidy::{DEFAULT_MARGIN, LayoutParams, LayoutPosition, TreeLayout, layout};
