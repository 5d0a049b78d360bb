#![forbid(unsafe_code)]

//! Core: node identity, store access, geometry, animation, and hover state.

pub mod animation;
pub mod geometry;
pub mod hover;
pub mod logging;
pub mod node;

pub use node::{Children, NodeAccessor, NodeRecord, NodeRef, NodeStore};

#[cfg(feature = "tracing")]
pub use logging::{debug, trace};
