#![forbid(unsafe_code)]

//! Render-state reconciliation for hierarchy plots.
//!
//! Each refresh produces a fresh hierarchy and layout. The [`Reconciler`]
//! compares it with the previous frame by [`NodeRef`](hierplot_core::NodeRef)
//! identity and classifies every node and link as entering, updating, or
//! exiting. The [`TransitionController`] turns those changes into timed
//! motion, and a [`RenderSurface`] receives the resulting drawing commands.

pub mod element;
pub mod paint;
pub mod reconcile;
pub mod surface;
pub mod transition;

pub use element::{LinkKey, LinkRecord, LinkVisual, NodeVisual, RenderElement, Transition};
pub use paint::PaintOrder;
pub use reconcile::{Change, ChangeKind, FrameStyle, Reconciler, Reconciliation};
pub use surface::{RecordingSurface, RenderSurface, SurfaceOp};
pub use transition::{TransitionController, TransitionPolicy};
