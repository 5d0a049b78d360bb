#![forbid(unsafe_code)]

//! Retained render state and the visuals handed to surfaces.

use std::fmt;
use std::time::Duration;

use hierplot_core::NodeRef;
use hierplot_core::geometry::Point;
use hierplot_layout::LinkPath;
use hierplot_style::Rgb;

/// The retained state of one drawn node.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderElement {
    pub key: NodeRef,
    pub position: Point,
    /// Structural radius (without any hover boost).
    pub radius: f64,
    pub fill: Rgb,
    pub stroke_width: f64,
}

/// Identity of a link: the (parent, child) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkKey {
    pub parent: NodeRef,
    pub child: NodeRef,
}

impl LinkKey {
    pub fn new(parent: impl Into<NodeRef>, child: impl Into<NodeRef>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.parent, self.child)
    }
}

/// The retained state of one drawn link.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkRecord {
    pub key: LinkKey,
    pub path: LinkPath,
}

/// A node as it should look right now.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub key: NodeRef,
    pub position: Point,
    /// Structural radius plus hover boost.
    pub radius: f64,
    pub fill: Rgb,
    pub stroke: Rgb,
    pub stroke_width: f64,
}

impl NodeVisual {
    /// Whether `p` falls inside the node's circle.
    pub fn contains(&self, p: Point) -> bool {
        self.position.distance_to(p) <= self.radius
    }
}

/// A link as it should look right now.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkVisual {
    pub key: LinkKey,
    pub path: LinkPath,
    pub stroke: Rgb,
    pub stroke_width: f64,
}

/// How a surface should get from its current value to the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    pub duration: Duration,
}

impl Transition {
    /// Apply at once.
    pub const NONE: Self = Self {
        duration: Duration::ZERO,
    };

    pub const fn over(duration: Duration) -> Self {
        Self { duration }
    }

    #[inline]
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }
}
