#![forbid(unsafe_code)]

//! Parent-to-child link geometry.

use std::fmt::Write as _;

use hierplot_core::geometry::Point;

/// A cubic Bézier from a parent to a child, bending along the depth axis.
///
/// Both control points sit halfway between the endpoints on `x`, so the
/// curve leaves the parent and arrives at the child horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkPath {
    pub source: Point,
    pub c1: Point,
    pub c2: Point,
    pub target: Point,
}

impl LinkPath {
    /// Horizontal link from `source` to `target`.
    pub fn horizontal(source: Point, target: Point) -> Self {
        let mx = (source.x + target.x) / 2.0;
        Self {
            source,
            c1: Point::new(mx, source.y),
            c2: Point::new(mx, target.y),
            target,
        }
    }

    /// A zero-length link collapsed onto `p`.
    pub fn collapsed(p: Point) -> Self {
        Self {
            source: p,
            c1: p,
            c2: p,
            target: p,
        }
    }

    /// Point on the curve at parameter `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point::new(
            a * self.source.x + b * self.c1.x + c * self.c2.x + d * self.target.x,
            a * self.source.y + b * self.c1.y + c * self.c2.y + d * self.target.y,
        )
    }

    /// Interpolate every control point towards `other`.
    pub fn lerp(&self, other: &LinkPath, t: f64) -> LinkPath {
        LinkPath {
            source: self.source.lerp(other.source, t),
            c1: self.c1.lerp(other.c1, t),
            c2: self.c2.lerp(other.c2, t),
            target: self.target.lerp(other.target, t),
        }
    }

    /// SVG path data (`M .. C ..`).
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(64);
        let _ = write!(
            out,
            "M{},{}C{},{},{},{},{},{}",
            self.source.x,
            self.source.y,
            self.c1.x,
            self.c1.y,
            self.c2.x,
            self.c2.y,
            self.target.x,
            self.target.y,
        );
        out
    }
}
