#![forbid(unsafe_code)]

//! Timed transitions for reconciled render state.
//!
//! Two policies run side by side on every node:
//!
//! - **Structural** (default 300 ms): position, structural radius, and link
//!   paths move to the layout produced by the latest refresh.
//! - **Highlight** (default 200 ms): the hover radius boost.
//!
//! The visible radius is the sum of both channels, so a refresh that lands
//! while a node is hovered keeps the boost, and leaving a node mid-refresh
//! does not cancel its structural motion. Retargeting always starts from the
//! currently sampled value. Stroke changes are instantaneous.

use std::collections::HashMap;
use std::time::Duration;

use hierplot_core::NodeRef;
use hierplot_core::animation::{Animation, Fade, Tween, ease_in_out_cubic};
use hierplot_core::geometry::Point;
use hierplot_layout::LinkPath;
use hierplot_style::{Rgb, Theme};

use crate::element::{LinkKey, LinkVisual, NodeVisual, RenderElement, Transition};
use crate::reconcile::{ChangeKind, Reconciliation};

/// Link stroke width in surface units.
pub const LINK_STROKE_WIDTH: f64 = 1.0;

/// Durations for the two transition channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPolicy {
    pub structure: Duration,
    pub highlight: Duration,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self {
            structure: Duration::from_millis(300),
            highlight: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone)]
struct NodeAnim {
    x: Tween,
    y: Tween,
    radius: Tween,
    hover: Tween,
    fill: Rgb,
    stroke_width: f64,
}

impl NodeAnim {
    fn settled(element: &RenderElement) -> Self {
        Self {
            x: Tween::settled(element.position.x),
            y: Tween::settled(element.position.y),
            radius: Tween::settled(element.radius),
            hover: Tween::settled(0.0),
            fill: element.fill,
            stroke_width: element.stroke_width,
        }
    }

    fn structural(&mut self) -> [&mut Tween; 3] {
        [&mut self.x, &mut self.y, &mut self.radius]
    }

    fn is_complete(&self) -> bool {
        self.x.is_complete() && self.y.is_complete() && self.radius.is_complete() && self.hover.is_complete()
    }
}

#[derive(Debug, Clone)]
struct LinkAnim {
    from: LinkPath,
    to: LinkPath,
    progress: Fade,
}

impl LinkAnim {
    fn settled(path: LinkPath) -> Self {
        let mut progress = Fade::new(Duration::ZERO);
        progress.tick(Duration::from_nanos(1));
        Self {
            from: path,
            to: path,
            progress,
        }
    }

    fn current(&self) -> LinkPath {
        if self.progress.is_complete() {
            self.to
        } else {
            self.from.lerp(&self.to, f64::from(self.progress.value()))
        }
    }

    fn retarget(&mut self, to: LinkPath, duration: Duration) {
        self.from = self.current();
        self.to = to;
        self.progress = Fade::new(duration).easing(ease_in_out_cubic);
    }
}

/// Drives structural and highlight tweens for every retained key.
#[derive(Debug, Clone)]
pub struct TransitionController {
    policy: TransitionPolicy,
    node_stroke: Rgb,
    link_stroke: Rgb,
    nodes: HashMap<NodeRef, NodeAnim>,
    links: HashMap<LinkKey, LinkAnim>,
}

impl TransitionController {
    pub fn new(policy: TransitionPolicy, theme: &Theme) -> Self {
        Self {
            policy,
            node_stroke: theme.node_stroke,
            link_stroke: theme.link_stroke,
            nodes: HashMap::new(),
            links: HashMap::new(),
        }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Transition handed to surfaces for structural commands.
    pub fn structural(&self) -> Transition {
        Transition::over(self.policy.structure)
    }

    /// Transition handed to surfaces for hover commands.
    pub fn highlight(&self) -> Transition {
        Transition::over(self.policy.highlight)
    }

    /// Start, retarget, or drop tweens according to a reconciliation.
    ///
    /// Entering keys appear at their final state; exiting keys are dropped.
    pub fn apply(&mut self, rec: &Reconciliation) {
        let structure = self.policy.structure;
        for change in &rec.nodes {
            match (change.kind, &change.after) {
                (ChangeKind::Exit, _) | (_, None) => {
                    self.nodes.remove(&change.key);
                }
                (ChangeKind::Enter, Some(after)) => {
                    self.nodes.insert(change.key.clone(), NodeAnim::settled(after));
                }
                (ChangeKind::Update, Some(after)) => {
                    let anim = self
                        .nodes
                        .entry(change.key.clone())
                        .or_insert_with(|| NodeAnim::settled(after));
                    let targets = [after.position.x, after.position.y, after.radius];
                    for (tween, target) in anim.structural().into_iter().zip(targets) {
                        if tween.target() != target {
                            tween.retarget(target, structure);
                        }
                    }
                    anim.fill = after.fill;
                    anim.stroke_width = after.stroke_width;
                }
            }
        }

        for change in &rec.links {
            match (change.kind, &change.after) {
                (ChangeKind::Exit, _) | (_, None) => {
                    self.links.remove(&change.key);
                }
                (ChangeKind::Enter, Some(after)) => {
                    self.links.insert(change.key.clone(), LinkAnim::settled(after.path));
                }
                (ChangeKind::Update, Some(after)) => {
                    let anim = self
                        .links
                        .entry(change.key.clone())
                        .or_insert_with(|| LinkAnim::settled(after.path));
                    if anim.to != after.path {
                        anim.retarget(after.path, structure);
                    }
                }
            }
        }

        tracing::trace!(
            nodes = self.nodes.len(),
            links = self.links.len(),
            idle = self.is_idle(),
            "transitions applied"
        );
    }

    /// Move the hover boost of `key` towards `boost`. Returns false for
    /// unknown keys.
    pub fn set_hover(&mut self, key: &NodeRef, boost: f64) -> bool {
        let highlight = self.policy.highlight;
        match self.nodes.get_mut(key) {
            Some(anim) => {
                if anim.hover.target() != boost {
                    anim.hover.retarget(boost, highlight);
                }
                true
            }
            None => false,
        }
    }

    /// Set the stroke width of `key` at once. Returns false for unknown keys.
    pub fn set_stroke(&mut self, key: &NodeRef, width: f64) -> bool {
        match self.nodes.get_mut(key) {
            Some(anim) => {
                anim.stroke_width = width;
                true
            }
            None => false,
        }
    }

    /// Advance every tween by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        for anim in self.nodes.values_mut() {
            anim.x.tick(dt);
            anim.y.tick(dt);
            anim.radius.tick(dt);
            anim.hover.tick(dt);
        }
        for anim in self.links.values_mut() {
            anim.progress.tick(dt);
        }
    }

    /// True when no tween is in flight.
    pub fn is_idle(&self) -> bool {
        self.nodes.values().all(NodeAnim::is_complete)
            && self.links.values().all(|l| l.progress.is_complete())
    }

    /// Current sampled look of `key`.
    pub fn node_visual(&self, key: &NodeRef) -> Option<NodeVisual> {
        self.nodes.get(key).map(|anim| NodeVisual {
            key: key.clone(),
            position: Point::new(anim.x.current(), anim.y.current()),
            radius: anim.radius.current() + anim.hover.current(),
            fill: anim.fill,
            stroke: self.node_stroke,
            stroke_width: anim.stroke_width,
        })
    }

    /// Look of `key` once every in-flight tween has finished.
    pub fn node_target(&self, key: &NodeRef) -> Option<NodeVisual> {
        self.nodes.get(key).map(|anim| NodeVisual {
            key: key.clone(),
            position: Point::new(anim.x.target(), anim.y.target()),
            radius: anim.radius.target() + anim.hover.target(),
            fill: anim.fill,
            stroke: self.node_stroke,
            stroke_width: anim.stroke_width,
        })
    }

    /// Current sampled look of link `key`.
    pub fn link_visual(&self, key: &LinkKey) -> Option<LinkVisual> {
        self.links.get(key).map(|anim| LinkVisual {
            key: key.clone(),
            path: anim.current(),
            stroke: self.link_stroke,
            stroke_width: LINK_STROKE_WIDTH,
        })
    }

    /// Look of link `key` once its tween has finished.
    pub fn link_target(&self, key: &LinkKey) -> Option<LinkVisual> {
        self.links.get(key).map(|anim| LinkVisual {
            key: key.clone(),
            path: anim.to,
            stroke: self.link_stroke,
            stroke_width: LINK_STROKE_WIDTH,
        })
    }

    /// Number of tracked nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
