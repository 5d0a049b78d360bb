#![forbid(unsafe_code)]

//! The hierarchy plot engine.
//!
//! One [`HierarchyPlot::refresh`] runs the whole pipeline to completion:
//!
//! 1. adopt the store's selection
//! 2. build the hierarchy from the current root
//! 3. lay it out inside the host area
//! 4. reconcile against the previous frame
//! 5. push enter/update/exit commands and selection styling to the surface
//!
//! Pointer input arrives through [`pointer_enter`](HierarchyPlot::pointer_enter),
//! [`pointer_leave`](HierarchyPlot::pointer_leave), and
//! [`click`](HierarchyPlot::click); hosts without per-element events can
//! route raw positions through [`hit_test`](HierarchyPlot::hit_test).

use std::time::Duration;

use hierplot_core::geometry::{Point, Size};
use hierplot_core::hover::{HoverCallback, HoverTracker, Hoverable};
use hierplot_core::{NodeRef, NodeStore};
use hierplot_layout::{Hierarchy, LayoutParams, layout};
use hierplot_render::{
    ChangeKind, FrameStyle, LinkKey, LinkVisual, NodeVisual, PaintOrder, Reconciler,
    Reconciliation, RenderSurface, Transition, TransitionController,
};
use hierplot_style::{Palette, Theme, TypeColors};

use crate::config::PlotConfig;
use crate::selection::{DataPointCallback, SelectionManager, SelectionState};

/// Incremental hierarchy plot bound to no particular store or surface.
#[derive(Debug)]
pub struct HierarchyPlot {
    config: PlotConfig,
    type_colors: TypeColors,
    palette: Palette,
    theme: Theme,
    root: Option<NodeRef>,
    size: Size,
    reconciler: Reconciler,
    transitions: TransitionController,
    paint: PaintOrder,
    selection: SelectionManager,
    hover: HoverTracker,
    frames: u64,
}

impl HierarchyPlot {
    /// Build a plot from `config`. Invalid values are logged and replaced
    /// (see [`PlotConfig::sanitized`]), so the root always draws larger than
    /// any other node.
    pub fn new(config: PlotConfig) -> Self {
        if let Err(errors) = config.validate() {
            for err in &errors {
                tracing::warn!(field = err.field, value = %err.value, message = %err.message, "plot config adjusted");
            }
        }
        let config = config.sanitized();
        let theme = Theme::default();
        Self {
            transitions: TransitionController::new(config.transition_policy(), &theme),
            config,
            type_colors: TypeColors::default(),
            palette: Palette::category10(),
            theme,
            root: None,
            size: Size::default(),
            reconciler: Reconciler::new(),
            paint: PaintOrder::new(),
            selection: SelectionManager::new(),
            hover: HoverTracker::new(),
            frames: 0,
        }
    }

    /// Use `theme` for fallback fills and strokes.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.transitions = TransitionController::new(self.config.transition_policy(), &theme);
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_type_colors(mut self, type_colors: TypeColors) -> Self {
        self.type_colors = type_colors;
        self
    }

    /// Report hover enter/leave to the host.
    #[must_use]
    pub fn with_hover_callbacks(mut self, on_enter: HoverCallback, on_leave: HoverCallback) -> Self {
        self.hover = HoverTracker::with_callbacks(on_enter, on_leave);
        self
    }

    /// Report clicked nodes to the host.
    #[must_use]
    pub fn on_data_point_click(mut self, callback: DataPointCallback) -> Self {
        self.selection.set_callback(Some(callback));
        self
    }

    /// Plot the tree under `root` from the next refresh on. `None` plots
    /// nothing, so every drawn element exits.
    pub fn set_root(&mut self, root: Option<NodeRef>) {
        self.root = root;
    }

    pub fn root(&self) -> Option<&NodeRef> {
        self.root.as_ref()
    }

    /// Record the host area. Returns true when it changed; the new layout
    /// applies on the next refresh.
    pub fn resize(&mut self, size: Size) -> bool {
        if size == self.size {
            return false;
        }
        self.size = size;
        true
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Rebuild, lay out, reconcile, and push the resulting commands.
    pub fn refresh<S, R>(&mut self, store: &S, surface: &mut R) -> Reconciliation
    where
        S: NodeStore + ?Sized,
        R: RenderSurface + ?Sized,
    {
        let span = tracing::debug_span!("hierplot.refresh", frame = self.frames);
        let _guard = span.enter();

        self.selection.sync(store);

        let hierarchy = match &self.root {
            Some(root) => Hierarchy::build(root, store),
            None => Hierarchy::default(),
        };
        let params = LayoutParams {
            size: self.size,
            node_spacing: self.config.node_spacing,
            margin: self.config.margin,
        };
        let tree = layout(&hierarchy, &params);
        let style = FrameStyle::new(&self.type_colors, &self.palette, &self.theme)
            .radii(self.config.node_radius, self.config.root_radius);
        let rec = self.reconciler.reconcile(&hierarchy, &tree, &style);

        self.transitions.apply(&rec);
        self.paint.apply(&rec);

        let structural = self.transitions.structural();
        for change in &rec.links {
            match change.kind {
                ChangeKind::Exit => surface.remove_link(&change.key),
                kind => {
                    if let Some(visual) = self.transitions.link_target(&change.key) {
                        surface.upsert_link(&visual, transition_for(kind, structural));
                    }
                }
            }
        }
        for change in &rec.nodes {
            match change.kind {
                ChangeKind::Exit => {
                    self.hover.forget(&change.key);
                    surface.remove_node(&change.key);
                }
                kind => {
                    if let Some(visual) = self.transitions.node_target(&change.key) {
                        surface.upsert_node(&visual, transition_for(kind, structural));
                    }
                }
            }
        }

        self.apply_selection(&hierarchy, surface);
        self.frames += 1;

        tracing::debug!(
            nodes = hierarchy.len(),
            links = rec.links.len() - rec.exited_links,
            entered = rec.entered_nodes,
            exited = rec.exited_nodes,
            selected = ?self.selection.current().map(NodeRef::as_str),
            "refresh complete"
        );
        rec
    }

    /// Style every drawn node for the current selection: the selected node
    /// gets the selection stroke and is raised with its incoming link; every
    /// other node loses its stroke and is restacked in reverse preorder
    /// beneath it.
    fn apply_selection<R>(&mut self, hierarchy: &Hierarchy, surface: &mut R)
    where
        R: RenderSurface + ?Sized,
    {
        let selected = self
            .selection
            .current()
            .filter(|key| hierarchy.get(key).is_some())
            .cloned();
        for node in hierarchy.nodes() {
            if Some(&node.id) != selected.as_ref() {
                self.set_stroke(&node.id, 0.0, surface);
            }
        }
        self.paint
            .restack(hierarchy.nodes().iter().map(|n| &n.id), selected.as_ref());
        surface.restack_nodes(self.paint.nodes());
        if let Some(key) = selected {
            self.emphasize(&key, surface);
        }
    }

    fn emphasize<R>(&mut self, key: &NodeRef, surface: &mut R)
    where
        R: RenderSurface + ?Sized,
    {
        self.set_stroke(key, self.config.selected_stroke_width, surface);
        self.paint.raise_node(key);
        surface.raise_node(key);
        if let Some(link) = self.reconciler.incoming_link(key).cloned() {
            self.paint.raise_link(&link);
            surface.raise_link(&link);
        }
    }

    fn set_stroke<R>(&mut self, key: &NodeRef, width: f64, surface: &mut R)
    where
        R: RenderSurface + ?Sized,
    {
        let current = self.reconciler.element(key).map(|e| e.stroke_width);
        if current.is_some_and(|w| w != width) {
            self.reconciler.set_stroke(key, width);
            self.transitions.set_stroke(key, width);
            surface.set_stroke(key, width);
        }
    }

    /// Select `id`: restyle at once, forward to the store, notify the host.
    pub fn click<S, R>(&mut self, id: &NodeRef, store: &mut S, surface: &mut R)
    where
        S: NodeStore + ?Sized,
        R: RenderSurface + ?Sized,
    {
        let previous = self.selection.click(id, store);
        if let Some(prev) = previous.filter(|p| p != id) {
            self.set_stroke(&prev, 0.0, surface);
        }
        if self.reconciler.element(id).is_some() {
            self.emphasize(id, surface);
        }
    }

    /// The pointer entered `key`: grow it on the highlight policy.
    pub fn pointer_enter<R>(&mut self, key: &NodeRef, surface: &mut R)
    where
        R: RenderSurface + ?Sized,
    {
        if self.reconciler.element(key).is_none() {
            return;
        }
        let previous = self.hover.hovered().cloned();
        self.hover.on_pointer_enter(key);
        if let Some(prev) = previous.filter(|p| p != key) {
            self.set_hover(&prev, 0.0, surface);
        }
        self.set_hover(key, self.config.hover_boost(), surface);
    }

    /// The pointer left `key`: shrink it back on the highlight policy.
    pub fn pointer_leave<R>(&mut self, key: &NodeRef, surface: &mut R)
    where
        R: RenderSurface + ?Sized,
    {
        if !self.hover.is_hovered(key) {
            return;
        }
        self.hover.on_pointer_leave(key);
        self.set_hover(key, 0.0, surface);
    }

    fn set_hover<R>(&mut self, key: &NodeRef, boost: f64, surface: &mut R)
    where
        R: RenderSurface + ?Sized,
    {
        if self.transitions.set_hover(key, boost)
            && let Some(target) = self.transitions.node_target(key)
        {
            surface.set_radius(key, target.radius, self.transitions.highlight());
        }
    }

    /// Topmost node under `p`, using the currently sampled visuals.
    pub fn hit_test(&self, p: Point) -> Option<NodeRef> {
        self.paint
            .hit_test(p, |key| self.transitions.node_visual(key))
            .cloned()
    }

    /// Advance in-flight transitions.
    pub fn advance(&mut self, dt: Duration) {
        self.transitions.advance(dt);
    }

    pub fn is_idle(&self) -> bool {
        self.transitions.is_idle()
    }

    /// Current sampled look of `key`.
    pub fn node_visual(&self, key: &NodeRef) -> Option<NodeVisual> {
        self.transitions.node_visual(key)
    }

    /// Current sampled look of link `key`.
    pub fn link_visual(&self, key: &LinkKey) -> Option<LinkVisual> {
        self.transitions.link_visual(key)
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn hovered(&self) -> Option<&NodeRef> {
        self.hover.hovered()
    }

    pub fn paint_order(&self) -> &PaintOrder {
        &self.paint
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Completed refreshes.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn transition_for(kind: ChangeKind, structural: Transition) -> Transition {
    match kind {
        ChangeKind::Update => structural,
        ChangeKind::Enter | ChangeKind::Exit => Transition::NONE,
    }
}
