//! End-to-end tests for the hierarchy plot engine.

use std::cell::Cell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use hierplot_core::geometry::{Point, Size};
use hierplot_core::{NodeAccessor, NodeRecord, NodeRef, NodeStore};
use hierplot_render::{ChangeKind, LinkKey, RecordingSurface, SurfaceOp};
use hierplot_runtime::{HierarchyPlot, HierarchyView, NotifyTicker, PlotConfig, RefreshCause};

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Default)]
struct TestStore {
    records: HashMap<NodeRef, NodeRecord>,
    selected: Option<NodeRef>,
    select_calls: Vec<NodeRef>,
}

impl TestStore {
    /// `{root: View [c1, c2], c1: Text, c2: Button}`
    fn example() -> Self {
        let mut store = Self::default();
        store.put("root", NodeRecord::new("View", ["c1", "c2"]));
        store.put("c1", NodeRecord::leaf("Text"));
        store.put("c2", NodeRecord::leaf("Button"));
        store
    }

    fn put(&mut self, id: &str, record: NodeRecord) {
        self.records.insert(NodeRef::from(id), record);
    }
}

impl NodeAccessor for TestStore {
    fn get(&self, id: &NodeRef) -> Option<NodeRecord> {
        self.records.get(id).cloned()
    }
}

impl NodeStore for TestStore {
    fn select(&mut self, id: &NodeRef) {
        self.select_calls.push(id.clone());
        self.selected = Some(id.clone());
    }

    fn selected(&self) -> Option<NodeRef> {
        self.selected.clone()
    }
}

fn id(s: &str) -> NodeRef {
    NodeRef::from(s)
}

fn example_plot() -> HierarchyPlot {
    let mut plot = HierarchyPlot::new(PlotConfig::default());
    plot.set_root(Some(id("root")));
    plot.resize(Size::new(50.0, 50.0));
    plot
}

const MS_200: Duration = Duration::from_millis(200);
const MS_300: Duration = Duration::from_millis(300);
const MS_500: Duration = Duration::from_millis(500);

// ============================================================================
// Refresh pipeline
// ============================================================================

#[test]
fn example_store_draws_three_nodes_and_two_links() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();

    let rec = plot.refresh(&store, &mut surface);
    assert_eq!(rec.entered_nodes, 3);
    assert_eq!(surface.node_count(), 3);
    assert_eq!(surface.link_count(), 2);

    let root = surface.node(&id("root")).unwrap();
    let c1 = surface.node(&id("c1")).unwrap();
    let c2 = surface.node(&id("c2")).unwrap();
    assert_ne!(c1.position.y, c2.position.y);
    assert!(c1.position.x > root.position.x);
    assert!(c2.position.x > root.position.x);
    assert_eq!(root.position, Point::new(10.0, 25.0));
    assert_eq!(root.radius, 10.0);
    assert_eq!(c1.radius, 4.0);
}

#[test]
fn refresh_without_mutation_is_idempotent() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);
    let before: Vec<_> = ["root", "c1", "c2"]
        .iter()
        .map(|k| surface.node(&id(k)).cloned())
        .collect();

    let rec = plot.refresh(&store, &mut surface);
    assert!(rec.is_steady());
    assert_eq!(rec.updated_nodes, 3);
    let after: Vec<_> = ["root", "c1", "c2"]
        .iter()
        .map(|k| surface.node(&id(k)).cloned())
        .collect();
    assert_eq!(before, after);
    assert!(plot.is_idle());
}

#[test]
fn removing_a_child_exits_node_and_link() {
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);

    store.put("root", NodeRecord::new("View", ["c1"]));
    let rec = plot.refresh(&store, &mut surface);

    let exited: Vec<&str> = rec.nodes_of(ChangeKind::Exit).map(NodeRef::as_str).collect();
    let updated: Vec<&str> = rec.nodes_of(ChangeKind::Update).map(NodeRef::as_str).collect();
    assert_eq!(exited, ["c2"]);
    assert_eq!(updated, ["root", "c1"]);
    assert_eq!(rec.links_of(ChangeKind::Exit).collect::<Vec<_>>(), [&LinkKey::new("root", "c2")]);
    assert!(surface.node(&id("c2")).is_none());
    assert!(surface.link(&LinkKey::new("root", "c2")).is_none());
    assert!(plot.node_visual(&id("c2")).is_none());
}

#[test]
fn moved_nodes_glide_over_the_structure_duration() {
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);

    store.put("root", NodeRecord::new("View", ["c1"]));
    plot.refresh(&store, &mut surface);
    let target = surface.node(&id("c1")).unwrap().position;
    assert_eq!(target.y, 25.0);
    assert!(!plot.is_idle());
    assert_ne!(plot.node_visual(&id("c1")).unwrap().position, target);

    let upserts = surface
        .ops()
        .iter()
        .filter(|op| matches!(op, SurfaceOp::UpsertNode(v, t) if v.key == id("c1") && t.duration == MS_300))
        .count();
    assert_eq!(upserts, 1);

    plot.advance(MS_300);
    assert!(plot.is_idle());
    assert_eq!(plot.node_visual(&id("c1")).unwrap().position, target);
}

#[test]
fn clearing_the_root_exits_everything() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);

    plot.set_root(None);
    let rec = plot.refresh(&store, &mut surface);
    assert_eq!(rec.exited_nodes, 3);
    assert_eq!(rec.exited_links, 2);
    assert_eq!(surface.node_count(), 0);
    assert_eq!(surface.link_count(), 0);
}

#[test]
fn mutating_store_never_panics() {
    struct Flaky {
        calls: Cell<u32>,
    }
    impl NodeAccessor for Flaky {
        fn get(&self, id: &NodeRef) -> Option<NodeRecord> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            match (n % 3, id.as_str()) {
                (0, _) => None,
                (1, "root") => Some(NodeRecord::new("View", ["a", "b", "root"])),
                (2, "root") => Some(NodeRecord::new("View", ["b", "a"])),
                (_, "a") => Some(NodeRecord::new("Text", ["b", "root"])),
                (_, _) => Some(NodeRecord::unloaded("Image")),
            }
        }
    }
    impl NodeStore for Flaky {
        fn select(&mut self, _id: &NodeRef) {}
        fn selected(&self) -> Option<NodeRef> {
            None
        }
    }

    let store = Flaky { calls: Cell::new(0) };
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    for _ in 0..20 {
        let rec = plot.refresh(&store, &mut surface);
        assert!(rec.entered_nodes + rec.updated_nodes <= 3);
        assert_eq!(surface.node_count(), rec.entered_nodes + rec.updated_nodes);
    }
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn click_selects_before_the_next_refresh() {
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);

    plot.click(&id("c1"), &mut store, &mut surface);
    assert!(plot.selection().is_selected(&id("c1")));
    assert_eq!(surface.node(&id("c1")).unwrap().stroke_width, 3.0);
    assert_eq!(surface.paint_order().last(), Some(&id("c1")));
    assert_eq!(surface.link_order().last(), Some(&LinkKey::new("root", "c1")));
    assert_eq!(store.select_calls, [id("c1")]);

    // The store already reports c1: no second select.
    plot.refresh(&store, &mut surface);
    assert_eq!(store.select_calls.len(), 1);
    assert_eq!(surface.node(&id("c1")).unwrap().stroke_width, 3.0);
    assert_eq!(surface.paint_order().last(), Some(&id("c1")));
}

#[test]
fn switching_selection_clears_the_previous_stroke() {
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);

    plot.click(&id("c1"), &mut store, &mut surface);
    plot.click(&id("c2"), &mut store, &mut surface);
    assert_eq!(surface.node(&id("c1")).unwrap().stroke_width, 0.0);
    assert_eq!(surface.node(&id("c2")).unwrap().stroke_width, 3.0);
}

#[test]
fn store_selection_wins_on_refresh() {
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);
    plot.click(&id("c1"), &mut store, &mut surface);

    store.selected = Some(id("c2"));
    plot.refresh(&store, &mut surface);
    assert!(plot.selection().is_selected(&id("c2")));
    assert_eq!(surface.node(&id("c1")).unwrap().stroke_width, 0.0);
    assert_eq!(surface.node(&id("c2")).unwrap().stroke_width, 3.0);
    assert_eq!(store.select_calls.len(), 1);
}

#[test]
fn click_reports_to_the_host() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let clicked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicked);
    let mut plot = example_plot().on_data_point_click(Box::new(move |id: &NodeRef| {
        sink.borrow_mut().push(id.clone());
    }));
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    plot.refresh(&store, &mut surface);
    plot.click(&id("c2"), &mut store, &mut surface);
    assert_eq!(*clicked.borrow(), [id("c2")]);
}

// ============================================================================
// Hover and hit testing
// ============================================================================

#[test]
fn hovered_nodes_never_outgrow_the_root() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);

    plot.pointer_enter(&id("c1"), &mut surface);
    plot.advance(MS_200);
    let root = plot.node_visual(&id("root")).unwrap().radius;
    let hovered = plot.node_visual(&id("c1")).unwrap().radius;
    assert_eq!(hovered, 8.0);
    assert!(root > hovered);

    plot.pointer_enter(&id("root"), &mut surface);
    plot.advance(MS_200);
    assert_eq!(plot.node_visual(&id("c1")).unwrap().radius, 4.0);
    assert!(plot.node_visual(&id("root")).unwrap().radius > 10.0);
}

#[test]
fn leaving_restores_the_structural_radius() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);

    plot.pointer_enter(&id("c2"), &mut surface);
    assert_eq!(plot.hovered(), Some(&id("c2")));
    plot.pointer_leave(&id("c2"), &mut surface);
    plot.advance(MS_200);
    assert_eq!(plot.hovered(), None);
    assert_eq!(plot.node_visual(&id("c2")).unwrap().radius, 4.0);

    let radii: Vec<f64> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::SetRadius(k, r, t) if *k == id("c2") => {
                assert_eq!(t.duration, MS_200);
                Some(*r)
            }
            _ => None,
        })
        .collect();
    assert_eq!(radii, [8.0, 4.0]);
}

#[test]
fn hover_does_not_reach_the_store() {
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);
    plot.pointer_enter(&id("c1"), &mut surface);
    plot.refresh(&store, &mut surface);
    assert!(store.select_calls.is_empty());
    assert!(store.selected.take().is_none());
}

#[test]
fn hit_test_finds_nodes_by_position() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);

    assert_eq!(plot.hit_test(Point::new(40.0, 21.0)), Some(id("c1")));
    assert_eq!(plot.hit_test(Point::new(12.0, 25.0)), Some(id("root")));
    assert_eq!(plot.hit_test(Point::new(25.0, 45.0)), None);
}

#[test]
fn root_outgrows_children_under_rejected_radii() {
    let env = PlotConfig::from_env_with(|key| (key == "HIERPLOT_ROOT_RADIUS").then(|| "2".to_string()));
    assert_eq!(env.errors.len(), 1);

    let hand_built = PlotConfig {
        node_radius: 12.0,
        hover_radius: 3.0,
        root_radius: 1.0,
        ..PlotConfig::default()
    };

    for config in [env.config, hand_built] {
        let store = TestStore::example();
        let mut surface = RecordingSurface::new();
        let mut plot = HierarchyPlot::new(config);
        plot.set_root(Some(id("root")));
        plot.resize(Size::new(50.0, 50.0));
        plot.refresh(&store, &mut surface);

        plot.pointer_enter(&id("c1"), &mut surface);
        plot.advance(MS_200);
        let root = plot.node_visual(&id("root")).unwrap().radius;
        for child in ["c1", "c2"] {
            let r = plot.node_visual(&id(child)).unwrap().radius;
            assert!(root > r, "root {root} not larger than {child} {r}");
        }
        assert!(plot.config().validate().is_ok());
    }
}

// ============================================================================
// Paint order
// ============================================================================

#[test]
fn refresh_restacks_in_one_command() {
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);
    assert_eq!(surface.paint_order(), [id("c2"), id("c1"), id("root")]);

    plot.click(&id("c1"), &mut store, &mut surface);
    surface.take_ops();
    plot.refresh(&store, &mut surface);

    let expected = [id("c2"), id("root"), id("c1")];
    assert_eq!(plot.paint_order().nodes(), expected);
    assert_eq!(surface.paint_order(), expected);
    let restacks: Vec<&Vec<NodeRef>> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::RestackNodes(keys) => Some(keys),
            _ => None,
        })
        .collect();
    assert_eq!(restacks.len(), 1);
    assert_eq!(restacks[0].as_slice(), expected);
}

#[test]
fn selection_outlives_its_node_until_the_store_changes() {
    let mut store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut plot = example_plot();
    plot.refresh(&store, &mut surface);
    plot.click(&id("c2"), &mut store, &mut surface);

    store.put("root", NodeRecord::new("View", ["c1"]));
    plot.refresh(&store, &mut surface);
    assert!(plot.selection().is_selected(&id("c2")));
    assert_eq!(surface.paint_order().last(), Some(&id("root")));

    store.put("root", NodeRecord::new("View", ["c1", "c2"]));
    plot.refresh(&store, &mut surface);
    assert_eq!(surface.node(&id("c2")).unwrap().stroke_width, 3.0);
    assert_eq!(surface.paint_order().last(), Some(&id("c2")));
    assert_eq!(store.select_calls.len(), 1);
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn view_refreshes_on_mount_interval_and_resize() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut view = HierarchyView::new(PlotConfig::default());
    view.set_roots(&[id("root"), id("other")]);
    view.resize(Size::new(50.0, 50.0));

    let t0 = Instant::now();
    assert_eq!(view.tick(t0, &store, &mut surface), None);
    view.mount(t0);
    assert_eq!(view.tick(t0, &store, &mut surface), Some(RefreshCause::Mounted));
    assert_eq!(surface.node_count(), 3);
    assert_eq!(view.tick(t0 + MS_200, &store, &mut surface), None);
    assert_eq!(view.tick(t0 + MS_500, &store, &mut surface), Some(RefreshCause::Interval));

    view.resize(Size::new(100.0, 80.0));
    assert_eq!(view.tick(t0 + MS_500, &store, &mut surface), Some(RefreshCause::Resized));
    assert_eq!(view.plot().frames(), 3);
}

#[test]
fn view_never_refreshes_after_unmount() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut view = HierarchyView::new(PlotConfig::default());
    view.set_roots(&[id("root")]);
    let t0 = Instant::now();
    view.mount(t0);
    view.tick(t0, &store, &mut surface);
    view.unmount();

    let ops = surface.ops().len();
    for i in 1..10u32 {
        assert_eq!(view.tick(t0 + i * MS_500, &store, &mut surface), None);
    }
    view.resize(Size::new(300.0, 300.0));
    assert_eq!(view.tick(t0 + 20 * MS_500, &store, &mut surface), None);
    assert_eq!(surface.ops().len(), ops);
    assert_eq!(view.plot().frames(), 1);
}

#[test]
fn notify_ticker_refreshes_only_when_notified() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let ticker = NotifyTicker::new();
    let notifier = ticker.notifier();
    let mut view = HierarchyView::with_ticker(HierarchyPlot::new(PlotConfig::default()), ticker);
    view.set_roots(&[id("root")]);

    let t0 = Instant::now();
    view.mount(t0);
    assert_eq!(view.tick(t0, &store, &mut surface), Some(RefreshCause::Mounted));
    assert_eq!(view.tick(t0 + 10 * MS_500, &store, &mut surface), None);
    notifier.notify();
    assert_eq!(view.tick(t0 + 11 * MS_500, &store, &mut surface), Some(RefreshCause::Interval));
}

#[test]
fn empty_roots_plot_nothing() {
    let store = TestStore::example();
    let mut surface = RecordingSurface::new();
    let mut view = HierarchyView::new(PlotConfig::default());
    view.set_roots(&[]);
    view.mount(Instant::now());
    view.tick(Instant::now(), &store, &mut surface);
    assert_eq!(surface.node_count(), 0);
}
