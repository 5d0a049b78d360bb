//! Benchmarks for hierarchy building and tidy-tree layout.
//!
//! Run with: cargo bench -p hierplot-layout --bench layout_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hierplot_core::{NodeRecord, NodeRef};
use hierplot_layout::{Hierarchy, LayoutParams, layout};
use std::collections::HashMap;
use std::hint::black_box;

/// Complete tree with `fanout` children per interior node.
fn make_store(fanout: usize, depth: usize) -> HashMap<NodeRef, NodeRecord> {
    let mut store = HashMap::new();
    let mut frontier = vec![String::from("n")];
    for level in 0..=depth {
        let mut next = Vec::new();
        for id in frontier {
            let kids: Vec<String> = if level == depth {
                Vec::new()
            } else {
                (0..fanout).map(|i| format!("{id}.{i}")).collect()
            };
            store.insert(NodeRef::from(id.as_str()), NodeRecord::new("View", kids.iter().map(String::as_str)));
            next.extend(kids);
        }
        frontier = next;
    }
    store
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy/build");
    for (fanout, depth) in [(2, 6), (4, 5), (10, 3)] {
        let store = make_store(fanout, depth);
        let root = NodeRef::from("n");
        let accessor = |id: &NodeRef| store.get(id).cloned();
        group.throughput(Throughput::Elements(store.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("complete", format!("{fanout}^{depth}")),
            &(),
            |b, _| b.iter(|| black_box(Hierarchy::build(black_box(&root), &accessor))),
        );
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/tidy");
    let params = LayoutParams::new(1280.0, 800.0, 4.0);
    for (fanout, depth) in [(2, 6), (4, 5), (10, 3)] {
        let store = make_store(fanout, depth);
        let accessor = |id: &NodeRef| store.get(id).cloned();
        let hierarchy = Hierarchy::build(&NodeRef::from("n"), &accessor);
        group.throughput(Throughput::Elements(hierarchy.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("complete", format!("{fanout}^{depth}")),
            &hierarchy,
            |b, h| b.iter(|| black_box(layout(black_box(h), black_box(&params)))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_layout);
criterion_main!(benches);
