//! Benchmarks for sizetree
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sizetree::render::{flatten, SortOrder};
use sizetree::tree::Node;
use std::collections::HashMap;
use std::path::PathBuf;

/// A flat-ish synthetic tree: `dirs` directories of `files_per_dir` files
fn synthetic_tree(dirs: usize, files_per_dir: usize) -> Node {
    let mut children = HashMap::new();
    for d in 0..dirs {
        let mut kids = HashMap::new();
        for f in 0..files_per_dir {
            let name = format!("file{}", f);
            kids.insert(
                name.clone(),
                Node::file(
                    PathBuf::from(format!("/root/d{}/{}", d, name)),
                    (f as u64 + 1) * 37,
                ),
            );
        }
        let name = format!("d{}", d);
        children.insert(
            name.clone(),
            Node::directory(PathBuf::from(format!("/root/{}", name)), kids),
        );
    }
    Node::directory(PathBuf::from("/root"), children)
}

fn benchmark_aggregation(c: &mut Criterion) {
    c.bench_function("build_and_aggregate_1k_nodes", |b| {
        b.iter(|| {
            let tree = synthetic_tree(32, 32);
            black_box(tree.size)
        })
    });
}

fn benchmark_flatten(c: &mut Criterion) {
    let tree = synthetic_tree(32, 32);

    c.bench_function("flatten_1k_nodes_desc", |b| {
        b.iter(|| {
            let rows = flatten(black_box(&tree), 0, SortOrder::Descending);
            black_box(rows.len())
        })
    });

    c.bench_function("flatten_1k_nodes_thresholded", |b| {
        b.iter(|| {
            let rows = flatten(black_box(&tree), 512, SortOrder::Ascending);
            black_box(rows.len())
        })
    });
}

criterion_group!(benches, benchmark_aggregation, benchmark_flatten);
criterion_main!(benches);
