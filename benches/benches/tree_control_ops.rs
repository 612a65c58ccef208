// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_node_cache::NodeKind;
use understory_tree_control::{DeleteTarget, MemoryBackend, TreeConfig, TreeControl};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn below(&mut self, n: usize) -> usize {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x % n as u64) as usize
    }
}

/// A tree of `branches` top-level branches with `leaves` leaves each.
fn build(branches: usize, leaves: usize) -> TreeControl<MemoryBackend, u32> {
    let mut tree = TreeControl::new(MemoryBackend::new(), TreeConfig::default());
    let mut last = None;
    for _ in 0..branches {
        let branch = tree
            .insert_node(last, NodeKind::Branch, "branch")
            .unwrap_or_default();
        for _ in 0..leaves {
            let _ = tree.add_node(Some(branch), NodeKind::Leaf, "leaf");
        }
        last = Some(branch);
    }
    tree
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_control_build");
    for &(branches, leaves) in &[(10usize, 10usize), (50, 20)] {
        group.bench_function(format!("build_{branches}x{leaves}"), |b| {
            b.iter(|| black_box(build(branches, leaves).count()));
        });
    }
    group.finish();
}

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_control_mutations");
    group.bench_function("move_random_50x20", |b| {
        b.iter_batched(
            || (build(50, 20), Rng::new(0xCAFE_F00D_DEAD_BEEF)),
            |(mut tree, mut rng)| {
                for _ in 0..64 {
                    let n = tree.count();
                    black_box(tree.move_node(rng.below(n), rng.below(n)).ok());
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("delete_children_50x20", |b| {
        b.iter_batched(
            || build(50, 20),
            |mut tree| {
                let mut id = 0;
                while id < tree.count() {
                    black_box(tree.delete(DeleteTarget::Children(id)).ok());
                    id += 1;
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("delete_all_with_callback_50x20", |b| {
        b.iter_batched(
            || {
                let mut tree = build(50, 20);
                tree.on_node_removed(|id, data| {
                    black_box((id, data));
                });
                tree
            },
            |mut tree| black_box(tree.delete(DeleteTarget::All).ok()),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_mutations);
criterion_main!(benches);
