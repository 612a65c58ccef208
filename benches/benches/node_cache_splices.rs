// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_node_cache::{CacheConfig, NodeCache, RelocateMode};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn filled(n: usize) -> NodeCache<u32, u32> {
    let mut cache = NodeCache::new();
    cache.capacity_ensure(n);
    for i in 0..n {
        cache.insert(i, i as u32);
    }
    cache
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[100usize, 1_000, 5_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("append_n{n}"), |b| {
            b.iter(|| black_box(filled(n)));
        });
        group.bench_function(format!("front_n{n}"), |b| {
            b.iter(|| {
                let mut cache: NodeCache<u32, u32> = NodeCache::new();
                for i in 0..n {
                    cache.insert(0, i as u32);
                }
                black_box(cache.len());
            });
        });
        for &step in &[1usize, 20, 256] {
            group.bench_function(format!("random_n{n}_growth{step}"), |b| {
                b.iter(|| {
                    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
                    let mut cache: NodeCache<u32, u32> =
                        NodeCache::with_config(CacheConfig { growth_step: step });
                    for i in 0..n {
                        let at = rng.below(cache.len() + 1);
                        cache.insert(at, i as u32);
                    }
                    black_box(cache.capacity());
                });
            });
        }
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    for &n in &[1_000usize, 5_000] {
        group.bench_function(format!("subtrees_of_8_n{n}"), |b| {
            b.iter_batched(
                || filled(n),
                |mut cache| {
                    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
                    while cache.len() >= 8 {
                        let at = rng.below(cache.len() - 7);
                        cache.remove(at, 8);
                    }
                    black_box(cache.len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_relocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("relocate");
    for &n in &[1_000usize, 5_000] {
        for &count in &[1usize, 16, 128] {
            group.bench_function(format!("move_n{n}_count{count}"), |b| {
                b.iter_batched(
                    || (filled(n), Rng::new(0xC1A5_7E55_9999_ABCD)),
                    |(mut cache, mut rng)| {
                        for _ in 0..64 {
                            let src = rng.below(n - count);
                            let mut dst = rng.below(n + 1);
                            if dst > src && dst < src + count {
                                dst = src + count;
                            }
                            black_box(cache.relocate(src, dst, count, RelocateMode::Move));
                        }
                    },
                    BatchSize::SmallInput,
                );
            });
            group.bench_function(format!("copy_n{n}_count{count}"), |b| {
                b.iter_batched(
                    || filled(n),
                    |mut cache| {
                        let at = cache.relocate(n / 2, 0, count, RelocateMode::Copy);
                        black_box(at);
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let n = 5_000;
    let mut cache = filled(n);
    for id in (0..n).step_by(7) {
        cache.set_user_data(id, Some(id as u32));
    }
    group.bench_function("find_by_handle_n5000", |b| {
        let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
        b.iter(|| black_box(cache.find_by_handle(rng.below(n) as u32)));
    });
    group.bench_function("find_by_user_data_n5000", |b| {
        let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
        b.iter(|| black_box(cache.find_by_user_data(&(rng.below(n) as u32))));
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_remove, bench_relocate, bench_lookup);
criterion_main!(benches);
