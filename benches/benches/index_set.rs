// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use sightline_index::{IndexSet, NumericRange};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

/// `ranges` disjoint-ish runs scattered over `[0, span)`.
fn scattered(ranges: u32, span: u32, seed: u64) -> IndexSet {
    let mut rng = Lcg::new(seed);
    let mut set = IndexSet::new();
    for _ in 0..ranges {
        let from = rng.next_u32() % span;
        let count = 1 + rng.next_u32() % 64;
        set.add_range(NumericRange::new(from, count));
    }
    set
}

fn bench_index_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("sightline_index");
    group.sample_size(50);

    for &ranges in &[64_u32, 1_024, 16_384] {
        let a = scattered(ranges, 1 << 24, 0x5EED_0000_0000_0001);
        let b = scattered(ranges, 1 << 24, 0x5EED_0000_0000_0002);

        group.bench_function(format!("union(ranges={ranges})"), |bench| {
            bench.iter_batched(
                || a.clone(),
                |mut set| {
                    set.union_with(&b);
                    black_box(set);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("intersect(ranges={ranges})"), |bench| {
            bench.iter_batched(
                || a.clone(),
                |mut set| {
                    set.intersect_with(&b);
                    black_box(set);
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("contains(ranges={ranges})"), |bench| {
            let mut rng = Lcg::new(7);
            bench.iter(|| black_box(a.contains(rng.next_u32() % (1 << 24))));
        });
    }

    group.bench_function("add_single_indices(n=10000)", |bench| {
        bench.iter(|| {
            let mut rng = Lcg::new(11);
            let set: IndexSet = (0..10_000).map(|_| rng.next_u32() % 100_000).collect();
            black_box(set.count());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_index_set);
criterion_main!(benches);
