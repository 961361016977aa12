// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sightline_index::NumericRange;
use sightline_styling::{
    IntersectionNodeCollection, NodeAppearance, NodeAppearanceProvider, NodeCollection,
    TreeIndexNodeCollection, UnionNodeCollection,
};

fn bench_provider(c: &mut Criterion) {
    let mut group = c.benchmark_group("sightline_styling");
    group.sample_size(50);

    for &styles in &[8_u32, 128, 1_024] {
        let mut provider = NodeAppearanceProvider::new();
        for i in 0..styles {
            let collection: Rc<dyn NodeCollection> = Rc::new(
                TreeIndexNodeCollection::from_range(NumericRange::new(i * 100, 50)),
            );
            provider.assign_styled_node_collection_with_importance(
                collection,
                NodeAppearance::OUTLINED,
                (i % 4) as i32,
            );
        }

        group.bench_function(format!("apply_styles(styles={styles})"), |b| {
            b.iter(|| {
                let mut total = 0_usize;
                provider.apply_styles(|set, _| total += set.count());
                black_box(total);
            });
        });
    }

    let leaves: Vec<Rc<TreeIndexNodeCollection>> = (0..64)
        .map(|i| Rc::new(TreeIndexNodeCollection::from_range(NumericRange::new(i * 10, 200))))
        .collect();
    let union = UnionNodeCollection::new(
        leaves
            .iter()
            .map(|leaf| Rc::clone(leaf) as Rc<dyn NodeCollection>),
    );
    let intersection = IntersectionNodeCollection::new(
        leaves
            .iter()
            .take(8)
            .map(|leaf| Rc::clone(leaf) as Rc<dyn NodeCollection>),
    );

    group.bench_function("union_recompute(children=64)", |b| {
        b.iter(|| {
            leaves[0].update_set(NumericRange::new(0, 200).into());
            black_box(union.index_set().count());
        });
    });

    group.bench_function("intersection_recompute(children=8)", |b| {
        b.iter(|| {
            leaves[0].update_set(NumericRange::new(0, 200).into());
            black_box(intersection.index_set().count());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_provider);
criterion_main!(benches);
