// Copyright 2025 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use sightline_tree::{CheckBoxState, Tree, TreeNode, TreeNodeId};

/// A complete tree of the given fan-out and depth with every leaf checked.
fn build(fan_out: u32, depth: u32) -> (Tree<u32>, TreeNodeId, TreeNodeId) {
    let mut tree = Tree::new();
    let root = tree.add_root(TreeNode::new("root", 0).with_check_box_state(CheckBoxState::None));
    let mut level = vec![root];
    let mut next_payload = 1;
    for d in 0..depth {
        let state = if d + 1 == depth {
            CheckBoxState::All
        } else {
            CheckBoxState::None
        };
        let mut next = Vec::new();
        for &parent in &level {
            for _ in 0..fan_out {
                let child = TreeNode::new("node", next_payload).with_check_box_state(state);
                next_payload += 1;
                next.push(tree.add_child(parent, child).unwrap());
            }
        }
        level = next;
    }
    let deepest = *level.last().unwrap();
    (tree, root, deepest)
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("sightline_tree");
    group.sample_size(50);

    for &(fan_out, depth) in &[(4_u32, 4_u32), (8, 4), (16, 3)] {
        let (tree, root, _) = build(fan_out, depth);
        group.bench_function(format!("checked_nodes(f={fan_out},d={depth})"), |b| {
            b.iter(|| black_box(tree.checked_nodes(root).len()));
        });

        group.bench_function(
            format!("update_check_box_states_upwards(f={fan_out},d={depth})"),
            |b| {
                b.iter_batched(
                    || build(fan_out, depth),
                    |(mut tree, _, deepest)| {
                        tree.set_check_box_state(deepest, CheckBoxState::None)
                            .unwrap();
                        let parent = tree.parent(deepest).unwrap();
                        tree.update_check_box_states_upwards(parent).unwrap();
                        black_box(tree);
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tree);
criterion_main!(benches);
