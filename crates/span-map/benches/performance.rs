use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use span_map::{NodeKind, NodeSpan, SpanNode, TreeBuilder, apply_insertion};

/// A type definition holding `members` methods, each with a block and two
/// statements, on a fixed 32-character stride.
fn synthetic_unit(members: usize) -> SpanNode {
    let mut builder = TreeBuilder::new(NodeKind::CompilationUnit, members * 32 + 16);
    builder
        .open(NodeKind::TypeDefinition, 4, members * 32 + 12)
        .unwrap();
    for i in 0..members {
        let start = 8 + i * 32;
        builder.open(NodeKind::Method, start, start + 28).unwrap();
        builder.open(NodeKind::Block, start + 6, start + 26).unwrap();
        builder
            .leaf(NodeKind::Statement, start + 8, start + 16)
            .unwrap();
        builder
            .leaf(NodeKind::Statement, start + 18, start + 24)
            .unwrap();
        builder.close().unwrap();
        builder.close().unwrap();
    }
    builder.close().unwrap();
    builder.finish().unwrap()
}

fn deepest_end(root: &SpanNode, offset: usize) -> usize {
    let mut current = NodeSpan::new(root, 0);
    while let Some(child) = current.node().children().find_node(offset, current.start()) {
        current = child;
    }
    current.end()
}

fn bench_tree_build(c: &mut Criterion) {
    c.bench_function("tree_build/2k_members", |b| {
        b.iter(|| black_box(synthetic_unit(black_box(2_000)).size()))
    });
}

fn bench_point_queries(c: &mut Criterion) {
    let root = synthetic_unit(2_000);
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let offsets: Vec<usize> = (0..10_000).map(|_| rng.gen_range(0..root.size())).collect();

    c.bench_function("point_query/10k_offsets", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for &offset in &offsets {
                acc = acc.wrapping_add(deepest_end(&root, offset));
            }
            black_box(acc)
        })
    });
}

fn bench_typing_churn(c: &mut Criterion) {
    let root = synthetic_unit(2_000);
    // Inside the first statement of the middle method.
    let base = 8 + 1_000 * 32;

    c.bench_function("typing_middle/100_patches", |b| {
        b.iter_batched(
            || root.clone(),
            |mut root| {
                let mut offset = base + 9;
                for _ in 0..100 {
                    root.grow(1);
                    apply_insertion(&mut root, 0, offset, 1);
                    offset += 1;
                }
                black_box(root.size());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_tree_build,
    bench_point_queries,
    bench_typing_churn
);
criterion_main!(benches);
