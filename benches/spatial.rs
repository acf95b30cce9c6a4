//! Benchmarks comparing the 2D-tree against the linear point table.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use kdspace::{Aabb2, KdTree, Point2, PointTable};

/// Generates random points in [0, 100) x [0, 100).
fn generate_random_points(count: usize, seed: u64) -> Vec<Point2<f64>> {
    let mut points = Vec::with_capacity(count);
    let mut state = seed;

    for _ in 0..count {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let x = (state as f64 / u64::MAX as f64) * 100.0;

        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let y = (state as f64 / u64::MAX as f64) * 100.0;

        points.push(Point2::new(x, y));
    }

    points
}

fn build_tree(points: &[Point2<f64>]) -> KdTree<f64, usize> {
    points.iter().enumerate().map(|(i, &p)| (p, i)).collect()
}

fn build_table(points: &[Point2<f64>]) -> PointTable<f64, usize> {
    points.iter().enumerate().map(|(i, &p)| (p, i)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for count in [1000, 10000, 100000] {
        let points = generate_random_points(count, 12345);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("kdtree", count), &points, |b, points| {
            b.iter(|| build_tree(black_box(points)))
        });
        group.bench_with_input(BenchmarkId::new("table", count), &points, |b, points| {
            b.iter(|| build_table(black_box(points)))
        });
    }

    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");

    for count in [1000, 10000, 100000] {
        let points = generate_random_points(count, 12345);
        let tree = build_tree(&points);
        let table = build_table(&points);
        let queries = generate_random_points(100, 54321);

        group.throughput(Throughput::Elements(queries.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("kdtree", count),
            &(&tree, &queries),
            |b, (tree, queries)| {
                b.iter(|| {
                    for q in queries.iter() {
                        let _ = tree.nearest(black_box(*q));
                    }
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("table", count),
            &(&table, &queries),
            |b, (table, queries)| {
                b.iter(|| {
                    for q in queries.iter() {
                        let _ = table.nearest(black_box(*q));
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");

    let count = 100000;
    let points = generate_random_points(count, 12345);
    let tree = build_tree(&points);
    let table = build_table(&points);

    // Small query box
    let small_query = Aabb2::from_bounds(45.0, 45.0, 55.0, 55.0);
    group.bench_function("kdtree_small", |b| {
        b.iter(|| tree.range(black_box(small_query)))
    });
    group.bench_function("table_small", |b| {
        b.iter(|| table.range(black_box(small_query)))
    });

    // Large query box
    let large_query = Aabb2::from_bounds(20.0, 20.0, 80.0, 80.0);
    group.bench_function("kdtree_large", |b| {
        b.iter(|| tree.range(black_box(large_query)))
    });
    group.bench_function("table_large", |b| {
        b.iter(|| table.range(black_box(large_query)))
    });

    group.finish();
}

fn bench_k_nearest(c: &mut Criterion) {
    let points = generate_random_points(100000, 12345);
    let tree = build_tree(&points);
    let query = Point2::new(50.0, 50.0);

    c.bench_function("k_nearest_16", |b| {
        b.iter(|| tree.k_nearest(black_box(query), 16))
    });
}

criterion_group!(benches, bench_insert, bench_nearest, bench_range, bench_k_nearest);
criterion_main!(benches);
