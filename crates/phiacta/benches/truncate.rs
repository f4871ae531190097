//! Benchmarks for math-safe truncation.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use phiacta::markdown::{compact_preview, truncate_preserving_math};

fn math_heavy(len: usize) -> String {
    let unit = "Let $x_i$ satisfy $$\\sum_{i=1}^n x_i^2 \\le 1$$ and note $a$. ";
    unit.repeat(len / unit.len() + 1)
}

fn bench_truncate(c: &mut Criterion) {
    let plain = "lorem ipsum dolor sit amet ".repeat(400);
    let math = math_heavy(10_000);

    c.bench_function("truncate_plain_200", |b| {
        b.iter(|| truncate_preserving_math(black_box(&plain), black_box(200)));
    });
    c.bench_function("truncate_math_200", |b| {
        b.iter(|| truncate_preserving_math(black_box(&math), black_box(200)));
    });
    c.bench_function("truncate_fits", |b| {
        b.iter(|| truncate_preserving_math(black_box("short text"), black_box(200)));
    });
    c.bench_function("compact_preview_math_200", |b| {
        b.iter(|| compact_preview(black_box(&math), black_box(200)));
    });
}

criterion_group!(benches, bench_truncate);
criterion_main!(benches);
