//! Benchmark for arc rasterization.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use citation_arcs::arc::{ArcRenderer, Encoding};
use citation_arcs::data::{CitationData, CitationPair};
use citation_arcs::params::{RenderParameters, Viewport};

/// Deterministic pseudo-random pairs spread over 0..200.
fn generate_pairs(n: usize) -> CitationData {
    let mut state = 0x2545_f491_u32;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state % 200) as f32
    };
    CitationData::from_pairs((0..n).map(|_| CitationPair::new(next(), next())).collect())
}

fn arc_render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("arc_render");
    group.sample_size(20);

    for n in [100, 1_000, 5_000] {
        let data = generate_pairs(n);
        let renderer = ArcRenderer::from_data(&data);
        let params = RenderParameters::for_axis(&data.axis);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| renderer.render(black_box(&data.axis), black_box(&params), Viewport::new(800, 450)).unwrap());
        });
    }

    group.finish();
}

fn arc_encoding_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("arc_encoding");
    group.sample_size(10);

    let data = generate_pairs(50);
    let params = RenderParameters::for_axis(&data.axis);

    for (name, encoding) in [("quad", Encoding::InstancedQuad), ("full_screen", Encoding::FullScreen)] {
        let renderer = ArcRenderer::from_data(&data).encoding(encoding);
        group.bench_function(name, |b| {
            b.iter(|| renderer.render(black_box(&data.axis), &params, Viewport::new(400, 225)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, arc_render_benchmark, arc_encoding_benchmark);
criterion_main!(benches);
