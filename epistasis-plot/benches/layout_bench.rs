//! Criterion benchmarks for the interaction chart.
//!
//! Run with: `cargo bench -p epistasis-plot`
//!
//! Measures the layout computation (significance, colors, grid) separately
//! from SVG rendering, across map sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use epistasis_core::synthetic::{synthetic_model, SyntheticSpec};
use epistasis_plot::interactions::{InteractionLayout, InteractionOptions};
use epistasis_plot::{bar_with_xbox, render_to_string, PlotConfig};

/// Benchmark the layout for growing numbers of sites.
fn bench_interaction_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("interaction_layout");
    let opts = InteractionOptions::default();

    for length in [4usize, 6, 8].iter() {
        let model = synthetic_model(&SyntheticSpec {
            length: *length,
            order: 3,
            ..Default::default()
        });
        group.bench_with_input(BenchmarkId::from_parameter(length), length, |b, _| {
            b.iter(|| {
                let _ = InteractionLayout::from_model(black_box(&model), &opts);
            });
        });
    }

    group.finish();
}

/// Benchmark rendering the full two-panel chart to SVG.
fn bench_interaction_svg(c: &mut Criterion) {
    let model = synthetic_model(&SyntheticSpec::default());
    let opts = InteractionOptions::default();
    let config = PlotConfig::default();

    c.bench_function("interaction_svg", |b| {
        b.iter(|| {
            let fig = bar_with_xbox(black_box(&model), &opts).unwrap();
            let _ = render_to_string(&fig, &config);
        });
    });
}

criterion_group!(benches, bench_interaction_layout, bench_interaction_svg);
criterion_main!(benches);
