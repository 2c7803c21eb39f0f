//! Host render path: iteration field, then colouring, for the default
//! Mandelbrot view and a Julia view.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wgpu_fractal::{
    field::compute_field,
    params::{FractalFamily, FractalParameters},
    scalar,
    screen::Size,
};

fn benchmark(c: &mut Criterion) {
    let size = Size::new(400, 400);
    let mandelbrot = FractalParameters::default();
    let julia = FractalParameters {
        family: FractalFamily::Julia,
        ..mandelbrot
    };

    c.bench_function("compute_field_mandelbrot_400", |b| {
        b.iter(|| compute_field(black_box(&mandelbrot), size));
    });

    c.bench_function("compute_field_julia_400", |b| {
        b.iter(|| compute_field(black_box(&julia), size));
    });

    let field = compute_field(&mandelbrot, size);
    c.bench_function("scalar_render_400", |b| {
        b.iter(|| scalar::render(black_box(&field), 0.0, mandelbrot.max_iterations));
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
