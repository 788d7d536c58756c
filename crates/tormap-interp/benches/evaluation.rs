//! Spline evaluation hot-path benchmarks.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tormap_interp::{Accelerator, CellCache, make_spline, make_spline2d};

fn bench_eval_1d(criterion: &mut Criterion) {
    let xa: Vec<f64> = (0..200).map(|i| i as f64 * 0.01).collect();
    let ya: Vec<f64> = xa.iter().map(|x| (7.0 * x).sin()).collect();
    let spline = make_spline("cubic", &xa, &ya).unwrap();
    let mut acc = Accelerator::new();

    let mut group = criterion.benchmark_group("eval-1d");
    group.bench_function("cubic-near-queries", |bencher| {
        let mut x = 0.5;
        bencher.iter(|| {
            x = 0.5 + (x * 1e3).sin() * 1e-3;
            black_box(spline.eval(black_box(x), &mut acc).unwrap());
        });
    });
    group.finish();
}

fn bench_eval_2d(criterion: &mut Criterion) {
    let xa: Vec<f64> = (0..100).map(|i| i as f64 * 0.01).collect();
    let ya: Vec<f64> = (0..180).map(|j| j as f64 * 0.035).collect();
    let mut za = Vec::with_capacity(xa.len() * ya.len());
    for x in &xa {
        for y in &ya {
            za.push((x + y).cos());
        }
    }
    let spline = make_spline2d("bicubic", &xa, &ya, &za).unwrap();
    let (mut xacc, mut yacc) = (Accelerator::new(), Accelerator::new());
    let mut cache = CellCache::new();

    let mut group = criterion.benchmark_group("eval-2d");
    group.bench_function("bicubic-near-queries", |bencher| {
        let mut x = 0.5;
        bencher.iter(|| {
            x = 0.5 + (x * 1e3).sin() * 1e-3;
            black_box(
                spline
                    .eval(black_box(x), black_box(3.0), &mut xacc, &mut yacc, &mut cache)
                    .unwrap(),
            );
        });
    });
    group.finish();
}

criterion_group!(benches, bench_eval_1d, bench_eval_2d);
criterion_main!(benches);
