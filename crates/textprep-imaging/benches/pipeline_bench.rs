// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for textprep-imaging: the full pipeline on a synthetic
// text page, and adaptive thresholding on a large image where the integral
// image matters.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use textprep_core::{BinarizeMode, PreprocessConfig};
use textprep_imaging::PixelBuffer;
use textprep_imaging::Preprocessor;
use textprep_imaging::scan::threshold::adaptive_threshold;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Gray paper with a lighting gradient and dark, slightly skewed text bands.
fn synthetic_page(width: u32, height: u32) -> PixelBuffer {
    let slope = 2.0f64.to_radians().tan();
    PixelBuffer::from_gray_fn(width, height, |x, y| {
        let paper = 170 + (x * 60 / width) as u8;
        let level = (y as f64 + x as f64 * slope).round() as i64;
        let in_band = level >= 0 && level % 24 < 6;
        let stroke = (x / 5) % 3 != 0;
        if in_band && stroke { 40 } else { paper }
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Every stage enabled on a 400x300 page, upscaled by 1.5.
fn bench_full_pipeline(c: &mut Criterion) {
    let page = synthetic_page(400, 300);
    let preprocessor = match Preprocessor::new(PreprocessConfig {
        upscale_factor: 1.5,
        contrast: 1.2,
        sharpen: true,
        denoise: true,
        morphological_ops: true,
        deskew: true,
        ..PreprocessConfig::default()
    }) {
        Ok(p) => p,
        Err(err) => panic!("benchmark config rejected: {err}"),
    };

    c.bench_function("full_pipeline (400x300)", |b| {
        b.iter(|| {
            let processed = preprocessor.run(black_box(page.clone()));
            black_box(processed.is_ok());
        });
    });
}

/// Adaptive thresholding with a 31px window on a 2000x1500 page.
fn bench_adaptive_threshold(c: &mut Criterion) {
    let page = synthetic_page(2000, 1500);

    c.bench_function("adaptive_threshold (2000x1500, w=31)", |b| {
        b.iter(|| {
            let mut buf = black_box(page.clone());
            let result = adaptive_threshold(&mut buf, 31);
            black_box((result.is_ok(), buf));
        });
    });
}

/// Otsu binarization on the same page, for comparison.
fn bench_otsu_pipeline(c: &mut Criterion) {
    let page = synthetic_page(2000, 1500);
    let preprocessor = match Preprocessor::new(PreprocessConfig {
        upscale: false,
        binarize_mode: BinarizeMode::Otsu,
        ..PreprocessConfig::default()
    }) {
        Ok(p) => p,
        Err(err) => panic!("benchmark config rejected: {err}"),
    };

    c.bench_function("otsu_pipeline (2000x1500)", |b| {
        b.iter(|| {
            black_box(preprocessor.run(black_box(page.clone())).is_ok());
        });
    });
}

criterion_group!(
    benches,
    bench_full_pipeline,
    bench_adaptive_threshold,
    bench_otsu_pipeline
);
criterion_main!(benches);
