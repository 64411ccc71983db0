use std::sync::Arc;

use colorsweep::{BackgroundMask, ClusterConfig, Extractor, KmeansExtractor, ReferencePalette, SweepDriver};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};
use palette::Srgba;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 255 / width) as u8, (y * 255 / height) as u8, 128, 255])
    }))
}

fn benchmark_find_nearest(c: &mut Criterion) {
    let palette = ReferencePalette::new();
    palette.ensure();

    c.bench_function("find_nearest", |b| {
        b.iter(|| palette.find_nearest(black_box(Srgba::new(173, 41, 99, 255))))
    });
}

fn benchmark_extraction(c: &mut Criterion) {
    let image = gradient(320, 240);
    let extractor = KmeansExtractor::new();
    let masks = BackgroundMask::default_masks();

    for config in [ClusterConfig::DEFAULT, ClusterConfig::CIEDE2000 | ClusterConfig::AVERAGE_MEAN] {
        c.bench_function(&format!("kmeans_k3_{}", config.bits()), |b| {
            b.iter(|| extractor.extract(3, config, 80, &masks, black_box(&image)))
        });
    }
}

fn benchmark_sweep(c: &mut Criterion) {
    let image = gradient(320, 240);
    let driver = SweepDriver::new(KmeansExtractor::new(), Arc::new(ReferencePalette::new()));
    let configs = colorsweep::RunConfig::default_sweep().configurations;

    c.bench_function("sweep_default", |b| {
        b.iter(|| driver.sweep("gradient", 3, &configs, black_box(&image)))
    });
}

criterion_group!(benches, benchmark_find_nearest, benchmark_extraction, benchmark_sweep);
criterion_main!(benches);
