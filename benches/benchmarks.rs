use criterion::{criterion_group, criterion_main, Criterion};
use geomarshal::{
    buffer::transpose,
    components::backends::memory::{MemoryBand, MemoryRaster},
    read_raster, GeoTransform, PixelType, ReadOptions,
};

const SIZE: (usize, usize) = (2048, 2048);

fn bench_transpose(c: &mut Criterion) {
    let (cols, rows) = SIZE;
    let data: Vec<f64> = (0..cols * rows).map(|i| i as f64).collect();
    c.bench_function("transpose", |b| b.iter(|| transpose(&data, rows, cols)));
}

fn bench_read_bands(c: &mut Criterion) {
    let (cols, rows) = SIZE;
    let pixels: Vec<f64> = (0..cols * rows).map(|i| (i % 251) as f64).collect();
    let raster = MemoryRaster::new(cols, rows)
        .with_transform(GeoTransform::new([0., 10., 0., 0., 0., -10.]))
        .with_band(MemoryBand::new(PixelType::UInt8, pixels.clone()))
        .with_band(MemoryBand::new(PixelType::UInt8, pixels.clone()))
        .with_band(MemoryBand::new(PixelType::UInt8, pixels));
    let options = ReadOptions {
        compute_centers: true,
    };
    c.bench_function("read_bands", |b| b.iter(|| read_raster(&raster, &options)));
}

criterion_group!(benches, bench_transpose, bench_read_bands);
criterion_main!(benches);
