use criterion::{black_box, criterion_group, criterion_main, Criterion};
use synphot::photometry::{
    reduce_to_lick_resolution, Band, BuiltinLickLibrary, FilterLibrary, LickIndexCalculator,
    LickLibrary, MagnitudeSystem, MemoryFilterLibrary, PhotometryEngine, SampledSpectrum,
};
use synphot::quantity::catalog::{ANGSTROM, FLAM};

fn make_spectrum(samples: usize) -> SampledSpectrum {
    let band = Band::from_bounds(3000.0, 10_000.0, ANGSTROM).unwrap();
    let step = band.width().to(ANGSTROM).unwrap() / (samples - 1) as f64;
    let wavelengths: Vec<f64> = (0..samples).map(|i| 3000.0 + i as f64 * step).collect();
    let flux: Vec<f64> = wavelengths
        .iter()
        .map(|w| 1e-15 * (1.0 + 0.2 * (w / 37.0).sin()))
        .collect();
    SampledSpectrum::new(&wavelengths, ANGSTROM, &flux, FLAM).unwrap()
}

fn bench_compute(c: &mut Criterion) {
    let library = MemoryFilterLibrary::johnson().unwrap();
    let v = library.load_filter("V").unwrap();
    let engine = PhotometryEngine::new();
    let coarse = make_spectrum(1_000);
    let fine = make_spectrum(50_000);

    let mut group = c.benchmark_group("compute");
    for system in MagnitudeSystem::ALL {
        group.bench_function(format!("{system}_1k_samples"), |b| {
            b.iter(|| engine.compute(black_box(&coarse), black_box(&v), system))
        });
    }
    group.bench_function("Vega_50k_samples", |b| {
        b.iter(|| engine.compute(black_box(&fine), black_box(&v), MagnitudeSystem::Vega))
    });
    group.finish();
}

fn bench_compute_batch(c: &mut Criterion) {
    let library = MemoryFilterLibrary::johnson().unwrap();
    let b_filter = library.load_filter("B").unwrap();
    let engine = PhotometryEngine::new();
    let spectra: Vec<SampledSpectrum> = (0..256).map(|_| make_spectrum(2_000)).collect();

    c.bench_function("compute_batch_256_spectra", |b| {
        b.iter(|| engine.compute_batch(black_box(&spectra), black_box(&b_filter), MagnitudeSystem::Ab))
    });
}

fn bench_lick(c: &mut Criterion) {
    let library = BuiltinLickLibrary::new().unwrap();
    let calculator = LickIndexCalculator::new();
    let spectrum = make_spectrum(7_001);
    let definitions: Vec<_> = library
        .content()
        .iter()
        .map(|name| library.load_index(name).unwrap())
        .collect();

    let mut group = c.benchmark_group("lick");
    group.bench_function("all_indices", |b| {
        b.iter(|| {
            definitions
                .iter()
                .map(|d| calculator.compute(black_box(&spectrum), d))
                .collect::<Vec<_>>()
        })
    });
    group.bench_function("reduce_to_lick_resolution", |b| {
        b.iter(|| reduce_to_lick_resolution(black_box(&spectrum), 2.0 * ANGSTROM, 0.5 * ANGSTROM))
    });
    group.finish();
}

criterion_group!(benches, bench_compute, bench_compute_batch, bench_lick);
criterion_main!(benches);
