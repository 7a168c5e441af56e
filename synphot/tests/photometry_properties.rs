//! End-to-end checks of units, photometry and Lick indices through the public API

use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use synphot::photometry::{
    Band, Bandpass, DetectorType, FilterLibrary, LickIndexCalculator, LickLibrary,
    MagnitudeSystem, MemoryFilterLibrary, PhotometryEngine, PhotometryError, SampledSpectrum,
    BuiltinLickLibrary,
};
use synphot::quantity::catalog::*;
use synphot::quantity::{Quantity, UnitError};

fn flat_spectrum(lower_aa: f64, upper_aa: f64, flam: f64) -> SampledSpectrum {
    let band = Band::from_bounds(lower_aa, upper_aa, ANGSTROM).unwrap();
    SampledSpectrum::flat(&band, flam * FLAM, 601).unwrap()
}

fn top_hat(lower_aa: f64, upper_aa: f64, detector: DetectorType) -> Bandpass {
    let band = Band::from_bounds(lower_aa, upper_aa, ANGSTROM).unwrap();
    Bandpass::top_hat("top-hat", &band, 1.0, detector).unwrap()
}

/// A smooth, bumpy spectrum with some colour to it
fn sloped_spectrum() -> SampledSpectrum {
    let wavelengths: Vec<f64> = (0..=800).map(|i| 2000.0 + i as f64 * 10.0).collect();
    let flux: Vec<f64> = wavelengths
        .iter()
        .map(|w| 1e-15 * (1.0 + 0.3 * (w / 700.0).sin()) * (5000.0 / w).powi(2))
        .collect();
    SampledSpectrum::new(&wavelengths, ANGSTROM, &flux, FLAM).unwrap()
}

#[test]
fn test_unit_round_trips() {
    let groups: [&[Quantity]; 3] = [
        &[METRE, KILOMETRE, CENTIMETRE, MILLIMETRE, MICROMETRE, NANOMETRE, ANGSTROM, PARSEC],
        &[JOULE, ERG, ELECTRON_VOLT],
        &[FNU, JANSKY],
    ];
    for group in groups {
        for &u1 in group {
            for &u2 in group {
                for v in [1e-20, 0.37, 1.0, 5500.0, 3.2e18] {
                    let there = Quantity::new(v, u1).to(u2).unwrap();
                    let back = Quantity::new(there, u2).to(u1).unwrap();
                    assert_relative_eq!(back, v, max_relative = 1e-9);
                }
            }
        }
    }
}

#[test]
fn test_incompatible_units_fail() {
    for (value, target) in [
        (1.0 * ANGSTROM, SECOND),
        (1.0 * FLAM, JANSKY),
        (1.0 * KELVIN, JOULE),
        (1.0 * ERG, WATT),
    ] {
        assert!(matches!(
            value.to(target),
            Err(UnitError::DimensionMismatch { .. })
        ));
    }
}

#[test]
fn test_invariant_to_transmission_rescaling() {
    let spectrum = sloped_spectrum();
    let library = MemoryFilterLibrary::johnson().unwrap();
    let v = library.load_filter("V").unwrap();

    let wavelengths = v.wavelengths_in(ANGSTROM).unwrap();
    let scaled: Vec<f64> = v.transmission().iter().map(|t| t * 7.25).collect();
    let v_scaled =
        Bandpass::new("V x 7.25", &wavelengths, ANGSTROM, &scaled, v.detector_type()).unwrap();

    let engine = PhotometryEngine::new();
    for system in MagnitudeSystem::ALL {
        let original = engine.compute(&spectrum, &v, system).unwrap();
        let rescaled = engine.compute(&spectrum, &v_scaled, system).unwrap();
        assert_relative_eq!(original.value, rescaled.value, max_relative = 1e-10);
        assert_relative_eq!(
            original.flux.base_value(),
            rescaled.flux.base_value(),
            max_relative = 1e-10
        );
    }
}

#[test]
fn test_flat_spectrum_independent_of_detector() {
    let spectrum = flat_spectrum(2500.0, 9000.0, 4.2e-16);
    let library = MemoryFilterLibrary::johnson().unwrap();
    let engine = PhotometryEngine::new();

    for name in library.content() {
        let filter = library.load_filter(&name).unwrap();
        let wavelengths = filter.wavelengths_in(ANGSTROM).unwrap();
        for detector in [DetectorType::Energy, DetectorType::Photon] {
            let bandpass = Bandpass::new(
                name.clone(),
                &wavelengths,
                ANGSTROM,
                filter.transmission(),
                detector,
            )
            .unwrap();
            let result = engine
                .compute(&spectrum, &bandpass, MagnitudeSystem::St)
                .unwrap();
            assert_relative_eq!(result.flux.to(FLAM).unwrap(), 4.2e-16, max_relative = 1e-9);
        }
    }
}

#[test]
fn test_ab_magnitude_matches_jansky_flux() {
    let spectrum = sloped_spectrum();
    let library = MemoryFilterLibrary::johnson().unwrap();
    let engine = PhotometryEngine::new();

    for name in ["U", "B", "V"] {
        let filter = library.load_filter(name).unwrap();
        let ab = engine
            .compute(&spectrum, &filter, MagnitudeSystem::Ab)
            .unwrap();
        let jy = engine
            .compute(&spectrum, &filter, MagnitudeSystem::Jansky)
            .unwrap();
        assert_relative_eq!(
            ab.value,
            -2.5 * (jy.value / AB_REFERENCE_JY).log10(),
            epsilon = 1e-10
        );
    }
}

#[test]
fn test_st_top_hat_example() {
    let spectrum = flat_spectrum(4000.0, 7000.0, 1.0);
    let bandpass = top_hat(5000.0, 6000.0, DetectorType::Energy);

    let result = PhotometryEngine::new()
        .compute_named(&spectrum, &bandpass, "ST")
        .unwrap();
    assert_relative_eq!(result.flux.to(FLAM).unwrap(), 1.0, max_relative = 1e-9);
    assert_relative_eq!(
        result.value,
        -2.5 * (1.0 / ST_REFERENCE_FLAM).log10(),
        epsilon = 1e-9
    );
}

#[test]
fn test_no_overlap_is_empty_overlap() {
    let spectrum = flat_spectrum(4000.0, 7000.0, 1.0);
    let bandpass = top_hat(8000.0, 9000.0, DetectorType::Photon);
    let engine = PhotometryEngine::new();

    for system in MagnitudeSystem::ALL {
        assert!(matches!(
            engine.compute(&spectrum, &bandpass, system),
            Err(PhotometryError::EmptyOverlap(_))
        ));
    }
}

#[test]
fn test_zero_transmission_across_spectrum_is_empty_overlap() {
    // Bandpass grid spans the spectrum, but transmits only on either side of it
    let spectrum = flat_spectrum(4000.0, 7000.0, 1.0);
    let bandpass = Bandpass::new(
        "split",
        &[3000.0, 3500.0, 7500.0, 8000.0],
        ANGSTROM,
        &[1.0, 0.0, 0.0, 1.0],
        DetectorType::Energy,
    )
    .unwrap();
    let engine = PhotometryEngine::new();

    for system in MagnitudeSystem::ALL {
        assert_eq!(
            engine.compute(&spectrum, &bandpass, system),
            Err(PhotometryError::EmptyOverlap("split".to_string()))
        );
    }
}

#[test]
fn test_unknown_system_name() {
    let spectrum = flat_spectrum(4000.0, 7000.0, 1.0);
    let bandpass = top_hat(5000.0, 6000.0, DetectorType::Energy);
    assert!(matches!(
        PhotometryEngine::new().compute_named(&spectrum, &bandpass, "Gunn"),
        Err(PhotometryError::UnsupportedSystem(_))
    ));
}

#[test]
fn test_batch_matches_sequential() {
    let library = MemoryFilterLibrary::johnson().unwrap();
    let b = library.load_filter("B").unwrap();
    let engine = PhotometryEngine::new();

    let spectra: Vec<SampledSpectrum> = (1..=16)
        .map(|i| flat_spectrum(3000.0, 8000.0, i as f64 * 1e-16))
        .collect();
    let batch = engine.compute_batch(&spectra, &b, MagnitudeSystem::Vega);
    assert_eq!(batch.len(), spectra.len());

    for (spectrum, result) in spectra.iter().zip(batch) {
        let single = engine
            .compute(spectrum, &b, MagnitudeSystem::Vega)
            .unwrap();
        assert_eq!(result.unwrap(), single);
    }
}

#[test]
fn test_concurrent_cache_access_is_consistent() {
    let library = MemoryFilterLibrary::johnson().unwrap();
    let v: Arc<Bandpass> = library.load_filter("V").unwrap();

    let values: Vec<(f64, f64, f64)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let v = Arc::clone(&v);
                scope.spawn(move || {
                    (
                        v.vega_flux().unwrap().base_value(),
                        v.effective_wavelength().unwrap().base_value(),
                        v.pivot_wavelength().base_value(),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for value in &values {
        assert_eq!(*value, values[0]);
    }
}

#[test]
fn test_lick_index_of_continuum_is_zero() {
    let library = BuiltinLickLibrary::new().unwrap();
    let calculator = LickIndexCalculator::new();

    // Linear in wavelength, so the interpolated continuum reproduces it exactly
    let wavelengths: Vec<f64> = (0..=6000).map(|i| 3500.0 + i as f64).collect();
    let flux: Vec<f64> = wavelengths.iter().map(|w| 2.0 + 1e-4 * w).collect();
    let spectrum = SampledSpectrum::new(&wavelengths, ANGSTROM, &flux, FLAM).unwrap();

    for name in library.content() {
        let definition = library.load_index(&name).unwrap();
        let index = calculator.compute(&spectrum, &definition).unwrap();
        assert!(index.abs() < 1e-9, "{name}: {index}");
    }
}
