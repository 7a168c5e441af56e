//! Built-in Vega reference spectrum for the Vega magnitude system.
//!
//! Approximated by a Planck curve at Vega's effective temperature, scaled to
//! the measured monochromatic flux at 5556 Å. Good to a few percent across
//! the optical; a tabulated CALSPEC model can be substituted through
//! [`SampledSpectrum`] when better absolute accuracy is needed.

use once_cell::sync::Lazy;

use super::spectrum::{DetectorType, SampledSpectrum};
use crate::quantity::catalog::{ANGSTROM, BOLTZMANN_CONSTANT, FLAM, PLANCK_CONSTANT, SPEED_OF_LIGHT};
use crate::quantity::Quantity;
use crate::units::{Temperature, TemperatureExt};

/// Effective temperature of the reference model
pub const VEGA_TEMPERATURE_K: f64 = 9550.0;

/// Monochromatic flux of Vega at 5556 Å, in flam
pub const VEGA_FLUX_5556_FLAM: f64 = 3.46e-9;

const GRID_START_AA: f64 = 900.0;
const GRID_END_AA: f64 = 300_000.0;
const GRID_POINTS: usize = 6000;

static VEGA: Lazy<SampledSpectrum> = Lazy::new(build_reference);

/// The process-wide Vega reference spectrum
pub fn vega_reference() -> &'static SampledSpectrum {
    &VEGA
}

/// Planck spectral radiance shape B_λ(T) up to a constant factor
fn planck_shape(wavelength_m: f64, temperature: Quantity) -> f64 {
    let hc = (PLANCK_CONSTANT * SPEED_OF_LIGHT).base_value();
    let kt = (BOLTZMANN_CONSTANT * temperature).base_value();
    let x = hc / (wavelength_m * kt);
    1.0 / (wavelength_m.powi(5) * x.exp_m1())
}

fn build_reference() -> SampledSpectrum {
    let temperature = Quantity::from(Temperature::from_kelvin(VEGA_TEMPERATURE_K));

    let start = GRID_START_AA * ANGSTROM.base_value();
    let end = GRID_END_AA * ANGSTROM.base_value();
    let log_step = (end / start).ln() / (GRID_POINTS - 1) as f64;
    let wavelengths: Vec<f64> = (0..GRID_POINTS)
        .map(|i| start * (log_step * i as f64).exp())
        .collect();

    let anchor = 5556.0 * ANGSTROM.base_value();
    let scale = VEGA_FLUX_5556_FLAM * FLAM.base_value() / planck_shape(anchor, temperature);
    let flux: Vec<f64> = wavelengths
        .iter()
        .map(|&w| scale * planck_shape(w, temperature))
        .collect();

    log::debug!(
        "Built Vega reference: {} samples, {:.0}-{:.0} Å, T = {} K",
        GRID_POINTS,
        GRID_START_AA,
        GRID_END_AA,
        VEGA_TEMPERATURE_K
    );
    SampledSpectrum::from_si(wavelengths, flux, DetectorType::Energy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_anchor_flux() {
        let vega = vega_reference();
        let flux = vega.flux_at(5556.0 * ANGSTROM).unwrap().to(FLAM).unwrap();
        assert_relative_eq!(flux, VEGA_FLUX_5556_FLAM, max_relative = 1e-4);
    }

    #[test]
    fn test_shape() {
        let vega = vega_reference();
        let support = vega.support();
        assert_relative_eq!(support.lower.to(ANGSTROM).unwrap(), 900.0, max_relative = 1e-9);
        assert_relative_eq!(support.upper.to(ANGSTROM).unwrap(), 300_000.0, max_relative = 1e-9);

        // Wien peak of a 9550 K body sits near 3030 Å
        let at = |aa: f64| vega.flux_at(aa * ANGSTROM).unwrap().base_value();
        assert!(at(3000.0) > at(2000.0));
        assert!(at(3000.0) > at(5000.0));
        assert!(at(5000.0) > at(10_000.0));
        assert!(vega.flux_in(FLAM).unwrap().iter().all(|f| *f > 0.0));
    }
}
