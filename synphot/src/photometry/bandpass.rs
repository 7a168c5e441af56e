//! Photometric bandpasses: transmission curves with cached characteristics.
//!
//! A [`Bandpass`] is a named transmission curve T(λ) sampled on a strictly
//! increasing wavelength grid, plus the [`DetectorType`] of the system it
//! describes. Between samples T is linearly interpolated and outside the
//! grid it is zero.
//!
//! # Characteristic wavelengths
//!
//! | Property | Definition |
//! |----------|------------|
//! | norm | ∫ T dλ |
//! | central | ∫ λ T dλ / ∫ T dλ |
//! | pivot (photon) | √(∫ λ T dλ / ∫ T/λ dλ) |
//! | pivot (energy) | √(∫ T dλ / ∫ T/λ² dλ) |
//! | effective | ∫ λ T V dλ / ∫ T V dλ, V = Vega reference |
//! | photon | ∫ λ² T V dλ / ∫ λ T V dλ |
//!
//! Pivot wavelengths, Vega-weighted wavelengths and the Vega reference flux
//! are computed on first use and cached inside the bandpass. The caches are
//! compute-once cells, so a bandpass can be shared across threads and every
//! caller sees the same value.

use once_cell::sync::OnceCell;
use thiserror::Error;

use super::engine::{band_integrals, synthetic_flux, PhotometryError};
use super::spectrum::{Band, DetectorType};
use super::trapezoid::{interpolate, merged_grid, trap_integrate};
use super::vega::vega_reference;
use crate::quantity::catalog::METRE;
use crate::quantity::{Dimension, Quantity, UnitError};

/// Errors that can occur when building a bandpass
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BandpassError {
    #[error("Wavelength and transmission vectors must have the same length ({wavelengths} vs {transmission})")]
    LengthMismatch {
        wavelengths: usize,
        transmission: usize,
    },

    #[error("A bandpass needs at least two samples, got {0}")]
    TooFewPoints(usize),

    #[error("Wavelengths must be strictly increasing (sample {0})")]
    NotAscending(usize),

    #[error("Wavelengths must be positive (sample {0})")]
    NonPositiveWavelength(usize),

    #[error("Transmission must be non-negative (sample {0})")]
    NegativeTransmission(usize),

    #[error("Non-finite value at sample {0}")]
    NonFinite(usize),

    #[error("Transmission is zero everywhere")]
    ZeroTransmission,

    #[error("Bandpasses {0} and {1} do not overlap")]
    NoOverlap(String, String),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Compute-once derived values, all in SI base units
#[derive(Debug, Clone, Default)]
struct DerivedCache {
    pivot: [OnceCell<f64>; 2],
    effective: OnceCell<f64>,
    photon: OnceCell<f64>,
    vega_flux: OnceCell<f64>,
}

/// Named, immutable transmission curve.
#[derive(Debug, Clone)]
pub struct Bandpass {
    name: String,

    /// Wavelengths in metres
    wavelengths: Vec<f64>,

    /// Transmission at each wavelength, non-negative
    transmission: Vec<f64>,

    detector_type: DetectorType,

    cache: DerivedCache,
}

impl Bandpass {
    /// Create a bandpass from a sampled transmission table.
    ///
    /// # Arguments
    /// * `name` - Identifier used in logs and errors
    /// * `wavelengths` - Sample wavelengths in `wavelength_unit`, strictly increasing
    /// * `wavelength_unit` - Any length unit
    /// * `transmission` - Non-negative throughput at each wavelength
    /// * `detector_type` - Energy or photon counting
    ///
    /// # Errors
    /// Returns an error if:
    /// - The vectors have different lengths or fewer than two samples
    /// - Wavelengths are not strictly increasing or not positive
    /// - Any value is non-finite, any transmission negative
    /// - The transmission is zero everywhere
    pub fn new(
        name: impl Into<String>,
        wavelengths: &[f64],
        wavelength_unit: Quantity,
        transmission: &[f64],
        detector_type: DetectorType,
    ) -> Result<Self, BandpassError> {
        wavelength_unit.require(Dimension::LENGTH)?;

        if wavelengths.len() != transmission.len() {
            return Err(BandpassError::LengthMismatch {
                wavelengths: wavelengths.len(),
                transmission: transmission.len(),
            });
        }
        if wavelengths.len() < 2 {
            return Err(BandpassError::TooFewPoints(wavelengths.len()));
        }

        for (i, (w, t)) in wavelengths.iter().zip(transmission.iter()).enumerate() {
            if !w.is_finite() || !t.is_finite() {
                return Err(BandpassError::NonFinite(i));
            }
            if *w <= 0.0 {
                return Err(BandpassError::NonPositiveWavelength(i));
            }
            if *t < 0.0 {
                return Err(BandpassError::NegativeTransmission(i));
            }
        }
        for i in 1..wavelengths.len() {
            if wavelengths[i] <= wavelengths[i - 1] {
                return Err(BandpassError::NotAscending(i));
            }
        }
        if transmission.iter().all(|&t| t == 0.0) {
            return Err(BandpassError::ZeroTransmission);
        }

        let scale = wavelength_unit.base_value();
        Ok(Self {
            name: name.into(),
            wavelengths: wavelengths.iter().map(|w| w * scale).collect(),
            transmission: transmission.to_vec(),
            detector_type,
            cache: DerivedCache::default(),
        })
    }

    /// Rectangular passband with constant transmission inside `band`.
    ///
    /// The curve drops to zero just outside the band edges.
    pub fn top_hat(
        name: impl Into<String>,
        band: &Band,
        transmission: f64,
        detector_type: DetectorType,
    ) -> Result<Self, BandpassError> {
        let (lower, upper) = band.bounds_m();

        // Edge offset: small against any band, large enough to survive rounding
        let smol = (upper - lower).abs() * 1e-9;

        let wavelengths = [lower - smol, lower, upper, upper + smol];
        let values = [0.0, transmission, transmission, 0.0];
        Self::new(name, &wavelengths, METRE, &values, detector_type)
    }

    /// Product of two transmission curves over their common wavelength range,
    /// e.g. filter × detector response.
    ///
    /// The result keeps the first curve's detector type.
    pub fn product(a: &Bandpass, b: &Bandpass) -> Result<Self, BandpassError> {
        let (a_lower, a_upper) = a.support_m();
        let (b_lower, b_upper) = b.support_m();
        let lower = a_lower.max(b_lower);
        let upper = a_upper.min(b_upper);

        if lower >= upper {
            return Err(BandpassError::NoOverlap(a.name.clone(), b.name.clone()));
        }

        let wavelengths = merged_grid(&a.wavelengths, &b.wavelengths, lower, upper);
        let transmission: Vec<f64> = wavelengths
            .iter()
            .map(|&w| a.transmission_at_m(w) * b.transmission_at_m(w))
            .collect();

        Self::new(
            format!("{}*{}", a.name, b.name),
            &wavelengths,
            METRE,
            &transmission,
            a.detector_type,
        )
        .map_err(|e| match e {
            BandpassError::ZeroTransmission => BandpassError::NoOverlap(a.name.clone(), b.name.clone()),
            other => other,
        })
    }

    /// Same curve resampled on `grid` (in `unit`); zero outside the current range.
    pub fn reinterpolate(&self, grid: &[f64], unit: Quantity) -> Result<Self, BandpassError> {
        unit.require(Dimension::LENGTH)?;
        let transmission: Vec<f64> = grid
            .iter()
            .map(|w| self.transmission_at_m(w * unit.base_value()))
            .collect();
        Self::new(self.name.clone(), grid, unit, &transmission, self.detector_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn detector_type(&self) -> DetectorType {
        self.detector_type
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn transmission(&self) -> &[f64] {
        &self.transmission
    }

    /// Sample wavelengths expressed in `unit`
    pub fn wavelengths_in(&self, unit: Quantity) -> Result<Vec<f64>, UnitError> {
        unit.require(Dimension::LENGTH)?;
        Ok(self
            .wavelengths
            .iter()
            .map(|w| w / unit.base_value())
            .collect())
    }

    /// Transmission at `wavelength`, linearly interpolated, zero outside the grid
    pub fn at(&self, wavelength: Quantity) -> Result<f64, UnitError> {
        wavelength.require(Dimension::LENGTH)?;
        Ok(self.transmission_at_m(wavelength.base_value()))
    }

    /// Wavelength range of the sampled curve
    pub fn support(&self) -> Band {
        let (lower, upper) = self.support_m();
        Band {
            lower: length(lower),
            upper: length(upper),
        }
    }

    pub fn peak_transmission(&self) -> f64 {
        self.transmission.iter().copied().fold(0.0, f64::max)
    }

    /// Integrate T(λ)·f(λ) over the curve with the trapezoidal rule.
    ///
    /// `f` receives the wavelength in metres; the result is in SI units.
    pub fn integrate<F>(&self, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let integrand: Vec<f64> = self
            .wavelengths
            .iter()
            .zip(self.transmission.iter())
            .map(|(&w, &t)| t * f(w))
            .collect();
        trap_integrate(&self.wavelengths, &integrand)
    }

    /// ∫ T dλ
    pub fn norm(&self) -> Quantity {
        length(self.integrate(|_| 1.0))
    }

    /// Transmission-weighted mean wavelength, ∫ λ T dλ / ∫ T dλ
    pub fn central_wavelength(&self) -> Quantity {
        length(self.integrate(|w| w) / self.integrate(|_| 1.0))
    }

    /// Pivot wavelength for this bandpass's own detector type
    pub fn pivot_wavelength(&self) -> Quantity {
        self.pivot_wavelength_for(self.detector_type)
    }

    /// Pivot wavelength for an explicit detector type (cached per type)
    pub fn pivot_wavelength_for(&self, detector_type: DetectorType) -> Quantity {
        let value = *self.cache.pivot[detector_type.index()].get_or_init(|| {
            let squared = match detector_type {
                DetectorType::Photon => self.integrate(|w| w) / self.integrate(|w| 1.0 / w),
                DetectorType::Energy => {
                    self.integrate(|_| 1.0) / self.integrate(|w| 1.0 / (w * w))
                }
            };
            let pivot = squared.sqrt();
            log::debug!(
                "{}: {} pivot wavelength {:.3} nm",
                self.name,
                detector_type,
                pivot * 1e9
            );
            pivot
        });
        length(value)
    }

    /// Vega-weighted effective wavelength, ∫ λ T V dλ / ∫ T V dλ
    pub fn effective_wavelength(&self) -> Result<Quantity, PhotometryError> {
        let value = self.cache.effective.get_or_try_init(|| {
            self.vega_weighted_ratio(|w| w, |_| 1.0)
        })?;
        Ok(length(*value))
    }

    /// Mean wavelength of the detected Vega photon distribution, ∫ λ² T V dλ / ∫ λ T V dλ
    pub fn photon_wavelength(&self) -> Result<Quantity, PhotometryError> {
        let value = self.cache.photon.get_or_try_init(|| {
            self.vega_weighted_ratio(|w| w * w, |w| w)
        })?;
        Ok(length(*value))
    }

    /// Synthetic flux of the built-in Vega reference through this bandpass
    pub fn vega_flux(&self) -> Result<Quantity, PhotometryError> {
        let value = self.cache.vega_flux.get_or_try_init(|| {
            let flux = synthetic_flux(vega_reference(), self)?;
            log::debug!("{}: Vega reference flux {:.4e} W m^-3", self.name, flux.base_value());
            Ok::<f64, PhotometryError>(flux.base_value())
        })?;
        Ok(Quantity::from_base(
            *value,
            Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH,
        ))
    }

    /// Shortest wavelength where T exceeds 1 % of its peak
    pub fn min_wavelength(&self) -> Quantity {
        let threshold = 0.01 * self.peak_transmission();
        let index = self
            .transmission
            .iter()
            .position(|&t| t > threshold)
            .unwrap_or(0);
        length(self.wavelengths[index])
    }

    /// Longest wavelength where T exceeds 1 % of its peak
    pub fn max_wavelength(&self) -> Quantity {
        let threshold = 0.01 * self.peak_transmission();
        let index = self
            .transmission
            .iter()
            .rposition(|&t| t > threshold)
            .unwrap_or(self.wavelengths.len() - 1);
        length(self.wavelengths[index])
    }

    /// Width of a rectangle with the peak transmission and the same norm
    pub fn effective_width(&self) -> Quantity {
        length(self.integrate(|_| 1.0) / self.peak_transmission())
    }

    /// Full width at half maximum, rounded to the sampling grid
    pub fn fwhm(&self) -> Quantity {
        let half = 0.5 * self.peak_transmission();
        let first = self.transmission.iter().position(|&t| t >= half);
        let last = self.transmission.iter().rposition(|&t| t >= half);
        match (first, last) {
            (Some(first), Some(last)) => length(self.wavelengths[last] - self.wavelengths[first]),
            _ => length(0.0),
        }
    }

    pub(crate) fn wavelengths_m(&self) -> &[f64] {
        &self.wavelengths
    }

    pub(crate) fn support_m(&self) -> (f64, f64) {
        let first = self.wavelengths.first().copied().unwrap_or(0.0);
        let last = self.wavelengths.last().copied().unwrap_or(0.0);
        (first, last)
    }

    pub(crate) fn transmission_at_m(&self, wavelength_m: f64) -> f64 {
        interpolate(&self.wavelengths, &self.transmission, wavelength_m)
    }

    fn vega_weighted_ratio<N, D>(&self, numerator: N, denominator: D) -> Result<f64, PhotometryError>
    where
        N: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        let vega = vega_reference();
        let top = band_integrals(vega, self, numerator).flux_weighted;
        let bottom = band_integrals(vega, self, denominator).flux_weighted;
        if !(bottom > 0.0) {
            return Err(PhotometryError::EmptyOverlap(self.name.clone()));
        }
        Ok(top / bottom)
    }
}

fn length(metres: f64) -> Quantity {
    Quantity::from_base(metres, Dimension::LENGTH)
}
