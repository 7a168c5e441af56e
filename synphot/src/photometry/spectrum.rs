//! Sampled spectral energy distributions.
//!
//! A [`SampledSpectrum`] is an ordered table of wavelength / flux-density
//! pairs. Whatever unit the caller supplies, samples are stored once in SI
//! base units as a flux density per unit wavelength (the flam dimension), so
//! every downstream integral works in a single convention:
//!
//! - **Per-wavelength input** (flam): stored as is
//! - **Per-frequency input** (fnu, Jy): f_λ = f_ν · c / λ²
//! - **Photon input** (photlam): f_λ = N_λ · h c / λ
//! - **Photon per-frequency input** (photnu): f_λ = N_ν · h c² / λ³
//!
//! Between samples the flux is linearly interpolated; outside the sampled
//! range it is zero.
//!
//! # Detector types
//!
//! Weighted integrals take a [`DetectorType`]. An energy-counting detector
//! weights the integrand by 1, a photon-counting detector by λ (the number of
//! photons carried by a unit of energy grows linearly with wavelength).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::trapezoid::{interpolate, merged_grid, resample, trap_integrate};
use crate::quantity::catalog::{METRE, PLANCK_CONSTANT, SPEED_OF_LIGHT};
use crate::quantity::{Dimension, Quantity, UnitError};

/// One W m⁻³, the storage unit of every sample
const SI_FLUX_DENSITY: Quantity =
    Quantity::from_base(1.0, Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH);

/// Errors that can occur with spectrum operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("Wavelength and flux vectors must have the same length ({wavelengths} vs {flux})")]
    LengthMismatch { wavelengths: usize, flux: usize },

    #[error("Spectrum must contain at least one sample")]
    Empty,

    #[error("Wavelengths must be strictly increasing (sample {0})")]
    NotAscending(usize),

    #[error("Non-finite value at sample {0}")]
    NonFinite(usize),

    #[error("Wavelengths must be positive (sample {0})")]
    NonPositiveWavelength(usize),

    #[error("Unsupported flux density unit with dimension [{0}]")]
    UnsupportedFluxUnit(Dimension),

    #[error("Unknown detector type: {0}")]
    UnknownDetectorType(String),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// How a detector responds to incoming light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorType {
    /// Counts energy: weight w(λ) = 1
    #[default]
    Energy,
    /// Counts photons: weight w(λ) = λ
    Photon,
}

impl DetectorType {
    /// Integration weight at a wavelength given in metres
    pub fn weight(&self, wavelength_m: f64) -> f64 {
        match self {
            DetectorType::Energy => 1.0,
            DetectorType::Photon => wavelength_m,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            DetectorType::Energy => 0,
            DetectorType::Photon => 1,
        }
    }
}

impl FromStr for DetectorType {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "energy" => Ok(DetectorType::Energy),
            "photon" => Ok(DetectorType::Photon),
            _ => Err(SpectrumError::UnknownDetectorType(s.to_string())),
        }
    }
}

impl fmt::Display for DetectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorType::Energy => write!(f, "energy"),
            DetectorType::Photon => write!(f, "photon"),
        }
    }
}

/// Closed wavelength interval, used for index bands and integration limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lower: Quantity,
    pub upper: Quantity,
}

impl Band {
    /// Create a band from two lengths
    pub fn new(lower: Quantity, upper: Quantity) -> Result<Self, UnitError> {
        lower.require(Dimension::LENGTH)?;
        upper.require(Dimension::LENGTH)?;
        Ok(Self { lower, upper })
    }

    /// Create a band from bare numbers in the given length unit
    pub fn from_bounds(lower: f64, upper: f64, unit: Quantity) -> Result<Self, UnitError> {
        Self::new(Quantity::new(lower, unit), Quantity::new(upper, unit))
    }

    /// Width of the band; zero or negative for a degenerate band
    pub fn width(&self) -> Quantity {
        Quantity::from_base(
            self.upper.base_value() - self.lower.base_value(),
            Dimension::LENGTH,
        )
    }

    pub fn center(&self) -> Quantity {
        Quantity::from_base(
            (self.upper.base_value() + self.lower.base_value()) / 2.0,
            Dimension::LENGTH,
        )
    }

    pub fn contains(&self, wavelength: Quantity) -> bool {
        wavelength >= self.lower && wavelength <= self.upper
    }

    /// Bounds in metres
    pub(crate) fn bounds_m(&self) -> (f64, f64) {
        (self.lower.base_value(), self.upper.base_value())
    }
}

/// Energy of a single photon, E = h c / λ
pub fn photon_energy(wavelength: Quantity) -> Result<Quantity, UnitError> {
    wavelength.require(Dimension::LENGTH)?;
    Ok(PLANCK_CONSTANT * SPEED_OF_LIGHT / wavelength)
}

/// Spectrum sampled on a strictly increasing wavelength grid.
///
/// Immutable once built. Wavelengths are stored in metres, flux densities
/// in W m⁻³ (1 flam = 1e7 W m⁻³).
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSpectrum {
    wavelengths: Vec<f64>,
    flux: Vec<f64>,
    detector_type: DetectorType,
}

impl SampledSpectrum {
    /// Create a spectrum from raw arrays and their units.
    ///
    /// # Arguments
    /// * `wavelengths` - Sample wavelengths in `wavelength_unit`, strictly increasing
    /// * `wavelength_unit` - Any length unit
    /// * `flux` - Flux densities in `flux_unit`
    /// * `flux_unit` - flam, fnu, Jy, photlam or photnu (or anything of those dimensions)
    ///
    /// # Errors
    /// - Lengths differ, or the table is empty
    /// - Wavelengths are not strictly increasing or not positive
    /// - A value is NaN or infinite
    /// - Either unit has an unsupported dimension
    pub fn new(
        wavelengths: &[f64],
        wavelength_unit: Quantity,
        flux: &[f64],
        flux_unit: Quantity,
    ) -> Result<Self, SpectrumError> {
        wavelength_unit.require(Dimension::LENGTH)?;

        if wavelengths.len() != flux.len() {
            return Err(SpectrumError::LengthMismatch {
                wavelengths: wavelengths.len(),
                flux: flux.len(),
            });
        }
        if wavelengths.is_empty() {
            return Err(SpectrumError::Empty);
        }

        for (i, (w, f)) in wavelengths.iter().zip(flux.iter()).enumerate() {
            if !w.is_finite() || !f.is_finite() {
                return Err(SpectrumError::NonFinite(i));
            }
            if *w <= 0.0 {
                return Err(SpectrumError::NonPositiveWavelength(i));
            }
        }
        for i in 1..wavelengths.len() {
            if wavelengths[i] <= wavelengths[i - 1] {
                return Err(SpectrumError::NotAscending(i));
            }
        }

        let wavelengths_m: Vec<f64> = wavelengths
            .iter()
            .map(|w| w * wavelength_unit.base_value())
            .collect();

        let hc = (PLANCK_CONSTANT * SPEED_OF_LIGHT).base_value();
        let c = SPEED_OF_LIGHT.base_value();
        let scale = flux_unit.base_value();
        let to_flam: Box<dyn Fn(f64, f64) -> f64> = match flux_unit.dimension() {
            d if d == Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH => Box::new(|_, f| f),
            d if d == Dimension::SPECTRAL_FLUX_DENSITY_FREQUENCY => {
                Box::new(move |lambda, f| f * c / (lambda * lambda))
            }
            d if d == Dimension::PHOTON_FLUX_DENSITY_WAVELENGTH => {
                Box::new(move |lambda, f| f * hc / lambda)
            }
            d if d == Dimension::PHOTON_FLUX_DENSITY_FREQUENCY => {
                Box::new(move |lambda, f| f * hc * c / (lambda * lambda * lambda))
            }
            other => return Err(SpectrumError::UnsupportedFluxUnit(other)),
        };

        let flux_si: Vec<f64> = wavelengths_m
            .iter()
            .zip(flux.iter())
            .map(|(&lambda, &f)| to_flam(lambda, f * scale))
            .collect();

        for (i, f) in flux_si.iter().enumerate() {
            if !f.is_finite() {
                return Err(SpectrumError::NonFinite(i));
            }
        }

        Ok(Self {
            wavelengths: wavelengths_m,
            flux: flux_si,
            detector_type: DetectorType::default(),
        })
    }

    /// Constant flux density over `band`, sampled at `samples` evenly spaced points.
    pub fn flat(band: &Band, flux: Quantity, samples: usize) -> Result<Self, SpectrumError> {
        let (lower, upper) = band.bounds_m();
        let samples = samples.max(2);
        let step = (upper - lower) / (samples - 1) as f64;
        let wavelengths: Vec<f64> = (0..samples).map(|i| lower + step * i as f64).collect();
        let values = vec![1.0; samples];
        Self::new(&wavelengths, METRE, &values, flux)
    }

    /// Build from already validated SI samples.
    pub(crate) fn from_si(wavelengths: Vec<f64>, flux: Vec<f64>, detector_type: DetectorType) -> Self {
        Self {
            wavelengths,
            flux,
            detector_type,
        }
    }

    /// Same samples, different detector type
    pub fn with_detector_type(mut self, detector_type: DetectorType) -> Self {
        self.detector_type = detector_type;
        self
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

    /// Wavelength range covered by the samples
    pub fn support(&self) -> Band {
        let (lower, upper) = self.support_m();
        Band {
            lower: Quantity::from_base(lower, Dimension::LENGTH),
            upper: Quantity::from_base(upper, Dimension::LENGTH),
        }
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

    /// Sample flux densities expressed in `unit` (any supported flux dimension)
    pub fn flux_in(&self, unit: Quantity) -> Result<Vec<f64>, SpectrumError> {
        self.wavelengths
            .iter()
            .zip(self.flux.iter())
            .map(|(&lambda, &f)| {
                let wavelength = Quantity::from_base(lambda, Dimension::LENGTH);
                let flux = Quantity::from_base(f, Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH);
                convert_flux_density(flux, wavelength, unit)
            })
            .collect()
    }

    /// Interpolated flux density (flam dimension) at `wavelength`; zero outside support
    pub fn flux_at(&self, wavelength: Quantity) -> Result<Quantity, UnitError> {
        wavelength.require(Dimension::LENGTH)?;
        Ok(Quantity::from_base(
            self.flux_at_m(wavelength.base_value()),
            Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH,
        ))
    }

    /// New spectrum sampled on `grid` (given in `unit`), zero outside the current support
    pub fn resample(&self, grid: &[f64], unit: Quantity) -> Result<Self, SpectrumError> {
        unit.require(Dimension::LENGTH)?;
        let grid_m: Vec<f64> = grid.iter().map(|w| w * unit.base_value()).collect();
        let flux = self.resample_m(&grid_m);
        // Samples are already SI flux densities
        Ok(Self::new(&grid_m, METRE, &flux, SI_FLUX_DENSITY)?
            .with_detector_type(self.detector_type))
    }

    /// Integrated energy flux over `band`, ∫ f_λ dλ (erg s⁻¹ cm⁻² dimension)
    pub fn irradiance(&self, band: &Band) -> Quantity {
        let value = self.weighted_integral(band, DetectorType::Energy);
        Quantity::from_base(value, Dimension::IRRADIANCE)
    }

    /// Integrated photon flux over `band`, ∫ f_λ λ / (h c) dλ (photons s⁻¹ m⁻²)
    pub fn photon_irradiance(&self, band: &Band) -> Quantity {
        let hc = (PLANCK_CONSTANT * SPEED_OF_LIGHT).base_value();
        let value = self.weighted_integral(band, DetectorType::Photon) / hc;
        Quantity::from_base(value, Dimension::PHOTON_IRRADIANCE)
    }

    /// Integrated flux over `band` as seen by this spectrum's own detector type:
    /// energy flux for [`DetectorType::Energy`], photon flux for [`DetectorType::Photon`].
    pub fn integrated_flux(&self, band: &Band) -> Quantity {
        match self.detector_type {
            DetectorType::Energy => self.irradiance(band),
            DetectorType::Photon => self.photon_irradiance(band),
        }
    }

    /// ∫ f_λ w(λ) dλ over the part of `band` covered by samples (SI units)
    fn weighted_integral(&self, band: &Band, detector_type: DetectorType) -> f64 {
        let (support_lower, support_upper) = self.support_m();
        let (band_lower, band_upper) = band.bounds_m();
        let lower = band_lower.max(support_lower);
        let upper = band_upper.min(support_upper);
        if lower >= upper {
            return 0.0;
        }

        let grid = merged_grid(&self.wavelengths, &[], lower, upper);
        let integrand: Vec<f64> = grid
            .iter()
            .map(|&lambda| self.flux_at_m(lambda) * detector_type.weight(lambda))
            .collect();
        trap_integrate(&grid, &integrand)
    }

    pub(crate) fn wavelengths_m(&self) -> &[f64] {
        &self.wavelengths
    }

    pub(crate) fn support_m(&self) -> (f64, f64) {
        let first = self.wavelengths.first().copied().unwrap_or(0.0);
        let last = self.wavelengths.last().copied().unwrap_or(0.0);
        (first, last)
    }

    pub(crate) fn flux_at_m(&self, wavelength_m: f64) -> f64 {
        interpolate(&self.wavelengths, &self.flux, wavelength_m)
    }

    pub(crate) fn resample_m(&self, grid_m: &[f64]) -> Vec<f64> {
        resample(&self.wavelengths, &self.flux, grid_m)
    }
}

/// Express a per-wavelength flux density at `wavelength` in any supported flux unit.
pub fn convert_flux_density(
    flux: Quantity,
    wavelength: Quantity,
    unit: Quantity,
) -> Result<f64, SpectrumError> {
    flux.require(Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH)?;
    wavelength.require(Dimension::LENGTH)?;

    let converted = match unit.dimension() {
        d if d == Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH => flux,
        d if d == Dimension::SPECTRAL_FLUX_DENSITY_FREQUENCY => {
            flux * wavelength.powi(2) / SPEED_OF_LIGHT
        }
        d if d == Dimension::PHOTON_FLUX_DENSITY_WAVELENGTH => {
            flux / photon_energy(wavelength)?
        }
        d if d == Dimension::PHOTON_FLUX_DENSITY_FREQUENCY => {
            flux * wavelength.powi(2) / SPEED_OF_LIGHT / photon_energy(wavelength)?
        }
        other => return Err(SpectrumError::UnsupportedFluxUnit(other)),
    };
    Ok(converted.to(unit)?)
}
