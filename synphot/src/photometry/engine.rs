//! Synthetic photometry: spectrum × bandpass → flux and magnitude.
//!
//! The synthetic flux of a spectrum f(λ) through a bandpass T(λ) is the
//! transmission-weighted mean
//!
//! ```text
//!         ∫ f(λ) T(λ) w(λ) dλ
//! f̄  =  ─────────────────────
//!           ∫ T(λ) w(λ) dλ
//! ```
//!
//! with w(λ) = 1 for energy-counting and w(λ) = λ for photon-counting
//! bandpasses. The integration grid is the bandpass grid with the spectrum
//! samples that fall inside it merged in; f is zero outside the spectrum's
//! sampled range, and the numerator stops exactly at the spectrum edges.
//!
//! Magnitude systems:
//! - **Vega**: m = −2.5 log10(f̄ / f̄_Vega)
//! - **AB**: f_ν = f̄ λp² / c, m = −2.5 log10(f_ν / 3631 Jy)
//! - **ST**: m = −2.5 log10(f̄ / 3.63e-9 erg s⁻¹ cm⁻² Å⁻¹)
//! - **Jansky**: f_ν in Jy, no logarithm

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bandpass::Bandpass;
use super::spectrum::SampledSpectrum;
use super::trapezoid::{merged_grid, trap_integrate};
use crate::quantity::catalog::{AB_REFERENCE, FLAM, JANSKY, SPEED_OF_LIGHT, ST_REFERENCE};
use crate::quantity::{Dimension, Quantity, UnitError};

/// Errors that can occur during synthetic photometry
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhotometryError {
    #[error("Bandpass {0} has no transmission over the spectrum's wavelength range")]
    EmptyOverlap(String),

    #[error("Invalid bandpass {name}: {reason}")]
    InvalidBandpass { name: String, reason: String },

    #[error("Unsupported magnitude system: {0}")]
    UnsupportedSystem(String),

    #[error("Cannot take the magnitude of a non-positive flux ratio {0}")]
    NonPositiveFlux(f64),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Photometric magnitude (or flux) system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagnitudeSystem {
    Vega,
    #[serde(rename = "AB")]
    Ab,
    #[serde(rename = "ST")]
    St,
    Jansky,
}

impl MagnitudeSystem {
    pub const ALL: [MagnitudeSystem; 4] = [
        MagnitudeSystem::Vega,
        MagnitudeSystem::Ab,
        MagnitudeSystem::St,
        MagnitudeSystem::Jansky,
    ];

    /// Whether results are magnitudes (true) or linear flux densities
    pub fn is_magnitude(&self) -> bool {
        !matches!(self, MagnitudeSystem::Jansky)
    }
}

impl FromStr for MagnitudeSystem {
    type Err = PhotometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vega" | "vegamag" => Ok(MagnitudeSystem::Vega),
            "ab" | "abmag" => Ok(MagnitudeSystem::Ab),
            "st" | "stmag" => Ok(MagnitudeSystem::St),
            "jy" | "jansky" => Ok(MagnitudeSystem::Jansky),
            _ => Err(PhotometryError::UnsupportedSystem(s.to_string())),
        }
    }
}

impl fmt::Display for MagnitudeSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            MagnitudeSystem::Vega => "Vega",
            MagnitudeSystem::Ab => "AB",
            MagnitudeSystem::St => "ST",
            MagnitudeSystem::Jansky => "Jy",
        };
        write!(f, "{tag}")
    }
}

/// Outcome of one photometric evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeResult {
    /// Magnitude, or flux density in Jy for [`MagnitudeSystem::Jansky`]
    pub value: f64,
    pub system: MagnitudeSystem,
    /// Synthetic flux density: per unit frequency for Jansky, per unit wavelength otherwise
    pub flux: Quantity,
}

/// Zero point of a bandpass in one magnitude system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroPoint {
    pub system: MagnitudeSystem,
    /// Offset such that m = −2.5 log10(f̄ / flam) − magnitude
    pub magnitude: f64,
    /// Zero-point flux density per unit wavelength
    pub flux: Quantity,
    /// Zero-point flux density per unit frequency
    pub flux_frequency: Quantity,
}

/// Trapezoid integrals of one spectrum through one bandpass, SI units
#[derive(Debug, Clone, Copy)]
pub(crate) struct BandIntegrals {
    /// ∫ f T w dλ over the spectrum support
    pub flux_weighted: f64,
    /// ∫ T w dλ over the spectrum support
    pub covered_norm: f64,
    /// ∫ T w dλ over the whole bandpass
    pub norm: f64,
}

/// Integrate `spectrum` through `bandpass` with an arbitrary weight w(λ), λ in metres.
pub(crate) fn band_integrals<W>(
    spectrum: &SampledSpectrum,
    bandpass: &Bandpass,
    weight: W,
) -> BandIntegrals
where
    W: Fn(f64) -> f64,
{
    let (band_lower, band_upper) = bandpass.support_m();
    let full_grid = merged_grid(
        bandpass.wavelengths_m(),
        spectrum.wavelengths_m(),
        band_lower,
        band_upper,
    );
    let weighted_transmission = |grid: &[f64]| -> Vec<f64> {
        grid.iter()
            .map(|&w| bandpass.transmission_at_m(w) * weight(w))
            .collect()
    };

    let norm = trap_integrate(&full_grid, &weighted_transmission(&full_grid));

    let (support_lower, support_upper) = spectrum.support_m();
    let lower = band_lower.max(support_lower);
    let upper = band_upper.min(support_upper);
    if lower >= upper {
        return BandIntegrals {
            flux_weighted: 0.0,
            covered_norm: 0.0,
            norm,
        };
    }

    let covered_grid = merged_grid(&full_grid, &[], lower, upper);
    let tw = weighted_transmission(&covered_grid);
    let ftw: Vec<f64> = covered_grid
        .iter()
        .zip(tw.iter())
        .map(|(&w, &t)| spectrum.flux_at_m(w) * t)
        .collect();

    BandIntegrals {
        flux_weighted: trap_integrate(&covered_grid, &ftw),
        covered_norm: trap_integrate(&covered_grid, &tw),
        norm,
    }
}

/// Transmission-weighted mean flux density of `spectrum` through `bandpass`,
/// weighted by the bandpass's detector type.
pub fn synthetic_flux(
    spectrum: &SampledSpectrum,
    bandpass: &Bandpass,
) -> Result<Quantity, PhotometryError> {
    if let Some(bad) = bandpass
        .transmission()
        .iter()
        .find(|t| !t.is_finite() || **t < 0.0)
    {
        return Err(PhotometryError::InvalidBandpass {
            name: bandpass.name().to_string(),
            reason: format!("transmission value {bad}"),
        });
    }

    let detector_type = bandpass.detector_type();
    let integrals = band_integrals(spectrum, bandpass, |w| detector_type.weight(w));

    if !(integrals.norm > 0.0) || !(integrals.covered_norm > 0.0) {
        return Err(PhotometryError::EmptyOverlap(bandpass.name().to_string()));
    }

    let coverage = integrals.covered_norm / integrals.norm;
    if coverage < 1.0 - 1e-9 {
        log::warn!(
            "Spectrum covers only {:.1}% of the {} bandpass response",
            coverage * 100.0,
            bandpass.name()
        );
    }

    Ok(Quantity::from_base(
        integrals.flux_weighted / integrals.norm,
        Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH,
    ))
}

/// −2.5 log10 of a flux ratio; rejects ratios that would give NaN or ∞
fn pogson(ratio: Quantity) -> Result<f64, PhotometryError> {
    let ratio = ratio.dimensionless_value()?;
    if !(ratio > 0.0) || !ratio.is_finite() {
        return Err(PhotometryError::NonPositiveFlux(ratio));
    }
    Ok(-2.5 * ratio.log10())
}

/// f_ν = f_λ λ² / c
fn per_frequency(flux: Quantity, wavelength: Quantity) -> Quantity {
    flux * wavelength.powi(2) / SPEED_OF_LIGHT
}

/// Stateless evaluator of synthetic magnitudes.
///
/// All inputs are borrowed immutably; the only state touched is the
/// compute-once cache inside each [`Bandpass`], so one engine can be shared
/// freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotometryEngine;

impl PhotometryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Magnitude (or Jansky flux) of `spectrum` through `bandpass` in `system`.
    ///
    /// # Errors
    /// - [`PhotometryError::EmptyOverlap`] when the transmission is zero over
    ///   the spectrum's wavelength range
    /// - [`PhotometryError::InvalidBandpass`] for negative or non-finite transmission
    /// - [`PhotometryError::NonPositiveFlux`] when a magnitude is requested for
    ///   a flux that is not strictly positive
    pub fn compute(
        &self,
        spectrum: &SampledSpectrum,
        bandpass: &Bandpass,
        system: MagnitudeSystem,
    ) -> Result<MagnitudeResult, PhotometryError> {
        let flux = synthetic_flux(spectrum, bandpass)?;

        let (value, flux) = match system {
            MagnitudeSystem::Vega => (pogson(flux / bandpass.vega_flux()?)?, flux),
            MagnitudeSystem::Ab => {
                let f_nu = per_frequency(flux, bandpass.pivot_wavelength());
                (pogson(f_nu / AB_REFERENCE)?, flux)
            }
            MagnitudeSystem::St => (pogson(flux / ST_REFERENCE)?, flux),
            MagnitudeSystem::Jansky => {
                let f_nu = per_frequency(flux, bandpass.pivot_wavelength());
                (f_nu.to(JANSKY)?, f_nu)
            }
        };

        Ok(MagnitudeResult {
            value,
            system,
            flux,
        })
    }

    /// Same as [`compute`](Self::compute) with the system given by name
    /// ("Vega", "AB", "ST", "Jy"); unknown names yield
    /// [`PhotometryError::UnsupportedSystem`].
    pub fn compute_named(
        &self,
        spectrum: &SampledSpectrum,
        bandpass: &Bandpass,
        system: &str,
    ) -> Result<MagnitudeResult, PhotometryError> {
        let system = system.parse::<MagnitudeSystem>()?;
        self.compute(spectrum, bandpass, system)
    }

    /// Evaluate many spectra through one bandpass in parallel.
    ///
    /// Results come back in input order.
    pub fn compute_batch(
        &self,
        spectra: &[SampledSpectrum],
        bandpass: &Bandpass,
        system: MagnitudeSystem,
    ) -> Vec<Result<MagnitudeResult, PhotometryError>> {
        log::debug!(
            "Batch photometry: {} spectra through {} ({})",
            spectra.len(),
            bandpass.name(),
            system
        );
        spectra
            .par_iter()
            .map(|spectrum| self.compute(spectrum, bandpass, system))
            .collect()
    }

    /// Zero point of `bandpass` in a magnitude system.
    ///
    /// Jansky is a linear flux scale and has no zero point.
    pub fn zero_point(
        &self,
        bandpass: &Bandpass,
        system: MagnitudeSystem,
    ) -> Result<ZeroPoint, PhotometryError> {
        let pivot = bandpass.pivot_wavelength();
        let flux = match system {
            MagnitudeSystem::Vega => bandpass.vega_flux()?,
            MagnitudeSystem::Ab => AB_REFERENCE * SPEED_OF_LIGHT / pivot.powi(2),
            MagnitudeSystem::St => ST_REFERENCE,
            MagnitudeSystem::Jansky => {
                return Err(PhotometryError::UnsupportedSystem(format!(
                    "{system} has no zero point"
                )))
            }
        };

        Ok(ZeroPoint {
            system,
            magnitude: pogson(flux / FLAM)?,
            flux,
            flux_frequency: per_frequency(flux, pivot),
        })
    }
}
