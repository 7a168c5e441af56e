//! Lick/IDS absorption-line indices.
//!
//! An index compares the flux in a line band against a pseudo-continuum
//! drawn through two flanking bands:
//!
//! 1. The mean flux of the blue and red continuum bands is the trapezoid
//!    integral over the band (edges plus interior samples) divided by its
//!    width.
//! 2. The continuum C(λ) is the straight line through
//!    (blue midpoint, blue mean) and (red midpoint, red mean).
//! 3. Equivalent-width indices return ∫ (1 − f/C) dλ over the line band, in
//!    the definition's wavelength unit; magnitude indices return
//!    −2.5 log10((1/Δλ) ∫ f/C dλ).
//!
//! [`reduce_to_lick_resolution`] broadens a spectrum to the wavelength
//! dependent resolution of the Lick/IDS spectrograph before
//! measuring.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::spectrum::{Band, SampledSpectrum, SpectrumError};
use super::trapezoid::{merged_grid, trap_integrate};
use crate::quantity::catalog::ANGSTROM;
use crate::quantity::{Dimension, Quantity, UnitError};

/// Errors that can occur while measuring an index
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LickError {
    #[error("Spectrum ({available_aa:?} Å) does not cover index {index} ({required_aa:?} Å)")]
    InsufficientCoverage {
        index: String,
        required_aa: (f64, f64),
        available_aa: (f64, f64),
    },

    #[error("Index {index}: {band} band has non-positive width")]
    DegenerateBand { index: String, band: &'static str },

    #[error("Index {index}: continuum is not positive at {wavelength_aa:.2} Å")]
    DegenerateContinuum { index: String, wavelength_aa: f64 },

    #[error("Index {index}: line-to-continuum ratio is not positive")]
    NonPositiveFlux { index: String },

    #[error("Invalid resolution parameter: {0}")]
    InvalidResolution(String),

    #[error(transparent)]
    Spectrum(#[from] SpectrumError),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Definition of one absorption-line index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LickIndexDefinition {
    pub name: String,
    pub line_band: Band,
    pub blue_continuum: Band,
    pub red_continuum: Band,
    /// Unit equivalent widths are reported in
    pub wavelength_unit: Quantity,
    /// Magnitude index rather than equivalent width
    pub is_magnitude: bool,
    pub description: String,
}

impl LickIndexDefinition {
    /// Build a definition from (min, max) pairs given in `unit`
    pub fn from_bounds(
        name: impl Into<String>,
        line: (f64, f64),
        blue: (f64, f64),
        red: (f64, f64),
        unit: Quantity,
        is_magnitude: bool,
    ) -> Result<Self, UnitError> {
        unit.require(Dimension::LENGTH)?;
        let kind = if is_magnitude {
            "magnitude"
        } else {
            "equivalent width"
        };
        let description = format!(
            "{kind} index, line {:.3}-{:.3}, continua {:.3}-{:.3} / {:.3}-{:.3}",
            line.0, line.1, blue.0, blue.1, red.0, red.1
        );
        Ok(Self {
            name: name.into(),
            line_band: Band::from_bounds(line.0, line.1, unit)?,
            blue_continuum: Band::from_bounds(blue.0, blue.1, unit)?,
            red_continuum: Band::from_bounds(red.0, red.1, unit)?,
            wavelength_unit: unit,
            is_magnitude,
            description,
        })
    }

    /// Smallest band enclosing the line and both continua
    pub fn extent(&self) -> Band {
        let bands = [&self.blue_continuum, &self.line_band, &self.red_continuum];
        let lower = bands
            .iter()
            .map(|b| b.lower.base_value())
            .fold(f64::INFINITY, f64::min);
        let upper = bands
            .iter()
            .map(|b| b.upper.base_value())
            .fold(f64::NEG_INFINITY, f64::max);
        Band {
            lower: Quantity::from_base(lower, Dimension::LENGTH),
            upper: Quantity::from_base(upper, Dimension::LENGTH),
        }
    }
}

/// Relative slack when comparing band edges with the sampled range, so a
/// spectrum in nm that ends exactly on an edge given in Å still covers it
const EDGE_TOLERANCE: f64 = 1e-12;

/// Measures Lick indices on sampled spectra.
#[derive(Debug, Clone, Copy, Default)]
pub struct LickIndexCalculator;

impl LickIndexCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Index strength of `spectrum` for `definition`.
    ///
    /// Equivalent widths come back in the definition's wavelength unit,
    /// magnitude indices in magnitudes.
    pub fn compute(
        &self,
        spectrum: &SampledSpectrum,
        definition: &LickIndexDefinition,
    ) -> Result<f64, LickError> {
        let index = definition.name.as_str();
        let blue = checked_bounds(index, &definition.blue_continuum, "blue continuum")?;
        let red = checked_bounds(index, &definition.red_continuum, "red continuum")?;
        let line = checked_bounds(index, &definition.line_band, "line")?;

        let (required_lower, required_upper) = definition.extent().bounds_m();
        let (support_lower, support_upper) = spectrum.support_m();
        if required_lower < support_lower * (1.0 - EDGE_TOLERANCE)
            || required_upper > support_upper * (1.0 + EDGE_TOLERANCE)
        {
            let aa = ANGSTROM.base_value();
            return Err(LickError::InsufficientCoverage {
                index: index.to_string(),
                required_aa: (required_lower / aa, required_upper / aa),
                available_aa: (support_lower / aa, support_upper / aa),
            });
        }

        // Edges within rounding of the support read the edge sample
        let flux_at = |wavelength: f64| {
            spectrum.flux_at_m(wavelength.clamp(support_lower, support_upper))
        };

        let blue_mean = band_mean(spectrum, &flux_at, blue);
        let red_mean = band_mean(spectrum, &flux_at, red);
        let blue_mid = (blue.0 + blue.1) / 2.0;
        let red_mid = (red.0 + red.1) / 2.0;
        let continuum = |wavelength: f64| {
            if red_mid == blue_mid {
                (blue_mean + red_mean) / 2.0
            } else {
                blue_mean + (red_mean - blue_mean) * (wavelength - blue_mid) / (red_mid - blue_mid)
            }
        };

        let grid = merged_grid(spectrum.wavelengths_m(), &[], line.0, line.1);
        let mut ratio = Vec::with_capacity(grid.len());
        for &wavelength in &grid {
            let c = continuum(wavelength);
            if !(c > 0.0) || !c.is_finite() {
                return Err(LickError::DegenerateContinuum {
                    index: index.to_string(),
                    wavelength_aa: wavelength / ANGSTROM.base_value(),
                });
            }
            ratio.push(flux_at(wavelength) / c);
        }

        if definition.is_magnitude {
            let mean = trap_integrate(&grid, &ratio) / (line.1 - line.0);
            if !(mean > 0.0) {
                return Err(LickError::NonPositiveFlux {
                    index: index.to_string(),
                });
            }
            Ok(-2.5 * mean.log10())
        } else {
            let depth: Vec<f64> = ratio.iter().map(|r| 1.0 - r).collect();
            let width = Quantity::from_base(trap_integrate(&grid, &depth), Dimension::LENGTH);
            Ok(width.to(definition.wavelength_unit)?)
        }
    }
}

fn checked_bounds(index: &str, band: &Band, label: &'static str) -> Result<(f64, f64), LickError> {
    let (lower, upper) = band.bounds_m();
    if !(upper > lower) {
        return Err(LickError::DegenerateBand {
            index: index.to_string(),
            band: label,
        });
    }
    Ok((lower, upper))
}

fn band_mean<F>(spectrum: &SampledSpectrum, flux_at: &F, (lower, upper): (f64, f64)) -> f64
where
    F: Fn(f64) -> f64,
{
    let grid = merged_grid(spectrum.wavelengths_m(), &[], lower, upper);
    let flux: Vec<f64> = grid.iter().map(|&w| flux_at(w)).collect();
    trap_integrate(&grid, &flux) / (upper - lower)
}

/// Lick/IDS instrumental resolution: (wavelength Å, FWHM Å)
const LICK_RESOLUTION: [(f64, f64); 5] = [
    (4000.0, 11.5),
    (4400.0, 9.2),
    (4900.0, 8.4),
    (5400.0, 8.4),
    (6000.0, 9.8),
];

/// Finest kernel step, as a fraction of σ
const MIN_STEP_PER_SIGMA: f64 = 1e-3;

/// FWHM = 2 √(2 ln 2) σ
const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949;

/// Lick/IDS FWHM in Å at a wavelength in Å, held constant beyond the table ends
pub fn lick_resolution_fwhm(wavelength_aa: f64) -> f64 {
    let (first_w, first_fwhm) = LICK_RESOLUTION[0];
    let (last_w, last_fwhm) = LICK_RESOLUTION[LICK_RESOLUTION.len() - 1];
    if wavelength_aa <= first_w {
        return first_fwhm;
    }
    if wavelength_aa >= last_w {
        return last_fwhm;
    }
    LICK_RESOLUTION
        .windows(2)
        .find(|pair| wavelength_aa <= pair[1].0)
        .map(|pair| {
            let (w0, f0) = pair[0];
            let (w1, f1) = pair[1];
            f0 + (f1 - f0) * (wavelength_aa - w0) / (w1 - w0)
        })
        .unwrap_or(last_fwhm)
}

/// Broaden `spectrum` to the Lick/IDS resolution.
///
/// # Arguments
/// * `spectrum` - Input spectrum
/// * `fwhm0` - Instrumental FWHM the spectrum already has
/// * `sigma_floor` - Largest kernel sampling step
///
/// Each sample is convolved with a Gaussian of σ = √(FWHM_Lick² − FWHM0²) / 2.3548,
/// sampled every min(sigma_floor, σ/10) out to ±3σ, but never finer than
/// σ/1000. Where the spectrum is
/// already at or below Lick resolution the sample is kept as is. The
/// result shares the input wavelength grid.
pub fn reduce_to_lick_resolution(
    spectrum: &SampledSpectrum,
    fwhm0: Quantity,
    sigma_floor: Quantity,
) -> Result<SampledSpectrum, LickError> {
    let fwhm0_aa = fwhm0.to(ANGSTROM)?;
    let floor_aa = sigma_floor.to(ANGSTROM)?;
    if !(fwhm0_aa >= 0.0) {
        return Err(LickError::InvalidResolution(format!("fwhm0 = {fwhm0_aa} Å")));
    }
    if !(floor_aa > 0.0) {
        return Err(LickError::InvalidResolution(format!(
            "sigma floor = {floor_aa} Å"
        )));
    }

    let aa = ANGSTROM.base_value();
    log::debug!(
        "Reducing {} samples to Lick/IDS resolution (fwhm0 = {fwhm0_aa} Å, step <= {floor_aa} Å)",
        spectrum.len()
    );

    let flux: Vec<f64> = spectrum
        .wavelengths_m()
        .iter()
        .map(|&wavelength| {
            let center_aa = wavelength / aa;
            let target = lick_resolution_fwhm(center_aa);
            if target <= fwhm0_aa {
                return spectrum.flux_at_m(wavelength);
            }

            let sigma = (target * target - fwhm0_aa * fwhm0_aa).sqrt() / FWHM_PER_SIGMA;
            let step = floor_aa.min(0.1 * sigma).max(MIN_STEP_PER_SIGMA * sigma);
            let half_width = (3.0 * sigma / step).ceil() as i64;

            let mut weighted = 0.0;
            let mut total = 0.0;
            for k in -half_width..=half_width {
                let offset = k as f64 * step;
                let weight = (-0.5 * (offset / sigma).powi(2)).exp();
                weighted += weight * spectrum.flux_at_m((center_aa + offset) * aa);
                total += weight;
            }
            weighted / total
        })
        .collect();

    Ok(SampledSpectrum::from_si(
        spectrum.wavelengths_m().to_vec(),
        flux,
        spectrum.detector_type(),
    ))
}

/// Name, line, blue continuum, red continuum (all Å), magnitude flag
type LickRow = (&'static str, (f64, f64), (f64, f64), (f64, f64), bool);

#[rustfmt::skip]
const LICK_INDICES: [LickRow; 49] = [
    ("CN_1", (4142.125, 4177.125), (4080.125, 4117.625), (4244.125, 4284.125), true),
    ("CN_2", (4142.125, 4177.125), (4083.875, 4096.375), (4244.125, 4284.125), true),
    ("Ca4227", (4222.250, 4234.750), (4211.000, 4219.750), (4241.000, 4251.000), false),
    ("G4300", (4281.375, 4316.375), (4266.375, 4282.625), (4318.875, 4335.125), false),
    ("Fe4383", (4369.125, 4420.375), (4359.125, 4370.375), (4442.875, 4455.375), false),
    ("Ca4455", (4452.125, 4474.625), (4445.875, 4454.625), (4477.125, 4492.125), false),
    ("Fe4531", (4514.250, 4559.250), (4504.250, 4514.250), (4560.500, 4579.250), false),
    ("Fe4668", (4634.000, 4720.250), (4611.500, 4630.250), (4742.750, 4756.500), false),
    ("H_beta", (4847.875, 4876.625), (4827.875, 4847.875), (4876.625, 4891.625), false),
    ("Fe5015", (4977.750, 5054.000), (4946.500, 4977.750), (5054.000, 5065.250), false),
    ("Mg_1", (5069.125, 5134.125), (4895.125, 4957.625), (5301.125, 5366.125), true),
    ("Mg_2", (5154.125, 5196.625), (4895.125, 4957.625), (5301.125, 5366.125), true),
    ("Mg_b", (5160.125, 5192.625), (5142.625, 5161.375), (5191.375, 5206.375), false),
    ("Fe5270", (5245.650, 5285.650), (5233.150, 5248.150), (5285.650, 5318.150), false),
    ("Fe5335", (5312.125, 5352.125), (5304.625, 5315.875), (5353.375, 5363.375), false),
    ("Fe5406", (5387.500, 5415.000), (5376.250, 5387.500), (5415.000, 5425.000), false),
    ("Fe5709", (5696.625, 5720.375), (5672.875, 5696.625), (5722.875, 5736.625), false),
    ("Fe5782", (5776.625, 5796.625), (5765.375, 5775.375), (5797.875, 5811.625), false),
    ("Na_D", (5876.875, 5909.375), (5860.625, 5875.625), (5922.125, 5948.125), false),
    ("TiO_1", (5936.625, 5994.125), (5816.625, 5849.125), (6038.625, 6103.625), true),
    ("TiO_2", (6189.625, 6272.125), (6066.625, 6141.625), (6372.625, 6415.125), true),
    ("Hdelta_A", (4083.500, 4122.250), (4041.600, 4079.750), (4128.500, 4161.000), false),
    ("Hgamma_A", (4319.750, 4363.500), (4283.500, 4319.750), (4367.250, 4419.750), false),
    ("Hdelta_F", (4091.000, 4112.250), (4057.250, 4088.500), (4114.750, 4137.250), false),
    ("Hgamma_F", (4331.250, 4352.250), (4283.500, 4319.750), (4354.750, 4384.750), false),
    ("OIIEW", (3716.3, 3738.3), (3696.3, 3716.3), (3738.3, 3758.3), false),
    ("bTiO", (4758.500, 4800.000), (4742.750, 4756.500), (4827.875, 4847.875), false),
    ("HdeltaEW", (4083.5, 4122.250), (4017.0, 4057.0), (4153.0, 4193.0), false),
    ("NaI", (8163.500, 8229.125), (8140.000, 8163.500), (8230.250, 8250.000), false),
    ("HgammaEW", (4319.750, 4363.5), (4242.0, 4282.0), (4404.0, 4444.0), false),
    ("CaH_1", (6357.500, 6401.750), (6342.125, 6356.500), (6408.500, 6429.750), true),
    ("HbetaEW", (4847.875, 4876.625), (4799.0, 4839.0), (4886.0, 4926.0), false),
    ("CaH_2", (6775.000, 6900.000), (6510.000, 6539.250), (7017.000, 7064.000), true),
    ("TiO_3", (7123.750, 7162.500), (7017.000, 7064.000), (7234.000, 7269.000), true),
    ("TiO_4", (7643.250, 7717.250), (7527.000, 7577.750), (7735.500, 7782.750), true),
    ("TiOCaH", (6600.000, 6817.000), (6520.000, 6545.000), (7035.000, 7050.000), false),
    ("TiO3", (6600.000, 6723.000), (6520.000, 6545.000), (7035.000, 7050.000), false),
    ("CaH", (6775.000, 6817.000), (6520.000, 6545.000), (7035.000, 7050.000), false),
    ("aTiO", (5445.000, 5600.000), (5420.000, 5442.000), (5630.000, 5655.000), true),
    ("NaI_V12", (8180.000, 8200.000), (8164.000, 8173.000), (8233.000, 8244.000), false),
    ("NaI_F13", (8180.000, 8200.000), (8137.000, 8147.000), (8233.000, 8244.000), false),
    ("CaHK_LB13", (3899.47, 4003.47), (3806.50, 3833.82), (4020.69, 4052.36), false),
    ("Mg4780", (4760.78, 4798.80), (4738.91, 4757.31), (4819.78, 4835.51), false),
    ("TiO2SDSS_LB13", (6189.625, 6272.125), (6066.625, 6141.625), (6442.0, 6455.0), true),
    ("NaI_LB13", (8180.000, 8200.000), (8143.000, 8153.000), (8233.000, 8244.000), false),
    ("Ca1_LB13", (8484.0, 8513.0), (8474.0, 8484.0), (8563.0, 8577.0), false),
    ("Ca2_LB13", (8522.0, 8562.0), (8474.0, 8484.0), (8563.0, 8577.0), false),
    ("Ca3_LB13", (8642.0, 8682.0), (8619.0, 8642.0), (8700.0, 8725.0), false),
    ("Hbeta0", (4839.275, 4877.097), (4821.175, 4838.404), (4897.445, 4915.845), false),
];

/// The built-in index table: the Lick/IDS set and later additions, in Å
pub fn standard_definitions() -> Result<Vec<LickIndexDefinition>, UnitError> {
    LICK_INDICES
        .iter()
        .map(|&(name, line, blue, red, is_magnitude)| {
            LickIndexDefinition::from_bounds(name, line, blue, red, ANGSTROM, is_magnitude)
        })
        .collect()
}
