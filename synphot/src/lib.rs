//! Unit-aware synthetic photometry
//!
//! This crate provides dimensioned quantities with a catalog of astronomical
//! units, sampled spectra and bandpasses, synthetic magnitudes in the Vega,
//! AB, ST and Jansky systems, and Lick/IDS absorption-line indices.

pub mod photometry;
pub mod quantity;
pub mod units;

// Re-exports for easier access
pub use photometry::{
    Band, Bandpass, DetectorType, FilterLibrary, LickIndexCalculator, LickLibrary,
    MagnitudeSystem, PhotometryEngine, SampledSpectrum,
};
pub use quantity::{Dimension, Quantity, UnitError};
pub use units::{LengthExt, TemperatureExt};
