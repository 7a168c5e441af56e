//! Photometry models and utilities

pub mod bandpass;
pub mod engine;
pub mod filters;
pub mod library;
pub mod lick;
pub mod spectrum;
pub mod trapezoid;
pub mod vega;

pub use bandpass::{Bandpass, BandpassError};
pub use engine::{
    synthetic_flux, MagnitudeResult, MagnitudeSystem, PhotometryEngine, PhotometryError, ZeroPoint,
};
pub use library::{
    BuiltinLickLibrary, FilterLibrary, FilterRecord, LibraryError, LickLibrary,
    MemoryFilterLibrary,
};
pub use lick::{
    reduce_to_lick_resolution, standard_definitions, LickError, LickIndexCalculator,
    LickIndexDefinition,
};
pub use spectrum::{convert_flux_density, photon_energy, Band, DetectorType, SampledSpectrum, SpectrumError};
pub use trapezoid::trap_integrate;
pub use vega::vega_reference;
