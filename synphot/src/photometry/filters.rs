//! Built-in Johnson UBV bandpasses.
//!
//! Broadband U (~365 nm), B (~445 nm) and V (~551 nm) transmission curves,
//! sampled every 10 nm. They back [`MemoryFilterLibrary::johnson`] and give
//! the tests and the command-line tool a realistic set of filters without
//! touching the filesystem.
//!
//! The curves describe photon-counting systems.
//!
//! ```rust
//! use synphot::photometry::filters::johnson_v;
//! use synphot::quantity::catalog::NANOMETRE;
//!
//! let v = johnson_v().unwrap();
//! assert_eq!(v.at(540.0 * NANOMETRE).unwrap(), 1.0);
//! ```
//!
//! [`MemoryFilterLibrary::johnson`]: super::library::MemoryFilterLibrary::johnson

use super::bandpass::Bandpass;
use super::library::{FilterRecord, LibraryError};

/// Johnson U: (wavelength_nm, transmission)
const U_FILTER_DATA: [(f64, f64); 21] = [
    (250.0, 0.0),
    (260.0, 0.0),
    (270.0, 0.0),
    (280.0, 0.0),
    (290.0, 0.05),
    (300.0, 0.2),
    (310.0, 0.4),
    (320.0, 0.6),
    (330.0, 0.8),
    (340.0, 0.95),
    (350.0, 1.0),
    (360.0, 0.95),
    (370.0, 0.8),
    (380.0, 0.6),
    (390.0, 0.4),
    (400.0, 0.2),
    (410.0, 0.1),
    (420.0, 0.05),
    (430.0, 0.0),
    (440.0, 0.0),
    (450.0, 0.0),
];

/// Johnson B: (wavelength_nm, transmission)
const B_FILTER_DATA: [(f64, f64); 23] = [
    (350.0, 0.0),
    (360.0, 0.05),
    (370.0, 0.1),
    (380.0, 0.2),
    (390.0, 0.35),
    (400.0, 0.55),
    (410.0, 0.7),
    (420.0, 0.85),
    (430.0, 0.95),
    (440.0, 1.0),
    (450.0, 1.0),
    (460.0, 0.95),
    (470.0, 0.85),
    (480.0, 0.7),
    (490.0, 0.55),
    (500.0, 0.4),
    (510.0, 0.3),
    (520.0, 0.2),
    (530.0, 0.1),
    (540.0, 0.05),
    (550.0, 0.0),
    (560.0, 0.0),
    (570.0, 0.0),
];

/// Johnson V: (wavelength_nm, transmission)
const V_FILTER_DATA: [(f64, f64); 27] = [
    (450.0, 0.0),
    (460.0, 0.0),
    (470.0, 0.05),
    (480.0, 0.15),
    (490.0, 0.3),
    (500.0, 0.5),
    (510.0, 0.7),
    (520.0, 0.85),
    (530.0, 0.95),
    (540.0, 1.0),
    (550.0, 1.0),
    (560.0, 0.95),
    (570.0, 0.85),
    (580.0, 0.7),
    (590.0, 0.6),
    (600.0, 0.45),
    (610.0, 0.35),
    (620.0, 0.25),
    (630.0, 0.15),
    (640.0, 0.1),
    (650.0, 0.05),
    (660.0, 0.03),
    (670.0, 0.01),
    (680.0, 0.0),
    (690.0, 0.0),
    (700.0, 0.0),
    (710.0, 0.0),
];

fn record(name: &str, data: &[(f64, f64)]) -> FilterRecord {
    FilterRecord {
        name: name.to_string(),
        wavelengths: data.iter().map(|(w, _)| *w).collect(),
        transmission: data.iter().map(|(_, t)| *t).collect(),
        wavelength_unit: "nm".to_string(),
        detector_type: "photon".to_string(),
    }
}

/// Raw records for U, B and V, in that order
pub fn johnson_records() -> Vec<FilterRecord> {
    vec![
        record("U", &U_FILTER_DATA),
        record("B", &B_FILTER_DATA),
        record("V", &V_FILTER_DATA),
    ]
}

/// Johnson U (ultraviolet, ~365 nm), 290-420 nm response
pub fn johnson_u() -> Result<Bandpass, LibraryError> {
    record("U", &U_FILTER_DATA).to_bandpass()
}

/// Johnson B (blue, ~445 nm), 360-540 nm response
pub fn johnson_b() -> Result<Bandpass, LibraryError> {
    record("B", &B_FILTER_DATA).to_bandpass()
}

/// Johnson V (visual, ~551 nm), 470-670 nm response
pub fn johnson_v() -> Result<Bandpass, LibraryError> {
    record("V", &V_FILTER_DATA).to_bandpass()
}
