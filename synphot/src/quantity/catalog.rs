//! Named units and physical constants.
//!
//! Every entry is a [`Quantity`] holding the size of the unit in SI base
//! units, so `5000.0 * ANGSTROM` is a length of 5e-7 m and
//! `q.to(NANOMETRE)` reads it back in nanometres.

use std::f64::consts::PI;

use super::{Dimension, Quantity, UnitError};

const fn unit(value: f64, dimension: Dimension) -> Quantity {
    Quantity::from_base(value, dimension)
}

pub const ONE: Quantity = unit(1.0, Dimension::DIMENSIONLESS);

// Length
pub const METRE: Quantity = unit(1.0, Dimension::LENGTH);
pub const KILOMETRE: Quantity = unit(1e3, Dimension::LENGTH);
pub const CENTIMETRE: Quantity = unit(1e-2, Dimension::LENGTH);
pub const MILLIMETRE: Quantity = unit(1e-3, Dimension::LENGTH);
pub const MICROMETRE: Quantity = unit(1e-6, Dimension::LENGTH);
pub const NANOMETRE: Quantity = unit(1e-9, Dimension::LENGTH);
pub const ANGSTROM: Quantity = unit(1e-10, Dimension::LENGTH);
pub const ASTRONOMICAL_UNIT: Quantity = unit(149_597_870_700.0, Dimension::LENGTH);
pub const PARSEC: Quantity = unit(3.085_677_581_491_367e16, Dimension::LENGTH);

pub const SQUARE_METRE: Quantity = unit(1.0, Dimension::AREA);
pub const SQUARE_CENTIMETRE: Quantity = unit(1e-4, Dimension::AREA);

// Mass, time, temperature
pub const KILOGRAM: Quantity = unit(1.0, Dimension::MASS);
pub const GRAM: Quantity = unit(1e-3, Dimension::MASS);
pub const SECOND: Quantity = unit(1.0, Dimension::TIME);
pub const HERTZ: Quantity = unit(1.0, Dimension::FREQUENCY);
pub const KELVIN: Quantity = unit(1.0, Dimension::TEMPERATURE);
pub const MOLE: Quantity = unit(1.0, Dimension::AMOUNT);
pub const CANDELA: Quantity = unit(1.0, Dimension::LUMINOUS_INTENSITY);

// Angles
pub const RADIAN: Quantity = unit(1.0, Dimension::ANGLE);
pub const DEGREE: Quantity = unit(PI / 180.0, Dimension::ANGLE);
pub const ARCSECOND: Quantity = unit(PI / 180.0 / 3600.0, Dimension::ANGLE);
pub const STERADIAN: Quantity = unit(1.0, Dimension::SOLID_ANGLE);

// Energy and power
pub const JOULE: Quantity = unit(1.0, Dimension::ENERGY);
pub const ERG: Quantity = unit(1e-7, Dimension::ENERGY);
pub const ELECTRON_VOLT: Quantity = unit(1.602_176_634e-19, Dimension::ENERGY);
pub const WATT: Quantity = unit(1.0, Dimension::POWER);

/// erg s⁻¹ cm⁻² Å⁻¹
pub const FLAM: Quantity = unit(1e7, Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH);

/// erg s⁻¹ cm⁻² Hz⁻¹
pub const FNU: Quantity = unit(1e-3, Dimension::SPECTRAL_FLUX_DENSITY_FREQUENCY);

/// 1 Jy = 1e-23 erg s⁻¹ cm⁻² Hz⁻¹
pub const JANSKY: Quantity = unit(1e-26, Dimension::SPECTRAL_FLUX_DENSITY_FREQUENCY);

/// photon s⁻¹ cm⁻² Å⁻¹
pub const PHOTLAM: Quantity = unit(1e14, Dimension::PHOTON_FLUX_DENSITY_WAVELENGTH);

/// photon s⁻¹ cm⁻² Hz⁻¹
pub const PHOTNU: Quantity = unit(1e4, Dimension::PHOTON_FLUX_DENSITY_FREQUENCY);

// Physical constants (CODATA 2018, exact where defined)
pub const SPEED_OF_LIGHT: Quantity = unit(299_792_458.0, Dimension::SPEED);
pub const PLANCK_CONSTANT: Quantity = unit(6.626_070_15e-34, Dimension::ACTION);
pub const BOLTZMANN_CONSTANT: Quantity =
    unit(1.380_649e-23, Dimension::from_integers(2, 1, -2, -1, 0, 0, 0));

/// AB magnitude reference flux density in Jansky
pub const AB_REFERENCE_JY: f64 = 3631.0;

/// ST magnitude reference flux density in flam
pub const ST_REFERENCE_FLAM: f64 = 3.63e-9;

/// AB zero-point flux density (3631 Jy)
pub const AB_REFERENCE: Quantity = unit(
    AB_REFERENCE_JY * 1e-26,
    Dimension::SPECTRAL_FLUX_DENSITY_FREQUENCY,
);

/// ST zero-point flux density (3.63e-9 flam)
pub const ST_REFERENCE: Quantity = unit(
    ST_REFERENCE_FLAM * 1e7,
    Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH,
);

/// Look up a length unit by any of its usual spellings.
pub fn parse_length_unit(name: &str) -> Result<Quantity, UnitError> {
    match name.trim() {
        "Angstrom" | "angstrom" | "AA" | "A" | "Å" => Ok(ANGSTROM),
        "nanometer" | "nanometre" | "Nanometer" | "nm" => Ok(NANOMETRE),
        "micrometer" | "micrometre" | "micron" | "um" | "µm" => Ok(MICROMETRE),
        "millimeter" | "millimetre" | "mm" => Ok(MILLIMETRE),
        "centimeter" | "centimetre" | "cm" => Ok(CENTIMETRE),
        "meter" | "metre" | "m" => Ok(METRE),
        "kilometer" | "kilometre" | "km" => Ok(KILOMETRE),
        "au" | "AU" => Ok(ASTRONOMICAL_UNIT),
        "parsec" | "pc" => Ok(PARSEC),
        other => Err(UnitError::UnknownUnit(other.to_string())),
    }
}

/// Look up a spectral flux density unit (flam, fnu, Jansky, photlam, photnu).
pub fn parse_flux_unit(name: &str) -> Result<Quantity, UnitError> {
    let compact: String = name.split_whitespace().collect();
    match compact.as_str() {
        "flam" | "FLAM" | "erg/s/cm2/AA" | "erg/s/cm2/angstrom" | "erg/second/centimetre2/angstrom"
        | "erg/s/cm^2/AA" => Ok(FLAM),
        "fnu" | "FNU" | "erg/s/cm2/Hz" | "erg/second/centimetre2/hertz" | "erg/s/cm^2/Hz" => {
            Ok(FNU)
        }
        "Jy" | "jansky" | "Jansky" => Ok(JANSKY),
        "photlam" | "PHOTLAM" => Ok(PHOTLAM),
        "photnu" | "PHOTNU" => Ok(PHOTNU),
        _ => Err(UnitError::UnknownUnit(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flux_units_agree_with_cgs_definitions() {
        let erg_per_s_cm2 = ERG / SECOND / SQUARE_CENTIMETRE;

        let flam = erg_per_s_cm2 / ANGSTROM;
        assert_relative_eq!(flam.to(FLAM).unwrap(), 1.0, max_relative = 1e-12);

        let fnu = erg_per_s_cm2 / HERTZ;
        assert_relative_eq!(fnu.to(FNU).unwrap(), 1.0, max_relative = 1e-12);
        assert_relative_eq!(JANSKY.to(FNU).unwrap(), 1e-23, max_relative = 1e-12);

        let photlam = 1.0 / SECOND / SQUARE_CENTIMETRE / ANGSTROM;
        assert_relative_eq!(photlam.to(PHOTLAM).unwrap(), 1.0, max_relative = 1e-12);

        let photnu = 1.0 / SECOND / SQUARE_CENTIMETRE / HERTZ;
        assert_relative_eq!(photnu.to(PHOTNU).unwrap(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_point_constants() {
        assert_relative_eq!(AB_REFERENCE.to(JANSKY).unwrap(), 3631.0, max_relative = 1e-12);
        assert_relative_eq!(ST_REFERENCE.to(FLAM).unwrap(), 3.63e-9, max_relative = 1e-12);
    }

    #[test]
    fn test_derived_units() {
        assert_relative_eq!(DEGREE.to(ARCSECOND).unwrap(), 3600.0, max_relative = 1e-12);
        assert_relative_eq!(WATT.to(ERG / SECOND).unwrap(), 1e7, max_relative = 1e-12);
        assert_relative_eq!(
            ELECTRON_VOLT.to(ERG).unwrap(),
            1.602_176_634e-12,
            max_relative = 1e-12
        );
        assert_relative_eq!(PARSEC.to(ASTRONOMICAL_UNIT).unwrap(), 206_264.806, epsilon = 1e-3);
        assert_relative_eq!(KILOGRAM.to(GRAM).unwrap(), 1000.0, max_relative = 1e-12);

        // Energy of a 5000 Å photon is about 2.48 eV
        let energy = PLANCK_CONSTANT * SPEED_OF_LIGHT / (5000.0 * ANGSTROM);
        assert_relative_eq!(energy.to(ELECTRON_VOLT).unwrap(), 2.4797, epsilon = 1e-3);
    }

    #[test]
    fn test_parse_length_units() {
        assert_eq!(parse_length_unit("AA").unwrap(), ANGSTROM);
        assert_eq!(parse_length_unit("Angstrom").unwrap(), ANGSTROM);
        assert_eq!(parse_length_unit("nm").unwrap(), NANOMETRE);
        assert_eq!(parse_length_unit(" micron ").unwrap(), MICROMETRE);
        assert_eq!(parse_length_unit("pc").unwrap(), PARSEC);
        assert_eq!(
            parse_length_unit("furlong").unwrap_err(),
            UnitError::UnknownUnit("furlong".to_string())
        );
    }

    #[test]
    fn test_parse_flux_units() {
        assert_eq!(parse_flux_unit("flam").unwrap(), FLAM);
        assert_eq!(parse_flux_unit("erg/s/cm2/AA").unwrap(), FLAM);
        assert_eq!(
            parse_flux_unit("erg / second / centimetre2 / angstrom").unwrap(),
            FLAM
        );
        assert_eq!(parse_flux_unit("Jy").unwrap(), JANSKY);
        assert_eq!(parse_flux_unit("photlam").unwrap(), PHOTLAM);
        assert!(parse_flux_unit("mag").is_err());
    }
}
