//! Interop with compile-time typed `uom` quantities.
//!
//! The photometry code tags values with a runtime [`Dimension`] so that a
//! mismatch can surface as a `Result`. Callers who already hold `uom`
//! lengths or temperatures can move them across losslessly: both sides store
//! SI base units.

use uom::si::f64::ThermodynamicTemperature;
use uom::si::length::{angstrom, meter, micrometer, nanometer};
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

use crate::quantity::{Dimension, Quantity, UnitError};

/// Type alias for temperature with convenient methods
pub type Temperature = ThermodynamicTemperature;

/// Type alias for length measurements with convenient methods
pub type Length = uom::si::f64::Length;

/// Extension trait for temperature conversions
pub trait TemperatureExt {
    fn from_kelvin(kelvin: f64) -> Self;

    fn as_kelvin(&self) -> f64;

    fn from_celsius(celsius: f64) -> Self;

    fn as_celsius(&self) -> f64;
}

/// Extension trait for the length units common in spectroscopy
pub trait LengthExt {
    fn from_angstroms(aa: f64) -> Self;

    fn as_angstroms(&self) -> f64;

    fn from_nanometers(nm: f64) -> Self;

    fn as_nanometers(&self) -> f64;

    fn from_micrometers(um: f64) -> Self;

    fn as_micrometers(&self) -> f64;
}

impl TemperatureExt for Temperature {
    fn from_kelvin(k: f64) -> Self {
        Temperature::new::<kelvin>(k)
    }

    fn as_kelvin(&self) -> f64 {
        self.get::<kelvin>()
    }

    fn from_celsius(celsius: f64) -> Self {
        Temperature::new::<degree_celsius>(celsius)
    }

    fn as_celsius(&self) -> f64 {
        self.get::<degree_celsius>()
    }
}

impl LengthExt for Length {
    fn from_angstroms(aa: f64) -> Self {
        Length::new::<angstrom>(aa)
    }

    fn as_angstroms(&self) -> f64 {
        self.get::<angstrom>()
    }

    fn from_nanometers(nm: f64) -> Self {
        Length::new::<nanometer>(nm)
    }

    fn as_nanometers(&self) -> f64 {
        self.get::<nanometer>()
    }

    fn from_micrometers(um: f64) -> Self {
        Length::new::<micrometer>(um)
    }

    fn as_micrometers(&self) -> f64 {
        self.get::<micrometer>()
    }
}

impl From<Length> for Quantity {
    fn from(length: Length) -> Self {
        Quantity::from_base(length.get::<meter>(), Dimension::LENGTH)
    }
}

impl TryFrom<Quantity> for Length {
    type Error = UnitError;

    fn try_from(quantity: Quantity) -> Result<Self, Self::Error> {
        quantity.require(Dimension::LENGTH)?;
        Ok(Length::new::<meter>(quantity.base_value()))
    }
}

impl From<Temperature> for Quantity {
    fn from(temperature: Temperature) -> Self {
        Quantity::from_base(temperature.get::<kelvin>(), Dimension::TEMPERATURE)
    }
}

impl TryFrom<Quantity> for Temperature {
    type Error = UnitError;

    fn try_from(quantity: Quantity) -> Result<Self, Self::Error> {
        quantity.require(Dimension::TEMPERATURE)?;
        Ok(Temperature::new::<kelvin>(quantity.base_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::catalog::{ANGSTROM, KELVIN, NANOMETRE, SECOND};
    use approx::assert_relative_eq;

    #[test]
    fn test_length_conversions() {
        let wavelength = Length::from_angstroms(5500.0);
        assert_relative_eq!(wavelength.as_nanometers(), 550.0, epsilon = 1e-9);
        assert_relative_eq!(wavelength.as_micrometers(), 0.55, epsilon = 1e-12);

        let halpha = Length::from_nanometers(656.28);
        assert_relative_eq!(halpha.as_angstroms(), 6562.8, epsilon = 1e-9);
    }

    #[test]
    fn test_length_round_trip_through_quantity() {
        let wavelength = Length::from_nanometers(550.0);
        let quantity = Quantity::from(wavelength);
        assert_relative_eq!(quantity.to(ANGSTROM).unwrap(), 5500.0, max_relative = 1e-12);

        let back = Length::try_from(quantity).unwrap();
        assert_relative_eq!(back.as_nanometers(), 550.0, max_relative = 1e-12);

        let from_catalog = Length::try_from(4861.3 * ANGSTROM).unwrap();
        assert_relative_eq!(from_catalog.as_nanometers(), 486.13, max_relative = 1e-12);

        assert!(Length::try_from(1.0 * SECOND).is_err());
        assert!(Length::try_from(1.0 * NANOMETRE).is_ok());
    }

    #[test]
    fn test_temperature_round_trip_through_quantity() {
        let temperature = Temperature::from_celsius(0.0);
        assert_relative_eq!(temperature.as_kelvin(), 273.15, epsilon = 1e-9);

        let quantity = Quantity::from(Temperature::from_kelvin(9550.0));
        assert_relative_eq!(quantity.to(KELVIN).unwrap(), 9550.0, max_relative = 1e-12);

        let back = Temperature::try_from(quantity).unwrap();
        assert_relative_eq!(back.as_kelvin(), 9550.0, max_relative = 1e-12);
        assert!(Temperature::try_from(1.0 * ANGSTROM).is_err());
    }
}
