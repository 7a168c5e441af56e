//! Runtime dimension-tagged physical quantities.
//!
//! Every scalar that flows through the photometry code is a [`Quantity`]:
//! an `f64` expressed in SI base units together with the [`Dimension`] it
//! carries. Units are themselves quantities (one angstrom is the quantity
//! `1e-10 m`), so building a value is a multiplication and converting it is
//! a single division by the target unit.
//!
//! ```rust
//! use synphot::quantity::catalog::{ANGSTROM, NANOMETRE};
//!
//! let wavelength = 5500.0 * ANGSTROM;
//! assert!((wavelength.to(NANOMETRE).unwrap() - 550.0).abs() < 1e-9);
//! ```

pub mod catalog;
pub mod dimension;

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul, Neg};

use num_rational::Rational32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use dimension::{BaseDimension, Dimension};

/// Errors raised by dimension-checked arithmetic and unit lookup
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitError {
    #[error("Dimension mismatch: expected [{expected}], found [{found}]")]
    DimensionMismatch {
        expected: Dimension,
        found: Dimension,
    },

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

impl UnitError {
    fn mismatch(expected: Dimension, found: Dimension) -> Self {
        UnitError::DimensionMismatch { expected, found }
    }
}

/// A scalar value in SI base units tagged with its physical dimension.
///
/// Equality and ordering are only meaningful within one dimension: two
/// quantities of different dimension are never equal and `partial_cmp`
/// returns `None` for them. Use [`Quantity::try_cmp`] when a mismatch should
/// be reported as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    value: f64,
    dimension: Dimension,
}

impl Quantity {
    /// Build a quantity directly from an SI base-unit value
    pub const fn from_base(value: f64, dimension: Dimension) -> Self {
        Self { value, dimension }
    }

    /// Pure number
    pub const fn dimensionless(value: f64) -> Self {
        Self::from_base(value, Dimension::DIMENSIONLESS)
    }

    /// `value` expressed in `unit`, i.e. `value × unit`
    pub fn new(value: f64, unit: Quantity) -> Self {
        Self {
            value: value * unit.value,
            dimension: unit.dimension,
        }
    }

    /// Magnitude in SI base units
    pub fn base_value(&self) -> f64 {
        self.value
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    /// Numeric value of this quantity expressed in `unit`.
    ///
    /// Fails with [`UnitError::DimensionMismatch`] when the unit carries a
    /// different dimension.
    pub fn to(&self, unit: Quantity) -> Result<f64, UnitError> {
        self.require(unit.dimension)?;
        Ok(self.value / unit.value)
    }

    /// Value of a dimensionless quantity (a ratio of like quantities)
    pub fn dimensionless_value(&self) -> Result<f64, UnitError> {
        self.require(Dimension::DIMENSIONLESS)?;
        Ok(self.value)
    }

    /// Check this quantity has the given dimension
    pub fn require(&self, dimension: Dimension) -> Result<(), UnitError> {
        if self.dimension == dimension {
            Ok(())
        } else {
            Err(UnitError::mismatch(dimension, self.dimension))
        }
    }

    pub fn try_add(self, other: Quantity) -> Result<Quantity, UnitError> {
        other.require(self.dimension)?;
        Ok(Self::from_base(self.value + other.value, self.dimension))
    }

    pub fn try_sub(self, other: Quantity) -> Result<Quantity, UnitError> {
        other.require(self.dimension)?;
        Ok(Self::from_base(self.value - other.value, self.dimension))
    }

    /// Ordering that reports a dimension mismatch instead of hiding it
    pub fn try_cmp(&self, other: &Quantity) -> Result<Option<Ordering>, UnitError> {
        other.require(self.dimension)?;
        Ok(self.value.partial_cmp(&other.value))
    }

    pub fn abs(self) -> Quantity {
        Self::from_base(self.value.abs(), self.dimension)
    }

    pub fn recip(self) -> Quantity {
        Self::from_base(self.value.recip(), self.dimension.recip())
    }

    pub fn powi(self, n: i32) -> Quantity {
        Self::from_base(
            self.value.powi(n),
            self.dimension.pow(Rational32::from_integer(n)),
        )
    }

    /// Square root; exponents are halved exactly
    pub fn sqrt(self) -> Quantity {
        Self::from_base(self.value.sqrt(), self.dimension.pow(Rational32::new(1, 2)))
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.dimension != other.dimension {
            return None;
        }
        self.value.partial_cmp(&other.value)
    }
}

impl Mul for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        Quantity::from_base(self.value * rhs.value, self.dimension.mul(&rhs.dimension))
    }
}

impl Div for Quantity {
    type Output = Quantity;

    fn div(self, rhs: Quantity) -> Quantity {
        Quantity::from_base(self.value / rhs.value, self.dimension.div(&rhs.dimension))
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        Quantity::from_base(self.value * rhs, self.dimension)
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        Quantity::from_base(self.value / rhs, self.dimension)
    }
}

impl Mul<Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        Quantity::new(self, rhs)
    }
}

impl Div<Quantity> for f64 {
    type Output = Quantity;

    fn div(self, rhs: Quantity) -> Quantity {
        Quantity::from_base(self / rhs.value, rhs.dimension.recip())
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::from_base(-self.value, self.dimension)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.dimension)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::catalog::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_trip_same_dimension() {
        let lengths = [ANGSTROM, NANOMETRE, MICROMETRE, CENTIMETRE, METRE, PARSEC];
        for u1 in lengths {
            for u2 in lengths {
                let x = 1234.5;
                let there = Quantity::new(x, u1).to(u2).unwrap();
                let back = Quantity::new(there, u2).to(u1).unwrap();
                assert_relative_eq!(back, x, max_relative = 1e-9);
            }
        }

        let flux = 2.5 * FNU;
        let jy = flux.to(JANSKY).unwrap();
        assert_relative_eq!(jy, 2.5e23, max_relative = 1e-12);
    }

    #[test]
    fn test_cross_dimension_conversion_fails() {
        let wavelength = 5000.0 * ANGSTROM;
        let err = wavelength.to(SECOND).unwrap_err();
        assert_eq!(
            err,
            UnitError::DimensionMismatch {
                expected: Dimension::TIME,
                found: Dimension::LENGTH,
            }
        );

        assert!(FLAM.to(JANSKY).is_err());
    }

    #[test]
    fn test_addition_requires_same_dimension() {
        let a = 1.0 * METRE;
        let b = 50.0 * CENTIMETRE;
        assert_relative_eq!(a.try_add(b).unwrap().to(METRE).unwrap(), 1.5);
        assert_relative_eq!(a.try_sub(b).unwrap().to(CENTIMETRE).unwrap(), 50.0);
        assert!(a.try_add(1.0 * SECOND).is_err());
        assert!(a.try_sub(1.0 * KILOGRAM).is_err());
    }

    #[test]
    fn test_comparison_within_dimension_only() {
        let a = 1.0 * METRE;
        let b = 2.0 * CENTIMETRE;
        assert!(a > b);
        assert_eq!(a.partial_cmp(&(1.0 * SECOND)), None);
        assert_ne!(1.0 * METRE, 1.0 * SECOND);
        assert_eq!(a.try_cmp(&b).unwrap(), Some(Ordering::Greater));
        assert!(a.try_cmp(&(1.0 * SECOND)).is_err());
    }

    #[test]
    fn test_products_combine_dimensions() {
        // f_nu = f_lambda * lambda^2 / c
        let f_lambda = 1.0 * FLAM;
        let lambda = 5000.0 * ANGSTROM;
        let f_nu = f_lambda * lambda.powi(2) / SPEED_OF_LIGHT;
        assert_eq!(f_nu.dimension(), Dimension::SPECTRAL_FLUX_DENSITY_FREQUENCY);
        // 1 flam at 5000 Å is ~8.34e-12 erg/s/cm²/Hz
        assert_relative_eq!(f_nu.to(FNU).unwrap(), 8.339e-12, max_relative = 1e-3);

        let area = (3.0 * METRE) * (3.0 * METRE);
        assert_eq!(area.sqrt(), 3.0 * METRE);
        assert_eq!((2.0 * SECOND).recip(), 0.5 * HERTZ);
        assert_eq!(1.0 / (2.0 * SECOND), 0.5 * HERTZ);
        assert_eq!(-(1.0 * METRE), -1.0 * METRE);
    }

    #[test]
    fn test_dimensionless_value() {
        let ratio = (10.0 * ANGSTROM) / (1.0 * NANOMETRE);
        assert_relative_eq!(ratio.dimensionless_value().unwrap(), 1.0);
        assert!((1.0 * METRE).dimensionless_value().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!((2.0 * METRE).to_string(), "2 m");
        assert_eq!(Quantity::dimensionless(0.5).to_string(), "0.5");
    }
}
