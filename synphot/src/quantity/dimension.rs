//! Dimension vectors over the seven base dimensions.
//!
//! A [`Dimension`] stores one rational exponent per base dimension so that
//! square roots (e.g. a pivot wavelength computed from λ²) stay exact.

use std::fmt;

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

/// Base dimensions, in the order they are stored inside a [`Dimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Temperature,
    Angle,
    LuminousIntensity,
    Amount,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; 7] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::Temperature,
        BaseDimension::Angle,
        BaseDimension::LuminousIntensity,
        BaseDimension::Amount,
    ];

    /// SI symbol of the base unit for this dimension
    pub fn symbol(&self) -> &'static str {
        match self {
            BaseDimension::Length => "m",
            BaseDimension::Mass => "kg",
            BaseDimension::Time => "s",
            BaseDimension::Temperature => "K",
            BaseDimension::Angle => "rad",
            BaseDimension::LuminousIntensity => "cd",
            BaseDimension::Amount => "mol",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

const fn r(n: i32) -> Rational32 {
    Rational32::new_raw(n, 1)
}

/// Exponent vector of a physical quantity.
///
/// Multiplying quantities adds their exponents, dividing subtracts them.
/// Two dimensions are compatible for addition, comparison and conversion
/// only when every exponent matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    exponents: [Rational32; 7],
}

impl Dimension {
    /// Build a dimension from integer exponents
    /// (length, mass, time, temperature, angle, luminous intensity, amount).
    pub const fn from_integers(
        length: i32,
        mass: i32,
        time: i32,
        temperature: i32,
        angle: i32,
        luminous_intensity: i32,
        amount: i32,
    ) -> Self {
        Self {
            exponents: [
                r(length),
                r(mass),
                r(time),
                r(temperature),
                r(angle),
                r(luminous_intensity),
                r(amount),
            ],
        }
    }

    pub const DIMENSIONLESS: Dimension = Dimension::from_integers(0, 0, 0, 0, 0, 0, 0);
    pub const LENGTH: Dimension = Dimension::from_integers(1, 0, 0, 0, 0, 0, 0);
    pub const MASS: Dimension = Dimension::from_integers(0, 1, 0, 0, 0, 0, 0);
    pub const TIME: Dimension = Dimension::from_integers(0, 0, 1, 0, 0, 0, 0);
    pub const TEMPERATURE: Dimension = Dimension::from_integers(0, 0, 0, 1, 0, 0, 0);
    pub const ANGLE: Dimension = Dimension::from_integers(0, 0, 0, 0, 1, 0, 0);
    pub const LUMINOUS_INTENSITY: Dimension = Dimension::from_integers(0, 0, 0, 0, 0, 1, 0);
    pub const AMOUNT: Dimension = Dimension::from_integers(0, 0, 0, 0, 0, 0, 1);

    pub const AREA: Dimension = Dimension::from_integers(2, 0, 0, 0, 0, 0, 0);
    pub const SOLID_ANGLE: Dimension = Dimension::from_integers(0, 0, 0, 0, 2, 0, 0);
    pub const FREQUENCY: Dimension = Dimension::from_integers(0, 0, -1, 0, 0, 0, 0);
    pub const SPEED: Dimension = Dimension::from_integers(1, 0, -1, 0, 0, 0, 0);
    pub const ENERGY: Dimension = Dimension::from_integers(2, 1, -2, 0, 0, 0, 0);
    pub const POWER: Dimension = Dimension::from_integers(2, 1, -3, 0, 0, 0, 0);
    pub const ACTION: Dimension = Dimension::from_integers(2, 1, -1, 0, 0, 0, 0);

    /// Power per area: erg s⁻¹ cm⁻²
    pub const IRRADIANCE: Dimension = Dimension::from_integers(0, 1, -3, 0, 0, 0, 0);

    /// Flux density per unit wavelength (flam): erg s⁻¹ cm⁻² Å⁻¹
    pub const SPECTRAL_FLUX_DENSITY_WAVELENGTH: Dimension =
        Dimension::from_integers(-1, 1, -3, 0, 0, 0, 0);

    /// Flux density per unit frequency (fnu, Jansky): erg s⁻¹ cm⁻² Hz⁻¹
    pub const SPECTRAL_FLUX_DENSITY_FREQUENCY: Dimension =
        Dimension::from_integers(0, 1, -2, 0, 0, 0, 0);

    /// Photon rate per area per unit wavelength (photlam)
    pub const PHOTON_FLUX_DENSITY_WAVELENGTH: Dimension =
        Dimension::from_integers(-3, 0, -1, 0, 0, 0, 0);

    /// Photon rate per area per unit frequency (photnu)
    pub const PHOTON_FLUX_DENSITY_FREQUENCY: Dimension =
        Dimension::from_integers(-2, 0, 0, 0, 0, 0, 0);

    /// Photon rate per area
    pub const PHOTON_IRRADIANCE: Dimension = Dimension::from_integers(-2, 0, -1, 0, 0, 0, 0);

    /// Exponent of a single base dimension
    pub fn exponent(&self, base: BaseDimension) -> Rational32 {
        self.exponents[base.index()]
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::DIMENSIONLESS
    }

    /// Dimension of a product
    pub fn mul(&self, other: &Dimension) -> Dimension {
        let mut exponents = self.exponents;
        for (e, o) in exponents.iter_mut().zip(other.exponents.iter()) {
            *e += *o;
        }
        Dimension { exponents }
    }

    /// Dimension of a quotient
    pub fn div(&self, other: &Dimension) -> Dimension {
        let mut exponents = self.exponents;
        for (e, o) in exponents.iter_mut().zip(other.exponents.iter()) {
            *e -= *o;
        }
        Dimension { exponents }
    }

    /// Dimension raised to a rational power
    pub fn pow(&self, power: Rational32) -> Dimension {
        let mut exponents = self.exponents;
        for e in exponents.iter_mut() {
            *e *= power;
        }
        Dimension { exponents }
    }

    pub fn recip(&self) -> Dimension {
        Self::DIMENSIONLESS.div(self)
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }

        let zero = Rational32::from_integer(0);
        let one = Rational32::from_integer(1);
        let mut first = true;
        for base in BaseDimension::ALL {
            let exp = self.exponent(base);
            if exp == zero {
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if exp == one {
                write!(f, "{}", base.symbol())?;
            } else if exp.is_integer() {
                write!(f, "{}^{}", base.symbol(), exp)?;
            } else {
                write!(f, "{}^({})", base.symbol(), exp)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flux_density_algebra() {
        // flam * wavelength^2 / speed = fnu
        let fnu = Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH
            .mul(&Dimension::AREA)
            .div(&Dimension::SPEED);
        assert_eq!(fnu, Dimension::SPECTRAL_FLUX_DENSITY_FREQUENCY);

        // Integrating flam over wavelength gives an irradiance
        let irradiance = Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH.mul(&Dimension::LENGTH);
        assert_eq!(irradiance, Dimension::IRRADIANCE);
    }

    #[test]
    fn test_square_root_is_exact() {
        let half = Rational32::new(1, 2);
        assert_eq!(Dimension::AREA.pow(half), Dimension::LENGTH);

        let sqrt_length = Dimension::LENGTH.pow(half);
        assert_eq!(sqrt_length.mul(&sqrt_length), Dimension::LENGTH);
        assert_eq!(sqrt_length.exponent(BaseDimension::Length), half);
    }

    #[test]
    fn test_recip_and_dimensionless() {
        let ratio = Dimension::LENGTH.div(&Dimension::LENGTH);
        assert!(ratio.is_dimensionless());
        assert_eq!(Dimension::TIME.recip(), Dimension::FREQUENCY);
    }

    #[test]
    fn test_display() {
        assert_eq!(Dimension::DIMENSIONLESS.to_string(), "1");
        assert_eq!(Dimension::LENGTH.to_string(), "m");
        assert_eq!(
            Dimension::SPECTRAL_FLUX_DENSITY_WAVELENGTH.to_string(),
            "m^-1 kg s^-3"
        );
        assert_eq!(
            Dimension::LENGTH.pow(Rational32::new(1, 2)).to_string(),
            "m^(1/2)"
        );
    }
}
