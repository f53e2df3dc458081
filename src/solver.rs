//! The equation-of-state solver seam.

use std::fmt;

use crate::error::Result;

/// Property codes understood by the solver's `PropsSI` entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropCode {
    /// Temperature (K)
    Temperature,
    /// Pressure (Pa)
    Pressure,
    /// Mass density (kg/m³)
    Density,
    /// Mass specific enthalpy (J/kg)
    Enthalpy,
    /// Mass specific entropy (J/(kg·K))
    Entropy,
    /// Vapor quality (0 = saturated liquid, 1 = saturated vapor)
    Quality,
    /// Thermal conductivity (W/(m·K))
    Conductivity,
    /// Dynamic viscosity (Pa·s)
    Viscosity,
    /// Mass specific heat at constant pressure (J/(kg·K))
    SpecificHeat,
}

impl PropCode {
    pub fn code(self) -> char {
        match self {
            Self::Temperature => 'T',
            Self::Pressure => 'P',
            Self::Density => 'D',
            Self::Enthalpy => 'H',
            Self::Entropy => 'S',
            Self::Quality => 'Q',
            Self::Conductivity => 'L',
            Self::Viscosity => 'V',
            Self::SpecificHeat => 'C',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'T' => Some(Self::Temperature),
            'P' => Some(Self::Pressure),
            'D' => Some(Self::Density),
            'H' => Some(Self::Enthalpy),
            'S' => Some(Self::Entropy),
            'Q' => Some(Self::Quality),
            'L' => Some(Self::Conductivity),
            'V' => Some(Self::Viscosity),
            'C' => Some(Self::SpecificHeat),
            _ => None,
        }
    }
}

impl fmt::Display for PropCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A thermodynamic property engine working in SI units.
///
/// Implementations return `+Infinity` (not an error) when the fluid
/// name is unknown or the state lies outside the equation of state;
/// callers decide what an infinite result means.  `Err` is reserved for
/// failures to even ask the question.
pub trait EosSolver: Send + Sync {
    fn props_si(
        &self,
        output: PropCode,
        in1: PropCode, v1: f64,
        in2: PropCode, v2: f64,
        fluid: &str,
    ) -> Result<f64>;
}

impl<S: EosSolver + ?Sized> EosSolver for std::sync::Arc<S> {
    fn props_si(
        &self,
        output: PropCode,
        in1: PropCode, v1: f64,
        in2: PropCode, v2: f64,
        fluid: &str,
    ) -> Result<f64> {
        (**self).props_si(output, in1, v1, in2, v2, fluid)
    }
}
