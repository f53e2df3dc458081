//! Unit conversion between caller units and the solver's SI units.
//!
//! Every computation inside the crate happens in **K** and **Pa
//! absolute**.  Callers pick a temperature scale and a pressure unit;
//! the pressure unit also decides whether values are gauge (relative to
//! one standard atmosphere) or absolute.
//!
//! | Symbol              | Meaning                        |
//! |---------------------|--------------------------------|
//! | `Pa` / `Pag`        | pascal, gauge                  |
//! | `Paa`               | pascal, absolute               |
//! | `kPa` / `kPag`      | kilopascal, gauge              |
//! | `kPaa`              | kilopascal, absolute           |
//! | `bar` / `barg`      | bar, gauge                     |
//! | `bara`              | bar, absolute                  |
//! | `psi` / `psig`      | pound per square inch, gauge   |
//! | `psia`              | pound per square inch, absolute|
//!
//! ```
//! use refcalc::converter::{Converter, PressUnit, TempUnit, UnitSystem};
//!
//! let conv = Converter::new(UnitSystem::new(TempUnit::Celsius, PressUnit::Bar));
//! assert_eq!(conv.t_to_si(0.0), 273.15);
//! assert_eq!(conv.p_to_si(0.0), 101_325.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RefcalcError, Result};

/// Standard atmosphere in Pa, the reference of every gauge unit.
pub const ATMOSPHERE_PA: f64 = 101_325.0;

const KELVIN_OFFSET: f64 = 273.15;
const RANKINE_OFFSET: f64 = 459.67;
const PA_PER_PSI: f64 = 6_894.76;

// ────────────────────────────────────────────────────────────────────
//  Unit enums
// ────────────────────────────────────────────────────────────────────

/// Temperature scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TempUnit {
    /// Kelvin (solver native)
    #[default]
    Kelvin,
    /// Degrees Celsius
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
}

impl TempUnit {
    pub const ALLOWED: &'static str = "K, C, or F";

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Kelvin => "K",
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

/// Pressure unit.  The bare symbol and the `g` suffix are gauge; the
/// `a` suffix is absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PressUnit {
    #[default]
    Pa,
    Paa,
    Pag,
    KPa,
    KPaa,
    KPag,
    Bar,
    Bara,
    Barg,
    Psi,
    Psia,
    Psig,
}

impl PressUnit {
    pub const ALLOWED: &'static str =
        "Pa, Paa, Pag, kPa, kPaa, kPag, bar, bara, barg, psi, psia, or psig";

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Pa => "Pa",
            Self::Paa => "Paa",
            Self::Pag => "Pag",
            Self::KPa => "kPa",
            Self::KPaa => "kPaa",
            Self::KPag => "kPag",
            Self::Bar => "bar",
            Self::Bara => "bara",
            Self::Barg => "barg",
            Self::Psi => "psi",
            Self::Psia => "psia",
            Self::Psig => "psig",
        }
    }

    /// Pascals per one unit.
    pub fn scale(self) -> f64 {
        match self {
            Self::Pa | Self::Paa | Self::Pag => 1.0,
            Self::KPa | Self::KPaa | Self::KPag => 1_000.0,
            Self::Bar | Self::Bara | Self::Barg => 100_000.0,
            Self::Psi | Self::Psia | Self::Psig => PA_PER_PSI,
        }
    }

    /// `true` when values are relative to [`ATMOSPHERE_PA`].
    pub fn is_gauge(self) -> bool {
        !matches!(self, Self::Paa | Self::KPaa | Self::Bara | Self::Psia)
    }
}

// ── Parsing / display ────────────────────────────────────────────────

impl FromStr for TempUnit {
    type Err = RefcalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "K" => Ok(Self::Kelvin),
            "C" => Ok(Self::Celsius),
            "F" => Ok(Self::Fahrenheit),
            _ => Err(RefcalcError::UnsupportedUnit {
                kind: "temperature",
                symbol: s.to_string(),
            }),
        }
    }
}

impl FromStr for PressUnit {
    type Err = RefcalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PA" => Ok(Self::Pa),
            "PAA" => Ok(Self::Paa),
            "PAG" => Ok(Self::Pag),
            "KPA" => Ok(Self::KPa),
            "KPAA" => Ok(Self::KPaa),
            "KPAG" => Ok(Self::KPag),
            "BAR" => Ok(Self::Bar),
            "BARA" => Ok(Self::Bara),
            "BARG" => Ok(Self::Barg),
            "PSI" => Ok(Self::Psi),
            "PSIA" => Ok(Self::Psia),
            "PSIG" => Ok(Self::Psig),
            _ => Err(RefcalcError::UnsupportedUnit {
                kind: "pressure",
                symbol: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TempUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for PressUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<String> for TempUnit {
    type Error = RefcalcError;
    fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl TryFrom<String> for PressUnit {
    type Error = RefcalcError;
    fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<TempUnit> for String {
    fn from(u: TempUnit) -> Self { u.symbol().to_string() }
}

impl From<PressUnit> for String {
    fn from(u: PressUnit) -> Self { u.symbol().to_string() }
}

// ────────────────────────────────────────────────────────────────────
//  Point conversions
// ────────────────────────────────────────────────────────────────────

/// Caller temperature → K.
pub fn temperature_to_kelvin(value: f64, unit: TempUnit) -> f64 {
    match unit {
        TempUnit::Kelvin => value,
        TempUnit::Celsius => value + KELVIN_OFFSET,
        TempUnit::Fahrenheit => (value + RANKINE_OFFSET) * 5.0 / 9.0,
    }
}

/// K → caller temperature.
pub fn temperature_from_kelvin(value: f64, unit: TempUnit) -> f64 {
    match unit {
        TempUnit::Kelvin => value,
        TempUnit::Celsius => value - KELVIN_OFFSET,
        TempUnit::Fahrenheit => value * 9.0 / 5.0 - RANKINE_OFFSET,
    }
}

/// Converts a temperature *difference* expressed in K.
///
/// Only the scale changes: a 10 K difference is 18 °F, never 50.
pub fn delta_temperature_from_kelvin(value: f64, unit: TempUnit) -> f64 {
    match unit {
        TempUnit::Kelvin | TempUnit::Celsius => value,
        TempUnit::Fahrenheit => value * 1.8,
    }
}

/// Caller pressure → Pa absolute.
pub fn pressure_to_pascal_absolute(value: f64, unit: PressUnit) -> f64 {
    let pa = value * unit.scale();
    if unit.is_gauge() { pa + ATMOSPHERE_PA } else { pa }
}

/// Pa absolute → caller pressure.
pub fn pressure_from_pascal_absolute(value: f64, unit: PressUnit) -> f64 {
    let pa = if unit.is_gauge() { value - ATMOSPHERE_PA } else { value };
    pa / unit.scale()
}

// ── String-keyed helpers ────────────────────────────────────────────

/// Like [`temperature_to_kelvin`], parsing the unit symbol first.
pub fn temperature_to_kelvin_str(value: f64, unit: &str) -> Result<f64> {
    Ok(temperature_to_kelvin(value, unit.parse()?))
}

/// Like [`temperature_from_kelvin`], parsing the unit symbol first.
pub fn temperature_from_kelvin_str(value: f64, unit: &str) -> Result<f64> {
    Ok(temperature_from_kelvin(value, unit.parse()?))
}

/// Like [`delta_temperature_from_kelvin`], parsing the unit symbol first.
pub fn delta_temperature_from_kelvin_str(value: f64, unit: &str) -> Result<f64> {
    Ok(delta_temperature_from_kelvin(value, unit.parse()?))
}

/// Like [`pressure_to_pascal_absolute`], parsing the unit symbol first.
pub fn pressure_to_pascal_absolute_str(value: f64, unit: &str) -> Result<f64> {
    Ok(pressure_to_pascal_absolute(value, unit.parse()?))
}

/// Like [`pressure_from_pascal_absolute`], parsing the unit symbol first.
pub fn pressure_from_pascal_absolute_str(value: f64, unit: &str) -> Result<f64> {
    Ok(pressure_from_pascal_absolute(value, unit.parse()?))
}

// ────────────────────────────────────────────────────────────────────
//  UnitSystem / Converter
// ────────────────────────────────────────────────────────────────────

/// The pair of units a caller works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitSystem {
    pub temperature: TempUnit,
    pub pressure: PressUnit,
}

impl UnitSystem {
    pub fn new(temperature: TempUnit, pressure: PressUnit) -> Self {
        Self { temperature, pressure }
    }

    /// Solver native: K and Pa absolute.
    pub fn si() -> Self {
        Self::new(TempUnit::Kelvin, PressUnit::Paa)
    }

    pub fn temperature(mut self, u: TempUnit) -> Self { self.temperature = u; self }
    pub fn pressure(mut self, u: PressUnit) -> Self { self.pressure = u; self }
}

/// Converts values between a [`UnitSystem`] and SI.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    pub units: UnitSystem,
}

impl Converter {
    pub fn new(units: UnitSystem) -> Self {
        Self { units }
    }

    /// User → K
    pub fn t_to_si(&self, t: f64) -> f64 {
        temperature_to_kelvin(t, self.units.temperature)
    }

    /// K → User
    pub fn t_from_si(&self, t: f64) -> f64 {
        temperature_from_kelvin(t, self.units.temperature)
    }

    /// Temperature difference, K → User
    pub fn dt_from_si(&self, dt: f64) -> f64 {
        delta_temperature_from_kelvin(dt, self.units.temperature)
    }

    /// User → Pa absolute
    pub fn p_to_si(&self, p: f64) -> f64 {
        pressure_to_pascal_absolute(p, self.units.pressure)
    }

    /// Pa absolute → User
    pub fn p_from_si(&self, p: f64) -> f64 {
        pressure_from_pascal_absolute(p, self.units.pressure)
    }
}
