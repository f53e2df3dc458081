//! Request and report types of the property service.
//!
//! Requests deserialize from camelCase objects where everything but the
//! state values is optional.  Reports serialize inside a
//! [`CalculationResult`] as `{"type": "success", ...}` or
//! `{"type": "error", "message": ..., "note": ...}`.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigPatch, ConfigSnapshot};
use crate::converter::{PressUnit, TempUnit, UnitSystem};
use crate::error::{RefcalcError, Result};
use crate::table::Branch;

// ── Requests ────────────────────────────────────────────────────────

/// A temperature and pressure in the caller's units, used by
/// superheat, subcooling and the full property bundle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRequest {
    pub temperature: f64,
    pub pressure: f64,
    #[serde(flatten)]
    pub config: ConfigPatch,
}

impl StateRequest {
    pub fn new(temperature: f64, pressure: f64) -> Self {
        Self { temperature, pressure, config: ConfigPatch::default() }
    }
}

/// A pressure whose saturation temperature is wanted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressureRequest {
    pub pressure: f64,
    #[serde(default)]
    pub branch: Branch,
    #[serde(flatten)]
    pub config: ConfigPatch,
}

impl PressureRequest {
    pub fn new(pressure: f64) -> Self {
        Self { pressure, branch: Branch::default(), config: ConfigPatch::default() }
    }

    pub fn branch(mut self, branch: Branch) -> Self {
        self.branch = branch;
        self
    }
}

/// A temperature whose saturation pressure is wanted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureRequest {
    pub temperature: f64,
    #[serde(default)]
    pub branch: Branch,
    #[serde(flatten)]
    pub config: ConfigPatch,
}

impl TemperatureRequest {
    pub fn new(temperature: f64) -> Self {
        Self { temperature, branch: Branch::default(), config: ConfigPatch::default() }
    }

    pub fn branch(mut self, branch: Branch) -> Self {
        self.branch = branch;
        self
    }
}

macro_rules! config_overrides {
    ($($ty:ty),+) => {$(
        impl $ty {
            /// Use (and keep as default) this refrigerant.
            pub fn refrigerant(mut self, name: impl Into<String>) -> Self {
                self.config.refrigerant = Some(name.into());
                self
            }

            /// Use (and keep as default) this temperature unit symbol.
            pub fn temp_unit(mut self, unit: impl Into<String>) -> Self {
                self.config.temp_unit = Some(unit.into());
                self
            }

            /// Use (and keep as default) this pressure unit symbol.
            pub fn pressure_unit(mut self, unit: impl Into<String>) -> Self {
                self.config.pressure_unit = Some(unit.into());
                self
            }
        }
    )+};
}

config_overrides!(StateRequest, PressureRequest, TemperatureRequest);

// ── Reports ─────────────────────────────────────────────────────────

/// Units the values of a report are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitLabels {
    pub temperature: TempUnit,
    pub pressure: PressUnit,
}

impl From<UnitSystem> for UnitLabels {
    fn from(units: UnitSystem) -> Self {
        Self { temperature: units.temperature, pressure: units.pressure }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperheatReport {
    /// Temperature above the dew point, in the temperature unit (never negative).
    pub superheat: f64,
    /// Dew-point temperature at the given pressure.
    pub saturation_temperature: f64,
    pub refrigerant: String,
    pub units: UnitLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcoolingReport {
    /// Temperature below the bubble point, in the temperature unit (never negative).
    pub subcooling: f64,
    /// Bubble-point temperature at the given pressure.
    pub saturation_temperature: f64,
    pub refrigerant: String,
    pub units: UnitLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaturationTemperatureReport {
    pub temperature: f64,
    pub branch: Branch,
    pub refrigerant: String,
    pub units: UnitLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaturationPressureReport {
    pub pressure: f64,
    pub branch: Branch,
    pub refrigerant: String,
    pub units: UnitLabels,
}

impl std::fmt::Display for SuperheatReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.refrigerant)?;
        writeln!(f, "SH    = {:.2} {}", self.superheat, self.units.temperature)?;
        write!(f, "T_dew = {:.2} {}", self.saturation_temperature, self.units.temperature)
    }
}

impl std::fmt::Display for SubcoolingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.refrigerant)?;
        writeln!(f, "SC    = {:.2} {}", self.subcooling, self.units.temperature)?;
        write!(f, "T_bub = {:.2} {}", self.saturation_temperature, self.units.temperature)
    }
}

// ── Property bundle ─────────────────────────────────────────────────

/// Thermodynamic state at (T, P).
///
/// Temperature and pressure are echoed in the caller's units; the rest
/// is SI on a mass basis:
///
/// | Field         | Unit          |
/// |---------------|---------------|
/// | density       | kg/m³         |
/// | enthalpy      | J/kg          |
/// | entropy       | J/kg/K        |
/// | quality       | dimensionless |
/// | conductivity  | W/m/K         |
/// | viscosity     | Pa·s          |
/// | specific_heat | J/kg/K        |
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyBundle {
    pub temperature: f64,
    pub pressure: f64,
    pub density: f64,
    pub enthalpy: f64,
    pub entropy: f64,
    pub quality: f64,
    pub conductivity: f64,
    pub viscosity: f64,
    pub specific_heat: f64,
}

impl std::fmt::Display for PropertyBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "D  = {:.4} kg/m³", self.density)?;
        writeln!(f, "H  = {:.2} J/kg", self.enthalpy)?;
        writeln!(f, "S  = {:.4} J/kg/K", self.entropy)?;
        writeln!(f, "Q  = {:.6}", self.quality)?;
        writeln!(f, "L  = {:.6} W/m/K", self.conductivity)?;
        writeln!(f, "V  = {:.4e} Pa·s", self.viscosity)?;
        write!(f, "Cp = {:.4} J/kg/K", self.specific_heat)
    }
}

/// Unit label of every field of a [`PropertyBundle`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyUnits {
    pub temperature: TempUnit,
    pub pressure: PressUnit,
    pub density: &'static str,
    pub enthalpy: &'static str,
    pub entropy: &'static str,
    pub quality: &'static str,
    pub conductivity: &'static str,
    pub viscosity: &'static str,
    pub specific_heat: &'static str,
}

impl From<UnitSystem> for PropertyUnits {
    fn from(units: UnitSystem) -> Self {
        Self {
            temperature: units.temperature,
            pressure: units.pressure,
            density: "kg/m³",
            enthalpy: "J/kg",
            entropy: "J/kg/K",
            quality: "dimensionless",
            conductivity: "W/m/K",
            viscosity: "Pa·s",
            specific_heat: "J/kg/K",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesReport {
    pub properties: PropertyBundle,
    pub refrigerant: String,
    pub units: PropertyUnits,
}

// ── Configuration replies ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigUpdate {
    pub message: String,
    pub config: ConfigSnapshot,
}

// ── Result envelope ─────────────────────────────────────────────────

/// Outcome of a service operation.  Failures are values, never panics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CalculationResult<T> {
    Success(T),
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
}

impl<T> CalculationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error { .. } => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error { .. } => None,
        }
    }

    /// Error message, if this is an error.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            Self::Success(_) => None,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match self {
            Self::Error { note, .. } => note.as_deref(),
            Self::Success(_) => None,
        }
    }
}

impl<T> From<RefcalcError> for CalculationResult<T> {
    fn from(err: RefcalcError) -> Self {
        Self::Error { message: err.to_string(), note: err.note().map(str::to_string) }
    }
}

impl<T> From<Result<T>> for CalculationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => err.into(),
        }
    }
}
