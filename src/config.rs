//! Default refrigerant and units, with the init / ensure-initialized
//! lifecycle used by every calculation.
//!
//! Per-call overrides are *persisted*: a calculation that names a
//! refrigerant or unit makes it the new default for later calls.

use serde::{Deserialize, Serialize};

use crate::converter::{PressUnit, TempUnit, UnitSystem};
use crate::error::{RefcalcError, Result};
use crate::table::CustomTables;

/// Optional refrigerant / unit fields carried by `init`, `set_config`
/// and every calculation request.  Units are symbols, validated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    pub refrigerant: Option<String>,
    pub temp_unit: Option<String>,
    pub pressure_unit: Option<String>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refrigerant(mut self, name: impl Into<String>) -> Self {
        self.refrigerant = Some(name.into());
        self
    }

    pub fn temp_unit(mut self, unit: impl Into<String>) -> Self {
        self.temp_unit = Some(unit.into());
        self
    }

    pub fn pressure_unit(mut self, unit: impl Into<String>) -> Self {
        self.pressure_unit = Some(unit.into());
        self
    }
}

/// What `get_config` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub refrigerant: Option<String>,
    pub temp_unit: TempUnit,
    pub pressure_unit: PressUnit,
}

/// Fluid and units a calculation runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveConfig {
    pub refrigerant: String,
    pub units: UnitSystem,
    pub using_custom_table: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Initialized,
    Updated,
}

impl InitOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Initialized => "Initialized successfully",
            Self::Updated => "Default settings updated",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigState {
    default_refrigerant: Option<String>,
    temp_unit: TempUnit,
    pressure_unit: PressUnit,
    initialized: bool,
    using_custom_table: bool,
}

impl ConfigState {
    /// Uninitialized state: no refrigerant, K and Pa.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn using_custom_table(&self) -> bool {
        self.using_custom_table
    }

    pub fn refrigerant(&self) -> Option<&str> {
        self.default_refrigerant.as_deref()
    }

    pub fn units(&self) -> UnitSystem {
        UnitSystem::new(self.temp_unit, self.pressure_unit)
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            refrigerant: self.default_refrigerant.clone(),
            temp_unit: self.temp_unit,
            pressure_unit: self.pressure_unit,
        }
    }

    /// First call: requires a refrigerant and commits everything or
    /// nothing.  Later calls: partial update, field by field.
    pub fn init(&mut self, patch: &ConfigPatch, tables: &CustomTables) -> Result<InitOutcome> {
        if self.initialized {
            if let Some(name) = &patch.refrigerant {
                let name = validate_refrigerant(name)?;
                self.set_refrigerant(name, tables);
            }
            if let Some(unit) = parse_temp_unit(patch.temp_unit.as_deref())? {
                self.temp_unit = unit;
            }
            if let Some(unit) = parse_pressure_unit(patch.pressure_unit.as_deref())? {
                self.pressure_unit = unit;
            }
            tracing::debug!(config = ?self.snapshot(), "default settings updated");
            return Ok(InitOutcome::Updated);
        }

        let Some(name) = &patch.refrigerant else {
            return Err(RefcalcError::MissingRefrigerant { context: "during initialization" });
        };
        let name = validate_refrigerant(name)?;
        let temp_unit = parse_temp_unit(patch.temp_unit.as_deref())?;
        let pressure_unit = parse_pressure_unit(patch.pressure_unit.as_deref())?;

        self.commit(Some(name), temp_unit, pressure_unit, tables);
        self.initialized = true;
        tracing::debug!(config = ?self.snapshot(), "initialized");
        Ok(InitOutcome::Initialized)
    }

    /// Make sure the state is usable for a calculation, applying (and
    /// keeping) whatever the call overrides.
    pub fn ensure_initialized(
        &mut self,
        patch: &ConfigPatch,
        tables: &CustomTables,
    ) -> Result<ActiveConfig> {
        if !self.initialized && patch.refrigerant.is_none() && self.default_refrigerant.is_none() {
            return Err(RefcalcError::MissingRefrigerant {
                context: "either during initialization or in the method call",
            });
        }

        let temp_unit = parse_temp_unit(patch.temp_unit.as_deref())?;
        let pressure_unit = parse_pressure_unit(patch.pressure_unit.as_deref())?;
        let name = patch.refrigerant.as_deref().map(validate_refrigerant).transpose()?;

        self.commit(name, temp_unit, pressure_unit, tables);
        if !self.initialized {
            self.initialized = true;
            tracing::debug!(config = ?self.snapshot(), "initialized on first calculation");
        }

        let refrigerant = self.default_refrigerant.clone().ok_or(RefcalcError::MissingRefrigerant {
            context: "either during initialization or in the method call",
        })?;
        Ok(ActiveConfig {
            refrigerant,
            units: self.units(),
            using_custom_table: self.using_custom_table,
        })
    }

    fn commit(
        &mut self,
        refrigerant: Option<String>,
        temp_unit: Option<TempUnit>,
        pressure_unit: Option<PressUnit>,
        tables: &CustomTables,
    ) {
        if let Some(name) = refrigerant {
            self.set_refrigerant(name, tables);
        }
        if let Some(unit) = temp_unit {
            self.temp_unit = unit;
        }
        if let Some(unit) = pressure_unit {
            self.pressure_unit = unit;
        }
    }

    fn set_refrigerant(&mut self, name: String, tables: &CustomTables) {
        self.using_custom_table = tables.contains(&name);
        if self.default_refrigerant.as_deref() != Some(name.as_str()) {
            tracing::debug!(refrigerant = %name, custom_table = self.using_custom_table, "refrigerant changed");
        }
        self.default_refrigerant = Some(name);
    }
}

// ── Validation ───────────────────────────────────────────────────────

fn validate_refrigerant(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.contains('\0') {
        return Err(RefcalcError::InvalidRefrigerantType);
    }
    Ok(name.to_string())
}

fn parse_temp_unit(symbol: Option<&str>) -> Result<Option<TempUnit>> {
    symbol
        .map(|s| {
            s.parse().map_err(|_| RefcalcError::InvalidUnit {
                field: "temperature unit",
                allowed: TempUnit::ALLOWED,
            })
        })
        .transpose()
}

fn parse_pressure_unit(symbol: Option<&str>) -> Result<Option<PressUnit>> {
    symbol
        .map(|s| {
            s.parse().map_err(|_| RefcalcError::InvalidUnit {
                field: "pressure unit",
                allowed: PressUnit::ALLOWED,
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> CustomTables {
        CustomTables::builtin()
    }

    #[test]
    fn starts_in_kelvin_and_pascal() {
        let state = ConfigState::new();
        assert!(!state.is_initialized());
        assert_eq!(state.units(), UnitSystem::new(TempUnit::Kelvin, PressUnit::Pa));
        assert_eq!(state.refrigerant(), None);
    }

    #[test]
    fn first_init_requires_refrigerant() {
        let mut state = ConfigState::new();
        let err = state.init(&ConfigPatch::new().temp_unit("C"), &tables()).unwrap_err();
        assert!(err.to_string().contains("Refrigerant must be specified"));
        assert!(!state.is_initialized());
    }

    #[test]
    fn first_init_is_all_or_nothing() {
        let mut state = ConfigState::new();
        let patch = ConfigPatch::new().refrigerant("R404A").temp_unit("C").pressure_unit("X");
        let err = state.init(&patch, &tables()).unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid pressure unit. Must be {}", PressUnit::ALLOWED));
        assert_eq!(state.refrigerant(), None);
        assert_eq!(state.units().temperature, TempUnit::Kelvin);
    }

    #[test]
    fn later_init_updates_only_given_fields() {
        let mut state = ConfigState::new();
        let first = ConfigPatch::new().refrigerant("R404A").temp_unit("C").pressure_unit("bar");
        assert_eq!(state.init(&first, &tables()).unwrap(), InitOutcome::Initialized);

        let outcome = state.init(&ConfigPatch::new().pressure_unit("psig"), &tables()).unwrap();
        assert_eq!(outcome, InitOutcome::Updated);
        assert_eq!(state.refrigerant(), Some("R404A"));
        assert_eq!(state.units(), UnitSystem::new(TempUnit::Celsius, PressUnit::Psig));

        assert_eq!(state.init(&ConfigPatch::new(), &tables()).unwrap(), InitOutcome::Updated);
    }

    #[test]
    fn partial_update_stops_at_the_bad_field() {
        let mut state = ConfigState::new();
        state.init(&ConfigPatch::new().refrigerant("R404A"), &tables()).unwrap();
        let patch = ConfigPatch::new().refrigerant("R134a").temp_unit("Q").pressure_unit("bar");
        assert!(matches!(
            state.init(&patch, &tables()),
            Err(RefcalcError::InvalidUnit { field: "temperature unit", .. })
        ));
        assert_eq!(state.refrigerant(), Some("R134a"));
        assert_eq!(state.units().pressure, PressUnit::Pa);
    }

    #[test]
    fn ensure_needs_some_refrigerant() {
        let mut state = ConfigState::new();
        let err = state.ensure_initialized(&ConfigPatch::new(), &tables()).unwrap_err();
        assert!(matches!(err, RefcalcError::MissingRefrigerant { .. }));
    }

    #[test]
    fn ensure_persists_overrides() {
        let mut state = ConfigState::new();
        let active = state
            .ensure_initialized(&ConfigPatch::new().refrigerant("R744").temp_unit("f"), &tables())
            .unwrap();
        assert_eq!(active.refrigerant, "R744");
        assert_eq!(active.units.temperature, TempUnit::Fahrenheit);
        assert!(state.is_initialized());

        let active = state.ensure_initialized(&ConfigPatch::new(), &tables()).unwrap();
        assert_eq!(active.refrigerant, "R744");
        assert_eq!(active.units.temperature, TempUnit::Fahrenheit);
    }

    #[test]
    fn custom_table_flag_follows_refrigerant() {
        let mut state = ConfigState::new();
        let a = state.ensure_initialized(&ConfigPatch::new().refrigerant("r448a"), &tables()).unwrap();
        assert!(a.using_custom_table);
        let a = state.ensure_initialized(&ConfigPatch::new(), &tables()).unwrap();
        assert!(a.using_custom_table);
        let a = state.ensure_initialized(&ConfigPatch::new().refrigerant("R744"), &tables()).unwrap();
        assert!(!a.using_custom_table);
    }

    #[test]
    fn unusable_refrigerant_names_are_rejected() {
        let mut state = ConfigState::new();
        for bad in ["", "   ", "R4\u{0}04A"] {
            let err = state.ensure_initialized(&ConfigPatch::new().refrigerant(bad), &tables()).unwrap_err();
            assert_eq!(err, RefcalcError::InvalidRefrigerantType);
        }
    }
}
