//! The stateful property service.

use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::config::{ActiveConfig, ConfigPatch, ConfigSnapshot, ConfigState};
use crate::converter::Converter;
use crate::error::{RefcalcError, Result};
use crate::properties::*;
use crate::runtime::LazySolver;
use crate::saturation::SaturationResolver;
use crate::settings::Settings;
use crate::solver::PropCode;
use crate::table::{Branch, CustomTables};

/// Superheat, subcooling, saturation and property calculations for a
/// default refrigerant and unit system.
///
/// One instance holds one configuration.  Calls may come from several
/// threads; configuration updates are serialized, and a calculation
/// works on the configuration it observed when it started.
///
/// ```no_run
/// use refcalc::{ConfigPatch, PropertyService, StateRequest};
///
/// let service = PropertyService::from_env();
/// service.init(&ConfigPatch::new().refrigerant("R744").temp_unit("C").pressure_unit("bar"));
///
/// let result = service.calculate_superheat(&StateRequest::new(0.0, 23.84));
/// if let Some(report) = result.success() {
///     println!("{report}");
/// }
/// ```
pub struct PropertyService {
    config: Mutex<ConfigState>,
    tables: CustomTables,
    solver: LazySolver,
}

impl PropertyService {
    /// A service over `solver` with the built-in blend tables.
    pub fn new(solver: LazySolver) -> Self {
        Self::with_tables(solver, CustomTables::builtin())
    }

    pub fn with_tables(solver: LazySolver, tables: CustomTables) -> Self {
        Self { config: Mutex::new(ConfigState::new()), tables, solver }
    }

    /// CoolProp located through the environment (see [`Settings`]).
    pub fn from_env() -> Self {
        Self::new(LazySolver::coolprop(Settings::from_env()))
    }

    pub fn tables(&self) -> &CustomTables {
        &self.tables
    }

    pub fn solver(&self) -> &LazySolver {
        &self.solver
    }

    // ================================================================
    //  Configuration
    // ================================================================

    /// Set the defaults.  The first call must name a refrigerant.
    pub fn init(&self, patch: &ConfigPatch) -> CalculationResult<StatusMessage> {
        self.lock_config()
            .and_then(|mut config| config.init(patch, &self.tables))
            .map(|outcome| StatusMessage { message: outcome.message().to_string() })
            .into()
    }

    /// Same as [`init`](Self::init), answering with the new configuration.
    pub fn set_config(&self, patch: &ConfigPatch) -> CalculationResult<ConfigUpdate> {
        self.lock_config()
            .and_then(|mut config| {
                config.init(patch, &self.tables)?;
                Ok(ConfigUpdate {
                    message: "Config updated successfully".to_string(),
                    config: config.snapshot(),
                })
            })
            .into()
    }

    pub fn get_config(&self) -> ConfigSnapshot {
        match self.config.lock() {
            Ok(config) => config.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        }
    }

    // ================================================================
    //  Calculations
    // ================================================================

    /// How far `temperature` is above the dew point at `pressure`.
    pub fn calculate_superheat(&self, req: &StateRequest) -> CalculationResult<SuperheatReport> {
        self.superheat(req).into()
    }

    /// How far `temperature` is below the bubble point at `pressure`.
    pub fn calculate_subcooling(&self, req: &StateRequest) -> CalculationResult<SubcoolingReport> {
        self.subcooling(req).into()
    }

    pub fn get_saturation_temperature(
        &self,
        req: &PressureRequest,
    ) -> CalculationResult<SaturationTemperatureReport> {
        self.saturation_temperature(req).into()
    }

    pub fn get_saturation_pressure(
        &self,
        req: &TemperatureRequest,
    ) -> CalculationResult<SaturationPressureReport> {
        self.saturation_pressure(req).into()
    }

    /// Full property bundle at (T, P).  Not available for refrigerants
    /// served from a custom table.
    pub fn get_properties(&self, req: &StateRequest) -> CalculationResult<PropertiesReport> {
        self.properties(req).into()
    }

    /// Raw solver call in SI units.  `fluid` defaults to the configured
    /// refrigerant; the configuration itself is left untouched.
    pub fn props_si(
        &self,
        output: PropCode,
        in1: PropCode, v1: f64,
        in2: PropCode, v2: f64,
        fluid: Option<&str>,
    ) -> Result<f64> {
        let fluid = match fluid {
            Some(name) => name.to_string(),
            None => self.lock_config()?.refrigerant().map(str::to_string).ok_or(
                RefcalcError::MissingRefrigerant {
                    context: "either during initialization or in the method call",
                },
            )?,
        };
        self.solver.get()?.props_si(output, in1, v1, in2, v2, &fluid)
    }

    // ================================================================
    //  Internals
    // ================================================================

    fn lock_config(&self) -> Result<MutexGuard<'_, ConfigState>> {
        self.config
            .lock()
            .map_err(|_| RefcalcError::Solver("configuration lock is poisoned".into()))
    }

    fn prepare(&self, patch: &ConfigPatch) -> Result<ActiveConfig> {
        self.lock_config()?.ensure_initialized(patch, &self.tables)
    }

    fn resolver(&self) -> SaturationResolver<'_> {
        SaturationResolver::new(&self.tables, &self.solver)
    }

    fn superheat(&self, req: &StateRequest) -> Result<SuperheatReport> {
        validate_finite("temperature", req.temperature)?;
        validate_finite("pressure", req.pressure)?;
        let active = self.prepare(&req.config)?;
        let conv = Converter::new(active.units);
        let pressure = conv.p_to_si(req.pressure);
        let temperature = conv.t_to_si(req.temperature);

        let t_dew = self.resolver().saturation_temperature(
            pressure,
            &active.refrigerant,
            active.using_custom_table,
            Branch::Vapor,
        )?;
        let delta = temperature - t_dew;
        if t_dew == f64::INFINITY && delta.is_infinite() {
            tracing::warn!(refrigerant = %active.refrigerant, pressure, "no dew point, superheat is infinite");
            return Err(RefcalcError::PhysicallyInfinite { quantity: "Superheat" });
        }
        tracing::debug!(refrigerant = %active.refrigerant, temperature, pressure, t_dew, "superheat");

        Ok(SuperheatReport {
            superheat: conv.dt_from_si(delta.max(0.0)),
            saturation_temperature: conv.t_from_si(t_dew),
            refrigerant: active.refrigerant,
            units: active.units.into(),
        })
    }

    fn subcooling(&self, req: &StateRequest) -> Result<SubcoolingReport> {
        validate_finite("temperature", req.temperature)?;
        validate_finite("pressure", req.pressure)?;
        let active = self.prepare(&req.config)?;
        let conv = Converter::new(active.units);
        let pressure = conv.p_to_si(req.pressure);
        let temperature = conv.t_to_si(req.temperature);

        let t_bubble = self.resolver().saturation_temperature(
            pressure,
            &active.refrigerant,
            active.using_custom_table,
            Branch::Liquid,
        )?;
        let delta = t_bubble - temperature;
        if t_bubble == f64::INFINITY && delta.is_infinite() {
            tracing::warn!(refrigerant = %active.refrigerant, pressure, "no bubble point, subcooling is infinite");
            return Err(RefcalcError::PhysicallyInfinite { quantity: "Subcooling" });
        }
        tracing::debug!(refrigerant = %active.refrigerant, temperature, pressure, t_bubble, "subcooling");

        Ok(SubcoolingReport {
            subcooling: conv.dt_from_si(delta.max(0.0)),
            saturation_temperature: conv.t_from_si(t_bubble),
            refrigerant: active.refrigerant,
            units: active.units.into(),
        })
    }

    fn saturation_temperature(&self, req: &PressureRequest) -> Result<SaturationTemperatureReport> {
        validate_finite("pressure", req.pressure)?;
        let active = self.prepare(&req.config)?;
        let conv = Converter::new(active.units);
        let t_sat = self.resolver().saturation_temperature(
            conv.p_to_si(req.pressure),
            &active.refrigerant,
            active.using_custom_table,
            req.branch,
        )?;
        Ok(SaturationTemperatureReport {
            temperature: conv.t_from_si(t_sat),
            branch: req.branch,
            refrigerant: active.refrigerant,
            units: active.units.into(),
        })
    }

    fn saturation_pressure(&self, req: &TemperatureRequest) -> Result<SaturationPressureReport> {
        validate_finite("temperature", req.temperature)?;
        let active = self.prepare(&req.config)?;
        let conv = Converter::new(active.units);
        let p_sat = self.resolver().saturation_pressure(
            conv.t_to_si(req.temperature),
            &active.refrigerant,
            active.using_custom_table,
            req.branch,
        )?;
        Ok(SaturationPressureReport {
            pressure: conv.p_from_si(p_sat),
            branch: req.branch,
            refrigerant: active.refrigerant,
            units: active.units.into(),
        })
    }

    fn properties(&self, req: &StateRequest) -> Result<PropertiesReport> {
        validate_finite("temperature", req.temperature)?;
        validate_finite("pressure", req.pressure)?;
        let active = self.prepare(&req.config)?;
        if active.using_custom_table {
            return Err(RefcalcError::UnsupportedOperation(
                "Custom refrigerants are not supported for getProperties".into(),
            ));
        }
        let conv = Converter::new(active.units);
        let t = conv.t_to_si(req.temperature);
        let p = conv.p_to_si(req.pressure);

        let solver = self.solver.get()?;
        let at = |output: PropCode| {
            solver.props_si(output, PropCode::Temperature, t, PropCode::Pressure, p, &active.refrigerant)
        };
        let properties = PropertyBundle {
            temperature: conv.t_from_si(t),
            pressure: conv.p_from_si(p),
            density: at(PropCode::Density)?,
            enthalpy: at(PropCode::Enthalpy)?,
            entropy: at(PropCode::Entropy)?,
            quality: at(PropCode::Quality)?,
            conductivity: at(PropCode::Conductivity)?,
            viscosity: at(PropCode::Viscosity)?,
            specific_heat: at(PropCode::SpecificHeat)?,
        };
        tracing::debug!(refrigerant = %active.refrigerant, t, p, "property bundle");

        Ok(PropertiesReport {
            properties,
            units: active.units.into(),
            refrigerant: active.refrigerant,
        })
    }
}

/// Reject NaN and ±Infinity before they reach a unit conversion.
fn validate_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(RefcalcError::InvalidInput(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// The process-wide service, configured from the environment on first
/// use.
pub fn shared() -> &'static PropertyService {
    static SHARED: OnceLock<PropertyService> = OnceLock::new();
    SHARED.get_or_init(PropertyService::from_env)
}
