//! Saturation lookups, from a custom table or from the solver.

use crate::error::Result;
use crate::runtime::LazySolver;
use crate::solver::PropCode;
use crate::table::{Branch, CustomTables, SaturationTable};

/// Answers saturation questions for one refrigerant at a time.
///
/// All values are SI: kelvin and pascal absolute.  The solver is only
/// acquired when no custom table applies.
pub struct SaturationResolver<'a> {
    tables: &'a CustomTables,
    solver: &'a LazySolver,
}

impl<'a> SaturationResolver<'a> {
    pub fn new(tables: &'a CustomTables, solver: &'a LazySolver) -> Self {
        Self { tables, solver }
    }

    /// Saturation temperature (K) at `pressure` (Pa absolute).
    pub fn saturation_temperature(
        &self,
        pressure: f64,
        refrigerant: &str,
        use_table: bool,
        branch: Branch,
    ) -> Result<f64> {
        if let Some(table) = self.table(refrigerant, use_table) {
            let t = table.temperature_at(pressure, branch)?;
            tracing::debug!(refrigerant, pressure, ?branch, t_sat = t, "saturation temperature from table");
            return Ok(t);
        }
        let solver = self.solver.get()?;
        solver.props_si(
            PropCode::Temperature,
            PropCode::Pressure, pressure,
            PropCode::Quality, branch.quality(),
            refrigerant,
        )
    }

    /// Saturation pressure (Pa absolute) at `temperature` (K).
    pub fn saturation_pressure(
        &self,
        temperature: f64,
        refrigerant: &str,
        use_table: bool,
        branch: Branch,
    ) -> Result<f64> {
        if let Some(table) = self.table(refrigerant, use_table) {
            let p = table.pressure_at(temperature, branch)?;
            tracing::debug!(refrigerant, temperature, ?branch, p_sat = p, "saturation pressure from table");
            return Ok(p);
        }
        let solver = self.solver.get()?;
        solver.props_si(
            PropCode::Pressure,
            PropCode::Temperature, temperature,
            PropCode::Quality, branch.quality(),
            refrigerant,
        )
    }

    fn table(&self, refrigerant: &str, use_table: bool) -> Option<&'a SaturationTable> {
        if !use_table {
            return None;
        }
        let table = self.tables.get(refrigerant);
        if table.is_none() {
            tracing::warn!(refrigerant, "no custom table registered, asking the solver");
        }
        table
    }
}
