//! Tabulated saturation curves for refrigerant blends the solver does
//! not know.
//!
//! A [`SaturationTable`] holds bubble (liquid) and dew (vapor) pressures
//! against temperature.  Lookups interpolate linearly between samples
//! and extrapolate with the slope of the two outermost samples on
//! either side.

use std::collections::HashMap;

use crate::converter::{PressUnit, TempUnit, pressure_to_pascal_absolute, temperature_to_kelvin};
use crate::error::{RefcalcError, Result};

/// Which side of the two-phase dome a saturation value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    /// Bubble point, vapor quality 0.
    #[default]
    Liquid,
    /// Dew point, vapor quality 1.
    Vapor,
}

impl Branch {
    /// Vapor quality passed to the solver for this branch.
    pub fn quality(self) -> f64 {
        match self {
            Self::Liquid => 0.0,
            Self::Vapor => 1.0,
        }
    }
}

/// One row of tabulated saturation data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationPoint {
    /// Temperature (K)
    pub temperature: f64,
    /// Bubble-point pressure (Pa absolute)
    pub liquid_pressure: f64,
    /// Dew-point pressure (Pa absolute)
    pub vapor_pressure: f64,
}

impl SaturationPoint {
    pub fn new(temperature: f64, liquid_pressure: f64, vapor_pressure: f64) -> Self {
        Self { temperature, liquid_pressure, vapor_pressure }
    }

    fn pressure(&self, branch: Branch) -> f64 {
        match branch {
            Branch::Liquid => self.liquid_pressure,
            Branch::Vapor => self.vapor_pressure,
        }
    }
}

/// Immutable saturation curve of one refrigerant.
#[derive(Debug, Clone, PartialEq)]
pub struct SaturationTable {
    points: Vec<SaturationPoint>,
    // (T, P) pairs sorted by T, and (P, T) pairs sorted by P, per branch.
    liquid_by_t: Vec<(f64, f64)>,
    vapor_by_t: Vec<(f64, f64)>,
    liquid_by_p: Vec<(f64, f64)>,
    vapor_by_p: Vec<(f64, f64)>,
}

impl SaturationTable {
    /// Build a table.  Points may come in any order; at least one is
    /// required and every value must be finite.
    pub fn new(points: impl Into<Vec<SaturationPoint>>) -> Result<Self> {
        let mut points = points.into();
        if points.is_empty() {
            return Err(RefcalcError::InvalidInput(
                "a saturation table needs at least one point".into(),
            ));
        }
        if let Some(bad) = points.iter().find(|p| {
            !(p.temperature.is_finite() && p.liquid_pressure.is_finite() && p.vapor_pressure.is_finite())
        }) {
            return Err(RefcalcError::InvalidInput(format!(
                "saturation point values must be finite, got {bad:?}"
            )));
        }
        points.sort_by(|a, b| a.temperature.total_cmp(&b.temperature));

        let column = |branch: Branch, invert: bool| {
            let mut pairs: Vec<(f64, f64)> = points
                .iter()
                .map(|p| {
                    if invert { (p.pressure(branch), p.temperature) } else { (p.temperature, p.pressure(branch)) }
                })
                .collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            pairs
        };

        Ok(Self {
            liquid_by_t: column(Branch::Liquid, false),
            vapor_by_t: column(Branch::Vapor, false),
            liquid_by_p: column(Branch::Liquid, true),
            vapor_by_p: column(Branch::Vapor, true),
            points,
        })
    }

    /// Build a table from pressure–temperature chart rows given as
    /// `(temperature, bubble pressure, dew pressure)` in the chart's units.
    pub fn from_chart(rows: &[(f64, f64, f64)], t_unit: TempUnit, p_unit: PressUnit) -> Result<Self> {
        let points: Vec<SaturationPoint> = rows
            .iter()
            .map(|&(t, p_liq, p_vap)| {
                SaturationPoint::new(
                    temperature_to_kelvin(t, t_unit),
                    pressure_to_pascal_absolute(p_liq, p_unit),
                    pressure_to_pascal_absolute(p_vap, p_unit),
                )
            })
            .collect();
        Self::new(points)
    }

    /// Points sorted by temperature.
    pub fn points(&self) -> &[SaturationPoint] {
        &self.points
    }

    /// Saturation pressure (Pa absolute) at `temperature` (K).
    pub fn pressure_at(&self, temperature: f64, branch: Branch) -> Result<f64> {
        validate_finite("temperature", temperature)?;
        let samples = match branch {
            Branch::Liquid => &self.liquid_by_t,
            Branch::Vapor => &self.vapor_by_t,
        };
        piecewise_linear(samples, temperature)
    }

    /// Saturation temperature (K) at `pressure` (Pa absolute).
    pub fn temperature_at(&self, pressure: f64, branch: Branch) -> Result<f64> {
        validate_finite("pressure", pressure)?;
        let samples = match branch {
            Branch::Liquid => &self.liquid_by_p,
            Branch::Vapor => &self.vapor_by_p,
        };
        piecewise_linear(samples, pressure)
    }
}

fn validate_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(RefcalcError::InvalidInput(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Evaluate the polyline through `samples` (sorted by x) at `x`.
///
/// Outside the sampled range the first or last segment is extended.
/// A single sample yields its value everywhere.
fn piecewise_linear(samples: &[(f64, f64)], x: f64) -> Result<f64> {
    let n = samples.len();
    let (lo, hi) = match n {
        0 => return Err(RefcalcError::InvalidInput("empty saturation table".into())),
        1 => return Ok(samples[0].1),
        _ => match samples.partition_point(|&(sx, _)| sx < x) {
            0 => (0, 1),
            i if i == n => (n - 2, n - 1),
            i if samples[i].0 == x => return Ok(samples[i].1),
            i => (i - 1, i),
        },
    };
    let ((x0, y0), (x1, y1)) = (samples[lo], samples[hi]);
    if x1 == x0 {
        return Ok(y0);
    }
    Ok(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

// ────────────────────────────────────────────────────────────────────
//  Registry
// ────────────────────────────────────────────────────────────────────

/// Normalized lookup key of a refrigerant name.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

/// Saturation tables keyed by normalized refrigerant name.
#[derive(Debug, Clone, Default)]
pub struct CustomTables {
    tables: HashMap<String, SaturationTable>,
}

impl CustomTables {
    /// A registry without any table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The tables shipped with the crate: R448A, R449A and R407F.
    pub fn builtin() -> Self {
        let mut tables = Self::empty();
        for (name, rows) in [("R448A", R448A_CHART), ("R449A", R449A_CHART), ("R407F", R407F_CHART)] {
            match SaturationTable::from_chart(rows, TempUnit::Celsius, PressUnit::Psig) {
                Ok(table) => {
                    tables.tables.insert(name.to_string(), table);
                }
                Err(e) => tracing::warn!(refrigerant = name, error = %e, "skipping built-in table"),
            }
        }
        tables
    }

    /// Register (or replace) the table of `name`.
    pub fn with_table(mut self, name: &str, table: SaturationTable) -> Self {
        self.tables.insert(normalize_key(name), table);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SaturationTable> {
        self.tables.get(&normalize_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ── Pressure–temperature charts (°C, bubble psig, dew psig) ─────────

const R448A_CHART: &[(f64, f64, f64)] = &[
    (-40.0, 5.9, 0.0),
    (-30.0, 15.1, 8.2),
    (-20.0, 28.4, 21.0),
    (-10.0, 46.0, 37.7),
    (0.0, 71.5, 60.1),
    (10.0, 105.5, 89.4),
    (20.0, 148.5, 127.0),
    (30.0, 198.1, 173.5),
    (40.0, 258.0, 229.0),
    (50.0, 329.0, 295.0),
];

const R449A_CHART: &[(f64, f64, f64)] = &[
    (-40.0, 5.6, 0.0),
    (-30.0, 14.8, 8.0),
    (-20.0, 28.0, 20.96),
    (-10.0, 45.8, 37.5),
    (0.0, 74.05, 61.4),
    (10.0, 104.0, 89.8),
    (20.0, 146.0, 126.5),
    (30.0, 195.0, 172.4),
    (40.0, 254.2, 228.0),
    (50.0, 324.0, 293.0),
];

const R407F_CHART: &[(f64, f64, f64)] = &[
    (-40.0, 6.3, -0.24),
    (-30.0, 15.7, 8.3),
    (-20.0, 29.6, 21.00),
    (-10.0, 48.4, 37.9),
    (0.0, 73.3, 61.03),
    (10.0, 106.0, 91.3),
    (20.0, 151.19, 131.0),
    (30.0, 202.16, 178.5),
    (40.0, 263.91, 237.0),
    (50.0, 338.0, 307.0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_point() -> SaturationTable {
        SaturationTable::new(vec![
            SaturationPoint::new(270.0, 300_000.0, 250_000.0),
            SaturationPoint::new(260.0, 200_000.0, 150_000.0),
        ])
        .unwrap()
    }

    #[test]
    fn points_are_sorted_by_temperature() {
        let t = two_point();
        assert_eq!(t.points()[0].temperature, 260.0);
    }

    #[test]
    fn midpoint_interpolation() {
        let t = two_point();
        assert_abs_diff_eq!(t.pressure_at(265.0, Branch::Liquid).unwrap(), 250_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.temperature_at(200_000.0, Branch::Vapor).unwrap(), 265.0, epsilon = 1e-9);
    }

    #[test]
    fn single_sample_is_flat() {
        let t = SaturationTable::new(vec![SaturationPoint::new(250.0, 1.0e5, 0.9e5)]).unwrap();
        assert_eq!(t.pressure_at(100.0, Branch::Liquid).unwrap(), 1.0e5);
        assert_eq!(t.temperature_at(5.0e6, Branch::Vapor).unwrap(), 250.0);
    }

    #[test]
    fn empty_and_non_finite_tables_are_rejected() {
        assert!(matches!(SaturationTable::new(Vec::new()), Err(RefcalcError::InvalidInput(_))));
        let bad = vec![SaturationPoint::new(f64::NAN, 1.0, 1.0)];
        assert!(SaturationTable::new(bad).is_err());
    }

    #[test]
    fn non_finite_queries_are_rejected() {
        let t = two_point();
        assert!(t.pressure_at(f64::INFINITY, Branch::Liquid).is_err());
    }

    #[test]
    fn extrapolates_with_the_first_and_last_segments() {
        let t = two_point();
        // liquid: 200 kPa at 260 K, 300 kPa at 270 K
        assert_abs_diff_eq!(t.pressure_at(250.0, Branch::Liquid).unwrap(), 100_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.pressure_at(280.0, Branch::Liquid).unwrap(), 400_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.temperature_at(100_000.0, Branch::Vapor).unwrap(), 255.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_width_segment_takes_lower_sample() {
        let samples = [(1.0, 10.0), (1.0, 20.0)];
        assert_eq!(piecewise_linear(&samples, 1.0).unwrap(), 10.0);
        assert_eq!(piecewise_linear(&samples, 3.0).unwrap(), 10.0);
    }

    #[test]
    fn builtin_lookup_ignores_case() {
        let tables = CustomTables::builtin();
        assert_eq!(tables.names(), vec!["R407F", "R448A", "R449A"]);
        assert!(tables.contains("r407f"));
        assert!(tables.contains(" R449a "));
        assert!(!tables.contains("R744"));
    }
}
