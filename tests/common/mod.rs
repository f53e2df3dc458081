#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use refcalc::{EosSolver, LazySolver, PropCode, PropertyService, Result};

/// R744 saturation curve from a P-T chart: (K, Pa absolute).
/// -40 °C / 9.03 barg, -20 °C / 18.68 barg, 0 °C / 33.84 barg, 10 °C / 44.01 barg.
pub const R744_CURVE: &[(f64, f64)] = &[
    (233.15, 1_004_325.0),
    (253.15, 1_969_325.0),
    (273.15, 3_485_325.0),
    (283.15, 4_502_325.0),
];

/// Stand-in for CoolProp that knows R744 only and answers `+Infinity`
/// for every other fluid, as CoolProp does.
#[derive(Default)]
pub struct ChartSolver {
    pub calls: AtomicUsize,
}

impl ChartSolver {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn interpolate(pairs: impl Iterator<Item = (f64, f64)>, x: f64) -> f64 {
    let pts: Vec<(f64, f64)> = pairs.collect();
    let i = pts.iter().position(|&(px, _)| px >= x).unwrap_or(pts.len() - 1).max(1);
    let ((x0, y0), (x1, y1)) = (pts[i - 1], pts[i]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

impl EosSolver for ChartSolver {
    fn props_si(
        &self,
        output: PropCode,
        in1: PropCode, v1: f64,
        in2: PropCode, v2: f64,
        fluid: &str,
    ) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !fluid.eq_ignore_ascii_case("R744") && !fluid.eq_ignore_ascii_case("CO2") {
            return Ok(f64::INFINITY);
        }
        let curve = R744_CURVE.iter().copied();
        Ok(match (output, in1, in2) {
            (PropCode::Temperature, PropCode::Pressure, PropCode::Quality) => {
                interpolate(curve.map(|(t, p)| (p, t)), v1)
            }
            (PropCode::Pressure, PropCode::Temperature, PropCode::Quality) => interpolate(curve, v1),
            (PropCode::Density, PropCode::Temperature, PropCode::Pressure) => v2 / (188.9 * v1),
            (PropCode::Enthalpy, _, _) => 400_000.0,
            (PropCode::Entropy, _, _) => 1_800.0,
            (PropCode::Quality, _, _) => -1.0,
            (PropCode::Conductivity, _, _) => 0.015,
            (PropCode::Viscosity, _, _) => 1.4e-5,
            (PropCode::SpecificHeat, _, _) => 900.0,
            _ => f64::INFINITY,
        })
    }
}

/// A service over a ready [`ChartSolver`], keeping a handle on the solver.
pub fn service() -> (PropertyService, Arc<ChartSolver>) {
    let solver = Arc::new(ChartSolver::default());
    (PropertyService::new(LazySolver::ready(solver.clone())), solver)
}
