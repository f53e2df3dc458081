//! # refcalc
//!
//! Refrigerant superheat, subcooling and saturation calculations on top
//! of [CoolProp](http://www.coolprop.org/), with tabulated saturation
//! curves for blends CoolProp does not model.
//!
//! ## Highlights
//!
//! * **Superheat / subcooling**: `service.calculate_superheat(&StateRequest::new(t, p))`
//! * **Saturation lookups**: bubble or dew side, from CoolProp or a table
//! * **Blend tables**: R448A, R449A and R407F built in, more via [`CustomTables`]
//! * **Configurable units**: K / °C / °F and Pa, kPa, bar, psi in gauge or absolute
//! * **Lazy start-up**: CoolProp is loaded on the first call that needs it,
//!   bounded by a timeout
//! * **Thread-safe**: a global mutex serializes calls into CoolProp
//!
//! ## Quick example
//!
//! ```no_run
//! use refcalc::{ConfigPatch, PropertyService, StateRequest};
//!
//! let service = PropertyService::from_env();
//! service.init(&ConfigPatch::new().refrigerant("R744").temp_unit("C").pressure_unit("bar"));
//!
//! // 5 °C at 23.84 barg (dew point about 0 °C)
//! let result = service.calculate_superheat(&StateRequest::new(5.0, 23.84));
//! match result.success() {
//!     Some(report) => println!("{report}"),
//!     None => eprintln!("{}", result.message().unwrap_or_default()),
//! }
//! ```
//!
//! ## Units
//!
//! Bare pressure symbols (`Pa`, `kPa`, `bar`, `psi`) and the `g`-suffixed
//! ones are gauge; the `a`-suffixed ones are absolute.  Temperature
//! differences are reported in the temperature unit's degree size:
//!
//! ```
//! use refcalc::converter::{TempUnit, delta_temperature_from_kelvin};
//!
//! assert_eq!(delta_temperature_from_kelvin(10.0, TempUnit::Fahrenheit), 18.0);
//! ```
//!
//! ## Configuration
//!
//! `COOLPROP_PATH` and `REFCALC_INIT_TIMEOUT_MS` are read from the
//! environment or a `.env` file, see [`Settings`].  Logging goes through
//! `tracing`; install any subscriber to see it.

// ── Modules ──────────────────────────────────────────────────────────
mod backend;
pub mod config;
pub mod converter;
pub mod error;
pub mod properties;
pub mod runtime;
pub mod saturation;
pub mod service;
pub mod settings;
pub mod solver;
pub mod sys;
pub mod table;

// ── Public re-exports ────────────────────────────────────────────────
pub use backend::coolprop::CoolPropBackend;
pub use config::{ConfigPatch, ConfigSnapshot};
pub use converter::{Converter, PressUnit, TempUnit, UnitSystem};
pub use error::{RefcalcError, Result};
pub use properties::{
    CalculationResult, ConfigUpdate, PressureRequest, PropertiesReport, PropertyBundle,
    PropertyUnits, SaturationPressureReport, SaturationTemperatureReport, StateRequest,
    StatusMessage, SubcoolingReport, SuperheatReport, TemperatureRequest, UnitLabels,
};
pub use runtime::{LazySolver, SharedSolver};
pub use service::{PropertyService, shared};
pub use settings::Settings;
pub use solver::{EosSolver, PropCode};
pub use table::{Branch, CustomTables, SaturationPoint, SaturationTable};
