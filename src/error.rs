use thiserror::Error;

/// Remediation hint attached to [`RefcalcError::PhysicallyInfinite`].
pub const INFINITE_RESULT_NOTE: &str = "If the pressures are in an expected range that this \
should work, please check your refrigerant type works in CoolProp. \"R507\" for example is \
not supported, as it needs to be \"R507a\"";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RefcalcError {
    /// A temperature or pressure unit symbol that is not recognized.
    #[error("Unsupported {kind} unit: {symbol}")]
    UnsupportedUnit { kind: &'static str, symbol: String },

    /// A configuration field carried a unit outside the allowed set.
    #[error("Invalid {field}. Must be {allowed}")]
    InvalidUnit { field: &'static str, allowed: &'static str },

    /// No refrigerant at first initialization.
    #[error("Refrigerant must be specified {context}")]
    MissingRefrigerant { context: &'static str },

    /// The refrigerant identifier cannot be passed to the solver.
    #[error("Invalid refrigerant type")]
    InvalidRefrigerantType,

    /// The solver runtime did not become ready in time.
    #[error("CoolProp initialization timed out after {millis} ms")]
    InitializationTimeout { millis: u128 },

    #[error("{0}")]
    UnsupportedOperation(String),

    /// The solver returned `+Infinity` for both the derived delta and the
    /// saturation point, usually because it does not know the fluid name.
    #[error("{quantity} is infinity")]
    PhysicallyInfinite { quantity: &'static str },

    /// The CoolProp shared library could not be located or loaded.
    #[error("CoolProp library not found: {0}")]
    LibraryNotFound(String),

    /// A required symbol is missing from the loaded library.
    #[error("Symbol not found in CoolProp library: {0}")]
    SymbolNotFound(String),

    /// Invalid or out‑of‑range input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level solver failure.
    #[error("Solver failure: {0}")]
    Solver(String),
}

impl RefcalcError {
    /// Optional remediation note surfaced next to the error message.
    pub fn note(&self) -> Option<&'static str> {
        match self {
            Self::PhysicallyInfinite { .. } => Some(INFINITE_RESULT_NOTE),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RefcalcError>;
