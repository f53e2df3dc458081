use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::*;
use crate::settings::Settings;
use crate::solver::{EosSolver, PropCode};
use crate::sys::CoolPropLibrary;

// ── Global lock (CoolProp keeps process-global state) ───────────────
static COOLPROP_LOCK: Mutex<()> = Mutex::new(());

// ── Backend ─────────────────────────────────────────────────────────

/// [`EosSolver`] backed by the CoolProp shared library.
pub struct CoolPropBackend {
    lib: CoolPropLibrary,
    /// Where the library was loaded from (`None` = system search path).
    origin: Option<PathBuf>,
}

impl CoolPropBackend {
    // ================================================================
    //  Constructors
    // ================================================================

    /// Locate and load CoolProp as described by `settings`.
    ///
    /// Search order: `COOLPROP_PATH` (a directory or the library file
    /// itself), the standard install directories, then the system loader
    /// search path.
    pub fn discover(settings: &Settings) -> Result<Self> {
        let mut tried = Vec::<String>::new();

        if let Some(path) = &settings.coolprop_path {
            if path.is_file() {
                return Self::from_file(path);
            }
            if path.is_dir() {
                match Self::from_dir(path) {
                    Ok(backend) => return Ok(backend),
                    Err(e) => tried.push(format!("COOLPROP_PATH={} ({e})", path.display())),
                }
            } else {
                tried.push(format!("COOLPROP_PATH={} (does not exist)", path.display()));
            }
        }

        for dir in Self::standard_dirs() {
            let dir = Path::new(dir);
            if !dir.exists() {
                tried.push(format!("{} (not found)", dir.display()));
                continue;
            }
            if let Ok(backend) = Self::from_dir(dir) {
                return Ok(backend);
            }
            tried.push(format!("{} (no loadable library)", dir.display()));
        }

        match CoolPropLibrary::load_from_system() {
            Ok(lib) => {
                tracing::info!("loaded CoolProp from the system search path");
                Ok(Self { lib, origin: None })
            }
            Err(_) => Err(RefcalcError::LibraryNotFound(format!(
                "CoolProp library not found. Tried:\n  - {}\n  - system search path\n\
                 Set COOLPROP_PATH to the directory containing the CoolProp shared library.",
                tried.join("\n  - ")
            ))),
        }
    }

    /// Load from a directory containing the library.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let lib = CoolPropLibrary::load_from_dir(dir)?;
        tracing::info!(path = %dir.display(), "loaded CoolProp");
        Ok(Self { lib, origin: Some(dir.to_path_buf()) })
    }

    /// Load from the exact library file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let lib = CoolPropLibrary::load_from_file(path)?;
        tracing::info!(path = %path.display(), "loaded CoolProp");
        Ok(Self { lib, origin: Some(path.to_path_buf()) })
    }

    fn standard_dirs() -> &'static [&'static str] {
        if cfg!(target_os = "windows") {
            &[r"C:\Program Files\CoolProp", r"C:\Program Files (x86)\CoolProp"]
        } else if cfg!(target_os = "macos") {
            &["/opt/homebrew/lib", "/usr/local/lib", "/opt/coolprop"]
        } else {
            &["/usr/local/lib", "/usr/lib", "/opt/coolprop"]
        }
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    // ================================================================
    //  Helpers
    // ================================================================

    /// Acquire the global CoolProp lock, recovering gracefully from
    /// poisoning instead of panicking.
    fn lock_coolprop() -> Result<MutexGuard<'static, ()>> {
        COOLPROP_LOCK.lock().map_err(|_| {
            RefcalcError::Solver(
                "CoolProp global lock is poisoned (a previous call panicked)".into(),
            )
        })
    }

    /// Ensure a value is a finite number (not NaN, not ±Infinity).
    fn validate_finite(name: PropCode, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(RefcalcError::InvalidInput(format!(
                "{name} must be a finite number, got {value}"
            )));
        }
        Ok(())
    }

    fn code_string(code: PropCode) -> CString {
        // Property codes are ASCII letters, never NUL.
        CString::new(code.code().to_string()).unwrap_or_default()
    }
}

impl EosSolver for CoolPropBackend {
    fn props_si(
        &self,
        output: PropCode,
        in1: PropCode, v1: f64,
        in2: PropCode, v2: f64,
        fluid: &str,
    ) -> Result<f64> {
        Self::validate_finite(in1, v1)?;
        Self::validate_finite(in2, v2)?;
        let fluid_c = CString::new(fluid).map_err(|_| RefcalcError::InvalidRefrigerantType)?;
        let (out_c, in1_c, in2_c) =
            (Self::code_string(output), Self::code_string(in1), Self::code_string(in2));

        let _guard = Self::lock_coolprop()?;
        // SAFETY: calls are serialized by COOLPROP_LOCK and every
        // string is NUL-terminated.
        let value = unsafe { self.lib.PropsSI(&out_c, &in1_c, v1, &in2_c, v2, &fluid_c) };
        if value.is_infinite() {
            // SAFETY: still under the lock.
            let reason = unsafe { self.lib.global_param_string("errstring") }.unwrap_or_default();
            tracing::debug!(%output, %in1, v1, %in2, v2, fluid, reason = %reason, "CoolProp returned infinity");
        }
        Ok(value)
    }
}
