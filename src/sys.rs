//! Low-level FFI bindings for the CoolProp shared library.
//!
//! The library is loaded at runtime via [`libloading`] and the entry
//! points are resolved once, so calls cost a plain indirect jump.

use std::ffi::CString;
use std::os::raw::{c_char, c_double, c_int, c_long};
use std::path::Path;

use libloading::Library;

use crate::error::{RefcalcError, Result};

/// Size of the buffer handed to `get_global_param_string`.
pub const ERRSTRING_LEN: usize = 1000;

// ── Function pointer type aliases ───────────────────────────────────

/// PropsSI(output, name1, prop1, name2, prop2, fluid)
type FnPropsSi = unsafe extern "C" fn(
    *const c_char,
    *const c_char,
    c_double,
    *const c_char,
    c_double,
    *const c_char,
) -> c_double;

/// get_global_param_string(param, output, n)
type FnGlobalParam = unsafe extern "C" fn(*const c_char, *mut c_char, c_int) -> c_long;

// ── Dynamic library wrapper ─────────────────────────────────────────

/// A loaded CoolProp library with pre-resolved entry points.
pub struct CoolPropLibrary {
    /// Keeps the library mapped; the function pointers borrow from it.
    _lib: Library,

    fn_props_si: FnPropsSi,
    /// Optional: only used to enrich log messages.
    fn_global_param: Option<FnGlobalParam>,
}

impl CoolPropLibrary {
    fn resolve<T: Copy>(lib: &Library, name: &[u8]) -> Result<T> {
        // SAFETY: the symbol names and type aliases above follow the
        // CoolProp C API (CoolPropLib.h).
        let sym: libloading::Symbol<T> = unsafe { lib.get(name) }.map_err(|_| {
            let display =
                String::from_utf8_lossy(&name[..name.len().saturating_sub(1)]).to_string();
            RefcalcError::SymbolNotFound(display)
        })?;
        Ok(*sym)
    }

    fn resolve_all(lib: Library) -> Result<Self> {
        Ok(Self {
            fn_props_si: Self::resolve(&lib, b"PropsSI\0")?,
            fn_global_param: Self::resolve(&lib, b"get_global_param_string\0").ok(),
            _lib: lib,
        })
    }

    /// File names the library is published under on this platform.
    pub fn candidate_names() -> &'static [&'static str] {
        if cfg!(target_os = "windows") {
            &["CoolProp.dll", "coolprop.dll", "libCoolProp.dll"]
        } else if cfg!(target_os = "macos") {
            &["libCoolProp.dylib", "libcoolprop.dylib"]
        } else {
            &["libCoolProp.so", "libcoolprop.so", "libCoolProp.so.6"]
        }
    }

    /// Load the library from a directory that contains it, falling back
    /// to the system loader search path (PATH / LD_LIBRARY_PATH).
    ///
    /// If a candidate file exists but cannot be loaded (e.g. architecture
    /// mismatch), the next candidate is tried.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let candidates = Self::candidate_names();
        let mut errors = Vec::new();

        for name in candidates {
            let full = dir.join(name);
            if full.exists() {
                // SAFETY: loading a shared library runs its initializers;
                // CoolProp's are self-contained.
                match unsafe { Library::new(&full) } {
                    Ok(lib) => return Self::resolve_all(lib),
                    Err(e) => errors.push(format!("{}: {e}", full.display())),
                }
            }
        }

        Self::load_from_system().map_err(|_| {
            let detail = if errors.is_empty() {
                format!("No CoolProp library found in {} (tried: {candidates:?})", dir.display())
            } else {
                format!(
                    "CoolProp library found but could not be loaded:\n  - {}",
                    errors.join("\n  - ")
                )
            };
            RefcalcError::LibraryNotFound(detail)
        })
    }

    /// Load the library from an exact file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        // SAFETY: see `load_from_dir`.
        let lib = unsafe { Library::new(path) }
            .map_err(|e| RefcalcError::LibraryNotFound(format!("{}: {e}", path.display())))?;
        Self::resolve_all(lib)
    }

    /// Load the library by bare name through the system loader.
    pub fn load_from_system() -> Result<Self> {
        let candidates = Self::candidate_names();
        for name in candidates {
            // SAFETY: see `load_from_dir`.
            if let Ok(lib) = unsafe { Library::new(*name) } {
                return Self::resolve_all(lib);
            }
        }
        Err(RefcalcError::LibraryNotFound(format!(
            "no CoolProp library on the system search path (tried: {candidates:?})"
        )))
    }

    // ── CoolProp function wrappers ──────────────────────────────────

    /// High-level `PropsSI`.  CoolProp signals failure by returning
    /// `HUGE_VAL` (`+Infinity`).
    ///
    /// # Safety
    /// The library is not reentrant: callers must serialize calls.
    #[allow(non_snake_case)]
    pub unsafe fn PropsSI(
        &self,
        output: &CString,
        name1: &CString,
        prop1: f64,
        name2: &CString,
        prop2: f64,
        fluid: &CString,
    ) -> f64 {
        unsafe {
            (self.fn_props_si)(
                output.as_ptr(),
                name1.as_ptr(),
                prop1,
                name2.as_ptr(),
                prop2,
                fluid.as_ptr(),
            )
        }
    }

    /// Read a global string parameter such as `"errstring"`.  Returns
    /// `None` when the symbol is unavailable or the call fails.
    ///
    /// # Safety
    /// Same as [`PropsSI`](Self::PropsSI).
    pub unsafe fn global_param_string(&self, param: &str) -> Option<String> {
        let f = self.fn_global_param?;
        let param = CString::new(param).ok()?;
        let mut buffer = vec![0 as c_char; ERRSTRING_LEN];
        let ok = unsafe { f(param.as_ptr(), buffer.as_mut_ptr(), ERRSTRING_LEN as c_int) };
        (ok == 1).then(|| from_c_string(&buffer))
    }
}

// ── String helpers ──────────────────────────────────────────────────

/// Convert a null-terminated `c_char` buffer into a trimmed `String`.
pub fn from_c_string(buffer: &[c_char]) -> String {
    let bytes: Vec<u8> = buffer
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).trim().to_string()
}
