//! Lazy, single-flight start-up of the solver runtime.
//!
//! The first caller that needs the solver starts the loader on a helper
//! thread and waits for its completion signal, at most `timeout`.
//! Concurrent callers wait on the same load.  A caller that gives up
//! leaves the load running, so the next caller picks it up instead of
//! starting another one.  A failed load is reported to everyone waiting
//! on it and retried by the next call.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::backend::coolprop::CoolPropBackend;
use crate::error::{RefcalcError, Result};
use crate::settings::Settings;
use crate::solver::EosSolver;

pub type SharedSolver = Arc<dyn EosSolver>;

type Loader = dyn Fn() -> Result<SharedSolver> + Send + Sync;

enum State {
    Idle,
    Loading,
    Ready(SharedSolver),
    Failed(RefcalcError),
}

struct Inner {
    state: Mutex<State>,
    signal: Condvar,
}

/// A solver that is loaded on first use.
pub struct LazySolver {
    inner: Arc<Inner>,
    loader: Arc<Loader>,
    timeout: Duration,
}

impl LazySolver {
    pub fn new<F>(loader: F, timeout: Duration) -> Self
    where
        F: Fn() -> Result<SharedSolver> + Send + Sync + 'static,
    {
        Self::with_state(State::Idle, Arc::new(loader), timeout)
    }

    /// A solver that is ready from the start.
    pub fn ready(solver: impl EosSolver + 'static) -> Self {
        let solver: SharedSolver = Arc::new(solver);
        let again = solver.clone();
        Self::with_state(
            State::Ready(solver),
            Arc::new(move || Ok(again.clone())),
            Duration::ZERO,
        )
    }

    /// CoolProp, located through `settings` on first use.
    pub fn coolprop(settings: Settings) -> Self {
        let timeout = settings.init_timeout;
        Self::new(
            move || CoolPropBackend::discover(&settings).map(|b| Arc::new(b) as SharedSolver),
            timeout,
        )
    }

    fn with_state(state: State, loader: Arc<Loader>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner { state: Mutex::new(state), signal: Condvar::new() }),
            loader,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_ready(&self) -> bool {
        let state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(*state, State::Ready(_))
    }

    /// The solver, loading it first if needed.
    pub fn get(&self) -> Result<SharedSolver> {
        let mut state = self.inner.state.lock().map_err(|_| {
            RefcalcError::Solver("solver start-up lock is poisoned".into())
        })?;

        if let State::Ready(solver) = &*state {
            return Ok(solver.clone());
        }
        if matches!(*state, State::Idle | State::Failed(_)) {
            self.spawn_loader()?;
            *state = State::Loading;
        }

        let (state, _) = self
            .inner
            .signal
            .wait_timeout_while(state, self.timeout, |s| matches!(s, State::Loading))
            .map_err(|_| RefcalcError::Solver("solver start-up lock is poisoned".into()))?;

        match &*state {
            State::Ready(solver) => Ok(solver.clone()),
            State::Failed(e) => Err(e.clone()),
            State::Loading | State::Idle => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "solver not ready in time");
                Err(RefcalcError::InitializationTimeout { millis: self.timeout.as_millis() })
            }
        }
    }

    fn spawn_loader(&self) -> Result<()> {
        let inner = self.inner.clone();
        let loader = self.loader.clone();
        std::thread::Builder::new()
            .name("refcalc-solver-init".into())
            .spawn(move || {
                let outcome = catch_unwind(AssertUnwindSafe(|| loader())).unwrap_or_else(|_| {
                    Err(RefcalcError::Solver("solver loader panicked".into()))
                });
                let mut state = inner.state.lock().unwrap_or_else(PoisonError::into_inner);
                *state = match outcome {
                    Ok(solver) => State::Ready(solver),
                    Err(e) => {
                        tracing::warn!(error = %e, "solver failed to load");
                        State::Failed(e)
                    }
                };
                inner.signal.notify_all();
            })
            .map(|_| ())
            .map_err(|e| RefcalcError::Solver(format!("could not start the solver loader: {e}")))
    }
}
