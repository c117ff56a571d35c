//! Process runtime.
//!
//! Engine initialization and the MIB tree are shared by every call in the
//! process. [`Runtime`] reference counts active callers: the first
//! [`enter`](Runtime::enter) initializes the engine, the last
//! [`leave`](Runtime::leave) shuts it down. The counter is lock-free; the
//! init and teardown bodies and all MIB access run under one mutex.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::engine::{Engine, UdpEngine};
use crate::error::Result;
use crate::mib::Mib;
use crate::ops;
use crate::result::SnmpResult;

/// Reference-counted engine lifecycle plus the MIB critical section.
pub struct Runtime {
    engine: Arc<dyn Engine>,
    count: AtomicUsize,
    initialized: AtomicBool,
    mib: Mutex<Option<Mib>>,
}

impl Runtime {
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            count: AtomicUsize::new(0),
            initialized: AtomicBool::new(false),
            mib: Mutex::new(None),
        }
    }

    /// The process-wide runtime backed by [`UdpEngine`].
    pub fn global() -> &'static Runtime {
        static GLOBAL: OnceLock<Runtime> = OnceLock::new();
        GLOBAL.get_or_init(|| Runtime::new(Arc::new(UdpEngine)))
    }

    pub(crate) fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Mib>> {
        self.mib.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an active caller, initializing the engine if needed.
    pub fn enter(&self, app: &str) {
        let prev = self.count.fetch_add(1, Ordering::SeqCst);
        if prev == 0 || !self.initialized.load(Ordering::Acquire) {
            let mut mib = self.lock();
            if !self.initialized.load(Ordering::Acquire) {
                tracing::debug!(target: "easy_snmp::runtime", { app }, "initializing engine");
                *mib = Some(self.engine.init(app));
                self.initialized.store(true, Ordering::Release);
            }
        }
    }

    /// Unregister a caller; the last one out shuts the engine down.
    pub fn leave(&self, app: &str) {
        let prev = match self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| c.checked_sub(1))
        {
            Ok(prev) => prev,
            Err(_) => {
                tracing::warn!(target: "easy_snmp::runtime", { app }, "leave without matching enter");
                return;
            }
        };
        if prev == 1 {
            let mut mib = self.lock();
            // a new caller may have entered since the decrement
            if self.count.load(Ordering::SeqCst) == 0 && self.initialized.load(Ordering::Acquire) {
                tracing::debug!(target: "easy_snmp::runtime", { app }, "shutting down engine");
                self.engine.shutdown(app);
                *mib = None;
                self.initialized.store(false, Ordering::Release);
            }
        }
    }

    /// [`enter`](Self::enter) now, [`leave`](Self::leave) on drop.
    pub fn guard(&self, app: &str) -> RuntimeGuard<'_> {
        self.enter(app);
        RuntimeGuard {
            runtime: self,
            app: app.to_string(),
        }
    }

    pub fn reference_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Run `f` against the MIB tree inside the critical section.
    ///
    /// Outside an active epoch a transient built-in tree is used.
    pub fn with_mib<R>(&self, f: impl FnOnce(&Mib) -> R) -> R {
        let guard = self.lock();
        match guard.as_ref() {
            Some(mib) => f(mib),
            None => f(&Mib::builtin()),
        }
    }

    pub fn get<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<SnmpResult>> {
        ops::get::get(self, tokens)
    }

    pub fn get_next<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<SnmpResult>> {
        ops::get::get_next(self, tokens)
    }

    pub fn get_bulk<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<SnmpResult>> {
        ops::bulk::get_bulk(self, tokens)
    }

    pub fn walk<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<SnmpResult>> {
        ops::walk::walk(self, tokens)
    }

    pub fn bulk_walk<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<SnmpResult>> {
        ops::bulk::bulk_walk(self, tokens)
    }

    pub fn set<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<SnmpResult>> {
        ops::set::set(self, tokens)
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("count", &self.reference_count())
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

/// Holds one reference on a [`Runtime`].
pub struct RuntimeGuard<'a> {
    runtime: &'a Runtime,
    app: String,
}

impl RuntimeGuard<'_> {
    pub fn runtime(&self) -> &Runtime {
        self.runtime
    }
}

impl Drop for RuntimeGuard<'_> {
    fn drop(&mut self) {
        self.runtime.leave(&self.app);
    }
}
