use core::fmt;

use scrollcue::{AnimationRuntime, ScopeId};

use crate::Detach;

/// Extra teardown work returned by a setup callback, run before the scope is closed.
pub struct Cleanup(Box<dyn FnOnce(&mut AnimationRuntime) + Send>);

impl Cleanup {
    pub fn new(f: impl FnOnce(&mut AnimationRuntime) + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn run(self, rt: &mut AnimationRuntime) {
        (self.0)(rt)
    }
}

impl From<Detach> for Cleanup {
    fn from(detach: Detach) -> Self {
        Self::new(move |rt| {
            detach.detach(rt);
        })
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cleanup(..)")
    }
}

/// Ties the transitions a component registers to that component's lifecycle.
///
/// The host owns one binder per component and calls:
/// - `run(rt, deps, setup)` after every render commit
/// - `unmount(rt)` when the component goes away
///
/// `setup` runs on the first call and again whenever `deps` differ from the previous run. Each
/// run happens inside a fresh scope; before a re-run (and on unmount) the previous scope is
/// closed, which cancels its tweens, releases its scroll bindings, detaches its listeners and
/// restores the properties it animated.
pub struct LifecycleBinder<D> {
    deps: Option<D>,
    scope: Option<ScopeId>,
    cleanup: Option<Cleanup>,
}

impl<D> Default for LifecycleBinder<D> {
    fn default() -> Self {
        Self {
            deps: None,
            scope: None,
            cleanup: None,
        }
    }
}

impl<D: PartialEq> LifecycleBinder<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    /// Scope of the current run.
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    pub fn deps(&self) -> Option<&D> {
        self.deps.as_ref()
    }

    /// Runs `setup` unless it already ran with equal `deps`. Returns whether it ran.
    ///
    /// If `setup` fails, everything it registered before failing is torn down and the error is
    /// returned unchanged; the next call runs `setup` again regardless of `deps`.
    pub fn run<E>(
        &mut self,
        rt: &mut AnimationRuntime,
        deps: D,
        setup: impl FnOnce(&mut AnimationRuntime) -> Result<Option<Cleanup>, E>,
    ) -> Result<bool, E> {
        if self.scope.is_some() && self.deps.as_ref() == Some(&deps) {
            return Ok(false);
        }

        self.teardown(rt);
        let scope = rt.open_scope();
        match rt.run_in_scope(scope, setup) {
            Ok(cleanup) => {
                sc_trace!(scope = scope.0, "binder setup ran");
                self.scope = Some(scope);
                self.deps = Some(deps);
                self.cleanup = cleanup;
                Ok(true)
            }
            Err(err) => {
                sc_debug!(scope = scope.0, "binder setup failed, reverting");
                rt.close_scope(scope);
                Err(err)
            }
        }
    }

    /// Tears down the current run. Returns `false` if nothing was mounted.
    pub fn unmount(&mut self, rt: &mut AnimationRuntime) -> bool {
        self.teardown(rt)
    }

    fn teardown(&mut self, rt: &mut AnimationRuntime) -> bool {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.run(rt);
        }
        self.deps = None;
        match self.scope.take() {
            Some(scope) => rt.close_scope(scope),
            None => false,
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for LifecycleBinder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleBinder")
            .field("deps", &self.deps)
            .field("scope", &self.scope)
            .field("has_cleanup", &self.cleanup.is_some())
            .finish()
    }
}
