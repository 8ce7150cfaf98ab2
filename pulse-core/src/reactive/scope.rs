//! Effect Scopes
//!
//! A scope is an arena that owns the effects created while it is active.
//! Disposing the scope disposes every effect it owns, which is how timing
//! operators (debounce, sample, merge) are torn down: their bridging
//! effects belong to whichever scope was active when the operator was
//! built.
//!
//! Effects created outside any scope are adopted by a process-wide root
//! scope and run until individually disposed.

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::debug;

use super::effect::Effect;

struct ScopeInner {
    effects: Mutex<Vec<Effect>>,
}

thread_local! {
    static ACTIVE_SCOPES: RefCell<Vec<Arc<ScopeInner>>> = RefCell::new(Vec::new());
}

static ROOT: OnceLock<Mutex<Vec<Effect>>> = OnceLock::new();

fn root() -> &'static Mutex<Vec<Effect>> {
    ROOT.get_or_init(|| Mutex::new(Vec::new()))
}

/// Adopt an effect into the innermost active scope, or the root scope if
/// none is active on this thread.
pub(crate) fn adopt(effect: Effect) {
    let adopted = ACTIVE_SCOPES.with(|scopes| {
        if let Some(scope) = scopes.borrow().last() {
            scope.effects.lock().push(effect.clone());
            true
        } else {
            false
        }
    });

    if !adopted {
        root().lock().push(effect);
    }
}

/// An owning arena for effects.
///
/// # Example
///
/// ```rust,ignore
/// let scope = Scope::new();
/// let debounced = scope.run(|| debounce(source, delay, &scheduler));
/// // ... later: dropping `scope` stops the debounce bridging effect.
/// ```
pub struct Scope {
    inner: Arc<ScopeInner>,
}

impl Scope {
    /// Create a new, empty scope.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                effects: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Run `f` with this scope active: every effect created inside `f`
    /// (directly or by an operator) is owned by this scope.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = ScopeGuard::enter(self.inner.clone());
        f()
    }

    /// Dispose every effect owned by this scope.
    pub fn dispose(&self) {
        let effects = {
            let mut guard = self.inner.effects.lock();
            std::mem::take(&mut *guard)
        };

        debug!(effects = effects.len(), "scope disposed");
        for effect in effects {
            effect.dispose();
        }
    }

    /// Number of effects currently owned by this scope.
    pub fn effect_count(&self) -> usize {
        self.inner.effects.lock().len()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Guard that pops the scope stack on exit, panic included.
struct ScopeGuard;

impl ScopeGuard {
    fn enter(inner: Arc<ScopeInner>) -> Self {
        ACTIVE_SCOPES.with(|scopes| scopes.borrow_mut().push(inner));
        Self
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        ACTIVE_SCOPES.with(|scopes| {
            scopes.borrow_mut().pop();
        });
    }
}
