//! Composable run phases.
//!
//! A [`Statement`] is a deferred action. Each phase is a function from an inner statement
//! to an outer one, so a suite's run is assembled inside-out and evaluated outside-in:
//!
//! ```text
//! with_after_classes(with_before_classes(with_parameters(children)))
//! ```
//!
//! Evaluation order is therefore setup hooks, discovery, children, teardown hooks. The
//! teardown phase evaluates its inner statement under [`guarded`], keeps the result, runs
//! every teardown hook, and only then reports; a failure or panic further in can never
//! skip teardown.

use std::panic::{self, AssertUnwindSafe};

use crate::errors::{SuiteError, TestFailure};
use crate::template::Hook;

pub type Statement<'a> = Box<dyn FnOnce() -> Result<(), TestFailure> + 'a>;

/// Runs `action`, turning a panic into [`TestFailure::Panic`].
pub fn guarded<F>(action: F) -> Result<(), TestFailure>
where
    F: FnOnce() -> Result<(), TestFailure>,
{
    match panic::catch_unwind(AssertUnwindSafe(action)) {
        Ok(result) => result,
        Err(payload) => Err(TestFailure::from_panic(payload)),
    }
}

/// Runs every setup hook in order, then `next`. The first failing hook stops the chain.
pub fn with_before_classes<'a>(next: Statement<'a>, hooks: &'a [Hook]) -> Statement<'a> {
    if hooks.is_empty() {
        return next;
    }
    Box::new(move || {
        for hook in hooks {
            tracing::trace!(hook = hook.name(), kind = %hook.kind(), "running hook");
            guarded(|| hook.invoke())?;
        }
        next()
    })
}

/// Runs `next`, then every teardown hook regardless of what happened, and reports all
/// collected failures together.
pub fn with_after_classes<'a>(next: Statement<'a>, hooks: &'a [Hook]) -> Statement<'a> {
    if hooks.is_empty() {
        return next;
    }
    Box::new(move || {
        let mut errors = Vec::new();
        if let Err(e) = guarded(next) {
            errors.push(e);
        }
        for hook in hooks {
            tracing::trace!(hook = hook.name(), kind = %hook.kind(), "running hook");
            if let Err(e) = guarded(|| hook.invoke()) {
                errors.push(e);
            }
        }
        TestFailure::from_errors(errors)
    })
}

/// Runs `discover` and, only if it succeeds, `next`.
pub fn with_parameters<'a, D>(next: Statement<'a>, discover: D) -> Statement<'a>
where
    D: FnOnce() -> Result<(), SuiteError> + 'a,
{
    Box::new(move || {
        discover()?;
        next()
    })
}
