//! Template validation.
//!
//! Class-level checks run when a suite is built, in both discovery modes. Instantiation
//! checks need the tuple arity, so they run where children are created: at construction
//! for eager suites, at discovery for deferred ones.

use crate::errors::{MethodProblem, SuiteError};
use crate::template::{Hook, Signature, Template, Visibility};

/// Hooks must be public static unit-returning members, and an eligible parameter source
/// must exist.
pub fn validate_class<T>(template: &Template<T>) -> Result<(), SuiteError> {
    let mut problems = Vec::new();
    for hook in template.setup_class().iter().chain(template.teardown_class()) {
        check_hook(template.name(), hook, &mut problems);
    }
    if template.parameter_source().is_none() {
        problems.push(SuiteError::MissingParameterSource {
            template: template.name().to_string(),
        });
    }
    SuiteError::from_problems(template.name(), problems)
}

/// A public constructor taking `arity` values must exist, and the test methods must be
/// public, non-static, unit-returning, and at least one.
pub fn validate_instantiation<T>(template: &Template<T>, arity: usize) -> Result<(), SuiteError> {
    let name = template.name();
    let mut problems = Vec::new();

    let unreachable = |reason: String| SuiteError::UnreachableInstantiation {
        template: name.to_string(),
        arity,
        reason,
    };
    match template.constructor() {
        None => problems.push(unreachable("no constructor is declared".to_string())),
        Some(c) if c.visibility() != Visibility::Public => problems.push(unreachable(format!(
            "the constructor is {:?}",
            c.visibility()
        ))),
        Some(c) if c.arity() != arity => problems.push(unreachable(format!(
            "the constructor takes {} argument(s)",
            c.arity()
        ))),
        Some(_) => {}
    }

    if template.tests().is_empty() {
        problems.push(SuiteError::NoRunnableMethods {
            template: name.to_string(),
        });
    }
    for test in template.tests() {
        for problem in signature_problems(test.signature(), false) {
            problems.push(SuiteError::InvalidMethod {
                template: name.to_string(),
                method: test.name().to_string(),
                problem,
            });
        }
    }
    SuiteError::from_problems(name, problems)
}

fn check_hook(template: &str, hook: &Hook, problems: &mut Vec<SuiteError>) {
    for problem in signature_problems(hook.signature(), true) {
        problems.push(SuiteError::InvalidMethod {
            template: template.to_string(),
            method: hook.name().to_string(),
            problem,
        });
    }
}

fn signature_problems(signature: Signature, want_static: bool) -> Vec<MethodProblem> {
    let mut problems = Vec::new();
    if !signature.is_public() {
        problems.push(MethodProblem::ShouldBePublic);
    }
    match (want_static, signature.is_static) {
        (true, false) => problems.push(MethodProblem::ShouldBeStatic),
        (false, true) => problems.push(MethodProblem::ShouldNotBeStatic),
        _ => {}
    }
    if !signature.returns_unit {
        problems.push(MethodProblem::ShouldBeVoid);
    }
    problems
}
