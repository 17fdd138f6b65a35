//! Error types for suite construction, parameter discovery, and test execution.
//!
//! Two layers exist:
//!
//! - [`SuiteError`] covers everything that makes a suite unrunnable as a whole: a missing
//!   parameter source, malformed parameter sets, an unreachable constructor, or invalid
//!   member signatures. These are raised at construction time or, for deferred suites, at
//!   discovery time.
//! - [`TestFailure`] is what a hook, constructor, or test body returns when it fails. It
//!   also wraps a [`SuiteError`] once that error travels through the statement chain.
//!
//! Both are `Clone` so that a single failure can be handed to every listener and kept in
//! the run result.

use std::any::Any;
use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// SUITE ERRORS
// ============================================================================

/// Why a member signature was rejected during template validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodProblem {
    ShouldBePublic,
    ShouldBeStatic,
    ShouldNotBeStatic,
    ShouldBeVoid,
}

impl MethodProblem {
    pub fn as_str(&self) -> &'static str {
        match self {
            MethodProblem::ShouldBePublic => "should be public",
            MethodProblem::ShouldBeStatic => "should be static",
            MethodProblem::ShouldNotBeStatic => "should not be static",
            MethodProblem::ShouldBeVoid => "should be void",
        }
    }
}

impl fmt::Display for MethodProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal problems that prevent a suite from being built or from discovering its children.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum SuiteError {
    #[error("No public static parameters method on class {template}")]
    #[diagnostic(
        code(paramsuite::missing_parameter_source),
        help("register a parameter source with `TemplateBuilder::parameters`; it must be public and static")
    )]
    MissingParameterSource { template: String },

    #[error("{template}.{method}() must return a Collection of arrays.")]
    #[diagnostic(
        code(paramsuite::malformed_tuple),
        help("every element returned by a parameter source must be an array of values")
    )]
    MalformedTuple {
        template: String,
        method: String,
        index: usize,
        found: String,
    },

    #[error("Test class {template} should have exactly one public constructor taking {arity} argument(s)")]
    #[diagnostic(code(paramsuite::unreachable_instantiation))]
    UnreachableInstantiation {
        template: String,
        arity: usize,
        reason: String,
    },

    #[error("Method {method}() {problem}")]
    #[diagnostic(code(paramsuite::invalid_method))]
    InvalidMethod {
        template: String,
        method: String,
        problem: MethodProblem,
    },

    #[error("No runnable methods")]
    #[diagnostic(
        code(paramsuite::no_runnable_methods),
        help("add at least one test method with `TemplateBuilder::test`")
    )]
    NoRunnableMethods { template: String },

    #[error("No parameters found for class {template}")]
    #[diagnostic(
        code(paramsuite::no_parameters),
        help("return at least one parameter set, or allow empty suites with `empty_parameters: allow`")
    )]
    NoParameters { template: String },

    #[error("{template}.{method}() failed: {cause}")]
    #[diagnostic(code(paramsuite::parameter_source_failed))]
    ParameterSourceFailed {
        template: String,
        method: String,
        #[source]
        cause: Box<TestFailure>,
    },

    #[error("{} initialization errors in class {template}", .causes.len())]
    #[diagnostic(code(paramsuite::initialization))]
    Initialization {
        template: String,
        #[related]
        causes: Vec<SuiteError>,
    },
}

impl SuiteError {
    /// Collapses a list of validation problems into a single result.
    ///
    /// No problems is success, one problem is returned as-is, several are wrapped in
    /// [`SuiteError::Initialization`].
    pub fn from_problems(template: &str, mut problems: Vec<SuiteError>) -> Result<(), SuiteError> {
        match problems.len() {
            0 => Ok(()),
            1 => Err(problems.remove(0)),
            _ => Err(SuiteError::Initialization {
                template: template.to_string(),
                causes: problems,
            }),
        }
    }

    /// The template identity this error is attributed to.
    pub fn template(&self) -> &str {
        match self {
            SuiteError::MissingParameterSource { template }
            | SuiteError::MalformedTuple { template, .. }
            | SuiteError::UnreachableInstantiation { template, .. }
            | SuiteError::InvalidMethod { template, .. }
            | SuiteError::NoRunnableMethods { template }
            | SuiteError::NoParameters { template }
            | SuiteError::ParameterSourceFailed { template, .. }
            | SuiteError::Initialization { template, .. } => template,
        }
    }

    /// Flattens aggregated initialization errors into their individual causes.
    pub fn into_causes(self) -> Vec<SuiteError> {
        match self {
            SuiteError::Initialization { causes, .. } => {
                causes.into_iter().flat_map(SuiteError::into_causes).collect()
            }
            other => vec![other],
        }
    }
}

// ============================================================================
// TEST FAILURES
// ============================================================================

/// The ways a hook, constructor, or test body can fail.
#[derive(Debug, Clone, Error)]
pub enum TestFailure {
    /// A checked expectation did not hold.
    #[error("{message}")]
    Assertion {
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    },
    /// An unexpected error raised by user code.
    #[error("{message}")]
    Error { message: String },
    /// User code panicked; the payload is kept as text.
    #[error("panicked: {message}")]
    Panic { message: String },
    /// A suite-level problem travelling through the statement chain.
    #[error(transparent)]
    Suite(#[from] SuiteError),
    /// Several failures raised by one statement, e.g. a failing body plus a failing teardown.
    #[error("{} failures", .0.len())]
    Multiple(Vec<TestFailure>),
}

impl TestFailure {
    pub fn assertion(message: impl Into<String>) -> Self {
        TestFailure::Assertion {
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        TestFailure::Error {
            message: message.into(),
        }
    }

    /// Builds the `expected:<E> but was:<A>` failure used by [`ensure_eq!`](crate::ensure_eq).
    pub fn not_equal<E: fmt::Debug + ?Sized, A: fmt::Debug + ?Sized>(
        prefix: Option<&str>,
        expected: &E,
        actual: &A,
    ) -> Self {
        let expected = format!("{:?}", expected);
        let actual = format!("{:?}", actual);
        let message = match prefix {
            Some(prefix) if !prefix.is_empty() => {
                format!("{} expected:<{}> but was:<{}>", prefix, expected, actual)
            }
            _ => format!("expected:<{}> but was:<{}>", expected, actual),
        };
        TestFailure::Assertion {
            message,
            expected: Some(expected),
            actual: Some(actual),
        }
    }

    /// Converts a caught panic payload into a failure.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        TestFailure::Panic { message }
    }

    /// Merges the failures collected by a statement into one result.
    pub fn from_errors(mut errors: Vec<TestFailure>) -> Result<(), TestFailure> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(TestFailure::Multiple(errors)),
        }
    }

    /// True for failed expectations; everything else counts as an unexpected error.
    pub fn is_assertion(&self) -> bool {
        matches!(self, TestFailure::Assertion { .. })
    }

    /// Expected and actual renderings, when the failure carries them.
    pub fn comparison(&self) -> Option<(&str, &str)> {
        match self {
            TestFailure::Assertion {
                expected: Some(expected),
                actual: Some(actual),
                ..
            } => Some((expected, actual)),
            _ => None,
        }
    }

    /// Flattens nested multi-failures and aggregated initialization errors so each cause
    /// can be reported on its own.
    pub fn into_causes(self) -> Vec<TestFailure> {
        match self {
            TestFailure::Multiple(failures) => failures
                .into_iter()
                .flat_map(TestFailure::into_causes)
                .collect(),
            TestFailure::Suite(error) => error
                .into_causes()
                .into_iter()
                .map(TestFailure::Suite)
                .collect(),
            other => vec![other],
        }
    }
}

/// Fails the enclosing test body with `expected:<E> but was:<A>` unless both sides are equal.
///
/// The enclosing function must return `Result<_, TestFailure>`.
///
/// ```rust
/// use paramsuite::{ensure_eq, TestFailure};
///
/// fn check(x: i64) -> Result<(), TestFailure> {
///     ensure_eq!(4, x * 2);
///     Ok(())
/// }
/// assert!(check(2).is_ok());
/// assert_eq!(check(3).unwrap_err().to_string(), "expected:<4> but was:<6>");
/// ```
#[macro_export]
macro_rules! ensure_eq {
    ($expected:expr, $actual:expr $(,)?) => {
        match (&$expected, &$actual) {
            (expected, actual) => {
                if *expected != *actual {
                    return Err($crate::TestFailure::not_equal(None, expected, actual));
                }
            }
        }
    };
    ($expected:expr, $actual:expr, $($msg:tt)+) => {
        match (&$expected, &$actual) {
            (expected, actual) => {
                if *expected != *actual {
                    let prefix = format!($($msg)+);
                    return Err($crate::TestFailure::not_equal(
                        Some(prefix.as_str()),
                        expected,
                        actual,
                    ));
                }
            }
        }
    };
}
