//! paramsuite: data-driven test suites.
//!
//! A [`Template`] declares the test members a reflective runner would find on an annotated
//! class: setup and teardown hooks, parameter sources, a constructor, and test methods. A
//! [`ParameterizedSuite`] expands it into one child per parameter tuple, either while it
//! is built ([`Discovery::Eager`]) or at run time after the setup hooks have run
//! ([`Discovery::Deferred`]).
//!
//! ```rust
//! use paramsuite::{ensure_eq, Core, Request, Runner, RunnerConfig, Template};
//! use serde_json::json;
//!
//! let template = Template::builder("DoubleTest")
//!     .deferred()
//!     .parameters("data", || Ok(vec![json!([1, 2]), json!([4, 8])]))
//!     .constructor(2, |args| args.decode_all::<(i64, i64)>())
//!     .test("doubles", |&(n, twice): &(i64, i64)| {
//!         ensure_eq!(twice, n * 2);
//!         Ok(())
//!     })
//!     .build();
//!
//! let runner = Request::template(template, &RunnerConfig::default());
//! assert_eq!(runner.test_count(), 1);
//! let result = Core::new().run(runner.as_ref());
//! assert_eq!(result.run_count(), 2);
//! assert!(result.was_successful());
//! ```

pub use crate::child::{ChildUnit, TemplateFactory, TestInstanceFactory};
pub use crate::config::{ColorMode, ConfigError, EmptyParameterPolicy, RunnerConfig};
pub use crate::engine::{Core, Request};
pub use crate::description::{Description, NO_TESTS_LABEL};
pub use crate::errors::{MethodProblem, SuiteError, TestFailure};
pub use crate::notification::{Failure, Outcome, RunListener, RunNotifier, RunResult};
pub use crate::params::ParameterTuple;
pub use crate::registry::SuiteRegistry;
pub use crate::runner::{CompositeRunner, ErrorReportingRunner, Runner};
pub use crate::suite::{ParameterizedSuite, PlanState};
pub use crate::template::{Discovery, Signature, Template, TemplateBuilder, Visibility};

pub mod child;
pub mod cli;
pub mod config;
pub mod demos;
pub mod description;
pub mod engine;
pub mod errors;
pub mod notification;
pub mod params;
pub mod registry;
pub mod runner;
pub mod statement;
pub mod suite;
pub mod template;
pub mod validation;
