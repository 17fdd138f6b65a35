//! Parameterized suites.
//!
//! A [`ParameterizedSuite`] runs every test method of a [`Template`] once per parameter
//! tuple. It comes in two configurations:
//!
//! - [`Discovery::Eager`] reads the parameter source while the suite is constructed. Any
//!   problem with the parameters is a construction error, and the description is always
//!   the real tree.
//! - [`Discovery::Deferred`] reads the parameter source at run time, after the setup-class
//!   hooks. Until then the child list is empty and [`ParameterizedSuite::description`]
//!   returns a placeholder tree so that pre-run queries stay well-formed.
//!
//! Running a suite evaluates, outermost first:
//!
//! ```text
//! teardown-class( setup-class( discovery( children ) ) )
//! ```
//!
//! with the discovery phase present only in deferred mode.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::child::{ChildUnit, TemplateFactory, TestInstanceFactory};
use crate::config::{EmptyParameterPolicy, RunnerConfig};
use crate::description::Description;
use crate::errors::{SuiteError, TestFailure};
use crate::notification::RunNotifier;
use crate::params::shape_tuples;
use crate::runner::Runner;
use crate::statement::{
    guarded, with_after_classes, with_before_classes, with_parameters, Statement,
};
use crate::template::{Discovery, Template};
use crate::validation;

/// Where a suite is in its discovery lifecycle.
///
/// The description alone cannot tell "not yet discovered" from "discovered nothing"; this
/// can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    Pending,
    Discovered { children: usize },
}

pub struct ParameterizedSuite<T> {
    template: Rc<Template<T>>,
    discovery: Discovery,
    factory: Box<dyn TestInstanceFactory<T>>,
    children: RefCell<Vec<ChildUnit<T>>>,
    state: Cell<PlanState>,
    empty_policy: EmptyParameterPolicy,
}

impl<T: 'static> ParameterizedSuite<T> {
    /// Builds a suite in the template's declared discovery mode.
    pub fn new(template: Template<T>, config: &RunnerConfig) -> Result<Self, SuiteError> {
        let discovery = template.discovery();
        Self::with_factory(template, discovery, Box::new(TemplateFactory), config)
    }

    /// Deferred discovery with default settings, whatever the template declares.
    pub fn deferred(template: Template<T>) -> Result<Self, SuiteError> {
        Self::with_factory(
            template,
            Discovery::Deferred,
            Box::new(TemplateFactory),
            &RunnerConfig::default(),
        )
    }

    /// Eager discovery with default settings, whatever the template declares.
    pub fn conventional(template: Template<T>) -> Result<Self, SuiteError> {
        Self::with_factory(
            template,
            Discovery::Eager,
            Box::new(TemplateFactory),
            &RunnerConfig::default(),
        )
    }

    pub fn with_factory(
        template: Template<T>,
        discovery: Discovery,
        factory: Box<dyn TestInstanceFactory<T>>,
        config: &RunnerConfig,
    ) -> Result<Self, SuiteError> {
        validation::validate_class(&template)?;
        let empty_policy = config.empty_policy(template.empty_parameters(), discovery);
        let suite = Self {
            template: Rc::new(template),
            discovery,
            factory,
            children: RefCell::new(Vec::new()),
            state: Cell::new(PlanState::Pending),
            empty_policy,
        };
        if discovery == Discovery::Eager {
            suite.discover_and_populate()?;
        }
        Ok(suite)
    }
}

impl<T> ParameterizedSuite<T> {
    pub fn template(&self) -> &Template<T> {
        &self.template
    }

    pub fn discovery(&self) -> Discovery {
        self.discovery
    }

    pub fn empty_policy(&self) -> EmptyParameterPolicy {
        self.empty_policy
    }

    pub fn plan_state(&self) -> PlanState {
        self.state.get()
    }

    /// The current child list; empty until discovery has run.
    pub fn children(&self) -> Ref<'_, [ChildUnit<T>]> {
        Ref::map(self.children.borrow(), |c| c.as_slice())
    }

    /// Reads the parameter source and appends one child per tuple, in source order.
    ///
    /// Calling this twice appends the children twice. Children are only appended once
    /// every tuple has been accepted by the factory.
    pub fn discover_and_populate(&self) -> Result<(), SuiteError> {
        let name = self.template.name();
        let source = self
            .template
            .parameter_source()
            .ok_or_else(|| SuiteError::MissingParameterSource {
                template: name.to_string(),
            })?;

        let mut raw = Vec::new();
        guarded(|| {
            raw = source.invoke()?;
            Ok(())
        })
        .map_err(|cause| SuiteError::ParameterSourceFailed {
            template: name.to_string(),
            method: source.name().to_string(),
            cause: Box::new(cause),
        })?;

        let tuples = shape_tuples(name, source.name(), raw)?;
        tracing::debug!(
            template = name,
            source = source.name(),
            tuples = tuples.len(),
            "discovered parameters"
        );

        let created = tuples
            .into_iter()
            .enumerate()
            .map(|(index, tuple)| self.factory.create(&self.template, tuple, index))
            .collect::<Result<Vec<_>, _>>()?;

        let mut children = self.children.borrow_mut();
        children.extend(created);
        self.state.set(PlanState::Discovered {
            children: children.len(),
        });
        Ok(())
    }

    fn shows_placeholder(&self) -> bool {
        self.discovery == Discovery::Deferred && self.children.borrow().is_empty()
    }

    /// Setup hooks, discovery (deferred only), children, then teardown hooks.
    fn class_block<'a>(&'a self, notifier: &'a RunNotifier) -> Statement<'a> {
        let children: Statement<'a> = Box::new(move || self.run_children(notifier));
        let statement = match self.discovery {
            Discovery::Deferred => with_parameters(children, move || self.discover_and_populate()),
            Discovery::Eager => children,
        };
        let statement = with_before_classes(statement, self.template.setup_class());
        with_after_classes(statement, self.template.teardown_class())
    }

    fn run_children(&self, notifier: &RunNotifier) -> Result<(), TestFailure> {
        let children = self.children.borrow();
        if children.is_empty() && self.empty_policy == EmptyParameterPolicy::Fail {
            return Err(SuiteError::NoParameters {
                template: self.template.name().to_string(),
            }
            .into());
        }
        for child in children.iter() {
            child.run(notifier);
        }
        Ok(())
    }
}

impl<T> Runner for ParameterizedSuite<T> {
    /// The real tree once children exist; the `No Tests` placeholder for a deferred suite
    /// that has none.
    fn description(&self) -> Description {
        let mut root = Description::suite(self.template.name());
        if self.shows_placeholder() {
            root.add_child(Description::placeholder());
            return root;
        }
        for child in self.children.borrow().iter() {
            root.add_child(child.description());
        }
        root
    }

    /// Failures outside any single test are reported against the description as it was
    /// before the run started.
    fn run(&self, notifier: &RunNotifier) {
        let span = tracing::debug_span!("suite", template = self.template.name());
        let _entered = span.enter();
        let planned = self.description();
        if let Err(failure) = guarded(self.class_block(notifier)) {
            tracing::warn!(template = self.template.name(), error = %failure, "suite failed");
            notifier.fire_suite_failure(&planned, failure);
        }
    }

    fn test_count(&self) -> usize {
        if self.shows_placeholder() {
            return 1;
        }
        self.children.borrow().iter().map(|c| c.test_count()).sum()
    }
}
