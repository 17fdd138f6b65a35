//! Run events and the listeners that consume them.
//!
//! Every executed test produces one `test_started` event followed by exactly one
//! `test_finished` event carrying its [`Outcome`]. Failures that belong to a whole suite
//! (class setup, parameter discovery, class teardown) are reported through
//! `suite_failure` instead, attributed to the suite's description.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::description::Description;
use crate::errors::TestFailure;

/// A failure routed to a node of the description tree.
#[derive(Debug, Clone)]
pub struct Failure {
    description: Description,
    cause: TestFailure,
}

impl Failure {
    pub fn new(description: Description, cause: TestFailure) -> Self {
        Self { description, cause }
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn cause(&self) -> &TestFailure {
        &self.cause
    }

    /// The display name of the failing node, e.g. `test[1](FibonacciTest)`.
    pub fn test_header(&self) -> &str {
        self.description.display_name()
    }

    pub fn message(&self) -> String {
        self.cause.to_string()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.test_header(), self.cause)
    }
}

/// Terminal state of one executed test.
#[derive(Debug, Clone)]
pub enum Outcome {
    Passed,
    /// An expectation did not hold.
    Failed(Failure),
    /// Unexpected error or panic.
    Errored(Failure),
}

impl Outcome {
    /// Classifies a test body result.
    pub fn from_result(description: &Description, result: Result<(), TestFailure>) -> Self {
        match result {
            Ok(()) => Outcome::Passed,
            Err(cause) if cause.is_assertion() => {
                Outcome::Failed(Failure::new(description.clone(), cause))
            }
            Err(cause) => Outcome::Errored(Failure::new(description.clone(), cause)),
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed(f) | Outcome::Errored(f) => Some(f),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

pub trait RunListener {
    fn test_run_started(&mut self, _description: &Description) {}
    fn test_run_finished(&mut self, _result: &RunResult) {}
    fn test_started(&mut self, _description: &Description) {}
    fn test_finished(&mut self, _description: &Description, _outcome: &Outcome) {}
    fn suite_failure(&mut self, _failure: &Failure) {}
}

/// Fans events out to the registered listeners, in registration order.
#[derive(Default)]
pub struct RunNotifier {
    listeners: RefCell<Vec<Rc<RefCell<dyn RunListener>>>>,
}

impl RunNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Rc<RefCell<dyn RunListener>>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn remove_listener(&self, listener: &Rc<RefCell<dyn RunListener>>) {
        self.listeners.borrow_mut().retain(|l| !Rc::ptr_eq(l, listener));
    }

    fn each(&self, mut event: impl FnMut(&mut dyn RunListener)) {
        for listener in self.listeners.borrow().iter() {
            event(&mut *listener.borrow_mut());
        }
    }

    pub fn fire_test_run_started(&self, description: &Description) {
        self.each(|l| l.test_run_started(description));
    }

    pub fn fire_test_run_finished(&self, result: &RunResult) {
        self.each(|l| l.test_run_finished(result));
    }

    pub fn fire_test_started(&self, description: &Description) {
        self.each(|l| l.test_started(description));
    }

    pub fn fire_test_finished(&self, description: &Description, outcome: &Outcome) {
        self.each(|l| l.test_finished(description, outcome));
    }

    /// Reports every cause of `cause` separately against `description`.
    pub fn fire_suite_failure(&self, description: &Description, cause: TestFailure) {
        for cause in cause.into_causes() {
            let failure = Failure::new(description.clone(), cause);
            self.each(|l| l.suite_failure(&failure));
        }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Totals of a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    run_count: usize,
    failures: Vec<Failure>,
    run_time: Duration,
}

impl RunResult {
    /// Tests that reached `test_finished`.
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Failed and errored tests plus suite-level failures.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn run_time(&self) -> Duration {
        self.run_time
    }

    pub fn was_successful(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.len() {
            0 => writeln!(f, "OK ({} tests)", self.run_count)?,
            1 => writeln!(f, "There was 1 failure:")?,
            n => writeln!(f, "There were {} failures:", n)?,
        }
        for (i, failure) in self.failures.iter().enumerate() {
            writeln!(f, "{}) {}", i + 1, failure.test_header())?;
            writeln!(f, "{}", failure.message())?;
        }
        Ok(())
    }
}

/// Listener that accumulates a [`RunResult`].
#[derive(Debug, Default)]
pub struct ResultCollector {
    result: RunResult,
    started_at: Option<Instant>,
}

impl ResultCollector {
    pub fn result(&self) -> &RunResult {
        &self.result
    }

    /// Stamps the elapsed time and returns the totals so far.
    pub fn finish(&mut self) -> RunResult {
        if let Some(started) = self.started_at.take() {
            self.result.run_time = started.elapsed();
        }
        self.result.clone()
    }
}

impl RunListener for ResultCollector {
    fn test_run_started(&mut self, _description: &Description) {
        self.started_at = Some(Instant::now());
    }

    fn test_finished(&mut self, _description: &Description, outcome: &Outcome) {
        self.result.run_count += 1;
        if let Some(failure) = outcome.failure() {
            self.result.failures.push(failure.clone());
        }
    }

    fn suite_failure(&mut self, failure: &Failure) {
        self.result.failures.push(failure.clone());
    }
}
