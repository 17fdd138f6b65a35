//! The runner abstraction shared by suites, child units, and error placeholders.

use crate::description::Description;
use crate::errors::{SuiteError, TestFailure};
use crate::notification::{Failure, Outcome, RunNotifier};

/// Something that can describe itself before running and then run against a notifier.
pub trait Runner {
    /// Pre-run plan. Never executes user code.
    fn description(&self) -> Description;

    fn run(&self, notifier: &RunNotifier);

    fn test_count(&self) -> usize {
        self.description().test_count()
    }
}

const INITIALIZATION_ERROR: &str = "initializationError";

/// Stands in for a suite whose template could not be built.
///
/// Each cause becomes one errored test named `initializationError(<template>)`.
#[derive(Debug, Clone)]
pub struct ErrorReportingRunner {
    template: String,
    causes: Vec<SuiteError>,
}

impl ErrorReportingRunner {
    pub fn new(error: SuiteError) -> Self {
        Self {
            template: error.template().to_string(),
            causes: error.into_causes(),
        }
    }

    pub fn causes(&self) -> &[SuiteError] {
        &self.causes
    }

    fn leaf(&self) -> Description {
        Description::test(INITIALIZATION_ERROR, &self.template)
    }
}

impl Runner for ErrorReportingRunner {
    fn description(&self) -> Description {
        let mut root = Description::suite(self.template.clone());
        for _ in &self.causes {
            root.add_child(self.leaf());
        }
        root
    }

    fn run(&self, notifier: &RunNotifier) {
        for cause in &self.causes {
            let leaf = self.leaf();
            notifier.fire_test_started(&leaf);
            let failure = Failure::new(leaf.clone(), TestFailure::Suite(cause.clone()));
            notifier.fire_test_finished(&leaf, &Outcome::Errored(failure));
        }
    }

    fn test_count(&self) -> usize {
        self.causes.len()
    }
}

/// Runs several runners one after the other under a single root description.
pub struct CompositeRunner {
    name: String,
    runners: Vec<Box<dyn Runner>>,
}

impl CompositeRunner {
    pub fn new(name: impl Into<String>, runners: Vec<Box<dyn Runner>>) -> Self {
        Self {
            name: name.into(),
            runners,
        }
    }

    pub fn runners(&self) -> &[Box<dyn Runner>] {
        &self.runners
    }
}

impl Runner for CompositeRunner {
    fn description(&self) -> Description {
        let mut root = Description::suite(self.name.clone());
        for runner in &self.runners {
            root.add_child(runner.description());
        }
        root
    }

    fn run(&self, notifier: &RunNotifier) {
        for runner in &self.runners {
            runner.run(notifier);
        }
    }

    fn test_count(&self) -> usize {
        self.runners.iter().map(|r| r.test_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MethodProblem;
    use crate::notification::{ResultCollector, RunListener};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn each_cause_is_one_errored_test() {
        let error = SuiteError::from_problems(
            "Broken",
            vec![
                SuiteError::MissingParameterSource {
                    template: "Broken".into(),
                },
                SuiteError::InvalidMethod {
                    template: "Broken".into(),
                    method: "before".into(),
                    problem: MethodProblem::ShouldBeStatic,
                },
            ],
        )
        .unwrap_err();
        let runner = ErrorReportingRunner::new(error);
        assert_eq!(runner.test_count(), 2);
        assert_eq!(
            runner.description().children()[0].display_name(),
            "initializationError(Broken)"
        );

        let notifier = RunNotifier::new();
        let collector = Rc::new(RefCell::new(ResultCollector::default()));
        notifier.add_listener(collector.clone());
        collector.borrow_mut().test_run_started(&runner.description());
        runner.run(&notifier);
        let result = collector.borrow_mut().finish();
        assert_eq!(result.run_count(), 2);
        let messages: Vec<String> = result.failures().iter().map(|f| f.message()).collect();
        assert_eq!(
            messages,
            vec![
                "No public static parameters method on class Broken",
                "Method before() should be static"
            ]
        );
    }

    #[test]
    fn composite_counts_and_nests_its_runners() {
        let broken = || {
            Box::new(ErrorReportingRunner::new(SuiteError::NoRunnableMethods {
                template: "Empty".into(),
            })) as Box<dyn Runner>
        };
        let composite = CompositeRunner::new("all", vec![broken(), broken()]);
        assert_eq!(composite.test_count(), 2);
        let d = composite.description();
        assert_eq!(d.display_name(), "all");
        assert_eq!(d.children().len(), 2);
        assert_eq!(d.children()[1].children()[0].display_name(), "initializationError(Empty)");
        assert_eq!(composite.runners().len(), 2);
    }
}
