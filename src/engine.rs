//! Entry points for running suites programmatically.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::RunnerConfig;
use crate::notification::{ResultCollector, RunListener, RunNotifier, RunResult};
use crate::runner::{ErrorReportingRunner, Runner};
use crate::suite::ParameterizedSuite;
use crate::template::Template;

/// Turns a template into a runner, in the discovery mode the template declares.
pub struct Request;

impl Request {
    /// A template that fails construction yields an [`ErrorReportingRunner`] instead of an
    /// error, so it still shows up in the run.
    pub fn template<T: 'static>(template: Template<T>, config: &RunnerConfig) -> Box<dyn Runner> {
        let name = template.name().to_string();
        match ParameterizedSuite::new(template, config) {
            Ok(suite) => Box::new(suite),
            Err(error) => {
                tracing::warn!(template = %name, %error, "suite could not be constructed");
                Box::new(ErrorReportingRunner::new(error))
            }
        }
    }
}

/// Runs runners with a fixed set of listeners attached.
#[derive(Default)]
pub struct Core {
    notifier: RunNotifier,
}

impl Core {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Rc<RefCell<dyn RunListener>>) {
        self.notifier.add_listener(listener);
    }

    pub fn run(&self, runner: &dyn Runner) -> RunResult {
        let collector = Rc::new(RefCell::new(ResultCollector::default()));
        let listener: Rc<RefCell<dyn RunListener>> = collector.clone();
        self.notifier.add_listener(listener.clone());

        let description = runner.description();
        self.notifier.fire_test_run_started(&description);
        runner.run(&self.notifier);
        let result = collector.borrow_mut().finish();
        self.notifier.fire_test_run_finished(&result);

        self.notifier.remove_listener(&listener);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::Description;
    use crate::errors::TestFailure;
    use serde_json::json;

    #[derive(Default)]
    struct Starts(Vec<String>);

    impl RunListener for Starts {
        fn test_run_started(&mut self, d: &Description) {
            self.0.push(d.display_name().to_string());
        }
    }

    fn template() -> Template<i64> {
        Template::builder("Halves")
            .parameters("data", || Ok(vec![json!([2]), json!([3])]))
            .constructor(1, |args| args.int(0))
            .test("even", |n: &i64| {
                if n % 2 != 0 {
                    return Err(TestFailure::assertion(format!("{} is odd", n)));
                }
                Ok(())
            })
            .build()
    }

    #[test]
    fn runs_are_independent() {
        let core = Core::new();
        let starts = Rc::new(RefCell::new(Starts::default()));
        core.add_listener(starts.clone());

        let runner = Request::template(template(), &RunnerConfig::default());
        let first = core.run(runner.as_ref());
        let second = core.run(runner.as_ref());
        assert_eq!(first.run_count(), 2);
        assert_eq!(first.failure_count(), 1);
        assert_eq!(second.run_count(), 2);
        assert_eq!(starts.borrow().0, vec!["Halves", "Halves"]);
    }

    #[test]
    fn construction_errors_are_reported_as_tests() {
        let broken = Template::<i64>::builder("Broken").test("t", |_| Ok(())).build();
        let runner = Request::template(broken, &RunnerConfig::default());
        let result = Core::new().run(runner.as_ref());
        assert_eq!(result.run_count(), 1);
        assert_eq!(result.failures()[0].test_header(), "initializationError(Broken)");
    }
}
