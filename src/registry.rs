//! Named collection of suites available to the CLI.
//!
//! Suites are registered as builders rather than built runners: a deferred suite is
//! stateful after it has run, so every command builds a fresh one.

use regex::Regex;

use crate::config::RunnerConfig;
use crate::engine::Request;
use crate::runner::Runner;
use crate::template::Template;

pub type SuiteBuilder = Box<dyn Fn(&RunnerConfig) -> Box<dyn Runner>>;

#[derive(Default)]
pub struct SuiteRegistry {
    suites: Vec<(String, SuiteBuilder)>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template factory under `name`; registering a name twice replaces it.
    pub fn register<T, F>(&mut self, name: impl Into<String>, template: F) -> &mut Self
    where
        T: 'static,
        F: Fn() -> Template<T> + 'static,
    {
        self.register_runner(name, move |config| Request::template(template(), config))
    }

    pub fn register_runner<F>(&mut self, name: impl Into<String>, build: F) -> &mut Self
    where
        F: Fn(&RunnerConfig) -> Box<dyn Runner> + 'static,
    {
        let name = name.into();
        let build: SuiteBuilder = Box::new(build);
        match self.suites.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = build,
            None => self.suites.push((name, build)),
        }
        self
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.suites.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Builds every suite whose name matches `filter`, or all of them without one.
    pub fn build(
        &self,
        filter: Option<&Regex>,
        config: &RunnerConfig,
    ) -> Vec<(&str, Box<dyn Runner>)> {
        self.suites
            .iter()
            .filter(|(name, _)| filter.map_or(true, |re| re.is_match(name)))
            .map(|(name, build)| (name.as_str(), build(config)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbers() -> Template<i64> {
        Template::builder("Numbers")
            .parameters("data", || Ok(vec![json!([1])]))
            .constructor(1, |args| args.int(0))
            .test("t", |_| Ok(()))
            .build()
    }

    #[test]
    fn filters_by_pattern_in_registration_order() {
        let mut registry = SuiteRegistry::new();
        registry.register("numbers", numbers).register("more_numbers", numbers);
        assert_eq!(registry.names(), vec!["numbers", "more_numbers"]);

        let config = RunnerConfig::default();
        assert_eq!(registry.build(None, &config).len(), 2);
        let re = Regex::new("^more").unwrap();
        let built = registry.build(Some(&re), &config);
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].0, "more_numbers");
        assert_eq!(built[0].1.test_count(), 1);
    }

    #[test]
    fn re_registering_replaces() {
        let mut registry = SuiteRegistry::new();
        registry.register("numbers", numbers).register("numbers", numbers);
        assert_eq!(registry.names().len(), 1);
        assert!(!registry.is_empty());
    }
}
