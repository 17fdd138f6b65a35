//! Bundled suites shipped with the `paramsuite` binary.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};

use crate::ensure_eq;
use crate::errors::TestFailure;
use crate::registry::SuiteRegistry;
use crate::template::Template;

/// Rows loaded by the fixture suite's setup hook.
const ADDITION_FIXTURE: &str = "
- [0, 0, 0]
- [1, 2, 3]
- [20, 22, 42]
- [-5, 5, 0]
";

pub fn registry() -> SuiteRegistry {
    let mut registry = SuiteRegistry::new();
    registry
        .register("fibonacci", fibonacci)
        .register("fixture_addition", fixture_addition)
        .register("squares", squares);
    registry
}

pub fn fib(n: i64) -> i64 {
    let (mut a, mut b) = (0, 1);
    for _ in 0..n {
        (a, b) = (b, a + b);
    }
    a
}

pub struct FibonacciCase {
    input: i64,
    expected: i64,
}

/// Deferred suite over the first seven Fibonacci numbers.
pub fn fibonacci() -> Template<FibonacciCase> {
    Template::builder("FibonacciTest")
        .deferred()
        .parameters("data", || {
            Ok(vec![
                json!([0, 0]),
                json!([1, 1]),
                json!([2, 1]),
                json!([3, 2]),
                json!([4, 3]),
                json!([5, 5]),
                json!([6, 8]),
            ])
        })
        .constructor(2, |args| {
            Ok(FibonacciCase {
                input: args.int(0)?,
                expected: args.int(1)?,
            })
        })
        .test("test", |case: &FibonacciCase| {
            ensure_eq!(case.expected, fib(case.input));
            Ok(())
        })
        .build()
}

pub struct Addition {
    left: i64,
    right: i64,
    sum: i64,
}

/// Deferred suite whose parameters only exist once its setup hook has loaded them.
pub fn fixture_addition() -> Template<Addition> {
    let rows: Rc<RefCell<Vec<Value>>> = Rc::default();
    let (load, read, clear) = (rows.clone(), rows.clone(), rows);
    Template::builder("FixtureAdditionTest")
        .deferred()
        .before_class("loadFixture", move || {
            let parsed: Vec<Value> = serde_yaml::from_str(ADDITION_FIXTURE)
                .map_err(|e| TestFailure::error(format!("fixture does not parse: {}", e)))?;
            *load.borrow_mut() = parsed;
            Ok(())
        })
        .parameters("data", move || Ok(read.borrow().clone()))
        .after_class("releaseFixture", move || {
            clear.borrow_mut().clear();
            Ok(())
        })
        .constructor(3, |args| {
            let (left, right, sum) = args.decode_all()?;
            Ok(Addition { left, right, sum })
        })
        .test("adds", |a: &Addition| {
            ensure_eq!(a.sum, a.left + a.right);
            Ok(())
        })
        .test("commutes", |a: &Addition| {
            ensure_eq!(a.left + a.right, a.right + a.left);
            Ok(())
        })
        .build()
}

/// Eager counterpart: parameters are read while the suite is built.
pub fn squares() -> Template<(i64, i64)> {
    Template::builder("SquareTest")
        .parameters("data", || Ok((0..5).map(|n| json!([n, n * n])).collect()))
        .constructor(2, |args| args.decode_all())
        .test("squares", |&(n, square): &(i64, i64)| {
            ensure_eq!(square, n * n, "square of {}", n);
            Ok(())
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use crate::engine::{Core, Request};

    #[test]
    fn fib_values() {
        let values: Vec<i64> = (0..7).map(fib).collect();
        assert_eq!(values, vec![0, 1, 1, 2, 3, 5, 8]);
    }

    #[test]
    fn every_demo_passes() {
        let registry = registry();
        let config = RunnerConfig::default();
        for (name, runner) in registry.build(None, &config) {
            let result = Core::new().run(runner.as_ref());
            assert!(result.was_successful(), "{} failed:\n{}", name, result);
        }
    }

    #[test]
    fn fixture_suite_discovers_what_setup_loaded() {
        let runner = Request::template(fixture_addition(), &RunnerConfig::default());
        assert_eq!(runner.test_count(), 1);
        let result = Core::new().run(runner.as_ref());
        assert_eq!(result.run_count(), 8);
        assert_eq!(runner.test_count(), 8);
    }
}
