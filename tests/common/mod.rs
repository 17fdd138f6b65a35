//! Fixture templates shared by the suite integration tests.
//!
//! Each fixture takes the discovery mode so the same class shape can be exercised deferred
//! and eager.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use paramsuite::{
    ensure_eq, Core, Discovery, Request, RunResult, RunnerConfig, Signature, Template, TestFailure,
    Visibility,
};
use serde_json::{json, Value};

/// Shared ordering log written by hooks and sources.
pub type Log = Rc<RefCell<String>>;

pub fn log() -> Log {
    Rc::default()
}

fn append(log: &Log, text: &str) {
    log.borrow_mut().push_str(text);
}

/// Runs a template through `Request` and `Core` with default configuration.
pub fn run<T: 'static>(template: Template<T>) -> RunResult {
    run_with(template, &RunnerConfig::default())
}

pub fn run_with<T: 'static>(template: Template<T>, config: &RunnerConfig) -> RunResult {
    let runner = Request::template(template, config);
    Core::new().run(runner.as_ref())
}

pub fn fibonacci_rows() -> Vec<Value> {
    vec![
        json!([0, 0]),
        json!([1, 1]),
        json!([2, 1]),
        json!([3, 2]),
        json!([4, 3]),
        json!([5, 5]),
        json!([6, 8]),
    ]
}

pub struct Fibonacci {
    input: i64,
    expected: i64,
}

/// Fibonacci suite whose `fib` always answers 0: six of the seven rows fail.
pub fn broken_fibonacci(discovery: Discovery) -> Template<Fibonacci> {
    Template::builder("FibonacciTest")
        .discovery(discovery)
        .parameters("data", || Ok(fibonacci_rows()))
        .constructor(2, |args| {
            Ok(Fibonacci {
                input: args.int(0)?,
                expected: args.int(1)?,
            })
        })
        .test("test", |f: &Fibonacci| {
            let fib = |_x: i64| -> i64 { 0 };
            ensure_eq!(f.expected, fib(f.input));
            Ok(())
        })
        .build()
}

/// One tuple, one passing test, logging hooks.
pub fn before_and_after(log: &Log, discovery: Discovery) -> Template<()> {
    let (before, after) = (log.clone(), log.clone());
    Template::builder("BeforeAndAfter")
        .discovery(discovery)
        .before_class("before", move || {
            append(&before, "before ");
            Ok(())
        })
        .after_class("after", move || {
            append(&after, "after ");
            Ok(())
        })
        .constructor(1, |_| Ok(()))
        .parameters("data", || Ok(vec![json!([3])]))
        .test("aTest", |_| Ok(()))
        .build()
}

/// Like [`before_and_after`], but the source logs too.
pub fn parameters_order(log: &Log, discovery: Discovery) -> Template<()> {
    let (before, source, after) = (log.clone(), log.clone(), log.clone());
    Template::builder("ParametersOrder")
        .discovery(discovery)
        .before_class("before", move || {
            append(&before, "before ");
            Ok(())
        })
        .after_class("after", move || {
            append(&after, "after ");
            Ok(())
        })
        .constructor(1, |_| Ok(()))
        .parameters("data", move || {
            append(&source, "parameters ");
            Ok(vec![json!([3])])
        })
        .test("aTest", |_| Ok(()))
        .build()
}

/// Hooks only: no parameter source, no tests.
pub fn empty_test(log: &Log, discovery: Discovery) -> Template<()> {
    let (before, after) = (log.clone(), log.clone());
    Template::builder("EmptyTest")
        .discovery(discovery)
        .before_class("before", move || {
            append(&before, "before ");
            Ok(())
        })
        .after_class("after", move || {
            append(&after, "after ");
            Ok(())
        })
        .build()
}

/// A test method that returns a value.
pub fn incorrect_test(discovery: Discovery) -> Template<()> {
    Template::builder("IncorrectTest")
        .discovery(discovery)
        .constructor(1, |_| Ok(()))
        .test_with("test", Signature::public_instance().returning_value(), |_| Ok(()))
        .parameters("data", || Ok(vec![json!([1])]))
        .build()
}

pub fn protected_parameters(discovery: Discovery) -> Template<()> {
    Template::builder("ProtectedParametersTest")
        .discovery(discovery)
        .parameters_with(
            "data",
            Signature::public_static()
                .returning_value()
                .with_visibility(Visibility::Protected),
            || Ok(Vec::new()),
        )
        .test("aTest", |_| Ok(()))
        .build()
}

/// A source returning scalars instead of tuples.
pub fn wrong_element_type(discovery: Discovery) -> Template<()> {
    Template::builder("WrongElementType")
        .discovery(discovery)
        .parameters("data", || Ok(vec![json!("a"), json!("b"), json!("c")]))
        .test("aTest", |_| Ok(()))
        .build()
}

pub fn private_constructor(discovery: Discovery) -> Template<()> {
    Template::builder("PrivateConstructor")
        .discovery(discovery)
        .constructor_with(Visibility::Private, 1, |_| Ok(()))
        .parameters("data", || Ok(vec![json!([3])]))
        .test("aTest", |_| Ok(()))
        .build()
}

/// Two eligible sources; only the first is used.
pub fn multiple_parameter_sources(discovery: Discovery) -> Template<()> {
    Template::builder("MultipleParametersMethods")
        .discovery(discovery)
        .parameters("data", || Ok(vec![json!([1])]))
        .parameters("moreData", || Ok(vec![json!([1]), json!([2])]))
        .constructor(1, |_| Ok(()))
        .test("aTest", |_| Ok(()))
        .build()
}

/// A valid suite whose source returns nothing.
pub fn empty_sequence(log: &Log, discovery: Discovery) -> Template<()> {
    let (before, after) = (log.clone(), log.clone());
    Template::builder("EmptySequence")
        .discovery(discovery)
        .before_class("before", move || {
            append(&before, "before ");
            Ok(())
        })
        .after_class("after", move || {
            append(&after, "after ");
            Ok(())
        })
        .parameters("data", || Ok(Vec::new()))
        .constructor(1, |_| Ok(()))
        .test("aTest", |_| Ok(()))
        .build()
}

/// A suite whose setup hook fails.
pub fn failing_setup(log: &Log, discovery: Discovery) -> Template<()> {
    let (before, source, after) = (log.clone(), log.clone(), log.clone());
    Template::builder("FailingSetup")
        .discovery(discovery)
        .before_class("before", move || {
            append(&before, "before ");
            Err(TestFailure::error("database unavailable"))
        })
        .after_class("after", move || {
            append(&after, "after ");
            Ok(())
        })
        .parameters("data", move || {
            append(&source, "parameters ");
            Ok(vec![json!([1])])
        })
        .constructor(1, |_| Ok(()))
        .test("aTest", |_| Ok(()))
        .build()
}

/// Logging hooks around a source that answers with `rows`.
pub fn logged_source(
    name: &str,
    log: &Log,
    discovery: Discovery,
    rows: impl Fn() -> Result<Vec<Value>, TestFailure> + 'static,
) -> Template<()> {
    let (before, source, after) = (log.clone(), log.clone(), log.clone());
    Template::builder(name)
        .discovery(discovery)
        .before_class("before", move || {
            append(&before, "before ");
            Ok(())
        })
        .after_class("after", move || {
            append(&after, "after ");
            Ok(())
        })
        .parameters("data", move || {
            append(&source, "parameters ");
            rows()
        })
        .constructor(1, |_| Ok(()))
        .test("aTest", |_| Ok(()))
        .build()
}

/// A source that reports an error instead of rows.
pub fn failing_source(log: &Log, discovery: Discovery) -> Template<()> {
    logged_source("FailingSource", log, discovery, || {
        Err(TestFailure::error("db down"))
    })
}

/// A source whose rows are scalars, with hooks around it.
pub fn malformed_source(log: &Log, discovery: Discovery) -> Template<()> {
    logged_source("MalformedSource", log, discovery, || {
        Ok(vec![json!("a"), json!("b")])
    })
}

/// Two passing tuples and a teardown hook that fails.
pub fn failing_teardown(log: &Log, discovery: Discovery) -> Template<()> {
    let (before, after) = (log.clone(), log.clone());
    Template::builder("FailingTeardown")
        .discovery(discovery)
        .before_class("before", move || {
            append(&before, "before ");
            Ok(())
        })
        .after_class("after", move || {
            append(&after, "after ");
            Err(TestFailure::error("teardown broke"))
        })
        .parameters("data", || Ok(vec![json!([1]), json!([2])]))
        .constructor(1, |_| Ok(()))
        .test("aTest", |_| Ok(()))
        .build()
}
