//! Test templates: the declarative stand-in for an annotated test class.
//!
//! A [`Template`] names its lifecycle members explicitly instead of having them found by
//! reflection. Every member carries a [`Signature`] describing how it was declared
//! (visibility, static or instance, unit-returning or not); validation reads these the way
//! a reflective runner would read modifiers.
//!
//! ```rust
//! use paramsuite::{ensure_eq, Template};
//! use serde_json::json;
//!
//! struct Square { input: i64, expected: i64 }
//!
//! let template = Template::builder("SquareTest")
//!     .deferred()
//!     .parameters("data", || Ok(vec![json!([2, 4]), json!([3, 9])]))
//!     .constructor(2, |args| Ok(Square { input: args.int(0)?, expected: args.int(1)? }))
//!     .test("squares", |t: &Square| {
//!         ensure_eq!(t.expected, t.input * t.input);
//!         Ok(())
//!     })
//!     .build();
//! assert_eq!(template.name(), "SquareTest");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EmptyParameterPolicy;
use crate::errors::TestFailure;
use crate::params::ParameterTuple;

pub type HookFn = Box<dyn Fn() -> Result<(), TestFailure>>;
pub type SourceFn = Box<dyn Fn() -> Result<Vec<Value>, TestFailure>>;
pub type ConstructorFn<T> = Box<dyn Fn(&ParameterTuple) -> Result<T, TestFailure>>;
pub type TestFn<T> = Box<dyn Fn(&T) -> Result<(), TestFailure>>;

// ============================================================================
// SIGNATURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// How a member was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub visibility: Visibility,
    pub is_static: bool,
    pub returns_unit: bool,
}

impl Signature {
    /// Class-level members: hooks and parameter sources.
    pub const fn public_static() -> Self {
        Self {
            visibility: Visibility::Public,
            is_static: true,
            returns_unit: true,
        }
    }

    /// Instance-level members: test methods.
    pub const fn public_instance() -> Self {
        Self {
            visibility: Visibility::Public,
            is_static: false,
            returns_unit: true,
        }
    }

    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub const fn instance(mut self) -> Self {
        self.is_static = false;
        self
    }

    pub const fn returning_value(mut self) -> Self {
        self.returns_unit = false;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    SetupClass,
    TeardownClass,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::SetupClass => write!(f, "setup_class"),
            HookKind::TeardownClass => write!(f, "teardown_class"),
        }
    }
}

/// A class-level setup or teardown action.
pub struct Hook {
    name: String,
    kind: HookKind,
    signature: Signature,
    body: HookFn,
}

impl Hook {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> HookKind {
        self.kind
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn invoke(&self) -> Result<(), TestFailure> {
        (self.body)()
    }
}

/// A zero-argument producer of raw parameter sets.
pub struct ParameterSource {
    name: String,
    signature: Signature,
    body: SourceFn,
}

impl ParameterSource {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Eligible sources are public and static.
    pub fn is_eligible(&self) -> bool {
        self.signature.is_public() && self.signature.is_static
    }

    pub fn invoke(&self) -> Result<Vec<Value>, TestFailure> {
        (self.body)()
    }
}

/// Builds one test instance from a parameter tuple.
pub struct Constructor<T> {
    arity: usize,
    visibility: Visibility,
    body: ConstructorFn<T>,
}

impl<T> Constructor<T> {
    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn instantiate(&self, tuple: &ParameterTuple) -> Result<T, TestFailure> {
        (self.body)(tuple)
    }
}

pub struct TestMethod<T> {
    name: String,
    signature: Signature,
    body: TestFn<T>,
}

impl<T> TestMethod<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn invoke(&self, instance: &T) -> Result<(), TestFailure> {
        (self.body)(instance)
    }
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// When parameter sets are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discovery {
    /// At suite construction, before any class setup.
    #[default]
    Eager,
    /// At run time, after class setup and before the first child.
    Deferred,
}

pub struct Template<T> {
    name: String,
    discovery: Discovery,
    empty_parameters: Option<EmptyParameterPolicy>,
    setup_class: Vec<Hook>,
    teardown_class: Vec<Hook>,
    sources: Vec<ParameterSource>,
    tests: Vec<TestMethod<T>>,
    constructor: Option<Constructor<T>>,
}

impl<T> Template<T> {
    pub fn builder(name: impl Into<String>) -> TemplateBuilder<T> {
        TemplateBuilder {
            template: Template {
                name: name.into(),
                discovery: Discovery::default(),
                empty_parameters: None,
                setup_class: Vec::new(),
                teardown_class: Vec::new(),
                sources: Vec::new(),
                tests: Vec::new(),
                constructor: None,
            },
        }
    }

    /// The template identity used in every description and message.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn discovery(&self) -> Discovery {
        self.discovery
    }

    pub fn empty_parameters(&self) -> Option<EmptyParameterPolicy> {
        self.empty_parameters
    }

    pub fn setup_class(&self) -> &[Hook] {
        &self.setup_class
    }

    pub fn teardown_class(&self) -> &[Hook] {
        &self.teardown_class
    }

    /// All declared sources, in declaration order.
    pub fn sources(&self) -> &[ParameterSource] {
        &self.sources
    }

    /// The first eligible source in declaration order; later candidates are ignored.
    pub fn parameter_source(&self) -> Option<&ParameterSource> {
        self.sources.iter().find(|s| s.is_eligible())
    }

    pub fn tests(&self) -> &[TestMethod<T>] {
        &self.tests
    }

    pub fn constructor(&self) -> Option<&Constructor<T>> {
        self.constructor.as_ref()
    }
}

impl<T> fmt::Debug for Template<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |hooks: &[Hook]| hooks.iter().map(|h| h.name.clone()).collect::<Vec<_>>();
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("discovery", &self.discovery)
            .field("empty_parameters", &self.empty_parameters)
            .field("setup_class", &names(&self.setup_class))
            .field("teardown_class", &names(&self.teardown_class))
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            )
            .field(
                "tests",
                &self.tests.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            )
            .field("constructor_arity", &self.constructor.as_ref().map(|c| c.arity))
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

pub struct TemplateBuilder<T> {
    template: Template<T>,
}

impl<T> TemplateBuilder<T> {
    /// Read parameters after class setup.
    pub fn deferred(mut self) -> Self {
        self.template.discovery = Discovery::Deferred;
        self
    }

    /// Read parameters at suite construction.
    pub fn eager(mut self) -> Self {
        self.template.discovery = Discovery::Eager;
        self
    }

    pub fn discovery(mut self, discovery: Discovery) -> Self {
        self.template.discovery = discovery;
        self
    }

    pub fn empty_parameters(mut self, policy: EmptyParameterPolicy) -> Self {
        self.template.empty_parameters = Some(policy);
        self
    }

    pub fn before_class(
        self,
        name: impl Into<String>,
        body: impl Fn() -> Result<(), TestFailure> + 'static,
    ) -> Self {
        self.before_class_with(name, Signature::public_static(), body)
    }

    pub fn before_class_with(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        body: impl Fn() -> Result<(), TestFailure> + 'static,
    ) -> Self {
        self.template.setup_class.push(Hook {
            name: name.into(),
            kind: HookKind::SetupClass,
            signature,
            body: Box::new(body),
        });
        self
    }

    pub fn after_class(
        self,
        name: impl Into<String>,
        body: impl Fn() -> Result<(), TestFailure> + 'static,
    ) -> Self {
        self.after_class_with(name, Signature::public_static(), body)
    }

    pub fn after_class_with(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        body: impl Fn() -> Result<(), TestFailure> + 'static,
    ) -> Self {
        self.template.teardown_class.push(Hook {
            name: name.into(),
            kind: HookKind::TeardownClass,
            signature,
            body: Box::new(body),
        });
        self
    }

    pub fn parameters(
        self,
        name: impl Into<String>,
        body: impl Fn() -> Result<Vec<Value>, TestFailure> + 'static,
    ) -> Self {
        self.parameters_with(name, Signature::public_static().returning_value(), body)
    }

    pub fn parameters_with(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        body: impl Fn() -> Result<Vec<Value>, TestFailure> + 'static,
    ) -> Self {
        self.template.sources.push(ParameterSource {
            name: name.into(),
            signature,
            body: Box::new(body),
        });
        self
    }

    pub fn constructor(
        self,
        arity: usize,
        body: impl Fn(&ParameterTuple) -> Result<T, TestFailure> + 'static,
    ) -> Self {
        self.constructor_with(Visibility::Public, arity, body)
    }

    pub fn constructor_with(
        mut self,
        visibility: Visibility,
        arity: usize,
        body: impl Fn(&ParameterTuple) -> Result<T, TestFailure> + 'static,
    ) -> Self {
        self.template.constructor = Some(Constructor {
            arity,
            visibility,
            body: Box::new(body),
        });
        self
    }

    pub fn test(
        self,
        name: impl Into<String>,
        body: impl Fn(&T) -> Result<(), TestFailure> + 'static,
    ) -> Self {
        self.test_with(name, Signature::public_instance(), body)
    }

    pub fn test_with(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        body: impl Fn(&T) -> Result<(), TestFailure> + 'static,
    ) -> Self {
        self.template.tests.push(TestMethod {
            name: name.into(),
            signature,
            body: Box::new(body),
        });
        self
    }

    pub fn build(self) -> Template<T> {
        self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Unit;

    #[test]
    fn first_eligible_source_wins() {
        let template = Template::<Unit>::builder("T")
            .parameters_with(
                "hidden",
                Signature::public_static().with_visibility(Visibility::Protected),
                || Ok(vec![json!([0])]),
            )
            .parameters("data", || Ok(vec![json!([1])]))
            .parameters("moreData", || Ok(vec![json!([2]), json!([3])]))
            .build();
        assert_eq!(template.sources().len(), 3);
        let source = template.parameter_source().unwrap();
        assert_eq!(source.name(), "data");
        assert_eq!(source.invoke().unwrap(), vec![json!([1])]);
    }

    #[test]
    fn no_eligible_source_resolves_to_none() {
        let template = Template::<Unit>::builder("T")
            .parameters_with("data", Signature::public_instance(), || Ok(Vec::new()))
            .build();
        assert!(template.parameter_source().is_none());
    }

    #[test]
    fn builder_defaults() {
        let template = Template::<Unit>::builder("T")
            .before_class("before", || Ok(()))
            .after_class("after", || Ok(()))
            .test("aTest", |_| Ok(()))
            .build();
        assert_eq!(template.discovery(), Discovery::Eager);
        assert_eq!(template.setup_class()[0].kind(), HookKind::SetupClass);
        assert_eq!(template.teardown_class()[0].kind().to_string(), "teardown_class");
        assert_eq!(template.tests()[0].signature(), Signature::public_instance());
        assert!(template.constructor().is_none());
        assert!(format!("{:?}", template).contains("aTest"));
    }
}
