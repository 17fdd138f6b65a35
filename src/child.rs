//! One runnable child per parameter tuple.

use std::rc::Rc;

use crate::description::Description;
use crate::errors::SuiteError;
use crate::notification::{Outcome, RunNotifier};
use crate::params::ParameterTuple;
use crate::runner::Runner;
use crate::statement::guarded;
use crate::template::Template;
use crate::validation;

/// The test-for-parameters unit: every test method of the template, run against one tuple.
pub struct ChildUnit<T> {
    index: usize,
    tuple: ParameterTuple,
    template: Rc<Template<T>>,
    description: Description,
}

impl<T> ChildUnit<T> {
    fn new(template: Rc<Template<T>>, tuple: ParameterTuple, index: usize) -> Self {
        let description = child_description(&template, index);
        Self {
            index,
            tuple,
            template,
            description,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tuple(&self) -> &ParameterTuple {
        &self.tuple
    }

    /// `[index]`, the group name of this unit.
    pub fn name(&self) -> String {
        format!("[{}]", self.index)
    }

    /// Leaf descriptions, one per test method, in declaration order.
    fn test_descriptions(&self) -> Vec<Description> {
        if self.description.is_test() {
            vec![self.description.clone()]
        } else {
            self.description.children().to_vec()
        }
    }
}

/// Single-method templates collapse to one leaf per tuple; others get a `[index]` group.
fn child_description<T>(template: &Template<T>, index: usize) -> Description {
    let tests = template.tests();
    if let [only] = tests {
        return Description::parameterized_test(only.name(), index, template.name());
    }
    let mut group = Description::suite(format!("[{}]", index));
    for test in tests {
        group.add_child(Description::parameterized_test(test.name(), index, template.name()));
    }
    group
}

impl<T> Runner for ChildUnit<T> {
    fn description(&self) -> Description {
        self.description.clone()
    }

    /// Builds a fresh instance per test method, so methods never share state.
    fn run(&self, notifier: &RunNotifier) {
        let constructor = self.template.constructor();
        for (test, description) in self.template.tests().iter().zip(self.test_descriptions()) {
            tracing::trace!(test = %description, "running child test");
            notifier.fire_test_started(&description);
            let result = guarded(|| {
                let constructor = constructor.ok_or_else(|| SuiteError::UnreachableInstantiation {
                    template: self.template.name().to_string(),
                    arity: self.tuple.len(),
                    reason: "no constructor is declared".to_string(),
                })?;
                let instance = constructor.instantiate(&self.tuple)?;
                test.invoke(&instance)
            });
            let outcome = Outcome::from_result(&description, result);
            notifier.fire_test_finished(&description, &outcome);
        }
    }
}

/// Creates child units from discovered tuples.
pub trait TestInstanceFactory<T> {
    fn create(
        &self,
        template: &Rc<Template<T>>,
        tuple: ParameterTuple,
        index: usize,
    ) -> Result<ChildUnit<T>, SuiteError>;
}

/// The default factory: checks the template can be instantiated for the tuple's arity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateFactory;

impl<T> TestInstanceFactory<T> for TemplateFactory {
    fn create(
        &self,
        template: &Rc<Template<T>>,
        tuple: ParameterTuple,
        index: usize,
    ) -> Result<ChildUnit<T>, SuiteError> {
        validation::validate_instantiation(template, tuple.len())?;
        Ok(ChildUnit::new(Rc::clone(template), tuple, index))
    }
}
