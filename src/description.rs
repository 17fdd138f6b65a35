//! Addressable tree of test descriptions.
//!
//! A [`Description`] names either a single test (a leaf) or a group of tests (a node with
//! children). Runners hand descriptions to listeners so that every start, finish, and
//! failure event can be routed to the right node.
//!
//! ## Naming
//!
//! - plain tests: `method(Template)`
//! - parameterized tests: `method[index](Template)`
//! - parameter groups: `[index]`
//! - the pre-discovery placeholder: `No Tests`
//!
//! Two descriptions are equal when their display names are equal; the tree below them is
//! not compared.

use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::sync::Lazy;
use regex::Regex;

/// Label of the synthetic child shown before parameters have been discovered.
pub const NO_TESTS_LABEL: &str = "No Tests";

static METHOD_AND_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)\(([^()]*)\)$").expect("static regex is valid"));

#[derive(Debug, Clone)]
pub struct Description {
    display_name: String,
    children: Vec<Description>,
    placeholder: bool,
}

impl Description {
    /// A group node; children are added with [`Description::add_child`].
    pub fn suite(name: impl Into<String>) -> Self {
        Self {
            display_name: name.into(),
            children: Vec::new(),
            placeholder: false,
        }
    }

    /// A test named `method(template)`.
    pub fn test(method: &str, template: &str) -> Self {
        Self::suite(format!("{}({})", method, template))
    }

    /// A test named `method[index](template)`.
    pub fn parameterized_test(method: &str, index: usize, template: &str) -> Self {
        Self::suite(format!("{}[{}]({})", method, index, template))
    }

    /// The synthetic `No Tests` node. It has no descendants and is never a real test.
    pub fn placeholder() -> Self {
        Self {
            display_name: NO_TESTS_LABEL.to_string(),
            children: Vec::new(),
            placeholder: true,
        }
    }

    pub fn add_child(&mut self, child: Description) {
        self.children.push(child);
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn children(&self) -> &[Description] {
        &self.children
    }

    pub fn is_test(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_suite(&self) -> bool {
        !self.is_test()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Number of leaves below (and including) this node.
    pub fn test_count(&self) -> usize {
        if self.is_test() {
            return 1;
        }
        self.children.iter().map(Description::test_count).sum()
    }

    /// Same name, no children.
    pub fn childless_copy(&self) -> Self {
        Self {
            display_name: self.display_name.clone(),
            children: Vec::new(),
            placeholder: self.placeholder,
        }
    }

    /// `test[1]` for `test[1](FibonacciTest)`; `None` for names without a template suffix.
    pub fn method_name(&self) -> Option<&str> {
        METHOD_AND_TEMPLATE
            .captures(&self.display_name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// `FibonacciTest` for `test[1](FibonacciTest)`.
    pub fn template_name(&self) -> Option<&str> {
        METHOD_AND_TEMPLATE
            .captures(&self.display_name)
            .and_then(|c| c.get(2))
            .map(|m| m.as_str())
    }

    /// Depth-first, in insertion order, including this node.
    pub fn walk(&self) -> Vec<&Description> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    /// Indented multi-line rendering of the tree, two spaces per level.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.display_name);
        if self.placeholder {
            out.push_str(" (pending discovery)");
        }
        out.push('\n');
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }
}

impl PartialEq for Description {
    fn eq(&self, other: &Self) -> bool {
        self.display_name == other.display_name && self.placeholder == other.placeholder
    }
}

impl Eq for Description {}

impl Hash for Description {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display_name.hash(state);
        self.placeholder.hash(state);
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
