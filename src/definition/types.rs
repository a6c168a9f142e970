//! Core definition types
//!
//! This module defines the data structures that represent a parsed Runfile.

use indexmap::IndexMap;

/// A single target declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDefinition {
    /// Target name, unique within a table
    pub name: String,

    /// One-line help text from the `##` marker
    pub docstring: Option<String>,

    /// Prerequisites, in declaration order
    pub dependencies: Vec<String>,

    /// Listed in `.PHONY`
    pub phony: bool,

    /// Listed in `.IGNORE`: failures are logged and the plan continues
    pub best_effort: bool,

    /// Target-scoped `NAME = value` bindings
    pub variables: IndexMap<String, String>,

    /// Working directory override from `.CWD`, unsubstituted
    pub working_dir: Option<String>,

    /// Raw command lines
    pub body: Vec<String>,

    /// 1-based line of the declaration
    pub line: usize,
}

impl TargetDefinition {
    /// Create an empty target declared on `line`
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        TargetDefinition {
            name: name.into(),
            docstring: None,
            dependencies: Vec::new(),
            phony: false,
            best_effort: false,
            variables: IndexMap::new(),
            working_dir: None,
            body: Vec::new(),
            line,
        }
    }

    pub fn with_docstring(mut self, doc: impl Into<String>) -> Self {
        self.docstring = Some(doc.into());
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_body<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Help text, if any non-blank text was given
    pub fn help(&self) -> Option<&str> {
        self.docstring.as_deref().filter(|doc| !doc.trim().is_empty())
    }

    /// True for dependency-only aggregation targets
    pub fn is_bodyless(&self) -> bool {
        self.body.is_empty()
    }
}

/// All targets of a definition, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTable {
    targets: IndexMap<String, TargetDefinition>,

    /// Definition-level `NAME ?= value` defaults
    pub defaults: IndexMap<String, String>,
}

impl TargetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a target, returning the previous definition with the same name
    pub fn insert(&mut self, target: TargetDefinition) -> Option<TargetDefinition> {
        self.targets.insert(target.name.clone(), target)
    }

    pub fn get(&self, name: &str) -> Option<&TargetDefinition> {
        self.targets.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut TargetDefinition> {
        self.targets.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// Targets in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &TargetDefinition> {
        self.targets.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<TargetDefinition> for TargetTable {
    fn from_iter<I: IntoIterator<Item = TargetDefinition>>(iter: I) -> Self {
        let mut table = TargetTable::new();
        for target in iter {
            table.insert(target);
        }
        table
    }
}
