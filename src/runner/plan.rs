//! Dependency resolution
//!
//! Turns requested target names into an execution plan: a duplicate-free
//! list in which every dependency comes before the targets that need it.

use crate::definition::{TargetDefinition, TargetTable};
use crate::error::{PlanError, PlanResult};
use std::collections::HashMap;

/// Targets to run, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan<'a> {
    steps: Vec<&'a TargetDefinition>,
}

impl<'a> ExecutionPlan<'a> {
    pub fn steps(&self) -> &[&'a TargetDefinition] {
        &self.steps
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.steps.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Visited,
}

/// Resolve `requested` targets into a plan
///
/// Each requested target contributes its own dependency-first order; the
/// orders are concatenated and a target already scheduled by an earlier
/// path is not scheduled again.
pub fn resolve<'a, S: AsRef<str>>(
    table: &'a TargetTable,
    requested: &[S],
) -> PlanResult<ExecutionPlan<'a>> {
    let mut resolver = Resolver {
        table,
        marks: HashMap::new(),
        steps: Vec::new(),
    };

    for name in requested {
        resolver.visit(name.as_ref())?;
    }

    Ok(ExecutionPlan {
        steps: resolver.steps,
    })
}

struct Resolver<'a> {
    table: &'a TargetTable,
    marks: HashMap<&'a str, Mark>,
    steps: Vec<&'a TargetDefinition>,
}

impl<'a> Resolver<'a> {
    fn lookup(&self, name: &str) -> PlanResult<&'a TargetDefinition> {
        let table = self.table;
        table
            .get(name)
            .ok_or_else(|| PlanError::UnknownTarget(name.to_string()))
    }

    /// Depth-first walk from `name` with an explicit stack
    ///
    /// Each frame is a target being visited and the index of its next
    /// dependency; the frames form the path from `name` to the current node.
    fn visit(&mut self, name: &str) -> PlanResult<()> {
        let root = self.lookup(name)?;
        if self.marks.contains_key(root.name.as_str()) {
            return Ok(());
        }

        let mut frames: Vec<(&'a TargetDefinition, usize)> = Vec::new();
        self.marks.insert(&root.name, Mark::Visiting);
        frames.push((root, 0));

        while let Some((target, next)) = frames.last().copied() {
            let Some(dep) = target.dependencies.get(next) else {
                frames.pop();
                self.marks.insert(&target.name, Mark::Visited);
                self.steps.push(target);
                continue;
            };

            if let Some(frame) = frames.last_mut() {
                frame.1 += 1;
            }

            let dep = self.lookup(dep)?;
            match self.marks.get(dep.name.as_str()) {
                Some(Mark::Visited) => {}
                Some(Mark::Visiting) => {
                    let start = frames
                        .iter()
                        .position(|(t, _)| t.name == dep.name)
                        .unwrap_or(0);
                    let mut cycle: Vec<String> =
                        frames[start..].iter().map(|(t, _)| t.name.clone()).collect();
                    cycle.push(dep.name.clone());
                    return Err(PlanError::Cycle(cycle));
                }
                None => {
                    self.marks.insert(&dep.name, Mark::Visiting);
                    frames.push((dep, 0));
                }
            }
        }

        Ok(())
    }
}
