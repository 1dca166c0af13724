//! A task that renders nothing.
//!
//! Used to join several emission roots into one, most notably by the
//! script generator's final composite task.

use crate::core::{Code, CodeRef, NodeBuilder};
use crate::error::Result;
use std::fmt;

pub struct EmptyTask {
    name: String,
    dependencies: Vec<CodeRef>,
}

impl EmptyTask {
    pub fn new(name: impl Into<String>, dependencies: Vec<CodeRef>) -> Self {
        Self {
            name: name.into(),
            dependencies,
        }
    }
}

impl Code for EmptyTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> Vec<CodeRef> {
        self.dependencies.clone()
    }

    fn code(&self) -> String {
        String::new()
    }
}

impl fmt::Display for EmptyTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deps: Vec<&str> = self.dependencies.iter().map(|d| d.name()).collect();
        write!(
            f,
            "EmptyTask(name={}, dependencies=[{}])",
            self.name,
            deps.join(", ")
        )
    }
}

impl fmt::Debug for EmptyTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deps: Vec<&str> = self.dependencies.iter().map(|d| d.name()).collect();
        f.debug_struct("EmptyTask")
            .field("name", &self.name)
            .field("dependencies", &deps)
            .finish()
    }
}

#[derive(Default)]
pub struct EmptyTaskBuilder {
    dependencies: Vec<CodeRef>,
}

impl EmptyTaskBuilder {
    pub fn depends_on(mut self, dependency: CodeRef) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

impl NodeBuilder for EmptyTaskBuilder {
    type Node = EmptyTask;

    fn build(self, name: &str) -> Result<EmptyTask> {
        Ok(EmptyTask::new(name, self.dependencies))
    }
}
