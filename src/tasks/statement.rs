//! A task with an arbitrary, caller-supplied body.

use crate::core::container::required;
use crate::core::{base_configured_correctly, Code, CodeRef, Import, NodeBuilder, Variable};
use crate::error::Result;
use crate::validator::Validators;
use std::fmt;
use std::sync::Arc;

/// Emits `body` verbatim. Everything the body touches must be declared
/// through imports, inputs, outputs and dependencies.
pub struct StatementTask {
    name: String,
    body: String,
    imports: Vec<Import>,
    inputs: Vec<Arc<Variable>>,
    outputs: Vec<Arc<Variable>>,
    dependencies: Vec<CodeRef>,
}

impl StatementTask {
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Code for StatementTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn imports(&self) -> Vec<Import> {
        self.imports.clone()
    }

    fn inputs(&self) -> Vec<Arc<Variable>> {
        self.inputs.clone()
    }

    fn outputs(&self) -> Vec<Arc<Variable>> {
        self.outputs.clone()
    }

    fn dependencies(&self) -> Vec<CodeRef> {
        self.dependencies.clone()
    }

    fn is_configured_correctly(&self, validators: &Validators) -> bool {
        !self.body.trim().is_empty() && base_configured_correctly(self, validators)
    }

    fn code(&self) -> String {
        self.body.clone()
    }
}

impl fmt::Display for StatementTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |vars: &[Arc<Variable>]| {
            vars.iter()
                .map(|v| v.name().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "StatementTask(name={}, inputs=[{}], outputs=[{}])",
            self.name,
            names(&self.inputs),
            names(&self.outputs)
        )
    }
}

impl fmt::Debug for StatementTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependencies: Vec<&str> = self.dependencies.iter().map(|d| d.name()).collect();
        f.debug_struct("StatementTask")
            .field("name", &self.name)
            .field("body", &self.body)
            .field("imports", &self.imports)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("dependencies", &dependencies)
            .finish()
    }
}

#[derive(Default)]
pub struct StatementTaskBuilder {
    body: Option<String>,
    imports: Vec<Import>,
    inputs: Vec<Arc<Variable>>,
    outputs: Vec<Arc<Variable>>,
    dependencies: Vec<CodeRef>,
}

impl StatementTaskBuilder {
    pub fn code(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn import(mut self, import: Import) -> Self {
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
        self
    }

    pub fn input(mut self, variable: Arc<Variable>) -> Self {
        if !self.inputs.contains(&variable) {
            self.inputs.push(variable);
        }
        self
    }

    pub fn output(mut self, variable: Arc<Variable>) -> Self {
        if !self.outputs.contains(&variable) {
            self.outputs.push(variable);
        }
        self
    }

    pub fn depends_on(mut self, dependency: CodeRef) -> Self {
        if !self
            .dependencies
            .iter()
            .any(|d| d.name() == dependency.name())
        {
            self.dependencies.push(dependency);
        }
        self
    }
}

impl NodeBuilder for StatementTaskBuilder {
    type Node = StatementTask;

    fn build(self, name: &str) -> Result<StatementTask> {
        Ok(StatementTask {
            name: name.to_string(),
            body: required(self.body, name, "code")?,
            imports: self.imports,
            inputs: self.inputs,
            outputs: self.outputs,
            dependencies: self.dependencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_statement_requires_code() {
        let err = StatementTaskBuilder::default().build("s").unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "code", .. }));
    }

    #[test]
    fn test_debug_lists_dependency_names() {
        let first: CodeRef = Arc::new(
            StatementTaskBuilder::default()
                .code("a()")
                .build("first")
                .unwrap(),
        );
        let task = StatementTaskBuilder::default()
            .code("b()")
            .depends_on(first)
            .build("second")
            .unwrap();
        let debug = format!("{:?}", task);
        assert!(debug.starts_with("StatementTask { name: \"second\""));
        assert!(debug.contains("dependencies: [\"first\"]"));
    }

    #[test]
    fn test_statement_renders_body() {
        let task = StatementTaskBuilder::default()
            .code("x = 1")
            .output(Variable::shared("x"))
            .build("assign")
            .unwrap();
        assert_eq!(task.code(), "x = 1");
        assert_eq!(
            task.to_string(),
            "StatementTask(name=assign, inputs=[], outputs=[x])"
        );
    }

    #[test]
    fn test_blank_body_is_misconfigured() {
        let task = StatementTaskBuilder::default()
            .code("   ")
            .build("blank")
            .unwrap();
        assert!(!task.is_configured_correctly(&Validators::default()));
    }

    #[test]
    fn test_builder_deduplicates() {
        let x = Variable::shared("x");
        let task = StatementTaskBuilder::default()
            .code("print(x)")
            .import(Import::module("os"))
            .import(Import::module("os"))
            .input(x.clone())
            .input(x)
            .build("p")
            .unwrap();
        assert_eq!(task.imports().len(), 1);
        assert_eq!(task.inputs().len(), 1);
    }

    #[test]
    fn test_invalid_output_name_is_misconfigured() {
        let task = StatementTaskBuilder::default()
            .code("pass")
            .output(Variable::shared("not valid"))
            .build("bad")
            .unwrap();
        assert!(!task.is_configured_correctly(&Validators::default()));
    }
}
