use crate::core::container::required;
use crate::core::{base_configured_correctly, Code, NodeBuilder, Variable};
use crate::error::Result;
use crate::validator::Validators;
use std::fmt;
use std::sync::Arc;

/// Loads one class label per line from a text file.
#[derive(Debug)]
pub struct LoadClassLabels {
    name: String,
    path: String,
    output: Arc<Variable>,
}

impl Code for LoadClassLabels {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> Vec<Arc<Variable>> {
        vec![self.output.clone()]
    }

    fn is_configured_correctly(&self, validators: &Validators) -> bool {
        validators.paths.is_valid_path_name(&self.path)
            && base_configured_correctly(self, validators)
    }

    fn code(&self) -> String {
        format!(
            "{} = [line.rstrip('\\n') for line in open('{}')]",
            self.output.name(),
            self.path
        )
    }
}

impl fmt::Display for LoadClassLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LoadClassLabels(name={}, path={}, output={})",
            self.name,
            self.path,
            self.output.name()
        )
    }
}

#[derive(Default)]
pub struct LoadClassLabelsBuilder {
    path: Option<String>,
    output: Option<Arc<Variable>>,
}

impl LoadClassLabelsBuilder {
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn output(mut self, output: Arc<Variable>) -> Self {
        self.output = Some(output);
        self
    }
}

impl NodeBuilder for LoadClassLabelsBuilder {
    type Node = LoadClassLabels;

    fn build(self, name: &str) -> Result<LoadClassLabels> {
        Ok(LoadClassLabels {
            name: name.to_string(),
            path: required(self.path, name, "path")?,
            output: required(self.output, name, "output")?,
        })
    }
}
