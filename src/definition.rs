//! Script definition files.
//!
//! A definition is a TOML document naming variables and tasks, which task
//! ends the script, and which variables must be produced regardless:
//!
//! ```toml
//! last = "infer"
//! required = ["classes"]
//!
//! [[variables]]
//! name = "img"
//!
//! [[tasks]]
//! name = "loadImage"
//! kind = "load_image"
//! path = "cat.png"
//! output = "img"
//! ```
//!
//! Each task's `kind` is looked up in a [`Registry`] to find the function
//! that builds it.

use crate::core::{CodeRef, Import, NodeBuilder, Tasks, Variable, Variables};
use crate::generator::ScriptGenerator;
use crate::naming::{DefaultUniqueNameGenerator, UniqueNameGenerator};
use crate::tasks::{
    EmptyTaskBuilder, LoadClassLabelsBuilder, LoadImageBuilder, MakeInferenceSessionBuilder,
    RunInferenceBuilder, StatementTaskBuilder,
};
use crate::validator::Validators;
use crate::{sglog_debug, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDefinition {
    /// Name of the task the script ends with.
    pub last: String,
    #[serde(default)]
    pub required: Vec<String>,
    /// Task whose subgraph is emitted before everything else.
    #[serde(default)]
    pub pregenerate: Option<String>,
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
}

/// One `[[tasks]]` entry. Which fields matter depends on `kind`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Generated when omitted.
    #[serde(default)]
    pub name: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Variables and tasks declared so far, for resolving references.
pub struct Scope<'a> {
    variables: &'a Variables,
    tasks: &'a Tasks,
}

impl<'a> Scope<'a> {
    pub fn new(variables: &'a Variables, tasks: &'a Tasks) -> Self {
        Self { variables, tasks }
    }

    pub fn variable(&self, name: &str) -> Result<Arc<Variable>> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownNode(name.to_string()))
    }

    pub fn task(&self, name: &str) -> Result<CodeRef> {
        self.tasks
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownNode(name.to_string()))
    }
}

/// Builds the task named by the first argument from its definition entry.
pub type Constructor = fn(&str, &TaskSpec, &Scope<'_>) -> Result<CodeRef>;

/// Maps task kinds to constructors.
#[derive(Clone)]
pub struct Registry {
    constructors: BTreeMap<String, Constructor>,
}

impl Registry {
    /// A registry with no kinds at all.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, kind: impl Into<String>, constructor: Constructor) {
        self.constructors.insert(kind.into(), constructor);
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    pub fn construct(&self, name: &str, spec: &TaskSpec, scope: &Scope<'_>) -> Result<CodeRef> {
        let constructor = self
            .constructors
            .get(&spec.kind)
            .ok_or_else(|| Error::UnknownKind(spec.kind.clone()))?;
        constructor(name, spec, scope)
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("empty", build_empty);
        registry.register("statement", build_statement);
        registry.register("load_class_labels", build_load_class_labels);
        registry.register("load_image", build_load_image);
        registry.register("make_inference_session", build_make_inference_session);
        registry.register("run_inference", build_run_inference);
        registry
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

fn build_empty(name: &str, spec: &TaskSpec, scope: &Scope<'_>) -> Result<CodeRef> {
    let mut builder = EmptyTaskBuilder::default();
    for dependency in &spec.depends_on {
        builder = builder.depends_on(scope.task(dependency)?);
    }
    Ok(Arc::new(builder.build(name)?))
}

fn build_statement(name: &str, spec: &TaskSpec, scope: &Scope<'_>) -> Result<CodeRef> {
    let mut builder = StatementTaskBuilder::default();
    if let Some(code) = &spec.code {
        builder = builder.code(code);
    }
    for import in &spec.imports {
        builder = builder.import(import.clone());
    }
    for input in &spec.inputs {
        builder = builder.input(scope.variable(input)?);
    }
    for output in &spec.outputs {
        builder = builder.output(scope.variable(output)?);
    }
    for dependency in &spec.depends_on {
        builder = builder.depends_on(scope.task(dependency)?);
    }
    Ok(Arc::new(builder.build(name)?))
}

fn build_load_class_labels(name: &str, spec: &TaskSpec, scope: &Scope<'_>) -> Result<CodeRef> {
    let mut builder = LoadClassLabelsBuilder::default();
    if let Some(path) = &spec.path {
        builder = builder.path(path);
    }
    if let Some(output) = &spec.output {
        builder = builder.output(scope.variable(output)?);
    }
    Ok(Arc::new(builder.build(name)?))
}

fn build_load_image(name: &str, spec: &TaskSpec, scope: &Scope<'_>) -> Result<CodeRef> {
    let mut builder = LoadImageBuilder::default();
    if let Some(path) = &spec.path {
        builder = builder.path(path);
    }
    if let Some(output) = &spec.output {
        builder = builder.output(scope.variable(output)?);
    }
    Ok(Arc::new(builder.build(name)?))
}

fn build_make_inference_session(
    name: &str,
    spec: &TaskSpec,
    scope: &Scope<'_>,
) -> Result<CodeRef> {
    let mut builder = MakeInferenceSessionBuilder::default();
    if let Some(path) = &spec.model_path {
        builder = builder.model_path(path);
    }
    if let Some(session) = &spec.session {
        builder = builder.session(scope.variable(session)?);
    }
    Ok(Arc::new(builder.build(name)?))
}

fn build_run_inference(name: &str, spec: &TaskSpec, scope: &Scope<'_>) -> Result<CodeRef> {
    let mut builder = RunInferenceBuilder::default();
    if let Some(input) = &spec.input {
        builder = builder.input(scope.variable(input)?);
    }
    if let Some(session) = &spec.session {
        builder = builder.session(scope.variable(session)?);
    }
    if let Some(output) = &spec.output {
        builder = builder.output(scope.variable(output)?);
    }
    Ok(Arc::new(builder.build(name)?))
}

impl ScriptDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        sglog_debug!("ScriptDefinition::load path={}", path.display());
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the declared nodes and a generator over them.
    ///
    /// # Errors
    /// - [`Error::UnknownKind`] for a task kind `registry` doesn't know
    /// - [`Error::UnknownNode`] for a reference to an undeclared name, or to
    ///   a task declared later in the file
    /// - [`Error::DuplicateName`] and [`Error::MissingField`] from the builders
    pub fn into_generator(
        self,
        registry: &Registry,
        validators: Validators,
    ) -> Result<ScriptGenerator> {
        let mut variables = Variables::new();
        for spec in &self.variables {
            variables.create(&spec.name)?;
        }

        let names = DefaultUniqueNameGenerator::with_prefix("task");
        // Generated names must not take a name declared further down.
        let declared: HashSet<&str> = self
            .tasks
            .iter()
            .filter_map(|spec| spec.name.as_deref())
            .collect();
        let mut tasks = Tasks::new();
        for spec in &self.tasks {
            let name = match &spec.name {
                Some(name) => name.clone(),
                None => loop {
                    let candidate = names.unique_name();
                    if !declared.contains(candidate.as_str()) && !tasks.contains(&candidate) {
                        break candidate;
                    }
                },
            };
            let node = registry.construct(&name, spec, &Scope::new(&variables, &tasks))?;
            tasks.insert(&name, node)?;
        }
        sglog_debug!(
            "Definition declares {} variables and {} tasks",
            variables.len(),
            tasks.len()
        );

        let scope = Scope::new(&variables, &tasks);
        let last = scope.task(&self.last)?;
        let required = self
            .required
            .iter()
            .map(|name| scope.variable(name))
            .collect::<Result<Vec<_>>>()?;
        let pregenerate = self
            .pregenerate
            .as_deref()
            .map(|name| scope.task(name))
            .transpose()?;

        let mut generator = ScriptGenerator::new(variables, tasks)
            .with_validators(validators)
            .last_task(last);
        for variable in required {
            generator = generator.require_generation(variable);
        }
        if let Some(task) = pregenerate {
            generator = generator.pregeneration_last_task(task);
        }
        Ok(generator)
    }
}
