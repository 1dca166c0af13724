//! Script generation.
//!
//! [`ScriptGenerator`] validates every node, builds a [`CodeGraph`] rooted at
//! a synthetic final task, and emits the import block followed by each
//! node's body in dependency order.

use crate::core::import::sorted_imports;
use crate::core::{Code, CodeGraph, CodeRef, GraphBuilder, Import, Tasks, Variable, Variables};
use crate::error::ScriptErrors;
use crate::log::{self, LogLevel};
use crate::naming::{DefaultUniqueNameGenerator, UniqueNameGenerator};
use crate::tasks::EmptyTask;
use crate::validator::Validators;
use crate::{sglog, sglog_debug, sglog_error, sglog_trace, sglog_warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Generates one script from a set of variables and tasks.
pub struct ScriptGenerator {
    variables: Variables,
    tasks: Tasks,
    validators: Validators,
    names: Arc<dyn UniqueNameGenerator>,
    last_task: Option<CodeRef>,
    pregeneration_last_task: Option<CodeRef>,
    required: Vec<Arc<Variable>>,
}

/// A validated graph and the order its nodes are emitted in.
pub struct Plan {
    pub graph: CodeGraph,
    /// The synthetic task every emitted node leads to.
    pub root: CodeRef,
    /// Emission order, ending with `root`.
    pub order: Vec<CodeRef>,
}

impl ScriptGenerator {
    pub fn new(variables: Variables, tasks: Tasks) -> Self {
        Self {
            variables,
            tasks,
            validators: Validators::default(),
            names: Arc::new(DefaultUniqueNameGenerator::new()),
            last_task: None,
            pregeneration_last_task: None,
            required: Vec::new(),
        }
    }

    pub fn with_validators(mut self, validators: Validators) -> Self {
        self.validators = validators;
        self
    }

    pub fn with_name_generator(mut self, names: Arc<dyn UniqueNameGenerator>) -> Self {
        self.names = names;
        self
    }

    /// The task the script ends with. Nothing may depend on it.
    pub fn last_task(mut self, task: CodeRef) -> Self {
        self.last_task = Some(task);
        self
    }

    /// A task whose subgraph is emitted before any other task's code.
    pub fn pregeneration_last_task(mut self, task: CodeRef) -> Self {
        self.pregeneration_last_task = Some(task);
        self
    }

    /// Emit every task writing `variable`, even if the last task doesn't need it.
    pub fn require_generation(mut self, variable: Arc<Variable>) -> Self {
        if !self.required.contains(&variable) {
            self.required.push(variable);
        }
        self
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn tasks(&self) -> &Tasks {
        &self.tasks
    }

    pub fn required_variables(&self) -> &[Arc<Variable>] {
        &self.required
    }

    /// Every configuration problem, across all nodes.
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        match &self.last_task {
            None => errors.push("No last task was set.".to_string()),
            Some(last) => {
                let dependents: Vec<String> = self
                    .tasks
                    .values()
                    .filter(|task| task.name() != last.name())
                    .filter(|task| {
                        task.dependencies()
                            .iter()
                            .any(|dependency| dependency.name() == last.name())
                    })
                    .map(|task| format!("\t{}", task))
                    .collect();

                if !dependents.is_empty() {
                    errors.push(format!(
                        "Nothing should depend on the last task. These tasks depend on the last task:\n{}",
                        dependents.join("\n")
                    ));
                }
            }
        }

        let variables = self.variables.values().map(|v| v.clone() as CodeRef);
        for node in variables.chain(self.tasks.values().cloned()) {
            if !node.is_configured_correctly(&self.validators) {
                errors.push(format!("{} is configured incorrectly.", node));
            }
        }

        errors
    }

    fn final_task_name(&self) -> String {
        loop {
            let name = self.names.unique_name();
            if !self.tasks.contains(&name) && !self.variables.contains(&name) {
                return name;
            }
        }
    }

    /// Depends on the last task and on every producer of a required variable.
    fn final_composite_task(&self, last: &CodeRef) -> CodeRef {
        let mut dependencies = vec![last.clone()];
        let mut seen: HashSet<String> = HashSet::from([last.name().to_string()]);

        for variable in &self.required {
            if !self.tasks.values().any(|task| task.outputs().contains(variable)) {
                sglog_warn!("Required variable {} has no producer", variable.name());
            }
            for task in self.tasks.values() {
                if task.outputs().contains(variable) && seen.insert(task.name().to_string()) {
                    sglog_debug!(
                        "Adding dependency on {} because of required variable {}",
                        task.name(),
                        variable.name()
                    );
                    dependencies.push(task.clone());
                }
            }
        }

        Arc::new(EmptyTask::new(self.final_task_name(), dependencies))
    }

    /// Validate, build the graph, and compute the emission order.
    pub fn plan(&self) -> Result<Plan, ScriptErrors> {
        if let Some(errors) = ScriptErrors::new(self.validate()) {
            sglog_error!("Script is configured incorrectly:\n{}", errors);
            return Err(errors);
        }

        let Some(last) = &self.last_task else {
            return Err(ScriptErrors::single("No last task was set."));
        };

        if log::enabled(LogLevel::Debug) {
            log::log_block(
                LogLevel::Debug,
                "Required variables:",
                self.required.iter().map(|v| v.name()),
            );
            log::log_block(
                LogLevel::Debug,
                "Tasks:",
                self.tasks.values().map(|t| t.to_string()),
            );
        }

        let root = self.final_composite_task(last);

        let mut builder = GraphBuilder::new()
            .nodes(self.tasks.values().cloned())
            .node(root.clone());
        if let Some(first) = &self.pregeneration_last_task {
            builder = builder.pregeneration(first.clone());
        }

        let graph = builder.build().map_err(|err| {
            sglog_error!("Graph was invalid:\n{}", err);
            ScriptErrors::from(err)
        })?;

        let order = emission_order(&graph, &root);
        sglog_debug!(
            "Emission order: {}",
            order
                .iter()
                .map(|n| n.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Plan { graph, root, order })
    }

    /// Names of the nodes that would be emitted, in order.
    pub fn emission_order(&self) -> Result<Vec<String>, ScriptErrors> {
        let plan = self.plan()?;
        Ok(plan
            .order
            .iter()
            .filter(|node| node.name() != plan.root.name())
            .map(|node| node.name().to_string())
            .collect())
    }

    /// Generate the whole script.
    ///
    /// With `generate_debug_comments`, each import is preceded by a comment
    /// naming its variant and each node body by the node's string form.
    ///
    /// # Errors
    /// Every misconfigured node, or the first cycle or island found.
    pub fn code(&self, generate_debug_comments: bool) -> Result<String, ScriptErrors> {
        sglog!(
            "Generating script ({} variables, {} tasks)",
            self.variables.len(),
            self.tasks.len()
        );

        let plan = self.plan()?;

        let imports = sorted_imports(plan.graph.nodes().flat_map(|node| node.imports()));

        let mut script = String::new();
        append_imports(&mut script, &imports, generate_debug_comments);
        script.push('\n');
        for node in &plan.order {
            append_node(&mut script, node, generate_debug_comments);
        }

        let script = script.trim().to_string();
        sglog_trace!("Generated script:\n{}", script);
        Ok(script)
    }
}

impl std::fmt::Debug for ScriptGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptGenerator")
            .field("variables", &self.variables.names())
            .field("tasks", &self.tasks.names())
            .field("last_task", &self.last_task.as_ref().map(|t| t.name()))
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Predecessors first, each node exactly once.
///
/// Predecessors are visited in ascending order of their own predecessor
/// count, ties keeping insertion order.
pub fn emission_order(graph: &CodeGraph, root: &CodeRef) -> Vec<CodeRef> {
    fn visit(
        graph: &CodeGraph,
        node: &CodeRef,
        handled: &mut HashSet<String>,
        order: &mut Vec<CodeRef>,
    ) {
        if handled.contains(node.name()) {
            return;
        }

        let mut predecessors = graph.predecessors(node.name());
        // Stable sort keeps insertion order among equals.
        predecessors.sort_by_key(|p| graph.predecessors(p.name()).len());
        for predecessor in predecessors {
            visit(graph, predecessor, handled, order);
        }

        handled.insert(node.name().to_string());
        order.push(node.clone());
    }

    let mut handled = HashSet::new();
    let mut order = Vec::new();
    visit(graph, root, &mut handled, &mut order);
    order
}

fn append_imports(script: &mut String, imports: &[Import], generate_debug_comments: bool) {
    for import in imports {
        if generate_debug_comments {
            script.push_str(&format!("# class={}\n", import.variant_name()));
        }
        script.push_str(&import.code());
        script.push('\n');
    }
}

/// Every emitted node adds its body and a blank line, even an empty body.
fn append_node(script: &mut String, node: &CodeRef, generate_debug_comments: bool) {
    if generate_debug_comments {
        script.push_str(&format!("# {}\n", node));
    }
    script.push_str(&node.code());
    script.push_str("\n\n");
}
