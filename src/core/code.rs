//! The node contract shared by tasks and variables.
//!
//! Every participant in a [`CodeGraph`](crate::core::CodeGraph) implements
//! [`Code`]. Tasks are statement-like nodes that render a body; variables
//! are named bindings that tasks read and write.

use crate::core::import::Import;
use crate::validator::Validators;
use std::fmt;
use std::sync::Arc;

/// Shared handle to any node.
pub type CodeRef = Arc<dyn Code>;

/// Capability set of a graph node.
pub trait Code: fmt::Display + Send + Sync {
    /// Unique within the node's container.
    fn name(&self) -> &str;

    /// Imports required if this node is emitted.
    fn imports(&self) -> Vec<Import> {
        Vec::new()
    }

    /// Variables this node reads.
    fn inputs(&self) -> Vec<Arc<Variable>> {
        Vec::new()
    }

    /// Variables this node writes.
    fn outputs(&self) -> Vec<Arc<Variable>> {
        Vec::new()
    }

    /// Nodes that must be emitted before this one regardless of variables.
    fn dependencies(&self) -> Vec<CodeRef> {
        Vec::new()
    }

    /// Whether the node's own fields, imports, inputs and outputs are valid.
    ///
    /// Implementations that add field checks should combine them with
    /// [`base_configured_correctly`].
    fn is_configured_correctly(&self, validators: &Validators) -> bool {
        base_configured_correctly(self, validators)
    }

    /// Renders the node body, assuming every dependency's outputs exist.
    fn code(&self) -> String;
}

/// The checks every node shares: valid imports, inputs and outputs.
pub fn base_configured_correctly<C: Code + ?Sized>(node: &C, validators: &Validators) -> bool {
    validators.imports.validate_imports(&node.imports()).is_ok()
        && node
            .inputs()
            .iter()
            .all(|input| input.is_configured_correctly(validators))
        && node
            .outputs()
            .iter()
            .all(|output| output.is_configured_correctly(validators))
}

/// Whether any output of `producer` is an input of `consumer`.
pub fn produces_for(producer: &dyn Code, consumer: &dyn Code) -> bool {
    let inputs = consumer.inputs();
    producer
        .outputs()
        .iter()
        .any(|output| inputs.iter().any(|input| input == output))
}

/// A named binding, produced by one task and read by any number of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }
}

impl Code for Variable {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_configured_correctly(&self, validators: &Validators) -> bool {
        validators.identifiers.is_valid_identifier(&self.name)
    }

    /// Variables are bound by the task that writes them.
    fn code(&self) -> String {
        String::new()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable(name={})", self.name)
    }
}
