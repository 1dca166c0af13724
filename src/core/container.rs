//! Insertion-ordered, name-keyed node storage.
//!
//! Iteration order is part of the contract: graph construction and code
//! emission break ties by the order nodes were created in.

use crate::core::code::{Code, CodeRef, Variable};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Typed builder for one node kind.
///
/// Required fields are `Option`s until set; [`NodeBuilder::build`] fails
/// with [`Error::MissingField`] instead of producing a half-built node.
pub trait NodeBuilder: Default {
    type Node: Code + 'static;

    fn build(self, name: &str) -> Result<Self::Node>;
}

/// Unwrap a required builder field.
pub fn required<T>(value: Option<T>, node: &str, field: &'static str) -> Result<T> {
    value.ok_or_else(|| Error::MissingField {
        node: node.to_string(),
        field,
    })
}

/// A collection of uniquely named nodes.
pub struct Container<T: ?Sized> {
    nodes: Vec<Arc<T>>,
    index: HashMap<String, usize>,
}

pub type Tasks = Container<dyn Code>;
pub type Variables = Container<Variable>;

impl<T: ?Sized> Container<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add an already-constructed node.
    ///
    /// # Errors
    /// [`Error::DuplicateName`] if `name` is taken; the container is unchanged.
    pub fn insert(&mut self, name: &str, node: Arc<T>) -> Result<()> {
        self.ensure_free(name)?;
        self.index.insert(name.to_string(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.index.contains_key(name) {
            Err(Error::DuplicateName(name.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Nodes in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Arc<T>> + '_ {
        self.nodes.iter()
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<(&str, usize)> =
            self.index.iter().map(|(n, &i)| (n.as_str(), i)).collect();
        names.sort_by_key(|(_, i)| *i);
        names.into_iter().map(|(n, _)| n).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Container<dyn Code> {
    /// Build a task of kind `B`, configure it, and insert it under `name`.
    ///
    /// ```
    /// use scriptgen::core::Tasks;
    /// use scriptgen::tasks::StatementTaskBuilder;
    ///
    /// let mut tasks = Tasks::new();
    /// let task = tasks
    ///     .create("hello", |b: StatementTaskBuilder| b.code("print('hi')"))
    ///     .unwrap();
    /// assert_eq!(task.body(), "print('hi')");
    /// ```
    pub fn create<B, F>(&mut self, name: &str, configure: F) -> Result<Arc<B::Node>>
    where
        B: NodeBuilder,
        F: FnOnce(B) -> B,
    {
        self.ensure_free(name)?;
        let node = Arc::new(configure(B::default()).build(name)?);
        let shared: CodeRef = node.clone();
        self.insert(name, shared)?;
        Ok(node)
    }
}

impl Container<Variable> {
    pub fn create(&mut self, name: &str) -> Result<Arc<Variable>> {
        let variable = Variable::shared(name);
        self.insert(name, variable.clone())?;
        Ok(variable)
    }
}

impl<T: ?Sized> Default for Container<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for Container<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("names", &self.names())
            .finish()
    }
}
