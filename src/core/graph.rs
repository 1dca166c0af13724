//! Code graph construction.
//!
//! This module turns a set of [`Code`] nodes into a directed acyclic graph.
//! Edges come from two sources: explicit [`Code::dependencies`] and implicit
//! variable linkage (a node writing a variable another node reads). Every
//! edge is checked for cycles as it is added, and the finished graph must be
//! a single connected component.

use crate::core::code::{produces_for, CodeRef};
use crate::error::{Error, Result};
use crate::log::{self, LogLevel};
use crate::sglog_debug;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Why an edge exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// The target lists the source in its dependencies.
    Dependency,
    /// The source writes a variable the target reads.
    Variable,
    /// The source is the pre-generation task and must precede the target.
    Pregeneration,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Dependency => write!(f, "dependency"),
            EdgeKind::Variable => write!(f, "variable"),
            EdgeKind::Pregeneration => write!(f, "pregeneration"),
        }
    }
}

/// An immutable, validated graph of code nodes.
///
/// Nodes are identified by name. Edges point from a node to the nodes that
/// must be emitted after it.
pub struct CodeGraph {
    graph: DiGraph<CodeRef, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

/// Collects the inputs to a [`CodeGraph`] and builds it.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<CodeRef>,
    pregeneration: Option<CodeRef>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one node. Order matters: it decides edge order and tie-breaks.
    pub fn node(mut self, node: CodeRef) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = CodeRef>,
    {
        self.nodes.extend(nodes);
        self
    }

    /// A node whose subgraph must precede every other node.
    pub fn pregeneration(mut self, node: CodeRef) -> Self {
        self.pregeneration = Some(node);
        self
    }

    /// Build and validate the graph.
    ///
    /// # Errors
    /// - [`Error::Cycle`] for the first edge that would close a cycle
    /// - [`Error::Island`] if the result is not a single connected component
    pub fn build(self) -> Result<CodeGraph> {
        let mut graph = CodeGraph::empty(self.nodes.len());

        for node in &self.nodes {
            graph.add_with_dependencies(node)?;
        }

        for producer in &self.nodes {
            for consumer in &self.nodes {
                if producer.name() != consumer.name() && produces_for(&**producer, &**consumer) {
                    graph.add_edge(producer, consumer, EdgeKind::Variable)?;
                }
            }
        }

        if let Some(first) = &self.pregeneration {
            graph.add_with_dependencies(first)?;
            let first_index = graph.index[first.name()];
            for node in &self.nodes {
                let index = graph.index[node.name()];
                // Nodes the pre-generation task itself needs stay ahead of it.
                if index == first_index || has_path_connecting(&graph.graph, index, first_index, None)
                {
                    continue;
                }
                graph.add_edge(first, node, EdgeKind::Pregeneration)?;
            }
        }

        graph.check_islands()?;

        if log::enabled(LogLevel::Debug) {
            log::log_block(LogLevel::Debug, "Graph adjacency list:", graph.adjacency_list());
        }

        Ok(graph)
    }
}

impl CodeGraph {
    /// Build a graph from `nodes` with no pre-generation task.
    pub fn build<I>(nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = CodeRef>,
    {
        GraphBuilder::new().nodes(nodes).build()
    }

    fn empty(capacity: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(capacity, capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Add a node, returning the existing index if the name is known.
    fn add_node(&mut self, node: &CodeRef) -> NodeIndex {
        if let Some(&index) = self.index.get(node.name()) {
            return index;
        }

        let index = self.graph.add_node(node.clone());
        self.index.insert(node.name().to_string(), index);
        index
    }

    /// Add `node` and its dependency edges, pulling in dependencies that
    /// were not part of the input.
    fn add_with_dependencies(&mut self, node: &CodeRef) -> Result<()> {
        self.add_node(node);

        for dependency in node.dependencies() {
            // Don't recurse if the edge was already in the graph
            if self.add_edge(&dependency, node, EdgeKind::Dependency)? {
                self.add_with_dependencies(&dependency)?;
            }
        }

        Ok(())
    }

    /// Add the edge `from -> to` unless it already exists.
    ///
    /// Returns whether a new edge was added. The edge is rejected if `to`
    /// can already reach `from`, since it would complete a cycle.
    fn add_edge(&mut self, from: &CodeRef, to: &CodeRef, kind: EdgeKind) -> Result<bool> {
        let from_index = self.add_node(from);
        let to_index = self.add_node(to);

        if from_index != to_index && self.graph.find_edge(from_index, to_index).is_some() {
            return Ok(false);
        }

        if from_index == to_index || has_path_connecting(&self.graph, to_index, from_index, None) {
            return Err(Error::Cycle {
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
        }

        sglog_debug!("Adding {} edge {} -> {}", kind, from.name(), to.name());
        self.graph.add_edge(from_index, to_index, kind);
        Ok(true)
    }

    /// Fails unless every node is reachable from every other node when
    /// edge direction is ignored.
    fn check_islands(&self) -> Result<()> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut representatives = Vec::new();

        for start in self.graph.node_indices() {
            if visited.contains(&start) {
                continue;
            }
            if !visited.is_empty() {
                representatives.push(self.graph[start].name().to_string());
            }

            let mut queue = VecDeque::from([start]);
            visited.insert(start);
            while let Some(index) = queue.pop_front() {
                for neighbor in self.graph.neighbors_undirected(index) {
                    if visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        if representatives.is_empty() {
            Ok(())
        } else {
            Err(Error::Island {
                nodes: representatives,
            })
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CodeRef> {
        self.index.get(name).map(|&index| &self.graph[index])
    }

    /// Nodes in the order they were first added.
    pub fn nodes(&self) -> impl Iterator<Item = &CodeRef> + '_ {
        self.graph.node_weights()
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&CodeRef> {
        let Some(&index) = self.index.get(name) else {
            return Vec::new();
        };
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(index, direction).collect();
        neighbors.sort();
        neighbors.into_iter().map(|n| &self.graph[n]).collect()
    }

    /// Nodes with an edge into `name`, in insertion order.
    pub fn predecessors(&self, name: &str) -> Vec<&CodeRef> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Nodes with an edge out of `name`, in insertion order.
    pub fn successors(&self, name: &str) -> Vec<&CodeRef> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Position of `name` in insertion order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|index| index.index())
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<EdgeKind> {
        let from = self.index.get(from)?;
        let to = self.index.get(to)?;
        let edge = self.graph.find_edge(*from, *to)?;
        self.graph.edge_weight(edge).copied()
    }

    /// One `node -> successor, successor` line per node.
    pub fn adjacency_list(&self) -> Vec<String> {
        self.nodes()
            .map(|node| {
                let successors: Vec<&str> = self
                    .successors(node.name())
                    .into_iter()
                    .map(|s| s.name())
                    .collect();
                format!("{} -> {}", node.name(), successors.join(", "))
            })
            .collect()
    }

    /// Serializable view of the graph.
    pub fn summary(&self) -> GraphSummary {
        let mut edges: Vec<EdgeSummary> = self
            .graph
            .edge_references()
            .map(|edge| EdgeSummary {
                from: self.graph[edge.source()].name().to_string(),
                to: self.graph[edge.target()].name().to_string(),
                kind: *edge.weight(),
            })
            .collect();
        edges.sort_by_key(|e| (self.position(&e.from), self.position(&e.to)));

        GraphSummary {
            nodes: self.nodes().map(|n| n.name().to_string()).collect(),
            edges,
        }
    }
}

impl std::fmt::Debug for CodeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSummary {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}
