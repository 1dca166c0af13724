//! Core model of the code generator.
//!
//! This module contains the node contract, import declarations, the
//! node container and the code graph built from them.

pub mod code;
pub mod container;
pub mod graph;
pub mod import;

pub use code::{base_configured_correctly, produces_for, Code, CodeRef, Variable};
pub use container::{Container, NodeBuilder, Tasks, Variables};
pub use graph::{CodeGraph, EdgeKind, EdgeSummary, GraphBuilder, GraphSummary};
pub use import::Import;
