pub mod config;
pub mod core;
pub mod definition;
pub mod error;
pub mod generator;
pub mod log;
pub mod naming;
pub mod tasks;
pub mod validator;

pub use crate::core::{Code, CodeGraph, CodeRef, Import, Tasks, Variable, Variables};
pub use definition::{Registry, ScriptDefinition};
pub use error::{Error, Result, ScriptErrors};
pub use generator::ScriptGenerator;
pub use validator::Validators;
