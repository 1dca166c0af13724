use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Cannot add node {0} because that name is already present")]
    DuplicateName(String),

    #[error("Unknown node kind: {0}")]
    UnknownKind(String),

    #[error("Node {node} is missing required field `{field}`")]
    MissingField { node: String, field: &'static str },

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Invalid import string: {0}")]
    InvalidImport(String),

    #[error("Adding an edge from {from} to {to} caused a cycle")]
    Cycle { from: String, to: String },

    #[error("The following nodes are not reachable:\n\t{}", .nodes.join("\n\t"))]
    Island { nodes: Vec<String> },

    #[error("Script generation failed:\n{0}")]
    Generation(#[from] ScriptErrors),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Every independent failure found while generating a script.
///
/// Never empty: construction goes through [`ScriptErrors::new`], which
/// refuses an empty list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .0.join("\n"))]
pub struct ScriptErrors(Vec<String>);

impl ScriptErrors {
    pub fn new(messages: Vec<String>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(Self(messages))
        }
    }

    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<Error> for ScriptErrors {
    fn from(err: Error) -> Self {
        Self::single(err.to_string())
    }
}
