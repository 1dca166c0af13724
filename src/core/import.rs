//! Import declarations required by emitted code.
//!
//! An [`Import`] renders to a fixed statement per variant. Equality is
//! structural, so two nodes declaring the same import collapse to a single
//! line in the generated script.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// A single import statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Import {
    /// `import <module>`
    ModuleOnly { module: String },
    /// `from <module> import <identifier>`
    ModuleAndIdentifier { module: String, identifier: String },
    /// `import <module> as <name>`
    ModuleAndName { module: String, name: String },
    /// `from <module> import <identifier> as <name>`
    FullImport {
        module: String,
        identifier: String,
        name: String,
    },
}

impl Import {
    pub fn module(module: impl Into<String>) -> Self {
        Import::ModuleOnly {
            module: module.into(),
        }
    }

    pub fn from_module(module: impl Into<String>, identifier: impl Into<String>) -> Self {
        Import::ModuleAndIdentifier {
            module: module.into(),
            identifier: identifier.into(),
        }
    }

    pub fn aliased(module: impl Into<String>, name: impl Into<String>) -> Self {
        Import::ModuleAndName {
            module: module.into(),
            name: name.into(),
        }
    }

    pub fn full(
        module: impl Into<String>,
        identifier: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Import::FullImport {
            module: module.into(),
            identifier: identifier.into(),
            name: name.into(),
        }
    }

    /// The statement text for this import. Pure.
    pub fn code(&self) -> String {
        match self {
            Import::ModuleOnly { module } => format!("import {}", module),
            Import::ModuleAndIdentifier { module, identifier } => {
                format!("from {} import {}", module, identifier)
            }
            Import::ModuleAndName { module, name } => format!("import {} as {}", module, name),
            Import::FullImport {
                module,
                identifier,
                name,
            } => format!("from {} import {} as {}", module, identifier, name),
        }
    }

    /// The bare parts of the import, without statement syntax.
    pub fn components(&self) -> Vec<&str> {
        match self {
            Import::ModuleOnly { module } => vec![module],
            Import::ModuleAndIdentifier { module, identifier } => vec![module, identifier],
            Import::ModuleAndName { module, name } => vec![module, name],
            Import::FullImport {
                module,
                identifier,
                name,
            } => vec![module, identifier, name],
        }
    }

    /// Variant name, used by debug comments.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Import::ModuleOnly { .. } => "ModuleOnly",
            Import::ModuleAndIdentifier { .. } => "ModuleAndIdentifier",
            Import::ModuleAndName { .. } => "ModuleAndName",
            Import::FullImport { .. } => "FullImport",
        }
    }
}

impl std::fmt::Display for Import {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for Import {
    type Err = Error;

    /// Parses one of the four statement shapes this type renders.
    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let import = match tokens.as_slice() {
            ["import", module] => Import::module(*module),
            ["from", module, "import", identifier] => Import::from_module(*module, *identifier),
            ["import", module, "as", name] => Import::aliased(*module, *name),
            ["from", module, "import", identifier, "as", name] => {
                Import::full(*module, *identifier, *name)
            }
            _ => return Err(Error::InvalidImport(s.to_string())),
        };
        Ok(import)
    }
}

impl Serialize for Import {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for Import {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Deduplicate imports and order them by their rendered text.
pub fn sorted_imports<I>(imports: I) -> Vec<Import>
where
    I: IntoIterator<Item = Import>,
{
    let mut rendered: Vec<(String, Import)> = imports
        .into_iter()
        .map(|import| (import.code(), import))
        .collect();
    rendered.sort_by(|a, b| a.0.cmp(&b.0));
    rendered.dedup_by(|a, b| a.1 == b.1);
    rendered.into_iter().map(|(_, import)| import).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_per_variant() {
        assert_eq!(Import::module("os").code(), "import os");
        assert_eq!(Import::from_module("a", "b").code(), "from a import b");
        assert_eq!(Import::aliased("numpy", "np").code(), "import numpy as np");
        assert_eq!(
            Import::full("tensorflow", "keras", "k").code(),
            "from tensorflow import keras as k"
        );
    }

    #[test]
    fn test_parse_every_shape() {
        for text in [
            "import os",
            "from a import b",
            "import numpy as np",
            "from tensorflow import keras as k",
        ] {
            let import: Import = text.parse().unwrap();
            assert_eq!(import.code(), text);
        }
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let import: Import = "  from   a\timport b ".parse().unwrap();
        assert_eq!(import, Import::from_module("a", "b"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", "import", "from a b", "import a b c", "from a import b as"] {
            let result = text.parse::<Import>();
            assert!(
                matches!(result, Err(Error::InvalidImport(_))),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Import::module("os"), Import::module("os"));
        // Same text fields, different variant
        assert_ne!(Import::from_module("a", "b"), Import::aliased("a", "b"));
    }

    #[test]
    fn test_components() {
        assert_eq!(Import::full("a", "b", "c").components(), vec!["a", "b", "c"]);
        assert_eq!(Import::module("os").components(), vec!["os"]);
    }

    #[test]
    fn test_sorted_imports_dedup_and_order() {
        let imports = vec![
            Import::module("os"),
            Import::from_module("a", "b"),
            Import::module("os"),
        ];
        let sorted = sorted_imports(imports);
        assert_eq!(
            sorted,
            vec![Import::from_module("a", "b"), Import::module("os")]
        );
    }

    #[test]
    fn test_serde_as_statement_text() {
        let import = Import::aliased("numpy", "np");
        let json = serde_json::to_string(&import).unwrap();
        assert_eq!(json, "\"import numpy as np\"");
        let parsed: Import = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, import);
        assert!(serde_json::from_str::<Import>("\"nonsense\"").is_err());
    }
}
