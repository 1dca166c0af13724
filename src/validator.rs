//! Pluggable validity checks used by [`Code::is_configured_correctly`].
//!
//! [`Code::is_configured_correctly`]: crate::core::Code::is_configured_correctly

use crate::core::Import;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, OnceLock};

pub trait PathValidator: Send + Sync {
    fn is_valid_path_name(&self, path: &str) -> bool;
}

pub trait IdentifierValidator: Send + Sync {
    fn is_valid_identifier(&self, name: &str) -> bool;
}

pub trait ImportValidator: Send + Sync {
    /// Returns every invalid import, not just the first one.
    fn validate_imports(&self, imports: &[Import]) -> Result<(), Vec<Import>>;
}

/// Syntactic path check. Never touches the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPathValidator;

impl PathValidator for DefaultPathValidator {
    fn is_valid_path_name(&self, path: &str) -> bool {
        if path.is_empty() || path.contains('\0') {
            return false;
        }
        if path.ends_with('/') || path.ends_with('\\') {
            return false;
        }
        // A leading separator is fine (absolute path); empty inner segments are not.
        let trimmed = path.trim_start_matches('/');
        !trimmed.is_empty() && trimmed.split('/').all(|segment| !segment.is_empty())
    }
}

/// Requires the path to name an existing regular file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingFileValidator;

impl PathValidator for ExistingFileValidator {
    fn is_valid_path_name(&self, path: &str) -> bool {
        DefaultPathValidator.is_valid_path_name(path) && Path::new(path).is_file()
    }
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIdentifierValidator;

impl IdentifierValidator for DefaultIdentifierValidator {
    fn is_valid_identifier(&self, name: &str) -> bool {
        name != "_" && identifier_regex().is_match(name)
    }
}

/// Accepts an import when each component is a dotted path of identifiers.
#[derive(Clone)]
pub struct DefaultImportValidator {
    identifiers: Arc<dyn IdentifierValidator>,
}

impl DefaultImportValidator {
    pub fn new(identifiers: Arc<dyn IdentifierValidator>) -> Self {
        Self { identifiers }
    }

    fn is_valid_component(&self, component: &str) -> bool {
        component
            .split('.')
            .all(|part| self.identifiers.is_valid_identifier(part))
    }
}

impl Default for DefaultImportValidator {
    fn default() -> Self {
        Self::new(Arc::new(DefaultIdentifierValidator))
    }
}

impl ImportValidator for DefaultImportValidator {
    fn validate_imports(&self, imports: &[Import]) -> Result<(), Vec<Import>> {
        let invalid: Vec<Import> = imports
            .iter()
            .filter(|import| {
                !import
                    .components()
                    .iter()
                    .all(|component| self.is_valid_component(component))
            })
            .cloned()
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(invalid)
        }
    }
}

/// The validators a node consults when checking its configuration.
#[derive(Clone)]
pub struct Validators {
    pub paths: Arc<dyn PathValidator>,
    pub identifiers: Arc<dyn IdentifierValidator>,
    pub imports: Arc<dyn ImportValidator>,
}

impl Validators {
    pub fn new(
        paths: Arc<dyn PathValidator>,
        identifiers: Arc<dyn IdentifierValidator>,
        imports: Arc<dyn ImportValidator>,
    ) -> Self {
        Self {
            paths,
            identifiers,
            imports,
        }
    }

    /// Defaults with a different path validator.
    pub fn with_paths(paths: Arc<dyn PathValidator>) -> Self {
        Self {
            paths,
            ..Self::default()
        }
    }
}

impl Default for Validators {
    fn default() -> Self {
        let identifiers: Arc<dyn IdentifierValidator> = Arc::new(DefaultIdentifierValidator);
        Self {
            paths: Arc::new(DefaultPathValidator),
            imports: Arc::new(DefaultImportValidator::new(identifiers.clone())),
            identifiers,
        }
    }
}

impl std::fmt::Debug for Validators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validators").finish_non_exhaustive()
    }
}
