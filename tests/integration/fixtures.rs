//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Writing definition files into a temporary directory
//! - A predefined image classification pipeline

use std::path::PathBuf;
use tempfile::TempDir;

use scriptgen::{Registry, ScriptDefinition, ScriptGenerator, Validators};

/// Definition of a classifier: labels, image, session, inference.
pub const CLASSIFY: &str = r#"
last = "infer"
required = ["classes"]

[[variables]]
name = "classes"

[[variables]]
name = "img"

[[variables]]
name = "session"

[[variables]]
name = "result"

[[tasks]]
name = "loadLabels"
kind = "load_class_labels"
path = "labels.txt"
output = "classes"

[[tasks]]
name = "loadImage"
kind = "load_image"
path = "cat.png"
output = "img"

[[tasks]]
name = "makeSession"
kind = "make_inference_session"
model_path = "model.onnx"
session = "session"

[[tasks]]
name = "infer"
kind = "run_inference"
input = "img"
session = "session"
output = "result"
"#;

/// A temporary directory holding definition files.
pub struct Workspace {
    pub temp_dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `contents` to `name` inside the workspace.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Write a definition and build a generator from it with default validators.
    pub fn generator(&self, name: &str, definition: &str) -> scriptgen::Result<ScriptGenerator> {
        self.generator_with(name, definition, Validators::default())
    }

    pub fn generator_with(
        &self,
        name: &str,
        definition: &str,
        validators: Validators,
    ) -> scriptgen::Result<ScriptGenerator> {
        let path = self.write(name, definition);
        ScriptDefinition::load(&path)?.into_generator(&Registry::default(), validators)
    }
}
