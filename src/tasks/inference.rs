//! Image loading and model inference tasks.

use crate::core::container::required;
use crate::core::{base_configured_correctly, Code, Import, NodeBuilder, Variable};
use crate::error::Result;
use crate::validator::Validators;
use std::fmt;
use std::sync::Arc;

/// Reads an image file into an array.
#[derive(Debug)]
pub struct LoadImage {
    name: String,
    path: String,
    output: Arc<Variable>,
}

impl Code for LoadImage {
    fn name(&self) -> &str {
        &self.name
    }

    fn imports(&self) -> Vec<Import> {
        vec![
            Import::from_module("PIL", "Image"),
            Import::aliased("numpy", "np"),
        ]
    }

    fn outputs(&self) -> Vec<Arc<Variable>> {
        vec![self.output.clone()]
    }

    fn is_configured_correctly(&self, validators: &Validators) -> bool {
        validators.paths.is_valid_path_name(&self.path)
            && base_configured_correctly(self, validators)
    }

    fn code(&self) -> String {
        format!(
            "{} = np.asarray(Image.open('{}'), dtype=np.float32)",
            self.output.name(),
            self.path
        )
    }
}

impl fmt::Display for LoadImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LoadImage(name={}, path={}, output={})",
            self.name,
            self.path,
            self.output.name()
        )
    }
}

#[derive(Default)]
pub struct LoadImageBuilder {
    path: Option<String>,
    output: Option<Arc<Variable>>,
}

impl LoadImageBuilder {
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn output(mut self, output: Arc<Variable>) -> Self {
        self.output = Some(output);
        self
    }
}

impl NodeBuilder for LoadImageBuilder {
    type Node = LoadImage;

    fn build(self, name: &str) -> Result<LoadImage> {
        Ok(LoadImage {
            name: name.to_string(),
            path: required(self.path, name, "path")?,
            output: required(self.output, name, "output")?,
        })
    }
}

/// Opens an ONNX model for inference.
#[derive(Debug)]
pub struct MakeInferenceSession {
    name: String,
    model_path: String,
    session: Arc<Variable>,
}

impl Code for MakeInferenceSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn imports(&self) -> Vec<Import> {
        vec![Import::module("onnxruntime")]
    }

    fn outputs(&self) -> Vec<Arc<Variable>> {
        vec![self.session.clone()]
    }

    fn is_configured_correctly(&self, validators: &Validators) -> bool {
        validators.paths.is_valid_path_name(&self.model_path)
            && base_configured_correctly(self, validators)
    }

    fn code(&self) -> String {
        format!(
            "{} = onnxruntime.InferenceSession('{}')",
            self.session.name(),
            self.model_path
        )
    }
}

impl fmt::Display for MakeInferenceSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MakeInferenceSession(name={}, model_path={}, session={})",
            self.name,
            self.model_path,
            self.session.name()
        )
    }
}

#[derive(Default)]
pub struct MakeInferenceSessionBuilder {
    model_path: Option<String>,
    session: Option<Arc<Variable>>,
}

impl MakeInferenceSessionBuilder {
    pub fn model_path(mut self, path: impl Into<String>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn session(mut self, session: Arc<Variable>) -> Self {
        self.session = Some(session);
        self
    }
}

impl NodeBuilder for MakeInferenceSessionBuilder {
    type Node = MakeInferenceSession;

    fn build(self, name: &str) -> Result<MakeInferenceSession> {
        Ok(MakeInferenceSession {
            name: name.to_string(),
            model_path: required(self.model_path, name, "model_path")?,
            session: required(self.session, name, "session")?,
        })
    }
}

/// Feeds `input` through `session` and stores the result in `output`.
#[derive(Debug)]
pub struct RunInference {
    name: String,
    input: Arc<Variable>,
    session: Arc<Variable>,
    output: Arc<Variable>,
}

impl Code for RunInference {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> Vec<Arc<Variable>> {
        vec![self.input.clone(), self.session.clone()]
    }

    fn outputs(&self) -> Vec<Arc<Variable>> {
        vec![self.output.clone()]
    }

    fn code(&self) -> String {
        format!(
            "{} = {}.run(None, {{{}.get_inputs()[0].name: {}}})",
            self.output.name(),
            self.session.name(),
            self.session.name(),
            self.input.name()
        )
    }
}

impl fmt::Display for RunInference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RunInference(name={}, input={}, session={}, output={})",
            self.name,
            self.input.name(),
            self.session.name(),
            self.output.name()
        )
    }
}

#[derive(Default)]
pub struct RunInferenceBuilder {
    input: Option<Arc<Variable>>,
    session: Option<Arc<Variable>>,
    output: Option<Arc<Variable>>,
}

impl RunInferenceBuilder {
    pub fn input(mut self, input: Arc<Variable>) -> Self {
        self.input = Some(input);
        self
    }

    pub fn session(mut self, session: Arc<Variable>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn output(mut self, output: Arc<Variable>) -> Self {
        self.output = Some(output);
        self
    }
}

impl NodeBuilder for RunInferenceBuilder {
    type Node = RunInference;

    fn build(self, name: &str) -> Result<RunInference> {
        Ok(RunInference {
            name: name.to_string(),
            input: required(self.input, name, "input")?,
            session: required(self.session, name, "session")?,
            output: required(self.output, name, "output")?,
        })
    }
}
