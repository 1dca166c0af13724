//! End-to-end generation from definition files.

use crate::fixtures::{Workspace, CLASSIFY};
use scriptgen::config::Config;

const CLASSIFY_SCRIPT: &str = "from PIL import Image
import numpy as np
import onnxruntime

classes = [line.rstrip('\\n') for line in open('labels.txt')]

img = np.asarray(Image.open('cat.png'), dtype=np.float32)

session = onnxruntime.InferenceSession('model.onnx')

result = session.run(None, {session.get_inputs()[0].name: img})";

#[test]
fn test_classify_pipeline() {
    let workspace = Workspace::new();
    let generator = workspace.generator("classify.toml", CLASSIFY).unwrap();

    assert_eq!(generator.code(false).unwrap(), CLASSIFY_SCRIPT);
    assert_eq!(
        generator.emission_order().unwrap(),
        vec!["loadLabels", "loadImage", "makeSession", "infer"]
    );
}

#[test]
fn test_unrequired_labels_are_an_island() {
    let workspace = Workspace::new();
    let definition = CLASSIFY.replace("required = [\"classes\"]", "");
    let errors = workspace
        .generator("classify.toml", &definition)
        .unwrap()
        .code(false)
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert!(errors.messages()[0].starts_with("The following nodes are not reachable:"));
}

#[test]
fn test_debug_comments() {
    let workspace = Workspace::new();
    let script = workspace
        .generator("classify.toml", CLASSIFY)
        .unwrap()
        .code(true)
        .unwrap();

    assert!(script.starts_with("# class=ModuleAndIdentifier\nfrom PIL import Image\n"));
    assert!(script.contains("# class=ModuleAndName\nimport numpy as np\n"));
    assert!(script.contains("# class=ModuleOnly\nimport onnxruntime\n"));
    assert!(script.contains(
        "# LoadImage(name=loadImage, path=cat.png, output=img)\n\
         img = np.asarray(Image.open('cat.png'), dtype=np.float32)"
    ));
}

#[test]
fn test_repeated_generation_is_identical() {
    let workspace = Workspace::new();
    let first = workspace.generator("a.toml", CLASSIFY).unwrap();
    let second = workspace.generator("b.toml", CLASSIFY).unwrap();

    assert_eq!(first.code(false).unwrap(), second.code(false).unwrap());
    assert_eq!(first.code(false).unwrap(), first.code(false).unwrap());
}

#[test]
fn test_existing_file_validator() {
    let workspace = Workspace::new();
    let labels = workspace.write("labels.txt", "cat\ndog\n");
    let image = workspace.write("cat.png", "");
    let model = workspace.write("model.onnx", "");

    let definition = CLASSIFY
        .replace("\"labels.txt\"", &format!("{:?}", labels.to_string_lossy()))
        .replace("\"cat.png\"", &format!("{:?}", image.to_string_lossy()))
        .replace("\"model.onnx\"", &format!("{:?}", model.to_string_lossy()));

    let strict = Config {
        check_paths_exist: true,
        ..Config::default()
    };

    let script = workspace
        .generator_with("classify.toml", &definition, strict.validators())
        .unwrap()
        .code(false)
        .unwrap();
    assert!(script.contains(&labels.to_string_lossy().to_string()));

    std::fs::remove_file(&image).unwrap();
    let errors = workspace
        .generator_with("classify.toml", &definition, strict.validators())
        .unwrap()
        .code(false)
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors.messages()[0].starts_with("LoadImage(name=loadImage"));
    assert!(errors.messages()[0].ends_with("is configured incorrectly."));
}

#[test]
fn test_statement_pipeline_with_pregeneration() {
    let definition = r#"
last = "report"
pregenerate = "seed"

[[variables]]
name = "rows"

[[variables]]
name = "total"

[[tasks]]
name = "seed"
kind = "statement"
code = "random.seed(0)"
imports = ["import random"]

[[tasks]]
name = "load"
kind = "statement"
code = "rows = read_rows()"
outputs = ["rows"]

[[tasks]]
name = "sum"
kind = "statement"
code = "total = sum(rows)"
inputs = ["rows"]
outputs = ["total"]

[[tasks]]
name = "report"
kind = "statement"
code = "print(total)"
inputs = ["total"]
"#;
    let workspace = Workspace::new();
    let script = workspace
        .generator("stats.toml", definition)
        .unwrap()
        .code(false)
        .unwrap();

    assert_eq!(
        script,
        "import random\n\nrandom.seed(0)\n\nrows = read_rows()\n\ntotal = sum(rows)\n\nprint(total)"
    );
}
