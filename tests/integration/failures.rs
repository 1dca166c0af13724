//! Failure reporting from definition files.

use crate::fixtures::Workspace;
use scriptgen::Error;

#[test]
fn test_every_misconfigured_task_reported() {
    let definition = r#"
last = "ok"

[[variables]]
name = "not_valid_"

[[variables]]
name = "bad name"

[[tasks]]
name = "emptyPath"
kind = "load_image"
path = ""
output = "not_valid_"

[[tasks]]
name = "badOutput"
kind = "statement"
code = "x = 1"
outputs = ["bad name"]

[[tasks]]
name = "badImport"
kind = "statement"
code = "pass"
imports = ["import 1numpy"]

[[tasks]]
name = "ok"
kind = "statement"
code = "print('ok')"
"#;
    let workspace = Workspace::new();
    let errors = workspace
        .generator("broken.toml", definition)
        .unwrap()
        .code(false)
        .unwrap_err();

    let messages = errors.messages();
    assert_eq!(messages.len(), 4, "{:?}", messages);
    assert!(messages[0].starts_with("Variable(name=bad name)"));
    assert!(messages[1].contains("emptyPath"));
    assert!(messages[2].contains("badOutput"));
    assert!(messages[3].contains("badImport"));
}

#[test]
fn test_variable_cycle_reported() {
    let definition = r#"
last = "writer"

[[variables]]
name = "x"

[[tasks]]
name = "reader"
kind = "statement"
code = "print(x)"
inputs = ["x"]

[[tasks]]
name = "writer"
kind = "statement"
code = "x = 1"
outputs = ["x"]
depends_on = ["reader"]
"#;
    let workspace = Workspace::new();
    let errors = workspace
        .generator("cycle.toml", definition)
        .unwrap()
        .code(false)
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.messages()[0],
        "Adding an edge from writer to reader caused a cycle"
    );
}

#[test]
fn test_depending_on_last_task() {
    let definition = r#"
last = "first"

[[tasks]]
name = "first"
kind = "statement"
code = "a()"

[[tasks]]
name = "second"
kind = "statement"
code = "b()"
depends_on = ["first"]
"#;
    let workspace = Workspace::new();
    let errors = workspace
        .generator("order.toml", definition)
        .unwrap()
        .code(false)
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    assert!(errors.messages()[0].contains("second"));
}

#[test]
fn test_duplicate_task_name() {
    let definition = r#"
last = "a"

[[tasks]]
name = "a"
kind = "statement"
code = "a()"

[[tasks]]
name = "a"
kind = "statement"
code = "again()"
"#;
    let workspace = Workspace::new();
    let err = workspace.generator("dup.toml", definition).unwrap_err();
    assert!(matches!(err, Error::DuplicateName(ref name) if name == "a"));
}

#[test]
fn test_missing_definition_file() {
    let workspace = Workspace::new();
    let path = workspace.temp_dir.path().join("absent.toml");
    let err = scriptgen::ScriptDefinition::load(&path).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_generation_error_converts() {
    let workspace = Workspace::new();
    let definition = r#"
last = "s"

[[tasks]]
name = "s"
kind = "statement"
code = "  "
"#;
    let errors = workspace
        .generator("blank.toml", definition)
        .unwrap()
        .code(false)
        .unwrap_err();
    let err: Error = errors.into();
    assert!(err.to_string().starts_with("Script generation failed:\n"));
}
