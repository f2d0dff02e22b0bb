use super::*;
use jr_core::{EventTrigger, StructuredProgram};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("junior-rs-{}-{}", name, nanos))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
        .join("programs")
}

fn sample_program() -> StructuredProgram {
    let mut program = StructuredProgram::new("Stage").expect("stage");
    let cat = program.append_sprite("Cat").expect("cat");
    let handler = program
        .insert_handler(cat, None, EventTrigger::GreenFlag)
        .expect("handler");
    program
        .set_handler_body(cat, handler, vec!["print(\"meow\");".to_string()])
        .expect("body");
    program
}

#[test]
fn save_then_load_program_file_preserves_program() {
    let path = temp_path("roundtrip").join("nested").join("cat.program.json");
    let program = sample_program();
    save_program_file(&path, &program).expect("save should pass");
    let loaded = load_program_file(&path).expect("load should pass");
    assert_eq!(loaded, program);
}

#[test]
fn load_program_file_reports_missing_invalid_and_schema_errors() {
    let missing = load_program_file(&temp_path("missing")).expect_err("missing should fail");
    assert_eq!(missing.code, "CLI_PROGRAM_NOT_FOUND");

    let invalid_path = temp_path("invalid.program.json");
    write_file(&invalid_path, "{");
    let invalid = load_program_file(&invalid_path).expect_err("invalid should fail");
    assert_eq!(invalid.code, "CLI_PROGRAM_INVALID");

    let mut value = serde_json::to_value(ProgramFileV1::new(sample_program())).expect("value");
    value["schemaVersion"] = serde_json::json!("structured-program.v0");
    let schema_path = temp_path("schema.program.json");
    write_file(&schema_path, &value.to_string());
    let schema = load_program_file(&schema_path).expect_err("schema should fail");
    assert_eq!(schema.code, "CLI_PROGRAM_SCHEMA");
}

#[test]
fn load_program_file_rejects_malformed_tree() {
    let mut value = serde_json::to_value(ProgramFileV1::new(sample_program())).expect("value");
    let stage = value["program"]["actors"][0].clone();
    value["program"]["actors"]
        .as_array_mut()
        .expect("actors array")
        .push(stage);
    let path = temp_path("two-stages.program.json");
    write_file(&path, &value.to_string());

    let error = load_program_file(&path).expect_err("malformed should fail");
    assert_eq!(error.code, "CLI_PROGRAM_INVALID");
    assert!(error.message.contains("Malformed program"), "{}", error.message);
}

#[test]
fn resolve_programs_dir_validates_existence_and_directory() {
    let missing = resolve_programs_dir(temp_path("missing-dir").to_string_lossy().as_ref())
        .expect_err("missing should fail");
    assert_eq!(missing.code, "CLI_PROGRAMS_DIR_NOT_FOUND");

    let file_path = temp_path("plain-file");
    write_file(&file_path, "x");
    let not_dir = resolve_programs_dir(file_path.to_string_lossy().as_ref())
        .expect_err("file should fail");
    assert_eq!(not_dir.code, "CLI_PROGRAMS_DIR_NOT_DIR");
}

#[test]
fn load_programs_from_dir_filters_suffix_and_sorts() {
    let root = temp_path("programs-dir");
    let program = sample_program();
    save_program_file(&root.join("b.program.json"), &program).expect("b");
    save_program_file(&root.join("sub").join("a.program.json"), &program).expect("a");
    write_file(&root.join("notes.json"), "{}");

    let loaded = load_programs_from_dir(&root).expect("load should pass");
    let paths = loaded
        .iter()
        .map(|loaded| loaded.relative_path.as_str())
        .collect::<Vec<_>>();
    assert_eq!(paths, vec!["b.program.json", "sub/a.program.json"]);
}

#[test]
fn load_programs_from_dir_rejects_empty_directory() {
    let root = temp_path("empty-programs-dir");
    fs::create_dir_all(&root).expect("root");
    let error = load_programs_from_dir(&root).expect_err("empty should fail");
    assert_eq!(error.code, "CLI_PROGRAMS_DIR_EMPTY");
}

#[test]
fn demos_directory_loads() {
    let loaded = load_programs_from_dir(&demos_dir()).expect("demos should load");
    assert!(loaded.len() >= 3);
}

#[test]
fn run_cli_from_args_returns_exit_codes() {
    let demo = demos_dir().join("cat-and-dog.program.json");
    let demo = demo.to_string_lossy().to_string();

    assert_eq!(
        run_cli_from_args(["jr-cli", "flatten", "--program", demo.as_str()]),
        0
    );
    assert_eq!(
        run_cli_from_args(["jr-cli", "run", "--program", demo.as_str()]),
        0
    );
    assert_eq!(
        run_cli_from_args(["jr-cli", "check-name", "--name", "2cool"]),
        0
    );
    assert_eq!(
        run_cli_from_args(["jr-cli", "flatten", "--program", "/no/such/file.json"]),
        1
    );
    assert_ne!(run_cli_from_args(["jr-cli", "unknown-command"]), 0);
}

#[test]
fn new_command_writes_loadable_program() {
    let out = temp_path("new").join("fresh.program.json");
    let out_str = out.to_string_lossy().to_string();
    assert_eq!(
        run_cli_from_args(["jr-cli", "new", "--name", "Backdrop", "--out", out_str.as_str()]),
        0
    );
    let program = load_program_file(&out).expect("new program should load");
    assert_eq!(program.stage().name(), "Backdrop");
    assert_eq!(program.actors().len(), 1);

    assert_eq!(
        run_cli_from_args(["jr-cli", "new", "--name", "for", "--out", out_str.as_str()]),
        1
    );
}
