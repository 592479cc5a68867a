#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Loading resolver output from disk.

mod common;

use pretty_assertions::assert_eq;
use vela_driver::{load_program, lower_file, DriverError, LoadError, Request};

use common::{fixture, HELLO};

#[test]
fn hello_loads() {
    let (_dir, path) = fixture("hello.json", HELLO);
    let program = load_program(&path).unwrap();
    assert_eq!(program.modules().len(), 1);
    assert_eq!(program.modules()[0].name, "M");
    assert_eq!(program.arena().expr_count(), 1);
}

#[test]
fn hello_lowers_to_a_runnable_script() {
    let (_dir, path) = fixture("hello.json", HELLO);
    let lowered = lower_file(&path, &Request::default()).unwrap();
    assert!(lowered.diagnostics.is_empty());
    assert!(lowered.text.starts_with("let M = (function() {\n"));
    assert!(lowered.text.contains("process.stdout.write(_vela.toString("));
    assert!(lowered.text.ends_with("})();\nM.__default.Main();\n"));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_program(&path).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert_eq!(err.path(), path.as_path());
}

#[test]
fn malformed_json() {
    let (_dir, path) = fixture("bad.json", r#"{ "modules": [ { "decls": [] } ] }"#);
    let err = lower_file(&path, &Request::default()).unwrap_err();
    assert!(matches!(err, DriverError::Load(LoadError::Json { .. })));
}
