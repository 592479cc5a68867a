//! Shared fixtures for driver tests.

#![allow(dead_code)]

use std::path::PathBuf;

/// `method Main() { print "hi\n"; }` in module `M`.
pub const HELLO: &str = r#"{
  "modules": [
    {
      "name": "M",
      "decls": [
        {
          "Class": {
            "name": "__default",
            "is_default": true,
            "members": [
              { "Method": { "name": "Main", "is_static": true, "body": 1 } }
            ]
          }
        }
      ]
    }
  ],
  "arena": {
    "exprs": [
      {
        "kind": { "Literal": { "String": { "value": "hi\n", "verbatim": false } } },
        "ty": { "Seq": "Char" }
      }
    ],
    "stmts": [
      { "kind": { "Print": [0] } },
      { "kind": { "Block": [0] } }
    ]
  }
}"#;

/// Write `text` to `name` inside a fresh temporary directory.
pub fn fixture(name: &str, text: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    (dir, path)
}
