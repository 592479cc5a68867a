//! Reading resolver output and runtime preludes from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use vela_ir::Program;

/// Failure to obtain a program or prelude.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{}` is not a resolved program", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Json { path, .. } => path,
        }
    }
}

/// Parse a program from its JSON form.
pub fn parse_program(text: &str) -> Result<Program, serde_json::Error> {
    serde_json::from_str(text)
}

#[tracing::instrument(level = "debug", fields(path = %path.display()))]
pub fn load_program(path: &Path) -> Result<Program, LoadError> {
    let text = read(path)?;
    let program = parse_program(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(modules = program.modules().len(), "program loaded");
    Ok(program)
}

/// Runtime prelude text, prepended verbatim to the emitted program.
pub fn read_prelude(path: &Path) -> Result<String, LoadError> {
    read(path)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
