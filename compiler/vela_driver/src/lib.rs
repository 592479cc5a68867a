//! Vela driver: load resolved programs, lower them, optionally run them.
//!
//! ```text
//! program.json ──load──> Program ──emit_js──> CodegenResult
//!                                                  │
//!                    prelude + code + entry call <─┘
//!                                │
//!                      file / stdout / interpreter
//! ```
//!
//! The `vela` binary is a thin clap front end over this library.

pub mod load;
pub mod run;

use std::path::{Path, PathBuf};
use std::sync::Once;

use thiserror::Error;
use vela_codegen::{emit_js, CodegenFault, CodegenOptions};
use vela_diagnostic::Diagnostic;
use vela_ir::Program;

pub use load::{load_program, parse_program, read_prelude, LoadError};
pub use run::{run, Input, RunError, DEFAULT_INTERPRETER};

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
pub const LOG_ENV: &str = "VELA_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the hierarchical tracing subscriber.
///
/// Does nothing unless `VELA_LOG` or `RUST_LOG` is set, so normal runs pay
/// nothing for instrumentation.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let filter = match std::env::var(LOG_ENV) {
            Ok(directives) => EnvFilter::new(directives),
            Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
            Err(_) => return,
        };
        tracing_subscriber::registry()
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_bracketed_fields(true),
            )
            .with(filter)
            .init();
    });
}

/// Errors that stop the driver before any JavaScript is produced.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("internal compiler error while lowering `{}`", path.display())]
    Fault {
        path: PathBuf,
        #[source]
        fault: CodegenFault,
    },
    #[error("cannot write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Settings shared by every program lowered in one invocation.
#[derive(Clone, Debug, Default)]
pub struct Request {
    pub options: CodegenOptions,
    /// Runtime prelude text placed before the program.
    pub prelude: Option<String>,
}

/// JavaScript produced for one program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lowered {
    /// Prelude, module code, and entry call, ready to execute.
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Lowered {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Lower an in-memory program.
pub fn lower(program: &Program, request: &Request) -> Result<Lowered, CodegenFault> {
    let result = emit_js(program, &request.options)?;
    let mut text = String::new();
    if let Some(prelude) = &request.prelude {
        text.push_str(prelude);
        if !prelude.ends_with('\n') {
            text.push('\n');
        }
    }
    text.push_str(&result.runnable());
    Ok(Lowered {
        text,
        diagnostics: result.diagnostics,
    })
}

/// Load and lower the program stored at `path`.
#[tracing::instrument(level = "debug", skip(request), fields(path = %path.display()))]
pub fn lower_file(path: &Path, request: &Request) -> Result<Lowered, DriverError> {
    let program = load_program(path)?;
    lower(&program, request).map_err(|fault| DriverError::Fault {
        path: path.to_path_buf(),
        fault,
    })
}

/// Write lowered text to `path`.
pub fn write_output(path: &Path, text: &str) -> Result<(), DriverError> {
    std::fs::write(path, text).map_err(|source| DriverError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Output path used when several programs are emitted at once:
/// `dir/name.json` becomes `dir/name.js`.
pub fn sibling_output(input: &Path) -> PathBuf {
    input.with_extension("js")
}

/// `error[E9001]: internal compiler error` for a lowering fault.
pub fn fault_diagnostic(path: &Path, fault: &CodegenFault) -> Diagnostic {
    Diagnostic::internal(format!("while lowering `{}`: {fault}", path.display()))
}

/// One-line description of `error` followed by its causes.
pub fn describe_error(error: &dyn std::error::Error) -> String {
    let mut line = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        line.push_str(": ");
        line.push_str(&cause.to_string());
        source = cause.source();
    }
    line
}
