//! Handing emitted JavaScript to an external interpreter.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;

/// Interpreter used when none is configured.
pub const DEFAULT_INTERPRETER: &str = "node";

/// How the interpreter receives the program.
#[derive(Copy, Clone, Debug)]
pub enum Input<'a> {
    /// Program text written to the interpreter's standard input.
    Stdin(&'a str),
    /// Path of a file holding the program.
    File(&'a Path),
}

/// Failure of the run step. Compilation already succeeded.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not launch `{command}`")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("could not pass the program to `{command}`")]
    Feed {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` {}", describe(*status))]
    ProgramFailed { command: String, status: ExitStatus },
}

impl RunError {
    /// Exit code the driver should finish with.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::ProgramFailed { status, .. } => status.code().unwrap_or(1),
            RunError::Launch { .. } | RunError::Feed { .. } => 1,
        }
    }
}

fn describe(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

/// Run `input` under `interpreter` and wait for it to finish.
///
/// The child shares this process's stdout and stderr.
#[tracing::instrument(level = "debug", skip(input))]
pub fn run(interpreter: &str, input: Input<'_>) -> Result<(), RunError> {
    let mut command = Command::new(interpreter);
    let launch = |source| RunError::Launch {
        command: interpreter.to_string(),
        source,
    };
    let status = match input {
        Input::File(path) => command.arg(path).status().map_err(launch)?,
        Input::Stdin(text) => {
            let mut child = command.stdin(Stdio::piped()).spawn().map_err(launch)?;
            if let Some(mut stdin) = child.stdin.take() {
                match stdin.write_all(text.as_bytes()) {
                    // The interpreter may exit before reading everything; its
                    // status says what happened.
                    Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(RunError::Feed {
                            command: interpreter.to_string(),
                            source: e,
                        });
                    }
                    _ => {}
                }
            }
            child.wait().map_err(launch)?
        }
    };
    tracing::debug!(?status, "interpreter finished");
    if status.success() {
        Ok(())
    } else {
        Err(RunError::ProgramFailed {
            command: interpreter.to_string(),
            status,
        })
    }
}
