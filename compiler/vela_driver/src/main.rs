//! `vela` command line.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use vela_codegen::{CodegenOptions, EntryPoint};
use vela_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use vela_diagnostic::DiagnosticConfig;
use vela_driver::{
    describe_error, fault_diagnostic, init_tracing, lower_file, read_prelude, run,
    sibling_output, write_output, DriverError, Input, Lowered, Request, DEFAULT_INTERPRETER,
};

#[derive(Parser)]
#[command(name = "vela", version, about = "Lower verified Vela programs to JavaScript")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the JavaScript for one or more programs.
    Emit {
        /// Resolved programs in JSON form.
        #[arg(required = true)]
        programs: Vec<PathBuf>,
        /// Output file (single program only; default: stdout).
        /// With several programs each `name.json` is written to `name.js`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        lowering: LoweringArgs,
    },
    /// Emit a program and execute it.
    Run {
        program: PathBuf,
        /// Also keep the JavaScript at this path and run it from there.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JavaScript interpreter to launch.
        #[arg(long, default_value = DEFAULT_INTERPRETER)]
        interpreter: String,
        #[command(flatten)]
        lowering: LoweringArgs,
    },
}

#[derive(Args)]
struct LoweringArgs {
    /// Method to call after loading, as `Module.Class.Method`.
    #[arg(long, value_name = "MODULE.CLASS.METHOD")]
    entry: Option<EntryPoint>,
    /// Emit JSDoc type annotations on members.
    #[arg(long)]
    annotate_types: bool,
    /// Runtime prelude prepended to the output.
    #[arg(long, value_name = "PRELUDE.JS")]
    runtime: Option<PathBuf>,
    /// Stop reporting after this many errors (0 = unlimited).
    #[arg(long, default_value_t = DiagnosticConfig::default().error_limit)]
    error_limit: usize,
    #[arg(long, value_enum, default_value = "auto")]
    color: Color,
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum Color {
    Auto,
    Always,
    Never,
}

impl From<Color> for ColorMode {
    fn from(color: Color) -> Self {
        match color {
            Color::Auto => ColorMode::Auto,
            Color::Always => ColorMode::Always,
            Color::Never => ColorMode::Never,
        }
    }
}

impl LoweringArgs {
    fn request(&self) -> Result<Request, DriverError> {
        let mut options = CodegenOptions::default().with_type_annotations(self.annotate_types);
        if let Some(entry) = &self.entry {
            options = options.with_entry_point(entry.clone());
        }
        options.diagnostics = DiagnosticConfig {
            error_limit: self.error_limit,
            ..DiagnosticConfig::default()
        };
        let prelude = match &self.runtime {
            Some(path) => Some(read_prelude(path)?),
            None => None,
        };
        Ok(Request { options, prelude })
    }

    fn emitter(&self) -> TerminalEmitter<std::io::Stderr> {
        TerminalEmitter::stderr(self.color.into(), std::io::stderr().is_terminal())
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let code = match cli.command {
        Command::Emit {
            programs,
            output,
            lowering,
        } => emit(&programs, output.as_deref(), &lowering),
        Command::Run {
            program,
            output,
            interpreter,
            lowering,
        } => run_program(&program, output.as_deref(), &interpreter, &lowering),
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn fail(error: &DriverError) -> i32 {
    eprintln!("error: {}", describe_error(error));
    1
}

/// Print diagnostics for one program. Returns whether output may be used.
fn report(
    emitter: &mut impl DiagnosticEmitter,
    path: &Path,
    outcome: Result<Lowered, DriverError>,
) -> Option<String> {
    match outcome {
        Ok(lowered) => {
            emitter.emit_all(&lowered.diagnostics);
            let errors = lowered.diagnostics.iter().filter(|d| d.is_error()).count();
            let warnings = lowered.diagnostics.len() - errors;
            emitter.emit_summary(errors, warnings);
            emitter.flush();
            (errors == 0).then_some(lowered.text)
        }
        Err(DriverError::Fault { path: _, fault }) => {
            emitter.emit(&fault_diagnostic(path, &fault));
            emitter.flush();
            None
        }
        Err(other) => {
            fail(&other);
            None
        }
    }
}

fn emit(programs: &[PathBuf], output: Option<&Path>, lowering: &LoweringArgs) -> i32 {
    if output.is_some() && programs.len() > 1 {
        eprintln!("error: `--output` needs exactly one program");
        return 2;
    }
    let request = match lowering.request() {
        Ok(request) => request,
        Err(e) => return fail(&e),
    };

    // Lowering is independent per program; reporting stays in input order.
    let outcomes: Vec<_> = programs
        .par_iter()
        .map(|path| lower_file(path, &request))
        .collect();

    let mut emitter = lowering.emitter();
    let mut code = 0;
    for (path, outcome) in programs.iter().zip(outcomes) {
        let Some(text) = report(&mut emitter, path, outcome) else {
            code = 1;
            continue;
        };
        let written = match (output, programs.len()) {
            (Some(out), _) => write_output(out, &text),
            (None, 1) => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(|source| DriverError::Write {
                        path: PathBuf::from("<stdout>"),
                        source,
                    })
            }
            (None, _) => write_output(&sibling_output(path), &text),
        };
        if let Err(e) = written {
            code = fail(&e);
        }
    }
    code
}

fn run_program(
    program: &Path,
    output: Option<&Path>,
    interpreter: &str,
    lowering: &LoweringArgs,
) -> i32 {
    let request = match lowering.request() {
        Ok(request) => request,
        Err(e) => return fail(&e),
    };
    let mut emitter = lowering.emitter();
    let Some(text) = report(&mut emitter, program, lower_file(program, &request)) else {
        return 1;
    };
    let input = match output {
        Some(path) => {
            if let Err(e) = write_output(path, &text) {
                return fail(&e);
            }
            Input::File(path)
        }
        None => Input::Stdin(&text),
    };
    match run(interpreter, input) {
        Ok(()) => 0,
        Err(e) => {
            let code = e.exit_code();
            fail(&DriverError::Run(e));
            code
        }
    }
}
