//! Code generation backends for Vela.
//!
//! This crate lowers a resolved, verified [`Program`] to JavaScript source
//! that keeps the source language's run-time semantics exactly:
//!
//! 1. **Arbitrary precision** - `int` and wide bitvectors are `BigNumber`s;
//!    reals are exact rationals
//! 2. **Algebraic datatypes** - one tagged carrier class per datatype with
//!    structural equality, rendering, and a cached default value
//! 3. **Bit-exact bitvectors** - every arithmetic result is truncated to
//!    its width
//! 4. **Multi-output methods and tail calls** - aggregate returns and
//!    loop-based self-calls
//!
//! # Architecture
//!
//! ```text
//! Program + CodegenOptions
//!        ↓
//!     JsBackend        (Backend implementation, owns the writer)
//!        ↓
//!    CodegenResult     (JavaScript text + entry call + diagnostics)
//! ```
//!
//! Problems a user can fix become diagnostics and lowering continues.
//! A [`CodegenFault`] means the input tree is inconsistent and aborts the run.

mod context;
mod error;
mod options;
mod writer;

pub mod js;

#[cfg(test)]
mod test_helpers;

use vela_diagnostic::{Diagnostic, ErrorGuaranteed};
use vela_ir::{DeclRef, ExprId, Program, Span, StmtId, Type};

pub use context::{CodegenContext, MemberScope, TAIL_CALL_LABEL};
pub use error::CodegenFault;
pub use js::JsBackend;
pub use options::{CodegenOptions, EntryPoint, EntryPointParseError, DEFAULT_RUNTIME};
pub use writer::{NodeId, Writer};

/// A lowering target.
///
/// Each method lowers one kind of node to target text. Implementations
/// own all mutable lowering state; the input program is shared.
pub trait Backend {
    /// Short target name used in logs.
    fn name(&self) -> &'static str;

    /// Representation name of a type.
    fn lower_type(&mut self, ty: &Type, span: Span) -> Result<String, CodegenFault>;

    /// Default value of a type.
    fn lower_default(&mut self, ty: &Type, span: Span) -> Result<String, CodegenFault>;

    /// Full carrier declaration of a datatype.
    fn lower_datatype(&mut self, decl: &DeclRef) -> Result<String, CodegenFault>;

    fn lower_expr(&mut self, id: ExprId) -> Result<String, CodegenFault>;

    fn lower_stmt(&mut self, id: StmtId) -> Result<String, CodegenFault>;

    /// Lower every module of the program.
    fn lower_program(self) -> Result<CodegenResult, CodegenFault>
    where
        Self: Sized;
}

/// Result of lowering a program.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodegenResult {
    /// Generated module text, without runtime prelude.
    pub code: String,
    /// `Module.Class.Method();` to append when the program should run.
    pub entry_call: Option<String>,
    /// Diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Present once any error was reported.
    pub errors: Option<ErrorGuaranteed>,
}

impl CodegenResult {
    /// Check if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }

    /// Code followed by the entry call, if any.
    pub fn runnable(&self) -> String {
        match &self.entry_call {
            Some(call) => format!("{}{call}\n", self.code),
            None => self.code.clone(),
        }
    }
}

/// Lower `program` to JavaScript.
pub fn emit_js(program: &Program, options: &CodegenOptions) -> Result<CodegenResult, CodegenFault> {
    let backend = JsBackend::new(program, options);
    tracing::debug!(backend = backend.name(), "lowering program");
    backend.lower_program()
}
