//! Lowering context and state.
//!
//! `CodegenContext` holds everything the free lowering functions share:
//! the read-only program, the options, the diagnostic sink, the output
//! writer, and the scope of the member currently being lowered.

use vela_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use vela_ir::{
    ClassDecl, DatatypeDecl, DeclRef, Expr, ExprId, Member, Program, Span, Stmt, StmtId,
};

use crate::writer::Writer;
use crate::{CodegenFault, CodegenOptions};

/// Label of the loop wrapping a tail-recursive body.
pub const TAIL_CALL_LABEL: &str = "TAIL_CALL_START";

/// What is known about the member whose body is being lowered.
#[derive(Clone, Debug)]
pub struct MemberScope {
    pub class: DeclRef,
    pub member: String,
    pub is_static: bool,
    /// Target names of the non-ghost outs, in order (methods only).
    pub outs: Vec<String>,
    /// Target names of the non-ghost formals when self-calls become jumps.
    pub tail_formals: Option<Vec<String>>,
}

impl MemberScope {
    pub fn is_self_call(&self, class: &DeclRef, member: &str) -> bool {
        self.tail_formals.is_some() && self.class == *class && self.member == member
    }
}

/// Lowering context.
pub struct CodegenContext<'a> {
    pub program: &'a Program,
    pub options: &'a CodegenOptions,
    pub diagnostics: DiagnosticQueue,
    pub writer: Writer,
    scope: Option<MemberScope>,
    temp_counter: u32,
}

impl<'a> CodegenContext<'a> {
    pub fn new(program: &'a Program, options: &'a CodegenOptions) -> Self {
        CodegenContext {
            program,
            options,
            diagnostics: DiagnosticQueue::with_config(options.diagnostics.clone()),
            writer: Writer::new(),
            scope: None,
            temp_counter: 0,
        }
    }

    /// Runtime namespace identifier.
    #[inline]
    pub fn rt(&self) -> &'a str {
        &self.options.runtime
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> Result<&'a Expr, CodegenFault> {
        self.program
            .arena()
            .expr(id)
            .ok_or(CodegenFault::DanglingExpr(id))
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> Result<&'a Stmt, CodegenFault> {
        self.program
            .arena()
            .stmt(id)
            .ok_or(CodegenFault::DanglingStmt(id))
    }

    pub fn datatype(&self, decl: &DeclRef) -> Result<&'a DatatypeDecl, CodegenFault> {
        match self.program.lookup(decl) {
            Some(vela_ir::TopLevelDecl::Datatype(dt)) => Ok(dt),
            Some(_) => Err(CodegenFault::WrongDeclKind {
                decl: decl.clone(),
                expected: "datatype",
            }),
            None => Err(CodegenFault::UnknownDecl { decl: decl.clone() }),
        }
    }

    pub fn class(&self, decl: &DeclRef) -> Result<&'a ClassDecl, CodegenFault> {
        match self.program.lookup(decl) {
            Some(vela_ir::TopLevelDecl::Class(cls)) => Ok(cls),
            Some(_) => Err(CodegenFault::WrongDeclKind {
                decl: decl.clone(),
                expected: "class",
            }),
            None => Err(CodegenFault::UnknownDecl { decl: decl.clone() }),
        }
    }

    pub fn member(&self, class: &DeclRef, name: &str) -> Result<&'a Member, CodegenFault> {
        self.class(class)?
            .member(name)
            .ok_or_else(|| CodegenFault::UnknownMember {
                class: class.clone(),
                member: name.to_string(),
            })
    }

    /// Fresh temporary name: `{prefix}{n}`, unique per program.
    pub fn fresh_temp(&mut self, prefix: &str) -> String {
        let n = self.temp_counter;
        self.temp_counter += 1;
        format!("{prefix}{n}")
    }

    pub fn scope(&self) -> Option<&MemberScope> {
        self.scope.as_ref()
    }

    /// Install `scope` for the duration of `f`.
    pub fn with_scope<T>(
        &mut self,
        scope: MemberScope,
        f: impl FnOnce(&mut Self) -> Result<T, CodegenFault>,
    ) -> Result<T, CodegenFault> {
        let saved = self.scope.replace(scope);
        let result = f(self);
        self.scope = saved;
        result
    }

    /// Run `f` with self-calls compiled as ordinary calls.
    pub fn without_tail_calls<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CodegenFault>,
    ) -> Result<T, CodegenFault> {
        let saved = self
            .scope
            .as_mut()
            .and_then(|scope| scope.tail_formals.take());
        let result = f(self);
        if let Some(scope) = self.scope.as_mut() {
            scope.tail_formals = saved;
        }
        result
    }

    /// Report a diagnosable error and carry on.
    pub fn report(&mut self, code: ErrorCode, span: Span, message: String, label: &str) {
        tracing::warn!(%code, %span, "{message}");
        self.diagnostics
            .emit_error(Diagnostic::at(code, span, message, label));
    }
}
