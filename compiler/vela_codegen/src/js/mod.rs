//! JavaScript backend.
//!
//! # Architecture
//!
//! ```text
//! Program (modules in dependency order)
//!        ↓
//!   JsBackend::lower_program
//!        ↓  per module: `let M = (function() { let $module = {}; ... })();`
//!   datatype / class lowering
//!        ↓  per member
//!   stmt / expr lowering  →  operators, literals, conversions, types
//!        ↓
//!   CodegenResult { code, entry_call, diagnostics, errors }
//! ```
//!
//! Emitted code expects two globals: `BigNumber` (configured with
//! `MODULO_MODE = EUCLID`) and the runtime namespace object (`_vela` by
//! default). The driver prepends a prelude that provides both.

pub mod class;
pub mod conversion;
pub mod datatype;
pub mod expr;
pub mod literal;
pub mod method;
pub mod names;
pub mod operators;
pub mod stmt;
pub mod types;

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::{
    DeclRef, ExprId, Member, ModuleDecl, NativeSelection, NewtypeDecl, Program, Span,
    StmtId, TopLevelDecl, Type,
};

use crate::context::CodegenContext;
use crate::writer::NodeId;
use crate::{Backend, CodegenFault, CodegenOptions, CodegenResult, EntryPoint};

/// Name of the entry method looked for when none is configured.
const DEFAULT_MAIN: &str = "Main";

/// JavaScript lowering backend for one program.
pub struct JsBackend<'a> {
    cx: CodegenContext<'a>,
}

impl<'a> JsBackend<'a> {
    pub fn new(program: &'a Program, options: &'a CodegenOptions) -> Self {
        JsBackend {
            cx: CodegenContext::new(program, options),
        }
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.cx.diagnostics.peek()
    }

    /// Render whatever `f` writes into a fresh top-level buffer.
    fn detached(
        &mut self,
        f: impl FnOnce(&mut CodegenContext<'a>, NodeId) -> Result<(), CodegenFault>,
    ) -> Result<String, CodegenFault> {
        let node = self.cx.writer.detached(0);
        f(&mut self.cx, node)?;
        Ok(self.cx.writer.render(node))
    }
}

impl Backend for JsBackend<'_> {
    fn name(&self) -> &'static str {
        "javascript"
    }

    fn lower_type(&mut self, ty: &Type, span: Span) -> Result<String, CodegenFault> {
        types::type_name(&mut self.cx, ty, span)
    }

    fn lower_default(&mut self, ty: &Type, span: Span) -> Result<String, CodegenFault> {
        types::init_value(&mut self.cx, ty, span)
    }

    fn lower_datatype(&mut self, decl: &DeclRef) -> Result<String, CodegenFault> {
        let dt = self.cx.datatype(decl)?;
        self.detached(|cx, node| datatype::emit_datatype(cx, node, dt))
    }

    fn lower_expr(&mut self, id: ExprId) -> Result<String, CodegenFault> {
        expr::emit_expr(&mut self.cx, id)
    }

    fn lower_stmt(&mut self, id: StmtId) -> Result<String, CodegenFault> {
        self.detached(|cx, node| stmt::emit_stmt(cx, node, id))
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn lower_program(mut self) -> Result<CodegenResult, CodegenFault> {
        let cx = &mut self.cx;
        let program = cx.program;
        let root = cx.writer.root();
        for module in program.modules() {
            emit_module(cx, root, module)?;
        }
        let entry_call = entry_call(cx);
        let errors = cx.diagnostics.has_errors();
        tracing::debug!(errors = cx.diagnostics.error_count(), "lowering finished");
        let diagnostics = cx.diagnostics.flush();
        Ok(CodegenResult {
            code: cx.writer.render(root),
            entry_call,
            diagnostics,
            errors,
        })
    }
}

/// `let M = (function() { let $module = {}; <decls> return $module; })();`
#[tracing::instrument(level = "debug", skip_all, fields(module = %module.name))]
fn emit_module(cx: &mut CodegenContext<'_>, node: NodeId, module: &ModuleDecl) -> Result<(), CodegenFault> {
    let name = names::ident(&module.name);
    cx.writer
        .writeln(node, &format!("let {name} = (function() {{"));
    let body = cx.writer.nested(node);
    cx.writer.writeln(node, "})();");

    cx.writer.writeln(body, "let $module = {};");
    for decl in &module.decls {
        match decl {
            TopLevelDecl::Datatype(dt) => datatype::emit_datatype(cx, body, dt)?,
            TopLevelDecl::Class(class) => class::emit_class(cx, body, &module.name, class)?,
            TopLevelDecl::Newtype(nt) => check_newtype(cx, nt),
            // Subset types only constrain values; nothing exists at run time.
            TopLevelDecl::Subset(_) => {}
        }
    }
    cx.writer.writeln(body, "return $module;");
    Ok(())
}

/// Newtypes need no carrier: values are their base representation and the
/// witness is inlined wherever a default is needed.
fn check_newtype(cx: &mut CodegenContext<'_>, nt: &NewtypeDecl) {
    if let Some(native) = nt.native.filter(|n| n.selection != NativeSelection::Number) {
        cx.report(
            ErrorCode::E5002,
            nt.span,
            format!(
                "native type `{}` selected for newtype `{}` is not supported",
                native.selection, nt.name
            ),
            "declared here",
        );
    }
    types::check_type(cx, &nt.base, nt.span);
}

/// Whether `member` can be invoked with no arguments and no receiver.
fn is_entry_shape(member: &Member) -> bool {
    matches!(member, Member::Method(m) if m.is_static && m.ins.iter().all(|f| f.ghost))
}

/// `Module.Class.Method();` for the configured or detected entry point.
fn entry_call(cx: &mut CodegenContext<'_>) -> Option<String> {
    let options = cx.options;
    match &options.entry_point {
        Some(entry) => explicit_entry(cx, entry),
        None => detect_main(cx.program).map(|(class, method)| call_text(&class, method)),
    }
}

fn call_text(class: &DeclRef, method: &str) -> String {
    format!("{}.{}();", names::qualified(class), names::ident(method))
}

fn explicit_entry(cx: &mut CodegenContext<'_>, entry: &EntryPoint) -> Option<String> {
    let class = DeclRef::new(entry.module.as_str(), entry.class.as_str());
    let problem = match cx.program.lookup(&class) {
        Some(TopLevelDecl::Class(c)) => match c.member(&entry.method) {
            Some(m) if is_entry_shape(m) => {
                tracing::debug!(%entry, "entry point resolved");
                return Some(call_text(&class, &entry.method));
            }
            Some(_) => format!("`{entry}` is not a static method without parameters"),
            None => format!("`{class}` has no member `{}`", entry.method),
        },
        Some(_) => format!("`{class}` is not a class"),
        None => format!("no class `{class}` to run `{entry}` from"),
    };
    let span = cx.program.lookup(&class).map_or(Span::DUMMY, TopLevelDecl::span);
    cx.report(ErrorCode::E5003, span, problem, "entry point");
    None
}

/// The unique static `Main()` among the default classes, if any.
fn detect_main(program: &Program) -> Option<(DeclRef, &str)> {
    let mut found = program.modules().iter().flat_map(|module| {
        module.decls.iter().filter_map(move |decl| match decl {
            TopLevelDecl::Class(c) if c.is_default => c
                .member(DEFAULT_MAIN)
                .filter(|m| is_entry_shape(m))
                .map(|m| (DeclRef::new(module.name.as_str(), c.name.as_str()), m.name())),
            _ => None,
        })
    });
    let first = found.next()?;
    if found.next().is_some() {
        tracing::warn!("several `{DEFAULT_MAIN}` methods; no entry point selected");
        return None;
    }
    Some(first)
}
