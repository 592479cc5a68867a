//! Test helpers for lowering unit tests.
//!
//! `ProgramBuilder` allocates nodes into an arena and collects declarations
//! into a single module `M`; the `lower_*` functions run one lowering entry
//! point against the finished program and return the rendered text.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use vela_ir::{
    ClassDecl, Constructor, DatatypeDecl, DatatypeKind, DatatypeShape, DeclRef, Expr, ExprArena,
    ExprId, ExprKind, Formal, Function, Literal, Member, Method, ModuleDecl, Program, Span, Stmt,
    StmtId, StmtKind, TopLevelDecl, Type, UserKind,
};

use crate::context::{CodegenContext, MemberScope};
use crate::writer::NodeId;
use crate::{CodegenFault, CodegenOptions};

pub const MODULE: &str = "M";

#[derive(Default)]
pub struct ProgramBuilder {
    arena: ExprArena,
    decls: Vec<TopLevelDecl>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expr(&mut self, kind: ExprKind, ty: Type) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, ty, Span::DUMMY))
    }

    pub fn int(&mut self, text: &str) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Int(text.into())), Type::Int)
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Bool(value)), Type::Bool)
    }

    pub fn var(&mut self, name: &str, ty: Type) -> ExprId {
        self.expr(ExprKind::Ident(name.into()), ty)
    }

    pub fn stmt(&mut self, kind: StmtKind) -> StmtId {
        self.arena.alloc_stmt(Stmt::new(kind, Span::DUMMY))
    }

    pub fn block(&mut self, stmts: Vec<StmtId>) -> StmtId {
        self.stmt(StmtKind::Block(stmts))
    }

    pub fn decl(&mut self, decl: TopLevelDecl) -> &mut Self {
        self.decls.push(decl);
        self
    }

    pub fn build(self) -> Program {
        Program::new(
            vec![ModuleDecl {
                name: MODULE.into(),
                decls: self.decls,
            }],
            self.arena,
        )
    }
}

pub fn decl_ref(name: &str) -> DeclRef {
    DeclRef::new(MODULE, name)
}

/// `datatype Option = None | Some(value: int)`.
pub fn option_decl() -> DatatypeDecl {
    DatatypeDecl {
        name: "Option".into(),
        type_params: vec![],
        ctors: vec![
            Constructor::new("None", vec![]),
            Constructor::new("Some", vec![Formal::new("value", Type::Int)]),
        ],
        kind: DatatypeKind::Inductive { default_ctor: 0 },
        shape: DatatypeShape::Named,
        span: Span::DUMMY,
    }
}

pub fn option_ty() -> Type {
    Type::user(decl_ref("Option"), UserKind::Datatype, vec![])
}

pub fn method(name: &str, ins: Vec<Formal>, outs: Vec<Formal>, body: StmtId) -> Method {
    Method {
        name: name.into(),
        is_static: true,
        ins,
        outs,
        body,
        tail_recursive: false,
        span: Span::DUMMY,
    }
}

pub fn function(name: &str, ins: Vec<Formal>, result: Type, body: ExprId) -> Function {
    Function {
        name: name.into(),
        is_static: true,
        ins,
        result,
        body,
        tail_recursive: false,
        span: Span::DUMMY,
    }
}

pub fn class(name: &str, members: Vec<Member>) -> ClassDecl {
    ClassDecl {
        name: name.into(),
        type_params: vec![],
        fields: vec![],
        members,
        is_default: false,
        span: Span::DUMMY,
    }
}

/// Scope of the member `class.member` as lowering would install it.
pub fn scope_of(program: &Program, class: &str, member: &str) -> MemberScope {
    let decl = decl_ref(class);
    let m = program.member(&decl, member).expect("member exists");
    let formals = |fs: &[Formal]| -> Vec<String> {
        fs.iter()
            .filter(|f| !f.ghost)
            .map(|f| crate::js::names::ident(&f.name))
            .collect()
    };
    let (outs, tail) = match m {
        Member::Method(m) => (formals(&m.outs), m.tail_recursive),
        Member::Function(f) => (vec![], f.tail_recursive),
    };
    MemberScope {
        class: decl,
        member: member.into(),
        is_static: m.is_static(),
        outs,
        tail_formals: tail.then(|| formals(m.ins())),
    }
}

/// Run `f` against a fresh context and render what it wrote to the root.
pub fn render_with(
    program: &Program,
    options: &CodegenOptions,
    f: impl FnOnce(&mut CodegenContext<'_>, NodeId) -> Result<(), CodegenFault>,
) -> Result<String, CodegenFault> {
    let mut cx = CodegenContext::new(program, options);
    let root = cx.writer.root();
    f(&mut cx, root)?;
    Ok(cx.writer.render(root))
}

pub fn render(
    program: &Program,
    f: impl FnOnce(&mut CodegenContext<'_>, NodeId) -> Result<(), CodegenFault>,
) -> Result<String, CodegenFault> {
    render_with(program, &CodegenOptions::default(), f)
}

/// Lower one expression with no enclosing member.
pub fn lower_expr(program: &Program, id: ExprId) -> Result<String, CodegenFault> {
    let options = CodegenOptions::default();
    let mut cx = CodegenContext::new(program, &options);
    crate::js::expr::emit_expr(&mut cx, id)
}

/// Lower one statement inside `scope`, if any.
pub fn lower_stmt(
    program: &Program,
    scope: Option<MemberScope>,
    id: StmtId,
) -> Result<String, CodegenFault> {
    render(program, |cx, root| match scope {
        Some(scope) => cx.with_scope(scope, |cx| crate::js::stmt::emit_stmt(cx, root, id)),
        None => crate::js::stmt::emit_stmt(cx, root, id),
    })
}
