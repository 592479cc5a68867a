//! Program construction shared by the integration tests.

#![allow(dead_code)]

use vela_ir::{
    ClassDecl, Constructor, DatatypeDecl, DatatypeKind, DatatypeShape, DeclRef, Expr, ExprArena,
    ExprId, ExprKind, Formal, Function, Literal, Member, Method, ModuleDecl, Program, Span, Stmt, StmtId,
    StmtKind, TopLevelDecl, Type, UserKind,
};

pub const MODULE: &str = "M";
pub const DEFAULT_CLASS: &str = "__default";

#[derive(Default)]
pub struct Builder {
    arena: ExprArena,
    decls: Vec<TopLevelDecl>,
    members: Vec<Member>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expr(&mut self, kind: ExprKind, ty: Type) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, ty, Span::DUMMY))
    }

    pub fn int(&mut self, text: &str) -> ExprId {
        self.expr(ExprKind::Literal(Literal::Int(text.into())), Type::Int)
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

    pub fn decl(&mut self, decl: TopLevelDecl) {
        self.decls.push(decl);
    }

    /// Add a static method to the module's default class.
    pub fn method(&mut self, method: Method) {
        self.members.push(Member::Method(method));
    }

    /// Add a static function to the module's default class.
    pub fn function(&mut self, function: Function) {
        self.members.push(Member::Function(function));
    }

    pub fn build(mut self) -> Program {
        if !self.members.is_empty() {
            self.decls.push(TopLevelDecl::Class(ClassDecl {
                name: DEFAULT_CLASS.into(),
                type_params: vec![],
                fields: vec![],
                members: self.members,
                is_default: true,
                span: Span::DUMMY,
            }));
        }
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

pub fn static_method(name: &str, ins: Vec<Formal>, outs: Vec<Formal>, body: StmtId) -> Method {
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

pub fn static_function(name: &str, ins: Vec<Formal>, result: Type, body: ExprId) -> Function {
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
