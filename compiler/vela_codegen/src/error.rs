//! Internal-consistency faults.
//!
//! A fault means the input tree broke an invariant the resolver guarantees.
//! Lowering stops at the first one; nothing about the emitted text can be
//! trusted afterwards.

use vela_ir::{DeclRef, ExprId, StmtId};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CodegenFault {
    #[error("unknown declaration `{decl}`")]
    UnknownDecl { decl: DeclRef },
    #[error("`{decl}` is not a {expected}")]
    WrongDeclKind {
        decl: DeclRef,
        expected: &'static str,
    },
    #[error("unknown member `{member}` of `{class}`")]
    UnknownMember { class: DeclRef, member: String },
    #[error("constructor index {ctor} out of range for `{datatype}`")]
    CtorOutOfRange { datatype: DeclRef, ctor: u32 },
    #[error("formal index {formal} out of range for `{datatype}` constructor {ctor}")]
    FormalOutOfRange {
        datatype: DeclRef,
        ctor: u32,
        formal: u32,
    },
    #[error("destructor on ghost formal `{formal}` of `{datatype}`")]
    GhostDestructor { datatype: DeclRef, formal: String },
    #[error("default constructor {index} out of range for `{datatype}` with {count} constructors")]
    BadDefaultCtor {
        datatype: String,
        index: u32,
        count: usize,
    },
    #[error("`{context}` expects {expected} arguments, got {actual}")]
    ArityMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },
    #[error("dangling expression reference {0:?}")]
    DanglingExpr(ExprId),
    #[error("dangling statement reference {0:?}")]
    DanglingStmt(StmtId),
    #[error("malformed {kind} literal `{text}`")]
    MalformedLiteral { kind: &'static str, text: String },
    #[error("operator `{op}` is not defined on `{ty}`")]
    UnsupportedOperator { op: &'static str, ty: String },
    #[error("`this` used outside an instance member")]
    ThisOutsideInstance,
}
