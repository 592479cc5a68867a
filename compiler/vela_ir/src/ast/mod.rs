//! Resolved program tree: expressions and statements.

mod expr;
mod operators;
mod stmt;

pub use expr::{
    CallTarget, Expr, ExprKind, ExprMatchArm, LetBinding, Literal, MapEntry, MatchArm, Param,
    StmtMatchArm,
};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Lhs, LocalVar, Stmt, StmtKind};
