//! Vela IR - the resolved program tree handed to lowering backends.
//!
//! This crate contains:
//! - Spans for source locations
//! - Resolved types (`Type`, `DeclRef`, native numeric selections)
//! - Declarations (datatypes, classes, newtypes, subset types)
//! - Expression and statement nodes, flat in an `ExprArena`
//! - `Program`, the modules plus an O(1) declaration index
//!
//! Everything here is produced upstream after resolution and verification
//! and is read-only from a backend's point of view. With the `serde` feature
//! enabled the whole tree (de)serializes, which is how the driver loads
//! resolver output.

mod arena;
pub mod ast;
mod decl;
mod expr_id;
mod program;
mod span;
mod ty;

pub use arena::ExprArena;
pub use ast::{
    BinaryOp, CallTarget, Expr, ExprKind, ExprMatchArm, LetBinding, Lhs, Literal, LocalVar,
    MapEntry, MatchArm, Param, Stmt, StmtKind, StmtMatchArm, UnaryOp,
};
pub use decl::{
    ClassDecl, Constructor, DatatypeDecl, DatatypeKind, DatatypeShape, Field, Formal, Function,
    Member, Method, ModuleDecl, NewtypeDecl, SubsetTypeDecl, TopLevelDecl,
};
pub use expr_id::{ExprId, StmtId};
pub use program::{Program, ProgramParts};
pub use span::Span;
pub use ty::{ArrowKind, DeclRef, NativeSelection, NativeType, Type, UserKind, UserType};
