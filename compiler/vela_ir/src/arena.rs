//! Flat storage for every expression and statement of a program.
//!
//! Children are referenced by `ExprId`/`StmtId`. Lookups return `Option`
//! because the arena arrives from outside the process; callers turn a
//! dangling id into an internal-consistency fault.

use crate::ast::{Expr, Stmt};
use crate::{ExprId, StmtId};

/// Contiguous storage for all expressions and statements.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(exprs: usize, stmts: usize) -> Self {
        ExprArena {
            exprs: Vec::with_capacity(exprs),
            stmts: Vec::with_capacity(stmts),
        }
    }

    /// Allocate an expression and return its id.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Allocate a statement and return its id.
    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_u32(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> Option<&Expr> {
        self.exprs.get(id.index())
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> Option<&Stmt> {
        self.stmts.get(id.index())
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty() && self.stmts.is_empty()
    }
}

#[inline]
fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
