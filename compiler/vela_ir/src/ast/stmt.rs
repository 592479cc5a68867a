//! Statement nodes.

use super::expr::{CallTarget, StmtMatchArm};
use crate::{DeclRef, ExprId, Span, StmtId, Type};

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stmt {
    pub kind: StmtKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// A declared local.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalVar {
    pub name: String,
    pub ty: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ghost: bool,
}

/// Assignable location.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lhs {
    Local(String),
    Field { receiver: ExprId, field: String },
    ArrayElem { array: ExprId, indices: Vec<ExprId> },
}

/// Statement variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StmtKind {
    /// `var x: T := init;` or `var x: T;`. With several locals the
    /// initializer, if any, yields one value per non-ghost local.
    VarDecl {
        locals: Vec<LocalVar>,
        init: Option<ExprId>,
    },
    Assign {
        lhs: Lhs,
        rhs: ExprId,
    },
    /// Method call with out-parameters bound to `outs`. When `declare` is set
    /// the targets are fresh locals introduced by this statement.
    Call {
        target: CallTarget,
        args: Vec<ExprId>,
        outs: Vec<Lhs>,
        #[cfg_attr(feature = "serde", serde(default))]
        declare: bool,
    },
    /// Return; `values` assigns the outs first (empty for a bare `return`).
    Return {
        values: Vec<ExprId>,
    },
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    /// `for var := start to end` visits `start, start+1, .., end-1`;
    /// `for var := start downto end` (`up` false) visits `start-1, .., end`.
    /// A missing `end` means the loop only exits through `break`/`return`.
    ForRange {
        var: LocalVar,
        start: ExprId,
        end: Option<ExprId>,
        up: bool,
        body: StmtId,
    },
    /// Unbounded loop whose counter doubles each iteration.
    DoublingLoop {
        var: LocalVar,
        start: ExprId,
        body: StmtId,
    },
    Break(Option<String>),
    Continue(Option<String>),
    Labeled {
        label: String,
        body: StmtId,
    },
    Block(Vec<StmtId>),
    Match {
        source: ExprId,
        datatype: DeclRef,
        arms: Vec<StmtMatchArm>,
    },
    Print(Vec<ExprId>),
    /// Expression evaluated for effect.
    Expr(ExprId),
}
