//! Expression nodes.
//!
//! Every expression carries its resolved type. Children are `ExprId`s into
//! the same arena.

use std::fmt;

use super::operators::{BinaryOp, UnaryOp};
use crate::{DeclRef, ExprId, Span, StmtId, Type};

/// Expression node.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type, span: Span) -> Self {
        Expr { kind, ty, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} : {} @ {:?}", self.kind, self.ty, self.span)
    }
}

/// Literal values.
///
/// Integer and real components are kept as exact decimal text so that no
/// magnitude is ever squeezed through a machine integer or a float.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Bool(bool),
    /// Decimal digits with an optional leading `-`.
    Int(String),
    /// `numerator / denominator`, both decimal text; the denominator is positive.
    Real {
        numerator: String,
        denominator: String,
    },
    Char(char),
    /// String value. For verbatim strings the text is the raw source body,
    /// where `""` stands for one quote.
    String { value: String, verbatim: bool },
    Null,
}

/// One binding of a `Let` expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LetBinding {
    pub name: String,
    pub value: ExprId,
}

/// Lambda parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// Key/value pair of a map display.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapEntry {
    pub key: ExprId,
    pub value: ExprId,
}

/// A case of a `match` over a datatype value.
///
/// `bindings` has one entry per formal of the constructor, in declaration
/// order (ghost formals included); `None` means the field is not bound.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchArm<B> {
    pub ctor: u32,
    pub bindings: Vec<Option<String>>,
    pub body: B,
}

/// Expression-level match arm.
pub type ExprMatchArm = MatchArm<ExprId>;

/// Statement-level match arm.
pub type StmtMatchArm = MatchArm<StmtId>;

/// Callee of a function or method call.
///
/// `receiver` is `None` for static members. `args` on the call site are
/// aligned with the callee's full formal list, ghost formals included.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallTarget {
    pub class: DeclRef,
    pub member: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub receiver: Option<ExprId>,
}

/// Expression variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    Literal(Literal),
    /// Local variable, formal, or bound variable.
    Ident(String),
    /// The enclosing receiver.
    This,

    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// Numeric persona conversion; the source type is the operand's type.
    Conversion {
        operand: ExprId,
        to: Type,
    },

    SetDisplay(Vec<ExprId>),
    MultiSetDisplay(Vec<ExprId>),
    SeqDisplay(Vec<ExprId>),
    MapDisplay(Vec<MapEntry>),

    /// `s[i]` on sequences and one-dimensional arrays, `m[k]` on maps,
    /// `ms[x]` (multiplicity) on multisets.
    Index {
        collection: ExprId,
        index: ExprId,
    },
    /// `a[i, j, ...]` on multi-dimensional arrays.
    MultiIndex {
        array: ExprId,
        indices: Vec<ExprId>,
    },
    /// `s[i := v]`, `m[k := v]`, `ms[x := n]`.
    IndexUpdate {
        collection: ExprId,
        index: ExprId,
        value: ExprId,
    },
    /// `s[lo..hi]` with independently optional bounds; also `a[..]` on arrays.
    Slice {
        collection: ExprId,
        low: Option<ExprId>,
        high: Option<ExprId>,
    },
    /// `a.Length0`-style dimension length of an array.
    ArrayLength {
        array: ExprId,
        dim: u32,
    },
    /// Field of a class instance.
    Field {
        receiver: ExprId,
        field: String,
    },

    /// Datatype value construction. `args` aligns with all formals.
    Construct {
        datatype: DeclRef,
        ctor: u32,
        args: Vec<ExprId>,
    },
    /// Destructor read; `formal` indexes the constructor's formal list.
    Destructor {
        target: ExprId,
        datatype: DeclRef,
        ctor: u32,
        formal: u32,
    },
    /// `x.C?`
    CtorTest {
        target: ExprId,
        datatype: DeclRef,
        ctor: u32,
    },
    Match {
        source: ExprId,
        datatype: DeclRef,
        arms: Vec<ExprMatchArm>,
    },

    Let {
        bindings: Vec<LetBinding>,
        body: ExprId,
    },
    Ite {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    Lambda {
        params: Vec<Param>,
        body: ExprId,
    },
    /// Application of an arrow-typed value.
    Apply {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    /// Call of a function member.
    Call {
        target: CallTarget,
        args: Vec<ExprId>,
    },
    /// Fresh class instance with default-initialized fields.
    New {
        class: DeclRef,
    },
    NewArray {
        elem: Type,
        dims: Vec<ExprId>,
        init: Option<ExprId>,
    },
}
