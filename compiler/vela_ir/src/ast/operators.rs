//! Binary and Unary Operators
//!
//! Operators are resolved by the upstream checker but stay overloaded on
//! operand type: `+` is addition on numbers, union on sets, concatenation on
//! sequences, and merge on maps. Backends pick the emission strategy from the
//! operand types.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Arithmetic (also union/concat/merge, intersection, difference)
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison (also subset/prefix orderings)
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
    Imp,
    RevImp,
    Iff,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    RotateLeft,
    RotateRight,

    // Collections
    In,
    NotIn,
    Disjoint,
}

impl BinaryOp {
    /// Source-level symbol, used in diagnostics and trace output.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Imp => "==>",
            Self::RevImp => "<==",
            Self::Iff => "<==>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::RotateLeft => "RotateLeft",
            Self::RotateRight => "RotateRight",
            Self::In => "in",
            Self::NotIn => "!in",
            Self::Disjoint => "!!",
        }
    }

    /// Whether the operator short-circuits its right operand.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Imp | Self::RevImp)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Not,
    Neg,
    BitNot,
    /// `|x|` on sets, multisets, sequences, and maps.
    Cardinality,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Neg => "-",
            Self::BitNot => "!",
            Self::Cardinality => "|_|",
        }
    }
}
