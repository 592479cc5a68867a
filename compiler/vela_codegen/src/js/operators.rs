//! Operator semantics.
//!
//! Source operators are overloaded on operand type. [`resolve_binary`]
//! turns an operator and its operand types into a [`BinaryPlan`] that says
//! how to emit the operation; [`render_binary`] then applies the plan to
//! already-rendered operand text. Keeping the two apart lets the plan be
//! tested without building expression trees.

use bitflags::bitflags;
use vela_ir::{BinaryOp, Program, Type, UnaryOp, UserKind};

use crate::CodegenFault;

use super::types::{self, NumericRepr, MAX_NATIVE_BV_WIDTH};

use BinaryStrategy::{Infix, Method, ShortCircuit, Static, WrappedInfix};
use Helper::{Global, Runtime};

bitflags! {
    /// Adjustments applied around a [`BinaryStrategy`].
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct PlanFlags: u8 {
        /// Emit the operands in reverse order (`a > b` as `b.isLessThan(a)`,
        /// `x in s` as `s.contains(x)`).
        const SWAP_ARGS = 1 << 0;
        /// The right operand is a `BigNumber` shift amount; pass it as a
        /// `number`.
        const COERCE_RIGHT_TO_NUMBER = 1 << 1;
    }
}

/// Callee of a [`BinaryStrategy::Static`] call.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Helper {
    /// Member of the runtime namespace: `_vela.<name>`.
    Runtime(&'static str),
    /// Global function such as `Math.imul`.
    Global(&'static str),
}

/// How to combine two operands.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryStrategy {
    /// `(a op b)`
    Infix(&'static str),
    /// `a.name(b)`
    Method(&'static str),
    /// `helper(a, b)`
    Static(Helper),
    /// `wrapper(a op b)`
    WrappedInfix {
        wrapper: &'static str,
        op: &'static str,
    },
    /// `(a op b)` with either side optionally negated.
    ShortCircuit {
        op: &'static str,
        negate_left: bool,
        negate_right: bool,
    },
    /// Negation of another strategy.
    Not(Box<BinaryStrategy>),
}

/// Post-result truncation to a bitvector width.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Truncation {
    /// `(r & mask)` for native widths below 32.
    NativeMask(u64),
    /// `(r >>> 0)` for native width 32.
    NativeUnsigned32,
    /// `r.mod(_vela.TWO.exponentiatedBy(w))`.
    Big(u32),
}

impl Truncation {
    fn native(width: u32) -> Self {
        if width >= MAX_NATIVE_BV_WIDTH {
            Truncation::NativeUnsigned32
        } else {
            Truncation::NativeMask((1u64 << width) - 1)
        }
    }

    fn for_repr(repr: NumericRepr, width: u32) -> Self {
        if repr.is_native() {
            Truncation::native(width)
        } else {
            Truncation::Big(width)
        }
    }

    pub fn apply(self, rt: &str, value: &str) -> String {
        match self {
            Truncation::NativeMask(mask) => format!("({value} & {mask})"),
            Truncation::NativeUnsigned32 => format!("({value} >>> 0)"),
            Truncation::Big(width) => format!("{value}.mod({rt}.TWO.exponentiatedBy({width}))"),
        }
    }
}

/// Full emission plan for one binary operation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct BinaryPlan {
    pub strategy: BinaryStrategy,
    pub flags: PlanFlags,
    pub truncate: Option<Truncation>,
    /// Extra trailing argument: the bit width for rotations.
    pub width_arg: Option<u32>,
}

impl BinaryPlan {
    fn new(strategy: BinaryStrategy) -> Self {
        BinaryPlan {
            strategy,
            flags: PlanFlags::empty(),
            truncate: None,
            width_arg: None,
        }
    }

    fn swapped(mut self) -> Self {
        self.flags |= PlanFlags::SWAP_ARGS;
        self
    }

    fn negated(mut self) -> Self {
        self.strategy = BinaryStrategy::Not(Box::new(self.strategy));
        self
    }

    fn truncated(mut self, truncation: Option<Truncation>) -> Self {
        self.truncate = truncation;
        self
    }
}

/// What an operand looks like to the operator table.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Operand {
    Bool,
    Char,
    Num {
        repr: NumericRepr,
        width: Option<u32>,
    },
    Set,
    MultiSet,
    Seq,
    Map,
    /// Arrays, class and trait references, arrows.
    Handle,
    /// Datatypes and type parameters.
    Value,
}

fn classify(program: &Program, ty: &Type) -> Result<Operand, CodegenFault> {
    if let Some(repr) = types::numeric_repr(program, ty)? {
        return Ok(Operand::Num {
            repr,
            width: types::bitvector_width(program, ty),
        });
    }
    Ok(match types::underlying(program, ty) {
        Type::Bool => Operand::Bool,
        Type::Char => Operand::Char,
        Type::Set(_) => Operand::Set,
        Type::MultiSet(_) => Operand::MultiSet,
        Type::Seq(_) => Operand::Seq,
        Type::Map { .. } => Operand::Map,
        Type::Array { .. } | Type::Arrow { .. } => Operand::Handle,
        Type::UserDefined(ut) => match ut.kind {
            UserKind::Class | UserKind::Trait => Operand::Handle,
            _ => Operand::Value,
        },
        _ => Operand::Value,
    })
}

/// Pick the emission plan for `left op right`.
///
/// `result` is the type of the whole operation; it decides truncation for
/// bitvector results.
pub fn resolve_binary(
    program: &Program,
    op: BinaryOp,
    left: &Type,
    right: &Type,
    result: &Type,
) -> Result<BinaryPlan, CodegenFault> {
    let lhs = classify(program, left)?;
    let truncation = match classify(program, result)? {
        Operand::Num {
            repr,
            width: Some(w),
        } => Some(Truncation::for_repr(repr, w)),
        _ => None,
    };
    let unsupported = || CodegenFault::UnsupportedOperator {
        op: op.as_symbol(),
        ty: left.to_string(),
    };

    let plan = match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            arithmetic(op, lhs, truncation).ok_or_else(unsupported)?
        }
        BinaryOp::Eq => BinaryPlan::new(equality(program, left, lhs)?),
        BinaryOp::NotEq => BinaryPlan::new(equality(program, left, lhs)?).negated(),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            ordering(op, lhs).ok_or_else(unsupported)?
        }
        BinaryOp::And => BinaryPlan::new(short_circuit("&&", false, false)),
        BinaryOp::Or => BinaryPlan::new(short_circuit("||", false, false)),
        BinaryOp::Imp => BinaryPlan::new(short_circuit("||", true, false)),
        BinaryOp::RevImp => BinaryPlan::new(short_circuit("||", false, true)),
        BinaryOp::Iff => BinaryPlan::new(Infix("===")),
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
            bitwise(op, lhs).ok_or_else(unsupported)?
        }
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::RotateLeft | BinaryOp::RotateRight => {
            let rhs = classify(program, right)?;
            shift(op, lhs, rhs, truncation).ok_or_else(unsupported)?
        }
        BinaryOp::In | BinaryOp::NotIn => {
            let container = classify(program, right)?;
            if !matches!(
                container,
                Operand::Set | Operand::MultiSet | Operand::Seq | Operand::Map
            ) {
                return Err(CodegenFault::UnsupportedOperator {
                    op: op.as_symbol(),
                    ty: right.to_string(),
                });
            }
            let plan = BinaryPlan::new(Method("contains")).swapped();
            if op == BinaryOp::NotIn {
                plan.negated()
            } else {
                plan
            }
        }
        BinaryOp::Disjoint => match lhs {
            Operand::Set | Operand::MultiSet => BinaryPlan::new(Method("IsDisjointFrom")),
            _ => return Err(unsupported()),
        },
    };
    tracing::trace!(op = op.as_symbol(), ?plan, "resolved binary operator");
    Ok(plan)
}

fn short_circuit(op: &'static str, negate_left: bool, negate_right: bool) -> BinaryStrategy {
    ShortCircuit {
        op,
        negate_left,
        negate_right,
    }
}

fn arithmetic(op: BinaryOp, lhs: Operand, truncation: Option<Truncation>) -> Option<BinaryPlan> {
    let strategy = match (op, lhs) {
        (_, Operand::Num { repr, width }) => {
            return numeric_arithmetic(op, repr, width.is_some()).map(|s| {
                let plan = BinaryPlan::new(s);
                // Quotients and remainders of in-range operands stay in range.
                if matches!(op, BinaryOp::Div | BinaryOp::Mod) {
                    plan
                } else {
                    plan.truncated(truncation)
                }
            });
        }
        (BinaryOp::Add, Operand::Set | Operand::MultiSet) => Method("Union"),
        (BinaryOp::Mul, Operand::Set | Operand::MultiSet) => Method("Intersect"),
        (BinaryOp::Sub, Operand::Set | Operand::MultiSet) => Method("Difference"),
        (BinaryOp::Add, Operand::Seq) => Static(Runtime("Seq.Concat")),
        (BinaryOp::Add, Operand::Map) => Method("Merge"),
        (BinaryOp::Sub, Operand::Map) => Method("Subtract"),
        (BinaryOp::Add, Operand::Char) => Static(Runtime("PlusChar")),
        (BinaryOp::Sub, Operand::Char) => Static(Runtime("MinusChar")),
        _ => return None,
    };
    Some(BinaryPlan::new(strategy))
}

fn numeric_arithmetic(op: BinaryOp, repr: NumericRepr, bitvector: bool) -> Option<BinaryStrategy> {
    Some(match (repr, op) {
        (NumericRepr::Big | NumericRepr::Rational, BinaryOp::Add) => Method("plus"),
        (NumericRepr::Big | NumericRepr::Rational, BinaryOp::Sub) => Method("minus"),
        (NumericRepr::Big | NumericRepr::Rational, BinaryOp::Mul) => Method("multipliedBy"),
        (NumericRepr::Big, BinaryOp::Div) => Static(Runtime("EuclideanDivision")),
        (NumericRepr::Big, BinaryOp::Mod) => Method("mod"),
        (NumericRepr::Rational, BinaryOp::Div) => Method("dividedBy"),
        (NumericRepr::Rational, _) => return None,

        (NumericRepr::Native { .. }, BinaryOp::Add) => Infix("+"),
        (NumericRepr::Native { .. }, BinaryOp::Sub) => Infix("-"),
        // A double product of two 32-bit values can exceed 2^53.
        (NumericRepr::Native { .. }, BinaryOp::Mul) if bitvector => Static(Global("Math.imul")),
        (NumericRepr::Native { .. }, BinaryOp::Mul) => Infix("*"),
        (NumericRepr::Native { signed: true }, BinaryOp::Div) => {
            Static(Runtime("EuclideanDivisionNumber"))
        }
        (NumericRepr::Native { signed: true }, BinaryOp::Mod) => {
            Static(Runtime("EuclideanModuloNumber"))
        }
        (NumericRepr::Native { signed: false }, BinaryOp::Div) => WrappedInfix {
            wrapper: "Math.trunc",
            op: "/",
        },
        (NumericRepr::Native { signed: false }, BinaryOp::Mod) => Infix("%"),
        _ => return None,
    })
}

fn equality(program: &Program, ty: &Type, lhs: Operand) -> Result<BinaryStrategy, CodegenFault> {
    if types::is_direct_comparable(program, ty)? {
        return Ok(Infix("==="));
    }
    Ok(match lhs {
        Operand::Num {
            repr: NumericRepr::Big,
            ..
        } => Method("isEqualTo"),
        Operand::Num {
            repr: NumericRepr::Rational,
            ..
        } => Method("equals"),
        _ => Static(Runtime("areEqual")),
    })
}

fn ordering(op: BinaryOp, lhs: Operand) -> Option<BinaryPlan> {
    let strict = matches!(op, BinaryOp::Lt | BinaryOp::Gt);
    let reversed = matches!(op, BinaryOp::Gt | BinaryOp::GtEq);
    match lhs {
        Operand::Num {
            repr: NumericRepr::Native { .. },
            ..
        }
        | Operand::Char => Some(BinaryPlan::new(Infix(op.as_symbol()))),
        _ => {
            let strategy = match (lhs, strict) {
                (Operand::Num { .. }, true) => Method("isLessThan"),
                (Operand::Num { .. }, false) => Method("isLessThanOrEqualTo"),
                (Operand::Set | Operand::MultiSet, true) => Method("IsProperSubsetOf"),
                (Operand::Set | Operand::MultiSet, false) => Method("IsSubsetOf"),
                (Operand::Seq, true) => Static(Runtime("Seq.IsProperPrefixOf")),
                (Operand::Seq, false) => Static(Runtime("Seq.IsPrefixOf")),
                _ => return None,
            };
            let plan = BinaryPlan::new(strategy);
            Some(if reversed { plan.swapped() } else { plan })
        }
    }
}

fn bitwise(op: BinaryOp, lhs: Operand) -> Option<BinaryPlan> {
    let Operand::Num { repr, width } = lhs else {
        return None;
    };
    let width = width?;
    let (infix, helper) = match op {
        BinaryOp::BitAnd => ("&", "BitwiseAnd"),
        BinaryOp::BitOr => ("|", "BitwiseOr"),
        _ => ("^", "BitwiseXor"),
    };
    Some(if repr.is_native() {
        // Only the sign bit can go wrong, and only at full width.
        let plan = BinaryPlan::new(Infix(infix));
        if width >= MAX_NATIVE_BV_WIDTH {
            plan.truncated(Some(Truncation::NativeUnsigned32))
        } else {
            plan
        }
    } else {
        BinaryPlan::new(Static(Runtime(helper)))
    })
}

fn shift(
    op: BinaryOp,
    lhs: Operand,
    rhs: Operand,
    truncation: Option<Truncation>,
) -> Option<BinaryPlan> {
    let Operand::Num { repr, width } = lhs else {
        return None;
    };
    let width = width?;
    let native = repr.is_native();
    let helper = match (op, native) {
        (BinaryOp::Shl, true) => "ShiftLeftNumber",
        (BinaryOp::Shl, false) => "ShiftLeft",
        (BinaryOp::Shr, true) => "ShiftRightNumber",
        (BinaryOp::Shr, false) => "ShiftRight",
        (BinaryOp::RotateLeft, true) => "RotateLeftNumber",
        (BinaryOp::RotateLeft, false) => "RotateLeft",
        (BinaryOp::RotateRight, true) => "RotateRightNumber",
        _ => "RotateRight",
    };
    let mut plan = BinaryPlan::new(Static(Runtime(helper)));
    if matches!(
        rhs,
        Operand::Num {
            repr: NumericRepr::Big,
            ..
        }
    ) {
        plan.flags |= PlanFlags::COERCE_RIGHT_TO_NUMBER;
    }
    match op {
        BinaryOp::Shl => plan.truncate = truncation,
        BinaryOp::RotateLeft | BinaryOp::RotateRight => plan.width_arg = Some(width),
        _ => {}
    }
    Some(plan)
}

/// Apply `plan` to rendered operands.
pub fn render_binary(plan: &BinaryPlan, rt: &str, left: &str, right: &str) -> String {
    let right = if plan.flags.contains(PlanFlags::COERCE_RIGHT_TO_NUMBER) {
        format!("{right}.toNumber()")
    } else {
        right.to_string()
    };
    let (a, b) = if plan.flags.contains(PlanFlags::SWAP_ARGS) {
        (right.as_str(), left)
    } else {
        (left, right.as_str())
    };
    let text = render_strategy(&plan.strategy, rt, a, b, plan.width_arg);
    match plan.truncate {
        Some(truncation) => truncation.apply(rt, &text),
        None => text,
    }
}

fn render_strategy(
    strategy: &BinaryStrategy,
    rt: &str,
    a: &str,
    b: &str,
    width: Option<u32>,
) -> String {
    match strategy {
        Infix(op) => format!("({a} {op} {b})"),
        Method(name) => format!("{a}.{name}({b})"),
        Static(helper) => {
            let callee = match helper {
                Runtime(name) => format!("{rt}.{name}"),
                Global(name) => (*name).to_string(),
            };
            match width {
                Some(w) => format!("{callee}({a}, {b}, {w})"),
                None => format!("{callee}({a}, {b})"),
            }
        }
        WrappedInfix { wrapper, op } => format!("{wrapper}({a} {op} {b})"),
        ShortCircuit {
            op,
            negate_left,
            negate_right,
        } => {
            let na = if *negate_left { "!" } else { "" };
            let nb = if *negate_right { "!" } else { "" };
            format!("({na}{a} {op} {nb}{b})")
        }
        BinaryStrategy::Not(inner) => format!("!{}", render_strategy(inner, rt, a, b, width)),
    }
}

/// Render `op operand`.
///
/// `ty` is the operand type, which for every unary operator but
/// cardinality is also the result type.
pub fn render_unary(
    program: &Program,
    rt: &str,
    op: UnaryOp,
    ty: &Type,
    operand: &str,
) -> Result<String, CodegenFault> {
    let unsupported = || CodegenFault::UnsupportedOperator {
        op: op.as_symbol(),
        ty: ty.to_string(),
    };
    let kind = classify(program, ty)?;
    Ok(match (op, kind) {
        (UnaryOp::Not, Operand::Bool) => format!("!{operand}"),
        (UnaryOp::Neg, Operand::Num { repr, width }) => {
            let negated = if repr.is_native() {
                // `--5` would parse as a decrement.
                if operand.starts_with('-') {
                    format!("(-({operand}))")
                } else {
                    format!("(-{operand})")
                }
            } else {
                format!("{operand}.negated()")
            };
            match width {
                Some(w) => Truncation::for_repr(repr, w).apply(rt, &negated),
                None => negated,
            }
        }
        (
            UnaryOp::BitNot,
            Operand::Num {
                repr,
                width: Some(w),
            },
        ) => {
            if repr.is_native() {
                Truncation::native(w).apply(rt, &format!("~{operand}"))
            } else {
                format!("{rt}.BitwiseNot({operand}, {w})")
            }
        }
        (UnaryOp::Cardinality, Operand::MultiSet) => format!("{operand}.cardinality"),
        (UnaryOp::Cardinality, Operand::Set | Operand::Seq | Operand::Map) => {
            format!("new BigNumber({operand}.length)")
        }
        _ => return Err(unsupported()),
    })
}
