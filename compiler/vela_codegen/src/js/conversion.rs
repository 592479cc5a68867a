//! Numeric persona conversions (`x as T`).
//!
//! | from \ to | Big                  | Native          | Rational             | Char                    |
//! |-----------|----------------------|-----------------|----------------------|-------------------------|
//! | Big       | -                    | `x.toNumber()`  | `new BigRational(x)` | `fromCodePoint(x.toNumber())` |
//! | Native    | `new BigNumber(x)`   | -               | via `BigNumber`      | `fromCodePoint(x)`      |
//! | Rational  | `x.toBigNumber()`    | via `BigNumber` | -                    | n/a                     |
//! | Char      | via `codePointAt(0)` | `x.codePointAt(0)` | via `BigNumber`   | -                       |
//!
//! Range checks were discharged upstream, so narrowing never truncates.

use vela_ir::{ExprId, ExprKind, Program, Type, UnaryOp};

use crate::context::CodegenContext;
use crate::CodegenFault;

use super::expr::emit_expr;
use super::types::{self, NumericRepr};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Persona {
    Big,
    Native,
    Rational,
    Char,
    /// Anything else; converts by identity.
    Other,
}

fn persona(program: &Program, ty: &Type) -> Result<Persona, CodegenFault> {
    Ok(match types::numeric_repr(program, ty)? {
        Some(NumericRepr::Big) => Persona::Big,
        Some(NumericRepr::Native { .. }) => Persona::Native,
        Some(NumericRepr::Rational) => Persona::Rational,
        None if *types::underlying(program, ty) == Type::Char => Persona::Char,
        None => Persona::Other,
    })
}

/// Rewrite rendered `value` of type `from` as a value of type `to`.
pub fn convert(
    program: &Program,
    rt: &str,
    value: &str,
    from: &Type,
    to: &Type,
) -> Result<String, CodegenFault> {
    let from = persona(program, from)?;
    let to = persona(program, to)?;
    Ok(match (from, to) {
        (Persona::Big, Persona::Native) => format!("{value}.toNumber()"),
        (Persona::Big, Persona::Rational) => format!("new {rt}.BigRational({value})"),
        (Persona::Big, Persona::Char) => format!("String.fromCodePoint({value}.toNumber())"),

        (Persona::Native, Persona::Big) => format!("new BigNumber({value})"),
        (Persona::Native, Persona::Rational) => {
            format!("new {rt}.BigRational(new BigNumber({value}))")
        }
        (Persona::Native, Persona::Char) => format!("String.fromCodePoint({value})"),

        (Persona::Rational, Persona::Big) => format!("{value}.toBigNumber()"),
        (Persona::Rational, Persona::Native) => format!("{value}.toBigNumber().toNumber()"),

        (Persona::Char, Persona::Big) => format!("new BigNumber({value}.codePointAt(0))"),
        (Persona::Char, Persona::Native) => format!("{value}.codePointAt(0)"),
        (Persona::Char, Persona::Rational) => {
            format!("new {rt}.BigRational(new BigNumber({value}.codePointAt(0)))")
        }

        _ => value.to_string(),
    })
}

/// Lower `operand as to`.
pub fn emit_conversion(
    cx: &mut CodegenContext<'_>,
    operand: ExprId,
    to: &Type,
) -> Result<String, CodegenFault> {
    let expr = cx.expr(operand)?;
    if persona(cx.program, to)? == Persona::Native {
        if let ExprKind::Unary {
            op: UnaryOp::Cardinality,
            operand: collection,
        } = &expr.kind
        {
            // native(|x|) skips the BigNumber round trip.
            let ty = &cx.expr(*collection)?.ty;
            let is_multiset = matches!(types::underlying(cx.program, ty), Type::MultiSet(_));
            let text = emit_expr(cx, *collection)?;
            return Ok(if is_multiset {
                format!("{text}.cardinality.toNumber()")
            } else {
                format!("{text}.length")
            });
        }
    }
    let value = emit_expr(cx, operand)?;
    convert(cx.program, cx.rt(), &value, &expr.ty, to)
}
