//! Type lowering.
//!
//! Maps source types to JavaScript representations: the representation
//! name used in JSDoc and diagnostics, the numeric persona that selects
//! operator strategies, and the default value of every type.
//!
//! | Source                          | Representation        |
//! |---------------------------------|-----------------------|
//! | `bool`                          | `boolean`             |
//! | `char`                          | `string` (one char)   |
//! | `int`, `ORDINAL`, wide `bvN`    | `BigNumber`           |
//! | `bvN` (N ≤ 32, native number)   | `number`              |
//! | native integer newtype          | `number`              |
//! | `real`                          | `_vela.BigRational`   |
//! | `set`/`multiset`/`seq`/`map`    | runtime collections   |
//! | arrays                          | `Array` / multi-dim   |
//! | datatypes and classes           | `Module.Name`         |

use vela_diagnostic::ErrorCode;
use vela_ir::{
    ArrowKind, NativeSelection, NativeType, Program, Span, TopLevelDecl, Type, UserKind, UserType,
};

use crate::context::CodegenContext;
use crate::CodegenFault;

use super::{expr, names};

/// Widest bitvector whose operations stay exact in 32-bit JavaScript
/// bitwise arithmetic.
pub const MAX_NATIVE_BV_WIDTH: u32 = 32;

/// How a numeric value is represented at run time.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NumericRepr {
    /// Arbitrary-precision `BigNumber`.
    Big,
    /// JavaScript `number` holding an integer in the safe range.
    Native { signed: bool },
    /// `BigRational`.
    Rational,
}

impl NumericRepr {
    pub fn is_native(self) -> bool {
        matches!(self, NumericRepr::Native { .. })
    }
}

fn usable_native(native: Option<NativeType>) -> Option<NativeType> {
    native.filter(|n| n.selection == NativeSelection::Number)
}

/// Numeric persona of `ty`, or `None` for non-numeric types.
pub fn numeric_repr(program: &Program, ty: &Type) -> Result<Option<NumericRepr>, CodegenFault> {
    Ok(match ty {
        Type::Int | Type::BigOrdinal => Some(NumericRepr::Big),
        Type::Real => Some(NumericRepr::Rational),
        Type::Bitvector { width, native } => match usable_native(*native) {
            Some(_) if *width <= MAX_NATIVE_BV_WIDTH => Some(NumericRepr::Native { signed: false }),
            _ => Some(NumericRepr::Big),
        },
        Type::UserDefined(ut) => match ut.kind {
            UserKind::Newtype => match program.lookup(&ut.decl) {
                Some(TopLevelDecl::Newtype(nt)) => match usable_native(nt.native) {
                    Some(native) => Some(NumericRepr::Native {
                        signed: native.signed,
                    }),
                    None => numeric_repr(program, &nt.base)?,
                },
                _ => return Err(unknown(ut)),
            },
            UserKind::Subset => match program.lookup(&ut.decl) {
                Some(TopLevelDecl::Subset(st)) => numeric_repr(program, &st.base)?,
                _ => return Err(unknown(ut)),
            },
            UserKind::Class | UserKind::Trait | UserKind::Datatype => None,
        },
        Type::Char
        | Type::Bool
        | Type::Array { .. }
        | Type::Set(_)
        | Type::MultiSet(_)
        | Type::Seq(_)
        | Type::Map { .. }
        | Type::Arrow { .. }
        | Type::TypeParam(_) => None,
    })
}

fn unknown(ut: &UserType) -> CodegenFault {
    CodegenFault::UnknownDecl {
        decl: ut.decl.clone(),
    }
}

/// Bit width if `ty` is (a subset of) a bitvector.
pub fn bitvector_width(program: &Program, ty: &Type) -> Option<u32> {
    match ty {
        Type::Bitvector { width, .. } => Some(*width),
        Type::UserDefined(ut) if ut.kind == UserKind::Subset => match program.lookup(&ut.decl) {
            Some(TopLevelDecl::Subset(st)) => bitvector_width(program, &st.base),
            _ => None,
        },
        _ => None,
    }
}

/// Strip subset types down to the type they refine.
pub fn underlying<'p>(program: &'p Program, ty: &'p Type) -> &'p Type {
    match ty {
        Type::UserDefined(ut) if ut.kind == UserKind::Subset => match program.lookup(&ut.decl) {
            Some(TopLevelDecl::Subset(st)) => underlying(program, &st.base),
            _ => ty,
        },
        _ => ty,
    }
}

/// Whether values of `ty` compare with `===`.
///
/// Handles (classes, traits, arrays, arrows) compare by identity;
/// booleans, chars, and native numbers compare by value.
pub fn is_direct_comparable(program: &Program, ty: &Type) -> Result<bool, CodegenFault> {
    if numeric_repr(program, ty)?.is_some_and(NumericRepr::is_native) {
        return Ok(true);
    }
    Ok(match underlying(program, ty) {
        Type::Bool | Type::Char | Type::Array { .. } | Type::Arrow { .. } => true,
        Type::UserDefined(ut) => matches!(ut.kind, UserKind::Class | UserKind::Trait),
        _ => false,
    })
}

fn is_trait(ty: &Type) -> bool {
    matches!(ty, Type::UserDefined(ut) if ut.kind == UserKind::Trait)
}

/// Description of an instantiation the target cannot represent, if `ty`
/// is one at its top level.
pub fn unsupported_instantiation(ty: &Type) -> Option<String> {
    match ty {
        Type::Set(e) | Type::MultiSet(e) | Type::Seq(e) if is_trait(e) => {
            Some(format!("trait `{e}` cannot be an element of `{ty}`"))
        }
        Type::Map { key, .. } if is_trait(key) => {
            Some(format!("trait `{key}` cannot be a key of `{ty}`"))
        }
        Type::Map { value, .. } if is_trait(value) => {
            Some(format!("trait `{value}` cannot be a value of `{ty}`"))
        }
        _ => None,
    }
}

fn report_unsupported(cx: &mut CodegenContext<'_>, ty: &Type, span: Span) -> bool {
    match unsupported_instantiation(ty) {
        Some(message) => {
            cx.report(ErrorCode::E5001, span, message, "type used here");
            true
        }
        None => false,
    }
}

fn unsupported_placeholder(cx: &CodegenContext<'_>) -> String {
    format!("{}.Unsupported", cx.rt())
}

/// Report every unsupported instantiation and native selector inside `ty`.
///
/// Called once per declared type (fields, formals, locals) so that each
/// problem is tied to the declaration that names it.
pub fn check_type(cx: &mut CodegenContext<'_>, ty: &Type, span: Span) {
    report_unsupported(cx, ty, span);
    match ty {
        Type::Bitvector {
            width,
            native: Some(native),
        } if native.selection != NativeSelection::Number => {
            cx.report(
                ErrorCode::E5002,
                span,
                format!(
                    "native type `{}` selected for `bv{width}` is not supported",
                    native.selection
                ),
                "declared here",
            );
        }
        Type::Set(e) | Type::MultiSet(e) | Type::Seq(e) => check_type(cx, e, span),
        Type::Array { elem, .. } => check_type(cx, elem, span),
        Type::Map { key, value } => {
            check_type(cx, key, span);
            check_type(cx, value, span);
        }
        Type::Arrow { params, result, .. } => {
            for p in params {
                check_type(cx, p, span);
            }
            check_type(cx, result, span);
        }
        Type::UserDefined(ut) => {
            for arg in &ut.args {
                check_type(cx, arg, span);
            }
        }
        Type::Bool
        | Type::Char
        | Type::Int
        | Type::Real
        | Type::BigOrdinal
        | Type::Bitvector { .. }
        | Type::TypeParam(_) => {}
    }
}

/// Representation name of `ty`. Runtime dispatch never depends on it.
pub fn type_name(cx: &mut CodegenContext<'_>, ty: &Type, span: Span) -> Result<String, CodegenFault> {
    if report_unsupported(cx, ty, span) {
        return Ok(unsupported_placeholder(cx));
    }
    let rt = cx.rt();
    Ok(match ty {
        Type::Bool => "boolean".into(),
        Type::Char => "string".into(),
        Type::Int | Type::BigOrdinal => "BigNumber".into(),
        Type::Real => format!("{rt}.BigRational"),
        Type::Bitvector { .. } => match numeric_repr(cx.program, ty)? {
            Some(NumericRepr::Native { .. }) => "number".into(),
            _ => "BigNumber".into(),
        },
        Type::Array { dims, .. } => {
            if *dims <= 1 {
                "Array".into()
            } else {
                format!("{rt}.MultiArray")
            }
        }
        Type::Set(_) => format!("{rt}.Set"),
        Type::MultiSet(_) => format!("{rt}.MultiSet"),
        Type::Seq(_) => format!("{rt}.Seq"),
        Type::Map { .. } => format!("{rt}.Map"),
        Type::Arrow { .. } => "Function".into(),
        Type::UserDefined(ut) => match ut.kind {
            UserKind::Class | UserKind::Trait | UserKind::Datatype => names::qualified(&ut.decl),
            UserKind::Newtype => match numeric_repr(cx.program, ty)? {
                Some(NumericRepr::Native { .. }) => "number".into(),
                Some(NumericRepr::Rational) => format!("{rt}.BigRational"),
                _ => "BigNumber".into(),
            },
            UserKind::Subset => match cx.program.lookup(&ut.decl) {
                Some(TopLevelDecl::Subset(st)) => type_name(cx, &st.base, span)?,
                _ => return Err(unknown(ut)),
            },
        },
        Type::TypeParam(_) => "any".into(),
    })
}

fn empty_array(cx: &CodegenContext<'_>, dims: u32) -> String {
    if dims <= 1 {
        "[]".into()
    } else {
        let zeros = vec!["0"; dims as usize].join(", ");
        format!("{}.newArray(null, {zeros})", cx.rt())
    }
}

/// Default value of `ty`.
///
/// Pure and deterministic; datatype defaults go through the carrier's
/// cached `Default()`.
pub fn init_value(cx: &mut CodegenContext<'_>, ty: &Type, span: Span) -> Result<String, CodegenFault> {
    vela_stack::ensure_sufficient_stack(|| init_value_inner(cx, ty, span))
}

fn init_value_inner(cx: &mut CodegenContext<'_>, ty: &Type, span: Span) -> Result<String, CodegenFault> {
    if report_unsupported(cx, ty, span) {
        return Ok(unsupported_placeholder(cx));
    }
    let rt = cx.rt();
    Ok(match ty {
        Type::Bool => "false".into(),
        Type::Char => "\"D\"".into(),
        Type::Int | Type::BigOrdinal => format!("{rt}.ZERO"),
        Type::Real => format!("{rt}.BigRational.ZERO"),
        Type::Bitvector { .. } => match numeric_repr(cx.program, ty)? {
            Some(NumericRepr::Native { .. }) => "0".into(),
            _ => format!("{rt}.ZERO"),
        },
        Type::Set(_) => format!("{rt}.Set.Empty"),
        Type::MultiSet(_) => format!("{rt}.MultiSet.Empty"),
        Type::Seq(_) => format!("{rt}.Seq.of()"),
        Type::Map { .. } => format!("{rt}.Map.Empty"),
        Type::Array { nullable: true, .. } => "null".into(),
        Type::Array { dims, .. } => empty_array(cx, *dims),
        Type::Arrow {
            kind: ArrowKind::General | ArrowKind::Partial,
            ..
        } => "null".into(),
        Type::Arrow {
            kind: ArrowKind::Total,
            result,
            ..
        } => total_function(cx, result, span)?,
        Type::UserDefined(ut) => user_default(cx, ut, span)?,
        Type::TypeParam(_) => format!("{rt}.Placeholder()"),
    })
}

fn total_function(cx: &mut CodegenContext<'_>, result: &Type, span: Span) -> Result<String, CodegenFault> {
    let value = init_value(cx, result, span)?;
    Ok(format!("function () {{ return {value}; }}"))
}

fn user_default(cx: &mut CodegenContext<'_>, ut: &UserType, span: Span) -> Result<String, CodegenFault> {
    let rt = cx.rt();
    match ut.kind {
        UserKind::Class if ut.nullable => Ok("null".into()),
        UserKind::Class => Ok(format!("{rt}.Placeholder()")),
        UserKind::Trait => Ok("null".into()),
        UserKind::Datatype => Ok(format!("{}.Default()", names::qualified(&ut.decl))),
        UserKind::Newtype => {
            let Some(TopLevelDecl::Newtype(nt)) = cx.program.lookup(&ut.decl) else {
                return Err(unknown(ut));
            };
            if let Some(witness) = nt.witness {
                expr::emit_expr(cx, witness)
            } else if usable_native(nt.native).is_some() {
                Ok("0".into())
            } else {
                init_value(cx, &nt.base, span)
            }
        }
        UserKind::Subset => {
            let Some(TopLevelDecl::Subset(st)) = cx.program.lookup(&ut.decl) else {
                return Err(unknown(ut));
            };
            if let Some(witness) = st.witness {
                return expr::emit_expr(cx, witness);
            }
            match &st.base {
                Type::Arrow {
                    kind: ArrowKind::Total,
                    result,
                    ..
                } => total_function(cx, result, span),
                Type::Arrow { .. } => Ok("null".into()),
                Type::Array { dims, .. } => Ok(empty_array(cx, *dims)),
                Type::UserDefined(base) if matches!(base.kind, UserKind::Class | UserKind::Trait) => {
                    Ok(format!("{rt}.Placeholder()"))
                }
                base => init_value(cx, base, span),
            }
        }
    }
}
