//! Expression lowering.
//!
//! Every expression lowers to a single JavaScript expression string.
//! Constructs that need statements (`match`, multi-binding `let`) are
//! built in a detached writer buffer and wrapped in an immediately-invoked
//! function (see [`Writer::open_bridge`](crate::writer::Writer::open_bridge)).

use vela_ir::{
    DatatypeDecl, DeclRef, ExprId, ExprKind, Formal, LetBinding, Literal, MapEntry, MatchArm,
    Param, Type,
};

use crate::context::CodegenContext;
use crate::writer::NodeId;
use crate::CodegenFault;

use super::types::{self, NumericRepr};
use super::{conversion, literal, names, operators};

/// Lower one expression.
pub fn emit_expr(cx: &mut CodegenContext<'_>, id: ExprId) -> Result<String, CodegenFault> {
    vela_stack::ensure_sufficient_stack(|| emit_expr_inner(cx, id))
}

fn emit_expr_inner(cx: &mut CodegenContext<'_>, id: ExprId) -> Result<String, CodegenFault> {
    let expr = cx.expr(id)?;
    let rt = cx.rt();
    tracing::trace!(?id, "lowering expression");
    match &expr.kind {
        ExprKind::Literal(lit) => literal::emit_literal(cx, lit, &expr.ty),
        ExprKind::Ident(name) => Ok(names::ident(name)),
        ExprKind::This => this(cx),

        ExprKind::Unary { op, operand } => {
            let ty = &cx.expr(*operand)?.ty;
            let text = emit_expr(cx, *operand)?;
            operators::render_unary(cx.program, rt, *op, ty, &text)
        }
        ExprKind::Binary { op, left, right } => {
            let left_ty = &cx.expr(*left)?.ty;
            let right_ty = &cx.expr(*right)?.ty;
            let plan = operators::resolve_binary(cx.program, *op, left_ty, right_ty, &expr.ty)?;
            let a = emit_expr(cx, *left)?;
            let b = emit_expr(cx, *right)?;
            Ok(operators::render_binary(&plan, rt, &a, &b))
        }
        ExprKind::Conversion { operand, to } => conversion::emit_conversion(cx, *operand, to),

        ExprKind::SetDisplay(elems) => {
            Ok(format!("{rt}.Set.fromElements({})", emit_list(cx, elems)?))
        }
        ExprKind::MultiSetDisplay(elems) => {
            Ok(format!("{rt}.MultiSet.fromElements({})", emit_list(cx, elems)?))
        }
        ExprKind::SeqDisplay(elems) => Ok(format!("{rt}.Seq.of({})", emit_list(cx, elems)?)),
        ExprKind::MapDisplay(entries) => map_display(cx, entries),

        ExprKind::Index { collection, index } => emit_index(cx, *collection, *index),
        ExprKind::MultiIndex { array, indices } => {
            let mut text = format!("{}.elmts", emit_expr(cx, *array)?);
            for &i in indices {
                text.push_str(&format!("[{}]", emit_number(cx, i)?));
            }
            Ok(text)
        }
        ExprKind::IndexUpdate {
            collection,
            index,
            value,
        } => {
            let c = emit_expr(cx, *collection)?;
            let i = emit_expr(cx, *index)?;
            let v = emit_expr(cx, *value)?;
            Ok(format!("{c}.update({i}, {v})"))
        }
        ExprKind::Slice {
            collection,
            low,
            high,
        } => emit_slice(cx, *collection, *low, *high),
        ExprKind::ArrayLength { array, dim } => {
            let a = emit_expr(cx, *array)?;
            let dims = match types::underlying(cx.program, &cx.expr(*array)?.ty) {
                Type::Array { dims, .. } => *dims,
                _ => 1,
            };
            let length = if dims <= 1 {
                format!("{a}.length")
            } else {
                format!("{a}.dims[{dim}]")
            };
            match types::numeric_repr(cx.program, &expr.ty)? {
                Some(NumericRepr::Native { .. }) => Ok(length),
                _ => Ok(format!("new BigNumber({length})")),
            }
        }
        ExprKind::Field { receiver, field } => {
            Ok(format!("{}.{}", emit_expr(cx, *receiver)?, names::ident(field)))
        }

        ExprKind::Construct {
            datatype,
            ctor,
            args,
        } => construct(cx, datatype, *ctor, args),
        ExprKind::Destructor {
            target,
            datatype,
            ctor,
            formal,
        } => {
            let dt = cx.datatype(datatype)?;
            let t = emit_expr(cx, *target)?;
            field_access(dt, datatype, *ctor, *formal, &t)
        }
        ExprKind::CtorTest {
            target,
            datatype,
            ctor,
        } => {
            let dt = cx.datatype(datatype)?;
            let c = dt.ctor(*ctor).ok_or_else(|| CodegenFault::CtorOutOfRange {
                datatype: datatype.clone(),
                ctor: *ctor,
            })?;
            Ok(format!("{}.{}", emit_expr(cx, *target)?, names::is_getter(c)))
        }
        ExprKind::Match {
            source,
            datatype,
            arms,
        } => emit_match(cx, *source, datatype, arms),

        ExprKind::Let { bindings, body } => emit_let(cx, bindings, *body),
        ExprKind::Ite {
            cond,
            then_branch,
            else_branch,
        } => {
            let c = emit_expr(cx, *cond)?;
            let a = emit_expr(cx, *then_branch)?;
            let b = emit_expr(cx, *else_branch)?;
            Ok(format!("(({c}) ? ({a}) : ({b}))"))
        }
        ExprKind::Lambda { params, body } => lambda(cx, params, *body),
        ExprKind::Apply { callee, args } => {
            let f = emit_expr(cx, *callee)?;
            Ok(format!("({f})({})", emit_list(cx, args)?))
        }
        ExprKind::Call { target, args } => {
            let callee = callee(cx, &target.class, &target.member, target.receiver)?;
            let formals = cx.member(&target.class, &target.member)?.ins();
            let args = runtime_args(cx, formals, args, &target.member)?;
            Ok(format!("{callee}({})", args.join(", ")))
        }
        ExprKind::New { class } => Ok(format!("new {}()", names::qualified(class))),
        ExprKind::NewArray { elem, dims, init } => new_array(cx, elem, dims, *init, expr.span),
    }
}

fn this(cx: &CodegenContext<'_>) -> Result<String, CodegenFault> {
    match cx.scope() {
        Some(scope) if !scope.is_static => Ok("_this".into()),
        _ => Err(CodegenFault::ThisOutsideInstance),
    }
}

/// Comma-separated lowering of `ids`.
pub fn emit_list(cx: &mut CodegenContext<'_>, ids: &[ExprId]) -> Result<String, CodegenFault> {
    let mut parts = Vec::with_capacity(ids.len());
    for &id in ids {
        parts.push(emit_expr(cx, id)?);
    }
    Ok(parts.join(", "))
}

/// Lower call arguments, dropping those bound to ghost formals.
pub fn runtime_args(
    cx: &mut CodegenContext<'_>,
    formals: &[Formal],
    args: &[ExprId],
    context: &str,
) -> Result<Vec<String>, CodegenFault> {
    if formals.len() != args.len() {
        return Err(CodegenFault::ArityMismatch {
            context: context.to_string(),
            expected: formals.len(),
            actual: args.len(),
        });
    }
    let mut out = Vec::with_capacity(args.len());
    for (formal, &arg) in formals.iter().zip(args) {
        if !formal.ghost {
            out.push(emit_expr(cx, arg)?);
        }
    }
    Ok(out)
}

/// Callee text of a member call: `M.C.F` for static members, `recv.F`
/// otherwise (the enclosing `_this` when no receiver is given).
pub fn callee(
    cx: &mut CodegenContext<'_>,
    class: &DeclRef,
    member: &str,
    receiver: Option<ExprId>,
) -> Result<String, CodegenFault> {
    let is_static = cx.member(class, member)?.is_static();
    let name = names::ident(member);
    if is_static {
        return Ok(format!("{}.{name}", names::qualified(class)));
    }
    let recv = match receiver {
        Some(r) => emit_expr(cx, r)?,
        None => this(cx)?,
    };
    Ok(format!("{recv}.{name}"))
}

/// Lower an integer-valued expression as a JavaScript `number`.
pub fn emit_number(cx: &mut CodegenContext<'_>, id: ExprId) -> Result<String, CodegenFault> {
    let expr = cx.expr(id)?;
    if let ExprKind::Literal(Literal::Int(text)) = &expr.kind {
        return literal::native_int(text);
    }
    let text = emit_expr(cx, id)?;
    Ok(match types::numeric_repr(cx.program, &expr.ty)? {
        Some(NumericRepr::Native { .. }) => text,
        _ => format!("{text}.toNumber()"),
    })
}

fn map_display(cx: &mut CodegenContext<'_>, entries: &[MapEntry]) -> Result<String, CodegenFault> {
    let rt = cx.rt();
    if entries.is_empty() {
        return Ok(format!("{rt}.Map.Empty"));
    }
    let mut text = format!("{rt}.Map.Empty.slice()");
    for entry in entries {
        let k = emit_expr(cx, entry.key)?;
        let v = emit_expr(cx, entry.value)?;
        text.push_str(&format!(".updateUnsafe({k}, {v})"));
    }
    Ok(text)
}

fn emit_index(
    cx: &mut CodegenContext<'_>,
    collection: ExprId,
    index: ExprId,
) -> Result<String, CodegenFault> {
    let ty = &cx.expr(collection)?.ty;
    let c = emit_expr(cx, collection)?;
    match types::underlying(cx.program, ty) {
        Type::Seq(_) | Type::Array { .. } => Ok(format!("{c}[{}]", emit_number(cx, index)?)),
        Type::Map { .. } => Ok(format!("{c}.get({})", emit_expr(cx, index)?)),
        Type::MultiSet(_) => Ok(format!("{c}.multiplicity({})", emit_expr(cx, index)?)),
        _ => Err(CodegenFault::UnsupportedOperator {
            op: "[]",
            ty: ty.to_string(),
        }),
    }
}

fn emit_slice(
    cx: &mut CodegenContext<'_>,
    collection: ExprId,
    low: Option<ExprId>,
    high: Option<ExprId>,
) -> Result<String, CodegenFault> {
    let is_array = matches!(
        types::underlying(cx.program, &cx.expr(collection)?.ty),
        Type::Array { .. }
    );
    let c = emit_expr(cx, collection)?;
    let lo = low.map(|id| emit_number(cx, id)).transpose()?;
    let hi = high.map(|id| emit_number(cx, id)).transpose()?;
    let sliced = match (lo, hi) {
        (None, None) => c,
        (Some(lo), None) => format!("{c}.slice({lo})"),
        (None, Some(hi)) => format!("{c}.slice(0, {hi})"),
        (Some(lo), Some(hi)) => format!("{c}.slice({lo}, {hi})"),
    };
    if is_array {
        Ok(format!("{}.Seq.of(...{sliced})", cx.rt()))
    } else {
        Ok(sliced)
    }
}

/// Read of the non-ghost formal `formal` of constructor `ctor` from `target`.
pub fn field_access(
    dt: &DatatypeDecl,
    decl: &DeclRef,
    ctor: u32,
    formal: u32,
    target: &str,
) -> Result<String, CodegenFault> {
    let c = dt.ctor(ctor).ok_or_else(|| CodegenFault::CtorOutOfRange {
        datatype: decl.clone(),
        ctor,
    })?;
    let index = formal as usize;
    let f = c
        .formals
        .get(index)
        .ok_or_else(|| CodegenFault::FormalOutOfRange {
            datatype: decl.clone(),
            ctor,
            formal,
        })?;
    if f.ghost {
        return Err(CodegenFault::GhostDestructor {
            datatype: decl.clone(),
            formal: f.name.clone(),
        });
    }
    let k = c.formals[..index].iter().filter(|f| !f.ghost).count();
    if dt.is_tuple() {
        if dt.is_coinductive() {
            Ok(format!("{target}[{k}].force()"))
        } else {
            Ok(format!("{target}[{k}]"))
        }
    } else {
        let field = names::formal_field(&f.name, k);
        Ok(format!("{target}.{}", names::dtor_getter(&field)))
    }
}

fn construct(
    cx: &mut CodegenContext<'_>,
    datatype: &DeclRef,
    ctor: u32,
    args: &[ExprId],
) -> Result<String, CodegenFault> {
    let dt = cx.datatype(datatype)?;
    let c = dt.ctor(ctor).ok_or_else(|| CodegenFault::CtorOutOfRange {
        datatype: datatype.clone(),
        ctor,
    })?;
    let args = runtime_args(cx, &c.formals, args, &c.name)?;
    Ok(format!(
        "{}.{}({})",
        names::qualified(datatype),
        names::create_fn(c),
        args.join(", ")
    ))
}

/// Write the arm dispatch of a `match` on `source` into `node`.
///
/// Arms are tested in order with `is_C`; the last arm is the fallback.
/// `emit_body` writes each arm's body into the arm's block after its
/// bindings.
pub fn emit_match_arms<B>(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    source: &str,
    datatype: &DeclRef,
    arms: &[MatchArm<B>],
    mut emit_body: impl FnMut(&mut CodegenContext<'_>, NodeId, &B) -> Result<(), CodegenFault>,
) -> Result<(), CodegenFault> {
    let dt = cx.datatype(datatype)?;
    if arms.is_empty() {
        let rt = cx.rt();
        let message = literal::escape(&format!("no match arm for {datatype}"));
        cx.writer
            .writeln(node, &format!("throw {rt}.Unreachable(\"{message}\");"));
        return Ok(());
    }
    let last = arms.len() - 1;
    for (i, arm) in arms.iter().enumerate() {
        let c = dt.ctor(arm.ctor).ok_or_else(|| CodegenFault::CtorOutOfRange {
            datatype: datatype.clone(),
            ctor: arm.ctor,
        })?;
        let header = match (i, last) {
            (0, 0) => "{".to_string(),
            (0, _) => format!("if ({source}.{}) {{", names::is_getter(c)),
            (i, last) if i == last => "} else {".to_string(),
            _ => format!("}} else if ({source}.{}) {{", names::is_getter(c)),
        };
        cx.writer.writeln(node, &header);
        let block = cx.writer.nested(node);
        if arm.bindings.len() != c.formals.len() {
            return Err(CodegenFault::ArityMismatch {
                context: c.name.clone(),
                expected: c.formals.len(),
                actual: arm.bindings.len(),
            });
        }
        for (j, binding) in arm.bindings.iter().enumerate() {
            let Some(name) = binding else { continue };
            if c.formals[j].ghost {
                continue;
            }
            let formal = u32::try_from(j).unwrap_or(u32::MAX);
            let access = field_access(dt, datatype, arm.ctor, formal, source)?;
            cx.writer
                .writeln(block, &format!("let {} = {access};", names::ident(name)));
        }
        emit_body(cx, block, &arm.body)?;
    }
    cx.writer.writeln(node, "}");
    Ok(())
}

fn emit_match(
    cx: &mut CodegenContext<'_>,
    source: ExprId,
    datatype: &DeclRef,
    arms: &[MatchArm<ExprId>],
) -> Result<String, CodegenFault> {
    let src = emit_expr(cx, source)?;
    let tmp = cx.fresh_temp("_source");
    let body = cx.writer.open_bridge();
    emit_match_arms(cx, body, &tmp, datatype, arms, |cx, block, &arm_body| {
        let value = emit_expr(cx, arm_body)?;
        cx.writer.writeln(block, &format!("return {value};"));
        Ok(())
    })?;
    Ok(cx.writer.close_bridge(body, &tmp, &src, None))
}

fn emit_let(
    cx: &mut CodegenContext<'_>,
    bindings: &[LetBinding],
    body: ExprId,
) -> Result<String, CodegenFault> {
    let mut params = Vec::with_capacity(bindings.len());
    let mut values = Vec::with_capacity(bindings.len());
    for binding in bindings {
        params.push(names::ident(&binding.name));
        values.push(emit_expr(cx, binding.value)?);
    }
    let result = emit_expr(cx, body)?;
    if bindings.len() == 1 {
        return Ok(format!(
            "(function ({}) {{ return {result}; }})({})",
            params.join(", "),
            values.join(", ")
        ));
    }
    // Parameters bind simultaneously, so no binding sees a later one.
    let node = cx.writer.open_bridge();
    Ok(cx
        .writer
        .close_bridge(node, &params.join(", "), &values.join(", "), Some(&result)))
}

fn lambda(cx: &mut CodegenContext<'_>, params: &[Param], body: ExprId) -> Result<String, CodegenFault> {
    let params: Vec<String> = params.iter().map(|p| names::ident(&p.name)).collect();
    let body = cx.without_tail_calls(|cx| emit_expr(cx, body))?;
    Ok(format!("function ({}) {{ return {body}; }}", params.join(", ")))
}

fn new_array(
    cx: &mut CodegenContext<'_>,
    elem: &Type,
    dims: &[ExprId],
    init: Option<ExprId>,
    span: vela_ir::Span,
) -> Result<String, CodegenFault> {
    let rt = cx.rt();
    let mut sizes = Vec::with_capacity(dims.len());
    for &d in dims {
        sizes.push(emit_number(cx, d)?);
    }
    let sizes = sizes.join(", ");
    if let Some(init) = init {
        let f = emit_expr(cx, init)?;
        return Ok(format!("{rt}.arrayFromFunction({f}, {sizes})"));
    }
    let default = types::init_value(cx, elem, span)?;
    if dims.len() == 1 {
        Ok(format!("Array({sizes}).fill({default})"))
    } else {
        Ok(format!("{rt}.newArray({default}, {sizes})"))
    }
}
