//! Methods and functions.
//!
//! A method with outs declares them up front and returns them at every
//! exit: the bare value for one out, an array for several. Members marked
//! tail-recursive run inside a labeled `while (true)` loop and turn their
//! self-calls into jumps (see [`stmt::emit_tail_call`]).

use vela_ir::{DeclRef, ExprId, ExprKind, Formal, Function, Member, Method, Type};

use crate::context::{CodegenContext, MemberScope, TAIL_CALL_LABEL};
use crate::writer::NodeId;
use crate::CodegenFault;

use super::expr::{self, emit_expr};
use super::{names, stmt, types};

/// Lower one class member into the class body `node`.
#[tracing::instrument(level = "debug", skip_all, fields(member = member.name()))]
pub fn emit_member(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    class: &DeclRef,
    member: &Member,
) -> Result<(), CodegenFault> {
    match member {
        Member::Method(m) => emit_method(cx, node, class, m),
        Member::Function(f) => emit_function(cx, node, class, f),
    }
}

/// Target names of the non-ghost formals, checking each formal's type.
fn params(cx: &mut CodegenContext<'_>, formals: &[Formal]) -> Vec<String> {
    formals
        .iter()
        .filter(|f| !f.ghost)
        .map(|f| {
            types::check_type(cx, &f.ty, f.span);
            names::ident(&f.name)
        })
        .collect()
}

fn jsdoc(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    ins: &[Formal],
    results: &[&Type],
) -> Result<(), CodegenFault> {
    if !cx.options.annotate_types {
        return Ok(());
    }
    let mut lines = vec!["/**".to_string()];
    for f in ins.iter().filter(|f| !f.ghost) {
        let ty = types::type_name(cx, &f.ty, f.span)?;
        lines.push(format!(" * @param {{{ty}}} {}", names::ident(&f.name)));
    }
    let mut returned = Vec::with_capacity(results.len());
    for ty in results {
        returned.push(types::type_name(cx, ty, vela_ir::Span::DUMMY)?);
    }
    match returned.as_slice() {
        [] => {}
        [ty] => lines.push(format!(" * @returns {{{ty}}}")),
        tys => lines.push(format!(" * @returns {{[{}]}}", tys.join(", "))),
    }
    lines.push(" */".to_string());
    for line in lines {
        cx.writer.writeln(node, &line);
    }
    Ok(())
}

fn header(is_static: bool, name: &str, params: &[String]) -> String {
    let prefix = if is_static { "static " } else { "" };
    format!("{prefix}{}({})", names::ident(name), params.join(", "))
}

fn emit_method(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    class: &DeclRef,
    method: &Method,
) -> Result<(), CodegenFault> {
    let ins = params(cx, &method.ins);
    let outs = params(cx, &method.outs);
    let out_types: Vec<&Type> = method.runtime_outs().map(|f| &f.ty).collect();
    jsdoc(cx, node, &method.ins, &out_types)?;

    let body = cx
        .writer
        .block(node, &header(method.is_static, &method.name, &ins), "");
    if !method.is_static {
        cx.writer.writeln(body, "let _this = this;");
    }
    for out in method.runtime_outs() {
        let value = types::init_value(cx, &out.ty, out.span)?;
        cx.writer
            .writeln(body, &format!("let {} = {value};", names::ident(&out.name)));
    }

    let scope = MemberScope {
        class: class.clone(),
        member: method.name.clone(),
        is_static: method.is_static,
        outs: outs.clone(),
        tail_formals: method.tail_recursive.then(|| ins.clone()),
    };
    cx.with_scope(scope, |cx| {
        let inner = if method.tail_recursive {
            cx.writer
                .block(body, &format!("{TAIL_CALL_LABEL}: while (true)"), "")
        } else {
            body
        };
        stmt::emit_body(cx, inner, method.body)?;
        if method.tail_recursive || !outs.is_empty() {
            cx.writer.writeln(inner, &stmt::return_text(&outs));
        }
        Ok(())
    })
}

fn emit_function(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    class: &DeclRef,
    function: &Function,
) -> Result<(), CodegenFault> {
    let ins = params(cx, &function.ins);
    types::check_type(cx, &function.result, function.span);
    jsdoc(cx, node, &function.ins, &[&function.result])?;

    let body = cx
        .writer
        .block(node, &header(function.is_static, &function.name, &ins), "");
    if !function.is_static {
        cx.writer.writeln(body, "let _this = this;");
    }
    let scope = MemberScope {
        class: class.clone(),
        member: function.name.clone(),
        is_static: function.is_static,
        outs: Vec::new(),
        tail_formals: function.tail_recursive.then(|| ins.clone()),
    };
    cx.with_scope(scope, |cx| {
        if function.tail_recursive {
            let inner = cx
                .writer
                .block(body, &format!("{TAIL_CALL_LABEL}: while (true)"), "");
            emit_tail_return(cx, inner, function.body)
        } else {
            let value = emit_expr(cx, function.body)?;
            cx.writer.writeln(body, &format!("return {value};"));
            Ok(())
        }
    })
}

fn shadows_formal(cx: &CodegenContext<'_>, names: impl IntoIterator<Item = String>) -> bool {
    let Some(formals) = cx.scope().and_then(|s| s.tail_formals.as_ref()) else {
        return false;
    };
    names.into_iter().any(|n| formals.contains(&n))
}

/// Return the value of `id` from a tail-recursive body, turning self-calls
/// in return position into jumps.
///
/// Descends through conditionals, `let`, and `match`. A `let` or `match`
/// binding that shadows a formal would capture the re-assignment, so such
/// subtrees are returned as plain expressions.
fn emit_tail_return(cx: &mut CodegenContext<'_>, node: NodeId, id: ExprId) -> Result<(), CodegenFault> {
    vela_stack::ensure_sufficient_stack(|| {
        let expr = cx.expr(id)?;
        match &expr.kind {
            ExprKind::Ite {
                cond,
                then_branch,
                else_branch,
            } => {
                let c = emit_expr(cx, *cond)?;
                cx.writer.writeln(node, &format!("if ({c}) {{"));
                let then_node = cx.writer.nested(node);
                emit_tail_return(cx, then_node, *then_branch)?;
                cx.writer.writeln(node, "} else {");
                let else_node = cx.writer.nested(node);
                emit_tail_return(cx, else_node, *else_branch)?;
                cx.writer.writeln(node, "}");
                Ok(())
            }
            ExprKind::Let { bindings, body }
                if !shadows_formal(cx, bindings.iter().map(|b| names::ident(&b.name))) =>
            {
                let mut temps = Vec::with_capacity(bindings.len());
                for binding in bindings {
                    let value = emit_expr(cx, binding.value)?;
                    let tmp = cx.fresh_temp("_let");
                    cx.writer.writeln(node, &format!("let {tmp} = {value};"));
                    temps.push(tmp);
                }
                let block = cx.writer.block(node, "", "");
                for (binding, tmp) in bindings.iter().zip(temps) {
                    cx.writer
                        .writeln(block, &format!("let {} = {tmp};", names::ident(&binding.name)));
                }
                emit_tail_return(cx, block, *body)
            }
            ExprKind::Match {
                source,
                datatype,
                arms,
            } if !shadows_formal(
                cx,
                arms.iter()
                    .flat_map(|a| a.bindings.iter().flatten().map(|n| names::ident(n))),
            ) =>
            {
                let src = emit_expr(cx, *source)?;
                let tmp = cx.fresh_temp("_source");
                cx.writer.writeln(node, &format!("let {tmp} = {src};"));
                expr::emit_match_arms(cx, node, &tmp, datatype, arms, |cx, block, &body| {
                    emit_tail_return(cx, block, body)
                })
            }
            ExprKind::Call { target, args } => {
                if let Some(scope) = cx
                    .scope()
                    .filter(|s| s.is_self_call(&target.class, &target.member))
                    .cloned()
                {
                    stmt::emit_tail_call(cx, node, &scope, target.receiver, args)
                } else {
                    let value = emit_expr(cx, id)?;
                    cx.writer.writeln(node, &format!("return {value};"));
                    Ok(())
                }
            }
            _ => {
                let value = emit_expr(cx, id)?;
                cx.writer.writeln(node, &format!("return {value};"));
                Ok(())
            }
        }
    })
}
