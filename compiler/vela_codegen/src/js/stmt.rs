//! Statement lowering.
//!
//! Statements are written line by line into a writer node. Blocks that
//! are the body of a structured statement are flattened into the braces
//! the structured statement already opens.

use vela_ir::{CallTarget, ExprId, Lhs, LocalVar, Member, StmtId, StmtKind};

use crate::context::{CodegenContext, MemberScope, TAIL_CALL_LABEL};
use crate::writer::NodeId;
use crate::CodegenFault;

use super::expr::{self, emit_expr, emit_number};
use super::types::{self, NumericRepr};
use super::names;

/// Lower one statement into `node`.
pub fn emit_stmt(cx: &mut CodegenContext<'_>, node: NodeId, id: StmtId) -> Result<(), CodegenFault> {
    vela_stack::ensure_sufficient_stack(|| emit_stmt_inner(cx, node, id))
}

/// Lower `id` as the body of an enclosing brace pair.
pub fn emit_body(cx: &mut CodegenContext<'_>, node: NodeId, id: StmtId) -> Result<(), CodegenFault> {
    match &cx.stmt(id)?.kind {
        StmtKind::Block(stmts) => {
            for &s in stmts {
                emit_stmt(cx, node, s)?;
            }
            Ok(())
        }
        _ => emit_stmt(cx, node, id),
    }
}

fn emit_stmt_inner(cx: &mut CodegenContext<'_>, node: NodeId, id: StmtId) -> Result<(), CodegenFault> {
    let stmt = cx.stmt(id)?;
    let rt = cx.rt();
    tracing::trace!(?id, "lowering statement");
    match &stmt.kind {
        StmtKind::VarDecl { locals, init } => emit_var_decl(cx, node, locals, *init, stmt.span),
        StmtKind::Assign { lhs, rhs } => {
            let target = emit_lhs(cx, lhs)?;
            let value = emit_expr(cx, *rhs)?;
            cx.writer.writeln(node, &format!("{target} = {value};"));
            Ok(())
        }
        StmtKind::Call {
            target,
            args,
            outs,
            declare,
        } => emit_call(cx, node, target, args, outs, *declare),
        StmtKind::Return { values } => emit_return(cx, node, values),
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            let c = emit_expr(cx, *cond)?;
            cx.writer.writeln(node, &format!("if ({c}) {{"));
            let then_node = cx.writer.nested(node);
            emit_body(cx, then_node, *then_branch)?;
            if let Some(else_branch) = else_branch {
                cx.writer.writeln(node, "} else {");
                let else_node = cx.writer.nested(node);
                emit_body(cx, else_node, *else_branch)?;
            }
            cx.writer.writeln(node, "}");
            Ok(())
        }
        StmtKind::While { cond, body } => {
            let c = emit_expr(cx, *cond)?;
            let body_node = cx.writer.block(node, &format!("while ({c})"), "");
            emit_body(cx, body_node, *body)
        }
        StmtKind::ForRange {
            var,
            start,
            end,
            up,
            body,
        } => emit_for_range(cx, node, var, *start, *end, *up, *body),
        StmtKind::DoublingLoop { var, start, body } => {
            let i = names::ident(&var.name);
            let s = emit_expr(cx, *start)?;
            let step = if is_native(cx, var)? {
                format!("{i} = {i} * 2")
            } else {
                format!("{i} = {i}.multipliedBy(2)")
            };
            let body_node = cx
                .writer
                .block(node, &format!("for (let {i} = {s}; ; {step})"), "");
            emit_body(cx, body_node, *body)
        }
        StmtKind::Break(label) => {
            cx.writer.writeln(node, &jump("break", label.as_deref()));
            Ok(())
        }
        StmtKind::Continue(label) => {
            cx.writer.writeln(node, &jump("continue", label.as_deref()));
            Ok(())
        }
        StmtKind::Labeled { label, body } => {
            let label = names::ident(label);
            if labels_directly(&cx.stmt(*body)?.kind) {
                cx.writer.write(node, &format!("{label}: "));
                emit_stmt(cx, node, *body)
            } else {
                // Lowering may open the body with a `let`, which a label
                // cannot prefix.
                let inner = cx.writer.block(node, &format!("{label}:"), "");
                emit_stmt(cx, inner, *body)
            }
        }
        StmtKind::Block(stmts) => {
            let inner = cx.writer.block(node, "", "");
            for &s in stmts {
                emit_stmt(cx, inner, s)?;
            }
            Ok(())
        }
        StmtKind::Match {
            source,
            datatype,
            arms,
        } => {
            let src = emit_expr(cx, *source)?;
            let tmp = cx.fresh_temp("_source");
            cx.writer.writeln(node, &format!("let {tmp} = {src};"));
            expr::emit_match_arms(cx, node, &tmp, datatype, arms, |cx, block, &body| {
                emit_body(cx, block, body)
            })
        }
        StmtKind::Print(values) => {
            for &v in values {
                let text = emit_expr(cx, v)?;
                cx.writer
                    .writeln(node, &format!("process.stdout.write({rt}.toString({text}));"));
            }
            Ok(())
        }
        StmtKind::Expr(e) => {
            let text = emit_expr(cx, *e)?;
            cx.writer.writeln(node, &format!("{text};"));
            Ok(())
        }
    }
}

/// Whether `kind` lowers to a single loop or block statement.
fn labels_directly(kind: &StmtKind) -> bool {
    matches!(
        kind,
        StmtKind::While { .. }
            | StmtKind::ForRange { .. }
            | StmtKind::DoublingLoop { .. }
            | StmtKind::Block(_)
    )
}

fn jump(keyword: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{keyword} {};", names::ident(label)),
        None => format!("{keyword};"),
    }
}

fn is_native(cx: &CodegenContext<'_>, var: &LocalVar) -> Result<bool, CodegenFault> {
    Ok(types::numeric_repr(cx.program, &var.ty)?.is_some_and(NumericRepr::is_native))
}

fn emit_var_decl(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    locals: &[LocalVar],
    init: Option<ExprId>,
    span: vela_ir::Span,
) -> Result<(), CodegenFault> {
    let live: Vec<&LocalVar> = locals.iter().filter(|l| !l.ghost).collect();
    for local in &live {
        types::check_type(cx, &local.ty, span);
    }
    match (init, live.as_slice()) {
        (_, []) => Ok(()),
        (Some(init), [local]) => {
            let value = emit_expr(cx, init)?;
            let name = names::ident(&local.name);
            cx.writer.writeln(node, &format!("let {name} = {value};"));
            Ok(())
        }
        (Some(init), live) => {
            let value = emit_expr(cx, init)?;
            let targets: Vec<String> = live.iter().map(|l| names::ident(&l.name)).collect();
            cx.writer
                .writeln(node, &format!("let [{}] = {value};", targets.join(", ")));
            Ok(())
        }
        (None, live) => {
            for local in live {
                let value = types::init_value(cx, &local.ty, span)?;
                let name = names::ident(&local.name);
                cx.writer.writeln(node, &format!("let {name} = {value};"));
            }
            Ok(())
        }
    }
}

/// Assignable text of `lhs`.
pub fn emit_lhs(cx: &mut CodegenContext<'_>, lhs: &Lhs) -> Result<String, CodegenFault> {
    match lhs {
        Lhs::Local(name) => Ok(names::ident(name)),
        Lhs::Field { receiver, field } => {
            Ok(format!("{}.{}", emit_expr(cx, *receiver)?, names::ident(field)))
        }
        Lhs::ArrayElem { array, indices } => {
            let a = emit_expr(cx, *array)?;
            match indices.as_slice() {
                [i] => Ok(format!("{a}[{}]", emit_number(cx, *i)?)),
                _ => {
                    let mut text = format!("{a}.elmts");
                    for &i in indices {
                        text.push_str(&format!("[{}]", emit_number(cx, i)?));
                    }
                    Ok(text)
                }
            }
        }
    }
}

fn emit_call(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    target: &CallTarget,
    args: &[ExprId],
    outs: &[Lhs],
    declare: bool,
) -> Result<(), CodegenFault> {
    let member = cx.member(&target.class, &target.member)?;
    if let Some(scope) = cx
        .scope()
        .filter(|s| s.is_self_call(&target.class, &target.member))
        .cloned()
    {
        return emit_tail_call(cx, node, &scope, target.receiver, args);
    }

    let callee = expr::callee(cx, &target.class, &target.member, target.receiver)?;
    let args = expr::runtime_args(cx, member.ins(), args, &target.member)?;
    let call = format!("{callee}({})", args.join(", "));

    let out_formals = match member {
        Member::Method(m) => m.outs.as_slice(),
        Member::Function(_) => &[],
    };
    if !outs.is_empty() && outs.len() != out_formals.len() {
        return Err(CodegenFault::ArityMismatch {
            context: format!("outs of {}", target.member),
            expected: out_formals.len(),
            actual: outs.len(),
        });
    }
    let live: Vec<&Lhs> = outs
        .iter()
        .zip(out_formals)
        .filter(|(_, f)| !f.ghost)
        .map(|(lhs, _)| lhs)
        .collect();
    let binder = if declare { "let " } else { "" };
    match live.as_slice() {
        [] => cx.writer.writeln(node, &format!("{call};")),
        [lhs] => {
            let target = emit_lhs(cx, lhs)?;
            cx.writer.writeln(node, &format!("{binder}{target} = {call};"));
        }
        live => {
            let collector = cx.fresh_temp("_outcollector");
            cx.writer.writeln(node, &format!("let {collector} = {call};"));
            for (k, lhs) in live.iter().enumerate() {
                let target = emit_lhs(cx, lhs)?;
                cx.writer
                    .writeln(node, &format!("{binder}{target} = {collector}[{k}];"));
            }
        }
    }
    Ok(())
}

/// Replace a self-call by re-binding the formals and jumping back to the
/// top of the member.
///
/// All new values are computed into temporaries before any formal is
/// overwritten, so arguments that mention formals see the old values.
pub fn emit_tail_call(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    scope: &MemberScope,
    receiver: Option<ExprId>,
    args: &[ExprId],
) -> Result<(), CodegenFault> {
    let formals = scope.tail_formals.as_deref().unwrap_or_default();
    let member = cx.member(&scope.class, &scope.member)?;
    let recv = match receiver {
        Some(r) if !scope.is_static => Some(emit_expr(cx, r)?),
        _ => None,
    };
    let values = expr::runtime_args(cx, member.ins(), args, &scope.member)?;
    tracing::debug!(member = %scope.member, "self-call lowered to jump");

    let mut assigns = Vec::with_capacity(formals.len() + 1);
    if let Some(recv) = recv {
        let tmp = cx.fresh_temp("_in");
        cx.writer.writeln(node, &format!("let {tmp} = {recv};"));
        assigns.push(format!("_this = {tmp};"));
    }
    for (formal, value) in formals.iter().zip(values) {
        let tmp = cx.fresh_temp("_in");
        cx.writer.writeln(node, &format!("let {tmp} = {value};"));
        assigns.push(format!("{formal} = {tmp};"));
    }
    for assign in assigns {
        cx.writer.writeln(node, &assign);
    }
    cx.writer
        .writeln(node, &format!("continue {TAIL_CALL_LABEL};"));
    Ok(())
}

/// `return;`, `return o;`, or `return [o1, o2];` over rendered values.
pub fn return_text(values: &[String]) -> String {
    match values {
        [] => "return;".to_string(),
        [v] => format!("return {v};"),
        vs => format!("return [{}];", vs.join(", ")),
    }
}

fn emit_return(cx: &mut CodegenContext<'_>, node: NodeId, values: &[ExprId]) -> Result<(), CodegenFault> {
    let Some(scope) = cx.scope().cloned() else {
        cx.writer.writeln(node, "return;");
        return Ok(());
    };
    if values.is_empty() {
        cx.writer.writeln(node, &return_text(&scope.outs));
        return Ok(());
    }
    let formals = match cx.member(&scope.class, &scope.member)? {
        Member::Method(m) => m.outs.as_slice(),
        Member::Function(_) => &[],
    };
    let rendered = expr::runtime_args(cx, formals, values, &scope.member)?;
    cx.writer.writeln(node, &return_text(&rendered));
    Ok(())
}

fn emit_for_range(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    var: &LocalVar,
    start: ExprId,
    end: Option<ExprId>,
    up: bool,
    body: StmtId,
) -> Result<(), CodegenFault> {
    let rt = cx.rt();
    let i = names::ident(&var.name);
    let native = is_native(cx, var)?;
    let s = emit_expr(cx, start)?;
    let bound = match end {
        Some(e) => Some(emit_expr(cx, e)?),
        None => None,
    };

    if up {
        let step = if native {
            format!("{i}++")
        } else {
            format!("{i} = {i}.plus({rt}.ONE)")
        };
        let header = match bound {
            Some(hi) => {
                let tmp = cx.fresh_temp("_hi");
                let test = if native {
                    format!("{i} < {tmp}")
                } else {
                    format!("{i}.isLessThan({tmp})")
                };
                format!("for (let {i} = {s}, {tmp} = {hi}; {test}; {step})")
            }
            None => format!("for (let {i} = {s}; ; {step})"),
        };
        let body_node = cx.writer.block(node, &header, "");
        return emit_body(cx, body_node, body);
    }

    let header = match bound {
        Some(lo) => {
            let tmp = cx.fresh_temp("_lo");
            let test = if native {
                format!("{tmp} < {i}")
            } else {
                format!("{tmp}.isLessThan({i})")
            };
            format!("for (let {i} = {s}, {tmp} = {lo}; {test}; )")
        }
        None => format!("for (let {i} = {s}; ; )"),
    };
    let body_node = cx.writer.block(node, &header, "");
    let decrement = if native {
        format!("{i}--;")
    } else {
        format!("{i} = {i}.minus({rt}.ONE);")
    };
    cx.writer.writeln(body_node, &decrement);
    emit_body(cx, body_node, body)
}

#[cfg(test)]
mod tests;
