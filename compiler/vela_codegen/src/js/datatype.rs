//! Datatype lowering.
//!
//! A datatype becomes one carrier class whose instances hold an immutable
//! `$tag` (the constructor's declaration index) plus the constructor's
//! non-ghost fields:
//!
//! ```text
//! $module.Option = class Option {
//!   constructor(tag) { this.$tag = tag; }
//!   static create_None() { ... }          factories, one per constructor
//!   static create_Some(value) { ... }
//!   get is_None() { ... }                 tag predicates
//!   get dtor_value() { ... }              one getter per distinct field
//!   toString() { ... }                    "Option.Some(5)"
//!   equals(other) { ... }                 tag + field-wise equality
//!   static Default() { ... }              cached in Option._Default
//! };
//! ```
//!
//! Co-inductive carriers keep every field behind a `Lazy` cell and also
//! get `lazy_C` factories taking thunks. Tuple-shaped carriers extend
//! `Array` and store fields by position.

use rustc_hash::FxHashSet;
use vela_ir::{Constructor, DatatypeDecl, DatatypeKind};

use crate::context::CodegenContext;
use crate::writer::NodeId;
use crate::CodegenFault;

use super::{literal, names, types};

/// Storage slot of a non-ghost field inside the carrier.
fn slot(dt: &DatatypeDecl, target: &str, field: &str, k: usize) -> String {
    if dt.is_tuple() {
        format!("{target}[{k}]")
    } else if dt.is_coinductive() {
        format!("{target}._{field}")
    } else {
        format!("{target}.{field}")
    }
}

/// Forced value of a field, for use inside the carrier's own methods.
fn read(dt: &DatatypeDecl, target: &str, field: &str, k: usize) -> String {
    let slot = slot(dt, target, field, k);
    if dt.is_coinductive() {
        format!("{slot}.force()")
    } else {
        slot
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(datatype = %dt.name))]
pub fn emit_datatype(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    dt: &DatatypeDecl,
) -> Result<(), CodegenFault> {
    let name = names::ident(&dt.name);
    let header = if dt.is_tuple() {
        format!("$module.{name} = class {name} extends Array")
    } else {
        format!("$module.{name} = class {name}")
    };
    let body = cx.writer.block(node, &header, ";");

    let ctor = cx.writer.block(body, "constructor(tag)", "");
    if dt.is_tuple() {
        cx.writer.writeln(ctor, "super();");
    }
    cx.writer.writeln(ctor, "this.$tag = tag;");

    for (tag, c) in dt.ctors.iter().enumerate() {
        for formal in c.formals.iter().filter(|f| !f.ghost) {
            types::check_type(cx, &formal.ty, formal.span);
        }
        emit_factory(cx, body, dt, tag, c);
    }
    for (tag, c) in dt.ctors.iter().enumerate() {
        cx.writer.writeln(
            body,
            &format!("get {}() {{ return this.$tag === {tag}; }}", names::is_getter(c)),
        );
    }
    emit_getters(cx, body, dt);
    if !dt.is_tuple() {
        emit_to_string(cx, body, dt);
    } else if dt.is_coinductive() {
        emit_tuple_to_string(cx, body, dt);
    }
    emit_equals(cx, body, dt)?;
    emit_default(cx, body, dt)
}

fn emit_factory(cx: &mut CodegenContext<'_>, body: NodeId, dt: &DatatypeDecl, tag: usize, c: &Constructor) {
    let rt = cx.rt();
    let name = names::ident(&dt.name);
    let fields = names::ctor_fields(c);
    let params: Vec<&str> = fields.iter().map(|(_, f)| f.as_str()).collect();
    let params = params.join(", ");

    let factory = cx
        .writer
        .block(body, &format!("static {}({params})", names::create_fn(c)), "");
    cx.writer
        .writeln(factory, &format!("let $dt = new {name}({tag});"));
    for (k, f) in &fields {
        let value = if dt.is_coinductive() {
            format!("{rt}.Lazy.of({f})")
        } else {
            f.clone()
        };
        cx.writer
            .writeln(factory, &format!("{} = {value};", slot(dt, "$dt", f, *k)));
    }
    cx.writer.writeln(factory, "return $dt;");

    if dt.is_coinductive() {
        let lazy = cx
            .writer
            .block(body, &format!("static {}({params})", names::lazy_fn(c)), "");
        cx.writer
            .writeln(lazy, &format!("let $dt = new {name}({tag});"));
        for (k, f) in &fields {
            cx.writer.writeln(
                lazy,
                &format!("{} = new {rt}.Lazy({f});", slot(dt, "$dt", f, *k)),
            );
        }
        cx.writer.writeln(lazy, "return $dt;");
    }
}

fn emit_getters(cx: &mut CodegenContext<'_>, body: NodeId, dt: &DatatypeDecl) {
    if dt.is_tuple() {
        return;
    }
    let mut seen = FxHashSet::default();
    for c in &dt.ctors {
        for (k, field) in names::ctor_fields(c) {
            if !seen.insert(field.clone()) {
                continue;
            }
            let value = read(dt, "this", &field, k);
            cx.writer.writeln(
                body,
                &format!("get {}() {{ return {value}; }}", names::dtor_getter(&field)),
            );
        }
    }
}

fn emit_to_string(cx: &mut CodegenContext<'_>, body: NodeId, dt: &DatatypeDecl) {
    let rt = cx.rt();
    let method = cx.writer.block(body, "toString()", "");
    for (tag, c) in dt.ctors.iter().enumerate() {
        let head = if tag == 0 { "if" } else { "} else if" };
        cx.writer
            .writeln(method, &format!("{head} (this.$tag === {tag}) {{"));
        let branch = cx.writer.nested(method);
        let label = literal::escape(&format!("{}.{}", dt.name, c.name));
        let fields = names::ctor_fields(c);
        if fields.is_empty() {
            cx.writer.writeln(branch, &format!("return \"{label}\";"));
        } else {
            let parts: Vec<String> = fields
                .iter()
                .map(|(k, f)| format!("{rt}.toString({})", read(dt, "this", f, *k)))
                .collect();
            cx.writer.writeln(
                branch,
                &format!(
                    "return \"{label}\" + \"(\" + {} + \")\";",
                    parts.join(" + \", \" + ")
                ),
            );
        }
    }
    let message = literal::escape(&format!("unexpected tag in {}", dt.name));
    let fallback = if dt.ctors.is_empty() { "{" } else { "} else {" };
    cx.writer.writeln(method, fallback);
    let branch = cx.writer.nested(method);
    cx.writer
        .writeln(branch, &format!("throw {rt}.Unreachable(\"{message}\");"));
    cx.writer.writeln(method, "}");
}

/// Lazy tuple slots hold cells, so the runtime's array rendering would show
/// them unforced.
fn emit_tuple_to_string(cx: &mut CodegenContext<'_>, body: NodeId, dt: &DatatypeDecl) {
    let rt = cx.rt();
    let parts: Vec<String> = dt
        .ctors
        .first()
        .map(names::ctor_fields)
        .unwrap_or_default()
        .iter()
        .map(|(k, f)| format!("{rt}.toString({})", read(dt, "this", f, *k)))
        .collect();
    let text = if parts.is_empty() {
        "\"()\"".to_string()
    } else {
        format!("\"(\" + {} + \")\"", parts.join(" + \", \" + "))
    };
    let method = cx.writer.block(body, "toString()", "");
    cx.writer.writeln(method, &format!("return {text};"));
}

fn emit_equals(cx: &mut CodegenContext<'_>, body: NodeId, dt: &DatatypeDecl) -> Result<(), CodegenFault> {
    let rt = cx.rt();
    let method = cx.writer.block(body, "equals(other)", "");
    cx.writer.writeln(method, "if (this === other) {");
    let fast = cx.writer.nested(method);
    cx.writer.writeln(fast, "return true;");
    for (tag, c) in dt.ctors.iter().enumerate() {
        cx.writer
            .writeln(method, &format!("}} else if (this.$tag === {tag}) {{"));
        let branch = cx.writer.nested(method);
        let mut terms = vec![format!("other.$tag === {tag}")];
        for (k, formal) in c.runtime_formals() {
            let field = names::formal_field(&formal.name, k);
            let a = read(dt, "this", &field, k);
            let b = read(dt, "other", &field, k);
            if types::is_direct_comparable(cx.program, &formal.ty)? {
                terms.push(format!("{a} === {b}"));
            } else {
                terms.push(format!("{rt}.areEqual({a}, {b})"));
            }
        }
        cx.writer
            .writeln(branch, &format!("return {};", terms.join(" && ")));
    }
    cx.writer.writeln(method, "} else {");
    let fallback = cx.writer.nested(method);
    cx.writer.writeln(fallback, "return false;");
    cx.writer.writeln(method, "}");
    Ok(())
}

/// Constructor used for the default value.
fn default_ctor(dt: &DatatypeDecl) -> Result<(u32, &Constructor), CodegenFault> {
    let index = match dt.kind {
        DatatypeKind::Inductive { default_ctor } => default_ctor,
        DatatypeKind::Coinductive => 0,
    };
    dt.ctor(index)
        .map(|c| (index, c))
        .ok_or_else(|| CodegenFault::BadDefaultCtor {
            datatype: dt.name.clone(),
            index,
            count: dt.ctors.len(),
        })
}

fn emit_default(cx: &mut CodegenContext<'_>, body: NodeId, dt: &DatatypeDecl) -> Result<(), CodegenFault> {
    let name = names::ident(&dt.name);
    let (index, c) = default_ctor(dt)?;
    tracing::trace!(ctor = %c.name, index, "default constructor");

    let mut args = Vec::new();
    for (_, formal) in c.runtime_formals() {
        let value = types::init_value(cx, &formal.ty, formal.span)?;
        if dt.is_coinductive() {
            args.push(format!("function () {{ return {value}; }}"));
        } else {
            args.push(value);
        }
    }
    let factory = if dt.is_coinductive() {
        names::lazy_fn(c)
    } else {
        names::create_fn(c)
    };

    let method = cx.writer.block(body, "static Default()", "");
    let init = cx
        .writer
        .block(method, &format!("if ({name}._Default === undefined)"), "");
    cx.writer.writeln(
        init,
        &format!("{name}._Default = {name}.{factory}({});", args.join(", ")),
    );
    cx.writer
        .writeln(method, &format!("return {name}._Default;"));
    Ok(())
}

#[cfg(test)]
mod tests;
