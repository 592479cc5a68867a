//! Class lowering.

use vela_ir::{ClassDecl, DeclRef};

use crate::context::CodegenContext;
use crate::writer::NodeId;
use crate::CodegenFault;

use super::{method, names, types};

/// `$module.C = class C { constructor() {...} members... };`
#[tracing::instrument(level = "debug", skip_all, fields(class = %class.name))]
pub fn emit_class(
    cx: &mut CodegenContext<'_>,
    node: NodeId,
    module: &str,
    class: &ClassDecl,
) -> Result<(), CodegenFault> {
    let decl = DeclRef::new(module, class.name.as_str());
    let name = names::ident(&class.name);
    let body = cx
        .writer
        .block(node, &format!("$module.{name} = class {name}"), ";");

    let ctor = cx.writer.block(body, "constructor()", "");
    for field in class.fields.iter().filter(|f| !f.ghost) {
        types::check_type(cx, &field.ty, field.span);
        let value = types::init_value(cx, &field.ty, field.span)?;
        cx.writer
            .writeln(ctor, &format!("this.{} = {value};", names::ident(&field.name)));
    }

    for member in &class.members {
        method::emit_member(cx, body, &decl, member)?;
    }
    Ok(())
}
