use super::*;
use pretty_assertions::assert_eq;
use vela_ir::{ExprKind, Formal, Member, StmtMatchArm, TopLevelDecl, Type};

use crate::test_helpers::{
    class, decl_ref, lower_stmt, method, option_decl, option_ty, scope_of, ProgramBuilder,
};

fn local(name: &str, ty: Type) -> LocalVar {
    LocalVar { name: name.into(), ty, ghost: false }
}

fn target(class: &str, member: &str) -> CallTarget {
    CallTarget { class: decl_ref(class), member: member.into(), receiver: None }
}

#[test]
fn variable_declarations() {
    let mut b = ProgramBuilder::new();
    let one = b.int("1");
    let init = b.stmt(StmtKind::VarDecl { locals: vec![local("x", Type::Int)], init: Some(one) });
    let defaults = b.stmt(StmtKind::VarDecl {
        locals: vec![
            local("flag", Type::Bool),
            LocalVar { name: "proof".into(), ty: Type::Int, ghost: true },
            local("s", Type::seq(Type::Int)),
        ],
        init: None,
    });
    let pair = b.var("pair", Type::Int);
    let split = b.stmt(StmtKind::VarDecl {
        locals: vec![local("a", Type::Int), local("b", Type::Bool)],
        init: Some(pair),
    });
    let p = b.build();
    assert_eq!(lower_stmt(&p, None, init).unwrap(), "let x = _vela.ONE;\n");
    assert_eq!(
        lower_stmt(&p, None, defaults).unwrap(),
        "let flag = false;\nlet s = _vela.Seq.of();\n"
    );
    assert_eq!(lower_stmt(&p, None, split).unwrap(), "let [a, b] = pair;\n");
}

#[test]
fn assignments() {
    let mut b = ProgramBuilder::new();
    let a = b.var("a", Type::array(1, Type::Int));
    let i = b.var("i", Type::Int);
    let one = b.int("1");
    let elem = b.stmt(StmtKind::Assign {
        lhs: Lhs::ArrayElem { array: a, indices: vec![i] },
        rhs: one,
    });
    let obj = b.var("obj", Type::Int);
    let field = b.stmt(StmtKind::Assign {
        lhs: Lhs::Field { receiver: obj, field: "count".into() },
        rhs: one,
    });
    let p = b.build();
    assert_eq!(lower_stmt(&p, None, elem).unwrap(), "a[i.toNumber()] = _vela.ONE;\n");
    assert_eq!(lower_stmt(&p, None, field).unwrap(), "obj.count = _vela.ONE;\n");
}

fn util_program(b: &mut ProgramBuilder) {
    let empty = b.block(vec![]);
    let pair = method(
        "Pair",
        vec![],
        vec![
            Formal::new("a", Type::Int),
            Formal::new("witness", Type::Int).ghost(),
            Formal::new("b", Type::Bool),
        ],
        empty,
    );
    let one = method("One", vec![], vec![Formal::new("r", Type::Int)], empty);
    let mut looped = method("Loop", vec![Formal::new("n", Type::Int)], vec![], empty);
    looped.tail_recursive = true;
    b.decl(TopLevelDecl::Class(class(
        "Util",
        vec![Member::Method(pair), Member::Method(one), Member::Method(looped)],
    )));
}

#[test]
fn multi_output_calls_unpack_positionally() {
    let mut b = ProgramBuilder::new();
    util_program(&mut b);
    let call = b.stmt(StmtKind::Call {
        target: target("Util", "Pair"),
        args: vec![],
        outs: vec![
            Lhs::Local("a".into()),
            Lhs::Local("w".into()),
            Lhs::Local("b".into()),
        ],
        declare: true,
    });
    let single = b.stmt(StmtKind::Call {
        target: target("Util", "One"),
        args: vec![],
        outs: vec![Lhs::Local("r".into())],
        declare: false,
    });
    let bad = b.stmt(StmtKind::Call {
        target: target("Util", "Pair"),
        args: vec![],
        outs: vec![Lhs::Local("a".into())],
        declare: true,
    });
    let p = b.build();
    assert_eq!(
        lower_stmt(&p, None, call).unwrap(),
        "let _outcollector0 = M.Util.Pair();\nlet a = _outcollector0[0];\nlet b = _outcollector0[1];\n"
    );
    assert_eq!(lower_stmt(&p, None, single).unwrap(), "r = M.Util.One();\n");
    assert!(matches!(
        lower_stmt(&p, None, bad),
        Err(CodegenFault::ArityMismatch { expected: 3, actual: 1, .. })
    ));
}

#[test]
fn returns_follow_the_outs() {
    let mut b = ProgramBuilder::new();
    util_program(&mut b);
    let x = b.var("x", Type::Int);
    let y = b.var("y", Type::Bool);
    let zero = b.int("0");
    let explicit = b.stmt(StmtKind::Return { values: vec![x, zero, y] });
    let bare = b.stmt(StmtKind::Return { values: vec![] });
    let p = b.build();
    let scope = || Some(scope_of(&p, "Util", "Pair"));
    assert_eq!(lower_stmt(&p, scope(), explicit).unwrap(), "return [x, y];\n");
    assert_eq!(lower_stmt(&p, scope(), bare).unwrap(), "return [a, b];\n");
    assert_eq!(
        lower_stmt(&p, Some(scope_of(&p, "Util", "One")), bare).unwrap(),
        "return r;\n"
    );
    assert_eq!(lower_stmt(&p, None, bare).unwrap(), "return;\n");
}

#[test]
fn self_calls_become_jumps() {
    let mut b = ProgramBuilder::new();
    util_program(&mut b);
    let n = b.var("n", Type::Int);
    let call = b.stmt(StmtKind::Call {
        target: target("Util", "Loop"),
        args: vec![n],
        outs: vec![],
        declare: false,
    });
    let p = b.build();
    assert_eq!(
        lower_stmt(&p, Some(scope_of(&p, "Util", "Loop")), call).unwrap(),
        "let _in0 = n;\nn = _in0;\ncontinue TAIL_CALL_START;\n"
    );
    assert_eq!(lower_stmt(&p, None, call).unwrap(), "M.Util.Loop(n);\n");
}

#[test]
fn conditionals() {
    let mut b = ProgramBuilder::new();
    let c = b.var("c", Type::Bool);
    let one = b.int("1");
    let zero = b.int("0");
    let then_branch = b.stmt(StmtKind::Assign { lhs: Lhs::Local("x".into()), rhs: one });
    let else_branch = b.stmt(StmtKind::Assign { lhs: Lhs::Local("x".into()), rhs: zero });
    let then_block = b.block(vec![then_branch]);
    let stmt = b.stmt(StmtKind::If { cond: c, then_branch: then_block, else_branch: Some(else_branch) });
    let p = b.build();
    assert_eq!(
        lower_stmt(&p, None, stmt).unwrap(),
        "if (c) {\n  x = _vela.ONE;\n} else {\n  x = _vela.ZERO;\n}\n"
    );
}

#[test]
fn counted_loops() {
    let mut b = ProgramBuilder::new();
    let zero = b.int("0");
    let n = b.var("n", Type::Int);
    let i = b.var("i", Type::Int);
    let print = b.stmt(StmtKind::Print(vec![i]));
    let up = b.stmt(StmtKind::ForRange {
        var: local("i", Type::Int),
        start: zero,
        end: Some(n),
        up: true,
        body: print,
    });
    let byte = Type::native_bv(8);
    let k = b.var("k", byte.clone());
    let floor = b.expr(ExprKind::Literal(vela_ir::Literal::Int("0".into())), byte.clone());
    let brk = b.stmt(StmtKind::Break(None));
    let down = b.stmt(StmtKind::ForRange {
        var: local("i", byte),
        start: k,
        end: Some(floor),
        up: false,
        body: brk,
    });
    let p = b.build();
    assert_eq!(
        lower_stmt(&p, None, up).unwrap(),
        "for (let i = _vela.ZERO, _hi0 = n; i.isLessThan(_hi0); i = i.plus(_vela.ONE)) {\n  process.stdout.write(_vela.toString(i));\n}\n"
    );
    assert_eq!(
        lower_stmt(&p, None, down).unwrap(),
        "for (let i = k, _lo0 = 0; _lo0 < i; ) {\n  i--;\n  break;\n}\n"
    );
}

#[test]
fn unbounded_loops() {
    let mut b = ProgramBuilder::new();
    let one = b.int("1");
    let brk = b.stmt(StmtKind::Break(None));
    let doubling = b.stmt(StmtKind::DoublingLoop { var: local("i", Type::Int), start: one, body: brk });
    let yes = b.bool(true);
    let cont = b.stmt(StmtKind::Continue(Some("outer".into())));
    let body = b.block(vec![cont]);
    let w = b.stmt(StmtKind::While { cond: yes, body });
    let labeled = b.stmt(StmtKind::Labeled { label: "outer".into(), body: w });
    let p = b.build();
    assert_eq!(
        lower_stmt(&p, None, doubling).unwrap(),
        "for (let i = _vela.ONE; ; i = i.multipliedBy(2)) {\n  break;\n}\n"
    );
    assert_eq!(
        lower_stmt(&p, None, labeled).unwrap(),
        "outer: while (true) {\n  continue outer;\n}\n"
    );
}

#[test]
fn statement_match() {
    let mut b = ProgramBuilder::new();
    b.decl(TopLevelDecl::Datatype(option_decl()));
    let o = b.var("o", option_ty());
    let v = b.var("v", Type::Int);
    let print = b.stmt(StmtKind::Print(vec![v]));
    let stmt = b.stmt(StmtKind::Match {
        source: o,
        datatype: decl_ref("Option"),
        arms: vec![StmtMatchArm { ctor: 1, bindings: vec![Some("v".into())], body: print }],
    });
    let empty = b.stmt(StmtKind::Match { source: o, datatype: decl_ref("Option"), arms: vec![] });
    let p = b.build();
    assert_eq!(
        lower_stmt(&p, None, stmt).unwrap(),
        "let _source0 = o;\n{\n  let v = _source0.dtor_value;\n  process.stdout.write(_vela.toString(v));\n}\n"
    );
    assert_eq!(
        lower_stmt(&p, None, empty).unwrap(),
        "let _source0 = o;\nthrow _vela.Unreachable(\"no match arm for M.Option\");\n"
    );
}

#[test]
fn labeled_statements_that_open_with_a_declaration() {
    let mut b = ProgramBuilder::new();
    b.decl(TopLevelDecl::Datatype(option_decl()));
    let o = b.var("o", option_ty());
    let v = b.var("v", Type::Int);
    let print = b.stmt(StmtKind::Print(vec![v]));
    let matched = b.stmt(StmtKind::Match {
        source: o,
        datatype: decl_ref("Option"),
        arms: vec![StmtMatchArm { ctor: 1, bindings: vec![Some("v".into())], body: print }],
    });
    let labeled_match = b.stmt(StmtKind::Labeled { label: "arms".into(), body: matched });
    let one = b.int("1");
    let decl = b.stmt(StmtKind::VarDecl { locals: vec![local("x", Type::Int)], init: Some(one) });
    let labeled_decl = b.stmt(StmtKind::Labeled { label: "done".into(), body: decl });
    let p = b.build();

    let out = lower_stmt(&p, None, labeled_match).unwrap();
    assert!(!out.contains("arms: let"));
    assert_eq!(
        out,
        "arms: {\n  let _source0 = o;\n  {\n    let v = _source0.dtor_value;\n    process.stdout.write(_vela.toString(v));\n  }\n}\n"
    );
    assert_eq!(
        lower_stmt(&p, None, labeled_decl).unwrap(),
        "done: {\n  let x = _vela.ONE;\n}\n"
    );
}

#[test]
fn return_text_shapes() {
    assert_eq!(return_text(&[]), "return;");
    assert_eq!(return_text(&["x".into()]), "return x;");
    assert_eq!(return_text(&["x".into(), "y".into()]), "return [x, y];");
}
