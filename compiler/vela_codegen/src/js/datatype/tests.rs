use super::*;
use pretty_assertions::assert_eq;
use vela_ir::{DatatypeShape, Formal, Program, Type, TopLevelDecl, UserKind};

use crate::test_helpers::{decl_ref, option_decl, render, ProgramBuilder};

fn lower(program: &Program, name: &str) -> Result<String, CodegenFault> {
    let dt = program.datatype(&decl_ref(name)).expect("datatype exists");
    render(program, |cx, root| emit_datatype(cx, root, dt))
}

fn with(decl: DatatypeDecl) -> Program {
    let mut b = ProgramBuilder::new();
    b.decl(TopLevelDecl::Datatype(decl));
    b.build()
}

#[test]
fn option_carrier() {
    let program = with(option_decl());
    let expected = r#"$module.Option = class Option {
  constructor(tag) {
    this.$tag = tag;
  }
  static create_None() {
    let $dt = new Option(0);
    return $dt;
  }
  static create_Some(value) {
    let $dt = new Option(1);
    $dt.value = value;
    return $dt;
  }
  get is_None() { return this.$tag === 0; }
  get is_Some() { return this.$tag === 1; }
  get dtor_value() { return this.value; }
  toString() {
    if (this.$tag === 0) {
      return "Option.None";
    } else if (this.$tag === 1) {
      return "Option.Some" + "(" + _vela.toString(this.value) + ")";
    } else {
      throw _vela.Unreachable("unexpected tag in Option");
    }
  }
  equals(other) {
    if (this === other) {
      return true;
    } else if (this.$tag === 0) {
      return other.$tag === 0;
    } else if (this.$tag === 1) {
      return other.$tag === 1 && _vela.areEqual(this.value, other.value);
    } else {
      return false;
    }
  }
  static Default() {
    if (Option._Default === undefined) {
      Option._Default = Option.create_None();
    }
    return Option._Default;
  }
};
"#;
    assert_eq!(lower(&program, "Option").unwrap(), expected);
}

#[test]
fn ghost_formals_are_not_stored() {
    let mut dt = option_decl();
    dt.ctors[1]
        .formals
        .insert(0, Formal::new("proof", Type::Int).ghost());
    dt.ctors[1].formals.push(Formal::new("flag", Type::Bool));
    dt.kind = DatatypeKind::Inductive { default_ctor: 1 };
    let out = lower(&with(dt), "Option").unwrap();
    assert!(out.contains("static create_Some(value, flag) {"));
    assert!(!out.contains("proof"));
    assert!(out.contains(
        "return other.$tag === 1 && _vela.areEqual(this.value, other.value) && this.flag === other.flag;"
    ));
    assert!(out.contains("Option._Default = Option.create_Some(_vela.ZERO, false);"));
    assert!(out.contains(
        r#"return "Option.Some" + "(" + _vela.toString(this.value) + ", " + _vela.toString(this.flag) + ")";"#
    ));
}

#[test]
fn shared_field_names_get_one_getter() {
    let mut dt = option_decl();
    dt.name = "Shape".into();
    dt.ctors = vec![
        Constructor::new("Circle", vec![Formal::new("x", Type::Int)]),
        Constructor::new(
            "Square",
            vec![Formal::new("x", Type::Int), Formal::new("side", Type::Int)],
        ),
    ];
    let out = lower(&with(dt), "Shape").unwrap();
    assert_eq!(out.matches("get dtor_x()").count(), 1);
    assert_eq!(out.matches("get dtor_side()").count(), 1);
}

#[test]
fn coinductive_fields_are_lazy() {
    let stream = Type::user(decl_ref("Stream"), UserKind::Datatype, vec![]);
    let dt = DatatypeDecl {
        name: "Stream".into(),
        type_params: vec![],
        ctors: vec![Constructor::new(
            "Cons",
            vec![Formal::new("head", Type::Int), Formal::new("tail", stream)],
        )],
        kind: DatatypeKind::Coinductive,
        shape: DatatypeShape::Named,
        span: vela_ir::Span::DUMMY,
    };
    let out = lower(&with(dt), "Stream").unwrap();
    assert!(out.contains("$dt._head = _vela.Lazy.of(head);"));
    assert!(out.contains("static lazy_Cons(head, tail) {"));
    assert!(out.contains("$dt._tail = new _vela.Lazy(tail);"));
    assert!(out.contains("get dtor_head() { return this._head.force(); }"));
    assert!(out.contains("_vela.areEqual(this._tail.force(), other._tail.force())"));
    assert!(out.contains(
        "Stream._Default = Stream.lazy_Cons(function () { return _vela.ZERO; }, function () { return M.Stream.Default(); });"
    ));
}

#[test]
fn tuples_extend_array() {
    let dt = DatatypeDecl {
        name: "_tuple#2".into(),
        type_params: vec![],
        ctors: vec![Constructor::new(
            "_#Make2",
            vec![Formal::new("_0", Type::Int), Formal::new("_1", Type::Bool)],
        )],
        kind: DatatypeKind::Inductive { default_ctor: 0 },
        shape: DatatypeShape::Tuple,
        span: vela_ir::Span::DUMMY,
    };
    let out = lower(&with(dt), "_tuple#2").unwrap();
    assert!(out.starts_with("$module._tuple_h2 = class _tuple_h2 extends Array {\n"));
    assert!(out.contains("    super();\n"));
    assert!(out.contains("$dt[0] = _0;"));
    assert!(out.contains("$dt[1] = _1;"));
    assert!(!out.contains("get dtor_"));
    assert!(!out.contains("toString()"));
    assert!(out.contains(
        "return other.$tag === 0 && _vela.areEqual(this[0], other[0]) && this[1] === other[1];"
    ));
}

#[test]
fn coinductive_tuples_hold_lazy_slots() {
    let dt = DatatypeDecl {
        name: "_tuple#2".into(),
        type_params: vec![],
        ctors: vec![Constructor::new(
            "_#Make2",
            vec![Formal::new("_0", Type::Int), Formal::new("_1", Type::Bool)],
        )],
        kind: DatatypeKind::Coinductive,
        shape: DatatypeShape::Tuple,
        span: vela_ir::Span::DUMMY,
    };
    let program = with(dt);
    let out = lower(&program, "_tuple#2").unwrap();
    assert!(out.contains("$dt[0] = _vela.Lazy.of(_0);"));
    assert!(out.contains("$dt[1] = new _vela.Lazy(_1);"));
    assert!(out.contains(
        "return other.$tag === 0 && _vela.areEqual(this[0].force(), other[0].force()) && this[1].force() === other[1].force();"
    ));
    assert!(out.contains(
        r#"return "(" + _vela.toString(this[0].force()) + ", " + _vela.toString(this[1].force()) + ")";"#
    ));

    let decl = decl_ref("_tuple#2");
    let dt = program.datatype(&decl).expect("datatype exists");
    assert_eq!(
        crate::js::expr::field_access(dt, &decl, 0, 1, "t").unwrap(),
        "t[1].force()"
    );
}

#[test]
fn default_ctor_out_of_range() {
    let mut dt = option_decl();
    dt.kind = DatatypeKind::Inductive { default_ctor: 5 };
    assert_eq!(
        lower(&with(dt), "Option").err(),
        Some(CodegenFault::BadDefaultCtor {
            datatype: "Option".into(),
            index: 5,
            count: 2,
        })
    );
}

#[test]
fn unsupported_field_type_is_reported() {
    let tr = Type::user(decl_ref("Shape"), UserKind::Trait, vec![]);
    let mut dt = option_decl();
    dt.ctors[1].formals[0].ty = Type::seq(tr);
    let program = with(dt);
    let options = crate::CodegenOptions::default();
    let mut cx = crate::context::CodegenContext::new(&program, &options);
    let root = cx.writer.root();
    let decl = program.datatype(&decl_ref("Option")).expect("datatype exists");
    emit_datatype(&mut cx, root, decl).unwrap();
    let codes: Vec<_> = cx.diagnostics.flush().into_iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![vela_diagnostic::ErrorCode::E5001]);
}
