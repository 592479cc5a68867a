#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Numeric representation choices as they appear in whole programs.

mod common;

use vela_codegen::{emit_js, CodegenOptions};
use vela_ir::{
    BinaryOp, ClassDecl, ExprKind, Field, Formal, Literal, NativeType, NewtypeDecl, Span,
    TopLevelDecl, Type, UserKind,
};

use common::{decl_ref, static_function, Builder};

/// `function F(x: T, y: T): T { x op y }` lowered inside module `M`.
fn binary_function(b: &mut Builder, name: &str, op: BinaryOp, ty: &Type) {
    let x = b.var("x", ty.clone());
    let y = b.var("y", ty.clone());
    let body = b.expr(ExprKind::Binary { op, left: x, right: y }, ty.clone());
    b.function(static_function(
        name,
        vec![Formal::new("x", ty.clone()), Formal::new("y", ty.clone())],
        ty.clone(),
        body,
    ));
}

fn lower(b: Builder) -> String {
    let program = b.build();
    emit_js(&program, &CodegenOptions::default()).unwrap().code
}

fn signed_newtype(witness: Option<vela_ir::ExprId>) -> NewtypeDecl {
    NewtypeDecl {
        name: "I32".into(),
        base: Type::Int,
        native: Some(NativeType::number(true)),
        witness,
        span: Span::DUMMY,
    }
}

fn i32_ty() -> Type {
    Type::user(decl_ref("I32"), UserKind::Newtype, vec![])
}

#[test]
fn bitvector_results_are_truncated_to_width() {
    let mut b = Builder::new();
    binary_function(&mut b, "Add8", BinaryOp::Add, &Type::native_bv(8));
    binary_function(&mut b, "Sub32", BinaryOp::Sub, &Type::native_bv(32));
    binary_function(&mut b, "Add64", BinaryOp::Add, &Type::bv(64));
    let code = lower(b);

    assert!(code.contains("static Add8(x, y) {\n      return ((x + y) & 255);\n    }"));
    assert!(code.contains("static Sub32(x, y) {\n      return ((x - y) >>> 0);\n    }"));
    assert!(code.contains("return x.plus(y).mod(_vela.TWO.exponentiatedBy(64));"));
}

#[test]
fn division_is_euclidean() {
    let mut b = Builder::new();
    b.decl(TopLevelDecl::Newtype(signed_newtype(None)));
    binary_function(&mut b, "Div", BinaryOp::Div, &i32_ty());
    binary_function(&mut b, "Mod", BinaryOp::Mod, &i32_ty());
    binary_function(&mut b, "BigDiv", BinaryOp::Div, &Type::Int);
    binary_function(&mut b, "BigMod", BinaryOp::Mod, &Type::Int);
    binary_function(&mut b, "Half", BinaryOp::Div, &Type::native_bv(16));
    let code = lower(b);

    assert!(code.contains("return _vela.EuclideanDivisionNumber(x, y);"));
    assert!(code.contains("return _vela.EuclideanModuloNumber(x, y);"));
    assert!(code.contains("return _vela.EuclideanDivision(x, y);"));
    assert!(code.contains("return x.mod(y);"));
    assert!(code.contains("return Math.trunc(x / y);"));
}

#[test]
fn conversions_cross_representations() {
    let mut b = Builder::new();
    b.decl(TopLevelDecl::Newtype(signed_newtype(None)));
    let x = b.var("x", Type::Int);
    let narrow = b.expr(ExprKind::Conversion { operand: x, to: i32_ty() }, i32_ty());
    b.function(static_function(
        "Narrow",
        vec![Formal::new("x", Type::Int)],
        i32_ty(),
        narrow,
    ));
    let s = b.var("s", i32_ty());
    let widen = b.expr(ExprKind::Conversion { operand: s, to: Type::Int }, Type::Int);
    b.function(static_function(
        "Widen",
        vec![Formal::new("s", i32_ty())],
        Type::Int,
        widen,
    ));
    let n = b.var("n", Type::Int);
    let real = b.expr(ExprKind::Conversion { operand: n, to: Type::Real }, Type::Real);
    b.function(static_function(
        "ToReal",
        vec![Formal::new("n", Type::Int)],
        Type::Real,
        real,
    ));
    let code = lower(b);

    assert!(code.contains("return x.toNumber();"));
    assert!(code.contains("return new BigNumber(s);"));
    assert!(code.contains("return new _vela.BigRational(n);"));
}

#[test]
fn newtype_fields_start_at_their_witness() {
    let mut b = Builder::new();
    let seven = b.expr(ExprKind::Literal(Literal::Int("7".into())), i32_ty());
    b.decl(TopLevelDecl::Newtype(signed_newtype(Some(seven))));
    b.decl(TopLevelDecl::Class(ClassDecl {
        name: "Cell".into(),
        type_params: vec![],
        fields: vec![
            Field::new("small", i32_ty()),
            Field::new("big", Type::Int),
        ],
        members: vec![],
        is_default: false,
        span: Span::DUMMY,
    }));
    let code = lower(b);

    assert!(code.contains("this.small = 7;"));
    assert!(code.contains("this.big = _vela.ZERO;"));
    // Newtypes have no carrier of their own.
    assert!(!code.contains("class I32"));
}
