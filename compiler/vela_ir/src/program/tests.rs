use super::*;
use crate::decl::{Constructor, DatatypeKind, DatatypeShape, Function};
use crate::{ExprId, Span, Type};

fn option_decl() -> TopLevelDecl {
    TopLevelDecl::Datatype(DatatypeDecl {
        name: "Option".into(),
        type_params: vec!["T".into()],
        ctors: vec![
            Constructor::new("None", vec![]),
            Constructor::new(
                "Some",
                vec![crate::Formal::new("value", Type::TypeParam("T".into()))],
            ),
        ],
        kind: DatatypeKind::Inductive { default_ctor: 0 },
        shape: DatatypeShape::Named,
        span: Span::new(0, 40),
    })
}

fn default_class() -> TopLevelDecl {
    TopLevelDecl::Class(ClassDecl {
        name: "__default".into(),
        type_params: vec![],
        fields: vec![],
        members: vec![Member::Function(Function {
            name: "Id".into(),
            is_static: true,
            ins: vec![crate::Formal::new("x", Type::Int)],
            result: Type::Int,
            body: ExprId::new(0),
            tail_recursive: false,
            span: Span::DUMMY,
        })],
        is_default: true,
        span: Span::DUMMY,
    })
}

fn program() -> Program {
    Program::new(
        vec![
            ModuleDecl {
                name: "Lib".into(),
                decls: vec![option_decl()],
            },
            ModuleDecl {
                name: "Main".into(),
                decls: vec![default_class()],
            },
        ],
        ExprArena::new(),
    )
}

#[test]
fn lookup_by_qualified_name() {
    let p = program();
    assert_eq!(p.decl_count(), 2);
    let opt = p.datatype(&DeclRef::new("Lib", "Option"));
    assert_eq!(opt.map(|d| d.ctors.len()), Some(2));
    assert!(p.class(&DeclRef::new("Main", "__default")).is_some());
}

#[test]
fn lookup_respects_module_and_kind() {
    let p = program();
    assert!(p.lookup(&DeclRef::new("Main", "Option")).is_none());
    assert!(p.class(&DeclRef::new("Lib", "Option")).is_none());
    assert!(p.datatype(&DeclRef::new("Main", "__default")).is_none());
}

#[test]
fn member_lookup() {
    let p = program();
    let class = DeclRef::new("Main", "__default");
    assert!(p.member(&class, "Id").is_some_and(Member::is_static));
    assert!(p.member(&class, "Missing").is_none());
}

#[test]
fn parts_round_trip_rebuilds_index() {
    let parts: ProgramParts = program().into();
    let rebuilt = Program::from(parts);
    assert!(rebuilt.lookup(&DeclRef::new("Lib", "Option")).is_some());
    assert_eq!(rebuilt, program());
}
