//! Top-level declarations.

use crate::{ExprId, Span, StmtId, Type};

/// Formal parameter of a constructor, method, or function.
///
/// Ghost formals exist only for verification and never reach emitted code.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formal {
    /// May be empty for anonymous constructor fields.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub ty: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ghost: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl Formal {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Formal {
            name: name.into(),
            ty,
            ghost: false,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn ghost(mut self) -> Self {
        self.ghost = true;
        self
    }
}

/// Datatype constructor. Its tag is its index in the declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constructor {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub formals: Vec<Formal>,
}

impl Constructor {
    pub fn new(name: impl Into<String>, formals: Vec<Formal>) -> Self {
        Constructor {
            name: name.into(),
            formals,
        }
    }

    /// Non-ghost formals paired with their contiguous target position.
    pub fn runtime_formals(&self) -> impl Iterator<Item = (usize, &Formal)> {
        self.formals.iter().filter(|f| !f.ghost).enumerate()
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DatatypeKind {
    /// `default_ctor` is the constructor the resolver picked for the default value.
    Inductive { default_ctor: u32 },
    Coinductive,
}

/// Whether the datatype is an anonymous tuple.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DatatypeShape {
    #[default]
    Named,
    Tuple,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatatypeDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<String>,
    pub ctors: Vec<Constructor>,
    pub kind: DatatypeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape: DatatypeShape,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl DatatypeDecl {
    pub fn is_coinductive(&self) -> bool {
        matches!(self.kind, DatatypeKind::Coinductive)
    }

    pub fn is_tuple(&self) -> bool {
        self.shape == DatatypeShape::Tuple
    }

    pub fn ctor(&self, index: u32) -> Option<&Constructor> {
        self.ctors.get(index as usize)
    }
}

/// Integer newtype, optionally backed by a native number.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewtypeDecl {
    pub name: String,
    pub base: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub native: Option<crate::NativeType>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub witness: Option<ExprId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsetTypeDecl {
    pub name: String,
    pub base: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub witness: Option<ExprId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub name: String,
    pub ty: Type,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ghost: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
            ghost: false,
            span: Span::DUMMY,
        }
    }

    #[must_use]
    pub fn ghost(mut self) -> Self {
        self.ghost = true;
        self
    }
}

/// Statement-bodied operation with in- and out-parameters.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Method {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ins: Vec<Formal>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub outs: Vec<Formal>,
    pub body: StmtId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tail_recursive: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl Method {
    /// Outs that survive into the target signature.
    pub fn runtime_outs(&self) -> impl Iterator<Item = &Formal> {
        self.outs.iter().filter(|f| !f.ghost)
    }
}

/// Expression-bodied operation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ins: Vec<Formal>,
    pub result: Type,
    pub body: ExprId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tail_recursive: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Member {
    Method(Method),
    Function(Function),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Method(m) => &m.name,
            Member::Function(f) => &f.name,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Member::Method(m) => m.is_static,
            Member::Function(f) => f.is_static,
        }
    }

    pub fn ins(&self) -> &[Formal] {
        match self {
            Member::Method(m) => &m.ins,
            Member::Function(f) => &f.ins,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub type_params: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: Vec<Field>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
    /// The implicit per-module class holding top-level functions and methods.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_default: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub span: Span,
}

impl ClassDecl {
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == name)
    }
}

/// Everything a module can declare at the top level.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TopLevelDecl {
    Datatype(DatatypeDecl),
    Class(ClassDecl),
    Newtype(NewtypeDecl),
    Subset(SubsetTypeDecl),
}

impl TopLevelDecl {
    pub fn name(&self) -> &str {
        match self {
            TopLevelDecl::Datatype(d) => &d.name,
            TopLevelDecl::Class(c) => &c.name,
            TopLevelDecl::Newtype(n) => &n.name,
            TopLevelDecl::Subset(s) => &s.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            TopLevelDecl::Datatype(d) => d.span,
            TopLevelDecl::Class(c) => c.span,
            TopLevelDecl::Newtype(n) => n.span,
            TopLevelDecl::Subset(s) => s.span,
        }
    }
}

/// A source module in dependency order.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleDecl {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub decls: Vec<TopLevelDecl>,
}
