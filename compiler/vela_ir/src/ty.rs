//! Resolved source types.
//!
//! `Type` is a closed sum: every consumer matches it exhaustively, so adding
//! a variant fails to compile until every backend handles it.

use std::fmt;

/// Reference to a top-level declaration: `Module.Name`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclRef {
    pub module: String,
    pub name: String,
}

impl DeclRef {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        DeclRef {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DeclRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.name)
    }
}

/// Machine-width numeric kinds a resolver may pick for a bounded type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NativeSelection {
    Byte,
    SByte,
    UShort,
    Short,
    UInt,
    Int,
    /// An IEEE double used only for integers in the safe-exact range.
    Number,
    ULong,
    Long,
}

impl fmt::Display for NativeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NativeSelection::Byte => "byte",
            NativeSelection::SByte => "sbyte",
            NativeSelection::UShort => "ushort",
            NativeSelection::Short => "short",
            NativeSelection::UInt => "uint",
            NativeSelection::Int => "int",
            NativeSelection::Number => "number",
            NativeSelection::ULong => "ulong",
            NativeSelection::Long => "long",
        };
        f.write_str(s)
    }
}

/// Native backing chosen upstream for a bounded integer or bitvector type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NativeType {
    pub selection: NativeSelection,
    /// Whether the declared range admits negative values.
    pub signed: bool,
}

impl NativeType {
    pub const fn number(signed: bool) -> Self {
        NativeType {
            selection: NativeSelection::Number,
            signed,
        }
    }
}

/// Arrow flavors. `General` arrows are nullable handles; `Partial` arrows
/// may have preconditions; `Total` arrows are defined everywhere.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrowKind {
    General,
    Partial,
    Total,
}

/// What a user-defined type name resolves to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UserKind {
    Class,
    Trait,
    Datatype,
    Newtype,
    Subset,
}

/// Instantiation of a user-defined declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserType {
    pub decl: DeclRef,
    pub kind: UserKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub args: Vec<Type>,
    /// Only meaningful for classes and traits (`C?` vs `C`).
    #[cfg_attr(feature = "serde", serde(default))]
    pub nullable: bool,
}

/// A resolved type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Bool,
    Char,
    Int,
    Real,
    BigOrdinal,
    Bitvector {
        width: u32,
        native: Option<NativeType>,
    },
    Array {
        dims: u32,
        elem: Box<Type>,
        nullable: bool,
    },
    Set(Box<Type>),
    MultiSet(Box<Type>),
    Seq(Box<Type>),
    Map {
        key: Box<Type>,
        value: Box<Type>,
    },
    Arrow {
        params: Vec<Type>,
        result: Box<Type>,
        kind: ArrowKind,
    },
    UserDefined(UserType),
    TypeParam(String),
}

impl Type {
    pub fn set(elem: Type) -> Type {
        Type::Set(Box::new(elem))
    }

    pub fn multiset(elem: Type) -> Type {
        Type::MultiSet(Box::new(elem))
    }

    pub fn seq(elem: Type) -> Type {
        Type::Seq(Box::new(elem))
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn array(dims: u32, elem: Type) -> Type {
        Type::Array {
            dims,
            elem: Box::new(elem),
            nullable: false,
        }
    }

    pub fn bv(width: u32) -> Type {
        Type::Bitvector {
            width,
            native: None,
        }
    }

    pub fn native_bv(width: u32) -> Type {
        Type::Bitvector {
            width,
            native: Some(NativeType::number(false)),
        }
    }

    pub fn arrow(params: Vec<Type>, result: Type, kind: ArrowKind) -> Type {
        Type::Arrow {
            params,
            result: Box::new(result),
            kind,
        }
    }

    pub fn user(decl: DeclRef, kind: UserKind, args: Vec<Type>) -> Type {
        Type::UserDefined(UserType {
            decl,
            kind,
            args,
            nullable: false,
        })
    }

    /// The string type: a sequence of characters.
    pub fn string() -> Type {
        Type::seq(Type::Char)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Type::Seq(elem) if **elem == Type::Char)
    }

    pub fn as_user(&self) -> Option<&UserType> {
        match self {
            Type::UserDefined(ut) => Some(ut),
            _ => None,
        }
    }

    /// Element type for sets, multisets, sequences, and arrays.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Set(e) | Type::MultiSet(e) | Type::Seq(e) => Some(e),
            Type::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("bool"),
            Type::Char => f.write_str("char"),
            Type::Int => f.write_str("int"),
            Type::Real => f.write_str("real"),
            Type::BigOrdinal => f.write_str("ORDINAL"),
            Type::Bitvector { width, .. } => write!(f, "bv{width}"),
            Type::Array {
                dims,
                elem,
                nullable,
            } => {
                f.write_str("array")?;
                if *dims > 1 {
                    write!(f, "{dims}")?;
                }
                if *nullable {
                    f.write_str("?")?;
                }
                write!(f, "<{elem}>")
            }
            Type::Set(e) => write!(f, "set<{e}>"),
            Type::MultiSet(e) => write!(f, "multiset<{e}>"),
            Type::Seq(e) => write!(f, "seq<{e}>"),
            Type::Map { key, value } => write!(f, "map<{key}, {value}>"),
            Type::Arrow {
                params,
                result,
                kind,
            } => {
                let arrow = match kind {
                    ArrowKind::General => "~>",
                    ArrowKind::Partial => "-->",
                    ArrowKind::Total => "->",
                };
                f.write_str("(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") {arrow} {result}")
            }
            Type::UserDefined(ut) => {
                f.write_str(&ut.decl.name)?;
                if !ut.args.is_empty() {
                    f.write_str("<")?;
                    for (i, a) in ut.args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{a}")?;
                    }
                    f.write_str(">")?;
                }
                if ut.nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Type::TypeParam(name) => f.write_str(name),
        }
    }
}
