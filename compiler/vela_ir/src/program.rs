//! A whole resolved program: modules plus the shared arena.

use rustc_hash::FxHashMap;

use crate::decl::{ClassDecl, DatatypeDecl, Member, ModuleDecl, TopLevelDecl};
use crate::{DeclRef, ExprArena};

/// Position of a declaration: (module index, declaration index).
type DeclSlot = (usize, usize);

/// Resolved program handed to a backend.
///
/// Built once and never mutated afterwards; the name index is derived from
/// `modules` on construction.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "ProgramParts", into = "ProgramParts"))]
pub struct Program {
    modules: Vec<ModuleDecl>,
    arena: ExprArena,
    index: FxHashMap<DeclRef, DeclSlot>,
}

/// Serialized form of a [`Program`]: everything except the derived index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramParts {
    pub modules: Vec<ModuleDecl>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arena: ExprArena,
}

impl From<ProgramParts> for Program {
    fn from(parts: ProgramParts) -> Self {
        Program::new(parts.modules, parts.arena)
    }
}

impl From<Program> for ProgramParts {
    fn from(program: Program) -> Self {
        ProgramParts {
            modules: program.modules,
            arena: program.arena,
        }
    }
}

impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.modules == other.modules && self.arena == other.arena
    }
}

impl Eq for Program {}

impl Program {
    pub fn new(modules: Vec<ModuleDecl>, arena: ExprArena) -> Self {
        let mut index = FxHashMap::default();
        for (m, module) in modules.iter().enumerate() {
            for (d, decl) in module.decls.iter().enumerate() {
                // First declaration wins on duplicates; the resolver rejects them anyway.
                index
                    .entry(DeclRef::new(module.name.as_str(), decl.name()))
                    .or_insert((m, d));
            }
        }
        Program {
            modules,
            arena,
            index,
        }
    }

    pub fn modules(&self) -> &[ModuleDecl] {
        &self.modules
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// Resolve a declaration reference in constant time.
    pub fn lookup(&self, decl: &DeclRef) -> Option<&TopLevelDecl> {
        let &(m, d) = self.index.get(decl)?;
        self.modules.get(m)?.decls.get(d)
    }

    pub fn datatype(&self, decl: &DeclRef) -> Option<&DatatypeDecl> {
        match self.lookup(decl)? {
            TopLevelDecl::Datatype(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn class(&self, decl: &DeclRef) -> Option<&ClassDecl> {
        match self.lookup(decl)? {
            TopLevelDecl::Class(cls) => Some(cls),
            _ => None,
        }
    }

    /// Resolve `Module.Class.member`.
    pub fn member(&self, class: &DeclRef, name: &str) -> Option<&Member> {
        self.class(class)?.member(name)
    }

    /// Number of top-level declarations across all modules.
    pub fn decl_count(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests;
