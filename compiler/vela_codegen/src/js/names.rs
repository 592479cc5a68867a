//! Identifier mangling for emitted JavaScript.

use vela_ir::{Constructor, DeclRef};

/// Words that cannot be used as JavaScript binding names, plus globals the
/// emitted code relies on.
const RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield", "BigNumber", "Infinity", "Math", "NaN", "String", "process",
];

/// Make a source identifier a valid JavaScript identifier that is not a
/// reserved word.
///
/// `'` becomes `_k`, `#` becomes `_h`, `?` becomes `_q`; any other character
/// outside `[A-Za-z0-9_$]` becomes `_`. Reserved words get a `_$$_` prefix.
/// The mapping is not injective: `a'` and `a_k` both become `a_k`, so two
/// source names in one scope that differ only this way will clash.
pub fn ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        match c {
            '\'' => out.push_str("_k"),
            '#' => out.push_str("_h"),
            '?' => out.push_str("_q"),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '$' => out.push(c),
            _ => out.push('_'),
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() || RESERVED.contains(&out.as_str()) {
        out.insert_str(0, "_$$_");
    }
    out
}

/// `Module.Name` as referenced from anywhere in the output.
pub fn qualified(decl: &DeclRef) -> String {
    format!("{}.{}", ident(&decl.module), ident(&decl.name))
}

/// Field name of the non-ghost formal at position `k` of a constructor.
pub fn formal_field(name: &str, k: usize) -> String {
    if name.is_empty() {
        format!("_a{k}")
    } else {
        ident(name)
    }
}

/// Non-ghost fields of a constructor as `(position, field name)`.
pub fn ctor_fields(ctor: &Constructor) -> Vec<(usize, String)> {
    ctor.runtime_formals()
        .map(|(k, f)| (k, formal_field(&f.name, k)))
        .collect()
}

pub fn create_fn(ctor: &Constructor) -> String {
    format!("create_{}", ident(&ctor.name))
}

pub fn lazy_fn(ctor: &Constructor) -> String {
    format!("lazy_{}", ident(&ctor.name))
}

pub fn is_getter(ctor: &Constructor) -> String {
    format!("is_{}", ident(&ctor.name))
}

pub fn dtor_getter(field: &str) -> String {
    format!("dtor_{field}")
}
