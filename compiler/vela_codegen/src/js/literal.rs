//! Literal rendering.
//!
//! Integer text is never parsed into a machine number: magnitudes beyond
//! the exact range of a double are handed to `BigNumber` as strings.

use vela_ir::{Literal, Type};

use crate::context::CodegenContext;
use crate::CodegenFault;

use super::types::{self, NumericRepr};

/// Decimal text of 2^53 - 1, the largest exactly representable integer.
const MAX_SAFE_INTEGER: &str = "9007199254740991";

/// Sign and digits of an integer literal, leading zeros stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntText<'t> {
    pub negative: bool,
    pub digits: &'t str,
}

impl<'t> IntText<'t> {
    pub fn parse(text: &'t str) -> Result<Self, CodegenFault> {
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodegenFault::MalformedLiteral {
                kind: "integer",
                text: text.to_string(),
            });
        }
        let trimmed = body.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Ok(IntText {
            negative: negative && digits != "0",
            digits,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.digits == "0"
    }

    pub fn is_one(&self) -> bool {
        !self.negative && self.digits == "1"
    }

    /// Whether the magnitude is at most 2^53 - 1.
    pub fn is_safe(&self) -> bool {
        self.digits.len() < MAX_SAFE_INTEGER.len()
            || (self.digits.len() == MAX_SAFE_INTEGER.len() && self.digits <= MAX_SAFE_INTEGER)
    }

    fn signed(&self) -> String {
        if self.negative {
            format!("-{}", self.digits)
        } else {
            self.digits.to_string()
        }
    }
}

/// `BigNumber` expression for an integer literal.
pub fn big_int(rt: &str, text: &str) -> Result<String, CodegenFault> {
    let n = IntText::parse(text)?;
    Ok(if n.is_zero() {
        format!("{rt}.ZERO")
    } else if n.is_one() {
        format!("{rt}.ONE")
    } else if n.is_safe() {
        format!("new BigNumber({})", n.signed())
    } else {
        format!("new BigNumber(\"{}\")", n.signed())
    })
}

/// Plain `number` text for an integer literal in a native context.
pub fn native_int(text: &str) -> Result<String, CodegenFault> {
    Ok(IntText::parse(text)?.signed())
}

pub fn real(rt: &str, numerator: &str, denominator: &str) -> Result<String, CodegenFault> {
    let num = IntText::parse(numerator)?;
    let den = IntText::parse(denominator)?;
    if den.is_zero() || den.negative {
        return Err(CodegenFault::MalformedLiteral {
            kind: "real",
            text: format!("{numerator}/{denominator}"),
        });
    }
    if num.is_zero() {
        return Ok(format!("{rt}.BigRational.ZERO"));
    }
    Ok(format!(
        "new {rt}.BigRational({}, {})",
        big_int(rt, numerator)?,
        big_int(rt, denominator)?
    ))
}

/// Escape text for a double-quoted JavaScript string.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

pub fn char_literal(c: char) -> String {
    let mut buf = [0u8; 4];
    format!("\"{}\"", escape(c.encode_utf8(&mut buf)))
}

pub fn string_literal(rt: &str, value: &str, verbatim: bool) -> String {
    let escaped = if verbatim {
        escape(&value.replace("\"\"", "\""))
    } else {
        escape(value)
    };
    format!("{rt}.Seq.UnicodeFromString(\"{escaped}\")")
}

/// Render `lit` at type `ty`.
pub fn emit_literal(cx: &CodegenContext<'_>, lit: &Literal, ty: &Type) -> Result<String, CodegenFault> {
    let rt = cx.rt();
    match lit {
        Literal::Bool(b) => Ok(b.to_string()),
        Literal::Int(text) => match types::numeric_repr(cx.program, ty)? {
            Some(NumericRepr::Native { .. }) => native_int(text),
            Some(NumericRepr::Rational) => real(rt, text, "1"),
            _ => big_int(rt, text),
        },
        Literal::Real {
            numerator,
            denominator,
        } => real(rt, numerator, denominator),
        Literal::Char(c) => Ok(char_literal(*c)),
        Literal::String { value, verbatim } => Ok(string_literal(rt, value, *verbatim)),
        Literal::Null => Ok("null".into()),
    }
}

#[cfg(test)]
mod tests;
