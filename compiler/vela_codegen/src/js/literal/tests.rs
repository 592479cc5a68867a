use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn small_integers() {
    assert_eq!(big_int("_vela", "0").as_deref(), Ok("_vela.ZERO"));
    assert_eq!(big_int("_vela", "-000").as_deref(), Ok("_vela.ZERO"));
    assert_eq!(big_int("_vela", "1").as_deref(), Ok("_vela.ONE"));
    assert_eq!(big_int("_vela", "-1").as_deref(), Ok("new BigNumber(-1)"));
    assert_eq!(big_int("_vela", "0042").as_deref(), Ok("new BigNumber(42)"));
}

#[test]
fn safe_integer_boundary() {
    assert_eq!(
        big_int("_vela", "9007199254740991").as_deref(),
        Ok("new BigNumber(9007199254740991)")
    );
    assert_eq!(
        big_int("_vela", "9007199254740992").as_deref(),
        Ok("new BigNumber(\"9007199254740992\")")
    );
    assert_eq!(
        big_int("_vela", "-123456789012345678901234567890").as_deref(),
        Ok("new BigNumber(\"-123456789012345678901234567890\")")
    );
}

#[test]
fn malformed_integers_are_faults() {
    for text in ["", "-", "12a", "1.5", "+3"] {
        assert!(
            matches!(big_int("_vela", text), Err(CodegenFault::MalformedLiteral { .. })),
            "{text:?} accepted"
        );
    }
}

#[test]
fn native_integers_are_plain() {
    assert_eq!(native_int("007").as_deref(), Ok("7"));
    assert_eq!(native_int("-12").as_deref(), Ok("-12"));
}

#[test]
fn reals() {
    assert_eq!(real("_vela", "0", "5").as_deref(), Ok("_vela.BigRational.ZERO"));
    assert_eq!(
        real("_vela", "3", "4").as_deref(),
        Ok("new _vela.BigRational(new BigNumber(3), new BigNumber(4))")
    );
    assert_eq!(
        real("_vela", "-1", "1").as_deref(),
        Ok("new _vela.BigRational(new BigNumber(-1), _vela.ONE)")
    );
    assert!(real("_vela", "1", "0").is_err());
}

#[test]
fn escape_table() {
    assert_eq!(escape("a\"b\\c\nd\re\tf"), "a\\\"b\\\\c\\nd\\re\tf");
    assert_eq!(char_literal('\''), "\"'\"");
    assert_eq!(char_literal('"'), "\"\\\"\"");
}

#[test]
fn strings() {
    assert_eq!(
        string_literal("_vela", "hi\n", false),
        "_vela.Seq.UnicodeFromString(\"hi\\n\")"
    );
    assert_eq!(
        string_literal("_vela", "say \"\"hi\"\"\\", true),
        "_vela.Seq.UnicodeFromString(\"say \\\"hi\\\"\\\\\")"
    );
}

proptest! {
    #[test]
    fn integer_rendering_is_exact(neg in any::<bool>(), digits in "[0-9]{1,60}") {
        let text = if neg { format!("-{digits}") } else { digits.clone() };
        let rendered = big_int("_vela", &text).unwrap_or_default();
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            prop_assert_eq!(rendered, "_vela.ZERO");
        } else if trimmed == "1" && !neg {
            prop_assert_eq!(rendered, "_vela.ONE");
        } else {
            let sign = if neg { "-" } else { "" };
            let exact = trimmed.len() < 16
                || trimmed.parse::<u64>().is_ok_and(|n| n <= (1u64 << 53) - 1);
            let expected = if exact {
                format!("new BigNumber({sign}{trimmed})")
            } else {
                format!("new BigNumber(\"{sign}{trimmed}\")")
            };
            prop_assert_eq!(rendered, expected);
        }
    }

    #[test]
    fn escaping_never_leaves_a_bare_quote(s in "\\PC*") {
        let escaped = escape(&s);
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                prop_assert!(chars.next().is_some());
            } else {
                prop_assert!(c != '"' && c != '\n' && c != '\r');
            }
        }
    }
}
