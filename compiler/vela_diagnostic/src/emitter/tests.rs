#![allow(clippy::unwrap_used)]

use super::*;
use crate::ErrorCode;
use pretty_assertions::assert_eq;
use vela_ir::Span;

fn render(diags: &[Diagnostic], errors: usize, warnings: usize) -> String {
    let mut out = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut out, ColorMode::Never, false);
    emitter.emit_all(diags);
    emitter.emit_summary(errors, warnings);
    emitter.flush();
    String::from_utf8(out).unwrap()
}

#[test]
fn plain_text_layout() {
    let diag = Diagnostic::error(ErrorCode::E5001)
        .with_message("trait `Shape` cannot be a set element")
        .with_label(Span::new(4, 18), "in this type")
        .with_note("wrap the trait in a class");
    assert_eq!(
        render(&[diag], 1, 0),
        "error[E5001]: trait `Shape` cannot be a set element\n  --> 4..18: in this type\n  = note: wrap the trait in a class\n\nerror: aborting due to previous error\n"
    );
}

#[test]
fn summary_counts() {
    assert_eq!(render(&[], 0, 0), "");
    assert_eq!(render(&[], 0, 2), "warning: 2 warnings emitted\n");
    assert_eq!(
        render(&[], 3, 1),
        "error: aborting due to 3 previous errors; 1 warning emitted\n"
    );
}

#[test]
fn colors_wrap_severity() {
    let mut out = Vec::new();
    let mut emitter = TerminalEmitter::with_color_mode(&mut out, ColorMode::Auto, true);
    emitter.emit(&Diagnostic::error(ErrorCode::E5003).with_message("m"));
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("\x1b[1;31merror\x1b[0m"));
}
