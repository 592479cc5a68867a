use super::*;
use pretty_assertions::assert_eq;

fn unsupported(start: u32, msg: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E5001)
        .with_message(msg)
        .with_label(Span::new(start, start + 4), "here")
}

#[test]
fn flush_sorts_by_span() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.emit_error(unsupported(50, "second"));
    queue.emit_error(unsupported(10, "first"));
    let flushed = queue.flush();
    let messages: Vec<&str> = flushed.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);
    assert!(queue.is_empty());
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn duplicates_are_dropped() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(unsupported(10, "trait element")));
    assert!(!queue.add(unsupported(10, "trait element")));
    assert!(queue.add(unsupported(10, "trait key")));
    assert_eq!(queue.error_count(), 2);
}

#[test]
fn error_limit_appends_summary() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    for i in 0..5 {
        queue.emit_error(unsupported(i * 10, "x"));
    }
    assert!(queue.limit_reached());
    let flushed = queue.flush();
    assert_eq!(flushed.len(), 3);
    assert_eq!(flushed[2].code, ErrorCode::E9002);
    assert!(flushed[2].message.contains("3 more not shown"));
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(Diagnostic::warning(ErrorCode::E5002).with_message("w")));
    assert!(queue.has_errors().is_none());
    queue.emit_error(unsupported(0, "e"));
    assert!(queue.has_errors().is_some());
}
